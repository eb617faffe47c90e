use crate::render;
use libgraphql_ir::operation::CompiledDocument;
use libgraphql_ir::operation::IrBuilder;
use libgraphql_ir::schema::Schema;
use libgraphql_ir::schema::SchemaBuilder;

fn setup_schema() -> Schema {
    SchemaBuilder::from_str(None, r#"
        type Query { me: User, product: Product }
        type User { id: ID!, name: String }
        type Product { price(currency: String): Float }
    "#).unwrap().build().unwrap()
}

fn build<'schema>(schema: &'schema Schema, document: &str) -> CompiledDocument<'schema> {
    let mut builder = IrBuilder::new(schema);
    builder.add_document_str(document, None).unwrap();
    builder.build().unwrap()
}

#[test]
fn renders_direct_and_merged_selections_with_sources() {
    let schema = setup_schema();
    let document = build(&schema, r#"
        query Q($a: Boolean!) { me { id ...UserName @include(if: $a) } }
        fragment UserName on User { name }
    "#);

    let output = render::render_document(&document).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "fragment UserName on User (<str>:3:9)");
    assert_eq!(lines[1], "  fragment UserName [User]");
    assert!(lines.contains(&"query Q on Query (<str>:2:9)"));
    assert!(lines.contains(&"  query Q [Query] › me [User]"));
    assert!(lines.contains(&"      ...UserName @if($a)"));
    assert!(lines.contains(&"      name: String @if($a)"));
    assert!(lines.contains(&"        <- fragment UserName [User] (via ...UserName)"));
}

#[test]
fn renders_conflicts() {
    let schema = setup_schema();
    let document = build(&schema, r#"
        query Q { product { ...Usd ...Eur } }
        fragment Usd on Product { price(currency: "USD") }
        fragment Eur on Product { price(currency: "EUR") }
    "#);

    let output = render::render_document(&document).unwrap();
    assert!(output.lines().any(|line| line == "    conflict: `price` arguments differ"));

    let diagnostics = document.collect_merge_diagnostics();
    let rendered = render::render_errors(&diagnostics);
    assert!(rendered.starts_with("  - Conflicting selections for `price`: arguments differ"));
    assert!(rendered.contains("\n      first:  "));
}
