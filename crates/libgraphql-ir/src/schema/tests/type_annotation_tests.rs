use crate::schema::Schema;
use crate::schema::SchemaBuilder;
use crate::schema::TypeAnnotation;

fn setup_schema() -> Schema {
    SchemaBuilder::from_str(None, r#"
        type Query { node: Node }
        interface Node { id: ID! }
        type User implements Node { id: ID! }
    "#).unwrap().build().unwrap()
}

#[test]
fn display_matches_graphql_syntax() {
    let annotation = TypeAnnotation::list(
        TypeAnnotation::list(TypeAnnotation::named("User", false), true),
        false,
    );
    assert_eq!(annotation.to_string(), "[[User!]]!");
    assert_eq!(TypeAnnotation::named("ID", true).to_string(), "ID");
}

#[test]
fn innermost_type_name_unwraps_lists() {
    let annotation = TypeAnnotation::list(
        TypeAnnotation::list(TypeAnnotation::named("User", false), true),
        false,
    );
    assert_eq!(annotation.innermost_type_name(), "User");
}

#[test]
fn equivalence_includes_nullability() {
    let nullable = TypeAnnotation::named("User", true);
    let non_null = TypeAnnotation::named("User", false);

    assert!(nullable.is_equivalent_to(&TypeAnnotation::named("User", true)));
    assert!(!nullable.is_equivalent_to(&non_null));
}

#[test]
fn non_null_is_subtype_of_nullable() {
    let schema = setup_schema();
    let nullable = TypeAnnotation::named("User", true);
    let non_null = TypeAnnotation::named("User", false);

    assert!(non_null.is_subtype_of(&schema, &nullable));
    assert!(!nullable.is_subtype_of(&schema, &non_null));
}

#[test]
fn object_is_subtype_of_its_interfaces() {
    let schema = setup_schema();
    let user = TypeAnnotation::named("User", false);
    let node = TypeAnnotation::named("Node", true);

    assert!(user.is_subtype_of(&schema, &node));
    assert!(!node.is_subtype_of(&schema, &user));
}

#[test]
fn list_subtyping_recurses_into_item_types() {
    let schema = setup_schema();
    let users = TypeAnnotation::list(TypeAnnotation::named("User", false), false);
    let nodes = TypeAnnotation::list(TypeAnnotation::named("Node", true), true);

    assert!(users.is_subtype_of(&schema, &nodes));
    assert!(!nodes.is_subtype_of(&schema, &users));
    assert!(!users.is_subtype_of(&schema, &TypeAnnotation::named("Node", true)));
}
