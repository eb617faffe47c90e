use crate::schema::Schema;
use crate::schema::SchemaBuilder;
use crate::schema::TypeAnnotation;
use indexmap::IndexSet;

fn setup_schema() -> Schema {
    SchemaBuilder::from_str(None, r#"
        type Query {
            node(id: ID!): Node
            search: [SearchResult!]!
        }

        interface Node { id: ID! }
        interface Entity implements Node { id: ID! }

        type User implements Entity & Node {
            id: ID!
            name: String
        }

        type Post implements Node {
            id: ID!
            title: String!
        }

        type Comment {
            body: String
        }

        union SearchResult = User | Post | Comment
    "#).unwrap().build().unwrap()
}

// =============================================================================
// Type hierarchy
// =============================================================================

#[test]
fn matching_types_include_interfaces_and_unions() {
    let schema = setup_schema();

    assert_eq!(
        schema.matching_types("User"),
        IndexSet::from([
            "User".to_string(),
            "Entity".to_string(),
            "Node".to_string(),
            "SearchResult".to_string(),
        ]),
    );
    assert_eq!(
        schema.matching_types("Entity"),
        IndexSet::from(["Entity".to_string(), "Node".to_string()]),
    );
    assert_eq!(
        schema.matching_types("SearchResult"),
        IndexSet::from(["SearchResult".to_string()]),
    );
}

#[test]
fn is_subtype_follows_transitive_interfaces() {
    let schema = setup_schema();

    assert!(schema.is_subtype("User", "User"));
    assert!(schema.is_subtype("User", "Node"));
    assert!(schema.is_subtype("Entity", "Node"));
    assert!(schema.is_subtype("Comment", "SearchResult"));
    assert!(!schema.is_subtype("Node", "User"));
    assert!(!schema.is_subtype("Post", "Entity"));
}

#[test]
fn possible_types_are_object_types() {
    let schema = setup_schema();

    assert_eq!(
        schema.possible_types("Node").into_iter().collect::<Vec<_>>(),
        vec!["User".to_string(), "Post".to_string()],
    );
    assert_eq!(
        schema.possible_types("Entity").into_iter().collect::<Vec<_>>(),
        vec!["User".to_string()],
    );
    assert_eq!(schema.possible_types("SearchResult").len(), 3);
    assert_eq!(
        schema.possible_types("Comment").into_iter().collect::<Vec<_>>(),
        vec!["Comment".to_string()],
    );
}

// =============================================================================
// Fields
// =============================================================================

#[test]
fn field_type_of_declared_fields() {
    let schema = setup_schema();

    assert_eq!(
        schema.field_type("Query", "search"),
        Some(TypeAnnotation::list(TypeAnnotation::named("SearchResult", false), false)),
    );
    assert_eq!(
        schema.field_type("Post", "title"),
        Some(TypeAnnotation::named("String", false)),
    );
    assert_eq!(schema.field_type("Post", "name"), None);
    assert_eq!(schema.field_type("Missing", "id"), None);
}

#[test]
fn typename_is_selectable_on_composite_types_only() {
    let schema = setup_schema();
    let typename_type = Some(TypeAnnotation::named("String", false));

    assert_eq!(schema.field_type("User", "__typename"), typename_type);
    assert_eq!(schema.field_type("SearchResult", "__typename"), typename_type);
    assert_eq!(schema.field_type("String", "__typename"), None);
}

#[test]
fn union_fields_are_not_selectable_directly() {
    let schema = setup_schema();

    assert_eq!(schema.field_type("SearchResult", "id"), None);
    assert!(schema.is_composite("SearchResult"));
    assert!(!schema.is_composite("ID"));
}
