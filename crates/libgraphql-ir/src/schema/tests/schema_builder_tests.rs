use crate::loc;
use crate::operation::OperationKind;
use crate::schema::GraphQLType;
use crate::schema::GraphQLTypeKind;
use crate::schema::SchemaBuilder;
use crate::schema::SchemaBuildError;
use crate::schema::TypeAnnotation;
use crate::schema::TypeValidationError;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, SchemaBuildError>;

mod basics {
    use super::*;

    #[test]
    fn build_without_load() -> Result<()> {
        let schema = SchemaBuilder::new().build();

        assert!(matches!(
            schema.unwrap_err(),
            SchemaBuildError::NoQueryOperationTypeDefined,
        ));

        Ok(())
    }

    #[test]
    fn builtin_scalars_are_always_defined() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(None, "type Query { id: ID }")?
            .build()?;

        for scalar_name in ["Boolean", "Float", "ID", "Int", "String"] {
            let scalar = schema.type_named(scalar_name).unwrap();
            assert_eq!(scalar.kind(), GraphQLTypeKind::Scalar);
            assert_eq!(scalar.def_location(), &loc::SchemaDefLocation::GraphQLBuiltIn);
        }
        assert_eq!(schema.defined_types().len(), 6);

        Ok(())
    }

    #[test]
    fn load_default_root_types() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(None, concat!(
                "type Mutation { noop: Boolean }\n",
                "type Query { noop: Boolean }\n",
                "type Subscription { noop: Boolean }",
            ))?
            .build()?;

        assert_eq!(schema.query_type_name(), "Query");
        assert_eq!(schema.mutation_type_name(), Some("Mutation"));
        assert_eq!(schema.subscription_type_name(), Some("Subscription"));
        assert_eq!(schema.root_type_name(OperationKind::Mutation), Some("Mutation"));

        Ok(())
    }

    #[test]
    fn load_query_type_only() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(None, "type Query { noop: Boolean }")?
            .build()?;

        assert_eq!(schema.query_type_name(), "Query");
        assert!(schema.mutation_type_name().is_none());
        assert!(schema.subscription_type_name().is_none());
        assert!(schema.root_type_name(OperationKind::Subscription).is_none());

        Ok(())
    }

    #[test]
    fn load_explicit_schema_block() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(None, concat!(
                "schema { query: RootQuery, mutation: RootMutation }\n",
                "type RootQuery { noop: Boolean }\n",
                "type RootMutation { noop: Boolean }\n",
                "type Query { ignored: Boolean }",
            ))?
            .build()?;

        assert_eq!(schema.query_type_name(), "RootQuery");
        assert_eq!(schema.mutation_type_name(), Some("RootMutation"));

        Ok(())
    }

    #[test]
    fn load_invalid_schema_syntax() {
        let result = SchemaBuilder::new()
            .load_str(None, "this is not valid syntax");

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::ParseError { file: None, .. },
        ));
    }

    #[test]
    fn parse_error_includes_file_path() {
        let file_path = PathBuf::from("/tmp/schema.graphqls");
        let result = SchemaBuilder::new()
            .load_str(Some(file_path.clone()), "type {");

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::ParseError { file: Some(file), .. } if file == file_path,
        ));
    }

    #[test]
    fn load_missing_file() {
        let result = SchemaBuilder::new()
            .load_file("/this/path/does/not/exist.graphqls");

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::SchemaFileReadError(_),
        ));
    }
}

mod type_definitions {
    use super::*;

    #[test]
    fn object_fields_keep_definition_order() -> Result<()> {
        let schema = SchemaBuilder::from_str(None, r#"
            type Query {
                zebra: String
                apple: Int!
                mango: [ID!]
            }
        "#)?.build()?;

        let query = schema.type_named("Query").unwrap()
            .as_object_or_interface()
            .unwrap();
        assert_eq!(query.fields().keys().collect::<Vec<_>>(), vec![
            "zebra",
            "apple",
            "mango",
        ]);
        assert_eq!(
            query.field("mango").unwrap().type_annotation(),
            &TypeAnnotation::list(TypeAnnotation::named("ID", false), true),
        );

        Ok(())
    }

    #[test]
    fn duplicate_type_definition() {
        let result = SchemaBuilder::from_str(None, r#"
            type Query { noop: Boolean }
            type User { id: ID }
            type User { name: String }
        "#);

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::DuplicateTypeDefinition { type_name, .. } if type_name == "User",
        ));
    }

    #[test]
    fn duplicate_builtin_scalar_definition() {
        let result = SchemaBuilder::from_str(None, "scalar String");

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::DuplicateTypeDefinition {
                def1: loc::SchemaDefLocation::GraphQLBuiltIn,
                ..
            },
        ));
    }

    #[test]
    fn duplicate_field_definition() {
        let result = SchemaBuilder::from_str(None, r#"
            type Query {
                id: ID
                id: String
            }
        "#);

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::DuplicateFieldNameDefinition { type_name, field_name, .. }
                if type_name == "Query" && field_name == "id",
        ));
    }

    #[test]
    fn duplicate_schema_definition() {
        let result = SchemaBuilder::from_str(None, r#"
            schema { query: Query }
            schema { query: Query }
            type Query { noop: Boolean }
        "#);

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::DuplicateSchemaDefinition { .. },
        ));
    }

    #[test]
    fn root_type_must_be_an_object_type() {
        let result = SchemaBuilder::from_str(None, r#"
            schema { query: Node }
            interface Node { id: ID! }
        "#).and_then(|builder| builder.build());

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::InvalidRootOperationType {
                operation: OperationKind::Query,
                type_name,
                ..
            } if type_name == "Node",
        ));
    }

    #[test]
    fn type_validation_errors_are_collected() {
        let result = SchemaBuilder::from_str(None, r#"
            type Query {
                missing: Missing
                filter: Filter
            }
            input Filter { term: String }
            type User implements Query { id: ID }
            union Result = User | String
        "#).and_then(|builder| builder.build());

        let errors = match result {
            Err(SchemaBuildError::TypeValidationErrors { errors }) => errors,
            other => panic!("expected type validation errors, got: {other:?}"),
        };
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|err| matches!(
            err,
            TypeValidationError::UndefinedTypeName { undefined_type_name, .. }
                if undefined_type_name == "Missing",
        )));
        assert!(errors.iter().any(|err| matches!(
            err,
            TypeValidationError::InvalidOutputFieldType { field_name, .. }
                if field_name == "filter",
        )));
        assert!(errors.iter().any(|err| matches!(
            err,
            TypeValidationError::ImplementsNonInterfaceType { interface_name, .. }
                if interface_name == "Query",
        )));
        assert!(errors.iter().any(|err| matches!(
            err,
            TypeValidationError::InvalidUnionMember { member_name, .. }
                if member_name == "String",
        )));
    }
}

mod type_extensions {
    use super::*;

    #[test]
    fn object_extension_adds_fields_and_interfaces() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(None, r#"
                type Query { me: User }
                type User { id: ID! }
            "#)?
            .load_str(None, r#"
                interface Named { name: String }
                extend type User implements Named { name: String }
            "#)?
            .build()?;

        let user = schema.type_named("User").unwrap()
            .as_object_or_interface()
            .unwrap();
        assert_eq!(user.fields().keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(user.interface_names().collect::<Vec<_>>(), vec!["Named"]);
        assert!(schema.is_subtype("User", "Named"));

        Ok(())
    }

    #[test]
    fn extension_may_precede_the_extended_type() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(None, "extend type Query { extra: Int }")?
            .load_str(None, "type Query { base: Int }")?
            .build()?;

        let query = schema.type_named("Query").unwrap()
            .as_object_or_interface()
            .unwrap();
        assert_eq!(query.fields().keys().collect::<Vec<_>>(), vec!["base", "extra"]);

        Ok(())
    }

    #[test]
    fn union_extension_adds_members() -> Result<()> {
        let schema = SchemaBuilder::from_str(None, r#"
            type Query { search: SearchResult }
            type User { id: ID }
            type Post { id: ID }
            union SearchResult = User
            extend union SearchResult = Post
        "#)?.build()?;

        let GraphQLType::Union(union_type) = schema.type_named("SearchResult").unwrap() else {
            panic!("expected a union type");
        };
        assert_eq!(union_type.member_names().collect::<Vec<_>>(), vec!["User", "Post"]);
        assert!(schema.is_subtype("Post", "SearchResult"));

        Ok(())
    }

    #[test]
    fn extension_of_undefined_type() {
        let result = SchemaBuilder::from_str(None, r#"
            type Query { noop: Boolean }
            extend type Missing { id: ID }
        "#).and_then(|builder| builder.build());

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::ExtensionOfUndefinedType { type_name, .. } if type_name == "Missing",
        ));
    }

    #[test]
    fn extension_of_wrong_kind() {
        let result = SchemaBuilder::from_str(None, r#"
            type Query { noop: Boolean }
            interface Node { id: ID! }
            extend type Node { name: String }
        "#).and_then(|builder| builder.build());

        assert!(matches!(
            result.unwrap_err(),
            SchemaBuildError::InvalidExtensionType {
                type_kind: GraphQLTypeKind::Interface,
                extension_kind: GraphQLTypeKind::Object,
                ..
            },
        ));
    }
}
