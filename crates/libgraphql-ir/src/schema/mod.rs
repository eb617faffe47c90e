mod graphql_type;
#[allow(clippy::module_inception)]
mod schema;
mod schema_builder;
#[cfg(test)]
mod tests;
mod type_annotation;

pub use graphql_type::FieldDefinition;
pub use graphql_type::GraphQLType;
pub use graphql_type::GraphQLTypeKind;
pub use graphql_type::LeafType;
pub use graphql_type::NamedGraphQLTypeRef;
pub use graphql_type::ObjectOrInterfaceType;
pub use graphql_type::UnionType;
pub use schema::Schema;
pub use schema_builder::SchemaBuildError;
pub use schema_builder::SchemaBuilder;
pub use schema_builder::TypeValidationError;
pub use type_annotation::TypeAnnotation;
