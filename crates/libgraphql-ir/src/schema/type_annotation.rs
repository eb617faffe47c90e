use crate::ast;
use crate::schema::Schema;

/// The declared type of a field, e.g. `[User!]` or `String!`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum TypeAnnotation {
    List {
        inner: Box<TypeAnnotation>,
        nullable: bool,
    },
    Named {
        nullable: bool,
        type_name: String,
    },
}
impl TypeAnnotation {
    pub fn list(inner: TypeAnnotation, nullable: bool) -> Self {
        Self::List {
            inner: Box::new(inner),
            nullable,
        }
    }

    pub fn named(type_name: impl AsRef<str>, nullable: bool) -> Self {
        Self::Named {
            nullable,
            type_name: type_name.as_ref().to_string(),
        }
    }

    pub(crate) fn from_ast_type(ast_type: &ast::schema::Type) -> Self {
        Self::from_ast_type_impl(ast_type, /* nullable = */ true)
    }

    fn from_ast_type_impl(ast_type: &ast::schema::Type, nullable: bool) -> Self {
        match ast_type {
            ast::schema::Type::ListType(inner) =>
                Self::list(Self::from_ast_type_impl(inner, true), nullable),

            ast::schema::Type::NamedType(name) =>
                Self::named(name, nullable),

            ast::schema::Type::NonNullType(inner) =>
                Self::from_ast_type_impl(inner, false),
        }
    }

    /// Recursively unwrap list wrappers and return the name of the inner-most
    /// named type.
    pub fn innermost_type_name(&self) -> &str {
        match self {
            Self::List { inner, .. } => inner.innermost_type_name(),
            Self::Named { type_name, .. } => type_name.as_str(),
        }
    }

    /// Two annotations are equivalent when they have the same list structure,
    /// the same nullability at every level and the same inner-most type.
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self == other
    }

    /// Indicates if a value of this type is always a valid value of `other`:
    /// non-null may narrow nullable, and a named type may narrow to any of its
    /// subtypes in `schema`.
    pub fn is_subtype_of(&self, schema: &Schema, other: &Self) -> bool {
        if self.nullable() && !other.nullable() {
            return false;
        }

        match (self, other) {
            (Self::List { inner: self_inner, .. }, Self::List { inner: other_inner, .. })
                => self_inner.is_subtype_of(schema, other_inner),

            (Self::Named { type_name: self_name, .. }, Self::Named { type_name: other_name, .. })
                => schema.is_subtype(self_name, other_name),

            _ => false,
        }
    }

    pub fn nullable(&self) -> bool {
        match self {
            Self::List { nullable, .. } => *nullable,
            Self::Named { nullable, .. } => *nullable,
        }
    }
}
impl std::fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List { inner, nullable } => write!(
                f,
                "[{inner}]{}",
                if *nullable { "" } else { "!" },
            ),

            Self::Named { nullable, type_name } => write!(
                f,
                "{type_name}{}",
                if *nullable { "" } else { "!" },
            ),
        }
    }
}
