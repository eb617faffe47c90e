use crate::operation::OperationKind;
use crate::schema::GraphQLType;
use crate::schema::TypeAnnotation;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// The type hierarchy that selection sets are resolved against.
///
/// Built by [SchemaBuilder](crate::schema::SchemaBuilder).
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    pub(crate) mutation_type_name: Option<String>,
    pub(crate) query_type_name: String,
    pub(crate) subscription_type_name: Option<String>,

    /// For every composite type: the type itself, every interface it
    /// implements (transitively) and, for object types, every union it is a
    /// member of.
    pub(crate) supertypes: IndexMap<String, IndexSet<String>>,
    pub(crate) types: IndexMap<String, GraphQLType>,
}
impl Schema {
    pub fn defined_types(&self) -> &IndexMap<String, GraphQLType> {
        &self.types
    }

    /// The declared type of `field_name` on the composite type
    /// `parent_type_name`. `__typename` is selectable on every composite type.
    pub fn field_type(
        &self,
        parent_type_name: &str,
        field_name: &str,
    ) -> Option<TypeAnnotation> {
        let parent_type = self.types.get(parent_type_name)?;
        if field_name == "__typename" && parent_type.is_composite() {
            return Some(TypeAnnotation::named("String", false));
        }

        parent_type.as_object_or_interface()?
            .field(field_name)
            .map(|field_def| field_def.type_annotation().clone())
    }

    pub fn is_composite(&self, type_name: &str) -> bool {
        self.types.get(type_name).is_some_and(|t| t.is_composite())
    }

    /// Indicates if every value of `sub_type_name` is also a value of
    /// `super_type_name`.
    pub fn is_subtype(&self, sub_type_name: &str, super_type_name: &str) -> bool {
        sub_type_name == super_type_name
            || self.supertypes
                .get(sub_type_name)
                .is_some_and(|supertypes| supertypes.contains(super_type_name))
    }

    /// The set of type names a selection set on `type_name` satisfies type
    /// conditions for.
    pub fn matching_types(&self, type_name: &str) -> IndexSet<String> {
        self.supertypes
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| IndexSet::from([type_name.to_string()]))
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type_name.as_deref()
    }

    /// The object types a value of `type_name` can have at runtime.
    pub fn possible_types(&self, type_name: &str) -> IndexSet<String> {
        self.types
            .values()
            .filter_map(|t| match t {
                GraphQLType::Object(obj) if self.is_subtype(obj.name(), type_name)
                    => Some(obj.name().to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn query_type_name(&self) -> &str {
        self.query_type_name.as_str()
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Mutation => self.mutation_type_name(),
            OperationKind::Query => Some(self.query_type_name()),
            OperationKind::Subscription => self.subscription_type_name(),
        }
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type_name.as_deref()
    }

    pub fn type_named(&self, type_name: &str) -> Option<&GraphQLType> {
        self.types.get(type_name)
    }
}
