use crate::loc;
use crate::named_ref::DerefByName;
use crate::named_ref::DerefByNameError;
use crate::named_ref::NamedRef;
use crate::schema::Schema;
use crate::schema::TypeAnnotation;
use indexmap::IndexMap;

pub type NamedGraphQLTypeRef = NamedRef<Schema, loc::SourceLocation, GraphQLType>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum GraphQLTypeKind {
    Enum,
    InputObject,
    Interface,
    Object,
    Scalar,
    Union,
}
impl std::fmt::Display for GraphQLTypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Enum => "enum",
            Self::InputObject => "input",
            Self::Interface => "interface",
            Self::Object => "type",
            Self::Scalar => "scalar",
            Self::Union => "union",
        })
    }
}

/// A named type defined by a [Schema].
///
/// Only the parts of a type that selection sets depend on are modelled:
/// composite types carry their fields and their place in the type hierarchy,
/// leaf and input types carry only a name.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphQLType {
    Enum(LeafType),
    InputObject(LeafType),
    Interface(ObjectOrInterfaceType),
    Object(ObjectOrInterfaceType),
    Scalar(LeafType),
    Union(UnionType),
}
impl GraphQLType {
    pub fn as_object_or_interface(&self) -> Option<&ObjectOrInterfaceType> {
        match self {
            Self::Interface(data) | Self::Object(data) => Some(data),
            _ => None,
        }
    }

    pub(super) fn as_object_or_interface_mut(
        &mut self,
    ) -> Option<&mut ObjectOrInterfaceType> {
        match self {
            Self::Interface(data) | Self::Object(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        if let Self::Union(union_type) = self {
            Some(union_type)
        } else {
            None
        }
    }

    pub fn def_location(&self) -> &loc::SchemaDefLocation {
        match self {
            Self::Enum(leaf)
                | Self::InputObject(leaf)
                | Self::Scalar(leaf) => &leaf.def_location,
            Self::Interface(data) | Self::Object(data) => &data.def_location,
            Self::Union(union_type) => &union_type.def_location,
        }
    }

    /// Object, interface and union types are composite: they are the only
    /// types a selection set can be made on.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Object(_) | Self::Union(_))
    }

    pub fn kind(&self) -> GraphQLTypeKind {
        match self {
            Self::Enum(_) => GraphQLTypeKind::Enum,
            Self::InputObject(_) => GraphQLTypeKind::InputObject,
            Self::Interface(_) => GraphQLTypeKind::Interface,
            Self::Object(_) => GraphQLTypeKind::Object,
            Self::Scalar(_) => GraphQLTypeKind::Scalar,
            Self::Union(_) => GraphQLTypeKind::Union,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enum(leaf)
                | Self::InputObject(leaf)
                | Self::Scalar(leaf) => leaf.name.as_str(),
            Self::Interface(data) | Self::Object(data) => data.name.as_str(),
            Self::Union(union_type) => union_type.name.as_str(),
        }
    }
}
impl DerefByName for GraphQLType {
    type Source = Schema;
    type RefLocation = loc::SourceLocation;

    fn deref_name<'a>(
        schema: &'a Self::Source,
        name: &str,
    ) -> Result<&'a GraphQLType, DerefByNameError> {
        schema.types.get(name).ok_or_else(
            || DerefByNameError::DanglingReference(name.to_string())
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeafType {
    pub(super) def_location: loc::SchemaDefLocation,
    pub(super) name: String,
}
impl LeafType {
    pub(super) fn builtin(name: &str) -> Self {
        Self {
            def_location: loc::SchemaDefLocation::GraphQLBuiltIn,
            name: name.to_string(),
        }
    }
}

/// The shared shape of object and interface types.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectOrInterfaceType {
    pub(super) def_location: loc::SchemaDefLocation,
    pub(super) fields: IndexMap<String, FieldDefinition>,
    pub(super) interfaces: Vec<NamedGraphQLTypeRef>,
    pub(super) name: String,
}
impl ObjectOrInterfaceType {
    pub fn field(&self, field_name: &str) -> Option<&FieldDefinition> {
        self.fields.get(field_name)
    }

    pub fn fields(&self) -> &IndexMap<String, FieldDefinition> {
        &self.fields
    }

    /// The interfaces this type declares it implements (not transitively).
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(|iface_ref| iface_ref.name())
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionType {
    pub(super) def_location: loc::SchemaDefLocation,
    pub(super) members: Vec<NamedGraphQLTypeRef>,
    pub(super) name: String,
}
impl UnionType {
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member_ref| member_ref.name())
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub(super) def_location: loc::SourceLocation,
    pub(super) name: String,
    pub(super) type_annotation: TypeAnnotation,
}
impl FieldDefinition {
    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_annotation(&self) -> &TypeAnnotation {
        &self.type_annotation
    }
}
