use crate::ir::AnyOf;
use crate::ir::SelectionSetRef;
use crate::loc;
use crate::schema::TypeAnnotation;
use crate::value::Value;
use indexmap::IndexMap;

/// A field selection.
///
/// Fields are keyed by their response key (the alias if there is one,
/// otherwise the name). Equality is shallow: it compares name, alias,
/// arguments and inclusion conditions, but not the declared type, the nested
/// selection set or where the field was written.
#[derive(Clone, Debug)]
pub struct Field {
    pub(crate) alias: Option<String>,
    pub(crate) arguments: IndexMap<String, Value>,
    pub(crate) declared_type: TypeAnnotation,
    pub(crate) def_location: loc::SourceLocation,
    pub(crate) inclusion_conditions: Option<AnyOf>,
    pub(crate) name: String,
    pub(crate) selection_set: Option<SelectionSetRef>,
}
impl Field {
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    pub fn declared_type(&self) -> &TypeAnnotation {
        &self.declared_type
    }

    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    pub fn inclusion_conditions(&self) -> Option<&AnyOf> {
        self.inclusion_conditions.as_ref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name.as_str())
    }

    /// The nested selection set if the field's type is composite.
    pub fn selection_set_ref(&self) -> Option<SelectionSetRef> {
        self.selection_set
    }
}
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.alias == other.alias
            && self.arguments == other.arguments
            && self.inclusion_conditions == other.inclusion_conditions
    }
}
impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{alias}: ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "(")?;
            for (idx, (arg_name, arg_value)) in self.arguments.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg_name}: {arg_value}")?;
            }
            write!(f, ")")?;
        }
        write!(f, ": {}", self.declared_type)
    }
}
