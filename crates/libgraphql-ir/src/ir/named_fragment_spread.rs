use crate::ir::AnyOf;
use crate::ir::SelectionSetRef;
use crate::loc;
use crate::operation::NamedFragmentRef;

/// A `...FragmentName` spread. The fragment definition is referenced by name,
/// never owned, so every spread of a fragment shares its selection sets.
#[derive(Clone, Debug)]
pub struct NamedFragmentSpread {
    pub(crate) def_location: loc::SourceLocation,
    pub(crate) fragment: NamedFragmentRef,
    pub(crate) fragment_root: SelectionSetRef,
    pub(crate) fragment_type: String,
    pub(crate) inclusion_conditions: Option<AnyOf>,
}
impl NamedFragmentSpread {
    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    pub fn fragment_name(&self) -> &str {
        self.fragment.name()
    }

    pub fn fragment_ref(&self) -> &NamedFragmentRef {
        &self.fragment
    }

    /// The root selection set of the spread fragment's definition.
    pub fn fragment_root_ref(&self) -> SelectionSetRef {
        self.fragment_root
    }

    /// The type condition of the fragment definition.
    pub fn fragment_type(&self) -> &str {
        self.fragment_type.as_str()
    }

    pub fn inclusion_conditions(&self) -> Option<&AnyOf> {
        self.inclusion_conditions.as_ref()
    }
}
impl PartialEq for NamedFragmentSpread {
    fn eq(&self, other: &Self) -> bool {
        self.fragment == other.fragment
            && self.fragment_type == other.fragment_type
            && self.inclusion_conditions == other.inclusion_conditions
    }
}
