use crate::ir::SelectionSet;
use crate::ir::TypeInfo;
use crate::operation::DefinitionName;

/// Where a merged selection came from: the selection set it was written in
/// and, when that selection set belongs to a fragment other than the one
/// being merged into, that fragment's name.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MergedSource {
    pub type_info: TypeInfo,
    pub fragment: Option<String>,
}
impl MergedSource {
    pub fn new(type_info: TypeInfo, fragment: Option<&str>) -> Self {
        Self {
            type_info,
            fragment: fragment.map(|name| name.to_string()),
        }
    }

    /// A source written directly in the same definition as the selection set
    /// being merged into.
    pub fn of_selection_set(selection_set: &SelectionSet<'_>) -> Self {
        Self::new(selection_set.type_info().clone(), None)
    }

    /// A source written inside the fragment that `selection_set` belongs to
    /// (its root, or any selection set nested in it).
    pub fn from_fragment(selection_set: &SelectionSet<'_>) -> Self {
        let type_info = selection_set.type_info().clone();
        let fragment = match type_info.definition() {
            DefinitionName::Fragment(name) => Some(name.clone()),
            DefinitionName::Operation { .. } => None,
        };
        Self {
            type_info,
            fragment,
        }
    }
}
impl std::fmt::Display for MergedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_info)?;
        if let Some(fragment) = &self.fragment {
            write!(f, " (via ...{fragment})")?;
        }
        Ok(())
    }
}
