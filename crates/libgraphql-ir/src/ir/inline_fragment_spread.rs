use crate::ir::ScopeCondition;
use crate::ir::SelectionSetRef;
use crate::loc;

/// A type-conditional (and/or inclusion-conditional) branch of a selection
/// set, keyed by its [ScopeCondition].
#[derive(Clone, Debug)]
pub struct InlineFragmentSpread {
    pub(crate) def_location: loc::SourceLocation,
    pub(crate) scope_condition: ScopeCondition,
    pub(crate) selection_set: SelectionSetRef,
}
impl InlineFragmentSpread {
    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    pub fn scope_condition(&self) -> &ScopeCondition {
        &self.scope_condition
    }

    pub fn selection_set_ref(&self) -> SelectionSetRef {
        self.selection_set
    }
}
impl PartialEq for InlineFragmentSpread {
    fn eq(&self, other: &Self) -> bool {
        self.scope_condition == other.scope_condition
    }
}
