use crate::ir::AnyOf;
use crate::ir::Field;
use crate::ir::InlineFragmentSpread;
use crate::ir::MergeConflict;
use crate::ir::MergedSource;
use crate::ir::NamedFragmentSpread;
use crate::ir::ScopeCondition;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// A field merged in from one or more other scopes of the same entity. Its
/// [Field::inclusion_conditions] are the effective conditions under which
/// any of its sources applies.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedField {
    pub(crate) field: Field,
    pub(crate) sources: IndexSet<MergedSource>,
}
impl MergedField {
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn sources(&self) -> &IndexSet<MergedSource> {
        &self.sources
    }
}

/// A sibling branch of an enclosing scope whose type may also apply at
/// runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedInlineFragment {
    pub(crate) inclusion_conditions: Option<AnyOf>,
    pub(crate) inline_fragment: InlineFragmentSpread,
    pub(crate) sources: IndexSet<MergedSource>,
}
impl MergedInlineFragment {
    /// Conditions, on top of the branch's own, under which the enclosing
    /// scope that declares the branch applies.
    pub fn inclusion_conditions(&self) -> Option<&AnyOf> {
        self.inclusion_conditions.as_ref()
    }

    pub fn inline_fragment(&self) -> &InlineFragmentSpread {
        &self.inline_fragment
    }

    pub fn sources(&self) -> &IndexSet<MergedSource> {
        &self.sources
    }
}

/// A fragment spread merged in from other scopes. Its
/// [NamedFragmentSpread::inclusion_conditions] are effective conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedFragmentSpread {
    pub(crate) fragment_spread: NamedFragmentSpread,
    pub(crate) sources: IndexSet<MergedSource>,
}
impl MergedFragmentSpread {
    pub fn fragment_spread(&self) -> &NamedFragmentSpread {
        &self.fragment_spread
    }

    pub fn sources(&self) -> &IndexSet<MergedSource> {
        &self.sources
    }
}

/// Everything that applies to a selection set because it was selected in
/// another scope of the same entity: parent scopes, matching type-condition
/// branches and spread fragments. Computed independently of the selection
/// set's own direct selections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MergedSelections {
    pub(crate) conflicts: Vec<MergeConflict>,
    pub(crate) fields: IndexMap<String, MergedField>,
    pub(crate) inline_fragments: IndexMap<ScopeCondition, MergedInlineFragment>,
    pub(crate) merged_sources: IndexSet<MergedSource>,
    pub(crate) named_fragments: IndexMap<String, MergedFragmentSpread>,
}
impl MergedSelections {
    /// Selections that were left out because they could not be merged.
    pub fn conflicts(&self) -> &[MergeConflict] {
        self.conflicts.as_slice()
    }

    pub fn field(&self, response_key: &str) -> Option<&MergedField> {
        self.fields.get(response_key)
    }

    pub fn fields(&self) -> &IndexMap<String, MergedField> {
        &self.fields
    }

    pub fn inline_fragments(&self) -> &IndexMap<ScopeCondition, MergedInlineFragment> {
        &self.inline_fragments
    }

    /// Every source that contributed at least one merged selection, in the
    /// order the sources were registered.
    pub fn merged_sources(&self) -> &IndexSet<MergedSource> {
        &self.merged_sources
    }

    pub fn named_fragments(&self) -> &IndexMap<String, MergedFragmentSpread> {
        &self.named_fragments
    }
}
