use crate::ir::Field;
use crate::ir::InlineFragmentSpread;
use crate::ir::NamedFragmentSpread;
use crate::ir::ScopeCondition;
use indexmap::IndexMap;

/// The selections written at one location of a document, after duplicate
/// response keys, duplicate branches and duplicate spreads have been folded
/// together. Built once and never mutated.
#[derive(Clone, Debug, Default)]
pub struct DirectSelections {
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) inline_fragments: IndexMap<ScopeCondition, InlineFragmentSpread>,
    pub(crate) named_fragments: IndexMap<String, NamedFragmentSpread>,
}
impl DirectSelections {
    pub fn field(&self, response_key: &str) -> Option<&Field> {
        self.fields.get(response_key)
    }

    /// Fields keyed by response key, in document order.
    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    pub fn inline_fragments(&self) -> &IndexMap<ScopeCondition, InlineFragmentSpread> {
        &self.inline_fragments
    }

    pub fn named_fragments(&self) -> &IndexMap<String, NamedFragmentSpread> {
        &self.named_fragments
    }
}
impl PartialEq for DirectSelections {
    // Order matters: generated code follows it.
    fn eq(&self, other: &Self) -> bool {
        self.fields.iter().eq(other.fields.iter())
            && self.inline_fragments.iter().eq(other.inline_fragments.iter())
            && self.named_fragments.iter().eq(other.named_fragments.iter())
    }
}
