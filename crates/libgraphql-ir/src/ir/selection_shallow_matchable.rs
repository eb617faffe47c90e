use crate::ir::AnyOf;
use crate::ir::DirectSelections;
use crate::ir::Field;
use crate::ir::InlineFragmentSpread;
use crate::ir::MergedSelections;
use crate::ir::MergedSource;
use crate::ir::NamedFragmentSpread;
use indexmap::IndexSet;

pub struct FieldEntry<'a> {
    pub field: &'a Field,
    pub sources: Option<&'a IndexSet<MergedSource>>,
}

pub struct InlineFragmentEntry<'a> {
    /// Extra conditions a merged branch is subject to. Always `None` for
    /// direct branches.
    pub inclusion_conditions: Option<&'a AnyOf>,
    pub inline_fragment: &'a InlineFragmentSpread,
    pub sources: Option<&'a IndexSet<MergedSource>>,
}

pub struct FragmentSpreadEntry<'a> {
    pub fragment_spread: &'a NamedFragmentSpread,
    pub sources: Option<&'a IndexSet<MergedSource>>,
}

/// A uniform, order-preserving view over the top level of either
/// [DirectSelections] or [MergedSelections], for code that does not care
/// which of the two it is reading (printers, matchers).
pub trait SelectionShallowMatchable {
    fn field_entries(&self) -> Vec<FieldEntry<'_>>;
    fn fragment_spread_entries(&self) -> Vec<FragmentSpreadEntry<'_>>;
    fn inline_fragment_entries(&self) -> Vec<InlineFragmentEntry<'_>>;
    fn is_empty(&self) -> bool;
}

#[inherent::inherent]
impl SelectionShallowMatchable for DirectSelections {
    pub fn field_entries(&self) -> Vec<FieldEntry<'_>> {
        self.fields.values()
            .map(|field| FieldEntry {
                field,
                sources: None,
            })
            .collect()
    }

    pub fn fragment_spread_entries(&self) -> Vec<FragmentSpreadEntry<'_>> {
        self.named_fragments.values()
            .map(|fragment_spread| FragmentSpreadEntry {
                fragment_spread,
                sources: None,
            })
            .collect()
    }

    pub fn inline_fragment_entries(&self) -> Vec<InlineFragmentEntry<'_>> {
        self.inline_fragments.values()
            .map(|inline_fragment| InlineFragmentEntry {
                inclusion_conditions: None,
                inline_fragment,
                sources: None,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.inline_fragments.is_empty()
            && self.named_fragments.is_empty()
    }
}

#[inherent::inherent]
impl SelectionShallowMatchable for MergedSelections {
    pub fn field_entries(&self) -> Vec<FieldEntry<'_>> {
        self.fields.values()
            .map(|entry| FieldEntry {
                field: &entry.field,
                sources: Some(&entry.sources),
            })
            .collect()
    }

    pub fn fragment_spread_entries(&self) -> Vec<FragmentSpreadEntry<'_>> {
        self.named_fragments.values()
            .map(|entry| FragmentSpreadEntry {
                fragment_spread: &entry.fragment_spread,
                sources: Some(&entry.sources),
            })
            .collect()
    }

    pub fn inline_fragment_entries(&self) -> Vec<InlineFragmentEntry<'_>> {
        self.inline_fragments.values()
            .map(|entry| InlineFragmentEntry {
                inclusion_conditions: entry.inclusion_conditions.as_ref(),
                inline_fragment: &entry.inline_fragment,
                sources: Some(&entry.sources),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.inline_fragments.is_empty()
            && self.named_fragments.is_empty()
    }
}
