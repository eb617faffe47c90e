mod any_of;
mod diagnostic;
mod direct_selections;
mod entity_selection_tree;
mod field;
mod inclusion_condition;
mod inclusion_conditions;
mod inline_fragment_spread;
mod merge;
mod merge_config;
mod merged_selections;
mod merged_source;
mod named_fragment_spread;
mod scope_condition;
mod scope_descriptor;
mod selection_set;
mod selection_shallow_matchable;
#[cfg(test)]
mod tests;
mod type_info;

pub use any_of::AnyOf;
pub use diagnostic::ConflictKind;
pub use diagnostic::ConflictSite;
pub use diagnostic::IrDiagnostic;
pub use diagnostic::MergeConflict;
pub use direct_selections::DirectSelections;
pub use entity_selection_tree::EntitySelectionTree;
pub(crate) use entity_selection_tree::EntityTreeRegistrar;
pub(crate) use entity_selection_tree::NodeLookup;
pub use field::Field;
pub use inclusion_condition::InclusionCondition;
pub use inclusion_conditions::InclusionConditions;
pub use inclusion_conditions::InclusionEvaluation;
pub use inline_fragment_spread::InlineFragmentSpread;
pub use merge_config::DeclaredTypePolicy;
pub use merge_config::MergeConfig;
pub use merged_selections::MergedField;
pub use merged_selections::MergedFragmentSpread;
pub use merged_selections::MergedInlineFragment;
pub use merged_selections::MergedSelections;
pub use merged_source::MergedSource;
pub use named_fragment_spread::NamedFragmentSpread;
pub use scope_condition::ScopeCondition;
pub use scope_descriptor::ScopeDescriptor;
pub(crate) use selection_set::MergeContext;
pub use selection_set::SelectionSet;
pub use selection_set::SelectionSetRef;
pub use selection_set::Selections;
pub use selection_shallow_matchable::FieldEntry;
pub use selection_shallow_matchable::FragmentSpreadEntry;
pub use selection_shallow_matchable::InlineFragmentEntry;
pub use selection_shallow_matchable::SelectionShallowMatchable;
pub use type_info::TypeInfo;
