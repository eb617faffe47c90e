use crate::ir::entity_selection_tree::Applicability;
use crate::ir::entity_selection_tree::EntityRecord;
use crate::ir::entity_selection_tree::RecordKind;
use crate::ir::AnyOf;
use crate::ir::ConflictKind;
use crate::ir::ConflictSite;
use crate::ir::DeclaredTypePolicy;
use crate::ir::Field;
use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;
use crate::ir::MergeConflict;
use crate::ir::MergeContext;
use crate::ir::MergedField;
use crate::ir::MergedFragmentSpread;
use crate::ir::MergedInlineFragment;
use crate::ir::MergedSelections;
use crate::ir::MergedSource;
use crate::ir::SelectionSetRef;
use crate::operation::SelectionSetNode;
use indexmap::IndexSet;

/// Computes the [MergedSelections] of the selection set `target_ref`.
///
/// Every other selection set registered in the target's entity is checked
/// against the target's scope. Those that apply contribute their fields and
/// fragment spreads (under whatever extra inclusion conditions they need);
/// type-conditional siblings that may apply at runtime are listed as merged
/// inline fragments.
pub(crate) fn compute_merged_selections(
    ctx: MergeContext<'_>,
    target_ref: SelectionSetRef,
) -> MergedSelections {
    let definition = ctx.definitions.get(target_ref.definition);
    let target = definition.node(target_ref.node);
    let Some(tree) = definition.entities.get(target.type_info.entity_path()) else {
        return MergedSelections::default();
    };

    let target_conditions = target.type_info.cumulative_conditions();
    let classes: Vec<Option<Applicability>> = tree.records.iter()
        .enumerate()
        .map(|(idx, record)| {
            if record.selection_set == target_ref {
                None
            } else {
                Some(tree.applicability(idx, &target.type_info, target_conditions.as_ref()))
            }
        })
        .collect();

    let mut merger = Merger::new(ctx, target);
    for (idx, record) in tree.records.iter().enumerate() {
        match &classes[idx] {
            Some(Applicability::Applies { extra }) =>
                merger.merge_record(record, extra.as_ref()),

            Some(Applicability::TypeMismatch) if record.kind == RecordKind::InlineBranch => {
                let parent_extra = record.parent.and_then(|parent_idx| {
                    match &classes[parent_idx] {
                        Some(Applicability::Applies { extra }) => Some(extra.as_ref()),
                        _ => None,
                    }
                });
                if let (Some(parent_extra), Some(parent_idx)) = (parent_extra, record.parent) {
                    merger.merge_sibling_branch(
                        record,
                        &tree.records[parent_idx],
                        parent_extra,
                    );
                }
            },

            Some(Applicability::Contradiction) => log::trace!(
                "Pruned `{}` from `{}`: its inclusion conditions contradict.",
                record.source.type_info,
                target.type_info,
            ),

            Some(Applicability::TypeMismatch) | None => (),
        }
    }

    merger.finish(tree.records.iter().map(|record| &record.source))
}

struct Merger<'a> {
    conflicted_keys: IndexSet<String>,
    ctx: MergeContext<'a>,
    merged: MergedSelections,
    target: &'a SelectionSetNode,
}
impl<'a> Merger<'a> {
    fn new(ctx: MergeContext<'a>, target: &'a SelectionSetNode) -> Self {
        Self {
            conflicted_keys: IndexSet::new(),
            ctx,
            merged: MergedSelections::default(),
            target,
        }
    }

    fn conflict_kind(&self, first: &Field, second: &Field) -> Option<ConflictKind> {
        if first.name != second.name {
            return Some(ConflictKind::FieldName {
                first_name: first.name.clone(),
                second_name: second.name.clone(),
            });
        }
        if first.arguments != second.arguments {
            return Some(ConflictKind::Arguments);
        }

        let compatible = match self.ctx.config.declared_type_policy {
            DeclaredTypePolicy::Exact =>
                first.declared_type.is_equivalent_to(&second.declared_type),
            DeclaredTypePolicy::Covariant => {
                let schema = self.ctx.schema;
                first.declared_type.is_subtype_of(schema, &second.declared_type)
                    || second.declared_type.is_subtype_of(schema, &first.declared_type)
            },
        };
        if compatible {
            None
        } else {
            Some(ConflictKind::DeclaredType {
                first_type: first.declared_type.clone(),
                second_type: second.declared_type.clone(),
            })
        }
    }

    fn finish<'s>(
        mut self,
        registration_order: impl Iterator<Item = &'s MergedSource>,
    ) -> MergedSelections {
        let contributing: IndexSet<&MergedSource> = self.merged.fields.values()
            .flat_map(|entry| entry.sources.iter())
            .chain(self.merged.inline_fragments.values().flat_map(|entry| entry.sources.iter()))
            .chain(self.merged.named_fragments.values().flat_map(|entry| entry.sources.iter()))
            .collect();

        let merged_sources: IndexSet<MergedSource> = registration_order
            .filter(|source| contributing.contains(source))
            .cloned()
            .collect();
        self.merged.merged_sources = merged_sources;
        self.merged
    }

    fn merge_field(
        &mut self,
        field: &Field,
        extra: Option<&InclusionConditions>,
        source: &MergedSource,
    ) {
        let target = self.target;
        let response_key = field.response_key();
        if self.conflicted_keys.contains(response_key) {
            return;
        }

        let inclusion_conditions = match AnyOf::and_all(
            field.inclusion_conditions.as_ref(),
            extra,
        ) {
            InclusionEvaluation::Skipped => return,
            evaluation => evaluation.into_conditions(),
        };

        let existing_conflict = self.merged.fields.get(response_key)
            .and_then(|entry| self.conflict_kind(&entry.field, field));
        if let Some(kind) = existing_conflict {
            if let Some(existing) = self.merged.fields.shift_remove(response_key) {
                let first_source = existing.sources.first();
                let first = ConflictSite {
                    fragment: first_source.and_then(|s| s.fragment.clone()),
                    location: existing.field.def_location.clone(),
                    type_info: first_source
                        .map(|s| s.type_info.clone())
                        .unwrap_or_else(|| target.type_info.clone()),
                };
                self.record_conflict(response_key, kind, first, field, source);
            }
            return;
        }

        if let Some(entry) = self.merged.fields.get_mut(response_key) {
            entry.field.inclusion_conditions = AnyOf::or(
                entry.field.inclusion_conditions.as_ref(),
                inclusion_conditions.as_ref(),
            );
            entry.sources.insert(source.clone());
            return;
        }

        if let Some(direct_field) = target.direct.fields.get(response_key)
            && let Some(kind) = self.conflict_kind(direct_field, field) {
            let first = ConflictSite {
                fragment: None,
                location: direct_field.def_location.clone(),
                type_info: target.type_info.clone(),
            };
            self.record_conflict(response_key, kind, first, field, source);
            return;
        }

        let mut merged_field = field.clone();
        merged_field.inclusion_conditions = inclusion_conditions;
        if let Some(direct_field) = target.direct.fields.get(response_key) {
            merged_field.selection_set = direct_field.selection_set;
        }
        self.merged.fields.insert(response_key.to_string(), MergedField {
            field: merged_field,
            sources: IndexSet::from([source.clone()]),
        });
    }

    fn merge_record(
        &mut self,
        record: &EntityRecord,
        extra: Option<&InclusionConditions>,
    ) {
        let definitions = self.ctx.definitions;
        let node = definitions.node(record.selection_set);
        for field in node.direct.fields.values() {
            self.merge_field(field, extra, &record.source);
        }

        for spread in node.direct.named_fragments.values() {
            let inclusion_conditions = match AnyOf::and_all(
                spread.inclusion_conditions.as_ref(),
                extra,
            ) {
                InclusionEvaluation::Skipped => continue,
                evaluation => evaluation.into_conditions(),
            };

            match self.merged.named_fragments.get_mut(spread.fragment_name()) {
                Some(entry) => {
                    entry.fragment_spread.inclusion_conditions = AnyOf::or(
                        entry.fragment_spread.inclusion_conditions.as_ref(),
                        inclusion_conditions.as_ref(),
                    );
                    entry.sources.insert(record.source.clone());
                },
                None => {
                    let mut fragment_spread = spread.clone();
                    fragment_spread.inclusion_conditions = inclusion_conditions;
                    self.merged.named_fragments.insert(
                        spread.fragment_name().to_string(),
                        MergedFragmentSpread {
                            fragment_spread,
                            sources: IndexSet::from([record.source.clone()]),
                        },
                    );
                },
            }
        }
    }

    /// Lists an inline branch declared in a scope that applies to the
    /// target, when the branch's type could also be the target's runtime
    /// type.
    fn merge_sibling_branch(
        &mut self,
        record: &EntityRecord,
        parent: &EntityRecord,
        parent_extra: Option<&InclusionConditions>,
    ) {
        let definitions = self.ctx.definitions;
        let branch_node = definitions.node(record.selection_set);
        let parent_node = definitions.node(parent.selection_set);
        let scope_condition = branch_node.type_info.scope().current_scope();
        let Some(inline_fragment) = parent_node.direct.inline_fragments.get(scope_condition) else {
            return;
        };

        let schema = self.ctx.schema;
        let target_possible_types = schema.possible_types(self.target.type_info.parent_type());
        let overlaps = schema.possible_types(branch_node.type_info.parent_type())
            .iter()
            .any(|type_name| target_possible_types.contains(type_name));
        if !overlaps {
            return;
        }

        let inclusion_conditions = parent_extra.cloned().map(AnyOf::new);
        match self.merged.inline_fragments.get_mut(scope_condition) {
            Some(entry) => {
                entry.inclusion_conditions = AnyOf::or(
                    entry.inclusion_conditions.as_ref(),
                    inclusion_conditions.as_ref(),
                );
                entry.sources.insert(parent.source.clone());
            },
            None => {
                self.merged.inline_fragments.insert(
                    scope_condition.clone(),
                    MergedInlineFragment {
                        inclusion_conditions,
                        inline_fragment: inline_fragment.clone(),
                        sources: IndexSet::from([parent.source.clone()]),
                    },
                );
            },
        }
    }

    fn record_conflict(
        &mut self,
        response_key: &str,
        kind: ConflictKind,
        first: ConflictSite,
        second_field: &Field,
        second_source: &MergedSource,
    ) {
        let conflict = MergeConflict {
            response_key: response_key.to_string(),
            kind,
            first,
            second: ConflictSite {
                fragment: second_source.fragment.clone(),
                location: second_field.def_location.clone(),
                type_info: second_source.type_info.clone(),
            },
        };
        log::debug!("{conflict}");
        self.conflicted_keys.insert(response_key.to_string());
        self.merged.conflicts.push(conflict);
    }
}
