use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;
use crate::ir::MergedSource;
use crate::ir::ScopeCondition;
use crate::ir::SelectionSetRef;
use crate::ir::TypeInfo;
use crate::operation::DefinitionId;
use crate::operation::DefinitionName;
use crate::operation::Definitions;
use crate::operation::SelectionSetNode;
use indexmap::IndexMap;

/// The [ScopeCondition]s a registered selection set applies under, one list
/// per entity level, outermost first.
pub(crate) type Placement = Vec<Vec<ScopeCondition>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RecordKind {
    /// The root selection set of the definition or of a field.
    EntityRoot,

    /// The root selection set of a spread fragment.
    FragmentRoot,

    /// A type- or inclusion-conditional branch.
    InlineBranch,
}

#[derive(Clone, Debug)]
pub(crate) struct EntityRecord {
    pub(crate) kind: RecordKind,

    /// The record of the selection set this one was declared in (an inline
    /// branch's or a spread fragment's enclosing selection set).
    pub(crate) parent: Option<usize>,
    pub(crate) placement: Placement,
    pub(crate) selection_set: SelectionSetRef,
    pub(crate) source: MergedSource,
}

/// Whether a registered selection set applies to some target selection set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Applicability {
    /// Applies whenever the target does and `extra` also holds.
    Applies { extra: Option<InclusionConditions> },

    /// Can never apply together with the target.
    Contradiction,

    /// Some type condition is not satisfied by the target's scope.
    TypeMismatch,
}

/// Every selection set of one entity (one response object) of a definition,
/// including the selection sets of fragments spread into it, in registration
/// order.
#[derive(Clone, Debug, Default)]
pub struct EntitySelectionTree {
    pub(crate) records: Vec<EntityRecord>,
}
impl EntitySelectionTree {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// The selection sets registered in this entity, in registration order.
    pub fn selection_set_refs(&self) -> impl Iterator<Item = SelectionSetRef> + '_ {
        self.records.iter().map(|record| record.selection_set)
    }

    pub(crate) fn applicability(
        &self,
        record_idx: usize,
        target: &TypeInfo,
        target_conditions: Option<&InclusionConditions>,
    ) -> Applicability {
        let placement = &self.records[record_idx].placement;
        if placement.len() != target.levels().count() {
            return Applicability::TypeMismatch;
        }

        let mut types_match = true;
        let mut record_conditions = vec![];
        for (level, scope_conditions) in target.levels().zip(placement) {
            for scope_condition in scope_conditions {
                if let Some(type_name) = &scope_condition.type_name
                    && !level.matches_type(type_name) {
                    types_match = false;
                }
                if let Some(conditions) = &scope_condition.conditions {
                    record_conditions.extend(conditions.iter().cloned());
                }
            }
        }

        let record_conditions = match InclusionConditions::all_of(record_conditions) {
            InclusionEvaluation::Skipped => return Applicability::Contradiction,
            evaluation => evaluation.into_conditions(),
        };
        if InclusionConditions::and(
            record_conditions.as_ref(),
            target_conditions,
        ).is_skipped() {
            return Applicability::Contradiction;
        }

        if !types_match {
            return Applicability::TypeMismatch;
        }
        Applicability::Applies {
            extra: record_conditions.and_then(|conditions| conditions.minus(target_conditions)),
        }
    }
}

/// How the selection sets of one definition map onto the entity levels of the
/// definition they are being registered into.
#[derive(Clone, Debug)]
struct PlacementContext {
    entity_prefix: Vec<String>,
    join_level: Vec<ScopeCondition>,
    outer_levels: Placement,
}
impl PlacementContext {
    fn place(&self, type_info: &TypeInfo) -> (Vec<String>, Placement) {
        let mut entity_path = self.entity_prefix.clone();
        entity_path.extend(type_info.entity_path().iter().cloned());

        let mut placement = self.outer_levels.clone();
        for (idx, level) in type_info.levels().enumerate() {
            if idx == 0 {
                let mut joined = self.join_level.clone();
                joined.extend(level.scope_path().iter().skip(1).cloned());
                placement.push(joined);
            } else {
                placement.push(level.scope_path().to_vec());
            }
        }

        (entity_path, placement)
    }
}

/// Resolves [SelectionSetRef]s while a definition is still being built: its
/// own nodes are not yet part of [Definitions].
#[derive(Clone, Copy)]
pub(crate) struct NodeLookup<'n> {
    pub(crate) current: DefinitionId,
    pub(crate) current_nodes: &'n [SelectionSetNode],
    pub(crate) definitions: &'n Definitions,
}
impl<'n> NodeLookup<'n> {
    fn get(&self, node_ref: SelectionSetRef) -> &'n SelectionSetNode {
        if node_ref.definition == self.current {
            &self.current_nodes[node_ref.node]
        } else {
            self.definitions.node(node_ref)
        }
    }
}

/// Registers every selection set reachable from a definition's root
/// (including those of spread fragments, transitively) into the entity
/// selection trees of that definition.
pub(crate) struct EntityTreeRegistrar<'a, 'n> {
    definition: &'a DefinitionName,
    lookup: NodeLookup<'n>,
    trees: IndexMap<Vec<String>, EntitySelectionTree>,
}
impl<'a, 'n> EntityTreeRegistrar<'a, 'n> {
    pub(crate) fn new(definition: &'a DefinitionName, lookup: NodeLookup<'n>) -> Self {
        Self {
            definition,
            lookup,
            trees: IndexMap::new(),
        }
    }

    pub(crate) fn register_definition(
        mut self,
        root: SelectionSetRef,
    ) -> IndexMap<Vec<String>, EntitySelectionTree> {
        let root_node = self.lookup.get(root);
        let context = PlacementContext {
            entity_prefix: vec![],
            join_level: root_node.type_info.scope().scope_path()[..1].to_vec(),
            outer_levels: vec![],
        };
        self.register(root, &context, RecordKind::EntityRoot, None);
        self.trees
    }

    fn register(
        &mut self,
        selection_set: SelectionSetRef,
        context: &PlacementContext,
        kind: RecordKind,
        parent: Option<usize>,
    ) {
        let node = self.lookup.get(selection_set);
        let (entity_path, placement) = context.place(&node.type_info);

        let fragment = match node.type_info.definition() {
            DefinitionName::Fragment(name) if node.type_info.definition() != self.definition
                => Some(name.as_str()),
            _ => None,
        };
        let tree = self.trees.entry(entity_path.clone()).or_default();
        let record_idx = tree.records.len();
        tree.records.push(EntityRecord {
            kind,
            parent,
            placement: placement.clone(),
            selection_set,
            source: MergedSource::new(node.type_info.clone(), fragment),
        });
        log::trace!(
            "Registered {kind:?} `{}` into entity `{}`.",
            node.type_info,
            entity_path.join("."),
        );

        for inline_fragment in node.direct.inline_fragments.values() {
            self.register(
                inline_fragment.selection_set,
                context,
                RecordKind::InlineBranch,
                Some(record_idx),
            );
        }

        for spread in node.direct.named_fragments.values() {
            let (spread_level, outer_levels) = match placement.split_last() {
                Some((last, outer)) => (last.clone(), outer.to_vec()),
                None => continue,
            };
            let conjunctions: Vec<Option<InclusionConditions>> =
                match &spread.inclusion_conditions {
                    Some(any_of) => any_of.branches().iter().cloned().map(Some).collect(),
                    None => vec![None],
                };
            for conditions in conjunctions {
                let mut join_level = spread_level.clone();
                join_level.push(ScopeCondition::new(
                    Some(spread.fragment_type.as_str()),
                    conditions,
                ));
                let spread_context = PlacementContext {
                    entity_prefix: entity_path.clone(),
                    join_level,
                    outer_levels: outer_levels.clone(),
                };
                self.register(
                    spread.fragment_root,
                    &spread_context,
                    RecordKind::FragmentRoot,
                    Some(record_idx),
                );
            }
        }

        for field in node.direct.fields.values() {
            if let Some(child) = field.selection_set {
                self.register(child, context, RecordKind::EntityRoot, None);
            }
        }
    }
}
