use crate::ir::merge;
use crate::ir::DirectSelections;
use crate::ir::InclusionConditions;
use crate::ir::MergeConfig;
use crate::ir::MergedSelections;
use crate::ir::ScopeCondition;
use crate::ir::TypeInfo;
use crate::operation::Definition;
use crate::operation::DefinitionId;
use crate::operation::Definitions;
use crate::operation::SelectionSetNode;
use crate::schema::Schema;
use std::collections::HashSet;
use std::hash::Hash;
use std::hash::Hasher;

/// Identifies one selection set of a compiled document: the definition that
/// owns it and its index in that definition's arena.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SelectionSetRef {
    pub(crate) definition: DefinitionId,
    pub(crate) node: usize,
}

/// Everything a merged-selections computation reads.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MergeContext<'a> {
    pub(crate) config: MergeConfig,
    pub(crate) definitions: &'a Definitions,
    pub(crate) schema: &'a Schema,
}

/// A selection set of a [CompiledDocument](crate::operation::CompiledDocument):
/// the scope it was written in ([TypeInfo]), the selections written there
/// and, computed on first use, the selections merged in from other scopes of
/// the same entity.
///
/// This is a cheap, copyable view. Two views are equal when their type info
/// and their direct and merged selections are equal, all the way down through
/// nested selection sets, regardless of which document or arena slot they
/// point at.
#[derive(Clone, Copy)]
pub struct SelectionSet<'a> {
    ctx: MergeContext<'a>,
    node_ref: SelectionSetRef,
}
impl<'a> SelectionSet<'a> {
    pub(crate) fn new(ctx: MergeContext<'a>, node_ref: SelectionSetRef) -> Self {
        Self {
            ctx,
            node_ref,
        }
    }

    /// The definition (operation or fragment) this selection set was written
    /// in.
    pub fn definition(&self) -> &'a Definition {
        self.ctx.definitions.get(self.node_ref.definition)
    }

    /// The selection set of the field with `response_key`, whether selected
    /// directly here or merged in.
    pub fn field_selection_set(&self, response_key: &str) -> Option<SelectionSet<'a>> {
        let selections = self.selections();
        let field_ref = match selections.direct().field(response_key) {
            Some(field) => field.selection_set_ref(),
            None => selections.merged().field(response_key)?.field().selection_set_ref(),
        };
        field_ref.map(|node_ref| self.resolve(node_ref))
    }

    /// The root selection set of the fragment spread here (directly or
    /// merged in) as `...fragment_name`.
    pub fn fragment_root(&self, fragment_name: &str) -> Option<SelectionSet<'a>> {
        let selections = self.selections();
        let root_ref = match selections.direct().named_fragments().get(fragment_name) {
            Some(spread) => spread.fragment_root_ref(),
            None => selections.merged()
                .named_fragments()
                .get(fragment_name)?
                .fragment_spread()
                .fragment_root_ref(),
        };
        Some(self.resolve(root_ref))
    }

    /// The inclusion conditions of this selection set's own scope.
    pub fn inclusion_conditions(&self) -> Option<&'a InclusionConditions> {
        self.node().type_info.inclusion_conditions()
    }

    /// The inline branch keyed by `scope_condition`, whether declared here or
    /// merged in.
    pub fn inline_fragment(&self, scope_condition: &ScopeCondition) -> Option<SelectionSet<'a>> {
        let selections = self.selections();
        let branch_ref = match selections.direct().inline_fragments().get(scope_condition) {
            Some(inline_fragment) => inline_fragment.selection_set_ref(),
            None => selections.merged()
                .inline_fragments()
                .get(scope_condition)?
                .inline_fragment()
                .selection_set_ref(),
        };
        Some(self.resolve(branch_ref))
    }

    /// Shorthand for the inline branch `... on type_name` without inclusion
    /// conditions.
    pub fn inline_fragment_on(&self, type_name: &str) -> Option<SelectionSet<'a>> {
        self.inline_fragment(&ScopeCondition::of_type(type_name))
    }

    pub fn parent_type(&self) -> &'a str {
        self.node().type_info.parent_type()
    }

    /// Another selection set of the same compiled document.
    pub fn resolve(&self, node_ref: SelectionSetRef) -> SelectionSet<'a> {
        Self::new(self.ctx, node_ref)
    }

    pub fn selection_set_ref(&self) -> SelectionSetRef {
        self.node_ref
    }

    pub fn selections(&self) -> Selections<'a> {
        Selections {
            selection_set: *self,
        }
    }

    pub fn type_info(&self) -> &'a TypeInfo {
        &self.node().type_info
    }

    /// Structural equality of `self` and `other` and, recursively, of every
    /// selection set nested in their direct and merged selections. Pairs in
    /// `visited` are assumed equal, which ends the walk where merged sibling
    /// branches point back at each other.
    fn structurally_eq(
        &self,
        other: &Self,
        visited: &mut HashSet<(SelectionSetRef, SelectionSetRef)>,
    ) -> bool {
        if !visited.insert((self.node_ref, other.node_ref)) {
            return true;
        }

        let (lhs, rhs) = (self.selections(), other.selections());
        if self.type_info() != other.type_info()
            || lhs.direct() != rhs.direct()
            || lhs.merged() != rhs.merged() {
            return false;
        }

        let lhs_nested = lhs.nested_selection_set_refs();
        let rhs_nested = rhs.nested_selection_set_refs();
        lhs_nested.len() == rhs_nested.len()
            && lhs_nested.into_iter().zip(rhs_nested).all(|pair| match pair {
                (Some(lhs_ref), Some(rhs_ref)) =>
                    self.resolve(lhs_ref).structurally_eq(&other.resolve(rhs_ref), visited),
                (None, None) => true,
                _ => false,
            })
    }

    fn node(&self) -> &'a SelectionSetNode {
        self.ctx.definitions.node(self.node_ref)
    }
}
impl PartialEq for SelectionSet<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other, &mut HashSet::new())
    }
}
impl Eq for SelectionSet<'_> {}
// Only the shallow shape is hashed; views that are equal always have it in
// common.
impl Hash for SelectionSet<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_info().hash(state);

        let selections = self.selections();
        let (direct, merged) = (selections.direct(), selections.merged());
        direct.fields().keys().for_each(|key| key.hash(state));
        direct.inline_fragments().keys().for_each(|key| key.hash(state));
        direct.named_fragments().keys().for_each(|key| key.hash(state));
        merged.fields().keys().for_each(|key| key.hash(state));
        merged.inline_fragments().keys().for_each(|key| key.hash(state));
        merged.named_fragments().keys().for_each(|key| key.hash(state));
    }
}
impl std::fmt::Debug for SelectionSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSet")
            .field("type_info", &format_args!("{}", self.type_info()))
            .field("direct", self.selections().direct())
            .finish_non_exhaustive()
    }
}

/// The selections of a [SelectionSet].
#[derive(Clone, Copy, Debug)]
pub struct Selections<'a> {
    selection_set: SelectionSet<'a>,
}
impl<'a> Selections<'a> {
    pub fn direct(&self) -> &'a DirectSelections {
        &self.selection_set.node().direct
    }

    /// The selection sets one level down, direct ones first, in selection
    /// order. `None` stands for a leaf field.
    fn nested_selection_set_refs(&self) -> Vec<Option<SelectionSetRef>> {
        let (direct, merged) = (self.direct(), self.merged());
        direct.fields().values().map(|field| field.selection_set_ref())
            .chain(direct.inline_fragments().values().map(|branch| Some(branch.selection_set_ref())))
            .chain(direct.named_fragments().values().map(|spread| Some(spread.fragment_root_ref())))
            .chain(merged.fields().values().map(|entry| entry.field().selection_set_ref()))
            .chain(merged.inline_fragments().values().map(|entry| {
                Some(entry.inline_fragment().selection_set_ref())
            }))
            .chain(merged.named_fragments().values().map(|entry| {
                Some(entry.fragment_spread().fragment_root_ref())
            }))
            .collect()
    }

    /// Computed on first access and memoized; safe to call concurrently.
    pub fn merged(&self) -> &'a MergedSelections {
        let selection_set = self.selection_set;
        selection_set.node().merged.get_or_init(|| {
            log::trace!("Computing merged selections for `{}`.", selection_set.type_info());
            merge::compute_merged_selections(selection_set.ctx, selection_set.node_ref)
        })
    }
}
