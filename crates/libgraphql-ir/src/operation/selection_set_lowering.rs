use crate::ast;
use crate::ir::AnyOf;
use crate::ir::ConflictKind;
use crate::ir::ConflictSite;
use crate::ir::DirectSelections;
use crate::ir::EntityTreeRegistrar;
use crate::ir::Field;
use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;
use crate::ir::InlineFragmentSpread;
use crate::ir::IrDiagnostic;
use crate::ir::MergeConflict;
use crate::ir::NamedFragmentSpread;
use crate::ir::NodeLookup;
use crate::ir::ScopeCondition;
use crate::ir::SelectionSetRef;
use crate::ir::TypeInfo;
use crate::loc;
use crate::operation::Definition;
use crate::operation::DefinitionId;
use crate::operation::DefinitionName;
use crate::operation::Definitions;
use crate::operation::IrBuildError;
use crate::operation::NamedFragmentRef;
use crate::operation::SelectionSetNode;
use crate::schema::Schema;
use crate::value::Value;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::path::Path;
use std::sync::OnceLock;

/// Selections that are lowered into the same selection set, along with the
/// inclusion conditions that apply to all of them.
struct SelectionGroup<'s> {
    conditions: Option<InclusionConditions>,
    items: &'s [ast::query::Selection],
}

#[derive(Default)]
struct CollectedSelections<'s> {
    fields: IndexMap<String, Vec<(&'s ast::query::Field, Option<InclusionConditions>)>>,
    inline_fragments: IndexMap<ScopeCondition, (graphql_parser::Pos, Vec<SelectionGroup<'s>>)>,
    named_fragments: IndexMap<String, (graphql_parser::Pos, Vec<Option<InclusionConditions>>)>,
}

/// Lowers the AST of one operation or fragment definition into its arena of
/// [SelectionSetNode]s and registers them into entity selection trees.
pub(crate) struct DefinitionLowering<'a> {
    definition_id: DefinitionId,
    definition_name: DefinitionName,
    definitions: &'a Definitions,
    diagnostics: Vec<IrDiagnostic>,
    errors: Vec<IrBuildError>,
    file_path: Option<&'a Path>,
    nodes: Vec<SelectionSetNode>,
    schema: &'a Schema,
    skipped_fragments: &'a IndexSet<String>,
}
impl<'a> DefinitionLowering<'a> {
    pub(crate) fn new(
        schema: &'a Schema,
        definitions: &'a Definitions,
        skipped_fragments: &'a IndexSet<String>,
        definition_name: DefinitionName,
        file_path: Option<&'a Path>,
    ) -> Self {
        Self {
            definition_id: definitions.next_id(),
            definition_name,
            definitions,
            diagnostics: vec![],
            errors: vec![],
            file_path,
            nodes: vec![],
            schema,
            skipped_fragments,
        }
    }

    /// Lowers `selection_set` as the root of the definition, selected on
    /// `type_condition`, and returns the finished [Definition] together with
    /// any diagnostics found along the way.
    pub(crate) fn lower(
        mut self,
        type_condition: &str,
        selection_set: &ast::query::SelectionSet,
        def_position: graphql_parser::Pos,
    ) -> Result<(Definition, Vec<IrDiagnostic>), Vec<IrBuildError>> {
        log::debug!("Lowering `{}`.", self.definition_name);
        let type_info = TypeInfo::definition_root(
            self.schema,
            self.definition_name.clone(),
            type_condition,
        );
        let root = self.lower_selection_set(type_info, vec![SelectionGroup {
            conditions: None,
            items: &selection_set.items,
        }]);

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let root_ref = SelectionSetRef {
            definition: self.definition_id,
            node: root,
        };
        let entities = EntityTreeRegistrar::new(
            &self.definition_name,
            NodeLookup {
                current: self.definition_id,
                current_nodes: &self.nodes,
                definitions: self.definitions,
            },
        ).register_definition(root_ref);

        let definition = Definition {
            def_location: self.location(def_position),
            entities,
            id: self.definition_id,
            name: self.definition_name,
            nodes: self.nodes,
            root,
            type_condition: type_condition.to_string(),
        };
        Ok((definition, self.diagnostics))
    }

    fn collect<'s>(
        &mut self,
        type_info: &TypeInfo,
        scope_conditions: Option<&InclusionConditions>,
        group: SelectionGroup<'s>,
        collected: &mut CollectedSelections<'s>,
    ) {
        for selection in group.items {
            let (directives, position) = match selection {
                ast::query::Selection::Field(field) =>
                    (&field.directives, field.position),
                ast::query::Selection::FragmentSpread(spread) =>
                    (&spread.directives, spread.position),
                ast::query::Selection::InlineFragment(inline) =>
                    (&inline.directives, inline.position),
            };

            let own_conditions = match InclusionConditions::from_directives(directives) {
                Ok(InclusionEvaluation::Skipped) => continue,
                Ok(evaluation) => evaluation.into_conditions(),
                Err(err) => {
                    self.errors.push(IrBuildError::InvalidConditionArgument {
                        directive_name: err.directive_name,
                        location: self.location(err.position),
                        value: err.value,
                    });
                    continue;
                },
            };
            let conditions = match InclusionConditions::and(
                group.conditions.as_ref(),
                own_conditions.as_ref(),
            ) {
                InclusionEvaluation::Skipped => continue,
                evaluation => evaluation.into_conditions(),
            };
            if InclusionConditions::and(conditions.as_ref(), scope_conditions).is_skipped() {
                log::trace!(
                    "Dropped a selection at {} in `{type_info}`: its inclusion \
                    conditions contradict the enclosing scope.",
                    self.location(position),
                );
                continue;
            }
            let conditions = conditions.and_then(|c| c.minus(scope_conditions));

            match selection {
                ast::query::Selection::Field(field) => {
                    let response_key = field.alias.as_ref().unwrap_or(&field.name);
                    collected.fields
                        .entry(response_key.clone())
                        .or_default()
                        .push((field, conditions));
                },

                ast::query::Selection::FragmentSpread(spread) => {
                    if self.skipped_fragments.contains(&spread.fragment_name) {
                        log::debug!(
                            "Dropped the spread of cyclic fragment `{}` in `{type_info}`.",
                            spread.fragment_name,
                        );
                        continue;
                    }
                    collected.named_fragments
                        .entry(spread.fragment_name.clone())
                        .or_insert_with(|| (spread.position, vec![]))
                        .1
                        .push(conditions);
                },

                ast::query::Selection::InlineFragment(inline) => {
                    let type_name = match &inline.type_condition {
                        Some(ast::query::TypeCondition::On(type_name)) => {
                            if !self.check_type_condition(type_name, inline.position) {
                                continue;
                            }
                            // A type condition every value of the enclosing
                            // type satisfies narrows nothing.
                            if self.schema.is_subtype(type_info.parent_type(), type_name) {
                                None
                            } else {
                                Some(type_name.as_str())
                            }
                        },
                        None => None,
                    };

                    if type_name.is_none() && conditions.is_none() {
                        self.collect(type_info, scope_conditions, SelectionGroup {
                            conditions: None,
                            items: &inline.selection_set.items,
                        }, collected);
                        continue;
                    }

                    collected.inline_fragments
                        .entry(ScopeCondition::new(type_name, conditions))
                        .or_insert_with(|| (inline.position, vec![]))
                        .1
                        .push(SelectionGroup {
                            conditions: None,
                            items: &inline.selection_set.items,
                        });
                },
            }
        }
    }

    fn check_type_condition(
        &mut self,
        type_name: &str,
        position: graphql_parser::Pos,
    ) -> bool {
        match self.schema.type_named(type_name) {
            Some(graphql_type) if graphql_type.is_composite() => true,
            Some(graphql_type) => {
                self.errors.push(IrBuildError::InvalidTypeCondition {
                    type_name: type_name.to_string(),
                    type_kind: graphql_type.kind(),
                    location: self.location(position),
                });
                false
            },
            None => {
                self.errors.push(IrBuildError::UndefinedTypeName {
                    type_name: type_name.to_string(),
                    location: self.location(position),
                });
                false
            },
        }
    }

    fn location(&self, position: graphql_parser::Pos) -> loc::SourceLocation {
        loc::SourceLocation::from_pos(self.file_path, position)
    }

    fn lower_field(
        &mut self,
        type_info: &TypeInfo,
        response_key: &str,
        occurrences: Vec<(&ast::query::Field, Option<InclusionConditions>)>,
    ) -> Option<Field> {
        let (first, _) = occurrences.first()?;
        let first = *first;
        let arguments: IndexMap<String, Value> = first.arguments.iter()
            .map(|(arg_name, arg_value)| (arg_name.clone(), Value::from_ast(arg_value)))
            .collect();

        // Later occurrences that select something else under the same
        // response key are reported and left out; the first one wins.
        let mut kept = vec![];
        for (field, conditions) in occurrences {
            let kind = if field.name != first.name {
                Some(ConflictKind::FieldName {
                    first_name: first.name.clone(),
                    second_name: field.name.clone(),
                })
            } else {
                let field_arguments: IndexMap<String, Value> = field.arguments.iter()
                    .map(|(arg_name, arg_value)| (arg_name.clone(), Value::from_ast(arg_value)))
                    .collect();
                (field_arguments != arguments).then_some(ConflictKind::Arguments)
            };

            match kind {
                Some(kind) => {
                    let conflict = MergeConflict {
                        response_key: response_key.to_string(),
                        kind,
                        first: ConflictSite {
                            type_info: type_info.clone(),
                            fragment: None,
                            location: self.location(first.position),
                        },
                        second: ConflictSite {
                            type_info: type_info.clone(),
                            fragment: None,
                            location: self.location(field.position),
                        },
                    };
                    log::debug!("{conflict}");
                    self.diagnostics.push(IrDiagnostic::MergeConflict(conflict));
                },
                None => kept.push((field, conditions)),
            }
        }

        let parent_type = type_info.parent_type();
        let Some(declared_type) = self.schema.field_type(parent_type, &first.name) else {
            self.errors.push(IrBuildError::UndefinedFieldName {
                type_name: parent_type.to_string(),
                field_name: first.name.clone(),
                location: self.location(first.position),
            });
            return None;
        };

        let inclusion_conditions = AnyOf::from_branches(
            kept.iter().map(|(_, conditions)| conditions.clone()),
        );
        let has_sub_selections = kept.iter()
            .any(|(field, _)| !field.selection_set.items.is_empty());

        let field_type_name = declared_type.innermost_type_name();
        let selection_set = if self.schema.is_composite(field_type_name) {
            if !has_sub_selections {
                self.errors.push(IrBuildError::MissingSelectionSet {
                    field_name: first.name.clone(),
                    field_type: declared_type.clone(),
                    location: self.location(first.position),
                });
                return None;
            }

            // With a single conjunction the child's own scope carries it;
            // otherwise each occurrence's selections carry their own.
            let root_conditions = inclusion_conditions.as_ref()
                .and_then(|any_of| any_of.single().cloned());
            let child_type_info = type_info.entering_field(
                self.schema,
                response_key,
                field_type_name,
                root_conditions,
            );
            let groups = kept.iter()
                .map(|(field, conditions)| SelectionGroup {
                    conditions: conditions.clone(),
                    items: &field.selection_set.items,
                })
                .collect();
            Some(SelectionSetRef {
                definition: self.definition_id,
                node: self.lower_selection_set(child_type_info, groups),
            })
        } else {
            if has_sub_selections {
                self.errors.push(IrBuildError::SelectionSetOnLeafField {
                    field_name: first.name.clone(),
                    field_type: declared_type.clone(),
                    location: self.location(first.position),
                });
                return None;
            }
            None
        };

        Some(Field {
            alias: first.alias.clone(),
            arguments,
            declared_type,
            def_location: self.location(first.position),
            inclusion_conditions,
            name: first.name.clone(),
            selection_set,
        })
    }

    /// Lowers `groups` into a new node of the arena and returns its index.
    /// Nested selection sets are lowered (and get their indices) first.
    fn lower_selection_set(
        &mut self,
        type_info: TypeInfo,
        groups: Vec<SelectionGroup<'_>>,
    ) -> usize {
        let scope_conditions = type_info.cumulative_conditions();
        let mut collected = CollectedSelections::default();
        for group in groups {
            self.collect(&type_info, scope_conditions.as_ref(), group, &mut collected);
        }

        let mut direct = DirectSelections::default();
        for (response_key, occurrences) in collected.fields {
            if let Some(field) = self.lower_field(&type_info, &response_key, occurrences) {
                direct.fields.insert(response_key, field);
            }
        }

        for (scope_condition, (position, groups)) in collected.inline_fragments {
            let Some(branch_type_info) = type_info.entering_branch(
                self.schema,
                scope_condition.clone(),
            ) else {
                log::trace!("Dropped contradictory branch `{scope_condition}` in `{type_info}`.");
                continue;
            };
            let node = self.lower_selection_set(branch_type_info, groups);
            direct.inline_fragments.insert(scope_condition.clone(), InlineFragmentSpread {
                def_location: self.location(position),
                scope_condition,
                selection_set: SelectionSetRef {
                    definition: self.definition_id,
                    node,
                },
            });
        }

        for (fragment_name, (position, conditions)) in collected.named_fragments {
            let Some(fragment) = self.definitions.fragment(&fragment_name) else {
                self.errors.push(IrBuildError::UndefinedFragment {
                    fragment_name,
                    location: self.location(position),
                });
                continue;
            };
            let location = self.location(position);
            direct.named_fragments.insert(fragment_name.clone(), NamedFragmentSpread {
                def_location: location.clone(),
                fragment: NamedFragmentRef::new(&fragment_name, location),
                fragment_root: fragment.root_ref(),
                fragment_type: fragment.type_condition().to_string(),
                inclusion_conditions: AnyOf::from_branches(conditions),
            });
        }

        self.nodes.push(SelectionSetNode {
            direct,
            merged: OnceLock::new(),
            type_info,
        });
        self.nodes.len() - 1
    }
}
