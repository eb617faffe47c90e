use crate::ir::IrDiagnostic;
use crate::ir::MergeConfig;
use crate::ir::MergeContext;
use crate::ir::SelectionSet;
use crate::ir::SelectionSetRef;
use crate::operation::Definition;
use crate::operation::DefinitionName;
use crate::operation::Definitions;
use crate::schema::Schema;
use indexmap::IndexSet;

/// The IR of a set of executable documents, built by
/// [IrBuilder](crate::operation::IrBuilder).
///
/// Every selection set of every definition is reachable as a
/// [SelectionSet] view. Merged selections are computed lazily, at most once
/// per selection set, and may be computed from several threads at once.
#[derive(Debug)]
pub struct CompiledDocument<'schema> {
    pub(crate) config: MergeConfig,
    pub(crate) definitions: Definitions,
    pub(crate) diagnostics: Vec<IrDiagnostic>,
    pub(crate) schema: &'schema Schema,
}
impl<'schema> CompiledDocument<'schema> {
    /// Every diagnostic of the document: those found while building it plus
    /// the merge conflicts of every selection set's merged selections, each
    /// reported once.
    ///
    /// Computes the merged selections of every selection set.
    pub fn collect_merge_diagnostics(&self) -> Vec<IrDiagnostic> {
        let mut diagnostics: IndexSet<IrDiagnosticKey> = IndexSet::new();
        let mut result = vec![];
        let all_diagnostics = self.diagnostics.iter().cloned().chain(
            self.definitions.iter()
                .flat_map(|definition| definition.selection_set_refs())
                .flat_map(|node_ref| {
                    self.selection_set(node_ref)
                        .selections()
                        .merged()
                        .conflicts()
                        .iter()
                        .cloned()
                        .map(IrDiagnostic::MergeConflict)
                })
        );
        for diagnostic in all_diagnostics {
            if diagnostics.insert(IrDiagnosticKey::of(&diagnostic)) {
                result.push(diagnostic);
            }
        }
        result
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Diagnostics found while building the document. See also
    /// [Self::collect_merge_diagnostics].
    pub fn diagnostics(&self) -> &[IrDiagnostic] {
        self.diagnostics.as_slice()
    }

    /// The root selection set of the fragment named `fragment_name`.
    pub fn fragment(&self, fragment_name: &str) -> Option<SelectionSet<'_>> {
        self.fragment_definition(fragment_name)
            .map(|definition| self.selection_set(definition.root_ref()))
    }

    pub fn fragment_definition(&self, fragment_name: &str) -> Option<&Definition> {
        self.definitions.fragment(fragment_name)
    }

    /// The root selection set of the operation named `operation_name`
    /// (`None` for the anonymous operation).
    pub fn operation(&self, operation_name: Option<&str>) -> Option<SelectionSet<'_>> {
        self.definitions.iter()
            .find(|definition| matches!(
                definition.name(),
                DefinitionName::Operation { name, .. } if name.as_deref() == operation_name,
            ))
            .map(|definition| self.selection_set(definition.root_ref()))
    }

    /// The root selection sets of every operation, in document order.
    pub fn operations(&self) -> impl Iterator<Item = SelectionSet<'_>> {
        self.definitions.iter()
            .filter(|definition| !definition.is_fragment())
            .map(|definition| self.selection_set(definition.root_ref()))
    }

    pub fn schema(&self) -> &'schema Schema {
        self.schema
    }

    pub fn selection_set(&self, node_ref: SelectionSetRef) -> SelectionSet<'_> {
        SelectionSet::new(self.merge_context(), node_ref)
    }

    /// Every selection set of `definition`, nested ones first.
    pub fn selection_sets<'a>(
        &'a self,
        definition: &'a Definition,
    ) -> impl Iterator<Item = SelectionSet<'a>> {
        definition.selection_set_refs().map(|node_ref| self.selection_set(node_ref))
    }

    fn merge_context(&self) -> MergeContext<'_> {
        MergeContext {
            config: self.config,
            definitions: &self.definitions,
            schema: self.schema,
        }
    }
}

/// Identifies a diagnostic by what it reports, so that one conflict seen
/// from several selection sets of an entity is reported once.
#[derive(Eq, Hash, PartialEq)]
enum IrDiagnosticKey {
    FragmentCycle(Vec<String>),
    MergeConflict {
        response_key: String,
        locations: [String; 2],
    },
}
impl IrDiagnosticKey {
    fn of(diagnostic: &IrDiagnostic) -> Self {
        match diagnostic {
            IrDiagnostic::FragmentCycle { cycle_path } =>
                Self::FragmentCycle(cycle_path.clone()),
            IrDiagnostic::MergeConflict(conflict) => {
                let mut locations = [
                    conflict.first.location.to_string(),
                    conflict.second.location.to_string(),
                ];
                locations.sort();
                Self::MergeConflict {
                    response_key: conflict.response_key.clone(),
                    locations,
                }
            },
        }
    }
}
