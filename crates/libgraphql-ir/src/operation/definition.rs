use crate::ir::EntitySelectionTree;
use crate::ir::MergedSelections;
use crate::ir::DirectSelections;
use crate::ir::SelectionSetRef;
use crate::ir::TypeInfo;
use crate::loc;
use crate::named_ref::DerefByName;
use crate::named_ref::DerefByNameError;
use crate::named_ref::NamedRef;
use crate::operation::OperationKind;
use indexmap::IndexMap;
use std::sync::OnceLock;

pub type NamedFragmentRef = NamedRef<Definitions, loc::SourceLocation, Definition>;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct DefinitionId(pub(crate) usize);

/// The name of an operation or fragment definition.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum DefinitionName {
    Fragment(String),
    Operation {
        kind: OperationKind,
        name: Option<String>,
    },
}
impl DefinitionName {
    pub fn fragment_name(&self) -> Option<&str> {
        if let Self::Fragment(name) = self {
            Some(name.as_str())
        } else {
            None
        }
    }
}
impl std::fmt::Display for DefinitionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fragment(name) => write!(f, "fragment {name}"),
            Self::Operation { kind, name: Some(name) } => write!(f, "{kind} {name}"),
            Self::Operation { kind, name: None } => write!(f, "{kind} <anonymous>"),
        }
    }
}

/// One selection set of a definition's arena.
#[derive(Debug)]
pub(crate) struct SelectionSetNode {
    pub(crate) direct: DirectSelections,
    pub(crate) merged: OnceLock<MergedSelections>,
    pub(crate) type_info: TypeInfo,
}

/// A compiled operation or fragment definition. Owns every selection set
/// written in it and one [EntitySelectionTree] per entity it selects on.
#[derive(Debug)]
pub struct Definition {
    pub(crate) def_location: loc::SourceLocation,
    pub(crate) entities: IndexMap<Vec<String>, EntitySelectionTree>,
    pub(crate) id: DefinitionId,
    pub(crate) name: DefinitionName,
    pub(crate) nodes: Vec<SelectionSetNode>,
    pub(crate) root: usize,
    pub(crate) type_condition: String,
}
impl Definition {
    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    /// Entity selection trees keyed by the response path of their entity.
    pub fn entity_trees(&self) -> &IndexMap<Vec<String>, EntitySelectionTree> {
        &self.entities
    }

    pub fn id(&self) -> DefinitionId {
        self.id
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.name, DefinitionName::Fragment(_))
    }

    pub fn name(&self) -> &DefinitionName {
        &self.name
    }

    pub(crate) fn node(&self, idx: usize) -> &SelectionSetNode {
        &self.nodes[idx]
    }

    pub fn root_ref(&self) -> SelectionSetRef {
        SelectionSetRef {
            definition: self.id,
            node: self.root,
        }
    }

    /// Every selection set of this definition, in the order they were
    /// built (nested selection sets before the ones containing them).
    pub fn selection_set_refs(&self) -> impl Iterator<Item = SelectionSetRef> + '_ {
        (0..self.nodes.len()).map(|node| SelectionSetRef {
            definition: self.id,
            node,
        })
    }

    /// The fragment's type condition, or the root operation type.
    pub fn type_condition(&self) -> &str {
        self.type_condition.as_str()
    }
}
impl DerefByName for Definition {
    type Source = Definitions;
    type RefLocation = loc::SourceLocation;

    fn deref_name<'a>(
        definitions: &'a Self::Source,
        name: &str,
    ) -> Result<&'a Definition, DerefByNameError> {
        definitions.fragment(name).ok_or_else(
            || DerefByNameError::DanglingReference(name.to_string())
        )
    }
}

/// The definitions of a compiled document.
#[derive(Debug, Default)]
pub struct Definitions {
    pub(crate) definitions: Vec<Definition>,
    pub(crate) fragment_ids: IndexMap<String, DefinitionId>,
}
impl Definitions {
    pub fn fragment(&self, fragment_name: &str) -> Option<&Definition> {
        self.fragment_ids.get(fragment_name).map(|id| self.get(*id))
    }

    pub fn get(&self, id: DefinitionId) -> &Definition {
        &self.definitions[id.0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub(crate) fn next_id(&self) -> DefinitionId {
        DefinitionId(self.definitions.len())
    }

    pub(crate) fn node(&self, node_ref: SelectionSetRef) -> &SelectionSetNode {
        self.get(node_ref.definition).node(node_ref.node)
    }

    pub(crate) fn push(&mut self, definition: Definition) {
        if let DefinitionName::Fragment(name) = &definition.name {
            self.fragment_ids.insert(name.clone(), definition.id);
        }
        self.definitions.push(definition);
    }
}
