use crate::ast;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::path::PathBuf;

/// A fragment definition as written, along with the file it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentSource {
    pub(crate) ast: ast::query::FragmentDefinition,
    pub(crate) file_path: Option<PathBuf>,
}
impl FragmentSource {
    pub fn name(&self) -> &str {
        self.ast.name.as_str()
    }

    pub fn type_condition(&self) -> &str {
        let ast::query::TypeCondition::On(type_name) = &self.ast.type_condition;
        type_name.as_str()
    }
}

/// The validated set of fragment definitions of a document (or documents).
///
/// Built by [FragmentRegistryBuilder](crate::operation::FragmentRegistryBuilder).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentRegistry {
    pub(crate) build_order: Vec<String>,
    pub(crate) cycles: Vec<Vec<String>>,
    pub(crate) fragments: IndexMap<String, FragmentSource>,
}
impl FragmentRegistry {
    /// Fragments in an order where every fragment comes after all of the
    /// fragments it spreads. Fragments that are part of a cycle are left out.
    pub fn build_order(&self) -> impl Iterator<Item = &FragmentSource> {
        self.build_order.iter().filter_map(|name| self.fragments.get(name))
    }

    /// Every distinct spread cycle, each starting (and ending) with its
    /// lexicographically smallest fragment name.
    pub fn cycles(&self) -> &[Vec<String>] {
        self.cycles.as_slice()
    }

    /// Names of every fragment that takes part in some cycle.
    pub fn cyclic_fragment_names(&self) -> IndexSet<&str> {
        self.cycles.iter()
            .flat_map(|cycle| cycle.iter().map(|name| name.as_str()))
            .collect()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fragment(&self, name: &str) -> Option<&FragmentSource> {
        self.fragments.get(name)
    }

    pub fn fragments(&self) -> &IndexMap<String, FragmentSource> {
        &self.fragments
    }
}
