use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;
use crate::ir::ScopeCondition;
use crate::schema::Schema;
use indexmap::IndexSet;

/// The scope of a selection set within one entity: the chain of
/// [ScopeCondition]s from the entity's root scope to the selection set,
/// together with what that chain implies.
///
/// Two descriptors are equal when their chains are equal; the derived
/// matching types and conditions follow from the chain.
#[derive(Clone, Debug)]
pub struct ScopeDescriptor {
    matching_conditions: Option<InclusionConditions>,
    matching_types: IndexSet<String>,
    parent_type: String,
    scope_path: Vec<ScopeCondition>,
}
impl ScopeDescriptor {
    /// The root scope of an entity whose selections are made on `type_name`.
    pub(crate) fn root(
        schema: &Schema,
        type_name: &str,
        conditions: Option<InclusionConditions>,
    ) -> Self {
        Self {
            matching_conditions: conditions.clone(),
            matching_types: schema.matching_types(type_name),
            parent_type: type_name.to_string(),
            scope_path: vec![ScopeCondition::new(Some(type_name), conditions)],
        }
    }

    /// The scope nested under `self` by `scope_condition`. `None` if the
    /// combined conditions contradict each other.
    pub(crate) fn appending(
        &self,
        schema: &Schema,
        scope_condition: ScopeCondition,
    ) -> Option<Self> {
        let matching_conditions = InclusionConditions::and(
            self.matching_conditions.as_ref(),
            scope_condition.conditions.as_ref(),
        );
        let matching_conditions = match matching_conditions {
            InclusionEvaluation::Skipped => return None,
            other => other.into_conditions(),
        };

        let mut matching_types = self.matching_types.clone();
        let parent_type = match &scope_condition.type_name {
            Some(type_name) => {
                matching_types.extend(schema.matching_types(type_name));
                type_name.clone()
            },
            None => self.parent_type.clone(),
        };

        let mut scope_path = self.scope_path.clone();
        scope_path.push(scope_condition);

        Some(Self {
            matching_conditions,
            matching_types,
            parent_type,
            scope_path,
        })
    }

    /// The scope whose chain is `scope_path`, which must start with a typed
    /// root condition.
    pub(crate) fn from_scope_path(
        schema: &Schema,
        scope_path: &[ScopeCondition],
    ) -> Option<Self> {
        let (root, rest) = scope_path.split_first()?;
        let root_type = root.type_name.as_deref()?;
        let mut descriptor = Self::root(schema, root_type, root.conditions.clone());
        for scope_condition in rest {
            descriptor = descriptor.appending(schema, scope_condition.clone())?;
        }
        Some(descriptor)
    }

    /// The innermost [ScopeCondition] of the chain.
    pub fn current_scope(&self) -> &ScopeCondition {
        // The chain always starts with the root condition.
        &self.scope_path[self.scope_path.len() - 1]
    }

    /// Every inclusion condition anywhere in the chain.
    pub fn matching_conditions(&self) -> Option<&InclusionConditions> {
        self.matching_conditions.as_ref()
    }

    /// Every type the chain's type conditions are satisfied by: each type in
    /// the chain, the interfaces it implements and the unions it belongs to.
    pub fn matching_types(&self) -> &IndexSet<String> {
        &self.matching_types
    }

    pub fn matches_type(&self, type_name: &str) -> bool {
        self.matching_types.contains(type_name)
    }

    /// The most specific type in the chain.
    pub fn parent_type(&self) -> &str {
        self.parent_type.as_str()
    }

    pub fn scope_path(&self) -> &[ScopeCondition] {
        self.scope_path.as_slice()
    }
}
impl PartialEq for ScopeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.scope_path == other.scope_path
    }
}
impl Eq for ScopeDescriptor {}
impl std::hash::Hash for ScopeDescriptor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.scope_path.hash(state);
    }
}
impl std::fmt::Display for ScopeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, scope_condition) in self.scope_path.iter().enumerate() {
            if idx > 0 {
                write!(f, " › ")?;
            }
            write!(f, "{scope_condition}")?;
        }
        Ok(())
    }
}
