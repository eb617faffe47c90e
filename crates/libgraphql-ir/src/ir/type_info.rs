use crate::ir::InclusionConditions;
use crate::ir::ScopeCondition;
use crate::ir::ScopeDescriptor;
use crate::operation::DefinitionName;
use crate::schema::Schema;

/// Where a selection set sits: the definition it was written in, the entity
/// (response path) it selects on, and one [ScopeDescriptor] per entity level
/// from the definition root down to the selection set's own scope.
///
/// Immutable once the selection set is built.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TypeInfo {
    definition: DefinitionName,
    entity_path: Vec<String>,
    outer_scopes: Vec<ScopeDescriptor>,
    scope: ScopeDescriptor,
}
impl TypeInfo {
    pub(crate) fn definition_root(
        schema: &Schema,
        definition: DefinitionName,
        root_type_name: &str,
    ) -> Self {
        Self {
            definition,
            entity_path: vec![],
            outer_scopes: vec![],
            scope: ScopeDescriptor::root(schema, root_type_name, None),
        }
    }

    /// The type info of the selection set of a field selected in this scope.
    pub(crate) fn entering_field(
        &self,
        schema: &Schema,
        response_key: &str,
        field_type_name: &str,
        field_conditions: Option<InclusionConditions>,
    ) -> Self {
        let mut entity_path = self.entity_path.clone();
        entity_path.push(response_key.to_string());

        let mut outer_scopes = self.outer_scopes.clone();
        outer_scopes.push(self.scope.clone());

        Self {
            definition: self.definition.clone(),
            entity_path,
            outer_scopes,
            scope: ScopeDescriptor::root(schema, field_type_name, field_conditions),
        }
    }

    /// The type info of an inline branch of this scope. `None` if the branch
    /// can never apply.
    pub(crate) fn entering_branch(
        &self,
        schema: &Schema,
        scope_condition: ScopeCondition,
    ) -> Option<Self> {
        if InclusionConditions::and(
            self.cumulative_conditions().as_ref(),
            scope_condition.conditions.as_ref(),
        ).is_skipped() {
            return None;
        }

        Some(Self {
            definition: self.definition.clone(),
            entity_path: self.entity_path.clone(),
            outer_scopes: self.outer_scopes.clone(),
            scope: self.scope.appending(schema, scope_condition)?,
        })
    }

    /// The conjunction of every inclusion condition on the path from the
    /// definition root to this scope.
    pub fn cumulative_conditions(&self) -> Option<InclusionConditions> {
        InclusionConditions::all_of(
            self.levels()
                .filter_map(|level| level.matching_conditions())
                .flat_map(|conditions| conditions.iter().cloned()),
        ).into_conditions()
    }

    pub fn definition(&self) -> &DefinitionName {
        &self.definition
    }

    /// The response keys leading from the definition root to this entity.
    pub fn entity_path(&self) -> &[String] {
        self.entity_path.as_slice()
    }

    /// The inclusion conditions of this scope's own [ScopeCondition].
    pub fn inclusion_conditions(&self) -> Option<&InclusionConditions> {
        self.scope.current_scope().conditions.as_ref()
    }

    /// One [ScopeDescriptor] per entity level, outermost first.
    pub fn levels(&self) -> impl Iterator<Item = &ScopeDescriptor> {
        self.outer_scopes.iter().chain(std::iter::once(&self.scope))
    }

    pub fn parent_type(&self) -> &str {
        self.scope.parent_type()
    }

    pub fn scope(&self) -> &ScopeDescriptor {
        &self.scope
    }
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.definition)?;
        for (idx, level) in self.levels().enumerate() {
            if idx == 0 {
                write!(f, " [{level}]")?;
            } else {
                write!(f, " › {} [{level}]", self.entity_path[idx - 1])?;
            }
        }
        Ok(())
    }
}
