use crate::ast;
use crate::ir::inclusion_condition::DirectiveCondition;
use crate::ir::inclusion_condition::InvalidConditionArgument;
use crate::ir::InclusionCondition;

/// The result of combining inclusion conditions.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum InclusionEvaluation<T = InclusionConditions> {
    /// Always included: no conditions remain.
    Included,

    /// Never included: the conditions contradict each other.
    Skipped,

    Conditional(T),
}
impl<T> InclusionEvaluation<T> {
    /// The remaining conditions. `None` for both [Self::Included] and
    /// [Self::Skipped].
    pub fn conditions(&self) -> Option<&T> {
        if let Self::Conditional(conditions) = self {
            Some(conditions)
        } else {
            None
        }
    }

    pub fn into_conditions(self) -> Option<T> {
        if let Self::Conditional(conditions) = self {
            Some(conditions)
        } else {
            None
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// A non-empty conjunction of [InclusionCondition]s in canonical form:
/// sorted, without duplicates and without a variable alongside its own
/// inverse.
///
/// The absence of conditions is represented as `Option::<InclusionConditions>::None`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct InclusionConditions(Vec<InclusionCondition>);
impl InclusionConditions {
    /// Combines `conditions` with AND.
    pub fn all_of(
        conditions: impl IntoIterator<Item = InclusionCondition>,
    ) -> InclusionEvaluation {
        let mut conditions: Vec<_> = conditions.into_iter().collect();
        conditions.sort();
        conditions.dedup();

        if conditions.windows(2).any(|pair| pair[0].is_inverse_of(&pair[1])) {
            return InclusionEvaluation::Skipped;
        }

        if conditions.is_empty() {
            InclusionEvaluation::Included
        } else {
            InclusionEvaluation::Conditional(Self(conditions))
        }
    }

    /// Combines two optional conjunctions with AND.
    pub fn and(
        lhs: Option<&InclusionConditions>,
        rhs: Option<&InclusionConditions>,
    ) -> InclusionEvaluation {
        Self::all_of(
            lhs.into_iter()
                .chain(rhs)
                .flat_map(|conditions| conditions.iter().cloned()),
        )
    }

    pub fn as_slice(&self) -> &[InclusionCondition] {
        self.0.as_slice()
    }

    pub fn contains(&self, condition: &InclusionCondition) -> bool {
        self.0.binary_search(condition).is_ok()
    }

    /// Lowers the `@include`/`@skip` directives of a selection into one
    /// conjunction. Other directives are ignored.
    pub(crate) fn from_directives(
        directives: &[ast::query::Directive],
    ) -> Result<InclusionEvaluation, InvalidConditionArgument> {
        let mut conditions = vec![];
        for directive in directives {
            match DirectiveCondition::from_ast(directive)? {
                Some(DirectiveCondition::Never) =>
                    return Ok(InclusionEvaluation::Skipped),
                Some(DirectiveCondition::Variable(condition)) =>
                    conditions.push(condition),
                Some(DirectiveCondition::Always) | None => (),
            }
        }
        Ok(Self::all_of(conditions))
    }

    /// Indicates if every condition in `other` is also in `self`, i.e. `self`
    /// being true guarantees `other` is true.
    pub fn implies(&self, other: &InclusionConditions) -> bool {
        other.iter().all(|condition| self.contains(condition))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InclusionCondition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The conditions of `self` that `scope` does not already guarantee.
    pub fn minus(
        &self,
        scope: Option<&InclusionConditions>,
    ) -> Option<InclusionConditions> {
        let remaining: Vec<_> = self.iter()
            .filter(|condition| !scope.is_some_and(|scope| scope.contains(condition)))
            .cloned()
            .collect();

        if remaining.is_empty() {
            None
        } else {
            Some(Self(remaining))
        }
    }

    pub fn single(condition: InclusionCondition) -> Self {
        Self(vec![condition])
    }

    /// Removes one condition. `None` if nothing is left.
    pub(crate) fn without(
        &self,
        condition: &InclusionCondition,
    ) -> Option<InclusionConditions> {
        let remaining: Vec<_> = self.iter()
            .filter(|c| *c != condition)
            .cloned()
            .collect();

        if remaining.is_empty() {
            None
        } else {
            Some(Self(remaining))
        }
    }
}
impl std::fmt::Display for InclusionConditions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, condition) in self.iter().enumerate() {
            if idx > 0 {
                write!(f, " && ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}
impl<'a> IntoIterator for &'a InclusionConditions {
    type Item = &'a InclusionCondition;
    type IntoIter = std::slice::Iter<'a, InclusionCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
