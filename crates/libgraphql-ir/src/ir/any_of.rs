use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;

/// A disjunction of [InclusionConditions] conjunctions, kept in Blake
/// canonical form:
///
/// * every consensus of two branches is covered by some branch
///   (`(A && $x) || (A && !$x)` becomes `A`),
/// * no branch implies another (`A || (A && B)` becomes `A`),
/// * branches are sorted and deduplicated.
///
/// A selection that is always included has no `AnyOf` at all
/// (`Option::<AnyOf>::None`).
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AnyOf(Vec<InclusionConditions>);
impl AnyOf {
    /// ANDs `conditions` into every branch of `any_of`. Branches that become
    /// contradictory are dropped; if none are left the result is
    /// [InclusionEvaluation::Skipped].
    pub fn and_all(
        any_of: Option<&AnyOf>,
        conditions: Option<&InclusionConditions>,
    ) -> InclusionEvaluation<AnyOf> {
        let Some(conditions) = conditions else {
            return match any_of {
                Some(any_of) => InclusionEvaluation::Conditional(any_of.clone()),
                None => InclusionEvaluation::Included,
            };
        };
        let Some(any_of) = any_of else {
            return InclusionEvaluation::Conditional(Self::new(conditions.clone()));
        };

        let branches: Vec<_> = any_of.branches()
            .iter()
            .filter_map(|branch| {
                InclusionConditions::and(Some(branch), Some(conditions))
                    .into_conditions()
            })
            .collect();

        if branches.is_empty() {
            return InclusionEvaluation::Skipped;
        }
        match Self::canonicalize(branches) {
            Some(any_of) => InclusionEvaluation::Conditional(any_of),
            None => InclusionEvaluation::Included,
        }
    }

    pub fn branches(&self) -> &[InclusionConditions] {
        self.0.as_slice()
    }

    /// Builds a disjunction from branches where `None` stands for an
    /// always-true branch. Returns `None` when the disjunction is always true.
    pub fn from_branches(
        branches: impl IntoIterator<Item = Option<InclusionConditions>>,
    ) -> Option<AnyOf> {
        let mut conjunctions = vec![];
        for branch in branches {
            conjunctions.push(branch?);
        }
        if conjunctions.is_empty() {
            return None;
        }
        Self::canonicalize(conjunctions)
    }

    pub fn new(conditions: InclusionConditions) -> Self {
        Self(vec![conditions])
    }

    /// Combines two optional disjunctions with OR.
    pub fn or(lhs: Option<&AnyOf>, rhs: Option<&AnyOf>) -> Option<AnyOf> {
        let (lhs, rhs) = (lhs?, rhs?);
        Self::canonicalize(
            lhs.branches().iter().chain(rhs.branches()).cloned().collect(),
        )
    }

    /// The one conjunction this disjunction consists of, if it has exactly
    /// one branch.
    pub fn single(&self) -> Option<&InclusionConditions> {
        match self.0.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Rewrites this disjunction for use inside a scope that already
    /// guarantees `scope`: conditions the scope implies are removed and
    /// branches the scope contradicts are dropped.
    pub fn within_scope(
        &self,
        scope: Option<&InclusionConditions>,
    ) -> InclusionEvaluation<AnyOf> {
        let mut branches = vec![];
        for branch in self.branches() {
            if InclusionConditions::and(Some(branch), scope).is_skipped() {
                continue;
            }
            match branch.minus(scope) {
                Some(remaining) => branches.push(remaining),
                None => return InclusionEvaluation::Included,
            }
        }

        if branches.is_empty() {
            return InclusionEvaluation::Skipped;
        }
        match Self::canonicalize(branches) {
            Some(any_of) => InclusionEvaluation::Conditional(any_of),
            None => InclusionEvaluation::Included,
        }
    }

    /// Reduces `branches` to their Blake canonical form: the set of all prime
    /// implicants of the disjunction, sorted. Two disjunctions with the same
    /// truth table always produce the same value. Returns `None` if the
    /// branches reduce to "always".
    fn canonicalize(mut branches: Vec<InclusionConditions>) -> Option<AnyOf> {
        loop {
            branches.sort();
            branches.dedup();
            Self::absorb(&mut branches);

            let mut consensus_terms: Vec<InclusionConditions> = vec![];
            for (idx, lhs) in branches.iter().enumerate() {
                for rhs in &branches[idx + 1..] {
                    let term = match Self::consensus(lhs, rhs) {
                        None => continue,
                        Some(None) => return None,
                        Some(Some(term)) => term,
                    };
                    let is_absorbed = branches.iter()
                        .chain(consensus_terms.iter())
                        .any(|existing| term.implies(existing));
                    if !is_absorbed {
                        consensus_terms.push(term);
                    }
                }
            }

            if consensus_terms.is_empty() {
                return Some(Self(branches));
            }
            branches.extend(consensus_terms);
        }
    }

    /// Drops every branch that implies some other, weaker branch
    /// (`A || (A && B)` becomes `A`). Expects `branches` deduplicated.
    fn absorb(branches: &mut Vec<InclusionConditions>) {
        let absorbed: Vec<InclusionConditions> = branches.iter()
            .filter(|branch| !branches.iter().any(|other|
                other != *branch && branch.implies(other)
            ))
            .cloned()
            .collect();
        *branches = absorbed;
    }

    /// The consensus of `(C && $x)` and `(D && !$x)` is `C && D`. It only
    /// exists when exactly one variable appears with opposite polarity. The
    /// inner `Option` is `None` when the consensus is empty (always true).
    fn consensus(
        lhs: &InclusionConditions,
        rhs: &InclusionConditions,
    ) -> Option<Option<InclusionConditions>> {
        let mut opposed = lhs.iter().filter(|condition| rhs.contains(&condition.inverted()));
        let pivot = opposed.next()?;
        if opposed.next().is_some() {
            return None;
        }

        let lhs_rest = lhs.without(pivot);
        let rhs_rest = rhs.without(&pivot.inverted());
        match InclusionConditions::and(lhs_rest.as_ref(), rhs_rest.as_ref()) {
            InclusionEvaluation::Included => Some(None),
            InclusionEvaluation::Conditional(term) => Some(Some(term)),
            InclusionEvaluation::Skipped => None,
        }
    }
}
impl std::fmt::Display for AnyOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.single() {
            Some(conditions) => write!(f, "{conditions}"),
            None => {
                for (idx, branch) in self.branches().iter().enumerate() {
                    if idx > 0 {
                        write!(f, " || ")?;
                    }
                    write!(f, "({branch})")?;
                }
                Ok(())
            },
        }
    }
}
impl From<InclusionConditions> for AnyOf {
    fn from(conditions: InclusionConditions) -> Self {
        Self::new(conditions)
    }
}
