use crate::ir::AnyOf;
use crate::ir::InclusionCondition;
use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;
use proptest::prelude::*;
use std::collections::HashMap;

/// Parses `"a && !b"` into a conjunction.
fn conj(text: &str) -> InclusionConditions {
    InclusionConditions::all_of(text.split("&&").map(|part| {
        let part = part.trim();
        match part.strip_prefix('!') {
            Some(variable) => InclusionCondition::skip(variable),
            None => InclusionCondition::include(part),
        }
    })).into_conditions().expect("non-empty, non-contradictory conjunction")
}

fn any_of(branches: &[&str]) -> Option<AnyOf> {
    AnyOf::from_branches(branches.iter().map(|branch| Some(conj(branch))))
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn single_branch() {
    let a = any_of(&["a"]).unwrap();

    assert_eq!(a.single(), Some(&conj("a")));
    assert_eq!(a.to_string(), "$a");
    assert_eq!(a, AnyOf::from(conj("a")));
}

#[test]
fn branches_are_sorted_and_deduplicated() {
    let disjunction = any_of(&["c", "a && b", "c"]).unwrap();

    assert_eq!(disjunction.branches(), &[conj("a && b"), conj("c")]);
    assert_eq!(disjunction.to_string(), "($a && $b) || ($c)");
    assert_eq!(disjunction, any_of(&["a && b", "c"]).unwrap());
}

#[test]
fn always_true_branch_makes_the_whole_disjunction_always_true() {
    assert_eq!(AnyOf::from_branches(vec![Some(conj("a")), None]), None);
    assert_eq!(AnyOf::from_branches(Vec::<Option<InclusionConditions>>::new()), None);
}

#[test]
fn absorption() {
    assert_eq!(any_of(&["a && b", "a"]), any_of(&["a"]));
    assert_eq!(any_of(&["a && b && c", "b && c", "d"]), any_of(&["b && c", "d"]));
}

#[test]
fn resolution() {
    assert_eq!(any_of(&["a && x", "a && !x"]), any_of(&["a"]));
    assert_eq!(any_of(&["x", "!x"]), None);
    assert_eq!(any_of(&["a && b", "a && !b", "!a"]), None);
}

#[test]
fn consensus_terms_are_added() {
    let disjunction = any_of(&["a && x", "b && !x"]).unwrap();

    assert_eq!(
        disjunction.branches(),
        &[conj("a && b"), conj("a && x"), conj("b && !x")],
    );
}

#[test]
fn equivalent_disjunctions_are_equal() {
    assert_eq!(any_of(&["a", "!a && b"]), any_of(&["a", "b"]));
    assert_eq!(
        any_of(&["a && b", "!a && b", "a && !b"]),
        any_of(&["a", "b"]),
    );
    assert_eq!(
        any_of(&["a && !b", "!a && b", "b && c"]),
        any_of(&["!a && b", "a && !b", "a && c"]),
    );
}

// =============================================================================
// Combination
// =============================================================================

#[test]
fn or_with_always_is_always() {
    let a = any_of(&["a"]);

    assert_eq!(AnyOf::or(a.as_ref(), None), None);
    assert_eq!(AnyOf::or(None, a.as_ref()), None);
}

#[test]
fn or_unions_branches() {
    let a = any_of(&["a"]);
    let b = any_of(&["b"]);

    assert_eq!(AnyOf::or(a.as_ref(), b.as_ref()), any_of(&["a", "b"]));
    assert_eq!(AnyOf::or(a.as_ref(), a.as_ref()), a);
}

#[test]
fn or_is_associative() {
    let a_and_b = any_of(&["a && b"]);
    let not_a_and_b = any_of(&["!a && b"]);
    let a_and_not_b = any_of(&["a && !b"]);

    let left_first = AnyOf::or(
        AnyOf::or(a_and_b.as_ref(), not_a_and_b.as_ref()).as_ref(),
        a_and_not_b.as_ref(),
    );
    let right_first = AnyOf::or(
        a_and_b.as_ref(),
        AnyOf::or(not_a_and_b.as_ref(), a_and_not_b.as_ref()).as_ref(),
    );

    assert_eq!(left_first, right_first);
    assert_eq!(left_first, any_of(&["a", "b"]));
}

#[test]
fn and_all_prunes_contradictory_branches() {
    let disjunction = any_of(&["a", "!b"]);

    assert_eq!(
        AnyOf::and_all(disjunction.as_ref(), Some(&conj("!a"))),
        InclusionEvaluation::Conditional(any_of(&["!a && !b"]).unwrap()),
    );
    assert_eq!(
        AnyOf::and_all(any_of(&["a"]).as_ref(), Some(&conj("!a"))),
        InclusionEvaluation::Skipped,
    );
}

#[test]
fn and_all_with_absent_operands() {
    let a = any_of(&["a"]);

    assert_eq!(AnyOf::and_all(None, None), InclusionEvaluation::Included);
    assert_eq!(
        AnyOf::and_all(a.as_ref(), None),
        InclusionEvaluation::Conditional(a.clone().unwrap()),
    );
    assert_eq!(
        AnyOf::and_all(None, Some(&conj("b"))),
        InclusionEvaluation::Conditional(any_of(&["b"]).unwrap()),
    );
}

#[test]
fn within_scope_removes_implied_conditions() {
    let disjunction = any_of(&["a && b", "c"]).unwrap();

    assert_eq!(
        disjunction.within_scope(Some(&conj("a"))),
        InclusionEvaluation::Conditional(any_of(&["b", "c"]).unwrap()),
    );
    assert_eq!(
        disjunction.within_scope(Some(&conj("!c"))),
        InclusionEvaluation::Conditional(any_of(&["a && b"]).unwrap()),
    );
    assert_eq!(
        disjunction.within_scope(Some(&conj("c"))),
        InclusionEvaluation::Included,
    );
    assert_eq!(
        any_of(&["a"]).unwrap().within_scope(Some(&conj("!a"))),
        InclusionEvaluation::Skipped,
    );
}

// =============================================================================
// Canonical-form properties
// =============================================================================

const VARIABLES: [&str; 3] = ["a", "b", "c"];

fn arb_branch() -> impl Strategy<Value = Option<InclusionConditions>> {
    prop::collection::vec((0..VARIABLES.len(), any::<bool>()), 1..4).prop_map(|raw| {
        InclusionConditions::all_of(raw.into_iter().map(|(var_idx, is_inverted)| {
            InclusionCondition {
                variable: VARIABLES[var_idx].to_string(),
                is_inverted,
            }
        })).into_conditions()
    })
}

fn evaluate_conjunction(conditions: &InclusionConditions, values: &HashMap<&str, bool>) -> bool {
    conditions.iter().all(|condition| values[condition.variable.as_str()] != condition.is_inverted)
}

fn evaluate(any_of: Option<&AnyOf>, values: &HashMap<&str, bool>) -> bool {
    match any_of {
        Some(any_of) => any_of.branches().iter().any(|branch| evaluate_conjunction(branch, values)),
        None => true,
    }
}

/// One full conjunction over every variable per satisfying assignment.
fn minterms(any_of: Option<&AnyOf>) -> Vec<InclusionConditions> {
    assignments()
        .into_iter()
        .filter(|values| evaluate(any_of, values))
        .filter_map(|values| {
            InclusionConditions::all_of(VARIABLES.iter().map(|variable| {
                InclusionCondition {
                    variable: variable.to_string(),
                    is_inverted: !values[variable],
                }
            })).into_conditions()
        })
        .collect()
}

fn assignments() -> Vec<HashMap<&'static str, bool>> {
    (0..(1 << VARIABLES.len()))
        .map(|bits: usize| {
            VARIABLES.iter()
                .enumerate()
                .map(|(idx, variable)| (*variable, bits & (1 << idx) != 0))
                .collect()
        })
        .collect()
}

proptest! {
    #[test]
    fn canonical_form_preserves_meaning(
        branches in prop::collection::vec(arb_branch(), 1..5),
    ) {
        // Contradictory branches never hold; `all_of` turned them into
        // `None`, which would mean "always", so drop them here.
        let satisfiable: Vec<InclusionConditions> = branches.into_iter().flatten().collect();
        prop_assume!(!satisfiable.is_empty());

        let canonical = AnyOf::from_branches(satisfiable.iter().cloned().map(Some));
        for values in assignments() {
            let expected = satisfiable.iter().any(|branch| evaluate_conjunction(branch, &values));
            prop_assert_eq!(evaluate(canonical.as_ref(), &values), expected);
        }
    }

    #[test]
    fn canonical_form_is_order_independent(
        branches in prop::collection::vec(arb_branch(), 1..5),
    ) {
        let satisfiable: Vec<InclusionConditions> = branches.into_iter().flatten().collect();
        let mut reversed = satisfiable.clone();
        reversed.reverse();

        prop_assert_eq!(
            AnyOf::from_branches(satisfiable.into_iter().map(Some)),
            AnyOf::from_branches(reversed.into_iter().map(Some)),
        );
    }

    #[test]
    fn equivalent_branch_lists_have_one_canonical_form(
        branches in prop::collection::vec(arb_branch(), 1..5),
    ) {
        let satisfiable: Vec<InclusionConditions> = branches.into_iter().flatten().collect();
        prop_assume!(!satisfiable.is_empty());

        let canonical = AnyOf::from_branches(satisfiable.into_iter().map(Some));
        let expanded = minterms(canonical.as_ref());
        prop_assert_eq!(
            AnyOf::from_branches(expanded.into_iter().map(Some)),
            canonical,
        );
    }

    #[test]
    fn or_is_associative_for_any_operands(
        lhs in prop::collection::vec(arb_branch(), 1..4),
        mid in prop::collection::vec(arb_branch(), 1..4),
        rhs in prop::collection::vec(arb_branch(), 1..4),
    ) {
        let [lhs, mid, rhs] = [lhs, mid, rhs].map(|branches| {
            let satisfiable: Vec<_> = branches.into_iter().flatten().collect();
            AnyOf::from_branches(satisfiable.into_iter().map(Some))
        });

        prop_assert_eq!(
            AnyOf::or(AnyOf::or(lhs.as_ref(), mid.as_ref()).as_ref(), rhs.as_ref()),
            AnyOf::or(lhs.as_ref(), AnyOf::or(mid.as_ref(), rhs.as_ref()).as_ref()),
        );
    }
}
