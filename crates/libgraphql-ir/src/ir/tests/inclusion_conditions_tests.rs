use crate::ast;
use crate::ir::InclusionCondition;
use crate::ir::InclusionConditions;
use crate::ir::InclusionEvaluation;
use crate::Value;
use proptest::prelude::*;

fn conditions(raw: &[(&str, bool)]) -> InclusionConditions {
    InclusionConditions::all_of(raw.iter().map(|(variable, is_inverted)| {
        InclusionCondition {
            variable: variable.to_string(),
            is_inverted: *is_inverted,
        }
    })).into_conditions().expect("non-empty, non-contradictory conditions")
}

fn first_field_directives(query: &str) -> Vec<ast::query::Directive> {
    let doc = ast::query::parse(query).unwrap();
    let Some(ast::query::Definition::Operation(op_def)) = doc.definitions.first() else {
        panic!("expected an operation");
    };
    let graphql_parser::query::OperationDefinition::SelectionSet(selection_set) = op_def else {
        panic!("expected a shorthand query");
    };
    let Some(ast::query::Selection::Field(field)) = selection_set.items.first() else {
        panic!("expected a field");
    };
    field.directives.clone()
}

// =============================================================================
// all_of
// =============================================================================

#[test]
fn empty_conditions_are_always_included() {
    assert_eq!(InclusionConditions::all_of(vec![]), InclusionEvaluation::Included);
    assert!(InclusionConditions::all_of(vec![]).conditions().is_none());
}

#[test]
fn conditions_are_sorted_and_deduplicated() {
    let evaluation = InclusionConditions::all_of(vec![
        InclusionCondition::include("b"),
        InclusionCondition::skip("a"),
        InclusionCondition::include("b"),
    ]);

    let conditions = evaluation.conditions().unwrap();
    assert_eq!(conditions.as_slice(), &[
        InclusionCondition::skip("a"),
        InclusionCondition::include("b"),
    ]);
    assert_eq!(conditions.to_string(), "!$a && $b");
}

#[test]
fn variable_with_its_negation_is_skipped() {
    let evaluation = InclusionConditions::all_of(vec![
        InclusionCondition::include("a"),
        InclusionCondition::include("b"),
        InclusionCondition::skip("a"),
    ]);

    assert!(evaluation.is_skipped());
    assert!(evaluation.conditions().is_none());
}

#[test]
fn and_combines_optional_conjunctions() {
    let a = conditions(&[("a", false)]);
    let not_a = conditions(&[("a", true)]);
    let b = conditions(&[("b", false)]);

    assert_eq!(InclusionConditions::and(None, None), InclusionEvaluation::Included);
    assert_eq!(
        InclusionConditions::and(Some(&a), None),
        InclusionEvaluation::Conditional(a.clone()),
    );
    assert_eq!(
        InclusionConditions::and(Some(&b), Some(&a)),
        InclusionEvaluation::Conditional(conditions(&[("a", false), ("b", false)])),
    );
    assert!(InclusionConditions::and(Some(&a), Some(&not_a)).is_skipped());
}

// =============================================================================
// Scope helpers
// =============================================================================

#[test]
fn implies_and_minus() {
    let ab = conditions(&[("a", false), ("b", false)]);
    let a = conditions(&[("a", false)]);

    assert!(ab.implies(&a));
    assert!(!a.implies(&ab));
    assert_eq!(ab.minus(Some(&a)), Some(conditions(&[("b", false)])));
    assert_eq!(a.minus(Some(&ab)), None);
    assert_eq!(ab.minus(None), Some(ab.clone()));
}

#[test]
fn inverted_condition_sorts_next_to_original() {
    let mut sorted = vec![
        InclusionCondition::include("b"),
        InclusionCondition::skip("a"),
        InclusionCondition::include("a"),
    ];
    sorted.sort();

    assert_eq!(sorted, vec![
        InclusionCondition::include("a"),
        InclusionCondition::skip("a"),
        InclusionCondition::include("b"),
    ]);
    assert!(sorted[0].is_inverse_of(&sorted[1]));
    assert_eq!(sorted[0].inverted(), sorted[1]);
}

// =============================================================================
// Directive lowering
// =============================================================================

#[test]
fn include_and_skip_variables() {
    let directives = first_field_directives("{ f @include(if: $a) @skip(if: $b) }");
    let evaluation = InclusionConditions::from_directives(&directives).unwrap();

    assert_eq!(
        evaluation,
        InclusionEvaluation::Conditional(conditions(&[("a", false), ("b", true)])),
    );
}

#[test]
fn literal_true_conditions_vanish() {
    let directives = first_field_directives(
        "{ f @include(if: true) @skip(if: false) @deprecated }",
    );
    let evaluation = InclusionConditions::from_directives(&directives).unwrap();

    assert_eq!(evaluation, InclusionEvaluation::Included);
}

#[test]
fn literal_false_conditions_skip() {
    for query in ["{ f @include(if: false) }", "{ f @skip(if: true) @include(if: $a) }"] {
        let directives = first_field_directives(query);
        let evaluation = InclusionConditions::from_directives(&directives).unwrap();

        assert!(evaluation.is_skipped(), "expected `{query}` to be skipped");
    }
}

#[test]
fn include_and_skip_of_same_variable_is_skipped() {
    let directives = first_field_directives("{ f @include(if: $a) @skip(if: $a) }");
    let evaluation = InclusionConditions::from_directives(&directives).unwrap();

    assert!(evaluation.is_skipped());
}

#[test]
fn invalid_if_argument() {
    let directives = first_field_directives(r#"{ f @include(if: "yes") }"#);
    let err = InclusionConditions::from_directives(&directives).unwrap_err();

    assert_eq!(err.directive_name, "include");
    assert_eq!(err.value, Some(Value::String("yes".to_string())));

    let directives = first_field_directives("{ f @skip }");
    let err = InclusionConditions::from_directives(&directives).unwrap_err();

    assert_eq!(err.directive_name, "skip");
    assert_eq!(err.value, None);
}

// =============================================================================
// Canonical-form properties
// =============================================================================

fn arb_condition() -> impl Strategy<Value = InclusionCondition> {
    (0..4usize, any::<bool>()).prop_map(|(var_idx, is_inverted)| InclusionCondition {
        variable: ["a", "b", "c", "d"][var_idx].to_string(),
        is_inverted,
    })
}

proptest! {
    #[test]
    fn all_of_is_idempotent(raw in prop::collection::vec(arb_condition(), 0..8)) {
        let once = InclusionConditions::all_of(raw);
        if let Some(conditions) = once.conditions() {
            let twice = InclusionConditions::all_of(conditions.iter().cloned());
            prop_assert_eq!(twice, once.clone());
        }
    }

    #[test]
    fn all_of_is_order_independent(raw in prop::collection::vec(arb_condition(), 0..8)) {
        let mut reversed = raw.clone();
        reversed.reverse();
        let mut rotated = raw.clone();
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }

        let canonical = InclusionConditions::all_of(raw);
        prop_assert_eq!(&InclusionConditions::all_of(reversed), &canonical);
        prop_assert_eq!(&InclusionConditions::all_of(rotated), &canonical);
    }

    #[test]
    fn all_of_is_skipped_iff_contradictory(raw in prop::collection::vec(arb_condition(), 0..8)) {
        let contradictory = raw.iter().any(|lhs| raw.iter().any(|rhs| lhs.is_inverse_of(rhs)));
        prop_assert_eq!(InclusionConditions::all_of(raw).is_skipped(), contradictory);
    }
}
