use super::*;

// =============================================================================
// UNIFICATION SEMANTIC PROPERTIES
// =============================================================================
//
// unify(base, query, s) either fails or returns s extended so that both sides
// ground to the same term. The input substitution is never modified.

#[test]
fn unifier_makes_both_sides_equal() {
    let base = Term::fact("f", vec![Term::var("X"), atom("b")]);
    let query = Term::fact("f", vec![atom("a"), Term::var("Y")]);
    let s = unify(&base, &query, &Bindings::new()).expect("should unify");
    assert_eq!(s.ground(&base).to_string(), "f(a,b)");
    assert_eq!(s.ground(&base).to_string(), s.ground(&query).to_string());
}

#[test]
fn unify_does_not_modify_input() {
    let input = bindings(&[("Z", atom("c"))]);
    let before = input.clone();
    let out = unify(&Term::var("X"), &atom("a"), &input).expect("should unify");
    assert_eq!(input, before);
    assert_eq!(out.ground(&Term::var("X")), atom("a"));
    assert_eq!(out.ground(&Term::var("Z")), atom("c"));
}

#[test]
fn unify_respects_existing_bindings() {
    let s = bindings(&[("X", atom("a"))]);
    assert!(unify(&Term::var("X"), &atom("a"), &s).is_some());
    assert!(unify(&Term::var("X"), &atom("b"), &s).is_none());
}

#[test]
fn repeated_variable_must_agree() {
    let base = Term::fact("p", vec![Term::var("X"), Term::var("X")]);
    assert!(unify(&base, &Term::fact("p", vec![atom("a"), atom("a")]), &Bindings::new()).is_some());
    assert!(unify(&base, &Term::fact("p", vec![atom("a"), atom("b")]), &Bindings::new()).is_none());
}

#[test]
fn functor_and_arity_must_match() {
    let s = Bindings::new();
    let f1 = Term::fact("f", vec![atom("a")]);
    assert!(unify(&f1, &Term::fact("g", vec![atom("a")]), &s).is_none());
    assert!(unify(&f1, &Term::fact("f", vec![atom("a"), atom("a")]), &s).is_none());
}

#[test]
fn atom_and_string_with_same_text_unify() {
    assert!(unify(&atom("abc"), &Term::string("abc"), &Bindings::new()).is_some());
    assert!(unify(&atom("abc"), &Term::string("abd"), &Bindings::new()).is_none());
}

#[test]
fn numbers_unify_by_value() {
    let s = Bindings::new();
    assert!(unify(&Term::number(2.0), &Term::number(2.0), &s).is_some());
    assert!(unify(&Term::number(2.0), &Term::number(2.5), &s).is_none());
    assert!(unify(&Term::number(1.0), &atom("1"), &s).is_none());
}

#[test]
fn variable_pair_binds_lexicographically_smaller_name() {
    let forward = unify(&Term::var("A"), &Term::var("B"), &Bindings::new()).expect("unify");
    let backward = unify(&Term::var("B"), &Term::var("A"), &Bindings::new()).expect("unify");
    let expected = bindings(&[("A", Term::var("B"))]);
    assert_eq!(forward, expected);
    assert_eq!(backward, expected);
}

#[test]
fn variable_binds_to_whole_fact() {
    let value = Term::fact("g", vec![atom("a"), Term::var("Y")]);
    let s = unify(&Term::var("X"), &value, &Bindings::new()).expect("unify");
    assert_eq!(s.get(&Var::new("X")), Some(&value));
}

#[test]
fn bindings_flow_between_arguments() {
    // f(X, X) against f(Y, a): X and Y are linked, then both reach a.
    let base = Fact::new("f", vec![Term::var("X"), Term::var("X")]);
    let query = Fact::new("f", vec![Term::var("Y"), atom("a")]);
    let s = unify_facts(&base, &query, &Bindings::new()).expect("unify");
    assert_eq!(s.ground(&Term::var("X")), atom("a"));
    assert_eq!(s.ground(&Term::var("Y")), atom("a"));
}

#[test]
fn lists_unify_head_and_tail() {
    let pattern = Term::list(vec![Term::var("H")], Some(Term::var("T")));
    let value = Term::list(vec![atom("a"), atom("b")], None);
    let s = unify(&pattern, &value, &Bindings::new()).expect("unify");
    assert_eq!(s.ground(&Term::var("H")), atom("a"));
    assert_eq!(
        s.ground(&Term::var("T")),
        Term::list(vec![atom("b")], None)
    );
}
