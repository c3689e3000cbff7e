use super::*;
use proptest::prelude::*;

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
//
// These use proptest to check that unification and bindings behave the same
// for arbitrary terms, not just the hand-picked cases above.

const POOL: [&str; 5] = ["V0", "V1", "V2", "V3", "V4"];

fn arb_var_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z0-9]{0,3}"
}

fn arb_atom() -> impl Strategy<Value = Term> {
    "[a-z][a-z0-9]{0,3}".prop_map(Term::Atom)
}

fn arb_number() -> impl Strategy<Value = Term> {
    (-50i32..50).prop_map(|n| Term::Number(f64::from(n)))
}

fn arb_ground_term(depth: u32) -> BoxedStrategy<Term> {
    let leaf = prop_oneof![arb_atom(), arb_number()];
    if depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            leaf,
            (
                "[a-z]{1,3}",
                prop::collection::vec(arb_ground_term(depth - 1), 1..=3)
            )
                .prop_map(|(name, args)| Term::fact(name, args))
        ]
        .boxed()
    }
}

/// Terms whose variables are drawn from `vars`.
fn arb_term_over(vars: Vec<String>, depth: u32) -> BoxedStrategy<Term> {
    if vars.is_empty() {
        return arb_ground_term(depth);
    }
    let leaf = prop_oneof![
        arb_atom(),
        arb_number(),
        prop::sample::select(vars.clone()).prop_map(Term::var)
    ];
    if depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            leaf,
            (
                "[a-z]{1,3}",
                prop::collection::vec(arb_term_over(vars, depth - 1), 1..=3)
            )
                .prop_map(|(name, args)| Term::fact(name, args))
        ]
        .boxed()
    }
}

/// Bindings over `POOL` where each variable only refers to later ones, so
/// no chain or nested value can loop back.
fn arb_acyclic_bindings() -> impl Strategy<Value = Bindings> {
    let per_var: Vec<BoxedStrategy<Option<Term>>> = (0..POOL.len())
        .map(|i| {
            let later: Vec<String> = POOL[i + 1..].iter().map(|s| s.to_string()).collect();
            prop::option::of(arb_term_over(later, 2)).boxed()
        })
        .collect();
    per_var.prop_map(|values| {
        let mut b = Bindings::new();
        for (name, value) in POOL.iter().zip(values) {
            if let Some(term) = value {
                b.bind(&Var::new(*name), term);
            }
        }
        b
    })
}

/// Bindings built from arbitrary `bind` calls over `POOL`; rejected calls are skipped.
fn arb_bound_bindings() -> impl Strategy<Value = Bindings> {
    let pool: Vec<String> = POOL.iter().map(|s| s.to_string()).collect();
    prop::collection::vec(
        (prop::sample::select(pool.clone()), arb_term_over(pool, 1)),
        0..8,
    )
    .prop_map(|calls| {
        let mut b = Bindings::new();
        for (name, value) in calls {
            b.bind(&Var::new(name), value);
        }
        b
    })
}

proptest! {
    #[test]
    fn ground_terms_unify_iff_equal(a in arb_ground_term(2), b in arb_ground_term(2)) {
        let forward = unify(&a, &b, &Bindings::new());
        let backward = unify(&b, &a, &Bindings::new());
        prop_assert_eq!(forward.is_some(), backward.is_some());
        prop_assert_eq!(forward.is_some(), a.to_string() == b.to_string());
        if let Some(s) = forward {
            prop_assert!(s.is_empty());
        }
    }

    #[test]
    fn variable_pairs_bind_deterministically(x in arb_var_name(), y in arb_var_name()) {
        prop_assume!(x != y);
        let forward = unify(&Term::var(x.clone()), &Term::var(y.clone()), &Bindings::new());
        let backward = unify(&Term::var(y.clone()), &Term::var(x.clone()), &Bindings::new());
        prop_assert_eq!(&forward, &backward);
        let (from, to) = if x < y { (x, y) } else { (y, x) };
        prop_assert_eq!(forward, Some(bindings(&[(from.as_str(), Term::var(to))])));
    }

    #[test]
    fn unifier_equates_both_sides(
        a in arb_term_over(POOL.iter().map(|s| s.to_string()).collect(), 2),
        b in arb_ground_term(2),
    ) {
        if let Some(s) = unify(&a, &b, &Bindings::new()) {
            prop_assert_eq!(s.ground(&a).to_string(), b.to_string());
        }
    }

    #[test]
    fn clone_isolation(s in arb_bound_bindings(), k in 0usize..5, v in arb_ground_term(1)) {
        let key = Var::new(POOL[k]);
        let before = s.dereference(&Term::Var(key.clone()));
        let mut copy = s.clone();
        copy.bind(&key, v);
        prop_assert_eq!(s.dereference(&Term::Var(key)), before);
    }

    #[test]
    fn dereference_ends_at_value_or_unbound(s in arb_bound_bindings()) {
        for name in POOL {
            if let Term::Var(v) = s.dereference(&Term::var(name)) {
                prop_assert!(!s.contains(&v));
            }
        }
    }

    #[test]
    fn bound_variable_never_reaches_itself(s in arb_bound_bindings()) {
        for name in POOL {
            let grounded = s.ground(&Term::var(name));
            if !matches!(grounded, Term::Var(_)) {
                prop_assert!(!grounded.variables().contains(&Var::new(name)));
            }
        }
    }

    #[test]
    fn grounding_is_idempotent(
        s in arb_acyclic_bindings(),
        t in arb_term_over(POOL.iter().map(|s| s.to_string()).collect(), 2),
    ) {
        let once = s.ground(&t);
        let twice = s.ground(&once);
        prop_assert_eq!(once, twice);
    }
}
