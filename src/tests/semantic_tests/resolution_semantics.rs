use super::*;
use crate::raw;
use crate::resolver::{QueryResult, ResolveError};

// =============================================================================
// RESOLUTION SEMANTIC PROPERTIES
// =============================================================================
//
// Goals are solved left to right, candidates are tried in insertion order,
// and every answer is produced lazily. Answers bind only the variables the
// caller can see.

const CHAIN: &str = "f(a, b). f(b, c). f(c, d). f(d, e).";

fn pair(a: &str, b: &str) -> Bindings {
    bindings(&[("A", atom(a)), ("B", atom(b))])
}

// -------------------------------------------------------------------------
// Ground facts
// -------------------------------------------------------------------------

#[test]
fn single_fact_gives_single_answer() {
    let (r, _) = resolver_for("f(a, b).");
    assert_eq!(solve(&r, "?- f(A, B)."), vec![pair("a", "b")]);
}

#[test]
fn ground_goal_succeeds_once_without_bindings() {
    let (r, _) = resolver_for(CHAIN);
    assert_eq!(solve(&r, "?- f(c, d)."), vec![Bindings::new()]);
    assert!(solve(&r, "?- f(d, c).").is_empty());
}

#[test]
fn unknown_predicate_has_no_answers() {
    let (r, _) = resolver_for(CHAIN);
    assert!(solve(&r, "?- g(X).").is_empty());
    assert!(solve(&r, "?- f(X).").is_empty());
}

// -------------------------------------------------------------------------
// Rules
// -------------------------------------------------------------------------

#[test]
fn conjunctive_rule_answers_in_depth_first_order() {
    let program = format!("{} fof(A, B) :- f(A, C), f(C, B).", CHAIN);
    let (r, _) = resolver_for(&program);
    assert_eq!(
        solve(&r, "?- fof(A, B)."),
        vec![pair("a", "c"), pair("b", "d"), pair("c", "e")]
    );
}

#[test]
fn recursive_rule_finds_transitive_closure() {
    let program = format!(
        "{} fof(A, C) :- f(A, C). fof(A, C) :- f(A, B), fof(B, C).",
        CHAIN
    );
    let (r, _) = resolver_for(&program);
    let answers: Vec<String> = solve(&r, "?- fof(A, C).")
        .iter()
        .map(|b| format!("{}{}", b.ground(&Term::var("A")), b.ground(&Term::var("C"))))
        .collect();
    assert_eq!(
        answers,
        vec!["ab", "bc", "cd", "de", "ac", "ad", "ae", "bd", "be", "ce"]
    );
}

#[test]
fn rule_answers_do_not_leak_rule_variables() {
    let program = format!("{} fof(A, B) :- f(A, C), f(C, B).", CHAIN);
    let (r, _) = resolver_for(&program);
    for answer in solve(&r, "?- fof(X, Y).") {
        assert_eq!(answer.len(), 2, "unexpected bindings in {}", answer);
        assert!(answer.contains(&Var::new("X")));
        assert!(answer.contains(&Var::new("Y")));
    }
}

#[test]
fn partially_bound_rule_goal() {
    let program = format!("{} fof(A, B) :- f(A, C), f(C, B).", CHAIN);
    let (r, _) = resolver_for(&program);
    assert_eq!(
        solve(&r, "?- fof(b, Y)."),
        vec![bindings(&[("Y", atom("d"))])]
    );
}

#[test]
fn caller_bindings_are_kept() {
    let (r, _) = resolver_for(CHAIN);
    let query = parse_query("?- f(X, Y).").expect("parse");
    let input = bindings(&[("X", atom("c")), ("Other", Term::number(1.0))]);
    let answers: Vec<Bindings> = r.resolve_query(&query, input).collect();
    assert_eq!(
        answers,
        vec![bindings(&[
            ("X", atom("c")),
            ("Other", Term::number(1.0)),
            ("Y", atom("d")),
        ])]
    );
}

#[test]
fn facts_with_variables_match_anything() {
    let (r, _) = resolver_for("same(X, X). any(_).");
    let answers = solve(&r, "?- same(a, Y).");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].ground(&Term::var("Y")), atom("a"));
    assert!(solve(&r, "?- same(a, b).").is_empty());
    assert_eq!(solve(&r, "?- any(q).").len(), 1);
}

#[test]
fn depth_limit_cuts_infinite_recursion() {
    let config = ResolverConfig { max_depth: Some(20) };
    let (r, _) = resolver_with_config("loop(X) :- loop(X). loop(done).", config);
    // One answer per expansion level, each reaching the stored fact.
    let answers = solve(&r, "?- loop(Y).");
    assert_eq!(answers.len(), 21);
    assert!(answers
        .iter()
        .all(|b| b.ground(&Term::var("Y")) == atom("done")));
}

#[test]
fn deep_recursion_runs_in_constant_stack() {
    let (r, _) = resolver_for("chain(0). chain(N) :- M is N - 1, chain(M).");
    let query = parse_query("?- chain(10000).").expect("parse");
    let first = r.resolve_query(&query, Bindings::new()).next();
    assert_eq!(first, Some(Bindings::new()));
}

#[test]
fn left_recursive_counter_reaches_deep_answer() {
    let (r, _) = resolver_for("cnt(0). cnt(N) :- cnt(M), N is M + 1.");
    let query = parse_query("?- cnt(X), X = 1000.").expect("parse");
    let first = r.resolve_query(&query, Bindings::new()).next();
    let first = first.expect("cnt reaches 1000");
    assert_eq!(first.ground(&Term::var("X")), Term::number(1000.0));
}

#[test]
fn projection_conflict_drops_the_answer() {
    // X and Y are linked in the caller, so only p(a, a) survives.
    let (r, _) = resolver_for("q(a). r(b). r(a). p(A, B) :- q(A), r(B).");
    let answers = solve(&r, "?- X = Y, p(X, Y).");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].ground(&Term::var("X")), atom("a"));
    assert_eq!(answers[0].ground(&Term::var("Y")), atom("a"));
}

#[test]
fn self_containing_binding_has_no_answers() {
    let (r, _) = resolver_for("");
    assert!(solve(&r, "?- X = f(X).").is_empty());
    assert!(solve(&r, "?- X = f(X), Y = f(Y), X = Y.").is_empty());
    assert!(solve(&r, "?- Y = f(X), X = Y.").is_empty());
}

#[test]
fn infinite_answer_stream_is_lazy() {
    let (r, _) = resolver_for("nat(z). nat(s(N)) :- nat(N).");
    let query = parse_query("?- nat(X).").expect("parse");
    let first: Vec<String> = r
        .resolve_query(&query, Bindings::new())
        .take(3)
        .map(|b| b.ground(&Term::var("X")).to_string())
        .collect();
    assert_eq!(first, vec!["z", "s(z)", "s(s(z))"]);
}

// -------------------------------------------------------------------------
// Builtins
// -------------------------------------------------------------------------

#[test]
fn fail_has_no_answers() {
    let (r, _) = resolver_for("");
    assert!(solve(&r, "?- fail.").is_empty());
}

#[test]
fn true_passes_input_through() {
    let (r, _) = resolver_for("");
    let query = parse_query("?- true.").expect("parse");
    let input = bindings(&[("Z", atom("z"))]);
    let answers: Vec<Bindings> = r.resolve_query(&query, input.clone()).collect();
    assert_eq!(answers, vec![input]);
}

#[test]
fn arithmetic_respects_precedence() {
    let (r, _) = resolver_for("");
    assert_eq!(
        solve(&r, "?- X is 2 + 3 * 4."),
        vec![bindings(&[("X", Term::number(14.0))])]
    );
}

#[test]
fn arithmetic_uses_earlier_bindings() {
    let (r, _) = resolver_for("");
    let answers = solve(&r, "?- Y is 10, X is (Y - 4) / 2.");
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].ground(&Term::var("X")), Term::number(3.0));
}

#[test]
fn arithmetic_on_unbound_variable_fails() {
    let (r, _) = resolver_for("");
    assert!(solve(&r, "?- X is Y + 1.").is_empty());
}

#[test]
fn equality_builtin_unifies() {
    let (r, _) = resolver_for("");
    assert_eq!(
        solve(&r, "?- X = f(Y), Y = a."),
        vec![bindings(&[
            ("X", Term::fact("f", vec![Term::var("Y")])),
            ("Y", atom("a")),
        ])]
    );
    assert!(solve(&r, "?- a = b.").is_empty());
}

#[test]
fn builtins_take_priority_over_stored_clauses() {
    let (r, _) = resolver_for("fail. true :- fail.");
    assert!(solve(&r, "?- fail.").is_empty());
    assert_eq!(solve(&r, "?- true.").len(), 1);
}

#[test]
fn writeln_prints_grounded_argument() {
    let (r, out) = resolver_for(CHAIN);
    let answers = solve(&r, "?- f(b, X), writeln(pair(b, X)).");
    assert_eq!(answers.len(), 1);
    assert_eq!(out.contents(), "pair(b,c)\n");
}

#[test]
fn writeln_runs_once_per_answer() {
    let (r, out) = resolver_for(CHAIN);
    let answers = solve(&r, "?- f(X, _), writeln(X).");
    assert_eq!(answers.len(), 4);
    assert_eq!(out.contents(), "a\nb\nc\nd\n");
}

#[test]
fn writeln_is_not_run_before_the_answer_is_requested() {
    let (r, out) = resolver_for("");
    let query = parse_query("?- writeln(hello).").expect("parse");
    let mut solutions = r.resolve_query(&query, Bindings::new());
    assert_eq!(out.contents(), "");
    assert!(solutions.next().is_some());
    assert_eq!(out.contents(), "hello\n");
}

#[test]
fn assert_adds_fact_visible_to_later_goals() {
    let (r, _) = resolver_for("");
    assert_eq!(
        solve(&r, "?- assert(g(a)), g(X)."),
        vec![bindings(&[("X", atom("a"))])]
    );
    // The fact persists for later queries.
    assert_eq!(solve(&r, "?- g(a).").len(), 1);
}

#[test]
fn assert_grounds_its_argument() {
    let (r, _) = resolver_for("");
    solve(&r, "?- X = b, assert(h(X)).");
    assert_eq!(solve(&r, "?- h(Y)."), vec![bindings(&[("Y", atom("b"))])]);
}

#[test]
fn assert_loads_compiled_file() {
    let path = std::env::temp_dir().join(format!("sldlog-assert-{}.raw", std::process::id()));
    let program = parse_file("h(x). h(y). k(A) :- h(A).").expect("parse");
    let file = std::fs::File::create(&path).expect("create temp file");
    raw::serialize(&program, file).expect("serialize");

    let (r, _) = resolver_for("");
    let query = format!("?- assert(\"{}\").", path.display());
    assert_eq!(solve(&r, &query).len(), 1);
    let answers: Vec<String> = solve(&r, "?- k(Z).")
        .iter()
        .map(|b| b.ground(&Term::var("Z")).to_string())
        .collect();
    assert_eq!(answers, vec!["x", "y"]);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn assert_missing_file_fails_the_query() {
    let (r, _) = resolver_for("");
    let query = parse_query("?- assert(\"/nonexistent/sldlog/missing.raw\").").expect("parse");
    let mut stream = r.query(&query);
    match stream.next_answer() {
        QueryResult::Failed(ResolveError::Load { path, .. }) => {
            assert_eq!(path, "/nonexistent/sldlog/missing.raw");
        }
        other => panic!("expected load failure, got {:?}", other),
    }
    assert!(stream.is_done());
    assert!(stream.next().is_none());
}

#[test]
fn query_stream_yields_then_exhausts() {
    let (r, _) = resolver_for(CHAIN);
    let query = parse_query("?- f(a, X).").expect("parse");
    let mut stream = r.query(&query);
    assert!(matches!(stream.next_answer(), QueryResult::Answer(_)));
    assert!(matches!(stream.next_answer(), QueryResult::Exhausted));
    assert!(matches!(stream.next_answer(), QueryResult::Exhausted));
}
