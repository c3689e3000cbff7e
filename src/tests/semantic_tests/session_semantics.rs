use super::*;
use crate::raw;
use crate::session::{DirectiveResult, ExecResult, QueryReply, Session, SessionError};

// =============================================================================
// SESSION SEMANTICS
// =============================================================================
//
// A session owns the knowledge base and at most one active query. Answers are
// projected onto the variables written in the query.

fn session() -> (Session, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let session = Session::with_output(ResolverConfig::default(), Box::new(buffer.clone()));
    (session, buffer)
}

fn load(session: &mut Session, program: &str) {
    for stmt in parse_file(program).expect("program should parse") {
        session.execute_statement(stmt).expect("statement should run");
    }
}

fn answer_text(reply: QueryReply) -> String {
    match reply {
        QueryReply::Answer(answer) => answer.to_string(),
        QueryReply::Exhausted => panic!("expected an answer"),
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("sldlog-{}-{}", std::process::id(), name))
}

#[test]
fn statements_are_added_to_the_theory() {
    let (mut s, _) = session();
    let stmt = parse_file("f(a).").expect("parse").remove(0);
    assert_eq!(s.execute_statement(stmt).expect("run"), ExecResult::StatementAdded);
    assert_eq!(s.theory().len(), 1);
}

#[test]
fn answers_hide_rule_internals() {
    let (mut s, _) = session();
    load(&mut s, "f(a, b). f(b, c). fof(A, B) :- f(A, C), f(C, B).");
    let reply = s.execute_query_str("?- fof(X, Y).").expect("query");
    assert_eq!(answer_text(reply), "X = a, Y = c");
    assert_eq!(s.next_answer().expect("next"), QueryReply::Exhausted);
    assert!(!s.has_active_query());
}

#[test]
fn linked_caller_variables_get_the_shared_value() {
    let (mut s, _) = session();
    load(&mut s, "q(a). r(b). r(a). p(A, B) :- q(A), r(B).");
    let reply = s.execute_query_str("?- X = Y, p(X, Y).").expect("query");
    assert_eq!(answer_text(reply), "X = a, Y = a");
    assert_eq!(s.next_answer().expect("next"), QueryReply::Exhausted);
}

#[test]
fn mutually_recursive_terms_do_not_unify() {
    let (mut s, _) = session();
    let reply = s
        .execute_query_str("?- X = f(X), Y = f(Y), X = Y.")
        .expect("query");
    assert_eq!(reply, QueryReply::Exhausted);
}

#[test]
fn answer_lookup_by_name() {
    let (mut s, _) = session();
    match s.execute_query_str("?- X is 6 / 4.").expect("query") {
        QueryReply::Answer(answer) => {
            assert_eq!(answer.get("X"), Some(&Term::number(1.5)));
            assert_eq!(answer.get("Y"), None);
        }
        QueryReply::Exhausted => panic!("expected an answer"),
    }
}

#[test]
fn new_query_replaces_active_query() {
    let (mut s, _) = session();
    load(&mut s, "f(a). f(b). g(c).");
    s.execute_query_str("?- f(X).").expect("query");
    assert_eq!(answer_text(s.execute_query_str("?- g(X).").expect("query")), "X = c");
    assert_eq!(s.next_answer().expect("next"), QueryReply::Exhausted);
}

#[test]
fn query_statement_in_program_text_is_answered() {
    let (mut s, _) = session();
    load(&mut s, "f(a).");
    let stmt = parse_file("?- f(a).").expect("parse").remove(0);
    assert_eq!(
        s.execute_statement(stmt).expect("run"),
        ExecResult::Query(QueryReply::Answer(crate::session::Answer { bindings: vec![] }))
    );
}

#[test]
fn load_text_file_runs_its_queries() {
    let path = temp_path("program.pl");
    std::fs::write(&path, "f(a, b).\nf(b, c).\n?- f(X, Y), writeln(X).\n").expect("write");

    let (mut s, out) = session();
    let path_str = path.to_string_lossy().into_owned();
    match s.load_file(&path_str).expect("load") {
        DirectiveResult::Loaded { statements, .. } => assert_eq!(statements, 3),
        other => panic!("expected Loaded, got {:?}", other),
    }
    assert_eq!(out.contents(), "a\nb\n");
    assert_eq!(s.theory().len(), 2);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_compiled_file() {
    let path = temp_path("program.raw");
    let program = parse_file("edge(x, y). path(A, B) :- edge(A, B).").expect("parse");
    raw::serialize(&program, std::fs::File::create(&path).expect("create")).expect("serialize");

    let (mut s, _) = session();
    s.load_file(&path.to_string_lossy()).expect("load");
    assert_eq!(
        answer_text(s.execute_query_str("?- path(x, Where).").expect("query")),
        "Where = y"
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_reports_malformed_compiled_file() {
    let path = temp_path("broken.raw");
    std::fs::write(&path, "{\"t\": \"fact\", \"f\": 3}").expect("write");

    let (mut s, _) = session();
    assert!(matches!(
        s.load_file(&path.to_string_lossy()),
        Err(SessionError::Raw { .. })
    ));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn builtin_failure_surfaces_as_session_error() {
    let (mut s, _) = session();
    let result = s.execute_query_str("?- assert(\"/nonexistent/sldlog/x.raw\").");
    assert!(matches!(result, Err(SessionError::Resolve(_))));
    assert!(!s.has_active_query());
}

#[test]
fn next_directive_continues_the_active_query() {
    let (mut s, _) = session();
    load(&mut s, "f(a). f(b).");
    s.execute_query_str("?- f(X).").expect("query");
    match s.apply_directive(crate::parser::Directive::Next).expect("next") {
        DirectiveResult::Next(reply) => assert_eq!(answer_text(reply), "X = b"),
        other => panic!("expected Next, got {:?}", other),
    }
}

#[test]
fn max_depth_applies_to_later_queries() {
    let (mut s, _) = session();
    load(&mut s, "nat(z). nat(s(N)) :- nat(N).");
    s.set_option("max_depth", "2").expect("set");
    let mut count = 0;
    let mut reply = s.execute_query_str("?- nat(X).").expect("query");
    while let QueryReply::Answer(_) = reply {
        count += 1;
        reply = s.next_answer().expect("next");
    }
    assert_eq!(count, 3);
}
