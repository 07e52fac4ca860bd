// Integration tests for the step tracer

use pretty_assertions::assert_eq;
use steptrace::trace::{BranchKind, ConditionField, Step};
use steptrace::{trace_source, Error, Trace, TraceConfig, TraceError};

fn source(lines: &[&str]) -> String {
    lines.join("\n") + "\n"
}

fn run(src: &str) -> Trace {
    trace_source(src, TraceConfig::default()).expect("Tracing failed")
}

fn trace_error(src: &str) -> TraceError {
    match trace_source(src, TraceConfig::default()) {
        Err(Error::Trace(err)) => err,
        other => panic!("Expected a trace error, got {:?}", other),
    }
}

/// One-line summaries of every step
fn summaries(trace: &Trace) -> Vec<String> {
    trace.steps.iter().map(Step::to_string).collect()
}

fn highlights(trace: &Trace) -> Vec<Vec<usize>> {
    trace
        .steps
        .iter()
        .filter_map(|step| step.highlighted_text().map(|(_, hl)| hl.to_vec()))
        .collect()
}

#[test]
fn test_print_addition_stages() {
    let trace = run(&source(&["a = 10", "b = 20", "print(a + b)"]));

    assert_eq!(
        summaries(&trace),
        vec!["a = 10", "b = 20", "print a + b", "print 10 + 20", "print 30"]
    );
    assert_eq!(highlights(&trace), vec![vec![], vec![0, 1], vec![0, 1]]);

    let ids: Vec<Option<usize>> = trace.steps.iter().map(Step::id).collect();
    assert_eq!(ids, vec![None, None, Some(1), Some(1), Some(1)]);
}

#[test]
fn test_assignment_stages_become_variables() {
    let trace = run(&source(&["x = 5", "y = x * x"]));
    assert_eq!(
        summaries(&trace),
        vec!["x = 5", "y = x * x", "y = 5 * 5", "y = 25"]
    );
    assert_eq!(trace.bindings_at(3), vec![
        ("x".to_string(), "5".to_string()),
        ("y".to_string(), "25".to_string()),
    ]);
}

#[test]
fn test_long_names_are_not_substituted() {
    let trace = run(&source(&["total = 4", "n = 2", "r = total * n"]));
    assert_eq!(
        &summaries(&trace)[2..],
        &["r = total * n", "r = total * 2", "r = 8"]
    );
}

#[test]
fn test_chained_assignment() {
    let trace = run("a = b = 1 + 2\n");
    assert_eq!(
        summaries(&trace),
        vec!["a = 1 + 2", "b = 1 + 2", "a = 3", "b = 3"]
    );
}

#[test]
fn test_tuple_assignment_zips_stages() {
    let trace = run(&source(&["x = 1", "y = 2", "a, b = x + y, x"]));
    assert_eq!(
        &summaries(&trace)[2..],
        &[
            "a = x + y",
            "b = 1",
            "a = 1 + 2",
            "b = 1",
            "a = 3",
            "b = 1",
        ]
    );
}

#[test]
fn test_tuple_swap_reads_before_binding() {
    let trace = run(&source(&["a = 1", "b = 2", "a, b = b, a", "print(a - b)"]));
    assert_eq!(
        summaries(&trace),
        vec![
            "a = 1",
            "b = 2",
            "a = 2",
            "b = 1",
            "print a - b",
            "print 2 - 1",
            "print 1",
        ]
    );
}

#[test]
fn test_single_target_takes_whole_tuple() {
    let trace = run("t = 1, 2\n");
    assert_eq!(summaries(&trace), vec!["t = (1, 2)"]);
}

#[test]
fn test_range_with_step() {
    let trace = run(&source(&["for i in range(0, 6, 2):", "    print(i)"]));

    let loops: Vec<(i64, Vec<ConditionField>)> = trace
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::For(s) => Some((s.condition.cur, s.highlight.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        loops,
        vec![
            (0, ConditionField::ALL.to_vec()),
            (2, vec![ConditionField::Cur]),
            (4, vec![ConditionField::Cur]),
        ]
    );

    let depths: Vec<usize> = trace.steps.iter().map(Step::depth).collect();
    assert_eq!(depths, vec![0, 1, 0, 1, 0, 1]);
}

#[test]
fn test_range_argument_forms() {
    let count = |header: &str| {
        let trace = run(&source(&[header, "    x = i"]));
        trace
            .steps
            .iter()
            .filter(|step| matches!(step, Step::For(_)))
            .count()
    };

    assert_eq!(count("for i in range(4):"), 4);
    assert_eq!(count("for i in range(2, 5):"), 3);
    assert_eq!(count("for i in range(0, 10, 3):"), 4);
    assert_eq!(count("for i in range(3, 0, -1):"), 3);
    assert_eq!(count("for i in range(5, 0, 1):"), 0);
    assert_eq!(count("for i in range(0):"), 0);
}

#[test]
fn test_range_arguments_from_variables() {
    let trace = run(&source(&["n = 3", "for i in range(n - 1):", "    print(i)"]));
    let printed: Vec<String> = trace
        .steps
        .iter()
        .filter(|step| matches!(step, Step::Print(_)))
        .map(Step::to_string)
        .collect();
    assert_eq!(printed, vec!["print 0", "print 1"]);
}

#[test]
fn test_empty_loop_emits_nothing() {
    let trace = run(&source(&["for i in range(5, 0, 1):", "    print(i)", "print(7)"]));
    assert_eq!(summaries(&trace), vec!["print 7"]);
}

#[test]
fn test_nested_loops_restart_highlight() {
    let trace = run(&source(&[
        "for i in range(2):",
        "    for j in range(2):",
        "        print(j)",
    ]));

    let inner: Vec<Vec<ConditionField>> = trace
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::For(s) if s.condition.target == "j" => Some(s.highlight.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        inner,
        vec![
            ConditionField::ALL.to_vec(),
            vec![ConditionField::Cur],
            ConditionField::ALL.to_vec(),
            vec![ConditionField::Cur],
        ]
    );

    let print_depths: Vec<usize> = trace
        .steps
        .iter()
        .filter(|step| matches!(step, Step::Print(_)))
        .map(Step::depth)
        .collect();
    assert_eq!(print_depths, vec![2, 2, 2, 2]);
}

#[test]
fn test_ids_are_stable_across_iterations() {
    let trace = run(&source(&[
        "for i in range(3):",
        "    print(i)",
        "    print(i + 1)",
    ]));

    let ids: Vec<(&str, usize)> = trace
        .steps
        .iter()
        .filter_map(|step| step.id().map(|id| (step.kind(), id)))
        .collect();

    assert!(ids.iter().filter(|(kind, _)| *kind == "for").all(|(_, id)| *id == 1));
    let print_ids: Vec<usize> = ids
        .iter()
        .filter(|(kind, _)| *kind == "print")
        .map(|(_, id)| *id)
        .collect();
    // print(i) resolves in one stage, print(i + 1) in three
    assert_eq!(print_ids, [2usize, 3, 3, 3].repeat(3));

    assert_eq!(trace.source_of(1).map(|loc| loc.line), Some(1));
    assert_eq!(trace.source_of(3).map(|loc| loc.line), Some(3));
}

#[test]
fn test_step_locations() {
    let trace = run(&source(&["a = 1", "for i in range(1):", "    b = a + 1"]));
    let lines: Vec<usize> = trace.locations.iter().map(|loc| loc.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 3, 3]);
    assert_eq!(trace.location_of(0).map(|loc| loc.line), Some(1));
}

#[test]
fn test_print_with_several_arguments() {
    let trace = run(&source(&["a = 1", "print(a, a + 1)"]));
    assert_eq!(
        &summaries(&trace)[1..],
        &["print 1", "print a + 1", "print 1 + 1", "print 2"]
    );
}

#[test]
fn test_if_elif_else() {
    let program = |a: i64| {
        let first = format!("a = {}", a);
        source(&[
            first.as_str(),
            "if a > 10:",
            "    print(1)",
            "elif a > 3:",
            "    print(2)",
            "else:",
            "    print(3)",
        ])
    };

    let trace = run(&program(5));
    assert_eq!(
        summaries(&trace),
        vec![
            "a = 5",
            "if a > 10",
            "if 5 > 10",
            "if False",
            "elif a > 3",
            "elif 5 > 3",
            "elif True",
            "print 2",
        ]
    );
    assert_eq!(trace.steps[7].depth(), 1);

    let trace = run(&program(1));
    let branches: Vec<BranchKind> = trace
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::If(s) => Some(s.branch),
            _ => None,
        })
        .collect();
    assert_eq!(branches.last(), Some(&BranchKind::Else));
    assert_eq!(summaries(&trace).last().map(String::as_str), Some("print 3"));
}

#[test]
fn test_if_without_else_skips_body() {
    let trace = run(&source(&["x = 0", "if x:", "    print(1)", "print(2)"]));
    assert_eq!(summaries(&trace), vec!["x = 0", "if 0", "print 2"]);
}

#[test]
fn test_function_call_and_return() {
    let trace = run(&source(&[
        "def add(x, y):",
        "    return x + y",
        "z = add(2, 3)",
        "print(z)",
    ]));

    assert_eq!(
        summaries(&trace),
        vec![
            "def add(x, y)",
            "call add(x=2, y=3)",
            "return x + y",
            "return 2 + 3",
            "return 5",
            "add() -> 5",
            "z = 5",
            "print 5",
        ]
    );

    let depths: Vec<usize> = trace.steps.iter().map(Step::depth).collect();
    assert_eq!(depths, vec![0, 0, 1, 1, 1, 0, 0, 0]);

    // The call and its end share one id
    assert_eq!(trace.steps[1].id(), trace.steps[5].id());
    // End-call points back at the call site
    assert_eq!(trace.location_of(5).map(|loc| loc.line), Some(3));
}

#[test]
fn test_function_reads_globals_and_locals() {
    let trace = run(&source(&[
        "k = 10",
        "def g(x):",
        "    return x * k",
        "y = g(2)",
    ]));
    assert_eq!(
        &summaries(&trace)[3..6],
        &["return x * k", "return 2 * 10", "return 20"]
    );
    // Parameters stay local to the call
    assert_eq!(
        trace.bindings_at(trace.len() - 1),
        vec![
            ("k".to_string(), "10".to_string()),
            ("y".to_string(), "20".to_string()),
        ]
    );
}

#[test]
fn test_locals_do_not_leak_into_globals() {
    let trace = run(&source(&[
        "x = 1",
        "def f(a):",
        "    x = 5",
        "    return x",
        "y = f(x)",
    ]));
    // Inside the call the local shadows the global
    let inner = trace
        .steps
        .iter()
        .position(|step| matches!(step, Step::Variable(var) if var.expr == "5"))
        .expect("local assignment step");
    assert_eq!(
        trace.bindings_at(inner),
        vec![
            ("a".to_string(), "1".to_string()),
            ("x".to_string(), "5".to_string()),
        ]
    );
    assert_eq!(
        trace.bindings_at(trace.len() - 1),
        vec![
            ("x".to_string(), "1".to_string()),
            ("y".to_string(), "5".to_string()),
        ]
    );
}

#[test]
fn test_loop_target_is_visible_in_bindings() {
    let trace = run(&source(&["for i in range(2):", "    print(i + 1)"]));
    assert!(matches!(trace.steps[1], Step::Print(_)));
    assert_eq!(trace.bindings_at(1), vec![("i".to_string(), "0".to_string())]);
    assert_eq!(
        trace.bindings_at(trace.len() - 1),
        vec![("i".to_string(), "1".to_string())]
    );
}

#[test]
fn test_function_without_return_gives_none() {
    let trace = run(&source(&["def f(a):", "    b = a", "r = f(1)"]));
    assert_eq!(
        summaries(&trace),
        vec!["def f(a)", "call f(a=1)", "b = 1", "f() -> None", "r = None"]
    );
}

#[test]
fn test_return_inside_loop_unwinds() {
    let trace = run(&source(&[
        "def first(n):",
        "    for i in range(n):",
        "        return i",
        "v = first(5)",
    ]));
    let loops = trace
        .steps
        .iter()
        .filter(|step| matches!(step, Step::For(_)))
        .count();
    assert_eq!(loops, 1);
    assert_eq!(summaries(&trace).last().map(String::as_str), Some("v = 0"));
}

#[test]
fn test_recursion_limit() {
    let src = source(&["def f(n):", "    return f(n)", "f(1)"]);
    let config = TraceConfig::default().with_max_call_depth(3);
    match trace_source(&src, config) {
        Err(Error::Trace(TraceError::RecursionLimit {
            function, limit, ..
        })) => {
            assert_eq!(function, "f");
            assert_eq!(limit, 3);
        }
        other => panic!("Expected RecursionLimit, got {:?}", other),
    }
}

#[test]
fn test_step_limit() {
    let src = source(&["for i in range(100):", "    a = i"]);
    let config = TraceConfig::default().with_max_steps(10);
    assert_eq!(
        trace_source(&src, config),
        Err(Error::Trace(TraceError::StepLimitExceeded { limit: 10 }))
    );
}

#[test]
fn test_unsupported_call() {
    let err = trace_error("foo(1)\n");
    assert!(matches!(err, TraceError::UnsupportedCall { ref name, .. } if name == "foo"));
    assert_eq!(err.location().map(|loc| (loc.line, loc.column)), Some((1, 1)));
}

#[test]
fn test_unsupported_operator() {
    let err = trace_error("a = 7 // 2\n");
    assert!(matches!(err, TraceError::UnsupportedOperator { ref op, .. } if op == "//"));
    assert_eq!(err.location().map(|loc| (loc.line, loc.column)), Some((1, 7)));
}

#[test]
fn test_unbound_name() {
    let err = trace_error("print(q + 1)\n");
    assert!(matches!(err, TraceError::UnboundName { ref name, .. } if name == "q"));
}

#[test]
fn test_malformed_range() {
    assert!(matches!(
        trace_error(&source(&["for i in range(1, 2, 3, 4):", "    a = i"])),
        TraceError::MalformedArgument { .. }
    ));
    // Arity is checked before any argument is evaluated
    assert!(matches!(
        trace_error(&source(&["for i in range(0, 1, 2, zz):", "    a = i"])),
        TraceError::MalformedArgument { .. }
    ));
    assert!(matches!(
        trace_error(&source(&["for i in range(0, 5, 0):", "    a = i"])),
        TraceError::MalformedArgument { .. }
    ));
    assert!(matches!(
        trace_error(&source(&["for i in range(2.5):", "    a = i"])),
        TraceError::MalformedArgument { .. }
    ));
    assert!(matches!(
        trace_error(&source(&["for i in foo(3):", "    a = i"])),
        TraceError::UnsupportedCall { .. }
    ));
    assert!(matches!(
        trace_error(&source(&["for i in (1, 2):", "    a = i"])),
        TraceError::UnsupportedNode { .. }
    ));
}

#[test]
fn test_structural_errors() {
    assert!(matches!(
        trace_error("return 1\n"),
        TraceError::UnsupportedNode { .. }
    ));
    assert!(matches!(
        trace_error("a + 1\n"),
        TraceError::UnsupportedNode { .. }
    ));
    assert!(matches!(
        trace_error("a, b = 1, 2, 3\n"),
        TraceError::UnpackMismatch {
            expected: 2,
            got: 3,
            ..
        }
    ));
    assert!(matches!(
        trace_error(&source(&["def f(x):", "    return x", "f(1, 2)"])),
        TraceError::ArgumentCount {
            expected: 1,
            got: 2,
            ..
        }
    ));
}

#[test]
fn test_parse_errors_are_separate() {
    for src in ["a = \"hi\"\n", "a = b < c < d\n", "x = -y\n"] {
        assert!(
            matches!(trace_source(src, TraceConfig::default()), Err(Error::Parse(_))),
            "expected a parse error for {:?}",
            src
        );
    }
}

#[test]
fn test_runs_are_deterministic_and_isolated() {
    let src = source(&[
        "a, b = 3, 4",
        "for i in range(a):",
        "    b = b + i",
        "print(b)",
    ]);
    let first = run(&src);
    let second = run(&src);
    assert_eq!(first, second);

    // A fresh run does not see bindings from an earlier one
    assert!(matches!(
        trace_error("print(b)\n"),
        TraceError::UnboundName { .. }
    ));
}

#[test]
fn test_json_shape() {
    let trace = run(&source(&["for i in range(2):", "    print(i)"]));
    let json = serde_json::to_value(&trace).expect("trace serializes");

    assert_eq!(json["steps"][0]["kind"], "for");
    assert_eq!(
        json["steps"][0]["highlight"],
        serde_json::json!(["target", "cur", "start", "end", "step"])
    );
    assert_eq!(json["steps"][0]["condition"]["cur"], 0);
    assert_eq!(json["steps"][1]["kind"], "print");
    assert_eq!(json["steps"][1]["expr"], "0");
    assert_eq!(json["steps"][1]["highlight"], serde_json::json!([0]));
    assert_eq!(json["steps"][2]["highlight"], serde_json::json!(["cur"]));
    assert_eq!(json["sources"]["1"]["line"], 1);
    assert_eq!(json["locations"][1]["line"], 2);
}
