//! Evaluator tests: whole programs parsed from source and run end to end.

use pretty_assertions::assert_eq;
use woke_eval::{DenyAll, EvalConfig, Prompt, EvalError, EvalResult, Evaluator, Value};
use woke_parser::parse;
use woke_types::ast::Program;
use woke_types::SourceFile;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn program(source: &str) -> Program {
    let sf = SourceFile::new("test.woke", source);
    match parse(&sf) {
        Ok(program) => program,
        Err(err) => panic!("test source failed to parse: {err}"),
    }
}

/// Run with the default evaluator; returns the result and printed lines.
fn run(source: &str) -> (EvalResult<Value>, Vec<String>) {
    run_with(Evaluator::new(), source)
}

fn run_with(mut evaluator: Evaluator, source: &str) -> (EvalResult<Value>, Vec<String>) {
    let result = evaluator.run(&program(source));
    (result, evaluator.output().to_vec())
}

fn run_ok(source: &str) -> (Value, Vec<String>) {
    match run(source) {
        (Ok(value), lines) => (value, lines),
        (Err(err), _) => panic!("expected success, got: {err}"),
    }
}

fn run_err(source: &str) -> EvalError {
    match run(source) {
        (Err(err), _) => err,
        (Ok(value), _) => panic!("expected a runtime error, got {value}"),
    }
}

/// Result of `to main() { <body> }`.
fn main_value(body: &str) -> Value {
    run_ok(&format!("to main() {{ {body} }}")).0
}

/// Lines printed by `to main() { <body> }`.
fn main_output(body: &str) -> Vec<String> {
    run_ok(&format!("to main() {{ {body} }}")).1
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|s| s.to_string()).collect()
}

// ══════════════════════════════════════════════════════════════════════
// Program structure
// ══════════════════════════════════════════════════════════════════════

#[test]
fn test_main_result_without_output() {
    let (value, output) =
        run_ok("to main() { remember x = 2; remember y = 3; give back x + y; }");
    assert_eq!(value, Value::Int(5));
    assert!(output.is_empty());
}

#[test]
fn test_program_without_main_returns_unit() {
    let (value, output) = run_ok("to helper() { say \"never\"; }");
    assert_eq!(value, Value::Unit);
    assert!(output.is_empty());
}

#[test]
fn test_main_without_give_back_returns_unit() {
    assert_eq!(main_value("remember x = 1;"), Value::Unit);
}

#[test]
fn test_later_function_definition_wins() {
    let (value, _) = run_ok(
        "to pick() { give back 1; }
         to pick() { give back 2; }
         to main() { give back pick(); }",
    );
    assert_eq!(value, Value::Int(2));
}

#[test]
fn test_gratitude_printed_and_recorded() {
    let mut evaluator = Evaluator::new();
    let result = evaluator.run(&program(
        r#"thanks to { "Ada" → "the engine"; "Grace" -> "compilers"; }"#,
    ));
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(
        evaluator.output(),
        &lines(&["Thanks to Ada for the engine", "Thanks to Grace for compilers"])[..]
    );
    assert_eq!(
        evaluator.gratitude(),
        &[
            ("Ada".to_string(), "the engine".to_string()),
            ("Grace".to_string(), "compilers".to_string()),
        ]
    );
}

#[test]
fn test_workers_are_registered_not_run() {
    let mut evaluator = Evaluator::new();
    let result = evaluator.run(&program(
        r#"worker fetcher { say "working"; }
           side quest tidy { complain "never runs"; }
           to main() { spawn worker fetcher; }"#,
    ));
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(
        evaluator.output(),
        &lines(&[
            "Registered worker: fetcher",
            "Registered side quest: tidy",
            "Spawning worker: fetcher",
        ])[..]
    );
    assert_eq!(evaluator.workers(), &["fetcher".to_string(), "tidy".to_string()]);
}

#[test]
fn test_items_processed_in_source_order() {
    let (_, output) = run_ok(
        r#"to main() { say "main"; }
           thanks to { "a" → "b"; }
           worker w { }"#,
    );
    assert_eq!(
        output,
        lines(&["Thanks to a for b", "Registered worker: w", "main"])
    );
}

#[test]
fn test_constants_are_global() {
    let (value, _) = run_ok(
        "const LIMIT: Int = 4 * 10;
         to twice() { give back LIMIT * 2; }
         to main() { give back twice() + LIMIT; }",
    );
    assert_eq!(value, Value::Int(120));
}

#[test]
fn test_constant_initializer_error_stops_run() {
    let err = run_err("const BAD = 1 / 0; to main() { say \"unreached\"; }");
    assert_eq!(err, EvalError::DivisionByZero);
}

// ══════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════

#[test]
fn test_hello_and_goodbye_messages() {
    let (_, output) = run_ok(
        r#"to greet(name: String) {
               hello "starting";
               say "hi " + name;
               goodbye "done";
           }
           to main() { greet("Sam"); }"#,
    );
    assert_eq!(output, lines(&["[greet] starting", "hi Sam", "[greet] done"]));
}

#[test]
fn test_goodbye_printed_after_early_return() {
    let (value, output) = run_ok(
        r#"to check(n) {
               when n > 0 { give back "positive"; }
               give back "other";
               goodbye "bye";
           }
           to main() { give back check(3); }"#,
    );
    assert_eq!(value, Value::String("positive".into()));
    assert_eq!(output, lines(&["[check] bye"]));
}

#[test]
fn test_goodbye_not_printed_after_error() {
    let (result, output) = run(
        r#"to fail() { hello "hi"; complain "nope"; goodbye "bye"; }
           to main() { fail(); }"#,
    );
    assert_eq!(
        result,
        Err(EvalError::Complaint {
            message: "nope".into()
        })
    );
    assert_eq!(output, lines(&["[fail] hi"]));
}

#[test]
fn test_recursion() {
    let (value, _) = run_ok(
        "to fact(n: Int) -> Int {
             when n <= 1 { give back 1; }
             give back n * fact(n - 1);
         }
         to main() { give back fact(10); }",
    );
    assert_eq!(value, Value::Int(3_628_800));
}

#[test]
fn test_arity_checked_before_side_effects() {
    let (result, output) = run(
        r#"to pair(a, b) { hello "entered"; give back a + b; }
           to main() { pair(1); }"#,
    );
    assert_eq!(
        result,
        Err(EvalError::ArityMismatch {
            name: "pair".into(),
            expected: 2,
            got: 1
        })
    );
    assert!(output.is_empty());
}

#[test]
fn test_undefined_function() {
    assert_eq!(
        run_err("to main() { nothing(); }"),
        EvalError::UndefinedFunction {
            name: "nothing".into()
        }
    );
}

#[test]
fn test_callee_sees_caller_bindings() {
    let (value, _) = run_ok(
        "to peek() { give back secret; }
         to main() { remember secret = 7; give back peek(); }",
    );
    assert_eq!(value, Value::Int(7));
}

#[test]
fn test_callee_bindings_do_not_leak() {
    let err = run_err(
        "to inner() { remember local = 1; }
         to main() { inner(); give back local; }",
    );
    assert_eq!(
        err,
        EvalError::UndefinedVariable {
            name: "local".into()
        }
    );
}

#[test]
fn test_function_values() {
    let (value, output) = run_ok(
        "to double(n) { give back n * 2; }
         to main() {
             remember f = double;
             say f;
             give back f(21);
         }",
    );
    assert_eq!(value, Value::Int(42));
    assert_eq!(output, lines(&["<function double>"]));
}

#[test]
fn test_builtins_shadow_user_functions() {
    let (value, _) = run_ok(
        "to len(x) { give back 99; }
         to main() { give back len(\"abc\"); }",
    );
    assert_eq!(value, Value::Int(3));
}

#[test]
fn test_non_function_variable_falls_back_to_declared_function() {
    let (value, _) = run_ok(
        "to one() { give back 1; }
         to main() { remember one = 5; give back one() + one; }",
    );
    assert_eq!(value, Value::Int(6));
}

#[test]
fn test_call_depth_limit() {
    let evaluator = Evaluator::with_config(EvalConfig {
        max_call_depth: 16,
        ..EvalConfig::default()
    });
    let (result, _) = run_with(
        evaluator,
        "to forever(n) { give back forever(n + 1); }
         to main() { give back forever(0); }",
    );
    assert_eq!(result, Err(EvalError::StackOverflow { limit: 16 }));
}

#[test]
fn test_call_depth_limit_allows_exactly_the_limit() {
    let evaluator = Evaluator::with_config(EvalConfig {
        max_call_depth: 5,
        ..EvalConfig::default()
    });
    // main plus four nested calls
    let (result, _) = run_with(
        evaluator,
        "to down(n) { when n == 0 { give back 0; } give back down(n - 1); }
         to main() { give back down(3); }",
    );
    assert_eq!(result, Ok(Value::Int(0)));
}

// ══════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════

#[test]
fn test_inner_remember_not_visible_after_when() {
    let err = run_err("to main() { when true { remember y = 1; } say y; }");
    assert_eq!(err, EvalError::UndefinedVariable { name: "y".into() });
}

#[test]
fn test_reassignment_of_outer_variable_persists() {
    assert_eq!(
        main_value("remember x = 1; when true { x = 2; } give back x;"),
        Value::Int(2)
    );
}

#[test]
fn test_assign_undeclared_is_error() {
    assert_eq!(
        run_err("to main() { ghost = 1; }"),
        EvalError::UndefinedVariable {
            name: "ghost".into()
        }
    );
}

#[test]
fn test_otherwise_branch() {
    assert_eq!(
        main_output(r#"when 0 { say "then"; } otherwise { say "else"; }"#),
        lines(&["else"])
    );
    assert_eq!(
        main_output(r#"when 0.0 { say "floats are truthy"; }"#),
        lines(&["floats are truthy"])
    );
}

#[test]
fn test_repeat_runs_in_current_scope() {
    assert_eq!(
        main_value("remember total = 0; repeat 4 times { remember step = 2; total = total + step; } give back total + step;"),
        Value::Int(10)
    );
}

#[test]
fn test_repeat_count_coercion() {
    assert_eq!(main_output("repeat 2.9 times { say \"x\"; }"), lines(&["x", "x"]));
    assert_eq!(main_output("repeat 0 - 3 times { say \"x\"; }"), Vec::<String>::new());
    assert_eq!(main_output("repeat true times { say \"x\"; }"), lines(&["x"]));
    assert_eq!(
        main_output("repeat 2 measured in laps times { say \"lap\"; }"),
        lines(&["lap", "lap"])
    );
    assert!(matches!(
        run_err("to main() { repeat \"3\" times { } }"),
        EvalError::TypeMismatch { .. }
    ));
}

#[test]
fn test_give_back_from_inside_repeat() {
    assert_eq!(
        main_value("remember i = 0; repeat 10 times { i = i + 1; when i == 3 { give back i; } } give back 0;"),
        Value::Int(3)
    );
}

#[test]
fn test_attempt_swallows_complaint() {
    let (value, output) = run_ok(
        r#"to main() {
               say "before";
               attempt safely { complain "boom"; } or reassure "ok";
               say "after";
               give back 1;
           }"#,
    );
    assert_eq!(value, Value::Int(1));
    assert_eq!(output, lines(&["before", "ok", "after"]));
}

#[test]
fn test_attempt_without_error_prints_nothing_extra() {
    assert_eq!(
        main_output(r#"attempt safely { say "fine"; } or reassure "ok";"#),
        lines(&["fine"])
    );
}

#[test]
fn test_attempt_catches_any_runtime_error() {
    assert_eq!(
        main_output(r#"attempt safely { say 1 / 0; } or reassure "caught";"#),
        lines(&["caught"])
    );
    assert_eq!(
        main_output(r#"attempt safely { missing(); } or reassure "caught";"#),
        lines(&["caught"])
    );
}

#[test]
fn test_attempt_scope_is_discarded() {
    let err = run_err(
        r#"to main() { attempt safely { remember inside = 1; } or reassure "x"; say inside; }"#,
    );
    assert_eq!(
        err,
        EvalError::UndefinedVariable {
            name: "inside".into()
        }
    );
}

#[test]
fn test_give_back_inside_attempt_returns() {
    assert_eq!(
        main_value(r#"attempt safely { give back 9; } or reassure "x"; give back 0;"#),
        Value::Int(9)
    );
}

#[test]
fn test_uncaught_complaint() {
    assert_eq!(
        run_err(r#"to main() { complain "I am upset"; }"#),
        EvalError::Complaint {
            message: "I am upset".into()
        }
    );
}

#[test]
fn test_division_by_zero_reported() {
    let (result, output) = run("to main() { say 1 / 0; }");
    assert_eq!(result, Err(EvalError::DivisionByZero));
    assert!(output.is_empty());
}

#[test]
fn test_emote_statement() {
    assert_eq!(
        main_output(r#"@happy say "yay";"#),
        lines(&["@happy", "yay"])
    );
    assert_eq!(
        main_output(r#"@excited(level = 1 + 2, why = "tests") say "go";"#),
        lines(&["@excited(level=3, why=tests)", "go"])
    );
}

#[test]
fn test_function_emote_tag_is_inert() {
    let (_, output) = run_ok(r#"@cheerful to main() { say "hi"; }"#);
    assert_eq!(output, lines(&["hi"]));
}

#[test]
fn test_string_escapes_interpreted() {
    assert_eq!(
        main_value(r#"give back "line\nnext \"quoted\"";"#),
        Value::String("line\nnext \"quoted\"".into())
    );
}

#[test]
fn test_builtin_calls() {
    assert_eq!(
        main_output(r#"print("a", 1, 2.0, [1, 2], thanks("Bo"));"#),
        lines(&["a 1 2.0 [1, 2] Thanks to Bo"])
    );
    assert_eq!(main_value(r#"give back toInt("12") + len([1, 2, 3]);"#), Value::Int(15));
    assert_eq!(main_value("give back toString(3) + \"!\";"), Value::String("3!".into()));
}

// ══════════════════════════════════════════════════════════════════════
// Consent
// ══════════════════════════════════════════════════════════════════════

#[test]
fn test_consent_granted_by_default() {
    assert_eq!(
        main_output(r#"only if okay "camera" { say "click"; }"#),
        lines(&["Consent granted: camera", "click"])
    );
}

#[test]
fn test_consent_decision_cached_for_children() {
    let mut asked = 0;
    let evaluator = Evaluator::new().with_consent_policy(move |_: &str| {
        asked += 1;
        assert_eq!(asked, 1, "policy consulted more than once");
        true
    });
    let (result, output) = run_with(
        evaluator,
        r#"to main() {
               only if okay "mic" {
                   only if okay "mic" { say "nested"; }
               }
           }"#,
    );
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(output, lines(&["Consent granted: mic", "nested"]));
}

#[test]
fn test_consent_cached_in_requesting_scope_only() {
    let evaluator = Evaluator::new().with_consent_policy(|_: &str| true);
    let (_, output) = run_with(
        evaluator,
        r#"to main() {
               when true { only if okay "gps" { } }
               only if okay "gps" { }
           }"#,
    );
    // the first grant was cached in the `when` scope, which is gone
    assert_eq!(output, lines(&["Consent granted: gps", "Consent granted: gps"]));
}

#[test]
fn test_consent_denied_is_error() {
    let (result, output) = run_with(
        Evaluator::new().with_consent_policy(DenyAll),
        r#"to main() { only if okay "contacts" { say "reading"; } }"#,
    );
    assert_eq!(
        result,
        Err(EvalError::ConsentDenied {
            permission: "contacts".into()
        })
    );
    assert_eq!(output, lines(&["Consent denied: contacts"]));
}

#[test]
fn test_consent_denial_caught_by_attempt() {
    let (result, output) = run_with(
        Evaluator::new().with_consent_policy(|perm: &str| perm != "location"),
        r#"to main() {
               attempt safely {
                   only if okay "location" { say "tracking"; }
               } or reassure "Skipping location";
               only if okay "camera" { say "photo"; }
           }"#,
    );
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(
        output,
        lines(&[
            "Consent denied: location",
            "Skipping location",
            "Consent granted: camera",
            "photo",
        ])
    );
}

#[test]
fn test_prompted_consent_asks_once_per_permission() {
    let answers = std::io::Cursor::new("Yes\nn\n");
    let (result, output) = run_with(
        Evaluator::new().with_consent_policy(Prompt::new(answers, std::io::sink())),
        r#"to main() {
               only if okay "camera" { say "first photo"; }
               only if okay "camera" { say "second photo"; }
               attempt safely {
                   only if okay "gps" { say "tracking"; }
               } or reassure "No tracking";
           }"#,
    );
    assert_eq!(result, Ok(Value::Unit));
    assert_eq!(
        output,
        lines(&[
            "Consent granted: camera",
            "first photo",
            "second photo",
            "Consent denied: gps",
            "No tracking",
        ])
    );
}

#[test]
fn test_prompted_consent_without_answer_is_denied() {
    let answers = std::io::Cursor::new("");
    let (result, output) = run_with(
        Evaluator::new().with_consent_policy(Prompt::new(answers, std::io::sink())),
        r#"to main() { only if okay "contacts" { say "reading"; } }"#,
    );
    assert_eq!(
        result,
        Err(EvalError::ConsentDenied {
            permission: "contacts".into()
        })
    );
    assert_eq!(output, lines(&["Consent denied: contacts"]));
}

// ══════════════════════════════════════════════════════════════════════
// Units
// ══════════════════════════════════════════════════════════════════════

#[test]
fn test_unit_propagation() {
    let (value, output) = run_ok(
        "to main() {
             remember a = 5 measured in km;
             remember b = 3 measured in km;
             say a + b;
             give back a + b;
         }",
    );
    assert_eq!(value, Value::Int(8).measured("km"));
    assert_eq!(output, lines(&["8 km"]));
}

#[test]
fn test_unit_mismatch() {
    let err = run_err(
        "to main() {
             remember d = 5 measured in km;
             remember t = 2 measured in hours;
             say d + t;
         }",
    );
    assert_eq!(
        err,
        EvalError::UnitMismatch {
            left: "km".into(),
            right: "hours".into()
        }
    );
}

#[test]
fn test_unequal_measured_values_take_the_otherwise_path() {
    let (value, _) = run_ok(
        r#"to main() {
               when (1 measured in km) == (2 measured in km) { give back "equal"; }
               give back "differ";
           }"#,
    );
    assert_eq!(value, Value::String("differ".into()));
}

#[test]
fn test_measured_comparison_drives_when() {
    assert_eq!(
        main_value(
            r#"remember a = 1 measured in km;
               remember b = 3 measured in km;
               when a > b { give back "longer"; } otherwise { give back "shorter"; }"#
        ),
        Value::String("shorter".into())
    );
}

#[test]
fn test_equality_across_units_is_false() {
    assert_eq!(
        main_value("give back (1 measured in km) == (1 measured in hours);"),
        Value::Bool(false)
    );
    assert_eq!(
        main_value("give back (1 measured in km) != (1 measured in hours);"),
        Value::Bool(true)
    );
}

#[test]
fn test_measured_expression_outside_remember() {
    assert_eq!(
        main_value("give back (2 measured in m) * (4 measured in m);"),
        Value::Int(8).measured("m")
    );
}

// ══════════════════════════════════════════════════════════════════════
// Output plumbing
// ══════════════════════════════════════════════════════════════════════

#[test]
fn test_error_serializes_with_kind_tag() {
    let err = run_err("to main() { complain \"x\"; }");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "complaint");
    assert_eq!(json["message"], "x");
}
