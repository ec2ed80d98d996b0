//! End-to-end pipeline tests: source → lex → parse → evaluate.

use pretty_assertions::assert_eq;
use woke::{run_source, Consent, Error, EvalConfig, EvalError, Outcome, RunOptions, SourceFile, Value};

// ══════════════════════════════════════════════════════════════════════════════
// Canonical WokeLang sources
// ══════════════════════════════════════════════════════════════════════════════

const GREETER: &str = r#"
thanks to {
    "Ada" → "the first program";
}

to greet(name: String) -> String {
    hello "warming up";
    give back "Hello, " + name + "!";
    goodbye "all done";
}

to main() {
    say greet("friend");
}
"#;

const TRIP: &str = r#"
// distances add up only when the units agree
const LEG: Int = 40;

to total(legs: Int) {
    remember distance = 0 measured in km;
    repeat legs times {
        distance = distance + (LEG measured in km);
    }
    give back distance;
}

to main() {
    remember trip = total(3);
    @proud(distance = trip) say "Trip planned";
    give back trip;
}
"#;

const CAREFUL: &str = r#"
worker uploader {
    say "uploading";
}

to main() {
    only if okay "camera" {
        spawn worker uploader;
    }
    attempt safely {
        complain "the network is tired";
    } or reassure "We'll try again later";
    give back "finished";
}
"#;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn run(source: &str) -> Result<Outcome, Error> {
    run_source("test.woke", source, &RunOptions::default())
}

fn run_ok(source: &str) -> Outcome {
    match run(source) {
        Ok(outcome) => outcome,
        Err(err) => panic!("pipeline failed: {err}"),
    }
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|s| s.to_string()).collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Successful runs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_greeter() {
    let outcome = run_ok(GREETER);
    assert_eq!(outcome.value, Value::Unit);
    assert_eq!(
        outcome.output,
        lines(&[
            "Thanks to Ada for the first program",
            "[greet] warming up",
            "[greet] all done",
            "Hello, friend!",
        ])
    );
}

#[test]
fn test_trip_keeps_units() {
    let outcome = run_ok(TRIP);
    assert_eq!(outcome.value, Value::Int(120).measured("km"));
    assert_eq!(
        outcome.output,
        lines(&["@proud(distance=120 km)", "Trip planned"])
    );
}

#[test]
fn test_careful_program() {
    let outcome = run_ok(CAREFUL);
    assert_eq!(outcome.value, Value::String("finished".into()));
    assert_eq!(
        outcome.output,
        lines(&[
            "Registered worker: uploader",
            "Consent granted: camera",
            "Spawning worker: uploader",
            "We'll try again later",
        ])
    );
}

#[test]
fn test_deny_consent_option() {
    let options = RunOptions {
        consent: Consent::Deny,
        ..RunOptions::default()
    };
    let err = run_source("test.woke", CAREFUL, &options).unwrap_err();
    assert_eq!(
        err,
        Error::Runtime(EvalError::ConsentDenied {
            permission: "camera".into()
        })
    );
}

#[test]
fn test_consent_defaults_to_grant() {
    assert_eq!(RunOptions::default().consent, Consent::Grant);
}

#[test]
fn test_call_depth_option() {
    let options = RunOptions {
        config: EvalConfig {
            max_call_depth: 3,
            ..EvalConfig::default()
        },
        ..RunOptions::default()
    };
    let err = run_source(
        "test.woke",
        "to loop_forever() { loop_forever(); } to main() { loop_forever(); }",
        &options,
    )
    .unwrap_err();
    assert_eq!(err, Error::Runtime(EvalError::StackOverflow { limit: 3 }));
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let first = run_ok(TRIP);
    for _ in 0..20 {
        assert_eq!(run_ok(TRIP), first);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Failures by stage
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_lex_error_stage() {
    let err = run("to main() { say \"unterminated; }").unwrap_err();
    match err {
        Error::Lex(diag) => assert_eq!(diag.code.to_string(), "E102"),
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn test_parse_error_stage() {
    let err = run("to main() { remember = 3; }").unwrap_err();
    match err {
        Error::Parse(diag) => {
            assert_eq!(diag.file, "test.woke");
            assert_eq!(diag.code.to_string(), "E200");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_runtime_error_stage() {
    let err = run("to main() { say 1 / 0; }").unwrap_err();
    assert_eq!(err, Error::Runtime(EvalError::DivisionByZero));
    assert_eq!(err.to_string(), "division by zero");
}

#[test]
fn test_error_json_names_stage() {
    let err = run("to main() { complain \"sad\"; }").unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["stage"], "runtime");
    assert_eq!(json["error"]["kind"], "complaint");
    assert_eq!(json["error"]["message"], "sad");

    let err = run("to main() {").unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["stage"], "parse");
    assert_eq!(json["error"]["code"], 201);
}

// ══════════════════════════════════════════════════════════════════════════════
// Dump helpers
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_tokens_helper() {
    let sf = SourceFile::new("t.woke", "say 1;");
    let tokens = woke::tokens(&sf).unwrap();
    let texts: Vec<String> = tokens.iter().map(|t| t.kind.to_string()).collect();
    assert_eq!(texts, vec!["say", "1", ";", "end of file"]);
}

#[test]
fn test_parse_helper_serializes() {
    let sf = SourceFile::new("t.woke", "to main() { give back 1; }");
    let program = woke::parse(&sf).unwrap();
    let json = serde_json::to_value(&program).unwrap();
    assert!(json["items"].is_array());
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
}
