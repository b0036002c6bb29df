#![allow(dead_code)]

use usage_grammar::config::Settings;
use usage_grammar::grammar::pattern::Value;
use usage_grammar::grammar::{Arguments, Error, docopt};

pub type Outcome = Result<Arguments, Error>;

/// Function pointer type for asserting expected outcomes in `#[case]` attributes.
pub type OutcomeAssertion = fn(&Outcome);

pub fn assert_usage_error(actual: &Outcome) {
    assert!(
        matches!(actual, Err(e) if e.is_usage_error()),
        "expected usage error, got {:?}",
        actual
    );
}

pub fn assert_language_error(actual: &Outcome) {
    assert!(
        matches!(actual, Err(e) if e.is_language_error()),
        "expected language error, got {:?}",
        actual
    );
}

pub fn assert_help(actual: &Outcome) {
    assert!(
        matches!(actual, Err(Error::Help(_))),
        "expected help request, got {:?}",
        actual
    );
}

/// Run `doc` against whitespace-separated `argv` with default settings.
pub fn run(doc: &str, argv: &str) -> Outcome {
    run_with(doc, argv, &Settings::default())
}

pub fn run_with(doc: &str, argv: &str, settings: &Settings) -> Outcome {
    docopt(doc, argv.split_whitespace(), settings)
}

pub fn args(entries: &[(&str, Value)]) -> Arguments {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn values(items: &[&str]) -> Value {
    Value::Values(items.iter().map(|s| s.to_string()).collect())
}

pub fn flag(on: bool) -> Value {
    Value::Bool(on)
}
