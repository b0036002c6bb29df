use indoc::indoc;
use rstest::rstest;
use usage_grammar::grammar::{Error, LanguageError, OptionError, UsageError};

use crate::common::{
    OutcomeAssertion, assert_help, assert_language_error, assert_usage_error, run,
};

const GREP_LIKE: &str = indoc! {"
    Usage: prog [-vqr] [FILE]
           prog INPUT OUTPUT
           prog --help

    Options:
      -v  print status messages
      -q  report only file names
      -r  show all occurrences of the same error
      --help

"};

// ========================================
// Option errors
// ========================================

#[rstest]
#[case::unknown_long("Usage: prog", "--non-existent", assert_usage_error as OutcomeAssertion)]
#[case::ambiguous_prefix(
    "Usage: prog [--version --verbose]\n\n--version\n--verbose",
    "--ver",
    assert_usage_error as OutcomeAssertion
)]
#[case::usage_omits_value("Usage: prog --long\n\n--long ARG", "", assert_language_error as OutcomeAssertion)]
#[case::argv_omits_value("Usage: prog --long ARG\n\n--long ARG", "--long", assert_usage_error as OutcomeAssertion)]
#[case::usage_adds_value("Usage: prog --long=ARG\n\n--long", "", assert_language_error as OutcomeAssertion)]
#[case::argv_adds_value("Usage: prog --long\n\n--long", "--long=ARG", assert_usage_error as OutcomeAssertion)]
#[case::duplicate_long("usage: prog --dup\n\n--dup  one\n--dup  two", "--dup", assert_language_error as OutcomeAssertion)]
fn long_option_errors(#[case] doc: &str, #[case] argv: &str, #[case] assertion: OutcomeAssertion) {
    assertion(&run(doc, argv));
}

#[rstest]
#[case::duplicate_short("Usage: prog -x\n\n-x  this\n-x  that", "", assert_language_error as OutcomeAssertion)]
#[case::unknown_short("Usage: prog", "-x", assert_usage_error as OutcomeAssertion)]
#[case::unknown_short_with_options("Usage: prog [-o]\n\n-o", "-x", assert_usage_error as OutcomeAssertion)]
#[case::usage_omits_value("Usage: prog -o\n\n-o ARG", "", assert_language_error as OutcomeAssertion)]
#[case::argv_omits_value("Usage: prog -o ARG\n\n-o ARG", "-o", assert_usage_error as OutcomeAssertion)]
fn short_option_errors(#[case] doc: &str, #[case] argv: &str, #[case] assertion: OutcomeAssertion) {
    assertion(&run(doc, argv));
}

#[test]
fn ambiguous_prefix_lists_candidates() {
    let Err(Error::Usage { error, .. }) =
        run("Usage: prog [--version --verbose]\n\n--version\n--verbose", "--ver")
    else {
        panic!("expected usage error");
    };
    assert_eq!(
        error,
        UsageError::Option(OptionError::AmbiguousPrefix {
            option: "--ver".into(),
            candidates: vec!["--version".into(), "--verbose".into()],
        })
    );
}

// ========================================
// Usage language errors
// ========================================

#[rstest]
#[case::unclosed("Usage: prog [a [b]", LanguageError::UnmatchedBracket("[".into()))]
#[case::stray_closer("Usage: prog [a [b] ] c )", LanguageError::UnexpectedEnding(")".into()))]
#[case::no_marker("prog [-o]", LanguageError::UsageNotFound)]
#[case::two_markers("usage: prog\n\nusage: prog -x", LanguageError::MultipleUsage)]
fn language_errors(#[case] doc: &str, #[case] expected: LanguageError) {
    assert_eq!(run(doc, "").unwrap_err(), Error::Language(expected));
}

#[test]
fn language_errors_come_before_argv() {
    let error = run("Usage: prog [a [b]", "--not-declared anything").unwrap_err();
    assert!(error.is_language_error());
    assert_eq!(error.exit_code(), 2);
}

// ========================================
// Usage errors
// ========================================

#[rstest]
#[case::wrong_order("Usage: prog a b", "b a")]
#[case::left_over("Usage: prog a", "a b")]
#[case::double_dash_makes_positional("usage: prog [-o] <arg>\n\n-o", "-- -o")]
#[case::grep_like_extra_argument(GREP_LIKE, "-v input.py output.py")]
#[case::grep_like_unknown_option(GREP_LIKE, "--fake")]
fn usage_errors(#[case] doc: &str, #[case] argv: &str) {
    let outcome = run(doc, argv);
    assert_usage_error(&outcome);
    assert_eq!(outcome.unwrap_err().exit_code(), 1);
}

#[test]
fn usage_error_carries_printable_usage() {
    let error = run("Usage: prog a b", "b a").unwrap_err();
    assert_eq!(
        error,
        Error::Usage {
            error: UsageError::NoMatch,
            usage: "Usage: prog a b".into(),
        }
    );
    assert!(error.to_string().ends_with("\nUsage: prog a b"));
}

#[test]
fn help_wins_over_a_failed_match() {
    assert_help(&run(GREP_LIKE, "--help"));
    assert_help(&run(GREP_LIKE, "-v --help input.py output.py"));
}
