use indoc::indoc;
use rstest::{fixture, rstest};
use usage_grammar::grammar::Arguments;
use usage_grammar::grammar::pattern::Value;

use crate::common::{args, flag, run, text};

// ========================================
// Commands
// ========================================

#[rstest]
#[case::required("Usage: prog add", "add", &[("add", flag(true))])]
#[case::optional_absent("Usage: prog [add]", "", &[("add", flag(false))])]
#[case::optional_present("Usage: prog [add]", "add", &[("add", flag(true))])]
#[case::either_first("Usage: prog (add|rm)", "add", &[("add", flag(true)), ("rm", flag(false))])]
#[case::either_second("Usage: prog (add|rm)", "rm", &[("add", flag(false)), ("rm", flag(true))])]
#[case::sequence("Usage: prog a b", "a b", &[("a", flag(true)), ("b", flag(true))])]
fn commands(#[case] doc: &str, #[case] argv: &str, #[case] expected: &[(&str, Value)]) {
    assert_eq!(run(doc, argv).unwrap(), args(expected));
}

// ========================================
// Options declared in the description section
// ========================================

#[fixture]
fn grep_like_doc() -> &'static str {
    indoc! {"
        Usage: prog [-vqr] [FILE]
               prog INPUT OUTPUT
               prog --help

        Options:
          -v  print status messages
          -q  report only file names
          -r  show all occurrences of the same error
          --help

    "}
}

#[rstest]
#[case::flag_and_file("-v file.py", true, Some("file.py"))]
#[case::flag_only("-v", true, None)]
#[case::nothing("", false, None)]
fn described_options(
    grep_like_doc: &str,
    #[case] argv: &str,
    #[case] verbose: bool,
    #[case] file: Option<&str>,
) {
    assert_eq!(
        run(grep_like_doc, argv).unwrap(),
        args(&[
            ("-v", flag(verbose)),
            ("-q", flag(false)),
            ("-r", flag(false)),
            ("--help", flag(false)),
            ("FILE", file.map_or(Value::Unset, text)),
            ("INPUT", Value::Unset),
            ("OUTPUT", Value::Unset),
        ])
    );
}

#[rstest]
fn second_usage_line_binds_its_arguments(grep_like_doc: &str) {
    let arguments = run(grep_like_doc, "in.txt out.txt").unwrap();
    assert_eq!(arguments.get_str("INPUT"), Some("in.txt"));
    assert_eq!(arguments.get_str("OUTPUT"), Some("out.txt"));
    assert_eq!(arguments.get("FILE"), Some(&Value::Unset));
}

#[test]
fn valued_option_without_default_is_null() {
    let doc = indoc! {"
        usage: prog [options]

        -a        Add
        -m <msg>  Message

    "};
    assert_eq!(
        run(doc, "-a").unwrap(),
        args(&[("-m", Value::Unset), ("-a", flag(true))])
    );
    assert_eq!(run(doc, "-m hi").unwrap().get_str("-m"), Some("hi"));
}

#[rstest]
#[case::absent("", "localhost:6283")]
#[case::short_form("-a example.org:80", "example.org:80")]
#[case::long_prefix("--addr=example.org:80", "example.org:80")]
fn default_from_description(#[case] argv: &str, #[case] expected: &str) {
    let doc = indoc! {"
        usage: tau [-a <host:port>]

        -a, --address <host:port>  TCP address [default: localhost:6283].

    "};
    assert_eq!(
        run(doc, argv).unwrap(),
        args(&[("--address", text(expected))])
    );
}

// ========================================
// Options used only in the usage pattern
// ========================================

#[rstest]
#[case::long_flag("usage: prog --hello", "--hello", &[("--hello", flag(true))])]
#[case::long_valued_absent("usage: prog [--hello=<world>]", "", &[("--hello", Value::Unset)])]
#[case::long_valued_present(
    "usage: prog [--hello=<world>]",
    "--hello wrld",
    &[("--hello", text("wrld"))]
)]
#[case::short_absent("usage: prog [-o]", "", &[("-o", flag(false))])]
#[case::short_present("usage: prog [-o]", "-o", &[("-o", flag(true))])]
#[case::short_cluster(
    "usage: prog [-opr]",
    "-op",
    &[("-o", flag(true)), ("-p", flag(true)), ("-r", flag(false))]
)]
#[case::short_or_long(
    "usage: git [-v | --verbose]",
    "-v",
    &[("-v", flag(true)), ("--verbose", flag(false))]
)]
#[case::after_command(
    "usage: git remote [-v | --verbose]",
    "remote -v",
    &[("remote", flag(true)), ("-v", flag(true)), ("--verbose", flag(false))]
)]
#[case::exact_beats_prefix(
    "usage: prog --aabb | --aa",
    "--aa",
    &[("--aabb", flag(false)), ("--aa", flag(true))]
)]
#[case::pattern_value_is_not_default(
    "usage: prog [--file=<f>]\n\n--file <a>",
    "",
    &[("--file", Value::Unset)]
)]
fn options_without_description(
    #[case] doc: &str,
    #[case] argv: &str,
    #[case] expected: &[(&str, Value)],
) {
    assert_eq!(run(doc, argv).unwrap(), args(expected));
}

// ========================================
// Special tokens and empty patterns
// ========================================

#[rstest]
#[case::double_dash_given(
    "usage: prog [-o] [--] <arg>\n\n-o",
    "-- -o",
    &[("-o", flag(false)), ("<arg>", text("-o")), ("--", flag(true))]
)]
#[case::double_dash_omitted(
    "/usage: prog [-o] [--] <arg>\n\n-o",
    "-o 1",
    &[("-o", flag(true)), ("<arg>", text("1")), ("--", flag(false))]
)]
#[case::single_dash_given("usage: prog [-]", "-", &[("-", flag(true))])]
#[case::single_dash_omitted("usage: prog [-]", "", &[("-", flag(false))])]
#[case::empty_pattern("usage: prog", "", &[])]
#[case::empty_first_alternative(
    "usage: prog \n prog <a> <b>",
    "1 2",
    &[("<a>", text("1")), ("<b>", text("2"))]
)]
#[case::empty_alternative_chosen(
    "usage: prog \n prog <a> <b>",
    "",
    &[("<a>", Value::Unset), ("<b>", Value::Unset)]
)]
#[case::empty_second_alternative(
    "usage: prog <a> <b> \n prog",
    "",
    &[("<a>", Value::Unset), ("<b>", Value::Unset)]
)]
fn special_tokens(#[case] doc: &str, #[case] argv: &str, #[case] expected: &[(&str, Value)]) {
    assert_eq!(run(doc, argv).unwrap(), args(expected));
}

#[test]
fn json_output_of_a_realistic_document() {
    let doc = indoc! {"
        Naval Fate.

        Usage:
          naval_fate ship new <name>...
          naval_fate ship <name> move <x> <y> [--speed=<kn>]
          naval_fate mine (set|remove) <x> <y> [--moored|--drifting]
          naval_fate -h | --help
          naval_fate --version

        Options:
          -h --help     Show this screen.
          --version     Show version.
          --speed=<kn>  Speed in knots [default: 10].
          --moored      Moored (anchored) mine.
          --drifting    Drifting mine.
    "};

    let arguments: Arguments = run(doc, "ship Guardian move 10 50 --speed=20").unwrap();
    let json = serde_json::to_value(&arguments).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "--drifting": false,
            "--help": false,
            "--moored": false,
            "--speed": "20",
            "--version": false,
            "<name>": ["Guardian"],
            "<x>": "10",
            "<y>": "50",
            "mine": false,
            "move": true,
            "new": false,
            "remove": false,
            "set": false,
            "ship": true
        })
    );
}
