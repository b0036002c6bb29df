//! Text splitting around the grammar: the `usage:` block, its formal form,
//! and the option-description lines.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::LanguageError;
use super::option_resolver::{DeclaredOption, OptionTable};
use super::pattern::{OptionSpec, Value};

static USAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)usage:").unwrap());
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^ *-").unwrap());
static OPTION_WORD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,=]+").unwrap());
static DEFAULT_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[default: (.*)\]").unwrap());

/// The `usage:` section of `doc`: from the marker up to the first blank
/// line, trimmed. The marker must occur exactly once (case-insensitive).
pub fn printable_usage(doc: &str) -> Result<String, LanguageError> {
    let mut markers = USAGE_MARKER.find_iter(doc);
    let marker = markers.next().ok_or(LanguageError::UsageNotFound)?;
    if markers.next().is_some() {
        return Err(LanguageError::MultipleUsage);
    }

    let section = &doc[marker.start()..];
    let usage = BLANK_LINE
        .split(section)
        .next()
        .unwrap_or(section)
        .trim()
        .to_string();
    debug!(lines = usage.lines().count(), "found usage section");
    Ok(usage)
}

/// Turn printable usage into a single grammar expression: every line that
/// starts with the program name becomes one parenthesized alternative.
///
/// `"Usage: prog [-hv] ARG\n prog N M"` becomes `"( [-hv] ARG ) | ( N M )"`.
pub fn formal_usage(printable: &str) -> String {
    let mut words = printable.split_whitespace().skip(1);
    let Some(program) = words.next() else {
        return "( )".to_string();
    };
    let body: Vec<&str> = words
        .map(|word| if word == program { ") | (" } else { word })
        .collect();
    if body.is_empty() {
        "( )".to_string()
    } else {
        format!("( {} )", body.join(" "))
    }
}

/// Declare one option for every line of `doc` that starts with `-` (after
/// optional spaces). Each declaration runs until the next such line.
pub fn parse_doc_options(doc: &str) -> OptionTable {
    let options: OptionTable = OPTION_LINE
        .split(doc)
        .skip(1)
        .map(|chunk| DeclaredOption::parse(&format!("-{chunk}")))
        .collect();
    debug!(count = options.len(), "parsed option descriptions");
    options
}

impl DeclaredOption {
    /// Parse one option description such as
    /// `-h, --help=TOPIC  Show help [default: all]`.
    ///
    /// The declaration part ends at the first double space. Any word in it
    /// that is not `-x` or `--xx` makes the option take a value, whose
    /// default then comes from a case-insensitive `[default: V]` in the
    /// description.
    pub fn parse(description: &str) -> DeclaredOption {
        let description = description.trim();
        let (declaration, help) = description.split_once("  ").unwrap_or((description, ""));

        let mut short = None;
        let mut long = None;
        let mut argcount = 0;
        let mut value = Value::Bool(false);
        for word in OPTION_WORD_SEPARATOR
            .split(declaration)
            .filter(|word| !word.is_empty())
        {
            if word.starts_with("--") {
                long = Some(word);
            } else if word.starts_with('-') {
                short = Some(word);
            } else {
                argcount = 1;
                if let Some(default) = DEFAULT_VALUE.captures(help).and_then(|c| c.get(1)) {
                    value = Value::Text(default.as_str().to_string());
                }
            }
        }

        DeclaredOption::with_value(OptionSpec::new(short, long, argcount), value)
    }
}
