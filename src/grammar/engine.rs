//! End-to-end entry point: from a help document and argv to an argument map.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::argv_parser::parse_argv;
use super::doc_parser::{formal_usage, parse_doc_options, printable_usage};
use super::fixer::fix;
use super::option_resolver::OptionTable;
use super::pattern::{Grammar, Leaf, Value};
use super::pattern_matcher::{MatchState, match_grammar};
use super::pattern_parser::parse_pattern;
use super::{Error, UsageError};
use crate::config::Settings;

/// Parse `argv` against the usage described by `doc`.
///
/// Language errors are reported before argv is looked at. Help and version
/// requests come back as [`Error::Help`] and [`Error::Version`]; the caller
/// decides whether to print and exit.
pub fn docopt<I, S>(doc: &str, argv: I, settings: &Settings) -> Result<Arguments, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let usage = printable_usage(doc)?;
    let mut options = parse_doc_options(doc);
    let mut grammar = parse_pattern(&formal_usage(&usage), &mut options)?;

    let observed = match parse_argv(argv, &mut options, settings.options_first) {
        Ok(observed) => observed,
        Err(error) => return Err(Error::Usage { error, usage }),
    };
    extras(doc, &observed, settings)?;

    fix(&mut grammar);
    let Some(state) = match_grammar(&grammar, observed).filter(MatchState::is_complete) else {
        return Err(Error::Usage {
            error: UsageError::NoMatch,
            usage,
        });
    };

    let arguments = Arguments::assemble(&options, &grammar, state.collected);
    debug!(entries = arguments.len(), "assembled arguments");
    Ok(arguments)
}

/// Help and version are keyed on the option's name, so `-h` declared as
/// `-h, --host` is not a help request.
fn extras(doc: &str, observed: &[Leaf], settings: &Settings) -> Result<(), Error> {
    let present = |names: &[&str]| {
        observed.iter().any(|leaf| {
            leaf.option_spec()
                .and_then(|spec| spec.name())
                .is_some_and(|name| names.contains(&name))
        })
    };

    if settings.help && present(&["-h", "--help"]) {
        return Err(Error::Help(doc.trim().to_string()));
    }
    if let Some(version) = &settings.version
        && present(&["--version"])
    {
        return Err(Error::Version(version.clone()));
    }
    Ok(())
}

/// Names of the usage mapped to their final values, sorted by name.
///
/// Options and leaves that did not match keep their defaults: `false` for
/// flags and commands, `null` for values, and `0` or `[]` for repeatable
/// ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Arguments {
    values: BTreeMap<String, Value>,
}

impl Arguments {
    /// Later sources win: declared options, then the grammar's own leaves,
    /// then the matched leaves.
    fn assemble(options: &OptionTable, grammar: &Grammar, collected: Vec<Leaf>) -> Self {
        let declared = options
            .iter()
            .filter_map(|option| Some((option.name()?.to_string(), option.value.clone())));
        let canonical = grammar
            .flat_leaves()
            .into_iter()
            .filter_map(|leaf| Some((leaf.name()?.to_string(), leaf.value.clone())));
        let matched = collected
            .into_iter()
            .filter_map(|leaf| Some((leaf.name()?.to_string(), leaf.value)));

        declared.chain(canonical).chain(matched).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// `true` for a matched flag or command, or a positive count.
    pub fn get_bool(&self, name: &str) -> bool {
        match self.get(name) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Count(count)) => *count > 0,
            _ => false,
        }
    }

    /// Occurrences of a flag or command. A plain matched flag counts once.
    pub fn get_count(&self, name: &str) -> u64 {
        match self.get(name) {
            Some(Value::Count(count)) => *count,
            Some(Value::Bool(true)) => 1,
            _ => 0,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Every value bound to `name`; a single value is a one-element list.
    pub fn get_values(&self, name: &str) -> Vec<&str> {
        match self.get(name) {
            Some(Value::Values(values)) => values.iter().map(String::as_str).collect(),
            Some(Value::Text(text)) => vec![text.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Arguments {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
