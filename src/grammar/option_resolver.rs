//! Resolution of `--long[=value]` and `-abc` tokens against the declared
//! option table.
//!
//! The same code serves two callers. The grammar parser resolves options
//! written in the usage text ([`ResolveMode::Grammar`]): unknown options are
//! declared on the fly and leaves keep their declared defaults. The argv
//! resolver ([`ResolveMode::Argv`]) rejects unknown options, accepts unique
//! long-option prefixes, and binds the observed values.

use tracing::debug;

use super::OptionError;
use super::pattern::{Leaf, OptionSpec, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    Grammar,
    Argv,
}

/// An option as declared by an option-description line, with its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredOption {
    pub spec: OptionSpec,
    pub value: Value,
}

impl DeclaredOption {
    /// Declare `spec` with no explicit default.
    pub fn new(spec: OptionSpec) -> Self {
        Self {
            value: spec.initial_value(),
            spec,
        }
    }

    pub fn with_value(spec: OptionSpec, value: Value) -> Self {
        Self {
            value: spec.normalize(value),
            spec,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.spec.name()
    }

    pub fn to_leaf(&self) -> Leaf {
        Leaf::from_spec(self.spec.clone(), self.value.clone())
    }
}

/// The set of known options, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionTable {
    options: Vec<DeclaredOption>,
}

impl OptionTable {
    pub fn new(options: Vec<DeclaredOption>) -> Self {
        Self { options }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeclaredOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn push(&mut self, option: DeclaredOption) {
        self.options.push(option);
    }

    /// One leaf per declared option, carrying its default.
    pub fn leaves(&self) -> Vec<Leaf> {
        self.options.iter().map(DeclaredOption::to_leaf).collect()
    }

    fn with_long(&self, long: &str) -> Vec<DeclaredOption> {
        self.select(|spec| spec.long.as_deref() == Some(long))
    }

    fn with_long_prefix(&self, prefix: &str) -> Vec<DeclaredOption> {
        self.select(|spec| spec.long.as_deref().is_some_and(|l| l.starts_with(prefix)))
    }

    fn with_short(&self, short: &str) -> Vec<DeclaredOption> {
        self.select(|spec| spec.short.as_deref() == Some(short))
    }

    fn select(&self, keep: impl Fn(&OptionSpec) -> bool) -> Vec<DeclaredOption> {
        self.options
            .iter()
            .filter(|o| keep(&o.spec))
            .cloned()
            .collect()
    }
}

impl FromIterator<DeclaredOption> for OptionTable {
    fn from_iter<I: IntoIterator<Item = DeclaredOption>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = &'a DeclaredOption;
    type IntoIter = std::slice::Iter<'a, DeclaredOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Resolve one `--long`, `--long=value` or `--long value` token.
///
/// `next_value` is called at most once, when a value-taking option has no
/// attached `=value`; it should consume and return the following token.
pub fn resolve_long(
    table: &mut OptionTable,
    token: &str,
    mode: ResolveMode,
    next_value: impl FnOnce() -> Option<String>,
) -> Result<Leaf, OptionError> {
    let (raw, mut value) = match token.split_once('=') {
        Some((raw, value)) => (raw, Some(value.to_string())),
        None => (token, None),
    };

    let mut candidates = table.with_long(raw);
    if mode == ResolveMode::Argv && candidates.is_empty() {
        candidates = table.with_long_prefix(raw);
    }
    if candidates.len() > 1 {
        return Err(OptionError::AmbiguousPrefix {
            option: raw.to_string(),
            candidates: candidates.into_iter().filter_map(|o| o.spec.long).collect(),
        });
    }
    let Some(declared) = candidates.pop() else {
        if mode == ResolveMode::Argv {
            return Err(OptionError::NotRecognized(raw.to_string()));
        }
        let option = DeclaredOption::new(OptionSpec::new(
            None,
            Some(raw),
            usize::from(value.is_some()),
        ));
        debug!(option = raw, argcount = option.spec.argcount, "declared option from usage");
        let leaf = option.to_leaf();
        table.push(option);
        return Ok(leaf);
    };

    let name = declared.name().unwrap_or(raw).to_string();
    if declared.spec.takes_value() {
        if value.is_none() {
            value = Some(next_value().ok_or(OptionError::MissingArgument(name))?);
        }
    } else if value.is_some() {
        return Err(OptionError::UnexpectedArgument(name));
    }

    let bound = match mode {
        ResolveMode::Argv => value.map(Value::Text).unwrap_or(Value::Bool(true)),
        ResolveMode::Grammar => declared.value,
    };
    Ok(Leaf::from_spec(declared.spec, bound))
}

/// Resolve one `-abc` cluster of short options.
///
/// A value-taking short option takes the rest of the cluster as its value,
/// or, when it is the last character, the token returned by `next_value`.
pub fn resolve_shorts(
    table: &mut OptionTable,
    token: &str,
    mode: ResolveMode,
    next_value: impl FnOnce() -> Option<String>,
) -> Result<Vec<Leaf>, OptionError> {
    let mut next_value = Some(next_value);
    let mut rest = token.strip_prefix('-').unwrap_or(token);
    let mut parsed = Vec::new();

    while let Some(first) = rest.chars().next() {
        rest = &rest[first.len_utf8()..];
        let short = format!("-{first}");

        let mut candidates = table.with_short(&short);
        if candidates.len() > 1 {
            return Err(OptionError::AmbiguousShort {
                option: short,
                count: candidates.len(),
            });
        }
        let Some(declared) = candidates.pop() else {
            if mode == ResolveMode::Argv {
                return Err(OptionError::NotRecognized(short));
            }
            let option = DeclaredOption::new(OptionSpec::new(Some(&short), None, 0));
            debug!(option = %short, "declared option from usage");
            parsed.push(option.to_leaf());
            table.push(option);
            continue;
        };

        let observed = if declared.spec.takes_value() {
            let value = if rest.is_empty() {
                next_value
                    .take()
                    .and_then(|next| next())
                    .ok_or_else(|| OptionError::MissingArgument(short.clone()))?
            } else {
                let attached = rest.to_string();
                rest = "";
                attached
            };
            Value::Text(value)
        } else {
            Value::Bool(true)
        };

        let bound = match mode {
            ResolveMode::Argv => observed,
            ResolveMode::Grammar => declared.value,
        };
        parsed.push(Leaf::from_spec(declared.spec, bound));
    }

    Ok(parsed)
}
