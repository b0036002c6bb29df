//! Argv resolution: raw tokens to the observed option and argument leaves.

use std::collections::VecDeque;

use tracing::debug;

use super::UsageError;
use super::option_resolver::{OptionTable, ResolveMode, resolve_long, resolve_shorts};
use super::pattern::Leaf;

/// Resolve raw argv tokens into observed leaves.
///
/// - `--` turns itself and everything after it into positionals
/// - `--name[=value]` resolves as a long option, accepting unique prefixes
/// - `-abc` resolves as a cluster of short options
/// - anything else (including a lone `-`) is a positional
///
/// With `options_first`, the first positional also ends option parsing.
pub fn parse_argv<I, S>(
    argv: I,
    options: &mut OptionTable,
    options_first: bool,
) -> Result<Vec<Leaf>, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens: VecDeque<String> = argv.into_iter().map(Into::into).collect();
    let mut parsed = Vec::new();

    while let Some(token) = tokens.pop_front() {
        if token == "--" || (options_first && !is_option_token(&token)) {
            parsed.push(Leaf::positional(token));
            parsed.extend(tokens.drain(..).map(Leaf::positional));
            break;
        }

        if token.starts_with("--") {
            let leaf = resolve_long(options, &token, ResolveMode::Argv, || tokens.pop_front())?;
            parsed.push(leaf);
        } else if is_option_token(&token) {
            let leaves =
                resolve_shorts(options, &token, ResolveMode::Argv, || tokens.pop_front())?;
            parsed.extend(leaves);
        } else {
            parsed.push(Leaf::positional(token));
        }
    }

    debug!(observed = parsed.len(), options_first, "resolved argv");
    Ok(parsed)
}

fn is_option_token(token: &str) -> bool {
    token.starts_with('-') && token != "-"
}
