//! Recursive-descent parser turning a formal usage string such as
//! `( -h | -v [ --file <f> ] )` into a [`Grammar`].
//!
//! - `expr`: one or more `|`-separated sequences; several alternatives
//!   become an `Either`, a multi-atom alternative a `Required`
//! - `seq`: atoms up to `)`, `]`, `|` or the end; `atom ...` becomes `OneOrMore`
//! - `atom`: a group, the `options` shortcut, an option, an argument
//!   (`<name>` or `NAME`) or a command

use tracing::debug;

use super::LanguageError;
use super::option_resolver::{OptionTable, ResolveMode, resolve_long, resolve_shorts};
use super::pattern::{Grammar, Leaf, Pattern};
use super::pattern_lexer::{GrammarToken, TokenStream};

/// Parse `source` into a grammar whose root is a `Required`.
///
/// Options written in the usage but missing from `options` are declared on
/// the fly and added to `options`.
pub fn parse_pattern(source: &str, options: &mut OptionTable) -> Result<Grammar, LanguageError> {
    let mut parser = PatternParser {
        tokens: TokenStream::from_source(source),
        options,
        grammar: Grammar::new(),
    };

    let children = parser.parse_expr()?;
    if !parser.tokens.is_empty() {
        return Err(LanguageError::UnexpectedEnding(parser.tokens.remaining()));
    }

    let mut grammar = parser.grammar;
    grammar.set_root(Pattern::Required(children));
    debug!(leaves = grammar.flat().len(), pattern = %grammar, "parsed usage pattern");
    Ok(grammar)
}

struct PatternParser<'a> {
    tokens: TokenStream,
    options: &'a mut OptionTable,
    grammar: Grammar,
}

impl PatternParser<'_> {
    fn parse_expr(&mut self) -> Result<Vec<Pattern>, LanguageError> {
        let seq = self.parse_seq()?;
        if self.tokens.current() != Some(&GrammarToken::Pipe) {
            return Ok(seq);
        }

        let mut alternatives = Vec::new();
        push_alternative(&mut alternatives, seq);
        while self.tokens.current() == Some(&GrammarToken::Pipe) {
            self.tokens.advance();
            let seq = self.parse_seq()?;
            push_alternative(&mut alternatives, seq);
        }

        if alternatives.len() > 1 {
            Ok(vec![Pattern::Either(alternatives)])
        } else {
            Ok(alternatives)
        }
    }

    fn parse_seq(&mut self) -> Result<Vec<Pattern>, LanguageError> {
        let mut result = Vec::new();
        while let Some(token) = self.tokens.current() {
            if matches!(
                token,
                GrammarToken::CloseParen | GrammarToken::CloseBracket | GrammarToken::Pipe
            ) {
                break;
            }

            let mut atom = self.parse_atom()?;
            if self.tokens.current() == Some(&GrammarToken::Ellipsis) {
                self.tokens.advance();
                // A cluster like `-abc...` repeats as a unit.
                let child = if atom.len() == 1 {
                    atom
                } else {
                    vec![Pattern::Required(atom)]
                };
                atom = vec![Pattern::one_or_more(child)];
            }
            result.extend(atom);
        }
        Ok(result)
    }

    fn parse_atom(&mut self) -> Result<Vec<Pattern>, LanguageError> {
        let Some(token) = self.tokens.advance() else {
            return Ok(Vec::new());
        };

        match token {
            GrammarToken::OpenParen | GrammarToken::OpenBracket => {
                let (closer, wrap): (GrammarToken, fn(Vec<Pattern>) -> Pattern) =
                    if token == GrammarToken::OpenParen {
                        (GrammarToken::CloseParen, Pattern::Required)
                    } else {
                        (GrammarToken::CloseBracket, Pattern::Optional)
                    };
                let children = self.parse_expr()?;
                if self.tokens.advance() != Some(closer) {
                    return Err(LanguageError::UnmatchedBracket(token.to_string()));
                }
                Ok(vec![wrap(children)])
            }
            GrammarToken::Word(word) if word == "options" => Ok(self
                .options
                .leaves()
                .into_iter()
                .map(|leaf| self.grammar.push_leaf(leaf))
                .collect()),
            GrammarToken::Word(word) if word.starts_with("--") && word != "--" => {
                let leaf = resolve_long(self.options, &word, ResolveMode::Grammar, || {
                    self.tokens.next_word()
                })?;
                Ok(vec![self.grammar.push_leaf(leaf)])
            }
            GrammarToken::Word(word) if word.starts_with('-') && word != "-" && word != "--" => {
                let leaves = resolve_shorts(self.options, &word, ResolveMode::Grammar, || {
                    self.tokens.next_word()
                })?;
                Ok(leaves
                    .into_iter()
                    .map(|leaf| self.grammar.push_leaf(leaf))
                    .collect())
            }
            GrammarToken::Word(word) if is_argument_name(&word) => {
                Ok(vec![self.grammar.push_leaf(Leaf::argument(word))])
            }
            GrammarToken::Word(word) => Ok(vec![self.grammar.push_leaf(Leaf::command(word))]),
            other => Err(LanguageError::UnexpectedToken(other.to_string())),
        }
    }
}

fn push_alternative(alternatives: &mut Vec<Pattern>, mut seq: Vec<Pattern>) {
    if seq.len() > 1 {
        alternatives.push(Pattern::Required(seq));
    } else {
        alternatives.append(&mut seq);
    }
}

/// `<name>` or an all-uppercase word such as `FILE`.
fn is_argument_name(word: &str) -> bool {
    (word.starts_with('<') && word.ends_with('>'))
        || (word.to_uppercase() == word && word.to_lowercase() != word)
}
