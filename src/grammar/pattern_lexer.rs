//! Tokens of a formal usage string and a cursor over them.

use std::collections::VecDeque;
use std::fmt;

/// Atomic token of a formal usage grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarToken {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `|`
    Pipe,
    /// `...`
    Ellipsis,
    /// Anything else: commands, `<args>`, `ARGS`, `-o`, `--long=<v>`, `options`
    Word(String),
}

impl GrammarToken {
    pub fn as_str(&self) -> &str {
        match self {
            GrammarToken::OpenParen => "(",
            GrammarToken::CloseParen => ")",
            GrammarToken::OpenBracket => "[",
            GrammarToken::CloseBracket => "]",
            GrammarToken::Pipe => "|",
            GrammarToken::Ellipsis => "...",
            GrammarToken::Word(word) => word,
        }
    }
}

impl fmt::Display for GrammarToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a formal usage string into grammar tokens.
///
/// Brackets, parentheses, `|` and `...` are tokens on their own even when
/// written without surrounding spaces (`[-h|-v]`, `N...`); everything else
/// is split on whitespace.
pub fn tokenize(source: &str) -> Vec<GrammarToken> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut rest = source;

    while let Some(ch) = rest.chars().next() {
        let (token, len) = if rest.starts_with("...") {
            (Some(GrammarToken::Ellipsis), 3)
        } else {
            let token = match ch {
                '(' => Some(GrammarToken::OpenParen),
                ')' => Some(GrammarToken::CloseParen),
                '[' => Some(GrammarToken::OpenBracket),
                ']' => Some(GrammarToken::CloseBracket),
                '|' => Some(GrammarToken::Pipe),
                _ => None,
            };
            (token, ch.len_utf8())
        };
        rest = &rest[len..];

        match token {
            Some(token) => {
                flush_word(&mut word, &mut tokens);
                tokens.push(token);
            }
            None if ch.is_whitespace() => flush_word(&mut word, &mut tokens),
            None => word.push(ch),
        }
    }
    flush_word(&mut word, &mut tokens);

    tokens
}

fn flush_word(word: &mut String, tokens: &mut Vec<GrammarToken>) {
    if !word.is_empty() {
        tokens.push(GrammarToken::Word(std::mem::take(word)));
    }
}

/// Cursor over grammar tokens consumed by the recursive-descent parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
    tokens: VecDeque<GrammarToken>,
}

impl TokenStream {
    pub fn new(tokens: Vec<GrammarToken>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    pub fn current(&self) -> Option<&GrammarToken> {
        self.tokens.front()
    }

    pub fn advance(&mut self) -> Option<GrammarToken> {
        self.tokens.pop_front()
    }

    /// Consume the current token only if it is a word.
    pub fn next_word(&mut self) -> Option<String> {
        match self.tokens.front() {
            Some(GrammarToken::Word(_)) => match self.tokens.pop_front() {
                Some(GrammarToken::Word(word)) => Some(word),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Unconsumed tokens joined by spaces.
    pub fn remaining(&self) -> String {
        self.tokens
            .iter()
            .map(GrammarToken::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
