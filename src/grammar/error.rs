/// Failure to resolve an option token against the declared option table.
///
/// The same failure is a language error when it comes from the usage
/// grammar and a usage error when it comes from argv.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("{0} is not recognized")]
    NotRecognized(String),
    #[error("{option} is not a unique prefix: {}?", .candidates.join(", "))]
    AmbiguousPrefix {
        option: String,
        candidates: Vec<String>,
    },
    #[error("{option} is specified ambiguously {count} times")]
    AmbiguousShort { option: String, count: usize },
    #[error("{0} requires argument")]
    MissingArgument(String),
    #[error("{0} must not have an argument")]
    UnexpectedArgument(String),
}

/// Malformed usage text. Always the program author's mistake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    #[error("\"usage:\" (case-insensitive) not found")]
    UsageNotFound,
    #[error("more than one \"usage:\" (case-insensitive)")]
    MultipleUsage,
    #[error("unmatched '{0}'")]
    UnmatchedBracket(String),
    #[error("unexpected ending: {0}")]
    UnexpectedEnding(String),
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("option declaration error: {0}")]
    Option(#[from] OptionError),
}

/// Argv that does not satisfy an otherwise well-formed grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error(transparent)]
    Option(#[from] OptionError),
    #[error("arguments did not match any usage pattern")]
    NoMatch,
}

/// Top-level outcome of [`docopt`](crate::grammar::engine::docopt) when no
/// argument map is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("usage language error: {0}")]
    Language(#[from] LanguageError),
    #[error("{error}\n{usage}")]
    Usage {
        #[source]
        error: UsageError,
        usage: String,
    },
    #[error("{0}")]
    Help(String),
    #[error("{0}")]
    Version(String),
}

impl Error {
    /// Process exit code a binary should use for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Help(_) | Error::Version(_) => 0,
            Error::Usage { .. } => 1,
            Error::Language(_) => 2,
        }
    }

    pub fn is_language_error(&self) -> bool {
        matches!(self, Error::Language(_))
    }

    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::Usage { .. })
    }
}
