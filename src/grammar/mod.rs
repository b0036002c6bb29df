pub mod argv_parser;
pub mod doc_parser;
pub mod engine;
mod error;
pub mod fixer;
pub mod option_resolver;
pub mod pattern;
pub mod pattern_lexer;
pub mod pattern_matcher;
pub mod pattern_parser;

pub use engine::{Arguments, docopt};
pub use error::*;
