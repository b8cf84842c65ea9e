pub mod grammar;
pub mod tokenize;
pub mod types;

pub use grammar::{parse, parse_line};
pub use tokenize::{quote_word, tokenize};
pub(crate) use tokenize::tokenize_lenient;
pub use types::{
    OutputMode, ParsedCommand, ParsedInput, ParsedOptionOccurrence, ParsedPipeline,
    ParsedRedirections, SourceSpan, Token, TokenKind,
};
