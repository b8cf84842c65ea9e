//! Error taxonomy shared by the front end and the executor.
//!
//! Parse and bind errors are detected before any command body runs and map to
//! [`ExitCode::UsageError`](crate::ExitCode::UsageError). Command and stream
//! failures map to [`ExitCode::RuntimeError`](crate::ExitCode::RuntimeError).
//! Cancellation is carried separately as [`Cancelled`](crate::Cancelled).

use thiserror::Error;

/// Malformed command line syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error: tab character at offset {position}")]
    TabCharacter { position: usize },
    #[error("syntax error: escape character at end of input")]
    TrailingEscape,
    #[error("syntax error: unterminated {quote} quote starting at offset {position}")]
    UnterminatedQuote { quote: char, position: usize },
    #[error("syntax error: empty command near '|'")]
    EmptyCommand,
    #[error("syntax error: missing file path after '{symbol}'")]
    MissingRedirectTarget { symbol: &'static str },
    #[error("syntax error: '|' cannot follow an output redirection")]
    PipeAfterRedirect,
    #[error("syntax error: missing command name")]
    MissingCommandName,
    #[error("syntax error: duplicate '{symbol}' redirection")]
    DuplicateRedirect { symbol: &'static str },
}

/// What went wrong while binding a parsed command to its option schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindErrorKind {
    #[error("command not found")]
    UnknownCommand,
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("missing required option '{0}'")]
    MissingRequired(String),
    #[error("option '{0}' requires a value")]
    MissingValue(String),
    #[error("option '{0}' does not take a value")]
    UnexpectedValue(String),
    #[error("invalid value '{value}' for option '{option}': {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },
    #[error("no value parser registered for '{0}'")]
    UnknownValueParser(String),
    #[error("{0}")]
    Rejected(String),
}

/// A parsed command that does not fit its declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{command}: {kind}")]
pub struct BindError {
    pub command: String,
    pub kind: BindErrorKind,
}

impl BindError {
    pub fn new(command: impl Into<String>, kind: BindErrorKind) -> Self {
        Self {
            command: command.into(),
            kind,
        }
    }

    pub fn command_name(&self) -> &str {
        &self.command
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Failure of a line-oriented read or write.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("interrupted")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<crate::Cancelled> for StreamError {
    fn from(_: crate::Cancelled) -> Self {
        StreamError::Cancelled
    }
}

/// Failure reported by a command body.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Cancellation observed inside the body; unwinds the whole pipeline.
    #[error("interrupted")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(String),
}

impl From<StreamError> for CommandError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Cancelled => CommandError::Cancelled,
            StreamError::Io(e) => CommandError::Io(e),
        }
    }
}

impl From<crate::Cancelled> for CommandError {
    fn from(_: crate::Cancelled) -> Self {
        CommandError::Cancelled
    }
}
