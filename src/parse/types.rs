//! Types produced by the tokenizer and parser and consumed by the binder.

use std::fmt;

use super::tokenize::{needs_quotes, quote_word};

/// Byte range of a token within the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    /// `|`
    Pipe,
    /// `<`
    RedirectIn,
    /// `>`
    RedirectOut,
    /// `>>`
    RedirectAppend,
    /// A bare, unquoted `--`
    EndOfOptions,
}

impl TokenKind {
    /// The operator's shell syntax; empty for words.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Word => "",
            TokenKind::Pipe => "|",
            TokenKind::RedirectIn => "<",
            TokenKind::RedirectOut => ">",
            TokenKind::RedirectAppend => ">>",
            TokenKind::EndOfOptions => "--",
        }
    }

    pub fn is_redirect(self) -> bool {
        matches!(
            self,
            TokenKind::RedirectIn | TokenKind::RedirectOut | TokenKind::RedirectAppend
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Unquoted, unescaped text of a word; the symbol of an operator.
    pub value: String,
    pub span: SourceSpan,
    /// True when any segment of the word was quoted.
    pub was_quoted: bool,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }
}

/// A raw mention of an option, not yet matched against any schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOptionOccurrence {
    /// Name without leading dashes (`count` for `--count`, `c` for `-c`).
    pub name: String,
    pub is_long: bool,
    pub raw_value: Option<String>,
    /// True when the value came from a quoted token.
    pub was_quoted: bool,
    /// True when the value was taken from the following word (`--name value`).
    pub is_value_space_separated: bool,
    /// Number of positional arguments that preceded this occurrence.
    pub position: usize,
}

impl ParsedOptionOccurrence {
    pub fn has_value(&self) -> bool {
        self.raw_value.is_some()
    }

    /// The option as typed, without its value: `--name` or `-n`.
    pub fn flag(&self) -> String {
        if self.is_long {
            format!("--{}", self.name)
        } else {
            format!("-{}", self.name)
        }
    }
}

impl fmt::Display for ParsedOptionOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flag())?;
        if let Some(value) = &self.raw_value {
            if self.is_value_space_separated {
                write!(f, " {}", quote_word(value))?;
            } else if needs_quotes(value) {
                write!(f, "={}", quote_word(value))?;
            } else {
                // Inside `--name=...` an empty value or a bare `--` needs no quotes
                write!(f, "={value}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    None,
    Overwrite,
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRedirections {
    pub stdin_path: Option<String>,
    pub stdout_path: Option<String>,
    pub stdout_mode: OutputMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    pub name: String,
    pub arguments: Vec<String>,
    pub options: Vec<ParsedOptionOccurrence>,
    pub redirections: ParsedRedirections,
}

/// One or more commands connected by `|`, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPipeline {
    pub commands: Vec<ParsedCommand>,
}

/// The parse of a whole input line; blank input has no pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedInput {
    pub pipeline: Option<ParsedPipeline>,
}

impl ParsedInput {
    pub fn is_empty(&self) -> bool {
        self.pipeline.is_none()
    }
}
