//! Grammar parser: token stream → pipeline AST.
//!
//! The input is split into per-command segments at `|`. Within a segment the
//! first word names the command; later words are classified as long options,
//! short option clusters or positional arguments. Redirection operators take
//! the following word as their path. A bare `--` turns every later word of the
//! same command into a positional argument.

use super::tokenize::tokenize;
use super::types::{
    OutputMode, ParsedCommand, ParsedInput, ParsedOptionOccurrence, ParsedPipeline, Token,
    TokenKind,
};
use crate::error::ParseError;

/// Tokenize and parse a command line.
pub fn parse_line(input: &str) -> Result<ParsedInput, ParseError> {
    parse(tokenize(input)?)
}

/// Parse a token stream into a [`ParsedInput`].
pub fn parse(tokens: Vec<Token>) -> Result<ParsedInput, ParseError> {
    if tokens.is_empty() {
        return Ok(ParsedInput::default());
    }

    let commands = split_segments(tokens)?
        .iter()
        .map(|segment| SegmentParser::new(segment).parse())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedInput {
        pipeline: Some(ParsedPipeline { commands }),
    })
}

/// Split at `|`, rejecting empty segments and a pipe right after `> file`.
fn split_segments(tokens: Vec<Token>) -> Result<Vec<Vec<Token>>, ParseError> {
    let mut segments = Vec::new();
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        if token.kind != TokenKind::Pipe {
            current.push(token);
            continue;
        }
        if current.is_empty() {
            return Err(ParseError::EmptyCommand);
        }
        if ends_with_stdout_redirect(&current) {
            return Err(ParseError::PipeAfterRedirect);
        }
        segments.push(std::mem::take(&mut current));
    }

    if current.is_empty() {
        return Err(ParseError::EmptyCommand);
    }
    segments.push(current);
    Ok(segments)
}

fn ends_with_stdout_redirect(segment: &[Token]) -> bool {
    match segment {
        [.., op, path] => {
            matches!(op.kind, TokenKind::RedirectOut | TokenKind::RedirectAppend) && path.is_word()
        }
        _ => false,
    }
}

/// `-5`, `-3.2`: negative numbers are arguments, never option clusters.
fn is_numeric_like(word: &str) -> bool {
    let Some(body) = word.strip_prefix('-') else {
        return false;
    };
    let mut digits = 0;
    let mut dots = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

struct SegmentParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    command: ParsedCommand,
    has_name: bool,
    end_of_options: bool,
}

impl<'a> SegmentParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            command: ParsedCommand::default(),
            has_name: false,
            end_of_options: false,
        }
    }

    fn parse(mut self) -> Result<ParsedCommand, ParseError> {
        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.pos) {
            self.pos += 1;
            match token.kind {
                TokenKind::RedirectIn | TokenKind::RedirectOut | TokenKind::RedirectAppend => {
                    self.redirect(token.kind)?;
                }
                TokenKind::EndOfOptions => self.end_of_options = true,
                // Segments never contain pipes
                TokenKind::Pipe => return Err(ParseError::EmptyCommand),
                TokenKind::Word => self.word(token),
            }
        }

        if !self.has_name {
            return Err(ParseError::MissingCommandName);
        }
        Ok(self.command)
    }

    fn redirect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let symbol = kind.as_str();
        let path = match self.tokens.get(self.pos) {
            Some(next) if next.is_word() => next.value.clone(),
            _ => return Err(ParseError::MissingRedirectTarget { symbol }),
        };
        self.pos += 1;

        let redirections = &mut self.command.redirections;
        if kind == TokenKind::RedirectIn {
            if redirections.stdin_path.is_some() {
                return Err(ParseError::DuplicateRedirect { symbol });
            }
            redirections.stdin_path = Some(path);
        } else {
            if redirections.stdout_path.is_some() {
                return Err(ParseError::DuplicateRedirect { symbol });
            }
            redirections.stdout_path = Some(path);
            redirections.stdout_mode = if kind == TokenKind::RedirectAppend {
                OutputMode::Append
            } else {
                OutputMode::Overwrite
            };
        }
        Ok(())
    }

    fn word(&mut self, token: &Token) {
        if !self.has_name {
            self.command.name = token.value.clone();
            self.has_name = true;
            return;
        }

        let value = token.value.as_str();
        if self.end_of_options {
            self.command.arguments.push(token.value.clone());
        } else if let Some(body) = value.strip_prefix("--").filter(|b| !b.is_empty()) {
            self.long_option(body, token.was_quoted);
        } else if value.len() > 1
            && value.starts_with('-')
            && !value.starts_with("--")
            && !is_numeric_like(value)
            && !value.starts_with("-=")
        {
            self.short_cluster(&value[1..], token.was_quoted);
        } else {
            self.command.arguments.push(token.value.clone());
        }
    }

    fn long_option(&mut self, body: &str, was_quoted: bool) {
        let occurrence = match body.split_once('=') {
            Some((name, value)) => {
                self.occurrence(name, true, Some((value.to_string(), was_quoted, false)))
            }
            None => {
                let spaced = self.take_spaced_value();
                self.occurrence(body, true, spaced)
            }
        };
        self.command.options.push(occurrence);
    }

    /// `-abc=x` ⇒ `-a -b -c=x`; `-abc` ⇒ `-a -b -c`; a lone `-a` may take the
    /// following word as its value.
    fn short_cluster(&mut self, body: &str, was_quoted: bool) {
        if let Some((flags, value)) = body.split_once('=') {
            let chars: Vec<char> = flags.chars().collect();
            if let Some((last, rest)) = chars.split_last() {
                for c in rest {
                    let occurrence = self.occurrence(&c.to_string(), false, None);
                    self.command.options.push(occurrence);
                }
                let value = Some((value.to_string(), was_quoted, false));
                let occurrence = self.occurrence(&last.to_string(), false, value);
                self.command.options.push(occurrence);
            }
            return;
        }

        let chars: Vec<char> = body.chars().collect();
        if let [only] = chars.as_slice() {
            let spaced = self.take_spaced_value();
            let occurrence = self.occurrence(&only.to_string(), false, spaced);
            self.command.options.push(occurrence);
            return;
        }
        for c in chars {
            let occurrence = self.occurrence(&c.to_string(), false, None);
            self.command.options.push(occurrence);
        }
    }

    /// Consume the next word as an option value when it cannot be an option itself.
    fn take_spaced_value(&mut self) -> Option<(String, bool, bool)> {
        let next = self.tokens.get(self.pos)?;
        let acceptable = next.is_word() && (!next.value.starts_with('-') || next.was_quoted);
        if !acceptable {
            return None;
        }
        self.pos += 1;
        Some((next.value.clone(), next.was_quoted, true))
    }

    fn occurrence(
        &self,
        name: &str,
        is_long: bool,
        value: Option<(String, bool, bool)>,
    ) -> ParsedOptionOccurrence {
        let (raw_value, was_quoted, is_value_space_separated) = match value {
            Some((v, quoted, spaced)) => (Some(v), quoted, spaced),
            None => (None, false, false),
        };
        ParsedOptionOccurrence {
            name: name.to_string(),
            is_long,
            raw_value,
            was_quoted,
            is_value_space_separated,
            position: self.command.arguments.len(),
        }
    }
}
