//! Tab completion for a partially typed line.
//!
//! The token under the cursor (always the end of the line) is classified by
//! what precedes it:
//!
//! - nothing, or a `|`: command names
//! - `<`, `>` or `>>`: paths
//! - a leading `-`: options of the current segment's command
//! - anything else: the command's own completion hook, then paths

/// File-system candidates.
pub mod path;

use std::cmp::Ordering;

use crate::commands::{CommandMetadata, CommandRegistry};
use crate::config::CompletionConfig;
use crate::parse::{Token, TokenKind, quote_word, tokenize_lenient};
use crate::paths::PathContext;

/// One suggested replacement for the token being completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Text to splice in at `token_start`, quoted when needed.
    pub replacement: String,
    /// Text to show in a candidate list.
    pub display: String,
    pub description: Option<String>,
}

impl Candidate {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            replacement: quote_word(&text),
            display: text,
            description: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }
}

/// Candidates plus the byte range of the input they replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResult {
    pub candidates: Vec<Candidate>,
    pub token_start: usize,
    pub token_length: usize,
}

impl CompletionResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn replacements(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.replacement.as_str())
    }

    /// `line` with the token under completion replaced by `candidate`.
    pub fn apply(&self, line: &str, candidate: &Candidate) -> String {
        let end = (self.token_start + self.token_length).min(line.len());
        let mut applied = String::with_capacity(line.len() + candidate.replacement.len());
        applied.push_str(&line[..self.token_start.min(end)]);
        applied.push_str(&candidate.replacement);
        applied.push_str(&line[end..]);
        applied
    }
}

/// What the token under the cursor is expected to be.
#[derive(Debug, PartialEq, Eq)]
enum Slot<'t> {
    CommandName,
    Path,
    Option { command: &'t str },
    Argument { command: &'t str, index: usize },
}

/// Computes completions against a registry and a directory context.
pub struct CompletionEngine<'a> {
    registry: &'a CommandRegistry,
    paths: &'a PathContext,
    config: &'a CompletionConfig,
}

impl<'a> CompletionEngine<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        paths: &'a PathContext,
        config: &'a CompletionConfig,
    ) -> Self {
        Self {
            registry,
            paths,
            config,
        }
    }

    /// Complete the last token of `line`.
    pub fn complete(&self, line: &str) -> CompletionResult {
        let tokens = tokenize_lenient(line);

        // The cursor token is the last one only if nothing separates it from
        // the end of the line.
        let (preceding, partial, token_start) = match tokens.split_last() {
            Some((last, rest))
                if matches!(last.kind, TokenKind::Word | TokenKind::EndOfOptions)
                    && last.span.end == line.len() =>
            {
                (rest, last.value.as_str(), last.span.start)
            }
            _ => (tokens.as_slice(), "", line.len()),
        };

        let mut candidates = match classify(preceding, partial) {
            Slot::CommandName => self.command_names(partial),
            Slot::Path => self.path(partial),
            Slot::Option { command } => self.options(command, partial),
            Slot::Argument { command, index } => self.argument(command, partial, index),
        };
        if self.config.max_candidates > 0 {
            candidates.truncate(self.config.max_candidates);
        }

        CompletionResult {
            candidates,
            token_start,
            token_length: line.len() - token_start,
        }
    }

    fn command_names(&self, partial: &str) -> Vec<Candidate> {
        let partial = partial.to_lowercase();
        let mut found: Vec<&CommandMetadata> = self
            .registry
            .commands()
            .filter(|m| m.name.to_lowercase().starts_with(&partial))
            .collect();
        found.sort_by(|a, b| compare_names(&a.name, &b.name));
        found
            .into_iter()
            .map(|m| Candidate::new(m.name.clone()).with_description(m.description.clone()))
            .collect()
    }

    fn options(&self, command: &str, partial: &str) -> Vec<Candidate> {
        let Some(metadata) = self.registry.lookup(command) else {
            return Vec::new();
        };
        let lowered = partial.to_lowercase();
        let mut found: Vec<Candidate> = Vec::new();
        for option in &metadata.options {
            let long = format!("--{}", option.long_name);
            if long.to_lowercase().starts_with(&lowered) {
                found.push(Candidate::new(long).with_description(option.description));
            }
            if let Some(short) = option.short_name {
                let short = format!("-{short}");
                if short.starts_with(partial) {
                    found.push(Candidate::new(short).with_description(option.description));
                }
            }
        }
        found.sort_by(|a, b| compare_names(&a.display, &b.display));
        found
    }

    fn argument(&self, command: &str, partial: &str, index: usize) -> Vec<Candidate> {
        if let Some(metadata) = self.registry.lookup(command) {
            let mut own = metadata.create().complete(partial, index, self.paths);
            if !own.is_empty() {
                own.sort();
                own.dedup();
                return own.into_iter().map(Candidate::new).collect();
            }
        }
        self.path(partial)
    }

    fn path(&self, partial: &str) -> Vec<Candidate> {
        path::complete_path(partial, self.paths, self.config.show_hidden)
    }
}

/// Case-insensitive order with a case-sensitive tiebreak.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Decide the slot from the tokens before the cursor token.
fn classify<'t>(preceding: &'t [Token], partial: &str) -> Slot<'t> {
    if preceding.last().is_some_and(|t| t.kind.is_redirect()) {
        return Slot::Path;
    }

    let segment_start = preceding
        .iter()
        .rposition(|t| t.kind == TokenKind::Pipe)
        .map_or(0, |idx| idx + 1);

    let mut command: Option<&str> = None;
    let mut index = 0;
    let mut options_ended = false;
    let mut after_redirect = false;
    for token in &preceding[segment_start..] {
        if token.kind.is_redirect() {
            after_redirect = true;
            continue;
        }
        if std::mem::take(&mut after_redirect) {
            continue;
        }
        if command.is_none() {
            command = Some(token.value.as_str());
        } else if token.kind == TokenKind::EndOfOptions && !options_ended {
            options_ended = true;
        } else if options_ended || token.was_quoted || !token.value.starts_with('-') {
            index += 1;
        }
    }

    match command {
        None => Slot::CommandName,
        Some(command) if partial.starts_with('-') && !options_ended => Slot::Option { command },
        Some(command) => Slot::Argument { command, index },
    }
}
