//! shline: an embeddable shell-like command line core.
//!
//! A host registers its own commands, then hands this crate raw input lines.
//! Each line is tokenized, parsed into a pipeline of commands with
//! redirections, bound against the commands' declared option schemas, and
//! executed stage by stage over line-oriented streams. The same registry
//! drives tab completion of command names, options, command arguments and
//! paths.
//!
//! # Architecture
//!
//! - **[`parse`]**: tokenizer and pipeline grammar producing [`parse::ParsedInput`].
//! - **[`commands`]**: the [`Command`] capability, static [`CommandType`] declarations, the [`CommandRegistry`].
//! - **[`bind`]**: option occurrences → typed [`bind::OptionValues`] per command schema.
//! - **[`exec`]**: line I/O, cancellation, exit codes and the [`exec::PipelineExecutor`].
//! - **[`complete`]**: completion of the token at the end of a line.
//! - **[`shell`]**: the [`Shell`] facade hosts call into.
//! - **[`config`]**: configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: optional file logging to `~/.local/share/shline/shline.log`.

/// Option binding: schema matching and typed value conversion.
pub mod bind;
/// Command capability trait, option metadata and the registry.
pub mod commands;
/// Tab completion engine and path candidates.
pub mod complete;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Parse, bind, command and stream error types.
pub mod error;
/// Pipeline execution, line-oriented I/O, cancellation and exit codes.
pub mod exec;
/// File logging setup and per-line outcome records.
pub mod logging;
/// Tokenizer, grammar and parsed pipeline types.
pub mod parse;
/// Working and home directory resolution.
pub mod paths;
/// Host-facing facade.
pub mod shell;

pub use commands::{Command, CommandRegistry, CommandType, Invocation, OptionMetadata, ValueKind};
pub use complete::{Candidate, CompletionResult};
pub use config::Config;
pub use error::{BindError, BindErrorKind, CommandError, ParseError, StreamError};
pub use exec::{CancellationToken, Cancelled, ExitCode, LineSink, LineSource};
pub use paths::PathContext;
pub use shell::Shell;
