//! Command capability and metadata registry.
//!
//! Concrete commands live in the host. Each one implements [`Command`] for its
//! behaviour and [`CommandType`] for its static declaration (name, description,
//! option schema, constructor). The [`CommandRegistry`] turns declarations into
//! [`CommandMetadata`] entries looked up by name.

/// Option schema and per-command metadata.
pub mod metadata;
/// Name → metadata registry.
pub mod registry;

pub use metadata::{CommandFactory, CommandMetadata, OptionMetadata, ValueKind};
pub use registry::{CommandRegistry, ValueParser};

use crate::bind::OptionValues;
use crate::error::CommandError;
use crate::exec::{CancellationToken, ExitCode, LineSink, LineSource};
use crate::paths::PathContext;

/// Everything a command body receives for one invocation.
pub struct Invocation<'a> {
    pub stdin: &'a mut dyn LineSource,
    pub stdout: &'a mut dyn LineSink,
    pub stderr: &'a mut dyn LineSink,
    /// Positional arguments, in source order.
    pub args: &'a [String],
    pub options: &'a OptionValues,
    pub paths: &'a PathContext,
    pub cancel: &'a CancellationToken,
}

/// A command implementation supplied by the host.
///
/// Instances are created fresh for every pipeline run and are never shared
/// between concurrent invocations.
pub trait Command: Send {
    /// Receive the bound option values before execution.
    ///
    /// Returning `Err` rejects the invocation as a usage error.
    fn configure(&mut self, options: &OptionValues) -> Result<(), String> {
        let _ = options;
        Ok(())
    }

    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError>;

    /// Candidates for the argument at `index` (0-based among positional
    /// arguments) that starts with `partial`. Empty means "no opinion"; the
    /// completion engine then falls back to path completion.
    fn complete(&self, partial: &str, index: usize, paths: &PathContext) -> Vec<String> {
        let _ = (partial, index, paths);
        Vec::new()
    }
}

/// Static declaration consumed by [`CommandRegistry::register`].
pub trait CommandType {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;
    const OPTIONS: &'static [OptionMetadata] = &[];

    fn create() -> Box<dyn Command>;
}
