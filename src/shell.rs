//! Host-facing facade: one call to run a line, one to complete it.

use crate::bind::Binder;
use crate::commands::CommandRegistry;
use crate::complete::{CompletionEngine, CompletionResult};
use crate::config::{CompletionConfig, Config};
use crate::exec::{CancellationToken, Cancelled, ExitCode, LineSink, LineSource, PipelineExecutor};
use crate::logging;
use crate::parse::parse_line;
use crate::paths::PathContext;

/// An embedded command line: registry, directory context and completion
/// settings.
///
/// Every [`Shell::run_line`] call builds fresh command instances, so one
/// `Shell` can serve several concurrent pipelines as long as each gets its own
/// streams.
pub struct Shell {
    registry: CommandRegistry,
    paths: PathContext,
    completion: CompletionConfig,
}

impl Shell {
    pub fn new(registry: CommandRegistry, paths: PathContext) -> Self {
        Self {
            registry,
            paths,
            completion: CompletionConfig::default(),
        }
    }

    /// Empty registry honouring `[commands] disabled`, directories from
    /// `[settings]` and completion settings from `[completion]`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            registry: CommandRegistry::from_config(config),
            paths: PathContext::from_settings(&config.settings),
            completion: config.completion.clone(),
        }
    }

    pub fn with_completion(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn paths(&self) -> &PathContext {
        &self.paths
    }

    pub fn set_working_dir(&mut self, dir: impl Into<std::path::PathBuf>) {
        self.paths.set_working_dir(dir);
    }

    /// Parse, bind and execute `line`.
    ///
    /// Syntax and usage errors are written to `stderr` and yield
    /// [`ExitCode::UsageError`] before any command runs. Blank input succeeds
    /// without doing anything.
    pub fn run_line(
        &self,
        line: &str,
        stdin: &mut dyn LineSource,
        stdout: &mut dyn LineSink,
        stderr: &mut dyn LineSink,
        cancel: &CancellationToken,
    ) -> Result<ExitCode, Cancelled> {
        let outcome = self.run(line, stdin, stdout, stderr, cancel);
        if !line.trim().is_empty() {
            logging::log_outcome(line, &outcome);
        }
        outcome
    }

    fn run(
        &self,
        line: &str,
        stdin: &mut dyn LineSource,
        stdout: &mut dyn LineSink,
        stderr: &mut dyn LineSink,
        cancel: &CancellationToken,
    ) -> Result<ExitCode, Cancelled> {
        let parsed = match parse_line(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = stderr.write_line(&err.to_string());
                return Ok(ExitCode::from(&err));
            }
        };
        let Some(pipeline) = parsed.pipeline else {
            return Ok(ExitCode::Success);
        };

        let bound = match Binder::new(&self.registry).bind_pipeline(pipeline) {
            Ok(bound) => bound,
            Err(err) => {
                let _ = stderr.write_line(&err.to_string());
                return Ok(ExitCode::from(&err));
            }
        };

        PipelineExecutor::new(&self.paths).execute(bound, stdin, stdout, stderr, cancel)
    }

    /// Completion candidates for the end of `line`.
    pub fn complete(&self, line: &str) -> CompletionResult {
        CompletionEngine::new(&self.registry, &self.paths, &self.completion).complete(line)
    }

    /// Usage text for a registered command.
    pub fn help(&self, name: &str) -> Option<String> {
        self.registry.lookup(name).map(|m| m.usage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Command, CommandType, Invocation};
    use crate::error::CommandError;
    use crate::exec::{BufferedOutput, MemoryInput};

    struct Echo;

    impl Command for Echo {
        fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
            io.stdout.write_line(&io.args.join(" "))?;
            Ok(ExitCode::Success)
        }
    }

    impl CommandType for Echo {
        const NAME: &'static str = "echo";
        const DESCRIPTION: &'static str = "print arguments";
        fn create() -> Box<dyn Command> {
            Box::new(Echo)
        }
    }

    fn shell() -> Shell {
        let mut registry = CommandRegistry::new();
        registry.register::<Echo>();
        Shell::new(registry, PathContext::new("/", "/"))
    }

    fn run(line: &str) -> (ExitCode, String, String) {
        let mut out = BufferedOutput::new();
        let mut err = BufferedOutput::new();
        let code = shell()
            .run_line(
                line,
                &mut MemoryInput::default(),
                &mut out,
                &mut err,
                &CancellationToken::new(),
            )
            .unwrap();
        (code, out.text(), err.text())
    }

    #[test]
    fn runs_a_command() {
        let (code, out, err) = run("echo hello 'big world'");
        assert_eq!(code, ExitCode::Success);
        assert_eq!(out, "hello big world\n");
        assert!(err.is_empty());
    }

    #[test]
    fn blank_line_succeeds() {
        assert_eq!(run("   ").0, ExitCode::Success);
    }

    #[test]
    fn parse_error_is_usage_error() {
        let (code, out, err) = run("echo 'open");
        assert_eq!(code, ExitCode::UsageError);
        assert!(out.is_empty());
        assert!(err.starts_with("syntax error"));
    }

    #[test]
    fn unknown_command_is_usage_error() {
        let (code, _, err) = run("nope");
        assert_eq!(code, ExitCode::UsageError);
        assert_eq!(err, "nope: command not found\n");
    }

    #[test]
    fn help_renders_usage() {
        let help = shell().help("ECHO").unwrap();
        assert!(help.starts_with("echo - print arguments"));
        assert!(shell().help("nope").is_none());
    }
}
