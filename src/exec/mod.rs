//! Pipeline executor.
//!
//! Stages run strictly one after another. Each stage reads from the host's
//! stdin (first stage), a `<` file, or the buffered output of the previous
//! stage, and writes to the host's stdout (last stage), a `>`/`>>` file, or a
//! buffer feeding the next stage. The first non-success exit code stops the
//! pipeline.

pub mod cancel;
pub mod exit;
pub mod io;

pub use cancel::{CancellationToken, Cancelled};
pub use exit::ExitCode;
pub use io::{
    BufferedOutput, FileInput, FileOutput, LineSink, LineSource, MemoryInput, ReaderSource,
    WriterSink,
};

use crate::bind::{BoundCommand, BoundPipeline};
use crate::commands::Invocation;
use crate::error::CommandError;
use crate::paths::PathContext;
use io::{GuardedSink, GuardedSource};

// ── Stage wiring ──

enum StageInput<'s> {
    External(&'s mut dyn LineSource),
    File(FileInput),
    Piped(MemoryInput),
}

impl StageInput<'_> {
    fn source(&mut self) -> &mut dyn LineSource {
        match self {
            StageInput::External(source) => &mut **source,
            StageInput::File(file) => file,
            StageInput::Piped(buffer) => buffer,
        }
    }
}

enum StageOutput<'s> {
    External(&'s mut dyn LineSink),
    File(FileOutput),
    Buffer(BufferedOutput),
}

impl StageOutput<'_> {
    fn sink(&mut self) -> &mut dyn LineSink {
        match self {
            StageOutput::External(sink) => &mut **sink,
            StageOutput::File(file) => file,
            StageOutput::Buffer(buffer) => buffer,
        }
    }
}

// ── Executor ──

/// Runs bound pipelines against a working/home directory context.
pub struct PipelineExecutor<'a> {
    paths: &'a PathContext,
}

impl<'a> PipelineExecutor<'a> {
    pub fn new(paths: &'a PathContext) -> Self {
        Self { paths }
    }

    /// Run every stage in order and return the exit code of the last stage
    /// executed.
    ///
    /// Runtime failures are reported on `stderr` prefixed with the command
    /// name. Cancellation is returned as `Err(Cancelled)`; file handles opened
    /// for the pipeline are closed on every path.
    pub fn execute(
        &self,
        pipeline: BoundPipeline,
        stdin: &mut dyn LineSource,
        stdout: &mut dyn LineSink,
        stderr: &mut dyn LineSink,
        cancel: &CancellationToken,
    ) -> Result<ExitCode, Cancelled> {
        let stage_count = pipeline.commands.len();
        let mut piped: Option<MemoryInput> = None;
        let mut exit = ExitCode::Success;

        for (index, mut stage) in pipeline.commands.into_iter().enumerate() {
            cancel.check()?;
            let is_last = index + 1 == stage_count;
            log::debug!("stage {index}: {} {:?}", stage.name, stage.arguments);

            let mut input = match self.open_input(&stage, index, piped.take(), &mut *stdin) {
                Ok(input) => input,
                Err(message) => {
                    report(stderr, &stage.name, &message);
                    return Ok(ExitCode::RuntimeError);
                }
            };
            let mut output = match self.open_output(&stage, is_last, &mut *stdout) {
                Ok(output) => output,
                Err(message) => {
                    report(stderr, &stage.name, &message);
                    return Ok(ExitCode::RuntimeError);
                }
            };

            let result = {
                let mut source = GuardedSource::new(input.source(), cancel);
                let mut sink = GuardedSink::new(output.sink(), cancel);
                let mut errors = GuardedSink::new(&mut *stderr, cancel);
                let mut invocation = Invocation {
                    stdin: &mut source,
                    stdout: &mut sink,
                    stderr: &mut errors,
                    args: &stage.arguments,
                    options: &stage.options,
                    paths: self.paths,
                    cancel,
                };
                stage.command.execute(&mut invocation)
            };
            drop(input);

            exit = match result {
                Ok(code) => code,
                Err(CommandError::Cancelled) => {
                    log::debug!("stage {index}: {} interrupted", stage.name);
                    return Err(Cancelled);
                }
                Err(err) => {
                    report(stderr, &stage.name, &err.to_string());
                    ExitCode::RuntimeError
                }
            };
            log::debug!("stage {index}: {} exited {}", stage.name, exit.as_i32());

            match output {
                StageOutput::File(file) => {
                    if let Err(err) = file.finish() {
                        report(stderr, &stage.name, &err.to_string());
                        if exit.is_success() {
                            exit = ExitCode::RuntimeError;
                        }
                    }
                }
                StageOutput::Buffer(buffer) => piped = Some(buffer.into_input()),
                StageOutput::External(sink) => {
                    if let Err(err) = sink.flush() {
                        report(stderr, &stage.name, &err.to_string());
                        if exit.is_success() {
                            exit = ExitCode::RuntimeError;
                        }
                    }
                }
            }

            if !is_last {
                cancel.check()?;
            }
            if !exit.is_success() {
                return Ok(exit);
            }
        }

        Ok(exit)
    }

    fn open_input<'s>(
        &self,
        stage: &BoundCommand,
        index: usize,
        piped: Option<MemoryInput>,
        stdin: &'s mut dyn LineSource,
    ) -> Result<StageInput<'s>, String> {
        let redirect = stage.redirections.stdin_path.as_deref();
        if index > 0 {
            if let Some(raw) = redirect {
                log::warn!(
                    "{}: ignoring '< {raw}' on a piped stage; input comes from the previous command",
                    stage.name
                );
            }
            return Ok(StageInput::Piped(piped.unwrap_or_default()));
        }
        match redirect {
            Some(raw) => {
                let path = self.paths.resolve(raw);
                FileInput::open(&path)
                    .map(StageInput::File)
                    .map_err(|e| format!("{raw}: {e}"))
            }
            None => Ok(StageInput::External(stdin)),
        }
    }

    fn open_output<'s>(
        &self,
        stage: &BoundCommand,
        is_last: bool,
        stdout: &'s mut dyn LineSink,
    ) -> Result<StageOutput<'s>, String> {
        let redirections = &stage.redirections;
        match redirections.stdout_path.as_deref() {
            Some(raw) => {
                let path = self.paths.resolve(raw);
                FileOutput::open(&path, redirections.stdout_mode)
                    .map(StageOutput::File)
                    .map_err(|e| format!("{raw}: {e}"))
            }
            _ if is_last => Ok(StageOutput::External(stdout)),
            _ => Ok(StageOutput::Buffer(BufferedOutput::new())),
        }
    }
}

/// Write `name: message` to the error sink; a failing sink is ignored.
fn report(stderr: &mut dyn LineSink, name: &str, message: &str) {
    let _ = stderr.write_line(&format!("{name}: {message}"));
}
