#![allow(dead_code)]

use std::path::Path;

use shline::exec::{BufferedOutput, MemoryInput};
use shline::{
    CancellationToken, Cancelled, Command, CommandError, CommandRegistry, CommandType, ExitCode,
    Invocation, OptionMetadata, PathContext, Shell, ValueKind,
};

// ── Test commands ──

/// Prints its arguments on one line.
pub struct Echo {
    newline: bool,
}

impl Command for Echo {
    fn configure(&mut self, options: &shline::bind::OptionValues) -> Result<(), String> {
        self.newline = !options.flag("no-newline");
        Ok(())
    }

    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        io.stdout.write(&io.args.join(" "))?;
        if self.newline {
            io.stdout.write("\n")?;
        }
        Ok(ExitCode::Success)
    }
}

impl CommandType for Echo {
    const NAME: &'static str = "echo";
    const DESCRIPTION: &'static str = "print arguments";
    const OPTIONS: &'static [OptionMetadata] =
        &[OptionMetadata::flag("no-newline").short('n').describe("omit the trailing newline")];

    fn create() -> Box<dyn Command> {
        Box::new(Echo { newline: true })
    }
}

/// Copies stdin to stdout.
pub struct Cat;

impl Command for Cat {
    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        while let Some(line) = io.stdin.read_line()? {
            io.stdout.write_line(&line)?;
        }
        Ok(ExitCode::Success)
    }
}

impl CommandType for Cat {
    const NAME: &'static str = "cat";
    const DESCRIPTION: &'static str = "copy input to output";

    fn create() -> Box<dyn Command> {
        Box::new(Cat)
    }
}

/// Upper-cases every input line.
pub struct Upper;

impl Command for Upper {
    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        while let Some(line) = io.stdin.read_line()? {
            io.stdout.write_line(&line.to_uppercase())?;
        }
        Ok(ExitCode::Success)
    }
}

impl CommandType for Upper {
    const NAME: &'static str = "upper";
    const DESCRIPTION: &'static str = "upper-case input lines";

    fn create() -> Box<dyn Command> {
        Box::new(Upper)
    }
}

/// Keeps input lines containing a pattern.
pub struct Grep;

impl Command for Grep {
    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        let Some(pattern) = io.args.first() else {
            io.stderr.write_line("missing pattern")?;
            return Ok(ExitCode::UsageError);
        };
        let ignore_case = io.options.flag("ignore-case");
        let invert = io.options.flag("invert");
        let needle = if ignore_case { pattern.to_lowercase() } else { pattern.clone() };
        let mut matched = false;
        while let Some(line) = io.stdin.read_line()? {
            let hay = if ignore_case { line.to_lowercase() } else { line.clone() };
            if hay.contains(&needle) != invert {
                matched = true;
                io.stdout.write_line(&line)?;
            }
        }
        Ok(if matched { ExitCode::Success } else { ExitCode::RuntimeError })
    }
}

impl CommandType for Grep {
    const NAME: &'static str = "grep";
    const DESCRIPTION: &'static str = "filter lines";
    const OPTIONS: &'static [OptionMetadata] = &[
        OptionMetadata::flag("ignore-case").short('i'),
        OptionMetadata::flag("invert").short('v'),
    ];

    fn create() -> Box<dyn Command> {
        Box::new(Grep)
    }
}

/// First `--lines` input lines.
pub struct Head;

impl Command for Head {
    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        let limit = io.options.int("lines").unwrap_or_default();
        for _ in 0..limit {
            match io.stdin.read_line()? {
                Some(line) => io.stdout.write_line(&line)?,
                None => break,
            }
        }
        Ok(ExitCode::Success)
    }
}

impl CommandType for Head {
    const NAME: &'static str = "head";
    const DESCRIPTION: &'static str = "first lines of input";
    const OPTIONS: &'static [OptionMetadata] = &[OptionMetadata::new("lines", ValueKind::Int)
        .short('n')
        .required()
        .describe("how many lines")];

    fn create() -> Box<dyn Command> {
        Box::new(Head)
    }
}

/// Always fails with a message on stderr.
pub struct Fail;

impl Command for Fail {
    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        io.stderr.write_line("fail: giving up")?;
        Ok(ExitCode::RuntimeError)
    }
}

impl CommandType for Fail {
    const NAME: &'static str = "fail";
    const DESCRIPTION: &'static str = "exit with a runtime error";

    fn create() -> Box<dyn Command> {
        Box::new(Fail)
    }
}

/// Returns an error from its body.
pub struct Crash;

impl Command for Crash {
    fn execute(&mut self, _io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        Err(CommandError::Failed("internal failure".into()))
    }
}

impl CommandType for Crash {
    const NAME: &'static str = "crash";
    const DESCRIPTION: &'static str = "return an error";

    fn create() -> Box<dyn Command> {
        Box::new(Crash)
    }
}

/// Writes its argument, cancels the token it was given, then keeps writing.
pub struct Interrupt;

impl Command for Interrupt {
    fn execute(&mut self, io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        io.stdout.write_line("before")?;
        io.cancel.cancel();
        io.stdout.write_line("after")?;
        Ok(ExitCode::Success)
    }
}

impl CommandType for Interrupt {
    const NAME: &'static str = "interrupt";
    const DESCRIPTION: &'static str = "simulate Ctrl-C";

    fn create() -> Box<dyn Command> {
        Box::new(Interrupt)
    }
}

/// Placeholder commands for completion tests.
pub struct Ls;

impl Command for Ls {
    fn execute(&mut self, _io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        Ok(ExitCode::Success)
    }
}

impl CommandType for Ls {
    const NAME: &'static str = "ls";
    const DESCRIPTION: &'static str = "list directory";
    const OPTIONS: &'static [OptionMetadata] = &[
        OptionMetadata::flag("all").short('a').describe("include hidden entries"),
        OptionMetadata::flag("long").short('l'),
    ];

    fn create() -> Box<dyn Command> {
        Box::new(Ls)
    }
}

pub struct Less;

impl Command for Less {
    fn execute(&mut self, _io: &mut Invocation<'_>) -> Result<ExitCode, CommandError> {
        Ok(ExitCode::Success)
    }
}

impl CommandType for Less {
    const NAME: &'static str = "less";
    const DESCRIPTION: &'static str = "page through input";

    fn create() -> Box<dyn Command> {
        Box::new(Less)
    }
}

// ── Harness ──

pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .register::<Echo>()
        .register::<Cat>()
        .register::<Upper>()
        .register::<Grep>()
        .register::<Head>()
        .register::<Fail>()
        .register::<Crash>()
        .register::<Interrupt>()
        .register::<Ls>()
        .register::<Less>();
    registry
}

pub fn shell_in(dir: &Path) -> Shell {
    Shell::new(registry(), PathContext::new(dir, dir))
}

pub fn shell() -> Shell {
    Shell::new(
        registry(),
        PathContext::new("/nonexistent-shline-dir", "/nonexistent-shline-home"),
    )
}

/// Captured result of one `run_line` call.
pub struct Run {
    pub result: Result<ExitCode, Cancelled>,
    pub stdout: String,
    pub stderr: String,
}

impl Run {
    pub fn code(&self) -> ExitCode {
        self.result.expect("pipeline was cancelled")
    }
}

pub fn run_with_input(shell: &Shell, line: &str, input: &str) -> Run {
    let mut stdin = MemoryInput::from_text(input);
    let mut stdout = BufferedOutput::new();
    let mut stderr = BufferedOutput::new();
    let result = shell.run_line(
        line,
        &mut stdin,
        &mut stdout,
        &mut stderr,
        &CancellationToken::new(),
    );
    Run {
        result,
        stdout: stdout.text(),
        stderr: stderr.text(),
    }
}

pub fn run(shell: &Shell, line: &str) -> Run {
    run_with_input(shell, line, "")
}
