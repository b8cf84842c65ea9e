use crate::error::{BindError, CommandError, ParseError};

/// POSIX-style result of running a command or a whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExitCode {
    Success,
    RuntimeError,
    UsageError,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::RuntimeError => 1,
            ExitCode::UsageError => 2,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }

    pub fn label(self) -> &'static str {
        match self {
            ExitCode::Success => "success",
            ExitCode::RuntimeError => "runtime error",
            ExitCode::UsageError => "usage error",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // as_i32 is always within 0..=2
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

impl From<&ParseError> for ExitCode {
    fn from(_: &ParseError) -> Self {
        ExitCode::UsageError
    }
}

impl From<&BindError> for ExitCode {
    fn from(_: &BindError) -> Self {
        ExitCode::UsageError
    }
}

impl From<&CommandError> for ExitCode {
    fn from(_: &CommandError) -> Self {
        ExitCode::RuntimeError
    }
}
