//! File logging for embedded shells.
//!
//! The crate logs through the `log` facade. Hosts that have no logger of their
//! own call [`init`] to install a `simplelog` file logger.

use std::path::PathBuf;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::config::LoggingConfig;
use crate::exec::{Cancelled, ExitCode};

/// Longest command line text recorded per outcome.
const MAX_LOGGED_CHARS: usize = 200;

/// Install a file logger per `config`.
///
/// Best-effort: returns `false` when logging is off, the file cannot be
/// opened, or another logger is already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let Some(level) = parse_level(&config.level) else {
        return false;
    };
    if level == LevelFilter::Off || config.file.is_empty() {
        return false;
    }

    let path = PathBuf::from(shellexpand::tilde(&config.file).into_owned());
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return false;
    };

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, log_config, file).is_ok()
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Record one executed command line with its outcome.
pub fn log_outcome(line: &str, outcome: &Result<ExitCode, Cancelled>) {
    let status = match outcome {
        Ok(code) => format!("{} ({})", code.as_i32(), code.label()),
        Err(Cancelled) => "interrupted".to_string(),
    };
    log::info!("{status}\t{}", summarize(line));
}

/// Single-line, length-capped rendering of a command line.
fn summarize(line: &str) -> String {
    let flat = line.replace(['\n', '\r'], " ");
    flat.chars().take(MAX_LOGGED_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("WARN"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn summary_flattens_and_truncates() {
        assert_eq!(summarize("a\nb"), "a b");
        let long = "x".repeat(500);
        assert_eq!(summarize(&long).chars().count(), MAX_LOGGED_CHARS);
    }

    #[test]
    fn init_off_is_noop() {
        let config = LoggingConfig {
            level: "off".into(),
            file: "/nonexistent/shline.log".into(),
        };
        assert!(!init(&config));
    }

    #[test]
    fn init_without_file_is_noop() {
        let config = LoggingConfig {
            level: "info".into(),
            file: String::new(),
        };
        assert!(!init(&config));
    }
}
