//! Working and home directory resolution for redirections and completion.

use std::path::{Path, PathBuf};

use crate::config::Settings;

/// The directories a command line is interpreted against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    working_dir: PathBuf,
    home_dir: PathBuf,
}

impl PathContext {
    pub fn new(working_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Directories from configuration; empty settings fall back to the
    /// process working directory and `$HOME`.
    pub fn from_settings(settings: &Settings) -> Self {
        let home_dir = match settings.home_dir.as_str() {
            "" => std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/")),
            dir => PathBuf::from(shellexpand::tilde(dir).into_owned()),
        };
        let working_dir = match settings.working_dir.as_str() {
            "" => std::env::current_dir().unwrap_or_else(|_| home_dir.clone()),
            dir => PathBuf::from(shellexpand::tilde(dir).into_owned()),
        };
        Self {
            working_dir,
            home_dir,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn set_working_dir(&mut self, dir: impl Into<PathBuf>) {
        self.working_dir = dir.into();
    }

    /// Expand a leading `~` to the home directory and anchor relative paths
    /// at the working directory.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let home = self.home_dir.to_string_lossy();
        let expanded = shellexpand::tilde_with_context(raw, || Some(&*home));
        let path = Path::new(&*expanded);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}
