//! File-system path candidates.

use std::cmp::Ordering;

use super::Candidate;
use crate::paths::PathContext;

struct Entry {
    name: String,
    is_dir: bool,
}

/// Entries matching `partial` in the directory it names.
///
/// `partial` is split at its last `/`: the head selects the directory (with
/// `~` and relative resolution), the tail is a case-sensitive name prefix.
/// Directories sort before files and carry a trailing `/`. Dot-files are
/// offered only when the prefix starts with `.` or `show_hidden` is set.
pub(crate) fn complete_path(partial: &str, paths: &PathContext, show_hidden: bool) -> Vec<Candidate> {
    let (head, prefix) = match partial.rfind('/') {
        Some(idx) => partial.split_at(idx + 1),
        None if partial == "~" => ("~/", ""),
        None => ("", partial),
    };

    let dir = if head.is_empty() {
        paths.working_dir().to_path_buf()
    } else {
        paths.resolve(head)
    };
    let Ok(read_dir) = std::fs::read_dir(&dir) else {
        log::debug!("path completion: cannot read {}", dir.display());
        return Vec::new();
    };

    let include_hidden = show_hidden || prefix.starts_with('.');
    let mut entries: Vec<Entry> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(prefix) || (name.starts_with('.') && !include_hidden) {
                return None;
            }
            Some(Entry {
                is_dir: entry.path().is_dir(),
                name,
            })
        })
        .collect();

    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });

    entries
        .into_iter()
        .map(|entry| {
            let suffix = if entry.is_dir { "/" } else { "" };
            let display = format!("{}{suffix}", entry.name);
            Candidate::new(format!("{head}{display}")).with_display(display)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, PathContext) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("deploy.sh"), "").unwrap();
        fs::write(dir.path().join(".dotfile"), "").unwrap();
        fs::write(dir.path().join("docs/readme.md"), "").unwrap();
        fs::write(dir.path().join("Dump.txt"), "").unwrap();
        let paths = PathContext::new(dir.path(), dir.path().join("docs"));
        (dir, paths)
    }

    fn replacements(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.replacement.as_str()).collect()
    }

    #[test]
    fn directories_first_with_separator() {
        let (_dir, paths) = fixture();
        let found = complete_path("d", &paths, false);
        assert_eq!(replacements(&found), vec!["data/", "docs/", "deploy.sh"]);
    }

    #[test]
    fn prefix_is_case_sensitive() {
        let (_dir, paths) = fixture();
        assert_eq!(replacements(&complete_path("D", &paths, false)), vec!["Dump.txt"]);
    }

    #[test]
    fn hidden_files_need_dot_prefix() {
        let (_dir, paths) = fixture();
        assert!(!replacements(&complete_path("", &paths, false)).contains(&".dotfile"));
        assert_eq!(replacements(&complete_path(".", &paths, false)), vec![".dotfile"]);
        assert!(replacements(&complete_path("", &paths, true)).contains(&".dotfile"));
    }

    #[test]
    fn nested_directory_keeps_head() {
        let (_dir, paths) = fixture();
        let found = complete_path("docs/re", &paths, false);
        assert_eq!(replacements(&found), vec!["docs/readme.md"]);
        assert_eq!(found[0].display, "readme.md");
    }

    #[test]
    fn tilde_resolves_to_home() {
        let (_dir, paths) = fixture();
        assert_eq!(replacements(&complete_path("~/r", &paths, false)), vec!["~/readme.md"]);
    }

    #[test]
    fn unreadable_directory_is_empty() {
        let (_dir, paths) = fixture();
        assert!(complete_path("missing/", &paths, false).is_empty());
    }
}
