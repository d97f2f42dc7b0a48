//! Local glob expansion
//!
//! Expands a local source argument (plain path or glob pattern) into a
//! concrete file list, preserving the base prefix that destination keys are
//! derived against.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Wildcard tokens recognised in a source argument
const WILDCARDS: &[char] = &['*', '?', '['];

/// Result of expanding a local source argument
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Matched files, in glob/listing order
    pub files: Vec<PathBuf>,
    /// Longest literal path preceding the first wildcard token; stripped from
    /// each match to derive the relative suffix for destination keys
    pub base: PathBuf,
}

impl Expansion {
    /// The suffix of `file` relative to the base prefix, `/`-separated for
    /// use in destination keys.
    pub fn relative_suffix(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.base).unwrap_or(file);
        relative.to_string_lossy().replace('\\', "/")
    }
}

/// Expand a local source argument into a concrete list of files.
///
/// A plain file is a single-element list; a plain directory yields every file
/// under it, recursively. Wildcard arguments expand with standard glob
/// semantics (`*`, `**`, `?`), and directories matched by the pattern are
/// themselves walked recursively. Zero matched files is a NotFound error.
pub fn expand_source(source: &Path) -> Result<Expansion> {
    let text = source.to_string_lossy();

    let (files, base) = if text.contains(WILDCARDS) {
        let mut files = Vec::new();
        for entry in glob::glob(&text)? {
            let path = entry.map_err(|e| Error::Io(e.into_error()))?;
            if path.is_dir() {
                collect_files(&path, &mut files)?;
            } else if path.is_file() {
                files.push(path);
            }
        }
        (files, base_prefix(&text))
    } else if source.is_dir() {
        let mut files = Vec::new();
        collect_files(source, &mut files)?;
        (files, source.to_path_buf())
    } else if source.is_file() {
        let base = source.parent().unwrap_or(Path::new("")).to_path_buf();
        (vec![source.to_path_buf()], base)
    } else {
        return Err(Error::NotFound(format!(
            "No such file or directory: {}",
            source.display()
        )));
    };

    if files.is_empty() {
        return Err(Error::NotFound(format!(
            "No files matched: {}",
            source.display()
        )));
    }

    Ok(Expansion { files, base })
}

/// The longest literal path ending at the segment boundary before the first
/// wildcard token. `docs/**/*.html` has base `docs`; `*.txt` has an empty
/// base.
pub fn base_prefix(pattern: &str) -> PathBuf {
    let literal = match pattern.find(WILDCARDS) {
        Some(pos) => &pattern[..pos],
        None => pattern,
    };
    match literal.rfind('/') {
        Some(pos) => PathBuf::from(&literal[..pos]),
        None => PathBuf::new(),
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
