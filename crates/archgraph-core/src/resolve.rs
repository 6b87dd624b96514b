use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::extract::SyntaxFamily;

/// Suffixes tried after the bare import string, in order.
pub const SCRIPT_SUFFIXES: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];

const INDEX_STEM: &str = "index";
const PYTHON_SUFFIX: &str = ".py";

/// Maps raw relative imports onto files from the current scan.
pub struct PathResolver<'a> {
    scanned: &'a HashSet<PathBuf>,
}

impl<'a> PathResolver<'a> {
    pub fn new(scanned: &'a HashSet<PathBuf>) -> Self {
        Self { scanned }
    }

    /// Resolve `raw` as imported from `importer`.
    ///
    /// The first candidate that exists as a file wins. The winner is dropped
    /// when it was not scanned or is the importer itself.
    pub fn resolve(&self, importer: &Path, family: SyntaxFamily, raw: &str) -> Option<PathBuf> {
        let base = importer.parent()?;
        let candidates = match family {
            SyntaxFamily::Script => script_candidates(base, raw),
            SyntaxFamily::Indented => vec![indented_candidate(base, raw)],
            SyntaxFamily::Opaque => return None,
        };

        let found = candidates.into_iter().find(|c| c.is_file())?;
        if found == importer {
            log::debug!("{} imports itself, dropped", importer.display());
            return None;
        }
        if !self.scanned.contains(&found) {
            log::trace!("{raw} resolved outside the scanned set: {}", found.display());
            return None;
        }
        Some(found)
    }
}

fn is_directory_import(raw: &str) -> bool {
    raw.ends_with('/') || raw == "." || raw == ".."
}

fn script_candidates(base: &Path, raw: &str) -> Vec<PathBuf> {
    if is_directory_import(raw) {
        let dir = normalize(&base.join(raw));
        return std::iter::once(String::new())
            .chain(SCRIPT_SUFFIXES.iter().map(|s| s.to_string()))
            .map(|suffix| dir.join(format!("{INDEX_STEM}{suffix}")))
            .collect();
    }

    std::iter::once(String::new())
        .chain(SCRIPT_SUFFIXES.iter().map(|s| s.to_string()))
        .map(|suffix| normalize(&base.join(format!("{raw}{suffix}"))))
        .collect()
}

fn indented_candidate(base: &Path, raw: &str) -> PathBuf {
    let rel = format!("{}{PYTHON_SUFFIX}", raw.replace('.', "/"));
    normalize(&base.join(rel))
}

/// Lexically fold `.` and `..` components. Symlinks are not followed.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
