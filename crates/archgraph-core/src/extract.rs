//! Best-effort static import extraction.
//!
//! Recognition is regex based and line oriented. Multi-line or computed
//! import expressions are missed, and text inside comments or strings can
//! produce false positives. Both are accepted.

use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// Extraction and resolution strategy, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxFamily {
    /// Curly-brace module syntax: JavaScript and TypeScript.
    Script,
    /// Indentation-based syntax: Python.
    Indented,
    /// Scanned as a node, but imports are not followed.
    Opaque,
}

impl SyntaxFamily {
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => SyntaxFamily::Script,
            "py" => SyntaxFamily::Indented,
            _ => SyntaxFamily::Opaque,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(SyntaxFamily::Opaque)
    }
}

const STATIC_IMPORT_SRC: &str = r#"(?:import|export)\s+.*?\s+from\s+['"]([^'"]+)['"]"#;
const REQUIRE_SRC: &str = r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#;
const DYNAMIC_IMPORT_SRC: &str = r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#;
const PY_IMPORT_SRC: &str = r"(?m)^import\s+([A-Za-z_][\w.]*)";
const PY_FROM_SRC: &str = r"(?m)^from\s+([A-Za-z_][\w.]*)\s+import\b";

/// Compiled pattern families. Build once, share across files.
pub struct ImportExtractor {
    script: [Regex; 3],
    indented: [Regex; 2],
}

impl ImportExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            script: [
                Regex::new(STATIC_IMPORT_SRC).context("failed to compile static import pattern")?,
                Regex::new(REQUIRE_SRC).context("failed to compile require pattern")?,
                Regex::new(DYNAMIC_IMPORT_SRC).context("failed to compile dynamic import pattern")?,
            ],
            indented: [
                Regex::new(PY_IMPORT_SRC).context("failed to compile python import pattern")?,
                Regex::new(PY_FROM_SRC).context("failed to compile python from-import pattern")?,
            ],
        })
    }

    /// Raw import targets in first-occurrence order, without duplicates.
    pub fn extract(&self, family: SyntaxFamily, content: &str) -> Vec<String> {
        let raw: Vec<String> = match family {
            SyntaxFamily::Script => captures(&self.script, content)
                .filter(|target| target.starts_with('.'))
                .collect(),
            SyntaxFamily::Indented => captures(&self.indented, content).collect(),
            SyntaxFamily::Opaque => Vec::new(),
        };
        dedup_in_order(raw)
    }
}

/// Run each pattern over the whole text and chain their first captures.
fn captures<'a>(patterns: &'a [Regex], content: &'a str) -> impl Iterator<Item = String> + 'a {
    patterns.iter().flat_map(move |re| {
        re.captures_iter(content)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Read a file, replacing invalid UTF-8 instead of failing.
pub fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
