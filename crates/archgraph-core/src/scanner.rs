use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::Error;

/// Files found under one root.
#[derive(Debug, Clone)]
pub struct Scan {
    /// Canonical scan root.
    pub root: PathBuf,
    /// Absolute paths of recognized source files, sorted.
    pub files: Vec<PathBuf>,
    /// Project manifests (`package.json` and friends) seen during the walk.
    pub manifest_count: usize,
}

impl Scan {
    /// Root-relative, `/`-separated key for a scanned path.
    pub fn relative_key(&self, path: &Path) -> String {
        relative_key(&self.root, path)
    }
}

/// Enumerates candidate source files, honoring directory exclusions.
pub struct FileScanner {
    extensions: HashSet<String>,
    exclude_dirs: Vec<String>,
    exclude_patterns: GlobSet,
    manifest_names: HashSet<String>,
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::InvalidPattern {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}

impl FileScanner {
    pub fn new(config: &ScanConfig) -> Result<Self, Error> {
        Ok(Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_patterns: build_globset(&config.exclude_patterns)?,
            manifest_names: config.manifest_names.iter().cloned().collect(),
        })
    }

    /// Walk `root` and collect recognized files. Only an unreadable root is an error.
    pub fn scan(&self, root: &Path) -> Result<Scan, Error> {
        let root = root
            .canonicalize()
            .map_err(|source| Error::RootUnreadable {
                path: root.to_path_buf(),
                source,
            })?;
        if !root.is_dir() {
            return Err(Error::RootNotDirectory(root));
        }
        std::fs::read_dir(&root).map_err(|source| Error::RootUnreadable {
            path: root.clone(),
            source,
        })?;

        let mut files = Vec::new();
        let mut manifest_count = 0usize;

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_excluded_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            if self.manifest_names.contains(&*name) {
                manifest_count += 1;
            }

            let matches_ext = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.extensions.contains(ext));
            if !matches_ext {
                continue;
            }

            // Node keys are text; a lossy key could collide with another file's.
            let utf8 = path.strip_prefix(&root).is_ok_and(|rel| rel.to_str().is_some());
            if !utf8 {
                log::warn!("skipping {}: path is not valid UTF-8", path.display());
                continue;
            }

            if self.exclude_patterns.is_match(relative_key(&root, path)) {
                continue;
            }

            files.push(entry.into_path());
        }

        log::info!(
            "scanned {} source files under {}",
            files.len(),
            root.display()
        );

        Ok(Scan {
            root,
            files,
            manifest_count,
        })
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.exclude_dirs.iter().any(|ex| name.contains(ex.as_str()))
    }
}

/// Root-relative, `/`-separated form of `path`. Paths outside `root` are
/// returned as-is.
pub fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(base: &Path, rel: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn keys(scan: &Scan) -> Vec<String> {
        scan.files.iter().map(|f| scan.relative_key(f)).collect()
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "src/a.js");
        touch(tmp.path(), "src/b.py");
        touch(tmp.path(), "README.md");
        touch(tmp.path(), "src/c.go");

        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert_eq!(keys(&scan), vec!["src/a.js", "src/b.py", "src/c.go"]);
    }

    #[test]
    fn test_scan_skips_excluded_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "node_modules/lib/index.js");
        touch(tmp.path(), "app/dist/bundle.js");
        touch(tmp.path(), "app/main.js");
        touch(tmp.path(), "pkg/__pycache__/x.py");

        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert_eq!(keys(&scan), vec!["app/main.js"]);
    }

    #[test]
    fn test_scan_excludes_by_substring() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "my_build_output/a.js");
        touch(tmp.path(), "src/a.js");

        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert_eq!(keys(&scan), vec!["src/a.js"]);
    }

    #[test]
    fn test_scan_applies_glob_exclusions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "src/a.ts");
        touch(tmp.path(), "src/types.d.ts");

        let config = ScanConfig {
            exclude_patterns: vec!["**/*.d.ts".to_string()],
            ..ScanConfig::default()
        };
        let scanner = FileScanner::new(&config).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert_eq!(keys(&scan), vec!["src/a.ts"]);
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let config = ScanConfig {
            exclude_patterns: vec!["src/[".to_string()],
            ..ScanConfig::default()
        };
        assert!(matches!(
            FileScanner::new(&config),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_scan_counts_manifests_outside_excluded_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "package.json");
        touch(tmp.path(), "services/auth/package.json");
        touch(tmp.path(), "node_modules/left-pad/package.json");

        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert_eq!(scan.manifest_count, 2);
        assert!(scan.files.is_empty());
    }

    #[test]
    fn test_scan_empty_dir_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert!(scan.files.is_empty());
        assert_eq!(scan.manifest_count, 0);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let err = scanner.scan(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::RootUnreadable { .. }));
    }

    #[test]
    fn test_scan_file_root_fails() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.js");
        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let err = scanner.scan(&tmp.path().join("a.js")).unwrap_err();
        assert!(matches!(err, Error::RootNotDirectory(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_scan_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "c.js");
        fs::write(tmp.path().join(OsStr::from_bytes(b"\xff.js")), "").unwrap();
        fs::write(tmp.path().join(OsStr::from_bytes(b"\xfe.js")), "").unwrap();
        fs::create_dir(tmp.path().join(OsStr::from_bytes(b"dir\xff"))).unwrap();
        touch(&tmp.path().join(OsStr::from_bytes(b"dir\xff")), "d.js");

        let scanner = FileScanner::new(&ScanConfig::default()).unwrap();
        let scan = scanner.scan(tmp.path()).unwrap();
        assert_eq!(keys(&scan), vec!["c.js"]);
    }

    #[test]
    fn test_relative_key_uses_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_key(root, Path::new("/repo/src/app/main.ts")),
            "src/app/main.ts"
        );
    }
}
