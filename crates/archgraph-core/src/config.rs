use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::FileCategory;

pub const CONFIG_FILE_NAME: &str = ".archgraph.toml";

/// Top-level configuration from `.archgraph.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub cycles: CyclesConfig,
}

/// What the scanner picks up and what it skips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// A directory is skipped when its name contains any of these.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    /// Extra glob patterns matched against root-relative paths.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_manifest_names")]
    pub manifest_names: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    ["js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "java", "go"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exclude_dirs() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "dist",
        "build",
        "coverage",
        "__pycache__",
        ".venv",
        ".archgraph",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_manifest_names() -> Vec<String> {
    vec!["package.json".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            exclude_patterns: Vec::new(),
            manifest_names: default_manifest_names(),
        }
    }
}

/// Directory segment names mapping files to categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    #[serde(default = "default_controller_segments")]
    pub controller: Vec<String>,
    #[serde(default = "default_service_segments")]
    pub service: Vec<String>,
    #[serde(default = "default_data_segments")]
    pub data: Vec<String>,
    #[serde(default = "default_middleware_segments")]
    pub middleware: Vec<String>,
    #[serde(default = "default_utility_segments")]
    pub utility: Vec<String>,
    #[serde(default = "default_test_segments")]
    pub test: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_controller_segments() -> Vec<String> {
    strings(&["controllers", "controller"])
}

fn default_service_segments() -> Vec<String> {
    strings(&["services"])
}

fn default_data_segments() -> Vec<String> {
    strings(&["models", "entities"])
}

fn default_middleware_segments() -> Vec<String> {
    strings(&["middleware", "middlewares"])
}

fn default_utility_segments() -> Vec<String> {
    strings(&["utils", "libs", "helpers"])
}

fn default_test_segments() -> Vec<String> {
    strings(&["test", "tests", "spec", "__tests__"])
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            controller: default_controller_segments(),
            service: default_service_segments(),
            data: default_data_segments(),
            middleware: default_middleware_segments(),
            utility: default_utility_segments(),
            test: default_test_segments(),
        }
    }
}

impl CategoriesConfig {
    /// Segment keywords for a category. `Other` has none.
    pub fn segments(&self, category: FileCategory) -> &[String] {
        match category {
            FileCategory::Controller => &self.controller,
            FileCategory::Service => &self.service,
            FileCategory::Data => &self.data,
            FileCategory::Middleware => &self.middleware,
            FileCategory::Utility => &self.utility,
            FileCategory::Test => &self.test,
            FileCategory::Other => &[],
        }
    }

    /// Classify a root-relative path by its directory segments.
    pub fn classify(&self, rel_path: &str) -> FileCategory {
        let normalized = rel_path.replace('\\', "/");
        let mut dirs: Vec<&str> = normalized.split('/').collect();
        dirs.pop();

        FileCategory::RANKED
            .into_iter()
            .find(|category| {
                let keywords = self.segments(*category);
                dirs.iter().any(|d| keywords.iter().any(|k| k == d))
            })
            .unwrap_or(FileCategory::Other)
    }
}

/// Centrality parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Nodes with pagerank strictly above this are reported as core nodes.
    #[serde(default = "default_core_threshold")]
    pub core_threshold: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_core_threshold() -> f64 {
    0.05
}
fn default_damping() -> f64 {
    0.85
}
fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-6
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            core_threshold: default_core_threshold(),
            damping: default_damping(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

/// Limits on elementary-circuit enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyclesConfig {
    #[serde(default = "default_cycle_max_nodes")]
    pub max_nodes: usize,
    #[serde(default = "default_cycle_max_cycles")]
    pub max_cycles: usize,
    #[serde(default = "default_cycle_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_cycle_max_nodes() -> usize {
    5_000
}
fn default_cycle_max_cycles() -> usize {
    10_000
}
fn default_cycle_timeout_ms() -> u64 {
    10_000
}

impl Default for CyclesConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_cycle_max_nodes(),
            max_cycles: default_cycle_max_cycles(),
            timeout_ms: default_cycle_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `.archgraph.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `archgraph init` to create a valid config file",
                path.display()
            )
        })?;
        Ok(config)
    }

    /// Load from `.archgraph.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => config,
                    Err(e) => {
                        log::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    /// Generate default TOML content for `archgraph init`.
    pub fn default_toml() -> String {
        r#"# archgraph - dependency graph analysis configuration

[scan]
extensions = ["js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "java", "go"]
# Directories whose name contains any of these are skipped
exclude_dirs = ["node_modules", ".git", "dist", "build", "coverage", "__pycache__", ".venv", ".archgraph"]
# Extra globs matched against root-relative paths
# exclude_patterns = ["**/*.d.ts", "legacy/**"]
manifest_names = ["package.json"]

[categories]
# Directory segment names that put a file into a category (first match wins,
# checked in the order below)
controller = ["controllers", "controller"]
service = ["services"]
data = ["models", "entities"]
middleware = ["middleware", "middlewares"]
utility = ["utils", "libs", "helpers"]
test = ["test", "tests", "spec", "__tests__"]

[analysis]
core_threshold = 0.05
damping = 0.85
max_iterations = 100
tolerance = 1e-6

[cycles]
max_nodes = 5000
max_cycles = 10000
timeout_ms = 10000
"#
        .to_string()
    }
}
