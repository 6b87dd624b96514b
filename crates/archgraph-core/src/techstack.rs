//! Technology stack hints from well-known files at the project root.
//!
//! Only the root is inspected. One language manifest is read, checked in the
//! order `package.json`, `requirements.txt`, `go.mod`; deployment and CI
//! markers are checked independently.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// What the root manifests and markers reveal. Unknown fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechStack {
    pub language: Option<String>,
    pub runtime: Option<String>,
    /// Runtime dependencies declared in the manifest.
    pub dependency_count: Option<usize>,
    pub framework: Option<String>,
    pub orm: Option<String>,
    pub database: Option<String>,
    pub test_framework: Option<String>,
    pub container: Option<String>,
    pub orchestration: Option<String>,
    pub deployment: Option<String>,
    pub ci_cd: Option<String>,
}

impl TechStack {
    pub fn is_empty(&self) -> bool {
        *self == TechStack::default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    engines: BTreeMap<String, serde_json::Value>,
}

/// First match wins within each list.
const NODE_FRAMEWORKS: [(&str, &str); 3] = [
    ("express", "Express.js"),
    ("fastify", "Fastify"),
    ("react", "React"),
];
const NODE_DATABASES: [(&str, &str); 2] = [("pg", "PostgreSQL"), ("mongodb", "MongoDB")];
const NODE_TEST_FRAMEWORKS: [(&str, &str); 2] = [("jest", "Jest"), ("mocha", "Mocha")];

const PYTHON_FRAMEWORKS: [(&str, &str); 2] = [("django", "Django"), ("flask", "Flask")];

const GO_FRAMEWORKS: [(&str, &str); 2] = [
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/labstack/echo", "Echo"),
];

pub fn detect_tech_stack(root: &Path) -> TechStack {
    let mut stack = TechStack::default();

    let package = root.join("package.json");
    let requirements = root.join("requirements.txt");
    let go_mod = root.join("go.mod");
    if package.is_file() {
        detect_node(&package, &mut stack);
    } else if requirements.is_file() {
        detect_python(&requirements, &mut stack);
    } else if go_mod.is_file() {
        detect_go(&go_mod, &mut stack);
    }

    if root.join("Dockerfile").is_file() {
        stack.container = Some("Docker".to_string());
    }
    if ["docker-compose.yml", "docker-compose.yaml"]
        .iter()
        .any(|name| root.join(name).is_file())
    {
        stack.orchestration = Some("Docker Compose".to_string());
    }
    if root.join("k8s").is_dir() || root.join("kubernetes").is_dir() {
        stack.deployment = Some("Kubernetes".to_string());
    }
    if root.join(".github/workflows").is_dir() {
        stack.ci_cd = Some("GitHub Actions".to_string());
    } else if root.join(".gitlab-ci.yml").is_file() {
        stack.ci_cd = Some("GitLab CI".to_string());
    }

    log::info!("tech stack: {:?}", stack.language);
    stack
}

fn detect_node(path: &Path, stack: &mut TechStack) {
    stack.language = Some("JavaScript".to_string());

    let manifest: PackageManifest = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(m) => m,
        Err(e) => {
            log::warn!("failed to read {}: {e}", path.display());
            return;
        }
    };

    let node = manifest
        .engines
        .get("node")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    stack.runtime = Some(format!("Node.js {node}"));
    stack.dependency_count = Some(manifest.dependencies.len());

    let has = |name: &str| {
        manifest.dependencies.contains_key(name) || manifest.dev_dependencies.contains_key(name)
    };
    stack.framework = first_match(&NODE_FRAMEWORKS, has);
    if has("prisma") || has("@prisma/client") {
        stack.orm = Some("Prisma".to_string());
    }
    stack.database = first_match(&NODE_DATABASES, has);
    stack.test_framework = first_match(&NODE_TEST_FRAMEWORKS, has);
}

fn detect_python(path: &Path, stack: &mut TechStack) {
    stack.language = Some("Python".to_string());

    let Some(content) = read_manifest(path) else {
        return;
    };
    let content = content.to_lowercase();
    let has = |name: &str| content.contains(name);
    stack.framework = first_match(&PYTHON_FRAMEWORKS, has);
    if has("sqlalchemy") {
        stack.orm = Some("SQLAlchemy".to_string());
    }
    if has("pytest") {
        stack.test_framework = Some("pytest".to_string());
    }
}

fn detect_go(path: &Path, stack: &mut TechStack) {
    stack.language = Some("Go".to_string());

    let Some(content) = read_manifest(path) else {
        return;
    };
    stack.framework = first_match(&GO_FRAMEWORKS, |module| content.contains(module));
}

fn read_manifest(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("failed to read {}: {e}", path.display());
            None
        }
    }
}

fn first_match(table: &[(&str, &str)], has: impl Fn(&str) -> bool) -> Option<String> {
    table
        .iter()
        .find(|(needle, _)| has(needle))
        .map(|(_, label)| label.to_string())
}
