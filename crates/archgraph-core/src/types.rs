use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse role of a file, derived from the directory segments of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Controller,
    Service,
    Data,
    Middleware,
    Utility,
    Test,
    Other,
}

impl FileCategory {
    /// Categories checked during classification, in priority order.
    /// `Other` is the fallback and never matched by keyword.
    pub const RANKED: [FileCategory; 6] = [
        FileCategory::Controller,
        FileCategory::Service,
        FileCategory::Data,
        FileCategory::Middleware,
        FileCategory::Utility,
        FileCategory::Test,
    ];
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileCategory::Controller => write!(f, "controller"),
            FileCategory::Service => write!(f, "service"),
            FileCategory::Data => write!(f, "data"),
            FileCategory::Middleware => write!(f, "middleware"),
            FileCategory::Utility => write!(f, "utility"),
            FileCategory::Test => write!(f, "test"),
            FileCategory::Other => write!(f, "other"),
        }
    }
}

/// A scanned source file. The relative path is the graph node key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the scan root, always `/`-separated.
    pub path: String,
    pub category: FileCategory,
    pub size: u64,
    pub lines: usize,
}

/// Kind tag carried by every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Imports,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Imports => write!(f, "imports"),
        }
    }
}

/// "`from` imports `to`", both relative paths of scanned files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: String,
    pub to: String,
    pub weight: u32,
    pub kind: EdgeKind,
}

impl ImportEdge {
    pub fn imports(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: 1,
            kind: EdgeKind::Imports,
        }
    }
}

/// Importance scores for one node, comparable only within a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CentralityScore {
    pub pagerank: f64,
    pub betweenness: f64,
    pub degree: f64,
}

/// Node paths of a simple directed cycle. The closing edge back to the
/// first element is implied.
pub type Cycle = Vec<String>;

/// Architectural pattern kinds the heuristics can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    #[serde(rename = "Layered Architecture")]
    LayeredArchitecture,
    #[serde(rename = "MVC Pattern")]
    Mvc,
    #[serde(rename = "Repository Pattern")]
    Repository,
    #[serde(rename = "Service Object Pattern")]
    ServiceObject,
    #[serde(rename = "Possible Microservices")]
    Microservices,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::LayeredArchitecture => write!(f, "Layered Architecture"),
            PatternKind::Mvc => write!(f, "MVC Pattern"),
            PatternKind::Repository => write!(f, "Repository Pattern"),
            PatternKind::ServiceObject => write!(f, "Service Object Pattern"),
            PatternKind::Microservices => write!(f, "Possible Microservices"),
        }
    }
}

impl PatternKind {
    /// One-line explanation of what the pattern means for the codebase.
    pub fn description(&self) -> &'static str {
        match self {
            PatternKind::LayeredArchitecture => {
                "Layered architecture: API layer -> service layer -> data access layer"
            }
            PatternKind::Mvc => "MVC: controllers, models and views kept apart",
            PatternKind::Repository => "Repository: data access behind an abstraction layer",
            PatternKind::ServiceObject => "Service objects: business logic wrapped in services",
            PatternKind::Microservices => "Possibly several independently deployed services",
        }
    }
}

/// A detected architectural hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: PatternKind,
    pub confidence: f64,
    pub description: String,
    pub evidence: Vec<String>,
}

impl Pattern {
    pub fn new(name: PatternKind, confidence: f64, evidence: Vec<String>) -> Self {
        Self {
            name,
            confidence,
            description: name.description().to_string(),
            evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&FileCategory::Middleware).unwrap();
        assert_eq!(json, "\"middleware\"");
    }

    #[test]
    fn test_pattern_name_serializes_as_display() {
        let pattern = Pattern::new(PatternKind::ServiceObject, 0.75, vec![]);
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["name"], "Service Object Pattern");
        assert_eq!(
            json["description"],
            "Service objects: business logic wrapped in services"
        );
        assert_eq!(
            PatternKind::ServiceObject.to_string(),
            "Service Object Pattern"
        );
    }

    #[test]
    fn test_import_edge_defaults() {
        let edge = ImportEdge::imports("a.js", "b.js");
        assert_eq!(edge.weight, 1);
        assert_eq!(edge.kind, EdgeKind::Imports);
        assert_eq!(edge.kind.to_string(), "imports");
    }
}
