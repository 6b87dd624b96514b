//! Architectural pattern heuristics.
//!
//! Each rule looks only at file categories, path text and the manifest
//! count. Confidences are fixed per rule.

use std::collections::BTreeMap;

use crate::types::{FileCategory, Pattern, PatternKind, SourceFile};

pub const LAYERED_CONFIDENCE: f64 = 0.85;
pub const MVC_CONFIDENCE: f64 = 0.75;
pub const MVC_WITHOUT_MODELS_CONFIDENCE: f64 = 0.70;
pub const REPOSITORY_CONFIDENCE: f64 = 0.80;
pub const SERVICE_OBJECT_CONFIDENCE: f64 = 0.75;
pub const MICROSERVICES_CONFIDENCE: f64 = 0.60;

/// More manifests than this suggests several deployable services.
const MICROSERVICES_MIN_MANIFESTS: usize = 2;

/// Run every rule over the scanned files. Output order is fixed: layered,
/// MVC, repository, service object, microservices.
pub fn detect_patterns<'a, I>(files: I, manifest_count: usize) -> Vec<Pattern>
where
    I: IntoIterator<Item = &'a SourceFile>,
{
    let mut counts: BTreeMap<FileCategory, usize> = BTreeMap::new();
    let mut paths: Vec<String> = Vec::new();
    for file in files {
        *counts.entry(file.category).or_default() += 1;
        paths.push(file.path.to_lowercase());
    }
    let count = |c: FileCategory| counts.get(&c).copied().unwrap_or(0);

    let mut patterns = Vec::new();

    let (controllers, services, data) = (
        count(FileCategory::Controller),
        count(FileCategory::Service),
        count(FileCategory::Data),
    );

    if controllers > 0 && services > 0 && data > 0 {
        patterns.push(Pattern::new(
            PatternKind::LayeredArchitecture,
            LAYERED_CONFIDENCE,
            vec![
                format!("Controllers: {controllers} files"),
                format!("Services: {services} files"),
                format!("Data layer: {data} files"),
            ],
        ));
    }

    let has_views = paths
        .iter()
        .any(|p| p.split('/').any(|segment| segment == "views"));
    if controllers > 0 && has_views {
        let (confidence, evidence) = if data > 0 {
            (
                MVC_CONFIDENCE,
                vec![
                    "Controllers detected".to_string(),
                    "Models detected".to_string(),
                    "Views directory exists".to_string(),
                ],
            )
        } else {
            (
                MVC_WITHOUT_MODELS_CONFIDENCE,
                vec![
                    "Controllers detected".to_string(),
                    "Views directory exists".to_string(),
                ],
            )
        };
        patterns.push(Pattern::new(PatternKind::Mvc, confidence, evidence));
    }

    let repository_files = paths
        .iter()
        .filter(|p| p.contains("repository") || p.contains("repositories"))
        .count();
    if repository_files > 0 {
        patterns.push(Pattern::new(
            PatternKind::Repository,
            REPOSITORY_CONFIDENCE,
            vec![format!("Found {repository_files} repository files")],
        ));
    }

    let service_files = paths.iter().filter(|p| p.contains("service")).count();
    if service_files > 0 {
        patterns.push(Pattern::new(
            PatternKind::ServiceObject,
            SERVICE_OBJECT_CONFIDENCE,
            vec![format!("Found {service_files} service files")],
        ));
    }

    if manifest_count > MICROSERVICES_MIN_MANIFESTS {
        patterns.push(Pattern::new(
            PatternKind::Microservices,
            MICROSERVICES_CONFIDENCE,
            vec![format!("{manifest_count} package manifests found")],
        ));
    }

    log::info!("detected {} architecture patterns", patterns.len());
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, category: FileCategory) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            category,
            size: 0,
            lines: 0,
        }
    }

    fn names(patterns: &[Pattern]) -> Vec<PatternKind> {
        patterns.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_no_patterns_for_flat_tree() {
        let files = vec![file("index.js", FileCategory::Other)];
        assert!(detect_patterns(&files, 1).is_empty());
    }

    #[test]
    fn test_layered_architecture() {
        let files = vec![
            file("controllers/a.js", FileCategory::Controller),
            file("controllers/b.js", FileCategory::Controller),
            file("services/c.js", FileCategory::Service),
            file("models/d.js", FileCategory::Data),
        ];
        let patterns = detect_patterns(&files, 0);
        let layered = &patterns[0];
        assert_eq!(layered.name, PatternKind::LayeredArchitecture);
        assert!((layered.confidence - 0.85).abs() < f64::EPSILON);
        assert!(layered.description.starts_with("Layered architecture"));
        assert_eq!(
            layered.evidence,
            vec!["Controllers: 2 files", "Services: 1 files", "Data layer: 1 files"]
        );
    }

    #[test]
    fn test_layered_requires_data_category() {
        let files = vec![
            file("controllers/a.js", FileCategory::Controller),
            file("services/b.js", FileCategory::Service),
            file("repositories/c.js", FileCategory::Other),
        ];
        let patterns = detect_patterns(&files, 0);
        assert_eq!(
            names(&patterns),
            vec![PatternKind::Repository, PatternKind::ServiceObject]
        );
        assert!((patterns[0].confidence - 0.80).abs() < f64::EPSILON);
        assert_eq!(patterns[0].evidence, vec!["Found 1 repository files"]);
    }

    #[test]
    fn test_mvc_strict_and_loose() {
        let strict = vec![
            file("app/controllers/a.js", FileCategory::Controller),
            file("app/models/b.js", FileCategory::Data),
            file("app/views/c.js", FileCategory::Other),
        ];
        let patterns = detect_patterns(&strict, 0);
        let mvc = patterns.iter().find(|p| p.name == PatternKind::Mvc).unwrap();
        assert!((mvc.confidence - 0.75).abs() < f64::EPSILON);
        assert_eq!(mvc.evidence.len(), 3);

        let loose = vec![
            file("app/controllers/a.js", FileCategory::Controller),
            file("app/views/c.js", FileCategory::Other),
        ];
        let patterns = detect_patterns(&loose, 0);
        let mvc = patterns.iter().find(|p| p.name == PatternKind::Mvc).unwrap();
        assert!((mvc.confidence - 0.70).abs() < f64::EPSILON);
        assert_eq!(mvc.evidence.len(), 2);
    }

    #[test]
    fn test_views_must_be_a_segment() {
        let files = vec![
            file("controllers/a.js", FileCategory::Controller),
            file("src/reviews.js", FileCategory::Other),
        ];
        let patterns = detect_patterns(&files, 0);
        assert!(!names(&patterns).contains(&PatternKind::Mvc));
    }

    #[test]
    fn test_service_object_matches_file_names() {
        let files = vec![file("src/UserService.ts", FileCategory::Other)];
        let patterns = detect_patterns(&files, 0);
        assert_eq!(names(&patterns), vec![PatternKind::ServiceObject]);
        assert_eq!(patterns[0].evidence, vec!["Found 1 service files"]);
    }

    #[test]
    fn test_microservices_needs_more_than_two_manifests() {
        assert!(detect_patterns(std::iter::empty(), 2).is_empty());

        let patterns = detect_patterns(std::iter::empty(), 3);
        assert_eq!(names(&patterns), vec![PatternKind::Microservices]);
        assert!((patterns[0].confidence - 0.60).abs() < f64::EPSILON);
        assert_eq!(patterns[0].evidence, vec!["3 package manifests found"]);
    }
}
