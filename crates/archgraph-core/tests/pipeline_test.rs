use std::collections::HashSet;
use std::fs;
use std::path::Path;

use archgraph_core::{AnalysisPipeline, AnalysisResult, Config, PatternKind};

fn write(base: &Path, rel: &str, content: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn analyze(root: &Path) -> AnalysisResult {
    AnalysisPipeline::new(Config::default())
        .unwrap()
        .analyze(root)
        .unwrap()
}

fn edge_pairs(result: &AnalysisResult) -> Vec<(String, String)> {
    result
        .edges
        .iter()
        .map(|e| (e.from.clone(), e.to.clone()))
        .collect()
}

#[test]
fn test_controller_service_repository_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "controllers/a.js",
        "const b = require('../services/b');\n",
    );
    write(tmp.path(), "services/b.js", "module.exports = {};\n");
    write(tmp.path(), "repositories/c.js", "module.exports = {};\n");

    let result = analyze(tmp.path());

    assert_eq!(result.nodes.len(), 3);
    assert_eq!(
        edge_pairs(&result),
        vec![("controllers/a.js".to_string(), "services/b.js".to_string())]
    );

    let names: Vec<PatternKind> = result.patterns.iter().map(|p| p.name).collect();
    assert!(!names.contains(&PatternKind::LayeredArchitecture));
    let repository = result
        .patterns
        .iter()
        .find(|p| p.name == PatternKind::Repository)
        .expect("repository pattern");
    assert!((repository.confidence - 0.80).abs() < f64::EPSILON);
}

#[test]
fn test_three_file_cycle_reported_once_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "a.js", "import { b } from './b';\n");
    write(tmp.path(), "b.js", "import { c } from './c';\n");
    write(tmp.path(), "c.js", "import { a } from './a';\n");

    let result = analyze(tmp.path());
    assert_eq!(result.cycles.len(), 1);
    assert_eq!(result.cycles[0], vec!["a.js", "b.js", "c.js"]);
}

#[test]
fn test_mutual_import() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "a.ts", "import { b } from './b';\n");
    write(tmp.path(), "b.ts", "import { a } from './a';\n");

    let result = analyze(tmp.path());
    assert_eq!(result.edges.len(), 2);
    assert_eq!(result.cycles, vec![vec!["a.ts".to_string(), "b.ts".to_string()]]);
}

#[test]
fn test_zero_edges_scores_uniformly() {
    let tmp = tempfile::tempdir().unwrap();
    for name in ["a.js", "b.js", "c.js", "d.js"] {
        write(tmp.path(), name, "console.log('hi');\n");
    }

    let result = analyze(tmp.path());
    assert!(result.edges.is_empty());
    for node in &result.nodes {
        let pr = node.pagerank.unwrap();
        assert!(pr > 0.0);
        assert!((pr - 0.25).abs() < 1e-6);
        assert_eq!(node.degree, Some(0.0));
    }
    // 0.25 is above the default threshold, so every node is core.
    assert_eq!(result.core_nodes.len(), 4);
}

#[test]
fn test_unresolved_and_external_imports_add_no_edges() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "src/app.js",
        "import React from 'react';\nimport x from './missing';\nconst y = require('../outside');\n",
    );

    let result = analyze(tmp.path());
    assert_eq!(result.nodes.len(), 1);
    assert!(result.edges.is_empty());
}

#[test]
fn test_edges_stay_within_node_set_without_duplicates() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "src/index.js",
        "import a from './a';\nconst a2 = require('./a');\nimport('./a.js');\nimport lib from './lib/';\n",
    );
    write(tmp.path(), "src/a.js", "import idx from './index';\n");
    write(tmp.path(), "src/lib/index.ts", "export const x = 1;\n");
    write(tmp.path(), "node_modules/pkg/index.js", "");
    write(
        tmp.path(),
        "src/vendored.js",
        "import p from '../node_modules/pkg/index.js';\n",
    );

    let result = analyze(tmp.path());
    let nodes: HashSet<&str> = result.nodes.iter().map(|n| n.path.as_str()).collect();
    for edge in &result.edges {
        assert!(nodes.contains(edge.from.as_str()), "{edge:?}");
        assert!(nodes.contains(edge.to.as_str()), "{edge:?}");
    }

    let pairs = edge_pairs(&result);
    let unique: HashSet<_> = pairs.iter().cloned().collect();
    assert_eq!(unique.len(), pairs.len());
    assert!(pairs.contains(&("src/index.js".to_string(), "src/a.js".to_string())));
    assert!(pairs.contains(&("src/index.js".to_string(), "src/lib/index.ts".to_string())));
    assert!(!nodes.contains("node_modules/pkg/index.js"));
    assert_eq!(result.edges.len(), 3);
}

#[test]
fn test_analysis_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "controllers/a.js", "import b from '../services/b';\n");
    write(tmp.path(), "services/b.js", "import m from '../models/m';\n");
    write(tmp.path(), "models/m.js", "");

    let first = analyze(tmp.path());
    let second = analyze(tmp.path());

    let node_set =
        |r: &AnalysisResult| -> Vec<String> { r.nodes.iter().map(|n| n.path.clone()).collect() };
    assert_eq!(node_set(&first), node_set(&second));
    assert_eq!(edge_pairs(&first), edge_pairs(&second));
    assert_eq!(first.patterns, second.patterns);

    for (a, b) in first.nodes.iter().zip(&second.nodes) {
        let (pa, pb) = (a.pagerank.unwrap(), b.pagerank.unwrap());
        assert!((pa - pb).abs() < 1e-6, "{}: {pa} vs {pb}", a.path);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_do_not_merge_nodes() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join(OsStr::from_bytes(b"\xff.js")),
        "import c from './c';\n",
    )
    .unwrap();
    fs::write(tmp.path().join(OsStr::from_bytes(b"\xfe.js")), "").unwrap();
    write(tmp.path(), "c.js", "");

    let result = analyze(tmp.path());
    assert_eq!(result.summary.file_count, result.summary.node_count);
    assert_eq!(result.summary.node_count, 1);
    assert!(result.edges.is_empty());
}

#[test]
fn test_layered_project_detected() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "src/controllers/user.js", "");
    write(tmp.path(), "src/services/user.js", "");
    write(tmp.path(), "src/models/user.js", "");
    write(tmp.path(), "src/views/user.html.js", "");

    let result = analyze(tmp.path());
    let names: Vec<PatternKind> = result.patterns.iter().map(|p| p.name).collect();
    assert_eq!(names[0], PatternKind::LayeredArchitecture);
    assert!(names.contains(&PatternKind::Mvc));
}

#[test]
fn test_manifests_trigger_microservices() {
    let tmp = tempfile::tempdir().unwrap();
    for service in ["auth", "billing", "gateway"] {
        write(tmp.path(), &format!("{service}/package.json"), "{}");
        write(tmp.path(), &format!("{service}/index.js"), "");
    }

    let result = analyze(tmp.path());
    assert_eq!(result.summary.manifest_count, 3);
    assert!(result
        .patterns
        .iter()
        .any(|p| p.name == PatternKind::Microservices));
}

#[test]
fn test_config_file_is_honored() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        ".archgraph.toml",
        "[scan]\nextensions = [\"py\"]\n\n[analysis]\ncore_threshold = 0.9\n",
    );
    write(tmp.path(), "a.py", "");
    write(tmp.path(), "b.js", "");

    let config = Config::load_or_default(tmp.path());
    let result = AnalysisPipeline::new(config)
        .unwrap()
        .analyze(tmp.path())
        .unwrap();
    assert_eq!(result.nodes.len(), 1);
    assert_eq!(result.nodes[0].path, "a.py");
    // A single node holds all rank, which is still above 0.9.
    assert_eq!(result.core_nodes.len(), 1);
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = AnalysisPipeline::new(Config::default())
        .unwrap()
        .analyze(&tmp.path().join("nope"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to scan"));
}
