use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::quality::QualityStats;
use crate::techstack::TechStack;
use crate::types::{CentralityScore, Cycle, FileCategory, ImportEdge, Pattern};

/// One node of the result. Scores are `None` when centrality failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
    pub path: String,
    pub category: FileCategory,
    pub size: u64,
    pub lines: usize,
    pub pagerank: Option<f64>,
    pub betweenness: Option<f64>,
    pub degree: Option<f64>,
}

/// Scan-level counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub file_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub manifest_count: usize,
    pub scanned_at: DateTime<Utc>,
}

/// Full analysis output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub nodes: Vec<NodeReport>,
    pub edges: Vec<ImportEdge>,
    /// Nodes whose pagerank exceeds the core threshold, highest first.
    pub core_nodes: Vec<NodeReport>,
    pub patterns: Vec<Pattern>,
    pub cycles: Vec<Cycle>,
    pub summary: Summary,
    pub quality: QualityStats,
    pub tech_stack: TechStack,
}

impl AnalysisResult {
    pub fn node(&self, path: &str) -> Option<&NodeReport> {
        self.nodes.iter().find(|n| n.path == path)
    }

    pub fn has_scores(&self) -> bool {
        self.nodes.iter().all(|n| n.pagerank.is_some()) && !self.nodes.is_empty()
    }
}

/// Outputs of the analysis stages, each possibly empty after a soft failure.
#[derive(Debug, Clone, Default)]
pub struct Findings {
    /// Indexed like the graph's nodes.
    pub scores: Option<Vec<CentralityScore>>,
    pub cycles: Vec<Cycle>,
    pub patterns: Vec<Pattern>,
    pub quality: QualityStats,
    pub tech_stack: TechStack,
    pub manifest_count: usize,
}

/// Combine the graph and stage outputs into the final result.
pub fn build_result(
    graph: &DependencyGraph,
    findings: Findings,
    file_count: usize,
    core_threshold: f64,
) -> AnalysisResult {
    let scores = findings.scores.as_deref();

    let nodes: Vec<NodeReport> = graph
        .files()
        .enumerate()
        .map(|(i, file)| {
            let score = scores.and_then(|s| s.get(i));
            NodeReport {
                path: file.path.clone(),
                category: file.category,
                size: file.size,
                lines: file.lines,
                pagerank: score.map(|s| s.pagerank),
                betweenness: score.map(|s| s.betweenness),
                degree: score.map(|s| s.degree),
            }
        })
        .collect();

    let mut core_nodes: Vec<NodeReport> = nodes
        .iter()
        .filter(|n| n.pagerank.is_some_and(|pr| pr > core_threshold))
        .cloned()
        .collect();
    core_nodes.sort_by(|a, b| {
        b.pagerank
            .partial_cmp(&a.pagerank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });

    let edges: Vec<ImportEdge> = graph.edges().cloned().collect();

    AnalysisResult {
        summary: Summary {
            file_count,
            node_count: nodes.len(),
            edge_count: edges.len(),
            manifest_count: findings.manifest_count,
            scanned_at: Utc::now(),
        },
        nodes,
        edges,
        core_nodes,
        patterns: findings.patterns,
        cycles: findings.cycles,
        quality: findings.quality,
        tech_stack: findings.tech_stack,
    }
}
