//! Node importance scores over the import graph.
//!
//! All three measures are computed over node indices of the underlying
//! petgraph structure, so the returned vectors line up with
//! [`DependencyGraph::files`] order.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::config::AnalysisConfig;
use crate::error::CentralityError;
use crate::graph::DependencyGraph;
use crate::types::CentralityScore;

/// Computes pagerank, betweenness and degree centrality for every node.
pub struct CentralityAnalyzer {
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl CentralityAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            damping: config.damping,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    /// Scores indexed by node index. Fails on an empty graph or when
    /// pagerank does not converge.
    pub fn analyze(
        &self,
        graph: &DependencyGraph,
    ) -> Result<Vec<CentralityScore>, CentralityError> {
        if graph.is_empty() {
            return Err(CentralityError::EmptyGraph);
        }

        let pagerank = page_rank(graph, self.damping, self.max_iterations, self.tolerance)?;
        let betweenness = betweenness(graph);
        let degree = degree(graph);

        Ok(pagerank
            .into_iter()
            .zip(betweenness)
            .zip(degree)
            .map(|((pagerank, betweenness), degree)| CentralityScore {
                pagerank,
                betweenness,
                degree,
            })
            .collect())
    }
}

/// Weighted power-iteration pagerank with uniform teleport.
///
/// Rank flows from importer to imported file. Mass held by nodes without
/// outgoing edges is spread evenly over all nodes. Iteration stops once the
/// L1 change drops below `n * tolerance`.
pub fn page_rank(
    graph: &DependencyGraph,
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>, CentralityError> {
    let g = graph.inner();
    let n = g.node_count();
    if n == 0 {
        return Err(CentralityError::EmptyGraph);
    }
    let uniform = 1.0 / n as f64;

    let out_weight: Vec<f64> = g
        .node_indices()
        .map(|v| {
            g.edges_directed(v, Direction::Outgoing)
                .map(|e| f64::from(e.weight().weight))
                .sum()
        })
        .collect();
    let dangling: Vec<usize> = (0..n).filter(|&i| out_weight[i] == 0.0).collect();

    let mut ranks = vec![uniform; n];
    for _ in 0..max_iterations {
        let last = ranks;
        ranks = vec![0.0; n];

        for edge in g.edge_references() {
            let (u, v) = (edge.source().index(), edge.target().index());
            ranks[v] += damping * last[u] * f64::from(edge.weight().weight) / out_weight[u];
        }

        let dangling_sum: f64 = damping * dangling.iter().map(|&i| last[i]).sum::<f64>();
        for rank in &mut ranks {
            *rank += dangling_sum * uniform + (1.0 - damping) * uniform;
        }

        let err: f64 = ranks.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < n as f64 * tolerance {
            return Ok(ranks);
        }
    }

    Err(CentralityError::NotConverged {
        iterations: max_iterations,
    })
}

/// Brandes betweenness over unweighted directed shortest paths, normalized
/// by `1 / ((n - 1)(n - 2))` when the graph has more than two nodes.
pub fn betweenness(graph: &DependencyGraph) -> Vec<f64> {
    let g = graph.inner();
    let n = g.node_count();
    let mut centrality = vec![0.0; n];

    for s in g.node_indices() {
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
        let mut preds: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        sigma[s.index()] = 1.0;
        dist[s.index()] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v.index()].unwrap_or(0);
            for w in g.neighbors_directed(v, Direction::Outgoing) {
                if dist[w.index()].is_none() {
                    dist[w.index()] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w.index()] == Some(dv + 1) {
                    sigma[w.index()] += sigma[v.index()];
                    preds[w.index()].push(v);
                }
            }
        }

        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &preds[w.index()] {
                delta[v.index()] +=
                    sigma[v.index()] / sigma[w.index()] * (1.0 + delta[w.index()]);
            }
            if w != s {
                centrality[w.index()] += delta[w.index()];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        for c in &mut centrality {
            *c *= scale;
        }
    }
    centrality
}

/// `(in + out) / (n - 1)`. A lone node has nothing to connect to and scores 0;
/// networkx reports 1.0 for a single-node graph, so the two differ only there.
pub fn degree(graph: &DependencyGraph) -> Vec<f64> {
    let g = graph.inner();
    let n = g.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    g.node_indices()
        .map(|v| {
            let total = g.edges_directed(v, Direction::Outgoing).count()
                + g.edges_directed(v, Direction::Incoming).count();
            total as f64 * scale
        })
        .collect()
}
