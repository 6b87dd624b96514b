//! Elementary circuit enumeration (Johnson's algorithm).
//!
//! The graph is first split into strongly connected components; circuits are
//! then searched inside each non-trivial component, one start node at a time
//! in ascending index order, restricted to nodes at or after the start. Every
//! circuit is therefore reported exactly once, beginning at its lowest-index
//! node.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use petgraph::Direction;

use crate::config::CyclesConfig;
use crate::error::CycleError;
use crate::graph::DependencyGraph;
use crate::types::Cycle;

/// Enumerates simple directed cycles under size, count and time limits.
pub struct CycleDetector {
    max_nodes: usize,
    max_cycles: usize,
    timeout: Duration,
}

impl CycleDetector {
    pub fn new(config: &CyclesConfig) -> Self {
        Self {
            max_nodes: config.max_nodes,
            max_cycles: config.max_cycles,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// All simple cycles as node paths. Any limit being hit is an error, never
    /// a partial list.
    pub fn find(&self, graph: &DependencyGraph) -> Result<Vec<Cycle>, CycleError> {
        let nodes = graph.node_count();
        if nodes > self.max_nodes {
            return Err(CycleError::TooManyNodes {
                nodes,
                limit: self.max_nodes,
            });
        }

        let g = graph.inner();
        let adjacency: Vec<Vec<usize>> = g
            .node_indices()
            .map(|v| {
                let mut out: Vec<usize> = g
                    .neighbors_directed(v, Direction::Outgoing)
                    .map(|w| w.index())
                    .collect();
                out.sort_unstable();
                out.dedup();
                out
            })
            .collect();

        let mut components: Vec<Vec<usize>> = petgraph::algo::tarjan_scc(g)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut members: Vec<usize> = scc.into_iter().map(|v| v.index()).collect();
                members.sort_unstable();
                members
            })
            .collect();
        components.sort();

        let mut search = Search {
            adjacency: &adjacency,
            deadline: Instant::now() + self.timeout,
            timeout: self.timeout,
            max_cycles: self.max_cycles,
            found: Vec::new(),
        };
        for members in &components {
            search.component(members)?;
        }

        let cycles: Vec<Cycle> = search
            .found
            .into_iter()
            .map(|cycle| {
                cycle
                    .into_iter()
                    .map(|i| g[petgraph::graph::NodeIndex::new(i)].path.clone())
                    .collect()
            })
            .collect();

        if cycles.is_empty() {
            log::info!("no circular dependencies found");
        } else {
            log::info!("found {} circular dependencies", cycles.len());
        }
        Ok(cycles)
    }
}

struct Search<'a> {
    adjacency: &'a [Vec<usize>],
    deadline: Instant,
    timeout: Duration,
    max_cycles: usize,
    found: Vec<Vec<usize>>,
}

impl Search<'_> {
    fn component(&mut self, members: &[usize]) -> Result<(), CycleError> {
        let n = self.adjacency.len();
        let mut in_component = vec![false; n];
        for &m in members {
            in_component[m] = true;
        }

        for &start in members {
            let allowed = |v: usize| in_component[v] && v >= start;
            self.circuits_from(start, &allowed)?;
        }
        Ok(())
    }

    /// Johnson's CIRCUIT procedure, iterative.
    fn circuits_from(
        &mut self,
        start: usize,
        allowed: &dyn Fn(usize) -> bool,
    ) -> Result<(), CycleError> {
        let n = self.adjacency.len();
        let mut blocked = vec![false; n];
        let mut closed = vec![false; n];
        let mut block_map: Vec<HashSet<usize>> = vec![HashSet::new(); n];

        let adjacency = self.adjacency;
        let successors = |v: usize| -> Vec<usize> {
            // Reversed so that popping yields ascending order.
            adjacency[v]
                .iter()
                .rev()
                .copied()
                .filter(|&w| allowed(w))
                .collect()
        };

        let mut path = vec![start];
        blocked[start] = true;
        let mut stack: Vec<(usize, Vec<usize>)> = vec![(start, successors(start))];

        while let Some((node, nbrs)) = stack.last_mut() {
            if Instant::now() >= self.deadline {
                return Err(CycleError::Timeout(self.timeout));
            }
            let node = *node;

            if let Some(next) = nbrs.pop() {
                if next == start {
                    self.found.push(path.clone());
                    if self.found.len() > self.max_cycles {
                        return Err(CycleError::TooManyCycles {
                            limit: self.max_cycles,
                        });
                    }
                    for &p in &path {
                        closed[p] = true;
                    }
                } else if !blocked[next] {
                    path.push(next);
                    closed[next] = false;
                    blocked[next] = true;
                    let next_nbrs = successors(next);
                    stack.push((next, next_nbrs));
                    continue;
                }
                continue;
            }

            if closed[node] {
                unblock(node, &mut blocked, &mut block_map);
            } else {
                for w in successors(node) {
                    block_map[w].insert(node);
                }
            }
            stack.pop();
            path.pop();
        }
        Ok(())
    }
}

fn unblock(node: usize, blocked: &mut [bool], block_map: &mut [HashSet<usize>]) {
    let mut pending = vec![node];
    while let Some(v) = pending.pop() {
        if blocked[v] {
            blocked[v] = false;
            pending.extend(block_map[v].drain());
        }
    }
}
