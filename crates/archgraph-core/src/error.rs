use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Fatal errors that abort a scan.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read root directory '{path}': {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{0}' is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Centrality failures. The pipeline treats all of them as soft.
#[derive(Debug, Error, PartialEq)]
pub enum CentralityError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("pagerank did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// Cycle enumeration guard trips. The pipeline treats all of them as soft.
#[derive(Debug, Error, PartialEq)]
pub enum CycleError {
    #[error("graph has {nodes} nodes, above the cycle search limit of {limit}")]
    TooManyNodes { nodes: usize, limit: usize },

    #[error("more than {limit} cycles found, enumeration stopped")]
    TooManyCycles { limit: usize },

    #[error("cycle enumeration exceeded {0:?}")]
    Timeout(Duration),
}
