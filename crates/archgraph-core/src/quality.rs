use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse size rating from the average file length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityRating {
    Simple,
    Moderate,
    Complex,
}

impl ComplexityRating {
    /// Under 100 lines per file is simple, under 300 moderate.
    pub fn from_avg_lines(avg: f64) -> Self {
        if avg < 100.0 {
            ComplexityRating::Simple
        } else if avg < 300.0 {
            ComplexityRating::Moderate
        } else {
            ComplexityRating::Complex
        }
    }
}

impl std::fmt::Display for ComplexityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityRating::Simple => write!(f, "simple"),
            ComplexityRating::Moderate => write!(f, "moderate"),
            ComplexityRating::Complex => write!(f, "complex"),
        }
    }
}

/// Size statistics and debt markers across the scanned files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityStats {
    pub file_count: usize,
    /// `None` when no files were measured.
    pub complexity_rating: Option<ComplexityRating>,
    pub total_lines: usize,
    pub avg_lines_per_file: f64,
    pub max_lines: usize,
    pub min_lines: usize,
    pub todo_count: usize,
    pub fixme_count: usize,
}

const TODO_SRC: &str = r"TODO|todo|@todo";
const FIXME_SRC: &str = r"FIXME|fixme|@fixme";

/// Counts debt markers in file texts.
pub struct MarkerCounter {
    todo: Regex,
    fixme: Regex,
}

impl MarkerCounter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            todo: Regex::new(TODO_SRC).context("failed to compile TODO pattern")?,
            fixme: Regex::new(FIXME_SRC).context("failed to compile FIXME pattern")?,
        })
    }

    /// `(todo, fixme)` occurrences in `content`.
    pub fn count(&self, content: &str) -> (usize, usize) {
        (
            self.todo.find_iter(content).count(),
            self.fixme.find_iter(content).count(),
        )
    }
}

/// Per-file measurements feeding [`QualityStats::from_files`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMeasure {
    pub lines: usize,
    pub todo: usize,
    pub fixme: usize,
}

impl QualityStats {
    pub fn from_files<I>(measures: I) -> Self
    where
        I: IntoIterator<Item = FileMeasure>,
    {
        let mut stats = QualityStats::default();
        let mut files = 0usize;
        let mut min_lines: Option<usize> = None;

        for m in measures {
            files += 1;
            stats.total_lines += m.lines;
            stats.max_lines = stats.max_lines.max(m.lines);
            min_lines = Some(min_lines.map_or(m.lines, |min| min.min(m.lines)));
            stats.todo_count += m.todo;
            stats.fixme_count += m.fixme;
        }

        if files > 0 {
            stats.avg_lines_per_file = stats.total_lines as f64 / files as f64;
            stats.complexity_rating =
                Some(ComplexityRating::from_avg_lines(stats.avg_lines_per_file));
        }
        stats.file_count = files;
        stats.min_lines = min_lines.unwrap_or(0);
        stats
    }
}

/// Line count as reported for a node: number of line breaks, plus one for a
/// trailing line without a terminator.
pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}
