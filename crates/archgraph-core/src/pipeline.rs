use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::centrality::CentralityAnalyzer;
use crate::config::Config;
use crate::cycles::CycleDetector;
use crate::extract::{read_lossy, ImportExtractor, SyntaxFamily};
use crate::graph::DependencyGraph;
use crate::patterns::detect_patterns;
use crate::quality::{count_lines, FileMeasure, MarkerCounter, QualityStats};
use crate::resolve::PathResolver;
use crate::result::{build_result, AnalysisResult, Findings};
use crate::scanner::{FileScanner, Scan};
use crate::techstack::detect_tech_stack;
use crate::types::SourceFile;

/// Extracted per-file data before merging into the graph.
struct FileResult {
    file: SourceFile,
    imports: Vec<String>,
    measure: FileMeasure,
}

/// Reusable analysis pipeline: scan, extract, build, analyze, assemble.
pub struct AnalysisPipeline {
    config: Config,
    scanner: FileScanner,
    extractor: ImportExtractor,
    markers: MarkerCounter,
}

impl AnalysisPipeline {
    pub fn new(config: Config) -> Result<Self> {
        let scanner = FileScanner::new(&config.scan).context("invalid scan configuration")?;
        Ok(Self {
            scanner,
            extractor: ImportExtractor::new()?,
            markers: MarkerCounter::new()?,
            config,
        })
    }

    /// Run a full analysis on the given project root.
    pub fn analyze(&self, root: &Path) -> Result<AnalysisResult> {
        let scan = self
            .scanner
            .scan(root)
            .with_context(|| format!("failed to scan '{}'", root.display()))?;

        let (graph, quality) = self.build_graph(&scan);

        let analyzer = CentralityAnalyzer::new(&self.config.analysis);
        let detector = CycleDetector::new(&self.config.cycles);
        let (scores, cycles) = rayon::join(
            || match analyzer.analyze(&graph) {
                Ok(scores) => Some(scores),
                Err(e) => {
                    log::warn!("centrality analysis skipped: {e}");
                    None
                }
            },
            || match detector.find(&graph) {
                Ok(cycles) => cycles,
                Err(e) => {
                    log::warn!("cycle detection skipped: {e}");
                    Vec::new()
                }
            },
        );

        let patterns = detect_patterns(graph.files(), scan.manifest_count);
        let tech_stack = detect_tech_stack(&scan.root);

        let findings = Findings {
            scores,
            cycles,
            patterns,
            quality,
            tech_stack,
            manifest_count: scan.manifest_count,
        };
        Ok(build_result(
            &graph,
            findings,
            scan.files.len(),
            self.config.analysis.core_threshold,
        ))
    }

    /// Read, classify and resolve every scanned file, then assemble the graph.
    fn build_graph(&self, scan: &Scan) -> (DependencyGraph, QualityStats) {
        let scanned: HashSet<PathBuf> = scan.files.iter().cloned().collect();
        let resolver = PathResolver::new(&scanned);

        let file_results: Vec<FileResult> = scan
            .files
            .par_iter()
            .map(|path| self.process_file(scan, &resolver, path))
            .collect();

        let quality = QualityStats::from_files(file_results.iter().map(|fr| fr.measure));

        let mut files = Vec::with_capacity(file_results.len());
        let mut imports = Vec::with_capacity(file_results.len());
        for fr in file_results {
            imports.push((fr.file.path.clone(), fr.imports));
            files.push(fr.file);
        }

        (DependencyGraph::build(files, imports), quality)
    }

    fn process_file(&self, scan: &Scan, resolver: &PathResolver<'_>, path: &Path) -> FileResult {
        let rel_path = scan.relative_key(path);
        let category = self.config.categories.classify(&rel_path);
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        let content = match read_lossy(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("failed to read {}: {e}", path.display());
                return FileResult {
                    file: SourceFile {
                        path: rel_path,
                        category,
                        size,
                        lines: 0,
                    },
                    imports: Vec::new(),
                    measure: FileMeasure::default(),
                };
            }
        };

        let lines = count_lines(&content);
        let (todo, fixme) = self.markers.count(&content);

        let family = SyntaxFamily::from_path(path);
        let imports: Vec<String> = self
            .extractor
            .extract(family, &content)
            .iter()
            .filter_map(|raw| resolver.resolve(path, family, raw))
            .map(|target| scan.relative_key(&target))
            .collect();
        log::debug!("{rel_path}: {} resolved imports", imports.len());

        FileResult {
            file: SourceFile {
                path: rel_path,
                category,
                size,
                lines,
            },
            imports,
            measure: FileMeasure { lines, todo, fixme },
        }
    }
}
