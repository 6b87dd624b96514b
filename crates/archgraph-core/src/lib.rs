pub mod centrality;
pub mod config;
pub mod cycles;
pub mod error;
pub mod extract;
pub mod graph;
pub mod patterns;
pub mod pipeline;
pub mod quality;
pub mod resolve;
pub mod result;
pub mod scanner;
pub mod techstack;
pub mod types;

pub use centrality::CentralityAnalyzer;
pub use config::Config;
pub use cycles::CycleDetector;
pub use error::{CentralityError, CycleError, Error};
pub use extract::{ImportExtractor, SyntaxFamily};
pub use graph::DependencyGraph;
pub use pipeline::AnalysisPipeline;
pub use quality::QualityStats;
pub use resolve::PathResolver;
pub use result::{AnalysisResult, NodeReport, Summary};
pub use scanner::FileScanner;
pub use techstack::{detect_tech_stack, TechStack};
pub use types::*;
