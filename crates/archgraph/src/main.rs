use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use archgraph_core::config::{Config, CONFIG_FILE_NAME};
use archgraph_core::{AnalysisPipeline, AnalysisResult};
use archgraph_report::{graphml, json, text};

#[derive(Parser)]
#[command(name = "archgraph")]
#[command(about = "Build a file-level import graph and report central files, cycles and patterns")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a source tree and print the dependency report
    Analyze {
        /// Path to the project root
        path: PathBuf,
        /// Config file path (defaults to .archgraph.toml in the project root or an ancestor)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compact JSON output (no pretty-printing)
        #[arg(long)]
        compact: bool,
    },
    /// Create a default .archgraph.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Graphml,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let result = match cli.command {
        Commands::Analyze {
            path,
            config,
            format,
            output,
            compact,
        } => cmd_analyze(&path, config.as_deref(), format, output.as_deref(), compact),
        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn cmd_analyze(
    path: &Path,
    config_path: Option<&Path>,
    format: OutputFormat,
    output: Option<&Path>,
    compact: bool,
) -> Result<()> {
    let config = load_config(path, config_path)?;
    let result = run_analysis(path, config)?;
    let report = render(&result, format, compact)?;

    match output {
        Some(target) => {
            std::fs::write(target, &report)
                .with_context(|| format!("failed to write report to '{}'", target.display()))?;
            log::info!("report written to {}", target.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let target = PathBuf::from(CONFIG_FILE_NAME);
    if target.exists() && !force {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
    }
    std::fs::write(&target, Config::default_toml())
        .with_context(|| format!("failed to write {CONFIG_FILE_NAME}"))?;
    println!("Created {CONFIG_FILE_NAME} with default configuration.");
    Ok(())
}

fn load_config(project_path: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(project_path)),
    }
}

fn run_analysis(project_path: &Path, config: Config) -> Result<AnalysisResult> {
    let pipeline = AnalysisPipeline::new(config).context("failed to initialize analysis")?;
    pipeline.analyze(project_path)
}

fn render(result: &AnalysisResult, format: OutputFormat, compact: bool) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => text::format_report(result),
        OutputFormat::Json => {
            json::format_report(result, compact).context("failed to serialize analysis result")?
        }
        OutputFormat::Graphml => graphml::format_report(result),
    })
}
