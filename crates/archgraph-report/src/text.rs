use colored::Colorize;

use archgraph_core::AnalysisResult;

/// Core files listed in the terminal summary.
const TOP_CORE_NODES: usize = 3;

/// Format a full analysis result for terminal output.
pub fn format_report(result: &AnalysisResult) -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "\n{}\n",
        "archgraph - Dependency Graph Analysis".bold()
    ));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    out.push_str(&format!(
        "{}: {} files, {} nodes, {} imports\n",
        "Summary".bold(),
        result.summary.file_count,
        result.summary.node_count,
        result.summary.edge_count,
    ));

    // Core nodes
    out.push_str(&format!(
        "\n{} ({})\n{}\n",
        "Core Nodes".bold(),
        result.core_nodes.len(),
        "-".repeat(40)
    ));
    if !result.has_scores() {
        out.push_str(&format!("  {}\n", "Centrality unavailable".yellow()));
    }
    for node in result.core_nodes.iter().take(TOP_CORE_NODES) {
        let pagerank = node.pagerank.unwrap_or_default();
        out.push_str(&format!("  {}: {pagerank:.4}\n", node.path));
    }
    if result.core_nodes.len() > TOP_CORE_NODES {
        out.push_str(&format!(
            "  ... and {} more\n",
            result.core_nodes.len() - TOP_CORE_NODES
        ));
    }

    // Patterns
    out.push_str(&format!(
        "\n{} ({})\n{}\n",
        "Patterns".bold(),
        result.patterns.len(),
        "-".repeat(40)
    ));
    for pattern in &result.patterns {
        out.push_str(&format!(
            "  {} ({:.0}%)\n",
            pattern.name.to_string().cyan(),
            pattern.confidence * 100.0
        ));
        out.push_str(&format!("    {}\n", pattern.description.dimmed()));
        for evidence in &pattern.evidence {
            out.push_str(&format!("    {evidence}\n"));
        }
    }

    // Cycles
    if result.cycles.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            "No circular dependencies found".green().bold()
        ));
    } else {
        out.push_str(&format!(
            "\n{} ({} found)\n{}\n",
            "Circular Dependencies".red().bold(),
            result.cycles.len(),
            "-".repeat(40),
        ));
        for cycle in &result.cycles {
            let mut path = cycle.join(" -> ");
            if let Some(first) = cycle.first() {
                path.push_str(&format!(" -> {first}"));
            }
            out.push_str(&format!("  {path}\n"));
        }
    }

    // Quality
    let q = &result.quality;
    out.push_str(&format!("\n{}\n{}\n", "Code Quality".bold(), "-".repeat(40)));
    if let Some(rating) = q.complexity_rating {
        out.push_str(&format!("  Files: {} ({rating})\n", q.file_count));
    }
    out.push_str(&format!(
        "  Lines: total={}, avg={:.1}, max={}, min={}\n",
        q.total_lines, q.avg_lines_per_file, q.max_lines, q.min_lines
    ));
    out.push_str(&format!(
        "  Markers: {} TODO, {} FIXME\n",
        q.todo_count, q.fixme_count
    ));

    // Tech stack
    let stack = &result.tech_stack;
    if !stack.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", "Tech Stack".bold(), "-".repeat(40)));
        let rows = [
            ("Language", &stack.language),
            ("Runtime", &stack.runtime),
            ("Framework", &stack.framework),
            ("ORM", &stack.orm),
            ("Database", &stack.database),
            ("Tests", &stack.test_framework),
            ("Container", &stack.container),
            ("Orchestration", &stack.orchestration),
            ("Deployment", &stack.deployment),
            ("CI/CD", &stack.ci_cd),
        ];
        for (label, value) in rows {
            if let Some(value) = value {
                out.push_str(&format!("  {label}: {value}\n"));
            }
        }
        if let Some(count) = stack.dependency_count {
            out.push_str(&format!("  Dependencies: {count}\n"));
        }
    }

    out.push('\n');
    out
}
