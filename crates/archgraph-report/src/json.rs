use archgraph_core::AnalysisResult;

/// Format a full analysis result as JSON.
pub fn format_report(result: &AnalysisResult, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(result)
    } else {
        serde_json::to_string_pretty(result)
    }
}
