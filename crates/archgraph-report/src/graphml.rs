use archgraph_core::AnalysisResult;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">
"#;

/// (id, target, name, type) for every attribute key.
const KEYS: [(&str, &str, &str, &str); 8] = [
    ("d0", "node", "category", "string"),
    ("d1", "node", "size", "long"),
    ("d2", "node", "lines", "long"),
    ("d3", "node", "pagerank", "double"),
    ("d4", "node", "betweenness", "double"),
    ("d5", "node", "degree", "double"),
    ("d6", "edge", "weight", "int"),
    ("d7", "edge", "kind", "string"),
];

/// Render the graph part of a result as GraphML. Node ids are file paths;
/// score attributes are omitted when centrality was not computed.
pub fn format_report(result: &AnalysisResult) -> String {
    let mut out = String::from(HEADER);

    for (id, target, name, ty) in KEYS {
        out.push_str(&format!(
            "  <key id=\"{id}\" for=\"{target}\" attr.name=\"{name}\" attr.type=\"{ty}\"/>\n"
        ));
    }

    out.push_str("  <graph edgedefault=\"directed\">\n");

    for node in &result.nodes {
        out.push_str(&format!("    <node id=\"{}\">\n", escape(&node.path)));
        data(&mut out, "d0", &node.category.to_string());
        data(&mut out, "d1", &node.size.to_string());
        data(&mut out, "d2", &node.lines.to_string());
        for (key, score) in [
            ("d3", node.pagerank),
            ("d4", node.betweenness),
            ("d5", node.degree),
        ] {
            if let Some(score) = score {
                data(&mut out, key, &score.to_string());
            }
        }
        out.push_str("    </node>\n");
    }

    for edge in &result.edges {
        out.push_str(&format!(
            "    <edge source=\"{}\" target=\"{}\">\n",
            escape(&edge.from),
            escape(&edge.to)
        ));
        data(&mut out, "d6", &edge.weight.to_string());
        data(&mut out, "d7", &edge.kind.to_string());
        out.push_str("    </edge>\n");
    }

    out.push_str("  </graph>\n</graphml>\n");
    out
}

fn data(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!(
        "      <data key=\"{key}\">{}</data>\n",
        escape(value)
    ));
}

/// Escape text for use in XML content and attribute values.
fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
