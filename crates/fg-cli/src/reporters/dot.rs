use fg_core::call_graph::{endpoint_key, FrontendGraph, MethodNode};
use std::collections::HashMap;

/// Graphviz rendering of the graph artifact.
///
/// Method nodes are boxes, targets outside the graph (placeholders, client
/// library methods) are dashed boxes and HTTP endpoints are ellipses.
pub struct DotReporter;

impl DotReporter {
    pub fn render(&self, graph: &FrontendGraph, graph_name: &str) -> String {
        let mut dot = String::new();

        dot.push_str(&format!("digraph {} {{\n", sanitize_name(graph_name)));
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=box];\n\n");

        let mut node_map: HashMap<String, String> = HashMap::new();
        let mut node_counter = 0;
        let mut declare = |dot: &mut String, key: &str, label: String, attrs: &str| -> String {
            if let Some(id) = node_map.get(key) {
                return id.clone();
            }
            let node_id = format!("node_{}", node_counter);
            node_counter += 1;
            dot.push_str(&format!(
                "  {} [label=\"{}\"{}];\n",
                node_id,
                escape_dot_string(&label),
                attrs
            ));
            node_map.insert(key.to_string(), node_id.clone());
            node_id
        };

        for node in &graph.nodes {
            declare(&mut dot, &node.id, format_node_label(node), "");
        }

        let mut lines = Vec::new();
        for edge in &graph.edges {
            let target = edge.to.to_string();
            let from = declare(&mut dot, &edge.from, edge.from.clone(), "");
            let to = declare(&mut dot, &target, target.clone(), ", style=dashed");
            lines.push(format!(
                "  {} -> {} [label=\"{}\"];\n",
                from,
                to,
                escape_dot_string(&edge.via)
            ));
        }
        for call in &graph.http_calls {
            let endpoint = endpoint_key(call);
            let from = declare(&mut dot, &call.source, call.source.clone(), "");
            let to = declare(&mut dot, &endpoint, endpoint.clone(), ", shape=ellipse");
            lines.push(format!(
                "  {} -> {} [label=\"{}\", color=blue];\n",
                from,
                to,
                escape_dot_string(&call.client)
            ));
        }

        dot.push('\n');
        for line in lines {
            dot.push_str(&line);
        }
        dot.push_str("}\n");
        dot
    }
}

fn format_node_label(node: &MethodNode) -> String {
    format!("{}\n({})", node.id, node.role.as_str())
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "frontend".to_string()
    } else {
        cleaned
    }
}

/// Escapes special characters for DOT
fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
