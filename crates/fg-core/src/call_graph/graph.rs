use crate::call_graph::{CallEdge, MethodNode, TestLink};
use crate::models::HttpCallRecord;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Graph artifact: `{nodes, edges, http_calls}` in insertion order.
///
/// Append-only during a run. Node ids are unique; a repeated id keeps the
/// first node.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrontendGraph {
    pub nodes: Vec<MethodNode>,
    pub edges: Vec<CallEdge>,
    pub http_calls: Vec<HttpCallRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_links: Vec<TestLink>,
    #[serde(skip)]
    node_ids: HashSet<String>,
}

/// Directed view over node ids, edge targets and HTTP endpoints
pub type DependencyGraph = DiGraph<String, ()>;

impl FrontendGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node unless its id is already present. Returns whether it was added.
    pub fn add_node(&mut self, node: MethodNode) -> bool {
        if self.node_ids.contains(&node.id) {
            return false;
        }
        self.node_ids.insert(node.id.clone());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, edge: CallEdge) {
        self.edges.push(edge);
    }

    pub fn add_http_call(&mut self, call: HttpCallRecord) {
        self.http_calls.push(call);
    }

    pub fn add_test_link(&mut self, link: TestLink) {
        self.test_links.push(link);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.http_calls.is_empty()
    }

    /// Builds the petgraph view. HTTP calls become `METHOD url` vertices.
    pub fn to_dependency_graph(&self) -> (DependencyGraph, HashMap<String, NodeIndex>) {
        let mut graph = DependencyGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();

        let mut vertex = |graph: &mut DependencyGraph, key: String| -> NodeIndex {
            *index
                .entry(key.clone())
                .or_insert_with(|| graph.add_node(key))
        };

        for node in &self.nodes {
            vertex(&mut graph, node.id.clone());
        }
        for edge in &self.edges {
            let from = vertex(&mut graph, edge.from.clone());
            let to = vertex(&mut graph, edge.to.to_string());
            graph.add_edge(from, to, ());
        }
        for call in &self.http_calls {
            let from = vertex(&mut graph, call.source.clone());
            let to = vertex(&mut graph, endpoint_key(call));
            graph.add_edge(from, to, ());
        }

        (graph, index)
    }

    /// Every method node that transitively reaches `target`.
    ///
    /// `target` is either a vertex id (`UserService.getUser`) or a substring
    /// of an HTTP endpoint URL. Results follow node insertion order and never
    /// include the start vertices themselves.
    pub fn dependents_of(&self, target: &str) -> Vec<String> {
        let (graph, index) = self.to_dependency_graph();

        let starts: Vec<NodeIndex> = match index.get(target) {
            Some(idx) => vec![*idx],
            None => self
                .http_calls
                .iter()
                .filter(|call| call.url.contains(target))
                .filter_map(|call| index.get(&endpoint_key(call)).copied())
                .collect(),
        };

        let mut visited: HashSet<NodeIndex> = starts.iter().copied().collect();
        let mut queue: VecDeque<NodeIndex> = starts.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            for caller in graph.neighbors_directed(current, Direction::Incoming) {
                if visited.insert(caller) {
                    queue.push_back(caller);
                }
            }
        }

        let start_set: HashSet<NodeIndex> = starts.into_iter().collect();
        self.nodes
            .iter()
            .filter(|node| {
                index
                    .get(&node.id)
                    .map(|idx| visited.contains(idx) && !start_set.contains(idx))
                    .unwrap_or(false)
            })
            .map(|node| node.id.clone())
            .collect()
    }
}

/// `METHOD url`, the vertex key of an HTTP endpoint
pub fn endpoint_key(call: &HttpCallRecord) -> String {
    format!("{} {}", call.method, call.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::CallTarget;
    use crate::models::{CallConvention, HttpMethod, InjectedDependency, RoleTag};

    fn node(class: &str, method: &str, role: RoleTag) -> MethodNode {
        MethodNode::new(class, method, role, "src/app/x.ts", Vec::new())
    }

    fn sample_graph() -> FrontendGraph {
        let mut graph = FrontendGraph::new();
        graph.add_node(MethodNode::new(
            "UserComponent",
            "ngOnInit",
            RoleTag::Component,
            "src/app/user.component.ts",
            vec![InjectedDependency::new("userService", "UserService")],
        ));
        graph.add_node(node("UserService", "getUser", RoleTag::Service));
        graph.add_node(node("AuditComponent", "render", RoleTag::Component));
        graph.add_edge(CallEdge::calls(
            "UserComponent.ngOnInit",
            CallTarget::resolved("UserService", "getUser"),
            "userService",
        ));
        graph.add_http_call(HttpCallRecord {
            source: "UserService.getUser".into(),
            url: "/api/users".into(),
            method: HttpMethod::Get,
            file: "src/app/user.service.ts".into(),
            client: "HttpClient".into(),
            convention: CallConvention::DirectLiteral,
        });
        graph
    }

    #[test]
    fn duplicate_node_ids_keep_first() {
        let mut graph = FrontendGraph::new();
        assert!(graph.add_node(node("A", "run", RoleTag::GenericClass)));
        assert!(!graph.add_node(node("A", "run", RoleTag::Service)));
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].role, RoleTag::GenericClass);
    }

    #[test]
    fn dependents_of_method_id() {
        let graph = sample_graph();
        assert_eq!(
            graph.dependents_of("UserService.getUser"),
            vec!["UserComponent.ngOnInit".to_string()]
        );
    }

    #[test]
    fn dependents_of_endpoint_substring() {
        let graph = sample_graph();
        assert_eq!(
            graph.dependents_of("/api/users"),
            vec![
                "UserComponent.ngOnInit".to_string(),
                "UserService.getUser".to_string()
            ]
        );
    }

    #[test]
    fn unknown_target_has_no_dependents() {
        assert!(sample_graph().dependents_of("/api/none").is_empty());
    }

    #[test]
    fn empty_test_links_are_not_serialized() {
        let value = serde_json::to_value(sample_graph()).unwrap();
        assert!(value.get("test_links").is_none());
        assert_eq!(value["http_calls"][0]["type"], "HttpClient");
        assert_eq!(value["nodes"][0]["type"], "angular_component");
        assert_eq!(
            value["nodes"][0]["injected_services"][0]["type"],
            "UserService"
        );
    }
}
