use crate::class_analyzer::ClassAnalyzer;
use crate::http::{continues_expression, CallContext, HttpCallDetector};
use crate::policy::AnalysisPolicy;
use crate::test_links::extract_test_links;
use fg_core::call_graph::{method_id, CallEdge, CallTarget, FrontendGraph, MethodNode};
use fg_core::models::InjectedDependency;
use fg_core::parsers::SyntaxProvider;
use fg_core::{CatalogError, SourceCatalog, SourceUnit};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

static QUALIFIED_CALL: OnceLock<Regex> = OnceLock::new();
static BARE_CALL: OnceLock<Regex> = OnceLock::new();

fn qualified_call() -> &'static Regex {
    QUALIFIED_CALL.get_or_init(|| {
        Regex::new(r"this\.([a-zA-Z_$][a-zA-Z0-9_$]*)\.([a-zA-Z_$][a-zA-Z0-9_$]*)\s*\(")
            .expect("valid regex")
    })
}

fn bare_call() -> &'static Regex {
    BARE_CALL.get_or_init(|| {
        Regex::new(r"([a-zA-Z_$][a-zA-Z0-9_$]*)\.([a-zA-Z_$][a-zA-Z0-9_$]*)\s*\(")
            .expect("valid regex")
    })
}

/// Lexical caller -> callee inference over one method body.
///
/// Not scope-aware: matches inside closures, comments and string literals
/// count like any other text.
pub struct CallEdgeExtractor<'p> {
    deny: HashSet<&'p str>,
}

impl<'p> CallEdgeExtractor<'p> {
    pub fn new(policy: &'p AnalysisPolicy) -> Self {
        Self {
            deny: policy.deny_set(),
        }
    }

    /// Both passes, qualified edges first
    pub fn extract(&self, from: &str, body: &str, injected: &[InjectedDependency]) -> Vec<CallEdge> {
        let mut edges = self.qualified_edges(from, body, injected);
        edges.extend(self.bare_edges(from, body, injected));
        edges
    }

    /// `this.<name>.<method>(`; unknown receivers become `*method` placeholders
    pub fn qualified_edges(
        &self,
        from: &str,
        body: &str,
        injected: &[InjectedDependency],
    ) -> Vec<CallEdge> {
        qualified_call()
            .captures_iter(body)
            .map(|caps| {
                let receiver = &caps[1];
                let method = &caps[2];
                let target = match injected.iter().find(|dep| dep.name == receiver) {
                    Some(dep) => CallTarget::resolved(dep.type_text.clone(), method),
                    None => CallTarget::unresolved(method),
                };
                CallEdge::calls(from, target, receiver)
            })
            .collect()
    }

    /// `<name>.<method>(` for injected `<name>` only; deny-listed receivers
    /// and member chains are skipped
    pub fn bare_edges(
        &self,
        from: &str,
        body: &str,
        injected: &[InjectedDependency],
    ) -> Vec<CallEdge> {
        bare_call()
            .captures_iter(body)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if continues_expression(body, whole.start()) {
                    return None;
                }
                let receiver = &caps[1];
                if self.deny.contains(receiver) {
                    return None;
                }
                let dep = injected.iter().find(|dep| dep.name == receiver)?;
                Some(CallEdge::calls(
                    from,
                    CallTarget::resolved(dep.type_text.clone(), &caps[2]),
                    receiver,
                ))
            })
            .collect()
    }
}

/// Builds the graph artifact from parsed units
pub struct TypeScriptGraphBuilder<'p> {
    policy: &'p AnalysisPolicy,
    edges: CallEdgeExtractor<'p>,
    http: HttpCallDetector<'p>,
    test_links: bool,
}

impl<'p> TypeScriptGraphBuilder<'p> {
    pub fn new(policy: &'p AnalysisPolicy) -> Self {
        Self {
            policy,
            edges: CallEdgeExtractor::new(policy),
            http: HttpCallDetector::new(policy),
            test_links: false,
        }
    }

    /// Also collect `it(...)` -> method links from test units
    pub fn with_test_links(mut self, enabled: bool) -> Self {
        self.test_links = enabled;
        self
    }

    /// Catalogs `<repo>/src` and builds the graph. A missing `src` yields an empty graph.
    pub fn build_repository(
        &self,
        repo_root: &Path,
        provider: &dyn SyntaxProvider,
    ) -> Result<FrontendGraph, CatalogError> {
        let catalog = SourceCatalog::new(repo_root, &self.policy.graph_extensions);
        match catalog.load(provider) {
            Ok(units) => Ok(self.build(&units)),
            Err(CatalogError::MissingSourceDir(dir)) => {
                warn!(dir = %dir.display(), "Source directory not found, emitting empty graph");
                Ok(FrontendGraph::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn build(&self, units: &[SourceUnit]) -> FrontendGraph {
        let mut graph = FrontendGraph::new();
        for unit in units {
            if unit.is_test_unit() {
                if self.test_links {
                    for link in extract_test_links(unit) {
                        graph.add_test_link(link);
                    }
                }
                continue;
            }
            self.process_unit(unit, &mut graph);
        }

        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            http_calls = graph.http_calls.len(),
            test_links = graph.test_links.len(),
            "Graph built"
        );
        graph
    }

    fn process_unit(&self, unit: &SourceUnit, graph: &mut FrontendGraph) {
        for class in ClassAnalyzer::analyze(unit) {
            if !class.named {
                debug!(file = %unit.path, "Skipping anonymous class");
                continue;
            }
            let info = &class.info;

            for method in class.methods() {
                let id = method_id(&info.name, &method.name);
                if !graph.add_node(MethodNode::new(
                    &info.name,
                    &method.name,
                    info.role,
                    &unit.path,
                    info.injected.clone(),
                )) {
                    debug!(id = %id, "Duplicate method id, keeping first node");
                }

                let body = method.body_text(&unit.text);
                for edge in self.edges.extract(&id, body, &info.injected) {
                    graph.add_edge(edge);
                }
                let ctx = CallContext {
                    source: &id,
                    file: &unit.path,
                };
                for call in self.http.detect(ctx, body, &info.injected) {
                    graph.add_http_call(call);
                }
            }
        }
    }
}
