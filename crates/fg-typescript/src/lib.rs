pub mod call_graph;
pub mod class_analyzer;
pub mod http;
pub mod inventory;
pub mod policy;
pub mod test_links;
pub mod url_resolver;

pub use call_graph::{CallEdgeExtractor, TypeScriptGraphBuilder};
pub use class_analyzer::{AnalyzedClass, ClassAnalyzer};
pub use http::{CallContext, HttpCallDetector};
pub use inventory::{scan_repository, ApiInventoryBuilder};
pub use policy::AnalysisPolicy;
pub use test_links::extract_test_links;
pub use url_resolver::UrlResolver;
