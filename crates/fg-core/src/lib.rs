pub mod call_graph;
pub mod catalog;
pub mod environment;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsers;

pub use catalog::{SourceCatalog, SourceUnit};
pub use environment::{EnvironmentConfigExtractor, EnvironmentMap};
pub use error::{CatalogError, ConfigError, FgError, ParseError};
pub use logging::{init, init_from_args};
