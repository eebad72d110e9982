pub mod dot;
pub mod json;

pub use dot::DotReporter;
pub use json::JsonReporter;
