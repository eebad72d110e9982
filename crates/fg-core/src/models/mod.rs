pub mod api;
pub mod class;
pub mod location;
pub mod url;

pub use api::*;
pub use class::*;
pub use location::*;
pub use url::*;
