pub mod location;
pub mod syntax;
pub mod tsconfig;
pub mod typescript;

pub use location::*;
pub use syntax::*;
pub use tsconfig::ProjectSettings;
pub use typescript::SwcProvider;
