use serde::{Deserialize, Serialize};

/// Position in code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in bytes)
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}
