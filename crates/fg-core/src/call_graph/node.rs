use crate::models::{InjectedDependency, RoleTag};
use serde::{Deserialize, Serialize};

/// Graph vertex: one class method, identified as `ClassName.methodName`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNode {
    pub id: String,
    #[serde(rename = "type")]
    pub role: RoleTag,
    /// Normalized path relative to the repository root
    pub file: String,
    pub class: String,
    /// Copied from the owning class
    pub injected_services: Vec<InjectedDependency>,
}

impl MethodNode {
    pub fn new(
        class: &str,
        method: &str,
        role: RoleTag,
        file: &str,
        injected_services: Vec<InjectedDependency>,
    ) -> Self {
        Self {
            id: method_id(class, method),
            role,
            file: file.to_string(),
            class: class.to_string(),
            injected_services,
        }
    }
}

/// `ClassName.methodName`
pub fn method_id(class: &str, method: &str) -> String {
    format!("{}.{}", class, method)
}
