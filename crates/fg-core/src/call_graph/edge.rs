use serde::{Serialize, Serializer};
use std::fmt;

/// Callee of an inferred call.
///
/// `Unresolved` keeps the method name when the receiver could not be matched
/// against an injected dependency; it renders as `*method`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallTarget {
    Resolved { type_text: String, method: String },
    Unresolved { method: String },
}

impl CallTarget {
    pub fn resolved(type_text: impl Into<String>, method: impl Into<String>) -> Self {
        CallTarget::Resolved {
            type_text: type_text.into(),
            method: method.into(),
        }
    }

    pub fn unresolved(method: impl Into<String>) -> Self {
        CallTarget::Unresolved {
            method: method.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, CallTarget::Resolved { .. })
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::Resolved { type_text, method } => write!(f, "{}.{}", type_text, method),
            CallTarget::Unresolved { method } => write!(f, "*{}", method),
        }
    }
}

impl Serialize for CallTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Relation kind carried in the `type` field of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Calls,
    Tests,
}

/// Inferred method -> method call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallEdge {
    /// Id of an existing method node
    pub from: String,
    pub to: CallTarget,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Receiver variable used at the call site
    #[serde(rename = "service_var")]
    pub via: String,
}

impl CallEdge {
    pub fn calls(from: impl Into<String>, to: CallTarget, via: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to,
            kind: EdgeKind::Calls,
            via: via.into(),
        }
    }
}

/// Test case -> exercised method, from `it(...)` blocks in spec files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestLink {
    /// `Test::<description>`
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_render_resolved_and_placeholder_forms() {
        assert_eq!(
            CallTarget::resolved("UserService", "getUser").to_string(),
            "UserService.getUser"
        );
        assert_eq!(CallTarget::unresolved("refresh").to_string(), "*refresh");
    }

    #[test]
    fn edge_serializes_with_artifact_keys() {
        let edge = CallEdge::calls(
            "UserComponent.ngOnInit",
            CallTarget::resolved("UserService", "getUser"),
            "userService",
        );
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(value["from"], "UserComponent.ngOnInit");
        assert_eq!(value["to"], "UserService.getUser");
        assert_eq!(value["type"], "calls");
        assert_eq!(value["service_var"], "userService");
    }
}
