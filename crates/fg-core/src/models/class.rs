use serde::{Deserialize, Serialize};

/// Role of a class, inferred from its name suffix only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTag {
    #[serde(rename = "angular_service")]
    Service,
    #[serde(rename = "angular_component")]
    Component,
    #[serde(rename = "angular_class")]
    GenericClass,
}

impl RoleTag {
    /// `*Service` -> service, `*Component` -> component, anything else -> generic
    pub fn from_class_name(name: &str) -> Self {
        if name.ends_with("Service") {
            RoleTag::Service
        } else if name.ends_with("Component") {
            RoleTag::Component
        } else {
            RoleTag::GenericClass
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTag::Service => "angular_service",
            RoleTag::Component => "angular_component",
            RoleTag::GenericClass => "angular_class",
        }
    }
}

/// Constructor parameter interpreted as a collaborator handle.
///
/// The type text is a lookup key only, it is never checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InjectedDependency {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
}

impl InjectedDependency {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
        }
    }
}

/// Declared class property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub initializer: Option<String>,
}

/// Class-level facts gathered by the class analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub role: RoleTag,
    /// Rendered decorators, e.g. `Injectable({ providedIn: 'root' })`
    pub decorators: Vec<String>,
    /// Taken from the first declared constructor only
    pub injected: Vec<InjectedDependency>,
    pub properties: Vec<PropertyInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tag_follows_name_suffix() {
        assert_eq!(RoleTag::from_class_name("UserService"), RoleTag::Service);
        assert_eq!(
            RoleTag::from_class_name("DashboardComponent"),
            RoleTag::Component
        );
        assert_eq!(
            RoleTag::from_class_name("ServiceLocator"),
            RoleTag::GenericClass
        );
    }

    #[test]
    fn role_tag_serializes_as_node_type() {
        let json = serde_json::to_string(&RoleTag::Service).unwrap();
        assert_eq!(json, "\"angular_service\"");
    }
}
