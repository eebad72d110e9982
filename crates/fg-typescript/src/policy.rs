use fg_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lexical analysis policy.
///
/// Every heuristic list the passes consult lives here, so a config file or a
/// test can swap any of them without touching the analyzers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisPolicy {
    /// Receivers the bare-receiver pass never turns into edges
    pub deny_list: Vec<String>,
    /// Field names treated as network-client handles (`this.http.get`)
    pub http_handles: Vec<String>,
    /// Injected types that make a dependency a network-client handle
    pub http_client_types: Vec<String>,
    /// Third-party client tokens (`axios.get`)
    pub external_clients: Vec<String>,
    /// Declaration names that hold a base URL
    pub base_url_aliases: Vec<String>,
    /// Interpolations replaced by the local base URL in template URLs
    pub template_tokens: Vec<String>,
    pub graph_extensions: Vec<String>,
    pub inventory_extensions: Vec<String>,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            deny_list: strings(&[
                "console", "window", "document", "Math", "Object", "Array", "JSON",
            ]),
            http_handles: strings(&["http"]),
            http_client_types: strings(&["HttpClient"]),
            external_clients: strings(&["axios"]),
            base_url_aliases: strings(&["baseUrl", "apiBase", "apiUrl", "rootUrl", "API_URL"]),
            template_tokens: strings(&["this.apiUrl", "this.baseUrl", "this.apiBase"]),
            graph_extensions: strings(&["ts"]),
            inventory_extensions: strings(&["ts", "js"]),
        }
    }
}

impl AnalysisPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&str, &Vec<String>); 5] = [
            ("http_handles", &self.http_handles),
            ("base_url_aliases", &self.base_url_aliases),
            ("template_tokens", &self.template_tokens),
            ("graph_extensions", &self.graph_extensions),
            ("inventory_extensions", &self.inventory_extensions),
        ];
        for (name, list) in required {
            if list.is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
            if list.iter().any(|item| item.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "{} must not contain blank entries",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn deny_set(&self) -> HashSet<&str> {
        self.deny_list.iter().map(String::as_str).collect()
    }

    pub fn is_client_type(&self, type_text: &str) -> bool {
        self.http_client_types.iter().any(|t| t == type_text)
    }

    /// Case-insensitive substring match, so `this.apiUrlV2` still counts
    pub fn is_base_url_name(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.base_url_aliases
            .iter()
            .any(|alias| lower.contains(&alias.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let policy = AnalysisPolicy::default();
        assert!(policy.validate().is_ok());
        assert!(policy.deny_set().contains("console"));
        assert!(policy.is_client_type("HttpClient"));
    }

    #[test]
    fn empty_lists_are_rejected() {
        let policy = AnalysisPolicy {
            base_url_aliases: Vec::new(),
            ..Default::default()
        };
        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("base_url_aliases"));

        let policy = AnalysisPolicy {
            graph_extensions: vec![" ".into()],
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn base_url_names_match_case_insensitively() {
        let policy = AnalysisPolicy::default();
        assert!(policy.is_base_url_name("baseUrl"));
        assert!(policy.is_base_url_name("BASEURL"));
        assert!(policy.is_base_url_name("legacyApiUrl"));
        assert!(!policy.is_base_url_name("endpoint"));
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let policy: AnalysisPolicy = serde_json::from_str(r#"{"http_handles": ["api"]}"#).unwrap();
        assert_eq!(policy.http_handles, vec!["api".to_string()]);
        assert_eq!(policy.external_clients, vec!["axios".to_string()]);
    }
}
