use anyhow::{Context, Result};
use fg_typescript::AnalysisPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the repository root when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "fe-graph.toml";

/// Project configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analysis: AnalysisPolicy,
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Inventory destination; relative paths are resolved against the repository root
    pub inventory_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// `--config` if given, else `<repo>/fe-graph.toml` if present, else defaults
    pub fn resolve(repo: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = repo.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::load(&candidate);
        }
        tracing::debug!("No config file, using defaults");
        Ok(Self::default())
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if let Some(path) = &self.output.inventory_path {
            if path.as_os_str().is_empty() {
                anyhow::bail!("output.inventory_path cannot be empty");
            }
        }
        Ok(())
    }

    pub fn inventory_path(&self, repo: &Path) -> PathBuf {
        match &self.output.inventory_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => repo.join(path),
            None => default_inventory_path(repo),
        }
    }
}

/// `outputs/frontend_graph.json` next to the repository's parent directory
pub fn default_inventory_path(repo: &Path) -> PathBuf {
    repo.parent()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("outputs")
        .join("frontend_graph.json")
}

/// Commented default config written by `fe-graph init`
pub const DEFAULT_CONFIG: &str = r#"# fe-graph configuration

[analysis]
# Receivers never turned into edges by the bare-receiver pass
deny_list = ["console", "window", "document", "Math", "Object", "Array", "JSON"]

# Field names treated as network-client handles (this.http.get)
http_handles = ["http"]

# Injected types that also make a dependency a network-client handle
http_client_types = ["HttpClient"]

# Third-party client tokens (axios.get)
external_clients = ["axios"]

# Declaration names holding a base URL (case-insensitive substring match)
base_url_aliases = ["baseUrl", "apiBase", "apiUrl", "rootUrl", "API_URL"]

# Template interpolations replaced by the local base URL
template_tokens = ["this.apiUrl", "this.baseUrl", "this.apiBase"]

graph_extensions = ["ts"]
inventory_extensions = ["ts", "js"]

[output]
# Defaults to ../outputs/frontend_graph.json next to the repository's parent
# inventory_path = "../outputs/frontend_graph.json"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_text_matches_built_in_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.analysis, AnalysisPolicy::default());
        assert!(config.output.inventory_path.is_none());
    }

    #[test]
    fn partial_analysis_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[analysis]\nexternal_clients = [\"axios\", \"ky\"]\n").unwrap();
        assert_eq!(config.analysis.external_clients, vec!["axios", "ky"]);
        assert_eq!(config.analysis.http_handles, vec!["http"]);
    }

    #[test]
    fn empty_extension_list_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[analysis]\ngraph_extensions = []\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("graph_extensions"));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(toml::from_str::<Config>("[rules]\nstrict = true\n").is_err());
    }

    #[test]
    fn repo_config_is_picked_up() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[output]\ninventory_path = \"out/inventory.json\"\n",
        )
        .unwrap();
        let config = Config::resolve(temp_dir.path(), None).unwrap();
        assert_eq!(
            config.inventory_path(temp_dir.path()),
            temp_dir.path().join("out/inventory.json")
        );
    }

    #[test]
    fn default_inventory_path_uses_grandparent() {
        assert_eq!(
            default_inventory_path(Path::new("/work/project/frontend")),
            PathBuf::from("/work/outputs/frontend_graph.json")
        );
        assert_eq!(
            default_inventory_path(Path::new("frontend")),
            PathBuf::from("./outputs/frontend_graph.json")
        );
    }
}
