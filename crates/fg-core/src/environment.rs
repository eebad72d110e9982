use crate::catalog::read_source;
use crate::parsers::SyntaxProvider;
use indexmap::IndexMap;
use regex::Regex;
use std::path::Path;

/// Environment file name → base URL, in discovery order
pub type EnvironmentMap = IndexMap<String, String>;

/// Reads base URLs out of `src/environments/*.ts`
pub struct EnvironmentConfigExtractor {
    pattern: Regex,
}

impl EnvironmentConfigExtractor {
    /// `aliases` are the field names treated as base URLs (`baseUrl`, `apiUrl`, ...)
    pub fn new(aliases: &[String]) -> Result<Self, regex::Error> {
        let alternatives = aliases
            .iter()
            .map(|alias| regex::escape(alias))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r#"(?:{})\s*:\s*['"`](.*?)['"`]"#,
            alternatives
        ))?;
        Ok(Self { pattern })
    }

    /// First base-URL literal inside an initializer text
    pub fn match_initializer<'t>(&self, initializer: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(initializer)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Missing directory yields an empty map; unreadable files are skipped
    pub fn extract(&self, repo_root: &Path, provider: &dyn SyntaxProvider) -> EnvironmentMap {
        let mut map = EnvironmentMap::new();
        let env_dir = repo_root.join("src").join("environments");

        let entries = match std::fs::read_dir(&env_dir) {
            Ok(entries) => entries,
            Err(_) => {
                tracing::warn!(dir = %env_dir.display(), "Environment directory not found");
                return map;
            }
        };

        let mut files: Vec<_> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("ts"))
            .collect();
        files.sort();

        for path in files {
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            let text = match read_source(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Could not read environment file");
                    continue;
                }
            };
            let tree = match provider.parse(&path, &text) {
                Ok(tree) => tree,
                Err(e) => {
                    tracing::warn!(error = %e, "Could not parse environment file");
                    continue;
                }
            };

            for decl in tree.top_level_variables() {
                let Some(init) = &decl.initializer else {
                    continue;
                };
                if let Some(base) = self.match_initializer(init.span.slice(&text)) {
                    tracing::debug!(file = %file_name, variable = %decl.name, base, "Environment base URL");
                    map.insert(file_name.clone(), base.to_string());
                }
            }
        }

        tracing::info!(count = map.len(), "Environment base URLs extracted");
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::SwcProvider;
    use std::fs;
    use tempfile::TempDir;

    fn aliases() -> Vec<String> {
        ["baseUrl", "apiBase", "apiUrl", "rootUrl", "API_URL"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn extracts_base_urls_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let env_dir = temp_dir.path().join("src/environments");
        fs::create_dir_all(&env_dir).unwrap();
        fs::write(
            env_dir.join("environment.ts"),
            "export const environment = { production: false, baseUrl: 'http://localhost:3000/' };",
        )
        .unwrap();
        fs::write(
            env_dir.join("environment.prod.ts"),
            "export const environment = {\n  production: true,\n  apiUrl: `https://api.example.com`\n};",
        )
        .unwrap();
        fs::write(env_dir.join("README.md"), "baseUrl: 'ignored'").unwrap();

        let extractor = EnvironmentConfigExtractor::new(&aliases()).unwrap();
        let map = extractor.extract(temp_dir.path(), &SwcProvider::new());

        let entries: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            entries,
            vec![
                ("environment.prod.ts", "https://api.example.com"),
                ("environment.ts", "http://localhost:3000/"),
            ]
        );
    }

    #[test]
    fn later_declaration_overwrites_earlier() {
        let temp_dir = TempDir::new().unwrap();
        let env_dir = temp_dir.path().join("src/environments");
        fs::create_dir_all(&env_dir).unwrap();
        fs::write(
            env_dir.join("environment.ts"),
            "const legacy = { baseUrl: 'http://old' };\nexport const environment = { baseUrl: 'http://new' };",
        )
        .unwrap();

        let extractor = EnvironmentConfigExtractor::new(&aliases()).unwrap();
        let map = extractor.extract(temp_dir.path(), &SwcProvider::new());
        assert_eq!(map.get("environment.ts").map(String::as_str), Some("http://new"));
    }

    #[test]
    fn byte_order_mark_does_not_hide_base_url() {
        let temp_dir = TempDir::new().unwrap();
        let env_dir = temp_dir.path().join("src/environments");
        fs::create_dir_all(&env_dir).unwrap();
        fs::write(
            env_dir.join("environment.ts"),
            "\u{feff}export const environment = { apiUrl: 'https://api.example.com' };",
        )
        .unwrap();

        let extractor = EnvironmentConfigExtractor::new(&aliases()).unwrap();
        let map = extractor.extract(temp_dir.path(), &SwcProvider::new());
        assert_eq!(
            map.get("environment.ts").map(String::as_str),
            Some("https://api.example.com")
        );
    }

    #[test]
    fn missing_directory_yields_empty_map() {
        let temp_dir = TempDir::new().unwrap();
        let extractor = EnvironmentConfigExtractor::new(&aliases()).unwrap();
        assert!(extractor.extract(temp_dir.path(), &SwcProvider::new()).is_empty());
    }

    #[test]
    fn first_match_in_initializer_wins() {
        let extractor = EnvironmentConfigExtractor::new(&aliases()).unwrap();
        assert_eq!(
            extractor.match_initializer("{ apiUrl: \"https://a\", baseUrl: 'https://b' }"),
            Some("https://a")
        );
        assert_eq!(extractor.match_initializer("{ production: true }"), None);
    }
}
