use crate::catalog::read_source;
use serde::Deserialize;
use std::path::Path;

/// The parts of `tsconfig.json` the catalog honors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Repo-relative path prefixes that are never cataloged
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTsConfig {
    #[serde(default)]
    exclude: Vec<String>,
}

impl ProjectSettings {
    /// Loads settings from `<repo_root>/tsconfig.json`, falling back to defaults
    pub fn load(repo_root: &Path) -> Self {
        let path = repo_root.join("tsconfig.json");
        let source = match read_source(&path) {
            Ok(source) => source,
            Err(_) => {
                tracing::debug!(path = %path.display(), "No tsconfig.json, using defaults");
                return Self::default();
            }
        };

        match Self::parse(&source) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed tsconfig.json");
                Self::default()
            }
        }
    }

    pub fn parse(source: &str) -> Result<Self, serde_json::Error> {
        let raw: RawTsConfig = serde_json::from_str(&strip_comments(source))?;
        let exclude = raw
            .exclude
            .iter()
            .map(|pattern| normalize_pattern(pattern))
            .filter(|pattern| !pattern.is_empty())
            .collect();
        Ok(Self { exclude })
    }

    /// Whether a repo-relative, forward-slash path falls under an excluded prefix
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|prefix| {
            relative == prefix
                || relative
                    .strip_prefix(prefix.as_str())
                    .map(|rest| rest.starts_with('/'))
                    .unwrap_or(false)
        })
    }
}

fn normalize_pattern(pattern: &str) -> String {
    let mut pattern = pattern.trim().trim_start_matches("./").to_string();
    loop {
        let trimmed = pattern
            .trim_end_matches("/**")
            .trim_end_matches("/*")
            .trim_end_matches('/')
            .to_string();
        if trimmed == pattern {
            return pattern;
        }
        pattern = trimmed;
    }
}

/// Removes `//` and `/* */` comments outside string literals
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
            }
            _ => out.push(c),
        }
    }

    out
}
