use crate::policy::AnalysisPolicy;
use fg_core::models::{has_scheme, ResolvedUrl};
use fg_core::parsers::{ExprKind, Expression, MethodDecl};
use fg_core::{EnvironmentMap, SourceUnit};
use regex::Regex;
use std::sync::OnceLock;

static QUOTED: OnceLock<Regex> = OnceLock::new();

fn quoted() -> &'static Regex {
    QUOTED.get_or_init(|| Regex::new(r#"['"`](.*?)['"`]"#).expect("valid regex"))
}

/// Best-effort URL reconstruction for inventory records
pub struct UrlResolver<'a> {
    policy: &'a AnalysisPolicy,
    environment: &'a EnvironmentMap,
}

impl<'a> UrlResolver<'a> {
    pub fn new(policy: &'a AnalysisPolicy, environment: &'a EnvironmentMap) -> Self {
        Self {
            policy,
            environment,
        }
    }

    /// First quoted initializer among declarations named like a base URL.
    ///
    /// Declarations are visited in source order and the first match wins.
    pub fn local_base_url(&self, unit: &SourceUnit) -> Option<String> {
        unit.tree
            .declarations
            .iter()
            .filter(|decl| self.policy.is_base_url_name(&decl.name))
            .find_map(|decl| {
                let init = decl.initializer.as_ref()?.span.slice(&unit.text);
                quoted()
                    .captures(init)
                    .map(|caps| caps[1].to_string())
            })
    }

    /// Local base if any, else the first environment entry
    pub fn base_url<'b>(&'b self, local_base: Option<&'b str>) -> Option<&'b str> {
        local_base
            .filter(|base| !base.is_empty())
            .or_else(|| self.environment.values().next().map(String::as_str))
            .filter(|base| !base.is_empty())
    }

    /// Resolves the first argument of a network call
    pub fn resolve(
        &self,
        raw: &Expression,
        method: &MethodDecl,
        text: &str,
        local_base: Option<&str>,
    ) -> ResolvedUrl {
        let value = match &raw.kind {
            ExprKind::Identifier(name) => {
                let initializer = method
                    .local(name)
                    .and_then(|decl| decl.initializer.as_ref());
                match initializer {
                    Some(init) => init.literal_or_text(text),
                    None => {
                        tracing::debug!(variable = %name, "URL variable not declared in method");
                        return ResolvedUrl::Placeholder(name.clone());
                    }
                }
            }
            _ => raw.literal_or_text(text),
        };

        let expanded = self.expand_template(&value, local_base);
        match self.base_url(local_base) {
            Some(base) if !has_scheme(&expanded) => ResolvedUrl::classify(compose(base, &expanded)),
            _ => ResolvedUrl::classify(expanded),
        }
    }

    /// Drops backticks and substitutes the configured `${this.baseUrl}`-style tokens
    pub fn expand_template(&self, value: &str, local_base: Option<&str>) -> String {
        if !value.contains('`') {
            return value.to_string();
        }
        let replacement = local_base.unwrap_or("");
        let mut expanded = value.replace('`', "");
        for token in &self.policy.template_tokens {
            expanded = expanded.replace(&format!("${{{}}}", token), replacement);
        }
        expanded
    }
}

/// `base` + `/` + `path`, with surrounding quotes and slashes trimmed
pub fn compose(base: &str, path: &str) -> String {
    let clean_base = base.trim_end_matches('/');
    let clean_path = strip_quotes(path).trim_start_matches('/');
    format!("{}/{}", clean_base, clean_path)
}

fn strip_quotes(value: &str) -> &str {
    let is_quote = |c: char| c == '\'' || c == '"' || c == '`';
    let value = value.strip_prefix(is_quote).unwrap_or(value);
    value.strip_suffix(is_quote).unwrap_or(value)
}
