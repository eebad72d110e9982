use crate::class_analyzer::{
    declaration_start, doc_comment, parameter_details, return_type, AnalyzedClass, ClassAnalyzer,
};
use crate::http::{options_method, HttpCallDetector};
use crate::policy::AnalysisPolicy;
use crate::url_resolver::UrlResolver;
use fg_core::models::{ApiCallDetail, HttpMethod};
use fg_core::parsers::{CallSite, LocationConverter, MethodDecl, SyntaxProvider};
use fg_core::{
    CatalogError, ConfigError, EnvironmentConfigExtractor, EnvironmentMap, FgError, SourceCatalog,
    SourceUnit,
};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

static OPTIONS_BODY: OnceLock<Regex> = OnceLock::new();

fn options_body() -> &'static Regex {
    OPTIONS_BODY.get_or_init(|| Regex::new(r"body\s*:\s*(\{.*?\}|\w+)").expect("valid regex"))
}

/// How a call site talks to the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NetworkCall<'c> {
    /// `this.http.get`, `axios.post`: the verb is the member name
    Client { member: &'c str },
    Fetch,
}

/// Builds the flat inventory: one record per network call site
pub struct ApiInventoryBuilder<'p> {
    policy: &'p AnalysisPolicy,
    http: HttpCallDetector<'p>,
    environment: EnvironmentMap,
}

impl<'p> ApiInventoryBuilder<'p> {
    pub fn new(policy: &'p AnalysisPolicy, environment: EnvironmentMap) -> Self {
        Self {
            policy,
            http: HttpCallDetector::new(policy),
            environment,
        }
    }

    /// Reads `src/environments` and prepares a builder for the repository
    pub fn for_repository(
        policy: &'p AnalysisPolicy,
        repo_root: &Path,
        provider: &dyn SyntaxProvider,
    ) -> Result<Self, ConfigError> {
        let extractor = EnvironmentConfigExtractor::new(&policy.base_url_aliases)
            .map_err(|e| ConfigError::Invalid(format!("base_url_aliases: {}", e)))?;
        let environment = extractor.extract(repo_root, provider);
        Ok(Self::new(policy, environment))
    }

    /// Catalogs and scans `<repo>/src`. A missing `src` is an error here.
    pub fn build_repository(
        &self,
        repo_root: &Path,
        provider: &dyn SyntaxProvider,
    ) -> Result<Vec<ApiCallDetail>, CatalogError> {
        let catalog = SourceCatalog::new(repo_root, &self.policy.inventory_extensions);
        let units = catalog.load(provider)?;
        Ok(self.build(&units))
    }

    pub fn build(&self, units: &[SourceUnit]) -> Vec<ApiCallDetail> {
        let details: Vec<ApiCallDetail> = units.iter().flat_map(|u| self.unit_details(u)).collect();
        info!(records = details.len(), units = units.len(), "Inventory built");
        details
    }

    pub fn unit_details(&self, unit: &SourceUnit) -> Vec<ApiCallDetail> {
        let resolver = UrlResolver::new(self.policy, &self.environment);
        let local_base = resolver.local_base_url(unit);
        if let Some(base) = &local_base {
            debug!(file = %unit.path, base = %base, "Local base URL");
        }
        let converter = LocationConverter::new(&unit.text);

        let mut details = Vec::new();
        for class in ClassAnalyzer::analyze(unit) {
            let handles = self.http.client_handles(&class.info.injected);
            for method in class.methods() {
                for call in &method.calls {
                    let callee = normalize_callee(call.callee.slice(&unit.text));
                    let Some(kind) = self.classify(&callee, &handles) else {
                        continue;
                    };
                    let detail = self.detail(
                        unit,
                        &class,
                        method,
                        call,
                        kind,
                        &resolver,
                        local_base.as_deref(),
                        &converter,
                    );
                    debug!(function = %detail.function, method = %detail.method, "Network call");
                    details.push(detail);
                }
            }
        }
        details
    }

    /// `fetch`, `<receiver>.<handle>.<member>` or `<external>.<member>`
    fn classify<'c>(&self, callee: &'c str, handles: &HashSet<String>) -> Option<NetworkCall<'c>> {
        let parts: Vec<&'c str> = callee.split('.').collect();
        match parts.as_slice() {
            ["fetch"] => Some(NetworkCall::Fetch),
            [receiver, handle, member]
                if !receiver.is_empty() && !member.is_empty() && handles.contains(*handle) =>
            {
                Some(NetworkCall::Client { member: *member })
            }
            [client, member]
                if !member.is_empty() && self.policy.external_clients.iter().any(|c| c == client) =>
            {
                Some(NetworkCall::Client { member: *member })
            }
            _ => None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn detail(
        &self,
        unit: &SourceUnit,
        class: &AnalyzedClass<'_>,
        method: &MethodDecl,
        call: &CallSite,
        kind: NetworkCall<'_>,
        resolver: &UrlResolver<'_>,
        local_base: Option<&str>,
        converter: &LocationConverter,
    ) -> ApiCallDetail {
        let text = unit.text.as_str();
        let arg = |index: usize| call.args.get(index).map(|a| a.literal_or_text(text));

        let (verb, body, params) = match kind {
            NetworkCall::Client { member } => {
                let carries_body = HttpMethod::from_str_opt(member)
                    .map(|m| m.carries_body())
                    .unwrap_or(false);
                let body = if carries_body { arg(1) } else { None };
                (member.to_uppercase(), body, arg(2))
            }
            NetworkCall::Fetch => {
                let options = arg(1);
                let verb = options
                    .as_deref()
                    .and_then(|o| options_method().captures(o))
                    .map(|caps| caps[1].to_uppercase())
                    .unwrap_or_else(|| HttpMethod::Get.to_string());
                let body = options
                    .as_deref()
                    .and_then(|o| options_body().captures(o))
                    .map(|caps| caps[1].to_string());
                (verb, body, options)
            }
        };

        let url = call
            .args
            .first()
            .map(|raw| resolver.resolve(raw, method, text, local_base));

        ApiCallDetail {
            file: unit.path.clone(),
            class: class.info.name.clone(),
            decorators: class.info.decorators.clone(),
            properties: class.info.properties.clone(),
            function: format!("{}.{}", class.info.name, method.name),
            access: method
                .access
                .map(|a| a.as_str())
                .unwrap_or("public")
                .to_string(),
            method: verb,
            url,
            params,
            body,
            parameter_details: parameter_details(method, text),
            return_type: return_type(method, text),
            doc: doc_comment(method, text),
            location: converter.location(declaration_start(method, text)),
        }
    }
}

/// Drops whitespace and optional-chaining marks from callee text
fn normalize_callee(callee: &str) -> String {
    callee
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .replace("?.", ".")
}

/// Environment extraction, cataloging and scanning in one call
pub fn scan_repository(
    policy: &AnalysisPolicy,
    repo_root: &Path,
    provider: &dyn SyntaxProvider,
) -> Result<Vec<ApiCallDetail>, FgError> {
    let builder = ApiInventoryBuilder::for_repository(policy, repo_root, provider)?;
    Ok(builder.build_repository(repo_root, provider)?)
}
