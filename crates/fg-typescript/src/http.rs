use crate::policy::AnalysisPolicy;
use fg_core::models::{CallConvention, HttpCallRecord, HttpMethod, InjectedDependency};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::OnceLock;

static DIRECT_LITERAL: OnceLock<Regex> = OnceLock::new();
static INDIRECT_VARIABLE: OnceLock<Regex> = OnceLock::new();
static LOCAL_LITERAL: OnceLock<Regex> = OnceLock::new();
static BARE_FETCH: OnceLock<Regex> = OnceLock::new();
static EXTERNAL_LIBRARY: OnceLock<Regex> = OnceLock::new();
static OPTIONS_METHOD: OnceLock<Regex> = OnceLock::new();

fn direct_literal() -> &'static Regex {
    DIRECT_LITERAL.get_or_init(|| {
        Regex::new(r#"this\.([a-zA-Z_$][a-zA-Z0-9_$]*)\.(get|post|put|delete|patch)\s*(?:<[^>]*>)?\s*\(\s*['"`]([^'"`]+)['"`]"#)
            .expect("valid regex")
    })
}

fn indirect_variable() -> &'static Regex {
    INDIRECT_VARIABLE.get_or_init(|| {
        Regex::new(r"this\.([a-zA-Z_$][a-zA-Z0-9_$]*)\.(get|post|put|delete|patch)\s*(?:<[^>]*>)?\s*\(\s*([a-zA-Z_$][a-zA-Z0-9_$]*)")
            .expect("valid regex")
    })
}

fn local_literal() -> &'static Regex {
    LOCAL_LITERAL.get_or_init(|| {
        Regex::new(r#"(?:const|let|var)\s+([a-zA-Z_$][a-zA-Z0-9_$]*)\s*=\s*['"`]([^'"`]+)['"`]"#)
            .expect("valid regex")
    })
}

fn bare_fetch() -> &'static Regex {
    BARE_FETCH.get_or_init(|| {
        Regex::new(r#"fetch\s*\(\s*['"`]([^'"`]+)['"`](\s*,\s*\{)?"#)
            .expect("valid regex")
    })
}

fn external_library() -> &'static Regex {
    EXTERNAL_LIBRARY.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_$][a-zA-Z0-9_$]*)\.(get|post|put|delete|patch)\s*(?:<[^>]*>)?\s*\(\s*['"`]([^'"`]+)['"`]"#)
            .expect("valid regex")
    })
}

/// `method: 'POST'` inside a fetch options object
pub(crate) fn options_method() -> &'static Regex {
    OPTIONS_METHOD.get_or_init(|| {
        Regex::new(r#"method\s*:\s*['"`](\w+)['"`]"#).expect("valid regex")
    })
}

/// Object literal starting at the first byte of `text`, up to its matching brace.
///
/// Braces inside string literals are ignored. Unbalanced input yields the rest of `text`.
fn object_literal(text: &str) -> &str {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &text[..=idx];
                }
            }
            _ => {}
        }
    }
    text
}

/// Whether the match at `start` is glued to a preceding member access or identifier
pub(crate) fn continues_expression(body: &str, start: usize) -> bool {
    body[..start]
        .chars()
        .next_back()
        .map(|c| c == '.' || c == '_' || c == '$' || c.is_alphanumeric())
        .unwrap_or(false)
}

/// Method node and file a body belongs to
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    pub source: &'a str,
    pub file: &'a str,
}

/// Scans method bodies for the four outbound-call conventions
pub struct HttpCallDetector<'p> {
    policy: &'p AnalysisPolicy,
}

impl<'p> HttpCallDetector<'p> {
    pub fn new(policy: &'p AnalysisPolicy) -> Self {
        Self { policy }
    }

    /// Configured handle names plus dependencies typed as a network client
    pub fn client_handles(&self, injected: &[InjectedDependency]) -> HashSet<String> {
        self.policy
            .http_handles
            .iter()
            .cloned()
            .chain(
                injected
                    .iter()
                    .filter(|dep| self.policy.is_client_type(&dep.type_text))
                    .map(|dep| dep.name.clone()),
            )
            .collect()
    }

    /// Runs every convention over `body`, in convention order
    pub fn detect(
        &self,
        ctx: CallContext<'_>,
        body: &str,
        injected: &[InjectedDependency],
    ) -> Vec<HttpCallRecord> {
        let handles = self.client_handles(injected);
        let mut records = Vec::new();
        records.extend(self.direct_literal(ctx, body, &handles));
        records.extend(self.indirect_variable(ctx, body, &handles));
        records.extend(self.bare_fetch(ctx, body));
        records.extend(self.external_library(ctx, body));
        records
    }

    fn record(
        ctx: CallContext<'_>,
        url: &str,
        method: HttpMethod,
        client: &str,
        convention: CallConvention,
    ) -> HttpCallRecord {
        HttpCallRecord {
            source: ctx.source.to_string(),
            url: url.to_string(),
            method,
            file: ctx.file.to_string(),
            client: client.to_string(),
            convention,
        }
    }

    fn verb(caps: &Captures<'_>, group: usize) -> Option<HttpMethod> {
        caps.get(group)
            .and_then(|m| HttpMethod::from_str_opt(m.as_str()))
    }

    /// `this.http.get<T>('/api/users')`
    pub fn direct_literal(
        &self,
        ctx: CallContext<'_>,
        body: &str,
        handles: &HashSet<String>,
    ) -> Vec<HttpCallRecord> {
        direct_literal()
            .captures_iter(body)
            .filter(|caps| handles.contains(&caps[1]))
            .filter_map(|caps| {
                let method = Self::verb(&caps, 2)?;
                Some(Self::record(
                    ctx,
                    &caps[3],
                    method,
                    "HttpClient",
                    CallConvention::DirectLiteral,
                ))
            })
            .collect()
    }

    /// `const url = '/api/orders'; this.http.post(url, payload)`.
    ///
    /// Emits nothing when the identifier has no literal declaration in the body.
    pub fn indirect_variable(
        &self,
        ctx: CallContext<'_>,
        body: &str,
        handles: &HashSet<String>,
    ) -> Vec<HttpCallRecord> {
        indirect_variable()
            .captures_iter(body)
            .filter(|caps| handles.contains(&caps[1]))
            .filter_map(|caps| {
                let method = Self::verb(&caps, 2)?;
                let variable = &caps[3];
                let url = local_literal()
                    .captures_iter(body)
                    .find(|decl| &decl[1] == variable)
                    .map(|decl| decl[2].to_string());
                match url {
                    Some(url) => Some(Self::record(
                        ctx,
                        &url,
                        method,
                        "HttpClient",
                        CallConvention::IndirectVariable,
                    )),
                    None => {
                        tracing::debug!(source = ctx.source, variable, "URL variable has no literal declaration");
                        None
                    }
                }
            })
            .collect()
    }

    /// Global `fetch('/api')`, optionally with an options literal carrying `method`
    pub fn bare_fetch(&self, ctx: CallContext<'_>, body: &str) -> Vec<HttpCallRecord> {
        bare_fetch()
            .captures_iter(body)
            .filter(|caps| {
                caps.get(0)
                    .map(|m| !continues_expression(body, m.start()))
                    .unwrap_or(false)
            })
            .map(|caps| {
                let method = caps
                    .get(2)
                    .map(|opening| object_literal(&body[opening.end() - 1..]))
                    .and_then(|options| options_method().captures(options))
                    .and_then(|m| HttpMethod::from_str_opt(&m[1]))
                    .unwrap_or(HttpMethod::Get);
                Self::record(ctx, &caps[1], method, "fetch", CallConvention::BareFetch)
            })
            .collect()
    }

    /// `axios.get('/api/users')` and other configured client tokens
    pub fn external_library(&self, ctx: CallContext<'_>, body: &str) -> Vec<HttpCallRecord> {
        external_library()
            .captures_iter(body)
            .filter(|caps| {
                let token = &caps[1];
                self.policy.external_clients.iter().any(|c| c == token)
                    && caps
                        .get(0)
                        .map(|m| !continues_expression(body, m.start()))
                        .unwrap_or(false)
            })
            .filter_map(|caps| {
                let method = Self::verb(&caps, 2)?;
                Some(Self::record(
                    ctx,
                    &caps[3],
                    method,
                    &caps[1],
                    CallConvention::ExternalLibrary,
                ))
            })
            .collect()
    }
}
