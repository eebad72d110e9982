use crate::models::{Location, PropertyInfo, ResolvedUrl};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verb of an outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Convenient method to get Option
    pub fn from_str_opt(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Verbs whose second argument is a request body
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(HttpMethod::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(HttpMethod::Post)
        } else if s.eq_ignore_ascii_case("PUT") {
            Ok(HttpMethod::Put)
        } else if s.eq_ignore_ascii_case("DELETE") {
            Ok(HttpMethod::Delete)
        } else if s.eq_ignore_ascii_case("PATCH") {
            Ok(HttpMethod::Patch)
        } else {
            Err(())
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four textual shapes recognized as outbound network calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallConvention {
    /// `this.http.get('/api/users')`
    DirectLiteral,
    /// `const url = '/api'; this.http.post(url, body)`
    IndirectVariable,
    /// `fetch('/api/users')`
    BareFetch,
    /// `axios.get('/api/users')`
    ExternalLibrary,
}

/// One detected outbound call in the graph artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpCallRecord {
    /// Id of the method node containing the call
    pub source: String,
    pub url: String,
    pub method: HttpMethod,
    pub file: String,
    /// Client family: `HttpClient`, `fetch`, or the external library token
    #[serde(rename = "type")]
    pub client: String,
    pub convention: CallConvention,
}

/// Declared method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDetail {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
}

/// Flat inventory record: one per detected network call, with signature,
/// documentation and location of the enclosing method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCallDetail {
    pub file: String,
    pub class: String,
    pub decorators: Vec<String>,
    pub properties: Vec<PropertyInfo>,
    pub function: String,
    pub access: String,
    pub method: String,
    pub url: Option<ResolvedUrl>,
    pub params: Option<String>,
    pub body: Option<String>,
    pub parameter_details: Vec<ParameterDetail>,
    pub return_type: String,
    pub doc: String,
    pub location: Location,
}
