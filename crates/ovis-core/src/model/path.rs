use std::fmt;

use indexmap::IndexMap;

use super::schema::{DataPropertyType, StrucSchema};

/// HTTP methods the structure model distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path or query parameter bound to an operation, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StrucParameter {
    pub name: String,
    pub param_type: DataPropertyType,
    pub format: Option<String>,
    pub required: bool,
}

/// One (URL template, HTTP method) pair with its bound schemas. Carries
/// everything a client needs to build a runtime request: the template, the
/// ordered parameters, and the request/response schema.
///
/// GET populates only the response schema, POST/PUT only the request schema,
/// DELETE neither.
#[derive(Debug, Clone, PartialEq)]
pub struct StrucPath {
    pub path: String,
    pub http_method: HttpMethod,
    pub query_params: Vec<StrucParameter>,
    pub path_params: Vec<StrucParameter>,
    pub request_struc_schema: Option<StrucSchema>,
    pub response_struc_schema: Option<StrucSchema>,
}

impl StrucPath {
    pub fn new(path: impl Into<String>, http_method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            http_method,
            query_params: Vec::new(),
            path_params: Vec::new(),
            request_struc_schema: None,
            response_struc_schema: None,
        }
    }
}

/// Path template → method → derived path, insertion-ordered.
pub type PathMap = IndexMap<String, IndexMap<HttpMethod, StrucPath>>;
