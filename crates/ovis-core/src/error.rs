use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Fatal derivation failures. Fatal is always local: a bad reference drops
/// one operation, a missing GET drops one master-detail view. The pass as a
/// whole keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    #[error("unsupported schema reference: {0}")]
    UnsupportedRef(String),

    #[error("no GET operation on primary path: {0}")]
    MissingPrimaryGet(String),
}

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A `$ref` that does not point into the local component schemas.
    UnsupportedRef,
    /// More than one detail-path candidate for the same primary.
    AmbiguousSecondary,
    /// A request or response body with none of the recognized media types.
    UnknownContentType,
    /// An inline schema nested past the recursion limit.
    CycleInInlineSchema,
    /// A well-formed reference to a schema the registry does not contain.
    MissingSchema,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedRef => "unsupported ref",
            DiagnosticKind::AmbiguousSecondary => "ambiguous secondary",
            DiagnosticKind::UnknownContentType => "unknown content type",
            DiagnosticKind::CycleInInlineSchema => "cycle in inline schema",
            DiagnosticKind::MissingSchema => "missing schema",
        }
    }
}

/// A warning accumulated during a derivation pass. The pass never aborts on
/// a single bad path; it records what it skipped so the UI can render the
/// rest of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}
