//! Structure derivation for OpenAPI 3.x documents.
//!
//! `ovis-core` turns a parsed OpenAPI document into a normalized model of
//! schemas, paths, and per-tag view groups that a generic CRUD UI can render
//! directly: a master-detail view for tags with a single top-level resource,
//! a list view over several masters otherwise. No code is generated; the
//! model is plain data, built in one pass and immutable afterwards.

pub mod config;
pub mod derive;
pub mod error;
pub mod model;
pub mod parse;

pub use config::DeriveConfig;
pub use error::{DeriveError, Diagnostic, DiagnosticKind, ParseError};

pub use self::derive::{Derivation, derive};

/// Parse a YAML document and derive its view structures in one step.
pub fn derive_from_yaml(input: &str, config: &DeriveConfig) -> Result<Derivation, ParseError> {
    let document = parse::from_yaml(input)?;
    Ok(derive(&document, config))
}

/// Parse a JSON document and derive its view structures in one step.
pub fn derive_from_json(input: &str, config: &DeriveConfig) -> Result<Derivation, ParseError> {
    let document = parse::from_json(input)?;
    Ok(derive(&document, config))
}
