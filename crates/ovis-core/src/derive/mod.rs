//! The derivation pipeline: schema registry → per-tag path slices → role
//! classification → lowered view groups.

pub mod grouping;
pub mod path_map;
pub mod refs;
pub mod schema_map;
pub mod view_build;

pub use path_map::operation_to_struc_path;
pub use refs::{reachable_schemas, strip_ref};
pub use schema_map::{is_paged_schema, map_schema, paged_schema_name};
pub use view_build::{create_single_mdv, create_view_group, is_mdv_structure, lower_view_group};

use indexmap::IndexMap;

use crate::config::DeriveConfig;
use crate::error::Diagnostic;
use crate::model::{SchemaRegistry, ViewGroupKind};
use crate::parse::document::OpenApiDocument;

/// Everything one derivation pass produces. Immutable once returned; load a
/// new document, derive again, and drop the old value.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    /// Tag → lowered view group, in document tag order, untagged bucket last.
    pub view_groups: IndexMap<String, ViewGroupKind>,
    /// The full schema registry of the document.
    pub schemas: SchemaRegistry,
    /// Declared server URLs, in declaration order.
    pub servers: Vec<String>,
    /// Warnings collected along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the full pipeline over a parsed document.
pub fn derive(document: &OpenApiDocument, config: &DeriveConfig) -> Derivation {
    let mut diagnostics = Vec::new();

    let registry = build_registry(document, &mut diagnostics);

    let mut view_groups = IndexMap::new();
    for tag in &document.tags {
        let path_map = grouping::paths_for_tag(&tag.name, &document.paths, &registry, &mut diagnostics);
        if path_map.is_empty() {
            log::debug!("tag {} has no operations, skipping", tag.name);
            continue;
        }
        let view_group = view_build::create_view_group(&tag.name, path_map, &registry, &mut diagnostics);
        view_groups.insert(
            tag.name.clone(),
            view_build::lower_view_group(view_group, config),
        );
    }

    let untagged = grouping::paths_without_tag(&document.paths, &registry, &mut diagnostics);
    if !untagged.is_empty() {
        let view_group =
            view_build::create_view_group(&config.untagged_label, untagged, &registry, &mut diagnostics);
        view_groups.insert(
            config.untagged_label.clone(),
            view_build::lower_view_group(view_group, config),
        );
    }

    let servers = document.servers.iter().map(|s| s.url.clone()).collect();

    Derivation {
        view_groups,
        schemas: registry,
        servers,
        diagnostics,
    }
}

fn build_registry(document: &OpenApiDocument, diagnostics: &mut Vec<Diagnostic>) -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    if let Some(components) = &document.components {
        for (name, node) in &components.schemas {
            registry.insert(name.clone(), schema_map::map_schema(name, node, diagnostics));
        }
    }
    registry
}
