use indexmap::IndexMap;

use super::path::{HttpMethod, PathMap, StrucPath};
use super::schema::{SchemaRegistry, StrucSchema};

/// Per-tag descriptor before lowering into a concrete view shape: the tag's
/// path slice, its reachable schema slice, and the role classification of
/// its paths.
///
/// Every value in `secondary_paths` and every element of
/// `internal_primary_paths` is a key of `struc_path_map`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewGroup {
    pub tag_name: String,
    /// List endpoints: no `{…}` segment, GET with a response schema.
    pub primary_paths: Vec<String>,
    /// Primary → its single-item detail endpoint (at most one each).
    pub secondary_paths: IndexMap<String, String>,
    /// Primary → relation paths that qualify as primaries themselves.
    pub internal_primary_paths: IndexMap<String, Vec<String>>,
    /// Registry slice reachable from this tag's operations.
    pub struc_schema_map: SchemaRegistry,
    pub struc_path_map: PathMap,
}

/// The lowered, renderable shape of a tag.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewGroupKind {
    Lv(ViewGroupLv),
    Mdv(ViewGroupMdv),
}

impl ViewGroupKind {
    pub fn tag_name(&self) -> &str {
        match self {
            ViewGroupKind::Lv(lv) => &lv.tag_name,
            ViewGroupKind::Mdv(mdv) => &mdv.tag_name,
        }
    }

    pub fn as_mdv(&self) -> Option<&ViewGroupMdv> {
        match self {
            ViewGroupKind::Mdv(mdv) => Some(mdv),
            ViewGroupKind::Lv(_) => None,
        }
    }

    pub fn as_lv(&self) -> Option<&ViewGroupLv> {
        match self {
            ViewGroupKind::Lv(lv) => Some(lv),
            ViewGroupKind::Mdv(_) => None,
        }
    }
}

/// List view over several masters: one nested master-detail view per
/// primary, plus the residual paths no view claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewGroupLv {
    pub tag_name: String,
    pub struc_schema_map: SchemaRegistry,
    /// Paths not claimed by any nested master-detail view.
    pub struc_path_map: PathMap,
    pub primary_mdvs: IndexMap<String, ViewGroupMdv>,
}

/// Master-detail view for a single primary path. The method maps bind each
/// CRUD operation to the path it runs against and the schema its form
/// renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewGroupMdv {
    pub tag_name: String,
    /// The pagination envelope of the primary GET, when its response is
    /// paged. The GET entry of `struc_schema_map` is then the row schema.
    pub paged_struc_schema: Option<StrucSchema>,
    pub struc_path_map: IndexMap<HttpMethod, StrucPath>,
    pub struc_schema_map: IndexMap<HttpMethod, StrucSchema>,
    pub secondary_path: Option<String>,
    /// Nested views seeded by internal primary paths.
    pub internal_mdvs: IndexMap<String, ViewGroupMdv>,
}
