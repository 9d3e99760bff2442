use indexmap::IndexMap;

use crate::config::DeriveConfig;
use crate::error::{DeriveError, Diagnostic};
use crate::model::{
    HttpMethod, PathMap, SchemaRegistry, StrucSchema, ViewGroup, ViewGroupKind, ViewGroupLv,
    ViewGroupMdv,
};

use super::grouping;
use super::refs::reachable_schemas;
use super::schema_map::{is_paged_schema, paged_schema_name};

/// Assemble the per-tag descriptor: role classification plus the tag-scoped
/// schema and path maps.
pub fn create_view_group(
    tag: &str,
    path_map: PathMap,
    registry: &SchemaRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) -> ViewGroup {
    let primary_paths = grouping::primary_paths(&path_map);
    let secondary_paths = grouping::secondary_paths(&path_map, &primary_paths, diagnostics);
    let relations = grouping::relation_paths(&path_map, &primary_paths);
    let internal_primary_paths = grouping::internal_primary_paths(&path_map, &relations);

    let roots = path_map
        .values()
        .flat_map(|methods| methods.values())
        .flat_map(|path| {
            path.request_struc_schema
                .iter()
                .chain(path.response_struc_schema.iter())
        });
    let struc_schema_map = reachable_schemas(registry, roots);

    ViewGroup {
        tag_name: tag.to_string(),
        primary_paths,
        secondary_paths,
        internal_primary_paths,
        struc_schema_map,
        struc_path_map: path_map,
    }
}

/// True when the whole group collapses into a single master-detail view:
/// one primary whose GET is typed, and no path outside that primary's
/// orbit (itself, its detail path, its internal primaries).
pub fn is_mdv_structure(view_group: &ViewGroup) -> bool {
    let [primary] = view_group.primary_paths.as_slice() else {
        return false;
    };
    let Some(get) = view_group
        .struc_path_map
        .get(primary)
        .and_then(|methods| methods.get(&HttpMethod::Get))
    else {
        return false;
    };
    if get.response_struc_schema.is_none() {
        return false;
    }
    view_group.struc_path_map.keys().all(|path| {
        path == primary
            || view_group.secondary_paths.values().any(|s| s == path)
            || view_group
                .internal_primary_paths
                .get(primary)
                .is_some_and(|nested| nested.contains(path))
    })
}

/// Lower a view group into its renderable shape: a master-detail view when
/// the group collapses onto one primary, a list view otherwise.
pub fn lower_view_group(view_group: ViewGroup, config: &DeriveConfig) -> ViewGroupKind {
    if is_mdv_structure(&view_group) {
        match mdv_for_primary(&view_group, &view_group.primary_paths[0], config) {
            Ok(mdv) => return ViewGroupKind::Mdv(mdv),
            Err(err) => {
                log::warn!(
                    "tag {}: {err}, falling back to list view",
                    view_group.tag_name
                );
            }
        }
    }
    ViewGroupKind::Lv(create_lv(view_group, config))
}

fn create_lv(view_group: ViewGroup, config: &DeriveConfig) -> ViewGroupLv {
    let mut primary_mdvs = IndexMap::new();
    for primary in &view_group.primary_paths {
        match mdv_for_primary(&view_group, primary, config) {
            Ok(mdv) => {
                primary_mdvs.insert(primary.clone(), mdv);
            }
            Err(err) => {
                log::warn!("tag {}: {err}, skipping {primary}", view_group.tag_name);
            }
        }
    }

    let struc_path_map: PathMap = view_group
        .struc_path_map
        .iter()
        .filter(|(path, _)| !is_claimed(&view_group, path))
        .map(|(path, methods)| (path.clone(), methods.clone()))
        .collect();

    ViewGroupLv {
        tag_name: view_group.tag_name,
        struc_schema_map: view_group.struc_schema_map,
        struc_path_map,
        primary_mdvs,
    }
}

fn is_claimed(view_group: &ViewGroup, path: &str) -> bool {
    view_group.primary_paths.iter().any(|p| p == path)
        || view_group.secondary_paths.values().any(|s| s == path)
        || view_group
            .internal_primary_paths
            .values()
            .any(|nested| nested.iter().any(|n| n == path))
}

/// Build the master-detail view of one primary, nested views included.
fn mdv_for_primary(
    view_group: &ViewGroup,
    primary: &str,
    config: &DeriveConfig,
) -> Result<ViewGroupMdv, DeriveError> {
    let secondary = view_group.secondary_paths.get(primary).map(String::as_str);
    let mut mdv = create_single_mdv(
        &view_group.tag_name,
        primary,
        secondary,
        &view_group.struc_schema_map,
        &view_group.struc_path_map,
        config,
    )?;

    if let Some(nested) = view_group.internal_primary_paths.get(primary) {
        for internal in nested {
            match create_single_mdv(
                &view_group.tag_name,
                internal,
                None,
                &view_group.struc_schema_map,
                &view_group.struc_path_map,
                config,
            ) {
                Ok(internal_mdv) => {
                    mdv.internal_mdvs.insert(internal.clone(), internal_mdv);
                }
                Err(err) => {
                    log::warn!("skipping nested view {internal} under {primary}: {err}");
                }
            }
        }
    }

    Ok(mdv)
}

/// Bind the CRUD method maps of one master-detail view.
///
/// GET anchors on the primary; POST is the primary's, if any; PUT and
/// DELETE prefer the detail path and fall back to the primary.
pub fn create_single_mdv(
    tag_name: &str,
    primary: &str,
    secondary: Option<&str>,
    schema_map: &SchemaRegistry,
    path_map: &PathMap,
    config: &DeriveConfig,
) -> Result<ViewGroupMdv, DeriveError> {
    let primary_methods = path_map
        .get(primary)
        .ok_or_else(|| DeriveError::MissingPrimaryGet(primary.to_string()))?;
    let get_path = primary_methods
        .get(&HttpMethod::Get)
        .ok_or_else(|| DeriveError::MissingPrimaryGet(primary.to_string()))?;

    // A paged response keeps the envelope aside; the view renders rows.
    let mut paged_struc_schema: Option<StrucSchema> = None;
    let mut get_schema = get_path.response_struc_schema.clone();
    if let Some(response) = &get_path.response_struc_schema {
        if is_paged_schema(response, config) {
            if let Some(row) = paged_schema_name(response).and_then(|name| schema_map.get(name)) {
                paged_struc_schema = Some(response.clone());
                get_schema = Some(row.clone());
            }
        }
    }

    let mut struc_path_map = IndexMap::new();
    let mut struc_schema_map = IndexMap::new();

    struc_path_map.insert(HttpMethod::Get, get_path.clone());
    if let Some(schema) = get_schema {
        struc_schema_map.insert(HttpMethod::Get, schema);
    }

    if let Some(post) = primary_methods.get(&HttpMethod::Post) {
        struc_path_map.insert(HttpMethod::Post, post.clone());
        if let Some(schema) = &post.request_struc_schema {
            struc_schema_map.insert(HttpMethod::Post, schema.clone());
        }
    }

    let secondary_methods = secondary.and_then(|path| path_map.get(path));

    let put = secondary_methods
        .and_then(|methods| methods.get(&HttpMethod::Put))
        .or_else(|| primary_methods.get(&HttpMethod::Put));
    if let Some(put) = put {
        struc_path_map.insert(HttpMethod::Put, put.clone());
        if let Some(schema) = &put.request_struc_schema {
            struc_schema_map.insert(HttpMethod::Put, schema.clone());
        }
    }

    let delete = secondary_methods
        .and_then(|methods| methods.get(&HttpMethod::Delete))
        .or_else(|| primary_methods.get(&HttpMethod::Delete));
    if let Some(delete) = delete {
        struc_path_map.insert(HttpMethod::Delete, delete.clone());
    }

    Ok(ViewGroupMdv {
        tag_name: tag_name.to_string(),
        paged_struc_schema,
        struc_path_map,
        struc_schema_map,
        secondary_path: secondary.map(str::to_string),
        internal_mdvs: IndexMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StrucPath;

    fn typed_get(path: &str) -> (HttpMethod, StrucPath) {
        let mut struc_path = StrucPath::new(path, HttpMethod::Get);
        struc_path.response_struc_schema = Some(StrucSchema::free("Row"));
        (HttpMethod::Get, struc_path)
    }

    fn build_group(paths: Vec<(&str, Vec<(HttpMethod, StrucPath)>)>) -> ViewGroup {
        let path_map: PathMap = paths
            .into_iter()
            .map(|(path, methods)| (path.to_string(), methods.into_iter().collect()))
            .collect();
        let mut diagnostics = Vec::new();
        create_view_group("things", path_map, &SchemaRegistry::new(), &mut diagnostics)
    }

    #[test]
    fn single_primary_with_detail_is_mdv() {
        let group = build_group(vec![
            ("/things", vec![typed_get("/things")]),
            ("/things/{id}", vec![typed_get("/things/{id}")]),
        ]);
        assert!(is_mdv_structure(&group));
    }

    #[test]
    fn stray_path_blocks_mdv_collapse() {
        let group = build_group(vec![
            ("/things", vec![typed_get("/things")]),
            ("/things/{id}", vec![typed_get("/things/{id}")]),
            (
                "/things/summary",
                vec![(
                    HttpMethod::Post,
                    StrucPath::new("/things/summary", HttpMethod::Post),
                )],
            ),
        ]);
        assert!(!is_mdv_structure(&group));
    }

    #[test]
    fn two_primaries_are_never_mdv() {
        let group = build_group(vec![
            ("/things", vec![typed_get("/things")]),
            ("/widgets", vec![typed_get("/widgets")]),
        ]);
        assert!(!is_mdv_structure(&group));
    }

    #[test]
    fn single_mdv_requires_a_get() {
        let config = DeriveConfig::default();
        let path_map: PathMap = [(
            "/things".to_string(),
            [(
                HttpMethod::Post,
                StrucPath::new("/things", HttpMethod::Post),
            )]
            .into_iter()
            .collect(),
        )]
        .into_iter()
        .collect();
        let result = create_single_mdv(
            "things",
            "/things",
            None,
            &SchemaRegistry::new(),
            &path_map,
            &config,
        );
        assert!(matches!(result, Err(DeriveError::MissingPrimaryGet(_))));
    }

    #[test]
    fn residual_map_keeps_only_unclaimed_paths() {
        let group = build_group(vec![
            ("/things", vec![typed_get("/things")]),
            ("/things/{id}", vec![typed_get("/things/{id}")]),
            ("/widgets", vec![typed_get("/widgets")]),
            (
                "/maintenance",
                vec![(
                    HttpMethod::Post,
                    StrucPath::new("/maintenance", HttpMethod::Post),
                )],
            ),
        ]);
        let config = DeriveConfig::default();
        let lowered = lower_view_group(group, &config);
        let lv = lowered.as_lv().expect("two primaries lower to a list view");
        assert_eq!(lv.primary_mdvs.len(), 2);
        assert_eq!(
            lv.struc_path_map.keys().collect::<Vec<_>>(),
            ["/maintenance"]
        );
    }
}
