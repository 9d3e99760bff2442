pub mod path;
pub mod schema;
pub mod view;

pub use path::{HttpMethod, PathMap, StrucParameter, StrucPath};
pub use schema::{
    ARRAY_SCHEMA_NAME, DataPropertyType, INLINE_SCHEMA_NAME, SchemaRegistry, StrucItems,
    StrucProperty, StrucSchema, StrucSchemaKind,
};
pub use view::{ViewGroup, ViewGroupKind, ViewGroupLv, ViewGroupMdv};
