pub mod entity;
pub mod manager;
pub mod params;
pub mod patch;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod schema;
pub mod store;
pub mod users;

pub use entity::{ColumnKind, EntitySchema};
pub use manager::{DatabaseError, DatabaseManager};
pub use patch::apply_patch;
pub use record::{EntityId, Record, RecordError};
pub use repository::Repository;
pub use store::{RowStore, SharedPool};
