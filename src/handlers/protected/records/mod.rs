pub mod collection;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::create as record_create;
pub use collection::list as record_list;
pub use record::delete as record_delete;
pub use record::get as record_get;
pub use record::patch as record_patch;
