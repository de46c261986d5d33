pub mod ping;
pub mod schema;
pub mod serve;
