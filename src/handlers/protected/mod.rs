// handlers/protected/mod.rs - Record handlers
//
// Guarded by the JWT middleware when `security.require_auth` is enabled;
// otherwise open.

pub mod records;

pub use records::*;
