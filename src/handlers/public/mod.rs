// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Service discovery, liveness, and token acquisition.

pub mod auth;
pub mod system;

pub use auth::*;
pub use system::*;
