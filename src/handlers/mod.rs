// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth when `security.require_auth` is on)
pub mod public; // /, /health, /signup, /login
pub mod protected; // /:entity, /:entity/:id
