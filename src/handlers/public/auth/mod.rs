// handlers/public/auth/mod.rs - Account creation and token acquisition

pub mod login; // POST /login - verify credentials, issue JWT
pub mod signup; // POST /signup - create account with bcrypt-hashed password

pub use login::login;
pub use signup::signup;
