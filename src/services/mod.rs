pub mod auth;
pub mod role;

pub use auth::AuthService;
pub use role::{Identity, RoleResolver};
