pub mod auth;
pub mod error;
pub mod module;
pub mod types;

pub use auth::{ADMIN_PASSWORD_HEADER, AllowAll, Authenticator, DenyAll, SharedSecret};
pub use error::ServiceError;
pub use module::Module;
pub use types::now_rfc3339;
