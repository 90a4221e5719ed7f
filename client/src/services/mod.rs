//! Domain services over the HTTP client.
//!
//! Each service is a thin, dependency-injected wrapper: it resolves fixed
//! endpoints through the registry and delegates to [`crate::http::ApiClient`]
//! with typed request and response shapes. The auth service additionally
//! manages the session token lifecycle.

pub mod auth;
pub mod users;

pub use auth::AuthService;
pub use users::UserService;
