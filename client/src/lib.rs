//! Typed client for the admin console REST API.
//!
//! The crate is organised as a thin stack: [`config`] selects one immutable
//! environment profile, [`endpoints`] maps category/action pairs onto API
//! paths, [`http`] executes requests against the base URL and normalises
//! failures into one error shape, and [`services`] exposes the auth and user
//! management operations on top of it. Session state (bearer token, cached
//! user record, remember flag) lives behind the [`session::SessionStore`]
//! port and is injected into the client rather than read from ambient
//! globals, so tests and embedders can substitute their own storage.

pub mod config;
pub mod endpoints;
pub mod http;
pub mod services;
pub mod session;

pub use config::{Environment, EnvironmentConfig};
pub use http::{ApiClient, ApiError, ApiResponse, ApiResult, RequestOptions};
pub use services::{AuthService, UserService};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
