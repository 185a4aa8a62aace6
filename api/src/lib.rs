//! HTTP surface of the Parley backend
//!
//! Cookie-based session transport in front of `parley_core`: the request
//! gate that silently rotates expired access tokens, the auth routes and
//! the mapping of domain errors onto JSON error bodies.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
pub use cookies::AuthCookies;
pub use middleware::auth::{AuthContext, CookieAuth};
