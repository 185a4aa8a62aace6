//! Request and response bodies of the HTTP API

pub mod auth;

pub use parley_shared::errors::ErrorResponse;
