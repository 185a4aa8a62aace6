//! Authentication route handlers
//!
//! - `POST /register` and `POST /login` start a session and set both cookies
//! - `POST /refresh` rotates the session's tokens explicitly
//! - `POST /logout` revokes the session's refresh token and clears cookies
//! - `GET /me` returns the identity behind the session gate

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
