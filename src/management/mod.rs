//! # Token Management
//!
//! Everything that keeps the service authenticated against Spotify:
//!
//! - [`TokenStore`] - the JSON token file written by `songlist auth` and
//!   rewritten after every refresh
//! - [`AuthManager`] - hands out request-scoped sessions, refreshing the
//!   stored token once when Spotify rejects it
//!
//! No credential is kept in memory between requests; the token file is the
//! only shared state.

mod auth;
mod token;

pub use auth::AuthManager;
pub use token::TokenStore;
