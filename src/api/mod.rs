//! # API Module
//!
//! HTTP handlers of the playlist service, built on [Axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! - [`generate_playlist`] - `GET|POST /generatePlaylist`, creates a playlist
//!   from a list of songs given as JSON body or query parameters
//! - [`clear`] - `GET /clear`, deletes every playlist of the account
//! - [`callback`] - `GET /callback`, completes the interactive
//!   authorization-code strategy and creates the playlist
//! - [`health`] - `GET /health`, status and version
//!
//! [`authorize_callback`] is not part of the service router. It is mounted by
//! the temporary server of `songlist auth` to capture the authorization code.
//!
//! ## Errors
//!
//! Handlers return [`crate::error::AppError`], which renders as a JSON
//! `{ "error": ... }` body with a status matching the kind of failure:
//! `400` for invalid input, `401` for authentication failures, `502` for
//! Spotify failures and `500` for local storage or configuration problems.

mod callback;
mod clear;
mod generate;
mod health;

pub use callback::{authorize_callback, callback};
pub use clear::clear;
pub use generate::{generate_playlist, parse_request};
pub use health::health;
