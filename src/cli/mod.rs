//! # CLI Module
//!
//! Command implementations of the `songlist` binary. Besides starting the
//! HTTP service, the CLI provisions the token file and runs the service's
//! operations directly from the terminal.
//!
//! ## Commands
//!
//! - [`serve`] - Starts the HTTP service
//! - [`auth`] - Authorizes with Spotify and writes the token file
//! - [`create`] - Creates a playlist from songs given on the command line
//! - [`clear`] - Deletes every playlist of the account
//! - [`token`] - Shows the status of the stored token
//!
//! ## Usage Patterns
//!
//! ```bash
//! songlist auth                                  # Provision token.json once
//! songlist serve                                 # Run the HTTP service
//! songlist create --name "Test Mix" "Imagine Dragons Believer" "Queen Bohemian Rhapsody"
//! songlist clear                                 # Delete all playlists
//! ```
//!
//! Fatal errors are reported with the `error!` macro, which exits the process.

mod auth;
mod playlist;
mod spinner;
mod token;

pub use auth::auth;
pub use playlist::{clear, create};
pub use token::token;

use crate::{config::Config, error, server};

pub async fn serve(config: Config) {
    if let Err(e) = server::start_api_server(config).await {
        error!("Server failed: {}", e);
    }
}
