//! # CLI Module
//!
//! User-facing commands of the `albumcrate` binary. Each function runs one
//! command to completion: it opens what it needs (credential file, API
//! client, caches), reports progress with spinners and the colored message
//! macros, prints tables, and exits through [`error!`](crate::error!) on
//! failure.
//!
//! ## Commands
//!
//! - [`auth`], [`logout`] - log in through the PKCE flow, drop stored tokens
//! - [`me`] - show the logged in profile
//! - [`search_albums`], [`search_tracks`], [`album_tracks`] - catalog lookup
//! - [`playlist`] - create, list, show and edit playlists
//! - [`recommend`], [`sources`] - scraped review site recommendations
//! - [`import`], [`favorites`], [`export_sample`] - favorites CSV
//!
//! ## Authentication failures
//!
//! Commands that talk to Spotify route errors through `session::fail`. An
//! [`Error::Auth`](crate::Error::Auth) there clears the stored tokens and
//! asks the user to run `albumcrate auth` again; the API layer never prompts
//! on its own.
//!
//! ```bash
//! albumcrate auth
//! albumcrate search albums --artist "Pink Floyd"
//! albumcrate playlist add-album <playlist-id> <album-id>
//! albumcrate recommend pitchfork --refresh
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod auth;
mod favorites;
pub mod playlist;
mod recommend;
mod search;
mod session;
mod user;

pub use auth::auth;
pub use auth::logout;
pub use favorites::export_sample;
pub use favorites::import;
pub use favorites::list as favorites;
pub use recommend::recommend;
pub use recommend::sources;
pub use search::album_tracks;
pub use search::search_albums;
pub use search::search_tracks;
pub use user::me;

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
