//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs during
//! `albumcrate auth`.
//!
//! - [`callback`] - receives the authorization code from Spotify's
//!   authorization server and exchanges it, together with the PKCE
//!   verifier, for a token pair
//! - [`health`] - reports status and version
//!
//! The callback writes the token into the shared [`PkceToken`] state, where
//! [`crate::spotify::auth::auth`] picks it up.
//!
//! [`PkceToken`]: crate::types::PkceToken

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
