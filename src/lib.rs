//! # linkedgan
//!
//! Replaces a professional-network profile picture with a face from a public
//! GAN generator, branded with an overlay, in one synchronous run.
//!
//! # Architecture: One Linear Workflow
//!
//! ```text
//! secrets ──► request context
//!                 │
//! GET face ──► resize 400×400 + overlay ──► JPEG
//!                 │
//! register original ─┐
//! register display ──┴─► split upload URLs ──► PUT original, PUT display
//!                                                   │
//!                                  POST profile patch (both urns)
//! ```
//!
//! Every remote call is validated the same way (2xx or halt). Nothing is
//! retried and nothing is rolled back.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`publish`] | The workflow state machine and the profile patch |
//! | [`registrar`] | Upload-metadata registration per image role |
//! | [`url_split`] | Upload URL → bare endpoint + query parameters |
//! | [`check`] | 2xx gate applied after every call |
//! | [`imaging`] | Resize, overlay, JPEG encode |
//! | [`http`] | [`http::Transport`] trait + blocking `reqwest` implementation |
//! | [`context`] | Fixed headers, cookies, CSRF token, endpoint URLs |
//! | [`secrets`] | [`secrets::SecretStore`] trait, env and file backends |
//! | [`config`] | `linkedgan.toml` loading, merging, validation |
//! | [`types`] | Shared types (`ImageRole`, `UploadDescriptor`, `SplitUrl`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Seams at the Network and the Pixels
//!
//! The workflow talks to the world through two traits, [`http::Transport`]
//! and [`imaging::ImageBackend`]. Tests drive the full state machine with a
//! recording transport and assert the exact call sequence without a socket.
//!
//! ## Typed Payloads
//!
//! Registration responses are parsed into optional-field structs and checked
//! for presence explicitly. The profile patch is serialized from structs, so
//! urns are escaped by the JSON encoder rather than spliced into a string.
//!
//! ## Strict Session Cookie
//!
//! The CSRF token is the interior of the double-quoted `JSESSIONID` cookie.
//! A missing, unquoted or empty cookie stops the run before any call is made.

pub mod check;
pub mod config;
pub mod context;
pub mod http;
pub mod imaging;
pub mod output;
pub mod publish;
pub mod registrar;
pub mod secrets;
pub mod types;
pub mod url_split;

#[cfg(test)]
pub(crate) mod test_helpers;
