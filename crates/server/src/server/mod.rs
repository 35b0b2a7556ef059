//! Axum HTTPS server, plaintext redirect listener, and routing.
//!
//! # Responsibilities
//! - Build the rustls server config from the PEM certificate and key.
//! - Define the route table for the secure listener and the redirect table
//!   for the plaintext listener.
//! - Bind both listeners and run them until shutdown ([`Server`]).

pub mod handlers;
pub mod listener;
pub mod redirect;
pub mod router;
pub mod state;
pub mod tls;

pub use listener::{Server, ServerSettings};
