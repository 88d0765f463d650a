//! TCP listener for Switchyard applications.
//!
//! [`Server`] accepts HTTP/1.1 connections with tokio and hyper, buffers
//! each request, runs it through a shared [`App`](switchyard_core::App) and
//! writes the response back. It stops accepting on SIGINT/SIGTERM or a
//! programmatic [`ShutdownSignal`] and drains open connections before
//! returning.

#![doc(html_root_url = "https://docs.rs/switchyard-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod server;
pub mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_MS,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::ServerError;
pub use server::Server;
pub use shutdown::{ConnectionTracker, ShutdownSignal};
