//! # Switchyard
//!
//! An embeddable HTTP router. Routes live in a compressed prefix tree with
//! static segments, `:name` parameters and a trailing `*` catch-all. Each
//! route owns a chain of handlers that cooperate through a pooled request
//! [`Context`](switchyard_core::Context).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchyard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = App::new();
//!     app.get("/ping", [handler(|ctx| ctx.string(StatusCode::OK, "pong"))])?;
//!     app.get("/users/:id", [handler(|ctx| {
//!         let id = ctx.param("id").to_string();
//!         ctx.string(StatusCode::OK, id);
//!     })])?;
//!
//!     Server::new(ServerConfig::default(), Arc::new(app)).run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Crates
//!
//! ```text
//! switchyard-router     tree, lookup, params
//! switchyard-core       Context, pool, App facade
//! switchyard-server     tokio/hyper listener
//! switchyard-config     layered configuration
//! switchyard-telemetry  logging setup
//! ```

#![doc(html_root_url = "https://docs.rs/switchyard/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use switchyard_config as config;
pub use switchyard_core as core;
pub use switchyard_router as router;
pub use switchyard_server as server;
pub use switchyard_telemetry as telemetry;

use switchyard_config::RouterSection;
use switchyard_core::AppConfig;

/// Converts the `[router]` configuration section into app tuning.
pub fn app_config(section: &RouterSection) -> AppConfig {
    AppConfig {
        max_params: section.max_params,
        pool_max_idle: section.pool_max_idle,
    }
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use switchyard::prelude::*;
/// ```
pub mod prelude {
    pub use http::{HeaderName, HeaderValue, StatusCode};

    pub use switchyard_config::{ConfigLoader, SwitchyardConfig};
    pub use switchyard_core::{
        handler, App, AppConfig, Context, DispatchError, HandlerFn, Method, RouteError,
    };
    pub use switchyard_server::{Server, ServerConfig, ShutdownSignal};
    pub use switchyard_telemetry::{init_logging, LogConfig};
}
