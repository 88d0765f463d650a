//! # Switchyard Core
//!
//! Request dispatch for the Switchyard router.
//!
//! - [`App`] - route registration, global middleware and fallback handlers
//! - [`Context`] - per-request state shared by a handler chain
//! - [`ContextPool`] - bounded pool that recycles contexts between requests
//! - [`ResponseWriter`] - buffered response sink
//! - [`DispatchError`] - failures recorded while dispatching
//!
//! Dispatch is synchronous: a handler chain runs to completion on the
//! calling thread. An async listener such as `switchyard-server` calls
//! [`App::serve`] once per request.

#![doc(html_root_url = "https://docs.rs/switchyard-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod context;
mod error;
mod handler;
mod pool;
mod response;

pub use app::{App, AppConfig, DEFAULT_MAX_PARAMS};
pub use context::Context;
pub use error::DispatchError;
pub use handler::{handler, Chain, HandlerFn};
pub use pool::{ContextPool, PooledContext, DEFAULT_MAX_IDLE};
pub use response::ResponseWriter;

pub use switchyard_router::{Method, MethodSet, ParamList, RouteError, RouteParam};
