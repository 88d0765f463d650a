//! Application facade.
//!
//! [`App`] is where routes are registered and requests are served. It is
//! mutated through `&mut self` while routes are added, then typically
//! wrapped in an `Arc` and shared read-only by every connection.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::{Request, Response, StatusCode};
use switchyard_router::{Lookup, Method, RouteError, Router};

use crate::context::Context;
use crate::error::DispatchError;
use crate::handler::{build_chain, handler, Chain, HandlerFn};
use crate::pool::{ContextPool, DEFAULT_MAX_IDLE};

/// Default minimum number of parameter slots per pooled context.
pub const DEFAULT_MAX_PARAMS: usize = 5;

/// Tuning for an [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    /// Minimum parameter slots per context. Raised automatically when a
    /// route binds more.
    pub max_params: usize,
    /// Maximum number of idle contexts kept for reuse.
    pub pool_max_idle: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_params: DEFAULT_MAX_PARAMS,
            pool_max_idle: DEFAULT_MAX_IDLE,
        }
    }
}

/// Routes, middleware and fallbacks for one application.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
/// use switchyard_core::{handler, App};
///
/// let mut app = App::new();
/// app.get("/users/:id", [handler(|ctx| {
///     let body = format!("user {}", ctx.param("id"));
///     ctx.string(StatusCode::OK, body);
/// })])
/// .unwrap();
///
/// let request = Request::get("/users/42").body(Bytes::new()).unwrap();
/// let response = app.serve(request);
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.body().as_ref(), b"user 42");
/// ```
pub struct App {
    router: Router<Chain>,
    middleware: Vec<HandlerFn>,
    pool: ContextPool,
    not_found: HandlerFn,
    method_not_allowed: HandlerFn,
    internal_error: HandlerFn,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.router.len())
            .field("middleware", &self.middleware.len())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates an app with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Creates an app with explicit tuning.
    #[must_use]
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            router: Router::new(),
            middleware: Vec::new(),
            pool: ContextPool::new(config.max_params, config.pool_max_idle),
            not_found: handler(default_not_found),
            method_not_allowed: handler(default_method_not_allowed),
            internal_error: handler(default_internal_error),
        }
    }

    /// Appends global middleware.
    ///
    /// Middleware applies to routes registered after this call, ahead of
    /// their own handlers and in registration order.
    pub fn use_middleware(&mut self, handlers: impl IntoIterator<Item = HandlerFn>) {
        self.middleware.extend(handlers);
    }

    /// Registers `handlers` for `method` at `pattern`.
    ///
    /// Re-registering the same method and pattern replaces the previous
    /// chain.
    pub fn route(
        &mut self,
        method: Method,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        let chain = build_chain(&self.middleware, handlers);
        let len = chain.len();
        self.router.add(method, pattern, chain)?;
        self.pool.raise_param_capacity(self.router.max_params());
        tracing::debug!(method = %method, pattern, handlers = len, "route registered");
        Ok(())
    }

    /// Registers a CONNECT route.
    pub fn connect(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Connect, pattern, handlers)
    }

    /// Registers a DELETE route.
    pub fn delete(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Delete, pattern, handlers)
    }

    /// Registers a GET route.
    pub fn get(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Get, pattern, handlers)
    }

    /// Registers a HEAD route.
    pub fn head(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Head, pattern, handlers)
    }

    /// Registers an OPTIONS route.
    pub fn options(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Options, pattern, handlers)
    }

    /// Registers a PATCH route.
    pub fn patch(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Patch, pattern, handlers)
    }

    /// Registers a POST route.
    pub fn post(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Post, pattern, handlers)
    }

    /// Registers a PUT route.
    pub fn put(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Put, pattern, handlers)
    }

    /// Registers a TRACE route.
    pub fn trace(
        &mut self,
        pattern: &str,
        handlers: impl IntoIterator<Item = HandlerFn>,
    ) -> Result<(), RouteError> {
        self.route(Method::Trace, pattern, handlers)
    }

    /// Replaces the handler used when no route matches the path.
    pub fn set_not_found_handler(&mut self, handler: HandlerFn) {
        self.not_found = handler;
    }

    /// Replaces the handler used when the path matches but the method does
    /// not. [`Context::allowed_methods`] holds the registered methods.
    pub fn set_method_not_allowed_handler(&mut self, handler: HandlerFn) {
        self.method_not_allowed = handler;
    }

    /// Replaces the handler used after a handler panic or an encode failure.
    /// [`Context::error`] holds the cause.
    pub fn set_internal_error_handler(&mut self, handler: HandlerFn) {
        self.internal_error = handler;
    }

    /// The route table.
    #[must_use]
    pub const fn router(&self) -> &Router<Chain> {
        &self.router
    }

    /// The context pool.
    #[must_use]
    pub const fn pool(&self) -> &ContextPool {
        &self.pool
    }

    /// Serves one request.
    ///
    /// Never panics because of a handler: panics are caught and rendered by
    /// the internal-error handler.
    pub fn serve(&self, request: Request<Bytes>) -> Response<Bytes> {
        let mut ctx = self.pool.acquire();
        ctx.reset(request);
        ctx.set_internal_error_handler(Arc::clone(&self.internal_error));

        match ctx.route(&self.router) {
            Lookup::Found(chain) => {
                ctx.set_chain(Arc::clone(chain));
                self.run(&mut ctx, Context::advance);
            }
            Lookup::NotFound => {
                let fallback = Arc::clone(&self.not_found);
                self.run(&mut ctx, |ctx| fallback(ctx));
            }
            Lookup::MethodNotAllowed(allowed) => {
                ctx.set_allowed(allowed);
                let fallback = Arc::clone(&self.method_not_allowed);
                self.run(&mut ctx, |ctx| fallback(ctx));
            }
        }

        let response = ctx.take_response();
        tracing::debug!(
            method = %ctx.method(),
            path = %ctx.path(),
            status = response.status().as_u16(),
            "request dispatched"
        );
        response
    }

    fn run(&self, ctx: &mut Context, f: impl FnOnce(&mut Context)) {
        let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| f(ctx))) else {
            return;
        };

        let error = DispatchError::from_panic(payload.as_ref());
        tracing::error!(method = %ctx.method(), path = %ctx.path(), error = %error, "handler panicked");
        ctx.abort();
        ctx.response_mut().reset();
        ctx.record_error(error);

        let internal_error = Arc::clone(&self.internal_error);
        if panic::catch_unwind(AssertUnwindSafe(|| internal_error(ctx))).is_err() {
            tracing::error!("internal error handler panicked");
            ctx.response_mut().reset();
            default_internal_error(ctx);
        }
    }
}

fn default_not_found(ctx: &mut Context) {
    ctx.string(StatusCode::NOT_FOUND, "Not Found\n");
}

fn default_method_not_allowed(ctx: &mut Context) {
    let allow = ctx.allowed_methods().to_header_value();
    if let Ok(value) = HeaderValue::from_str(&allow) {
        ctx.set_header(ALLOW, value);
    }
    ctx.string(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed\n");
}

fn default_internal_error(ctx: &mut Context) {
    ctx.string(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n");
}
