//! Per-request dispatch state.
//!
//! A [`Context`] carries everything a handler chain shares while serving one
//! request: the request itself, the bound path parameters, the response sink
//! and the chain cursor. Contexts are pooled and reused, so every field is
//! reset before a new request sees it.
//!
//! # Chaining
//!
//! [`Context::advance`] runs the handler at the cursor. A handler passes
//! control on by calling `advance()` itself; one that returns without
//! advancing ends the chain, which is how guards short-circuit. Code after
//! the `advance()` call runs once the downstream handlers have returned.
//!
//! ```text
//!  advance()            cursor
//!    ├─ A ──────────────── 1
//!    │   └─ advance()
//!    │       ├─ B ──────── 2
//!    │       └─ H ──────── 3
//!    │   (A resumes)
//!    └─ loop ends: cursor == len
//! ```

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Request, StatusCode};
use serde::Serialize;
use switchyard_router::{Lookup, Method, MethodSet, ParamList, Router};

use crate::error::DispatchError;
use crate::handler::{Chain, HandlerFn};
use crate::response::ResponseWriter;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Mutable state shared by all handlers of one request.
#[derive(Default)]
pub struct Context {
    request: Request<Bytes>,
    response: ResponseWriter,
    params: ParamList,
    chain: Option<Chain>,
    cursor: usize,
    error: Option<DispatchError>,
    allowed: MethodSet,
    internal_error: Option<HandlerFn>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", self.request.method())
            .field("path", &self.request.uri().path())
            .field("params", &self.params)
            .field("chain_len", &self.chain.as_ref().map_or(0, |c| c.len()))
            .field("cursor", &self.cursor)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a context with room for `param_capacity` parameters.
    #[must_use]
    pub fn new(param_capacity: usize) -> Self {
        Self {
            params: ParamList::with_capacity(param_capacity),
            ..Self::default()
        }
    }

    /// Prepares the context for a new request.
    ///
    /// Replaces the request, clears the response sink, drops the previous
    /// chain, rewinds the cursor and truncates the parameter list. Parameter
    /// slot buffers are kept.
    pub fn reset(&mut self, request: Request<Bytes>) {
        self.request = request;
        self.response.reset();
        self.params.clear();
        self.chain = None;
        self.cursor = 0;
        self.error = None;
        self.allowed = MethodSet::new();
        self.internal_error = None;
    }

    /// Drops per-request data held by an idle context.
    pub(crate) fn recycle(&mut self) {
        self.request = Request::default();
        self.response.reset();
        self.params.clear();
        self.chain = None;
        self.internal_error = None;
    }

    /// Looks up the request in `router`, writing parameters into this context.
    pub(crate) fn route<'r>(&mut self, router: &'r Router<Chain>) -> Lookup<'r, Chain> {
        let method = Method::from_http(self.request.method());
        router.find(method, self.request.uri().path(), &mut self.params)
    }

    pub(crate) fn set_chain(&mut self, chain: Chain) {
        self.chain = Some(chain);
        self.cursor = 0;
    }

    pub(crate) fn set_allowed(&mut self, allowed: MethodSet) {
        self.allowed = allowed;
    }

    pub(crate) fn set_internal_error_handler(&mut self, handler: HandlerFn) {
        self.internal_error = Some(handler);
    }

    pub(crate) fn param_capacity(&self) -> usize {
        self.params.capacity()
    }

    pub(crate) fn reserve_params(&mut self, capacity: usize) {
        self.params.reserve_slots(capacity);
    }

    /// Runs the rest of the chain from the cursor.
    ///
    /// Each handler runs at most once per request. A handler that returns
    /// without calling `advance()` stops the chain there. Calling this when
    /// the chain is exhausted or aborted does nothing.
    pub fn advance(&mut self) {
        let Some(chain) = self.chain.clone() else {
            return;
        };
        while self.cursor < chain.len() {
            let index = self.cursor;
            self.cursor += 1;
            chain[index](self);
            if self.cursor == index + 1 {
                break;
            }
        }
    }

    /// Stops the chain: no handler after the current one will run.
    pub fn abort(&mut self) {
        self.cursor = usize::MAX;
    }

    /// Returns true if [`abort`](Self::abort) was called.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.cursor == usize::MAX
    }

    /// Returns the value of path parameter `name`, or `""` if it is absent.
    #[must_use]
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).unwrap_or_default()
    }

    /// All bound path parameters, in path order.
    #[must_use]
    pub const fn params(&self) -> &ParamList {
        &self.params
    }

    /// The inbound request.
    #[must_use]
    pub const fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    /// Mutable access to the inbound request, e.g. for middleware that
    /// attaches extensions.
    pub fn request_mut(&mut self) -> &mut Request<Bytes> {
        &mut self.request
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &http::Method {
        self.request.method()
    }

    /// The request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// The request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// The response sink.
    #[must_use]
    pub const fn response(&self) -> &ResponseWriter {
        &self.response
    }

    /// Mutable access to the response sink.
    pub fn response_mut(&mut self) -> &mut ResponseWriter {
        &mut self.response
    }

    /// Sets the response status.
    pub fn status(&mut self, status: StatusCode) {
        self.response.write_status(status);
    }

    /// Replaces a response header.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.set_header(name, value);
    }

    /// Appends raw bytes to the response body.
    pub fn write(&mut self, chunk: &[u8]) {
        self.response.write(chunk);
    }

    /// Writes a plain-text response.
    pub fn string(&mut self, status: StatusCode, body: impl AsRef<str>) {
        self.default_content_type(TEXT_PLAIN);
        self.response.write_status(status);
        self.response.write(body.as_ref().as_bytes());
    }

    /// Writes a JSON response.
    ///
    /// If `value` cannot be serialized, nothing is written; the error is
    /// recorded, the chain is aborted and the internal-error handler runs.
    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.default_content_type(APPLICATION_JSON);
                self.response.write_status(status);
                self.response.write(&body);
            }
            Err(err) => {
                tracing::error!(error = %err, path = %self.path(), "failed to encode JSON response");
                self.fail(DispatchError::encode(&err));
            }
        }
    }

    fn default_content_type(&mut self, value: &'static str) {
        if !self.response.headers().contains_key(CONTENT_TYPE) {
            self.response
                .set_header(CONTENT_TYPE, HeaderValue::from_static(value));
        }
    }

    /// Records `error`, aborts the chain, discards any buffered response and
    /// runs the internal-error handler.
    pub fn fail(&mut self, error: DispatchError) {
        self.abort();
        self.response.reset();
        self.error = Some(error);
        // Taken so a failure inside the handler itself cannot recurse.
        if let Some(handler) = self.internal_error.take() {
            handler(self);
        }
    }

    pub(crate) fn record_error(&mut self, error: DispatchError) {
        self.error = Some(error);
    }

    /// The error recorded during dispatch, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&DispatchError> {
        self.error.as_ref()
    }

    /// Methods registered for the request path, set when the method did not
    /// match.
    #[must_use]
    pub const fn allowed_methods(&self) -> MethodSet {
        self.allowed
    }

    /// Moves the buffered response out of the context.
    pub fn take_response(&mut self) -> http::Response<Bytes> {
        self.response.take()
    }
}
