//! Buffered response sink.
//!
//! Handlers write into a [`ResponseWriter`]; the facade turns it into an
//! [`http::Response`] once dispatch is over. The status is committed by the
//! first explicit status write or the first body write, whichever comes
//! first. Later status writes are ignored.

use bytes::{Bytes, BytesMut};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;

/// Per-request response state owned by a [`Context`](crate::Context).
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: BytesMut,
    committed: bool,
}

impl ResponseWriter {
    /// Creates an empty sink with status 200.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The status that will be sent.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the status unless it has already been committed.
    ///
    /// Returns false when the write was ignored.
    pub fn write_status(&mut self, status: StatusCode) -> bool {
        if self.committed {
            tracing::warn!(
                current = self.status.as_u16(),
                ignored = status.as_u16(),
                "superfluous response status write"
            );
            return false;
        }
        self.status = status;
        self.committed = true;
        true
    }

    /// Appends to the body, committing the current status.
    pub fn write(&mut self, chunk: &[u8]) {
        self.committed = true;
        self.body.extend_from_slice(chunk);
    }

    /// Returns true once the status can no longer change.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Replaces a header value.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    /// The body written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Clears status, headers and body, keeping buffer capacity.
    pub fn reset(&mut self) {
        self.status = StatusCode::OK;
        self.headers.clear();
        self.body.clear();
        self.committed = false;
    }

    /// Moves the buffered response out, leaving the sink reset.
    pub fn take(&mut self) -> http::Response<Bytes> {
        let body = self.body.split().freeze();
        let mut response = http::Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = std::mem::take(&mut self.headers);
        self.reset();
        response
    }
}
