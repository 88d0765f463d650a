//! Buffered responses with assertion helpers.

use bytes::Bytes;
use http::header::{HeaderMap, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A response produced by [`TestClient`](crate::TestClient).
///
/// The `assert_*` methods panic with a descriptive message and return
/// `&Self` so they chain.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl From<http::Response<Bytes>> for TestResponse {
    fn from(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

impl TestResponse {
    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value by name.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// A header value as a string, if present and visible ASCII.
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.header_str(CONTENT_TYPE.as_str())
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<&str, TestError> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Asserts the status.
    ///
    /// # Panics
    ///
    /// Panics on mismatch.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {} (body: {:?})",
            expected, self.status, self.body
        );
        self
    }

    /// Asserts a header is present with exactly `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: impl AsRef<str>, expected: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        let expected = expected.as_ref();
        let actual = self
            .header_str(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found"));
        assert_eq!(
            actual, expected,
            "Header '{name}': expected '{expected}', got '{actual}'"
        );
        self
    }

    /// Asserts a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header is present.
    pub fn assert_no_header(&self, name: impl AsRef<str>) -> &Self {
        let name = name.as_ref();
        assert!(
            self.header(name).is_none(),
            "Header '{name}' should be absent, got {:?}",
            self.header(name)
        );
        self
    }

    /// Asserts `Content-Type` starts with `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_content_type(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let actual = self
            .content_type()
            .unwrap_or_else(|| panic!("Content-Type header not found"));
        assert!(
            actual.starts_with(expected),
            "Content-Type: expected '{expected}', got '{actual}'"
        );
        self
    }

    /// Asserts the body equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or differs.
    pub fn assert_body_eq(&self, expected: impl AsRef<str>) -> &Self {
        let body = self
            .text()
            .unwrap_or_else(|e| panic!("Body should be text: {e}"));
        assert_eq!(body, expected.as_ref(), "Body mismatch");
        self
    }

    /// Asserts the body contains `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not UTF-8 or lacks the substring.
    pub fn assert_body_contains(&self, expected: impl AsRef<str>) -> &Self {
        let expected = expected.as_ref();
        let body = self
            .text()
            .unwrap_or_else(|e| panic!("Body should be text: {e}"));
        assert!(
            body.contains(expected),
            "Body should contain '{expected}', got: {body}"
        );
        self
    }

    /// Asserts the body is JSON equal to `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual: serde_json::Value = self
            .json()
            .unwrap_or_else(|e| panic!("Body should be JSON: {e}"));
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }
}
