//! In-memory client.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Method, Request};
use serde::Serialize;
use switchyard_core::App;

use crate::error::TestError;
use crate::response::TestResponse;

/// Drives an [`App`] without opening a socket.
///
/// ```rust
/// use http::StatusCode;
/// use switchyard_core::{handler, App};
/// use switchyard_test::TestClient;
///
/// let mut app = App::new();
/// app.get("/users/:id", [handler(|ctx| {
///     let id = ctx.param("id").to_string();
///     ctx.string(StatusCode::OK, id);
/// })])
/// .unwrap();
///
/// let client = TestClient::new(app);
/// client
///     .get("/users/7")
///     .send()
///     .assert_status(StatusCode::OK)
///     .assert_body_eq("7");
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TestClient {
    app: Arc<App>,
    default_headers: HeaderMap,
}

impl TestClient {
    /// Wraps an app.
    pub fn new(app: App) -> Self {
        Self::from_shared(Arc::new(app))
    }

    /// Wraps an app that is already shared.
    pub fn from_shared(app: Arc<App>) -> Self {
        Self {
            app,
            default_headers: HeaderMap::new(),
        }
    }

    /// Adds a header sent with every request.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is invalid.
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.default_headers.insert(name, value);
            }
            Err(e) => panic!("{e}"),
        }
        self
    }

    /// The app under test.
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Starts a GET request.
    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// Starts a POST request.
    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// Starts a PUT request.
    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// Starts a PATCH request.
    pub fn patch(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Starts a HEAD request.
    pub fn head(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::HEAD, uri)
    }

    /// Starts an OPTIONS request.
    pub fn options(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::OPTIONS, uri)
    }

    /// Starts a request with any method, including extension methods.
    pub fn request(&self, method: Method, uri: &str) -> TestRequest<'_> {
        TestRequest {
            client: self,
            method,
            uri: uri.to_string(),
            headers: self.default_headers.clone(),
            body: Bytes::new(),
            error: None,
        }
    }
}

/// A request being assembled by a [`TestClient`].
///
/// Builder errors are deferred to [`try_send`](Self::try_send).
#[derive(Debug)]
#[must_use]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(e) => self.record(e),
        }
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Err(e) => self.record(TestError::Json(e)),
        }
        self
    }

    /// Builds the request without sending it.
    pub fn build(self) -> Result<Request<Bytes>, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut request = Request::builder()
            .method(self.method)
            .uri(self.uri.as_str())
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(format!("{e} ({})", self.uri)))?;
        *request.headers_mut() = self.headers;
        Ok(request)
    }

    /// Serves the request through the app.
    pub fn try_send(self) -> Result<TestResponse, TestError> {
        let app = Arc::clone(&self.client.app);
        let request = self.build()?;
        Ok(TestResponse::from(app.serve(request)))
    }

    /// Serves the request through the app.
    ///
    /// # Panics
    ///
    /// Panics if the request could not be built.
    pub fn send(self) -> TestResponse {
        self.try_send()
            .unwrap_or_else(|e| panic!("failed to send test request: {e}"))
    }

    fn record(&mut self, error: TestError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TestError> {
    let header_name = HeaderName::try_from(name)
        .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
    let header_value = HeaderValue::try_from(value)
        .map_err(|e| TestError::InvalidHeader(format!("{name}: {e}")))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use switchyard_core::handler;

    fn echo_app() -> App {
        let mut app = App::new();
        app.post(
            "/echo",
            [handler(|ctx| {
                let content_type = ctx
                    .request()
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("none")
                    .to_string();
                let body = String::from_utf8_lossy(ctx.body()).into_owned();
                ctx.string(StatusCode::OK, format!("{content_type}|{body}"));
            })],
        )
        .unwrap();
        app
    }

    #[test]
    fn test_json_request() {
        let client = TestClient::new(echo_app());
        client
            .post("/echo")
            .json(&serde_json::json!({ "a": 1 }))
            .send()
            .assert_status(StatusCode::OK)
            .assert_body_eq(r#"application/json|{"a":1}"#);
    }

    #[test]
    fn test_default_headers_are_sent() {
        let client = TestClient::new(echo_app()).with_default_header("content-type", "text/csv");
        client.post("/echo").body("a,b").send().assert_body_eq("text/csv|a,b");
    }

    #[test]
    fn test_invalid_header_is_deferred() {
        let client = TestClient::new(echo_app());
        let result = client.post("/echo").header("bad header", "x").try_send();
        assert!(matches!(result, Err(TestError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_uri() {
        let client = TestClient::new(echo_app());
        let result = client.get("http://[::1").try_send();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_extension_method_falls_back() {
        let client = TestClient::new(echo_app());
        let method = Method::from_bytes(b"PURGE").unwrap();
        client
            .request(method, "/echo")
            .send()
            .assert_status(StatusCode::METHOD_NOT_ALLOWED)
            .assert_header("allow", "POST");
    }
}
