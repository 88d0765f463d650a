//! HTTP/1.1 listener.
//!
//! Each accepted connection is served by hyper. A request body is collected
//! into [`Bytes`], handed to [`App::serve`] on the blocking pool, and the
//! buffered response is written back. Reading the body and running the
//! chain share one deadline; a request that misses it gets `504`.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use switchyard_core::App;
use switchyard_telemetry::request_span;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Serves an [`App`] over TCP.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use http::StatusCode;
/// use switchyard_core::{handler, App};
/// use switchyard_server::{Server, ServerConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut app = App::new();
/// app.get("/ping", [handler(|ctx| ctx.string(StatusCode::OK, "pong"))])?;
///
/// let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
/// Server::new(config, Arc::new(app)).run().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server for `app`.
    pub fn new(config: ServerConfig, app: Arc<App>) -> Self {
        Self { config, app }
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The served application.
    pub fn app(&self) -> &Arc<App> {
        &self.app
    }

    /// Binds the configured address and serves until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// fires, then waits up to the shutdown timeout for open connections.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();
        let limit = server
            .config
            .max_connections()
            .map(|max| Arc::new(Semaphore::new(max)));

        loop {
            let permit = match &limit {
                Some(semaphore) => tokio::select! {
                    permit = Arc::clone(semaphore).acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => break,
                    },
                    () = shutdown.recv() => break,
                },
                None => None,
            };

            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, peer, shutdown).await {
                                tracing::debug!(peer.addr = %peer, error = %e, "connection error");
                            }
                            drop(permit);
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => break,
            }
        }

        let window = server.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_ms = elapsed_ms(window),
            "shutting down, draining connections"
        );

        if tokio::time::timeout(window, tracker.wait_idle()).await.is_err() {
            tracing::warn!(
                active = tracker.active_connections(),
                "shutdown timeout reached with open connections"
            );
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: Arc<Self>,
        stream: TcpStream,
        peer: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(&self);
        let service = service_fn(move |request: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request).await) }
        });

        let conn = http1::Builder::new()
            .timer(TokioTimer::new())
            .keep_alive(self.config.keep_alive())
            .serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(peer.addr = %peer, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
        let span = request_span(request.method().as_str(), request.uri().path());
        let started = Instant::now();

        let response = match tokio::time::timeout(
            self.config.request_timeout(),
            self.dispatch(request),
        )
        .instrument(span.clone())
        .await
        {
            Ok(response) => response,
            Err(_) => {
                span.in_scope(|| tracing::warn!("request timed out"));
                plain(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout\n")
            }
        };

        span.in_scope(|| {
            tracing::info!(
                http.status_code = response.status().as_u16(),
                duration_ms = elapsed_ms(started.elapsed()),
                "request completed"
            );
        });
        response.map(Full::new)
    }

    async fn dispatch(&self, request: Request<Incoming>) -> Response<Bytes> {
        let (parts, body) = request.into_parts();
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read request body");
                return plain(StatusCode::BAD_REQUEST, "Bad Request\n");
            }
        };

        let app = Arc::clone(&self.app);
        let request = Request::from_parts(parts, body);
        match tokio::task::spawn_blocking(move || app.serve(request)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "dispatch task failed");
                plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n")
            }
        }
    }
}

fn plain(status: StatusCode, body: &'static str) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from_static(body.as_bytes()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_accessors() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:0").build();
        let server = Server::new(config, Arc::new(App::new()));
        assert_eq!(server.config().http_addr(), "127.0.0.1:0");
        assert!(server.app().router().is_empty());
    }

    #[test]
    fn test_plain_response() {
        let response = plain(StatusCode::GATEWAY_TIMEOUT, "Gateway Timeout\n");
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(response.body().as_ref(), b"Gateway Timeout\n");
        assert_eq!(
            response.headers()[http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_run_with_invalid_address() {
        let config = ServerConfig::builder().http_addr("not-an-address").build();
        let server = Server::new(config, Arc::new(App::new()));
        let result = server.run_with_shutdown(ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_serve_returns_after_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = Server::new(ServerConfig::default(), Arc::new(App::new()));
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        tokio::time::timeout(Duration::from_secs(1), server.serve(listener, shutdown))
            .await
            .expect("serve should stop")
            .expect("serve should succeed");
    }
}
