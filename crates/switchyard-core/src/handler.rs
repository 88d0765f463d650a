//! Handler and chain types.

use std::sync::Arc;

use crate::Context;

/// A request handler or middleware.
///
/// Handlers receive the shared [`Context`] and write their output into its
/// response sink. Middleware is an ordinary handler that calls
/// [`Context::advance`] to run the rest of the chain; returning without it
/// ends the chain.
pub type HandlerFn = Arc<dyn Fn(&mut Context) + Send + Sync + 'static>;

/// The immutable, ordered handler sequence registered for a route.
pub type Chain = Arc<[HandlerFn]>;

/// Wraps a closure as a [`HandlerFn`].
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use switchyard_core::handler;
///
/// let ping = handler(|ctx| ctx.string(StatusCode::OK, "pong"));
/// ```
pub fn handler<F>(f: F) -> HandlerFn
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Concatenates middleware and route handlers into one chain.
pub(crate) fn build_chain(
    middleware: &[HandlerFn],
    handlers: impl IntoIterator<Item = HandlerFn>,
) -> Chain {
    middleware.iter().cloned().chain(handlers).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chain_orders_middleware_first() {
        let a = handler(|ctx| ctx.write(b"a"));
        let b = handler(|ctx| ctx.write(b"b"));
        let h = handler(|ctx| ctx.write(b"h"));

        let chain = build_chain(&[a.clone(), b.clone()], [h.clone()]);
        assert_eq!(chain.len(), 3);
        assert!(Arc::ptr_eq(&chain[0], &a));
        assert!(Arc::ptr_eq(&chain[1], &b));
        assert!(Arc::ptr_eq(&chain[2], &h));
    }

    #[test]
    fn test_build_chain_without_middleware() {
        let chain = build_chain(&[], Vec::new());
        assert!(chain.is_empty());
    }
}
