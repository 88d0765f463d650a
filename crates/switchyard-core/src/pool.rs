//! Reusable context pool.
//!
//! Contexts are expensive enough to build (parameter slots, header map,
//! body buffer) that the facade recycles them. [`ContextPool::acquire`] hands
//! out a [`PooledContext`] guard; dropping the guard returns the context to
//! the pool, including when a handler panic unwinds through it.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::context::Context;

/// Default number of idle contexts kept by a pool.
pub const DEFAULT_MAX_IDLE: usize = 1024;

/// A bounded free list of [`Context`]s.
#[derive(Debug)]
pub struct ContextPool {
    free: Mutex<Vec<Context>>,
    param_capacity: AtomicUsize,
    max_idle: usize,
}

impl Default for ContextPool {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_IDLE)
    }
}

impl ContextPool {
    /// Creates an empty pool.
    ///
    /// New contexts get `param_capacity` parameter slots. At most `max_idle`
    /// released contexts are kept; extra ones are dropped.
    #[must_use]
    pub fn new(param_capacity: usize, max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            param_capacity: AtomicUsize::new(param_capacity),
            max_idle,
        }
    }

    /// Takes an idle context or builds a new one.
    pub fn acquire(&self) -> PooledContext<'_> {
        let capacity = self.param_capacity();
        let ctx = match self.free.lock().pop() {
            Some(mut ctx) => {
                if ctx.param_capacity() < capacity {
                    ctx.reserve_params(capacity);
                }
                ctx
            }
            None => Context::new(capacity),
        };
        PooledContext { pool: self, ctx }
    }

    /// Returns a context to the pool.
    pub fn release(&self, mut ctx: Context) {
        ctx.recycle();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(ctx);
        }
    }

    /// Number of idle contexts.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    /// Maximum number of idle contexts kept.
    pub const fn max_idle(&self) -> usize {
        self.max_idle
    }

    /// Parameter slots given to contexts handed out from now on.
    pub fn param_capacity(&self) -> usize {
        self.param_capacity.load(Ordering::Relaxed)
    }

    /// Raises the parameter capacity to at least `capacity`.
    pub fn raise_param_capacity(&self, capacity: usize) {
        self.param_capacity.fetch_max(capacity, Ordering::Relaxed);
    }
}

/// A context checked out of a [`ContextPool`].
///
/// Dereferences to [`Context`] and returns it to the pool on drop.
#[derive(Debug)]
pub struct PooledContext<'a> {
    pool: &'a ContextPool,
    ctx: Context,
}

impl Deref for PooledContext<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.ctx
    }
}

impl DerefMut for PooledContext<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl Drop for PooledContext<'_> {
    fn drop(&mut self) {
        let ctx = std::mem::take(&mut self.ctx);
        self.pool.release(ctx);
    }
}
