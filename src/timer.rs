//! Timed waits.  Controllers never touch `setTimeout` directly; they are
//! handed a [`Timer`] so tests can decide when (and whether) time passes.

use gloo_timers::future::TimeoutFuture;

#[allow(async_fn_in_trait)]
pub trait Timer {
    async fn sleep(&self, ms: u32);
}

/// Browser timer backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}
