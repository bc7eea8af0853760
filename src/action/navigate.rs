//! Navigation and timing actions: the two primitives that don't need the
//! selector engine at all.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::action::selector::{Query, Selector, WaitPredicate};
use crate::action::Action;
use crate::cdp::page;
use crate::error::{CdpError, Result};
use crate::executor::Executor;

/// `Page.navigate`, rearming the target's `loaded` signal first so a
/// subsequent wait can't observe a stale closed state from the previous
/// page (§4.4 `Target.loaded`).
pub struct Navigate {
    pub url: String,
    /// Whether to wait for `Page.loadEventFired` before returning.
    pub wait_for_load: bool,
}

impl Navigate {
    pub fn to(url: impl Into<String>) -> Self {
        Self { url: url.into(), wait_for_load: true }
    }

    pub fn without_waiting(mut self) -> Self {
        self.wait_for_load = false;
        self
    }
}

#[async_trait]
impl Action for Navigate {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        executor.dispatcher().target.loaded.rearm();
        executor
            .execute(ctx, page::NavigateParams::new(self.url.clone()))
            .await?;
        if !self.wait_for_load {
            return Ok(());
        }
        tokio::select! {
            _ = ctx.cancelled() => Err(CdpError::Cancelled),
            _ = executor.dispatcher().target.loaded.wait() => Ok(()),
        }
    }
}

/// Waits a fixed duration, honoring cancellation.
pub struct Sleep(pub Duration);

#[async_trait]
impl Action for Sleep {
    async fn run(&self, _executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        tokio::select! {
            _ = ctx.cancelled() => Err(CdpError::Cancelled),
            _ = tokio::time::sleep(self.0) => Ok(()),
        }
    }
}

/// Resolves `selector` and blocks until it is visible, discarding the
/// resolved ids. A thin convenience over `Query` for callers that only
/// care about the wait, not the result (§4.6).
pub struct WaitVisible(pub Selector);

#[async_trait]
impl Action for WaitVisible {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        Query::new(self.0.clone())
            .wait_for(WaitPredicate::Visible)
            .run(executor, ctx)
            .await?;
        Ok(())
    }
}
