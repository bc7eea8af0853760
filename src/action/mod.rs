//! §4.6 Action Engine — the small set of composable actions built on top
//! of the `Executor` and the selector sub-engine.

pub mod click;
pub mod evaluate;
pub mod focus;
pub mod keys;
pub mod navigate;
pub mod read;
pub mod screenshot;
pub mod selector;
pub mod sendkeys;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::executor::Executor;

pub use click::Click;
pub use evaluate::Evaluate;
pub use focus::{Blur, Focus, Submit};
pub use navigate::{Navigate, Sleep, WaitVisible};
pub use read::{Attribute, Text, Value};
pub use screenshot::Screenshot;
pub use selector::{Query, Selector, WaitPredicate};
pub use sendkeys::SendKeys;

/// A single unit of browser interaction. `run` is given the caller's
/// cancellation context so a long wait inside an action can be aborted
/// the same way `Executor::execute` aborts a single command (§4.5, §4.6).
#[async_trait]
pub trait Action: Send + Sync {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()>;
}

/// Runs a fixed sequence of actions in order, stopping at the first
/// error or cancellation (§4.6: actions compose, they don't fan out).
pub struct Tasks {
    actions: Vec<Box<dyn Action>>,
}

impl Tasks {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn then(mut self, action: impl Action + 'static) -> Self {
        self.actions.push(Box::new(action));
        self
    }
}

impl Default for Tasks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Action for Tasks {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        for action in &self.actions {
            if ctx.is_cancelled() {
                return Err(crate::error::CdpError::Cancelled);
            }
            action.run(executor, ctx).await?;
        }
        Ok(())
    }
}
