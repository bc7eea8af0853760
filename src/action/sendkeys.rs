//! SendKeys: resolve, focus, then dispatch one `rawKeyDown`/`char`/`keyUp`
//! triple per key (§4.6).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::action::keys::Key;
use crate::action::selector::{Query, Selector, WaitPredicate};
use crate::action::Action;
use crate::cdp::dom;
use crate::cdp::input::DispatchKeyEventParams;
use crate::error::Result;
use crate::executor::Executor;
use crate::ids::NodeId;

pub struct SendKeys {
    pub selector: Selector,
    pub keys: Vec<Key>,
}

impl SendKeys {
    pub fn new(selector: Selector, keys: Vec<Key>) -> Self {
        Self { selector, keys }
    }

    pub fn text(selector: Selector, text: impl AsRef<str>) -> Self {
        Self { selector, keys: crate::action::keys::chars(text.as_ref()) }
    }
}

#[async_trait]
impl Action for SendKeys {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        let keys = self.keys.clone();
        let send_ctx = ctx.clone();
        let query = Query::new(self.selector.clone())
            .wait_for(WaitPredicate::Enabled)
            .after(Arc::new(move |executor, nodes| {
                let send_ctx = send_ctx.clone();
                let keys = keys.clone();
                Box::pin(async move { send_keys(&executor, &send_ctx, nodes[0], &keys).await })
            }));
        query.run(executor, ctx).await?;
        Ok(())
    }
}

async fn send_keys(executor: &Executor, ctx: &CancellationToken, node_id: NodeId, keys: &[Key]) -> Result<()> {
    executor.execute(ctx, dom::FocusParams::new(node_id)).await?;
    for key in keys {
        executor
            .execute(ctx, DispatchKeyEventParams::raw_key_down(key))
            .await?;
        if key.is_printable() {
            executor
                .execute(ctx, DispatchKeyEventParams::char_(&key.key_value()))
                .await?;
        }
        executor.execute(ctx, DispatchKeyEventParams::key_up(key)).await?;
    }
    Ok(())
}
