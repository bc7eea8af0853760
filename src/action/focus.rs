//! Focus, Blur, Submit: simple resolve-then-act members of the action
//! family named in §4.6 alongside Click/SendKeys. Blur and Submit have no
//! dedicated CDP command, so the after-callback runs a small JS snippet
//! via `Runtime.callFunctionOn` against the resolved node's remote object,
//! the same bridge `read.rs` uses for property reads.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::action::selector::{Query, Selector, WaitPredicate};
use crate::action::Action;
use crate::cdp::{dom, runtime};
use crate::error::{CdpError, Result, SelectorError};
use crate::executor::Executor;
use crate::ids::NodeId;

/// Resolves `selector`, waits until `Ready`, then `DOM.focus`es it.
pub struct Focus(pub Selector);

#[async_trait]
impl Action for Focus {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        let focus_ctx = ctx.clone();
        let query = Query::new(self.0.clone()).after(Arc::new(move |executor, nodes| {
            let focus_ctx = focus_ctx.clone();
            Box::pin(async move {
                executor.execute(&focus_ctx, dom::FocusParams::new(nodes[0])).await?;
                Ok(())
            })
        }));
        query.run(executor, ctx).await?;
        Ok(())
    }
}

/// Resolves `selector`, waits until `Ready`, then calls `el.blur()`.
pub struct Blur(pub Selector);

#[async_trait]
impl Action for Blur {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        let blur_ctx = ctx.clone();
        let query = Query::new(self.0.clone()).after(Arc::new(move |executor, nodes| {
            let blur_ctx = blur_ctx.clone();
            Box::pin(async move { call_void(&executor, &blur_ctx, nodes[0], "function(){ this.blur(); }").await })
        }));
        query.run(executor, ctx).await?;
        Ok(())
    }
}

/// Resolves `selector`, waits until `Ready`, then calls `form.submit()`
/// on the resolved node (expected to be a `<form>`).
pub struct Submit(pub Selector);

#[async_trait]
impl Action for Submit {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        let submit_ctx = ctx.clone();
        let query = Query::new(self.0.clone()).wait_for(WaitPredicate::Ready).after(Arc::new(
            move |executor, nodes| {
                let submit_ctx = submit_ctx.clone();
                Box::pin(async move {
                    call_void(&executor, &submit_ctx, nodes[0], "function(){ this.submit(); }").await
                })
            },
        ));
        query.run(executor, ctx).await?;
        Ok(())
    }
}

async fn call_void(
    executor: &Executor,
    ctx: &CancellationToken,
    node_id: NodeId,
    function_declaration: &str,
) -> Result<()> {
    let resolved = executor.execute(ctx, dom::ResolveNodeParams::new(node_id)).await?;
    let object_id = resolved.object.object_id.ok_or_else(|| {
        CdpError::Selector(SelectorError::InvalidSelector(format!("node {node_id} has no remote object")))
    })?;
    executor
        .execute(ctx, runtime::CallFunctionOnParams::new(object_id, function_declaration))
        .await?;
    Ok(())
}
