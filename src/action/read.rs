//! Text/Value/Attribute: resolve a single node and read a property off
//! it, either from the state replica (attributes) or live from the page
//! (`textContent`/`value`, which the replica doesn't mirror). These
//! produce a value rather than just succeeding, so they stand alone
//! instead of implementing `Action`.

use tokio_util::sync::CancellationToken;

use crate::action::selector::{Query, Selector, WaitPredicate};
use crate::cdp::{dom, runtime};
use crate::error::{CdpError, Result};
use crate::executor::Executor;

async fn resolve_one(executor: &Executor, ctx: &CancellationToken, selector: Selector) -> Result<crate::ids::NodeId> {
    let nodes = Query::new(selector).wait_for(WaitPredicate::Ready).run(executor, ctx).await?;
    nodes.into_iter().next().ok_or(CdpError::InvalidTarget)
}

async fn read_property(executor: &Executor, ctx: &CancellationToken, selector: Selector, property: &str) -> Result<Option<String>> {
    let node_id = resolve_one(executor, ctx, selector).await?;
    let resolved = executor.execute(ctx, dom::ResolveNodeParams::new(node_id)).await?;
    let object_id = resolved
        .object
        .object_id
        .ok_or_else(|| CdpError::Selector(crate::error::SelectorError::InvalidSelector(property.to_string())))?;
    let called = executor
        .execute(
            ctx,
            runtime::CallFunctionOnParams::new(object_id, format!("function(){{ return this.{property}; }}")),
        )
        .await?;
    Ok(match called.result.value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

/// `el.textContent`.
pub struct Text(pub Selector);

impl Text {
    pub async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<Option<String>> {
        read_property(executor, ctx, self.0.clone(), "textContent").await
    }
}

/// `el.value` (form controls).
pub struct Value(pub Selector);

impl Value {
    pub async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<Option<String>> {
        read_property(executor, ctx, self.0.clone(), "value").await
    }
}

/// A single attribute, read straight from the state replica (no round
/// trip to the page — the Replica mirrors attributes exactly).
pub struct Attribute {
    pub selector: Selector,
    pub name: String,
}

impl Attribute {
    pub fn new(selector: Selector, name: impl Into<String>) -> Self {
        Self { selector, name: name.into() }
    }

    pub async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<Option<String>> {
        let node_id = resolve_one(executor, ctx, self.selector.clone()).await?;
        let frame = executor
            .dispatcher()
            .target
            .top_frame()
            .await
            .ok_or(CdpError::InvalidTarget)?;
        let node = frame.node(node_id).await.ok_or(CdpError::InvalidTarget)?;
        Ok(node.attribute(&self.name).await)
    }
}
