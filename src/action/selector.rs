//! §4.6 Selector/Query sub-engine — the state machine that resolves a
//! selector to node ids, waits for a readiness predicate, and invokes an
//! after-callback, retrying on a fixed quantum until satisfied or the
//! context is done.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::cdp::{dom, runtime};
use crate::error::{CdpError, Result, SelectorError};
use crate::executor::Executor;
use crate::ids::NodeId;
use crate::state::Frame;

/// A user-supplied resolver for `ByFunc` (§9: "polymorphic resolvers ...
/// model as capability records"; this is the one pluggable slot, the
/// built-in variants are inline below).
pub type CustomResolver =
    Arc<dyn Fn(Executor, Arc<Frame>) -> BoxFuture<'static, Result<Vec<NodeId>>> + Send + Sync>;

/// A user-supplied wait predicate for `WaitFunc`.
pub type CustomWait =
    Arc<dyn Fn(Vec<NodeId>) -> BoxFuture<'static, Result<Option<Vec<NodeId>>>> + Send + Sync>;

/// An after-callback invoked once the wait predicate is satisfied; the
/// action's real work (click, read, screenshot, ...) lives here.
pub type AfterCallback =
    Arc<dyn Fn(Executor, Vec<NodeId>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// The tagged selector-value variant (§9: replaces an untyped
/// `interface{}`-style selector).
#[derive(Clone)]
pub enum Selector {
    /// `BySearch`: `DOM.performSearch` (CSS or XPath).
    Search(String),
    /// `ByQuery`: `DOM.querySelector` rooted at the current document.
    Query(String),
    /// `ByQueryAll`: `DOM.querySelectorAll` rooted at the current document.
    QueryAll(String),
    /// `ById`: normalized to `#<id>` then resolved as `Query`.
    Id(String),
    /// `ByJSPath`: `Runtime.evaluate` + `DOM.requestNode`. Trusted-input
    /// only — bypasses any selector sanitization.
    JsPath(String),
    /// `ByNodeId`: the value already IS a list of node ids.
    NodeIds(Vec<NodeId>),
    /// `ByFunc`: an arbitrary caller-supplied resolver.
    Func(CustomResolver),
}

/// The readiness predicate a `Query` waits on before calling its
/// after-callback.
#[derive(Clone)]
pub enum WaitPredicate {
    Ready,
    Visible,
    NotVisible,
    Enabled,
    Selected,
    NotPresent,
    Func(CustomWait),
}

/// A single selector/query action: resolve, wait, then call `after`.
/// Mirrors the `INIT -> RESOLVING -> WAITING -> CALLING_AFTER -> DONE`
/// state machine; the states themselves aren't reified as an enum since
/// `run`'s loop body already encodes exactly that sequence per iteration.
pub struct Query {
    pub selector: Selector,
    pub expected: usize,
    pub wait: WaitPredicate,
    pub after: Option<AfterCallback>,
}

impl Query {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            expected: 1,
            wait: WaitPredicate::Ready,
            after: None,
        }
    }

    /// `AtLeast(n)`: the resolver must return at least `n` ids before the
    /// wait predicate is consulted.
    pub fn at_least(mut self, n: usize) -> Self {
        self.expected = n;
        self
    }

    /// Forces `expected` to 0 and the predicate to `NotPresent`.
    pub fn not_present(mut self) -> Self {
        self.expected = 0;
        self.wait = WaitPredicate::NotPresent;
        self
    }

    pub fn wait_for(mut self, predicate: WaitPredicate) -> Self {
        self.wait = predicate;
        self
    }

    pub fn after(mut self, callback: AfterCallback) -> Self {
        self.after = Some(callback);
        self
    }

    /// Runs the state machine to completion (§4.6 steps 1-5), returning
    /// the final resolved node ids.
    pub async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<Vec<NodeId>> {
        let quantum = executor.dispatcher().config.selector_quantum;
        loop {
            if ctx.is_cancelled() {
                return Err(CdpError::Cancelled);
            }

            // Steps 1-2: current top Frame and its Root.
            let frame = match executor.dispatcher().target.top_frame().await {
                Some(frame) => frame,
                None => {
                    Self::wait_quantum(quantum, ctx).await?;
                    continue;
                }
            };
            let root = match frame.root().await {
                Some(root) => root,
                None => {
                    Self::wait_quantum(quantum, ctx).await?;
                    continue;
                }
            };

            // Step 3: resolver.
            let resolved = match self.resolve(executor, ctx, &frame, root).await {
                Ok(ids) if ids.len() >= self.expected => ids,
                Ok(_) => {
                    Self::wait_quantum(quantum, ctx).await?;
                    continue;
                }
                Err(CdpError::Cancelled) => return Err(CdpError::Cancelled),
                Err(_) => {
                    Self::wait_quantum(quantum, ctx).await?;
                    continue;
                }
            };

            // `NotPresent`: any non-empty result is a hard failure, never
            // a retry (the resolve stage already let it through because
            // `expected` is 0).
            if matches!(self.wait, WaitPredicate::NotPresent) {
                if resolved.is_empty() {
                    if let Some(after) = &self.after {
                        after(executor.clone(), resolved.clone()).await?;
                    }
                    return Ok(resolved);
                }
                return Err(CdpError::Selector(SelectorError::HasResults));
            }

            // Step 4: wait predicate.
            let ready = match self.wait(executor, ctx, &frame, resolved).await {
                Ok(Some(nodes)) => nodes,
                Ok(None) => {
                    Self::wait_quantum(quantum, ctx).await?;
                    continue;
                }
                Err(err) => return Err(err),
            };

            // Step 5: after callback.
            if let Some(after) = &self.after {
                after(executor.clone(), ready.clone()).await?;
            }
            return Ok(ready);
        }
    }

    async fn wait_quantum(quantum: Duration, ctx: &CancellationToken) -> Result<()> {
        tokio::select! {
            _ = ctx.cancelled() => Err(CdpError::Cancelled),
            _ = tokio::time::sleep(quantum) => Ok(()),
        }
    }

    async fn resolve(
        &self,
        executor: &Executor,
        ctx: &CancellationToken,
        frame: &Arc<Frame>,
        root: NodeId,
    ) -> Result<Vec<NodeId>> {
        match &self.selector {
            Selector::Search(query) => {
                let search = executor
                    .execute(ctx, dom::PerformSearchParams::new(query.clone()))
                    .await?;
                if search.result_count <= 0 {
                    let _ = executor
                        .execute(
                            ctx,
                            dom::DiscardSearchResultsParams { search_id: search.search_id },
                        )
                        .await;
                    return Ok(Vec::new());
                }
                let results = executor
                    .execute(
                        ctx,
                        dom::GetSearchResultsParams {
                            search_id: search.search_id.clone(),
                            from_index: 0,
                            to_index: search.result_count,
                        },
                    )
                    .await?;
                let _ = executor
                    .execute(
                        ctx,
                        dom::DiscardSearchResultsParams { search_id: search.search_id },
                    )
                    .await;
                Ok(results.node_ids)
            }
            Selector::Query(sel) => Self::query_selector(executor, ctx, root, sel).await,
            Selector::QueryAll(sel) => {
                let result = executor
                    .execute(ctx, dom::QuerySelectorAllParams::new(root, sel.clone()))
                    .await?;
                Ok(result.node_ids)
            }
            Selector::Id(id) => Self::query_selector(executor, ctx, root, &format!("#{id}")).await,
            Selector::JsPath(expr) => {
                let evaluated = executor
                    .execute(ctx, runtime::EvaluateParams::new(expr.clone()))
                    .await?;
                let object_id = evaluated.result.object_id.clone().ok_or_else(|| {
                    CdpError::Selector(SelectorError::InvalidSelector(expr.clone()))
                })?;
                let node = executor
                    .execute(ctx, dom::RequestNodeParams::new(object_id))
                    .await?;
                Ok(vec![node.node_id])
            }
            Selector::NodeIds(ids) => {
                for id in ids {
                    let _ = executor
                        .execute(ctx, dom::RequestChildNodesParams::new(*id))
                        .await;
                }
                Ok(ids.clone())
            }
            Selector::Func(resolver) => resolver(executor.clone(), Arc::clone(frame)).await,
        }
    }

    async fn query_selector(
        executor: &Executor,
        ctx: &CancellationToken,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let result = executor
            .execute(ctx, dom::QuerySelectorParams::new(root, selector))
            .await?;
        if result.node_id.0 == 0 {
            Ok(Vec::new())
        } else {
            Ok(vec![result.node_id])
        }
    }

    async fn wait(
        &self,
        executor: &Executor,
        ctx: &CancellationToken,
        frame: &Arc<Frame>,
        nodes: Vec<NodeId>,
    ) -> Result<Option<Vec<NodeId>>> {
        match &self.wait {
            WaitPredicate::Ready => {
                for id in &nodes {
                    if frame.node(*id).await.is_none() {
                        return Ok(None);
                    }
                }
                Ok(Some(nodes))
            }
            WaitPredicate::NotPresent => Ok(Some(nodes)),
            WaitPredicate::Enabled => {
                for id in &nodes {
                    let node = match frame.node(*id).await {
                        Some(node) => node,
                        None => return Ok(None),
                    };
                    if node.has_attribute("disabled").await {
                        return Err(CdpError::Selector(SelectorError::Disabled));
                    }
                }
                Ok(Some(nodes))
            }
            WaitPredicate::Selected => {
                for id in &nodes {
                    let node = match frame.node(*id).await {
                        Some(node) => node,
                        None => return Ok(None),
                    };
                    if !node.has_attribute("selected").await {
                        return Err(CdpError::Selector(SelectorError::NotSelected));
                    }
                }
                Ok(Some(nodes))
            }
            WaitPredicate::Visible | WaitPredicate::NotVisible => {
                for id in &nodes {
                    if frame.node(*id).await.is_none() {
                        return Ok(None);
                    }
                }
                let want_visible = matches!(self.wait, WaitPredicate::Visible);
                let checks = nodes.iter().map(|id| Self::is_visible(executor, ctx, frame, *id));
                let results = futures::future::join_all(checks).await;

                let mut any_visible = false;
                let mut all_visible = true;
                for result in results {
                    match result {
                        Ok(true) => any_visible = true,
                        Ok(false) => all_visible = false,
                        Err(err) => return Err(err),
                    }
                }

                if want_visible {
                    if all_visible {
                        Ok(Some(nodes))
                    } else {
                        Ok(None)
                    }
                } else if any_visible {
                    Ok(None)
                } else {
                    Ok(Some(nodes))
                }
            }
            WaitPredicate::Func(predicate) => predicate(nodes).await,
        }
    }

    /// `DOM.getBoxModel` succeeds AND `el.offsetParent !== null`; a
    /// could-not-compute-box-model error is translated to "not visible"
    /// rather than propagated.
    async fn is_visible(
        executor: &Executor,
        ctx: &CancellationToken,
        frame: &Arc<Frame>,
        id: NodeId,
    ) -> Result<bool> {
        if executor
            .execute(ctx, dom::GetBoxModelParams::new(id))
            .await
            .is_err()
        {
            return Ok(false);
        }
        let resolved = executor.execute(ctx, dom::ResolveNodeParams::new(id)).await?;
        let object_id = match resolved.object.object_id {
            Some(object_id) => object_id,
            None => {
                let path = match frame.node(id).await {
                    Some(node) => node.xpath(frame).await,
                    None => id.to_string(),
                };
                return Err(CdpError::Selector(SelectorError::InvalidSelector(format!(
                    "node at {path} has no remote object"
                ))));
            }
        };
        let called = executor
            .execute(
                ctx,
                runtime::CallFunctionOnParams::new(
                    object_id,
                    "function(){ return this.offsetParent !== null; }",
                ),
            )
            .await?;
        Ok(matches!(called.result.value, Some(serde_json::Value::Bool(true))))
    }
}
