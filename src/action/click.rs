//! Click: resolve, scroll into view, then a synthetic mouse press/release
//! pair at the element's box-model center (§4.6).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::action::selector::{Query, Selector, WaitPredicate};
use crate::action::Action;
use crate::cdp::dom;
use crate::cdp::input::{DispatchMouseEventParams, MouseButton};
use crate::error::{CdpError, Result};
use crate::executor::Executor;
use crate::ids::NodeId;

pub struct Click {
    pub selector: Selector,
    pub button: MouseButton,
}

impl Click {
    pub fn new(selector: Selector) -> Self {
        Self { selector, button: MouseButton::Left }
    }
}

#[async_trait]
impl Action for Click {
    async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<()> {
        let button = self.button;
        let click_ctx = ctx.clone();
        let query = Query::new(self.selector.clone())
            .wait_for(WaitPredicate::Visible)
            .after(Arc::new(move |executor, nodes| {
                let click_ctx = click_ctx.clone();
                Box::pin(async move { click_node(&executor, &click_ctx, nodes[0], button).await })
            }));
        query.run(executor, ctx).await?;
        Ok(())
    }
}

async fn click_node(
    executor: &Executor,
    ctx: &CancellationToken,
    node_id: NodeId,
    button: MouseButton,
) -> Result<()> {
    executor
        .execute(ctx, dom::ScrollIntoViewIfNeededParams::new(node_id))
        .await?;
    let model = executor
        .execute(ctx, dom::GetBoxModelParams::new(node_id))
        .await?
        .model;
    let (x, y) = center(&model.content).ok_or(CdpError::InvalidTarget)?;

    executor.execute(ctx, DispatchMouseEventParams::moved(x, y)).await?;
    executor
        .execute(ctx, DispatchMouseEventParams::pressed(x, y, button))
        .await?;
    executor
        .execute(ctx, DispatchMouseEventParams::released(x, y, button))
        .await?;
    Ok(())
}

/// Quad is `[x1,y1, x2,y2, x3,y3, x4,y4]`; the centroid of the four
/// corners is good enough for a click point.
fn center(quad: &[f64]) -> Option<(f64, f64)> {
    if quad.len() != 8 {
        return None;
    }
    let xs: f64 = quad.iter().step_by(2).sum();
    let ys: f64 = quad.iter().skip(1).step_by(2).sum();
    Some((xs / 4.0, ys / 4.0))
}
