//! Screenshot: `Page.captureScreenshot`, optionally clipped to a
//! resolved element's box model (§4.6).

use tokio_util::sync::CancellationToken;

use crate::action::selector::{Query, Selector, WaitPredicate};
use crate::cdp::dom;
use crate::cdp::page::{CaptureScreenshotParams, Viewport};
use crate::error::{CdpError, Result};
use crate::executor::Executor;

pub struct Screenshot {
    pub target: Option<Selector>,
}

impl Screenshot {
    /// Captures the full viewport.
    pub fn viewport() -> Self {
        Self { target: None }
    }

    /// Captures just the element `selector` resolves to.
    pub fn element(selector: Selector) -> Self {
        Self { target: Some(selector) }
    }

    pub async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<Vec<u8>> {
        let params = match &self.target {
            None => CaptureScreenshotParams::png(),
            Some(selector) => {
                let nodes = Query::new(selector.clone())
                    .wait_for(WaitPredicate::Visible)
                    .run(executor, ctx)
                    .await?;
                let node_id = *nodes.first().ok_or(CdpError::InvalidTarget)?;
                executor
                    .execute(ctx, dom::ScrollIntoViewIfNeededParams::new(node_id))
                    .await?;
                let model = executor
                    .execute(ctx, dom::GetBoxModelParams::new(node_id))
                    .await?
                    .model;
                CaptureScreenshotParams::png_clip(clip_from_quad(&model.content)?)
            }
        };
        let result = executor.execute(ctx, params).await?;
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &result.data)
            .map_err(|err| CdpError::EvaluationFailed(format!("invalid screenshot data: {err}")))
    }
}

fn clip_from_quad(quad: &[f64]) -> Result<Viewport> {
    if quad.len() != 8 {
        return Err(CdpError::InvalidTarget);
    }
    let xs: Vec<f64> = quad.iter().copied().step_by(2).collect();
    let ys: Vec<f64> = quad.iter().copied().skip(1).step_by(2).collect();
    let x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
    let y = ys.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Ok(Viewport { x, y, width: max_x - x, height: max_y - y, scale: 1.0 })
}
