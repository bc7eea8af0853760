//! Evaluate: a bare `Runtime.evaluate` with no selector involved.

use tokio_util::sync::CancellationToken;

use crate::cdp::runtime;
use crate::error::{CdpError, Result};
use crate::executor::Executor;

pub struct Evaluate(pub String);

impl Evaluate {
    pub fn expression(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub async fn run(&self, executor: &Executor, ctx: &CancellationToken) -> Result<serde_json::Value> {
        let evaluated = executor
            .execute(ctx, runtime::EvaluateParams::new(self.0.clone()))
            .await?;
        if let Some(exception) = evaluated.exception_details {
            return Err(CdpError::EvaluationFailed(exception.text));
        }
        Ok(evaluated.result.value.unwrap_or(serde_json::Value::Null))
    }
}
