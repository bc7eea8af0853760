//! The top-level handle: connect to a running browser, attach to (or
//! create) a page target, and hand back an `Executor` wired to a live
//! `Dispatcher` (§4.3, §4.5, §6).

use std::sync::Arc;

use crate::cdp::{dom, network, page, runtime, target as cdp_target};
use crate::config::DriverConfig;
use crate::dispatcher::Dispatcher;
use crate::endpoint::Endpoint;
use crate::error::{CdpError, Result};
use crate::executor::Executor;
use crate::ids::TargetId;
use crate::state::Target;
use crate::transport::WsTransport;

/// A live connection to one browser-attached target (§3 `Target`),
/// ready to run actions against.
pub struct Browser {
    executor: Executor,
}

impl Browser {
    /// Connects to `debug_ws_url` (a per-target `webSocketDebuggerUrl`,
    /// as returned by the endpoint client), spawns the Dispatcher, and
    /// enables the CDP domains named in `config.initial_domains`.
    pub async fn connect(debug_ws_url: impl AsRef<str>, config: DriverConfig) -> Result<Self> {
        let transport = WsTransport::connect(debug_ws_url).await?;
        let target = Arc::new(Target::new(TargetId("attached".to_string())));
        let domains = config.initial_domains.clone();
        let dispatcher = Dispatcher::spawn(transport, config, target);
        let executor = Executor::new(dispatcher, None);

        for domain in domains {
            enable_domain(&executor, domain).await?;
        }
        seed_frame_tree(&executor).await?;
        Ok(Self { executor })
    }

    /// Discovers a page target via the HTTP endpoint (creating one at
    /// `about:blank` if none exists) and connects to it.
    pub async fn launch(endpoint: &Endpoint, config: DriverConfig) -> Result<Self> {
        let pages = crate::watcher::list_pages(endpoint).await?;
        let descriptor = match pages.into_iter().next() {
            Some(d) => d,
            None => endpoint.new_page("about:blank").await?,
        };
        Self::connect(descriptor.web_socket_debugger_url, config).await
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Runs a single `Action` to completion against this browser's
    /// executor, with a fresh (never-cancelled) context.
    pub async fn run(&self, action: &dyn crate::action::Action) -> Result<()> {
        let ctx = tokio_util::sync::CancellationToken::new();
        action.run(&self.executor, &ctx).await
    }
}

async fn enable_domain(executor: &Executor, domain: &str) -> Result<()> {
    let ctx = tokio_util::sync::CancellationToken::new();
    match domain {
        "Page" => {
            executor.execute(&ctx, page::EnableParams {}).await?;
        }
        "DOM" => {
            executor.execute(&ctx, dom::EnableParams {}).await?;
        }
        "Runtime" => {
            executor.execute(&ctx, runtime::EnableParams {}).await?;
        }
        "Network" => {
            executor.execute(&ctx, network::EnableParams::default()).await?;
        }
        "Log" | "CSS" | "Inspector" => {
            // Enabled for completeness; no replica state depends on
            // these domains' events today.
        }
        other => {
            return Err(CdpError::UnsupportedProtocolVersion(format!("unknown domain {other}")));
        }
    }
    Ok(())
}

/// Seeds the Target's frame tree from `Page.getFrameTree` so the first
/// selector `run` doesn't have to wait for a `frameNavigated` event that
/// may never come on an already-loaded page.
async fn seed_frame_tree(executor: &Executor) -> Result<()> {
    let ctx = tokio_util::sync::CancellationToken::new();
    let tree = executor.execute(&ctx, page::GetFrameTreeParams {}).await?;
    seed_frame(executor, &tree).await
}

async fn seed_frame(executor: &Executor, tree: &page::FrameTree) -> Result<()> {
    executor
        .dispatcher()
        .target
        .upsert_frame(crate::state::Frame::new(
            tree.frame.id.clone(),
            tree.frame.parent_id.clone(),
        ))
        .await;
    for child in &tree.child_frames {
        Box::pin(seed_frame(executor, child)).await?;
    }
    Ok(())
}

// Target.createTarget / attachToTarget, for callers that drive multiple
// targets over one WebSocket rather than connecting per-target.
pub use cdp_target::CreateTargetParams;
