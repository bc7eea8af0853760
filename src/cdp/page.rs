use serde::{Deserialize, Serialize};

use crate::cdp::{impl_command, impl_method, NoResult};
use crate::ids::{FrameId, LoaderId};

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnableParams {}
impl_command!(EnableParams, "Page.enable", NoResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateParams {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

impl NavigateParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), referrer: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
    pub frame_id: FrameId,
    pub loader_id: Option<LoaderId>,
    pub error_text: Option<String>,
}
impl_method!(NavigateParams, "Page.navigate");
impl crate::codec::Command for NavigateParams {
    type Response = NavigateResult;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetFrameTreeParams {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFrameTreeResult {
    pub frame_tree: FrameTree,
}
impl_command!(GetFrameTreeParams, "Page.getFrameTree", GetFrameTreeResult);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTree {
    pub frame: Frame,
    #[serde(default)]
    pub child_frames: Vec<FrameTree>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: FrameId,
    pub parent_id: Option<FrameId>,
    pub loader_id: Option<LoaderId>,
    pub name: Option<String>,
    pub url: String,
    pub url_fragment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLifecycleEventsEnabledParams {
    pub enabled: bool,
}

impl SetLifecycleEventsEnabledParams {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}
impl_command!(
    SetLifecycleEventsEnabledParams,
    "Page.setLifecycleEventsEnabled",
    NoResult
);

/// `frameNavigated` — replaces (or inserts) the Frame by id (§4.4).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameNavigated {
    pub frame: Frame,
}
impl_method!(EventFrameNavigated, "Page.frameNavigated");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameAttached {
    pub frame_id: FrameId,
    pub parent_frame_id: FrameId,
}
impl_method!(EventFrameAttached, "Page.frameAttached");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameDetached {
    pub frame_id: FrameId,
}
impl_method!(EventFrameDetached, "Page.frameDetached");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameStartedLoading {
    pub frame_id: FrameId,
}
impl_method!(EventFrameStartedLoading, "Page.frameStartedLoading");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameStoppedLoading {
    pub frame_id: FrameId,
}
impl_method!(EventFrameStoppedLoading, "Page.frameStoppedLoading");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameScheduledNavigation {
    pub frame_id: FrameId,
}
impl_method!(
    EventFrameScheduledNavigation,
    "Page.frameScheduledNavigation"
);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrameClearedScheduledNavigation {
    pub frame_id: FrameId,
}
impl_method!(
    EventFrameClearedScheduledNavigation,
    "Page.frameClearedScheduledNavigation"
);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNavigatedWithinDocument {
    pub frame_id: FrameId,
    pub url: String,
}
impl_method!(
    EventNavigatedWithinDocument,
    "Page.navigatedWithinDocument"
);

/// `loadEventFired` — closes the Target's one-shot "loaded" signal
/// (§4.4).
#[derive(Debug, Clone, Deserialize)]
pub struct EventLoadEventFired {
    pub timestamp: f64,
}
impl_method!(EventLoadEventFired, "Page.loadEventFired");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLifecycleEvent {
    pub frame_id: FrameId,
    pub loader_id: LoaderId,
    pub name: String,
    pub timestamp: f64,
}
impl_method!(EventLifecycleEvent, "Page.lifecycleEvent");

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureScreenshotParams {
    pub format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Viewport>,
    pub capture_beyond_viewport: bool,
}

impl CaptureScreenshotParams {
    pub fn png() -> Self {
        Self { format: "png", clip: None, capture_beyond_viewport: false }
    }

    pub fn png_clip(clip: Viewport) -> Self {
        Self { format: "png", clip: Some(clip), capture_beyond_viewport: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureScreenshotResult {
    pub data: String,
}
impl_command!(
    CaptureScreenshotParams,
    "Page.captureScreenshot",
    CaptureScreenshotResult
);
