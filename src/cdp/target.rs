use serde::{Deserialize, Serialize};

use crate::cdp::{impl_command, impl_method, NoResult};
use crate::ids::{SessionId, TargetId};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetParams {
    pub url: String,
}

impl<T: Into<String>> From<T> for CreateTargetParams {
    fn from(url: T) -> Self {
        Self { url: url.into() }
    }
}

impl Default for CreateTargetParams {
    fn default() -> Self {
        "about:blank".into()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
    pub target_id: TargetId,
}
impl_command!(CreateTargetParams, "Target.createTarget", CreateTargetResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetParams {
    pub target_id: TargetId,
    pub flatten: bool,
}

impl AttachToTargetParams {
    pub fn new(target_id: TargetId) -> Self {
        Self { target_id, flatten: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetResult {
    pub session_id: SessionId,
}
impl_command!(AttachToTargetParams, "Target.attachToTarget", AttachToTargetResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDiscoverTargetsParams {
    pub discover: bool,
}

impl SetDiscoverTargetsParams {
    pub fn new(discover: bool) -> Self {
        Self { discover }
    }
}
impl_command!(SetDiscoverTargetsParams, "Target.setDiscoverTargets", NoResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateTargetParams {
    pub target_id: TargetId,
}
impl_command!(ActivateTargetParams, "Target.activateTarget", NoResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetParams {
    pub target_id: TargetId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseTargetResult {
    pub success: bool,
}
impl_command!(CloseTargetParams, "Target.closeTarget", CloseTargetResult);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: TargetId,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
    pub attached: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetCreated {
    pub target_info: TargetInfo,
}
impl_method!(EventTargetCreated, "Target.targetCreated");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttachedToTarget {
    pub session_id: SessionId,
    pub target_info: TargetInfo,
}
impl_method!(EventAttachedToTarget, "Target.attachedToTarget");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetachedFromTarget {
    pub session_id: SessionId,
    pub target_id: Option<TargetId>,
}
impl_method!(EventDetachedFromTarget, "Target.detachedFromTarget");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTargetDestroyed {
    pub target_id: TargetId,
}
impl_method!(EventTargetDestroyed, "Target.targetDestroyed");
