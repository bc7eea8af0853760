use serde::{Deserialize, Serialize};

use crate::cdp::{impl_command, impl_method, NoResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnableParams {}
impl_command!(EnableParams, "Inspector.enable", NoResult);

/// Fired when the DevTools debugger detaches from the target — the
/// spec's "special 'target detached' event" that stops the Dispatcher
/// (§4.3).
#[derive(Debug, Clone, Deserialize)]
pub struct EventDetached {
    pub reason: String,
}
impl_method!(EventDetached, "Inspector.detached");

#[derive(Debug, Clone, Deserialize)]
pub struct EventTargetCrashed {}
impl_method!(EventTargetCrashed, "Inspector.targetCrashed");
