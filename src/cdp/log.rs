use serde::Serialize;

use crate::cdp::{impl_command, NoResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnableParams {}
impl_command!(EnableParams, "Log.enable", NoResult);
