use serde::{Deserialize, Serialize};

use crate::cdp::{impl_command, NoResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnableParams {}
impl_command!(EnableParams, "Network.enable", NoResult);

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCookiesParams {}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCookiesResult {
    pub cookies: Vec<Cookie>,
}
impl_command!(GetCookiesParams, "Network.getCookies", GetCookiesResult);

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieParams {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl SetCookieParams {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), domain: None, path: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetCookieResult {
    pub success: bool,
}
impl_command!(SetCookieParams, "Network.setCookie", SetCookieResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserAgentOverrideParams {
    pub user_agent: String,
}

impl<T: Into<String>> From<T> for SetUserAgentOverrideParams {
    fn from(user_agent: T) -> Self {
        Self { user_agent: user_agent.into() }
    }
}
impl_command!(SetUserAgentOverrideParams, "Network.setUserAgentOverride", NoResult);
