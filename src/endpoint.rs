//! §4.1a / §6 Endpoint client — the browser's HTTP JSON control surface,
//! separate from the CDP WebSocket itself: `/json/list`, `/json/new`,
//! `/json/activate/<id>`, `/json/close/<id>`, `/json/version`.

use serde::Deserialize;

use crate::error::{CdpError, Result};

const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["1.1", "1.2", "1.3"];

/// One entry from `/json/list` (and the body `/json/new` returns).
#[derive(Debug, Clone, Deserialize)]
pub struct TargetDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
    #[serde(rename = "devtoolsFrontendUrl")]
    pub devtools_frontend_url: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
}

impl TargetDescriptor {
    pub fn is_page(&self) -> bool {
        self.kind == "page"
    }
}

/// `/json/version`'s body.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

/// The recognized browser families; anything else with a supported
/// protocol version is accepted as `Unknown` rather than rejected (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Chromium,
    MicrosoftEdge,
    Safari,
    Unknown,
}

impl BrowserKind {
    /// Matches `Browser` case-insensitively against
    /// `^(chrome|chromium|microsoft edge|safari)` (§6).
    pub fn classify(browser: &str) -> Self {
        let lower = browser.to_ascii_lowercase();
        if lower.starts_with("chrome") && !lower.starts_with("chromium") {
            BrowserKind::Chrome
        } else if lower.starts_with("chromium") {
            BrowserKind::Chromium
        } else if lower.starts_with("microsoft edge") {
            BrowserKind::MicrosoftEdge
        } else if lower.starts_with("safari") {
            BrowserKind::Safari
        } else {
            BrowserKind::Unknown
        }
    }
}

/// A thin `reqwest`-backed HTTP JSON client against the browser's
/// debugging endpoint (conventionally `http://host:port`).
pub struct Endpoint {
    base_url: url::Url,
    client: reqwest::Client,
}

impl Endpoint {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let base_url = url::Url::parse(base_url.as_ref())
            .map_err(|err| CdpError::Launch(format!("invalid endpoint url: {err}")))?;
        Ok(Self { base_url, client: reqwest::Client::new() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    pub async fn version(&self) -> Result<VersionInfo> {
        let info: VersionInfo = self.client.get(self.url("/json/version")).send().await?.json().await?;
        if !SUPPORTED_PROTOCOL_VERSIONS.contains(&info.protocol_version.as_str()) {
            return Err(CdpError::UnsupportedProtocolVersion(info.protocol_version.clone()));
        }
        Ok(info)
    }

    pub async fn list(&self) -> Result<Vec<TargetDescriptor>> {
        Ok(self.client.get(self.url("/json/list")).send().await?.json().await?)
    }

    pub async fn new_page(&self, url: impl AsRef<str>) -> Result<TargetDescriptor> {
        let path = format!("/json/new?{}", url.as_ref());
        Ok(self.client.get(self.url(&path)).send().await?.json().await?)
    }

    pub async fn activate(&self, target_id: &str) -> Result<()> {
        self.client
            .get(self.url(&format!("/json/activate/{target_id}")))
            .send()
            .await?;
        Ok(())
    }

    pub async fn close(&self, target_id: &str) -> Result<()> {
        self.client
            .get(self.url(&format!("/json/close/{target_id}")))
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_browsers_case_insensitively() {
        assert_eq!(BrowserKind::classify("Chrome/120.0.0.0"), BrowserKind::Chrome);
        assert_eq!(BrowserKind::classify("HeadlessChrome/120.0"), BrowserKind::Unknown);
        assert_eq!(BrowserKind::classify("Chromium/120.0"), BrowserKind::Chromium);
        assert_eq!(BrowserKind::classify("Microsoft Edge/120.0"), BrowserKind::MicrosoftEdge);
        assert_eq!(BrowserKind::classify("Safari/17.0"), BrowserKind::Safari);
        assert_eq!(BrowserKind::classify("SomeOtherBrowser/1.0"), BrowserKind::Unknown);
    }

    #[test]
    fn supported_protocol_versions_are_exact() {
        assert!(SUPPORTED_PROTOCOL_VERSIONS.contains(&"1.1"));
        assert!(SUPPORTED_PROTOCOL_VERSIONS.contains(&"1.3"));
        assert!(!SUPPORTED_PROTOCOL_VERSIONS.contains(&"2.0"));
    }
}
