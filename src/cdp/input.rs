use serde::Serialize;

use crate::cdp::{impl_command, NoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
}

impl MouseButton {
    fn as_str(&self) -> &'static str {
        match self {
            MouseButton::None => "none",
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchMouseEventParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: f64,
    pub y: f64,
    pub button: &'static str,
    pub click_count: i64,
}

impl DispatchMouseEventParams {
    pub fn moved(x: f64, y: f64) -> Self {
        Self { kind: "mouseMoved", x, y, button: MouseButton::None.as_str(), click_count: 0 }
    }

    pub fn pressed(x: f64, y: f64, button: MouseButton) -> Self {
        Self { kind: "mousePressed", x, y, button: button.as_str(), click_count: 1 }
    }

    pub fn released(x: f64, y: f64, button: MouseButton) -> Self {
        Self { kind: "mouseReleased", x, y, button: button.as_str(), click_count: 1 }
    }
}
impl_command!(DispatchMouseEventParams, "Input.dispatchMouseEvent", NoResult);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchKeyEventParams {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "windowsVirtualKeyCode")]
    pub windows_virtual_key_code: Option<i64>,
}

impl DispatchKeyEventParams {
    pub fn raw_key_down(key: &crate::action::keys::Key) -> Self {
        Self {
            kind: "rawKeyDown",
            text: None,
            key: Some(key.key_value().to_string()),
            code: Some(key.code().to_string()),
            windows_virtual_key_code: Some(key.virtual_key_code()),
        }
    }

    pub fn key_up(key: &crate::action::keys::Key) -> Self {
        Self {
            kind: "keyUp",
            text: None,
            key: Some(key.key_value().to_string()),
            code: Some(key.code().to_string()),
            windows_virtual_key_code: Some(key.virtual_key_code()),
        }
    }

    pub fn char_(text: &str) -> Self {
        Self {
            kind: "char",
            text: Some(text.to_string()),
            key: Some(text.to_string()),
            code: None,
            windows_virtual_key_code: None,
        }
    }
}
impl_command!(DispatchKeyEventParams, "Input.dispatchKeyEvent", NoResult);
