use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque X11 window handle.
///
/// Displayed and persisted in the `0x03a00007` form `wmctrl` prints; the
/// integer form is what the window manager APIs take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid window id '{0}'")]
pub struct InvalidWindowId(pub String);

impl FromStr for WindowId {
    type Err = InvalidWindowId;

    /// Accepts `0x`-prefixed hex (as printed by `wmctrl`) or plain decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => trimmed.parse::<u64>(),
        };
        parsed
            .map(WindowId)
            .map_err(|_| InvalidWindowId(s.to_string()))
    }
}

impl TryFrom<String> for WindowId {
    type Error = InvalidWindowId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowId> for String {
    fn from(id: WindowId) -> Self {
        id.to_string()
    }
}

/// A top-level window as currently reported by the window manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningWindow {
    pub window_id: WindowId,
    /// Desktop index; `None` for sticky windows shown on every desktop
    pub desktop: Option<u32>,
    pub title: String,
    /// Owning process, `0` when the client does not set `_NET_WM_PID`
    pub process_id: u32,
}

impl RunningWindow {
    pub fn is_sticky(&self) -> bool {
        self.desktop.is_none()
    }
}
