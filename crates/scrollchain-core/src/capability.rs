//! Platform capability detection.
//!
//! Scroll chaining only needs to run where the platform fails to chain
//! momentum natively. Everything else keeps the controller fully inert.

use std::fmt;

/// Decides whether the controller should activate on this platform.
pub trait ChainingCapability {
    fn should_enable_chaining(&self) -> bool;
}

/// Fixed answer, for hosts that already know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticCapability(pub bool);

impl ChainingCapability for StaticCapability {
    fn should_enable_chaining(&self) -> bool {
        self.0
    }
}

/// Enables chaining on iOS devices, detected from the user agent string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAgentCapability {
    user_agent: String,
    max_touch_points: u32,
}

impl UserAgentCapability {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            max_touch_points: 0,
        }
    }

    /// Records `navigator.maxTouchPoints`.
    ///
    /// iPadOS 13+ presents a desktop Safari user agent; a `Macintosh` agent
    /// with a multi-touch screen is treated as an iPad.
    pub fn with_max_touch_points(mut self, points: u32) -> Self {
        self.max_touch_points = points;
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn device_kind(&self) -> DeviceKind {
        let kind = DeviceKind::from_user_agent(&self.user_agent);
        if kind == DeviceKind::Mac && self.max_touch_points > 1 {
            DeviceKind::IPad
        } else {
            kind
        }
    }

    pub fn is_ios(&self) -> bool {
        self.device_kind().is_ios()
    }
}

impl ChainingCapability for UserAgentCapability {
    fn should_enable_chaining(&self) -> bool {
        self.is_ios()
    }
}

/// Coarse device classification shown in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    IPhone,
    IPad,
    Android,
    Windows,
    Mac,
    Unknown,
}

impl DeviceKind {
    /// Classifies a user agent. Checks run most specific first since iOS
    /// agents also mention `Mac OS X`.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.contains("iPhone") || user_agent.contains("iPod") {
            DeviceKind::IPhone
        } else if user_agent.contains("iPad") {
            DeviceKind::IPad
        } else if user_agent.contains("Android") {
            DeviceKind::Android
        } else if user_agent.contains("Windows") {
            DeviceKind::Windows
        } else if user_agent.contains("Mac") {
            DeviceKind::Mac
        } else {
            DeviceKind::Unknown
        }
    }

    pub fn is_ios(self) -> bool {
        matches!(self, DeviceKind::IPhone | DeviceKind::IPad)
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::IPhone => "iPhone",
            DeviceKind::IPad => "iPad",
            DeviceKind::Android => "Android",
            DeviceKind::Windows => "Windows",
            DeviceKind::Mac => "Mac",
            DeviceKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
