use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse client platform derived from the User-Agent header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Android,
    Ios,
    Pc,
}

const IOS_MARKERS: [&str; 3] = ["iphone", "ipad", "ipod"];

impl DeviceClass {
    /// Classify a User-Agent string.
    ///
    /// Matching is case-insensitive. Android is checked before the iOS markers,
    /// so a string carrying both is treated as Android. Anything else is `Pc`.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();

        if ua.contains("android") {
            DeviceClass::Android
        } else if IOS_MARKERS.iter().any(|marker| ua.contains(marker)) {
            DeviceClass::Ios
        } else {
            DeviceClass::Pc
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Android => "android",
            DeviceClass::Ios => "ios",
            DeviceClass::Pc => "pc",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
