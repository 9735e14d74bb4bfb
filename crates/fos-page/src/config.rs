//! Display configuration

use serde::{Deserialize, Serialize};

/// Style property and values a display strategy toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Inline style property that controls visibility
    pub property: String,
    /// Value written when a page becomes visible
    pub visible: String,
    /// Value written when a page is hidden
    pub hidden: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            property: "display".to_string(),
            visible: "block".to_string(),
            hidden: "none".to_string(),
        }
    }
}
