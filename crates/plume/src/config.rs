//! Toolkit configuration.
//!
//! ```
//! use plume::GuiConfig;
//!
//! let config = GuiConfig::from_toml_str(r#"
//! width = 1024
//! height = 768
//! default_skin = "flat"
//! "#)?;
//! assert_eq!(config.width, 1024.0);
//! assert_eq!(config.caption_height, 24.0);
//! # Ok::<(), plume::GuiError>(())
//! ```

use serde::{Deserialize, Serialize};

use plume_core::AbsRect;

use crate::error::GuiResult;

/// Settings for a [`Gui`](crate::Gui) context.
///
/// Every field is optional in TOML; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Width of the root area in pixels.
    pub width: f32,
    /// Height of the root area in pixels.
    pub height: f32,
    /// Dots per inch of the target surface.
    pub dpi: f32,
    /// Skin applied to new top-level widgets, if it is loaded.
    pub default_skin: Option<String>,
    /// Height of the strip at the top of a window that starts a drag.
    pub caption_height: f32,
    /// Give keyboard focus to the widget under a mouse-down.
    pub focus_on_click: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            dpi: 96.0,
            default_skin: None,
            caption_height: 24.0,
            focus_on_click: true,
        }
    }
}

impl GuiConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> GuiResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize the configuration to TOML text.
    pub fn to_toml_string(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }

    /// The rectangle top-level widgets are resolved against.
    pub fn root_rect(&self) -> AbsRect {
        AbsRect::new(0.0, 0.0, self.width, self.height)
    }

    /// Scale factor relative to a 96 DPI surface.
    pub fn scale(&self) -> f32 {
        self.dpi / 96.0
    }
}
