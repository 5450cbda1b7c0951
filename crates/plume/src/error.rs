//! Error types for the widget layer.

use plume_core::TreeError;

/// Result type alias for widget operations.
pub type GuiResult<T> = std::result::Result<T, GuiError>;

/// Errors that can occur while building or reshaping a widget tree.
#[derive(Debug, thiserror::Error)]
pub enum GuiError {
    /// An argument was out of range or named something that does not exist.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A widget could not be created.
    #[error("Failed to create a {class} widget")]
    AllocationFailure { class: String },

    /// A tree operation failed.
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// A skin could not be read.
    #[error("Skin error: {0}")]
    Style(#[from] plume_style::Error),

    /// The configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl GuiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
