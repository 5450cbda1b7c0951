//! Error types for the skin system.

/// Result type alias for skin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing skins.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document is not well-formed XML.
    #[error("XML error at byte {position}: {message}")]
    Xml { message: String, position: u64 },

    /// The document has no `<Skin>` root element.
    #[error("Document has no <Skin> root element")]
    MissingRoot,

    /// An attribute value could not be parsed.
    #[error("Invalid value for attribute '{attribute}': {value:?}")]
    InvalidValue { attribute: String, value: String },

    /// An element appeared where it is not allowed.
    #[error("Unexpected element <{name}> inside <{parent}>")]
    UnexpectedElement { name: String, parent: String },
}

impl Error {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>, position: u64) -> Self {
        Self::Xml {
            message: message.into(),
            position,
        }
    }

    /// Create a value error.
    pub fn invalid_value(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an unexpected element error.
    pub fn unexpected_element(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnexpectedElement {
            name: name.into(),
            parent: parent.into(),
        }
    }
}
