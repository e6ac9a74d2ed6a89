use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid JSON: {0}")]
    Parse(serde_json::Error),

    #[error("Invalid entry '{member}': {message}")]
    Schema { member: String, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl ConvertError {
    pub(crate) fn schema(member: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::Schema {
            member: member.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
