use thiserror::Error;

use crate::graphic::ObjectId;

#[derive(Error, Debug)]
pub enum AoiError {
    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid bit mask encoding: {0}")]
    InvalidEncoding(String),

    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("No graphic object with id {0}")]
    UnknownObject(ObjectId),
}

pub type Result<T> = std::result::Result<T, AoiError>;
