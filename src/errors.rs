// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application
//!
//! Core operations never surface these to the user directly: handlers log
//! them and turn the failed operation into a no-op.

use crate::backends::camera::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera capability errors (permission, missing device)
    Camera(BackendError),
    /// Capture, filtering and encoding errors
    Photo(PhotoError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Photo capture and re-rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Frame data does not match its declared dimensions
    InvalidFrame(String),
    /// Filter chain text could not be parsed
    InvalidFilter(String),
    /// Encoded payload could not be decoded
    DecodeFailed(String),
    /// Raster could not be encoded
    EncodingFailed(String),
    /// Export failed
    SaveFailed(String),
}

/// Remote enhancement errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceError {
    /// API key environment variable is unset or empty
    MissingApiKey(String),
    /// Transport failure (process spawn, connection, non-success status)
    Transport(String),
    /// Response body was not the expected JSON shape
    MalformedResponse(String),
    /// Response carried no image part
    NoImage,
    /// Returned image payload was not valid base64 or not a decodable image
    InvalidPayload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            PhotoError::InvalidFilter(msg) => write!(f, "Invalid filter chain: {}", msg),
            PhotoError::DecodeFailed(msg) => write!(f, "Decode failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for EnhanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnhanceError::MissingApiKey(var) => {
                write!(f, "API key not set (environment variable {})", var)
            }
            EnhanceError::Transport(msg) => write!(f, "Transport error: {}", msg),
            EnhanceError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            EnhanceError::NoImage => write!(f, "Response contained no image"),
            EnhanceError::InvalidPayload(msg) => write!(f, "Invalid image payload: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for EnhanceError {}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for EnhanceError {
    fn from(err: serde_json::Error) -> Self {
        EnhanceError::MalformedResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for EnhanceError {
    fn from(err: base64::DecodeError) -> Self {
        EnhanceError::InvalidPayload(err.to_string())
    }
}
