//! Error types and the caller-visible error codes

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection code surfaced across the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Anything that does not fit another category
    BarcodeScanError,
    /// The image could not be read or decoded
    ImageLoadError,
    /// The pixels could not be turned into decoder input
    ImageConversionError,
    /// The decoder failed
    ProcessingError,
    /// The URI is empty, malformed or uses an unsupported scheme
    InvalidUri,
    /// Nothing was detected and the scanner is set to reject empty scans
    NoResults,
}

impl ErrorCode {
    /// Wire string, e.g. `"IMAGE_LOAD_ERROR"`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BarcodeScanError => "BARCODE_SCAN_ERROR",
            ErrorCode::ImageLoadError => "IMAGE_LOAD_ERROR",
            ErrorCode::ImageConversionError => "IMAGE_CONVERSION_ERROR",
            ErrorCode::ProcessingError => "PROCESSING_ERROR",
            ErrorCode::InvalidUri => "INVALID_URI",
            ErrorCode::NoResults => "NO_RESULTS",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a vendor engine
#[derive(Debug, Error)]
#[error("{engine}: {message}")]
pub struct EngineError {
    /// Engine name
    pub engine: &'static str,
    /// Vendor message
    pub message: String,
}

impl EngineError {
    /// Create an engine error
    pub fn new(engine: &'static str, message: impl Into<String>) -> Self {
        Self {
            engine,
            message: message.into(),
        }
    }
}

/// Errors from a single scan invocation
#[derive(Debug, Error)]
pub enum ScanError {
    /// The URI could not be resolved to a local file
    #[error("invalid URI `{uri}`: {reason}")]
    InvalidUri {
        /// The URI as given
        uri: String,
        /// Why it was rejected
        reason: String,
    },

    /// Reading or decoding the image file failed
    #[error("failed to load image from {path}")]
    ImageLoad {
        /// Path that was read
        path: String,
        /// Underlying failure
        #[source]
        source: image::ImageError,
    },

    /// Pixel data could not be converted into decoder input
    #[error("image conversion failed: {0}")]
    ImageConversion(String),

    /// The decoder failed
    #[error("failed to process image")]
    Processing(#[from] EngineError),

    /// No barcode was found and empty scans are rejected
    #[error("no barcodes found")]
    NoResults,

    /// The worker running the scan died before reporting
    #[error("scan worker failed: {0}")]
    Worker(String),
}

impl ScanError {
    /// Category code for the bridge
    pub fn code(&self) -> ErrorCode {
        match self {
            ScanError::InvalidUri { .. } => ErrorCode::InvalidUri,
            ScanError::ImageLoad { .. } => ErrorCode::ImageLoadError,
            ScanError::ImageConversion(_) => ErrorCode::ImageConversionError,
            ScanError::Processing(_) => ErrorCode::ProcessingError,
            ScanError::NoResults => ErrorCode::NoResults,
            ScanError::Worker(_) => ErrorCode::BarcodeScanError,
        }
    }

    pub(crate) fn invalid_uri(uri: &str, reason: impl Into<String>) -> Self {
        ScanError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for scan results
pub type Result<T> = std::result::Result<T, ScanError>;
