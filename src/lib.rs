//! barcode_bridge - barcode scanning for still images and live camera frames
//!
//! One API over several barcode engines. Callers ask for formats by
//! canonical tag (`"qr"`, `"ean_13"`, ...), the request is negotiated into
//! the engine's own vocabulary, and whatever the engine reports comes back
//! in one result shape with one bounding-box convention.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Host-facing image module and frame processor plugin
pub mod bridge;
/// Scanner settings and their environment overrides
pub mod config;
/// Vendor engine seam and the `rxing` engine
pub mod engine;
/// Error types and caller-visible error codes
pub mod error;
/// Format vocabulary, negotiation and vendor mapping tables
pub mod formats;
/// Core data structures (BarcodeResult, Bounds, Frame, Point, etc.)
pub mod models;
/// Vendor detection to caller result conversion
pub mod normalize;
/// Still-image and live-frame scan invocation
pub mod scanner;
/// Image URI resolution
pub mod uri;
/// Utility functions (luma conversion, rotation)
pub mod utils;

pub use bridge::{BridgeError, FrameProcessorPlugin, ImageScannerModule, Promise};
pub use config::{EmptyResultPolicy, ScannerConfig};
pub use engine::{BarcodeEngine, ZxingEngine};
pub use error::{ErrorCode, ScanError};
pub use formats::{FormatSet, Symbology, negotiate};
pub use models::{BarcodeResult, Bounds, CoordinateSpace, Frame, Orientation, PixelFormat, ScanTarget};
pub use scanner::{ScanSession, Scanner};

/// Scan the image at `uri` with the environment's configuration
///
/// # Arguments
/// * `uri` - Filesystem path or `file://` URI
/// * `formats` - Requested format tags; `None` or empty means all formats
///
/// # Example
/// ```no_run
/// let results = barcode_bridge::scan_image("file:///tmp/label.png", Some(&["ean_13"][..]))?;
/// for r in results {
///     println!("{} {}", r.format, r.raw_value);
/// }
/// # Ok::<(), barcode_bridge::ScanError>(())
/// ```
pub fn scan_image<S: AsRef<str>>(
    uri: &str,
    formats: Option<&[S]>,
) -> error::Result<Vec<BarcodeResult>> {
    Scanner::new(ScannerConfig::from_env()).scan_uri(uri, formats)
}

/// Scan a single camera frame for all formats with default settings.
///
/// Failures yield an empty list. For repeated frames build a
/// [`ScanSession`] once instead.
pub fn scan_frame(frame: &Frame<'_>) -> Vec<BarcodeResult> {
    let config = ScannerConfig::default();
    ScanSession::new(ZxingEngine::from_config(&config), None::<&[&str]>, &config).scan_frame(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_frame_blank() {
        // 10x10 RGB, nothing to find
        let image = vec![0u8; 300];
        let frame = Frame::new(&image, 10, 10, PixelFormat::Rgb8);
        assert!(scan_frame(&frame).is_empty());
    }

    #[test]
    fn test_scan_frame_short_buffer() {
        let image = vec![0u8; 299];
        let frame = Frame::new(&image, 10, 10, PixelFormat::Rgb8);
        assert!(scan_frame(&frame).is_empty());
    }

    #[test]
    fn test_scan_image_bad_scheme() {
        let err = scan_image("https://example.com/qr.png", None::<&[&str]>).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidUri);
    }
}
