//! Vendor engine seam
//!
//! An engine takes a luma image plus the negotiated [`FormatSet`] and returns
//! detections in its own vocabulary: vendor format codes, vendor geometry,
//! vendor text. The normalizer turns those into [`BarcodeResult`]s.
//!
//! [`BarcodeResult`]: crate::models::BarcodeResult

pub mod zxing;

use crate::error::EngineError;
use crate::formats::{FormatSet, Symbology};
use crate::models::{Origin, Point};
use crate::utils::LumaImage;

pub use zxing::ZxingEngine;

/// A vendor's name for a symbology
#[derive(Debug, Clone, PartialEq)]
pub enum VendorFormat {
    /// `rxing` / ZXing format
    Zxing(rxing::BarcodeFormat),
    /// ML Kit `Barcode.FORMAT_*` constant
    MlKit(i32),
    /// Vision `VNBarcodeSymbology` raw value
    Vision(String),
    /// Already mapped by the engine
    Known(Symbology),
}

/// A vendor's bounding geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Result points in image pixels (ZXing)
    Points(Vec<Point>),
    /// Rectangle edges in image pixels (ML Kit `boundingBox`)
    Edges {
        /// Left edge
        left: f32,
        /// Top edge
        top: f32,
        /// Right edge
        right: f32,
        /// Bottom edge
        bottom: f32,
    },
    /// Origin and size, possibly normalized (Vision `boundingBox`)
    OriginSize {
        /// Origin x
        x: f32,
        /// Origin y
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Which corner the origin is
        origin: Origin,
        /// Values are fractions of the image size rather than pixels
        normalized: bool,
    },
    /// The engine reported no geometry
    None,
}

/// One detection as reported by an engine
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Decoded text, if the engine produced any
    pub text: Option<String>,
    /// Payload bytes, if the engine exposes them
    pub bytes: Option<Vec<u8>>,
    /// Vendor format code
    pub format: VendorFormat,
    /// Vendor geometry
    pub geometry: Geometry,
}

/// A configured barcode decoder.
///
/// Implementations must report "nothing found" as `Ok(vec![])`; `Err` is
/// reserved for real failures.
pub trait BarcodeEngine: Send + Sync {
    /// Short engine name for logs and errors
    fn name(&self) -> &'static str;

    /// Detect every barcode of the enabled formats in `image`
    fn detect(
        &self,
        image: &LumaImage,
        formats: &FormatSet,
    ) -> Result<Vec<RawDetection>, EngineError>;
}

impl<E: BarcodeEngine + ?Sized> BarcodeEngine for std::sync::Arc<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn detect(
        &self,
        image: &LumaImage,
        formats: &FormatSet,
    ) -> Result<Vec<RawDetection>, EngineError> {
        (**self).detect(image, formats)
    }
}

impl<E: BarcodeEngine + ?Sized> BarcodeEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn detect(
        &self,
        image: &LumaImage,
        formats: &FormatSet,
    ) -> Result<Vec<RawDetection>, EngineError> {
        (**self).detect(image, formats)
    }
}
