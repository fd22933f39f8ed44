//! Result normalization
//!
//! Turns [`RawDetection`]s from any engine into [`BarcodeResult`]s: one
//! format vocabulary, one top-left rectangle convention, pixel or normalized
//! units, and text that never fails to decode.

pub mod text;

use std::sync::Arc;

use tracing::warn;

use crate::config::ScannerConfig;
use crate::engine::{Geometry, RawDetection, VendorFormat};
use crate::formats::{Symbology, tables};
use crate::models::{BarcodeResult, Bounds, CoordinateSpace, Rect};

pub use text::{Codepage, TextDecoder, resolve_text};

/// Sizes of the image a scan worked on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    /// Size of the buffer the engine saw
    pub decoded: (u32, u32),
    /// Size to report bounds against (before any downscale)
    pub original: (u32, u32),
}

impl Extent {
    /// Engine saw the image at its original size
    pub fn same(width: u32, height: u32) -> Self {
        Self {
            decoded: (width, height),
            original: (width, height),
        }
    }
}

/// Map a vendor format code through its library's table
pub fn symbology_of(format: &VendorFormat) -> Option<Symbology> {
    match format {
        VendorFormat::Zxing(f) => tables::zxing::from_vendor(f),
        VendorFormat::MlKit(code) => tables::mlkit::from_vendor(*code),
        VendorFormat::Vision(raw) => tables::vision::from_vendor(raw),
        VendorFormat::Known(s) => Some(*s),
    }
}

/// Rectangle in the decoded buffer's top-left pixel space
pub fn pixel_rect(geometry: &Geometry, decoded: (u32, u32)) -> Rect {
    let (w, h) = (decoded.0 as f32, decoded.1 as f32);
    match geometry {
        Geometry::Points(points) => Rect::from_points(points).unwrap_or_default(),
        Geometry::Edges {
            left,
            top,
            right,
            bottom,
        } => Rect::from_edges(*left, *top, *right, *bottom),
        Geometry::OriginSize {
            x,
            y,
            width,
            height,
            origin,
            normalized,
        } => {
            if *normalized {
                Rect::from_origin_size(*x, *y, *width, *height, *origin, 1.0).scale(w, h)
            } else {
                Rect::from_origin_size(*x, *y, *width, *height, *origin, h)
            }
        }
        Geometry::None => Rect::default(),
    }
}

/// Converts engine detections into caller results
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    coordinates: CoordinateSpace,
    text_decoder: Option<Arc<dyn TextDecoder>>,
}

impl Normalizer {
    /// Normalizer with no codepage re-decoding
    pub fn new(coordinates: CoordinateSpace) -> Self {
        Self {
            coordinates,
            text_decoder: None,
        }
    }

    /// Normalizer configured from `config`; an unknown encoding label is
    /// logged and ignored
    pub fn from_config(config: &ScannerConfig) -> Self {
        let mut normalizer = Self::new(config.coordinates);
        if let Some(label) = config.text_encoding.as_deref() {
            match Codepage::for_label(label) {
                Some(codepage) => normalizer.text_decoder = Some(Arc::new(codepage)),
                None => warn!(label, "unknown text encoding, payloads decoded as-is"),
            }
        }
        normalizer
    }

    /// Install a text decoding strategy
    pub fn with_text_decoder(mut self, decoder: Arc<dyn TextDecoder>) -> Self {
        self.text_decoder = Some(decoder);
        self
    }

    /// Units this normalizer reports in
    pub fn coordinates(&self) -> CoordinateSpace {
        self.coordinates
    }

    /// Normalize one detection
    pub fn normalize_one(&self, detection: &RawDetection, extent: Extent) -> BarcodeResult {
        let value = resolve_text(
            detection.text.as_deref(),
            detection.bytes.as_deref(),
            self.text_decoder.as_deref(),
        );

        let rect = pixel_rect(&detection.geometry, extent.decoded);
        let (dw, dh) = (extent.decoded.0.max(1) as f32, extent.decoded.1.max(1) as f32);
        let rect = rect.scale(extent.original.0 as f32 / dw, extent.original.1 as f32 / dh);
        let bounds = Bounds::from_rect(&rect, self.coordinates, extent.original);

        BarcodeResult::new(value, symbology_of(&detection.format), bounds)
    }

    /// Normalize every detection of a scan
    pub fn normalize(&self, detections: &[RawDetection], extent: Extent) -> Vec<BarcodeResult> {
        detections
            .iter()
            .map(|d| self.normalize_one(d, extent))
            .collect()
    }
}
