//! `rxing` (ZXing port) engine

use std::collections::HashMap;

use rxing::{
    DecodeHintType, DecodeHintValue, DecodingHintDictionary, Exceptions, RXingResult,
    RXingResultMetadataType, RXingResultMetadataValue,
};
use tracing::trace;

use super::{BarcodeEngine, Geometry, RawDetection, VendorFormat};
use crate::config::ScannerConfig;
use crate::error::EngineError;
use crate::formats::{FormatSet, tables};
use crate::models::Point;
use crate::utils::LumaImage;

const NAME: &str = "zxing";

/// Multi-barcode decoder backed by `rxing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZxingEngine {
    try_harder: bool,
}

impl Default for ZxingEngine {
    fn default() -> Self {
        Self { try_harder: true }
    }
}

impl ZxingEngine {
    /// Create an engine
    pub fn new(try_harder: bool) -> Self {
        Self { try_harder }
    }

    /// Engine settings taken from a scanner config
    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.try_harder)
    }

    fn hints(&self, formats: &FormatSet) -> DecodingHintDictionary {
        let mut hints: DecodingHintDictionary = HashMap::new();
        // Always explicit: without POSSIBLE_FORMATS the readers fall back to
        // their own default list.
        hints.insert(
            DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(formats.to_zxing()),
        );
        if self.try_harder {
            hints.insert(DecodeHintType::TRY_HARDER, DecodeHintValue::TryHarder(true));
        }
        hints
    }
}

fn byte_segments(result: &RXingResult) -> Option<Vec<u8>> {
    match result
        .getRXingResultMetadata()
        .get(&RXingResultMetadataType::BYTE_SEGMENTS)
    {
        Some(RXingResultMetadataValue::ByteSegments(segments)) if !segments.is_empty() => {
            Some(segments.concat())
        }
        _ => None,
    }
}

fn to_raw(result: &RXingResult) -> RawDetection {
    let points: Vec<Point> = result
        .getPoints()
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();
    let text = result.getText();
    RawDetection {
        text: (!text.is_empty()).then(|| text.to_string()),
        bytes: byte_segments(result),
        format: VendorFormat::Zxing(result.getBarcodeFormat().clone()),
        geometry: if points.is_empty() {
            Geometry::None
        } else {
            Geometry::Points(points)
        },
    }
}

impl BarcodeEngine for ZxingEngine {
    fn name(&self) -> &'static str {
        NAME
    }

    fn detect(
        &self,
        image: &LumaImage,
        formats: &FormatSet,
    ) -> Result<Vec<RawDetection>, EngineError> {
        let mut hints = self.hints(formats);
        let found = rxing::helpers::detect_multiple_in_luma_with_hints(
            image.pixels.clone(),
            image.width,
            image.height,
            &mut hints,
        );

        match found {
            Ok(results) => {
                let detections: Vec<RawDetection> = results
                    .iter()
                    .filter(|r| {
                        tables::zxing::from_vendor(r.getBarcodeFormat())
                            .is_some_and(|s| formats.contains(s))
                    })
                    .map(to_raw)
                    .collect();
                trace!(
                    found = results.len(),
                    kept = detections.len(),
                    "zxing detection finished"
                );
                Ok(detections)
            }
            Err(Exceptions::NotFoundException(_)) => Ok(Vec::new()),
            Err(err) => Err(EngineError::new(NAME, format!("{err:?}"))),
        }
    }
}
