use serde::{Deserialize, Serialize};

use super::Bounds;
use crate::formats::Symbology;

/// Format name reported when a vendor code has no mapping
pub const UNKNOWN_FORMAT: &str = "unknown";

/// A decoded barcode in the shape handed across the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeResult {
    /// Decoded payload text
    pub raw_value: String,
    /// Payload text for display
    pub display_value: String,
    /// Stable symbology tag, e.g. `"qr"` or `"ean_13"`
    pub format: String,
    /// Bounding region
    pub bounds: Bounds,
}

impl BarcodeResult {
    /// Build a result whose display value mirrors the raw value
    pub fn new(value: String, symbology: Option<Symbology>, bounds: Bounds) -> Self {
        Self {
            display_value: value.clone(),
            raw_value: value,
            format: symbology.map_or(UNKNOWN_FORMAT, |s| s.tag()).to_string(),
            bounds,
        }
    }

    /// Parsed symbology, `None` for `"unknown"`
    pub fn symbology(&self) -> Option<Symbology> {
        Symbology::from_tag(&self.format)
    }
}
