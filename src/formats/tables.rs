//! Vendor mapping tables
//!
//! One table per external library. Lookups in both directions go through
//! the table, never through ad-hoc matches at the call site.

use super::{FormatSet, Symbology};

/// ZXing (`rxing`) barcode formats
pub mod zxing {
    use super::*;
    use rxing::BarcodeFormat;

    const TABLE: [(Symbology, BarcodeFormat); 13] = [
        (Symbology::Code128, BarcodeFormat::CODE_128),
        (Symbology::Code39, BarcodeFormat::CODE_39),
        (Symbology::Code93, BarcodeFormat::CODE_93),
        (Symbology::Codabar, BarcodeFormat::CODABAR),
        (Symbology::Ean13, BarcodeFormat::EAN_13),
        (Symbology::Ean8, BarcodeFormat::EAN_8),
        (Symbology::Itf, BarcodeFormat::ITF),
        (Symbology::UpcE, BarcodeFormat::UPC_E),
        (Symbology::UpcA, BarcodeFormat::UPC_A),
        (Symbology::Qr, BarcodeFormat::QR_CODE),
        (Symbology::Pdf417, BarcodeFormat::PDF_417),
        (Symbology::Aztec, BarcodeFormat::AZTEC),
        (Symbology::DataMatrix, BarcodeFormat::DATA_MATRIX),
    ];

    /// Native format for a symbology
    pub fn to_vendor(symbology: Symbology) -> BarcodeFormat {
        TABLE
            .iter()
            .find(|(s, _)| *s == symbology)
            .map(|(_, f)| f.clone())
            .unwrap_or(BarcodeFormat::QR_CODE)
    }

    /// Symbology for a native format, if the crate knows it
    pub fn from_vendor(format: &BarcodeFormat) -> Option<Symbology> {
        TABLE.iter().find(|(_, f)| f == format).map(|(s, _)| *s)
    }

    /// Native selector for a format set
    pub fn selector(set: &FormatSet) -> std::collections::HashSet<BarcodeFormat> {
        set.iter().map(to_vendor).collect()
    }
}

/// Google ML Kit integer format constants
pub mod mlkit {
    use super::*;

    /// `Barcode.FORMAT_UNKNOWN`
    pub const FORMAT_UNKNOWN: i32 = -1;
    /// `Barcode.FORMAT_ALL_FORMATS`
    pub const FORMAT_ALL_FORMATS: i32 = 0xFFFF;

    const TABLE: [(Symbology, i32); 13] = [
        (Symbology::Code128, 1),
        (Symbology::Code39, 2),
        (Symbology::Code93, 4),
        (Symbology::Codabar, 8),
        (Symbology::DataMatrix, 16),
        (Symbology::Ean13, 32),
        (Symbology::Ean8, 64),
        (Symbology::Itf, 128),
        (Symbology::Qr, 256),
        (Symbology::UpcA, 512),
        (Symbology::UpcE, 1024),
        (Symbology::Pdf417, 2048),
        (Symbology::Aztec, 4096),
    ];

    /// Native constant for a symbology
    pub fn to_vendor(symbology: Symbology) -> i32 {
        TABLE
            .iter()
            .find(|(s, _)| *s == symbology)
            .map(|(_, code)| *code)
            .unwrap_or(FORMAT_UNKNOWN)
    }

    /// Symbology for a single native constant
    pub fn from_vendor(code: i32) -> Option<Symbology> {
        TABLE.iter().find(|(_, c)| *c == code).map(|(s, _)| *s)
    }

    /// Bitmask for `BarcodeScannerOptions.setBarcodeFormats`.
    ///
    /// The full set is sent as `FORMAT_ALL_FORMATS` rather than as the OR of
    /// the known constants so newer formats on the device are included too.
    pub fn selector(set: &FormatSet) -> i32 {
        if set.is_all() {
            return FORMAT_ALL_FORMATS;
        }
        set.iter().map(to_vendor).fold(0, |mask, code| mask | code)
    }
}

/// Apple Vision `VNBarcodeSymbology` raw values
pub mod vision {
    use super::*;

    const TABLE: [(Symbology, &str); 13] = [
        (Symbology::Code128, "VNBarcodeSymbologyCode128"),
        (Symbology::Code39, "VNBarcodeSymbologyCode39"),
        (Symbology::Code93, "VNBarcodeSymbologyCode93"),
        (Symbology::Codabar, "VNBarcodeSymbologyCodabar"),
        (Symbology::Ean13, "VNBarcodeSymbologyEAN13"),
        (Symbology::Ean8, "VNBarcodeSymbologyEAN8"),
        (Symbology::Itf, "VNBarcodeSymbologyITF14"),
        (Symbology::UpcE, "VNBarcodeSymbologyUPCE"),
        // Vision reports UPC-A as EAN-13 with a leading zero.
        (Symbology::UpcA, "VNBarcodeSymbologyEAN13"),
        (Symbology::Qr, "VNBarcodeSymbologyQR"),
        (Symbology::Pdf417, "VNBarcodeSymbologyPDF417"),
        (Symbology::Aztec, "VNBarcodeSymbologyAztec"),
        (Symbology::DataMatrix, "VNBarcodeSymbologyDataMatrix"),
    ];

    const VARIANTS: [(&str, Symbology); 7] = [
        ("VNBarcodeSymbologyCode39Checksum", Symbology::Code39),
        ("VNBarcodeSymbologyCode39FullASCII", Symbology::Code39),
        ("VNBarcodeSymbologyCode39FullASCIIChecksum", Symbology::Code39),
        ("VNBarcodeSymbologyCode93i", Symbology::Code93),
        ("VNBarcodeSymbologyI2of5", Symbology::Itf),
        ("VNBarcodeSymbologyI2of5Checksum", Symbology::Itf),
        ("VNBarcodeSymbologyMicroQR", Symbology::Qr),
    ];

    /// Native raw value for a symbology
    pub fn to_vendor(symbology: Symbology) -> &'static str {
        TABLE
            .iter()
            .find(|(s, _)| *s == symbology)
            .map(|(_, raw)| *raw)
            .unwrap_or("VNBarcodeSymbologyQR")
    }

    /// Symbology for a native raw value (first table match wins)
    pub fn from_vendor(raw: &str) -> Option<Symbology> {
        TABLE
            .iter()
            .find(|(_, r)| *r == raw)
            .map(|(s, _)| *s)
            .or_else(|| VARIANTS.iter().find(|(r, _)| *r == raw).map(|(_, s)| *s))
    }

    /// Deduplicated raw values for `VNDetectBarcodesRequest.symbologies`
    pub fn selector(set: &FormatSet) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::with_capacity(set.len());
        for raw in set.iter().map(to_vendor) {
            if !out.contains(&raw) {
                out.push(raw);
            }
        }
        out
    }
}

impl FormatSet {
    /// Selector for the `rxing` engine
    pub fn to_zxing(&self) -> std::collections::HashSet<rxing::BarcodeFormat> {
        zxing::selector(self)
    }

    /// Selector for ML Kit's `setBarcodeFormats`
    pub fn to_mlkit_mask(&self) -> i32 {
        mlkit::selector(self)
    }

    /// Selector for Vision's `symbologies`
    pub fn to_vision(&self) -> Vec<&'static str> {
        vision::selector(self)
    }
}
