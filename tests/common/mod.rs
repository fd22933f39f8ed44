//! Synthetic barcode images for integration tests

#![allow(dead_code)]

use image::{GrayImage, Luma};
use rxing::{
    BarcodeFormat, EncodeHintType, EncodeHintValue, EncodingHintDictionary, MultiFormatWriter,
    Writer,
};
use std::path::{Path, PathBuf};

pub const QR_TEXT: &str = "HELLO";
pub const EAN13_TEXT: &str = "4006381333931";

/// Render a barcode with `margin` extra white pixels on every side
pub fn render(contents: &str, format: BarcodeFormat, width: i32, height: i32, margin: u32) -> GrayImage {
    let matrix = MultiFormatWriter::default()
        .encode(contents, &format, width, height)
        .expect("encode barcode");
    let (w, h) = (matrix.getWidth(), matrix.getHeight());
    let mut img = GrayImage::from_pixel(w + 2 * margin, h + 2 * margin, Luma([255u8]));
    for y in 0..h {
        for x in 0..w {
            if matrix.get(x, y) {
                img.put_pixel(x + margin, y + margin, Luma([0u8]));
            }
        }
    }
    img
}

/// Render a QR code whose payload bytes are UTF-8
pub fn utf8_qr_image(contents: &str) -> GrayImage {
    let mut hints: EncodingHintDictionary = Default::default();
    hints.insert(
        EncodeHintType::CHARACTER_SET,
        EncodeHintValue::CharacterSet("UTF-8".to_string()),
    );
    let matrix = MultiFormatWriter::default()
        .encode_with_hints(contents, &BarcodeFormat::QR_CODE, 200, 200, &hints)
        .expect("encode barcode");
    let (w, h) = (matrix.getWidth(), matrix.getHeight());
    let margin = 20;
    let mut img = GrayImage::from_pixel(w + 2 * margin, h + 2 * margin, Luma([255u8]));
    for y in 0..h {
        for x in 0..w {
            if matrix.get(x, y) {
                img.put_pixel(x + margin, y + margin, Luma([0u8]));
            }
        }
    }
    img
}

pub fn qr_image() -> GrayImage {
    render(QR_TEXT, BarcodeFormat::QR_CODE, 200, 200, 20)
}

pub fn ean13_image() -> GrayImage {
    render(EAN13_TEXT, BarcodeFormat::EAN_13, 300, 120, 20)
}

pub fn blank_image() -> GrayImage {
    GrayImage::from_pixel(160, 120, Luma([255u8]))
}

/// Save `img` as PNG under `dir` and return its path
pub fn save(dir: &Path, name: &str, img: &GrayImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("write test image");
    path
}

pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}
