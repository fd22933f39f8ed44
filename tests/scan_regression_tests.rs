//! End-to-end scans of generated barcode images
//!
//! Images are rendered with the `rxing` writer, written to a temp dir and
//! scanned back through the still-image scanner, the async image module and
//! the frame processor.

mod common;

use barcode_bridge::bridge::ImageScannerModule;
use barcode_bridge::models::{Frame, Orientation, PixelFormat};
use barcode_bridge::{
    BarcodeResult, BridgeError, CoordinateSpace, EmptyResultPolicy, ErrorCode,
    FrameProcessorPlugin, Scanner, ScannerConfig,
};
use common::{EAN13_TEXT, QR_TEXT, blank_image, ean13_image, file_uri, qr_image, save};
use serde_json::json;
use tempfile::tempdir;
use tokio::sync::oneshot;

#[test]
fn test_qr_from_path() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "qr.png", &qr_image());

    let scanner = Scanner::new(ScannerConfig::default());
    let results = scanner
        .scan_uri(path.to_str().unwrap(), Some(&["qr"][..]))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].raw_value, QR_TEXT);
    assert_eq!(results[0].display_value, QR_TEXT);
    assert_eq!(results[0].format, "qr");
}

#[test]
fn test_all_tag_finds_ean13() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "ean.png", &ean13_image());

    let results = Scanner::new(ScannerConfig::default())
        .scan_uri(path.to_str().unwrap(), Some(&["all"][..]))
        .unwrap();
    assert!(results.iter().any(|r| r.raw_value == EAN13_TEXT));
}

#[test]
fn test_ean13_from_file_uri() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "ean.png", &ean13_image());

    let scanner = Scanner::new(ScannerConfig::default());
    let results = scanner
        .scan_uri(&file_uri(&path), Some(&["EAN-13"][..]))
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].raw_value, EAN13_TEXT);
    assert_eq!(results[0].format, "ean_13");
}

#[test]
fn test_format_filter_excludes_other_symbologies() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "qr.png", &qr_image());

    let scanner = Scanner::new(ScannerConfig::default());
    let results = scanner
        .scan_uri(path.to_str().unwrap(), Some(&["ean_13", "code_128"][..]))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_utf8_payload_survives_codepage_config() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "cafe.png", &common::utf8_qr_image("Café"));
    let uri = path.to_str().unwrap();

    let plain = Scanner::new(ScannerConfig::default())
        .scan_uri(uri, Some(&["qr"][..]))
        .unwrap();
    let cp1251 = Scanner::new(ScannerConfig::default().with_text_encoding("windows-1251"))
        .scan_uri(uri, Some(&["qr"][..]))
        .unwrap();
    assert_eq!(plain.len(), 1);
    assert_eq!(cp1251.len(), 1);
    assert_eq!(plain[0].raw_value, "Café");
    assert_eq!(cp1251[0].raw_value, "Café");
}

#[test]
fn test_blank_image_resolves_empty() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "blank.png", &blank_image());
    let uri = path.to_str().unwrap();

    let scanner = Scanner::new(ScannerConfig::default());
    assert!(scanner.scan_uri(uri, None::<&[&str]>).unwrap().is_empty());

    let strict = Scanner::new(ScannerConfig::default().with_empty_results(EmptyResultPolicy::Reject));
    let err = strict.scan_uri(uri, None::<&[&str]>).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoResults);
}

#[test]
fn test_normalized_bounds_are_fractions() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "qr.png", &qr_image());

    let config = ScannerConfig::default().with_coordinates(CoordinateSpace::Normalized);
    let results = Scanner::new(config)
        .scan_uri(path.to_str().unwrap(), None::<&[&str]>)
        .unwrap();
    assert!(!results.is_empty());
    let b = &results[0].bounds;
    assert!(0.0 <= b.left && b.left < b.right && b.right <= 1.0, "{b:?}");
    assert!(0.0 <= b.top && b.top < b.bottom && b.bottom <= 1.0, "{b:?}");
    assert!((b.width - (b.right - b.left)).abs() < 1e-9);
}

#[test]
fn test_downscaled_scan_reports_original_pixels() {
    let dir = tempdir().unwrap();
    let img = common::render(QR_TEXT, rxing::BarcodeFormat::QR_CODE, 400, 400, 20);
    let path = save(dir.path(), "qr_large.png", &img);
    let uri = path.to_str().unwrap();

    let full = Scanner::new(ScannerConfig::default())
        .scan_uri(uri, Some(&["qr"][..]))
        .unwrap();
    let small = Scanner::new(ScannerConfig::default().with_max_dimension(330))
        .scan_uri(uri, Some(&["qr"][..]))
        .unwrap();
    assert!(!full.is_empty() && !small.is_empty());

    let (a, b) = (&full[0].bounds, &small[0].bounds);
    for (x, y) in [(a.left, b.left), (a.top, b.top), (a.right, b.right), (a.bottom, b.bottom)] {
        assert!((x - y).abs() < 4.0, "{a:?} vs {b:?}");
    }
}

#[test]
fn test_unreadable_file_is_load_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("not_an_image.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let err = Scanner::default()
        .scan_uri(path.to_str().unwrap(), None::<&[&str]>)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ImageLoadError);
}

#[tokio::test]
async fn test_image_module_resolves() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "ean.png", &ean13_image());

    let module = ImageScannerModule::new(ScannerConfig::default());
    let results = module
        .process(file_uri(&path), Some(vec!["ean_13".into(), "qr".into()]))
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].raw_value, EAN13_TEXT);
}

#[tokio::test]
async fn test_image_module_rejects_missing_file() {
    let module = ImageScannerModule::new(ScannerConfig::default());
    let err = module
        .process("file:///no/such/dir/qr.png".into(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ImageLoadError);
    let wire = serde_json::to_value(&err).unwrap();
    assert_eq!(wire["code"], "IMAGE_LOAD_ERROR");
}

#[tokio::test]
async fn test_promise_settles_once() {
    let dir = tempdir().unwrap();
    let path = save(dir.path(), "qr.png", &qr_image());
    let module = ImageScannerModule::new(ScannerConfig::default());
    let runtime = tokio::runtime::Handle::current();

    let (tx, rx) = oneshot::channel::<Result<Vec<BarcodeResult>, BridgeError>>();
    let task = module.process_with_promise(&runtime, file_uri(&path), None, tx);
    task.await.unwrap();
    let results = rx.await.unwrap().unwrap();
    assert!(results.iter().all(|r| r.raw_value == QR_TEXT));

    let (tx, rx) = oneshot::channel::<Result<Vec<BarcodeResult>, BridgeError>>();
    module
        .process_with_promise(&runtime, "ftp://example.com/a.png".into(), None, tx)
        .await
        .unwrap();
    assert_eq!(rx.await.unwrap().unwrap_err().code, ErrorCode::InvalidUri);
}

#[test]
fn test_frame_processor_rotated_rgba_frame() {
    // Camera buffer is the upright image rotated 90° counter-clockwise.
    let upright = ean13_image();
    let rotated = image::imageops::rotate270(&upright);
    let (w, h) = rotated.dimensions();
    let rgba: Vec<u8> = rotated
        .pixels()
        .flat_map(|p| [p.0[0], p.0[0], p.0[0], 255])
        .collect();
    let frame = Frame::new(&rgba, w, h, PixelFormat::Rgba8).with_orientation(Orientation::Right);
    assert_eq!(frame.upright_size(), upright.dimensions());

    let plugin = FrameProcessorPlugin::with_engine(
        barcode_bridge::ZxingEngine::default(),
        &json!({ "formats": ["ean_13"], "coordinates": "normalized" }),
        ScannerConfig::default(),
    );
    let results = plugin.callback(&frame);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].raw_value, EAN13_TEXT);
    let b = &results[0].bounds;
    assert!(0.0 <= b.left && b.left < b.right && b.right <= 1.0, "{b:?}");
}

#[test]
fn test_frame_processor_blank_and_broken_frames() {
    let plugin = FrameProcessorPlugin::with_engine(
        barcode_bridge::ZxingEngine::default(),
        &json!({}),
        ScannerConfig::default(),
    );

    let blank = blank_image();
    let (w, h) = blank.dimensions();
    let frame = Frame::new(blank.as_raw(), w, h, PixelFormat::Luma8);
    assert!(plugin.callback(&frame).is_empty());

    let short = vec![0u8; 10];
    let broken = Frame::new(&short, w, h, PixelFormat::Nv21);
    assert_eq!(plugin.callback_json(&broken), json!([]));
}
