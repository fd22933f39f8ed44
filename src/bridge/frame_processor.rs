//! Per-frame callback for camera pipelines

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ScannerConfig;
use crate::engine::{BarcodeEngine, ZxingEngine};
use crate::models::{BarcodeResult, CoordinateSpace, Frame};
use crate::scanner::ScanSession;

/// Read the `formats` array from plugin options. Non-string entries are
/// skipped; anything other than an array means "no preference".
fn requested_formats(options: &Value) -> Option<Vec<String>> {
    let formats = options.get("formats")?.as_array()?;
    Some(
        formats
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn requested_coordinates(options: &Value) -> Option<CoordinateSpace> {
    let raw = options.get("coordinates")?.as_str()?;
    let space = CoordinateSpace::parse(raw);
    if space.is_none() {
        warn!(coordinates = raw, "unknown coordinate space, keeping default");
    }
    space
}

/// Frame processor plugin.
///
/// Options are read once at creation:
///
/// ```json
/// { "formats": ["qr", "ean_13"], "coordinates": "normalized" }
/// ```
///
/// The callback never fails: bad frames, engine errors and panics inside the
/// engine all produce an empty list.
#[derive(Debug)]
pub struct FrameProcessorPlugin<E = ZxingEngine> {
    session: ScanSession<E>,
}

impl FrameProcessorPlugin<ZxingEngine> {
    /// Plugin backed by the `rxing` engine and the environment config
    pub fn new(options: &Value) -> Self {
        let config = ScannerConfig::from_env();
        Self::with_engine(ZxingEngine::from_config(&config), options, config)
    }
}

impl<E: BarcodeEngine> FrameProcessorPlugin<E> {
    /// Plugin backed by any engine
    pub fn with_engine(engine: E, options: &Value, mut config: ScannerConfig) -> Self {
        if let Some(space) = requested_coordinates(options) {
            config = config.with_coordinates(space);
        }
        let formats = requested_formats(options);
        let session = ScanSession::new(engine, formats.as_deref(), &config);
        debug!(formats = ?session.formats(), coordinates = ?config.coordinates, "frame processor created");
        Self { session }
    }

    /// The underlying session
    pub fn session(&self) -> &ScanSession<E> {
        &self.session
    }

    /// Scan one frame
    pub fn callback(&self, frame: &Frame<'_>) -> Vec<BarcodeResult> {
        catch_unwind(AssertUnwindSafe(|| self.session.scan_frame(frame))).unwrap_or_else(|_| {
            warn!("engine panicked, frame dropped");
            Vec::new()
        })
    }

    /// Scan one frame and return the results as a JSON array
    pub fn callback_json(&self, frame: &Frame<'_>) -> Value {
        let results = self.callback(frame);
        serde_json::to_value(&results).unwrap_or_else(|err| {
            warn!(error = %err, "failed to serialize frame results");
            Value::Array(Vec::new())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RawDetection;
    use crate::error::EngineError;
    use crate::formats::{FormatSet, Symbology};
    use crate::models::PixelFormat;
    use crate::utils::LumaImage;
    use serde_json::json;

    #[derive(Debug)]
    struct PanickingEngine;

    impl BarcodeEngine for PanickingEngine {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn detect(&self, _: &LumaImage, _: &FormatSet) -> Result<Vec<RawDetection>, EngineError> {
            panic!("vendor library crashed")
        }
    }

    #[test]
    fn test_options_are_parsed() {
        let options = json!({ "formats": ["qr", 7, "ean-13"], "coordinates": "normalized" });
        assert_eq!(
            requested_formats(&options),
            Some(vec!["qr".to_string(), "ean-13".to_string()])
        );
        assert_eq!(requested_coordinates(&options), Some(CoordinateSpace::Normalized));

        let plugin = FrameProcessorPlugin::with_engine(
            ZxingEngine::default(),
            &options,
            ScannerConfig::default(),
        );
        let formats = plugin.session().formats();
        assert_eq!(formats.len(), 2);
        assert!(formats.contains(Symbology::Qr));
        assert!(formats.contains(Symbology::Ean13));
    }

    #[test]
    fn test_missing_options_mean_all() {
        let plugin = FrameProcessorPlugin::with_engine(
            ZxingEngine::default(),
            &Value::Null,
            ScannerConfig::default(),
        );
        assert!(plugin.session().formats().is_all());
        assert_eq!(requested_coordinates(&json!({ "coordinates": "furlongs" })), None);
    }

    #[test]
    fn test_callback_survives_panics() {
        let plugin =
            FrameProcessorPlugin::with_engine(PanickingEngine, &json!({}), ScannerConfig::default());
        let pixels = vec![128u8; 64];
        let frame = Frame::new(&pixels, 8, 8, PixelFormat::Luma8);
        assert!(plugin.callback(&frame).is_empty());
        assert_eq!(plugin.callback_json(&frame), json!([]));
    }
}
