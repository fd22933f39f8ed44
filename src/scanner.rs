//! Scan invocation
//!
//! [`Scanner`] handles still images: resolve, load, negotiate, detect,
//! normalize, with every failure reported. [`ScanSession`] handles live
//! frames: formats are negotiated once, and each frame is scanned on its own
//! with failures swallowed to an empty result.

use std::path::Path;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, warn};

use crate::config::{EmptyResultPolicy, ScannerConfig};
use crate::engine::{BarcodeEngine, ZxingEngine};
use crate::error::{Result, ScanError};
use crate::formats::{FormatSet, negotiate};
use crate::models::{BarcodeResult, Frame, ScanTarget};
use crate::normalize::{Extent, Normalizer};
use crate::uri::resolve_uri;
use crate::utils::LumaImage;
use crate::utils::luma::frame_to_upright_luma;

/// Load an image file as luma, downscaling it when its longest side exceeds
/// `max_dimension`.
pub fn load_luma<P: AsRef<Path>>(path: P, max_dimension: Option<u32>) -> Result<(LumaImage, Extent)> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| ScanError::ImageLoad {
        path: path.display().to_string(),
        source,
    })?;

    let (orig_w, orig_h) = img.dimensions();
    let gray = match max_dimension {
        Some(max_dim) if orig_w.max(orig_h) > max_dim => {
            let resized = img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle);
            debug!(
                from = ?(orig_w, orig_h),
                to = ?resized.dimensions(),
                "downscaled image before decoding"
            );
            resized.to_luma8()
        }
        _ => img.to_luma8(),
    };

    let (width, height) = gray.dimensions();
    let luma = LumaImage::new(gray.into_raw(), width, height)?;
    let extent = Extent {
        decoded: (width, height),
        original: (orig_w, orig_h),
    };
    Ok((luma, extent))
}

/// Still-image scanner
#[derive(Debug, Clone)]
pub struct Scanner<E = ZxingEngine> {
    engine: E,
    config: ScannerConfig,
    normalizer: Normalizer,
}

impl Scanner<ZxingEngine> {
    /// Scanner backed by the `rxing` engine
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_engine(ZxingEngine::from_config(&config), config)
    }
}

impl Default for Scanner<ZxingEngine> {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

impl<E: BarcodeEngine> Scanner<E> {
    /// Scanner backed by any engine
    pub fn with_engine(engine: E, config: ScannerConfig) -> Self {
        let normalizer = Normalizer::from_config(&config);
        Self {
            engine,
            config,
            normalizer,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan the image at `uri` for the requested formats
    pub fn scan_uri<S: AsRef<str>>(
        &self,
        uri: &str,
        request: Option<&[S]>,
    ) -> Result<Vec<BarcodeResult>> {
        let path = resolve_uri(uri)?;
        let formats = negotiate(request);
        let results = self.scan_path(&path, &formats)?;
        self.apply_empty_policy(results)
    }

    /// Scan a file for an already negotiated format set.
    ///
    /// The empty-result policy is not applied here.
    pub fn scan_path(&self, path: &Path, formats: &FormatSet) -> Result<Vec<BarcodeResult>> {
        let start = Instant::now();
        let (luma, extent) = load_luma(path, self.config.max_dimension)?;
        debug!(
            path = %path.display(),
            width = extent.original.0,
            height = extent.original.1,
            "image loaded"
        );
        let results = self.scan_luma(&luma, extent, formats)?;
        debug!(
            path = %path.display(),
            found = results.len(),
            elapsed = ?start.elapsed(),
            "image scanned"
        );
        Ok(results)
    }

    /// Run the engine on prepared luma and normalize its output
    pub fn scan_luma(
        &self,
        luma: &LumaImage,
        extent: Extent,
        formats: &FormatSet,
    ) -> Result<Vec<BarcodeResult>> {
        let detections = self.engine.detect(luma, formats)?;
        Ok(self.normalizer.normalize(&detections, extent))
    }

    /// Scan either kind of target with still-image error semantics
    pub fn scan_target<S: AsRef<str>>(
        &self,
        target: &ScanTarget<'_>,
        request: Option<&[S]>,
    ) -> Result<Vec<BarcodeResult>> {
        match target {
            ScanTarget::Uri(uri) => self.scan_uri(uri, request),
            ScanTarget::Frame(frame) => {
                let formats = negotiate(request);
                let luma = frame_to_upright_luma(frame)?;
                let extent = Extent::same(luma.width, luma.height);
                let results = self.scan_luma(&luma, extent, &formats)?;
                self.apply_empty_policy(results)
            }
        }
    }

    fn apply_empty_policy(&self, results: Vec<BarcodeResult>) -> Result<Vec<BarcodeResult>> {
        if results.is_empty() && self.config.empty_results == EmptyResultPolicy::Reject {
            return Err(ScanError::NoResults);
        }
        Ok(results)
    }
}

/// A live-frame scanning session with a fixed format selector
#[derive(Debug, Clone)]
pub struct ScanSession<E = ZxingEngine> {
    engine: E,
    formats: FormatSet,
    normalizer: Normalizer,
}

impl<E: BarcodeEngine> ScanSession<E> {
    /// Negotiate formats once for the lifetime of the session
    pub fn new<S: AsRef<str>>(engine: E, request: Option<&[S]>, config: &ScannerConfig) -> Self {
        let formats = negotiate(request);
        debug!(engine = engine.name(), formats = ?formats, "frame session configured");
        Self {
            engine,
            formats,
            normalizer: Normalizer::from_config(config),
        }
    }

    /// Formats this session decodes
    pub fn formats(&self) -> FormatSet {
        self.formats
    }

    /// Scan one frame, reporting failures
    pub fn try_scan_frame(&self, frame: &Frame<'_>) -> Result<Vec<BarcodeResult>> {
        let luma = frame_to_upright_luma(frame)?;
        let extent = Extent::same(luma.width, luma.height);
        let detections = self.engine.detect(&luma, &self.formats)?;
        Ok(self.normalizer.normalize(&detections, extent))
    }

    /// Scan one frame. Any failure is logged and yields no results.
    pub fn scan_frame(&self, frame: &Frame<'_>) -> Vec<BarcodeResult> {
        match self.try_scan_frame(frame) {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, "frame dropped");
                Vec::new()
            }
        }
    }
}
