//! Host-facing surface
//!
//! Still images go through [`ImageScannerModule`], an async call that
//! resolves to a list of results or rejects with an [`ErrorCode`]. Live
//! video goes through [`FrameProcessorPlugin`], a per-frame callback that
//! never fails.

pub mod frame_processor;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::ScannerConfig;
use crate::engine::{BarcodeEngine, ZxingEngine};
use crate::error::{ErrorCode, ScanError};
use crate::models::BarcodeResult;
use crate::scanner::Scanner;

pub use frame_processor::FrameProcessorPlugin;

/// A categorized rejection
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct BridgeError {
    /// Category
    pub code: ErrorCode,
    /// Human-readable message including the underlying cause
    pub message: String,
}

impl From<ScanError> for BridgeError {
    fn from(err: ScanError) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            code: err.code(),
            message,
        }
    }
}

/// The host's promise for one call; settles exactly once
pub trait Promise: Send + 'static {
    /// Fulfil with results
    fn resolve(self, results: Vec<BarcodeResult>);

    /// Reject with a category and message
    fn reject(self, code: ErrorCode, message: String);
}

impl Promise for oneshot::Sender<Result<Vec<BarcodeResult>, BridgeError>> {
    fn resolve(self, results: Vec<BarcodeResult>) {
        // The receiver may have gone away; nothing to report to.
        let _ = self.send(Ok(results));
    }

    fn reject(self, code: ErrorCode, message: String) {
        let _ = self.send(Err(BridgeError { code, message }));
    }
}

/// Still-image scanning module
#[derive(Debug)]
pub struct ImageScannerModule<E = ZxingEngine> {
    scanner: Arc<Scanner<E>>,
}

impl<E> Clone for ImageScannerModule<E> {
    fn clone(&self) -> Self {
        Self {
            scanner: Arc::clone(&self.scanner),
        }
    }
}

impl ImageScannerModule<ZxingEngine> {
    /// Module backed by the `rxing` engine
    pub fn new(config: ScannerConfig) -> Self {
        Self::with_scanner(Scanner::new(config))
    }
}

impl Default for ImageScannerModule<ZxingEngine> {
    fn default() -> Self {
        Self::new(ScannerConfig::from_env())
    }
}

impl<E: BarcodeEngine + 'static> ImageScannerModule<E> {
    /// Name the module registers under
    pub const NAME: &'static str = "ImageScanner";

    /// Wrap an existing scanner
    pub fn with_scanner(scanner: Scanner<E>) -> Self {
        Self {
            scanner: Arc::new(scanner),
        }
    }

    /// Scan the image at `uri`.
    ///
    /// The decode runs on a blocking worker; the caller's task is suspended
    /// until it finishes. There is no cancellation.
    pub async fn process(
        &self,
        uri: String,
        options: Option<Vec<String>>,
    ) -> Result<Vec<BarcodeResult>, BridgeError> {
        debug!(uri = %uri, options = ?options, "process called");
        let scanner = Arc::clone(&self.scanner);
        let task = tokio::task::spawn_blocking(move || scanner.scan_uri(&uri, options.as_deref()));

        let outcome = match task.await {
            Ok(result) => result,
            Err(join) => Err(ScanError::Worker(join.to_string())),
        };
        outcome.map_err(BridgeError::from)
    }

    /// Scan on `runtime` and settle `promise` when done
    pub fn process_with_promise<P: Promise>(
        &self,
        runtime: &Handle,
        uri: String,
        options: Option<Vec<String>>,
        promise: P,
    ) -> JoinHandle<()> {
        let module = self.clone();
        runtime.spawn(async move {
            match module.process(uri, options).await {
                Ok(results) => promise.resolve(results),
                Err(err) => promise.reject(err.code, err.message),
            }
        })
    }
}
