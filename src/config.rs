//! Scanner configuration
//!
//! Every knob has a default, an environment override and a `with_*` setter.

use crate::models::CoordinateSpace;

fn parse_env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
}

fn parse_env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name).as_deref().map(str::trim) {
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES") => true,
        Ok("0") | Ok("false") | Ok("FALSE") | Ok("no") | Ok("NO") => false,
        _ => default,
    }
}

fn parse_env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// What a still-image scan does when nothing is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyResultPolicy {
    /// Resolve with an empty list
    #[default]
    Resolve,
    /// Reject with `NO_RESULTS`
    Reject,
}

impl EmptyResultPolicy {
    /// Parse `"resolve"` / `"reject"`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resolve" | "empty" => Some(EmptyResultPolicy::Resolve),
            "reject" | "error" => Some(EmptyResultPolicy::Reject),
            _ => None,
        }
    }
}

/// Settings shared by still-image scans and frame sessions
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    /// Downscale still images whose longest side exceeds this
    pub max_dimension: Option<u32>,
    /// Ask the engine to spend more time per image
    pub try_harder: bool,
    /// Units of reported bounds
    pub coordinates: CoordinateSpace,
    /// Still-image behaviour when nothing is found
    pub empty_results: EmptyResultPolicy,
    /// Codepage label used to re-decode non-UTF-8 payloads
    pub text_encoding: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_dimension: None,
            try_harder: true,
            coordinates: CoordinateSpace::Pixels,
            empty_results: EmptyResultPolicy::Resolve,
            text_encoding: None,
        }
    }
}

impl ScannerConfig {
    /// Defaults overridden by `BARCODE_*` environment variables.
    ///
    /// * `BARCODE_MAX_DIM`: longest side in pixels, `0` disables
    /// * `BARCODE_TRY_HARDER`: `1`/`0`
    /// * `BARCODE_COORDINATES`: `pixels` or `normalized`
    /// * `BARCODE_EMPTY_RESULTS`: `resolve` or `reject`
    /// * `BARCODE_TEXT_ENCODING`: encoding label, e.g. `windows-1251`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_dimension: match parse_env_u32("BARCODE_MAX_DIM") {
                Some(0) => None,
                Some(v) => Some(v),
                None => defaults.max_dimension,
            },
            try_harder: parse_env_bool("BARCODE_TRY_HARDER", defaults.try_harder),
            coordinates: parse_env_string("BARCODE_COORDINATES")
                .and_then(|v| CoordinateSpace::parse(&v))
                .unwrap_or(defaults.coordinates),
            empty_results: parse_env_string("BARCODE_EMPTY_RESULTS")
                .and_then(|v| EmptyResultPolicy::parse(&v))
                .unwrap_or(defaults.empty_results),
            text_encoding: parse_env_string("BARCODE_TEXT_ENCODING").or(defaults.text_encoding),
        }
    }

    /// Set the downscale limit (`0` disables)
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = (max > 0).then_some(max);
        self
    }

    /// Toggle the engine's slow path
    pub fn with_try_harder(mut self, try_harder: bool) -> Self {
        self.try_harder = try_harder;
        self
    }

    /// Choose the units of reported bounds
    pub fn with_coordinates(mut self, coordinates: CoordinateSpace) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Choose the empty still-image policy
    pub fn with_empty_results(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_results = policy;
        self
    }

    /// Re-decode non-UTF-8 payloads with this encoding label
    pub fn with_text_encoding(mut self, label: impl Into<String>) -> Self {
        self.text_encoding = Some(label.into());
        self
    }
}
