//! Live camera frames and scan targets

use crate::error::ScanError;

/// Pixel layout of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit grayscale
    Luma8,
    /// Packed RGB, 3 bytes per pixel
    Rgb8,
    /// Packed RGBA, 4 bytes per pixel
    Rgba8,
    /// Packed BGRA, 4 bytes per pixel (iOS `32BGRA`)
    Bgra8,
    /// Semi-planar YUV 4:2:0 with interleaved VU (Android camera default)
    Nv21,
    /// Planar or bi-planar YUV 4:2:0 (`420f`, `420v`, `I420`)
    Yuv420,
}

impl PixelFormat {
    /// Bytes per pixel in the first (or only) plane
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Luma8 | PixelFormat::Nv21 | PixelFormat::Yuv420 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
        }
    }

    /// True when the first plane already holds luminance
    pub fn has_luma_plane(&self) -> bool {
        matches!(
            self,
            PixelFormat::Luma8 | PixelFormat::Nv21 | PixelFormat::Yuv420
        )
    }

    /// Parse a host pixel-format name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "luma" | "luma8" | "gray" | "grey" | "l8" => Some(PixelFormat::Luma8),
            "rgb" | "rgb8" => Some(PixelFormat::Rgb8),
            "rgba" | "rgba8" => Some(PixelFormat::Rgba8),
            "bgra" | "bgra8" | "32bgra" => Some(PixelFormat::Bgra8),
            "nv21" => Some(PixelFormat::Nv21),
            "yuv" | "yuv420" | "i420" | "nv12" | "420f" | "420v" => Some(PixelFormat::Yuv420),
            _ => None,
        }
    }
}

/// Clockwise rotation that brings a frame upright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Already upright
    #[default]
    Up,
    /// Rotate 90° clockwise
    Right,
    /// Rotate 180°
    Down,
    /// Rotate 270° clockwise
    Left,
}

impl Orientation {
    /// From a rotation in degrees; only right angles are accepted
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Orientation::Up),
            90 => Some(Orientation::Right),
            180 => Some(Orientation::Down),
            270 => Some(Orientation::Left),
            _ => None,
        }
    }

    /// From degrees or a camera orientation name such as `"landscape-right"`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase().replace('_', "-");
        match value.as_str() {
            "up" | "portrait" => Some(Orientation::Up),
            "right" | "landscape-right" => Some(Orientation::Right),
            "down" | "portrait-upside-down" => Some(Orientation::Down),
            "left" | "landscape-left" => Some(Orientation::Left),
            other => other.parse::<i32>().ok().and_then(Orientation::from_degrees),
        }
    }

    /// True when width and height swap after rotation
    pub fn is_transposed(&self) -> bool {
        matches!(self, Orientation::Right | Orientation::Left)
    }
}

/// A borrowed camera frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Raw pixel bytes, first plane first
    pub data: &'a [u8],
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Stride of the first plane in bytes
    pub bytes_per_row: usize,
    /// Pixel layout
    pub pixel_format: PixelFormat,
    /// Rotation needed to make the frame upright
    pub orientation: Orientation,
}

impl<'a> Frame<'a> {
    /// Tightly packed, upright frame
    pub fn new(data: &'a [u8], width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            bytes_per_row: width as usize * pixel_format.bytes_per_pixel(),
            pixel_format,
            orientation: Orientation::Up,
        }
    }

    /// Override the row stride
    pub fn with_stride(mut self, bytes_per_row: usize) -> Self {
        self.bytes_per_row = bytes_per_row;
        self
    }

    /// Override the orientation
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Dimensions after applying the orientation
    pub fn upright_size(&self) -> (u32, u32) {
        if self.orientation.is_transposed() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Check that the buffer is large enough for the declared geometry
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.width == 0 || self.height == 0 {
            return Err(ScanError::ImageConversion(format!(
                "frame has zero size ({}x{})",
                self.width, self.height
            )));
        }
        let row = (self.width as usize)
            .checked_mul(self.pixel_format.bytes_per_pixel())
            .ok_or_else(|| {
                ScanError::ImageConversion(format!("frame width {} overflows", self.width))
            })?;
        if self.bytes_per_row < row {
            return Err(ScanError::ImageConversion(format!(
                "stride {} is smaller than a {}-pixel row ({} bytes)",
                self.bytes_per_row, self.width, row
            )));
        }
        let needed = self
            .bytes_per_row
            .checked_mul(self.height as usize - 1)
            .and_then(|rows| rows.checked_add(row))
            .ok_or_else(|| {
                ScanError::ImageConversion(format!(
                    "stride {} x {} rows overflows",
                    self.bytes_per_row, self.height
                ))
            })?;
        if self.data.len() < needed {
            return Err(ScanError::ImageConversion(format!(
                "frame buffer holds {} bytes, need at least {}",
                self.data.len(),
                needed
            )));
        }
        Ok(())
    }
}

/// What a single scan call works on
#[derive(Debug, Clone)]
pub enum ScanTarget<'a> {
    /// Still image addressed by path or `file://` URI
    Uri(String),
    /// Live frame pixels
    Frame(Frame<'a>),
}
