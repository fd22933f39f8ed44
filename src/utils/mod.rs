//! Utility functions for pixel handling
//!
//! - Luminance extraction from camera frame layouts (RGB, RGBA, BGRA, YUV)
//! - Upright rotation of luma buffers

pub mod luma;

pub use luma::LumaImage;
