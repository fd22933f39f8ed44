//! Core data structures shared by the scanner, normalizer and bridge

pub mod bounds;
pub mod frame;
pub mod point;
pub mod result;

pub use bounds::{Bounds, CoordinateSpace, Origin, Rect};
pub use frame::{Frame, Orientation, PixelFormat, ScanTarget};
pub use point::Point;
pub use result::BarcodeResult;
