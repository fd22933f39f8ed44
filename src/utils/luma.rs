//! Frame to luminance conversion
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
//!
//! Rows are independent, so frames at or above `PARALLEL_MIN_PIXELS` are
//! converted row-parallel with rayon.

use rayon::prelude::*;

use crate::error::ScanError;
use crate::models::{Frame, Orientation, PixelFormat};

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Below this many pixels the rayon split costs more than it saves
const PARALLEL_MIN_PIXELS: usize = 640 * 480;

/// Tightly packed 8-bit luminance image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaImage {
    /// Row-major pixels, `width * height` bytes
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl LumaImage {
    /// Wrap a packed buffer, checking its length
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, ScanError> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(ScanError::ImageConversion(format!(
                "luma buffer of {} bytes does not match {}x{}",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Pixel at (x, y), `None` outside the image
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8).min(255) as u8
}

fn convert_row(src: &[u8], dst: &mut [u8], format: PixelFormat) {
    match format {
        PixelFormat::Luma8 | PixelFormat::Nv21 | PixelFormat::Yuv420 => {
            dst.copy_from_slice(&src[..dst.len()]);
        }
        PixelFormat::Rgb8 => {
            for (out, px) in dst.iter_mut().zip(src.chunks_exact(3)) {
                *out = luminance(px[0], px[1], px[2]);
            }
        }
        PixelFormat::Rgba8 => {
            for (out, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
                *out = luminance(px[0], px[1], px[2]);
            }
        }
        PixelFormat::Bgra8 => {
            for (out, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
                *out = luminance(px[2], px[1], px[0]);
            }
        }
    }
}

/// Extract the luminance of a frame, honouring its stride.
///
/// The result is in buffer orientation; see [`rotate_upright`].
pub fn frame_to_luma(frame: &Frame<'_>) -> Result<LumaImage, ScanError> {
    frame.validate()?;

    let width = frame.width as usize;
    let height = frame.height as usize;
    let stride = frame.bytes_per_row;
    let row_bytes = width * frame.pixel_format.bytes_per_pixel();
    let format = frame.pixel_format;
    let data = frame.data;

    let mut luma = vec![0u8; width * height];
    let convert = |(y, dst): (usize, &mut [u8])| {
        let start = y * stride;
        convert_row(&data[start..start + row_bytes], dst, format);
    };

    if width * height >= PARALLEL_MIN_PIXELS {
        luma.par_chunks_mut(width).enumerate().for_each(convert);
    } else {
        luma.chunks_mut(width).enumerate().for_each(convert);
    }

    LumaImage::new(luma, frame.width, frame.height)
}

/// Rotate a luma image clockwise by `orientation`
pub fn rotate_upright(image: LumaImage, orientation: Orientation) -> LumaImage {
    let (w, h) = (image.width as usize, image.height as usize);
    let src = &image.pixels;
    match orientation {
        Orientation::Up => image,
        Orientation::Down => {
            let mut pixels = src.clone();
            pixels.reverse();
            LumaImage {
                pixels,
                width: image.width,
                height: image.height,
            }
        }
        Orientation::Right | Orientation::Left => {
            // Output is h wide and w tall.
            let mut pixels = vec![0u8; w * h];
            for y in 0..h {
                for x in 0..w {
                    let (nx, ny) = if orientation == Orientation::Right {
                        (h - 1 - y, x)
                    } else {
                        (y, w - 1 - x)
                    };
                    pixels[ny * h + nx] = src[y * w + x];
                }
            }
            LumaImage {
                pixels,
                width: image.height,
                height: image.width,
            }
        }
    }
}

/// Luma image of a frame, rotated upright
pub fn frame_to_upright_luma(frame: &Frame<'_>) -> Result<LumaImage, ScanError> {
    frame_to_luma(frame).map(|luma| rotate_upright(luma, frame.orientation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_luma() {
        // white, black, red, green
        let rgb = vec![255, 255, 255, 0, 0, 0, 255, 0, 0, 0, 255, 0];
        let frame = Frame::new(&rgb, 2, 2, PixelFormat::Rgb8);
        let luma = frame_to_luma(&frame).unwrap();
        assert!(luma.pixels[0] >= 254);
        assert_eq!(luma.pixels[1], 0);
        assert!(luma.pixels[2] > 0 && luma.pixels[2] < 255);
        assert!(luma.pixels[3] > 100);
    }

    #[test]
    fn test_bgra_matches_rgba() {
        let rgba = vec![200, 100, 50, 255];
        let bgra = vec![50, 100, 200, 255];
        let a = frame_to_luma(&Frame::new(&rgba, 1, 1, PixelFormat::Rgba8)).unwrap();
        let b = frame_to_luma(&Frame::new(&bgra, 1, 1, PixelFormat::Bgra8)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nv21_uses_y_plane_and_stride() {
        // 2x2 Y plane with stride 3, followed by a VU plane.
        let data = vec![10, 20, 99, 30, 40, 99, 128, 128];
        let frame = Frame::new(&data, 2, 2, PixelFormat::Nv21).with_stride(3);
        let luma = frame_to_luma(&frame).unwrap();
        assert_eq!(luma.pixels, vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_large_frame_parallel_path() {
        let data = vec![7u8; 800 * 600];
        let luma = frame_to_luma(&Frame::new(&data, 800, 600, PixelFormat::Luma8)).unwrap();
        assert_eq!(luma.pixels.len(), 800 * 600);
        assert!(luma.pixels.iter().all(|&p| p == 7));
    }

    #[test]
    fn test_rotations() {
        // 1 2 3
        // 4 5 6
        let image = LumaImage::new(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();

        assert_eq!(image.get(2, 1), Some(6));
        assert_eq!(image.get(3, 0), None);
        assert_eq!(image.get(0, 2), None);

        let right = rotate_upright(image.clone(), Orientation::Right);
        assert_eq!((right.width, right.height), (2, 3));
        assert_eq!(right.pixels, vec![4, 1, 5, 2, 6, 3]);
        assert_eq!(right.get(1, 0), Some(1));

        let left = rotate_upright(image.clone(), Orientation::Left);
        assert_eq!(left.pixels, vec![3, 6, 2, 5, 1, 4]);

        let down = rotate_upright(image.clone(), Orientation::Down);
        assert_eq!(down.pixels, vec![6, 5, 4, 3, 2, 1]);

        assert_eq!(rotate_upright(image.clone(), Orientation::Up), image);
    }

    #[test]
    fn test_luma_image_length_check() {
        assert!(LumaImage::new(vec![0; 5], 3, 2).is_err());
        assert!(LumaImage::new(vec![], 0, 0).is_err());
    }
}
