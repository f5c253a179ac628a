// THEORY:
// `PixelBuffer` is the immutable input value of an analysis: a width, a height
// and exactly `width * height` row-major pixels. Every constructor validates the
// geometry up front, so code downstream of a `PixelBuffer` never has to ask
// whether the image has area or whether the pixel count matches.
//
// Sources come in three shapes: already-built `Pixel`s, flat RGBA bytes (the
// shape camera frames and canvases hand out) and flat RGB bytes. Decoded images
// from the `image` crate are normalised to RGBA first.

use crate::core_modules::pixel::pixel::Pixel;
use crate::error::AnalysisError;

const RGBA_CHANNELS: usize = 4;
const RGB_CHANNELS: usize = 3;

/// An immutable, validated, row-major image.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, AnalysisError> {
        let expected = Self::checked_area(width, height, pixels.is_empty())?;
        if pixels.len() != expected {
            return Err(AnalysisError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer from flat RGBA bytes (4 per pixel).
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, AnalysisError> {
        Self::from_bytes::<RGBA_CHANNELS>(width, height, bytes)
    }

    /// Builds a buffer from flat RGB bytes (3 per pixel); alpha is set opaque.
    pub fn from_rgb(width: u32, height: u32, bytes: &[u8]) -> Result<Self, AnalysisError> {
        Self::from_bytes::<RGB_CHANNELS>(width, height, bytes)
    }

    pub fn from_image(image: &image::DynamicImage) -> Result<Self, AnalysisError> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.as_raw())
    }

    /// A buffer where every pixel has the same colour.
    pub fn uniform(width: u32, height: u32, pixel: Pixel) -> Result<Self, AnalysisError> {
        let area = Self::checked_area(width, height, false)?;
        Self::from_pixels(width, height, vec![pixel; area])
    }

    fn from_bytes<const N: usize>(width: u32, height: u32, bytes: &[u8]) -> Result<Self, AnalysisError>
    where
        Pixel: From<[u8; N]>,
    {
        let expected = Self::checked_area(width, height, bytes.is_empty())? * N;
        if bytes.len() != expected {
            return Err(AnalysisError::BufferLength {
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(N)
            .map(|chunk| {
                let mut channels = [0u8; N];
                channels.copy_from_slice(chunk);
                Pixel::from(channels)
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn checked_area(width: u32, height: u32, source_empty: bool) -> Result<usize, AnalysisError> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidGeometry { width, height });
        }
        if source_empty {
            return Err(AnalysisError::EmptyPixels);
        }
        Ok(width as usize * height as usize)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`. Callers stay inside `width`/`height`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &Pixel {
        &self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// The slice of row `y` covering columns `x_start..x_end`.
    #[inline]
    pub fn row_span(&self, y: u32, x_start: u32, x_end: u32) -> &[Pixel] {
        let row = y as usize * self.width as usize;
        &self.pixels[row + x_start as usize..row + x_end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_bytes_map_to_row_major_pixels() {
        let bytes = [
            1, 2, 3, 255, 4, 5, 6, 255, //
            7, 8, 9, 255, 10, 11, 12, 0,
        ];
        let buffer = PixelBuffer::from_rgba(2, 2, &bytes).unwrap();
        assert_eq!(buffer.pixel(1, 0), &Pixel::new(4, 5, 6, 255));
        assert_eq!(buffer.pixel(1, 1), &Pixel::new(10, 11, 12, 0));
        assert_eq!(buffer.row_span(1, 0, 2).len(), 2);
    }

    #[test]
    fn rgb_bytes_are_opaque() {
        let buffer = PixelBuffer::from_rgb(1, 2, &[9, 9, 9, 1, 2, 3]).unwrap();
        assert_eq!(buffer.pixel(0, 1), &Pixel::new(1, 2, 3, 255));
    }

    #[test]
    fn zero_width_is_invalid_geometry() {
        let err = PixelBuffer::from_rgba(0, 10, &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidGeometry { width: 0, height: 10 }));
    }

    #[test]
    fn zero_height_is_invalid_geometry() {
        let err = PixelBuffer::uniform(5, 0, Pixel::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidGeometry { .. }));
    }

    #[test]
    fn empty_pixels_with_area_are_rejected() {
        let err = PixelBuffer::from_pixels(2, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyPixels));
    }

    #[test]
    fn short_buffers_report_lengths() {
        let err = PixelBuffer::from_rgba(2, 2, &[0u8; 12]).unwrap_err();
        match err {
            AnalysisError::BufferLength { expected, actual } => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decoded_images_keep_dimensions() {
        let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            3,
            2,
            image::Rgb([200, 100, 50]),
        ));
        let buffer = PixelBuffer::from_image(&image).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (3, 2));
        assert_eq!(buffer.pixel(2, 1), &Pixel::rgb(200, 100, 50));
    }
}
