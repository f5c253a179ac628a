pub mod image_helper {
    use crate::core_modules::pixel_buffer::PixelBuffer;
    use crate::error::AnalysisError;
    use std::path::Path;

    /// Decodes an image file (format guessed from its contents) into a buffer.
    pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer, AnalysisError> {
        let image = image::ImageReader::open(path.as_ref())
            .map_err(image::ImageError::IoError)?
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .decode()?;

        PixelBuffer::from_image(&image)
    }

    /// Decodes an in-memory encoded image (PNG, JPEG, ...) into a buffer.
    pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, AnalysisError> {
        let image = image::load_from_memory(bytes)?;
        PixelBuffer::from_image(&image)
    }
}

#[cfg(test)]
mod tests {

    use super::image_helper::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::error::AnalysisError;
    use std::io::Cursor;

    fn encode_png(image: image::RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("Error Encoding File.");
        bytes
    }

    #[test]
    fn decode_gradient_file() {
        let (width, height) = (40u32, 30u32);
        let image = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 6) as u8, (y * 8) as u8, 128, 255])
        });

        let buffer = decode(&encode_png(image)).expect("Error Decoding File.");

        assert_eq!((buffer.width(), buffer.height()), (width, height));
        assert_eq!(buffer.pixel(10, 5), &Pixel::new(60, 40, 128, 255));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[test]
    fn load_reports_missing_files() {
        let err = load("no/such/file.png").unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }
}
