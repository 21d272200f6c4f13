use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, GenericImageView, GrayImage, ImageFormat, ImageReader};

use crate::config::OcrConfig;
use crate::error::{Result, WcrackError};

/// Prepares screenshot bytes for recognition: dimension checks, downscaling,
/// grayscale and a contrast stretch. Returns PNG bytes.
pub fn preprocess_image(bytes: &[u8], config: &OcrConfig) -> Result<Vec<u8>> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| WcrackError::Ocr(format!("Failed to read image: {e}")))?
        .decode()
        .map_err(|e| WcrackError::Ocr(format!("Failed to decode image: {e}")))?;

    let (width, height) = img.dimensions();
    if width < config.min_image_dimension || height < config.min_image_dimension {
        return Err(WcrackError::Ocr(format!(
            "Image too small: {}x{}, minimum {}x{}",
            width, height, config.min_image_dimension, config.min_image_dimension
        )));
    }

    let gray = stretch_contrast(downscale(img, config.max_image_dimension).to_luma8());

    let mut output = Vec::new();
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| WcrackError::Ocr(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

fn downscale(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_dim && height <= max_dim {
        return img;
    }
    // resize keeps the aspect ratio and fits within the bounds
    img.resize(max_dim, max_dim, FilterType::Lanczos3)
}

/// Maps the darkest pixel to 0 and the lightest to 255.
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (min, max) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));

    if max <= min {
        return gray;
    }

    let range = f32::from(max - min);
    let mut out = gray;
    for pixel in out.pixels_mut() {
        pixel[0] = (f32::from(pixel[0] - min) / range * 255.0).round() as u8;
    }
    out
}
