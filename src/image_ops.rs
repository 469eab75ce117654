//! Frame post-processing: resizing, half splitting and JPEG output.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::error::FunscriptError;

/// JPEG quality used for every written image.
pub const JPEG_QUALITY: u8 = 95;

/// Resize `image` to `width` pixels wide, preserving its aspect ratio.
///
/// The height is rounded to the nearest pixel and never drops below 1. An
/// image that already has the requested width is returned as is.
///
/// ```
/// use funscript_frames::image_ops::resize_to_width;
/// use image::{DynamicImage, RgbImage};
///
/// let frame = DynamicImage::ImageRgb8(RgbImage::new(1920, 1080));
/// let resized = resize_to_width(&frame, 600);
/// assert_eq!((resized.width(), resized.height()), (600, 338));
/// ```
pub fn resize_to_width(image: &DynamicImage, width: u32) -> DynamicImage {
    let (source_width, source_height) = (image.width(), image.height());
    if width == 0 || source_width == 0 || width == source_width {
        return image.clone();
    }
    let ratio = width as f64 / source_width as f64;
    let height = ((source_height as f64 * ratio).round() as u32).max(1);
    image.resize_exact(width, height, FilterType::Triangle)
}

/// Split `image` vertically into equal left and right halves.
///
/// For an odd width the middle column is dropped so both halves have the
/// same size.
pub fn split_vertical(image: &DynamicImage) -> (DynamicImage, DynamicImage) {
    let half = image.width() / 2;
    let height = image.height();
    let left = image.crop_imm(0, 0, half, height);
    let right = image.crop_imm(image.width() - half, 0, half, height);
    (left, right)
}

/// Encode `image` as an RGB JPEG into `writer`.
///
/// Frames are normalised to 8-bit RGB first, the channel order JPEG
/// encoders expect.
pub fn encode_jpeg<W: Write>(image: &DynamicImage, writer: W) -> Result<(), FunscriptError> {
    let rgb = image.to_rgb8();
    let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;
    Ok(())
}

/// Write `image` to `path` as a JPEG, replacing any existing file.
pub fn save_jpeg<P: AsRef<Path>>(image: &DynamicImage, path: P) -> Result<(), FunscriptError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    encode_jpeg(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

