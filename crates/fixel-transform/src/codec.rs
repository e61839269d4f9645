// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec — getting images in and out of Fixel. Decodes JPEG/PNG (anything the
// `image` crate reads) into an `Image`, encodes results as PNG, and builds the
// before/after comparison.

use fixel_core::Image;
use fixel_core::error::{FixelError, Result};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use tracing::{debug, info, instrument};

/// Decode raw encoded bytes (JPEG, PNG, etc.).
///
/// Gray sources decode to one channel, colour sources to RGB. Alpha is
/// discarded and samples wider than 8 bits are narrowed.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<Image> {
    let img = image::load_from_memory(data)
        .map_err(|err| FixelError::ImageError(format!("failed to decode image: {}", err)))?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    from_dynamic(img)
}

/// Load an image from a file path.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<std::path::Path>) -> Result<Image> {
    let img = image::open(path.as_ref()).map_err(|err| match err {
        image::ImageError::IoError(io) => FixelError::Io(io),
        other => FixelError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            other
        )),
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    from_dynamic(img)
}

/// Convert a decoded `DynamicImage` to gray or RGB, dropping any alpha channel.
pub fn from_dynamic(img: DynamicImage) -> Result<Image> {
    let (width, height) = (img.width(), img.height());
    let color = img.color();
    if color.has_alpha() {
        debug!(?color, "Alpha channel discarded");
    }
    let (channels, data) = if color.has_color() {
        (3, img.into_rgb8().into_raw())
    } else {
        (1, img.into_luma8().into_raw())
    };
    Image::new(width, height, channels, data)
}

/// Wrap an `Image` as a `DynamicImage` for encoding.
pub fn to_dynamic(image: &Image) -> Result<DynamicImage> {
    let (width, height) = image.dimensions();
    let data = image.as_raw().to_vec();
    let dynamic = match image.channels() {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(width, height, data).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
        n => {
            return Err(FixelError::UnsupportedFormat(format!(
                "cannot encode an image with {n} channels"
            )));
        }
    };
    dynamic.ok_or_else(|| {
        FixelError::DimensionMismatch {
            expected: image.pixel_count() * image.channels() as usize,
            actual: image.as_raw().len(),
        }
    })
}

/// Encode as PNG bytes.
pub fn encode_png(image: &Image) -> Result<Vec<u8>> {
    let dynamic = to_dynamic(image)?;
    encode_to_format(&dynamic, ImageFormat::Png)
}

/// Write the image as a PNG file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save_png(image: &Image, path: impl AsRef<std::path::Path>) -> Result<()> {
    let bytes = encode_png(image)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(bytes = bytes.len(), "PNG written");
    Ok(())
}

/// Place `original` and `processed` next to each other on a white RGB canvas.
///
/// The canvas is as wide as both images together and as tall as the taller
/// one. Alpha is dropped and gray images are expanded to RGB.
#[instrument(skip_all)]
pub fn side_by_side(original: &Image, processed: &Image) -> Result<Image> {
    let left = to_dynamic(original)?.to_rgb8();
    let right = to_dynamic(processed)?.to_rgb8();

    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    image::imageops::replace(&mut canvas, &left, 0, 0);
    image::imageops::replace(&mut canvas, &right, i64::from(left.width()), 0);

    debug!(width, height, "Comparison canvas composed");
    Image::new(width, height, 3, canvas.into_raw())
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| FixelError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}
