// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Morphological operations with a flat square structuring element.
//
// Erosion and dilation are min and max filters over a `k x k` window, applied
// to each channel independently. On a binary (0 / foreground) image this is
// the set definition: erosion keeps a pixel only if the whole window is
// foreground, dilation sets it if any pixel in the window is. Samples outside
// the image count as background (0).

use fixel_core::error::{FixelError, Result};
use fixel_core::{Image, MorphOp};
use tracing::{debug, info, instrument, warn};

/// Apply `operation` with a `kernel_size x kernel_size` square element.
///
/// `kernel_size` must be odd and at least 1. Erosion and dilation are
/// repeated `iterations` times (at least 1). Opening and closing are always a
/// single erosion/dilation pair and ignore `iterations`.
#[instrument(skip(image), fields(width = image.width(), height = image.height(), channels = image.channels()))]
pub fn apply_morphology(
    image: &Image,
    operation: MorphOp,
    kernel_size: u32,
    iterations: u32,
) -> Result<Image> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(FixelError::InvalidParameter(format!(
            "kernel size must be an odd number of at least 1, got {kernel_size}"
        )));
    }
    if operation.uses_iterations() && iterations == 0 {
        return Err(FixelError::InvalidParameter(format!(
            "{operation} needs at least one iteration"
        )));
    }
    if !operation.uses_iterations() && iterations != 1 {
        warn!(iterations, "{operation} is a single pass; iteration count ignored");
    }

    let radius = kernel_size / 2;
    info!(%operation, kernel_size, "Applying morphological operation");
    debug!(radius, "Structuring element radius");

    match operation {
        MorphOp::Erosion => repeat(image, iterations, |img| erode(img, radius)),
        MorphOp::Dilation => repeat(image, iterations, |img| dilate(img, radius)),
        MorphOp::Opening => dilate(&erode(image, radius)?, radius),
        MorphOp::Closing => erode(&dilate(image, radius)?, radius),
    }
}

fn repeat(image: &Image, times: u32, pass: impl Fn(&Image) -> Result<Image>) -> Result<Image> {
    let mut current = pass(image)?;
    for _ in 1..times {
        current = pass(&current)?;
    }
    Ok(current)
}

#[derive(Debug, Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn erode(image: &Image, radius: u32) -> Result<Image> {
    window_filter(image, radius, Extremum::Min)
}

fn dilate(image: &Image, radius: u32) -> Result<Image> {
    window_filter(image, radius, Extremum::Max)
}

/// Square-window min/max filter, run as a horizontal then a vertical 1-D
/// pass. Exact for a flat rectangle with a zero border: a window that leaves
/// the image in either direction sees a 0 in one of the two passes.
fn window_filter(image: &Image, radius: u32, extremum: Extremum) -> Result<Image> {
    if radius == 0 {
        return Ok(image.clone());
    }
    let rows = line_filter(image.as_raw(), image, radius, extremum, Axis::Horizontal);
    let data = line_filter(&rows, image, radius, extremum, Axis::Vertical);
    Image::new(image.width(), image.height(), image.channels(), data)
}

fn line_filter(
    src: &[u8],
    shape: &Image,
    radius: u32,
    extremum: Extremum,
    axis: Axis,
) -> Vec<u8> {
    let width = shape.width() as usize;
    let height = shape.height() as usize;
    let channels = shape.channels() as usize;
    let radius = radius as usize;
    let mut out = vec![0u8; src.len()];

    let (extent, step) = match axis {
        Axis::Horizontal => (width, channels),
        Axis::Vertical => (height, width * channels),
    };

    for y in 0..height {
        for x in 0..width {
            let pos = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            let lo = pos.saturating_sub(radius);
            let hi = (pos + radius).min(extent - 1);
            let clipped = pos < radius || pos + radius >= extent;

            let base = (y * width + x) * channels;
            for c in 0..channels {
                let origin = base + c - pos * step;
                let mut acc = match extremum {
                    // A clipped window touches the zero border.
                    Extremum::Min if clipped => 0,
                    Extremum::Min => u8::MAX,
                    Extremum::Max => 0,
                };
                for i in lo..=hi {
                    let v = src[origin + i * step];
                    acc = match extremum {
                        Extremum::Min => acc.min(v),
                        Extremum::Max => acc.max(v),
                    };
                }
                out[base + c] = acc;
            }
        }
    }
    out
}
