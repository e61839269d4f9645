// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Threshold segmentation — luma grayscale conversion, Otsu level selection and
// the six pointwise threshold rules.

use fixel_core::error::{FixelError, Result};
use fixel_core::{Image, ThresholdRule};
use tracing::{debug, info, instrument};

// BT.601 luma weights in 14-bit fixed point; they sum to 1 << 14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Segment `image` against `threshold` using `rule`, returning a
/// single-channel image.
///
/// Color input is converted to grayscale first. `threshold` and `max_value`
/// must both lie in `0..=255`. A pixel exactly equal to the threshold counts
/// as "not above" it. With [`ThresholdRule::BinaryOtsu`] the threshold is
/// replaced by [`otsu_level`] and only `max_value` is used.
#[instrument(skip(image), fields(width = image.width(), height = image.height(), channels = image.channels()))]
pub fn apply_threshold(
    image: &Image,
    threshold: i32,
    max_value: i32,
    rule: ThresholdRule,
) -> Result<Image> {
    let threshold = intensity_param("threshold value", threshold)?;
    let max_value = intensity_param("max value", max_value)?;
    info!(%rule, threshold, max_value, "Applying threshold");

    let gray = to_grayscale(image)?;
    let level = match rule {
        ThresholdRule::BinaryOtsu => {
            let level = otsu_level(&gray)?;
            debug!(level, ignored = threshold, "Otsu level computed");
            level
        }
        _ => threshold,
    };

    Ok(gray.map_samples(|r| classify(rule, r, level, max_value)))
}

/// Convert to single-channel luma.
///
/// One-channel input is returned as is. Three-channel RGB input is combined
/// with the BT.601 weights `0.299 R + 0.587 G + 0.114 B`, rounded. Any other
/// channel count is `UnsupportedFormat`.
pub fn to_grayscale(image: &Image) -> Result<Image> {
    match image.channels() {
        1 => Ok(image.clone()),
        3 => {
            let data = image
                .as_raw()
                .chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect();
            Image::gray(image.width(), image.height(), data)
        }
        n => Err(FixelError::UnsupportedFormat(format!(
            "grayscale conversion needs 1 or 3 channels, image has {n}"
        ))),
    }
}

/// Otsu's threshold for a single-channel image.
///
/// Picks the level `k` that maximises the between-class variance of the
/// classes `0..=k` and `k+1..=255`, which is the same as minimising the
/// intra-class variance. An image with a single intensity (or no pixels at
/// all) yields 0.
pub fn otsu_level(gray: &Image) -> Result<u8> {
    if gray.channels() != 1 {
        return Err(FixelError::UnsupportedFormat(format!(
            "Otsu needs a single-channel image, got {} channels",
            gray.channels()
        )));
    }

    let mut histogram = [0u64; 256];
    for &v in gray.as_raw() {
        histogram[v as usize] += 1;
    }

    let total_pixels = gray.pixel_count() as u64;
    if total_pixels == 0 {
        return Ok(0);
    }

    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0f64;
    let mut weight_background = 0u64;
    let mut max_variance = 0.0f64;
    let mut best_level = 0u8;

    for (t, &count) in histogram.iter().enumerate() {
        weight_background += count;
        if weight_background == 0 {
            continue;
        }
        let weight_foreground = total_pixels - weight_background;
        if weight_foreground == 0 {
            break;
        }

        sum_background += t as f64 * count as f64;
        let mean_background = sum_background / weight_background as f64;
        let mean_foreground = (sum_total - sum_background) / weight_foreground as f64;

        let between_variance = weight_background as f64
            * weight_foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if between_variance > max_variance {
            max_variance = between_variance;
            best_level = t as u8;
        }
    }

    Ok(best_level)
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

fn classify(rule: ThresholdRule, r: u8, threshold: u8, max_value: u8) -> u8 {
    let above = r > threshold;
    match rule {
        ThresholdRule::Binary | ThresholdRule::BinaryOtsu => {
            if above { max_value } else { 0 }
        }
        ThresholdRule::BinaryInverse => {
            if above { 0 } else { max_value }
        }
        ThresholdRule::Truncate => {
            if above { max_value } else { r }
        }
        ThresholdRule::ToZero => {
            if above { r } else { 0 }
        }
        ThresholdRule::ToZeroInverse => {
            if above { 0 } else { r }
        }
    }
}

fn intensity_param(name: &str, value: i32) -> Result<u8> {
    u8::try_from(value).map_err(|_| {
        FixelError::InvalidParameter(format!("{name} must be in 0..=255, got {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[u8]) -> Image {
        Image::gray(values.len() as u32, 1, values.to_vec()).unwrap()
    }

    #[test]
    fn to_zero_zeroes_values_not_above_threshold() {
        let out = apply_threshold(&row(&[50, 100, 150]), 100, 255, ThresholdRule::ToZero).unwrap();
        assert_eq!(out.as_raw(), &[0, 0, 150]);
    }

    #[test]
    fn each_rule_on_a_ramp() {
        let img = row(&[0, 99, 100, 101, 255]);
        let cases = [
            (ThresholdRule::Binary, [0u8, 0, 0, 200, 200]),
            (ThresholdRule::BinaryInverse, [200, 200, 200, 0, 0]),
            (ThresholdRule::Truncate, [0, 99, 100, 200, 200]),
            (ThresholdRule::ToZero, [0, 0, 0, 101, 255]),
            (ThresholdRule::ToZeroInverse, [0, 99, 100, 0, 0]),
        ];
        for (rule, expected) in cases {
            let out = apply_threshold(&img, 100, 200, rule).unwrap();
            assert_eq!(out.as_raw(), &expected, "rule {rule}");
        }
    }

    #[test]
    fn color_input_is_converted_first() {
        let img = Image::new(3, 1, 3, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]).unwrap();
        let gray = to_grayscale(&img).unwrap();
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.as_raw(), &[76, 150, 29]);

        let out = apply_threshold(&img, 100, 255, ThresholdRule::Binary).unwrap();
        assert_eq!(out.channels(), 1);
        assert_eq!(out.as_raw(), &[0, 255, 0]);
    }

    #[test]
    fn grayscale_of_white_and_grey_is_exact() {
        let img = Image::new(2, 1, 3, vec![255, 255, 255, 90, 90, 90]).unwrap();
        assert_eq!(to_grayscale(&img).unwrap().as_raw(), &[255, 90]);
    }

    #[test]
    fn unsupported_channel_counts() {
        let rgba = Image::from_pixel(2, 2, &[1, 2, 3, 255]).unwrap();
        assert!(matches!(
            apply_threshold(&rgba, 100, 255, ThresholdRule::Binary),
            Err(FixelError::UnsupportedFormat(_))
        ));
        let gray_alpha = Image::from_pixel(2, 2, &[1, 255]).unwrap();
        assert!(matches!(
            to_grayscale(&gray_alpha),
            Err(FixelError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let img = row(&[1, 2, 3]);
        for (t, m) in [(-1, 255), (256, 255), (100, -5), (100, 300)] {
            assert!(matches!(
                apply_threshold(&img, t, m, ThresholdRule::Binary),
                Err(FixelError::InvalidParameter(_))
            ));
        }
        // Still validated even though Otsu ignores it.
        assert!(apply_threshold(&img, 999, 255, ThresholdRule::BinaryOtsu).is_err());
    }

    #[test]
    fn otsu_splits_two_levels() {
        let mut values = vec![40u8; 50];
        values.extend(std::iter::repeat_n(200u8, 50));
        let img = row(&values);

        let level = otsu_level(&img).unwrap();
        assert!((40..200).contains(&level), "level {level}");

        let out = apply_threshold(&img, 250, 180, ThresholdRule::BinaryOtsu).unwrap();
        assert!(out.as_raw()[..50].iter().all(|&v| v == 0));
        assert!(out.as_raw()[50..].iter().all(|&v| v == 180));
    }

    #[test]
    fn otsu_on_uniform_or_empty_image_is_zero() {
        assert_eq!(otsu_level(&row(&[77; 10])).unwrap(), 0);
        assert_eq!(otsu_level(&Image::gray(0, 0, Vec::new()).unwrap()).unwrap(), 0);
    }

    #[test]
    fn otsu_requires_single_channel() {
        let rgb = Image::from_pixel(1, 1, &[1, 2, 3]).unwrap();
        assert!(otsu_level(&rgb).is_err());
    }
}
