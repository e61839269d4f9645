// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intensity transforms — power-law (gamma) curve and linear negative. Both map
// every sample independently, so they run through a 256-entry lookup table.

use fixel_core::error::{FixelError, Result};
use fixel_core::Image;
use tracing::{debug, info, instrument};

/// Pointwise intensity mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntensityTransform {
    /// `s = 255 * (r / 255) ^ gamma`.
    Gamma(f64),
    /// `s = 255 - r`.
    Negative,
}

/// Apply an intensity transform to every channel of `image`.
pub fn apply_intensity(image: &Image, transform: IntensityTransform) -> Result<Image> {
    match transform {
        IntensityTransform::Gamma(gamma) => apply_gamma(image, gamma),
        IntensityTransform::Negative => Ok(apply_negative(image)),
    }
}

/// Power-law transform `s = round(255 * (r / 255) ^ gamma)`.
///
/// Values below 1 brighten the image, values above 1 darken it, and exactly
/// 1 leaves every pixel unchanged. `gamma` must be finite and positive.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn apply_gamma(image: &Image, gamma: f64) -> Result<Image> {
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(FixelError::InvalidParameter(format!(
            "gamma must be a positive number, got {gamma}"
        )));
    }
    info!(gamma, "Applying power-law transform");

    let lut = gamma_lut(gamma);
    debug!(mid = lut[128], "Gamma lookup table built");
    Ok(image.map_samples(|r| lut[r as usize]))
}

/// Linear negative `s = 255 - r`. Applying it twice restores the input.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn apply_negative(image: &Image) -> Image {
    info!("Applying linear negative");
    image.map_samples(|r| 255 - r)
}

fn gamma_lut(gamma: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (r, slot) in lut.iter_mut().enumerate() {
        let s = 255.0 * (r as f64 / 255.0).powf(gamma);
        // Standard rounding, not truncation.
        *slot = s.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Image {
        Image::gray(256, 1, (0..=255u8).collect()).unwrap()
    }

    #[test]
    fn gamma_one_is_identity() {
        let img = ramp();
        assert_eq!(apply_gamma(&img, 1.0).unwrap(), img);
    }

    #[test]
    fn gamma_two_on_mid_grey() {
        let img = Image::gray(1, 1, vec![128]).unwrap();
        let out = apply_gamma(&img, 2.0).unwrap();
        let v = out.as_raw()[0] as i32;
        assert!((v - 64).abs() <= 1, "expected ~64, got {v}");
    }

    #[test]
    fn gamma_keeps_endpoints() {
        for gamma in [0.1, 0.5, 2.2, 5.0] {
            let out = apply_gamma(&ramp(), gamma).unwrap();
            assert_eq!(out.as_raw()[0], 0);
            assert_eq!(out.as_raw()[255], 255);
        }
    }

    #[test]
    fn gamma_rejects_non_positive_and_nan() {
        let img = ramp();
        for gamma in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                apply_gamma(&img, gamma),
                Err(FixelError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn gamma_accepts_values_outside_ui_range() {
        assert!(apply_gamma(&ramp(), 0.01).is_ok());
        assert!(apply_gamma(&ramp(), 12.0).is_ok());
    }

    #[test]
    fn negative_inverts_each_sample() {
        let img = Image::new(2, 1, 3, vec![0, 100, 255, 1, 2, 3]).unwrap();
        let out = apply_negative(&img);
        assert_eq!(out.as_raw(), &[255, 155, 0, 254, 253, 252]);
        assert_eq!(out.channels(), 3);
    }

    #[test]
    fn apply_intensity_dispatches() {
        let img = ramp();
        assert_eq!(
            apply_intensity(&img, IntensityTransform::Negative).unwrap(),
            apply_negative(&img)
        );
        assert!(apply_intensity(&img, IntensityTransform::Gamma(-2.0)).is_err());
    }
}
