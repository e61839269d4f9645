// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// fixel-transform — the image transforms behind Fixel.
//
// Provides pointwise intensity transforms (power-law gamma, linear negative),
// thresholding (six rules, including Otsu), binary morphology with a flat
// square structuring element, and the codec used to get images in and out.

pub mod codec;
pub mod enhancement;
pub mod intensity;
pub mod morphology;
pub mod threshold;

// Re-export the four operations so callers can use `fixel_transform::apply_gamma` etc.
pub use enhancement::Enhancement;
pub use intensity::{IntensityTransform, apply_gamma, apply_intensity, apply_negative};
pub use morphology::apply_morphology;
pub use threshold::{apply_threshold, otsu_level, to_grayscale};
