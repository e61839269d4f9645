// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A single enhancement request: which technique, with which parameters.

use fixel_core::error::Result;
use fixel_core::{Image, MorphOp, ThresholdRule};
use tracing::{info, instrument};

use crate::intensity::{apply_gamma, apply_negative};
use crate::morphology::apply_morphology;
use crate::threshold::apply_threshold;

/// One of the four techniques together with its parameters.
///
/// ```
/// # use fixel_core::{Image, ThresholdRule};
/// # use fixel_transform::Enhancement;
/// # fn main() -> fixel_core::Result<()> {
/// let image = Image::gray(3, 1, vec![50, 100, 150])?;
/// let enhanced = Enhancement::Threshold {
///     threshold: 100,
///     max_value: 255,
///     rule: ThresholdRule::ToZero,
/// }
/// .apply(&image)?;
/// assert_eq!(enhanced.as_raw(), &[0, 0, 150]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Enhancement {
    PowerLaw {
        gamma: f64,
    },
    Negative,
    Threshold {
        threshold: i32,
        max_value: i32,
        rule: ThresholdRule,
    },
    Morphology {
        operation: MorphOp,
        kernel_size: u32,
        iterations: u32,
    },
}

impl Enhancement {
    /// Technique name as shown to users.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PowerLaw { .. } => "Power-Law Transformation",
            Self::Negative => "Linear Negative Transformation",
            Self::Threshold { .. } => "Thresholding",
            Self::Morphology { .. } => "Morphological Transformation",
        }
    }

    /// Run the technique on `image`, returning a new image.
    #[instrument(skip(image), fields(technique = self.name()))]
    pub fn apply(&self, image: &Image) -> Result<Image> {
        let output = match *self {
            Self::PowerLaw { gamma } => apply_gamma(image, gamma)?,
            Self::Negative => apply_negative(image),
            Self::Threshold {
                threshold,
                max_value,
                rule,
            } => apply_threshold(image, threshold, max_value, rule)?,
            Self::Morphology {
                operation,
                kernel_size,
                iterations,
            } => apply_morphology(image, operation, kernel_size, iterations)?,
        };
        info!(
            width = output.width(),
            height = output.height(),
            channels = output.channels(),
            "Enhancement complete"
        );
        Ok(output)
    }
}
