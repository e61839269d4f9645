// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration: parameter defaults and the practical ranges the
// front end offers.

use serde::{Deserialize, Serialize};

use crate::error::{FixelError, Result};
use crate::types::{MorphOp, ThresholdRule};

/// Front-end settings. Every field has a default, so a config file only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixelConfig {
    /// Gamma used when none is given.
    pub default_gamma: f64,
    /// Smallest gamma the front end accepts.
    pub min_gamma: f64,
    /// Largest gamma the front end accepts.
    pub max_gamma: f64,
    /// Threshold value used when none is given.
    pub default_threshold: i32,
    /// Max value used when none is given.
    pub default_max_value: i32,
    pub default_threshold_rule: ThresholdRule,
    pub default_morph_op: MorphOp,
    /// Structuring-element side used when none is given.
    pub default_kernel_size: u32,
    /// Largest structuring-element side the front end accepts.
    pub max_kernel_size: u32,
    pub default_iterations: u32,
    pub max_iterations: u32,
    /// File name the enhanced image is written under.
    pub output_file_name: String,
}

impl Default for FixelConfig {
    fn default() -> Self {
        Self {
            default_gamma: 1.0,
            min_gamma: 0.1,
            max_gamma: 5.0,
            default_threshold: 100,
            default_max_value: 255,
            default_threshold_rule: ThresholdRule::Binary,
            default_morph_op: MorphOp::Erosion,
            default_kernel_size: 5,
            max_kernel_size: 15,
            default_iterations: 5,
            max_iterations: 30,
            output_file_name: "EnhancedImage.png".into(),
        }
    }
}

impl FixelConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialise as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations whose ranges are empty or whose defaults fall
    /// outside them.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_gamma > 0.0 && self.min_gamma <= self.max_gamma) {
            return Err(FixelError::InvalidParameter(format!(
                "gamma range {}..={} is empty or not positive",
                self.min_gamma, self.max_gamma
            )));
        }
        if self.max_kernel_size == 0 || self.max_iterations == 0 {
            return Err(FixelError::InvalidParameter(
                "kernel size and iteration limits must be at least 1".into(),
            ));
        }
        if self.output_file_name.trim().is_empty() {
            return Err(FixelError::InvalidParameter(
                "output file name must not be empty".into(),
            ));
        }
        self.check_gamma(self.default_gamma)?;
        self.check_kernel_size(self.default_kernel_size)?;
        self.check_iterations(self.default_iterations)
    }

    /// Gamma must lie in `min_gamma..=max_gamma`.
    pub fn check_gamma(&self, gamma: f64) -> Result<()> {
        if (self.min_gamma..=self.max_gamma).contains(&gamma) {
            Ok(())
        } else {
            Err(FixelError::InvalidParameter(format!(
                "gamma {gamma} is outside {}..={}",
                self.min_gamma, self.max_gamma
            )))
        }
    }

    pub fn check_kernel_size(&self, kernel_size: u32) -> Result<()> {
        if kernel_size <= self.max_kernel_size {
            Ok(())
        } else {
            Err(FixelError::InvalidParameter(format!(
                "kernel size {kernel_size} exceeds the limit of {}",
                self.max_kernel_size
            )))
        }
    }

    pub fn check_iterations(&self, iterations: u32) -> Result<()> {
        if iterations <= self.max_iterations {
            Ok(())
        } else {
            Err(FixelError::InvalidParameter(format!(
                "{iterations} iterations exceeds the limit of {}",
                self.max_iterations
            )))
        }
    }
}
