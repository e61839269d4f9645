// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Fixel: the in-memory image and the closed parameter
// enumerations accepted by the transforms.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{FixelError, Result};

/// An 8-bit image stored as an owned, row-major, channel-interleaved buffer.
///
/// Images are never mutated once built. Every transform reads one and
/// returns a freshly allocated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Image {
    /// Wrap a raw sample buffer.
    ///
    /// Fails with `InvalidParameter` for zero channels and with
    /// `DimensionMismatch` when `data.len() != width * height * channels`.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if channels == 0 {
            return Err(FixelError::InvalidParameter(
                "an image needs at least one channel".into(),
            ));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(FixelError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel image from a row-major intensity buffer.
    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 1, data)
    }

    /// Image with every pixel set to `pixel` (one value per channel).
    pub fn from_pixel(width: u32, height: u32, pixel: &[u8]) -> Result<Self> {
        let channels = u8::try_from(pixel.len()).map_err(|_| {
            FixelError::InvalidParameter(format!("{} channels is too many", pixel.len()))
        })?;
        let data = pixel.repeat(width as usize * height as usize);
        Self::new(width, height, channels, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Borrow the raw sample buffer.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and return the raw sample buffer.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels (not samples).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The samples of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.data[start..start + c])
    }

    /// Apply `f` to every sample (all channels), producing a new image of the
    /// same shape.
    pub fn map_samples(&self, f: impl Fn(u8) -> u8) -> Image {
        Image {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// Pointwise rule used by the threshold segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdRule {
    /// `max` above the threshold, 0 otherwise.
    Binary,
    /// 0 above the threshold, `max` otherwise.
    BinaryInverse,
    /// `Binary` with the threshold chosen by Otsu's method.
    BinaryOtsu,
    /// `max` above the threshold, unchanged otherwise.
    Truncate,
    /// Unchanged above the threshold, 0 otherwise.
    ToZero,
    /// 0 above the threshold, unchanged otherwise.
    ToZeroInverse,
}

impl ThresholdRule {
    pub const ALL: [ThresholdRule; 6] = [
        Self::Binary,
        Self::BinaryInverse,
        Self::BinaryOtsu,
        Self::Truncate,
        Self::ToZero,
        Self::ToZeroInverse,
    ];

    /// Label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::BinaryInverse => "Binary Inverse",
            Self::BinaryOtsu => "Binary using OTSU",
            Self::Truncate => "Truncate",
            Self::ToZero => "To Zero",
            Self::ToZeroInverse => "To Zero Inverse",
        }
    }

    /// Short command-line name.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::BinaryInverse => "binary-inv",
            Self::BinaryOtsu => "otsu",
            Self::Truncate => "trunc",
            Self::ToZero => "tozero",
            Self::ToZeroInverse => "tozero-inv",
        }
    }
}

impl std::fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ThresholdRule {
    type Err = FixelError;

    /// Accepts the slug or the user-facing label, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|rule| {
                rule.slug().eq_ignore_ascii_case(wanted)
                    || rule.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                FixelError::InvalidParameter(format!("unknown threshold rule '{wanted}'"))
            })
    }
}

/// Morphological operation applied with a flat square structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MorphOp {
    Erosion,
    Dilation,
    /// Erosion followed by dilation.
    Opening,
    /// Dilation followed by erosion.
    Closing,
}

impl MorphOp {
    pub const ALL: [MorphOp; 4] = [Self::Erosion, Self::Dilation, Self::Opening, Self::Closing];

    /// Label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Erosion => "Erosion",
            Self::Dilation => "Dilation",
            Self::Opening => "Opening",
            Self::Closing => "Closing",
        }
    }

    /// Whether the iteration count applies. Opening and closing are always a
    /// single erosion/dilation pair.
    pub fn uses_iterations(&self) -> bool {
        matches!(self, Self::Erosion | Self::Dilation)
    }
}

impl std::fmt::Display for MorphOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MorphOp {
    type Err = FixelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erosion" | "erode" => Ok(Self::Erosion),
            "dilation" | "dilate" => Ok(Self::Dilation),
            "opening" | "open" => Ok(Self::Opening),
            "closing" | "close" => Ok(Self::Closing),
            other => Err(FixelError::InvalidParameter(format!(
                "unknown morphological operation '{other}'"
            ))),
        }
    }
}
