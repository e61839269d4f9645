// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One "fix your pixel" action: load the image, apply the chosen enhancement,
// write the result and, optionally, the before/after comparison.

use std::path::PathBuf;

use fixel_core::error::Result;
use fixel_transform::{Enhancement, codec};
use tracing::{info, instrument};

/// A fully resolved enhancement request.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub enhancement: Enhancement,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Where to write the side-by-side comparison, if wanted.
    pub compare: Option<PathBuf>,
}

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: PathBuf,
    pub compare: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// Run `job`. Nothing is written unless the enhancement succeeds.
#[instrument(skip_all, fields(technique = job.enhancement.name(), input = %job.input.display()))]
pub fn run(job: &Job) -> Result<Outcome> {
    let original = codec::open(&job.input)?;
    let enhanced = job.enhancement.apply(&original)?;

    codec::save_png(&enhanced, &job.output)?;
    if let Some(path) = &job.compare {
        let comparison = codec::side_by_side(&original, &enhanced)?;
        codec::save_png(&comparison, path)?;
        info!(path = %path.display(), "Comparison written");
    }

    Ok(Outcome {
        output: job.output.clone(),
        compare: job.compare.clone(),
        width: enhanced.width(),
        height: enhanced.height(),
        channels: enhanced.channels(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixel_core::{FixelError, Image, MorphOp, ThresholdRule};

    fn write_input(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("input.png");
        let img = Image::new(4, 2, 3, (0..24).map(|i| i * 10).collect()).unwrap();
        codec::save_png(&img, &path).unwrap();
        path
    }

    #[test]
    fn writes_enhanced_image_and_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let job = Job {
            enhancement: Enhancement::Threshold {
                threshold: 100,
                max_value: 255,
                rule: ThresholdRule::Binary,
            },
            input: write_input(dir.path()),
            output: dir.path().join("EnhancedImage.png"),
            compare: Some(dir.path().join("compare.png")),
        };

        let outcome = run(&job).unwrap();
        assert_eq!((outcome.width, outcome.height, outcome.channels), (4, 2, 1));

        let enhanced = codec::open(&job.output).unwrap();
        assert_eq!(enhanced.channels(), 1);
        assert!(enhanced.as_raw().iter().all(|&v| v == 0 || v == 255));

        let comparison = codec::open(dir.path().join("compare.png")).unwrap();
        assert_eq!(comparison.dimensions(), (8, 2));
    }

    fn write_opaque_rgba(dir: &std::path::Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("transparent.png");
        let img = Image::from_pixel(width, height, &[200, 100, 50, 255]).unwrap();
        codec::save_png(&img, &path).unwrap();
        path
    }

    fn run_on_rgba(enhancement: Enhancement, width: u32, height: u32) -> Image {
        let dir = tempfile::tempdir().unwrap();
        let job = Job {
            enhancement,
            input: write_opaque_rgba(dir.path(), width, height),
            output: dir.path().join("EnhancedImage.png"),
            compare: None,
        };
        run(&job).unwrap();
        codec::open(&job.output).unwrap()
    }

    #[test]
    fn negative_of_rgba_input_stays_visible() {
        let enhanced = run_on_rgba(Enhancement::Negative, 3, 2);
        assert_eq!(enhanced.channels(), 3);
        assert!(enhanced.as_raw().chunks(3).all(|p| p == [55, 155, 205]));
    }

    #[test]
    fn rgba_input_can_be_thresholded() {
        let enhanced = run_on_rgba(
            Enhancement::Threshold {
                threshold: 100,
                max_value: 255,
                rule: ThresholdRule::Binary,
            },
            3,
            2,
        );
        // Luma of (200, 100, 50) is 124.
        assert_eq!(enhanced.channels(), 1);
        assert_eq!(enhanced.as_raw(), &[255u8; 6]);
    }

    #[test]
    fn eroding_rgba_input_leaves_no_transparent_frame() {
        let enhanced = run_on_rgba(
            Enhancement::Morphology {
                operation: MorphOp::Erosion,
                kernel_size: 3,
                iterations: 1,
            },
            6,
            6,
        );
        assert_eq!(enhanced.channels(), 3);
        assert_eq!(enhanced.pixel(0, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(enhanced.pixel(3, 3), Some(&[200u8, 100, 50][..]));

        let dynamic = codec::to_dynamic(&enhanced).unwrap();
        assert!(!dynamic.color().has_alpha());
    }

    #[test]
    fn failed_enhancement_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = Job {
            enhancement: Enhancement::PowerLaw { gamma: -1.0 },
            input: write_input(dir.path()),
            output: dir.path().join("EnhancedImage.png"),
            compare: None,
        };

        let err = run(&job).unwrap_err();
        assert!(matches!(err, FixelError::InvalidParameter(_)));
        assert!(!job.output.exists());
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let job = Job {
            enhancement: Enhancement::Negative,
            input: dir.path().join("nope.jpg"),
            output: dir.path().join("EnhancedImage.png"),
            compare: None,
        };
        assert!(matches!(run(&job), Err(FixelError::Io(_))));
    }
}
