// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line structure. Every technique parameter is optional; missing ones
// come from the configuration, and the configured ranges are enforced here
// rather than in the transforms.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fixel_core::error::Result;
use fixel_core::{FixelConfig, MorphOp, ThresholdRule};
use fixel_transform::Enhancement;

use crate::session::Job;

#[derive(Debug, Parser)]
#[command(name = "fixel")]
#[command(author, version, about = "Fix your pixel: gamma, negative, thresholding and morphology", long_about = None)]
pub struct Cli {
    /// JSON settings file overriding the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Power-law (gamma) transformation
    Gamma {
        #[command(flatten)]
        io: IoArgs,
        /// Gamma; below 1 brightens, above 1 darkens
        #[arg(short, long, allow_hyphen_values = true)]
        gamma: Option<f64>,
    },
    /// Linear negative transformation
    Negative {
        #[command(flatten)]
        io: IoArgs,
    },
    /// Thresholding (converts to grayscale first)
    Threshold {
        #[command(flatten)]
        io: IoArgs,
        /// Threshold value (0-255)
        #[arg(short, long, allow_hyphen_values = true)]
        threshold: Option<i32>,
        /// Value written for pixels that pass (0-255)
        #[arg(short, long, allow_hyphen_values = true)]
        max_value: Option<i32>,
        /// binary, binary-inv, otsu, trunc, tozero or tozero-inv
        #[arg(short, long)]
        rule: Option<ThresholdRule>,
    },
    /// Morphological transformation with a square kernel
    Morphology {
        #[command(flatten)]
        io: IoArgs,
        /// erosion, dilation, opening or closing
        #[arg(long)]
        operation: Option<MorphOp>,
        /// Kernel side length (odd)
        #[arg(short, long)]
        kernel_size: Option<u32>,
        /// Erosion/dilation repetitions
        #[arg(short = 'n', long)]
        iterations: Option<u32>,
    },
    /// Print the effective settings as JSON
    Defaults,
}

#[derive(Debug, Args)]
pub struct IoArgs {
    /// Image to enhance (JPEG, PNG, ...)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the enhanced PNG [default: EnhancedImage.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a before/after comparison PNG
    #[arg(long)]
    pub compare: Option<PathBuf>,
}

impl Commands {
    /// Resolve the command into a job, filling gaps from `config`.
    ///
    /// Returns `None` for commands that don't process an image.
    pub fn to_job(&self, config: &FixelConfig) -> Result<Option<Job>> {
        let (io, enhancement) = match self {
            Self::Gamma { io, gamma } => {
                let gamma = gamma.unwrap_or(config.default_gamma);
                config.check_gamma(gamma)?;
                (io, Enhancement::PowerLaw { gamma })
            }
            Self::Negative { io } => (io, Enhancement::Negative),
            Self::Threshold {
                io,
                threshold,
                max_value,
                rule,
            } => (
                io,
                Enhancement::Threshold {
                    threshold: threshold.unwrap_or(config.default_threshold),
                    max_value: max_value.unwrap_or(config.default_max_value),
                    rule: rule.unwrap_or(config.default_threshold_rule),
                },
            ),
            Self::Morphology {
                io,
                operation,
                kernel_size,
                iterations,
            } => {
                let kernel_size = kernel_size.unwrap_or(config.default_kernel_size);
                let iterations = iterations.unwrap_or(config.default_iterations);
                config.check_kernel_size(kernel_size)?;
                config.check_iterations(iterations)?;
                (
                    io,
                    Enhancement::Morphology {
                        operation: operation.unwrap_or(config.default_morph_op),
                        kernel_size,
                        iterations,
                    },
                )
            }
            Self::Defaults => return Ok(None),
        };

        Ok(Some(Job {
            enhancement,
            input: io.input.clone(),
            output: io
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.output_file_name)),
            compare: io.compare.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fixel_core::FixelError;

    fn job(args: &[&str]) -> Result<Option<Job>> {
        let cli = Cli::try_parse_from(args).unwrap();
        cli.command.to_job(&FixelConfig::default())
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn gamma_defaults_to_identity_and_standard_output() {
        let job = job(&["fixel", "gamma", "-i", "photo.jpg"]).unwrap().unwrap();
        assert_eq!(job.enhancement, Enhancement::PowerLaw { gamma: 1.0 });
        assert_eq!(job.input, PathBuf::from("photo.jpg"));
        assert_eq!(job.output, PathBuf::from("EnhancedImage.png"));
        assert!(job.compare.is_none());
    }

    #[test]
    fn gamma_outside_configured_range_is_rejected() {
        let err = job(&["fixel", "gamma", "-i", "a.png", "--gamma", "7.5"]).unwrap_err();
        assert!(matches!(err, FixelError::InvalidParameter(_)));
    }

    #[test]
    fn threshold_accepts_labels_and_slugs() {
        let job = job(&[
            "fixel",
            "threshold",
            "-i",
            "a.png",
            "-t",
            "90",
            "--rule",
            "To Zero Inverse",
            "-o",
            "out.png",
            "--compare",
            "both.png",
        ])
        .unwrap()
        .unwrap();
        assert_eq!(
            job.enhancement,
            Enhancement::Threshold {
                threshold: 90,
                max_value: 255,
                rule: ThresholdRule::ToZeroInverse,
            }
        );
        assert_eq!(job.output, PathBuf::from("out.png"));
        assert_eq!(job.compare, Some(PathBuf::from("both.png")));
    }

    #[test]
    fn negative_threshold_reaches_the_transform() {
        let job = job(&["fixel", "threshold", "-i", "a.png", "-t", "-4"])
            .unwrap()
            .unwrap();
        assert!(matches!(
            job.enhancement,
            Enhancement::Threshold { threshold: -4, .. }
        ));
    }

    #[test]
    fn unknown_rule_fails_to_parse() {
        assert!(Cli::try_parse_from(["fixel", "threshold", "-i", "a.png", "-r", "median"]).is_err());
    }

    #[test]
    fn morphology_uses_ui_defaults() {
        let job = job(&["fixel", "morphology", "-i", "a.png", "--operation", "close"])
            .unwrap()
            .unwrap();
        assert_eq!(
            job.enhancement,
            Enhancement::Morphology {
                operation: MorphOp::Closing,
                kernel_size: 5,
                iterations: 5,
            }
        );
    }

    #[test]
    fn morphology_limits_are_enforced() {
        assert!(job(&["fixel", "morphology", "-i", "a.png", "-k", "17"]).is_err());
        assert!(job(&["fixel", "morphology", "-i", "a.png", "-n", "31"]).is_err());
    }

    #[test]
    fn defaults_has_no_job() {
        assert!(job(&["fixel", "defaults"]).unwrap().is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fixel", "negative", "-i", "a.png", "-v", "--config", "c.json"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    }
}
