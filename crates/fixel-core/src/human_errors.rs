// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::FixelError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying again may help (file briefly locked, disk full).
    Transient,
    /// User must change a setting or pick a different option.
    ActionRequired,
    /// The input itself cannot be used.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `FixelError` into a `HumanError`.
pub fn humanize_error(err: &FixelError) -> HumanError {
    match err {
        FixelError::InvalidParameter(detail) => HumanError {
            message: "One of the settings can't be used.".into(),
            suggestion: format!("Adjust the setting and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        FixelError::UnsupportedFormat(detail) => HumanError {
            message: "This technique can't be applied to this kind of image.".into(),
            suggestion: format!(
                "Try a plain RGB or grayscale photo, for example a JPEG without transparency. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        FixelError::DimensionMismatch { .. } => HumanError {
            message: "The image data is incomplete.".into(),
            suggestion: "Load the image again from the original file.".into(),
            severity: Severity::Permanent,
        },

        FixelError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Permanent,
        },

        FixelError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Fixel doesn't have permission to use that file.".into(),
                suggestion: "Check the file permissions, or choose a different location.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                severity: Severity::Transient,
            },
        },

        FixelError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: "Check that the settings file is valid JSON, or remove it to use the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
