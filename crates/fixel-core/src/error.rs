// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Fixel.

use thiserror::Error;

/// Top-level error type for all Fixel operations.
#[derive(Debug, Error)]
pub enum FixelError {
    // -- Transform errors --
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("pixel buffer has {actual} bytes, dimensions require {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    // -- Codec errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FixelError>;
