// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Input errors --
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Recognized region carries an empty string. Region-level and
    /// best-effort: callers skip the region and continue with the page.
    #[error("recognized region has an empty string")]
    EmptyRegion,

    // -- Pipeline errors --
    #[error("degenerate page geometry: {0}")]
    Geometry(String),

    #[error("invalid document state: {0}")]
    State(String),

    #[error("font resource error: {0}")]
    Resource(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("image processing failed: {0}")]
    Image(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Filesystem / persistence --
    #[error("filesystem error: {0}")]
    FileSystem(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
