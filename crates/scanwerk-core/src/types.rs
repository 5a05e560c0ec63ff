// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanwerk conversion pipeline.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of a source page image, immutable once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Target page size in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSizePt {
    pub width: f64,
    pub height: f64,
}

impl PageSizePt {
    /// ISO A4 at 72 dpi (210 x 297 mm).
    pub const A4: Self = Self {
        width: 595.2756,
        height: 841.8898,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// How a page is rendered relative to its source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// No target page size: the page takes the image's pixel dimensions as
    /// points and the scan is drawn as an opaque background.
    Native,
    /// Explicit target size: the image's coordinate space is scaled to fit
    /// the page ("contain" fit) and the page body stays blank.
    Fit,
}

/// One recognized text instance in image pixel space, as produced by the OCR
/// collaborator. The y axis grows downward (image convention).
///
/// `anchor` is the bottom-left corner of the quad, `opposite` the top-right,
/// so `width = opposite.0 - anchor.0` and `height = anchor.1 - opposite.1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Bottom-left corner `(x, y)` in pixels.
    pub anchor: (f64, f64),
    /// Top-right corner `(dx, dy)` in pixels.
    pub opposite: (f64, f64),
    /// The recognized string.
    pub text: String,
    /// Recognition confidence, carried through but ignored by the mapper.
    pub confidence: f32,
}

impl Region {
    pub fn new(anchor: (f64, f64), opposite: (f64, f64), text: impl Into<String>) -> Self {
        Self {
            anchor,
            opposite,
            text: text.into(),
            confidence: 0.0,
        }
    }

    /// Raw box width in pixels (`dx - x`).
    pub fn pixel_width(&self) -> f64 {
        self.opposite.0 - self.anchor.0
    }

    /// Raw box height in pixels (`y - dy`).
    pub fn pixel_height(&self) -> f64 {
        self.anchor.1 - self.opposite.1
    }
}

/// A region mapped into page-point space: scaled, vertically flipped to the
/// page's bottom-left origin, and snapped to the lattice. Immutable once
/// computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
}
