// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document — The conversion pipeline for Scanwerk.
//
// Provides the geometry pipeline (scale-to-fit resolution, lattice
// quantization, pixel-to-page coordinate mapping), the invisible overlay
// text renderer, the page-by-page document builder (printpdf 0.8), font
// resource loading, and the assembly loop that drives them over an ordered
// sequence of page images.

pub mod assemble;
pub mod builder;
pub mod font;
pub mod geometry;
pub mod overlay;
pub mod stage;

#[cfg(feature = "ocr")]
pub mod ocr;

// Re-export the primary types so callers can use `scanwerk_document::DocumentBuilder` etc.
pub use assemble::{
    AssembleOutcome, CancelPolicy, CancelToken, PageImage, TextRecognizer, assemble,
    assemble_cancellable, image_sequence_from_dir,
};
pub use builder::DocumentBuilder;
pub use font::{FontResource, OverlayFont};
pub use geometry::PageGeometry;

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
