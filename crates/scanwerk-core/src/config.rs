// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion job configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanwerkError};
use crate::types::PageSizePt;

/// What to do when a whole page fails (unreadable image, degenerate
/// geometry, OCR failure). Region-level empty-string skips are always
/// best-effort and not governed by this policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFailurePolicy {
    /// Abort the whole run on the first failing page.
    Abort,
    /// Log the failure, drop the page, and continue with the rest.
    Skip,
}

/// Settings for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Explicit page size in points, or `None` for native-image mode.
    pub target_size: Option<PageSizePt>,
    /// Grid size for position snapping (>= 1). Width/height deltas always
    /// use the fixed size-delta unit of 2, independent of this value.
    pub lattice_unit: u32,
    /// Language codes for the OCR collaborator (non-empty).
    pub languages: Vec<String>,
    /// Advisory hardware-acceleration toggle, forwarded to the OCR
    /// collaborator only.
    pub accelerate: bool,
    /// Output document name; sanitized and given a `.pdf` extension.
    pub output_name: String,
    /// Draw visible stroked rectangles around each overlay (debug aid).
    pub debug_boxes: bool,
    pub on_page_failure: PageFailurePolicy,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            target_size: Some(PageSizePt::A4),
            lattice_unit: 1,
            languages: vec!["en".into()],
            accelerate: true,
            output_name: "output.pdf".into(),
            debug_boxes: false,
            on_page_failure: PageFailurePolicy::Abort,
        }
    }
}

impl JobConfig {
    /// Check the configuration surface before any page is processed.
    pub fn validate(&self) -> Result<()> {
        if self.lattice_unit == 0 {
            return Err(ScanwerkError::InvalidInput(
                "lattice unit must be a positive integer".into(),
            ));
        }
        if self.languages.is_empty() {
            return Err(ScanwerkError::InvalidInput(
                "at least one OCR language code is required".into(),
            ));
        }
        Ok(())
    }
}

/// Strip filesystem-reserved characters from an output name and append the
/// `.pdf` extension when missing.
pub fn sanitize_output_name(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '$' | '/' | ':' | '\\' | '?' | '"' | '>' | '<' | '|'))
        .collect();
    if !cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned.push_str(".pdf");
    }
    cleaned
}
