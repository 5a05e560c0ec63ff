// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry resolution — decide render mode and the uniform scale
// factor for one source image.

use scanwerk_core::types::{PageSizePt, RenderMode, SourceImage};
use tracing::debug;

/// Resolved geometry for one page: render mode, uniform scale factor, and
/// the effective page size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub mode: RenderMode,
    /// Uniform scale from image pixels to page points (aspect preserved).
    pub scale: f64,
    pub page_size: PageSizePt,
}

impl PageGeometry {
    /// Resolve geometry for `source` against an optional target page size.
    ///
    /// Without a target the page adopts the image's pixel dimensions as
    /// points and no scaling happens. With a target, the scale is the
    /// largest uniform factor that keeps the scaled image inside the target
    /// box (classic "contain" fit): the binding axis matches the target
    /// exactly, the other fits within it.
    pub fn resolve(source: &SourceImage, target: Option<PageSizePt>) -> Self {
        let (iw, ih) = (source.width as f64, source.height as f64);
        match target {
            None => {
                debug!(iw, ih, "native page geometry");
                Self {
                    mode: RenderMode::Native,
                    scale: 1.0,
                    page_size: PageSizePt::new(iw, ih),
                }
            }
            Some(size) => {
                // Height binds when the image is taller (relative to the
                // target) than it is wide.
                let scale = if iw * size.height < ih * size.width {
                    size.height / ih
                } else {
                    size.width / iw
                };
                debug!(iw, ih, scale, "fit page geometry");
                Self {
                    mode: RenderMode::Fit,
                    scale,
                    page_size: size,
                }
            }
        }
    }
}
