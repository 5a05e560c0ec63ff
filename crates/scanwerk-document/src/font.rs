// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resources — loading, metric measurement, and PDF registration.
//
// The overlay renderer needs two things from a font: an embedded `FontId`
// inside the output document, and the natural width of a string at a point
// size (to compute the spacing that justifies the invisible run across its
// box). `printpdf` handles the embedding; width measurement reads glyph
// horizontal advances via `ttf-parser`.

use std::path::Path;
use std::sync::Arc;

use printpdf::{FontId, ParsedFont, PdfDocument, PdfWarnMsg};
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, info};
use ttf_parser::Face;

/// A font resource that can be registered into an output document and
/// measured against. The one seam the builder and overlay renderer depend
/// on, so tests can substitute a fixed-advance stub.
pub trait FontResource {
    /// Embed the font into `doc` and return its id. Called once, before any
    /// page is processed.
    fn register(&self, doc: &mut PdfDocument) -> Result<FontId>;

    /// Natural width of `text` in points when set at `font_size` points.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// A TrueType/OpenType font loaded from disk or memory.
///
/// Must cover the glyph set of all recognized languages; glyphs missing
/// from the face fall back to the space advance, which keeps measurement
/// defined but degrades justification for those characters.
#[derive(Clone)]
pub struct OverlayFont {
    data: Arc<Vec<u8>>,
    face_index: u32,
    units_per_em: u16,
    space_advance: u16,
    family: Option<String>,
}

impl OverlayFont {
    /// Load and validate a font file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|err| {
            ScanwerkError::Resource(format!("failed to read font {}: {}", path.display(), err))
        })?;
        let font = Self::from_bytes(data)?;
        info!(
            path = %path.display(),
            family = font.family.as_deref().unwrap_or("unknown"),
            "Overlay font loaded"
        );
        Ok(font)
    }

    /// Parse font bytes and extract the metrics needed for measurement.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let face_index = 0u32;
        let face = Face::parse(&data, face_index).map_err(|err| {
            ScanwerkError::Resource(format!("failed to parse font data: {err}"))
        })?;
        let units_per_em = face.units_per_em().max(1);
        let space_advance = face
            .glyph_index(' ')
            .and_then(|id| face.glyph_hor_advance(id))
            .unwrap_or(units_per_em / 2);
        let family = extract_family_name(&face);
        debug!(units_per_em, space_advance, "Font metrics resolved");
        Ok(Self {
            data: Arc::new(data),
            face_index,
            units_per_em,
            space_advance,
            family,
        })
    }

    /// Typographic family name, when the face declares one.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl FontResource for OverlayFont {
    fn register(&self, doc: &mut PdfDocument) -> Result<FontId> {
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let parsed = ParsedFont::from_bytes(&self.data, self.face_index as usize, &mut warnings)
            .ok_or_else(|| {
                ScanwerkError::Resource("font could not be embedded into the PDF".into())
            })?;
        Ok(doc.add_font(&parsed))
    }

    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        // Re-parsing per call is cheap: `Face` borrows the data without
        // copying. The fallible path is unreachable after from_bytes.
        let Ok(face) = Face::parse(&self.data, self.face_index) else {
            return 0.0;
        };
        let mut advance: u64 = 0;
        for ch in text.chars() {
            let glyph_advance = face
                .glyph_index(ch)
                .and_then(|id| face.glyph_hor_advance(id))
                .unwrap_or(self.space_advance);
            advance += glyph_advance as u64;
        }
        advance as f64 * font_size / self.units_per_em as f64
    }
}

fn extract_family_name(face: &Face<'_>) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::TYPOGRAPHIC_FAMILY {
            if let Some(value) = name.to_string() {
                return Some(value);
            }
        } else if name.name_id == ttf_parser::name_id::FAMILY && fallback.is_none() {
            fallback = name.to_string();
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_resource_error() {
        let result = OverlayFont::from_bytes(vec![0u8; 64]);
        assert!(matches!(result, Err(ScanwerkError::Resource(_))));
    }

    #[test]
    fn missing_font_file_is_a_resource_error() {
        let result = OverlayFont::from_path("/nonexistent/overlay-font.ttf");
        assert!(matches!(result, Err(ScanwerkError::Resource(_))));
    }
}
