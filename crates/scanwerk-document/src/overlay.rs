// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Overlay text rendering — turn one mapped region into an invisible,
// justified text run that spans the region's box exactly, so selectable
// text lines up glyph-for-glyph with the underlying scan.

use printpdf::{
    Color, FontId, Line, LinePoint, Op, Point, Pt, Rgb, TextItem, TextRenderingMode,
};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::MappedRegion;
use tracing::trace;

use crate::font::FontResource;

/// Font point size for a region box: three quarters of the box height,
/// floored — the reference ratio that keeps ascenders inside the box.
pub fn overlay_font_size(box_height: f64) -> f64 {
    (box_height * 3.0 / 4.0).floor()
}

/// Extra space inserted after each character (including the last) so the
/// rendered run spans `box_width`. Negative when the natural width already
/// overflows the box (compression).
///
/// The divisor is the full character count, not the gap count: a
/// single-character string receives the entire leftover width as trailing
/// space. Reference behavior, kept as-is.
pub fn char_spacing(box_width: f64, natural_width: f64, char_count: usize) -> f64 {
    (box_width - natural_width) / char_count as f64
}

/// Emit the draw instructions for one region: an optional stroked debug
/// rectangle and the invisible text run.
///
/// Fails with `EmptyRegion` when the string is empty — the caller skips the
/// region instead of dividing by zero.
pub fn region_ops(
    region: &MappedRegion,
    font_id: &FontId,
    font: &dyn FontResource,
    debug_boxes: bool,
) -> Result<Vec<Op>> {
    let char_count = region.text.chars().count();
    if char_count == 0 {
        return Err(ScanwerkError::EmptyRegion);
    }

    let font_size = overlay_font_size(region.height);
    let natural_width = font.text_width(&region.text, font_size);
    let spacing = char_spacing(region.width, natural_width, char_count);
    trace!(
        x = region.x,
        y = region.y,
        font_size,
        natural_width,
        spacing,
        "overlay run"
    );

    let mut ops = Vec::with_capacity(10);

    if debug_boxes {
        ops.push(Op::SetOutlineColor {
            col: Color::Rgb(Rgb {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                icc_profile: None,
            }),
        });
        ops.push(Op::SetOutlineThickness { pt: Pt(1.0) });
        ops.push(Op::DrawLine {
            line: box_outline(region),
        });
    }

    // The baseline sits `font_size` below the box top, matching the
    // reference cursor of (x, y + h - font_size).
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextRenderingMode {
        mode: TextRenderingMode::Invisible,
    });
    ops.push(Op::SetFontSize {
        size: Pt(font_size as f32),
        font: font_id.clone(),
    });
    ops.push(Op::SetCharacterSpacing {
        multiplier: spacing as f32,
    });
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(region.x as f32),
            y: Pt((region.y + region.height - font_size) as f32),
        },
    });
    ops.push(Op::WriteText {
        items: vec![TextItem::Text(region.text.clone())],
        font: font_id.clone(),
    });
    // Spacing and rendering mode are graphics state; reset so later draws
    // on the same page start clean.
    ops.push(Op::SetCharacterSpacing { multiplier: 0.0 });
    ops.push(Op::SetTextRenderingMode {
        mode: TextRenderingMode::Fill,
    });
    ops.push(Op::EndTextSection);

    Ok(ops)
}

/// Closed four-point outline of the region box.
fn box_outline(region: &MappedRegion) -> Line {
    let corners = [
        (region.x, region.y),
        (region.x + region.width, region.y),
        (region.x + region.width, region.y + region.height),
        (region.x, region.y + region.height),
    ];
    Line {
        points: corners
            .into_iter()
            .map(|(x, y)| LinePoint {
                p: Point {
                    x: Pt(x as f32),
                    y: Pt(y as f32),
                },
                bezier: false,
            })
            .collect(),
        is_closed: true,
    }
}
