// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document builder — accumulate pages in supplied order and serialise the
// final PDF using `printpdf` 0.8's data-oriented API.
//
// The builder is an explicit value with single-writer ownership: the
// underlying content stream is positional, so draws must arrive in order.
// `finish()` consumes the builder, which makes use-after-close
// unrepresentable; the remaining dynamic misuses (finalising with no page,
// drawing before any page is started) surface as `State` errors.

use image::DynamicImage;
use printpdf::{
    FontId, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{MappedRegion, PageSizePt};
use tracing::{debug, info};

use crate::font::FontResource;
use crate::geometry::PageGeometry;
use crate::overlay;

/// Builds a multi-page searchable document page by page.
///
/// Lifecycle: `new` (no page yet) → `start_page` (opens the first page
/// without a page-break) → further `start_page` calls (each an explicit
/// page-break) → `finish` (flushes the byte stream). Only the current
/// page's instructions are buffered as ops; completed pages are frozen.
pub struct DocumentBuilder<F: FontResource> {
    doc: PdfDocument,
    font: F,
    font_id: FontId,
    /// Stroke visible rectangles around each overlay run.
    debug_boxes: bool,
    pages: Vec<PdfPage>,
    current: Option<OpenPage>,
}

struct OpenPage {
    size: PageSizePt,
    ops: Vec<Op>,
}

impl<F: FontResource> DocumentBuilder<F> {
    /// Create a builder and register the overlay font up front.
    ///
    /// Font registration happens before any page is processed so a missing
    /// or unusable font fails the run fast instead of producing partial
    /// output with missing glyphs.
    pub fn new(title: impl Into<String>, font: F) -> Result<Self> {
        let mut doc = PdfDocument::new(&title.into());
        let font_id = font.register(&mut doc)?;
        Ok(Self {
            doc,
            font,
            font_id,
            debug_boxes: false,
            pages: Vec::new(),
            current: None,
        })
    }

    /// Toggle visible region rectangles (debug aid).
    pub fn set_debug_boxes(&mut self, enabled: bool) {
        self.debug_boxes = enabled;
    }

    /// Begin a new page sized per `geometry`, drawing `background` first
    /// (opaque, covering the full page) when given.
    ///
    /// The first call opens the first page without emitting a page-break;
    /// every later call closes the current page and opens the next one.
    pub fn start_page(
        &mut self,
        geometry: &PageGeometry,
        background: Option<&DynamicImage>,
    ) -> Result<()> {
        if let Some(open) = self.current.take() {
            // Explicit page-break: freeze the current content stream.
            self.pages.push(close_page(open));
            debug!(page = self.pages.len(), "page break");
        }

        let size = geometry.page_size;
        let mut ops = Vec::new();
        if let Some(image) = background {
            ops.push(self.background_op(image, size));
        }
        self.current = Some(OpenPage { size, ops });
        Ok(())
    }

    /// Draw one region's overlay on the current page.
    ///
    /// Regions are drawn in the order supplied. An empty string surfaces
    /// `EmptyRegion` so the caller can skip that region and continue; any
    /// call before a page is started is a `State` error.
    pub fn draw_region(&mut self, region: &MappedRegion) -> Result<()> {
        let ops = overlay::region_ops(region, &self.font_id, &self.font, self.debug_boxes)?;
        let Some(open) = self.current.as_mut() else {
            return Err(ScanwerkError::State(
                "draw_region called before any page was started".into(),
            ));
        };
        open.ops.extend(ops);
        Ok(())
    }

    /// Number of pages started so far (including the currently open one).
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    /// Close the document and return the serialised PDF bytes.
    ///
    /// Consumes the builder; no further mutation is possible afterwards.
    /// Finalising before any page was started is a `State` error.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() && self.current.is_none() {
            return Err(ScanwerkError::State(
                "finish called on a document with no pages".into(),
            ));
        }
        if let Some(open) = self.current.take() {
            self.pages.push(close_page(open));
        }
        let page_count = self.pages.len();
        self.doc.with_pages(self.pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        info!(page_count, bytes = bytes.len(), "document finalised");
        Ok(bytes)
    }

    /// Place the scan as a full-page opaque background at the page origin.
    fn background_op(&mut self, image: &DynamicImage, size: PageSizePt) -> Op {
        let rgb = image.to_rgb8();
        let (px_w, px_h) = rgb.dimensions();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.doc.add_image(&raw);

        // At 72 dpi one pixel is one point, so the scale factors stretch
        // the image exactly over the page box. In native mode the page was
        // sized from the pixel dimensions and both factors are 1.
        Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some((size.width / px_w as f64) as f32),
                scale_y: Some((size.height / px_h as f64) as f32),
                dpi: Some(72.0),
                rotate: None,
            },
        }
    }
}

fn close_page(open: OpenPage) -> PdfPage {
    let width: Mm = Pt(open.size.width as f32).into();
    let height: Mm = Pt(open.size.height as f32).into();
    PdfPage::new(width, height, open.ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::types::{Region, SourceImage};

    struct StubFont;

    impl FontResource for StubFont {
        fn register(&self, _doc: &mut PdfDocument) -> Result<FontId> {
            Ok(FontId::new())
        }

        fn text_width(&self, text: &str, font_size: f64) -> f64 {
            text.chars().count() as f64 * 0.5 * font_size
        }
    }

    struct BrokenFont;

    impl FontResource for BrokenFont {
        fn register(&self, _doc: &mut PdfDocument) -> Result<FontId> {
            Err(ScanwerkError::Resource("no such font".into()))
        }

        fn text_width(&self, _text: &str, _font_size: f64) -> f64 {
            0.0
        }
    }

    fn native_geometry() -> PageGeometry {
        PageGeometry::resolve(&SourceImage::new(200, 300), None)
    }

    fn mapped(text: &str) -> MappedRegion {
        let source = SourceImage::new(200, 300);
        let geometry = native_geometry();
        crate::geometry::map_region(
            &Region::new((10.0, 50.0), (90.0, 30.0), text),
            &source,
            &geometry,
            1,
        )
        .unwrap()
    }

    #[test]
    fn font_failure_is_fail_fast() {
        let result = DocumentBuilder::new("t", BrokenFont);
        assert!(matches!(result, Err(ScanwerkError::Resource(_))));
    }

    #[test]
    fn finish_with_no_pages_is_a_state_error() {
        let builder = DocumentBuilder::new("t", StubFont).unwrap();
        assert!(matches!(builder.finish(), Err(ScanwerkError::State(_))));
    }

    #[test]
    fn draw_before_start_page_is_a_state_error() {
        let mut builder = DocumentBuilder::new("t", StubFont).unwrap();
        let result = builder.draw_region(&mapped("hello"));
        assert!(matches!(result, Err(ScanwerkError::State(_))));
    }

    #[test]
    fn two_start_pages_make_a_two_page_document() {
        let mut builder = DocumentBuilder::new("t", StubFont).unwrap();
        let geometry = native_geometry();

        builder.start_page(&geometry, None).unwrap();
        assert_eq!(builder.page_count(), 1);
        builder.draw_region(&mapped("first")).unwrap();

        // One page-break between the pages, none before the first.
        builder.start_page(&geometry, None).unwrap();
        assert_eq!(builder.page_count(), 2);
        builder.draw_region(&mapped("second")).unwrap();

        let bytes = builder.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_region_propagates_without_spoiling_the_page() {
        let mut builder = DocumentBuilder::new("t", StubFont).unwrap();
        builder.start_page(&native_geometry(), None).unwrap();

        let result = builder.draw_region(&mapped(""));
        assert!(matches!(result, Err(ScanwerkError::EmptyRegion)));

        // Sibling regions still render and the page finalises.
        builder.draw_region(&mapped("sibling")).unwrap();
        assert_eq!(builder.page_count(), 1);
        assert!(builder.finish().is_ok());
    }

    #[test]
    fn background_is_drawn_at_native_pixel_size() {
        let mut builder = DocumentBuilder::new("t", StubFont).unwrap();
        let image = DynamicImage::new_rgb8(200, 300);
        builder
            .start_page(&native_geometry(), Some(&image))
            .unwrap();
        let open = builder.current.as_ref().unwrap();
        let transform = open
            .ops
            .iter()
            .find_map(|op| match op {
                Op::UseXobject { transform, .. } => Some(transform.clone()),
                _ => None,
            })
            .expect("background xobject present");
        assert_eq!(transform.scale_x, Some(1.0));
        assert_eq!(transform.scale_y, Some(1.0));
        assert_eq!(transform.dpi, Some(72.0));
    }
}
