// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page assembly — drive the geometry pipeline and the document builder over
// an ordered sequence of page images.
//
// Scheduling is single-threaded and sequential: the OCR call per image is
// the dominant blocking operation and region lists may be computed ahead of
// time in parallel by the caller, but pages must be handed to this loop in
// original input order — the builder's content stream is positional.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::DynamicImage;
use scanwerk_core::config::{JobConfig, PageFailurePolicy};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{MappedRegion, Region, RenderMode, SourceImage};
use tracing::{info, instrument, warn};

use crate::builder::DocumentBuilder;
use crate::font::FontResource;
use crate::geometry::{PageGeometry, map_region};

/// The OCR collaborator seam: an ordered region list per image.
///
/// Implementations may time out internally; a timed-out or failed image
/// must surface an error rather than a silent partial region list — the
/// caller's page-failure policy decides between skip and abort.
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Region>>;
}

/// One page image handle: a label for logging plus the decoded image.
///
/// The assembly loop is agnostic to where the sequence comes from — a
/// directory listing, an in-memory list, or a rasterized source document.
pub struct PageImage {
    pub label: String,
    pub image: DynamicImage,
}

impl PageImage {
    pub fn new(label: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }

    /// Decode raw image bytes into a page handle.
    pub fn from_bytes(label: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let label = label.into();
        let image = image::load_from_memory(bytes).map_err(|err| {
            ScanwerkError::InvalidInput(format!("cannot decode image '{label}': {err}"))
        })?;
        Ok(Self { label, image })
    }
}

/// Cooperative cancellation flag, honoured at page-break boundaries only:
/// the in-flight page's draws complete, no further page is started.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// What to do with pages already written when a run is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPolicy {
    /// Finalise the document with the pages written so far — partial but
    /// structurally valid output.
    FinishPartial,
    /// Throw the partial document away.
    Discard,
}

/// Result of a (possibly cancelled) assembly run.
#[derive(Debug)]
pub enum AssembleOutcome {
    /// Every supplied page was processed.
    Complete(Vec<u8>),
    /// Cancelled mid-run and finalised early.
    Partial { bytes: Vec<u8>, pages: usize },
    /// Cancelled mid-run and discarded per policy.
    Discarded,
}

/// Assemble a searchable document from an ordered page-image sequence.
///
/// Convenience wrapper over [`assemble_cancellable`] with a token that
/// never fires.
pub fn assemble<F: FontResource>(
    pages: impl IntoIterator<Item = PageImage>,
    recognizer: &dyn TextRecognizer,
    config: &JobConfig,
    font: F,
) -> Result<Vec<u8>> {
    match assemble_cancellable(
        pages,
        recognizer,
        config,
        font,
        &CancelToken::new(),
        CancelPolicy::FinishPartial,
    )? {
        AssembleOutcome::Complete(bytes) => Ok(bytes),
        // Unreachable: the token above is never cancelled.
        AssembleOutcome::Partial { bytes, .. } => Ok(bytes),
        AssembleOutcome::Discarded => Err(ScanwerkError::State(
            "assembly discarded without cancellation".into(),
        )),
    }
}

/// Assemble with cooperative cancellation.
///
/// Pages are processed strictly in the supplied order, one page per image.
/// Page-level failures (unreadable dimensions, degenerate geometry, OCR
/// errors) follow `config.on_page_failure`; empty-string regions are always
/// skipped individually with a warning and never fail their page.
#[instrument(skip_all, fields(mode = config.target_size.map_or("native", |_| "fit")))]
pub fn assemble_cancellable<F: FontResource>(
    pages: impl IntoIterator<Item = PageImage>,
    recognizer: &dyn TextRecognizer,
    config: &JobConfig,
    font: F,
    cancel: &CancelToken,
    cancel_policy: CancelPolicy,
) -> Result<AssembleOutcome> {
    config.validate()?;

    let mut builder = DocumentBuilder::new(&config.output_name, font)?;
    builder.set_debug_boxes(config.debug_boxes);

    let mut cancelled = false;
    for (index, page) in pages.into_iter().enumerate() {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        info!(page = index + 1, label = %page.label, "processing page");

        // Resolve everything fallible before the page is started, so a
        // skipped page leaves no half-open page behind.
        match prepare_page(&page, recognizer, config) {
            Ok((geometry, background, regions)) => {
                builder.start_page(&geometry, background.as_ref())?;
                for region in &regions {
                    match builder.draw_region(region) {
                        Ok(()) => {}
                        Err(ScanwerkError::EmptyRegion) => {
                            warn!(page = index + 1, "skipping region with empty text");
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
            Err(err) => match config.on_page_failure {
                PageFailurePolicy::Abort => return Err(err),
                PageFailurePolicy::Skip => {
                    warn!(page = index + 1, label = %page.label, error = %err, "skipping page");
                }
            },
        }
    }

    if cancelled {
        info!(pages = builder.page_count(), "run cancelled at page boundary");
        return match cancel_policy {
            CancelPolicy::Discard => Ok(AssembleOutcome::Discarded),
            CancelPolicy::FinishPartial => {
                let pages = builder.page_count();
                let bytes = builder.finish()?;
                Ok(AssembleOutcome::Partial { bytes, pages })
            }
        };
    }
    Ok(AssembleOutcome::Complete(builder.finish()?))
}

type PreparedPage = (PageGeometry, Option<DynamicImage>, Vec<MappedRegion>);

fn prepare_page(
    page: &PageImage,
    recognizer: &dyn TextRecognizer,
    config: &JobConfig,
) -> Result<PreparedPage> {
    let (width, height) = (page.image.width(), page.image.height());
    if width == 0 || height == 0 {
        return Err(ScanwerkError::InvalidInput(format!(
            "image '{}' has unresolvable dimensions ({width}x{height})",
            page.label
        )));
    }
    let source = SourceImage::new(width, height);
    let geometry = PageGeometry::resolve(&source, config.target_size);

    let regions = recognizer.recognize(&page.image)?;
    let mapped = regions
        .iter()
        .map(|region| map_region(region, &source, &geometry, config.lattice_unit))
        .collect::<Result<Vec<_>>>()?;

    // The scan itself is only drawn in native-image mode; fit-to-page
    // output carries the text layer on a blank page.
    let background = (geometry.mode == RenderMode::Native).then(|| page.image.clone());
    Ok((geometry, background, mapped))
}

/// Build an ordered page sequence from a directory of page images.
///
/// Entries are sorted by file name; non-image files are skipped with a log
/// line, matching interactive use where a directory may also hold the
/// output document.
pub fn image_sequence_from_dir(dir: impl AsRef<Path>) -> Result<Vec<PageImage>> {
    let dir = dir.as_ref();
    let mut names: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    names.sort();

    let mut pages = Vec::new();
    for path in names {
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png"));
        if !is_image {
            info!(path = %path.display(), "not a page image, skipping");
            continue;
        }
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image = image::open(&path).map_err(|err| {
            ScanwerkError::InvalidInput(format!("cannot read image {}: {err}", path.display()))
        })?;
        pages.push(PageImage::new(label, image));
    }
    Ok(pages)
}
