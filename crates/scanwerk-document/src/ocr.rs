// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR collaborator backed by the `ocrs` crate, a pure-Rust OCR engine
// running neural network models via `rten`.
//
// # Model Setup
//
// Two model files are required:
//
// - **Detection model** (`text-detection.rten`) — locates text regions.
// - **Recognition model** (`text-recognition.rten`) — decodes characters.
//
// Models can be obtained by running the `ocrs-cli` tool once:
//   ```sh
//   cargo install ocrs-cli
//   ocrs some-image.png  # downloads models to ~/.cache/ocrs/
//   ```
//
// The default cache directory is `$XDG_CACHE_HOME/ocrs` (typically
// `~/.cache/ocrs`).

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams, TextItem};
use rten::Model;
use rten_imageproc::BoundingRect;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::Region;
use tracing::{debug, info, instrument, warn};

use crate::assemble::TextRecognizer;

/// Default directory for cached OCR model files, per the XDG Base
/// Directory specification.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Configuration for constructing an [`OcrEngine`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file (`.rten`).
    pub recognition_model_path: PathBuf,
    /// Language codes the caller expects on the pages. Advisory: the ocrs
    /// models are Latin-script; unsupported codes are logged, not fatal.
    pub languages: Vec<String>,
    /// Advisory hardware-acceleration toggle.
    pub accelerate: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        let dir = default_model_dir();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
            languages: vec!["en".into()],
            accelerate: true,
        }
    }
}

impl OcrConfig {
    /// Create a config with an explicit model directory containing
    /// `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
            ..Default::default()
        }
    }

    /// Verify that both model files exist before loading.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(ScanwerkError::Ocr(format!(
                    "OCR model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// OCR engine producing per-image region lists for the assembly pipeline.
///
/// Model loading is the expensive step — keep the engine around and reuse
/// it for every page. The engine must be compiled in release mode; debug
/// builds of `rten` are 10-100x slower.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load models per `config` and initialise the engine.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        if !config.accelerate {
            // rten picks its own execution strategy; the toggle is
            // advisory and recorded for diagnosis only.
            debug!("hardware acceleration disabled (advisory)");
        }
        for code in &config.languages {
            if !matches!(code.as_str(), "en" | "fr" | "de" | "es" | "it" | "pt" | "nl") {
                warn!(language = %code, "language may be outside the model's Latin glyph set");
            }
        }

        info!("Loading OCR detection model");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            ScanwerkError::Ocr(format!(
                "failed to load detection model from {}: {}",
                config.detection_model_path.display(),
                err
            ))
        })?;

        info!("Loading OCR recognition model");
        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|err| {
                ScanwerkError::Ocr(format!(
                    "failed to load recognition model from {}: {}",
                    config.recognition_model_path.display(),
                    err
                ))
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| ScanwerkError::Ocr(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    /// Create an engine using the default model cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OcrConfig::default())
    }
}

impl TextRecognizer for OcrEngine {
    /// Detect and recognize text lines, returning one [`Region`] per line
    /// in reading order. Lines whose recognized text is blank are dropped.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Region>> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            ScanwerkError::Ocr(format!(
                "failed to create image source ({width}x{height}): {err}"
            ))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| ScanwerkError::Ocr(format!("OCR preprocessing failed: {err}")))?;

        let word_rects = self
            .engine
            .detect_words(&input)
            .map_err(|err| ScanwerkError::Ocr(format!("word detection failed: {err}")))?;
        debug!(word_count = word_rects.len(), "words detected");

        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| ScanwerkError::Ocr(format!("line recognition failed: {err}")))?;

        let mut regions = Vec::with_capacity(line_texts.len());
        for line in line_texts.iter().flatten() {
            let text = line.to_string();
            if text.trim().is_empty() {
                continue;
            }
            // Reduce the line's rotated rect to the two diagonal anchors
            // the mapper consumes: bottom-left and top-right in image
            // coordinates (y down).
            let rect = line.rotated_rect().bounding_rect();
            regions.push(Region::new(
                (rect.left() as f64, rect.bottom() as f64),
                (rect.right() as f64, rect.top() as f64),
                text,
            ));
        }

        info!(regions = regions.len(), "recognition complete");
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_to_cache_dir() {
        let config = OcrConfig::default();
        let detection = config.detection_model_path.to_string_lossy();
        assert!(detection.ends_with(DETECTION_MODEL_FILENAME));
        let recognition = config.recognition_model_path.to_string_lossy();
        assert!(recognition.ends_with(RECOGNITION_MODEL_FILENAME));
    }

    #[test]
    fn config_from_dir() {
        let config = OcrConfig::from_dir("/tmp/my-models");
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn validate_missing_models() {
        let config = OcrConfig::from_dir("/nonexistent/path/ocr-models");
        assert!(config.validate().is_err());
    }
}
