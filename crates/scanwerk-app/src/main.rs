// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — searchable-PDF assembly from scanned page images
//
// Entry point. Initialises logging, prompts for a job description on
// stdin, runs OCR over the page images, and writes a PDF with an
// invisible text layer aligned to each scan.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use scanwerk_core::config::{JobConfig, sanitize_output_name};
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::PageSizePt;
use scanwerk_document::ocr::{OcrConfig, OcrEngine};
use scanwerk_document::{OverlayFont, assemble, image_sequence_from_dir};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Scanwerk starting");

    if let Err(err) = run() {
        tracing::error!(error = %err, "job failed");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let languages = prompt("Languages to recognize (space-separated codes, e.g. `en fr`)")?;
    let languages: Vec<String> = languages.split_whitespace().map(str::to_owned).collect();

    let image_dir = PathBuf::from(prompt("Directory containing the page images")?);
    if !image_dir.is_dir() {
        return Err(ScanwerkError::InvalidInput(format!(
            "{} is not a directory",
            image_dir.display()
        )));
    }

    let font_path = PathBuf::from(prompt("Path to a TTF/OTF font for the text layer")?);
    let output_name = sanitize_output_name(&prompt("Output file name")?);

    let size_choice = prompt("Page size: a4 (fit to page) or native (image dimensions)")?;
    let target_size = match size_choice.trim().to_ascii_lowercase().as_str() {
        "" | "a4" => Some(PageSizePt::A4),
        "native" => None,
        other => {
            return Err(ScanwerkError::InvalidInput(format!(
                "unknown page size '{other}' (expected `a4` or `native`)"
            )));
        }
    };

    let config = JobConfig {
        target_size,
        languages: languages.clone(),
        output_name: output_name.clone(),
        ..Default::default()
    };
    config.validate()?;

    let engine = OcrEngine::new(OcrConfig {
        languages,
        accelerate: config.accelerate,
        ..Default::default()
    })?;
    let font = OverlayFont::from_path(&font_path)?;
    let pages = image_sequence_from_dir(&image_dir)?;
    if pages.is_empty() {
        return Err(ScanwerkError::InvalidInput(format!(
            "no page images found in {}",
            image_dir.display()
        )));
    }
    tracing::info!(pages = pages.len(), "page sequence loaded");

    let bytes = assemble(pages, &engine, &config, font)?;

    let output_path = image_dir.join(&config.output_name);
    std::fs::write(&output_path, &bytes)?;
    tracing::info!(path = %output_path.display(), bytes = bytes.len(), "document written");
    Ok(())
}

/// Prompt on stdout and read one trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
    print!("{message}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}
