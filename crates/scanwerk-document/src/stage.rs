// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Staging boundary for the document-rasterization collaborator.
//
// A source document is rasterized into per-page images by an external
// collaborator; when those images need to land on disk (for inspection or
// for a later directory-driven run) they are staged here. The pipeline
// itself never requires staged files — it accepts any ordered sequence of
// page images.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::info;

/// Write rasterized page images as `page_1.jpg`, `page_2.jpg`, … into a
/// freshly created directory.
///
/// The destination must not exist: a collision aborts the whole run rather
/// than silently overwriting a previous staging.
pub fn stage_page_images(
    dir: impl AsRef<Path>,
    images: impl IntoIterator<Item = DynamicImage>,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir(dir).map_err(|err| {
        if err.kind() == std::io::ErrorKind::AlreadyExists {
            ScanwerkError::FileSystem(format!(
                "staging destination {} already exists; refusing to overwrite",
                dir.display()
            ))
        } else {
            ScanwerkError::FileSystem(format!(
                "cannot create staging directory {}: {err}",
                dir.display()
            ))
        }
    })?;

    let mut paths = Vec::new();
    for (index, image) in images.into_iter().enumerate() {
        let path = dir.join(format!("page_{}.jpg", index + 1));
        // JPEG has no alpha channel.
        image
            .to_rgb8()
            .save_with_format(&path, ImageFormat::Jpeg)
            .map_err(|err| {
                ScanwerkError::Image(format!("cannot write {}: {err}", path.display()))
            })?;
        paths.push(path);
    }
    info!(dir = %dir.display(), pages = paths.len(), "page images staged");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_numbered_pages_in_order() {
        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("doc");
        let images = vec![DynamicImage::new_rgb8(8, 8), DynamicImage::new_rgb8(8, 8)];

        let paths = stage_page_images(&dest, images).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("page_1.jpg"));
        assert!(paths[1].ends_with("page_2.jpg"));
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[test]
    fn existing_destination_is_a_filesystem_error() {
        let root = tempfile::tempdir().unwrap();
        let dest = root.path().join("doc");
        std::fs::create_dir(&dest).unwrap();

        let result = stage_page_images(&dest, vec![DynamicImage::new_rgb8(8, 8)]);
        assert!(matches!(result, Err(ScanwerkError::FileSystem(_))));
        // Nothing was written into the pre-existing directory.
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
    }
}
