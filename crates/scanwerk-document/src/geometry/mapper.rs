// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate mapping — transform one recognized region from image pixel
// space (top-left origin, y down) into page-point space (bottom-left
// origin, y up).

use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{MappedRegion, Region, SourceImage};

use super::SIZE_DELTA_UNIT;
use super::lattice::quantize;
use super::resolver::PageGeometry;

/// Map `region` into page space under `geometry`, snapping positions at
/// `lattice_unit` and size deltas at the fixed unit of 2.
///
/// The vertical axis is flipped (`ih - y`) and then re-centred: half the
/// scaled image height is subtracted from half the target height and the
/// difference added to the flipped coordinate. The flipped anchor uses the
/// caller's position unit while the `ih/2` term keeps the fixed size-delta
/// unit; the mixed granularities are intentional reference behavior.
///
/// Pure: no side effects, safe to evaluate in parallel across regions as
/// long as results are re-serialized into page order before assembly.
pub fn map_region(
    region: &Region,
    source: &SourceImage,
    geometry: &PageGeometry,
    lattice_unit: u32,
) -> Result<MappedRegion> {
    if source.height == 0 {
        return Err(ScanwerkError::Geometry(
            "source image has zero height".into(),
        ));
    }

    let f = geometry.scale;
    let ih = source.height as f64;
    let (x, y) = region.anchor;

    let mapped_x = quantize(x, f, lattice_unit) as f64;
    let mapped_y = quantize(ih - y, f, lattice_unit) as f64
        + (geometry.page_size.height / 2.0).floor()
        - quantize(ih / 2.0, f, SIZE_DELTA_UNIT) as f64;
    let mapped_w = quantize(region.pixel_width(), f, SIZE_DELTA_UNIT) as f64;
    let mapped_h = quantize(region.pixel_height(), f, SIZE_DELTA_UNIT) as f64;

    Ok(MappedRegion {
        x: mapped_x,
        y: mapped_y,
        width: mapped_w,
        height: mapped_h,
        text: region.text.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanwerk_core::types::PageSizePt;

    fn fit_geometry(source: &SourceImage, target: PageSizePt) -> PageGeometry {
        PageGeometry::resolve(source, Some(target))
    }

    // Scenario from the reference: 1000x2000 px image, one region with
    // bottom-left (100, 100) and top-right (150, 90), target (595, 842),
    // position unit 1. f = 842/2000 = 0.421.
    #[test]
    fn maps_known_region_exactly() {
        let source = SourceImage::new(1000, 2000);
        let geometry = fit_geometry(&source, PageSizePt::new(595.0, 842.0));
        let region = Region::new((100.0, 100.0), (150.0, 90.0), "sample");

        let mapped = map_region(&region, &source, &geometry, 1).unwrap();

        // x: trunc(100 * 0.421) = 42
        assert_eq!(mapped.x, 42.0);
        // y: trunc(1900 * 0.421) + 842/2 - trunc(1000 * 0.421 / 2) * 2
        //  = 799 + 421 - 420 = 800
        assert_eq!(mapped.y, 800.0);
        // w: trunc(50 * 0.421 / 2) * 2 = 20
        assert_eq!(mapped.width, 20.0);
        // h: trunc(10 * 0.421 / 2) * 2 = 4
        assert_eq!(mapped.height, 4.0);
        assert_eq!(mapped.text, "sample");
    }

    #[test]
    fn native_mode_snaps_without_scaling() {
        let source = SourceImage::new(1000, 2000);
        let geometry = PageGeometry::resolve(&source, None);
        let region = Region::new((103.0, 100.0), (150.0, 93.0), "t");

        let mapped = map_region(&region, &source, &geometry, 5).unwrap();

        // Position snaps at the caller's unit, size at the fixed unit 2.
        assert_eq!(mapped.x, 100.0);
        // trunc(1900/5)*5 + floor(2000/2) - trunc(1000/2)*2 = 1900 + 1000 - 1000
        assert_eq!(mapped.y, 1900.0);
        assert_eq!(mapped.width, 46.0);
        assert_eq!(mapped.height, 6.0);
    }

    #[test]
    fn vertical_flip_is_monotonic() {
        let source = SourceImage::new(1000, 2000);
        let geometry = fit_geometry(&source, PageSizePt::new(595.0, 842.0));

        // Lower on the image (larger y) must map lower on the page.
        let upper = Region::new((100.0, 200.0), (300.0, 180.0), "upper");
        let lower = Region::new((100.0, 1800.0), (300.0, 1780.0), "lower");

        let mapped_upper = map_region(&upper, &source, &geometry, 1).unwrap();
        let mapped_lower = map_region(&lower, &source, &geometry, 1).unwrap();
        assert!(mapped_upper.y > mapped_lower.y);
    }

    #[test]
    fn zero_height_image_is_a_geometry_error() {
        let source = SourceImage::new(1000, 0);
        let geometry = PageGeometry::resolve(&source, None);
        let region = Region::new((0.0, 0.0), (10.0, 0.0), "x");

        let result = map_region(&region, &source, &geometry, 1);
        assert!(matches!(result, Err(ScanwerkError::Geometry(_))));
    }

    #[test]
    fn mapped_sizes_are_never_negative_for_valid_quads() {
        let source = SourceImage::new(800, 600);
        let geometry = fit_geometry(&source, PageSizePt::new(595.0, 842.0));
        let region = Region::new((10.0, 50.0), (11.0, 49.0), "."); // 1x1 box

        let mapped = map_region(&region, &source, &geometry, 1).unwrap();
        assert!(mapped.width >= 0.0);
        assert!(mapped.height >= 0.0);
    }
}
