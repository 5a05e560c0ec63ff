// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the region mapping hot loop in the
// scanwerk-document crate. Mapping runs once per recognized line per page,
// so a densely printed page can hit it a few hundred times.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use scanwerk_core::config::JobConfig;
use scanwerk_core::types::{Region, SourceImage};
use scanwerk_document::{PageGeometry, geometry::map_region};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark mapping a full page's worth of regions from a 2480x3507 source
/// (A4 at 300 DPI) onto an A4 point grid.
///
/// Region boxes are laid out as 40 lines of text down the page, which is a
/// realistic density for a typewritten scan.
fn bench_map_region(c: &mut Criterion) {
    let config = JobConfig::default();
    let source = SourceImage::new(2480, 3507);
    let geometry = PageGeometry::resolve(&source, config.target_size);

    let regions: Vec<Region> = (0..40)
        .map(|i| {
            let top = 120.0 + 80.0 * i as f64;
            Region::new((200.0, top + 60.0), (2280.0, top), format!("line {i}"))
        })
        .collect();

    c.bench_function("map_region (40 lines, A4 fit)", |b| {
        b.iter(|| {
            for region in &regions {
                let mapped =
                    map_region(black_box(region), &source, &geometry, config.lattice_unit);
                black_box(mapped).unwrap();
            }
        });
    });
}

criterion_group!(benches, bench_map_region);
criterion_main!(benches);
