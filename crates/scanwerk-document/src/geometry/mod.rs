// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry pipeline — page-fit resolution, lattice quantization, and
// pixel-to-page coordinate mapping.

pub mod lattice;
pub mod mapper;
pub mod resolver;

pub use lattice::quantize;
pub use mapper::map_region;
pub use resolver::PageGeometry;

/// Fixed lattice unit for width/height deltas and the vertical-centering
/// correction term. Positions snap at the caller-configured unit; deltas
/// always snap at 2 so box proportions stay stable regardless of the
/// position granularity.
pub const SIZE_DELTA_UNIT: u32 = 2;
