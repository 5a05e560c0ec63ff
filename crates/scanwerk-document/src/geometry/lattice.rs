// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lattice quantization — snap a scaled value to a configurable grid.

/// Scale `value` by `factor` and snap the result to a grid of size `unit`
/// (truncating toward zero). `unit` must be >= 1.
///
/// Pure and stateless, so it can be unit-tested directly and evaluated in
/// parallel across regions. Idempotent at `factor = 1`:
/// `quantize(quantize(v, 1.0, u) as f64, 1.0, u) == quantize(v, 1.0, u)`.
pub fn quantize(value: f64, factor: f64, unit: u32) -> i64 {
    debug_assert!(unit >= 1, "lattice unit must be >= 1");
    (value * factor / unit as f64).trunc() as i64 * unit as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_down_to_grid() {
        assert_eq!(quantize(103.0, 1.0, 5), 100);
        assert_eq!(quantize(104.9, 1.0, 5), 100);
        assert_eq!(quantize(105.0, 1.0, 5), 105);
        assert_eq!(quantize(7.0, 1.0, 2), 6);
    }

    #[test]
    fn unit_one_truncates_only() {
        assert_eq!(quantize(42.9, 1.0, 1), 42);
        assert_eq!(quantize(42.0, 1.0, 1), 42);
    }

    #[test]
    fn applies_scale_before_snapping() {
        // 1900 * (842/2000) = 799.9 -> 799 at unit 1
        assert_eq!(quantize(1900.0, 842.0 / 2000.0, 1), 799);
        // 1000 * 0.421 / 2 = 210.5 -> 210 * 2 = 420
        assert_eq!(quantize(1000.0, 842.0 / 2000.0, 2), 420);
    }

    #[test]
    fn idempotent_at_unit_scale() {
        for unit in [1u32, 2, 3, 5, 7, 10] {
            for value in [0.0, 0.4, 1.0, 2.5, 13.0, 99.9, 100.0, 12345.678] {
                let once = quantize(value, 1.0, unit);
                let twice = quantize(once as f64, 1.0, unit);
                assert_eq!(once, twice, "value {value} unit {unit}");
            }
        }
    }

    #[test]
    fn truncates_toward_zero_for_negative_values() {
        assert_eq!(quantize(-3.7, 1.0, 1), -3);
        assert_eq!(quantize(-7.0, 1.0, 2), -6);
    }
}
