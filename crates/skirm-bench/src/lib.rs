//! Benchmark fixtures for the Skirm workspace.
//!
//! Deterministic map profiles shared by the criterion benches:
//!
//! - [`open_arena`]: uniform-cost grid with a handful of value spikes.
//! - [`walled_arena`]: the same grid with corridor walls, forcing the
//!   search to route around obstacles.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use skirm_core::Cell;
use skirm_field::Field;

/// A `side × side` arena: unit costs everywhere, `spikes` value cells
/// placed on a deterministic diagonal stride.
pub fn open_arena(side: u32, spikes: u32) -> (Field, Field) {
    let costs = Field::filled(side, side, 1.0).unwrap();
    let mut values = Field::new(side, side).unwrap();
    let stride = (side / (spikes + 1)).max(1) as i32;
    for i in 1..=spikes as i32 {
        let cell = Cell::new(i * stride, ((i * stride) + stride / 2) % side as i32);
        values.set(cell, 10.0 * f64::from(i));
    }
    (values, costs)
}

/// [`open_arena`] with vertical walls every eight columns, each with a
/// one-cell gap, so searches must thread corridors.
pub fn walled_arena(side: u32, spikes: u32) -> (Field, Field) {
    let (values, mut costs) = open_arena(side, spikes);
    for x in (8..side as i32).step_by(8) {
        for y in 0..side as i32 {
            if y != (x / 8) % side as i32 {
                costs.set(Cell::new(x, y), f64::INFINITY);
            }
        }
    }
    (values, costs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arenas_are_deterministic() {
        let (va, ca) = open_arena(64, 4);
        let (vb, cb) = open_arena(64, 4);
        assert_eq!(va, vb);
        assert_eq!(ca, cb);
        assert!(va.max() > 0.0);
    }

    #[test]
    fn walls_leave_gaps() {
        let (_, costs) = walled_arena(32, 2);
        assert!(costs.get(Cell::new(8, 1)).is_finite()); // the gap in wall x=8
        assert!(costs.get(Cell::new(8, 5)).is_infinite());
    }
}
