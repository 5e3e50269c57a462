//! Stamp kernels: immutable square weight patterns.
//!
//! Kernels describe an area-of-effect shape and falloff around a unit —
//! attack coverage, proximity pressure, hazard zones. They are built once
//! at engine startup from closed-form distance functions and never
//! mutated; ranges are expressed as *squared* Euclidean distances, like
//! every range in the game rules.

/// An immutable `(2r+1) × (2r+1)` matrix of relative weights centered on
/// a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    radius: i32,
    side: usize,
    weights: Vec<f64>,
}

impl Kernel {
    fn from_fn(radius: i32, f: impl Fn(i32, i32) -> f64) -> Self {
        assert!(radius >= 0, "kernel radius must be nonnegative");
        let side = (2 * radius + 1) as usize;
        let mut weights = vec![0.0; side * side];
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                weights[((dy + radius) as usize) * side + (dx + radius) as usize] = f(dx, dy);
            }
        }
        Self {
            radius,
            side,
            weights,
        }
    }

    /// 1.0 inside squared radius `r2`, 0.0 outside.
    pub fn uniform_disc(r2: i32) -> Self {
        let r = (f64::from(r2)).sqrt().ceil() as i32;
        Self::from_fn(r, |dx, dy| {
            if dx * dx + dy * dy <= r2 {
                1.0
            } else {
                0.0
            }
        })
    }

    /// 1.0 inside squared radius `r2`, 0.5 on the one-cell soft rim —
    /// cells from which a single step reaches the disc. Used to stay
    /// clear of enemy coverage that could advance into range.
    pub fn soft_disc(r2: i32) -> Self {
        let r = (f64::from(r2)).sqrt().ceil() as i32 + 1;
        Self::from_fn(r, |dx, dy| {
            if dx * dx + dy * dy <= r2 {
                1.0
            } else {
                let sx = (dx.abs() - 1).max(0);
                let sy = (dy.abs() - 1).max(0);
                if sx * sx + sy * sy <= r2 {
                    0.5
                } else {
                    0.0
                }
            }
        })
    }

    /// Inverse-square falloff `scale / (1 + d²)` out to `radius`.
    pub fn falloff(radius: i32, scale: f64) -> Self {
        Self::from_fn(radius, |dx, dy| {
            scale / (1.0 + f64::from(dx * dx + dy * dy))
        })
    }

    /// Wide falloff `num / (num + d²)` out to `radius` — flatter near
    /// the center than [`falloff`](Self::falloff), for influence that
    /// should be felt far away.
    pub fn plateau(radius: i32, num: f64) -> Self {
        Self::from_fn(radius, |dx, dy| num / (num + f64::from(dx * dx + dy * dy)))
    }

    /// 1.0 on the ring `inner2 < d² ≤ outer2`, 0.0 elsewhere. Attack
    /// rings for classes with a minimum range, and support-link bands.
    pub fn annulus(inner2: i32, outer2: i32) -> Self {
        assert!(inner2 < outer2, "annulus requires inner2 < outer2");
        let r = (f64::from(outer2)).sqrt().ceil() as i32;
        Self::from_fn(r, |dx, dy| {
            let d2 = dx * dx + dy * dy;
            if d2 > inner2 && d2 <= outer2 {
                1.0
            } else {
                0.0
            }
        })
    }

    /// Replace the weight at offset `(dx, dy)`, returning the kernel.
    ///
    /// Some proximity shapes want hand-tuned values on a few central
    /// cells that no closed form produces.
    pub fn with_weight(mut self, dx: i32, dy: i32, weight: f64) -> Self {
        assert!(
            dx.abs() <= self.radius && dy.abs() <= self.radius,
            "offset ({dx}, {dy}) outside kernel radius {}",
            self.radius,
        );
        let i = ((dy + self.radius) as usize) * self.side + (dx + self.radius) as usize;
        self.weights[i] = weight;
        self
    }

    /// Kernel radius; the side length is `2 * radius + 1`.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Weight at offset `(dx, dy)`; zero outside the kernel square.
    pub fn weight(&self, dx: i32, dy: i32) -> f64 {
        if dx.abs() > self.radius || dy.abs() > self.radius {
            return 0.0;
        }
        self.weights[((dy + self.radius) as usize) * self.side + (dx + self.radius) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_disc_covers_exact_squared_radius() {
        let k = Kernel::uniform_disc(2);
        assert_eq!(k.radius(), 2);
        assert_eq!(k.weight(0, 0), 1.0);
        assert_eq!(k.weight(1, 1), 1.0); // d² = 2
        assert_eq!(k.weight(2, 0), 0.0); // d² = 4
        assert_eq!(k.weight(1, 2), 0.0); // d² = 5
    }

    #[test]
    fn soft_disc_has_half_weight_rim() {
        let k = Kernel::soft_disc(2);
        assert_eq!(k.weight(1, 1), 1.0); // inside
        assert_eq!(k.weight(2, 0), 0.5); // one step from (1, 0)
        assert_eq!(k.weight(2, 2), 0.5); // one step from (1, 1)
        assert_eq!(k.weight(3, 3), 0.0);
    }

    #[test]
    fn falloff_decreases_with_distance() {
        let k = Kernel::falloff(5, 1.0);
        assert_eq!(k.weight(0, 0), 1.0);
        assert_eq!(k.weight(1, 0), 0.5);
        assert!(k.weight(2, 0) < k.weight(1, 0));
        assert!(k.weight(5, 5) > 0.0);
    }

    #[test]
    fn plateau_is_flatter_than_falloff() {
        let k = Kernel::plateau(12, 50.0);
        assert_eq!(k.weight(0, 0), 1.0);
        assert!(k.weight(3, 0) > 0.8);
        assert!(k.weight(12, 0) > 0.2);
    }

    #[test]
    fn annulus_excludes_dead_zone() {
        let k = Kernel::annulus(10, 50);
        assert_eq!(k.weight(0, 0), 0.0);
        assert_eq!(k.weight(3, 1), 0.0); // d² = 10, on the inner bound
        assert_eq!(k.weight(3, 2), 1.0); // d² = 13
        assert_eq!(k.weight(7, 1), 1.0); // d² = 50, on the outer bound
        assert_eq!(k.weight(7, 2), 0.0); // d² = 53
    }

    #[test]
    fn with_weight_overrides_single_cell() {
        let k = Kernel::falloff(5, 1.0).with_weight(0, 0, 0.5);
        assert_eq!(k.weight(0, 0), 0.5);
        assert_eq!(k.weight(1, 0), 0.5);
    }

    #[test]
    fn weight_outside_square_is_zero() {
        let k = Kernel::uniform_disc(2);
        assert_eq!(k.weight(9, 0), 0.0);
        assert_eq!(k.weight(0, -9), 0.0);
    }
}
