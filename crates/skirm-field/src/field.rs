//! The dense 2D real-valued grid and its elementwise algebra.

use crate::error::FieldError;
use crate::kernel::Kernel;
use skirm_core::Cell;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// A W×H matrix of `f64`, one value per map cell.
///
/// Fields have no identity beyond their values: cached fields are
/// by-value clones, and every field is rebuilt from the current snapshot
/// each turn. Dimensions are fixed at construction and must match the
/// game map; `f64::INFINITY` marks forbidden cells (impassable terrain,
/// occupied tiles).
///
/// # Algebra
///
/// Elementwise `+ - * /` are provided against another field of identical
/// dimensions and against an `f64` scalar, consuming the left operand and
/// reusing its buffer. Mixed-dimension operands are a programming error
/// and panic.
///
/// # Division discipline
///
/// Nothing stops a cost or weight field from containing zeros, so call
/// sites never divide by a raw field — always by `(field + offset)` with
/// a positive offset, e.g. `target / (hazard + 1.0)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width: u32,
    height: u32,
    cells: Vec<f64>,
}

impl Field {
    /// Maximum dimension size: coordinates use `i32`, so each axis must fit.
    pub const MAX_DIM: u32 = i32::MAX as u32;

    /// Create a zero-filled field.
    ///
    /// Returns `Err(FieldError::EmptyField)` if either dimension is 0, or
    /// `Err(FieldError::DimensionTooLarge)` if either exceeds `i32::MAX`.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        Self::filled(width, height, 0.0)
    }

    /// Create a field with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: f64) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyField);
        }
        if width > Self::MAX_DIM {
            return Err(FieldError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(FieldError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        })
    }

    /// Create a field by evaluating `f` at every cell.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(Cell) -> f64,
    ) -> Result<Self, FieldError> {
        let mut field = Self::new(width, height)?;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let cell = Cell::new(x, y);
                let i = field.idx(cell);
                field.cells[i] = f(cell);
            }
        }
        Ok(field)
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total cell count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` — construction rejects empty fields.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `true` if `cell` lies within this field.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Flat index of an in-bounds cell.
    pub fn idx(&self, cell: Cell) -> usize {
        debug_assert!(self.in_bounds(cell), "cell {cell} out of bounds");
        cell.y as usize * self.width as usize + cell.x as usize
    }

    /// The cell at a flat index.
    pub fn cell_at(&self, idx: usize) -> Cell {
        Cell::new(
            (idx % self.width as usize) as i32,
            (idx / self.width as usize) as i32,
        )
    }

    /// Value at `cell`. Panics out of bounds.
    pub fn get(&self, cell: Cell) -> f64 {
        self.cells[self.idx(cell)]
    }

    /// Mutable value at `cell`. Panics out of bounds.
    pub fn get_mut(&mut self, cell: Cell) -> &mut f64 {
        let i = self.idx(cell);
        &mut self.cells[i]
    }

    /// Set the value at `cell`. Panics out of bounds.
    pub fn set(&mut self, cell: Cell, value: f64) {
        let i = self.idx(cell);
        self.cells[i] = value;
    }

    /// Raw cell values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    /// Sum of all cells.
    pub fn sum(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Maximum cell value, floored at `0.0`.
    ///
    /// The zero floor is load-bearing: the value search uses this as its
    /// optimistic upper bound, and an all-negative value field must bound
    /// the score at zero so the search terminates immediately.
    pub fn max(&self) -> f64 {
        self.cells.iter().fold(0.0, |acc, &v| acc.max(v))
    }

    fn same_shape(&self, other: &Field) {
        assert!(
            self.width == other.width && self.height == other.height,
            "field dimension mismatch: {}x{} vs {}x{}",
            self.width,
            self.height,
            other.width,
            other.height,
        );
    }

    /// Add `kernel * factor` into the neighbourhood of `center`.
    ///
    /// The kernel is clipped at map bounds — partial overlap at edges is
    /// silently truncated, never an error. Stamping with `-factor`
    /// applies the exact negation of each added term, so an add/undo pair
    /// restores prior values without clipping asymmetry.
    pub fn stamp_add(&mut self, kernel: &Kernel, center: Cell, factor: f64) {
        let r = kernel.radius();
        for dy in -r..=r {
            for dx in -r..=r {
                let cell = center.offset(dx, dy);
                if self.in_bounds(cell) {
                    let i = self.idx(cell);
                    self.cells[i] += kernel.weight(dx, dy) * factor;
                }
            }
        }
    }

    /// Raise each neighbourhood cell to at least `kernel * factor`,
    /// with the same bound clipping as [`stamp_add`](Self::stamp_add).
    pub fn stamp_max(&mut self, kernel: &Kernel, center: Cell, factor: f64) {
        let r = kernel.radius();
        for dy in -r..=r {
            for dx in -r..=r {
                let cell = center.offset(dx, dy);
                if self.in_bounds(cell) {
                    let i = self.idx(cell);
                    self.cells[i] = self.cells[i].max(kernel.weight(dx, dy) * factor);
                }
            }
        }
    }
}

// ── Field ∘ Field ───────────────────────────────────────────────

impl AddAssign<&Field> for Field {
    fn add_assign(&mut self, rhs: &Field) {
        self.same_shape(rhs);
        for (a, b) in self.cells.iter_mut().zip(&rhs.cells) {
            *a += b;
        }
    }
}

impl SubAssign<&Field> for Field {
    fn sub_assign(&mut self, rhs: &Field) {
        self.same_shape(rhs);
        for (a, b) in self.cells.iter_mut().zip(&rhs.cells) {
            *a -= b;
        }
    }
}

impl MulAssign<&Field> for Field {
    fn mul_assign(&mut self, rhs: &Field) {
        self.same_shape(rhs);
        for (a, b) in self.cells.iter_mut().zip(&rhs.cells) {
            *a *= b;
        }
    }
}

impl DivAssign<&Field> for Field {
    fn div_assign(&mut self, rhs: &Field) {
        self.same_shape(rhs);
        for (a, b) in self.cells.iter_mut().zip(&rhs.cells) {
            *a /= b;
        }
    }
}

impl Add<&Field> for Field {
    type Output = Field;
    fn add(mut self, rhs: &Field) -> Field {
        self += rhs;
        self
    }
}

impl Sub<&Field> for Field {
    type Output = Field;
    fn sub(mut self, rhs: &Field) -> Field {
        self -= rhs;
        self
    }
}

impl Mul<&Field> for Field {
    type Output = Field;
    fn mul(mut self, rhs: &Field) -> Field {
        self *= rhs;
        self
    }
}

impl Div<&Field> for Field {
    type Output = Field;
    fn div(mut self, rhs: &Field) -> Field {
        self /= rhs;
        self
    }
}

// ── Field ∘ scalar ──────────────────────────────────────────────

impl AddAssign<f64> for Field {
    fn add_assign(&mut self, rhs: f64) {
        for a in &mut self.cells {
            *a += rhs;
        }
    }
}

impl SubAssign<f64> for Field {
    fn sub_assign(&mut self, rhs: f64) {
        for a in &mut self.cells {
            *a -= rhs;
        }
    }
}

impl MulAssign<f64> for Field {
    fn mul_assign(&mut self, rhs: f64) {
        for a in &mut self.cells {
            *a *= rhs;
        }
    }
}

impl DivAssign<f64> for Field {
    fn div_assign(&mut self, rhs: f64) {
        for a in &mut self.cells {
            *a /= rhs;
        }
    }
}

impl Add<f64> for Field {
    type Output = Field;
    fn add(mut self, rhs: f64) -> Field {
        self += rhs;
        self
    }
}

impl Sub<f64> for Field {
    type Output = Field;
    fn sub(mut self, rhs: f64) -> Field {
        self -= rhs;
        self
    }
}

impl Mul<f64> for Field {
    type Output = Field;
    fn mul(mut self, rhs: f64) -> Field {
        self *= rhs;
        self
    }
}

impl Div<f64> for Field {
    type Output = Field;
    fn div(mut self, rhs: f64) -> Field {
        self /= rhs;
        self
    }
}
