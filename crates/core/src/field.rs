//! Toroidal scalar trail field.
//!
//! The sketches this workspace reproduces never clear their background, so
//! an agent's path accumulates on screen. [`Field`] stands in for that
//! canvas: one `f64` in `[0, 1]` per unit-sized plane cell, row-major, with
//! wrap-around addressing.

use crate::error::EngineError;

/// Largest number of cells any grid in the workspace may allocate.
pub const MAX_CELLS: usize = 1 << 26;

/// Cell count of a `cols × rows` grid of `cell_bytes`-sized cells.
///
/// Returns `EngineError::InvalidDimensions` for an empty grid, one above
/// [`MAX_CELLS`], or one whose byte size does not fit an allocation.
pub fn grid_len(cols: usize, rows: usize, cell_bytes: usize) -> Result<usize, EngineError> {
    cols.checked_mul(rows)
        .filter(|&n| n > 0 && n <= MAX_CELLS)
        .filter(|&n| {
            n.checked_mul(cell_bytes)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(EngineError::InvalidDimensions)
}

/// A 2D scalar field with values clamped to [0, 1] and toroidal addressing.
#[derive(Debug, Clone)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a zero-filled field.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or the grid exceeds [`MAX_CELLS`].
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let len = grid_len(width, height, std::mem::size_of::<f64>())?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a field covering a continuous plane of the given extent,
    /// one cell per unit (rounded up).
    pub fn for_plane(width: f64, height: f64) -> Result<Self, EngineError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidDimensions);
        }
        // Saturating casts; anything this large fails the cell cap.
        Self::new(width.ceil() as usize, height.ceil() as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    fn index(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        yi * self.width + xi
    }

    /// Value at `(x, y)` with wrapping.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Sets `(x, y)` with wrapping; the value is clamped to [0, 1].
    pub fn set(&mut self, x: isize, y: isize, value: f64) {
        let idx = self.index(x, y);
        self.data[idx] = value.clamp(0.0, 1.0);
    }

    /// Adds `amount` to the cell containing plane point `(x, y)`, saturating at 1.
    ///
    /// Non-finite coordinates are ignored.
    pub fn deposit(&mut self, x: f64, y: f64, amount: f64) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let (cx, cy) = (x.floor() as isize, y.floor() as isize);
        let current = self.get(cx, cy);
        self.set(cx, cy, current + amount);
    }

    /// Mean cell value.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Largest cell value.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Yields `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (i % self.width, i / self.width, v))
    }
}
