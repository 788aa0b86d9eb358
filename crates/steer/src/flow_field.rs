//! Grid of unit direction vectors covering the plane.
//!
//! The field is sampled from a [`NoiseSource`] once, at construction, and is
//! read-only afterwards. Vehicles only ever read it, so it is shared by
//! reference across the whole population.

use flowfield_core::field::grid_len;
use flowfield_core::{DVec2, EngineError, NoiseSource};
use serde::Serialize;
use std::f64::consts::TAU;

/// Distance in noise space between neighbouring cells.
///
/// Fixed rather than tied to `resolution`, so changing cell size changes how
/// much of the noise pattern the plane covers.
pub const NOISE_SCALE: f64 = 0.1;

/// One cell of the field as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellView {
    pub cell_center: DVec2,
    pub direction: DVec2,
}

/// Fixed-resolution direction grid, row-major.
///
/// Cell `(col, row)` covers
/// `[col·res, (col+1)·res) × [row·res, (row+1)·res)` and stores a unit vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowField {
    resolution: f64,
    cols: usize,
    rows: usize,
    cells: Vec<DVec2>,
}

impl FlowField {
    /// Samples `noise` at `(col·0.1, row·0.1)` for every cell and turns each
    /// sample `s` into the direction at angle `s·2π`.
    ///
    /// Returns `EngineError::InvalidResolution` for a non-positive or
    /// non-finite `resolution` or one so fine the grid would exceed
    /// `MAX_CELLS`, and `EngineError::InvalidDimensions` for a bad plane
    /// extent.
    pub fn build<N>(
        noise: &N,
        width: f64,
        height: f64,
        resolution: f64,
    ) -> Result<Self, EngineError>
    where
        N: NoiseSource + ?Sized,
    {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(EngineError::InvalidResolution(resolution));
        }
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidDimensions);
        }
        let (cols, rows) = grid_shape(width, height, resolution);
        // Too fine a resolution for this plane.
        let len = grid_len(cols, rows, std::mem::size_of::<DVec2>())
            .map_err(|_| EngineError::InvalidResolution(resolution))?;

        let mut cells = Vec::with_capacity(len);
        for row in 0..rows {
            for col in 0..cols {
                let sample = noise.sample(col as f64 * NOISE_SCALE, row as f64 * NOISE_SCALE);
                let angle = sample * TAU;
                cells.push(DVec2::new(angle.cos(), angle.sin()));
            }
        }

        tracing::debug!(cols, rows, resolution, "flow field built");
        Ok(Self {
            resolution,
            cols,
            rows,
            cells,
        })
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[DVec2] {
        &self.cells
    }

    /// Stored direction at `(col, row)`, or `None` off the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<DVec2> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Grid index of the cell containing `point`, clamped onto the grid.
    ///
    /// Points on or past the far edge resolve to the last column or row;
    /// negative and NaN coordinates resolve to 0.
    pub fn cell_index(&self, point: DVec2) -> (usize, usize) {
        (
            clamp_index(point.x / self.resolution, self.cols),
            clamp_index(point.y / self.resolution, self.rows),
        )
    }

    /// Direction for the cell containing `point`. Never fails.
    pub fn lookup(&self, point: DVec2) -> DVec2 {
        let (col, row) = self.cell_index(point);
        self.cells[row * self.cols + col]
    }

    /// Center and direction of each cell, row-major.
    pub fn views(&self) -> impl Iterator<Item = CellView> + '_ {
        let half = self.resolution * 0.5;
        self.cells.iter().enumerate().map(move |(i, &direction)| {
            let col = (i % self.cols) as f64;
            let row = (i / self.cols) as f64;
            CellView {
                cell_center: DVec2::new(
                    col * self.resolution + half,
                    row * self.resolution + half,
                ),
                direction,
            }
        })
    }
}

/// `(cols, rows)` of a grid covering `width × height` at `resolution`.
/// Casts saturate, so oversized grids fail the cell cap instead of wrapping.
pub fn grid_shape(width: f64, height: f64, resolution: f64) -> (usize, usize) {
    (
        (width / resolution).ceil() as usize,
        (height / resolution).ceil() as usize,
    )
}

fn clamp_index(scaled: f64, len: usize) -> usize {
    let i = scaled.floor();
    // Also catches NaN.
    if !(i >= 0.0) {
        return 0;
    }
    (i as usize).min(len - 1)
}
