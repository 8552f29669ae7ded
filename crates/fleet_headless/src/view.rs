//! ASCII map of the fleet for terminal review.
//!
//! Renders a [`WorldSnapshot`] as a square grid. Each cell covers `zoom`
//! display units on both axes and shows the first two characters of the
//! first entity that falls inside it, or `. ` when empty. Sites claim cells
//! before ships, and ships before rockets.

use fleet_core::math::{Point, SCALE};
use fleet_core::snapshot::WorldSnapshot;
use thiserror::Error;

/// Grid size after `default`.
pub const DEFAULT_SIZE: usize = 25;
/// Display units per cell after `default`.
pub const DEFAULT_ZOOM: f64 = 2.0;
/// Sizes must be strictly greater than this.
pub const MIN_SIZE: usize = 6;
/// Sizes must be strictly less than this.
pub const MAX_SIZE: usize = 30;

/// Every n-th row and column carries an axis label.
const LABEL_SPACING: usize = 3;
const CELL_WIDTH: usize = 2;
const EMPTY_CELL: &str = ". ";

/// Invalid view settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    /// Size outside the open range.
    #[error("View size must be between {min} and {max}.")]
    SizeOutOfRange {
        /// Exclusive lower bound.
        min: usize,
        /// Exclusive upper bound.
        max: usize,
    },
    /// Zoom is zero, negative or not finite.
    #[error("Zoom must be a positive number.")]
    BadZoom,
}

/// Viewport settings.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    size: usize,
    zoom: f64,
    /// Bottom-left corner in simulation units.
    origin: Point,
}

impl Default for View {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            zoom: DEFAULT_ZOOM,
            origin: Point::ZERO,
        }
    }
}

impl View {
    /// Viewport with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells per side.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Display units per cell.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Bottom-left corner in simulation units.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Restore size, zoom and origin defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Change the number of cells per side.
    ///
    /// # Errors
    ///
    /// Fails unless `MIN_SIZE < size < MAX_SIZE`.
    pub fn set_size(&mut self, size: usize) -> Result<(), ViewError> {
        if size <= MIN_SIZE || size >= MAX_SIZE {
            return Err(ViewError::SizeOutOfRange {
                min: MIN_SIZE,
                max: MAX_SIZE,
            });
        }
        self.size = size;
        Ok(())
    }

    /// Change display units per cell.
    ///
    /// # Errors
    ///
    /// Fails for zero, negative or non-finite zoom.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), ViewError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(ViewError::BadZoom);
        }
        self.zoom = zoom;
        Ok(())
    }

    /// Move the bottom-left corner, in simulation units.
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Cell boundaries along one axis, `size + 1` entries.
    fn axis(&self, start: f64) -> Vec<f64> {
        (0..=self.size)
            .map(|i| start + self.zoom * i as f64 * SCALE)
            .collect()
    }

    /// Render the snapshot as text, one trailing newline per line.
    #[must_use]
    pub fn render(&self, snapshot: &WorldSnapshot) -> String {
        let x_axis = self.axis(self.origin.x);
        let y_axis = self.axis(self.origin.y);

        let mut grid: Vec<Vec<Option<&str>>> = vec![vec![None; self.size]; self.size];
        for entity in snapshot.entities() {
            let (Some(col), Some(row)) = (
                cell_index(&x_axis, entity.location.x),
                cell_index(&y_axis, entity.location.y),
            ) else {
                continue;
            };
            grid[row][col].get_or_insert(entity.name.as_str());
        }

        let mut text = format!(
            "Display size: {}, scale: {:.2}, origin: {}\n",
            self.size,
            self.zoom,
            self.origin / SCALE
        );

        let width = axis_label(y_axis[0])
            .to_string()
            .len()
            .max(axis_label(y_axis[self.size]).to_string().len());

        for row in (0..self.size).rev() {
            if row % LABEL_SPACING == 0 {
                text.push_str(&format!("{:>width$} ", axis_label(y_axis[row])));
            } else {
                text.push_str(&" ".repeat(width + 1));
            }
            for cell in &grid[row] {
                match cell {
                    Some(name) => {
                        let short: String = name.chars().take(CELL_WIDTH).collect();
                        text.push_str(&format!("{short:<w$}", w = CELL_WIDTH));
                    }
                    None => text.push_str(EMPTY_CELL),
                }
            }
            text.push('\n');
        }

        text.push_str(&format!("  {:>width$}", axis_label(x_axis[0])));
        for i in (LABEL_SPACING..self.size).step_by(LABEL_SPACING) {
            text.push_str(&format!(
                "{:>w$}",
                axis_label(x_axis[i]),
                w = LABEL_SPACING * CELL_WIDTH
            ));
        }
        text.push('\n');
        text
    }
}

/// Index of the cell containing `coordinate`, if inside the axis.
fn cell_index(axis: &[f64], coordinate: f64) -> Option<usize> {
    if coordinate < *axis.first()? {
        return None;
    }
    axis.windows(2).position(|bounds| coordinate < bounds[1])
}

/// Axis value in whole display units, truncated toward zero.
fn axis_label(value: f64) -> i64 {
    (value / SCALE) as i64
}
