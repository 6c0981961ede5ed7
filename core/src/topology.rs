//! Pixel geometry of the board.
//!
//! Cells are pointy-top hexagons laid out in rows; every odd row is pushed half a cell to the
//! right. A cell is `size_x` wide and `size_y = 2 * size_x / sqrt(3)` tall, and consecutive rows
//! overlap by a quarter of `size_y`, so row `y` starts at `0.75 * y * size_y`.

use crate::*;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HexLayout {
    grid_size: Coord2,
    size_x: f64,
    size_y: f64,
}

impl HexLayout {
    /// Layout with cells `cell_width` pixels wide.
    pub fn new(grid_size: Coord2, cell_width: f64) -> Result<Self> {
        if grid_size.0 == 0 || grid_size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if !cell_width.is_finite() || cell_width <= 0.0 {
            return Err(GameError::InvalidSurface);
        }
        Ok(Self {
            grid_size,
            size_x: cell_width,
            size_y: 2.0 * cell_width / SQRT_3,
        })
    }

    /// Largest layout whose cells keep their aspect ratio and still fit on a `width` x `height`
    /// surface.
    pub fn fit(grid_size: Coord2, (width, height): (f64, f64)) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GameError::InvalidSurface);
        }
        let (cols, rows) = (f64::from(grid_size.0), f64::from(grid_size.1));
        let size_x = (width / (cols + 0.5)).min(height * 6.0 / ((1.0 + 3.0 * rows) * SQRT_3));
        Self::new(grid_size, size_x)
    }

    pub fn grid_size(&self) -> Coord2 {
        self.grid_size
    }

    pub fn cell_width(&self) -> f64 {
        self.size_x
    }

    pub fn cell_height(&self) -> f64 {
        self.size_y
    }

    /// Pixel extent actually covered by cells.
    pub fn surface_size(&self) -> (f64, f64) {
        let (cols, rows) = (f64::from(self.grid_size.0), f64::from(self.grid_size.1));
        (
            self.size_x * (cols + 0.5),
            self.size_y * (0.75 * rows + 0.25),
        )
    }

    /// Left offset that centers the board inside a container `container_width` pixels wide.
    pub fn margin_left(&self, container_width: f64) -> f64 {
        (container_width - self.surface_size().0) / 2.0
    }

    pub fn font_size(&self) -> f64 {
        self.size_y * 0.75
    }

    pub fn contains(&self, (x, y): Coord2) -> bool {
        x < self.grid_size.0 && y < self.grid_size.1
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.grid_size)
    }

    /// Position of the top vertex of a cell.
    pub fn cell_origin(&self, (x, y): Coord2) -> (f64, f64) {
        let shift = if y & 1 == 1 { 1.0 } else { 0.5 };
        (
            (f64::from(x) + shift) * self.size_x,
            f64::from(y) * self.size_y * 0.75,
        )
    }

    pub fn cell_center(&self, coords: Coord2) -> (f64, f64) {
        let (top_x, top_y) = self.cell_origin(coords);
        (top_x, top_y + self.size_y * 0.5)
    }

    /// Corners of a cell, clockwise starting from the top vertex.
    pub fn vertices(&self, coords: Coord2) -> [(f64, f64); 6] {
        let (top_x, top_y) = self.cell_origin(coords);
        let (half_x, quarter_y) = (self.size_x / 2.0, self.size_y / 4.0);
        [
            (top_x, top_y),
            (top_x + half_x, top_y + quarter_y),
            (top_x + half_x, top_y + 3.0 * quarter_y),
            (top_x, top_y + self.size_y),
            (top_x - half_x, top_y + 3.0 * quarter_y),
            (top_x - half_x, top_y + quarter_y),
        ]
    }

    /// Cell under a pixel, if any.
    ///
    /// Vertically the board is cut into bands a quarter of a cell tall. Bands whose index is a
    /// multiple of three hold the slanted edges where a row meets the next one; there the point
    /// is tested against the edge crossing its half-cell-wide column. Every other band belongs
    /// to a single row.
    pub fn pixel_to_cell(&self, px: f64, py: f64) -> Option<Coord2> {
        if !px.is_finite() || !py.is_finite() {
            return None;
        }

        let quarters_y = 4.0 * py / self.size_y;
        // The bottom vertex of the last row sits at 3 * rows + 1 quarters.
        if !(0.0..3.0 * f64::from(self.grid_size.1) + 2.0).contains(&quarters_y) {
            return None;
        }
        let halves_x = 2.0 * px / self.size_x;
        let mut band = quarters_y.floor() as i64;

        if band.rem_euclid(3) == 0 {
            let column = halves_x.floor() as i64;
            let unit_x = halves_x - column as f64;
            let unit_y = quarters_y - band as f64;
            // The edge rises left to right when the column parity matches the row parity.
            let rising = (column.rem_euclid(2) == 0) == (band.rem_euclid(6) == 0);
            let below_edge = if rising {
                unit_x + unit_y > 1.0
            } else {
                unit_y > unit_x
            };
            band += if below_edge { 1 } else { -1 };
        }

        let row = Coord::try_from((band - 1).div_euclid(3)).ok()?;
        if row >= self.grid_size.1 {
            return None;
        }

        let columns = px / self.size_x;
        let column = if row & 1 == 1 { columns - 0.5 } else { columns };
        let column = Coord::try_from(column.floor() as i64).ok()?;
        if column >= self.grid_size.0 {
            return None;
        }

        Some((column, row))
    }
}
