use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use render::*;
pub use style::*;
pub use tile::*;
pub use topology::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod render;
mod style;
mod tile;
mod topology;
mod types;

/// Board dimensions and the fraction of cells that hold a mine.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub density: f64,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord2 = (20, 12);
    pub const DEFAULT_DENSITY: f64 = 0.15;

    pub const fn new_unchecked(size: Coord2, density: f64) -> Self {
        Self { size, density }
    }

    pub fn new(size: Coord2, density: f64) -> Result<Self> {
        let config = Self::new_unchecked(size, density);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if !self.density.is_finite() || !(0.0..=1.0).contains(&self.density) {
            return Err(GameError::InvalidDensity);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// `floor(density * total_cells)`, never more than the board holds.
    pub fn mine_count(&self) -> CellCount {
        let total = self.total_cells();
        let mines = (self.density * f64::from(total)).floor();
        if mines <= 0.0 {
            0
        } else {
            (mines as CellCount).min(total)
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_SIZE, Self::DEFAULT_DENSITY)
    }
}

/// Where the mines are, before any play happens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.mine_mask.dim();
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count() as u8
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}
