use serde::{Deserialize, Serialize};

/// Gameplay state attached to one cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub has_mine: bool,
    /// Mines among the (up to six) neighbors.
    pub adjacent_mines: u8,
    pub is_flagged: bool,
    pub is_revealed: bool,
}

impl Tile {
    pub const fn is_unrevealed(self) -> bool {
        !self.is_revealed
    }

    /// What the player is allowed to see of this tile.
    pub const fn view(self) -> TileView {
        match (self.is_revealed, self.is_flagged, self.has_mine) {
            (false, false, _) => TileView::Hidden,
            (false, true, _) => TileView::Flagged,
            (true, _, true) => TileView::Mine,
            (true, _, false) => TileView::Revealed(self.adjacent_mines),
        }
    }
}

/// Player-visible state of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileView {
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl Default for TileView {
    fn default() -> Self {
        Self::Hidden
    }
}
