use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won
/// - NotStarted -> Lost (only when the board has no room to move a mine)
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// No tile revealed yet, the next reveal is protected
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_first_move(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::NotStarted
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Result of a reveal: what happened and which cells need repainting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub outcome: RevealOutcome,
    /// Cells whose revealed or flagged state changed, in the order they changed.
    pub updated: Vec<Coord2>,
}

impl Reveal {
    const fn no_change() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            updated: Vec::new(),
        }
    }
}

/// One game of hex minesweeper, from the first click to a win or a detonation.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Array2<Tile>,
    num_mines: CellCount,
    num_flags: CellCount,
    tiles_left_to_reveal: CellCount,
    state: BoardState,
    triggered_mine: Option<Coord2>,
    rng: SmallRng,
}

impl Board {
    /// Random board for `config`; `seed` drives both mine placement and first-move relocation.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let layout = ShuffleLayoutGenerator::new(seed).generate(config);
        Ok(Self::with_layout(layout, seed))
    }

    pub fn with_layout(layout: MineLayout, seed: u64) -> Self {
        let size = layout.size();
        let mut board = Self {
            tiles: Array2::default(size.to_nd_index()),
            num_mines: 0,
            num_flags: 0,
            tiles_left_to_reveal: layout.safe_cell_count(),
            state: Default::default(),
            triggered_mine: None,
            rng: SmallRng::seed_from_u64(seed),
        };

        for coords in iter_coords(size) {
            if layout.contains_mine(coords) {
                board.place_mine(coords);
                board.num_mines += 1;
            }
        }
        debug_assert_eq!(board.num_mines, layout.mine_count());
        debug_assert!(iter_coords(size).all(|coords| {
            board.tile_at(coords).adjacent_mines == layout.adjacent_mine_count(coords)
        }));

        log::debug!(
            "New {}x{} board: {} mines, {} tiles to reveal",
            size.0,
            size.1,
            board.num_mines,
            board.tiles_left_to_reveal
        );
        board
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_first_move(&self) -> bool {
        self.state.is_first_move()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        let (dim_x, dim_y) = self.tiles.dim();
        (dim_x as Coord, dim_y as Coord)
    }

    pub fn num_mines(&self) -> CellCount {
        self.num_mines
    }

    pub fn num_flags(&self) -> CellCount {
        self.num_flags
    }

    /// Mines not yet accounted for by a flag, negative when the player over-flags.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.num_mines) - i64::from(self.num_flags)
    }

    pub fn tiles_left_to_reveal(&self) -> CellCount {
        self.tiles_left_to_reveal
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn tile_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.tile_at(coords).has_mine
    }

    pub fn view_at(&self, coords: Coord2) -> TileView {
        self.tile_at(coords).view()
    }

    pub fn style_at(&self, coords: Coord2) -> CellStyle {
        CellStyle::for_view(self.view_at(coords))
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    /// All tiles in row-major order.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        iter_coords(self.size()).map(|coords| (coords, self.tile_at(coords)))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Flag or unflag a hidden tile. Revealed tiles and finished games are left alone.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(MarkOutcome::NoChange);
        }

        let tile = &mut self.tiles[coords.to_nd_index()];
        if tile.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        tile.is_flagged = !tile.is_flagged;
        Ok(if tile.is_flagged {
            self.num_flags += 1;
            MarkOutcome::Flagged
        } else {
            self.num_flags -= 1;
            MarkOutcome::Unflagged
        })
    }

    /// Reveal a tile, opening the whole cavern around it when it touches no mines.
    ///
    /// The first reveal of a game never detonates: a mine under it is moved elsewhere first.
    pub fn reveal(&mut self, coords: Coord2) -> Result<Reveal> {
        let coords = self.validate_coords(coords)?;

        if self.state.is_finished() {
            return Ok(Reveal::no_change());
        }

        let tile = self.tile_at(coords);
        if tile.is_revealed || tile.is_flagged {
            return Ok(Reveal::no_change());
        }

        if tile.has_mine && !(self.state.is_first_move() && self.relocate_mine(coords)) {
            self.tiles[coords.to_nd_index()].is_revealed = true;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(Reveal {
                outcome: RevealOutcome::HitMine,
                updated: vec![coords],
            });
        }

        self.mark_started();
        let updated = self.discover_cavern(coords);

        let outcome = if self.tiles_left_to_reveal == 0 {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };
        Ok(Reveal { outcome, updated })
    }

    /// Iterative flood reveal. A revealed tile is never pushed twice and never processed twice,
    /// which is what bounds the walk on the cyclic hex graph.
    fn discover_cavern(&mut self, start: Coord2) -> Vec<Coord2> {
        let mut updated = Vec::new();
        let mut to_visit = vec![start];

        while let Some(coords) = to_visit.pop() {
            let tile = &mut self.tiles[coords.to_nd_index()];
            if tile.is_revealed {
                continue;
            }

            if tile.is_flagged {
                tile.is_flagged = false;
                self.num_flags -= 1;
            }
            tile.is_revealed = true;
            let opens_neighbors = tile.adjacent_mines == 0 && !tile.has_mine;

            self.tiles_left_to_reveal -= 1;
            updated.push(coords);
            log::trace!("Revealed {:?}", coords);

            if opens_neighbors {
                let tiles = &self.tiles;
                to_visit.extend(
                    tiles
                        .iter_neighbors(coords)
                        .filter(|&pos| tiles[pos.to_nd_index()].is_unrevealed()),
                );
            }
        }

        log::debug!(
            "Revealed {} tiles from {:?}, {} left",
            updated.len(),
            start,
            self.tiles_left_to_reveal
        );
        updated
    }

    /// Moves the mine at `original` to a uniformly chosen mine-free tile. Returns false when
    /// every tile already holds a mine.
    fn relocate_mine(&mut self, original: Coord2) -> bool {
        let open_tiles = mult(self.size().0, self.size().1) - self.num_mines;
        if open_tiles == 0 {
            log::warn!("No free tile to move the mine at {:?} to", original);
            return false;
        }

        let index_to_swap = self.rng.random_range(0..open_tiles) as usize;
        let Some(target) = iter_coords(self.size())
            .filter(|&pos| !self.tiles[pos.to_nd_index()].has_mine)
            .nth(index_to_swap)
        else {
            return false;
        };

        self.place_mine(target);
        self.clear_mine(original);
        log::debug!("Moved first-move mine from {:?} to {:?}", original, target);
        true
    }

    fn place_mine(&mut self, coords: Coord2) {
        self.tiles[coords.to_nd_index()].has_mine = true;
        for pos in self.tiles.iter_neighbors(coords) {
            self.tiles[pos.to_nd_index()].adjacent_mines += 1;
        }
    }

    fn clear_mine(&mut self, coords: Coord2) {
        self.tiles[coords.to_nd_index()].has_mine = false;
        for pos in self.tiles.iter_neighbors(coords) {
            self.tiles[pos.to_nd_index()].adjacent_mines -= 1;
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, BoardState::NotStarted) {
            log::debug!("Game started");
            self.state = BoardState::InProgress;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            BoardState::Won
        } else {
            BoardState::Lost
        };
        log::debug!("Game ended: {:?}", self.state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::with_layout(MineLayout::from_mine_coords(size, mines).unwrap(), 0)
    }

    fn assert_invariants(board: &Board) {
        let mines = board.iter_tiles().filter(|(_, tile)| tile.has_mine).count() as CellCount;
        assert_eq!(mines, board.num_mines());

        for (coords, tile) in board.iter_tiles() {
            let expected = board
                .neighbors(coords)
                .filter(|&pos| board.has_mine_at(pos))
                .count() as u8;
            assert_eq!(tile.adjacent_mines, expected, "label at {coords:?}");
            assert!(!(tile.is_revealed && tile.is_flagged), "{coords:?} revealed and flagged");
        }

        let flags = board.iter_tiles().filter(|(_, tile)| tile.is_flagged).count() as CellCount;
        assert_eq!(flags, board.num_flags());

        let hidden_safe = board
            .iter_tiles()
            .filter(|(_, tile)| !tile.has_mine && !tile.is_revealed)
            .count() as CellCount;
        assert_eq!(hidden_safe, board.tiles_left_to_reveal());
    }

    #[test]
    fn single_empty_cell_is_won_in_one_reveal() {
        let mut board = Board::new(GameConfig::new((1, 1), 0.0).unwrap(), 3).unwrap();
        assert_eq!(board.num_mines(), 0);
        assert_eq!(board.tiles_left_to_reveal(), 1);

        let reveal = board.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Won);
        assert_eq!(reveal.updated, vec![(0, 0)]);
        assert_eq!(board.tiles_left_to_reveal(), 0);
        assert_eq!(board.state(), BoardState::Won);
    }

    #[test]
    fn construction_labels_every_tile() {
        for seed in 0..8 {
            let board = Board::new(GameConfig::new((11, 7), 0.3).unwrap(), seed).unwrap();
            assert_eq!(board.num_mines(), 23);
            assert_eq!(board.tiles_left_to_reveal(), 77 - 23);
            assert_eq!(board.state(), BoardState::NotStarted);
            assert!(board.is_first_move());
            assert_invariants(&board);
        }
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let config = GameConfig::new_unchecked((4, 4), 2.0);
        assert_eq!(Board::new(config, 0).err(), Some(GameError::InvalidDensity));
        let config = GameConfig::new_unchecked((0, 4), 0.5);
        assert_eq!(Board::new(config, 0).err(), Some(GameError::InvalidSize));
    }

    #[test]
    fn neighbors_of_center_cell_on_three_by_three() {
        let board = board((3, 3), &[(1, 1)]);
        let around_center: HashSet<_> = board.neighbors((1, 1)).collect();
        assert_eq!(
            around_center,
            HashSet::from([(2, 1), (0, 1), (1, 2), (1, 0), (2, 2), (2, 0)])
        );
        // (0, 0) is not adjacent to (1, 1), so it sees no mine.
        assert_eq!(board.tile_at((0, 0)).adjacent_mines, 0);
        assert_eq!(board.tile_at((2, 0)).adjacent_mines, 1);
        assert_eq!(board.neighbors((1, 0)).count(), 4);
    }

    #[test]
    fn first_reveal_on_a_mine_moves_it() {
        for seed in 0..16 {
            let mut board = Board::with_layout(
                MineLayout::from_mine_coords((3, 3), &[(1, 1)]).unwrap(),
                seed,
            );

            let reveal = board.reveal((1, 1)).unwrap();

            assert_ne!(reveal.outcome, RevealOutcome::HitMine);
            assert_ne!(board.state(), BoardState::Lost);
            assert!(!board.has_mine_at((1, 1)));
            assert!(board.tile_at((1, 1)).is_revealed);
            assert_eq!(board.num_mines(), 1);
            assert!(!board.is_first_move());
            assert_invariants(&board);
        }
    }

    #[test]
    fn first_reveal_is_safe_on_random_boards() {
        for seed in 0..32 {
            let mut board = Board::new(GameConfig::new((9, 9), 0.4).unwrap(), seed).unwrap();
            let mined = board
                .iter_tiles()
                .find(|(_, tile)| tile.has_mine)
                .map(|(coords, _)| coords)
                .unwrap();

            let reveal = board.reveal(mined).unwrap();

            assert_ne!(reveal.outcome, RevealOutcome::HitMine);
            assert!(!board.has_mine_at(mined));
            assert_eq!(board.num_mines(), 32);
            assert_invariants(&board);
        }
    }

    #[test]
    fn labels_match_the_layout() {
        let layout =
            MineLayout::from_mine_coords((5, 4), &[(0, 0), (2, 1), (3, 1), (4, 3)]).unwrap();
        let board = Board::with_layout(layout.clone(), 0);
        assert_eq!(board.tiles_left_to_reveal(), layout.safe_cell_count());
        for coords in iter_coords(layout.size()) {
            assert_eq!(
                board.tile_at(coords).adjacent_mines,
                layout.adjacent_mine_count(coords),
                "label at {coords:?}"
            );
        }
    }

    // Density 1 leaves nowhere to move the mine, so the first reveal detonates.
    #[test]
    fn full_board_cannot_protect_the_first_move() {
        let mut board = Board::new(GameConfig::new((2, 2), 1.0).unwrap(), 0).unwrap();
        let reveal = board.reveal((0, 0)).unwrap();
        assert_eq!(reveal.outcome, RevealOutcome::HitMine);
        assert_eq!(board.state(), BoardState::Lost);
        assert_eq!(board.num_mines(), 4);
    }

    #[test]
    fn later_mine_loses_and_freezes_the_board() {
        let mut board = board((4, 1), &[(0, 0), (3, 0)]);
        assert_eq!(board.reveal((1, 0)).unwrap().outcome, RevealOutcome::Revealed);

        let reveal = board.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::HitMine);
        assert_eq!(reveal.updated, vec![(0, 0)]);
        assert_eq!(board.state(), BoardState::Lost);
        assert_eq!(board.triggered_mine(), Some((0, 0)));
        assert_eq!(board.view_at((0, 0)), TileView::Mine);

        let before = (board.tiles.clone(), board.num_flags(), board.tiles_left_to_reveal());
        assert_eq!(board.reveal((2, 0)).unwrap(), Reveal::no_change());
        assert_eq!(board.toggle_flag((3, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(
            (board.tiles.clone(), board.num_flags(), board.tiles_left_to_reveal()),
            before
        );
        assert_eq!(board.state(), BoardState::Lost);
    }

    #[test]
    fn flood_reveals_the_zero_region_and_its_border_once() {
        // Column x = 2 is solid mines, which walls the left side off from the right.
        let mut board = board((5, 3), &[(2, 0), (2, 1), (2, 2)]);

        let reveal = board.reveal((0, 0)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Revealed);
        let updated: HashSet<_> = reveal.updated.iter().copied().collect();
        assert_eq!(updated.len(), reveal.updated.len(), "a tile was revealed twice");
        assert_eq!(
            updated,
            HashSet::from([(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)])
        );
        for y in 0..3 {
            assert!(!board.tile_at((3, y)).is_revealed);
            assert!(!board.tile_at((4, y)).is_revealed);
        }
        assert_eq!(board.tiles_left_to_reveal(), 6);
        assert_invariants(&board);
    }

    #[test]
    fn numbered_tile_reveals_only_itself() {
        let mut board = board((5, 3), &[(2, 0), (2, 1), (2, 2)]);
        let reveal = board.reveal((1, 1)).unwrap();
        assert_eq!(reveal.updated, vec![(1, 1)]);
        assert_eq!(board.view_at((1, 1)), TileView::Revealed(3));
    }

    #[test]
    fn flood_terminates_on_large_open_board() {
        let mut board = Board::new(GameConfig::new((300, 200), 0.0).unwrap(), 0).unwrap();

        let reveal = board.reveal((150, 100)).unwrap();

        assert_eq!(reveal.outcome, RevealOutcome::Won);
        assert_eq!(reveal.updated.len(), 300 * 200);
        assert_eq!(board.tiles_left_to_reveal(), 0);
    }

    #[test]
    fn flag_toggles_and_counts() {
        let mut board = board((3, 3), &[(2, 2)]);

        assert_eq!(board.toggle_flag((2, 2)).unwrap(), MarkOutcome::Flagged);
        assert_eq!(board.num_flags(), 1);
        assert_eq!(board.mines_left(), 0);
        assert_eq!(board.style_at((2, 2)).label, Some(Label::Flag));

        // Flagged tiles ignore reveals.
        assert_eq!(board.reveal((2, 2)).unwrap(), Reveal::no_change());
        assert!(board.is_first_move());

        assert_eq!(board.toggle_flag((2, 2)).unwrap(), MarkOutcome::Unflagged);
        assert_eq!(board.num_flags(), 0);
    }

    #[test]
    fn flagging_a_revealed_tile_is_rejected() {
        let mut board = board((4, 1), &[(0, 0), (3, 0)]);
        board.reveal((1, 0)).unwrap();

        assert_eq!(board.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(board.num_flags(), 0);
        assert!(!board.tile_at((1, 0)).is_flagged);
    }

    #[test]
    fn flood_clears_flags_it_reaches() {
        let mut board = board((5, 3), &[(2, 0), (2, 1), (2, 2)]);
        board.toggle_flag((0, 2)).unwrap();
        board.toggle_flag((4, 0)).unwrap();
        assert_eq!(board.num_flags(), 2);

        let reveal = board.reveal((0, 0)).unwrap();

        assert!(reveal.updated.contains(&(0, 2)));
        assert!(board.tile_at((0, 2)).is_revealed);
        assert!(!board.tile_at((0, 2)).is_flagged);
        assert!(board.tile_at((4, 0)).is_flagged);
        assert_eq!(board.num_flags(), 1);
        assert_invariants(&board);
    }

    #[test]
    fn revealing_every_safe_tile_wins_exactly_once() {
        let mut board = Board::new(GameConfig::new((10, 8), 0.2).unwrap(), 11).unwrap();
        let first = board.reveal((0, 0)).unwrap();
        let mut wins = usize::from(first.outcome == RevealOutcome::Won);

        let safe: Vec<_> = board
            .iter_tiles()
            .filter(|(_, tile)| !tile.has_mine)
            .map(|(coords, _)| coords)
            .collect();

        for coords in safe {
            assert_eq!(board.tiles_left_to_reveal() == 0, board.state() == BoardState::Won);
            let reveal = board.reveal(coords).unwrap();
            if reveal.outcome == RevealOutcome::Won {
                wins += 1;
            }
            assert_invariants(&board);
        }

        assert_eq!(wins, 1);
        assert_eq!(board.state(), BoardState::Won);
        assert_eq!(board.tiles_left_to_reveal(), 0);
        assert!(board.iter_tiles().all(|(_, tile)| tile.has_mine || tile.is_revealed));
        assert_eq!(board.reveal((0, 0)).unwrap().outcome, RevealOutcome::NoChange);
    }

    #[test]
    fn out_of_range_coordinates_are_errors() {
        let mut board = board((3, 3), &[]);
        assert_eq!(board.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(board.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn same_seed_same_game() {
        let config = GameConfig::new((8, 8), 0.25).unwrap();
        let mut a = Board::new(config, 99).unwrap();
        let mut b = Board::new(config, 99).unwrap();
        let mined = a.iter_tiles().find(|(_, tile)| tile.has_mine).unwrap().0;

        assert_eq!(a.reveal(mined).unwrap(), b.reveal(mined).unwrap());
        assert!(a.iter_tiles().eq(b.iter_tiles()));
    }
}
