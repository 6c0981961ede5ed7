use super::*;

/// Uniform placement: exactly `config.mine_count()` mines spread over the board by a seeded
/// Fisher-Yates shuffle of a row-major mine mask.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleLayoutGenerator {
    seed: u64,
}

impl ShuffleLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl LayoutGenerator for ShuffleLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let total_cells = config.total_cells() as usize;
        let mines = config.mine_count() as usize;

        let mut positions = vec![false; total_cells];
        positions[..mines].fill(true);

        let mut rng = SmallRng::seed_from_u64(self.seed);
        positions.shuffle(&mut rng);

        let (size_x, _) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        for (x, y) in iter_coords(config.size) {
            let index = usize::from(y) * usize::from(size_x) + usize::from(x);
            mine_mask[(x, y).to_nd_index()] = positions[index];
        }

        let layout = MineLayout::from_mine_mask(mine_mask);
        log::debug!(
            "Generated {}x{} layout with {} mines (seed {})",
            config.size.0,
            config.size.1,
            layout.mine_count(),
            self.seed
        );
        layout
    }
}
