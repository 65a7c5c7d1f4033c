use rand::prelude::*;

use super::*;

/// Seeded generator rolling every tile independently against the configured [`SpawnTable`].
#[derive(Clone, Debug)]
pub struct RandomGridGenerator {
    rng: SmallRng,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn roll_tile(&mut self, id: TileId, spawn: &SpawnTable) -> Tile {
        // trap first, a trapped tile never rolls for treasure
        if self.rng.random::<f64>() < spawn.trap_chance {
            return Tile::trap(id);
        }

        match draw_treasure(self.rng.random::<f64>(), spawn) {
            Some(tier) => Tile::treasure(id, tier),
            None => Tile::empty(id),
        }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(&mut self, config: &GameConfig) -> Grid {
        let mut grid = Grid::empty();
        for id in 0..TILE_COUNT as TileId {
            let tile = self.roll_tile(id, &config.spawn);
            log::trace!("Rolled tile {}: {:?}", id, tile);
            grid[id] = tile;
        }

        log::debug!(
            "Generated grid with {} traps and {} treasures",
            grid.trap_count(),
            grid.treasure_count()
        );
        grid
    }
}
