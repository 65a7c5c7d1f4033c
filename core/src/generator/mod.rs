use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

pub trait GridGenerator {
    fn generate(&mut self, config: &GameConfig) -> Grid;
}

/// Walks the treasure thresholds from legendary down to common, the first threshold above `roll` wins.
pub fn draw_treasure(roll: f64, spawn: &SpawnTable) -> Option<TreasureTier> {
    spawn
        .thresholds()
        .into_iter()
        .find(|&(_, threshold)| roll < threshold)
        .map(|(tier, _)| tier)
}
