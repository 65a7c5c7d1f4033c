use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing excavated since the last reset
    Fresh,
    Digging,
    /// Health reached zero, only a reset recovers
    Eliminated,
    /// Every tile has been excavated
    Cleared,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Eliminated | Self::Cleared)
    }
}

/// Read-only view of the player resources for display.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub energy: Energy,
    pub max_energy: Energy,
    pub health: Health,
    pub max_health: Health,
    pub excavation_count: u32,
    pub treasures_found: u32,
    pub total_value: Points,
    pub treasure_counts: TreasureCounts,
}

/// Owns the grid and the player resources, all mutation goes through [`ExcavationEngine::excavate`],
/// [`ExcavationEngine::reset`] and [`ExcavationEngine::regen_tick`].
#[derive(Debug)]
pub struct ExcavationEngine<G = RandomGridGenerator> {
    config: GameConfig,
    generator: G,
    grid: Grid,
    energy: Energy,
    health: Health,
    excavation_count: u32,
    treasures_found: u32,
    total_value: Points,
    treasure_counts: TreasureCounts,
    events: EventBus,
}

impl ExcavationEngine<RandomGridGenerator> {
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RandomGridGenerator::new(seed))
    }
}

impl<G: GridGenerator> ExcavationEngine<G> {
    pub fn new(config: GameConfig, mut generator: G) -> Self {
        let grid = generator.generate(&config);
        Self {
            config,
            generator,
            grid,
            energy: config.max_energy,
            health: config.max_health,
            excavation_count: 0,
            treasures_found: 0,
            total_value: 0,
            treasure_counts: TreasureCounts::default(),
            events: EventBus::default(),
        }
    }

    /// Overrides the current resources, for instance from a saved player record. Values are clamped to their caps.
    pub fn restore_resources(&mut self, energy: Energy, health: Health) {
        if energy > self.config.max_energy || health > self.config.max_health {
            log::warn!(
                "Restored resources above caps, energy: {}/{}, health: {}/{}",
                energy,
                self.config.max_energy,
                health,
                self.config.max_health
            );
        }
        self.energy = energy.min(self.config.max_energy);
        self.health = health.min(self.config.max_health);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn energy(&self) -> Energy {
        self.energy
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn is_eliminated(&self) -> bool {
        self.health == 0
    }

    pub fn can_excavate(&self) -> bool {
        !self.is_eliminated() && self.energy >= self.config.energy_per_dig
    }

    pub fn needs_regen(&self) -> bool {
        self.energy < self.config.max_energy
    }

    pub fn state(&self) -> SessionState {
        if self.is_eliminated() {
            SessionState::Eliminated
        } else if self.grid.is_cleared() {
            SessionState::Cleared
        } else if self.excavation_count == 0 {
            SessionState::Fresh
        } else {
            SessionState::Digging
        }
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            energy: self.energy,
            max_energy: self.config.max_energy,
            health: self.health,
            max_health: self.config.max_health,
            excavation_count: self.excavation_count,
            treasures_found: self.treasures_found,
            total_value: self.total_value,
            treasure_counts: self.treasure_counts,
        }
    }

    pub fn subscribe(&mut self) -> EventReceiver {
        let receiver = self.events.subscribe();
        log::debug!("Event subscriber added, {} live", self.events.subscriber_count());
        receiver
    }

    /// Reveals a tile and applies its effect.
    ///
    /// Refusals are reported as [`ExcavateOutcome::Blocked`], digging an already excavated tile is a silent
    /// [`ExcavateOutcome::NoOp`]. Only an id outside the board is an error.
    pub fn excavate(&mut self, id: TileId) -> Result<ExcavateOutcome> {
        use ExcavateOutcome::*;

        let id = self.grid.validate_id(id)?;

        if let Some(reason) = self.block_reason() {
            log::debug!("Excavation of tile {} blocked: {:?}", id, reason);
            self.events.emit(GameEvent::Blocked(reason));
            return Ok(Blocked(reason));
        }

        let tile = self.grid[id];
        if tile.excavated {
            return Ok(NoOp);
        }

        self.grid[id].excavated = true;
        self.energy -= self.config.energy_per_dig;
        self.excavation_count = self.excavation_count.saturating_add(1);

        // traps short-circuit, a trapped tile never scores
        if tile.has_trap {
            let damage = self.config.trap_damage;
            self.health = self.health.saturating_sub(damage);
            let eliminated = self.health == 0;
            log::debug!(
                "Trap at tile {}, health now {}/{}",
                id,
                self.health,
                self.config.max_health
            );

            self.events.emit(GameEvent::TrapTriggered { tile: id, damage });
            if eliminated {
                log::info!("Player eliminated after {} excavations", self.excavation_count);
                self.events.emit(GameEvent::Eliminated);
            }
            return Ok(Trap { damage, eliminated });
        }

        Ok(match tile.treasure {
            Some(tier) => {
                let value = tier.value();
                self.treasures_found = self.treasures_found.saturating_add(1);
                self.total_value = self.total_value.saturating_add(value);
                self.treasure_counts.record(tier);
                log::debug!("Found {} treasure at tile {}, +{}", tier, id, value);

                self.events.emit(GameEvent::TreasureFound {
                    tile: id,
                    tier,
                    value,
                });
                Treasure { tier, value }
            }
            None => {
                log::trace!("Tile {} was empty", id);
                Empty
            }
        })
    }

    /// Discards the grid, generates a new one and restores every resource.
    pub fn reset(&mut self) {
        self.grid = self.generator.generate(&self.config);
        self.energy = self.config.max_energy;
        self.health = self.config.max_health;
        self.excavation_count = 0;
        self.treasures_found = 0;
        self.total_value = 0;
        self.treasure_counts = TreasureCounts::default();
        log::info!("Grid reset");
        self.events.emit(GameEvent::Reset);
    }

    /// Regenerates one point of energy, returns whether anything changed.
    pub fn regen_tick(&mut self) -> bool {
        if !self.needs_regen() {
            return false;
        }

        self.energy += 1;
        log::trace!("Energy regenerated to {}", self.energy);
        self.events.emit(GameEvent::EnergyRegenerated {
            energy: self.energy,
        });
        true
    }

    fn block_reason(&self) -> Option<BlockReason> {
        if self.is_eliminated() {
            Some(BlockReason::Eliminated)
        } else if self.energy < self.config.energy_per_dig {
            Some(BlockReason::InsufficientEnergy)
        } else {
            None
        }
    }
}
