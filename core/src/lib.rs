use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use event::*;
pub use generator::*;
pub use grid::*;
pub use regen::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod event;
mod generator;
mod grid;
mod regen;
mod tile;
mod types;

/// Cumulative spawn thresholds used by the grid generator.
///
/// A tile first rolls against `trap_chance`; only trap-free tiles roll for a treasure, walking the thresholds from
/// legendary to common and taking the first one the roll falls under. Whatever lies above `common_below` is an empty
/// tile, the thresholds are deliberately not normalised.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTable {
    pub trap_chance: f64,
    pub legendary_below: f64,
    pub epic_below: f64,
    pub rare_below: f64,
    pub common_below: f64,
}

impl SpawnTable {
    pub const REFERENCE: Self = Self {
        trap_chance: 0.15,
        legendary_below: 0.02,
        epic_below: 0.10,
        rare_below: 0.35,
        common_below: 0.75,
    };

    /// Thresholds in the order they are checked.
    pub const fn thresholds(&self) -> [(TreasureTier, f64); 4] {
        [
            (TreasureTier::Legendary, self.legendary_below),
            (TreasureTier::Epic, self.epic_below),
            (TreasureTier::Rare, self.rare_below),
            (TreasureTier::Common, self.common_below),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.trap_chance) {
            return Err(GameError::InvalidConfig("trap chance must be within [0, 1]"));
        }

        let mut previous = 0.0;
        for (_, threshold) in self.thresholds() {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(GameError::InvalidConfig("treasure thresholds must be within [0, 1]"));
            }
            if threshold < previous {
                return Err(GameError::InvalidConfig("treasure thresholds must be non-decreasing"));
            }
            previous = threshold;
        }

        Ok(())
    }
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_energy: Energy,
    pub energy_per_dig: Energy,
    pub max_health: Health,
    pub trap_damage: Health,
    pub regen_period_ms: u64,
    pub spawn: SpawnTable,
}

impl GameConfig {
    pub const REFERENCE: Self = Self {
        max_energy: 50,
        energy_per_dig: 1,
        max_health: 100,
        trap_damage: 25,
        regen_period_ms: 3000,
        spawn: SpawnTable::REFERENCE,
    };

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|err| GameError::ConfigParse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_energy == 0 {
            return Err(GameError::InvalidConfig("max energy must be positive"));
        }
        if self.energy_per_dig == 0 || self.energy_per_dig > self.max_energy {
            return Err(GameError::InvalidConfig(
                "energy per dig must be within [1, max energy]",
            ));
        }
        if self.max_health == 0 {
            return Err(GameError::InvalidConfig("max health must be positive"));
        }
        if self.regen_period_ms == 0 {
            return Err(GameError::InvalidConfig("regeneration period must be positive"));
        }
        self.spawn.validate()
    }

    pub const fn regen_period(&self) -> Duration {
        Duration::from_millis(self.regen_period_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Why an excavation was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    Eliminated,
    InsufficientEnergy,
}

/// Outcome of excavating a single tile
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcavateOutcome {
    Blocked(BlockReason),
    NoOp,
    Trap { damage: Health, eliminated: bool },
    Treasure { tier: TreasureTier, value: Points },
    Empty,
}

impl ExcavateOutcome {
    /// Whether this outcome changed the session
    pub const fn has_update(self) -> bool {
        use ExcavateOutcome::*;
        match self {
            Blocked(_) => false,
            NoOp => false,
            Trap { .. } => true,
            Treasure { .. } => true,
            Empty => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::default().regen_period(), Duration::from_secs(3));
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = GameConfig::from_toml_str(
            r#"
            max_energy = 10
            [spawn]
            trap_chance = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.max_energy, 10);
        assert_eq!(config.trap_damage, 25);
        assert_eq!(config.spawn.trap_chance, 0.5);
        assert_eq!(config.spawn.common_below, 0.75);
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let mut config = GameConfig::default();
        config.spawn.epic_below = 0.01;

        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_dig_cost_above_cap() {
        let config = GameConfig {
            energy_per_dig: 51,
            ..GameConfig::default()
        };

        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_toml_str("max_energy = \"lots\""),
            Err(GameError::ConfigParse(_))
        ));
    }

    #[test]
    fn only_state_changes_report_updates() {
        assert!(!ExcavateOutcome::NoOp.has_update());
        assert!(!ExcavateOutcome::Blocked(BlockReason::Eliminated).has_update());
        assert!(ExcavateOutcome::Empty.has_update());
    }
}
