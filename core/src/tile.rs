use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::*;

/// Reward class of a treasure, ordered from least to most valuable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TreasureTier {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl TreasureTier {
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    pub const fn value(self) -> Points {
        use TreasureTier::*;
        match self {
            Common => 10,
            Rare => 50,
            Epic => 150,
            Legendary => 500,
        }
    }

    /// Numeric encoding used by persisted player records, `0` is reserved for "no treasure".
    pub const fn code(self) -> u8 {
        use TreasureTier::*;
        match self {
            Common => 1,
            Rare => 2,
            Epic => 3,
            Legendary => 4,
        }
    }

    pub fn from_code(code: u8) -> Result<Option<Self>> {
        use TreasureTier::*;
        match code {
            0 => Ok(None),
            1 => Ok(Some(Common)),
            2 => Ok(Some(Rare)),
            3 => Ok(Some(Epic)),
            4 => Ok(Some(Legendary)),
            _ => Err(GameError::InvalidTreasureCode(code)),
        }
    }

    pub const fn name(self) -> &'static str {
        use TreasureTier::*;
        match self {
            Common => "common",
            Rare => "rare",
            Epic => "epic",
            Legendary => "legendary",
        }
    }
}

impl core::fmt::Display for TreasureTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One grid cell, contents are fixed at generation and hidden until excavated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub excavated: bool,
    pub treasure: Option<TreasureTier>,
    pub has_trap: bool,
}

impl Tile {
    pub const fn empty(id: TileId) -> Self {
        Self {
            id,
            excavated: false,
            treasure: None,
            has_trap: false,
        }
    }

    pub const fn trap(id: TileId) -> Self {
        Self {
            has_trap: true,
            ..Self::empty(id)
        }
    }

    pub const fn treasure(id: TileId, tier: TreasureTier) -> Self {
        Self {
            treasure: Some(tier),
            ..Self::empty(id)
        }
    }

    pub const fn coords(&self) -> Coord2 {
        coords_of(self.id)
    }

    /// Trap and treasure never share a tile.
    pub const fn is_consistent(&self) -> bool {
        !(self.has_trap && self.treasure.is_some())
    }
}

/// Treasures found this session, per tier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureCounts {
    pub common: u32,
    pub rare: u32,
    pub epic: u32,
    pub legendary: u32,
}

impl TreasureCounts {
    pub fn record(&mut self, tier: TreasureTier) {
        self[tier] = self[tier].saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TreasureTier, u32)> + '_ {
        TreasureTier::ALL.into_iter().map(move |tier| (tier, self[tier]))
    }

    /// One entry per tier, common first.
    pub fn inventory(&self) -> [InventoryEntry; 4] {
        TreasureTier::ALL.map(|tier| InventoryEntry {
            tier,
            count: self[tier],
            unit_value: tier.value(),
        })
    }
}

impl Index<TreasureTier> for TreasureCounts {
    type Output = u32;

    fn index(&self, tier: TreasureTier) -> &Self::Output {
        use TreasureTier::*;
        match tier {
            Common => &self.common,
            Rare => &self.rare,
            Epic => &self.epic,
            Legendary => &self.legendary,
        }
    }
}

impl IndexMut<TreasureTier> for TreasureCounts {
    fn index_mut(&mut self, tier: TreasureTier) -> &mut Self::Output {
        use TreasureTier::*;
        match tier {
            Common => &mut self.common,
            Rare => &mut self.rare,
            Epic => &mut self.epic,
            Legendary => &mut self.legendary,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub tier: TreasureTier,
    pub count: u32,
    pub unit_value: Points,
}

impl InventoryEntry {
    pub const fn subtotal(&self) -> Points {
        self.count.saturating_mul(self.unit_value)
    }
}
