use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The full 8x8 set of tiles of one generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct Grid {
    tiles: Array2<Tile>,
}

impl Grid {
    /// Builds a grid from tiles listed in id order.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self> {
        if tiles.len() != TILE_COUNT {
            return Err(GameError::InvalidGrid("grid must hold exactly 64 tiles"));
        }
        for (expected, tile) in tiles.iter().enumerate() {
            if usize::from(tile.id) != expected {
                return Err(GameError::InvalidGrid("tile ids must run 0..63 in order"));
            }
            if !tile.is_consistent() {
                return Err(GameError::InvalidGrid("tile holds both a trap and a treasure"));
            }
        }

        let shape = (usize::from(GRID_HEIGHT), usize::from(GRID_WIDTH));
        let tiles = Array2::from_shape_vec(shape, tiles)
            .map_err(|_| GameError::InvalidGrid("tiles do not fit the board shape"))?;
        Ok(Self { tiles })
    }

    /// Grid where every tile is empty, handy as a base for hand-made layouts.
    pub fn empty() -> Self {
        let tiles = Array2::from_shape_fn(
            (usize::from(GRID_HEIGHT), usize::from(GRID_WIDTH)),
            |(y, x)| Tile::empty(id_at((x as Coord, y as Coord))),
        );
        Self { tiles }
    }

    /// Same as [`Grid::empty`] with the given tiles swapped in by id.
    pub fn with_tiles(tiles: impl IntoIterator<Item = Tile>) -> Result<Self> {
        let mut grid = Self::empty();
        for tile in tiles {
            if !tile.is_consistent() {
                return Err(GameError::InvalidGrid("tile holds both a trap and a treasure"));
            }
            *grid.tile_mut(tile.id)? = tile;
        }
        Ok(grid)
    }

    pub fn validate_id(&self, id: TileId) -> Result<TileId> {
        if usize::from(id) < TILE_COUNT {
            Ok(id)
        } else {
            Err(GameError::InvalidTile(id))
        }
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        let id = self.validate_id(id)?;
        Ok(&self[id])
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Result<&mut Tile> {
        let id = self.validate_id(id)?;
        Ok(&mut self[id])
    }

    /// Tiles in id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Tiles row by row, top row first.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = &Tile>> {
        self.tiles.rows().into_iter().map(|row| row.into_iter())
    }

    pub fn trap_count(&self) -> usize {
        self.tiles().filter(|tile| tile.has_trap).count()
    }

    pub fn treasure_count(&self) -> usize {
        self.tiles().filter(|tile| tile.treasure.is_some()).count()
    }

    pub fn excavated_count(&self) -> usize {
        self.tiles().filter(|tile| tile.excavated).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.tiles().all(|tile| tile.excavated)
    }
}

impl TryFrom<Vec<Tile>> for Grid {
    type Error = GameError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self> {
        Self::from_tiles(tiles)
    }
}

impl From<Grid> for Vec<Tile> {
    fn from(grid: Grid) -> Self {
        // row-major storage, so this is id order
        grid.tiles.into_iter().collect()
    }
}

impl Index<TileId> for Grid {
    type Output = Tile;

    fn index(&self, id: TileId) -> &Self::Output {
        &self.tiles[coords_of(id).to_nd_index()]
    }
}

impl IndexMut<TileId> for Grid {
    fn index_mut(&mut self, id: TileId) -> &mut Self::Output {
        &mut self.tiles[coords_of(id).to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_follows_tile_ids() {
        let grid = Grid::with_tiles([Tile::trap(5), Tile::treasure(63, TreasureTier::Rare)]).unwrap();

        assert!(grid[5].has_trap);
        assert_eq!(grid.tile(63).unwrap().treasure, Some(TreasureTier::Rare));
        assert_eq!(grid.tiles().map(|tile| tile.id).collect::<Vec<_>>(), (0..64).collect::<Vec<TileId>>());
        assert_eq!(grid.trap_count(), 1);
        assert_eq!(grid.treasure_count(), 1);
    }

    #[test]
    fn rows_run_top_to_bottom() {
        let grid = Grid::empty();
        let second_row: Vec<_> = grid.rows().nth(1).unwrap().map(|tile| tile.id).collect();

        assert_eq!(second_row, (8..16).collect::<Vec<TileId>>());
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        assert_eq!(Grid::empty().tile(64), Err(GameError::InvalidTile(64)));
    }

    #[test]
    fn from_tiles_checks_shape_order_and_exclusivity() {
        let tiles: Vec<_> = (0..64).map(Tile::empty).collect();
        assert!(Grid::from_tiles(tiles.clone()).is_ok());

        assert!(Grid::from_tiles(tiles[..63].to_vec()).is_err());

        let mut shuffled = tiles.clone();
        shuffled.swap(0, 1);
        assert!(Grid::from_tiles(shuffled).is_err());

        let mut mixed = tiles;
        mixed[7] = Tile {
            has_trap: true,
            ..Tile::treasure(7, TreasureTier::Common)
        };
        assert_eq!(
            Grid::from_tiles(mixed),
            Err(GameError::InvalidGrid("tile holds both a trap and a treasure"))
        );
    }

    #[test]
    fn serialises_as_a_flat_tile_list() {
        let grid = Grid::with_tiles([Tile::trap(9), Tile::treasure(40, TreasureTier::Epic)]).unwrap();

        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(64));
        assert_eq!(json[9]["has_trap"], true);

        let restored: Grid = serde_json::from_value(json).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn deserialising_runs_the_grid_checks() {
        let mut json = serde_json::to_value(Grid::empty()).unwrap();
        json[5]["has_trap"] = true.into();
        json[5]["treasure"] = "Rare".into();
        let err = serde_json::from_value::<Grid>(json).unwrap_err();
        assert!(err.to_string().contains("trap and a treasure"), "{err}");

        let short = r#"[{"id":0,"excavated":false,"treasure":null,"has_trap":false}]"#;
        assert!(serde_json::from_str::<Grid>(short).is_err());

        let old_layout = r#"{"tiles":{"v":1,"dim":[1,1],"data":[{"id":0,"excavated":false,"treasure":"Rare","has_trap":true}]}}"#;
        assert!(serde_json::from_str::<Grid>(old_layout).is_err());
    }

    #[test]
    fn cleared_only_when_everything_is_dug() {
        let mut grid = Grid::empty();
        for id in 0..63 {
            grid[id].excavated = true;
        }
        assert!(!grid.is_cleared());
        grid[63].excavated = true;
        assert!(grid.is_cleared());
        assert_eq!(grid.excavated_count(), 64);
    }
}
