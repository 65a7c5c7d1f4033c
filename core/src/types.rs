/// Identity of a tile within one grid generation, `0..TILE_COUNT`.
pub type TileId = u8;

/// Single coordinate axis of the board.
pub type Coord = u8;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub type Energy = u32;

pub type Health = u32;

/// Score unit for treasure values and session totals.
pub type Points = u32;

pub const GRID_WIDTH: Coord = 8;

pub const GRID_HEIGHT: Coord = 8;

pub const TILE_COUNT: usize = GRID_WIDTH as usize * GRID_HEIGHT as usize;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.1.into(), self.0.into()]
    }
}

/// Board coordinates of a tile, ids run row by row.
pub const fn coords_of(id: TileId) -> Coord2 {
    (id % GRID_WIDTH, id / GRID_WIDTH)
}

pub const fn id_at((x, y): Coord2) -> TileId {
    y * GRID_WIDTH + x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_coords_agree() {
        assert_eq!(coords_of(0), (0, 0));
        assert_eq!(coords_of(5), (5, 0));
        assert_eq!(coords_of(9), (1, 1));
        assert_eq!(coords_of(63), (7, 7));
        for id in 0..TILE_COUNT as TileId {
            assert_eq!(id_at(coords_of(id)), id);
        }
    }

    #[test]
    fn nd_index_is_row_major() {
        assert_eq!((3, 1).to_nd_index(), [1, 3]);
    }
}
