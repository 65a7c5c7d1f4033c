use thiserror::Error;

use crate::TileId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid tile id {0}")]
    InvalidTile(TileId),
    #[error("Invalid grid: {0}")]
    InvalidGrid(&'static str),
    #[error("Invalid treasure code {0}")]
    InvalidTreasureCode(u8),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Could not parse configuration: {0}")]
    ConfigParse(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
