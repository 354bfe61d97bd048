use std::str::FromStr;

pub use schema::{EffectTarget, Move, MoveCategory, MoveData, MoveEffect, RankStat};

use crate::data::tables;
use crate::errors::{DataError, DataResult};

/// Get move data for a specific move from the embedded tables
pub fn get_move_data(move_: Move) -> DataResult<&'static MoveData> {
    tables().move_data(move_)
}

/// Resolve a move from its identifier, ignoring case.
pub fn move_by_name(name: &str) -> DataResult<&'static MoveData> {
    let move_ = Move::from_str(name.trim()).map_err(|_| DataError::UnknownMove(name.to_string()))?;
    get_move_data(move_)
}
