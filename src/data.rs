//! Static data tables, embedded at compile time and parsed on first use.

use crate::errors::{DataError, DataResult};
use schema::{Move, MoveData, Species, SpeciesData};
use std::collections::HashMap;
use std::sync::LazyLock;
use strum::IntoEnumIterator;

const MOVES_RON: &str = include_str!("../data/moves.ron");
const SPECIES_RON: &str = include_str!("../data/species.ron");

/// Process-wide read-only tables. Safe to share between threads.
static DATA: LazyLock<DataTables> = LazyLock::new(|| {
    match DataTables::parse(MOVES_RON, SPECIES_RON) {
        Ok(tables) => tables,
        Err(err) => panic!("embedded battle data is invalid: {}", err),
    }
});

#[derive(Debug)]
pub struct DataTables {
    moves: HashMap<Move, MoveData>,
    species: HashMap<Species, SpeciesData>,
}

impl DataTables {
    /// Parse and cross-check both tables. Every `Move` and `Species` variant
    /// must have exactly one record, and learnsets may only name moves that
    /// have records (Struggle is never learnable).
    pub fn parse(moves_text: &str, species_text: &str) -> DataResult<Self> {
        let move_records: Vec<MoveData> =
            ron::from_str(moves_text).map_err(|e| DataError::Malformed(format!("moves: {}", e)))?;
        let species_records: Vec<SpeciesData> = ron::from_str(species_text)
            .map_err(|e| DataError::Malformed(format!("species: {}", e)))?;

        let mut moves = HashMap::with_capacity(move_records.len());
        for record in move_records {
            let id = record.id;
            if moves.insert(id, record).is_some() {
                return Err(DataError::Malformed(format!("duplicate move record {:?}", id)));
            }
        }
        if let Some(missing) = Move::iter().find(|m| !moves.contains_key(m)) {
            return Err(DataError::MissingMove(missing));
        }

        let mut species = HashMap::with_capacity(species_records.len());
        for record in species_records {
            let id = record.species;
            for (level, learned) in &record.learnset.level_up {
                if *level == 0 || *level > 100 {
                    return Err(DataError::Malformed(format!(
                        "{:?} learns moves at level {}",
                        id, level
                    )));
                }
                if learned.contains(&Move::Struggle) {
                    return Err(DataError::Malformed(format!("{:?} learns Struggle", id)));
                }
            }
            if record.types.is_empty() || record.types.len() > 2 {
                return Err(DataError::Malformed(format!("{:?} has {} types", id, record.types.len())));
            }
            if species.insert(id, record).is_some() {
                return Err(DataError::Malformed(format!("duplicate species record {:?}", id)));
            }
        }
        if let Some(missing) = Species::iter().find(|s| !species.contains_key(s)) {
            return Err(DataError::MissingSpecies(missing));
        }

        Ok(Self { moves, species })
    }

    pub fn move_data(&self, move_: Move) -> DataResult<&MoveData> {
        self.moves.get(&move_).ok_or(DataError::MissingMove(move_))
    }

    pub fn species(&self, species: Species) -> DataResult<&SpeciesData> {
        self.species
            .get(&species)
            .ok_or(DataError::MissingSpecies(species))
    }
}

/// The embedded tables. Parsed the first time anything asks for them.
pub fn tables() -> &'static DataTables {
    &DATA
}
