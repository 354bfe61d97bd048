use crate::{Move, PokemonType, Species};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Generation 1 base stats. Special covers both special attack and defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special: u8,
    pub speed: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learnset {
    pub level_up: BTreeMap<u8, Vec<Move>>, // level -> moves learned at that level
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub species: Species,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub learnset: Learnset,
}

impl Learnset {
    pub fn learns_at_level(&self, level: u8) -> Option<&Vec<Move>> {
        self.level_up.get(&level)
    }

    /// Every move unlocked at or below the given level.
    pub fn learnable_by(&self, level: u8) -> BTreeSet<Move> {
        self.level_up
            .range(..=level)
            .flat_map(|(_, moves)| moves.iter().copied())
            .collect()
    }

    pub fn can_learn_move(&self, move_: Move, level: u8) -> bool {
        self.level_up
            .range(..=level)
            .any(|(_, moves)| moves.contains(&move_))
    }
}

impl SpeciesData {
    pub fn dex_number(&self) -> u16 {
        self.species.dex_number()
    }

    /// How many move slots a creature of this species can fill at a level.
    pub fn max_learnable_moves(&self, level: u8) -> usize {
        self.learnset.learnable_by(level).len().min(4)
    }
}
