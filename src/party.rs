//! Parties and the definitions they are built from.

use crate::config::Ruleset;
use crate::creature::{CreatureState, IndividualValues};
use crate::errors::{InvariantResult, InvariantViolation, PartyDefinitionError, PartyResult};
use crate::species::get_species_data;
use schema::{Move, Species};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_MOVES: usize = 4;

/// One party member as produced by party-generation or persistence tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureDefinition {
    pub species: Species,
    pub level: u8,
    pub moves: Vec<Move>,
    #[serde(default)]
    pub individual_values: IndividualValues,
}

impl CreatureDefinition {
    pub fn new(species: Species, level: u8, moves: Vec<Move>) -> Self {
        Self {
            species,
            level,
            moves,
            individual_values: IndividualValues::default(),
        }
    }

    fn validate(&self, index: usize, ruleset: &Ruleset) -> PartyResult<()> {
        if self.level < ruleset.min_level || self.level > ruleset.max_level {
            return Err(PartyDefinitionError::LevelOutOfRange {
                level: self.level,
                min: ruleset.min_level,
                max: ruleset.max_level,
            });
        }
        if let Some(&value) = self
            .individual_values
            .values()
            .iter()
            .find(|&&v| v > IndividualValues::MAX)
        {
            return Err(PartyDefinitionError::IndividualValueOutOfRange { value });
        }
        if self.moves.is_empty() {
            return Err(PartyDefinitionError::NoMoves { index });
        }
        if self.moves.len() > MAX_MOVES {
            return Err(PartyDefinitionError::TooManyMoves {
                index,
                count: self.moves.len(),
                max: MAX_MOVES,
            });
        }

        let learnset = &get_species_data(self.species)?.learnset;
        let mut seen = HashSet::new();
        for &move_ in &self.moves {
            if !seen.insert(move_) {
                return Err(PartyDefinitionError::DuplicateMove { index, move_ });
            }
            if !learnset.can_learn_move(move_, self.level) {
                return Err(PartyDefinitionError::UnlearnableMove {
                    species: self.species,
                    move_,
                    level: self.level,
                });
            }
        }
        Ok(())
    }

    pub fn build(&self, index: usize, ruleset: &Ruleset) -> PartyResult<CreatureState> {
        self.validate(index, ruleset)?;
        let species = get_species_data(self.species)?;
        Ok(CreatureState::new(
            species,
            self.level,
            &self.moves,
            self.individual_values,
            ruleset.pp_override,
        )?)
    }
}

/// Ordered party definition. The canonical copy that repeated matches are
/// built from; building never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDefinition {
    pub members: Vec<CreatureDefinition>,
}

impl PartyDefinition {
    pub fn new(members: Vec<CreatureDefinition>) -> Self {
        Self { members }
    }

    pub fn from_ron(text: &str) -> PartyResult<Self> {
        ron::from_str(text).map_err(|e| PartyDefinitionError::Parse(e.to_string()))
    }

    pub fn build(&self, ruleset: &Ruleset) -> PartyResult<Party> {
        if self.members.len() != ruleset.party_size {
            return Err(PartyDefinitionError::WrongSize {
                expected: ruleset.party_size,
                actual: self.members.len(),
            });
        }
        let members = self
            .members
            .iter()
            .enumerate()
            .map(|(i, def)| def.build(i, ruleset))
            .collect::<PartyResult<Vec<_>>>()?;
        Party::new(members)
    }
}

/// Creatures owned by one side plus the index of the one on the field.
/// `Clone` is a full deep copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    members: Vec<CreatureState>,
    active: usize,
}

impl Party {
    /// The first member leads. An empty member list is rejected.
    pub fn new(members: Vec<CreatureState>) -> PartyResult<Self> {
        if members.is_empty() {
            return Err(PartyDefinitionError::Empty);
        }
        Ok(Self { members, active: 0 })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[CreatureState] {
        &self.members
    }

    pub fn member(&self, index: usize) -> Option<&CreatureState> {
        self.members.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut CreatureState> {
        self.members.get_mut(index)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &CreatureState {
        &self.members[self.active]
    }

    pub fn active_mut(&mut self) -> &mut CreatureState {
        &mut self.members[self.active]
    }

    pub fn remaining(&self) -> usize {
        self.members.iter().filter(|c| !c.is_fainted()).count()
    }

    pub fn is_defeated(&self) -> bool {
        self.remaining() == 0
    }

    /// Party indices that could be sent in right now.
    pub fn switch_targets(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != self.active && !c.is_fainted())
            .map(|(i, _)| i)
            .collect()
    }

    /// Retire the active creature and put `index` on the field. The caller
    /// checks that `index` is a legal target.
    pub fn switch_to(&mut self, index: usize) -> InvariantResult<()> {
        if index >= self.members.len() {
            return Err(InvariantViolation::ActiveOutOfRange {
                index,
                size: self.members.len(),
            });
        }
        self.members[self.active].on_switch_out()?;
        self.active = index;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.members.iter_mut().for_each(CreatureState::reset);
        self.active = 0;
    }
}
