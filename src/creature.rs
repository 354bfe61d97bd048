use crate::errors::{DataError, DataResult, InvariantResult, InvariantViolation};
use crate::move_data::get_move_data;
use crate::species::get_species_data;
use schema::{Move, PokemonType, RankStat, Species, SpeciesData};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Non-volatile status. Survives switching; cleared only by fainting or
/// waking up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Paralysis,
    Poison,
    Burn,
    Sleep { turns: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub move_: Move,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveSlot {
    pub fn new(move_: Move, max_pp: u8) -> Self {
        Self {
            move_,
            pp: max_pp,
            max_pp,
        }
    }

    pub fn has_pp(&self) -> bool {
        self.pp > 0
    }

    /// Spend one PP. Returns false if none was left.
    pub fn use_pp(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

/// A rank stage clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankModifier {
    value: i8,
    min: i8,
    max: i8,
}

impl RankModifier {
    pub fn for_stat(stat: RankStat) -> Self {
        let (min, max) = stat.bounds();
        Self { value: 0, min, max }
    }

    pub fn value(&self) -> i8 {
        self.value
    }

    pub fn bounds(&self) -> (i8, i8) {
        (self.min, self.max)
    }

    /// True if applying `delta` would move the value at all.
    pub fn can_increment(&self, delta: i8) -> bool {
        match delta.signum() {
            1 => self.value < self.max,
            -1 => self.value > self.min,
            _ => false,
        }
    }

    /// Apply `delta`, clamped into bounds. Returns how far the value moved.
    pub fn adjust(&mut self, delta: i8) -> i8 {
        let old = self.value;
        self.value = (old as i16 + delta as i16).clamp(self.min as i16, self.max as i16) as i8;
        self.value - old
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// One modifier per [`RankStat`], indexed by the stat's declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranks {
    modifiers: [RankModifier; 6],
}

impl Default for Ranks {
    fn default() -> Self {
        let mut modifiers = [RankModifier::for_stat(RankStat::Attack); 6];
        for stat in RankStat::iter() {
            modifiers[stat as usize] = RankModifier::for_stat(stat);
        }
        Self { modifiers }
    }
}

impl Ranks {
    pub fn get(&self, stat: RankStat) -> i8 {
        self.modifiers[stat as usize].value()
    }

    pub fn modifier(&self, stat: RankStat) -> &RankModifier {
        &self.modifiers[stat as usize]
    }

    fn modifier_mut(&mut self, stat: RankStat) -> &mut RankModifier {
        &mut self.modifiers[stat as usize]
    }

    pub fn is_neutral(&self) -> bool {
        self.modifiers.iter().all(|m| m.value() == 0)
    }

    pub fn reset(&mut self) {
        self.modifiers.iter_mut().for_each(RankModifier::reset);
    }
}

/// Bookkeeping for a move that spans two turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiTurnMove {
    pub move_: Move,
    pub slot: usize,
}

/// Individual values (0..=15) per stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualValues {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub special: u8,
    pub speed: u8,
}

impl IndividualValues {
    pub const MAX: u8 = 15;

    pub fn uniform(value: u8) -> Self {
        Self {
            hp: value,
            attack: value,
            defense: value,
            special: value,
            speed: value,
        }
    }

    pub fn values(&self) -> [u8; 5] {
        [self.hp, self.attack, self.defense, self.special, self.speed]
    }
}

impl Default for IndividualValues {
    fn default() -> Self {
        Self::uniform(Self::MAX)
    }
}

/// Stats derived from species, level and individual values. Fixed for the
/// life of a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special: u16,
    pub speed: u16,
}

impl Stats {
    pub fn calculate(species: &SpeciesData, level: u8, ivs: IndividualValues) -> Self {
        let base = &species.base_stats;
        let level = level as u32;
        let scaled = |base: u8, iv: u8| (base as u32 + iv as u32) * 2 * level / 100;
        Self {
            hp: (scaled(base.hp, ivs.hp) + level + 10) as u16,
            attack: (scaled(base.attack, ivs.attack) + 5) as u16,
            defense: (scaled(base.defense, ivs.defense) + 5) as u16,
            special: (scaled(base.special, ivs.special) + 5) as u16,
            speed: (scaled(base.speed, ivs.speed) + 5) as u16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureState {
    pub species: Species,
    pub level: u8,
    pub individual_values: IndividualValues,
    types: Vec<PokemonType>,
    stats: Stats,
    hp: u16,
    pub ranks: Ranks,
    pub moves: Vec<MoveSlot>,
    pub status: Option<StatusCondition>,
    /// Turns of confusion left. Volatile: cleared on switch-out.
    pub confusion: Option<u8>,
    pub multi_turn: Option<MultiTurnMove>,
}

impl CreatureState {
    /// Build a creature at full health. `pp_override` replaces every move's
    /// own PP maximum when set.
    pub fn new(
        species: &SpeciesData,
        level: u8,
        moves: &[Move],
        individual_values: IndividualValues,
        pp_override: Option<u8>,
    ) -> DataResult<Self> {
        let stats = Stats::calculate(species, level, individual_values);
        let moves = moves
            .iter()
            .map(|&move_| {
                let max_pp = match pp_override {
                    Some(pp) => pp,
                    None => get_move_data(move_)?.max_pp,
                };
                Ok(MoveSlot::new(move_, max_pp))
            })
            .collect::<DataResult<Vec<_>>>()?;

        Ok(Self {
            species: species.species,
            level,
            individual_values,
            types: species.types.clone(),
            stats,
            hp: stats.hp,
            ranks: Ranks::default(),
            moves,
            status: None,
            confusion: None,
            multi_turn: None,
        })
    }

    /// Convenience constructor looking the species up in the static tables.
    pub fn from_species(species: Species, level: u8, moves: &[Move]) -> DataResult<Self> {
        let data = get_species_data(species)?;
        Self::new(data, level, moves, IndividualValues::default(), None)
    }

    pub fn name(&self) -> &'static str {
        self.species.name()
    }

    pub fn types(&self) -> &[PokemonType] {
        &self.types
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn max_hp(&self) -> u16 {
        self.stats.hp
    }

    pub fn current_hp(&self) -> u16 {
        self.hp
    }

    pub fn hp_ratio(&self) -> f32 {
        self.hp as f32 / self.stats.hp as f32
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Move HP by `delta`. Leaving `0..=max_hp` is an engine bug: HP is left
    /// untouched and an [`InvariantViolation`] is returned. Reaching zero
    /// clears status, confusion and any pending multi-turn move.
    pub fn apply_hp_delta(&mut self, delta: i32) -> InvariantResult<u16> {
        let attempted = self.hp as i32 + delta;
        if attempted < 0 || attempted > self.stats.hp as i32 {
            return Err(InvariantViolation::HpOutOfRange {
                species: self.species,
                attempted,
                max_hp: self.stats.hp,
            });
        }
        self.hp = attempted as u16;
        if self.hp == 0 {
            self.status = None;
            self.confusion = None;
            self.multi_turn = None;
        }
        Ok(self.hp)
    }

    /// Deal up to `amount` damage, never more than the HP left. Returns the
    /// damage actually dealt.
    pub fn take_damage(&mut self, amount: u16) -> InvariantResult<u16> {
        let dealt = amount.min(self.hp);
        self.apply_hp_delta(-(dealt as i32))?;
        Ok(dealt)
    }

    /// Restore up to `amount` HP. Fainted creatures cannot be healed.
    pub fn heal(&mut self, amount: u16) -> InvariantResult<u16> {
        if self.is_fainted() {
            return Ok(0);
        }
        let healed = amount.min(self.stats.hp - self.hp);
        self.apply_hp_delta(healed as i32)?;
        Ok(healed)
    }

    pub fn rank(&self, stat: RankStat) -> i8 {
        self.ranks.get(stat)
    }

    /// Clamp-apply a rank change and report the delta that actually landed.
    pub fn adjust_rank(&mut self, stat: RankStat, delta: i8) -> i8 {
        self.ranks.modifier_mut(stat).adjust(delta)
    }

    pub fn can_adjust_rank(&self, stat: RankStat, delta: i8) -> bool {
        self.ranks.modifier(stat).can_increment(delta)
    }

    /// Reset everything that does not survive leaving the field. Refuses if a
    /// multi-turn move is still pending.
    pub fn on_switch_out(&mut self) -> InvariantResult<()> {
        if let Some(pending) = self.multi_turn {
            return Err(InvariantViolation::MultiTurnMoveOnSwitch {
                species: self.species,
                move_: pending.move_,
            });
        }
        self.ranks.reset();
        self.confusion = None;
        Ok(())
    }

    /// Restore the creature to its pre-battle condition.
    pub fn reset(&mut self) {
        self.hp = self.stats.hp;
        self.ranks.reset();
        for slot in &mut self.moves {
            slot.pp = slot.max_pp;
        }
        self.status = None;
        self.confusion = None;
        self.multi_turn = None;
    }

    pub fn move_slot_index(&self, move_: Move) -> DataResult<usize> {
        self.moves
            .iter()
            .position(|slot| slot.move_ == move_)
            .ok_or(DataError::MoveNotKnown {
                species: self.species,
                move_,
            })
    }

    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().any(MoveSlot::has_pp)
    }

    pub fn usable_move_indices(&self) -> Vec<usize> {
        self.moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.has_pp())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn is_asleep(&self) -> bool {
        matches!(self.status, Some(StatusCondition::Sleep { .. }))
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }
}
