//! What a chooser is allowed to see. The record has the same shape at every
//! decision point so learning agents can treat it as a fixed-size vector.

use crate::battle::action::FieldAction;
use crate::battle::engine::legal_actions;
use crate::battle::state::{FieldPhase, FieldState, Side};
use crate::creature::{CreatureState, StatusCondition};
use crate::party::MAX_MOVES;
use schema::{Move, PokemonType, RankStat, Species};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

pub const MAX_PARTY_SIZE: usize = 6;
const RANK_COUNT: usize = 6;
const STATUS_SLOTS: usize = 5;
const ACTIVE_FEATURES: usize = 1 + STATUS_SLOTS + 1 + RANK_COUNT + PokemonType::COUNT;

/// Length of [`Observation::to_features`].
pub const FEATURE_LEN: usize =
    2 * ACTIVE_FEATURES + MAX_MOVES + MAX_PARTY_SIZE + 2 + MAX_PARTY_SIZE + 1;

/// What the observing side is being asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    ChooseAction,
    ChooseReplacement,
    /// Nothing to submit; the other side is deciding or already submitted.
    Wait,
    MatchOver,
}

/// Non-volatile status without its hidden counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibleStatus {
    Paralysis,
    Poison,
    Burn,
    Sleep,
}

impl VisibleStatus {
    fn one_hot(status: Option<VisibleStatus>) -> [f32; STATUS_SLOTS] {
        let mut slots = [0.0; STATUS_SLOTS];
        let index = match status {
            None => 0,
            Some(VisibleStatus::Paralysis) => 1,
            Some(VisibleStatus::Poison) => 2,
            Some(VisibleStatus::Burn) => 3,
            Some(VisibleStatus::Sleep) => 4,
        };
        slots[index] = 1.0;
        slots
    }
}

impl From<StatusCondition> for VisibleStatus {
    fn from(status: StatusCondition) -> Self {
        match status {
            StatusCondition::Paralysis => VisibleStatus::Paralysis,
            StatusCondition::Poison => VisibleStatus::Poison,
            StatusCondition::Burn => VisibleStatus::Burn,
            StatusCondition::Sleep { .. } => VisibleStatus::Sleep,
        }
    }
}

/// A creature on the field as either side can see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveView {
    pub species: Species,
    pub level: u8,
    pub hp_ratio: f32,
    pub fainted: bool,
    pub status: Option<VisibleStatus>,
    pub confused: bool,
    pub types: [Option<PokemonType>; 2],
    /// Indexed by `RankStat as usize`.
    pub ranks: [i8; RANK_COUNT],
}

impl ActiveView {
    fn of(creature: &CreatureState) -> Self {
        let mut types = [None; 2];
        for (slot, t) in types.iter_mut().zip(creature.types()) {
            *slot = Some(*t);
        }
        let mut ranks = [0; RANK_COUNT];
        for stat in RankStat::iter() {
            ranks[stat as usize] = creature.rank(stat);
        }
        Self {
            species: creature.species,
            level: creature.level,
            hp_ratio: creature.hp_ratio(),
            fainted: creature.is_fainted(),
            status: creature.status.map(VisibleStatus::from),
            confused: creature.confusion.is_some(),
            types,
            ranks,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = PokemonType> + '_ {
        self.types.iter().flatten().copied()
    }

    fn push_features(&self, out: &mut Vec<f32>) {
        out.push(self.hp_ratio);
        out.extend(VisibleStatus::one_hot(self.status));
        out.push(if self.confused { 1.0 } else { 0.0 });
        out.extend(self.ranks.iter().map(|&r| r as f32 / 6.0));
        let mut type_hot = [0.0; PokemonType::COUNT];
        for t in self.types() {
            type_hot[t as usize] = 1.0;
        }
        out.extend(type_hot);
    }
}

/// One of the observing side's own move slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveView {
    pub move_: Move,
    pub pp: u8,
    pub max_pp: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub side: Side,
    /// Completed turns.
    pub turn: u32,
    pub decision: Decision,
    pub own_active: ActiveView,
    pub own_moves: [Option<MoveView>; MAX_MOVES],
    pub usable_moves: [bool; MAX_MOVES],
    /// Every slot is out of PP; any `UseMove` executes Struggle.
    pub must_struggle: bool,
    /// The side is committed to finishing the move in this slot.
    pub locked_slot: Option<usize>,
    pub switch_targets: [bool; MAX_PARTY_SIZE],
    /// HP ratio of each own party member; `None` past the party's end.
    pub own_party_hp: [Option<f32>; MAX_PARTY_SIZE],
    pub opponent_active: ActiveView,
    pub opponent_remaining: usize,
}

impl Observation {
    pub fn from_state(state: &FieldState, side: Side) -> Self {
        let own = state.party(side);
        let opponent = state.party(side.opponent());
        let active = own.active();

        let decision = match state.phase {
            FieldPhase::MatchOver | FieldPhase::Aborted => Decision::MatchOver,
            FieldPhase::AwaitingReplacement(flags)
                if flags[side.index()] && state.pending[side.index()].is_none() =>
            {
                Decision::ChooseReplacement
            }
            FieldPhase::AwaitingActions if state.pending[side.index()].is_none() => {
                Decision::ChooseAction
            }
            _ => Decision::Wait,
        };

        let mut own_moves = [None; MAX_MOVES];
        for (view, slot) in own_moves.iter_mut().zip(&active.moves) {
            *view = Some(MoveView {
                move_: slot.move_,
                pp: slot.pp,
                max_pp: slot.max_pp,
            });
        }

        let mut usable_moves = [false; MAX_MOVES];
        let mut switch_targets = [false; MAX_PARTY_SIZE];
        for action in legal_actions(state, side) {
            match action {
                FieldAction::UseMove(slot) if slot < MAX_MOVES => usable_moves[slot] = true,
                FieldAction::SwitchTo(index) if index < MAX_PARTY_SIZE => {
                    switch_targets[index] = true
                }
                _ => {}
            }
        }

        let mut own_party_hp = [None; MAX_PARTY_SIZE];
        for (hp, member) in own_party_hp.iter_mut().zip(own.members()) {
            *hp = Some(member.hp_ratio());
        }

        Self {
            side,
            turn: state.turn,
            decision,
            own_active: ActiveView::of(active),
            own_moves,
            usable_moves,
            must_struggle: !active.is_fainted() && !active.has_usable_move(),
            locked_slot: active.multi_turn.map(|m| m.slot),
            switch_targets,
            own_party_hp,
            opponent_active: ActiveView::of(opponent.active()),
            opponent_remaining: opponent.remaining(),
        }
    }

    /// Actions the field would accept right now, derived from the masks.
    pub fn legal_actions(&self) -> Vec<FieldAction> {
        let moves = self
            .usable_moves
            .iter()
            .enumerate()
            .filter(|(_, &usable)| usable)
            .map(|(slot, _)| FieldAction::UseMove(slot));
        let switches = self
            .switch_targets
            .iter()
            .enumerate()
            .filter(|(_, &target)| target)
            .map(|(index, _)| FieldAction::SwitchTo(index));
        moves.chain(switches).collect()
    }

    pub fn own_move(&self, slot: usize) -> Option<MoveView> {
        self.own_moves.get(slot).copied().flatten()
    }

    /// Fixed-length numeric encoding, [`FEATURE_LEN`] values.
    pub fn to_features(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(FEATURE_LEN);
        self.own_active.push_features(&mut out);
        self.opponent_active.push_features(&mut out);
        out.extend(self.usable_moves.map(|b| if b { 1.0 } else { 0.0 }));
        out.extend(self.switch_targets.map(|b| if b { 1.0 } else { 0.0 }));
        out.push(if self.must_struggle { 1.0 } else { 0.0 });
        out.push(if self.locked_slot.is_some() { 1.0 } else { 0.0 });
        out.extend(self.own_party_hp.map(|hp| hp.unwrap_or(0.0)));
        out.push(self.opponent_remaining as f32 / MAX_PARTY_SIZE as f32);
        out
    }
}
