use crate::battle::action::FieldAction;
use crate::battle::calculators::{calculate_damage, confusion_damage};
use crate::battle::move_effects::{apply_move_effects, EffectContext};
use crate::battle::observation::Observation;
use crate::battle::rng::{BattleRng, Roll};
use crate::battle::state::{
    ActionFailureReason, BattleEvent, EventBus, FieldPhase, FieldState, MatchOutcome,
    MatchReport, Side, TerminalReason, Winner,
};
use crate::battle::stats::{effective_speed, hit_probability};
use crate::config::{RankMultiplierTable, ReplacementPolicy, Ruleset};
use crate::creature::{CreatureState, MultiTurnMove, StatusCondition};
use crate::errors::{
    ActionError, ActionResult, BattleEngineError, BattleResult, InvariantResult,
    InvariantViolation,
};
use crate::move_data::get_move_data;
use crate::party::{Party, PartyDefinition};
use log::{debug, error, info};
use schema::{Move, PokemonType};
use std::cmp::Ordering;
use std::collections::VecDeque;

const FULL_PARALYSIS_CHANCE: f64 = 0.25;
const CONFUSION_SELF_HIT_CHANCE: f64 = 0.5;
const STATUS_DAMAGE_DIVISOR: u16 = 16;

/// One unit of work inside a turn. The outcome is checked after each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnStep {
    Act { side: Side, action: FieldAction },
    Residual { side: Side },
}

/// Switches before moves; among moves, faster first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ActionPriority {
    action_priority: i8,
    speed: u16,
}

/// A running match: two parties, the turn machine, and the event log. The
/// RNG is borrowed from the caller for the lifetime of the field.
pub struct Field<'r> {
    state: FieldState,
    ruleset: Ruleset,
    rng: &'r mut dyn BattleRng,
    bus: EventBus,
}

impl<'r> Field<'r> {
    /// Start a match. The parties are owned by the field from here on; pass
    /// clones to keep canonical copies untouched.
    pub fn new(p0: Party, p1: Party, ruleset: Ruleset, rng: &'r mut dyn BattleRng) -> Self {
        debug!(
            "New field: P0 leads with {}, P1 leads with {}",
            p0.active().name(),
            p1.active().name()
        );
        Self {
            state: FieldState::new(p0, p1),
            ruleset,
            rng,
            bus: EventBus::new(),
        }
    }

    pub fn from_definitions(
        p0: &PartyDefinition,
        p1: &PartyDefinition,
        ruleset: Ruleset,
        rng: &'r mut dyn BattleRng,
    ) -> BattleResult<Self> {
        let p0 = p0.build(&ruleset)?;
        let p1 = p1.build(&ruleset)?;
        Ok(Self::new(p0, p1, ruleset, rng))
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Completed turns.
    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn phase(&self) -> FieldPhase {
        self.state.phase
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.state.outcome
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn into_events(self) -> EventBus {
        self.bus
    }

    pub fn report(&self) -> Option<MatchReport> {
        self.state.outcome.map(|outcome| MatchReport {
            winner: outcome.winner,
            turn_count: self.state.turn,
            reason: outcome.reason,
        })
    }

    pub fn observe(&self, side: Side) -> Observation {
        Observation::from_state(&self.state, side)
    }

    pub fn legal_actions(&self, side: Side) -> Vec<FieldAction> {
        legal_actions(&self.state, side)
    }

    /// Whether `side` still has to submit something before the field can
    /// resolve.
    pub fn is_awaiting(&self, side: Side) -> bool {
        let i = side.index();
        self.state.pending[i].is_none()
            && match self.state.phase {
                FieldPhase::AwaitingActions => true,
                FieldPhase::AwaitingReplacement(flags) => flags[i],
                _ => false,
            }
    }

    pub fn awaiting(&self) -> Vec<Side> {
        Side::BOTH
            .into_iter()
            .filter(|&side| self.is_awaiting(side))
            .collect()
    }

    /// Queue `action` for `side`. A rejected action leaves the field exactly
    /// as it was.
    pub fn submit_action(&mut self, side: Side, action: FieldAction) -> ActionResult<()> {
        validate_action(&self.state, side, action)?;
        debug!("{} submitted {:?}", side, action);
        self.state.pending[side.index()] = Some(action);
        Ok(())
    }

    pub fn ready(&self) -> bool {
        match self.state.phase {
            FieldPhase::AwaitingActions => self.state.pending.iter().all(Option::is_some),
            FieldPhase::AwaitingReplacement(flags) => Side::BOTH
                .iter()
                .all(|side| !flags[side.index()] || self.state.pending[side.index()].is_some()),
            _ => false,
        }
    }

    /// Resolve a full turn, or a round of replacements. Returns the events it
    /// produced. An invariant violation aborts the match for good.
    pub fn resolve(&mut self) -> BattleResult<&[BattleEvent]> {
        let start = self.bus.len();
        let result = match self.state.phase {
            FieldPhase::MatchOver => return Err(ActionError::MatchOver.into()),
            FieldPhase::Aborted => return Err(BattleEngineError::MatchAborted),
            FieldPhase::AwaitingReplacement(flags) => {
                let mut choices = [None; 2];
                for side in Side::BOTH {
                    if flags[side.index()] {
                        let action = self.state.pending[side.index()]
                            .ok_or(ActionError::MissingAction(side))?;
                        choices[side.index()] = Some(action);
                    }
                }
                self.resolve_replacement_phase(choices)
            }
            FieldPhase::AwaitingActions | FieldPhase::ResolvingTurn => {
                let mut actions = [FieldAction::UseMove(0); 2];
                for side in Side::BOTH {
                    actions[side.index()] = self.state.pending[side.index()]
                        .ok_or(ActionError::MissingAction(side))?;
                }
                self.resolve_turn(actions)
            }
        };

        if let Err(violation) = result {
            error!(
                "Aborting match on invariant violation: {}. State: {}",
                violation,
                self.snapshot()
            );
            self.state.phase = FieldPhase::Aborted;
            return Err(violation.into());
        }
        Ok(self.bus.since(start))
    }

    /// Full field state as JSON.
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.state)
            .unwrap_or_else(|e| format!("{{\"unserializable\":\"{}\"}}", e))
    }

    fn resolve_turn(&mut self, actions: [FieldAction; 2]) -> InvariantResult<()> {
        self.state.pending = [None, None];
        self.state.phase = FieldPhase::ResolvingTurn;
        let turn_number = self.state.turn + 1;
        self.bus.push(BattleEvent::TurnStarted { turn: turn_number });

        let mut stack = self.build_action_stack(actions);
        let mut announced = [false; 2];
        while let Some(step) = stack.pop_front() {
            self.execute_step(step)?;
            self.announce_faints(&mut announced);
            if self.check_win_conditions() {
                break;
            }
        }

        self.finalize_turn(turn_number)
    }

    fn build_action_stack(&mut self, actions: [FieldAction; 2]) -> VecDeque<TurnStep> {
        let order = determine_action_order(
            &self.state,
            actions,
            &self.ruleset.rank_table,
            &mut *self.rng,
        );
        let mut stack: VecDeque<TurnStep> = order
            .into_iter()
            .map(|(side, action)| TurnStep::Act { side, action })
            .collect();
        stack.extend(Side::BOTH.map(|side| TurnStep::Residual { side }));
        stack
    }

    fn execute_step(&mut self, step: TurnStep) -> InvariantResult<()> {
        match step {
            TurnStep::Act { side, action } => {
                if self.state.party(side).active().is_fainted() {
                    debug!("{}'s active creature fainted; skipping {:?}", side, action);
                    return Ok(());
                }
                match action {
                    FieldAction::SwitchTo(index) => self.execute_switch(side, index),
                    FieldAction::UseMove(slot) => self.execute_move(side, slot),
                }
            }
            TurnStep::Residual { side } => self.apply_status_damage(side),
        }
    }

    fn execute_switch(&mut self, side: Side, index: usize) -> InvariantResult<()> {
        let party = self.state.party_mut(side);
        let old = party.active().species;
        party.switch_to(index)?;
        let new = party.active().species;
        debug!("{} switched {:?} out for {:?}", side, old, new);
        self.bus.push(BattleEvent::Switched { side, old, new });
        Ok(())
    }

    fn execute_move(&mut self, side: Side, slot: usize) -> InvariantResult<()> {
        let Self {
            state,
            ruleset,
            rng,
            bus,
        } = self;
        let table = &ruleset.rank_table;
        let (user, target) = active_pair(&mut state.parties, side);

        if !check_action_preventing_conditions(side, user, table, &mut **rng, bus)? {
            return Ok(());
        }

        let releasing = user.multi_turn;
        let move_ = match releasing {
            Some(pending) => pending.move_,
            None if !user.has_usable_move() => Move::Struggle,
            None => {
                let species = user.species;
                let move_slot = user
                    .moves
                    .get_mut(slot)
                    .ok_or(InvariantViolation::MoveSlotOutOfRange { species, slot })?;
                if !move_slot.use_pp() {
                    return Err(InvariantViolation::NoPpToSpend {
                        species,
                        move_: move_slot.move_,
                    });
                }
                move_slot.move_
            }
        };
        let move_data = get_move_data(move_)?;

        if move_data.is_charge_move() && releasing.is_none() {
            user.multi_turn = Some(MultiTurnMove { move_, slot });
            debug!("{} {} charges {:?}", side, user.name(), move_);
            bus.push(BattleEvent::ChargingUp {
                side,
                creature: user.species,
                move_used: move_,
            });
            return Ok(());
        }
        user.multi_turn = None;

        debug!("{} {} uses {:?}", side, user.name(), move_);
        bus.push(BattleEvent::MoveUsed {
            side,
            creature: user.species,
            move_used: move_,
        });

        if move_data.targets_opponent() {
            if target.is_fainted() {
                bus.push(BattleEvent::ActionFailed {
                    side,
                    creature: user.species,
                    reason: ActionFailureReason::NoEffect,
                });
                return Ok(());
            }

            let effectiveness =
                PokemonType::effectiveness_against(move_data.move_type, target.types());
            if effectiveness == 0.0 {
                if move_data.is_damaging() {
                    bus.push(BattleEvent::TypeEffectiveness { multiplier: 0.0 });
                } else {
                    bus.push(BattleEvent::ActionFailed {
                        side,
                        creature: user.species,
                        reason: ActionFailureReason::NoEffect,
                    });
                }
                return Ok(());
            }

            if move_data.accuracy.is_some() {
                let p = hit_probability(move_data, user, target, table);
                if !rng.chance(Roll::Accuracy, p) {
                    bus.push(BattleEvent::MoveMissed {
                        side,
                        creature: user.species,
                        move_used: move_,
                    });
                    return Ok(());
                }
            }
        }

        let mut dealt = 0;
        if move_data.is_damaging() {
            let roll = calculate_damage(user, target, move_data, table, &mut **rng)?;
            if roll.critical {
                bus.push(BattleEvent::CriticalHit { side });
            }
            dealt = target.take_damage(roll.damage)?;
            bus.push(BattleEvent::DamageDealt {
                side: side.opponent(),
                target: target.species,
                damage: dealt,
                remaining_hp: target.current_hp(),
            });
            bus.push(BattleEvent::TypeEffectiveness {
                multiplier: roll.effectiveness,
            });
        }

        let mut ctx = EffectContext {
            user_side: side,
            user,
            target,
        };
        let handled = apply_move_effects(move_data, &mut ctx, dealt, &mut **rng, bus)?;
        if !move_data.is_damaging() && !move_data.effects.is_empty() && !handled {
            bus.push(BattleEvent::ActionFailed {
                side,
                creature: ctx.user.species,
                reason: ActionFailureReason::NoEffect,
            });
        }
        Ok(())
    }

    fn apply_status_damage(&mut self, side: Side) -> InvariantResult<()> {
        let creature = self.state.party_mut(side).active_mut();
        if creature.is_fainted() {
            return Ok(());
        }
        let Some(status @ (StatusCondition::Poison | StatusCondition::Burn)) = creature.status
        else {
            return Ok(());
        };
        let damage = (creature.max_hp() / STATUS_DAMAGE_DIVISOR).max(1);
        let dealt = creature.take_damage(damage)?;
        self.bus.push(BattleEvent::StatusDamage {
            side,
            target: creature.species,
            status,
            damage: dealt,
            remaining_hp: creature.current_hp(),
        });
        Ok(())
    }

    fn announce_faints(&mut self, announced: &mut [bool; 2]) {
        for side in Side::BOTH {
            let active = self.state.party(side).active();
            if !announced[side.index()] && active.is_fainted() {
                announced[side.index()] = true;
                debug!("{}'s {} fainted", side, active.name());
                self.bus.push(BattleEvent::Fainted {
                    side,
                    creature: active.species,
                });
            }
        }
    }

    /// Ends the match if either side has nothing left standing. Returns
    /// whether the match is over.
    fn check_win_conditions(&mut self) -> bool {
        if self.state.outcome.is_some() {
            return true;
        }
        let p0_out = self.state.party(Side::P0).is_defeated();
        let p1_out = self.state.party(Side::P1).is_defeated();
        let outcome = match (p0_out, p1_out) {
            (true, true) => MatchOutcome {
                winner: Winner::Draw,
                reason: TerminalReason::DoubleKnockout,
            },
            (true, false) => MatchOutcome {
                winner: Winner::P1,
                reason: TerminalReason::AllFainted,
            },
            (false, true) => MatchOutcome {
                winner: Winner::P0,
                reason: TerminalReason::AllFainted,
            },
            (false, false) => return false,
        };
        self.end_match(outcome);
        true
    }

    fn end_match(&mut self, outcome: MatchOutcome) {
        self.state.outcome = Some(outcome);
        self.state.phase = FieldPhase::MatchOver;
        self.bus.push(BattleEvent::MatchEnded { outcome });
    }

    fn finalize_turn(&mut self, turn_number: u32) -> InvariantResult<()> {
        self.state.turn = turn_number;
        self.bus.push(BattleEvent::TurnEnded { turn: turn_number });

        if self.state.outcome.is_none() && self.state.turn >= self.ruleset.max_turns {
            self.end_match(MatchOutcome {
                winner: Winner::Draw,
                reason: TerminalReason::TurnLimit,
            });
        }
        if let Some(outcome) = self.state.outcome {
            info!(
                "Match over after {} turns: {} ({})",
                self.state.turn, outcome.winner, outcome.reason
            );
            return Ok(());
        }

        self.state.phase = FieldPhase::AwaitingActions;
        self.check_for_pending_replacements()
    }

    /// After a turn, any side whose active creature fainted and who still has
    /// someone standing must send a replacement in.
    fn check_for_pending_replacements(&mut self) -> InvariantResult<()> {
        let needs = Side::BOTH.map(|side| {
            let party = self.state.party(side);
            party.active().is_fainted() && !party.is_defeated()
        });
        if !needs.iter().any(|&needed| needed) {
            return Ok(());
        }

        match self.ruleset.replacement {
            ReplacementPolicy::Prompt => {
                debug!("Awaiting replacements: {:?}", needs);
                self.state.phase = FieldPhase::AwaitingReplacement(needs);
            }
            ReplacementPolicy::Random => {
                for side in Side::BOTH {
                    if !needs[side.index()] {
                        continue;
                    }
                    let targets = self.state.party(side).switch_targets();
                    let pick = self.rng.choice(Roll::Replacement, targets.len());
                    if let Some(&index) = targets.get(pick) {
                        self.send_replacement(side, index)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_replacement_phase(&mut self, choices: [Option<FieldAction>; 2]) -> InvariantResult<()> {
        self.state.pending = [None, None];
        for side in Side::BOTH {
            if let Some(FieldAction::SwitchTo(index)) = choices[side.index()] {
                self.send_replacement(side, index)?;
            }
        }
        self.state.phase = FieldPhase::AwaitingActions;
        Ok(())
    }

    fn send_replacement(&mut self, side: Side, index: usize) -> InvariantResult<()> {
        let party = self.state.party_mut(side);
        party.switch_to(index)?;
        let creature = party.active().species;
        debug!("{} sends in {:?}", side, creature);
        self.bus.push(BattleEvent::ReplacementSentOut { side, creature });
        Ok(())
    }
}

/// The acting side's active creature and the opposing one.
fn active_pair(parties: &mut [Party; 2], side: Side) -> (&mut CreatureState, &mut CreatureState) {
    let [p0, p1] = parties;
    match side {
        Side::P0 => (p0.active_mut(), p1.active_mut()),
        Side::P1 => (p1.active_mut(), p0.active_mut()),
    }
}

/// Sleep, full paralysis and confusion, in that order. Returns whether the
/// creature gets to act. Any prevented action drops a pending multi-turn
/// move.
fn check_action_preventing_conditions(
    side: Side,
    creature: &mut CreatureState,
    table: &RankMultiplierTable,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) -> InvariantResult<bool> {
    if let Some(StatusCondition::Sleep { turns }) = creature.status {
        creature.multi_turn = None;
        if turns <= 1 {
            creature.status = None;
            bus.push(BattleEvent::WokeUp {
                side,
                target: creature.species,
            });
        } else {
            creature.status = Some(StatusCondition::Sleep { turns: turns - 1 });
            bus.push(BattleEvent::ActionFailed {
                side,
                creature: creature.species,
                reason: ActionFailureReason::IsAsleep,
            });
        }
        return Ok(false);
    }

    if creature.status == Some(StatusCondition::Paralysis)
        && rng.chance(Roll::FullParalysis, FULL_PARALYSIS_CHANCE)
    {
        creature.multi_turn = None;
        bus.push(BattleEvent::ActionFailed {
            side,
            creature: creature.species,
            reason: ActionFailureReason::IsFullyParalyzed,
        });
        return Ok(false);
    }

    if let Some(turns) = creature.confusion {
        if turns <= 1 {
            creature.confusion = None;
            bus.push(BattleEvent::ConfusionEnded {
                side,
                target: creature.species,
            });
        } else {
            creature.confusion = Some(turns - 1);
            if rng.chance(Roll::ConfusionSelfHit, CONFUSION_SELF_HIT_CHANCE) {
                creature.multi_turn = None;
                let damage = confusion_damage(creature, table);
                let dealt = creature.take_damage(damage)?;
                bus.push(BattleEvent::HurtInConfusion {
                    side,
                    target: creature.species,
                    damage: dealt,
                    remaining_hp: creature.current_hp(),
                });
                return Ok(false);
            }
        }
    }

    Ok(true)
}

fn calculate_action_priority(
    state: &FieldState,
    side: Side,
    action: FieldAction,
    table: &RankMultiplierTable,
) -> ActionPriority {
    match action {
        FieldAction::SwitchTo(_) => ActionPriority {
            action_priority: 6,
            speed: 0,
        },
        FieldAction::UseMove(_) => ActionPriority {
            action_priority: 0,
            speed: effective_speed(state.party(side).active(), table),
        },
    }
}

/// Order the two submitted actions. Switches go first with P0 ahead of P1;
/// moves go by effective speed and an exact tie is a coin flip.
fn determine_action_order(
    state: &FieldState,
    actions: [FieldAction; 2],
    table: &RankMultiplierTable,
    rng: &mut dyn BattleRng,
) -> [(Side, FieldAction); 2] {
    let [a0, a1] = actions;
    let p0 = calculate_action_priority(state, Side::P0, a0, table);
    let p1 = calculate_action_priority(state, Side::P1, a1, table);
    let p0_first = match p0.cmp(&p1) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal if a0.is_switch() => true,
        Ordering::Equal => rng.chance(Roll::SpeedTie, 0.5),
    };
    if p0_first {
        [(Side::P0, a0), (Side::P1, a1)]
    } else {
        [(Side::P1, a1), (Side::P0, a0)]
    }
}

/// Every action `side` could submit right now.
pub(crate) fn legal_actions(state: &FieldState, side: Side) -> Vec<FieldAction> {
    let i = side.index();
    let party = state.party(side);
    let switches = || {
        party
            .switch_targets()
            .into_iter()
            .map(FieldAction::SwitchTo)
    };

    match state.phase {
        FieldPhase::AwaitingReplacement(flags) if flags[i] && state.pending[i].is_none() => {
            switches().collect()
        }
        FieldPhase::AwaitingActions if state.pending[i].is_none() => {
            let active = party.active();
            if active.is_fainted() {
                return switches().collect();
            }
            if let Some(locked) = active.multi_turn {
                return vec![FieldAction::UseMove(locked.slot)];
            }
            let mut actions: Vec<FieldAction> = if active.has_usable_move() {
                active
                    .usable_move_indices()
                    .into_iter()
                    .map(FieldAction::UseMove)
                    .collect()
            } else {
                // Out of PP: every slot falls through to Struggle
                (0..active.moves.len()).map(FieldAction::UseMove).collect()
            };
            actions.extend(switches());
            actions
        }
        _ => Vec::new(),
    }
}

/// Check `action` against the current phase and the side's party without
/// touching anything.
pub(crate) fn validate_action(
    state: &FieldState,
    side: Side,
    action: FieldAction,
) -> ActionResult<()> {
    let i = side.index();
    let replacing = match state.phase {
        FieldPhase::MatchOver => return Err(ActionError::MatchOver),
        FieldPhase::Aborted => return Err(ActionError::MatchAborted),
        FieldPhase::ResolvingTurn => return Err(ActionError::NotAwaiting(side)),
        FieldPhase::AwaitingReplacement(flags) if !flags[i] => {
            return Err(ActionError::NotAwaiting(side))
        }
        FieldPhase::AwaitingReplacement(_) => true,
        FieldPhase::AwaitingActions => false,
    };
    if state.pending[i].is_some() {
        return Err(ActionError::AlreadySubmitted(side));
    }

    let party = state.party(side);
    let active = party.active();
    match action {
        FieldAction::UseMove(_) if replacing => Err(ActionError::ReplacementRequired),
        FieldAction::UseMove(slot) => {
            if active.is_fainted() {
                return Err(ActionError::ActiveFainted);
            }
            if slot >= active.moves.len() {
                return Err(ActionError::NoSuchMoveSlot(slot));
            }
            if let Some(locked) = active.multi_turn {
                return if locked.slot == slot {
                    Ok(())
                } else {
                    Err(ActionError::LockedIntoMove { slot: locked.slot })
                };
            }
            if active.has_usable_move() && !active.moves[slot].has_pp() {
                return Err(ActionError::NoRemainingPp(slot));
            }
            Ok(())
        }
        FieldAction::SwitchTo(index) => {
            if !replacing {
                if let Some(locked) = active.multi_turn {
                    return Err(ActionError::LockedIntoMove { slot: locked.slot });
                }
            }
            let Some(target) = party.member(index) else {
                return Err(ActionError::NoSuchPartyMember(index));
            };
            if index == party.active_index() {
                return Err(ActionError::AlreadyActive(index));
            }
            if target.is_fainted() {
                return Err(ActionError::TargetFainted(index));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::RiggedRng;
    use crate::config::RuleVariant;
    use crate::errors::PartyDefinitionError;
    use crate::party::CreatureDefinition;
    use pretty_assertions::assert_eq;
    use schema::Species;

    fn single(species: Species, moves: &[Move]) -> Party {
        Party::new(vec![CreatureState::from_species(species, 50, moves).unwrap()]).unwrap()
    }

    #[test]
    fn test_speed_orders_moves() {
        let state = FieldState::new(
            single(Species::Charmander, &[Move::Scratch]),
            single(Species::Magikarp, &[Move::Splash]),
        );
        let mut rng = RiggedRng::new(0);
        let order = determine_action_order(
            &state,
            [FieldAction::UseMove(0), FieldAction::UseMove(0)],
            &RankMultiplierTable::gen1(),
            &mut rng,
        );
        // Magikarp (100) outspeeds Charmander (85)
        assert_eq!(order[0].0, Side::P1);
    }

    #[test]
    fn test_speed_tie_uses_coin_flip() {
        let state = FieldState::new(
            single(Species::Rattata, &[Move::Tackle]),
            single(Species::Rattata, &[Move::Tackle]),
        );
        let actions = [FieldAction::UseMove(0), FieldAction::UseMove(0)];
        let table = RankMultiplierTable::gen1();

        let mut heads = RiggedRng::new(0).force(Roll::SpeedTie, 0.0);
        assert_eq!(determine_action_order(&state, actions, &table, &mut heads)[0].0, Side::P0);

        let mut tails = RiggedRng::new(0).force(Roll::SpeedTie, 0.9);
        assert_eq!(determine_action_order(&state, actions, &table, &mut tails)[0].0, Side::P1);
    }

    #[test]
    fn test_switch_goes_before_faster_move() {
        let p0 = Party::new(vec![
            CreatureState::from_species(Species::Magikarp, 50, &[Move::Splash]).unwrap(),
            CreatureState::from_species(Species::Onix, 50, &[Move::Tackle]).unwrap(),
        ])
        .unwrap();
        let state = FieldState::new(p0, single(Species::Pikachu, &[Move::ThunderShock]));
        let mut rng = RiggedRng::new(0);
        let order = determine_action_order(
            &state,
            [FieldAction::SwitchTo(1), FieldAction::UseMove(0)],
            &RankMultiplierTable::gen1(),
            &mut rng,
        );
        assert_eq!(order[0], (Side::P0, FieldAction::SwitchTo(1)));
    }

    #[test]
    fn test_legal_actions_all_validate() {
        let state = FieldState::new(
            single(Species::Bulbasaur, &[Move::Tackle, Move::VineWhip]),
            single(Species::Pidgey, &[Move::Gust]),
        );
        let legal = legal_actions(&state, Side::P0);
        assert_eq!(legal, vec![FieldAction::UseMove(0), FieldAction::UseMove(1)]);
        for action in legal {
            assert_eq!(validate_action(&state, Side::P0, action), Ok(()));
        }
        assert_eq!(
            validate_action(&state, Side::P0, FieldAction::UseMove(2)),
            Err(ActionError::NoSuchMoveSlot(2))
        );
        assert_eq!(
            validate_action(&state, Side::P0, FieldAction::SwitchTo(0)),
            Err(ActionError::AlreadyActive(0))
        );
    }

    #[test]
    fn test_resolve_before_ready_names_missing_side() {
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = Field::new(
            single(Species::Rattata, &[Move::Tackle]),
            single(Species::Pidgey, &[Move::Gust]),
            Ruleset::for_variant(RuleVariant::Single),
            &mut rng,
        );
        field.submit_action(Side::P0, FieldAction::UseMove(0)).unwrap();
        assert!(!field.ready());
        assert_eq!(
            field.resolve().unwrap_err(),
            BattleEngineError::Action(ActionError::MissingAction(Side::P1))
        );
        assert_eq!(field.turn(), 0);
    }

    #[test]
    fn test_invariant_violation_aborts_the_match() {
        // Arrange: a switch is queued, then the outgoing creature is caught
        // mid-charge, which no legal sequence of actions can produce
        let mut rng = RiggedRng::always_hit_max_damage();
        let p0 = Party::new(vec![
            CreatureState::from_species(Species::Bulbasaur, 50, &[Move::SolarBeam]).unwrap(),
            CreatureState::from_species(Species::Onix, 50, &[Move::Tackle]).unwrap(),
        ])
        .unwrap();
        let mut field = Field::new(
            p0,
            single(Species::Magikarp, &[Move::Splash]),
            Ruleset::for_variant(RuleVariant::Single),
            &mut rng,
        );
        field.submit_action(Side::P0, FieldAction::SwitchTo(1)).unwrap();
        field.submit_action(Side::P1, FieldAction::UseMove(0)).unwrap();
        field.state.party_mut(Side::P0).active_mut().multi_turn = Some(MultiTurnMove {
            move_: Move::SolarBeam,
            slot: 0,
        });

        // Act
        let result = field.resolve().map(<[BattleEvent]>::to_vec);

        // Assert
        assert_eq!(
            result,
            Err(BattleEngineError::Invariant(
                InvariantViolation::MultiTurnMoveOnSwitch {
                    species: Species::Bulbasaur,
                    move_: Move::SolarBeam,
                }
            ))
        );
        assert_eq!(field.phase(), FieldPhase::Aborted);
        assert_eq!(field.report(), None);
        assert_eq!(field.resolve().unwrap_err(), BattleEngineError::MatchAborted);
        assert_eq!(
            field.submit_action(Side::P1, FieldAction::UseMove(0)),
            Err(ActionError::MatchAborted)
        );
    }

    #[test]
    fn test_spending_pp_that_is_not_there_aborts() {
        // Arrange: slot 0 drained after validation accepted it
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = Field::new(
            single(Species::Rattata, &[Move::Tackle, Move::TailWhip]),
            single(Species::Pidgey, &[Move::Gust]),
            Ruleset::for_variant(RuleVariant::Single),
            &mut rng,
        );
        field.submit_action(Side::P0, FieldAction::UseMove(0)).unwrap();
        field.submit_action(Side::P1, FieldAction::UseMove(0)).unwrap();
        field.state.party_mut(Side::P0).active_mut().moves[0].pp = 0;

        // Act
        let error = field.resolve().unwrap_err();

        // Assert
        assert_eq!(
            error,
            BattleEngineError::Invariant(InvariantViolation::NoPpToSpend {
                species: Species::Rattata,
                move_: Move::Tackle,
            })
        );
        assert_eq!(field.phase(), FieldPhase::Aborted);
    }

    #[test]
    fn test_field_from_definitions_validates_both_parties() {
        let ruleset = Ruleset::for_variant(RuleVariant::Single);
        let rattata = PartyDefinition::new(vec![CreatureDefinition::new(
            Species::Rattata,
            50,
            vec![Move::Tackle],
        )]);
        let pidgey = PartyDefinition::new(vec![CreatureDefinition::new(
            Species::Pidgey,
            50,
            vec![Move::Gust],
        )]);

        let mut rng = RiggedRng::new(0);
        let field = Field::from_definitions(&rattata, &pidgey, ruleset.clone(), &mut rng)
            .ok()
            .expect("both definitions are valid");
        assert_eq!(field.state().party(Side::P1).active().species, Species::Pidgey);
        assert_eq!(field.phase(), FieldPhase::AwaitingActions);

        let mut rng = RiggedRng::new(0);
        let empty = PartyDefinition::new(Vec::new());
        let error = Field::from_definitions(&rattata, &empty, ruleset, &mut rng).err();
        assert_eq!(
            error,
            Some(BattleEngineError::PartyDefinition(PartyDefinitionError::WrongSize {
                expected: 1,
                actual: 0,
            }))
        );
    }

    #[test]
    fn test_snapshot_is_json() {
        let mut rng = RiggedRng::new(0);
        let field = Field::new(
            single(Species::Rattata, &[Move::Tackle]),
            single(Species::Pidgey, &[Move::Gust]),
            Ruleset::for_variant(RuleVariant::Single),
            &mut rng,
        );
        let value: serde_json::Value = serde_json::from_str(&field.snapshot()).unwrap();
        assert_eq!(value["turn"], 0);
    }
}
