//! Choosers: anything that turns an [`Observation`] into a [`FieldAction`].

use crate::battle::action::FieldAction;
use crate::battle::observation::{ActiveView, Decision, Observation};
use crate::errors::{ActionError, DataResult};
use crate::move_data::get_move_data;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use schema::{EffectTarget, Move, MoveEffect, PokemonType};
use std::collections::VecDeque;

/// A policy deciding one side's actions. It sees nothing but the
/// observation it is handed.
pub trait Chooser {
    fn choose(&mut self, observation: &Observation) -> FieldAction;

    /// Called when the field refused the last choice. The same observation
    /// is offered again afterwards.
    fn on_rejected(&mut self, _observation: &Observation, _action: FieldAction, _error: &ActionError) {}
}

/// Uniformly random legal actions, switching only occasionally.
#[derive(Debug, Clone)]
pub struct RandomChooser {
    rng: StdRng,
    switch_probability: f64,
}

impl RandomChooser {
    pub const DEFAULT_SWITCH_PROBABILITY: f64 = 0.1;

    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            switch_probability: Self::DEFAULT_SWITCH_PROBABILITY,
        }
    }

    pub fn with_switch_probability(mut self, probability: f64) -> Self {
        self.switch_probability = probability.clamp(0.0, 1.0);
        self
    }
}

impl Chooser for RandomChooser {
    fn choose(&mut self, observation: &Observation) -> FieldAction {
        let (switches, moves): (Vec<_>, Vec<_>) = observation
            .legal_actions()
            .into_iter()
            .partition(FieldAction::is_switch);
        let switch = moves.is_empty()
            || (!switches.is_empty() && self.rng.random::<f64>() < self.switch_probability);
        let pool = if switch { &switches } else { &moves };
        pool.choose(&mut self.rng)
            .copied()
            .unwrap_or(FieldAction::UseMove(0))
    }
}

/// Plays back a fixed list of actions, then falls back to the first legal
/// action.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    script: VecDeque<FieldAction>,
}

impl ScriptedChooser {
    pub fn new(script: impl IntoIterator<Item = FieldAction>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, observation: &Observation) -> FieldAction {
        self.script
            .pop_front()
            .or_else(|| observation.legal_actions().first().copied())
            .unwrap_or(FieldAction::UseMove(0))
    }
}

/// Greedy one-ply scoring: the best-looking move, unless a switch scores
/// higher. Deterministic for a given observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyChooser;

impl GreedyChooser {
    pub fn new() -> Self {
        Self
    }

    fn score_action(&self, action: FieldAction, observation: &Observation) -> f32 {
        match action {
            FieldAction::UseMove(slot) => self.score_move(slot, observation).unwrap_or(0.0),
            FieldAction::SwitchTo(index) => self.score_switch(index, observation),
        }
    }

    fn score_move(&self, slot: usize, observation: &Observation) -> DataResult<f32> {
        let move_ = if observation.must_struggle {
            Move::Struggle
        } else {
            match observation.own_move(slot) {
                Some(view) => view.move_,
                None => return Ok(-1.0),
            }
        };
        let move_data = get_move_data(move_)?;
        let attacker = &observation.own_active;
        let defender = &observation.opponent_active;
        let defender_types: Vec<PokemonType> = defender.types().collect();
        let effectiveness = PokemonType::effectiveness_against(move_data.move_type, &defender_types);

        // Damage
        let mut damage_score = 0.0;
        if let Some(power) = move_data.power {
            if effectiveness < 0.1 {
                return Ok(-1.0);
            }
            let stab = if attacker.types().any(|t| t == move_data.move_type) {
                1.5
            } else {
                1.0
            };
            damage_score = power as f32 * effectiveness * stab;
        }

        // Utility
        let mut utility_score = 0.0;
        for effect in &move_data.effects {
            match *effect {
                MoveEffect::StatChange(EffectTarget::User, stat, stages, chance) if stages > 0 => {
                    let current = attacker.ranks[stat as usize];
                    if current < 6 {
                        let potential_gain = 1.0 - current as f32 / 6.0;
                        utility_score += 20.0 * stages as f32 * potential_gain * chance as f32 / 100.0;
                    }
                }
                MoveEffect::StatChange(EffectTarget::Opponent, stat, stages, chance) if stages < 0 => {
                    if defender.ranks[stat as usize] > -6 {
                        utility_score += 15.0 * stages.unsigned_abs() as f32 * chance as f32 / 100.0;
                    }
                }
                MoveEffect::Burn(chance)
                | MoveEffect::Paralyze(chance)
                | MoveEffect::Poison(chance)
                | MoveEffect::Sleep(chance) => {
                    if status_would_land(effect, defender, effectiveness) {
                        utility_score += 45.0 * chance as f32 / 100.0;
                    }
                }
                MoveEffect::Confuse(chance) if !defender.confused => {
                    utility_score += 30.0 * chance as f32 / 100.0;
                }
                MoveEffect::Drain(percent) => {
                    utility_score += damage_score * percent as f32 / 200.0;
                }
                MoveEffect::Recoil(percent) => {
                    utility_score -= damage_score * percent as f32 / 200.0;
                }
                _ => {}
            }
        }

        if !move_data.is_damaging() && utility_score < 1.0 {
            return Ok(-1.0);
        }

        let mut score = damage_score + utility_score;
        if move_data.targets_opponent() {
            let accuracy = move_data.accuracy.unwrap_or(101);
            score *= accuracy as f32 / 100.0;
        }
        if move_data.is_charge_move() {
            score *= 0.5;
        }
        Ok(score)
    }

    fn score_switch(&self, index: usize, observation: &Observation) -> f32 {
        // Small baseline: better than a useless move, worse than most attacks.
        let health = observation
            .own_party_hp
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(0.0);
        1.0 + 0.1 * health
    }
}

fn status_would_land(effect: &MoveEffect, defender: &ActiveView, effectiveness: f32) -> bool {
    if defender.status.is_some() {
        return false;
    }
    match effect {
        MoveEffect::Burn(_) => !defender.types().any(|t| t == PokemonType::Fire),
        MoveEffect::Poison(_) => !defender.types().any(|t| t == PokemonType::Poison),
        _ => effectiveness > 0.0,
    }
}

impl Chooser for GreedyChooser {
    fn choose(&mut self, observation: &Observation) -> FieldAction {
        let legal = observation.legal_actions();
        let best = |candidates: Vec<FieldAction>| {
            candidates
                .into_iter()
                .map(|action| (action, self.score_action(action, observation)))
                .max_by_key(|(_, score)| OrderedFloat(*score))
        };
        let (switches, moves): (Vec<_>, Vec<_>) =
            legal.into_iter().partition(FieldAction::is_switch);

        if observation.decision == Decision::ChooseReplacement {
            return best(switches)
                .map(|(action, _)| action)
                .unwrap_or(FieldAction::SwitchTo(0));
        }

        match (best(moves), best(switches)) {
            (Some((move_action, move_score)), Some((switch_action, switch_score))) => {
                if switch_score > move_score {
                    switch_action
                } else {
                    move_action
                }
            }
            (Some((move_action, _)), None) => move_action,
            (None, Some((switch_action, _))) => switch_action,
            (None, None) => FieldAction::UseMove(0),
        }
    }
}
