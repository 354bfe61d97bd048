//! Whole matches driven by two choosers, and series of them.

use crate::battle::ai::Chooser;
use crate::battle::engine::Field;
use crate::battle::observation::Observation;
use crate::battle::rng::BattleRng;
use crate::battle::state::{EventBus, MatchReport, Side, Winner};
use crate::config::Ruleset;
use crate::errors::{BattleEngineError, BattleResult, PartyDefinitionError};
use crate::party::Party;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Everything a finished match leaves behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub report: MatchReport,
    /// Every observation handed to a chooser, in order.
    pub observations: Vec<Observation>,
    pub events: EventBus,
}

/// Play one match between fresh clones of `p0` and `p1`. The canonical
/// parties are never touched. Both parties must have the ruleset's size.
pub fn run_match(
    p0: &Party,
    p1: &Party,
    ruleset: &Ruleset,
    rng: &mut dyn BattleRng,
    mut choosers: [&mut dyn Chooser; 2],
) -> BattleResult<MatchRecord> {
    for party in [p0, p1] {
        if party.len() != ruleset.party_size {
            return Err(PartyDefinitionError::WrongSize {
                expected: ruleset.party_size,
                actual: party.len(),
            }
            .into());
        }
    }
    let max_reprompts = ruleset.max_reprompts;
    let mut field = Field::new(p0.clone(), p1.clone(), ruleset.clone(), rng);
    let mut observations = Vec::new();

    while !field.is_over() {
        for side in field.awaiting() {
            let observation = field.observe(side);
            let chooser = &mut choosers[side.index()];
            let mut attempts = 0;
            loop {
                let action = chooser.choose(&observation);
                match field.submit_action(side, action) {
                    Ok(()) => break,
                    Err(error) => {
                        attempts += 1;
                        warn!("{} chose {:?} and was refused: {}", side, action, error);
                        chooser.on_rejected(&observation, action, &error);
                        if attempts > max_reprompts {
                            return Err(BattleEngineError::ChooserStalled { side, attempts });
                        }
                    }
                }
            }
            observations.push(observation);
        }
        field.resolve()?;
    }

    let report = field.report().ok_or(BattleEngineError::MatchAborted)?;
    Ok(MatchRecord {
        report,
        observations,
        events: field.into_events(),
    })
}

/// Running totals over many matches. A draw counts half a point to each
/// side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchTally {
    pub matches: u32,
    pub wins: [u32; 2],
    pub draws: u32,
    pub total_turns: u64,
}

impl MatchTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &MatchReport) {
        self.matches += 1;
        self.total_turns += report.turn_count as u64;
        match report.winner {
            Winner::P0 => self.wins[0] += 1,
            Winner::P1 => self.wins[1] += 1,
            Winner::Draw => self.draws += 1,
        }
    }

    /// Fold another tally in, e.g. one produced by a different worker.
    pub fn merge(&mut self, other: &MatchTally) {
        self.matches += other.matches;
        self.wins[0] += other.wins[0];
        self.wins[1] += other.wins[1];
        self.draws += other.draws;
        self.total_turns += other.total_turns;
    }

    pub fn score(&self, side: Side) -> f64 {
        self.wins[side.index()] as f64 + 0.5 * self.draws as f64
    }

    /// Score per match in `[0, 1]`; 0.5 before any match.
    pub fn score_rate(&self, side: Side) -> f64 {
        if self.matches == 0 {
            return 0.5;
        }
        self.score(side) / self.matches as f64
    }

    pub fn average_turns(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.matches as f64
    }
}

/// Play `matches` matches between the same canonical parties, sharing one
/// RNG stream and the same chooser instances.
pub fn play_series(
    p0: &Party,
    p1: &Party,
    ruleset: &Ruleset,
    rng: &mut dyn BattleRng,
    choosers: [&mut dyn Chooser; 2],
    matches: u32,
) -> BattleResult<MatchTally> {
    let [c0, c1] = choosers;
    let mut tally = MatchTally::new();
    for index in 0..matches {
        let record = run_match(p0, p1, ruleset, &mut *rng, [&mut *c0, &mut *c1])?;
        tally.record(&record.report);
        debug!(
            "Series match {}: {} in {} turns",
            index + 1,
            record.report.winner,
            record.report.turn_count
        );
    }
    info!(
        "Series of {}: P0 {:.1}, P1 {:.1} ({} draws)",
        tally.matches,
        tally.score(Side::P0),
        tally.score(Side::P1),
        tally.draws
    );
    Ok(tally)
}
