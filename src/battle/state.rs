use crate::battle::action::FieldAction;
use crate::creature::StatusCondition;
use crate::party::Party;
use schema::{Move, RankStat, Species};
use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Side {
    P0,
    P1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P0, Side::P1];

    pub fn index(self) -> usize {
        match self {
            Side::P0 => 0,
            Side::P1 => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::P0 => Side::P1,
            Side::P1 => Side::P0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPhase {
    /// Both sides must submit an action before the turn resolves.
    AwaitingActions,
    /// Internal; never observable from outside `resolve`.
    ResolvingTurn,
    /// Flagged sides must send in a replacement for a fainted creature.
    AwaitingReplacement([bool; 2]),
    MatchOver,
    /// A fatal engine error stopped the match.
    Aborted,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Winner {
    P0,
    P1,
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::P0 => Winner::P0,
            Side::P1 => Winner::P1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TerminalReason {
    /// One side has no creature left standing.
    AllFainted,
    /// Both sides were wiped out by the same step.
    DoubleKnockout,
    /// The turn limit was reached.
    TurnLimit,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: Winner,
    pub reason: TerminalReason,
}

/// What a finished match reports to whoever ran it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    pub winner: Winner,
    pub turn_count: u32,
    pub reason: TerminalReason,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFullyParalyzed,
    /// The move had nothing to act on, e.g. a status move against an
    /// immune or already statused target.
    NoEffect,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn: u32,
    },
    TurnEnded {
        turn: u32,
    },

    // Switching
    Switched {
        side: Side,
        old: Species,
        new: Species,
    },
    ReplacementSentOut {
        side: Side,
        creature: Species,
    },

    // Moves
    MoveUsed {
        side: Side,
        creature: Species,
        move_used: Move,
    },
    ChargingUp {
        side: Side,
        creature: Species,
        move_used: Move,
    },
    MoveMissed {
        side: Side,
        creature: Species,
        move_used: Move,
    },
    CriticalHit {
        side: Side,
    },
    TypeEffectiveness {
        multiplier: f32,
    },
    DamageDealt {
        side: Side,
        target: Species,
        damage: u16,
        remaining_hp: u16,
    },
    RecoilDamage {
        side: Side,
        target: Species,
        damage: u16,
        remaining_hp: u16,
    },
    Healed {
        side: Side,
        target: Species,
        amount: u16,
        new_hp: u16,
    },
    Fainted {
        side: Side,
        creature: Species,
    },

    // Status
    StatusApplied {
        side: Side,
        target: Species,
        status: StatusCondition,
    },
    StatusDamage {
        side: Side,
        target: Species,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },
    WokeUp {
        side: Side,
        target: Species,
    },
    BecameConfused {
        side: Side,
        target: Species,
    },
    ConfusionEnded {
        side: Side,
        target: Species,
    },
    HurtInConfusion {
        side: Side,
        target: Species,
        damage: u16,
        remaining_hp: u16,
    },

    // Ranks
    StatChanged {
        side: Side,
        target: Species,
        stat: RankStat,
        delta: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        side: Side,
        target: Species,
        stat: RankStat,
        delta: i8,
    },

    ActionFailed {
        side: Side,
        creature: Species,
        reason: ActionFailureReason,
    },

    MatchEnded {
        outcome: MatchOutcome,
    },
}

impl BattleEvent {
    /// Human-readable text for the event, or None for events that carry no
    /// message of their own.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { turn } => Some(format!("=== Turn {} ===", turn)),
            BattleEvent::TurnEnded { .. } => None,

            BattleEvent::Switched { side, old, new } => Some(format!(
                "{} recalled {} and sent out {}!",
                side,
                old.name(),
                new.name()
            )),
            BattleEvent::ReplacementSentOut { side, creature } => {
                Some(format!("{} sent out {}!", side, creature.name()))
            }

            BattleEvent::MoveUsed { side, creature, move_used } => Some(format!(
                "{}'s {} used {}!",
                side,
                creature.name(),
                move_used.display_name()
            )),
            BattleEvent::ChargingUp { creature, move_used, .. } => Some(format!(
                "{} is charging up {}!",
                creature.name(),
                move_used.display_name()
            )),
            BattleEvent::MoveMissed { creature, .. } => {
                Some(format!("{}'s attack missed!", creature.name()))
            }
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::TypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m > 0.0 && m < 1.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target.name(), damage))
            }
            BattleEvent::RecoilDamage { target, damage, .. } => {
                Some(format!("{} is hit with recoil! ({} damage)", target.name(), damage))
            }
            BattleEvent::Healed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target.name(), amount))
            }
            BattleEvent::Fainted { creature, .. } => Some(format!("{} fainted!", creature.name())),

            BattleEvent::StatusApplied { target, status, .. } => Some(format!(
                "{} {}",
                target.name(),
                Self::format_status_applied(status)
            )),
            BattleEvent::StatusDamage { target, status, damage, .. } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                target.name(),
                Self::format_status(status),
                damage
            )),
            BattleEvent::WokeUp { target, .. } => Some(format!("{} woke up!", target.name())),
            BattleEvent::BecameConfused { target, .. } => {
                Some(format!("{} became confused!", target.name()))
            }
            BattleEvent::ConfusionEnded { target, .. } => {
                Some(format!("{} is no longer confused!", target.name()))
            }
            BattleEvent::HurtInConfusion { target, .. } => {
                Some(format!("{} hurt itself in its confusion!", target.name()))
            }

            BattleEvent::StatChanged { target, stat, delta, .. } => {
                let magnitude = if delta.abs() >= 2 { " sharply" } else { "" };
                let direction = if *delta > 0 { "rose" } else { "fell" };
                Some(format!("{}'s {}{} {}!", target.name(), stat, magnitude, direction))
            }
            BattleEvent::StatChangeBlocked { target, stat, delta, .. } => {
                let direction = if *delta > 0 { "higher" } else { "lower" };
                Some(format!("{}'s {} won't go any {}!", target.name(), stat, direction))
            }

            BattleEvent::ActionFailed { creature, reason, .. } => match reason {
                ActionFailureReason::IsAsleep => Some(format!("{} is fast asleep.", creature.name())),
                ActionFailureReason::IsFullyParalyzed => {
                    Some(format!("{} is fully paralyzed!", creature.name()))
                }
                ActionFailureReason::NoEffect => Some("But it failed!".to_string()),
            },

            BattleEvent::MatchEnded { outcome } => match outcome.winner {
                Winner::Draw => Some(format!("The match ended in a draw ({}).", outcome.reason)),
                side => Some(format!("{} has won the match!", side)),
            },
        }
    }

    fn format_status(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep { .. } => "sleep",
            StatusCondition::Poison => "poison",
            StatusCondition::Burn => "burn",
            StatusCondition::Paralysis => "paralysis",
        }
    }

    fn format_status_applied(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep { .. } => "fell asleep!",
            StatusCondition::Poison => "was poisoned!",
            StatusCondition::Burn => "was burned!",
            StatusCondition::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }
}

/// Ordered log of everything that happened in a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Events pushed since index `from`.
    pub fn since(&self, from: usize) -> &[BattleEvent] {
        &self.events[from.min(self.events.len())..]
    }

    /// Formatted text of every event that has any.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Everything one match owns. The RNG is not part of it: it is lent to the
/// field by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldState {
    pub parties: [Party; 2],
    /// Completed turns.
    pub turn: u32,
    pub phase: FieldPhase,
    pub pending: [Option<FieldAction>; 2],
    pub outcome: Option<MatchOutcome>,
}

impl FieldState {
    pub fn new(p0: Party, p1: Party) -> Self {
        Self {
            parties: [p0, p1],
            turn: 0,
            phase: FieldPhase::AwaitingActions,
            pending: [None, None],
            outcome: None,
        }
    }

    pub fn party(&self, side: Side) -> &Party {
        &self.parties[side.index()]
    }

    pub fn party_mut(&mut self, side: Side) -> &mut Party {
        &mut self.parties[side.index()]
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, FieldPhase::MatchOver | FieldPhase::Aborted)
    }
}
