use crate::{Move, PokemonType};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumCount, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Damage,
    Status,
}

/// Who a move effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    User,
    Opponent,
}

/// The six in-battle stats that carry a rank modifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumCount,
)]
pub enum RankStat {
    Attack,
    Defense,
    Special,
    Speed,
    Accuracy,
    Evasion,
}

impl RankStat {
    /// Closed range a rank modifier for this stat may take.
    pub fn bounds(self) -> (i8, i8) {
        match self {
            RankStat::Accuracy => (-6, 0),
            RankStat::Evasion => (0, 6),
            _ => (-6, 6),
        }
    }
}

impl fmt::Display for RankStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            RankStat::Attack => "Attack",
            RankStat::Defense => "Defense",
            RankStat::Special => "Special",
            RankStat::Speed => "Speed",
            RankStat::Accuracy => "accuracy",
            RankStat::Evasion => "evasiveness",
        };
        write!(f, "{}", display_name)
    }
}

/// Effect tags attached to a move. Percentages are the chance the effect
/// triggers; 100 means it always applies once the move connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    // Non-volatile status, chance %
    Burn(u8),
    Paralyze(u8),
    Poison(u8),
    Sleep(u8),

    // Volatile status, chance %
    Confuse(u8),

    // target, stat, stages, chance %
    StatChange(EffectTarget, RankStat, i8, u8),

    // Damage modifiers
    Recoil(u8), // % of damage dealt returned to the user
    Drain(u8),  // % of damage dealt restored to the user
    HighCritical,

    // Spends one turn charging, strikes on the next
    ChargeUp,
}

impl MoveEffect {
    pub fn target(&self) -> EffectTarget {
        match self {
            MoveEffect::StatChange(target, ..) => *target,
            MoveEffect::Recoil(_) | MoveEffect::Drain(_) | MoveEffect::ChargeUp => EffectTarget::User,
            _ => EffectTarget::Opponent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: Move,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: Option<u8>,
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    #[serde(default)]
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.category == MoveCategory::Damage
    }

    pub fn has_effect(&self, wanted: impl Fn(&MoveEffect) -> bool) -> bool {
        self.effects.iter().any(wanted)
    }

    pub fn is_charge_move(&self) -> bool {
        self.has_effect(|e| matches!(e, MoveEffect::ChargeUp))
    }

    /// Whether the move needs an opposing creature to do anything.
    pub fn targets_opponent(&self) -> bool {
        self.is_damaging() || self.effects.iter().any(|e| e.target() == EffectTarget::Opponent)
    }
}
