//! Match rules. Everything here is data so a ruleset can be read from RON
//! next to the party definitions it applies to.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Stage -> multiplier lookup, indexed by `stage + 6`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankMultiplierTable {
    pub stat_stages: [f64; 13],
    pub accuracy_stages: [f64; 13],
}

impl RankMultiplierTable {
    /// Generation 1 stage multipliers: 2/(2+n) and (2+n)/2 for stats,
    /// 3/(3+n) and (3+n)/3 for accuracy and evasion.
    pub fn gen1() -> Self {
        let mut stat_stages = [1.0; 13];
        let mut accuracy_stages = [1.0; 13];
        for stage in -6i8..=6 {
            let n = stage.unsigned_abs() as f64;
            let idx = (stage + 6) as usize;
            if stage < 0 {
                stat_stages[idx] = 2.0 / (2.0 + n);
                accuracy_stages[idx] = 3.0 / (3.0 + n);
            } else {
                stat_stages[idx] = (2.0 + n) / 2.0;
                accuracy_stages[idx] = (3.0 + n) / 3.0;
            }
        }
        Self {
            stat_stages,
            accuracy_stages,
        }
    }

    /// Ranks are tracked but never change a stat.
    pub fn identity() -> Self {
        Self {
            stat_stages: [1.0; 13],
            accuracy_stages: [1.0; 13],
        }
    }

    pub fn stat_multiplier(&self, stage: i8) -> f64 {
        self.stat_stages[Self::index(stage)]
    }

    pub fn accuracy_multiplier(&self, stage: i8) -> f64 {
        self.accuracy_stages[Self::index(stage)]
    }

    fn index(stage: i8) -> usize {
        (stage.clamp(-6, 6) + 6) as usize
    }
}

impl Default for RankMultiplierTable {
    fn default() -> Self {
        Self::gen1()
    }
}

/// What happens when an active creature faints and the party still has
/// members standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplacementPolicy {
    /// The side's chooser picks the replacement.
    #[default]
    Prompt,
    /// The engine picks uniformly among healthy members.
    Random,
}

/// Preset rule variants by party size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleVariant {
    Single,
    Trio,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub party_size: usize,
    pub min_level: u8,
    pub max_level: u8,
    /// Completed turns after which the match is called a draw.
    pub max_turns: u32,
    pub rank_table: RankMultiplierTable,
    pub replacement: ReplacementPolicy,
    /// When set, every move slot starts with this much PP instead of the
    /// move's own maximum.
    pub pp_override: Option<u8>,
    /// Invalid actions tolerated from one chooser at one decision point.
    pub max_reprompts: u32,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::for_variant(RuleVariant::Trio)
    }
}

impl Ruleset {
    pub fn for_variant(variant: RuleVariant) -> Self {
        let (party_size, level) = match variant {
            RuleVariant::Single => (1, 55),
            RuleVariant::Trio => (3, 50),
            RuleVariant::Full => (6, 50),
        };
        Self {
            party_size,
            min_level: 1,
            max_level: level,
            max_turns: 64,
            rank_table: RankMultiplierTable::gen1(),
            replacement: ReplacementPolicy::Prompt,
            pp_override: None,
            max_reprompts: 8,
        }
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let ruleset: Ruleset =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.party_size, 1 | 3 | 6) {
            return Err(ConfigError::UnsupportedPartySize(self.party_size));
        }
        if self.min_level == 0 || self.min_level > self.max_level || self.max_level > 100 {
            return Err(ConfigError::LevelBounds {
                min: self.min_level,
                max: self.max_level,
            });
        }
        Ok(())
    }

    pub fn with_party_size(mut self, party_size: usize) -> Self {
        self.party_size = party_size;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_rank_table(mut self, rank_table: RankMultiplierTable) -> Self {
        self.rank_table = rank_table;
        self
    }

    pub fn with_replacement(mut self, replacement: ReplacementPolicy) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_pp_override(mut self, pp: Option<u8>) -> Self {
        self.pp_override = pp;
        self
    }
}
