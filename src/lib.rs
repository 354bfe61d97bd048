//! Pokemon Arena Battle Engine
//!
//! A deterministic two-sided battle simulator with Generation 1 mechanics,
//! built for evaluating parties over many reproducible matches. Choosers
//! (random, scripted, greedy or learned) drive each side through a fixed
//! observation and action interface.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod creature;
pub mod data;
pub mod errors;
pub mod move_data;
pub mod party;
pub mod prefab_parties;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, EffectTarget, Learnset, Move, MoveCategory, MoveData, MoveEffect, PokemonType,
    RankStat, Species, SpeciesData,
};

// --- From this crate's modules (`src/`) ---

// Field, turn machine and the chooser interface.
pub use battle::action::FieldAction;
pub use battle::ai::{Chooser, GreedyChooser, RandomChooser, ScriptedChooser};
pub use battle::engine::Field;
pub use battle::observation::{Decision, Observation, FEATURE_LEN};
pub use battle::rng::{BattleRng, RiggedRng, Roll, SeededRng};
pub use battle::runner::{play_series, run_match, MatchRecord, MatchTally};
pub use battle::state::{
    BattleEvent, EventBus, FieldPhase, FieldState, MatchOutcome, MatchReport, Side,
    TerminalReason, Winner,
};

// Runtime creatures and parties.
pub use creature::{CreatureState, StatusCondition};
pub use party::{CreatureDefinition, Party, PartyDefinition};

// Configuration and data access.
pub use config::{RankMultiplierTable, ReplacementPolicy, RuleVariant, Ruleset};
pub use move_data::get_move_data;
pub use species::get_species_data;

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, ConfigError, DataError, InvariantViolation,
    PartyDefinitionError,
};
