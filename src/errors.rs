use crate::battle::state::Side;
use schema::{Move, Species};
use thiserror::Error;

/// Main error type for the arena battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Static data lookup failed
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    /// A party could not be built from its definition
    #[error("Invalid party definition: {0}")]
    PartyDefinition(#[from] PartyDefinitionError),
    /// A side submitted an action the field cannot accept
    #[error("Invalid action: {0}")]
    Action(#[from] ActionError),
    /// The engine reached a state it should never reach. Fatal to the match.
    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),
    /// A ruleset could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// A chooser kept submitting invalid actions
    #[error("Chooser for {side} gave no valid action after {attempts} attempts")]
    ChooserStalled { side: Side, attempts: u32 },
    /// The match was already aborted by an earlier fatal error
    #[error("Match was aborted after a fatal error")]
    MatchAborted,
}

/// Errors related to static data lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("No species with dex number {0}")]
    UnknownSpecies(u16),
    #[error("Unknown species name: {0}")]
    UnknownSpeciesName(String),
    #[error("Unknown move: {0}")]
    UnknownMove(String),
    #[error("Species table has no record for {0:?}")]
    MissingSpecies(Species),
    #[error("Move table has no record for {0:?}")]
    MissingMove(Move),
    #[error("{species:?} does not know {move_:?}")]
    MoveNotKnown { species: Species, move_: Move },
    #[error("Malformed data: {0}")]
    Malformed(String),
}

/// Reasons a party definition is rejected before any match starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyDefinitionError {
    #[error("Party has no members")]
    Empty,
    #[error("Party has {actual} members but the ruleset requires {expected}")]
    WrongSize { expected: usize, actual: usize },
    #[error("Member {index} has no moves")]
    NoMoves { index: usize },
    #[error("Member {index} has {count} moves, at most {max} allowed")]
    TooManyMoves { index: usize, count: usize, max: usize },
    #[error("Member {index} lists {move_:?} more than once")]
    DuplicateMove { index: usize, move_: Move },
    #[error("{species:?} cannot know {move_:?} at level {level}")]
    UnlearnableMove { species: Species, move_: Move, level: u8 },
    #[error("Level {level} is outside {min}..={max}")]
    LevelOutOfRange { level: u8, min: u8, max: u8 },
    #[error("Individual value {value} is outside 0..=15")]
    IndividualValueOutOfRange { value: u8 },
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Could not parse party definition: {0}")]
    Parse(String),
}

/// Recoverable errors for submitted actions. The field state is untouched and
/// the side is asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{0} is not being asked for an action")]
    NotAwaiting(Side),
    #[error("{0} has already submitted an action this turn")]
    AlreadySubmitted(Side),
    #[error("{0} has not submitted an action yet")]
    MissingAction(Side),
    #[error("The match is over")]
    MatchOver,
    #[error("The match was aborted")]
    MatchAborted,
    #[error("Move slot {0} does not exist")]
    NoSuchMoveSlot(usize),
    #[error("Move slot {0} has no PP left")]
    NoRemainingPp(usize),
    #[error("The active creature has fainted and cannot act")]
    ActiveFainted,
    #[error("Party member {0} does not exist")]
    NoSuchPartyMember(usize),
    #[error("Party member {0} has fainted")]
    TargetFainted(usize),
    #[error("Party member {0} is already active")]
    AlreadyActive(usize),
    #[error("A replacement must be sent out before anything else")]
    ReplacementRequired,
    #[error("Locked into move slot {slot} until it resolves")]
    LockedIntoMove { slot: usize },
}

/// Engine bugs. These never describe a game event; the match is aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("HP of {species:?} would become {attempted}, outside 0..={max_hp}")]
    HpOutOfRange {
        species: Species,
        attempted: i32,
        max_hp: u16,
    },
    #[error("{species:?} switched out while {move_:?} was still in progress")]
    MultiTurnMoveOnSwitch { species: Species, move_: Move },
    #[error("Active index {index} is outside a party of {size}")]
    ActiveOutOfRange { index: usize, size: usize },
    #[error("{species:?} has no move slot {slot}")]
    MoveSlotOutOfRange { species: Species, slot: usize },
    #[error("{species:?} started {move_:?} with no PP left")]
    NoPpToSpend { species: Species, move_: Move },
    #[error(transparent)]
    Data(#[from] DataError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Could not parse ruleset: {0}")]
    Parse(String),
    #[error("Party size {0} is not supported (expected 1, 3 or 6)")]
    UnsupportedPartySize(usize),
    #[error("Level bounds {min}..={max} are invalid")]
    LevelBounds { min: u8, max: u8 },
}

pub type BattleResult<T> = Result<T, BattleEngineError>;
pub type DataResult<T> = Result<T, DataError>;
pub type ActionResult<T> = Result<T, ActionError>;
pub type PartyResult<T> = Result<T, PartyDefinitionError>;
pub type InvariantResult<T> = Result<T, InvariantViolation>;
