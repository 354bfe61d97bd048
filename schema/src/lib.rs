// Pokemon Arena Schema - Shared static data definitions
// This crate holds the closed enumerations and immutable data records that the
// battle engine resolves at load time. Nothing in here mutates during a match.

// Re-export the main types
pub use battle_data::*;
pub use moves::*;
pub use pokemon_types::*;
pub use species::*;
pub use species_data::*;

pub mod battle_data;
pub mod moves;
pub mod pokemon_types;
pub mod species;
pub mod species_data;
