use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;

// Re-export the Species enum from the schema crate
pub use schema::Species;
use schema::{Move, SpeciesData};

use crate::data::tables;
use crate::errors::{DataError, DataResult};

pub fn get_species_data(species: Species) -> DataResult<&'static SpeciesData> {
    tables().species(species)
}

/// Look up a species by national dex number.
pub fn species_by_dex(dex_number: u16) -> DataResult<&'static SpeciesData> {
    let species = Species::iter()
        .find(|s| s.dex_number() == dex_number)
        .ok_or(DataError::UnknownSpecies(dex_number))?;
    get_species_data(species)
}

pub fn species_by_name(name: &str) -> DataResult<&'static SpeciesData> {
    let species = Species::from_str(name.trim())
        .map_err(|_| DataError::UnknownSpeciesName(name.to_string()))?;
    get_species_data(species)
}

/// Moves a creature of this species may know at the given level.
pub fn learnable_moves(species: Species, level: u8) -> DataResult<BTreeSet<Move>> {
    Ok(get_species_data(species)?.learnset.learnable_by(level))
}

pub fn max_learnable_moves(species: Species, level: u8) -> DataResult<usize> {
    Ok(get_species_data(species)?.max_learnable_moves(level))
}

/// Display detailed information about a species including stats and learnset
pub fn display_species_detailed(species: Species, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match get_species_data(species) {
        Ok(data) => {
            writeln!(f, "{} (#{:03})", data.name, data.dex_number())?;
            writeln!(f, "--------------------")?;

            let type_names: Vec<String> = data.types.iter().map(|t| t.to_string()).collect();
            writeln!(f, "Type(s): {}", type_names.join(" / "))?;
            writeln!(f, "--------------------")?;

            writeln!(f, "Base Stats:")?;
            let base_stats = &data.base_stats;
            const LABEL_WIDTH: usize = 12;

            writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", base_stats.hp)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", base_stats.attack)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", base_stats.defense)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Special", base_stats.special)?;
            writeln!(f, "{:<LABEL_WIDTH$} : {}", "Speed", base_stats.speed)?;
            writeln!(f, "--------------------")?;

            write!(f, "Learnset:")?;
            for (level, moves) in &data.learnset.level_up {
                let names: Vec<String> = moves.iter().map(|m| m.display_name()).collect();
                write!(f, "\n  Lv{:<3} {}", level, names.join(", "))?;
            }
            Ok(())
        }
        Err(_) => write!(f, "{}", species.name()),
    }
}

/// Wrapper that renders a species through [`display_species_detailed`].
pub struct SpeciesCard(pub Species);

impl fmt::Display for SpeciesCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_species_detailed(self.0, f)
    }
}
