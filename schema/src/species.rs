use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Species available to party definitions. The discriminant is the national
/// dex number.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u16)]
pub enum Species {
    Bulbasaur = 1,
    Charmander = 4,
    Squirtle = 7,
    Pidgey = 16,
    Rattata = 19,
    Pikachu = 25,
    Sandshrew = 27,
    Oddish = 43,
    Ponyta = 77,
    Gastly = 92,
    Onix = 95,
    Drowzee = 96,
    Magikarp = 129,
}

impl Species {
    pub fn dex_number(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}
