use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Every move the engine knows about. Identifiers are resolved against this
/// closed set when data is loaded, so battle code never sees an unknown move.
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
pub enum Move {
    // Normal
    Tackle,
    Scratch,
    Pound,
    Bite,
    Headbutt,
    Stomp,
    Slam,
    Slash,
    HyperFang,
    TakeDown,
    SkullBash,
    Gust,
    Growl,
    TailWhip,
    Leer,
    Screech,
    SandAttack,
    Harden,
    Splash,
    Struggle,
    // Flying
    WingAttack,
    // Fire
    Ember,
    Flamethrower,
    // Water
    Bubble,
    WaterGun,
    HydroPump,
    Withdraw,
    // Grass
    VineWhip,
    RazorLeaf,
    SolarBeam,
    Absorb,
    StunSpore,
    SleepPowder,
    // Poison
    PoisonPowder,
    PoisonSting,
    Acid,
    // Electric
    ThunderShock,
    ThunderWave,
    Thunder,
    // Ghost
    Lick,
    ConfuseRay,
    // Psychic
    Confusion,
    Psychic,
    Hypnosis,
    Agility,
    Meditate,
    // Rock
    RockThrow,
}

impl Move {
    /// Human readable name, e.g. `ThunderWave` -> "Thunder Wave".
    pub fn display_name(self) -> String {
        match self {
            Move::SolarBeam => "Solar Beam".to_string(),
            Move::ThunderShock => "Thunder Shock".to_string(),
            _ => {
                let raw: &'static str = self.into();
                raw.chars()
                    .enumerate()
                    .map(|(i, c)| {
                        if i > 0 && c.is_uppercase() {
                            format!(" {}", c)
                        } else {
                            c.to_string()
                        }
                    })
                    .collect()
            }
        }
    }
}
