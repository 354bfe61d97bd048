use crate::party::{CreatureDefinition, PartyDefinition};
use schema::{Move, Species};
use serde::{Deserialize, Serialize};

/// A ready-made trio for demos and smoke tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabParty {
    pub id: String,
    pub name: String,
    pub description: String,
    pub definition: PartyDefinition,
}

fn member(species: Species, moves: &[Move]) -> CreatureDefinition {
    CreatureDefinition::new(species, 50, moves.to_vec())
}

/// All prefab parties. Every member is level 50 and legal under the trio
/// ruleset.
pub fn get_prefab_parties() -> Vec<PrefabParty> {
    vec![
        PrefabParty {
            id: "meadow".to_string(),
            name: "Meadow".to_string(),
            description: "Sleep and status pressure backed by Psychic damage".to_string(),
            definition: PartyDefinition::new(vec![
                member(
                    Species::Bulbasaur,
                    &[Move::RazorLeaf, Move::SleepPowder, Move::PoisonPowder, Move::Tackle],
                ),
                member(
                    Species::Drowzee,
                    &[Move::Psychic, Move::Hypnosis, Move::Confusion, Move::Meditate],
                ),
                member(
                    Species::Pidgey,
                    &[Move::WingAttack, Move::Agility, Move::SandAttack, Move::Gust],
                ),
            ]),
        },
        PrefabParty {
            id: "volcano".to_string(),
            name: "Volcano".to_string(),
            description: "Fast hitters with paralysis support and a Rock wall".to_string(),
            definition: PartyDefinition::new(vec![
                member(
                    Species::Ponyta,
                    &[Move::TakeDown, Move::Stomp, Move::Ember, Move::Agility],
                ),
                member(
                    Species::Pikachu,
                    &[Move::Thunder, Move::ThunderWave, Move::ThunderShock, Move::Agility],
                ),
                member(
                    Species::Onix,
                    &[Move::RockThrow, Move::Slam, Move::Harden, Move::Screech],
                ),
            ]),
        },
        PrefabParty {
            id: "tidepool".to_string(),
            name: "Tidepool".to_string(),
            description: "Charge attacks, confusion and a Ground answer to Electric".to_string(),
            definition: PartyDefinition::new(vec![
                member(
                    Species::Squirtle,
                    &[Move::HydroPump, Move::Bite, Move::Withdraw, Move::SkullBash],
                ),
                member(Species::Gastly, &[Move::Hypnosis, Move::ConfuseRay, Move::Lick]),
                member(
                    Species::Sandshrew,
                    &[Move::Slash, Move::PoisonSting, Move::SandAttack, Move::Scratch],
                ),
            ]),
        },
    ]
}

pub fn get_prefab_party(id: &str) -> Option<PrefabParty> {
    get_prefab_parties().into_iter().find(|party| party.id == id)
}
