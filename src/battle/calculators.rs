use crate::battle::rng::{BattleRng, Roll};
use crate::battle::stats::{attack_and_defense, effective_attack, effective_defense};
use crate::config::RankMultiplierTable;
use crate::creature::CreatureState;
use crate::errors::DataResult;
use crate::species::get_species_data;
use schema::{MoveData, MoveEffect, PokemonType};

/// Lowest and highest random factor numerators; damage is scaled by n/255.
pub const VARIANCE_MIN: u32 = 217;
pub const VARIANCE_MAX: u32 = 255;
pub const CONFUSION_SELF_HIT_POWER: u32 = 40;
const MAX_CRIT_CHANCE: f64 = 255.0 / 256.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u16,
    pub critical: bool,
    pub effectiveness: f32,
}

/// Chance that a move lands a critical hit, from the attacker's base speed.
pub fn critical_hit_chance(attacker: &CreatureState, move_data: &MoveData) -> DataResult<f64> {
    let base_speed = get_species_data(attacker.species)?.base_stats.speed as f64;
    let mut chance = base_speed / 512.0;
    if move_data.has_effect(|e| matches!(e, MoveEffect::HighCritical)) {
        chance *= 8.0;
    }
    Ok(chance.min(MAX_CRIT_CHANCE))
}

/// The level/power/stat part of the damage formula. A critical hit doubles
/// the level; stats above 255 are scaled down by four together.
pub fn base_damage(level: u8, power: u8, attack: u16, defense: u16, critical: bool) -> u32 {
    let level = if critical { level as u32 * 2 } else { level as u32 };
    let (mut attack, mut defense) = (attack as u32, defense as u32);
    if attack > 255 || defense > 255 {
        attack = (attack / 4).max(1);
        defense = (defense / 4).max(1);
    }
    ((2 * level / 5 + 2) * power as u32 * attack / defense.max(1)) / 50 + 2
}

/// STAB, type effectiveness and the random factor, in that order. Never
/// below 1 unless the target is immune.
pub fn modify_damage(base: u32, stab: bool, effectiveness: f32, variance: u32) -> u32 {
    if effectiveness == 0.0 {
        return 0;
    }
    let mut damage = base;
    if stab {
        damage = damage * 3 / 2;
    }
    damage = (damage as f64 * effectiveness as f64).floor() as u32;
    damage = damage * variance / VARIANCE_MAX;
    damage.max(1)
}

/// Roll a full damaging hit. Immune targets take no damage and consume no
/// random draws. The result is not yet clamped to the defender's HP.
pub fn calculate_damage(
    attacker: &CreatureState,
    defender: &CreatureState,
    move_data: &MoveData,
    table: &RankMultiplierTable,
    rng: &mut dyn BattleRng,
) -> DataResult<DamageRoll> {
    let effectiveness = PokemonType::effectiveness_against(move_data.move_type, defender.types());
    let Some(power) = move_data.power else {
        return Ok(DamageRoll {
            damage: 0,
            critical: false,
            effectiveness,
        });
    };
    if effectiveness == 0.0 {
        return Ok(DamageRoll {
            damage: 0,
            critical: false,
            effectiveness,
        });
    }

    let critical = rng.chance(Roll::CriticalHit, critical_hit_chance(attacker, move_data)?);
    let (attack, defense) = attack_and_defense(attacker, defender, move_data.move_type, table, critical);
    let base = base_damage(attacker.level, power, attack, defense, critical);
    let stab = attacker.has_type(move_data.move_type);
    let spread = (VARIANCE_MAX - VARIANCE_MIN + 1) as usize;
    let variance = VARIANCE_MIN + rng.choice(Roll::DamageVariance, spread) as u32;
    let damage = modify_damage(base, stab, effectiveness, variance);

    Ok(DamageRoll {
        damage: damage.min(u16::MAX as u32) as u16,
        critical,
        effectiveness,
    })
}

/// Damage a confused creature deals to itself: a typeless 40 power physical
/// hit with its own attack against its own defense.
pub fn confusion_damage(creature: &CreatureState, table: &RankMultiplierTable) -> u16 {
    let attack = effective_attack(creature, table, false);
    let defense = effective_defense(creature, table, false);
    base_damage(creature.level, CONFUSION_SELF_HIT_POWER as u8, attack, defense, false) as u16
}
