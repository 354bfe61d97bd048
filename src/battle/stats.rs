use crate::config::RankMultiplierTable;
use crate::creature::{CreatureState, StatusCondition};
use schema::{MoveData, PokemonType, RankStat};

const STAT_FLOOR: u16 = 1;
const STAT_CEILING: u16 = 999;

/// Scale a stat by the multiplier for its rank stage.
fn apply_stage(stat: u16, stage: i8, table: &RankMultiplierTable) -> u16 {
    let scaled = (stat as f64 * table.stat_multiplier(stage)).floor() as u16;
    scaled.clamp(STAT_FLOOR, STAT_CEILING)
}

/// Attack including rank and burn. On a critical hit a lowered attack rank
/// is ignored.
pub fn effective_attack(creature: &CreatureState, table: &RankMultiplierTable, critical: bool) -> u16 {
    let mut stage = creature.rank(RankStat::Attack);
    if critical {
        stage = stage.max(0);
    }
    let mut attack = apply_stage(creature.stats().attack, stage, table);
    if creature.status == Some(StatusCondition::Burn) {
        attack = (attack / 2).max(STAT_FLOOR);
    }
    attack
}

/// Defense including rank. On a critical hit a raised defense rank is
/// ignored.
pub fn effective_defense(creature: &CreatureState, table: &RankMultiplierTable, critical: bool) -> u16 {
    let mut stage = creature.rank(RankStat::Defense);
    if critical {
        stage = stage.min(0);
    }
    apply_stage(creature.stats().defense, stage, table)
}

/// Special on the attacking side of a special move.
pub fn effective_special_offense(
    creature: &CreatureState,
    table: &RankMultiplierTable,
    critical: bool,
) -> u16 {
    let mut stage = creature.rank(RankStat::Special);
    if critical {
        stage = stage.max(0);
    }
    apply_stage(creature.stats().special, stage, table)
}

/// Special on the defending side of a special move.
pub fn effective_special_defense(
    creature: &CreatureState,
    table: &RankMultiplierTable,
    critical: bool,
) -> u16 {
    let mut stage = creature.rank(RankStat::Special);
    if critical {
        stage = stage.min(0);
    }
    apply_stage(creature.stats().special, stage, table)
}

/// Speed including rank; paralysis quarters it.
pub fn effective_speed(creature: &CreatureState, table: &RankMultiplierTable) -> u16 {
    let speed = apply_stage(creature.stats().speed, creature.rank(RankStat::Speed), table);
    if creature.status == Some(StatusCondition::Paralysis) {
        (speed / 4).max(STAT_FLOOR)
    } else {
        speed
    }
}

/// The (attack, defense) pair a move of this type uses.
pub fn attack_and_defense(
    attacker: &CreatureState,
    defender: &CreatureState,
    move_type: PokemonType,
    table: &RankMultiplierTable,
    critical: bool,
) -> (u16, u16) {
    if move_type.is_special() {
        (
            effective_special_offense(attacker, table, critical),
            effective_special_defense(defender, table, critical),
        )
    } else {
        (
            effective_attack(attacker, table, critical),
            effective_defense(defender, table, critical),
        )
    }
}

/// Probability in `[0, 1]` that a move connects. Moves without an accuracy
/// value never miss.
pub fn hit_probability(
    move_data: &MoveData,
    attacker: &CreatureState,
    defender: &CreatureState,
    table: &RankMultiplierTable,
) -> f64 {
    let Some(accuracy) = move_data.accuracy else {
        return 1.0;
    };
    let accuracy_stage = attacker.rank(RankStat::Accuracy);
    let evasion_stage = defender.rank(RankStat::Evasion);
    let p = accuracy as f64 / 100.0
        * table.accuracy_multiplier(accuracy_stage)
        * table.accuracy_multiplier(-evasion_stage);
    p.clamp(0.0, 1.0)
}
