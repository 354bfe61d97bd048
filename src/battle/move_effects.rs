//! Effects a move applies once it has connected: status, confusion, rank
//! changes, recoil and drain.

use crate::battle::rng::{BattleRng, Roll};
use crate::battle::state::{BattleEvent, EventBus, Side};
use crate::creature::{CreatureState, StatusCondition};
use crate::errors::InvariantResult;
use schema::{EffectTarget, MoveData, MoveEffect, PokemonType};

pub const SLEEP_TURNS_MIN: u8 = 1;
pub const SLEEP_TURNS_SPAN: usize = 7;
pub const CONFUSION_TURNS_MIN: u8 = 2;
pub const CONFUSION_TURNS_SPAN: usize = 4;

/// The two creatures a move involves, plus the side of the user.
pub struct EffectContext<'a> {
    pub user_side: Side,
    pub user: &'a mut CreatureState,
    pub target: &'a mut CreatureState,
}

impl EffectContext<'_> {
    fn recipient(&mut self, target: EffectTarget) -> (Side, &mut CreatureState) {
        match target {
            EffectTarget::User => (self.user_side, &mut *self.user),
            EffectTarget::Opponent => (self.user_side.opponent(), &mut *self.target),
        }
    }
}

fn roll_chance(chance: u8, rng: &mut dyn BattleRng) -> bool {
    chance >= 100 || rng.chance(Roll::SecondaryEffect, chance as f64 / 100.0)
}

/// Whether `status` can land on `target` at all. A creature holds one
/// non-volatile status at a time; Fire types cannot be burned and Poison
/// types cannot be poisoned.
pub fn can_receive_status(target: &CreatureState, status: StatusCondition) -> bool {
    if target.is_fainted() || target.status.is_some() {
        return false;
    }
    match status {
        StatusCondition::Burn => !target.has_type(PokemonType::Fire),
        StatusCondition::Poison => !target.has_type(PokemonType::Poison),
        StatusCondition::Paralysis | StatusCondition::Sleep { .. } => true,
    }
}

fn inflict_status(
    side: Side,
    target: &mut CreatureState,
    status: StatusCondition,
    bus: &mut EventBus,
) -> bool {
    if !can_receive_status(target, status) {
        return false;
    }
    target.status = Some(status);
    bus.push(BattleEvent::StatusApplied {
        side,
        target: target.species,
        status,
    });
    true
}

/// Apply every effect tag of `move_data`. `damage_dealt` is what the move
/// did to the target this turn (0 for status moves). Returns true if any
/// effect produced an observable result, so the caller can report a status
/// move that did nothing.
pub fn apply_move_effects(
    move_data: &MoveData,
    ctx: &mut EffectContext<'_>,
    damage_dealt: u16,
    rng: &mut dyn BattleRng,
    bus: &mut EventBus,
) -> InvariantResult<bool> {
    let mut handled = false;
    let target_side = ctx.user_side.opponent();

    for effect in &move_data.effects {
        match *effect {
            MoveEffect::Burn(chance)
            | MoveEffect::Paralyze(chance)
            | MoveEffect::Poison(chance)
            | MoveEffect::Sleep(chance) => {
                if ctx.target.is_fainted() || ctx.target.status.is_some() {
                    continue;
                }
                if !roll_chance(chance, rng) {
                    continue;
                }
                let status = match effect {
                    MoveEffect::Burn(_) => StatusCondition::Burn,
                    MoveEffect::Paralyze(_) => StatusCondition::Paralysis,
                    MoveEffect::Poison(_) => StatusCondition::Poison,
                    _ => {
                        let turns =
                            SLEEP_TURNS_MIN + rng.choice(Roll::SleepDuration, SLEEP_TURNS_SPAN) as u8;
                        StatusCondition::Sleep { turns }
                    }
                };
                handled |= inflict_status(target_side, ctx.target, status, bus);
            }
            MoveEffect::Confuse(chance) => {
                if ctx.target.is_fainted() || ctx.target.confusion.is_some() {
                    continue;
                }
                if !roll_chance(chance, rng) {
                    continue;
                }
                let turns =
                    CONFUSION_TURNS_MIN + rng.choice(Roll::ConfusionDuration, CONFUSION_TURNS_SPAN) as u8;
                ctx.target.confusion = Some(turns);
                bus.push(BattleEvent::BecameConfused {
                    side: target_side,
                    target: ctx.target.species,
                });
                handled = true;
            }
            MoveEffect::StatChange(target, stat, stages, chance) => {
                let (side, recipient) = ctx.recipient(target);
                if recipient.is_fainted() {
                    continue;
                }
                if !roll_chance(chance, rng) {
                    continue;
                }
                if recipient.can_adjust_rank(stat, stages) {
                    let delta = recipient.adjust_rank(stat, stages);
                    bus.push(BattleEvent::StatChanged {
                        side,
                        target: recipient.species,
                        stat,
                        delta,
                        new_stage: recipient.rank(stat),
                    });
                } else {
                    bus.push(BattleEvent::StatChangeBlocked {
                        side,
                        target: recipient.species,
                        stat,
                        delta: stages,
                    });
                }
                handled = true;
            }
            MoveEffect::Recoil(percent) => {
                if damage_dealt == 0 || ctx.user.is_fainted() {
                    continue;
                }
                let recoil = ((damage_dealt as u32 * percent as u32) / 100).max(1) as u16;
                let dealt = ctx.user.take_damage(recoil)?;
                bus.push(BattleEvent::RecoilDamage {
                    side: ctx.user_side,
                    target: ctx.user.species,
                    damage: dealt,
                    remaining_hp: ctx.user.current_hp(),
                });
                handled = true;
            }
            MoveEffect::Drain(percent) => {
                if damage_dealt == 0 || ctx.user.is_fainted() {
                    continue;
                }
                let amount = ((damage_dealt as u32 * percent as u32) / 100).max(1) as u16;
                let healed = ctx.user.heal(amount)?;
                if healed > 0 {
                    bus.push(BattleEvent::Healed {
                        side: ctx.user_side,
                        target: ctx.user.species,
                        amount: healed,
                        new_hp: ctx.user.current_hp(),
                    });
                }
                handled = true;
            }
            MoveEffect::HighCritical | MoveEffect::ChargeUp => {}
        }
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::{RiggedRng, ALWAYS_LOW};
    use crate::move_data::get_move_data;
    use pretty_assertions::assert_eq;
    use schema::{Move, RankStat, Species};

    fn creature(species: Species, moves: &[Move]) -> CreatureState {
        CreatureState::from_species(species, 50, moves).unwrap()
    }

    #[test]
    fn test_thunder_wave_paralyzes_once() {
        let mut user = creature(Species::Pikachu, &[Move::ThunderWave]);
        let mut target = creature(Species::Rattata, &[Move::Tackle]);
        let data = get_move_data(Move::ThunderWave).unwrap();
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut bus = EventBus::new();

        let mut ctx = EffectContext {
            user_side: Side::P0,
            user: &mut user,
            target: &mut target,
        };
        assert!(apply_move_effects(data, &mut ctx, 0, &mut rng, &mut bus).unwrap());
        assert_eq!(ctx.target.status, Some(StatusCondition::Paralysis));

        // A second application fails silently
        assert!(!apply_move_effects(data, &mut ctx, 0, &mut rng, &mut bus).unwrap());
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_type_immunities_to_status() {
        let ponyta = creature(Species::Ponyta, &[Move::Ember]);
        let oddish = creature(Species::Oddish, &[Move::Absorb]);
        assert!(!can_receive_status(&ponyta, StatusCondition::Burn));
        assert!(can_receive_status(&ponyta, StatusCondition::Poison));
        assert!(!can_receive_status(&oddish, StatusCondition::Poison));
        assert!(can_receive_status(&oddish, StatusCondition::Sleep { turns: 3 }));
    }

    #[test]
    fn test_secondary_effect_respects_chance_roll() {
        let mut user = creature(Species::Charmander, &[Move::Ember]);
        let mut target = creature(Species::Pikachu, &[Move::Growl]);
        let data = get_move_data(Move::Ember).unwrap();
        let mut bus = EventBus::new();

        let mut never = RiggedRng::always_hit_max_damage();
        let mut ctx = EffectContext {
            user_side: Side::P0,
            user: &mut user,
            target: &mut target,
        };
        apply_move_effects(data, &mut ctx, 10, &mut never, &mut bus).unwrap();
        assert_eq!(ctx.target.status, None);

        let mut always = RiggedRng::new(0).force(Roll::SecondaryEffect, ALWAYS_LOW);
        apply_move_effects(data, &mut ctx, 10, &mut always, &mut bus).unwrap();
        assert_eq!(ctx.target.status, Some(StatusCondition::Burn));
    }

    #[test]
    fn test_stat_change_blocked_at_limit() {
        let mut user = creature(Species::Pidgey, &[Move::Agility]);
        let mut target = creature(Species::Rattata, &[Move::Tackle]);
        let data = get_move_data(Move::Agility).unwrap();
        let mut rng = RiggedRng::new(1);
        let mut bus = EventBus::new();
        let mut ctx = EffectContext {
            user_side: Side::P1,
            user: &mut user,
            target: &mut target,
        };

        for _ in 0..4 {
            apply_move_effects(data, &mut ctx, 0, &mut rng, &mut bus).unwrap();
        }
        assert_eq!(ctx.user.rank(RankStat::Speed), 6);
        assert!(matches!(
            bus.events().last(),
            Some(BattleEvent::StatChangeBlocked { side: Side::P1, delta: 2, .. })
        ));
    }

    #[test]
    fn test_recoil_and_drain() {
        let mut user = creature(Species::Ponyta, &[Move::TakeDown]);
        let mut target = creature(Species::Onix, &[Move::Tackle]);
        let mut rng = RiggedRng::new(2);
        let mut bus = EventBus::new();
        let max = user.max_hp();
        let mut ctx = EffectContext {
            user_side: Side::P0,
            user: &mut user,
            target: &mut target,
        };

        apply_move_effects(get_move_data(Move::TakeDown).unwrap(), &mut ctx, 40, &mut rng, &mut bus).unwrap();
        assert_eq!(ctx.user.current_hp(), max - 10);

        apply_move_effects(get_move_data(Move::Absorb).unwrap(), &mut ctx, 30, &mut rng, &mut bus).unwrap();
        assert_eq!(ctx.user.current_hp(), max - 10 + 15);
    }

    #[test]
    fn test_confusion_duration_range() {
        let mut user = creature(Species::Gastly, &[Move::ConfuseRay]);
        let mut target = creature(Species::Drowzee, &[Move::Pound]);
        let data = get_move_data(Move::ConfuseRay).unwrap();
        let mut rng = RiggedRng::new(0).force(Roll::ConfusionDuration, 0.999_999);
        let mut bus = EventBus::new();
        let mut ctx = EffectContext {
            user_side: Side::P0,
            user: &mut user,
            target: &mut target,
        };

        apply_move_effects(data, &mut ctx, 0, &mut rng, &mut bus).unwrap();
        assert_eq!(ctx.target.confusion, Some(5));
    }
}
