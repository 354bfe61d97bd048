#[cfg(test)]
mod tests {
    use crate::battle::action::FieldAction;
    use crate::battle::engine::Field;
    use crate::battle::rng::RiggedRng;
    use crate::battle::state::{BattleEvent, Side};
    use crate::battle::tests::common::{
        creature, moves_used_by, party, play_turn, single_ruleset, TestCreatureBuilder,
    };
    use crate::errors::ActionError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Move, RankStat, Species};

    fn magikarp_onix_rattata() -> crate::party::Party {
        party(vec![
            TestCreatureBuilder::new(Species::Magikarp, 50)
                .with_moves(vec![Move::Splash])
                .with_rank(RankStat::Speed, 2)
                .with_confusion(3)
                .build(),
            creature(Species::Onix, &[Move::Tackle]),
            TestCreatureBuilder::new(Species::Rattata, 50).with_hp(0).build(),
        ])
    }

    #[test]
    fn test_switch_resolves_before_a_faster_move() {
        // Arrange
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = Field::new(
            magikarp_onix_rattata(),
            party(vec![creature(Species::Pikachu, &[Move::ThunderShock])]),
            single_ruleset(),
            &mut rng,
        );

        // Act
        let events = play_turn(&mut field, FieldAction::SwitchTo(1), FieldAction::UseMove(0));

        // Assert: the Thunder Shock meets Onix, which is immune
        assert_eq!(
            &events[1..4],
            &[
                BattleEvent::Switched {
                    side: Side::P0,
                    old: Species::Magikarp,
                    new: Species::Onix,
                },
                BattleEvent::MoveUsed {
                    side: Side::P1,
                    creature: Species::Pikachu,
                    move_used: Move::ThunderShock,
                },
                BattleEvent::TypeEffectiveness { multiplier: 0.0 },
            ]
        );
        let onix = field.state().party(Side::P0).active();
        assert_eq!(onix.current_hp(), onix.max_hp());
        assert_eq!(moves_used_by(&events, Side::P0), Vec::<Move>::new());
    }

    #[test]
    fn test_switching_out_resets_volatile_state() {
        // Arrange
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = Field::new(
            magikarp_onix_rattata(),
            party(vec![creature(Species::Magikarp, &[Move::Splash])]),
            single_ruleset(),
            &mut rng,
        );

        // Act
        play_turn(&mut field, FieldAction::SwitchTo(1), FieldAction::UseMove(0));

        // Assert
        let benched = field.state().party(Side::P0).member(0).unwrap();
        assert_eq!(benched.rank(RankStat::Speed), 0);
        assert_eq!(benched.confusion, None);
        assert_eq!(field.state().party(Side::P0).active_index(), 1);
    }

    #[rstest]
    #[case::out_of_range(FieldAction::SwitchTo(5), ActionError::NoSuchPartyMember(5))]
    #[case::already_active(FieldAction::SwitchTo(0), ActionError::AlreadyActive(0))]
    #[case::fainted(FieldAction::SwitchTo(2), ActionError::TargetFainted(2))]
    fn test_invalid_switches_are_rejected(#[case] action: FieldAction, #[case] expected: ActionError) {
        // Arrange
        let mut rng = RiggedRng::new(0);
        let mut field = Field::new(
            magikarp_onix_rattata(),
            party(vec![creature(Species::Magikarp, &[Move::Splash])]),
            single_ruleset(),
            &mut rng,
        );
        let before = field.state().clone();

        // Act
        let result = field.submit_action(Side::P0, action);

        // Assert
        assert_eq!(result, Err(expected));
        assert_eq!(field.state(), &before);
        assert!(!field.legal_actions(Side::P0).contains(&action));
    }
}
