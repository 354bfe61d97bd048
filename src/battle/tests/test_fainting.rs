#[cfg(test)]
mod tests {
    use crate::battle::action::FieldAction;
    use crate::battle::engine::Field;
    use crate::battle::rng::RiggedRng;
    use crate::battle::state::{BattleEvent, FieldPhase, Side, TerminalReason, Winner};
    use crate::battle::tests::common::{
        create_test_field, creature, moves_used_by, party, play_turn, single_ruleset,
        TestCreatureBuilder,
    };
    use pretty_assertions::assert_eq;
    use schema::{Move, Species};

    // --- Unit Tests for CreatureState Fainting Logic ---

    #[test]
    fn test_fainting_clears_volatile_and_status() {
        // Arrange
        let mut creature = TestCreatureBuilder::new(Species::Pikachu, 50)
            .with_status(crate::creature::StatusCondition::Burn)
            .with_confusion(3)
            .with_hp(10)
            .build();

        // Act
        let dealt = creature.take_damage(25).unwrap();

        // Assert
        assert_eq!(dealt, 10);
        assert!(creature.is_fainted());
        assert_eq!(creature.status, None);
        assert_eq!(creature.confusion, None);
        assert_eq!(creature.heal(20).unwrap(), 0);
    }

    // --- Integration Tests for Fainting in Battle ---

    #[test]
    fn test_fainted_creature_does_not_act() {
        // Arrange: Pikachu outspeeds and knocks Rattata out first
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = create_test_field(
            creature(Species::Pikachu, &[Move::ThunderShock]),
            TestCreatureBuilder::new(Species::Rattata, 50)
                .with_moves(vec![Move::Tackle])
                .with_hp(1)
                .build(),
            &mut rng,
        );

        // Act
        let events = play_turn(&mut field, FieldAction::UseMove(0), FieldAction::UseMove(0));

        // Assert
        assert_eq!(moves_used_by(&events, Side::P1), Vec::<Move>::new());
        assert!(events.contains(&BattleEvent::Fainted {
            side: Side::P1,
            creature: Species::Rattata,
        }));
        assert_eq!(field.outcome().map(|o| o.winner), Some(Winner::P0));
        assert_eq!(
            field.state().party(Side::P0).active().current_hp(),
            field.state().party(Side::P0).active().max_hp()
        );
    }

    #[test]
    fn test_last_standing_member_fainting_is_a_win_not_a_draw() {
        // Arrange: P1 brings three; the first two have already fainted
        let mut rng = RiggedRng::always_hit_max_damage();
        let p1 = party(vec![
            TestCreatureBuilder::new(Species::Rattata, 50).with_hp(0).build(),
            TestCreatureBuilder::new(Species::Pidgey, 50).with_hp(0).build(),
            creature(Species::Magikarp, &[Move::Splash]),
        ]);
        let mut field = Field::new(
            party(vec![creature(Species::Charmander, &[Move::Flamethrower])]),
            p1,
            single_ruleset(),
            &mut rng,
        );
        assert_eq!(field.legal_actions(Side::P1), vec![FieldAction::SwitchTo(2)]);

        // Act: turn 1 brings the third member in, turn 2 knocks it out
        let first = play_turn(&mut field, FieldAction::UseMove(0), FieldAction::SwitchTo(2));
        assert!(first.contains(&BattleEvent::Switched {
            side: Side::P1,
            old: Species::Rattata,
            new: Species::Magikarp,
        }));
        assert_eq!(field.state().party(Side::P1).active_index(), 2);
        assert_eq!(field.state().party(Side::P1).active().current_hp(), 39);
        let second = play_turn(&mut field, FieldAction::UseMove(0), FieldAction::UseMove(0));

        // Assert
        assert!(second.contains(&BattleEvent::Fainted {
            side: Side::P1,
            creature: Species::Magikarp,
        }));
        let outcome = field.outcome().unwrap();
        assert_eq!(outcome.winner, Winner::P0);
        assert_eq!(outcome.reason, TerminalReason::AllFainted);
        assert_eq!(field.phase(), FieldPhase::MatchOver);
        assert_eq!(field.turn(), 2);
    }

    #[test]
    fn test_recoil_knockout_on_both_sides_is_a_draw() {
        // Arrange: Ponyta is faster; Take Down's recoil finishes it off
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = create_test_field(
            TestCreatureBuilder::new(Species::Ponyta, 50)
                .with_moves(vec![Move::TakeDown])
                .with_hp(1)
                .build(),
            TestCreatureBuilder::new(Species::Rattata, 50)
                .with_moves(vec![Move::Tackle])
                .with_hp(1)
                .build(),
            &mut rng,
        );

        // Act
        let events = play_turn(&mut field, FieldAction::UseMove(0), FieldAction::UseMove(0));

        // Assert
        let outcome = field.outcome().unwrap();
        assert_eq!(outcome.winner, Winner::Draw);
        assert_eq!(outcome.reason, TerminalReason::DoubleKnockout);
        let faints = events
            .iter()
            .filter(|e| matches!(e, BattleEvent::Fainted { .. }))
            .count();
        assert_eq!(faints, 2);
        assert_eq!(moves_used_by(&events, Side::P1), Vec::<Move>::new());
    }

    #[test]
    fn test_faint_triggers_replacement_prompt_for_that_side_only() {
        // Arrange
        let mut rng = RiggedRng::always_hit_max_damage();
        let p1 = party(vec![
            TestCreatureBuilder::new(Species::Magikarp, 50)
                .with_moves(vec![Move::Splash])
                .with_hp(1)
                .build(),
            creature(Species::Rattata, &[Move::Tackle]),
        ]);
        let mut field = Field::new(
            party(vec![creature(Species::Charmander, &[Move::Flamethrower])]),
            p1,
            single_ruleset(),
            &mut rng,
        );

        // Act
        play_turn(&mut field, FieldAction::UseMove(0), FieldAction::UseMove(0));

        // Assert
        assert_eq!(field.phase(), FieldPhase::AwaitingReplacement([false, true]));
        assert_eq!(field.awaiting(), vec![Side::P1]);
        assert_eq!(field.legal_actions(Side::P1), vec![FieldAction::SwitchTo(1)]);
        assert_eq!(field.legal_actions(Side::P0), Vec::new());
        assert!(!field.is_over());
    }
}
