#[cfg(test)]
mod tests {
    use crate::battle::action::FieldAction;
    use crate::battle::rng::RiggedRng;
    use crate::battle::state::{
        BattleEvent, FieldPhase, MatchOutcome, MatchReport, Side, TerminalReason, Winner,
    };
    use crate::battle::engine::Field;
    use crate::battle::tests::common::{
        assert_ok, create_test_field, creature, party, play_turn, single_ruleset,
        TestCreatureBuilder,
    };
    use crate::errors::{ActionError, BattleEngineError};
    use pretty_assertions::assert_eq;
    use schema::{Move, Species};

    #[test]
    fn test_flamethrower_against_splash_full_match() {
        // Arrange
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = create_test_field(
            creature(Species::Charmander, &[Move::Flamethrower]),
            creature(Species::Magikarp, &[Move::Splash]),
            &mut rng,
        );
        let attack = FieldAction::UseMove(0);

        // Act: turn 1
        let events = play_turn(&mut field, attack, attack);

        // Assert: Magikarp is faster and splashes first
        assert_eq!(
            events,
            vec![
                BattleEvent::TurnStarted { turn: 1 },
                BattleEvent::MoveUsed {
                    side: Side::P1,
                    creature: Species::Magikarp,
                    move_used: Move::Splash,
                },
                BattleEvent::MoveUsed {
                    side: Side::P0,
                    creature: Species::Charmander,
                    move_used: Move::Flamethrower,
                },
                BattleEvent::DamageDealt {
                    side: Side::P1,
                    target: Species::Magikarp,
                    damage: 56,
                    remaining_hp: 39,
                },
                BattleEvent::TypeEffectiveness { multiplier: 0.5 },
                BattleEvent::TurnEnded { turn: 1 },
            ]
        );
        assert_eq!(field.phase(), FieldPhase::AwaitingActions);
        assert_eq!(field.turn(), 1);

        // Act: turn 2
        let events = play_turn(&mut field, attack, attack);

        // Assert
        let outcome = MatchOutcome {
            winner: Winner::P0,
            reason: TerminalReason::AllFainted,
        };
        assert_eq!(
            &events[3..],
            &[
                BattleEvent::DamageDealt {
                    side: Side::P1,
                    target: Species::Magikarp,
                    damage: 39,
                    remaining_hp: 0,
                },
                BattleEvent::TypeEffectiveness { multiplier: 0.5 },
                BattleEvent::Fainted {
                    side: Side::P1,
                    creature: Species::Magikarp,
                },
                BattleEvent::MatchEnded { outcome },
                BattleEvent::TurnEnded { turn: 2 },
            ]
        );
        assert_eq!(field.phase(), FieldPhase::MatchOver);
        assert_eq!(
            field.report(),
            Some(MatchReport {
                winner: Winner::P0,
                turn_count: 2,
                reason: TerminalReason::AllFainted,
            })
        );
        assert_eq!(field.state().party(Side::P0).active().moves[0].pp, 13);
    }

    #[test]
    fn test_invalid_move_slot_is_rejected_without_side_effects() {
        // Arrange
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = create_test_field(
            creature(Species::Charmander, &[Move::Scratch, Move::Ember]),
            creature(Species::Rattata, &[Move::Tackle]),
            &mut rng,
        );
        let before = field.state().clone();

        // Act
        let result = field.submit_action(Side::P0, FieldAction::UseMove(2));

        // Assert
        assert_eq!(result, Err(ActionError::NoSuchMoveSlot(2)));
        assert_eq!(field.state(), &before);
        assert_eq!(field.turn(), 0);
        assert!(field.is_awaiting(Side::P0));
        assert!(field.events().is_empty());

        // The side may try again with a legal action
        assert_ok(field.submit_action(Side::P0, FieldAction::UseMove(1)));
        assert!(!field.is_awaiting(Side::P0));
    }

    #[test]
    fn test_second_submission_is_rejected() {
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = create_test_field(
            creature(Species::Rattata, &[Move::Tackle]),
            creature(Species::Pidgey, &[Move::Gust]),
            &mut rng,
        );

        assert_ok(field.submit_action(Side::P1, FieldAction::UseMove(0)));
        assert_eq!(
            field.submit_action(Side::P1, FieldAction::UseMove(0)),
            Err(ActionError::AlreadySubmitted(Side::P1))
        );
        assert_eq!(field.awaiting(), vec![Side::P0]);
    }

    #[test]
    fn test_finished_match_refuses_everything() {
        // Arrange: a one-hit knockout
        let mut rng = RiggedRng::always_hit_max_damage();
        let mut field = create_test_field(
            creature(Species::Pikachu, &[Move::ThunderShock]),
            TestCreatureBuilder::new(Species::Rattata, 50)
                .with_hp(1)
                .build(),
            &mut rng,
        );
        play_turn(&mut field, FieldAction::UseMove(0), FieldAction::UseMove(0));
        assert!(field.is_over());
        let events_after_end = field.events().len();

        // Act & Assert
        assert_eq!(
            field.submit_action(Side::P0, FieldAction::UseMove(0)),
            Err(ActionError::MatchOver)
        );
        assert_eq!(
            field.resolve().map(|events| events.len()),
            Err(BattleEngineError::Action(ActionError::MatchOver))
        );
        assert!(field.awaiting().is_empty());
        assert_eq!(field.events().len(), events_after_end);
    }

    #[test]
    fn test_turn_limit_ends_in_draw() {
        // Arrange
        let mut rng = RiggedRng::new(3);
        let mut field = Field::new(
            party(vec![creature(Species::Magikarp, &[Move::Splash])]),
            party(vec![creature(Species::Magikarp, &[Move::Splash])]),
            single_ruleset().with_max_turns(3),
            &mut rng,
        );

        // Act
        for _ in 0..3 {
            play_turn(&mut field, FieldAction::UseMove(0), FieldAction::UseMove(0));
        }

        // Assert
        assert_eq!(
            field.report(),
            Some(MatchReport {
                winner: Winner::Draw,
                turn_count: 3,
                reason: TerminalReason::TurnLimit,
            })
        );
        assert_eq!(
            &field.events().events()[field.events().len() - 2..],
            &[
                BattleEvent::TurnEnded { turn: 3 },
                BattleEvent::MatchEnded {
                    outcome: MatchOutcome {
                        winner: Winner::Draw,
                        reason: TerminalReason::TurnLimit,
                    },
                },
            ]
        );
    }
}
