use crate::battle::action::FieldAction;
use crate::battle::engine::Field;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, Side};
use crate::config::{RuleVariant, Ruleset};
use crate::creature::{CreatureState, StatusCondition};
use crate::party::Party;
use schema::{Move, RankStat, Species};

/// A builder for creating test creatures with common defaults.
///
/// # Example
/// ```ignore
/// let pikachu = TestCreatureBuilder::new(Species::Pikachu, 50)
///     .with_moves(vec![Move::ThunderShock])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestCreatureBuilder {
    species: Species,
    level: u8,
    moves: Vec<Move>,
    status: Option<StatusCondition>,
    confusion: Option<u8>,
    current_hp: Option<u16>,
    ranks: Vec<(RankStat, i8)>,
    pp: Vec<(usize, u8)>,
    empty_pp: bool,
}

impl TestCreatureBuilder {
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            species,
            level,
            moves: vec![Move::Tackle],
            status: None,
            confusion: None,
            current_hp: None,
            ranks: Vec::new(),
            pp: Vec::new(),
            empty_pp: false,
        }
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_confusion(mut self, turns: u8) -> Self {
        self.confusion = Some(turns);
        self
    }

    /// Current HP. If not set, HP will be max. Zero builds a fainted creature.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_rank(mut self, stat: RankStat, stage: i8) -> Self {
        self.ranks.push((stat, stage));
        self
    }

    pub fn with_pp(mut self, slot: usize, pp: u8) -> Self {
        self.pp.push((slot, pp));
        self
    }

    /// Every move slot starts with no PP left.
    pub fn without_pp(mut self) -> Self {
        self.empty_pp = true;
        self
    }

    pub fn build(self) -> CreatureState {
        let mut creature = match CreatureState::from_species(self.species, self.level, &self.moves) {
            Ok(creature) => creature,
            Err(err) => panic!("Failed to build {:?}: {}", self.species, err),
        };

        if let Some(hp) = self.current_hp {
            let missing = creature.max_hp().saturating_sub(hp);
            assert_ok(creature.take_damage(missing));
        }
        if !creature.is_fainted() {
            creature.status = self.status;
            creature.confusion = self.confusion;
        }
        for (stat, stage) in self.ranks {
            creature.adjust_rank(stat, stage);
        }
        if self.empty_pp {
            for slot in &mut creature.moves {
                slot.pp = 0;
            }
        }
        for (slot, pp) in self.pp {
            creature.moves[slot].pp = pp;
        }
        creature
    }
}

/// Shorthand for a full-health level 50 creature.
pub fn creature(species: Species, moves: &[Move]) -> CreatureState {
    TestCreatureBuilder::new(species, 50)
        .with_moves(moves.to_vec())
        .build()
}

pub fn party(members: Vec<CreatureState>) -> Party {
    assert_ok(Party::new(members))
}

/// Ruleset for one-on-one tests. Party size is only checked when building
/// from definitions, so bigger hand-built parties work with it too.
pub fn single_ruleset() -> Ruleset {
    Ruleset::for_variant(RuleVariant::Single)
}

/// Standard 1v1 field over a caller-owned RNG.
pub fn create_test_field<'r>(
    p0: CreatureState,
    p1: CreatureState,
    rng: &'r mut dyn BattleRng,
) -> Field<'r> {
    Field::new(party(vec![p0]), party(vec![p1]), single_ruleset(), rng)
}

/// Submit both actions and resolve the turn, returning its events.
pub fn play_turn(field: &mut Field<'_>, p0: FieldAction, p1: FieldAction) -> Vec<BattleEvent> {
    assert_ok(field.submit_action(Side::P0, p0));
    assert_ok(field.submit_action(Side::P1, p1));
    assert_ok(field.resolve()).to_vec()
}

pub fn moves_used_by(events: &[BattleEvent], side: Side) -> Vec<Move> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed {
                side: s, move_used, ..
            } if *s == side => Some(*move_used),
            _ => None,
        })
        .collect()
}

/// Assert that a Result is Ok and return the value, with a readable
/// message when it is not.
pub fn assert_ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
