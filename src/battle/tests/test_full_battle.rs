#[cfg(test)]
mod tests {
    use crate::battle::engine::{finish, take_turn};
    use crate::battle::state::{BattleOutcome, BattlePhase, PlayerAction};
    use crate::battle::tests::common::{
        create_test_battle, predictable_rng, starting_inventory, TestCreatureBuilder,
    };
    use crate::errors::BattleError;
    use pretty_assertions::assert_eq;
    use schema::SpeciesId;

    #[test]
    fn test_flamby_beats_a_forest_glaceon() {
        let flamby = TestCreatureBuilder::new(SpeciesId::Flamby, 5).build();
        let glaceon = TestCreatureBuilder::new(SpeciesId::Glaceon, 1).build();
        assert_eq!(glaceon.max_hp(), 52);
        let mut battle_state = create_test_battle(flamby, glaceon);
        let mut inventory = starting_inventory();
        let mut rng = predictable_rng();

        let mut exchanges = 0;
        while !battle_state.is_over() {
            take_turn(
                &mut battle_state,
                PlayerAction::Attack,
                &mut inventory,
                &mut rng,
            )
            .unwrap();
            exchanges += 1;
            assert!(exchanges <= 10, "battle should end within ten exchanges");
        }

        // 9 damage per hit against 52 HP, 1 damage per reply.
        assert_eq!(exchanges, 6);
        assert_eq!(battle_state.turn_number, 6);
        assert_eq!(
            battle_state.phase,
            BattlePhase::Resolved(BattleOutcome::Victory)
        );

        let report = finish(battle_state).unwrap();
        assert_eq!(report.outcome, BattleOutcome::Victory);
        assert_eq!(report.player_team_index, 0);
        assert_eq!(report.final_player.current_hp(), 62);
        assert!(report.captured.is_none());
    }

    #[test]
    fn test_actions_after_resolution_are_rejected() {
        let flamby = TestCreatureBuilder::new(SpeciesId::Flamby, 5).build();
        let glaceon = TestCreatureBuilder::new(SpeciesId::Glaceon, 1)
            .with_hp(1)
            .build();
        let mut battle_state = create_test_battle(flamby, glaceon);
        let mut inventory = starting_inventory();
        let mut rng = predictable_rng();

        take_turn(
            &mut battle_state,
            PlayerAction::Attack,
            &mut inventory,
            &mut rng,
        )
        .unwrap();
        assert!(battle_state.is_over());

        let again = take_turn(
            &mut battle_state,
            PlayerAction::Attack,
            &mut inventory,
            &mut rng,
        );
        assert!(again.is_err());
    }

    #[test]
    fn test_finish_requires_a_resolved_battle() {
        let flamby = TestCreatureBuilder::new(SpeciesId::Flamby, 5).build();
        let glaceon = TestCreatureBuilder::new(SpeciesId::Glaceon, 1).build();
        let battle_state = create_test_battle(flamby, glaceon);

        assert_eq!(
            finish(battle_state).map(|report| report.outcome),
            Err(BattleError::BattleNotResolved)
        );
    }
}
