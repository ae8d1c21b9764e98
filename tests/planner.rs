use moo2_planner::{
    data::{Building, Climate, GameData, Gravity, MineralRichness, Planet, PlanetSize, TechField},
    game::NO_OP_TARGETS,
    Colony, Game, SearchEngine, SearchSettings,
};

/// One grown gaia world; only the last physics level and its building remain.
fn endgame() -> Game {
    let data = GameData::standard();
    let tech: Vec<(TechField, usize)> = TechField::ALL
        .iter()
        .map(|field| {
            let levels = data.tech_tree.levels(*field).len();
            if *field == TechField::Physics {
                (*field, levels - 1)
            } else {
                (*field, levels)
            }
        })
        .collect();
    let probe = Game::new(data.clone(), Vec::new(), &tech).unwrap();
    let built: Vec<Building> = probe
        .unlocked_buildings()
        .iter()
        .copied()
        .filter(|building| !NO_OP_TARGETS.contains(building))
        .collect();
    let planet = Planet::new(
        PlanetSize::Huge,
        MineralRichness::Abundant,
        Gravity::Normal,
        Climate::Gaia,
    );
    let colony = Colony::new("Eden", planet, 2, 12, 18, &built, None);
    Game::new(data, vec![colony], &tech)
        .unwrap()
        .with_stored_rp(50_000)
}

fn settings(seed: u64) -> SearchSettings {
    SearchSettings {
        samples: 2,
        threads: 1,
        seed,
        max_turns: 200,
    }
}

#[test]
fn planner_is_deterministic_for_a_seed() {
    let mut first = SearchEngine::new(endgame(), settings(5));
    let mut second = SearchEngine::new(endgame(), settings(5));
    assert!(first.run_to_completion().unwrap());
    assert!(second.run_to_completion().unwrap());
    assert_eq!(first.history(), second.history());
    assert_eq!(first.game().turn_count(), second.game().turn_count());
}

#[test]
fn thread_count_does_not_change_the_choice() {
    let inline = SearchEngine::new(endgame(), settings(9));
    let mut pooled_settings = settings(9);
    pooled_settings.threads = 3;
    let pooled = SearchEngine::new(endgame(), pooled_settings);
    assert_eq!(
        inline.evaluate(2).unwrap(),
        pooled.evaluate_parallel(3, 2).unwrap()
    );
}

#[test]
fn every_candidate_is_legal() {
    let engine = SearchEngine::new(endgame(), settings(1));
    let game = engine.game();
    let space = engine.action_space();
    assert!(!space.is_empty());
    for action in space.actions() {
        assert_eq!(action.research, Some(TechField::Physics));
        for (colony, labor) in game.colonies().iter().zip(&action.labor) {
            assert_eq!(labor.total(), colony.current_population());
        }
        assert!(!action.build.targets.contains(&Building::Housing));
        let spent: i64 = action
            .build
            .purchases
            .iter()
            .map(|index| {
                let colony = &game.colonies()[*index];
                game.production_cost(colony, action.build.targets[*index])
                    .unwrap()
            })
            .sum();
        assert!(spent <= game.reserve);
    }
}

#[test]
fn finished_game_has_the_last_building() {
    let mut engine = SearchEngine::new(endgame(), settings(3));
    assert!(engine.run_to_completion().unwrap());
    let colony = &engine.game().colonies()[0];
    assert!(colony.has(Building::GravityGenerator));
    assert!(engine.game().available_fields().is_empty());
    let last = engine.history().last().unwrap();
    assert_eq!(last.turn + 1, engine.game().turn_count());
}
