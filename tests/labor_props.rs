use moo2_planner::{
    data::{Building, Climate, GameData, Gravity, MineralRichness, Planet, PlanetSize},
    Colony, Game,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn climate() -> impl Strategy<Value = Climate> {
    prop_oneof![
        Just(Climate::Barren),
        Just(Climate::Tundra),
        Just(Climate::Desert),
        Just(Climate::Swamp),
        Just(Climate::Terran),
        Just(Climate::Gaia),
        Just(Climate::Toxic),
    ]
}

proptest! {
    /// Colonists never outnumber the population, whatever the turn does.
    #[test]
    fn prop_labor_never_exceeds_population(
        farmers in 0u32..6,
        workers in 0u32..6,
        scientists in 0u32..6,
        climate in climate(),
        housing in any::<bool>(),
        turns in 1usize..25,
    ) {
        let planet = Planet::new(PlanetSize::Medium, MineralRichness::Abundant, Gravity::Normal, climate);
        let queue = if housing { Some(Building::Housing) } else { None };
        let colony = Colony::new("Prop", planet, farmers, workers, scientists, &[Building::CloningCenter], queue);
        let mut game = Game::new(GameData::standard(), vec![colony], &[]).unwrap().with_reserve(10_000);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..turns {
            game.turn(&mut rng).unwrap();
            let colony = &game.colonies()[0];
            prop_assert!(colony.assigned() <= colony.current_population());
        }
    }
}
