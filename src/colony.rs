//! A single colony's economy: labor, buildings, build queue and growth.
//!
//! Derived quantities (food, production, research, income, growth) are pure
//! functions of the colony plus the empire-wide unlocks passed in through a
//! [`ColonyContext`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{Achievement, Building, BuildingTable, Climate, Planet};
use crate::error::GameError;
use crate::math::round_half_up;

/// Research points produced per scientist before bonuses.
const RP_PER_SCIENTIST: f64 = 5.0;
/// Taxes collected per colonist.
const BC_PER_COLONIST: i64 = 1;
const GROWTH_FACTOR: f64 = 2000.0;
const HOUSING_FACTOR: f64 = 40.0;
/// Extra production needed for each successive round of terraforming.
pub const TERRAFORM_SURCHARGE: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Job {
    Farmer,
    Worker,
    Scientist,
}

impl Job {
    /// Order in which colonists are removed when population shrinks.
    pub const ALL: [Job; 3] = [Job::Farmer, Job::Worker, Job::Scientist];
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Job::Farmer => "farmer",
            Job::Worker => "worker",
            Job::Scientist => "scientist",
        })
    }
}

/// Empire-wide state that colony formulas read.
#[derive(Debug, Clone, Copy)]
pub struct ColonyContext<'a> {
    pub buildings: &'a BuildingTable,
    pub achievements: &'a BTreeSet<Achievement>,
}

impl<'a> ColonyContext<'a> {
    pub fn new(buildings: &'a BuildingTable, achievements: &'a BTreeSet<Achievement>) -> Self {
        Self {
            buildings,
            achievements,
        }
    }

    pub fn has(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    pub fn government_bonus(&self) -> f64 {
        if self.has(Achievement::Federation) {
            0.75
        } else {
            0.5
        }
    }
}

/// Production split into the parts the reports show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionBreakdown {
    /// Worker output plus robotic factory, rounded. Subject to pollution.
    pub polluting: i64,
    pub pollution_penalty: i64,
    /// Flat bonuses from buildings that do not pollute.
    pub clean: i64,
}

impl ProductionBreakdown {
    pub fn net(&self) -> i64 {
        self.polluting - self.pollution_penalty + self.clean
    }
}

/// Things a colony turn did that the game has to react to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColonyTurn {
    pub previous_population: u32,
    pub completed: Option<Building>,
    pub freighters_built: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub name: String,
    planet: Planet,
    farmers: u32,
    workers: u32,
    scientists: u32,
    /// Population in thousandths.
    raw_population: i64,
    buildings: BTreeSet<Building>,
    climate: Climate,
    terraform_count: u32,
    pub build_queue: Option<Building>,
    pub stored_production: u32,
    /// Food shipped in by freighters this turn.
    pub imported_food: i64,
}

impl Colony {
    pub fn new(
        name: impl Into<String>,
        planet: Planet,
        farmers: u32,
        workers: u32,
        scientists: u32,
        initial_buildings: &[Building],
        build_queue: Option<Building>,
    ) -> Self {
        let population = farmers + workers + scientists;
        let mut buildings: BTreeSet<Building> = initial_buildings.iter().copied().collect();
        match planet.climate {
            Climate::Terran => {
                buildings.insert(Building::Terraforming);
            }
            Climate::Gaia => {
                buildings.insert(Building::Terraforming);
                buildings.insert(Building::GaiaTransformation);
            }
            _ => {}
        }
        Self {
            name: name.into(),
            planet,
            farmers,
            workers,
            scientists,
            raw_population: i64::from(population) * 1000,
            buildings,
            climate: planet.climate,
            terraform_count: 0,
            build_queue,
            stored_production: 0,
            imported_food: 0,
        }
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn climate(&self) -> Climate {
        self.climate
    }

    pub fn terraform_count(&self) -> u32 {
        self.terraform_count
    }

    pub fn raw_population(&self) -> i64 {
        self.raw_population
    }

    pub fn current_population(&self) -> u32 {
        (self.raw_population / 1000) as u32
    }

    pub fn has(&self, building: Building) -> bool {
        self.buildings.contains(&building)
    }

    pub fn buildings(&self) -> impl Iterator<Item = Building> + '_ {
        self.buildings.iter().copied()
    }

    /// Removes a building, returning whether it was present.
    pub fn demolish(&mut self, building: Building) -> bool {
        self.buildings.remove(&building)
    }

    pub fn colonists(&self, job: Job) -> u32 {
        match job {
            Job::Farmer => self.farmers,
            Job::Worker => self.workers,
            Job::Scientist => self.scientists,
        }
    }

    fn colonists_mut(&mut self, job: Job) -> &mut u32 {
        match job {
            Job::Farmer => &mut self.farmers,
            Job::Worker => &mut self.workers,
            Job::Scientist => &mut self.scientists,
        }
    }

    pub fn assigned(&self) -> u32 {
        self.farmers + self.workers + self.scientists
    }

    pub fn unassigned(&self) -> u32 {
        self.current_population().saturating_sub(self.assigned())
    }

    /// Moves colonists into or out of a job, limited to the free colonists.
    pub fn set_colonists(&mut self, job: Job, count: u32) -> Result<(), GameError> {
        let available = self.colonists(job) + self.unassigned();
        if count > available {
            return Err(GameError::InvalidLabor {
                colony: self.name.clone(),
                job,
                requested: count,
                available,
            });
        }
        *self.colonists_mut(job) = count;
        Ok(())
    }

    /// Applies a complete labor distribution produced by the action enumerator.
    pub fn assign(&mut self, farmers: u32, workers: u32, scientists: u32) {
        debug_assert!(
            farmers + workers + scientists <= self.current_population(),
            "distribution exceeds population of {}",
            self.name
        );
        self.farmers = farmers;
        self.workers = workers;
        self.scientists = scientists;
    }

    /// Unlocked buildings this colony has not built yet.
    pub fn available_buildings(&self, unlocked: &BTreeSet<Building>) -> Vec<Building> {
        unlocked
            .iter()
            .copied()
            .filter(|building| !self.has(*building))
            .filter(|building| {
                *building != Building::Terraforming || self.climate.terraformed().is_some()
            })
            .collect()
    }

    /// Production needed to finish `building` here, including the
    /// terraforming surcharge.
    pub fn target_cost(&self, table: &BuildingTable, building: Building) -> Option<u32> {
        let cost = table.cost(building)?;
        if building == Building::Terraforming {
            Some(cost + TERRAFORM_SURCHARGE * self.terraform_count)
        } else {
            Some(cost)
        }
    }

    pub fn max_population(&self, ctx: &ColonyContext<'_>) -> u32 {
        let base = round_half_up(
            self.climate.population_multiplier() * f64::from(self.planet.size.size_class()) * 5.0,
        );
        let biospheres = if self.has(Building::Biospheres) { 2 } else { 0 };
        let planning = if ctx.has(Achievement::AdvancedCityPlanning) {
            5
        } else {
            0
        };
        (base + biospheres + planning).max(1) as u32
    }

    pub fn morale_multiplier(&self, ctx: &ColonyContext<'_>) -> f64 {
        let mut morale = 0.0;
        if self.has(Building::HoloSimulator) {
            morale += 0.2;
        }
        if self.has(Building::PleasureDome) {
            morale += 0.3;
        }
        if ctx.has(Achievement::RealityNetwork) {
            morale += 0.2;
        }
        morale
    }

    pub fn gravity_multiplier(&self) -> f64 {
        if self.has(Building::GravityGenerator) {
            0.0
        } else {
            self.planet.gravity.penalty()
        }
    }

    pub fn pollution_tolerance(&self, ctx: &ColonyContext<'_>) -> i64 {
        let per_class = if ctx.has(Achievement::NanoDisassemblers) {
            4
        } else {
            2
        };
        i64::from(self.planet.size.size_class()) * per_class
    }

    /// Net food after feeding the colony's own population. May be negative.
    pub fn food(&self, ctx: &ColonyContext<'_>) -> i64 {
        let farmers = f64::from(self.farmers);
        let mut output = farmers * f64::from(self.climate.farming_multiplier());
        if self.has(Building::SoilEnrichment) {
            output += farmers;
        }
        if ctx.has(Achievement::BiomorphicFungi) {
            output += farmers;
        }
        if self.has(Building::WeatherController) {
            output += 2.0 * farmers;
        }
        if self.has(Building::AstroUniversity) {
            output += farmers;
        }

        output += output * (self.morale_multiplier(ctx) - self.gravity_multiplier());

        if self.has(Building::HydroponicFarm) {
            output += 2.0;
        }
        if self.has(Building::SubterraneanFarms) {
            output += 4.0;
        }

        round_half_up(output) - i64::from(self.current_population())
    }

    pub fn production_breakdown(&self, ctx: &ColonyContext<'_>) -> ProductionBreakdown {
        let workers = f64::from(self.workers);
        let mut output = workers * f64::from(self.planet.minerals.production_multiplier());
        let mut clean = 0;

        if self.has(Building::AstroUniversity) {
            output += workers;
        }
        if ctx.has(Achievement::MicroliteConstruction) {
            output += workers;
        }
        if self.has(Building::AutomatedFactory) {
            output += workers;
            clean += 5;
        }
        if self.has(Building::RoboMinerPlant) {
            output += 2.0 * workers;
            clean += 10;
        }
        if self.has(Building::DeepCoreMine) {
            output += 3.0 * workers;
            clean += 15;
        }

        output += output * (self.morale_multiplier(ctx) - self.gravity_multiplier());

        if self.has(Building::RoboticFactory) {
            output += f64::from(self.planet.minerals.robotic_factory_bonus());
        }
        let polluting = round_half_up(output);

        let pollution_penalty = if self.has(Building::CoreWasteDump) {
            0
        } else {
            let mut reduction = 1.0;
            if self.has(Building::PollutionProcessor) {
                reduction *= 0.5;
            }
            if self.has(Building::AtmosphereRenewer) {
                reduction *= 0.25;
            }
            let excess = polluting as f64 * reduction - self.pollution_tolerance(ctx) as f64;
            (excess.max(0.0) / 2.0).ceil() as i64
        };

        if self.has(Building::Recyclotron) {
            clean += i64::from(self.current_population());
        }

        ProductionBreakdown {
            polluting,
            pollution_penalty,
            clean,
        }
    }

    pub fn production(&self, ctx: &ColonyContext<'_>) -> i64 {
        self.production_breakdown(ctx).net()
    }

    pub fn pollution_penalty(&self, ctx: &ColonyContext<'_>) -> i64 {
        self.production_breakdown(ctx).pollution_penalty
    }

    /// Research points produced this turn.
    pub fn rp(&self, ctx: &ColonyContext<'_>) -> i64 {
        let scientists = f64::from(self.scientists);
        let mut from_scientists = scientists * RP_PER_SCIENTIST;
        let mut from_buildings = 0.0;

        if self.has(Building::AstroUniversity) {
            from_scientists += scientists;
        }
        if ctx.has(Achievement::HeightenedIntelligence) {
            from_scientists += scientists;
        }
        if self.has(Building::ResearchLab) {
            from_scientists += scientists;
            from_buildings += 5.0;
        }
        if self.has(Building::Supercomputer) {
            from_scientists += 2.0 * scientists;
            from_buildings += 10.0;
        }
        if self.has(Building::Autolab) {
            from_buildings += 30.0;
        }
        if self.has(Building::GalacticCybernet) {
            from_scientists += 3.0 * scientists;
            from_buildings += 15.0;
        }

        from_scientists += from_scientists
            * (self.morale_multiplier(ctx) + ctx.government_bonus() - self.gravity_multiplier());

        round_half_up(from_scientists + from_buildings)
    }

    /// Sum of upkeep over every building standing in the colony.
    pub fn maintenance(&self, table: &BuildingTable) -> i64 {
        self.buildings
            .iter()
            .map(|building| i64::from(table.maintenance(*building)))
            .sum()
    }

    /// Net income in bc after maintenance and the climate penalty.
    pub fn bc(&self, ctx: &ColonyContext<'_>) -> i64 {
        let taxes = BC_PER_COLONIST * i64::from(self.current_population());
        let half_taxes = (taxes as f64 * 0.5) as i64;

        let mut income = taxes;
        income += round_half_up(taxes as f64 * self.morale_multiplier(ctx));
        if self.has(Building::Spaceport) {
            income += half_taxes;
        }
        if self.has(Building::StockExchange) {
            income += taxes;
        }
        if ctx.has(Achievement::CurrencyExchange) {
            income += half_taxes;
        }
        income += (taxes as f64 * ctx.government_bonus()) as i64;
        if self.build_queue == Some(Building::TradeGoods) {
            income += (0.5 * self.production(ctx) as f64).ceil() as i64;
        }

        let maintenance = self.maintenance(ctx.buildings);
        let climate_cost =
            round_half_up(maintenance as f64 * self.climate.maintenance_penalty());

        income - maintenance - climate_cost
    }

    /// Change in raw population expected this turn.
    pub fn population_increment(&self, ctx: &ColonyContext<'_>) -> i64 {
        let current = self.current_population();
        if current == 0 {
            return 0;
        }
        let current_f = f64::from(current);
        let max = f64::from(self.max_population(ctx));

        let headroom = (max - current_f).max(0.0);
        let base = (GROWTH_FACTOR * current_f * headroom / max).sqrt().floor();

        let housing = if self.build_queue == Some(Building::Housing) {
            (HOUSING_FACTOR * self.production(ctx) as f64 / current_f).floor()
        } else {
            0.0
        };

        let tech = if ctx.has(Achievement::UniversalAntidote) {
            50.0
        } else if ctx.has(Achievement::Microbiotics) {
            25.0
        } else {
            0.0
        };

        let cloning = if self.has(Building::CloningCenter) {
            100
        } else {
            0
        };

        let starvation = 50 * (self.food(ctx) + self.imported_food).min(0);

        (base * ((100.0 + tech + housing) / 100.0)).floor() as i64 + cloning + starvation
    }

    /// Advances population and the build queue by one turn.
    pub fn turn(&mut self, ctx: &ColonyContext<'_>) -> ColonyTurn {
        let previous_population = self.current_population();
        let mut outcome = ColonyTurn {
            previous_population,
            ..ColonyTurn::default()
        };

        self.grow(ctx);

        if matches!(
            self.build_queue,
            Some(Building::Housing) | Some(Building::TradeGoods)
        ) {
            return outcome;
        }

        let production = self.production(ctx).max(0) as u32;
        self.stored_production += production;

        let Some(target) = self.build_queue else {
            return outcome;
        };
        let Some(cost) = self.target_cost(ctx.buildings, target) else {
            return outcome;
        };
        if self.stored_production < cost {
            return outcome;
        }

        self.stored_production -= cost;
        self.build_queue = None;
        outcome.completed = Some(target);

        match target {
            Building::Terraforming => {
                self.terraform_count += 1;
                if let Some(next) = self.climate.terraformed() {
                    self.climate = next;
                }
                if self.climate == Climate::Terran {
                    self.buildings.insert(Building::Terraforming);
                }
            }
            Building::FreighterFleet => {
                outcome.freighters_built += 1;
            }
            other => {
                self.buildings.insert(other);
                if other == Building::RadiationShield && self.climate == Climate::Radiated {
                    self.climate = Climate::Barren;
                }
                if other == Building::GaiaTransformation {
                    self.climate = Climate::Gaia;
                }
            }
        }
        outcome
    }

    fn grow(&mut self, ctx: &ColonyContext<'_>) {
        let current = self.current_population();
        let max = self.max_population(ctx);
        let increment = self.population_increment(ctx);
        if current > max || (current == max && increment >= 0) {
            return;
        }

        let mut raw = self.raw_population + increment;
        if increment > 0 {
            raw = raw.min(i64::from(max) * 1000);
        }
        self.raw_population = raw.max(0);

        let updated = self.current_population();
        if updated < current {
            self.shed_colonists(current - updated);
        }
    }

    /// Removes colonists in farmer, worker, scientist order.
    fn shed_colonists(&mut self, mut deficit: u32) {
        for job in Job::ALL {
            if deficit == 0 {
                break;
            }
            let count = self.colonists_mut(job);
            let removed = (*count).min(deficit);
            *count -= removed;
            deficit -= removed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Gravity, MineralRichness, PlanetSize};

    fn with_ctx<T>(achievements: &[Achievement], f: impl FnOnce(&ColonyContext<'_>) -> T) -> T {
        let table = BuildingTable::standard();
        let achievements: BTreeSet<Achievement> = achievements.iter().copied().collect();
        f(&ColonyContext::new(&table, &achievements))
    }

    fn planet(size: PlanetSize, minerals: MineralRichness, climate: Climate) -> Planet {
        Planet::new(size, minerals, Gravity::Normal, climate)
    }

    fn terran_colony(buildings: &[Building]) -> Colony {
        Colony::new(
            "Sol",
            planet(PlanetSize::Huge, MineralRichness::Abundant, Climate::Terran),
            2,
            2,
            2,
            buildings,
            Some(Building::TradeGoods),
        )
    }

    #[test]
    fn terrain_marks_terraforming_complete() {
        let terran = terran_colony(&[]);
        assert!(terran.has(Building::Terraforming));
        assert!(!terran.has(Building::GaiaTransformation));

        let gaia = Colony::new(
            "Eden",
            planet(PlanetSize::Small, MineralRichness::Poor, Climate::Gaia),
            1,
            0,
            0,
            &[],
            None,
        );
        assert!(gaia.has(Building::Terraforming));
        assert!(gaia.has(Building::GaiaTransformation));
    }

    #[test]
    fn max_population_counts_biospheres_and_city_planning() {
        let colony = terran_colony(&[Building::Biospheres]);
        with_ctx(&[], |ctx| assert_eq!(colony.max_population(ctx), 22));
        with_ctx(&[Achievement::AdvancedCityPlanning], |ctx| {
            assert_eq!(colony.max_population(ctx), 27)
        });
    }

    #[test]
    fn starting_colony_economy() {
        let colony = terran_colony(&[
            Building::AutomatedFactory,
            Building::HydroponicFarm,
            Building::Biospheres,
            Building::ResearchLab,
        ]);
        with_ctx(&[], |ctx| {
            // 2 farmers * 2 + hydroponics 2 - 6 colonists
            assert_eq!(colony.food(ctx), 0);
            // 2 workers * (3 + 1) + automated factory 5
            assert_eq!(colony.production(ctx), 13);
            // (2 * 5 + 2) * 1.5 + research lab 5
            assert_eq!(colony.rp(ctx), 23);
            // 6 taxes + 3 government + ceil(13 / 2) trade goods - 5 maintenance
            assert_eq!(colony.bc(ctx), 11);
        });
    }

    #[test]
    fn gravity_and_morale_scale_food() {
        let mut colony = Colony::new(
            "Heavy",
            Planet::new(
                PlanetSize::Large,
                MineralRichness::Rich,
                Gravity::Heavy,
                Climate::Terran,
            ),
            4,
            0,
            0,
            &[Building::HoloSimulator],
            None,
        );
        with_ctx(&[], |ctx| {
            // 8 * (1 + 0.2 - 0.5) = 5.6 -> 6, minus 4 colonists
            assert_eq!(colony.food(ctx), 2);
        });
        colony.buildings.insert(Building::GravityGenerator);
        with_ctx(&[], |ctx| {
            // 8 * 1.2 = 9.6 -> 10
            assert_eq!(colony.food(ctx), 6);
        });
    }

    #[test]
    fn pollution_penalty_and_cleanup_buildings() {
        let mut colony = Colony::new(
            "Forge",
            planet(PlanetSize::Tiny, MineralRichness::UltraRich, Climate::Barren),
            0,
            3,
            0,
            &[],
            None,
        );
        with_ctx(&[], |ctx| {
            // 24 polluting, tolerance 2 -> ceil(22 / 2)
            let breakdown = colony.production_breakdown(ctx);
            assert_eq!(breakdown.polluting, 24);
            assert_eq!(breakdown.pollution_penalty, 11);
            assert_eq!(colony.production(ctx), 13);
        });
        with_ctx(&[Achievement::NanoDisassemblers], |ctx| {
            assert_eq!(colony.pollution_penalty(ctx), 10);
        });
        colony.buildings.insert(Building::PollutionProcessor);
        colony.buildings.insert(Building::AtmosphereRenewer);
        with_ctx(&[], |ctx| {
            // 24 * 0.125 = 3 -> ceil(1 / 2)
            assert_eq!(colony.pollution_penalty(ctx), 1);
        });
        colony.buildings.insert(Building::CoreWasteDump);
        with_ctx(&[], |ctx| assert_eq!(colony.pollution_penalty(ctx), 0));
    }

    #[test]
    fn derived_values_are_pure() {
        let colony = terran_colony(&[Building::RoboticFactory, Building::Recyclotron]);
        with_ctx(&[Achievement::RealityNetwork], |ctx| {
            let first = (
                colony.food(ctx),
                colony.production_breakdown(ctx),
                colony.rp(ctx),
                colony.bc(ctx),
            );
            let second = (
                colony.food(ctx),
                colony.production_breakdown(ctx),
                colony.rp(ctx),
                colony.bc(ctx),
            );
            assert_eq!(first, second);
        });
    }

    #[test]
    fn climate_penalty_is_charged_on_maintenance() {
        let colony = Colony::new(
            "Acid",
            planet(PlanetSize::Medium, MineralRichness::Poor, Climate::Toxic),
            0,
            2,
            0,
            &[Building::AstroUniversity, Building::RoboMinerPlant],
            None,
        );
        with_ctx(&[], |ctx| {
            // taxes 2 + government 1 - maintenance 6 - climate 3
            assert_eq!(colony.bc(ctx), -6);
        });
    }

    #[test]
    fn terraforming_completes_and_clears_queue() {
        let mut colony = Colony::new(
            "Marsh",
            planet(PlanetSize::Huge, MineralRichness::UltraPoor, Climate::Swamp),
            2,
            1,
            0,
            &[],
            Some(Building::Terraforming),
        );
        colony.stored_production = 249;
        with_ctx(&[], |ctx| {
            assert_eq!(colony.production(ctx), 1);
            let outcome = colony.turn(ctx);
            assert_eq!(outcome.completed, Some(Building::Terraforming));
        });
        assert_eq!(colony.stored_production, 0);
        assert_eq!(colony.terraform_count(), 1);
        assert_eq!(colony.climate(), Climate::Terran);
        assert_eq!(colony.build_queue, None);
        assert!(colony.has(Building::Terraforming));
    }

    #[test]
    fn second_terraforming_costs_more() {
        let table = BuildingTable::standard();
        let mut colony = Colony::new(
            "Rock",
            planet(PlanetSize::Small, MineralRichness::Poor, Climate::Barren),
            0,
            1,
            0,
            &[],
            None,
        );
        assert_eq!(colony.target_cost(&table, Building::Terraforming), Some(250));
        colony.terraform_count = 2;
        assert_eq!(colony.target_cost(&table, Building::Terraforming), Some(750));
        assert_eq!(colony.target_cost(&table, Building::Housing), None);
    }

    #[test]
    fn starvation_sheds_farmers_first() {
        let mut colony = Colony::new(
            "Dust",
            planet(PlanetSize::Medium, MineralRichness::Abundant, Climate::Barren),
            1,
            1,
            1,
            &[],
            Some(Building::Housing),
        );
        with_ctx(&[], |ctx| {
            assert_eq!(colony.food(ctx), -3);
            // floor(floor(sqrt(1500)) * 1.4) housing bonus, minus 150 starvation
            assert_eq!(colony.population_increment(ctx), -97);
            colony.turn(ctx);
        });
        assert_eq!(colony.current_population(), 2);
        assert_eq!(colony.colonists(Job::Farmer), 0);
        assert_eq!(colony.colonists(Job::Worker), 1);
        assert_eq!(colony.colonists(Job::Scientist), 1);
    }

    #[test]
    fn empty_colony_does_not_grow() {
        let mut colony = Colony::new(
            "Ghost",
            planet(PlanetSize::Large, MineralRichness::Rich, Climate::Terran),
            0,
            0,
            0,
            &[Building::CloningCenter],
            None,
        );
        with_ctx(&[], |ctx| {
            assert_eq!(colony.population_increment(ctx), 0);
            colony.turn(ctx);
        });
        assert_eq!(colony.raw_population(), 0);
    }

    #[test]
    fn growth_never_overshoots_max_population() {
        let mut colony = terran_colony(&[Building::CloningCenter]);
        colony.raw_population = 19_950;
        colony.assign(19, 0, 0);
        with_ctx(&[Achievement::UniversalAntidote], |ctx| {
            assert_eq!(colony.population_increment(ctx), 164);
            colony.turn(ctx);
            assert_eq!(colony.current_population(), colony.max_population(ctx));
        });
        assert_eq!(colony.raw_population(), 20_000);
    }

    #[test]
    fn over_max_colony_keeps_population_while_starving() {
        let mut colony = Colony::new(
            "Crowded",
            planet(PlanetSize::Huge, MineralRichness::Abundant, Climate::Terran),
            0,
            22,
            0,
            &[],
            None,
        );
        with_ctx(&[], |ctx| {
            assert_eq!(colony.max_population(ctx), 20);
            assert_eq!(colony.food(ctx), -22);
            assert_eq!(colony.population_increment(ctx), -1100);
            colony.turn(ctx);
        });
        assert_eq!(colony.current_population(), 22);
        assert_eq!(colony.colonists(Job::Worker), 22);
    }

    #[test]
    fn full_colony_still_starves() {
        let mut colony = Colony::new(
            "Packed",
            planet(PlanetSize::Huge, MineralRichness::Abundant, Climate::Terran),
            0,
            20,
            0,
            &[],
            None,
        );
        with_ctx(&[], |ctx| {
            assert_eq!(colony.population_increment(ctx), -1000);
            colony.turn(ctx);
        });
        assert_eq!(colony.current_population(), 19);
    }

    #[test]
    fn income_bonuses_stack_on_taxes() {
        let mut colony = terran_colony(&[Building::Spaceport, Building::StockExchange]);
        colony.build_queue = None;
        with_ctx(&[], |ctx| {
            // 6 taxes + 3 spaceport + 6 stock exchange + 3 government - 4 maintenance
            assert_eq!(colony.bc(ctx), 14);
        });
        with_ctx(
            &[Achievement::CurrencyExchange, Achievement::Federation],
            |ctx| {
                // currency exchange adds 3, federation raises government to 4
                assert_eq!(colony.bc(ctx), 18);
            },
        );
    }

    #[test]
    fn freighter_fleet_is_consumed() {
        let mut colony = terran_colony(&[]);
        colony.build_queue = Some(Building::FreighterFleet);
        colony.stored_production = 45;
        let outcome = with_ctx(&[], |ctx| colony.turn(ctx));
        assert_eq!(outcome.freighters_built, 1);
        assert!(!colony.has(Building::FreighterFleet));
        assert_eq!(colony.build_queue, None);
    }

    #[test]
    fn radiation_shield_and_gaia_transformation_change_climate() {
        let mut colony = Colony::new(
            "Glow",
            planet(PlanetSize::Medium, MineralRichness::Rich, Climate::Radiated),
            0,
            2,
            0,
            &[],
            Some(Building::RadiationShield),
        );
        colony.stored_production = 80;
        with_ctx(&[], |ctx| colony.turn(ctx));
        assert_eq!(colony.climate(), Climate::Barren);
        assert!(colony.has(Building::RadiationShield));

        colony.build_queue = Some(Building::GaiaTransformation);
        colony.stored_production = 500;
        with_ctx(&[], |ctx| colony.turn(ctx));
        assert_eq!(colony.climate(), Climate::Gaia);
    }

    #[test]
    fn labor_edits_respect_free_colonists() {
        let mut colony = terran_colony(&[]);
        assert_eq!(colony.unassigned(), 0);
        colony.set_colonists(Job::Worker, 0).unwrap();
        assert_eq!(colony.unassigned(), 2);
        colony.set_colonists(Job::Farmer, 4).unwrap();
        let err = colony.set_colonists(Job::Scientist, 3).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidLabor {
                requested: 3,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn terraforming_hidden_where_climate_cannot_improve() {
        let unlocked: BTreeSet<Building> =
            [Building::Terraforming, Building::Autolab].into_iter().collect();
        let toxic = Colony::new(
            "Vent",
            planet(PlanetSize::Small, MineralRichness::Poor, Climate::Toxic),
            1,
            0,
            0,
            &[],
            None,
        );
        assert_eq!(toxic.available_buildings(&unlocked), vec![Building::Autolab]);
        let tundra = Colony::new(
            "Frost",
            planet(PlanetSize::Small, MineralRichness::Poor, Climate::Tundra),
            1,
            0,
            0,
            &[],
            None,
        );
        assert_eq!(tundra.available_buildings(&unlocked).len(), 2);
    }
}
