//! Empire-level state and the per-turn orchestration across colonies.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::colony::{Colony, ColonyContext};
use crate::data::{Achievement, Building, GameData, ResearchLevel, TechField};
use crate::error::{DataError, GameError};

pub const DEFAULT_RESERVE: i64 = 200;
pub const DEFAULT_FREIGHTERS: u32 = 10;
/// Freighters tied up by each fleet moving colonists.
const FREIGHTERS_PER_TRANSPORT: i64 = 5;

/// Build targets every empire starts with.
const DEFAULT_TARGETS: [Building; 4] = [
    Building::Housing,
    Building::TradeGoods,
    Building::FreighterFleet,
    Building::StoreProduction,
];

/// Queue targets left over once a colony has nothing useful to build.
pub const NO_OP_TARGETS: [Building; 6] = [
    Building::TradeGoods,
    Building::Housing,
    Building::FreighterFleet,
    Building::PollutionProcessor,
    Building::AtmosphereRenewer,
    Building::StoreProduction,
];

/// What happened during a turn, for callers that cache derived data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnEvents {
    /// (colony index, finished target)
    pub completed: Vec<(usize, Building)>,
    pub research_completed: Option<ResearchLevel>,
    /// (colony index, liquidated building)
    pub sold: Vec<(usize, Building)>,
    pub population_changed: bool,
}

#[derive(Debug, Clone)]
pub struct Game {
    data: Arc<GameData>,
    colonies: Vec<Colony>,
    pub reserve: i64,
    stored_rp: i64,
    cumulative_rp: i64,
    unlocked: BTreeSet<Building>,
    achievements: BTreeSet<Achievement>,
    research_queue: Option<ResearchLevel>,
    tech_positions: BTreeMap<TechField, usize>,
    available_fields: Vec<TechField>,
    total_freighters: u32,
    food_freighters: u32,
    /// Fleets currently carrying colonists. Colonisation is not modelled,
    /// so this only ever changes through [`Game::set_fleets_in_transport`].
    fleets_in_transport: u32,
    turn_count: u32,
}

impl Game {
    /// Creates a game and fast-forwards the starting research positions.
    pub fn new(
        data: Arc<GameData>,
        colonies: Vec<Colony>,
        starting_tech: &[(TechField, usize)],
    ) -> Result<Self, DataError> {
        let tech_positions: BTreeMap<TechField, usize> =
            data.tech_tree.fields().map(|field| (field, 0)).collect();
        let available_fields = data.tech_tree.fields().collect();
        let mut game = Self {
            data,
            colonies,
            reserve: DEFAULT_RESERVE,
            stored_rp: 0,
            cumulative_rp: 0,
            unlocked: DEFAULT_TARGETS.into_iter().collect(),
            achievements: BTreeSet::new(),
            research_queue: None,
            tech_positions,
            available_fields,
            total_freighters: DEFAULT_FREIGHTERS,
            food_freighters: 0,
            fleets_in_transport: 0,
            turn_count: 0,
        };

        for &(field, position) in starting_tech {
            let levels = game.data.tech_tree.levels(field);
            if position > levels.len() || !game.tech_positions.contains_key(&field) {
                return Err(DataError::TechPositionOutOfRange {
                    field: field.to_string(),
                    requested: position,
                    available: levels.len(),
                });
            }
            for level in &levels[..position] {
                game.apply_research(level);
            }
            game.tech_positions.insert(field, position);
            if position == levels.len() {
                game.available_fields.retain(|available| *available != field);
            }
        }
        Ok(game)
    }

    pub fn with_reserve(mut self, reserve: i64) -> Self {
        self.reserve = reserve;
        self
    }

    pub fn with_stored_rp(mut self, stored_rp: i64) -> Self {
        self.stored_rp = stored_rp;
        self
    }

    pub fn with_freighters(mut self, total: u32) -> Self {
        self.total_freighters = total;
        self
    }

    pub fn data(&self) -> &Arc<GameData> {
        &self.data
    }

    pub fn context(&self) -> ColonyContext<'_> {
        ColonyContext::new(&self.data.buildings, &self.achievements)
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn colony_mut(&mut self, index: usize) -> Option<&mut Colony> {
        self.colonies.get_mut(index)
    }

    pub fn unlocked_buildings(&self) -> &BTreeSet<Building> {
        &self.unlocked
    }

    pub fn achievements(&self) -> &BTreeSet<Achievement> {
        &self.achievements
    }

    pub fn research_queue(&self) -> Option<&ResearchLevel> {
        self.research_queue.as_ref()
    }

    pub fn available_fields(&self) -> &[TechField] {
        &self.available_fields
    }

    pub fn tech_position(&self, field: TechField) -> usize {
        self.tech_positions.get(&field).copied().unwrap_or(0)
    }

    pub fn stored_rp(&self) -> i64 {
        self.stored_rp
    }

    pub fn cumulative_rp(&self) -> i64 {
        self.cumulative_rp
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn total_freighters(&self) -> u32 {
        self.total_freighters
    }

    pub fn food_freighters(&self) -> u32 {
        self.food_freighters
    }

    pub fn fleets_in_transport(&self) -> u32 {
        self.fleets_in_transport
    }

    pub fn set_fleets_in_transport(&mut self, fleets: u32) {
        self.fleets_in_transport = fleets;
    }

    pub fn available_freighters(&self) -> i64 {
        i64::from(self.total_freighters)
            - FREIGHTERS_PER_TRANSPORT * i64::from(self.fleets_in_transport)
            - i64::from(self.food_freighters)
    }

    pub fn government_bonus(&self) -> f64 {
        self.context().government_bonus()
    }

    /// Net food across all colonies, ignoring shipments.
    pub fn food(&self) -> i64 {
        let ctx = self.context();
        self.colonies.iter().map(|colony| colony.food(&ctx)).sum()
    }

    /// Freighters needed to cover every colony's deficit.
    pub fn freighters_needed(&self) -> i64 {
        let ctx = self.context();
        freighters_for_deficits(self.colonies.iter().map(|colony| colony.food(&ctx)))
    }

    pub fn population(&self) -> u32 {
        self.colonies
            .iter()
            .map(|colony| colony.current_population())
            .sum()
    }

    pub fn rp(&self) -> i64 {
        let ctx = self.context();
        self.colonies.iter().map(|colony| colony.rp(&ctx)).sum()
    }

    /// Empire income: colony income, surplus food sold, freighter upkeep.
    pub fn income(&self) -> i64 {
        let ctx = self.context();
        let colonies: i64 = self.colonies.iter().map(|colony| colony.bc(&ctx)).sum();
        let food = self.food();
        let food_sales = if food > 0 { food / 2 } else { 0 };
        colonies + food_sales
            - i64::from(self.food_freighters) / 2
            - (2.5 * f64::from(self.fleets_in_transport)) as i64
    }

    /// Price in bc to finish the colony's current `building` immediately.
    ///
    /// The price depends on how much of the full cost is already stored:
    /// nothing stored costs 4x, 10% stored 3x, half stored 1x, with linear
    /// discounts in between. `None` for targets that never finish.
    pub fn production_cost(&self, colony: &Colony, building: Building) -> Option<i64> {
        let full = i64::from(colony.target_cost(&self.data.buildings, building)?);
        let stored = i64::from(colony.stored_production);
        let cost = if stored >= full {
            0
        } else if stored == 0 {
            4 * full
        } else if 10 * stored < full {
            4 * full - 10 * stored
        } else if 10 * stored == full {
            3 * full
        } else if 2 * stored < full {
            (7 * full - 10 * stored) / 2
        } else if 2 * stored == full {
            full
        } else {
            2 * full - 2 * stored
        };
        Some(cost)
    }

    /// Pays for the rest of the colony's queued target out of the reserve.
    pub fn buy_production(&mut self, index: usize) {
        let Some(colony) = self.colonies.get(index) else {
            return;
        };
        let Some(target) = colony.build_queue else {
            return;
        };
        let Some(full) = colony.target_cost(&self.data.buildings, target) else {
            return;
        };
        if colony.stored_production >= full {
            return;
        }
        let price = self.production_cost(colony, target).unwrap_or(0);
        self.reserve -= price;
        self.colonies[index].stored_production = full;
        trace!(colony = index, %target, price, "bought production");
    }

    /// Queues the next level of `field` if nothing is being researched.
    pub fn start_research(&mut self, field: TechField) -> bool {
        if self.research_queue.is_some() || !self.available_fields.contains(&field) {
            return false;
        }
        let position = self.tech_position(field);
        match self.data.tech_tree.level(field, position) {
            Some(level) => {
                self.research_queue = Some(*level);
                true
            }
            None => false,
        }
    }

    /// Ships surplus food one unit at a time to colonies in deficit,
    /// cycling through colonies in order while freighters last.
    pub fn distribute_food(&mut self) {
        self.food_freighters = 0;
        for colony in &mut self.colonies {
            colony.imported_food = 0;
        }

        let ctx = ColonyContext::new(&self.data.buildings, &self.achievements);
        let foods: Vec<i64> = self.colonies.iter().map(|colony| colony.food(&ctx)).collect();
        let mut deficit: i64 = foods.iter().filter(|food| **food < 0).sum();
        let mut surplus: i64 = foods.iter().filter(|food| **food > 0).sum();

        let count = self.colonies.len();
        let mut index = 0;
        while surplus > 0 && deficit < 0 && self.available_freighters() > 0 {
            let slot = index % count;
            let colony = &mut self.colonies[slot];
            if foods[slot] + colony.imported_food < 0 {
                colony.imported_food += 1;
                surplus -= 1;
                deficit += 1;
                self.food_freighters += 1;
            }
            index += 1;
        }
    }

    fn needs_food_shipments(&self) -> bool {
        let ctx = self.context();
        let starving = self
            .colonies
            .iter()
            .any(|colony| colony.food(&ctx) + colony.imported_food < 0);
        starving && self.colonies.iter().any(|colony| colony.food(&ctx) > 0)
    }

    fn apply_research(&mut self, level: &ResearchLevel) {
        self.achievements.extend(level.achievements.iter().copied());
        self.unlocked.extend(level.buildings.iter().copied());
    }

    /// Advances the whole empire by one turn.
    pub fn turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TurnEvents, GameError> {
        let mut events = TurnEvents::default();

        let rp = self.rp();
        self.stored_rp += rp;
        self.cumulative_rp += rp;
        self.reserve += self.income();

        if self.needs_food_shipments() {
            self.distribute_food();
        }

        let ctx = ColonyContext::new(&self.data.buildings, &self.achievements);
        for (index, colony) in self.colonies.iter_mut().enumerate() {
            let outcome = colony.turn(&ctx);
            if outcome.previous_population != colony.current_population() {
                events.population_changed = true;
            }
            if let Some(building) = outcome.completed {
                events.completed.push((index, building));
            }
            self.total_freighters += outcome.freighters_built;
        }

        if let Some(level) = self.research_queue {
            let cost = level.completion_cost();
            if self.stored_rp >= cost {
                self.apply_research(&level);
                self.stored_rp -= cost;
                let position = self.tech_positions.entry(level.field).or_insert(0);
                *position += 1;
                if *position >= self.data.tech_tree.levels(level.field).len() {
                    self.available_fields.retain(|field| *field != level.field);
                }
                self.research_queue = None;
                events.research_completed = Some(level);
                debug!(research = %level.label(), "research completed");
            }
        }

        if self.reserve < 0 {
            events.sold = self.sell_buildings(rng)?;
        }

        self.turn_count += 1;
        trace!(
            turn = self.turn_count,
            reserve = self.reserve,
            stored_rp = self.stored_rp,
            "turn played"
        );
        Ok(events)
    }

    /// Sells random buildings for half their cost until the reserve
    /// is no longer negative.
    fn sell_buildings<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<(usize, Building)>, GameError> {
        let mut sold = Vec::new();
        while self.reserve < 0 {
            let candidates: Vec<usize> = self
                .colonies
                .iter()
                .enumerate()
                .filter(|(_, colony)| colony.buildings().any(Building::is_sellable))
                .map(|(index, _)| index)
                .collect();
            let Some(&index) = candidates.choose(rng) else {
                return Err(GameError::Bankrupt {
                    reserve: self.reserve,
                });
            };

            let colony = &mut self.colonies[index];
            let sellable: Vec<Building> = colony.buildings().filter(|b| b.is_sellable()).collect();
            let Some(&building) = sellable.choose(rng) else {
                continue;
            };
            let price = i64::from(self.data.buildings.cost(building).unwrap_or(0) / 2);
            colony.demolish(building);
            self.reserve += price;
            debug!(colony = %colony.name, %building, price, "sold building to cover debt");
            sold.push((index, building));
        }
        Ok(sold)
    }

    /// True once research is exhausted and every colony is a fully grown
    /// gaia world with nothing but no-op targets left to build.
    pub fn is_finished(&self) -> bool {
        if !self.available_fields.is_empty() {
            return false;
        }
        let ctx = self.context();
        self.colonies.iter().all(|colony| {
            colony.climate() == crate::data::Climate::Gaia
                && colony.current_population() >= colony.max_population(&ctx)
                && colony
                    .available_buildings(&self.unlocked)
                    .iter()
                    .all(|building| NO_OP_TARGETS.contains(building))
        })
    }
}

/// One freighter per unit of food missing across the given balances.
pub fn freighters_for_deficits(foods: impl IntoIterator<Item = i64>) -> i64 {
    foods.into_iter().map(|food| (-food).max(0)).sum()
}
