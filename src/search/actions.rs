//! Legal decisions from a game state.
//!
//! An action has three independent axes: build targets with the colonies
//! whose targets get bought outright, a labor distribution per colony, and
//! the research field to start. The space keeps each axis as a list and
//! addresses the cross product by index without materialising it.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::colony::Colony;
use crate::data::{Building, TechField};
use crate::game::{freighters_for_deficits, Game};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Labor {
    pub farmers: u32,
    pub workers: u32,
    pub scientists: u32,
}

impl Labor {
    pub fn new(farmers: u32, workers: u32, scientists: u32) -> Self {
        Self {
            farmers,
            workers,
            scientists,
        }
    }

    pub fn total(&self) -> u32 {
        self.farmers + self.workers + self.scientists
    }
}

/// One build target per colony and the colonies that buy theirs this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildChoice {
    pub targets: Vec<Building>,
    pub purchases: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub build: BuildChoice,
    pub labor: Vec<Labor>,
    pub research: Option<TechField>,
}

impl Action {
    /// Sets labor and queues, pays for purchases and starts research.
    ///
    /// Only actions enumerated from the same game state are valid here.
    pub fn apply(&self, game: &mut Game) {
        for (index, (target, labor)) in self.build.targets.iter().zip(&self.labor).enumerate() {
            if let Some(colony) = game.colony_mut(index) {
                colony.assign(labor.farmers, labor.workers, labor.scientists);
                colony.build_queue = Some(*target);
            }
        }
        for &index in &self.build.purchases {
            game.buy_production(index);
        }
        if let Some(field) = self.research {
            game.start_research(field);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSpace {
    builds: Vec<BuildChoice>,
    distributions: Vec<Vec<Labor>>,
    research: Vec<Option<TechField>>,
}

impl ActionSpace {
    pub fn new(game: &Game) -> Self {
        Self {
            builds: build_choices(game),
            distributions: colonist_distributions(game),
            research: research_choices(game),
        }
    }

    pub fn refresh_builds(&mut self, game: &Game) {
        self.builds = build_choices(game);
    }

    pub fn refresh_distributions(&mut self, game: &Game) {
        self.distributions = colonist_distributions(game);
    }

    pub fn refresh_research(&mut self, game: &Game) {
        self.research = research_choices(game);
    }

    pub fn builds(&self) -> &[BuildChoice] {
        &self.builds
    }

    pub fn distributions(&self) -> &[Vec<Labor>] {
        &self.distributions
    }

    pub fn research(&self) -> &[Option<TechField>] {
        &self.research
    }

    /// Size of the full cross product.
    pub fn len(&self) -> usize {
        self.builds.len() * self.distributions.len() * self.research.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes `index` with research varying fastest, then labor, then builds.
    pub fn action(&self, index: usize) -> Option<Action> {
        if index >= self.len() {
            return None;
        }
        let research = index % self.research.len();
        let rest = index / self.research.len();
        let labor = rest % self.distributions.len();
        let build = rest / self.distributions.len();
        Some(Action {
            build: self.builds[build].clone(),
            labor: self.distributions[labor].clone(),
            research: self.research[research],
        })
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        (0..self.len()).filter_map(|index| self.action(index))
    }

    /// Uniform draw from the cross product.
    pub fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Action> {
        Some(Action {
            build: self.builds.choose(rng)?.clone(),
            labor: self.distributions.choose(rng)?.clone(),
            research: *self.research.choose(rng)?,
        })
    }
}

/// Visits every tuple of digits below `radices`, last position fastest.
fn for_each_tuple(radices: &[usize], mut visit: impl FnMut(&[usize])) {
    if radices.contains(&0) {
        return;
    }
    let mut digits = vec![0; radices.len()];
    loop {
        visit(&digits);
        let mut position = radices.len();
        loop {
            if position == 0 {
                return;
            }
            position -= 1;
            digits[position] += 1;
            if digits[position] < radices[position] {
                break;
            }
            digits[position] = 0;
        }
    }
}

fn cartesian<T: Clone>(axes: &[Vec<T>]) -> Vec<Vec<T>> {
    let radices: Vec<usize> = axes.iter().map(Vec::len).collect();
    let mut tuples = Vec::new();
    for_each_tuple(&radices, |digits| {
        tuples.push(
            digits
                .iter()
                .zip(axes)
                .map(|(digit, axis)| axis[*digit].clone())
                .collect(),
        );
    });
    tuples
}

/// Labor distributions with the tightest food balance.
///
/// Farmer counts are chosen across all colonies so that total food is
/// non-negative and as small as possible, breaking ties on freighters
/// needed. When every choice starves, the least negative balance wins.
/// Workers then step by four with scientists taking the remainder.
pub fn colonist_distributions(game: &Game) -> Vec<Vec<Labor>> {
    let ctx = game.context();
    let populations: Vec<u32> = game
        .colonies()
        .iter()
        .map(Colony::current_population)
        .collect();
    let foods: Vec<Vec<i64>> = game
        .colonies()
        .iter()
        .map(|colony| {
            let mut probe = colony.clone();
            (0..=colony.current_population())
                .map(|farmers| {
                    probe.assign(farmers, 0, 0);
                    probe.food(&ctx)
                })
                .collect()
        })
        .collect();

    let radices: Vec<usize> = foods.iter().map(Vec::len).collect();
    let mut best: Option<(bool, i64, i64)> = None;
    let mut farmer_tuples: Vec<Vec<u32>> = Vec::new();
    for_each_tuple(&radices, |farmers| {
        let total: i64 = farmers
            .iter()
            .zip(&foods)
            .map(|(count, food)| food[*count])
            .sum();
        let needed = freighters_for_deficits(
            farmers.iter().zip(&foods).map(|(count, food)| food[*count]),
        );
        let key = if total >= 0 {
            (false, total, needed)
        } else {
            (true, -total, needed)
        };
        match best {
            Some(current) if key > current => return,
            Some(current) if key == current => {}
            _ => {
                best = Some(key);
                farmer_tuples.clear();
            }
        }
        farmer_tuples.push(farmers.iter().map(|count| *count as u32).collect());
    });

    let mut distributions = Vec::new();
    for farmers in farmer_tuples {
        let per_colony: Vec<Vec<Labor>> = farmers
            .iter()
            .zip(&populations)
            .map(|(&farmers, &population)| {
                let remaining = population - farmers;
                (0..=remaining)
                    .step_by(4)
                    .map(|workers| Labor::new(farmers, workers, remaining - workers))
                    .collect()
            })
            .collect();
        distributions.extend(cartesian(&per_colony));
    }
    distributions
}

/// Targets a colony may queue. A colony busy with a finite target keeps it.
pub fn colony_targets(game: &Game, colony: &Colony) -> Vec<Building> {
    match colony.build_queue {
        Some(queued) if !queued.is_perpetual() => vec![queued],
        _ => {
            let ctx = game.context();
            let mut targets = colony.available_buildings(game.unlocked_buildings());
            if colony.current_population() >= colony.max_population(&ctx) {
                targets.retain(|target| *target != Building::Housing);
            }
            if targets.is_empty() {
                targets.extend(colony.build_queue);
            }
            targets
        }
    }
}

/// Every set of colonies whose chosen targets the reserve can buy together.
pub fn purchase_choices(game: &Game, targets: &[Building]) -> Vec<Vec<usize>> {
    let table = &game.data().buildings;
    let candidates: Vec<(usize, i64)> = game
        .colonies()
        .iter()
        .zip(targets)
        .enumerate()
        .filter_map(|(index, (colony, &target))| {
            let full = colony.target_cost(table, target)?;
            if colony.stored_production >= full {
                return None;
            }
            Some((index, game.production_cost(colony, target)?))
        })
        .collect();

    let mut masks: Vec<u64> = (0..1u64 << candidates.len()).collect();
    masks.sort_by_key(|mask| mask.count_ones());
    masks
        .into_iter()
        .filter_map(|mask| {
            let chosen: Vec<&(usize, i64)> = candidates
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, candidate)| candidate)
                .collect();
            let total: i64 = chosen.iter().map(|(_, price)| price).sum();
            (total <= game.reserve).then(|| chosen.iter().map(|(index, _)| *index).collect())
        })
        .collect()
}

pub fn build_choices(game: &Game) -> Vec<BuildChoice> {
    let per_colony: Vec<Vec<Building>> = game
        .colonies()
        .iter()
        .map(|colony| colony_targets(game, colony))
        .collect();
    let mut choices = Vec::new();
    for targets in cartesian(&per_colony) {
        for purchases in purchase_choices(game, &targets) {
            choices.push(BuildChoice {
                targets: targets.clone(),
                purchases,
            });
        }
    }
    choices
}

pub fn research_choices(game: &Game) -> Vec<Option<TechField>> {
    match game.research_queue() {
        Some(level) => vec![Some(level.field)],
        None if game.available_fields().is_empty() => vec![None],
        None => game.available_fields().iter().copied().map(Some).collect(),
    }
}
