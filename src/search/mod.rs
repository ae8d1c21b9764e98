//! Flat Monte Carlo planner.
//!
//! Every candidate action is scored by playing the game to completion with
//! uniformly random follow-up actions and averaging the finishing turn.
//! The action with the lowest mean is committed to the live game.

pub mod actions;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use actions::{Action, ActionSpace, BuildChoice, Labor};

use crate::data::{Achievement, Building};
use crate::error::{GameError, SearchError};
use crate::game::{Game, TurnEvents};
use crate::report::TurnSummary;
use crate::rng::RngManager;

/// Completed targets that change how much food a farmer grows.
pub const FOOD_ALTERING: [Building; 10] = [
    Building::AstroUniversity,
    Building::HoloSimulator,
    Building::PleasureDome,
    Building::HydroponicFarm,
    Building::SoilEnrichment,
    Building::Terraforming,
    Building::SubterraneanFarms,
    Building::WeatherController,
    Building::GaiaTransformation,
    Building::GravityGenerator,
];

const FOOD_ACHIEVEMENTS: [Achievement; 2] =
    [Achievement::BiomorphicFungi, Achievement::RealityNetwork];

fn default_samples() -> u32 {
    1
}

fn default_seed() -> u64 {
    42
}

fn default_max_turns() -> u32 {
    500
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Rollouts per candidate action.
    #[serde(default = "default_samples")]
    pub samples: u32,
    /// Rollout worker threads; 0 uses rayon's global pool, 1 runs inline.
    #[serde(default)]
    pub threads: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Turn bound for rollouts and for the live game.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            threads: 0,
            seed: default_seed(),
            max_turns: default_max_turns(),
        }
    }
}

/// A game together with the actions legal from it.
#[derive(Debug, Clone)]
pub struct SearchState {
    game: Game,
    space: ActionSpace,
}

impl SearchState {
    pub fn new(game: Game) -> Self {
        let space = ActionSpace::new(&game);
        Self { game, space }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn space(&self) -> &ActionSpace {
        &self.space
    }

    /// Applies `action`, plays one turn and refreshes the action space.
    ///
    /// Labor distributions are only rebuilt when something that feeds into
    /// them changed during the turn.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        action: &Action,
        rng: &mut R,
    ) -> Result<TurnEvents, GameError> {
        action.apply(&mut self.game);
        let events = self.game.turn(rng)?;

        self.space.refresh_builds(&self.game);
        self.space.refresh_research(&self.game);
        if distributions_stale(&events) {
            self.space.refresh_distributions(&self.game);
        }
        Ok(events)
    }
}

fn distributions_stale(events: &TurnEvents) -> bool {
    events.population_changed
        || !events.sold.is_empty()
        || events
            .completed
            .iter()
            .any(|(_, building)| FOOD_ALTERING.contains(building))
        || events.research_completed.is_some_and(|level| {
            level
                .achievements
                .iter()
                .any(|achievement| FOOD_ACHIEVEMENTS.contains(achievement))
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleScore {
    /// Mean finishing turn over all rollouts.
    pub mean: f64,
    pub best: u32,
    pub worst: u32,
    /// Rollouts cut off at the turn bound or by bankruptcy.
    pub aborted: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub index: usize,
    pub action: Action,
    pub score: SampleScore,
}

pub struct SearchEngine {
    state: SearchState,
    settings: SearchSettings,
    rng: RngManager,
    live_rng: ChaCha8Rng,
    history: Vec<TurnSummary>,
}

impl SearchEngine {
    pub fn new(game: Game, settings: SearchSettings) -> Self {
        let rng = RngManager::new(settings.seed);
        Self {
            state: SearchState::new(game),
            settings,
            live_rng: rng.live_rng(),
            rng,
            history: Vec::new(),
        }
    }

    pub fn game(&self) -> &Game {
        self.state.game()
    }

    pub fn action_space(&self) -> &ActionSpace {
        self.state.space()
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Summaries of the live game, one per committed turn.
    pub fn history(&self) -> &[TurnSummary] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.state.game().is_finished()
    }

    /// Plays `samples` random continuations after `action`.
    ///
    /// `stream` picks the random streams, so the same action scored under
    /// the same stream always gives the same result.
    pub fn sample(&self, action: &Action, stream: u64, samples: u32) -> SampleScore {
        let mut total = 0u64;
        let mut best = u32::MAX;
        let mut worst = 0;
        let mut aborted = 0;
        for sample in 0..samples {
            let (turns, finished) = self.rollout(action, stream, u64::from(sample));
            if !finished {
                aborted += 1;
            }
            total += u64::from(turns);
            best = best.min(turns);
            worst = worst.max(turns);
        }
        let mean = if samples == 0 {
            f64::INFINITY
        } else {
            total as f64 / f64::from(samples)
        };
        SampleScore {
            mean,
            best: if samples == 0 { 0 } else { best },
            worst,
            aborted,
        }
    }

    /// Finishing turn of one rollout and whether it reached the end.
    fn rollout(&self, action: &Action, stream: u64, sample: u64) -> (u32, bool) {
        let mut rng = self.rng.rollout_rng(stream, sample);
        let mut state = self.state.clone();
        let limit = state.game.turn_count() + self.settings.max_turns;

        if state.advance(action, &mut rng).is_err() {
            return (limit, false);
        }
        while !state.game.is_finished() {
            if state.game.turn_count() >= limit {
                return (limit, false);
            }
            let Some(next) = state.space.random_action(&mut rng) else {
                return (limit, false);
            };
            if state.advance(&next, &mut rng).is_err() {
                return (limit, false);
            }
        }
        (state.game.turn_count(), true)
    }

    fn score(&self, index: usize, samples: u32) -> Option<(usize, Action, SampleScore)> {
        let action = self.state.space.action(index)?;
        let score = self.sample(&action, index as u64, samples);
        Some((index, action, score))
    }

    fn pick(
        &self,
        scored: impl IntoIterator<Item = (usize, Action, SampleScore)>,
    ) -> Result<Decision, SearchError> {
        scored
            .into_iter()
            .min_by(|a, b| a.2.mean.total_cmp(&b.2.mean).then(a.0.cmp(&b.0)))
            .map(|(index, action, score)| Decision {
                index,
                action,
                score,
            })
            .ok_or(SearchError::NoActions {
                turn: self.game().turn_count(),
            })
    }

    /// Scores every action in the current space on this thread.
    pub fn evaluate(&self, samples: u32) -> Result<Decision, SearchError> {
        let scored = (0..self.state.space.len()).filter_map(|index| self.score(index, samples));
        self.pick(scored)
    }

    /// Scores every action across a rayon pool. `threads == 0` uses the
    /// global pool.
    pub fn evaluate_parallel(&self, threads: usize, samples: u32) -> Result<Decision, SearchError> {
        let run = || -> Vec<(usize, Action, SampleScore)> {
            (0..self.state.space.len())
                .into_par_iter()
                .filter_map(|index| self.score(index, samples))
                .collect()
        };
        let scored = if threads == 0 {
            run()
        } else {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run)
        };
        self.pick(scored)
    }

    pub fn choose(&mut self, samples: u32) -> Result<Decision, SearchError> {
        let decision = self.evaluate(samples)?;
        self.commit(&decision)?;
        Ok(decision)
    }

    pub fn choose_parallel(&mut self, threads: usize, samples: u32) -> Result<Decision, SearchError> {
        let decision = self.evaluate_parallel(threads, samples)?;
        self.commit(&decision)?;
        Ok(decision)
    }

    fn commit(&mut self, decision: &Decision) -> Result<(), SearchError> {
        if decision.score.aborted > 0 {
            warn!(
                turn = self.game().turn_count(),
                aborted = decision.score.aborted,
                bound = self.settings.max_turns,
                "rollouts did not finish"
            );
        }
        info!(
            turn = self.game().turn_count(),
            candidates = self.state.space.len(),
            index = decision.index,
            mean = decision.score.mean,
            best = decision.score.best,
            "committing action"
        );
        self.advance(&decision.action)?;
        Ok(())
    }

    /// Commits `action` to the live game and records the turn summary.
    pub fn advance(&mut self, action: &Action) -> Result<TurnEvents, SearchError> {
        let summary = TurnSummary::capture(self.state.game());
        let events = self.state.advance(action, &mut self.live_rng)?;
        for (colony, building) in &events.sold {
            warn!(colony, %building, reserve = self.game().reserve, "sold building to cover debt");
        }
        for (colony, building) in &events.completed {
            debug!(colony, %building, "build completed");
        }
        self.history.push(summary);
        self.rng.advance_round();
        Ok(events)
    }

    /// Chooses and commits actions until the game is finished or the turn
    /// bound is reached. Returns whether the game finished.
    pub fn run_to_completion(&mut self) -> Result<bool, SearchError> {
        let limit = self.game().turn_count() + self.settings.max_turns;
        while !self.is_finished() {
            if self.game().turn_count() >= limit {
                warn!(turn = self.game().turn_count(), "live game hit the turn bound");
                return Ok(false);
            }
            let samples = self.settings.samples;
            match self.settings.threads {
                1 => self.choose(samples)?,
                threads => self.choose_parallel(threads, samples)?,
            };
        }
        info!(turns = self.game().turn_count(), "game finished");
        Ok(true)
    }
}
