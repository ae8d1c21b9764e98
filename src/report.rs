//! Turn-by-turn trace of the live game.

use std::fmt;

use serde::Serialize;

use crate::game::Game;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColonyRow {
    pub name: String,
    pub farmers: u32,
    pub food: i64,
    pub workers: u32,
    pub production: i64,
    pub scientists: u32,
    pub rp: i64,
    pub building: String,
    /// `stored/cost`, with `inf` for targets that never finish.
    pub progress: String,
    pub bc: i64,
    pub population: u32,
    pub climate: String,
    pub max_population: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmpireRow {
    pub food: i64,
    pub rp: i64,
    pub cumulative_rp: i64,
    pub bc: i64,
    pub reserve: i64,
    pub population: u32,
    pub researching: String,
    pub freighters_needed: i64,
    pub food_freighters: u32,
    pub total_freighters: u32,
}

/// State of the game before a turn is played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnSummary {
    pub turn: u32,
    pub colonies: Vec<ColonyRow>,
    pub empire: EmpireRow,
}

impl TurnSummary {
    pub fn capture(game: &Game) -> Self {
        use crate::colony::Job;

        let ctx = game.context();
        let colonies = game
            .colonies()
            .iter()
            .map(|colony| {
                let (building, progress) = match colony.build_queue {
                    Some(target) => {
                        let cost = colony
                            .target_cost(ctx.buildings, target)
                            .map_or_else(|| "inf".to_string(), |cost| cost.to_string());
                        (
                            target.to_string(),
                            format!("{}/{}", colony.stored_production, cost),
                        )
                    }
                    None => ("None".to_string(), format!("{}/-", colony.stored_production)),
                };
                ColonyRow {
                    name: colony.name.clone(),
                    farmers: colony.colonists(Job::Farmer),
                    food: colony.food(&ctx),
                    workers: colony.colonists(Job::Worker),
                    production: colony.production(&ctx),
                    scientists: colony.colonists(Job::Scientist),
                    rp: colony.rp(&ctx),
                    building,
                    progress,
                    bc: colony.bc(&ctx),
                    population: colony.current_population(),
                    climate: colony.climate().to_string(),
                    max_population: colony.max_population(&ctx),
                }
            })
            .collect();

        let researching = game
            .research_queue()
            .map_or_else(|| "None".to_string(), |level| level.label());

        Self {
            turn: game.turn_count(),
            colonies,
            empire: EmpireRow {
                food: game.food(),
                rp: game.rp(),
                cumulative_rp: game.cumulative_rp(),
                bc: game.income(),
                reserve: game.reserve,
                population: game.population(),
                researching,
                freighters_needed: game.freighters_needed(),
                food_freighters: game.food_freighters(),
                total_freighters: game.total_freighters(),
            },
        }
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for TurnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "turn: {}", self.turn)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>7} {:>8} {:>7} {:>6} {:>7} {:>5} {:<20} {:>10} {:>6} {:>4} {:<9} {:>7}",
            "colony",
            "farmers",
            "net food",
            "workers",
            "prod.",
            "scient.",
            "rp",
            "building",
            "progress",
            "net bc",
            "pop",
            "climate",
            "pop_max"
        )?;
        for row in &self.colonies {
            writeln!(
                f,
                "{:<12} {:>7} {:>8} {:>7} {:>6} {:>7} {:>5} {:<20} {:>10} {:>6} {:>4} {:<9} {:>7}",
                row.name,
                row.farmers,
                row.food,
                row.workers,
                row.production,
                row.scientists,
                row.rp,
                row.building,
                row.progress,
                row.bc,
                row.population,
                row.climate,
                row.max_population
            )?;
        }
        writeln!(f)?;
        let empire = &self.empire;
        writeln!(
            f,
            "{:>8} {:>5} {:>7} {:>5} {:>8} {:>5} {:<16} {:>6} {:>15} {:>14}",
            "net food",
            "rp",
            "cum_rp",
            "bc",
            "reserve",
            "pop",
            "researching",
            "needed",
            "food freighters",
            "num freighters"
        )?;
        writeln!(
            f,
            "{:>8} {:>5} {:>7} {:>5} {:>8} {:>5} {:<16} {:>6} {:>15} {:>14}",
            empire.food,
            empire.rp,
            empire.cumulative_rp,
            empire.bc,
            empire.reserve,
            empire.population,
            empire.researching,
            empire.freighters_needed,
            empire.food_freighters,
            empire.total_freighters
        )
    }
}
