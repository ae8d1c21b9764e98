use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::colony::Colony;
use crate::data::{Building, GameData, Planet, TechField};
use crate::error::DataError;
use crate::game::{Game, DEFAULT_FREIGHTERS, DEFAULT_RESERVE};
use crate::search::SearchSettings;

fn default_reserve() -> i64 {
    DEFAULT_RESERVE
}

fn default_freighters() -> u32 {
    DEFAULT_FREIGHTERS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_reserve")]
    pub reserve: i64,
    #[serde(default)]
    pub stored_rp: i64,
    #[serde(default = "default_freighters")]
    pub freighters: u32,
    /// Levels already researched in each field.
    #[serde(default)]
    pub starting_tech: BTreeMap<TechField, usize>,
    pub colonies: Vec<ScenarioColony>,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioColony {
    pub name: String,
    pub planet: Planet,
    #[serde(default)]
    pub farmers: u32,
    #[serde(default)]
    pub workers: u32,
    #[serde(default)]
    pub scientists: u32,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub build_queue: Option<Building>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Scenario::parse(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Scenario {
    pub fn parse(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        if scenario.colonies.is_empty() {
            anyhow::bail!("scenario '{}' has no colonies", scenario.name);
        }
        for colony in &scenario.colonies {
            let prebuilt = colony.buildings.iter().find(|building| {
                building.is_perpetual() || **building == Building::FreighterFleet
            });
            if let Some(building) = prebuilt {
                return Err(DataError::NotConstructible {
                    colony: colony.name.clone(),
                    building: building.to_string(),
                }
                .into());
            }
        }
        Ok(scenario)
    }

    pub fn build_game(&self, data: Arc<GameData>) -> Result<Game> {
        let colonies = self
            .colonies
            .iter()
            .map(|colony| {
                Colony::new(
                    colony.name.clone(),
                    colony.planet,
                    colony.farmers,
                    colony.workers,
                    colony.scientists,
                    &colony.buildings,
                    colony.build_queue,
                )
            })
            .collect();
        let starting_tech: Vec<(TechField, usize)> = self
            .starting_tech
            .iter()
            .map(|(field, position)| (*field, *position))
            .collect();
        let game = Game::new(data, colonies, &starting_tech)
            .with_context(|| format!("Invalid starting tech in scenario '{}'", self.name))?;
        Ok(game
            .with_reserve(self.reserve)
            .with_stored_rp(self.stored_rp)
            .with_freighters(self.freighters))
    }
}
