//! Building identities and the cost/maintenance table.
//!
//! The table is read from a line-oriented text format, one building per
//! line: `<name> <cost> <maintenance>`. Lines starting with `#` are comments.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

const STANDARD_TABLE: &str = include_str!("../../data/buildings.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Building {
    Housing,
    TradeGoods,
    StoreProduction,
    FreighterFleet,
    Terraforming,
    GaiaTransformation,
    SoilEnrichment,
    AutomatedFactory,
    HydroponicFarm,
    Biospheres,
    ResearchLab,
    Spaceport,
    RoboMinerPlant,
    Recyclotron,
    RoboticFactory,
    CoreWasteDump,
    DeepCoreMine,
    PollutionProcessor,
    AtmosphereRenewer,
    StockExchange,
    AstroUniversity,
    HoloSimulator,
    Supercomputer,
    Autolab,
    GalacticCybernet,
    PleasureDome,
    CloningCenter,
    SubterraneanFarms,
    WeatherController,
    GravityGenerator,
    RadiationShield,
}

impl Building {
    pub const ALL: [Building; 31] = [
        Building::Housing,
        Building::TradeGoods,
        Building::StoreProduction,
        Building::FreighterFleet,
        Building::Terraforming,
        Building::GaiaTransformation,
        Building::SoilEnrichment,
        Building::AutomatedFactory,
        Building::HydroponicFarm,
        Building::Biospheres,
        Building::ResearchLab,
        Building::Spaceport,
        Building::RoboMinerPlant,
        Building::Recyclotron,
        Building::RoboticFactory,
        Building::CoreWasteDump,
        Building::DeepCoreMine,
        Building::PollutionProcessor,
        Building::AtmosphereRenewer,
        Building::StockExchange,
        Building::AstroUniversity,
        Building::HoloSimulator,
        Building::Supercomputer,
        Building::Autolab,
        Building::GalacticCybernet,
        Building::PleasureDome,
        Building::CloningCenter,
        Building::SubterraneanFarms,
        Building::WeatherController,
        Building::GravityGenerator,
        Building::RadiationShield,
    ];

    /// Queue targets that never complete. The loader adds them itself.
    pub const PERPETUAL: [Building; 3] = [
        Building::Housing,
        Building::TradeGoods,
        Building::StoreProduction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Building::Housing => "housing",
            Building::TradeGoods => "tradeGoods",
            Building::StoreProduction => "storeProduction",
            Building::FreighterFleet => "freighterFleet",
            Building::Terraforming => "terraforming",
            Building::GaiaTransformation => "gaiaTransformation",
            Building::SoilEnrichment => "soilEnrichment",
            Building::AutomatedFactory => "automatedFactory",
            Building::HydroponicFarm => "hydroponicFarm",
            Building::Biospheres => "biospheres",
            Building::ResearchLab => "researchLab",
            Building::Spaceport => "spaceport",
            Building::RoboMinerPlant => "roboMinerPlant",
            Building::Recyclotron => "recyclotron",
            Building::RoboticFactory => "roboticFactory",
            Building::CoreWasteDump => "coreWasteDump",
            Building::DeepCoreMine => "deepCoreMine",
            Building::PollutionProcessor => "pollutionProcessor",
            Building::AtmosphereRenewer => "atmosphereRenewer",
            Building::StockExchange => "stockExchange",
            Building::AstroUniversity => "astroUniversity",
            Building::HoloSimulator => "holoSimulator",
            Building::Supercomputer => "supercomputer",
            Building::Autolab => "autolab",
            Building::GalacticCybernet => "galacticCybernet",
            Building::PleasureDome => "pleasureDome",
            Building::CloningCenter => "cloningCenter",
            Building::SubterraneanFarms => "subterraneanFarms",
            Building::WeatherController => "weatherController",
            Building::GravityGenerator => "gravityGenerator",
            Building::RadiationShield => "radiationShield",
        }
    }

    pub fn is_perpetual(self) -> bool {
        Self::PERPETUAL.contains(&self)
    }

    /// Whether bankruptcy liquidation may sell this building.
    pub fn is_sellable(self) -> bool {
        !matches!(
            self,
            Building::Terraforming | Building::SoilEnrichment | Building::GaiaTransformation
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Building {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Building::ALL
            .iter()
            .copied()
            .find(|building| building.name() == s)
            .ok_or_else(|| DataError::UnknownBuilding(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    /// Production needed to finish. `None` for targets that never finish.
    pub cost: Option<u32>,
    /// Upkeep in bc per turn while built.
    pub maintenance: u32,
}

impl BuildingSpec {
    pub const PERPETUAL: BuildingSpec = BuildingSpec {
        cost: None,
        maintenance: 0,
    };

    pub fn finite(cost: u32, maintenance: u32) -> Self {
        Self {
            cost: Some(cost),
            maintenance,
        }
    }
}

/// Immutable cost and upkeep for every known building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingTable {
    specs: Vec<BuildingSpec>,
}

impl BuildingTable {
    /// The table bundled with the crate.
    pub fn standard() -> Self {
        match Self::parse(STANDARD_TABLE) {
            Ok(table) => table,
            Err(err) => unreachable!("bundled building table is invalid: {err}"),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read building table {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, DataError> {
        let mut specs: Vec<Option<BuildingSpec>> = vec![None; Building::ALL.len()];
        for building in Building::PERPETUAL {
            specs[building.index()] = Some(BuildingSpec::PERPETUAL);
        }

        for (number, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let malformed = || DataError::MalformedLine {
                line: number + 1,
                content: line.to_string(),
            };
            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let [name, cost, maintenance] = fields.as_slice() else {
                return Err(malformed());
            };
            let building: Building = name.parse()?;
            let cost = cost.parse::<u32>().map_err(|_| malformed())?;
            let maintenance = maintenance.parse::<u32>().map_err(|_| malformed())?;

            let slot = &mut specs[building.index()];
            if slot.is_some() {
                return Err(DataError::DuplicateBuilding(building.name().to_string()));
            }
            *slot = Some(BuildingSpec::finite(cost, maintenance));
        }

        let specs = Building::ALL
            .iter()
            .zip(specs)
            .map(|(building, spec)| {
                spec.ok_or_else(|| DataError::MissingBuilding(building.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { specs })
    }

    pub fn spec(&self, building: Building) -> BuildingSpec {
        self.specs[building.index()]
    }

    pub fn cost(&self, building: Building) -> Option<u32> {
        self.spec(building).cost
    }

    pub fn maintenance(&self, building: Building) -> u32 {
        self.spec(building).maintenance
    }
}

impl Default for BuildingTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_building() {
        let table = BuildingTable::standard();
        for building in Building::ALL {
            let spec = table.spec(building);
            assert_eq!(spec.cost.is_none(), building.is_perpetual(), "{building}");
        }
        assert_eq!(table.cost(Building::Terraforming), Some(250));
        assert_eq!(table.maintenance(Building::Housing), 0);
    }

    #[test]
    fn enum_order_matches_all_list() {
        for (index, building) in Building::ALL.iter().enumerate() {
            assert_eq!(building.index(), index);
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        assert_eq!("roboMinerPlant".parse::<Building>().unwrap(), Building::RoboMinerPlant);
        assert!(matches!(
            "warpGate".parse::<Building>(),
            Err(DataError::UnknownBuilding(name)) if name == "warpGate"
        ));
    }

    #[test]
    fn malformed_line_reports_its_position() {
        let mut text = STANDARD_TABLE.to_string();
        text.push_str("biospheres sixty 1\n");
        let err = BuildingTable::parse(&text).unwrap_err();
        assert!(matches!(err, DataError::MalformedLine { .. }), "{err}");
    }

    #[test]
    fn duplicate_and_missing_entries_are_rejected() {
        let doubled = format!("{STANDARD_TABLE}autolab 1 1\n");
        assert!(matches!(
            BuildingTable::parse(&doubled),
            Err(DataError::DuplicateBuilding(_))
        ));

        let err = BuildingTable::parse("# empty\nautolab 200 3\n").unwrap_err();
        assert!(matches!(err, DataError::MissingBuilding(_)));
    }

    #[test]
    fn perpetual_targets_cannot_be_redefined() {
        let text = format!("{STANDARD_TABLE}housing 10 0\n");
        assert!(matches!(
            BuildingTable::parse(&text),
            Err(DataError::DuplicateBuilding(name)) if name == "housing"
        ));
    }
}
