//! Technology tree for a creative, democratic race.
//!
//! Each field is an ordered list of research levels. Finishing a level
//! unlocks its buildings for construction and grants its achievements.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::buildings::Building;
use crate::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TechField {
    Construction,
    Chemistry,
    Computers,
    Biology,
    Sociology,
    Physics,
    ForceFields,
}

impl TechField {
    pub const ALL: [TechField; 7] = [
        TechField::Construction,
        TechField::Chemistry,
        TechField::Computers,
        TechField::Biology,
        TechField::Sociology,
        TechField::Physics,
        TechField::ForceFields,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TechField::Construction => "construction",
            TechField::Chemistry => "chemistry",
            TechField::Computers => "computers",
            TechField::Biology => "biology",
            TechField::Sociology => "sociology",
            TechField::Physics => "physics",
            TechField::ForceFields => "forceFields",
        }
    }
}

impl fmt::Display for TechField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TechField {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TechField::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| DataError::UnknownField(s.to_string()))
    }
}

/// Empire-wide unlocks that are not physical buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Achievement {
    AdvancedCityPlanning,
    MicroliteConstruction,
    NanoDisassemblers,
    Federation,
    CurrencyExchange,
    RealityNetwork,
    Microbiotics,
    UniversalAntidote,
    HeightenedIntelligence,
    BiomorphicFungi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResearchLevel {
    pub field: TechField,
    pub level: u8,
    pub rp_cost: u32,
    pub buildings: &'static [Building],
    pub achievements: &'static [Achievement],
}

impl ResearchLevel {
    const fn new(
        field: TechField,
        level: u8,
        buildings: &'static [Building],
        achievements: &'static [Achievement],
    ) -> Self {
        Self {
            field,
            level,
            rp_cost: rp_cost(level),
            buildings,
            achievements,
        }
    }

    /// Research points that must be stored before the level completes.
    pub fn completion_cost(&self) -> i64 {
        (1.5 * self.rp_cost as f64) as i64
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.field, self.level)
    }
}

/// Base rp cost of a research level, before the 1.5x race penalty.
pub const fn rp_cost(level: u8) -> u32 {
    match level {
        1 => 50,
        2 => 80,
        3 => 150,
        4 => 250,
        5 => 400,
        6 => 650,
        7 => 900,
        8 => 1150,
        9 => 1500,
        10 => 2000,
        11 => 2750,
        12 => 3500,
        13 => 4500,
        14 => 6000,
        _ => 7500,
    }
}

use Achievement as A;
use Building as B;
use TechField as F;

const CONSTRUCTION: &[ResearchLevel] = &[
    ResearchLevel::new(F::Construction, 1, &[], &[]),
    ResearchLevel::new(F::Construction, 2, &[], &[]),
    ResearchLevel::new(F::Construction, 3, &[B::AutomatedFactory], &[]),
    ResearchLevel::new(F::Construction, 4, &[], &[]),
    ResearchLevel::new(F::Construction, 5, &[B::Spaceport], &[]),
    ResearchLevel::new(F::Construction, 6, &[B::RoboMinerPlant], &[]),
    ResearchLevel::new(F::Construction, 7, &[], &[]),
    ResearchLevel::new(F::Construction, 8, &[], &[]),
    ResearchLevel::new(F::Construction, 9, &[B::Recyclotron], &[]),
    ResearchLevel::new(F::Construction, 10, &[B::RoboticFactory], &[]),
    ResearchLevel::new(F::Construction, 12, &[B::CoreWasteDump, B::DeepCoreMine], &[]),
    ResearchLevel::new(F::Construction, 14, &[], &[A::AdvancedCityPlanning]),
];

const CHEMISTRY: &[ResearchLevel] = &[
    ResearchLevel::new(F::Chemistry, 1, &[], &[]),
    ResearchLevel::new(F::Chemistry, 4, &[], &[]),
    ResearchLevel::new(F::Chemistry, 6, &[B::PollutionProcessor], &[]),
    ResearchLevel::new(F::Chemistry, 8, &[B::AtmosphereRenewer], &[]),
    ResearchLevel::new(
        F::Chemistry,
        10,
        &[],
        &[A::MicroliteConstruction, A::NanoDisassemblers],
    ),
];

const COMPUTERS: &[ResearchLevel] = &[
    ResearchLevel::new(F::Computers, 1, &[], &[]),
    ResearchLevel::new(F::Computers, 3, &[B::ResearchLab], &[]),
    ResearchLevel::new(F::Computers, 5, &[], &[]),
    ResearchLevel::new(F::Computers, 7, &[B::HoloSimulator, B::Supercomputer], &[]),
    ResearchLevel::new(F::Computers, 9, &[], &[]),
    ResearchLevel::new(F::Computers, 11, &[B::Autolab], &[]),
    ResearchLevel::new(F::Computers, 12, &[], &[]),
    ResearchLevel::new(F::Computers, 13, &[B::GalacticCybernet], &[A::RealityNetwork]),
    ResearchLevel::new(F::Computers, 14, &[B::PleasureDome], &[]),
];

// soil enrichment is modelled as a building
const BIOLOGY: &[ResearchLevel] = &[
    ResearchLevel::new(F::Biology, 2, &[B::Biospheres, B::HydroponicFarm], &[]),
    ResearchLevel::new(F::Biology, 5, &[B::CloningCenter, B::SoilEnrichment], &[]),
    ResearchLevel::new(F::Biology, 7, &[], &[A::Microbiotics]),
    ResearchLevel::new(F::Biology, 8, &[B::Terraforming], &[]),
    ResearchLevel::new(
        F::Biology,
        9,
        &[B::SubterraneanFarms, B::WeatherController],
        &[],
    ),
    ResearchLevel::new(F::Biology, 11, &[], &[A::HeightenedIntelligence]),
    ResearchLevel::new(F::Biology, 13, &[], &[A::UniversalAntidote]),
    ResearchLevel::new(F::Biology, 15, &[B::GaiaTransformation], &[A::BiomorphicFungi]),
];

const SOCIOLOGY: &[ResearchLevel] = &[
    ResearchLevel::new(F::Sociology, 3, &[], &[]),
    ResearchLevel::new(F::Sociology, 6, &[], &[]),
    ResearchLevel::new(F::Sociology, 8, &[B::StockExchange], &[]),
    ResearchLevel::new(F::Sociology, 10, &[B::AstroUniversity], &[]),
    ResearchLevel::new(F::Sociology, 13, &[], &[A::Federation]),
    ResearchLevel::new(F::Sociology, 14, &[], &[A::CurrencyExchange]),
];

const PHYSICS: &[ResearchLevel] = &[
    ResearchLevel::new(F::Physics, 1, &[], &[]),
    ResearchLevel::new(F::Physics, 3, &[], &[]),
    ResearchLevel::new(F::Physics, 4, &[], &[]),
    ResearchLevel::new(F::Physics, 7, &[], &[]),
    ResearchLevel::new(F::Physics, 8, &[B::GravityGenerator], &[]),
];

const FORCE_FIELDS: &[ResearchLevel] = &[
    ResearchLevel::new(F::ForceFields, 4, &[], &[]),
    ResearchLevel::new(F::ForceFields, 6, &[], &[]),
    ResearchLevel::new(F::ForceFields, 7, &[B::RadiationShield], &[]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechTree {
    fields: BTreeMap<TechField, &'static [ResearchLevel]>,
}

impl TechTree {
    pub fn standard() -> Self {
        let fields = [
            (F::Construction, CONSTRUCTION),
            (F::Chemistry, CHEMISTRY),
            (F::Computers, COMPUTERS),
            (F::Biology, BIOLOGY),
            (F::Sociology, SOCIOLOGY),
            (F::Physics, PHYSICS),
            (F::ForceFields, FORCE_FIELDS),
        ];
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = TechField> + '_ {
        self.fields.keys().copied()
    }

    pub fn levels(&self, field: TechField) -> &'static [ResearchLevel] {
        self.fields.get(&field).copied().unwrap_or(&[])
    }

    pub fn level(&self, field: TechField, index: usize) -> Option<&'static ResearchLevel> {
        self.levels(field).get(index)
    }
}

impl Default for TechTree {
    fn default() -> Self {
        Self::standard()
    }
}
