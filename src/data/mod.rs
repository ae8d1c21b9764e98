//! Static game balance tables. Built once, shared read-only by every game.

pub mod buildings;
pub mod planet;
pub mod technology;

use std::sync::Arc;

pub use buildings::{Building, BuildingSpec, BuildingTable};
pub use planet::{Climate, Gravity, MineralRichness, Planet, PlanetSize};
pub use technology::{Achievement, ResearchLevel, TechField, TechTree};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameData {
    pub buildings: BuildingTable,
    pub tech_tree: TechTree,
}

impl GameData {
    pub fn new(buildings: BuildingTable, tech_tree: TechTree) -> Self {
        Self {
            buildings,
            tech_tree,
        }
    }

    pub fn standard() -> Arc<Self> {
        Arc::new(Self::default())
    }
}
