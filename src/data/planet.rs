//! Planet classes and the per-class economy tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanetSize {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl PlanetSize {
    pub fn size_class(self) -> u32 {
        match self {
            PlanetSize::Tiny => 1,
            PlanetSize::Small => 2,
            PlanetSize::Medium => 3,
            PlanetSize::Large => 4,
            PlanetSize::Huge => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MineralRichness {
    UltraPoor,
    Poor,
    Abundant,
    Rich,
    UltraRich,
}

impl MineralRichness {
    /// Base production per worker.
    pub fn production_multiplier(self) -> u32 {
        match self {
            MineralRichness::UltraPoor => 1,
            MineralRichness::Poor => 2,
            MineralRichness::Abundant => 3,
            MineralRichness::Rich => 5,
            MineralRichness::UltraRich => 8,
        }
    }

    /// Flat production added by a robotic factory. Counts toward pollution.
    pub fn robotic_factory_bonus(self) -> u32 {
        match self {
            MineralRichness::UltraPoor => 5,
            MineralRichness::Poor => 8,
            MineralRichness::Abundant => 10,
            MineralRichness::Rich => 15,
            MineralRichness::UltraRich => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gravity {
    #[serde(rename = "lowG")]
    Low,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "heavyG")]
    Heavy,
}

impl Gravity {
    pub fn penalty(self) -> f64 {
        match self {
            Gravity::Low => 0.25,
            Gravity::Normal => 0.0,
            Gravity::Heavy => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Climate {
    Gaia,
    Terran,
    Arid,
    Swamp,
    Ocean,
    Tundra,
    Desert,
    Barren,
    Radiated,
    Toxic,
}

impl Climate {
    pub fn population_multiplier(self) -> f64 {
        match self {
            Climate::Gaia => 1.0,
            Climate::Terran => 0.8,
            Climate::Arid => 0.6,
            Climate::Swamp => 0.4,
            Climate::Ocean
            | Climate::Tundra
            | Climate::Desert
            | Climate::Barren
            | Climate::Radiated
            | Climate::Toxic => 0.25,
        }
    }

    /// Base food per farmer.
    pub fn farming_multiplier(self) -> u32 {
        match self {
            Climate::Gaia => 3,
            Climate::Terran | Climate::Swamp | Climate::Ocean => 2,
            Climate::Arid | Climate::Tundra | Climate::Desert => 1,
            Climate::Barren | Climate::Radiated | Climate::Toxic => 0,
        }
    }

    /// Fraction of building maintenance charged again as a climate penalty.
    pub fn maintenance_penalty(self) -> f64 {
        match self {
            Climate::Desert | Climate::Radiated => 0.25,
            Climate::Toxic => 0.5,
            _ => 0.0,
        }
    }

    /// Climate reached by one round of terraforming, if any.
    pub fn terraformed(self) -> Option<Climate> {
        match self {
            Climate::Barren => Some(Climate::Tundra),
            Climate::Desert => Some(Climate::Arid),
            Climate::Tundra => Some(Climate::Swamp),
            Climate::Ocean | Climate::Arid | Climate::Swamp => Some(Climate::Terran),
            Climate::Gaia | Climate::Terran | Climate::Radiated | Climate::Toxic => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Climate::Gaia => "gaia",
            Climate::Terran => "terran",
            Climate::Arid => "arid",
            Climate::Swamp => "swamp",
            Climate::Ocean => "ocean",
            Climate::Tundra => "tundra",
            Climate::Desert => "desert",
            Climate::Barren => "barren",
            Climate::Radiated => "radiated",
            Climate::Toxic => "toxic",
        }
    }
}

impl std::fmt::Display for Climate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub size: PlanetSize,
    pub minerals: MineralRichness,
    pub gravity: Gravity,
    pub climate: Climate,
}

impl Planet {
    pub fn new(
        size: PlanetSize,
        minerals: MineralRichness,
        gravity: Gravity,
        climate: Climate,
    ) -> Self {
        Self {
            size,
            minerals,
            gravity,
            climate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terraforming_chain_ends_at_terran() {
        let mut climate = Climate::Barren;
        let mut steps = 0;
        while let Some(next) = climate.terraformed() {
            climate = next;
            steps += 1;
        }
        assert_eq!(climate, Climate::Terran);
        assert_eq!(steps, 3);
    }

    #[test]
    fn hostile_climates_cannot_be_terraformed() {
        assert_eq!(Climate::Radiated.terraformed(), None);
        assert_eq!(Climate::Toxic.terraformed(), None);
        assert_eq!(Climate::Gaia.terraformed(), None);
    }

    #[test]
    fn planet_classes_deserialize_from_game_names() {
        let planet: Planet = serde_yaml::from_str(
            "size: huge\nminerals: ultraPoor\ngravity: heavyG\nclimate: radiated\n",
        )
        .unwrap();
        assert_eq!(
            planet,
            Planet::new(
                PlanetSize::Huge,
                MineralRichness::UltraPoor,
                Gravity::Heavy,
                Climate::Radiated
            )
        );
    }
}
