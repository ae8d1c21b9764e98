pub mod colony;
pub mod data;
pub mod error;
pub mod game;
pub mod math;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod search;

pub use colony::{Colony, ColonyContext, Job};
pub use data::GameData;
pub use error::{DataError, GameError, SearchError};
pub use game::{Game, TurnEvents};
pub use report::TurnSummary;
pub use scenario::{Scenario, ScenarioLoader};
pub use search::{Action, ActionSpace, SearchEngine, SearchSettings};
