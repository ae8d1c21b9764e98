use thiserror::Error;

use crate::colony::Job;

/// Problems with the static game tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown building '{0}'")]
    UnknownBuilding(String),

    #[error("unknown research field '{0}'")]
    UnknownField(String),

    #[error("malformed building table line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("building '{0}' is defined more than once")]
    DuplicateBuilding(String),

    #[error("building table has no entry for '{0}'")]
    MissingBuilding(String),

    #[error("'{building}' is always available and cannot stand in colony {colony}")]
    NotConstructible { colony: String, building: String },

    #[error("research field {field} has only {available} levels, cannot start at {requested}")]
    TechPositionOutOfRange {
        field: String,
        requested: usize,
        available: usize,
    },
}

/// Failures while advancing a game.
#[derive(Debug, Error)]
pub enum GameError {
    /// Reserve is negative and nothing is left to liquidate.
    #[error("reserve is {reserve} bc and no colony has a sellable building")]
    Bankrupt { reserve: i64 },

    #[error("cannot assign {requested} {job}s in {colony}: only {available} colonists are free")]
    InvalidLabor {
        colony: String,
        job: Job,
        requested: u32,
        available: u32,
    },
}

/// Failures of the planner driving a game.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("no legal action from turn {turn}")]
    NoActions { turn: u32 },

    #[error("failed to build rollout thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
