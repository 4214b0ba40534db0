pub mod balance;
pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod island;
pub mod placement;
pub mod tile;

pub use balance::total_deviation;
pub use board::{Board, create_island};
pub use config::{
    EngineSettings, GenerationConfig, IslandParams, MainIslandParams, NumberCounts,
    ResourceCounts, SeafarerParams,
};
pub use error::GenerationError;
pub use grid::GridShape;
pub use island::create_seafarer_islands;
pub use tile::{Direction, Resource, Tile, pip_weight};
