//! Resource bank radar.
//!
//! Tracks a square window of land tiles around a moving agent, shows for
//! every walkable tile how many distinct, not yet harvested resource banks
//! can be mined from it, and keeps a log of the vantage points the player
//! chose.

pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod host;
pub mod ledger;
pub mod location;
pub mod radar;
pub mod scan;
pub mod store;
pub mod terrain;
pub mod visual;

pub use config::RadarConfig;
pub use error::{RadarError, RecordParseError, Result, StoreError};
pub use grid::{GridState, Tile};
pub use host::{HostWorld, HotKey, StaticTerrain, TerrainSource};
pub use ledger::{BankRange, ConsumedBankLedger};
pub use location::{BankLocation, GridPos, MapIndex, WorldLocation};
pub use radar::{run_radar, RadarController, SharedRadar, TickBudget, TickOutcome};
pub use scan::ReachabilityScanner;
pub use store::{LoadPolicy, MarkedSpot, MarkedSpotIndex, MarkedSpotStore};
pub use terrain::{TileCategory, TileClassifier, WindowArray};
pub use visual::*;
