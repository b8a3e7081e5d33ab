pub mod aggregator;
pub mod card;
pub mod category;
pub mod config;
pub mod controller;
pub mod error;
pub mod markers;
pub mod model;
pub mod nominatim;
pub mod overpass;
pub mod shell;
pub mod terminal;
pub mod utils;
pub mod views;

pub use aggregator::ResultAggregator;
pub use category::classify;
pub use config::Config;
pub use controller::{Controller, SearchOutcome};
pub use error::SearchError;
pub use model::{Feature, Location, OsmId};
