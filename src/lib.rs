pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TomlConfig;
pub use core::engine::{CompsEngine, CompsOrigin, Gathered};
pub use core::live::LiveFetcher;
pub use core::local::LocalProvider;
pub use domain::model::{BuildingType, LiveLookup, Property, RelayEndpoint};
pub use utils::error::{CompsError, Result};
