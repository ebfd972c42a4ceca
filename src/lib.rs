pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use config::{Session, SessionInputs, TomlConfig};
pub use self::core::{
    aggregator::FanOutAggregator,
    classifier::classify,
    client::HttpOrderLookup,
    report::{LineSink, LineTarget, RunReport},
};
pub use domain::model::{LookupOutcome, LookupRequest, StatusCategory, Tally};
pub use utils::error::{LookupError, OrderTallyError, Result};
