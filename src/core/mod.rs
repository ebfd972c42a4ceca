pub mod aggregator;
pub mod classifier;
pub mod client;
pub mod report;

pub use crate::domain::model::{
    LookupOutcome, LookupRequest, OrderResult, StatusCategory, Tally,
};
pub use crate::domain::ports::{OrderLookup, ResultSink};
pub use crate::utils::error::Result;
