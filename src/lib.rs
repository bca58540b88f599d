//! Property search and market-trend narratives.
//!
//! A search turns criteria into extraction queries, pulls listings and
//! locality trends through an extraction backend, and has a text-generation
//! model write the two narratives shown to the user.

pub mod analysis;
pub mod config;
pub mod error;
pub mod generators;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod ranking;
pub mod schema;
pub mod scrapers;
pub mod templates;
pub mod testing;

pub use config::Config;
pub use error::{GenerationError, Result, ScoutError};
pub use models::{
    ExtractionResult, LocationTrend, Narrative, PropertyCategory, PropertyCollection,
    PropertyRecord, SearchCriteria,
};
pub use pipeline::{SearchPipeline, SearchReport};
