//! # careermatch
//!
//! Psychometric career matching: compares a person's profile with career
//! profiles over a fixed set of psychometric dimensions and returns an
//! ordered, explainable shortlist.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! careermatch --catalog careers.json --person person.json --top-k 10
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use careermatch::prelude::*;
//!
//! let schema = DimensionSchema::standard();
//! let records: Vec<CareerRecord> = Vec::new(); // from ingestion
//! let catalog = CareerCatalog::load(&schema, records).unwrap();
//!
//! let engine = MatchEngine::new(CatalogHandle::new(catalog), Ranker::new(RankerConfig::default()).unwrap());
//! let person = PsychometricProfile::new(&schema, schema.names().map(|n| (n, 4.0))).unwrap();
//! let outcome = engine.match_person(&person, &MatchRequest::default()).unwrap();
//! let report = MatchReport::from_outcome(&outcome, &engine.ranker().config().thresholds);
//! ```
//!
//! ## Crate Structure
//!
//! careermatch is composed of several crates:
//!
//! - [`careermatch-core`](https://docs.rs/careermatch-core) - Dimension schema, profiles, normalization stats, career catalog
//! - [`careermatch-similarity`](https://docs.rs/careermatch-similarity) - Group metrics, weights, ranker, cluster filter, explained reports

pub mod input;

// Re-export core types
pub use careermatch_core::{
    CareerCatalog, CareerProfile, CareerRecord, CatalogHandle,
    Dimension, DimensionGroup, DimensionSchema,
    DimensionStats, NormalizationStats, StatsFile,
    PsychometricProfile, Scale,
    Error, Result,
};

// Re-export ranking
pub use careermatch_similarity::{
    ClusterAssigner, ClusterFilter, NearestCentroid,
    DeltaThresholds, GroupWeights, RankerConfig, ConfigError,
    GroupMetric, GroupScorer,
    MatchEngine, MatchOutcome, MatchRequest, MatchError,
    DimensionDelta, MatchResult, Ranker,
    ExplainedMatch, MatchReport, RankingStats,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CareerCatalog, CareerRecord, CatalogHandle,
        DimensionGroup, DimensionSchema, PsychometricProfile,
        ClusterFilter, GroupMetric, GroupWeights, RankerConfig,
        MatchEngine, MatchReport, MatchRequest, Ranker,
        Error, MatchError, Result,
    };
}
