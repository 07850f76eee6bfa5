//! # careermatch Similarity
//!
//! Weighted group similarity ranking for psychometric career matching.
//!
//! This crate scores a person's normalized profile against the careers of a
//! [`careermatch_core::CareerCatalog`] and returns an ordered, explainable
//! shortlist.
//!
//! ## Features
//!
//! - **Group Metrics**: Cosine, Euclidean or Manhattan similarity per dimension group
//! - **Group Weights**: Relative importance of traits, interests, aptitudes, values and work styles
//! - **Cluster Filter**: Restrict ranking to one cluster, given or inferred
//! - **Explainability**: Per-group contributions and per-dimension deltas
//!
//! ## Example
//!
//! ```rust
//! use careermatch_core::{CareerCatalog, CareerRecord, CatalogHandle, DimensionSchema, PsychometricProfile};
//! use careermatch_similarity::{MatchEngine, MatchRequest, Ranker, RankerConfig};
//!
//! let schema = DimensionSchema::standard();
//! let record = |code: &str, level: f64| CareerRecord {
//!     occupation_code: code.to_string(),
//!     title: code.to_string(),
//!     cluster_label: "general".to_string(),
//!     raw_profile: schema.names().enumerate().map(|(i, n)| (n.to_string(), level + (i % 3) as f64)).collect(),
//! };
//! let catalog = CareerCatalog::load(&schema, vec![record("11-1021.00", 2.0), record("15-1252.00", 5.0)]).unwrap();
//!
//! let engine = MatchEngine::new(CatalogHandle::new(catalog), Ranker::new(RankerConfig::default()).unwrap());
//! let person = PsychometricProfile::new(&schema, schema.names().enumerate().map(|(i, n)| (n, 5.0 + (i % 3) as f64))).unwrap();
//!
//! let outcome = engine.match_person(&person, &MatchRequest::default()).unwrap();
//! assert_eq!(outcome.results[0].occupation_code, "15-1252.00");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Person    │────>│ Normalize   │────>│  Cluster    │
//! │ (raw scores)│     │ (cat. stats)│     │  Filter     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │   Ranker    │<──────────┘
//!                      │ (per group) │
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │  Explain    │
//!                      │  (report)   │
//!                      └─────────────┘
//! ```

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod metric;
pub mod rank;

// Re-export main types for convenience
pub use cluster::{select_candidates, ClusterAssigner, ClusterFilter, NearestCentroid};
pub use config::{ConfigError, DeltaThresholds, GroupWeights, RankerConfig, DEFAULT_GROUP_WEIGHT, DEFAULT_TOP_K};
pub use engine::{MatchEngine, MatchOutcome, MatchRequest};
pub use error::{MatchError, Result};
pub use explain::{ExplainedMatch, MatchReport, RankingStats};
pub use metric::{GroupMetric, GroupScorer};
pub use rank::{DimensionDelta, MatchResult, Ranker};
