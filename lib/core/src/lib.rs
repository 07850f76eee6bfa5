//! # careermatch Core
//!
//! Core library for the careermatch engine.
//!
//! This crate provides the data model the ranking engine works on:
//!
//! - [`DimensionSchema`] - The fixed, ordered set of psychometric dimensions
//! - [`PsychometricProfile`] - One score per dimension, raw or normalized
//! - [`NormalizationStats`] - Per-dimension population mean and spread
//! - [`CareerCatalog`] - Immutable set of careers, normalized at load
//! - [`CatalogHandle`] - Atomically swappable catalog snapshot
//!
//! ## Example
//!
//! ```rust
//! use careermatch_core::{CareerCatalog, CareerRecord, DimensionSchema};
//!
//! let schema = DimensionSchema::standard();
//! let record = |code: &str, level: f64| CareerRecord {
//!     occupation_code: code.to_string(),
//!     title: code.to_string(),
//!     cluster_label: "general".to_string(),
//!     raw_profile: schema.names().map(|n| (n.to_string(), level)).collect(),
//! };
//!
//! let catalog = CareerCatalog::load(&schema, vec![record("a", 2.0), record("b", 4.0)]).unwrap();
//! let career = catalog.get("a").unwrap();
//! assert_eq!(career.normalized().get("analytical").unwrap(), -1.0);
//! ```

pub mod catalog;
pub mod error;
pub mod normalize;
pub mod profile;
pub mod schema;

pub use catalog::{CareerCatalog, CareerProfile, CareerRecord, CatalogHandle};
pub use error::{Error, Result};
pub use normalize::{DimensionStats, NormalizationStats, StatsFile, DEGENERATE_SPREAD_EPSILON};
pub use profile::{PsychometricProfile, Scale};
pub use schema::{Dimension, DimensionGroup, DimensionSchema, SchemaBuilder, STANDARD_SCHEMA_VERSION};
