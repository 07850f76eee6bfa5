//! Normalization store
//!
//! Per-dimension population statistics over the career catalog and the
//! z-score transform built from them. Stats are computed (or loaded) once
//! and never mutated; a catalog rebuild produces a new instance.

use crate::profile::{PsychometricProfile, Scale};
use crate::schema::DimensionSchema;
use crate::{Error, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Spreads below this are treated as zero.
pub const DEGENERATE_SPREAD_EPSILON: f64 = 1e-9;

/// Population statistics for one dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub mean: f64,
    pub spread: f64,
    /// Spread was zero (or unusable) and has been replaced by 1.0
    #[serde(default)]
    pub degenerate: bool,
}

impl DimensionStats {
    /// Apply the degenerate-spread policy: a zero, near-zero or non-finite
    /// spread is stored as 1.0 so the transform only centers the value.
    pub fn new(mean: f64, spread: f64) -> Self {
        if !spread.is_finite() || spread.abs() < DEGENERATE_SPREAD_EPSILON {
            Self {
                mean,
                spread: 1.0,
                degenerate: true,
            }
        } else {
            Self {
                mean,
                spread: spread.abs(),
                degenerate: false,
            }
        }
    }

    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.spread
    }

    #[inline]
    pub fn invert(&self, value: f64) -> f64 {
        value * self.spread + self.mean
    }
}

/// Normalization snapshot for one schema
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationStats {
    schema: Arc<DimensionSchema>,
    sample_size: usize,
    dimensions: Vec<DimensionStats>,
}

impl NormalizationStats {
    /// Compute population mean and standard deviation per dimension.
    pub fn compute<'a, I>(schema: &Arc<DimensionSchema>, profiles: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a PsychometricProfile>,
    {
        let dim = schema.len();
        let mut sums = vec![0.0f64; dim];
        let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); dim];
        let mut rows: Vec<&[f64]> = Vec::new();

        for profile in profiles {
            schema.ensure_compatible(profile.schema())?;
            profile.ensure_scale(Scale::Raw)?;
            for ((sum, (lo, hi)), v) in sums.iter_mut().zip(bounds.iter_mut()).zip(profile.values()) {
                *sum += v;
                *lo = lo.min(*v);
                *hi = hi.max(*v);
            }
            rows.push(profile.values());
        }

        if rows.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        let n = rows.len() as f64;
        // a constant column takes its exact value so it centers to 0.0
        let means: Vec<f64> = sums
            .iter()
            .zip(&bounds)
            .map(|(s, (lo, hi))| if lo == hi { *lo } else { s / n })
            .collect();

        let mut sq_diffs = vec![0.0f64; dim];
        for row in &rows {
            for ((acc, v), mean) in sq_diffs.iter_mut().zip(row.iter()).zip(&means) {
                *acc += (v - mean).powi(2);
            }
        }

        let dimensions: Vec<DimensionStats> = means
            .iter()
            .zip(&sq_diffs)
            .map(|(mean, sq)| DimensionStats::new(*mean, (sq / n).sqrt()))
            .collect();

        let stats = Self {
            schema: Arc::clone(schema),
            sample_size: rows.len(),
            dimensions,
        };
        stats.report_degenerate();
        debug!(
            sample_size = stats.sample_size,
            dimensions = dim,
            "normalization stats computed"
        );

        Ok(stats)
    }

    /// Load externally computed stats, one entry per schema dimension.
    pub fn from_map<I, K>(schema: &Arc<DimensionSchema>, sample_size: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, DimensionStats)>,
        K: AsRef<str>,
    {
        let mut slots: Vec<Option<DimensionStats>> = vec![None; schema.len()];
        for (name, entry) in entries {
            let name = name.as_ref();
            let index = schema
                .index_of(name)
                .ok_or_else(|| Error::UnknownDimension(name.to_string()))?;
            if !entry.mean.is_finite() {
                return Err(Error::NonFiniteValue {
                    dimension: name.to_string(),
                    value: entry.mean,
                });
            }
            // a flagged dimension always passes through centered
            let spread = if entry.degenerate { 0.0 } else { entry.spread };
            slots[index] = Some(DimensionStats::new(entry.mean, spread));
        }

        let missing: Vec<String> = slots
            .iter()
            .zip(schema.names())
            .filter(|(slot, _)| slot.is_none())
            .map(|(_, name)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::IncompleteProfile { missing });
        }

        let stats = Self {
            schema: Arc::clone(schema),
            sample_size,
            dimensions: slots.into_iter().flatten().collect(),
        };
        stats.report_degenerate();
        Ok(stats)
    }

    fn report_degenerate(&self) {
        for name in self.degenerate_dimensions() {
            warn!(dimension = name, "degenerate spread, dimension passes through centered");
        }
    }

    pub fn schema(&self) -> &Arc<DimensionSchema> {
        &self.schema
    }

    /// Number of profiles the stats were computed over
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn get(&self, name: &str) -> Option<&DimensionStats> {
        self.schema.index_of(name).map(|i| &self.dimensions[i])
    }

    /// Per-dimension stats in schema order
    pub fn dimensions(&self) -> &[DimensionStats] {
        &self.dimensions
    }

    /// Dimensions whose spread was replaced by 1.0
    pub fn degenerate_dimensions(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema
            .names()
            .zip(&self.dimensions)
            .filter(|(_, s)| s.degenerate)
            .map(|(name, _)| name)
    }

    /// `(value - mean) / spread` for every dimension of a raw profile.
    pub fn normalize(&self, raw: &PsychometricProfile) -> Result<PsychometricProfile> {
        self.schema.ensure_compatible(raw.schema())?;
        raw.ensure_scale(Scale::Raw)?;

        let values = raw
            .values()
            .iter()
            .zip(&self.dimensions)
            .map(|(v, s)| s.apply(*v))
            .collect();
        PsychometricProfile::from_values(&self.schema, values, Scale::Normalized)
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, normalized: &PsychometricProfile) -> Result<PsychometricProfile> {
        self.schema.ensure_compatible(normalized.schema())?;
        normalized.ensure_scale(Scale::Normalized)?;

        let values = normalized
            .values()
            .iter()
            .zip(&self.dimensions)
            .map(|(v, s)| s.invert(*v))
            .collect();
        PsychometricProfile::from_values(&self.schema, values, Scale::Raw)
    }
}

impl Serialize for NormalizationStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let dimensions: BTreeMap<&str, &DimensionStats> =
            self.schema.names().zip(&self.dimensions).collect();

        let mut state = serializer.serialize_struct("NormalizationStats", 3)?;
        state.serialize_field("schema_version", &self.schema.version())?;
        state.serialize_field("sample_size", &self.sample_size)?;
        state.serialize_field("dimensions", &dimensions)?;
        state.end()
    }
}

/// Persisted shape of [`NormalizationStats`], as written by ingestion
#[derive(Debug, Clone, Deserialize)]
pub struct StatsFile {
    pub schema_version: u32,
    #[serde(default)]
    pub sample_size: usize,
    pub dimensions: BTreeMap<String, DimensionStats>,
}

impl StatsFile {
    pub fn into_stats(self, schema: &Arc<DimensionSchema>) -> Result<NormalizationStats> {
        if self.schema_version != schema.version() {
            return Err(Error::SchemaMismatch {
                expected: schema.version(),
                actual: self.schema_version,
            });
        }
        NormalizationStats::from_map(schema, self.sample_size, self.dimensions)
    }
}
