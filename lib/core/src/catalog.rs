//! Career catalog
//!
//! The immutable set of careers, normalized once at load with the stats of
//! the same build, and the handle that swaps whole catalog snapshots.

use crate::normalize::NormalizationStats;
use crate::profile::PsychometricProfile;
use crate::schema::DimensionSchema;
use crate::{Error, Result};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A career as delivered by ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerRecord {
    pub occupation_code: String,
    pub title: String,
    pub cluster_label: String,
    pub raw_profile: BTreeMap<String, f64>,
}

/// A career in the catalog, with its profile in both scales
#[derive(Debug, Clone)]
pub struct CareerProfile {
    pub occupation_code: String,
    pub title: String,
    pub cluster_label: String,
    raw: PsychometricProfile,
    normalized: PsychometricProfile,
}

impl CareerProfile {
    pub fn raw(&self) -> &PsychometricProfile {
        &self.raw
    }

    pub fn normalized(&self) -> &PsychometricProfile {
        &self.normalized
    }
}

/// Immutable collection of careers keyed by occupation code.
///
/// Careers are normalized with the catalog's own stats at load time, so a
/// catalog can never be scored against stats it was not built with.
#[derive(Debug)]
pub struct CareerCatalog {
    generation: u64,
    stats: Arc<NormalizationStats>,
    careers: Vec<CareerProfile>,
    index: AHashMap<String, usize>,
}

impl CareerCatalog {
    /// Load records and compute normalization stats over them.
    pub fn load<I>(schema: &Arc<DimensionSchema>, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = CareerRecord>,
    {
        let raw = Self::build_raw(schema, records)?;
        let stats = NormalizationStats::compute(schema, raw.iter().map(|(_, p)| p))?;
        Self::assemble(raw, Arc::new(stats))
    }

    /// Load records using stats computed elsewhere.
    pub fn load_with_stats<I>(records: I, stats: Arc<NormalizationStats>) -> Result<Self>
    where
        I: IntoIterator<Item = CareerRecord>,
    {
        let raw = Self::build_raw(stats.schema(), records)?;
        Self::assemble(raw, stats)
    }

    fn build_raw<I>(
        schema: &Arc<DimensionSchema>,
        records: I,
    ) -> Result<Vec<(CareerRecord, PsychometricProfile)>>
    where
        I: IntoIterator<Item = CareerRecord>,
    {
        let mut seen = ahash::AHashSet::new();
        let mut out = Vec::new();

        for mut record in records {
            if !seen.insert(record.occupation_code.clone()) {
                return Err(Error::DuplicateOccupation(record.occupation_code));
            }
            let scores = std::mem::take(&mut record.raw_profile);
            let profile = PsychometricProfile::new(schema, scores)
                .map_err(|e| e.for_record(record.occupation_code.as_str()))?;
            out.push((record, profile));
        }

        if out.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(out)
    }

    fn assemble(
        raw: Vec<(CareerRecord, PsychometricProfile)>,
        stats: Arc<NormalizationStats>,
    ) -> Result<Self> {
        let mut careers = Vec::with_capacity(raw.len());
        for (record, profile) in raw {
            let normalized = stats
                .normalize(&profile)
                .map_err(|e| e.for_record(record.occupation_code.as_str()))?;
            careers.push(CareerProfile {
                occupation_code: record.occupation_code,
                title: record.title,
                cluster_label: record.cluster_label,
                raw: profile,
                normalized,
            });
        }

        let index = careers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.occupation_code.clone(), i))
            .collect();

        let catalog = Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            stats,
            careers,
            index,
        };
        info!(
            generation = catalog.generation,
            careers = catalog.careers.len(),
            degenerate = catalog.stats.degenerate_dimensions().count(),
            "career catalog loaded"
        );
        Ok(catalog)
    }

    /// Build counter; strictly increasing across catalogs in one process
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn schema(&self) -> &Arc<DimensionSchema> {
        self.stats.schema()
    }

    pub fn stats(&self) -> &Arc<NormalizationStats> {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.careers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.careers.is_empty()
    }

    pub fn get(&self, occupation_code: &str) -> Result<&CareerProfile> {
        self.index
            .get(occupation_code)
            .map(|i| &self.careers[*i])
            .ok_or_else(|| Error::NotFound(occupation_code.to_string()))
    }

    /// Careers in load order
    pub fn iter(&self) -> std::slice::Iter<'_, CareerProfile> {
        self.careers.iter()
    }

    /// Careers carrying `label`, in load order. Borrows, never copies.
    pub fn filter_by_cluster(&self, label: &str) -> Vec<&CareerProfile> {
        self.careers
            .iter()
            .filter(|c| c.cluster_label == label)
            .collect()
    }

    /// Distinct cluster labels, sorted
    pub fn cluster_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.careers.iter().map(|c| c.cluster_label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

impl<'a> IntoIterator for &'a CareerCatalog {
    type Item = &'a CareerProfile;
    type IntoIter = std::slice::Iter<'a, CareerProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.careers.iter()
    }
}

/// Shared handle to the current catalog snapshot.
///
/// Readers take an `Arc` for the duration of a request; `replace` swaps the
/// whole snapshot at once, so a reader sees either the old or the new one.
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<CareerCatalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: CareerCatalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn current(&self) -> Arc<CareerCatalog> {
        self.current.read().clone()
    }

    /// Install a rebuilt catalog, returning the one it replaced
    pub fn replace(&self, catalog: CareerCatalog) -> Arc<CareerCatalog> {
        let next = Arc::new(catalog);
        let previous = std::mem::replace(&mut *self.current.write(), Arc::clone(&next));
        info!(
            from = previous.generation(),
            to = next.generation(),
            "career catalog replaced"
        );
        previous
    }
}
