//! JSON input loaders for the command-line host

use anyhow::{Context, Result};
use careermatch_core::{
    CareerCatalog, CareerRecord, DimensionSchema, NormalizationStats, PsychometricProfile, StatsFile,
};
use careermatch_similarity::RankerConfig;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Career records: a JSON array of `{occupation_code, title, cluster_label, raw_profile}`
pub fn load_records(path: &Path) -> Result<Vec<CareerRecord>> {
    let records: Vec<CareerRecord> = read_json(path)?;
    info!("Read {} career records from {:?}", records.len(), path);
    Ok(records)
}

/// Persisted normalization stats
pub fn load_stats(path: &Path, schema: &Arc<DimensionSchema>) -> Result<NormalizationStats> {
    let file: StatsFile = read_json(path)?;
    file.into_stats(schema)
        .with_context(|| format!("Invalid normalization stats in {}", path.display()))
}

/// Build the catalog, computing stats from the records unless a stats file is given
pub fn load_catalog(
    records_path: &Path,
    stats_path: Option<&Path>,
    schema: &Arc<DimensionSchema>,
) -> Result<CareerCatalog> {
    let records = load_records(records_path)?;
    let catalog = match stats_path {
        Some(stats_path) => {
            let stats = load_stats(stats_path, schema)?;
            CareerCatalog::load_with_stats(records, Arc::new(stats))
        }
        None => CareerCatalog::load(schema, records),
    };
    catalog.with_context(|| format!("Failed to build catalog from {}", records_path.display()))
}

/// A person's raw scores: a JSON object `{dimension: value}`
pub fn load_person(path: &Path, schema: &Arc<DimensionSchema>) -> Result<PsychometricProfile> {
    let scores: BTreeMap<String, f64> = read_json(path)?;
    PsychometricProfile::new(schema, scores).with_context(|| format!("Invalid person profile in {}", path.display()))
}

pub fn load_config(path: &Path) -> Result<RankerConfig> {
    let config: RankerConfig = read_json(path)?;
    config
        .validate()
        .with_context(|| format!("Invalid ranker config in {}", path.display()))?;
    Ok(config)
}
