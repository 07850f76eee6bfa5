//! Cluster filter
//!
//! Narrows the catalog to one cluster before ranking. Cluster labels are
//! opaque: they come from whatever clustering ran at ingestion time.

use crate::error::{MatchError, Result};
use crate::metric::euclidean_similarity;
use careermatch_core::{CareerCatalog, CareerProfile, PsychometricProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which careers are eligible for ranking
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterFilter {
    /// Every career in the catalog
    #[default]
    All,
    /// Only careers with this label
    Label(String),
    /// Only careers in the cluster the person is assigned to
    Infer,
}

/// Assigns a person to one of the catalog's clusters
pub trait ClusterAssigner: fmt::Debug + Send + Sync {
    /// `None` when no cluster can be chosen
    fn assign(&self, person: &PsychometricProfile, catalog: &CareerCatalog) -> Option<String>;
}

/// Picks the cluster whose centroid (mean normalized profile) is closest
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestCentroid;

impl NearestCentroid {
    /// Mean normalized profile per cluster label, ordered by label
    pub fn centroids(catalog: &CareerCatalog) -> BTreeMap<&str, Vec<f64>> {
        let dim = catalog.schema().len();
        let mut sums: BTreeMap<&str, (Vec<f64>, usize)> = BTreeMap::new();

        for career in catalog {
            let (sum, count) = sums
                .entry(career.cluster_label.as_str())
                .or_insert_with(|| (vec![0.0; dim], 0));
            for (acc, v) in sum.iter_mut().zip(career.normalized().values()) {
                *acc += v;
            }
            *count += 1;
        }

        sums.into_iter()
            .map(|(label, (sum, count))| {
                let mean = sum.into_iter().map(|s| s / count as f64).collect();
                (label, mean)
            })
            .collect()
    }
}

impl ClusterAssigner for NearestCentroid {
    fn assign(&self, person: &PsychometricProfile, catalog: &CareerCatalog) -> Option<String> {
        if !person.schema().is_compatible(catalog.schema()) {
            return None;
        }

        let mut best: Option<(&str, f64)> = None;
        for (label, centroid) in Self::centroids(catalog) {
            let similarity = euclidean_similarity(person.values(), &centroid);
            // labels arrive sorted, so keeping the first maximum breaks ties by label
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((label, similarity));
            }
        }
        best.map(|(label, _)| label.to_string())
    }
}

/// Careers eligible under `cluster`; an empty selection is an error
pub fn select_candidates<'c>(catalog: &'c CareerCatalog, cluster: Option<&str>) -> Result<Vec<&'c CareerProfile>> {
    let candidates: Vec<&CareerProfile> = match cluster {
        Some(label) => catalog.filter_by_cluster(label),
        None => catalog.iter().collect(),
    };

    if candidates.is_empty() {
        return Err(MatchError::EmptyCandidateSet {
            cluster: cluster.map(str::to_string),
        });
    }
    Ok(candidates)
}
