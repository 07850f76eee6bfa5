//! Match engine
//!
//! Ties the pieces together for one request: take the current catalog
//! snapshot, normalize the person with that snapshot's stats, apply the
//! cluster filter and rank.

use crate::cluster::{select_candidates, ClusterAssigner, ClusterFilter, NearestCentroid};
use crate::error::{MatchError, Result};
use crate::rank::{MatchResult, Ranker};
use careermatch_core::{CatalogHandle, PsychometricProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Per-request options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub cluster: ClusterFilter,
    /// Overrides the ranker's configured `top_k`
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Everything the narrative layer needs from one match
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    /// Catalog generation the request was served from
    pub generation: u64,
    /// Cluster the candidates were restricted to
    pub cluster: Option<String>,
    pub candidates_count: usize,
    /// The person, normalized with the catalog's stats
    pub person: PsychometricProfile,
    pub results: Vec<MatchResult>,
}

pub struct MatchEngine {
    handle: CatalogHandle,
    ranker: Ranker,
    assigner: Arc<dyn ClusterAssigner>,
}

impl MatchEngine {
    pub fn new(handle: CatalogHandle, ranker: Ranker) -> Self {
        Self {
            handle,
            ranker,
            assigner: Arc::new(NearestCentroid),
        }
    }

    pub fn with_assigner<A>(mut self, assigner: A) -> Self
    where
        A: ClusterAssigner + 'static,
    {
        self.assigner = Arc::new(assigner);
        self
    }

    pub fn handle(&self) -> &CatalogHandle {
        &self.handle
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Rank careers for a person's raw profile
    pub fn match_person(&self, raw_person: &PsychometricProfile, request: &MatchRequest) -> Result<MatchOutcome> {
        let catalog = self.handle.current();
        if !raw_person.schema().is_compatible(catalog.schema()) {
            return Err(MatchError::SchemaMismatch {
                occupation_code: None,
                person: raw_person.schema().version(),
                career: catalog.schema().version(),
            });
        }
        let person = catalog.stats().normalize(raw_person)?;

        let cluster = match &request.cluster {
            ClusterFilter::All => None,
            ClusterFilter::Label(label) => Some(label.clone()),
            ClusterFilter::Infer => self.assigner.assign(&person, &catalog),
        };

        let candidates = select_candidates(&catalog, cluster.as_deref())?;
        let candidates_count = candidates.len();
        let top_k = request.top_k.unwrap_or(self.ranker.config().top_k);
        let results = self.ranker.rank(&person, candidates, top_k)?;

        debug!(
            generation = catalog.generation(),
            cluster = cluster.as_deref().unwrap_or("*"),
            candidates = candidates_count,
            "match served"
        );

        Ok(MatchOutcome {
            generation: catalog.generation(),
            cluster,
            candidates_count,
            person,
            results,
        })
    }
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("generation", &self.handle.current().generation())
            .field("ranker", &self.ranker)
            .field("assigner", &self.assigner)
            .finish()
    }
}
