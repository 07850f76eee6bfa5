//! Similarity ranker
//!
//! Scores a normalized person profile against candidate careers group by
//! group, combines the group similarities with the configured weights and
//! orders the results. Stateless: every call is a pure function of its
//! inputs and the ranker's configuration.

use crate::config::{ConfigError, DeltaThresholds, GroupWeights, RankerConfig};
use crate::error::{MatchError, Result};
use crate::metric::GroupScorer;
use careermatch_core::{CareerProfile, DimensionGroup, DimensionSchema, PsychometricProfile, Scale};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Signed difference on one dimension, person minus career
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDelta {
    pub dimension: String,
    pub group: DimensionGroup,
    pub delta: f64,
}

/// One ranked career
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub occupation_code: String,
    pub title: String,
    pub cluster_label: String,
    /// Weighted similarity; 1.0 is a perfect fit
    pub score: f64,
    /// Unweighted similarity per group
    pub group_scores: BTreeMap<DimensionGroup, f64>,
    /// Weighted contribution per group; sums to `score`
    pub contributions: BTreeMap<DimensionGroup, f64>,
    /// One entry per schema dimension, in schema order
    pub deltas: Vec<DimensionDelta>,
}

impl MatchResult {
    pub fn delta(&self, dimension: &str) -> Option<f64> {
        self.deltas
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.delta)
    }

    /// Dimensions where the person clearly exceeds the career, largest first
    pub fn strengths(&self, thresholds: &DeltaThresholds) -> Vec<&DimensionDelta> {
        let mut picked: Vec<&DimensionDelta> = self
            .deltas
            .iter()
            .filter(|d| d.delta > thresholds.strength)
            .collect();
        picked.sort_by(|a, b| b.delta.total_cmp(&a.delta));
        picked
    }

    /// Dimensions where the person clearly falls short, largest gap first
    pub fn challenges(&self, thresholds: &DeltaThresholds) -> Vec<&DimensionDelta> {
        let mut picked: Vec<&DimensionDelta> = self
            .deltas
            .iter()
            .filter(|d| d.delta < thresholds.challenge)
            .collect();
        picked.sort_by(|a, b| a.delta.total_cmp(&b.delta));
        picked
    }
}

/// Scoring plan for one schema
#[derive(Debug)]
struct GroupPlan {
    group: DimensionGroup,
    range: Range<usize>,
    weight: f64,
    scorer: Arc<dyn GroupScorer>,
}

/// Weighted multi-group ranker
#[derive(Debug, Clone)]
pub struct Ranker {
    config: RankerConfig,
    scorers: BTreeMap<DimensionGroup, Arc<dyn GroupScorer>>,
}

impl Ranker {
    /// Create a new ranker with the given configuration
    pub fn new(config: RankerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let scorers = DimensionGroup::ALL
            .iter()
            .map(|g| (*g, Arc::new(config.metric_for(*g)) as Arc<dyn GroupScorer>))
            .collect();
        Ok(Self { config, scorers })
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Replace the scoring strategy of one group
    pub fn with_scorer<S>(mut self, group: DimensionGroup, scorer: S) -> Self
    where
        S: GroupScorer + 'static,
    {
        self.scorers.insert(group, Arc::new(scorer));
        self
    }

    /// Create a ranker with some group weights overridden
    ///
    /// Groups not in the overrides keep their current weights.
    pub fn with_weights(&self, overrides: &GroupWeights) -> std::result::Result<Ranker, ConfigError> {
        let mut config = self.config.clone();
        config.weights = config.weights.merged(overrides);
        config.validate()?;
        Ok(Ranker {
            config,
            scorers: self.scorers.clone(),
        })
    }

    fn plan(&self, schema: &DimensionSchema) -> Result<Vec<GroupPlan>> {
        let resolved = self.config.weights.resolve(schema)?;
        Ok(resolved
            .into_iter()
            .map(|(group, range, weight)| GroupPlan {
                group,
                range,
                weight,
                scorer: Arc::clone(&self.scorers[&group]),
            })
            .collect())
    }

    /// Score a single career against the person
    pub fn score(&self, person: &PsychometricProfile, career: &CareerProfile) -> Result<MatchResult> {
        ensure_normalized(person, "person")?;
        let plan = self.plan(person.schema())?;
        score_one(&plan, person, career)
    }

    /// Rank candidates against a normalized person profile.
    ///
    /// Results are ordered by score descending, then occupation code
    /// ascending, and truncated to `top_k`. An empty candidate set is an
    /// error, never an empty ranking.
    pub fn rank<'a, I>(&self, person: &PsychometricProfile, candidates: I, top_k: usize) -> Result<Vec<MatchResult>>
    where
        I: IntoIterator<Item = &'a CareerProfile>,
    {
        if top_k == 0 {
            return Err(ConfigError::InvalidTopK.into());
        }
        ensure_normalized(person, "person")?;

        let candidates: Vec<&CareerProfile> = candidates.into_iter().collect();
        if candidates.is_empty() {
            return Err(MatchError::EmptyCandidateSet { cluster: None });
        }

        let plan = self.plan(person.schema())?;
        let mut results = candidates
            .par_iter()
            .map(|career| score_one(&plan, person, career))
            .collect::<Result<Vec<MatchResult>>>()?;

        results.sort_by(compare_results);
        results.truncate(top_k);

        debug!(
            candidates = candidates.len(),
            returned = results.len(),
            best = results.first().map(|r| r.score).unwrap_or_default(),
            "ranking complete"
        );

        Ok(results)
    }
}

/// Score descending, occupation code ascending
fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.occupation_code.cmp(&b.occupation_code))
}

fn ensure_normalized(profile: &PsychometricProfile, subject: &str) -> Result<()> {
    if profile.scale() == Scale::Normalized {
        Ok(())
    } else {
        Err(MatchError::NotNormalized {
            subject: subject.to_string(),
        })
    }
}

fn score_one(plan: &[GroupPlan], person: &PsychometricProfile, career: &CareerProfile) -> Result<MatchResult> {
    let target = career.normalized();
    ensure_normalized(target, &career.occupation_code)?;
    if !person.schema().is_compatible(target.schema()) {
        return Err(MatchError::SchemaMismatch {
            occupation_code: Some(career.occupation_code.clone()),
            person: person.schema().version(),
            career: target.schema().version(),
        });
    }

    let p = person.values();
    let c = target.values();

    let mut score = 0.0;
    let mut group_scores = BTreeMap::new();
    let mut contributions = BTreeMap::new();
    for step in plan {
        let similarity = step
            .scorer
            .similarity(&p[step.range.clone()], &c[step.range.clone()]);
        let contribution = similarity * step.weight;
        score += contribution;
        group_scores.insert(step.group, similarity);
        contributions.insert(step.group, contribution);
    }

    let deltas = person
        .schema()
        .dimensions()
        .iter()
        .zip(p.iter().zip(c))
        .map(|(dim, (pv, cv))| DimensionDelta {
            dimension: dim.name.clone(),
            group: dim.group,
            delta: pv - cv,
        })
        .collect();

    Ok(MatchResult {
        occupation_code: career.occupation_code.clone(),
        title: career.title.clone(),
        cluster_label: career.cluster_label.clone(),
        score,
        group_scores,
        contributions,
        deltas,
    })
}
