//! Explainability for match results
//!
//! Output structures for the narrative layer: per-group contributions,
//! per-dimension deltas and the strengths/challenges split, plus summary
//! statistics over one ranking.

use crate::config::DeltaThresholds;
use crate::engine::MatchOutcome;
use crate::rank::{DimensionDelta, MatchResult};
use careermatch_core::{DimensionGroup, PsychometricProfile};
use serde::Serialize;
use std::collections::BTreeMap;

/// A match result with its score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedMatch {
    pub occupation_code: String,
    pub title: String,
    pub cluster_label: String,
    /// Overall weighted similarity score
    pub score: f64,
    /// Unweighted similarity per group
    pub group_scores: BTreeMap<DimensionGroup, f64>,
    /// Per-group score contributions (already weighted)
    pub explain: BTreeMap<DimensionGroup, f64>,
    pub deltas: Vec<DimensionDelta>,
    pub strengths: Vec<DimensionDelta>,
    pub challenges: Vec<DimensionDelta>,
}

impl ExplainedMatch {
    pub fn from_result(result: &MatchResult, thresholds: &DeltaThresholds) -> Self {
        Self {
            occupation_code: result.occupation_code.clone(),
            title: result.title.clone(),
            cluster_label: result.cluster_label.clone(),
            score: result.score,
            group_scores: result.group_scores.clone(),
            explain: result.contributions.clone(),
            deltas: result.deltas.clone(),
            strengths: result.strengths(thresholds).into_iter().cloned().collect(),
            challenges: result.challenges(thresholds).into_iter().cloned().collect(),
        }
    }
}

/// Summary statistics for one ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingStats {
    /// Number of candidates considered
    pub candidates_count: usize,
    /// Number of results returned
    pub results_count: usize,
    pub avg_score: f64,
    pub best_score: f64,
    /// Group that contributed most to the best result
    pub top_contributing_group: Option<DimensionGroup>,
}

impl RankingStats {
    /// Compute stats from ranked results
    pub fn compute(results: &[MatchResult], candidates_count: usize) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_group: None,
            };
        };

        let avg_score = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;

        // BTreeMap order plus max_by keeping the last maximum; reversed so the
        // earliest group wins a tie
        let top_contributing_group = best
            .contributions
            .iter()
            .rev()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(group, _)| *group);

        Self {
            candidates_count,
            results_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_group,
        }
    }
}

/// Serializable report of one match
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// The person, normalized with the catalog's stats
    pub person: PsychometricProfile,
    pub stats: RankingStats,
    pub result: Vec<ExplainedMatch>,
}

impl MatchReport {
    pub fn from_outcome(outcome: &MatchOutcome, thresholds: &DeltaThresholds) -> Self {
        Self {
            generation: outcome.generation,
            cluster: outcome.cluster.clone(),
            person: outcome.person.clone(),
            stats: RankingStats::compute(&outcome.results, outcome.candidates_count),
            result: outcome
                .results
                .iter()
                .map(|r| ExplainedMatch::from_result(r, thresholds))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careermatch_core::{DimensionSchema, Scale};
    use std::sync::Arc;

    fn create_test_result(code: &str, score: f64) -> MatchResult {
        let mut contributions = BTreeMap::new();
        contributions.insert(DimensionGroup::Traits, score * 0.2);
        contributions.insert(DimensionGroup::Interests, score * 0.5);
        contributions.insert(DimensionGroup::Values, score * 0.3);

        MatchResult {
            occupation_code: code.to_string(),
            title: format!("Occupation {}", code),
            cluster_label: "technology".to_string(),
            score,
            group_scores: contributions.keys().map(|g| (*g, score)).collect(),
            contributions,
            deltas: vec![
                DimensionDelta {
                    dimension: "analytical".to_string(),
                    group: DimensionGroup::Traits,
                    delta: 1.2,
                },
                DimensionDelta {
                    dimension: "arts".to_string(),
                    group: DimensionGroup::Interests,
                    delta: -0.9,
                },
                DimensionDelta {
                    dimension: "security".to_string(),
                    group: DimensionGroup::Values,
                    delta: 0.1,
                },
            ],
        }
    }

    #[test]
    fn test_explained_match_creation() {
        let explained = ExplainedMatch::from_result(&create_test_result("15-1252.00", 0.85), &DeltaThresholds::default());

        assert_eq!(explained.occupation_code, "15-1252.00");
        assert_eq!(explained.score, 0.85);
        assert_eq!(explained.explain.len(), 3);
        assert_eq!(explained.deltas.len(), 3);
        assert_eq!(explained.strengths.len(), 1);
        assert_eq!(explained.strengths[0].dimension, "analytical");
        assert_eq!(explained.challenges.len(), 1);
        assert_eq!(explained.challenges[0].dimension, "arts");
    }

    #[test]
    fn test_ranking_stats() {
        let results = vec![
            create_test_result("1", 0.95),
            create_test_result("2", 0.85),
            create_test_result("3", 0.75),
        ];

        let stats = RankingStats::compute(&results, 10);

        assert_eq!(stats.candidates_count, 10);
        assert_eq!(stats.results_count, 3);
        assert_eq!(stats.best_score, 0.95);
        assert!((stats.avg_score - 0.85).abs() < 1e-9);
        assert_eq!(stats.top_contributing_group, Some(DimensionGroup::Interests));
    }

    #[test]
    fn test_empty_stats() {
        let stats = RankingStats::compute(&[], 5);

        assert_eq!(stats.candidates_count, 5);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
        assert_eq!(stats.top_contributing_group, None);
    }

    #[test]
    fn test_report_serialization() {
        let schema = Arc::new(
            DimensionSchema::builder(1)
                .group(DimensionGroup::Traits, ["analytical"])
                .build()
                .unwrap(),
        );
        let report = MatchReport {
            generation: 3,
            cluster: None,
            person: PsychometricProfile::from_values(&schema, vec![0.75], Scale::Normalized).unwrap(),
            stats: RankingStats::compute(&[create_test_result("1", 0.9)], 1),
            result: vec![ExplainedMatch::from_result(
                &create_test_result("1", 0.9),
                &DeltaThresholds::default(),
            )],
        };
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["generation"], 3);
        assert!(json.get("cluster").is_none());
        assert_eq!(json["person"]["analytical"], 0.75);
        assert_eq!(json["stats"]["top_contributing_group"], "interests");
        assert_eq!(json["result"][0]["strengths"][0]["dimension"], "analytical");
        assert!(json["result"][0]["explain"]["values"].is_number());
    }
}
