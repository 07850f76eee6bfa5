//! Per-group similarity metrics
//!
//! Each dimension group is scored by comparing the person's sub-vector with
//! the career's sub-vector. All metrics return a similarity where higher is
//! better and identical sub-vectors score 1.0, the maximum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoring strategy for one dimension group.
///
/// Implementations must be pure: the ranker calls them concurrently.
pub trait GroupScorer: fmt::Debug + Send + Sync {
    /// Similarity between two equally sized sub-vectors
    fn similarity(&self, person: &[f64], career: &[f64]) -> f64;
}

/// Built-in metrics
///
/// The first three are symmetric. `CapacityFit` and `RewardedAlignment` read
/// the career side as the requirement and only penalise the person falling
/// short of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMetric {
    /// Angle between the sub-vectors, in [-1.0, 1.0]
    Cosine,
    /// `1 / (1 + L2)`, in (0.0, 1.0]
    #[default]
    Euclidean,
    /// `1 / (1 + mean absolute difference)`, in (0.0, 1.0]
    Manhattan,
    /// `1 / (1 + mean shortfall)`: being under the career's level hurts,
    /// being over it does not help. Suited to aptitudes.
    CapacityFit,
    /// Like `CapacityFit`, but only over dimensions the career rewards
    /// (normalized value above 0); the rest are ignored. Suited to values.
    RewardedAlignment,
}

impl GroupScorer for GroupMetric {
    fn similarity(&self, person: &[f64], career: &[f64]) -> f64 {
        match self {
            GroupMetric::Cosine => cosine_similarity(person, career),
            GroupMetric::Euclidean => euclidean_similarity(person, career),
            GroupMetric::Manhattan => manhattan_similarity(person, career),
            GroupMetric::CapacityFit => capacity_fit(person, career),
            GroupMetric::RewardedAlignment => rewarded_alignment(person, career),
        }
    }
}

/// Cosine similarity.
///
/// A zero vector has no direction: two zero vectors are identical (1.0),
/// a zero vector against a non-zero one scores 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        (false, false) => (dot / (norm_a * norm_b)).clamp(-1.0, 1.0),
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

pub fn euclidean_similarity(a: &[f64], b: &[f64]) -> f64 {
    1.0 / (1.0 + euclidean_distance(a, b))
}

pub fn manhattan_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let mean_abs = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f64>() / a.len() as f64;
    1.0 / (1.0 + mean_abs)
}

pub fn capacity_fit(person: &[f64], career: &[f64]) -> f64 {
    if person.is_empty() {
        return 1.0;
    }
    let shortfall: f64 = person.iter().zip(career).map(|(p, c)| (c - p).max(0.0)).sum();
    1.0 / (1.0 + shortfall / person.len() as f64)
}

/// A career rewarding nothing in the group is fully aligned with anyone.
pub fn rewarded_alignment(person: &[f64], career: &[f64]) -> f64 {
    let (shortfall, rewarded) = person
        .iter()
        .zip(career)
        .filter(|(_, c)| **c > 0.0)
        .fold((0.0, 0usize), |(sum, n), (p, c)| (sum + (c - p).max(0.0), n + 1));
    if rewarded == 0 {
        return 1.0;
    }
    1.0 / (1.0 + shortfall / rewarded as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 1.0], &[-1.0, -1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 1.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_euclidean_similarity() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_similarity(&[0.0, 0.0], &[3.0, 4.0]), 1.0 / 6.0);
        assert_eq!(euclidean_similarity(&[0.3, -1.2], &[0.3, -1.2]), 1.0);
    }

    #[test]
    fn test_manhattan_similarity() {
        assert_eq!(manhattan_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.5);
        assert_eq!(manhattan_similarity(&[], &[]), 1.0);
    }

    #[test]
    fn test_identical_vectors_score_maximum() {
        let v = [0.4, -1.1, 2.0, 0.0];
        let w = [1.4, 0.1, -2.0, 0.5];
        for metric in [
            GroupMetric::Cosine,
            GroupMetric::Euclidean,
            GroupMetric::Manhattan,
            GroupMetric::CapacityFit,
            GroupMetric::RewardedAlignment,
        ] {
            let same = metric.similarity(&v, &v);
            assert!((same - 1.0).abs() < 1e-12, "{:?}", metric);
            assert!(metric.similarity(&v, &w) < same, "{:?}", metric);
        }
    }

    #[test]
    fn test_capacity_fit() {
        // over the requirement on every dimension
        assert_eq!(capacity_fit(&[2.0, 1.5], &[1.0, 0.5]), 1.0);
        // short by 1.0 on one of two dimensions
        assert_eq!(capacity_fit(&[0.0, 1.0], &[1.0, 0.5]), 1.0 / 1.5);
        // extra capacity elsewhere does not offset a shortfall
        assert_eq!(capacity_fit(&[0.0, 9.0], &[1.0, 0.5]), 1.0 / 1.5);
        assert!(capacity_fit(&[1.0, 0.5], &[2.0, 0.5]) < capacity_fit(&[1.0, 0.5], &[1.5, 0.5]));
        assert_eq!(capacity_fit(&[], &[]), 1.0);
    }

    #[test]
    fn test_rewarded_alignment() {
        // only the first dimension is rewarded; the second is ignored
        assert_eq!(rewarded_alignment(&[1.0, -3.0], &[1.0, -0.5]), 1.0);
        assert_eq!(rewarded_alignment(&[0.0, 5.0], &[1.0, -0.5]), 0.5);
        assert_eq!(rewarded_alignment(&[2.0, 0.0], &[1.0, 0.0]), 1.0);
        // nothing rewarded
        assert_eq!(rewarded_alignment(&[-2.0, 3.0], &[-1.0, 0.0]), 1.0);
        // a capacity metric would penalise the unrewarded shortfall
        assert!(capacity_fit(&[1.0, -3.0], &[1.0, -0.5]) < 1.0);
    }

    #[test]
    fn test_metric_serde() {
        assert_eq!(serde_json::to_string(&GroupMetric::CapacityFit).unwrap(), "\"capacity_fit\"");
        let parsed: GroupMetric = serde_json::from_str("\"rewarded_alignment\"").unwrap();
        assert_eq!(parsed, GroupMetric::RewardedAlignment);
        assert_eq!(serde_json::to_string(&GroupMetric::Cosine).unwrap(), "\"cosine\"");
        let parsed: GroupMetric = serde_json::from_str("\"manhattan\"").unwrap();
        assert_eq!(parsed, GroupMetric::Manhattan);
        assert_eq!(GroupMetric::default(), GroupMetric::Euclidean);
    }
}
