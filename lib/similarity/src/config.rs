//! Ranker configuration
//!
//! Group weights, per-group metrics, delta thresholds and the default
//! result count. Deserialisable from JSON, validated before use.

use crate::metric::GroupMetric;
use careermatch_core::{DimensionGroup, DimensionSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Default number of results per ranking
pub const DEFAULT_TOP_K: usize = 20;

/// Weight of a group nobody configured
pub const DEFAULT_GROUP_WEIGHT: f64 = 1.0;

/// Relative importance of each dimension group.
///
/// Groups that are not mentioned keep [`DEFAULT_GROUP_WEIGHT`], so an empty
/// table means equal weighting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct GroupWeights {
    weights: BTreeMap<DimensionGroup, f64>,
}

impl GroupWeights {
    /// Equal weighting
    pub fn equal() -> Self {
        Self::default()
    }

    /// Build from a `{group_name: weight}` table
    pub fn from_map<I, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut weights = Self::default();
        for (name, weight) in entries {
            let group = name
                .as_ref()
                .parse::<DimensionGroup>()
                .map_err(|_| ConfigError::UnknownGroup(name.as_ref().to_string()))?;
            weights = weights.with(group, weight)?;
        }
        Ok(weights)
    }

    /// Set one group's weight
    pub fn with(mut self, group: DimensionGroup, weight: f64) -> Result<Self, ConfigError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                group: group.to_string(),
                weight,
            });
        }
        self.weights.insert(group, weight);
        Ok(self)
    }

    pub fn get(&self, group: DimensionGroup) -> f64 {
        self.weights
            .get(&group)
            .copied()
            .unwrap_or(DEFAULT_GROUP_WEIGHT)
    }

    /// Apply overrides on top of these weights
    pub fn merged(&self, overrides: &GroupWeights) -> GroupWeights {
        let mut weights = self.weights.clone();
        weights.extend(overrides.weights.iter().map(|(g, w)| (*g, *w)));
        GroupWeights { weights }
    }

    /// Weights of the groups present in `schema`, normalized to sum to 1.0,
    /// paired with each group's index range.
    pub fn resolve(&self, schema: &DimensionSchema) -> Result<Vec<(DimensionGroup, Range<usize>, f64)>, ConfigError> {
        let present: Vec<(DimensionGroup, Range<usize>, f64)> = schema
            .groups()
            .filter_map(|g| schema.group_range(g).map(|r| (g, r, self.get(g))))
            .collect();

        let total: f64 = present.iter().map(|(_, _, w)| w).sum();
        if total <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        Ok(present
            .into_iter()
            .map(|(g, r, w)| (g, r, w / total))
            .collect())
    }
}

impl TryFrom<BTreeMap<String, f64>> for GroupWeights {
    type Error = ConfigError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        GroupWeights::from_map(map)
    }
}

impl From<GroupWeights> for BTreeMap<String, f64> {
    fn from(weights: GroupWeights) -> Self {
        weights
            .weights
            .into_iter()
            .map(|(g, w)| (g.to_string(), w))
            .collect()
    }
}

/// Delta cut-offs, in standard deviations, for strengths and challenges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaThresholds {
    /// A delta above this is a strength
    pub strength: f64,
    /// A delta below this is a challenge
    pub challenge: f64,
}

impl Default for DeltaThresholds {
    fn default() -> Self {
        Self {
            strength: 0.5,
            challenge: -0.5,
        }
    }
}

impl DeltaThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.strength.is_finite() && self.strength >= 0.0)
            || !(self.challenge.is_finite() && self.challenge <= 0.0)
        {
            return Err(ConfigError::InvalidThresholds {
                strength: self.strength,
                challenge: self.challenge,
            });
        }
        Ok(())
    }
}

/// Full ranker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    #[serde(default)]
    pub weights: GroupWeights,

    /// Metric per group; unlisted groups use [`GroupMetric::default`]
    #[serde(default)]
    pub metrics: BTreeMap<DimensionGroup, GroupMetric>,

    #[serde(default)]
    pub thresholds: DeltaThresholds,

    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            weights: GroupWeights::default(),
            metrics: BTreeMap::new(),
            thresholds: DeltaThresholds::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RankerConfig {
    /// Same metric for every group
    pub fn with_metric(mut self, metric: GroupMetric) -> Self {
        self.metrics = DimensionGroup::ALL.iter().map(|g| (*g, metric)).collect();
        self
    }

    pub fn metric_for(&self, group: DimensionGroup) -> GroupMetric {
        self.metrics.get(&group).copied().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }
        self.thresholds.validate()?;
        if DimensionGroup::ALL.iter().all(|g| self.weights.get(*g) == 0.0) {
            return Err(ConfigError::ZeroTotalWeight);
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown dimension group '{0}'")]
    UnknownGroup(String),

    #[error("Group '{group}' has invalid weight {weight}")]
    InvalidWeight { group: String, weight: f64 },

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,

    #[error("Invalid delta thresholds: strength {strength} must be >= 0, challenge {challenge} must be <= 0")]
    InvalidThresholds { strength: f64, challenge: f64 },

    #[error("top_k must be at least 1")]
    InvalidTopK,
}
