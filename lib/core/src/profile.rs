//! Psychometric profile
//!
//! A profile is a complete mapping from dimension name to score. At the
//! boundary it is built from a key/value mapping; internally it is a dense
//! vector in schema order so that scoring never looks names up.

use crate::schema::{DimensionGroup, DimensionSchema};
use crate::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Units a profile is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Source units (questionnaire 0-100, O*NET level/importance, ...)
    Raw,
    /// Population-relative z-scores
    Normalized,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Raw => f.write_str("raw"),
            Scale::Normalized => f.write_str("normalized"),
        }
    }
}

/// One value per schema dimension, immutable once built
#[derive(Debug, Clone)]
pub struct PsychometricProfile {
    schema: Arc<DimensionSchema>,
    values: Vec<f64>,
    scale: Scale,
}

impl PsychometricProfile {
    /// Build a raw profile from a complete `{dimension: value}` mapping.
    pub fn new<I, K>(schema: &Arc<DimensionSchema>, scores: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Self::with_scale(schema, scores, Scale::Raw)
    }

    /// Build a profile from a complete mapping, tagging it with `scale`.
    ///
    /// Unknown keys are reported before missing ones; the missing list is
    /// exhaustive and in schema order.
    pub fn with_scale<I, K>(schema: &Arc<DimensionSchema>, scores: I, scale: Scale) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots: Vec<Option<f64>> = vec![None; schema.len()];

        for (name, value) in scores {
            let name = name.as_ref();
            let index = schema
                .index_of(name)
                .ok_or_else(|| Error::UnknownDimension(name.to_string()))?;
            slots[index] = Some(value);
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

        let values = slots.into_iter().flatten().collect();
        Self::from_values(schema, values, scale)
    }

    /// Build a profile from a dense vector already in schema order.
    pub fn from_values(schema: &Arc<DimensionSchema>, values: Vec<f64>, scale: Scale) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(Error::DimensionCount {
                expected: schema.len(),
                actual: values.len(),
            });
        }

        if let Some((name, value)) = schema
            .names()
            .zip(values.iter())
            .find(|(_, v)| !v.is_finite())
        {
            return Err(Error::NonFiniteValue {
                dimension: name.to_string(),
                value: *value,
            });
        }

        Ok(Self {
            schema: Arc::clone(schema),
            values,
            scale,
        })
    }

    pub fn schema(&self) -> &Arc<DimensionSchema> {
        &self.schema
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Value of a single dimension
    pub fn get(&self, name: &str) -> Result<f64> {
        self.schema
            .index_of(name)
            .map(|i| self.values[i])
            .ok_or_else(|| Error::UnknownDimension(name.to_string()))
    }

    /// Dense values in schema order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sub-vector of one group; empty when the schema lacks the group
    pub fn group(&self, group: DimensionGroup) -> &[f64] {
        match self.schema.group_range(group) {
            Some(range) => &self.values[range],
            None => &[],
        }
    }

    /// `(dimension, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema.names().zip(self.values.iter().copied())
    }

    pub(crate) fn ensure_scale(&self, expected: Scale) -> Result<()> {
        if self.scale == expected {
            Ok(())
        } else {
            Err(Error::ScaleMismatch {
                expected,
                actual: self.scale,
            })
        }
    }
}

impl PartialEq for PsychometricProfile {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale
            && self.schema.is_compatible(&other.schema)
            && self.values == other.values
    }
}

impl Serialize for PsychometricProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
