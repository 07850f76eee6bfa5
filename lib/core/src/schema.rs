//! Dimension schema
//!
//! The fixed, ordered catalog of psychometric dimensions every profile is
//! built against. Dimensions are grouped into five groups which occupy
//! contiguous ranges of the dense vector, in [`DimensionGroup::ALL`] order.

use crate::{Error, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Version of the built-in 27-dimension schema.
pub const STANDARD_SCHEMA_VERSION: u32 = 1;

const STANDARD_TRAITS: [&str; 6] = [
    "analytical",
    "creative",
    "social",
    "leadership",
    "detail_oriented",
    "adaptability",
];

const STANDARD_INTERESTS: [&str; 6] = [
    "technology",
    "science",
    "business",
    "arts",
    "social_impact",
    "hands_on",
];

const STANDARD_APTITUDES: [&str; 5] = [
    "logical_reasoning",
    "numerical_reasoning",
    "verbal_reasoning",
    "spatial_reasoning",
    "memory",
];

const STANDARD_VALUES: [&str; 6] = [
    "autonomy",
    "stability",
    "financial_security",
    "prestige",
    "helping_others",
    "work_life_balance",
];

const STANDARD_WORK_STYLES: [&str; 4] = ["team_based", "structure", "pace", "ambiguity_tolerance"];

/// Psychometric dimension group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionGroup {
    /// Characteristics the person has
    Traits,
    /// What the person is drawn to
    Interests,
    /// What the person is good at
    Aptitudes,
    /// What the person cares about long-term
    Values,
    /// The environment the person enjoys working in
    WorkStyles,
}

impl DimensionGroup {
    /// All groups in canonical schema order
    pub const ALL: [DimensionGroup; 5] = [
        DimensionGroup::Traits,
        DimensionGroup::Interests,
        DimensionGroup::Aptitudes,
        DimensionGroup::Values,
        DimensionGroup::WorkStyles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionGroup::Traits => "traits",
            DimensionGroup::Interests => "interests",
            DimensionGroup::Aptitudes => "aptitudes",
            DimensionGroup::Values => "values",
            DimensionGroup::WorkStyles => "work_styles",
        }
    }
}

impl fmt::Display for DimensionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimensionGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DimensionGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown dimension group '{}'", s))
    }
}

/// A single named dimension and the group it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub group: DimensionGroup,
}

/// Ordered set of dimensions a profile must cover.
#[derive(Debug, Clone)]
pub struct DimensionSchema {
    version: u32,
    dimensions: Vec<Dimension>,
    index: AHashMap<String, usize>,
    groups: Vec<(DimensionGroup, Range<usize>)>,
}

static STANDARD: OnceLock<Arc<DimensionSchema>> = OnceLock::new();

impl DimensionSchema {
    /// The process-wide 27-dimension schema.
    pub fn standard() -> Arc<DimensionSchema> {
        STANDARD
            .get_or_init(|| {
                let schema = Self::builder(STANDARD_SCHEMA_VERSION)
                    .group(DimensionGroup::Traits, STANDARD_TRAITS)
                    .group(DimensionGroup::Interests, STANDARD_INTERESTS)
                    .group(DimensionGroup::Aptitudes, STANDARD_APTITUDES)
                    .group(DimensionGroup::Values, STANDARD_VALUES)
                    .group(DimensionGroup::WorkStyles, STANDARD_WORK_STYLES)
                    .assemble();
                Arc::new(schema)
            })
            .clone()
    }

    pub fn builder(version: u32) -> SchemaBuilder {
        SchemaBuilder {
            version,
            groups: Vec::new(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn dimension(&self, index: usize) -> Option<&Dimension> {
        self.dimensions.get(index)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension names in schema order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dimensions.iter().map(|d| d.name.as_str())
    }

    /// Index range of a group, `None` when the schema does not contain it
    pub fn group_range(&self, group: DimensionGroup) -> Option<Range<usize>> {
        self.groups
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, range)| range.clone())
    }

    /// Groups present in this schema, in canonical order
    pub fn groups(&self) -> impl Iterator<Item = DimensionGroup> + '_ {
        self.groups.iter().map(|(g, _)| *g)
    }

    /// Two schemas are compatible when vectors built against one can be
    /// compared positionally with vectors built against the other.
    pub fn is_compatible(&self, other: &DimensionSchema) -> bool {
        std::ptr::eq(self, other)
            || (self.version == other.version && self.dimensions == other.dimensions)
    }

    /// Fails with `SchemaMismatch` unless `other` is compatible.
    pub fn ensure_compatible(&self, other: &DimensionSchema) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(Error::SchemaMismatch {
                expected: self.version,
                actual: other.version,
            })
        }
    }
}

impl PartialEq for DimensionSchema {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.dimensions == other.dimensions
    }
}

/// Builder for custom schemas
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    version: u32,
    groups: Vec<(DimensionGroup, Vec<String>)>,
}

impl SchemaBuilder {
    pub fn group<I, S>(mut self, group: DimensionGroup, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .push((group, names.into_iter().map(Into::into).collect()));
        self
    }

    /// Validate and build the schema
    pub fn build(self) -> Result<DimensionSchema> {
        if self.groups.iter().all(|(_, names)| names.is_empty()) {
            return Err(Error::InvalidSchema("schema has no dimensions".to_string()));
        }

        let mut previous: Option<DimensionGroup> = None;
        for (group, names) in &self.groups {
            if names.is_empty() {
                return Err(Error::InvalidSchema(format!("group '{}' is empty", group)));
            }
            if let Some(prev) = previous {
                if prev == *group {
                    return Err(Error::InvalidSchema(format!(
                        "group '{}' declared twice",
                        group
                    )));
                }
                if prev > *group {
                    return Err(Error::InvalidSchema(format!(
                        "group '{}' declared after '{}'",
                        group, prev
                    )));
                }
            }
            previous = Some(*group);
        }

        let mut seen = ahash::AHashSet::new();
        for name in self.groups.iter().flat_map(|(_, names)| names) {
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate dimension '{}'",
                    name
                )));
            }
        }

        Ok(self.assemble())
    }

    fn assemble(self) -> DimensionSchema {
        let mut dimensions = Vec::new();
        let mut groups = Vec::with_capacity(self.groups.len());

        for (group, names) in self.groups {
            let start = dimensions.len();
            dimensions.extend(names.into_iter().map(|name| Dimension { name, group }));
            groups.push((group, start..dimensions.len()));
        }

        let index = dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();

        DimensionSchema {
            version: self.version,
            dimensions,
            index,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_schema_shape() {
        let schema = DimensionSchema::standard();
        assert_eq!(schema.version(), STANDARD_SCHEMA_VERSION);
        assert_eq!(schema.len(), 27);

        let sizes: Vec<usize> = DimensionGroup::ALL
            .iter()
            .map(|g| schema.group_range(*g).unwrap().len())
            .collect();
        assert_eq!(sizes, vec![6, 6, 5, 6, 4]);

        assert_eq!(schema.index_of("analytical"), Some(0));
        assert_eq!(schema.index_of("ambiguity_tolerance"), Some(26));
        assert_eq!(
            schema.dimension(12).map(|d| d.group),
            Some(DimensionGroup::Aptitudes)
        );
    }

    #[test]
    fn test_standard_schema_is_shared() {
        let a = DimensionSchema::standard();
        let b = DimensionSchema::standard();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_custom_schema() {
        let schema = DimensionSchema::builder(7)
            .group(DimensionGroup::Traits, ["t1", "t2"])
            .group(DimensionGroup::Interests, ["i1"])
            .build()
            .unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.group_range(DimensionGroup::Interests), Some(2..3));
        assert_eq!(schema.group_range(DimensionGroup::Values), None);
        assert_eq!(
            schema.groups().collect::<Vec<_>>(),
            vec![DimensionGroup::Traits, DimensionGroup::Interests]
        );
    }

    #[test]
    fn test_duplicate_dimension_rejected() {
        let result = DimensionSchema::builder(1)
            .group(DimensionGroup::Traits, ["a"])
            .group(DimensionGroup::Interests, ["a"])
            .build();
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_group_order_enforced() {
        let result = DimensionSchema::builder(1)
            .group(DimensionGroup::Values, ["v"])
            .group(DimensionGroup::Traits, ["t"])
            .build();
        assert!(matches!(result, Err(Error::InvalidSchema(_))));

        let empty = DimensionSchema::builder(1).build();
        assert!(matches!(empty, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_compatibility() {
        let build = |version| {
            DimensionSchema::builder(version)
                .group(DimensionGroup::Traits, ["a", "b"])
                .build()
                .unwrap()
        };
        assert!(build(1).is_compatible(&build(1)));
        assert!(!build(1).is_compatible(&build(2)));
        assert!(matches!(
            build(1).ensure_compatible(&build(2)),
            Err(Error::SchemaMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_group_parse() {
        assert_eq!(
            "work_styles".parse::<DimensionGroup>().unwrap(),
            DimensionGroup::WorkStyles
        );
        assert!("hobbies".parse::<DimensionGroup>().is_err());
    }
}
