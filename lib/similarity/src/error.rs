use crate::config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error(transparent)]
    Core(#[from] careermatch_core::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No candidate careers{}", cluster_suffix(.cluster))]
    EmptyCandidateSet { cluster: Option<String> },

    /// Person and catalog were built against different schemas. Raised
    /// before normalization (no occupation) or while scoring a career.
    #[error("Schema mismatch{}: person uses schema v{person}, career uses v{career}", occupation_suffix(.occupation_code))]
    SchemaMismatch {
        occupation_code: Option<String>,
        person: u32,
        career: u32,
    },

    #[error("Profile for {subject} is not normalized")]
    NotNormalized { subject: String },
}

fn cluster_suffix(cluster: &Option<String>) -> String {
    match cluster {
        Some(label) => format!(" in cluster '{}'", label),
        None => String::new(),
    }
}

fn occupation_suffix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!(" for occupation {}", code),
        None => String::new(),
    }
}
