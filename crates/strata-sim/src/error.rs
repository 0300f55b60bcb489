use std::path::PathBuf;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Configuration-time failures. Evaluating a population never fails.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A population spec failed validation.
    #[error("invalid population '{population}': {reason}")]
    InvalidSpec {
        /// Name of the offending population.
        population: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A rule referred to an attribute the spec does not declare.
    #[error("population '{population}' refers to unknown attribute '{attribute}'")]
    UnknownAttribute {
        /// Name of the offending population.
        population: String,
        /// The missing attribute name.
        attribute: String,
    },

    /// Two populations in one catalog or simulation share a name.
    #[error("duplicate population name: {0}")]
    DuplicatePopulation(String),

    /// A lookup by population name found nothing.
    #[error("population not found: {0}")]
    PopulationNotFound(String),

    /// A catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A catalog document was not valid JSON for the expected shape.
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(population: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            population: population.to_string(),
            reason: reason.into(),
        }
    }
}
