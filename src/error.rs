//! Error type shared by every fallible operation of the crate.

/// Failures surfaced by [`crate::ElasticHashMap`] and [`crate::Config`].
///
/// None of these are retried internally. A table that reports
/// [`ElasticError::InsertionFailed`] stays usable for lookups and updates,
/// but it will never grow; rebuilding into a larger table is up to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ElasticError {
    /// Every sub-table was either above its fill ceiling or exhausted its
    /// probe bound for the key.
    #[error("no admissible slot left for key (capacity {capacity}, {sub_tables} sub-tables)")]
    InsertionFailed { capacity: usize, sub_tables: usize },

    /// A key that was just placed could not be found again.
    #[error("entry vanished right after insertion ({sub_tables} sub-tables)")]
    InvariantViolation { sub_tables: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed configuration document")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ElasticError>;
