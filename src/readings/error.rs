use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no valid readings after filtering {received} record(s)")]
    NoValidReadings { received: usize },
}

impl NormalizeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoValidReadings { .. } => "NO_VALID_READINGS",
        }
    }
}

/// Why a single record was left out of the reading set.
#[derive(Debug, Error, PartialEq)]
pub(super) enum RecordRejection {
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("field {0} is not numeric")]
    NotNumeric(&'static str),
    #[error("field {0} is not a finite number")]
    NonFinite(&'static str),
    #[error("unparseable timestamp {0:?}")]
    UnparseableTimestamp(String),
}
