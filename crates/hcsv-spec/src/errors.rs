use thiserror::Error;

pub type SpecResult<T> = Result<T, SpecError>;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index grammar error: {0}")]
    Grammar(#[from] regex::Error),

    #[error("Malformed spec row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Missing spec header: expected '{expected}', found '{found}'")]
    MissingSpecHeader { expected: String, found: String },

    #[error("Unknown type '{ty}' declared for column '{column}'")]
    UnknownType { column: String, ty: String },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Invalid index spec '{spec}' on column '{column}': {reason}")]
    InvalidIndexSpec {
        column: String,
        spec: String,
        reason: String,
    },

    #[error("Index '{index}' position {position} claimed by both '{first}' and '{second}'")]
    DuplicateIndexPosition {
        index: String,
        position: usize,
        first: String,
        second: String,
    },

    #[error("Index '{index}' has no component at position {position}")]
    IndexGap { index: String, position: usize },

    #[error("Index '{index}' separator '{found}' conflicts with '{established}'")]
    SeparatorConflict {
        index: String,
        established: String,
        found: String,
    },

    #[error("No index declared: define at least one index")]
    NoIndexes,

    #[error("No favorite index: tag one index with '*'")]
    NoFavoriteIndex,

    #[error("{count} bad rows in strict mode")]
    BadRowsInStrictMode { count: usize },

    #[error("Invalid skeleton column '{0}': nothing left after sanitizing")]
    InvalidSkeletonColumn(String),
}

impl SpecError {
    /// Row-level defects are counted and skipped; everything else halts compilation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SpecError::MalformedRow { .. })
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SpecError::MalformedRow {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_malformed_rows_are_recoverable() {
        assert!(SpecError::malformed(3, "too few fields").is_recoverable());
        assert!(!SpecError::NoIndexes.is_recoverable());
        assert!(!SpecError::UnknownType {
            column: "ID".to_string(),
            ty: "int32".to_string(),
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = SpecError::IndexGap {
            index: "BYDATE".to_string(),
            position: 1,
        };
        assert_eq!(err.to_string(), "Index 'BYDATE' has no component at position 1");
    }
}
