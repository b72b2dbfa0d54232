
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("text line too long: \"{text}...\"")]
    LineTooLong { text: String },
    #[error("matrix element count for key \"{key}\" not divisible by {ncols} columns")]
    MatrixShape { key: String, ncols: usize },
    #[error("array length mismatch for key \"{key}\": {expected} requested, {found} found")]
    LengthMismatch {
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("numerical conversion error: {key} = \"{text}\"")]
    Conversion { key: String, text: String },
    #[error("required key \"{key}\" missing in the database")]
    Missing {
        key: String,
        descript: Option<String>,
        index: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Integer status code for callers that track numeric statuses.
    /// Success is 0; a missing request item maps to 1 + its index in
    /// the request list, so the caller learns which item failed.
    pub fn code(&self) -> i32 {
        match self {
            DbError::Missing { index, .. } => 1 + *index as i32,
            DbError::Io(_) => -1,
            DbError::LineTooLong { .. } => -128,
            DbError::MatrixShape { .. } => -129,
            DbError::LengthMismatch { .. } => -130,
            DbError::Conversion { .. } => -131,
        }
    }
}
