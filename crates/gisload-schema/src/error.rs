use thiserror::Error;

/// Configuration errors in a column specification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    /// The same column name appears twice.
    #[error("column '{0}' is declared more than once")]
    Duplicate(String),

    /// More than one column ends in `primary key`.
    #[error("only one primary key is allowed, found: {}", .0.join(", "))]
    PrimaryKeys(Vec<String>),

    /// Type text that would terminate or comment out the statement.
    #[error("type of column '{column}' is not allowed: {ty}")]
    UnsafeType { column: String, ty: String },
}
