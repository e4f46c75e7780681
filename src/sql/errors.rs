use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlTemplateError {
    #[error(
        "Placeholder mismatch in fragment {index} ({format:?}): {placeholders} placeholders, {values} values"
    )]
    PlaceholderMismatch {
        index: usize,
        format: String,
        placeholders: usize,
        values: usize,
    },

    #[error("Batch insert into {table} has no columns")]
    NoColumns { table: String },

    #[error("Batch insert into {table} has no rows")]
    EmptyBatch { table: String },

    #[error("Batch insert into {table}: row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
}
