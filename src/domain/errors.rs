use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },

    #[error("Unknown {kind}: {value}")]
    UnknownStatus { kind: &'static str, value: String },

    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidTimeRange { start: i64, end: i64 },
}
