use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid benchmark: {field} must be finite and positive (got {value})")]
    InvalidBenchmark { field: String, value: f64 },
}
