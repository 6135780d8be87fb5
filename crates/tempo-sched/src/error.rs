use tempo_core::TempoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("scheduler configuration error: {0}")]
    Config(String),

    #[error("clock error: {0}")]
    Clock(#[from] TempoError),
}

pub type SchedResult<T> = Result<T, SchedError>;
