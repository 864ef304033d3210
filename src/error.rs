use thiserror::Error;

pub type RegressionResult<T> = Result<T, RegressionError>;

#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("model not initialized, perform a fit first")]
    Uninitialized,
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),
    #[error("dimension mismatch: {features} features but {targets} targets")]
    DimensionMismatch { features: usize, targets: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("empty dataset")]
    EmptyDataset,
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),
    #[error("error in CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RegressionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        RegressionError::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        RegressionError::UnsupportedConfiguration(message.into())
    }
}

pub(crate) fn check_aligned(features: usize, targets: usize) -> RegressionResult<()> {
    if features != targets {
        return Err(RegressionError::DimensionMismatch { features, targets });
    }
    Ok(())
}
