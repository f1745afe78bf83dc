use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid canvas size: width={width}, height={height}")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("no dataset at index {0}")]
    UnknownDataset(usize),

    #[error("unknown axis id: {0}")]
    UnknownAxis(String),
}
