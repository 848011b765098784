#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Could not parse upload as comma- or tab-separated text: {0}")]
    Parse(#[source] polars::error::PolarsError),

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// Missing-column list when this is a validation failure, empty otherwise.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            Self::MissingColumns(cols) => cols,
            _ => &[],
        }
    }
}

#[cfg(feature = "python")]
impl From<DashboardError> for PyErr {
    fn from(err: DashboardError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
