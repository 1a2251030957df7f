use thiserror::Error;

/// Failures of numeric evaluation, configuration and trace export.
///
/// Unsupported algebraic structure is never reported here: the calculus engines
/// degrade to a zero derivative or an identity integral and say so in the step trace.
#[derive(Debug, Error)]
pub enum SymbolicError {
    #[error("variable '{0}' has no value bound for evaluation")]
    UnboundVariable(String),
    #[error("grid of {0} cells per axis is not usable, at least one cell is required")]
    InvalidGrid(usize),
    #[error("quadrature failed: {0}")]
    Quadrature(String),
    #[error("settings error: {0}")]
    Settings(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
