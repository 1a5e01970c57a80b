use thiserror::Error;

/// Reasons a quote could not be produced.
///
/// None of these are fatal; callers typically refresh their TVL or supply and recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("out of range: {0}")]
    OutOfRange(&'static str),

    #[error("arithmetic overflow")]
    Overflow,
}

pub type CurveResult<T> = Result<T, CurveError>;
