//! decimal parsing errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecError {
    #[error("empty decimal string")]
    Empty,

    #[error("invalid decimal string: {0:?}")]
    InvalidCharacter(String),

    #[error("too much precision: {got} fractional digits, max {max}")]
    TooMuchPrecision { got: usize, max: usize },
}
