//! Fixed-point decimal arithmetic for voting power
//!
//! Every node must reach bit-identical percentages from identical inputs, so
//! nothing here touches floating point. A [`Dec`] is an arbitrary-precision
//! integer scaled by 10^18.
//!
//! # Rounding
//!
//! Multiplication and division are computed exactly at doubled precision,
//! truncated toward zero, then rounded back to 18 places with banker's
//! rounding (half to even). Negative values round symmetrically.
//!
//! # Example
//!
//! ```
//! use votepower_numeric::Dec;
//!
//! let harmony: Dec = "0.68".parse().unwrap();
//! let per_slot = &harmony / &Dec::new(3);
//! assert_eq!(per_slot.to_string(), "0.226666666666666667");
//! ```

mod dec;
mod error;

pub use dec::{Dec, PRECISION};
pub use error::DecError;
