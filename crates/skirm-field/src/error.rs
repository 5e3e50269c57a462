//! Error types for field construction.

use std::error::Error;
use std::fmt;

/// Errors detected when constructing a [`Field`](crate::Field).
///
/// Once a field exists its dimensions are fixed; every later operation
/// either matches dimensions by construction or asserts on them, so no
/// runtime `Result` plumbing is needed past this point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// A dimension was zero.
    EmptyField,
    /// A dimension exceeds the coordinate range.
    DimensionTooLarge {
        /// Which axis: `"width"` or `"height"`.
        name: &'static str,
        /// The offending value.
        value: u32,
        /// The maximum supported value.
        max: u32,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField => write!(f, "field dimensions must be nonzero"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
        }
    }
}

impl Error for FieldError {}
