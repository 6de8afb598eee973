//! Error types
//!
//! The simulation itself cannot fail. Errors only come from the edges:
//! parsing raw control values, looking up page elements, and acquiring the
//! GPU or audio output.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StormError {
    /// A meteor type select value that names no known kind
    UnknownMeteorKind(String),
    /// A slider value that is not an integer
    InvalidNumber {
        /// Which control produced the value
        field: &'static str,
        /// The rejected text
        value: String,
    },
    /// A required page element is absent
    MissingElement(&'static str),
    /// The audio subsystem could not be acquired
    Audio(String),
    /// No usable GPU device or surface
    Gpu(String),
}

impl fmt::Display for StormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StormError::UnknownMeteorKind(value) => write!(f, "unknown meteor kind '{value}'"),
            StormError::InvalidNumber { field, value } => {
                write!(f, "{field}: '{value}' is not a whole number")
            }
            StormError::MissingElement(id) => write!(f, "missing page element #{id}"),
            StormError::Audio(reason) => write!(f, "audio unavailable: {reason}"),
            StormError::Gpu(reason) => write!(f, "GPU unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StormError {}

/// Parse a slider value as an unsigned level
pub fn parse_level(field: &'static str, value: &str) -> Result<u32, StormError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| StormError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}
