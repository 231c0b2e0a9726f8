//! Errors shared between the pixfont crates

use crate::location::Location;
use std::fmt::{Display, Formatter};

/// Parser error that defines an error (message) on the given position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Parse error message
    pub message: String,
    /// Location of the error
    pub location: Location,
}

impl ParseError {
    #[must_use]
    pub fn new(message: &str, location: Location) -> Self {
        Self {
            message: message.to_string(),
            location,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

impl std::error::Error for ParseError {}
