#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Language shift in a region of homes.

/// Region model and grid file parsing.
pub mod grid;
/// Transition rules and simulation drivers.
pub mod simulation;

pub use grid::{CommunityCenter, Grid, Home, LanguageState, parse_grid, read_grid};
pub use simulation::{
    Frequencies, Simulation, Thresholds, engagement, run_simulation, simulation_sweep,
};

/// Errors raised while reading a region.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The file ended before the region was complete.
    #[error("Unexpected end of grid file at line {0}")]
    UnexpectedEnd(usize),
    /// A token could not be parsed as a number.
    #[error("Line {line}: could not parse `{token}`")]
    Malformed {
        /// Line the token was found on.
        line:  usize,
        /// The offending token.
        token: String,
    },
    /// A row's length does not match the grid size.
    #[error("Row {row} has {found} homes, expected {expected}")]
    NotSquare {
        /// Zero-based row index.
        row:      usize,
        /// Grid size.
        expected: usize,
        /// Homes found in the row.
        found:    usize,
    },
    /// A home holds something other than 0, 1 or 2.
    #[error("Invalid language state `{0}`, expected 0, 1 or 2")]
    InvalidState(String),
    /// A community center lies outside the region.
    #[error("Community center ({row}, {col}) lies outside a {size}x{size} region")]
    CenterOutOfBounds {
        /// Row of the center.
        row:  usize,
        /// Column of the center.
        col:  usize,
        /// Grid size.
        size: usize,
    },
}
