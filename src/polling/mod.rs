#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Election day at a polling place.

/// The bank of voting booths.
pub mod booths;
/// Precinct configuration and the day's simulation.
pub mod precinct;
/// Searches for impatience thresholds and booth counts.
pub mod search;
/// Voters.
pub mod voter;

pub use booths::VotingBooths;
pub use precinct::{DaySummary, Precinct, PrecinctFile, load_precinct};
pub use search::{
    SearchOptions, booths_for_trial, find_impatience_threshold, find_voting_booths_needed,
    threshold_for_trial,
};
pub use voter::Voter;

/// Errors raised while simulating a precinct.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PrecinctError {
    /// A voter was sent to a full bank of booths.
    #[error("All booths in use")]
    AllBoothsInUse,
    /// A booth operation needed an occupied booth.
    #[error("No booths in use")]
    NoBoothInUse,
    /// A voter entered a booth without a start time.
    #[error("Voter's start time must be set")]
    MissingStartTime,
    /// The precinct was given no booths.
    #[error("A precinct needs at least one voting booth")]
    NoBooths,
    /// A search was asked to run zero trials.
    #[error("At least one trial is required")]
    NoTrials,
    /// Not everyone voted even with the maximum number of booths.
    #[error("Not every voter voted even with {0} booths")]
    BoothLimitExceeded(usize),
    /// A precinct or search parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
