#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

/// A voter at the polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    /// Minutes after opening at which the voter arrives.
    pub arrival_time:    f64,
    /// Minutes the voter spends in the booth.
    pub voting_duration: f64,
    /// Whether the voter leaves if the wait is too long.
    pub is_impatient:    bool,
    /// When the voter entered a booth, if they voted.
    pub start_time:      Option<f64>,
    /// When the voter left the booth, if they voted.
    pub departure_time:  Option<f64>,
    /// Whether the voter voted.
    pub has_voted:       bool,
}

impl Voter {
    /// Creates a voter who has not voted yet.
    pub fn new(arrival_time: f64, voting_duration: f64, is_impatient: bool) -> Self {
        Self {
            arrival_time,
            voting_duration,
            is_impatient,
            start_time: None,
            departure_time: None,
            has_voted: false,
        }
    }

    /// Records that the voter entered a booth at `start_time`.
    pub fn start_voting(&mut self, start_time: f64) {
        self.start_time = Some(start_time);
        self.departure_time = Some(start_time + self.voting_duration);
        self.has_voted = true;
    }

    /// Whether the voter stays in line when the next booth frees up at
    /// `next_free`. Impatient voters wait at most `threshold` minutes past
    /// their arrival.
    pub fn will_wait(&self, next_free: f64, threshold: f64) -> bool {
        !self.is_impatient || next_free - self.arrival_time <= threshold
    }
}
