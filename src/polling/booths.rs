#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use super::{PrecinctError, voter::Voter};

/// A voter inside a booth, ordered by departure time.
#[derive(Debug, Clone, Copy)]
struct Occupant {
    /// Time the voter will leave the booth.
    departure: f64,
    /// Index of the voter in the day's voter list.
    voter:     usize,
}

impl PartialEq for Occupant {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Occupant {}

impl PartialOrd for Occupant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Occupant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.departure
            .total_cmp(&other.departure)
            .then_with(|| self.voter.cmp(&other.voter))
    }
}

/// A bank of voting booths.
#[derive(Debug, Clone)]
pub struct VotingBooths {
    /// Number of booths in the bank.
    num_booths: usize,
    /// Occupied booths, earliest departure on top.
    occupied:   BinaryHeap<Reverse<Occupant>>,
}

impl VotingBooths {
    /// Creates a bank of `num_booths` empty booths.
    pub fn new(num_booths: usize) -> Self {
        Self {
            num_booths,
            occupied: BinaryHeap::with_capacity(num_booths),
        }
    }

    /// Number of booths in the bank.
    pub fn num_booths(&self) -> usize {
        self.num_booths
    }

    /// Is at least one booth open
    pub fn is_booth_available(&self) -> bool {
        self.occupied.len() < self.num_booths
    }

    /// Is at least one booth occupied
    pub fn is_some_booth_occupied(&self) -> bool {
        !self.occupied.is_empty()
    }

    /// Puts the voter at `index` into an open booth until
    /// `start_time + voting_duration`.
    pub fn enter_booth(&mut self, index: usize, voter: &Voter) -> Result<(), PrecinctError> {
        if !self.is_booth_available() {
            return Err(PrecinctError::AllBoothsInUse);
        }
        let start = voter.start_time.ok_or(PrecinctError::MissingStartTime)?;

        self.occupied.push(Reverse(Occupant {
            departure: start + voter.voting_duration,
            voter:     index,
        }));
        Ok(())
    }

    /// When the next occupied booth frees up.
    pub fn time_next_free(&self) -> Result<f64, PrecinctError> {
        self.occupied
            .peek()
            .map(|Reverse(occupant)| occupant.departure)
            .ok_or(PrecinctError::NoBoothInUse)
    }

    /// Removes the voter with the earliest departure, returning their index
    /// and departure time.
    pub fn exit_booth(&mut self) -> Result<(usize, f64), PrecinctError> {
        self.occupied
            .pop()
            .map(|Reverse(occupant)| (occupant.voter, occupant.departure))
            .ok_or(PrecinctError::NoBoothInUse)
    }

    /// Releases every voter whose departure time is at or before `now`.
    pub fn release_until(&mut self, now: f64) {
        while let Some(Reverse(occupant)) = self.occupied.peek() {
            if occupant.departure > now {
                break;
            }
            self.occupied.pop();
        }
    }

    /// Empties every booth.
    pub fn clear(&mut self) {
        self.occupied.clear();
    }
}
