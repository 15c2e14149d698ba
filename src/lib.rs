//! # datalabs
//!
//! Small data-analysis and simulation engines: frequency and salience
//! analysis of election tweets, a language-shift simulation, a polling place
//! simulation, and linear regression model selection.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Runtime configuration read from the environment
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Counting, ranking, and tf-idf salience of tokens
pub mod counting;
/// Language shift simulation
pub mod language;
/// Polling place simulation
pub mod polling;
/// Linear regression and model selection
pub mod regression;
/// Table rendering for the command line
pub mod report;
/// Election tweet analysis
pub mod tweets;
/// Utility functions for convenience
pub mod util;
