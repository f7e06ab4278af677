//! Error type shared by the assembly operations.
//!
//! Every variant is fatal to a build: they are raised while validating inputs, before any
//! model grows. Rejected placements during growth are not errors.

use crate::model::fragment::FragmentError;
use thiserror::Error;

/// Error conditions surfaced by the operations layer.
#[derive(Debug, Error)]
pub enum Error {
    /// An input structure did not hold exactly two chains.
    #[error(transparent)]
    InvalidFragment(#[from] FragmentError),

    /// No fragments were supplied.
    #[error("no input fragments were provided")]
    EmptyInput,

    /// More distinct sequences than identity symbols.
    #[error("too many distinct sequences: at most {limit} identity classes are supported")]
    TooManyIdentities { limit: usize },

    /// Stoichiometry literal could not be parsed.
    #[error("malformed stoichiometry '{input}': {details} (expected a format like A:2,B:11,C:4)")]
    MalformedStoichiometry { input: String, details: String },

    /// Both a literal and a template stoichiometry were given.
    #[error("stoichiometry may come from a literal or a template, not both")]
    ConflictingStoichiometry,

    /// No fragment produced any interface contact.
    #[error("no interactions were found between the chains of any fragment")]
    NoInteractions,

    /// The chain cap cannot hold the seed pair.
    #[error("maximum chain count must be at least 2 (got {0})")]
    InvalidChainLimit(usize),

    /// At least one model must be requested.
    #[error("number of models must be at least 1 (got {0})")]
    InvalidModelCount(usize),

    /// Reading a fragment or template failed.
    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    /// Helper for constructing an [`Error::MalformedStoichiometry`] variant.
    ///
    /// # Arguments
    ///
    /// * `input` - The literal as supplied by the user.
    /// * `details` - Which part of it failed and why.
    pub fn malformed_stoichiometry(input: impl Into<String>, details: impl Into<String>) -> Self {
        Self::MalformedStoichiometry {
            input: input.into(),
            details: details.into(),
        }
    }
}
