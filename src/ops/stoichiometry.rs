//! Target copy numbers per identity class.

use super::error::Error;
use crate::model::identity::{IdentityId, SequenceRegistry};
use crate::model::structure::Structure;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;

/// Maximum number of copies allowed per identity.
///
/// Identities that do not appear are capped at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stoichiometry {
    limits: BTreeMap<IdentityId, usize>,
}

impl Stoichiometry {
    /// Parses a literal such as `A:2,B:11,C:4`.
    ///
    /// Whitespace around tokens is ignored and a repeated identity keeps its last count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStoichiometry`] for any entry that is not `SYMBOL:COUNT`
    /// with a single identity symbol and a non-negative integer count.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let mut limits = BTreeMap::new();
        for entry in input.split(',') {
            let (symbol, count) = entry.split_once(':').ok_or_else(|| {
                Error::malformed_stoichiometry(input, format!("entry '{}' lacks ':'", entry.trim()))
            })?;
            let identity: IdentityId = symbol
                .trim()
                .parse()
                .map_err(|e: String| Error::malformed_stoichiometry(input, e))?;
            let count: usize = count.trim().parse().map_err(|_| {
                Error::malformed_stoichiometry(
                    input,
                    format!("count '{}' is not a non-negative integer", count.trim()),
                )
            })?;
            limits.insert(identity, count);
        }
        Ok(Self { limits })
    }

    /// Counts the chains of a reference structure per identity.
    ///
    /// Chains are matched by exact sequence against `registry`; unrecognized chains are
    /// ignored.
    pub fn from_template(template: &Structure, registry: &SequenceRegistry) -> Self {
        let mut limits = BTreeMap::new();
        for chain in template.iter_chains() {
            match registry.identify(&chain.sequence()) {
                Some(identity) => *limits.entry(identity).or_insert(0) += 1,
                None => debug!("Template chain '{}' matches no known identity", chain.id),
            }
        }
        let stoichiometry = Self { limits };
        info!("Template stoichiometry: {}", stoichiometry);
        stoichiometry
    }

    /// Copies of `identity` the complex may hold.
    pub fn max_copies(&self, identity: IdentityId) -> usize {
        self.limits.get(&identity).copied().unwrap_or(0)
    }

    /// `true` while a complex holding `current` copies may take one more.
    pub fn allows(&self, identity: IdentityId, current: usize) -> bool {
        current < self.max_copies(identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IdentityId, usize)> + '_ {
        self.limits.iter().map(|(&id, &n)| (id, n))
    }
}

impl fmt::Display for Stoichiometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .limits
            .iter()
            .map(|(id, n)| format!("{}:{}", id, n))
            .collect();
        write!(f, "{}", entries.join(","))
    }
}

/// Where the target stoichiometry comes from.
#[derive(Debug, Clone)]
pub enum StoichiometrySource {
    Literal(String),
    Template(Structure),
}

impl StoichiometrySource {
    /// Picks at most one source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingStoichiometry`] when both are supplied.
    pub fn select(literal: Option<String>, template: Option<Structure>) -> Result<Option<Self>, Error> {
        match (literal, template) {
            (Some(_), Some(_)) => Err(Error::ConflictingStoichiometry),
            (Some(literal), None) => Ok(Some(Self::Literal(literal))),
            (None, Some(template)) => Ok(Some(Self::Template(template))),
            (None, None) => Ok(None),
        }
    }

    /// Resolves the source against the identities established for this build.
    pub fn resolve(&self, registry: &SequenceRegistry) -> Result<Stoichiometry, Error> {
        match self {
            Self::Literal(literal) => Stoichiometry::parse(literal),
            Self::Template(template) => Ok(Stoichiometry::from_template(template, registry)),
        }
    }
}
