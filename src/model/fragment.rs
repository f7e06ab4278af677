//! Pairwise interaction inputs: two-chain fragments and the subunits they carry.

use super::chain::Chain;
use super::identity::IdentityId;
use super::structure::Structure;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Position of a subunit in the input: fragment index and chain slot (0 or 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubunitId {
    pub fragment: usize,
    pub slot: usize,
}

impl SubunitId {
    pub fn new(fragment: usize, slot: usize) -> Self {
        Self { fragment, slot }
    }

    /// The other chain of the same fragment.
    pub fn partner(&self) -> Self {
        Self::new(self.fragment, 1 - self.slot)
    }
}

impl fmt::Display for SubunitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fragment, self.slot)
    }
}

/// One chain instance of a fragment.
///
/// The chain is shared: placing an untransformed copy into a complex clones the `Arc`, not
/// the coordinates.
#[derive(Debug, Clone)]
pub struct Subunit {
    /// Identity class, assigned by unification.
    pub identity: Option<IdentityId>,
    pub chain: Arc<Chain>,
}

impl Subunit {
    pub fn new(chain: Chain) -> Self {
        Self {
            identity: None,
            chain: Arc::new(chain),
        }
    }
}

/// Ordered, deduplicated residue numbers of one side of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ContactSet(Vec<i32>);

impl ContactSet {
    pub fn new(mut residues: Vec<i32>) -> Self {
        residues.sort_unstable();
        residues.dedup();
        Self(residues)
    }

    pub fn residues(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<i32> for ContactSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for ContactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [only] => write!(f, "({})", only),
            [first, .., last] => write!(f, "({} ... {})", first, last),
        }
    }
}

/// An input structure that did not hold exactly two chains.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fragment '{name}' has {chains} chains; every input must contain exactly two")]
pub struct FragmentError {
    pub name: String,
    pub chains: usize,
}

/// Two interacting chains read from one input file.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub name: String,
    subunits: [Subunit; 2],
}

impl Fragment {
    /// Wraps a structure that must contain exactly two chains.
    pub fn from_structure(
        name: impl Into<String>,
        structure: Structure,
    ) -> Result<Self, FragmentError> {
        let name = name.into();
        let count = structure.chain_count();
        let chains: [Chain; 2] = structure
            .into_chains()
            .try_into()
            .map_err(|_| FragmentError {
                name: name.clone(),
                chains: count,
            })?;
        let [first, second] = chains;
        Ok(Self {
            name,
            subunits: [Subunit::new(first), Subunit::new(second)],
        })
    }

    pub fn subunit(&self, slot: usize) -> &Subunit {
        &self.subunits[slot]
    }

    pub fn subunits(&self) -> &[Subunit; 2] {
        &self.subunits
    }

    pub fn subunits_mut(&mut self) -> &mut [Subunit; 2] {
        &mut self.subunits
    }
}
