//! The assembled multi-chain model grown from a seed fragment.

use super::chain::Chain;
use super::fragment::{ContactSet, SubunitId};
use super::identity::IdentityId;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Interaction keys a placed chain has yet to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Pending(Vec<ContactSet>),
    Exhausted,
}

/// A chain copy placed in a [`Complex`].
#[derive(Debug, Clone)]
pub struct PlacedSubunit {
    pub identity: IdentityId,
    /// Coordinates in the complex frame.
    pub chain: Arc<Chain>,
    /// Input subunit this copy was taken from.
    pub origin: SubunitId,
    pub state: InteractionState,
}

impl PlacedSubunit {
    pub fn new(
        identity: IdentityId,
        chain: Arc<Chain>,
        origin: SubunitId,
        pending: Vec<ContactSet>,
    ) -> Self {
        Self {
            identity,
            chain,
            origin,
            state: InteractionState::Pending(pending),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, InteractionState::Exhausted)
    }
}

#[derive(Debug, Clone)]
pub struct Complex {
    pub id: String,
    subunits: Vec<PlacedSubunit>,
    profile: BTreeMap<IdentityId, usize>,
}

impl Complex {
    /// Starts a complex from the two subunits of a seed fragment.
    pub fn seeded(id: impl Into<String>, seed: [PlacedSubunit; 2]) -> Self {
        let mut complex = Self {
            id: id.into(),
            subunits: Vec::new(),
            profile: BTreeMap::new(),
        };
        for subunit in seed {
            complex.push(subunit);
        }
        complex
    }

    pub fn push(&mut self, subunit: PlacedSubunit) {
        *self.profile.entry(subunit.identity).or_insert(0) += 1;
        self.subunits.push(subunit);
    }

    pub fn len(&self) -> usize {
        self.subunits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subunits.is_empty()
    }

    /// `true` once anything beyond the seed pair has been placed.
    pub fn grew(&self) -> bool {
        self.subunits.len() > 2
    }

    pub fn subunit(&self, index: usize) -> &PlacedSubunit {
        &self.subunits[index]
    }

    pub fn subunits(&self) -> &[PlacedSubunit] {
        &self.subunits
    }

    /// Marks the subunit at `index` exhausted and returns the keys it still had.
    pub fn take_pending(&mut self, index: usize) -> Option<Vec<ContactSet>> {
        match std::mem::replace(&mut self.subunits[index].state, InteractionState::Exhausted) {
            InteractionState::Pending(keys) if !keys.is_empty() => Some(keys),
            _ => None,
        }
    }

    pub fn all_exhausted(&self) -> bool {
        self.subunits.iter().all(|s| s.is_exhausted())
    }

    /// Copies of `identity` currently placed.
    pub fn count(&self, identity: IdentityId) -> usize {
        self.profile.get(&identity).copied().unwrap_or(0)
    }

    pub fn profile(&self) -> &BTreeMap<IdentityId, usize> {
        &self.profile
    }

    /// Profile rendered as `A:2,B:1`, sorted by identity.
    pub fn profile_string(&self) -> String {
        self.profile
            .iter()
            .map(|(id, n)| format!("{}:{}", id, n))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn iter_chains(&self) -> impl Iterator<Item = &Chain> {
        self.subunits.iter().map(|s| s.chain.as_ref())
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Complex {{ id: \"{}\", chains: {}, profile: \"{}\" }}",
            self.id,
            self.len(),
            self.profile_string()
        )
    }
}

/// Output chain label for the subunit at `index`: `A`..`Z`, then `AA`, `AB`, and so on.
pub fn asym_id(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.iter().rev().map(|&b| b as char).collect()
}
