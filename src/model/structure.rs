//! Multi-chain container produced by the structure readers.
//!
//! A `Structure` is the raw, file-shaped view of coordinates. Assembly inputs are derived
//! from it ([`Fragment`](super::fragment::Fragment)) and stoichiometry templates are read
//! into it directly.

use super::atom::Atom;
use super::chain::Chain;
use std::fmt;

/// Ordered collection of chains as read from one model of a structure file.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Chains in first-appearance order.
    chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chain, asserting unique chain IDs in debug builds.
    pub fn add_chain(&mut self, chain: Chain) {
        debug_assert!(
            self.chain(&chain.id).is_none(),
            "Attempted to add a duplicate chain ID '{}'",
            chain.id
        );
        self.chains.push(chain);
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter_chains(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.chains.iter().flat_map(|c| c.iter_atoms())
    }

    /// Consumes the structure and yields its chains in order.
    pub fn into_chains(self) -> Vec<Chain> {
        self.chains
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ chains: {}, residues: {}, atoms: {} }}",
            self.chain_count(),
            self.residue_count(),
            self.atom_count()
        )
    }
}
