//! Sequence identity classes and the registry that hands them out.
//!
//! Every distinct chain sequence seen during unification gets a one-character symbol. The
//! symbols double as entity labels in the stoichiometry syntax (`A:2,B:1`), so the alphabet
//! is fixed and its order is part of the observable behavior.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Symbols assigned to identity classes, in assignment order.
pub const IDENTITY_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789ñÑçÇ";

/// Number of distinct identity classes the alphabet can express.
pub const MAX_IDENTITIES: usize = 66;

/// Label shared by all chains considered the same molecular entity.
///
/// Ordering follows the alphabet, so `A < B < a < 0 < ñ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(u8);

impl IdentityId {
    /// Identity at `index` in the alphabet, or `None` past its end.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < MAX_IDENTITIES).then(|| Self(index as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn symbol(&self) -> char {
        IDENTITY_ALPHABET
            .chars()
            .nth(self.index())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for IdentityId {
    type Err = String;

    /// Parses exactly one alphabet symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => IDENTITY_ALPHABET
                .chars()
                .position(|a| a == c)
                .and_then(Self::from_index)
                .ok_or_else(|| format!("'{}' is not an identity symbol", s)),
            _ => Err(format!("'{}' is not a single identity symbol", s)),
        }
    }
}

/// Known sequences, each mapped to its identity class.
///
/// Every distinct recorded sequence is kept in discovery order, homolog members included;
/// homology lookups scan them in that order so the first sufficiently similar one wins.
#[derive(Debug, Clone, Default)]
pub struct SequenceRegistry {
    representatives: Vec<(String, IdentityId)>,
    known: Vec<(String, IdentityId)>,
    members: HashMap<String, IdentityId>,
    counts: HashMap<IdentityId, usize>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of a sequence already recorded verbatim.
    pub fn identify(&self, sequence: &str) -> Option<IdentityId> {
        self.members.get(sequence).copied()
    }

    /// Number of identity classes handed out so far.
    pub fn class_count(&self) -> usize {
        self.representatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Representative sequences in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, IdentityId)> {
        self.representatives.iter().map(|(s, id)| (s.as_str(), *id))
    }

    /// Every distinct recorded sequence in discovery order.
    pub fn sequences(&self) -> impl Iterator<Item = (&str, IdentityId)> {
        self.known.iter().map(|(s, id)| (s.as_str(), *id))
    }

    /// Chains assigned to `id` so far.
    pub fn member_count(&self, id: IdentityId) -> usize {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Opens a new class for `sequence`, or `None` once the alphabet is exhausted.
    pub(crate) fn open_class(&mut self, sequence: &str) -> Option<IdentityId> {
        let id = IdentityId::from_index(self.representatives.len())?;
        self.representatives.push((sequence.to_string(), id));
        Some(id)
    }

    /// Records one chain with `sequence` as a member of `id`.
    pub(crate) fn record(&mut self, sequence: &str, id: IdentityId) {
        if !self.members.contains_key(sequence) {
            self.members.insert(sequence.to_string(), id);
            self.known.push((sequence.to_string(), id));
        }
        *self.counts.entry(id).or_insert(0) += 1;
    }
}
