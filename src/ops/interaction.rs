//! Residue-level interaction graph between identity classes.
//!
//! Building the graph measures the interface of every fragment once. Refining it gives each
//! input subunit the list of interaction keys it can still grow through, excluding the
//! interface it already shares with its own fragment partner.

use super::error::Error;
use crate::model::chain::Chain;
use crate::model::fragment::{ContactSet, Fragment, Subunit, SubunitId};
use crate::model::grid::Grid;
use crate::model::identity::IdentityId;
use crate::utils::parallel::*;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Atoms of two chains closer than this, in ångströms, put their residues in contact.
pub const CONTACT_DISTANCE: f64 = 3.5;

/// Directed interface record: growing from `fixed` toward `mobile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEntry {
    /// Subunit whose contact residues key this entry.
    pub fixed: SubunitId,
    /// Its partner in the same fragment, the chain placed when the entry is used.
    pub mobile: SubunitId,
    /// Contact residues on the partner side.
    pub partner_contacts: ContactSet,
}

type EntryTable = BTreeMap<IdentityId, BTreeMap<ContactSet, InteractionEntry>>;

/// Residues of `a` touching `b`, and residues of `b` touching `a`.
///
/// Residues are identified by sequence number only. A residue of `a` counts when any of
/// its atoms has a `b` atom within [`CONTACT_DISTANCE`]; every such `b` atom contributes
/// its residue to the second set.
pub fn compute_contacts(a: &Chain, b: &Chain) -> (ContactSet, ContactSet) {
    let grid = Grid::new(
        b.iter_residues()
            .flat_map(|r| r.iter_atoms().map(move |atom| (atom.pos, r.id))),
        CONTACT_DISTANCE,
    );

    let mut on_a = HashSet::new();
    let mut on_b = HashSet::new();
    for residue in a.iter_residues() {
        for atom in residue.iter_atoms() {
            let mut touching = grid.within(&atom.pos, CONTACT_DISTANCE).peekable();
            if touching.peek().is_some() {
                on_a.insert(residue.id);
                on_b.extend(touching.map(|(_, &id)| id));
            }
        }
    }

    (
        on_a.into_iter().collect(),
        on_b.into_iter().collect(),
    )
}

/// Interfaces of all fragments, keyed by identity class and contact set.
#[derive(Debug, Clone)]
pub struct ContactGraph {
    fragments: Vec<Fragment>,
    entries: EntryTable,
}

impl ContactGraph {
    /// Measures every fragment interface and records one directed entry per non-empty side.
    ///
    /// Fragments are inserted in order, so a later fragment replaces an earlier entry with
    /// the same identity and contact set. Subunits without an identity are skipped.
    pub fn build(fragments: Vec<Fragment>) -> Self {
        let contacts: Vec<(ContactSet, ContactSet)> = fragments
            .par_iter()
            .map(|f| compute_contacts(&f.subunit(0).chain, &f.subunit(1).chain))
            .collect();

        let mut entries = EntryTable::new();
        for (index, (fragment, (first, second))) in fragments.iter().zip(contacts).enumerate() {
            let (Some(id_first), Some(id_second)) =
                (fragment.subunit(0).identity, fragment.subunit(1).identity)
            else {
                warn!("Fragment '{}' has no identities assigned; skipped", fragment.name);
                continue;
            };
            if first.is_empty() {
                debug!("Fragment '{}' has no interface", fragment.name);
                continue;
            }

            let a = SubunitId::new(index, 0);
            let b = a.partner();
            entries.entry(id_first).or_default().insert(
                first.clone(),
                InteractionEntry {
                    fixed: a,
                    mobile: b,
                    partner_contacts: second.clone(),
                },
            );
            entries.entry(id_second).or_default().insert(
                second,
                InteractionEntry {
                    fixed: b,
                    mobile: a,
                    partner_contacts: first,
                },
            );
        }

        let graph = Self { fragments, entries };
        info!(
            "Interaction graph built: {} entries over {} identities",
            graph.entry_count(),
            graph.entries.len()
        );
        graph
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(|t| t.len()).sum()
    }

    /// Entries recorded for `identity`, ordered by contact set.
    pub fn entries(&self, identity: IdentityId) -> Option<&BTreeMap<ContactSet, InteractionEntry>> {
        self.entries.get(&identity)
    }

    /// Derives the outstanding interaction keys of every subunit referenced by an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoInteractions`] when no fragment has an interface.
    pub fn refine(self) -> Result<InteractionGraph, Error> {
        if self.entries.is_empty() {
            return Err(Error::NoInteractions);
        }

        let others = |identity: Option<IdentityId>, own: &ContactSet| -> Vec<ContactSet> {
            identity
                .and_then(|id| self.entries.get(&id))
                .map(|table| table.keys().filter(|k| *k != own).cloned().collect())
                .unwrap_or_default()
        };

        let mut pending = HashMap::new();
        for (&identity, table) in &self.entries {
            for (key, entry) in table {
                pending.insert(entry.fixed, others(Some(identity), key));
                let partner_identity = self.subunit(entry.mobile).identity;
                pending.insert(entry.mobile, others(partner_identity, &entry.partner_contacts));
            }
        }

        Ok(InteractionGraph {
            fragments: self.fragments,
            entries: self.entries,
            pending,
        })
    }

    fn subunit(&self, id: SubunitId) -> &Subunit {
        self.fragments[id.fragment].subunit(id.slot)
    }
}

/// Contact graph in which every referenced subunit knows its outstanding interactions.
///
/// Read-only during assembly and shared by all models.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    fragments: Vec<Fragment>,
    entries: EntryTable,
    pending: HashMap<SubunitId, Vec<ContactSet>>,
}

impl InteractionGraph {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn subunit(&self, id: SubunitId) -> &Subunit {
        self.fragments[id.fragment].subunit(id.slot)
    }

    pub fn entry(&self, identity: IdentityId, key: &ContactSet) -> Option<&InteractionEntry> {
        self.entries.get(&identity)?.get(key)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(|t| t.len()).sum()
    }

    /// Interaction keys `id` can still grow through; empty for unreferenced subunits.
    pub fn pending(&self, id: SubunitId) -> &[ContactSet] {
        self.pending.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entry the assembly starts from.
    ///
    /// Picks the identity with the most entries, the smallest symbol on ties, and its
    /// smallest contact set.
    pub fn seed(&self) -> Option<(IdentityId, &ContactSet, &InteractionEntry)> {
        let mut best: Option<(IdentityId, &BTreeMap<ContactSet, InteractionEntry>)> = None;
        for (&identity, table) in &self.entries {
            if best.is_none_or(|(_, t)| table.len() > t.len()) {
                best = Some((identity, table));
            }
        }
        let (identity, table) = best?;
        let (key, entry) = table.iter().next()?;
        Some((identity, key, entry))
    }
}
