//! Sequence-based identity unification across all fragment chains.

use super::align::align_global;
use super::error::Error;
use crate::model::fragment::Fragment;
use crate::model::identity::{IdentityId, MAX_IDENTITIES, SequenceRegistry};
use log::{debug, info};

/// Minimum fraction of identical aligned positions for two sequences to share an identity.
pub const HOMOLOGY_THRESHOLD: f64 = 0.95;

/// Assigns an identity class to every chain of every fragment, in input order.
///
/// A chain reuses the class of an identical sequence when one is known. Otherwise it joins
/// the class of the first known sequence it aligns to with at least [`HOMOLOGY_THRESHOLD`]
/// identity, scanning every recorded sequence in discovery order, or opens a new class.
///
/// # Errors
///
/// Returns [`Error::TooManyIdentities`] once more classes are needed than the identity
/// alphabet provides.
pub fn unify_identities(fragments: &mut [Fragment]) -> Result<SequenceRegistry, Error> {
    let mut registry = SequenceRegistry::new();

    for fragment in fragments.iter_mut() {
        for subunit in fragment.subunits_mut().iter_mut() {
            let sequence = subunit.chain.sequence();
            let identity = match registry.identify(&sequence) {
                Some(id) => id,
                None => classify(&mut registry, &sequence)?,
            };
            registry.record(&sequence, identity);
            subunit.identity = Some(identity);
        }
    }

    info!(
        "Unified {} chains into {} identity classes",
        fragments.len() * 2,
        registry.class_count()
    );
    Ok(registry)
}

fn classify(registry: &mut SequenceRegistry, sequence: &str) -> Result<IdentityId, Error> {
    if let Some(id) = find_homolog(registry, sequence) {
        debug!("Sequence of length {} merged into identity {}", sequence.len(), id);
        return Ok(id);
    }
    let id = registry
        .open_class(sequence)
        .ok_or(Error::TooManyIdentities {
            limit: MAX_IDENTITIES,
        })?;
    debug!("New identity {} for sequence of length {}", id, sequence.len());
    Ok(id)
}

fn find_homolog(registry: &SequenceRegistry, sequence: &str) -> Option<IdentityId> {
    registry
        .sequences()
        .find(|(known, _)| align_global(sequence, known).identity_fraction() >= HOMOLOGY_THRESHOLD)
        .map(|(_, id)| id)
}
