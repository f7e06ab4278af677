//! Assembly operations: identity unification, interaction graphs, and complex growth.
//!
//! The submodules follow the data flow of a build. [`unify_identities`] labels every
//! fragment chain, [`ContactGraph`] records the interfaces and refines into an
//! [`InteractionGraph`], and an [`Assembler`] grows models from it, consulting a
//! [`ClashDetector`] and an optional [`Stoichiometry`]. [`assemble`] runs the whole chain.

mod align;
mod assemble;
mod clash;
mod error;
mod interaction;
mod stoichiometry;
mod superpose;
mod unify;

pub use align::{GAP, GlobalAlignment, align_global};

pub use unify::{HOMOLOGY_THRESHOLD, unify_identities};

pub use interaction::{
    CONTACT_DISTANCE, ContactGraph, InteractionEntry, InteractionGraph, compute_contacts,
};

pub use clash::{CLASH_DISTANCE, CLASH_FRACTION_LIMIT, ClashDetector};

pub use superpose::{RigidTransform, SuperpositionError, fit_pairs, superpose};

pub use stoichiometry::{Stoichiometry, StoichiometrySource};

pub use assemble::{
    Assembler, AssemblyConfig, AssemblyRun, GrowthObserver, GrowthStats, ModelOutcome,
    Termination, assemble,
};

pub use error::Error;
