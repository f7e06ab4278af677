//! # BioAssembler
//!
//! **BioAssembler** builds large macromolecular complexes out of pairwise interaction
//! structures. Every input fragment holds exactly two interacting chains; the crate works out
//! which chains are copies of the same molecule, records the residue interfaces between them,
//! and then grows a complex by repeatedly superimposing fragments onto chains already
//! placed, rejecting placements that overlap existing backbone.
//!
//! ## Features
//!
//! - **Identity unification** – Chains are grouped by sequence, either by exact match or by
//!   global alignment at 95% identity, and labelled with compact one-character symbols.
//! - **Interaction graph** – Residue contacts within 3.5 Å are measured for every fragment and
//!   indexed per identity, so each placed chain knows which interfaces it may still use.
//! - **Clash-aware growth** – Candidate chains are placed by Kabsch superposition and accepted
//!   only when fewer than 3% of their backbone atoms come within 2 Å of the complex.
//! - **Stoichiometry** – Copy numbers can be capped from a literal such as `A:2,B:1` or counted
//!   from a reference structure.
//! - **I/O** – PDB fragments in, mmCIF models out, with one asym id per placed chain.
//!
//! ## Example
//!
//! ```no_run
//! use bio_assembler::io::{read_pdb_directory, write_mmcif_complex};
//! use bio_assembler::ops::{AssemblyConfig, assemble};
//! use bio_assembler::Fragment;
//! use std::fs::File;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fragments = read_pdb_directory(Path::new("fragments"))?
//!     .into_iter()
//!     .map(|(name, structure)| Fragment::from_structure(name, structure))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let run = assemble(fragments, None, &AssemblyConfig::default(), &())?;
//! for outcome in &run.models {
//!     let file = File::create(format!("{}.cif", outcome.complex.id))?;
//!     write_mmcif_complex(file, &outcome.complex)?;
//! }
//! # Ok(())
//! # }
//! ```

mod model;
mod utils;

pub mod io;
pub mod ops;

pub use model::atom::Atom;
pub use model::chain::Chain;
pub use model::complex::{Complex, InteractionState, PlacedSubunit, asym_id};
pub use model::fragment::{ContactSet, Fragment, FragmentError, Subunit, SubunitId};
pub use model::grid::Grid;
pub use model::identity::{IDENTITY_ALPHABET, IdentityId, MAX_IDENTITIES, SequenceRegistry};
pub use model::residue::Residue;
pub use model::structure::Structure;
pub use model::types::{Element, Point, PolymerKind, StandardResidue, UNKNOWN_RESIDUE_CODE};
