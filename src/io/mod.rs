//! IO front-end: PDB input for fragments and templates, mmCIF output for assembled models.
//!
//! Fragment directories are read in file-name order so identity assignment is reproducible
//! across runs and platforms.

mod error;
mod mmcif;
mod pdb;

pub use pdb::reader::{
    read as read_pdb_structure, read_directory as read_pdb_directory,
    read_file as read_pdb_file,
};

pub use mmcif::writer::write_complex as write_mmcif_complex;

pub use error::Error;
