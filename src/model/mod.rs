//! Core data structures for fragments, chains, and assembled complexes.
//!
//! Readers produce [`structure::Structure`] values, which are wrapped into two-chain
//! [`fragment::Fragment`]s for assembly. The engine grows a [`complex::Complex`] whose
//! placed chains share unmodified coordinates with the inputs through `Arc`.

pub mod atom;
pub mod chain;
pub mod complex;
pub mod fragment;
pub mod grid;
pub mod identity;
pub mod residue;
pub mod structure;
pub mod types;
