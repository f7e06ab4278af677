//! Utility modules providing cross-cutting functionality.
//!
//! Currently only the parallel iteration shim, which lets the assembly code use the same
//! `par_iter` calls with or without the `parallel` feature.

pub mod parallel;
