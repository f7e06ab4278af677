//! Atom records carried by residues: a label, an element, and a Cartesian position.
//!
//! Rigid-body placement during assembly rewrites only `pos`; names and elements are never
//! touched once a structure has been read.

use super::types::{Element, Point};
use nalgebra::{Matrix3, Vector3};
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with a fixed element and mutable position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in the source file (e.g., `CA`, `C1'`).
    pub name: SmolStr,
    /// Chemical element.
    pub element: Element,
    /// Cartesian coordinates in ångströms.
    pub pos: Point,
}

impl Atom {
    /// Creates a new atom from a name, element, and position.
    pub fn new(name: &str, element: Element, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name),
            element,
            pos,
        }
    }

    /// Squared Euclidean distance to another atom, in Å².
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }

    /// Euclidean distance to another atom, in Å.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }

    /// Applies `rotation * pos + translation` in place.
    ///
    /// # Arguments
    ///
    /// * `rotation` - Proper rotation matrix.
    /// * `translation` - Displacement applied after the rotation, in ångströms.
    pub fn transform(&mut self, rotation: &Matrix3<f64>, translation: &Vector3<f64>) {
        self.pos = Point::from(rotation * self.pos.coords + translation);
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
            self.name, self.element, self.pos.x, self.pos.y, self.pos.z
        )
    }
}
