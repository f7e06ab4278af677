use super::atom::Atom;
use super::residue::Residue;
use nalgebra::{Matrix3, Vector3};
use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: SmolStr,
    residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: &str) -> Self {
        Self {
            id: SmolStr::new(id),
            residues: Vec::new(),
        }
    }

    pub fn add_residue(&mut self, residue: Residue) {
        debug_assert!(
            self.residue(residue.id, residue.insertion_code).is_none(),
            "Attempted to add a duplicate residue ID '{}' to chain '{}'",
            residue.id,
            self.id
        );
        self.residues.push(residue);
    }

    pub fn residue(&self, id: i32, insertion_code: Option<char>) -> Option<&Residue> {
        self.residues
            .iter()
            .find(|r| r.id == id && r.insertion_code == insertion_code)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn iter_residues(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    /// Atoms in residue order, then in the order each residue stores them.
    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|r| r.iter_atoms())
    }

    pub fn iter_atoms_mut(&mut self) -> impl Iterator<Item = &mut Atom> {
        self.residues.iter_mut().flat_map(|r| r.iter_atoms_mut())
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atom_count()).sum()
    }

    /// One representative atom per polymer residue (see [`Residue::backbone_atom`]).
    pub fn backbone_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().filter_map(|r| r.backbone_atom())
    }

    /// Atoms in residue order, each residue's atoms sorted by name.
    ///
    /// Two chains of the same sequence list their atoms in the same order here regardless
    /// of how the source file ordered them.
    pub fn canonical_atoms(&self) -> Vec<&Atom> {
        self.residues
            .iter()
            .flat_map(|r| {
                let mut atoms: Vec<&Atom> = r.iter_atoms().collect();
                atoms.sort_by(|a, b| a.name.cmp(&b.name));
                atoms
            })
            .collect()
    }

    /// Sequence of one-letter codes over the polymer (non-`HETATM`) residues.
    pub fn sequence(&self) -> String {
        self.residues
            .iter()
            .filter(|r| r.is_polymer())
            .map(|r| r.one_letter_code())
            .collect()
    }

    /// Applies a rigid-body motion to every atom of the chain.
    pub fn transform(&mut self, rotation: &Matrix3<f64>, translation: &Vector3<f64>) {
        for atom in self.iter_atoms_mut() {
            atom.transform(rotation, translation);
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {{ id: \"{}\", residues: {} }}",
            self.id,
            self.residue_count()
        )
    }
}
