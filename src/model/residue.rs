use super::atom::Atom;
use super::types::{PolymerKind, StandardResidue, UNKNOWN_RESIDUE_CODE};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: i32,
    pub insertion_code: Option<char>,
    pub name: String,
    pub standard_name: Option<StandardResidue>,
    /// `true` when the residue was read from `HETATM` records (ligands, ions, waters).
    pub hetero: bool,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(
        id: i32,
        insertion_code: Option<char>,
        name: &str,
        standard_name: Option<StandardResidue>,
        hetero: bool,
    ) -> Self {
        Self {
            id,
            insertion_code,
            name: name.to_string(),
            standard_name,
            hetero,
            atoms: Vec::new(),
        }
    }

    pub fn is_polymer(&self) -> bool {
        !self.hetero
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom(&atom.name).is_none(),
            "Attempted to add a duplicate atom name '{}' to residue '{}'",
            atom.name,
            self.name
        );
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn iter_atoms_mut(&mut self) -> std::slice::IterMut<'_, Atom> {
        self.atoms.iter_mut()
    }

    /// One-letter code contributed to the chain sequence, `X` for unrecognized residues.
    pub fn one_letter_code(&self) -> char {
        self.standard_name
            .map(|s| s.one_letter_code())
            .unwrap_or(UNKNOWN_RESIDUE_CODE)
    }

    /// The single atom standing in for this residue in backbone-only comparisons.
    ///
    /// Standard residues use the atom of their polymer kind. Unrecognized polymer residues
    /// fall back to whichever of `CA` or `C1'` they carry. Hetero residues have none, so a
    /// calcium ion named `CA` is never mistaken for an alpha carbon.
    pub fn backbone_atom(&self) -> Option<&Atom> {
        if self.hetero {
            return None;
        }
        match self.standard_name {
            Some(std) => self.atom(std.kind().backbone_atom()),
            None => self
                .atom(PolymerKind::Protein.backbone_atom())
                .or_else(|| self.atom(PolymerKind::Rna.backbone_atom())),
        }
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let icode = self.insertion_code.map(String::from).unwrap_or_default();
        write!(
            f,
            "Residue {{ id: {}{}, name: \"{}\", hetero: {}, atoms: {} }}",
            self.id,
            icode,
            self.name,
            self.hetero,
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{Element, Point};

    fn residue_with_atoms(
        name: &str,
        standard: Option<StandardResidue>,
        hetero: bool,
        atoms: &[&str],
    ) -> Residue {
        let mut residue = Residue::new(1, None, name, standard, hetero);
        for (i, atom) in atoms.iter().enumerate() {
            residue.add_atom(Atom::new(atom, Element::C, Point::new(i as f64, 0.0, 0.0)));
        }
        residue
    }

    #[test]
    fn backbone_atom_uses_alpha_carbon_for_amino_acids() {
        let residue = residue_with_atoms("ALA", Some(StandardResidue::ALA), false, &["N", "CA"]);

        assert_eq!(residue.backbone_atom().unwrap().name, "CA");
    }

    #[test]
    fn backbone_atom_uses_sugar_carbon_for_nucleotides() {
        let residue = residue_with_atoms("DG", Some(StandardResidue::DG), false, &["P", "C1'"]);

        assert_eq!(residue.backbone_atom().unwrap().name, "C1'");
    }

    #[test]
    fn backbone_atom_ignores_hetero_residues() {
        let ion = residue_with_atoms("CA", None, true, &["CA"]);

        assert!(ion.backbone_atom().is_none());
    }

    #[test]
    fn backbone_atom_falls_back_for_unknown_polymer_residues() {
        let residue = residue_with_atoms("MSE", None, false, &["N", "CA", "SE"]);

        assert_eq!(residue.backbone_atom().unwrap().name, "CA");
        assert_eq!(residue.one_letter_code(), 'X');
    }

    #[test]
    fn residue_display_includes_insertion_code() {
        let mut residue = Residue::new(10, Some('A'), "SER", Some(StandardResidue::SER), false);
        residue.add_atom(Atom::new("CA", Element::C, Point::origin()));

        assert_eq!(
            residue.to_string(),
            "Residue { id: 10A, name: \"SER\", hetero: false, atoms: 1 }"
        );
    }
}
