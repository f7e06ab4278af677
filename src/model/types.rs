//! Shared scalar types and residue/element vocabularies used across the model.
//!
//! Polymer residues are resolved into [`StandardResidue`] so that sequence derivation and
//! backbone selection can be answered from a single table instead of string matching
//! scattered through the assembly code.

use nalgebra::Point3;
use std::fmt;
use std::str::FromStr;

/// Cartesian position in ångströms.
pub type Point = Point3<f64>;

/// Chemical elements encountered in biomolecular structure files.
///
/// Only the elements that routinely appear in polymers, cofactors, and crystallization
/// additives are enumerated; everything else collapses to [`Element::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    H = 1,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Se = 34,
    Br = 35,
    I = 53,
    Hg = 80,
    Unknown = 0,
}

impl Element {
    /// Periodic-table symbol with conventional capitalization.
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
            Element::Hg => "Hg",
            Element::Unknown => "X",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = String;

    /// Parses a symbol case-insensitively (`"FE"`, `"Fe"` and `"fe"` are equivalent).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let element = match s.trim().to_ascii_uppercase().as_str() {
            "H" | "D" => Element::H,
            "C" => Element::C,
            "N" => Element::N,
            "O" => Element::O,
            "F" => Element::F,
            "NA" => Element::Na,
            "MG" => Element::Mg,
            "P" => Element::P,
            "S" => Element::S,
            "CL" => Element::Cl,
            "K" => Element::K,
            "CA" => Element::Ca,
            "MN" => Element::Mn,
            "FE" => Element::Fe,
            "CO" => Element::Co,
            "NI" => Element::Ni,
            "CU" => Element::Cu,
            "ZN" => Element::Zn,
            "SE" => Element::Se,
            "BR" => Element::Br,
            "I" => Element::I,
            "HG" => Element::Hg,
            "X" => Element::Unknown,
            other => return Err(format!("Invalid element symbol: {}", other)),
        };
        Ok(element)
    }
}

/// Broad polymer family a residue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolymerKind {
    Protein,
    Dna,
    Rna,
}

impl PolymerKind {
    /// Name of the atom that represents one residue of this kind in backbone-only
    /// comparisons: the alpha carbon for amino acids, the sugar `C1'` for nucleotides.
    pub fn backbone_atom(&self) -> &'static str {
        match self {
            PolymerKind::Protein => "CA",
            PolymerKind::Dna | PolymerKind::Rna => "C1'",
        }
    }
}

impl fmt::Display for PolymerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PolymerKind::Protein => "protein",
            PolymerKind::Dna => "DNA",
            PolymerKind::Rna => "RNA",
        };
        write!(f, "{}", name)
    }
}

/// Residues with a canonical one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardResidue {
    ALA,
    ARG,
    ASN,
    ASP,
    CYS,
    GLN,
    GLU,
    GLY,
    HIS,
    ILE,
    LEU,
    LYS,
    MET,
    PHE,
    PRO,
    SER,
    THR,
    TRP,
    TYR,
    VAL,
    A,
    C,
    G,
    U,
    DA,
    DC,
    DG,
    DT,
}

impl StandardResidue {
    /// Residue name as written in PDB/mmCIF records.
    pub fn name(&self) -> &'static str {
        match self {
            StandardResidue::ALA => "ALA",
            StandardResidue::ARG => "ARG",
            StandardResidue::ASN => "ASN",
            StandardResidue::ASP => "ASP",
            StandardResidue::CYS => "CYS",
            StandardResidue::GLN => "GLN",
            StandardResidue::GLU => "GLU",
            StandardResidue::GLY => "GLY",
            StandardResidue::HIS => "HIS",
            StandardResidue::ILE => "ILE",
            StandardResidue::LEU => "LEU",
            StandardResidue::LYS => "LYS",
            StandardResidue::MET => "MET",
            StandardResidue::PHE => "PHE",
            StandardResidue::PRO => "PRO",
            StandardResidue::SER => "SER",
            StandardResidue::THR => "THR",
            StandardResidue::TRP => "TRP",
            StandardResidue::TYR => "TYR",
            StandardResidue::VAL => "VAL",
            StandardResidue::A => "A",
            StandardResidue::C => "C",
            StandardResidue::G => "G",
            StandardResidue::U => "U",
            StandardResidue::DA => "DA",
            StandardResidue::DC => "DC",
            StandardResidue::DG => "DG",
            StandardResidue::DT => "DT",
        }
    }

    /// Single-letter code used when deriving chain sequences.
    ///
    /// Nucleotides map to their base letter, so `DA` and `A` both yield `'A'`.
    pub fn one_letter_code(&self) -> char {
        match self {
            StandardResidue::ALA => 'A',
            StandardResidue::ARG => 'R',
            StandardResidue::ASN => 'N',
            StandardResidue::ASP => 'D',
            StandardResidue::CYS => 'C',
            StandardResidue::GLN => 'Q',
            StandardResidue::GLU => 'E',
            StandardResidue::GLY => 'G',
            StandardResidue::HIS => 'H',
            StandardResidue::ILE => 'I',
            StandardResidue::LEU => 'L',
            StandardResidue::LYS => 'K',
            StandardResidue::MET => 'M',
            StandardResidue::PHE => 'F',
            StandardResidue::PRO => 'P',
            StandardResidue::SER => 'S',
            StandardResidue::THR => 'T',
            StandardResidue::TRP => 'W',
            StandardResidue::TYR => 'Y',
            StandardResidue::VAL => 'V',
            StandardResidue::A | StandardResidue::DA => 'A',
            StandardResidue::C | StandardResidue::DC => 'C',
            StandardResidue::G | StandardResidue::DG => 'G',
            StandardResidue::U => 'U',
            StandardResidue::DT => 'T',
        }
    }

    pub fn kind(&self) -> PolymerKind {
        match self {
            StandardResidue::A | StandardResidue::C | StandardResidue::G | StandardResidue::U => {
                PolymerKind::Rna
            }
            StandardResidue::DA | StandardResidue::DC | StandardResidue::DG | StandardResidue::DT => {
                PolymerKind::Dna
            }
            _ => PolymerKind::Protein,
        }
    }
}

impl fmt::Display for StandardResidue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StandardResidue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ALA" => Ok(StandardResidue::ALA),
            "ARG" => Ok(StandardResidue::ARG),
            "ASN" => Ok(StandardResidue::ASN),
            "ASP" => Ok(StandardResidue::ASP),
            "CYS" => Ok(StandardResidue::CYS),
            "GLN" => Ok(StandardResidue::GLN),
            "GLU" => Ok(StandardResidue::GLU),
            "GLY" => Ok(StandardResidue::GLY),
            "HIS" => Ok(StandardResidue::HIS),
            "ILE" => Ok(StandardResidue::ILE),
            "LEU" => Ok(StandardResidue::LEU),
            "LYS" => Ok(StandardResidue::LYS),
            "MET" => Ok(StandardResidue::MET),
            "PHE" => Ok(StandardResidue::PHE),
            "PRO" => Ok(StandardResidue::PRO),
            "SER" => Ok(StandardResidue::SER),
            "THR" => Ok(StandardResidue::THR),
            "TRP" => Ok(StandardResidue::TRP),
            "TYR" => Ok(StandardResidue::TYR),
            "VAL" => Ok(StandardResidue::VAL),
            "A" => Ok(StandardResidue::A),
            "C" => Ok(StandardResidue::C),
            "G" => Ok(StandardResidue::G),
            "U" => Ok(StandardResidue::U),
            "DA" => Ok(StandardResidue::DA),
            "DC" => Ok(StandardResidue::DC),
            "DG" => Ok(StandardResidue::DG),
            "DT" => Ok(StandardResidue::DT),
            _ => Err(format!("Invalid standard residue: {}", s)),
        }
    }
}

/// One-letter code emitted for residues outside the standard vocabulary.
pub const UNKNOWN_RESIDUE_CODE: char = 'X';
