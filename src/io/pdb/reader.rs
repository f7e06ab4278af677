use crate::io::error::Error;
use crate::model::{
    atom::Atom,
    chain::Chain,
    residue::Residue,
    structure::Structure,
    types::{Element, Point, StandardResidue},
};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

const FORMAT: &str = "PDB";

type ResKey = (i32, Option<char>);

struct TempResidue {
    key: ResKey,
    raw_name: String,
    is_hetatm: bool,
    atoms: HashMap<String, (f64, Atom)>,
}

#[derive(Default)]
struct TempChain {
    residues: Vec<TempResidue>,
    index: HashMap<ResKey, usize>,
}

/// Parses the first model of a PDB stream.
///
/// Chains and residues keep the order in which they first appear. When an atom is listed
/// more than once (alternate locations), the copy with the highest occupancy is kept.
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut chain_order: Vec<String> = Vec::new();
    let mut chain_map: HashMap<String, TempChain> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line_num = index + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;

        if line.starts_with("ENDMDL") {
            break;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");

        if is_atom || is_hetatm {
            parse_atom_record(&line, line_num, is_hetatm, &mut chain_order, &mut chain_map)?;
        }
    }

    let mut structure = Structure::new();
    for chain_id in chain_order {
        let Some(temp_chain) = chain_map.remove(&chain_id) else {
            continue;
        };
        let mut chain = Chain::new(&chain_id);

        for temp_res in temp_chain.residues {
            let standard = StandardResidue::from_str(&temp_res.raw_name).ok();
            let mut residue = Residue::new(
                temp_res.key.0,
                temp_res.key.1,
                &temp_res.raw_name,
                standard,
                temp_res.is_hetatm,
            );

            let mut sorted_atoms: Vec<Atom> = temp_res.atoms.into_values().map(|v| v.1).collect();
            sorted_atoms.sort_by(|a, b| a.name.cmp(&b.name));

            for atom in sorted_atoms {
                residue.add_atom(atom);
            }

            chain.add_residue(residue);
        }
        structure.add_chain(chain);
    }

    Ok(structure)
}

/// Opens and parses `path`, tagging any failure with the file name.
pub fn read_file(path: &Path) -> Result<Structure, Error> {
    let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    read(BufReader::new(file)).map_err(|e| e.with_path(path))
}

/// Reads every `*.pdb` file of `dir`, sorted by file name.
///
/// Returns `(file stem, structure)` pairs. Subdirectories and other extensions are skipped.
pub fn read_directory(dir: &Path) -> Result<Vec<(String, Structure)>, Error> {
    if !dir.is_dir() {
        return Err(Error::missing_directory(dir));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| Error::from_io(e, Some(dir.to_path_buf())))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| Error::from_io(e, Some(dir.to_path_buf())))?
            .path();
        let is_pdb = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdb"));
        if is_pdb && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            read_file(&path).map(|structure| (name, structure))
        })
        .collect()
}

fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

fn parse_coordinate(line: &str, start: usize, axis: char, line_num: usize) -> Result<f64, Error> {
    column(line, start, start + 8)
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::parse(FORMAT, None, line_num, format!("Invalid {} coordinate", axis)))
}

fn parse_atom_record(
    line: &str,
    line_num: usize,
    is_hetatm: bool,
    chain_order: &mut Vec<String>,
    chain_map: &mut HashMap<String, TempChain>,
) -> Result<(), Error> {
    if line.len() < 54 {
        return Err(Error::parse(FORMAT, None, line_num, "Atom record too short"));
    }

    let name_field = column(line, 12, 16);
    let atom_name = name_field.trim().to_string();
    let res_name = column(line, 17, 20).trim().to_string();
    let chain_id = column(line, 21, 22).to_string();
    let i_code = column(line, 26, 27).chars().next().filter(|c| *c != ' ');

    let res_seq = column(line, 22, 26)
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::parse(FORMAT, None, line_num, "Invalid residue sequence number"))?;

    let pos = Point::new(
        parse_coordinate(line, 30, 'X', line_num)?,
        parse_coordinate(line, 38, 'Y', line_num)?,
        parse_coordinate(line, 46, 'Z', line_num)?,
    );

    let occupancy = column(line, 54, 60).trim().parse::<f64>().unwrap_or(1.0);

    let element_field = column(line, 76, 78).trim();
    let element = if element_field.is_empty() {
        parse_element_from_name(name_field, is_hetatm)
    } else {
        Element::from_str(element_field).unwrap_or(Element::Unknown)
    };

    let temp_chain = chain_map.entry(chain_id.clone()).or_insert_with(|| {
        chain_order.push(chain_id.clone());
        TempChain::default()
    });

    let key = (res_seq, i_code);
    let slot = match temp_chain.index.get(&key) {
        Some(&slot) => slot,
        None => {
            temp_chain.residues.push(TempResidue {
                key,
                raw_name: res_name,
                is_hetatm,
                atoms: HashMap::new(),
            });
            let slot = temp_chain.residues.len() - 1;
            temp_chain.index.insert(key, slot);
            slot
        }
    };
    let temp_res = &mut temp_chain.residues[slot];

    let keep = temp_res
        .atoms
        .get(&atom_name)
        .is_none_or(|(old_occ, _)| occupancy > *old_occ);
    if keep {
        let atom = Atom::new(&atom_name, element, pos);
        temp_res.atoms.insert(atom_name, (occupancy, atom));
    }

    Ok(())
}

/// Infers the element from the raw four-column atom name field.
///
/// Element symbols are right-justified in columns 13-14, so a name starting in column 13
/// of a `HETATM` record (`FE  `, `ZN  `) may carry a two-letter symbol. Everything else,
/// including ` CA ` in a polymer residue, is read as a one-letter symbol.
fn parse_element_from_name(field: &str, is_hetatm: bool) -> Element {
    let letters: String = field
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if letters.is_empty() {
        return Element::Unknown;
    }

    let left_aligned = field.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if is_hetatm
        && left_aligned
        && letters.len() >= 2
        && let Ok(el) = Element::from_str(&letters[0..2])
    {
        return el;
    }

    Element::from_str(&letters[0..1]).unwrap_or(Element::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const FRAGMENT: &str = "\
HEADER    TEST FRAGMENT
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00 20.00           N
ATOM      2  CA  MET A   1      11.639   6.071  -5.147  1.00 20.00           C
ATOM      3  CA AGLY A   2      12.000   7.000  -4.000  0.40 20.00           C
ATOM      4  CA BGLY A   2      12.500   7.500  -4.500  0.60 20.00           C
ATOM      5  C1'  DA B  10       1.000   2.000   3.000  1.00 20.00
HETATM    6 ZN    ZN B 101       5.000   5.000   5.000  1.00 20.00
HETATM    7  O   HOH B 201       9.000   9.000   9.000  1.00 20.00           O
ENDMDL
ATOM      8  CA  ALA C   1       0.000   0.000   0.000  1.00 20.00           C
";

    #[test]
    fn reads_first_model_in_order() {
        let structure = read(Cursor::new(FRAGMENT)).unwrap();

        assert_eq!(structure.chain_count(), 2);
        let ids: Vec<&str> = structure.iter_chains().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(structure.chain("A").unwrap().sequence(), "MG");
        assert_eq!(structure.chain("B").unwrap().sequence(), "A");
    }

    #[test]
    fn alternate_location_keeps_highest_occupancy() {
        let structure = read(Cursor::new(FRAGMENT)).unwrap();
        let gly = structure.chain("A").unwrap().residue(2, None).unwrap();

        assert_eq!(gly.atom_count(), 1);
        assert_eq!(gly.atom("CA").unwrap().pos, Point::new(12.5, 7.5, -4.5));
    }

    #[test]
    fn hetero_residues_are_flagged_and_elements_inferred() {
        let structure = read(Cursor::new(FRAGMENT)).unwrap();
        let chain = structure.chain("B").unwrap();

        let zinc = chain.residue(101, None).unwrap();
        assert!(zinc.hetero);
        assert_eq!(zinc.standard_name, None);
        assert_eq!(zinc.atom("ZN").unwrap().element, Element::Zn);

        let dna = chain.residue(10, None).unwrap();
        assert_eq!(dna.standard_name, Some(StandardResidue::DA));
        assert_eq!(dna.atom("C1'").unwrap().element, Element::C);
    }

    #[test]
    fn polymer_ca_is_carbon_not_calcium() {
        assert_eq!(parse_element_from_name(" CA ", false), Element::C);
        assert_eq!(parse_element_from_name("CA  ", true), Element::Ca);
        assert_eq!(parse_element_from_name("1HB ", false), Element::H);
        assert_eq!(parse_element_from_name("    ", false), Element::Unknown);
    }

    #[test]
    fn unknown_polymer_residue_is_kept() {
        let pdb = "ATOM      1  CA  MSE A   1       0.000   0.000   0.000  1.00 20.00           C\n";
        let structure = read(Cursor::new(pdb)).unwrap();
        let residue = structure.chain("A").unwrap().residue(1, None).unwrap();

        assert_eq!(residue.name, "MSE");
        assert_eq!(residue.standard_name, None);
        assert!(!residue.hetero);
        assert_eq!(structure.chain("A").unwrap().sequence(), "X");
    }

    #[test]
    fn insertion_codes_split_residues() {
        let pdb = "\
ATOM      1  CA  ALA A  52       0.000   0.000   0.000  1.00 20.00           C
ATOM      2  CA  GLY A  52A      3.800   0.000   0.000  1.00 20.00           C
";
        let structure = read(Cursor::new(pdb)).unwrap();
        let chain = structure.chain("A").unwrap();

        assert_eq!(chain.residue_count(), 2);
        assert!(chain.residue(52, Some('A')).is_some());
    }

    #[test]
    fn malformed_coordinate_reports_line() {
        let pdb = "\
REMARK
ATOM      1  CA  ALA A   1       0.000   abc     0.000  1.00 20.00           C
";
        let err = read(Cursor::new(pdb)).unwrap_err();

        match err {
            Error::Parse {
                line_number,
                details,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(details, "Invalid Y coordinate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_record_is_rejected() {
        let err = read(Cursor::new("ATOM      1  CA  ALA A   1\n")).unwrap_err();

        assert!(matches!(err, Error::Parse { line_number: 1, .. }));
    }

    #[test]
    fn read_file_attaches_path() {
        let err = read_file(Path::new("/nonexistent/fragment.pdb")).unwrap_err();

        assert!(err.to_string().contains("fragment.pdb"));
    }
}
