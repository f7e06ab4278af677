//! Shared fixtures for integration tests.
//!
//! Fragments are straight rods of twelve residues along x (CA every 3.8 Å plus an N
//! offset from it), written as PDB text so the tests exercise the reader as well.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const RESIDUE_COUNT: usize = 12;

/// Path to the compiled `bioassembler` binary.
pub fn bioassembler_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bioassembler"))
}

/// Runs the binary with `args` and returns its captured output.
pub fn run_bioassembler(args: &[&str]) -> Output {
    Command::new(bioassembler_binary())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute bioassembler binary")
}

fn atom_line(
    serial: usize,
    name: &str,
    res_name: &str,
    chain: char,
    res_seq: usize,
    pos: [f64; 3],
    element: &str,
) -> String {
    format!(
        "ATOM  {serial:>5}  {name:<3} {res_name:>3} {chain}{res_seq:>4}    {x:>8.3}{y:>8.3}{z:>8.3}{occ:>6.2}{b:>6.2}          {element:>2}",
        x = pos[0],
        y = pos[1],
        z = pos[2],
        occ = 1.0,
        b = 20.0,
    )
}

/// PDB records for one rod of `res_name` residues with chain label `chain`.
pub fn rod(chain: char, res_name: &str, offset: [f64; 3]) -> String {
    let mut text = String::new();
    for i in 0..RESIDUE_COUNT {
        let ca = [offset[0] + 3.8 * i as f64, offset[1], offset[2]];
        let n = [ca[0] - 1.2, ca[1] + 0.6, ca[2] + 0.3];
        let serial = 2 * i + 1;
        writeln!(text, "{}", atom_line(serial, "N", res_name, chain, i + 1, n, "N")).unwrap();
        writeln!(text, "{}", atom_line(serial + 1, "CA", res_name, chain, i + 1, ca, "C")).unwrap();
    }
    text.push_str("TER\n");
    text
}

/// Writes a PDB file holding the given rods and returns its path.
pub fn write_pdb(dir: &Path, file_name: &str, rods: &[String]) -> PathBuf {
    let path = dir.join(file_name);
    let mut text = rods.concat();
    text.push_str("END\n");
    fs::write(&path, text).expect("failed to write fixture");
    path
}

/// Two fragments: ALA-GLY stacked 3 Å apart in y, and GLY-SER with the serine rod lying
/// 3 Å above the second half of the glycine rod.
pub fn write_chain_of_three(dir: &Path) {
    write_pdb(
        dir,
        "ab.pdb",
        &[rod('A', "ALA", [0.0, 0.0, 0.0]), rod('B', "GLY", [0.0, 3.0, 0.0])],
    );
    write_pdb(
        dir,
        "bc.pdb",
        &[
            rod('A', "GLY", [10.0, 10.0, 10.0]),
            rod('B', "SER", [32.8, 10.0, 13.0]),
        ],
    );
}

/// `_atom_site` rows of an mmCIF text, split into whitespace-separated tokens.
pub fn atom_rows(cif: &str) -> Vec<Vec<String>> {
    cif.lines()
        .filter(|line| line.starts_with("ATOM ") || line.starts_with("HETATM "))
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}
