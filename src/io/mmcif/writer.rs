//! mmCIF serialization of assembled complexes.
//!
//! Each model becomes one `data_` block holding an `_entity_poly_seq` loop, with one entity
//! per identity class present, and an `_atom_site` loop in which every placed chain receives
//! its own asym id.

use crate::io::error::Error;
use crate::model::{
    atom::Atom,
    complex::{Complex, asym_id},
    identity::IdentityId,
    residue::Residue,
};
use std::collections::BTreeMap;
use std::io::Write;

const ATOM_SITE_HEADERS: [&str; 19] = [
    "_atom_site.group_PDB",
    "_atom_site.id",
    "_atom_site.type_symbol",
    "_atom_site.label_atom_id",
    "_atom_site.label_alt_id",
    "_atom_site.label_comp_id",
    "_atom_site.label_asym_id",
    "_atom_site.label_entity_id",
    "_atom_site.label_seq_id",
    "_atom_site.pdbx_PDB_ins_code",
    "_atom_site.Cartn_x",
    "_atom_site.Cartn_y",
    "_atom_site.Cartn_z",
    "_atom_site.occupancy",
    "_atom_site.B_iso_or_equiv",
    "_atom_site.auth_seq_id",
    "_atom_site.auth_comp_id",
    "_atom_site.auth_asym_id",
    "_atom_site.pdbx_PDB_model_num",
];

/// Serializes a [`Complex`] as a single-model mmCIF data block.
///
/// Chains are written in placement order and labelled with [`asym_id`]. The entity id of a
/// chain is its identity index plus one, so every copy of an identity shares an entity.
///
/// # Arguments
///
/// * `writer` - Destination that implements [`Write`].
/// * `complex` - The assembled model to serialize.
///
/// # Returns
///
/// [`Ok`] on success or [`Error`] if any IO operation fails.
pub fn write_complex<W: Write>(writer: W, complex: &Complex) -> Result<(), Error> {
    let mut ctx = WriterContext::new(writer);

    ctx.write_header(&complex.id)?;
    ctx.write_entities(complex)?;
    ctx.write_atoms(complex)?;

    ctx.writer.flush().map_err(|e| Error::from_io(e, None))
}

fn entity_id(identity: IdentityId) -> usize {
    identity.index() + 1
}

/// Stateful helper that numbers atoms across the whole block.
struct WriterContext<W> {
    writer: W,
    current_atom_id: usize,
}

impl<W: Write> WriterContext<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            current_atom_id: 1,
        }
    }

    fn line(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.writer, "{}", text).map_err(|e| Error::from_io(e, None))
    }

    fn write_header(&mut self, id: &str) -> Result<(), Error> {
        let block = id.replace(char::is_whitespace, "_");
        self.line(&format!("data_{}", block))?;
        self.line("#")
    }

    /// Writes the polymer sequence of the first placed copy of each identity.
    fn write_entities(&mut self, complex: &Complex) -> Result<(), Error> {
        let mut representatives: BTreeMap<IdentityId, Vec<&Residue>> = BTreeMap::new();
        for subunit in complex.subunits() {
            representatives
                .entry(subunit.identity)
                .or_insert_with(|| subunit.chain.iter_residues().filter(|r| r.is_polymer()).collect());
        }

        if representatives.values().all(|residues| residues.is_empty()) {
            return Ok(());
        }

        self.line("loop_")?;
        self.line("_entity_poly_seq.entity_id")?;
        self.line("_entity_poly_seq.num")?;
        self.line("_entity_poly_seq.mon_id")?;
        self.line("_entity_poly_seq.hetero")?;

        for (identity, residues) in &representatives {
            for (num, residue) in residues.iter().enumerate() {
                let row = format!(
                    "{} {} {} n",
                    entity_id(*identity),
                    num + 1,
                    quote_string(&residue.name)
                );
                self.line(&row)?;
            }
        }
        self.line("#")
    }

    fn write_atoms(&mut self, complex: &Complex) -> Result<(), Error> {
        self.line("loop_")?;
        for header in ATOM_SITE_HEADERS {
            self.line(header)?;
        }

        for (index, subunit) in complex.subunits().iter().enumerate() {
            let asym = asym_id(index);
            let entity = entity_id(subunit.identity);
            let mut polymer_index = 0usize;

            for residue in subunit.chain.iter_residues() {
                let label_seq_id = if residue.is_polymer() {
                    polymer_index += 1;
                    polymer_index.to_string()
                } else {
                    ".".to_string()
                };
                for atom in residue.iter_atoms() {
                    self.write_atom_record(atom, residue, &asym, entity, &label_seq_id)?;
                }
            }
        }
        self.line("#")
    }

    fn write_atom_record(
        &mut self,
        atom: &Atom,
        residue: &Residue,
        asym: &str,
        entity: usize,
        label_seq_id: &str,
    ) -> Result<(), Error> {
        let group_pdb = if residue.hetero { "HETATM" } else { "ATOM" };
        let atom_id = self.current_atom_id;
        self.current_atom_id += 1;

        let atom_name = quote_string(&atom.name);
        let comp_id = quote_string(&residue.name);
        let ins_code = residue
            .insertion_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());

        writeln!(
            self.writer,
            "{group_pdb} {atom_id} {type_symbol} {atom_name} . {comp_id} {asym} {entity} {label_seq_id} {ins_code} {x:.3} {y:.3} {z:.3} 1.00 0.00 {auth_seq_id} {comp_id} {asym} 1",
            type_symbol = atom.element.symbol(),
            x = atom.pos.x,
            y = atom.pos.y,
            z = atom.pos.z,
            auth_seq_id = residue.id,
        )
        .map_err(|e| Error::from_io(e, None))
    }
}

/// Wraps strings containing whitespace or quotes with CIF-safe quoting.
///
/// Empty strings become `?`, single quotes trigger double-quote wrapping, and all other
/// cases fall back to single quotes.
fn quote_string(s: &str) -> String {
    if s.is_empty() {
        return "?".to_string();
    }
    if !s.contains(char::is_whitespace) && !s.contains('\'') && !s.contains('"') {
        return s.to_string();
    }
    if s.contains('\'') && !s.contains('"') {
        return format!("\"{}\"", s);
    }
    format!("'{}'", s)
}
