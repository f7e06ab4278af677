//! Backbone overlap test for candidate placements.

use crate::model::chain::Chain;
use crate::model::complex::Complex;
use crate::model::grid::Grid;

/// Backbone atoms closer than this, in ångströms, clash.
pub const CLASH_DISTANCE: f64 = 2.0;

/// Candidates with at least this fraction of clashing backbone atoms are rejected.
pub const CLASH_FRACTION_LIMIT: f64 = 0.03;

/// Spatial index over the backbone atoms of a complex.
///
/// Valid for the complex it was built from; rebuild after every accepted addition.
#[derive(Debug, Clone)]
pub struct ClashDetector {
    grid: Grid<()>,
}

impl ClashDetector {
    pub fn new(complex: &Complex) -> Self {
        let points = complex
            .iter_chains()
            .flat_map(|chain| chain.backbone_atoms())
            .map(|atom| (atom.pos, ()));
        Self {
            grid: Grid::new(points, CLASH_DISTANCE),
        }
    }

    /// Fraction of the candidate's backbone atoms within [`CLASH_DISTANCE`] of the complex.
    ///
    /// `None` when the candidate has no backbone atoms.
    pub fn clash_fraction(&self, candidate: &Chain) -> Option<f64> {
        let (total, clashing) = candidate.backbone_atoms().fold((0usize, 0usize), |(t, c), atom| {
            let hit = self.grid.any_within(&atom.pos, CLASH_DISTANCE, |_| true);
            (t + 1, c + usize::from(hit))
        });
        (total > 0).then(|| clashing as f64 / total as f64)
    }

    /// `true` when the candidate overlaps the complex on less than [`CLASH_FRACTION_LIMIT`]
    /// of its backbone.
    pub fn accepts(&self, candidate: &Chain) -> bool {
        self.clash_fraction(candidate)
            .is_some_and(|fraction| fraction < CLASH_FRACTION_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::complex::PlacedSubunit;
    use crate::model::fragment::SubunitId;
    use crate::model::residue::Residue;
    use crate::model::types::{Element, Point, StandardResidue};
    use std::sync::Arc;

    fn line(id: &str, start: [f64; 3], count: usize) -> Chain {
        let mut chain = Chain::new(id);
        for i in 0..count {
            let mut residue =
                Residue::new(i as i32 + 1, None, "ALA", Some(StandardResidue::ALA), false);
            let pos = Point::new(start[0] + 3.8 * i as f64, start[1], start[2]);
            residue.add_atom(Atom::new("CA", Element::C, pos));
            residue.add_atom(Atom::new("CB", Element::C, pos + nalgebra::Vector3::new(0.0, 1.5, 0.0)));
            chain.add_residue(residue);
        }
        chain
    }

    fn complex_of(chains: [Chain; 2]) -> Complex {
        let [a, b] = chains;
        let place = |chain: Chain, slot| {
            PlacedSubunit::new("A".parse().unwrap(), Arc::new(chain), SubunitId::new(0, slot), vec![])
        };
        Complex::seeded("Model_1", [place(a, 0), place(b, 1)])
    }

    #[test]
    fn full_overlap_is_rejected() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 50), line("B", [0.0, 10.0, 0.0], 50)]);
        let detector = ClashDetector::new(&complex);
        let copy = line("C", [0.0, 0.0, 0.0], 50);

        assert_eq!(detector.clash_fraction(&copy), Some(1.0));
        assert!(!detector.accepts(&copy));
    }

    #[test]
    fn distant_candidate_is_accepted() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 50), line("B", [0.0, 10.0, 0.0], 50)]);
        let detector = ClashDetector::new(&complex);
        let far = line("C", [0.0, 0.0, 30.0], 50);

        assert_eq!(detector.clash_fraction(&far), Some(0.0));
        assert!(detector.accepts(&far));
    }

    #[test]
    fn side_chain_contacts_do_not_count() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 10), line("B", [0.0, 50.0, 0.0], 10)]);
        let detector = ClashDetector::new(&complex);
        // CB of the complex sits 1.5 Å above each CA; candidate CAs sit 3.0 Å above.
        let beside = line("C", [0.0, 3.0, 0.0], 10);

        assert_eq!(detector.clash_fraction(&beside), Some(0.0));
    }

    #[test]
    fn threshold_applies_at_three_percent() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 1), line("B", [0.0, 80.0, 0.0], 1)]);
        let detector = ClashDetector::new(&complex);

        // 1 of 40 atoms clashes (2.5%), then 1 of 33 (about 3.03%).
        let mostly_clear = line("C", [0.0, 0.5, 0.0], 40);
        let just_over = line("D", [0.0, 0.5, 0.0], 33);

        assert!(detector.accepts(&mostly_clear));
        assert!(!detector.accepts(&just_over));
    }

    #[test]
    fn exactly_three_percent_is_rejected() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 3), line("B", [0.0, 80.0, 0.0], 3)]);
        let detector = ClashDetector::new(&complex);

        // The first three candidate atoms sit 0.5 Å off the complex backbone.
        let at_limit = line("C", [0.0, 0.5, 0.0], 100);
        let below_limit = line("D", [0.0, 0.5, 0.0], 101);

        assert_eq!(detector.clash_fraction(&at_limit), Some(0.03));
        assert!(!detector.accepts(&at_limit));
        assert!(detector.accepts(&below_limit));
    }

    #[test]
    fn rejection_is_monotonic_in_overlap() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 20), line("B", [0.0, 40.0, 0.0], 20)]);
        let detector = ClashDetector::new(&complex);

        // Shifting along the complex chain overlaps progressively more residues.
        let mut previous = 0.0;
        let mut rejected = false;
        for overlap in 0..=20 {
            let start = 3.8 * (20 - overlap as i32) as f64;
            let candidate = line("C", [start, 0.0, 0.0], 20);
            let fraction = detector.clash_fraction(&candidate).unwrap();
            assert!(fraction >= previous);
            if rejected {
                assert!(!detector.accepts(&candidate));
            }
            rejected = !detector.accepts(&candidate);
            previous = fraction;
        }
        assert!(rejected);
    }

    #[test]
    fn candidate_without_backbone_is_rejected() {
        let complex = complex_of([line("A", [0.0, 0.0, 0.0], 5), line("B", [0.0, 40.0, 0.0], 5)]);
        let detector = ClashDetector::new(&complex);
        let mut ligand_only = Chain::new("L");
        let mut ion = Residue::new(1, None, "ZN", None, true);
        ion.add_atom(Atom::new("ZN", Element::Zn, Point::new(100.0, 0.0, 0.0)));
        ligand_only.add_residue(ion);

        assert_eq!(detector.clash_fraction(&ligand_only), None);
        assert!(!detector.accepts(&ligand_only));
    }
}
