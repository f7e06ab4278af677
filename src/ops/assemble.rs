//! Iterative rigid-body growth of complexes from the interaction graph.
//!
//! A model starts from the seed fragment and grows in passes. Each pass walks the chains
//! present when it began; every chain with pending interactions tries them in shuffled
//! order, superimposing the stored partner onto itself and keeping the copy when it does
//! not clash with the model. A chain is exhausted once tried. Growth ends when every chain
//! is exhausted or the chain cap is reached.

use super::clash::ClashDetector;
use super::error::Error;
use super::interaction::{ContactGraph, InteractionGraph};
use super::stoichiometry::{Stoichiometry, StoichiometrySource};
use super::superpose::superpose;
use super::unify::unify_identities;
use crate::model::chain::Chain;
use crate::model::complex::{Complex, PlacedSubunit};
use crate::model::fragment::{ContactSet, Fragment, SubunitId};
use crate::model::identity::{IdentityId, SequenceRegistry};
use crate::utils::parallel::*;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::Arc;

/// Settings for a build.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Upper bound on chains per model, seed pair included.
    pub max_chains: usize,
    /// Number of independent models to grow.
    pub models: usize,
    /// Base seed; model `i` uses `base + i`. Random when `None`.
    pub rng_seed: Option<u64>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            max_chains: 300,
            models: 1,
            rng_seed: None,
        }
    }
}

impl AssemblyConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_chains < 2 {
            return Err(Error::InvalidChainLimit(self.max_chains));
        }
        if self.models < 1 {
            return Err(Error::InvalidModelCount(self.models));
        }
        Ok(())
    }
}

/// Receives every accepted addition while a model grows.
///
/// Failures are logged and otherwise ignored.
pub trait GrowthObserver: Sync {
    /// Called with the 1-based model number and the complex right after a chain was added.
    fn chain_added(&self, model: usize, complex: &Complex) -> std::io::Result<()>;
}

impl GrowthObserver for () {
    fn chain_added(&self, _model: usize, _complex: &Complex) -> std::io::Result<()> {
        Ok(())
    }
}

/// Why growth stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every chain exhausted its interactions.
    Saturated,
    /// The chain cap was reached.
    Capped,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Saturated => write!(f, "saturated"),
            Termination::Capped => write!(f, "capped"),
        }
    }
}

/// Counters collected while a model grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthStats {
    pub added: usize,
    pub clash_rejections: usize,
    pub stoichiometry_skips: usize,
    pub passes: usize,
}

/// A finished model.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub complex: Complex,
    pub termination: Termination,
    pub stats: GrowthStats,
}

/// Grows models from a refined interaction graph.
pub struct Assembler<'a> {
    graph: &'a InteractionGraph,
    stoichiometry: Option<&'a Stoichiometry>,
    max_chains: usize,
}

impl<'a> Assembler<'a> {
    pub fn new(
        graph: &'a InteractionGraph,
        stoichiometry: Option<&'a Stoichiometry>,
        max_chains: usize,
    ) -> Self {
        Self {
            graph,
            stoichiometry,
            max_chains,
        }
    }

    /// Grows `config.models` independent models, concurrently with the `parallel` feature.
    pub fn build_models<O: GrowthObserver>(
        &self,
        config: &AssemblyConfig,
        observer: &O,
    ) -> Result<Vec<ModelOutcome>, Error> {
        config.validate()?;
        let base_seed = config.rng_seed.unwrap_or_else(rand::random);
        debug!("Base seed {}", base_seed);

        (0..config.models)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                self.build_model(i + 1, &mut rng, observer)
            })
            .collect()
    }

    /// Grows model number `model` (1-based) with the given random source.
    pub fn build_model<R: Rng, O: GrowthObserver>(
        &self,
        model: usize,
        rng: &mut R,
        observer: &O,
    ) -> Result<ModelOutcome, Error> {
        let mut complex = self.seed_complex(model)?;
        let mut stats = GrowthStats::default();
        let mut detector: Option<ClashDetector> = None;
        info!("Model {}: seeded with {}", model, complex.profile_string());

        let termination = loop {
            stats.passes += 1;
            let snapshot = complex.len();
            let mut capped = false;

            'chains: for index in 0..snapshot {
                if complex.len() >= self.max_chains {
                    capped = true;
                    break;
                }
                let Some(mut keys) = complex.take_pending(index) else {
                    continue;
                };
                keys.shuffle(rng);

                let anchor = complex.subunit(index);
                let (anchor_identity, anchor_chain) = (anchor.identity, Arc::clone(&anchor.chain));

                for key in keys {
                    if complex.len() >= self.max_chains {
                        capped = true;
                        break 'chains;
                    }
                    let Some(entry) = self.graph.entry(anchor_identity, &key) else {
                        continue;
                    };
                    let target = self.graph.subunit(entry.mobile);
                    let Some(target_identity) = target.identity else {
                        continue;
                    };

                    if let Some(limits) = self.stoichiometry
                        && !limits.allows(target_identity, complex.count(target_identity))
                    {
                        debug!(
                            "Model {}: skipped {} {} -> {} (stoichiometry)",
                            model, anchor_identity, key, target_identity
                        );
                        stats.stoichiometry_skips += 1;
                        continue;
                    }

                    let reference = self.graph.subunit(entry.fixed);
                    let transform = match superpose(&anchor_chain, &reference.chain) {
                        Ok(t) => t,
                        Err(e) => {
                            warn!(
                                "Model {}: cannot superimpose {} {}: {}",
                                model, anchor_identity, key, e
                            );
                            stats.clash_rejections += 1;
                            continue;
                        }
                    };
                    let candidate = transform.apply_to_chain(&target.chain);

                    let accepted = detector
                        .get_or_insert_with(|| ClashDetector::new(&complex))
                        .accepts(&candidate);
                    if !accepted {
                        debug!(
                            "Model {}: rejected {} {} -> {} (clash)",
                            model, anchor_identity, key, target_identity
                        );
                        stats.clash_rejections += 1;
                        continue;
                    }

                    complex.push(self.place(target_identity, candidate, entry.mobile));
                    detector = None;
                    stats.added += 1;
                    debug!(
                        "Model {}: chain {} added through {} {} -> {}",
                        model,
                        complex.len(),
                        anchor_identity,
                        key,
                        target_identity
                    );
                    if let Err(e) = observer.chain_added(model, &complex) {
                        warn!("Model {}: growth snapshot failed: {}", model, e);
                    }
                }
            }

            if capped {
                break Termination::Capped;
            }
            if complex.all_exhausted() {
                break Termination::Saturated;
            }
        };

        info!(
            "Model {} {} after {} passes with {} chains: {}",
            model,
            termination,
            stats.passes,
            complex.len(),
            complex.profile_string()
        );
        Ok(ModelOutcome {
            complex,
            termination,
            stats,
        })
    }

    fn seed_complex(&self, model: usize) -> Result<Complex, Error> {
        let (_, _, entry) = self.graph.seed().ok_or(Error::NoInteractions)?;
        let seat = |id: SubunitId| -> Result<PlacedSubunit, Error> {
            let subunit = self.graph.subunit(id);
            let identity = subunit.identity.ok_or(Error::NoInteractions)?;
            Ok(PlacedSubunit::new(
                identity,
                Arc::clone(&subunit.chain),
                id,
                self.graph.pending(id).to_vec(),
            ))
        };
        Ok(Complex::seeded(
            format!("Model_{}", model),
            [seat(entry.fixed)?, seat(entry.mobile)?],
        ))
    }

    fn place(
        &self,
        identity: IdentityId,
        chain: Chain,
        origin: SubunitId,
    ) -> PlacedSubunit {
        let pending: Vec<ContactSet> = self.graph.pending(origin).to_vec();
        PlacedSubunit::new(identity, Arc::new(chain), origin, pending)
    }
}

/// Result of a full build.
#[derive(Debug, Clone)]
pub struct AssemblyRun {
    pub registry: SequenceRegistry,
    pub stoichiometry: Option<Stoichiometry>,
    pub models: Vec<ModelOutcome>,
}

/// Runs the whole pipeline: unification, graph construction, stoichiometry, growth.
///
/// # Errors
///
/// Fails before any model grows on empty input, identity overflow, an unparsable
/// stoichiometry, an invalid configuration, or a graph without interactions.
pub fn assemble<O: GrowthObserver>(
    mut fragments: Vec<Fragment>,
    stoichiometry: Option<&StoichiometrySource>,
    config: &AssemblyConfig,
    observer: &O,
) -> Result<AssemblyRun, Error> {
    if fragments.is_empty() {
        return Err(Error::EmptyInput);
    }
    config.validate()?;

    let registry = unify_identities(&mut fragments)?;
    let target = stoichiometry
        .map(|source| source.resolve(&registry))
        .transpose()?;
    if let Some(target) = &target {
        info!("Target stoichiometry: {}", target);
    }

    let graph = ContactGraph::build(fragments).refine()?;
    let models = Assembler::new(&graph, target.as_ref(), config.max_chains)
        .build_models(config, observer)?;

    Ok(AssemblyRun {
        registry,
        stoichiometry: target,
        models,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::structure::Structure;
    use crate::model::types::{Element, Point, StandardResidue};
    use nalgebra::Vector3;
    use std::sync::Mutex;

    const RESIDUE_COUNT: usize = 12;

    /// Straight chain of `RESIDUE_COUNT` residues of `kind` along x, shifted by `offset`.
    fn rod(id: &str, kind: StandardResidue, offset: Vector3<f64>) -> Chain {
        let mut chain = Chain::new(id);
        for i in 0..RESIDUE_COUNT {
            let mut residue = Residue::new(i as i32 + 1, None, kind.name(), Some(kind), false);
            let ca = Point::new(3.8 * i as f64, 0.0, 0.0) + offset;
            residue.add_atom(Atom::new("CA", Element::C, ca));
            residue.add_atom(Atom::new("N", Element::N, ca + Vector3::new(-1.2, 0.6, 0.3)));
            chain.add_residue(residue);
        }
        chain
    }

    fn fragment(name: &str, a: Chain, b: Chain) -> Fragment {
        let mut structure = Structure::new();
        structure.add_chain(a);
        structure.add_chain(b);
        Fragment::from_structure(name, structure).unwrap()
    }

    fn config(max_chains: usize) -> AssemblyConfig {
        AssemblyConfig {
            max_chains,
            models: 1,
            rng_seed: Some(7),
        }
    }

    fn profile(run: &AssemblyRun) -> String {
        run.models[0].complex.profile_string()
    }

    /// A-B fully stacked 3 Å apart in y; C stacked 3 Å above the second half of B.
    fn chain_of_three() -> Vec<Fragment> {
        let origin = Vector3::new(10.0, 10.0, 10.0);
        vec![
            fragment(
                "ab",
                rod("A", StandardResidue::ALA, Vector3::zeros()),
                rod("B", StandardResidue::GLY, Vector3::new(0.0, 3.0, 0.0)),
            ),
            fragment(
                "bc",
                rod("B", StandardResidue::GLY, origin),
                rod("C", StandardResidue::SER, origin + Vector3::new(22.8, 0.0, 3.0)),
            ),
        ]
    }

    #[test]
    fn linear_pair_chain_assembles_one_copy_each() {
        let run = assemble(chain_of_three(), None, &config(10), &()).unwrap();

        assert_eq!(profile(&run), "A:1,B:1,C:1");
        let outcome = &run.models[0];
        assert_eq!(outcome.termination, Termination::Saturated);
        assert_eq!(outcome.stats.added, 1);
        assert!(outcome.complex.grew());
    }

    #[test]
    fn placed_chain_lands_in_the_seed_frame() {
        let run = assemble(chain_of_three(), None, &config(10), &()).unwrap();
        let complex = &run.models[0].complex;
        let chain_of = |symbol: char| {
            complex
                .subunits()
                .iter()
                .find(|s| s.identity.symbol() == symbol)
                .map(|s| Arc::clone(&s.chain))
                .unwrap()
        };
        let (b, c) = (chain_of('B'), chain_of('C'));

        let b7 = b.residue(7, None).unwrap().atom("CA").unwrap();
        let c1 = c.residue(1, None).unwrap().atom("CA").unwrap();
        assert!((c1.pos - b7.pos - Vector3::new(0.0, 0.0, 3.0)).norm() < 1e-6);
    }

    /// Copies of A stacked head to tail (second half of one under the first half of the
    /// next), and a B touching the first three residues of A.
    fn filament_with_partner() -> Vec<Fragment> {
        vec![
            fragment(
                "aa",
                rod("A", StandardResidue::ALA, Vector3::zeros()),
                rod("B", StandardResidue::ALA, Vector3::new(22.8, 3.0, 0.0)),
            ),
            fragment(
                "ab",
                rod("A", StandardResidue::ALA, Vector3::zeros()),
                rod("B", StandardResidue::GLY, Vector3::new(-34.2, 0.0, 3.0)),
            ),
        ]
    }

    #[test]
    fn homodimer_interface_grows_until_capped() {
        let run = assemble(filament_with_partner(), None, &config(6), &()).unwrap();
        let outcome = &run.models[0];

        assert_eq!(outcome.termination, Termination::Capped);
        assert_eq!(outcome.complex.len(), 6);
    }

    #[test]
    fn stoichiometry_caps_copies() {
        let source = StoichiometrySource::Literal("A:3,B:1".into());
        let run = assemble(filament_with_partner(), Some(&source), &config(50), &()).unwrap();
        let outcome = &run.models[0];

        assert_eq!(outcome.complex.count("A".parse().unwrap()), 3);
        assert_eq!(outcome.complex.count("B".parse().unwrap()), 1);
        assert_eq!(outcome.termination, Termination::Saturated);
        assert!(outcome.stats.stoichiometry_skips > 0);
    }

    #[test]
    fn stoichiometry_without_room_leaves_the_seed_alone() {
        let source = StoichiometrySource::Literal("A:1,B:1".into());
        let run = assemble(chain_of_three(), Some(&source), &config(10), &()).unwrap();
        let outcome = &run.models[0];

        assert_eq!(profile(&run), "A:1,B:1");
        assert!(!outcome.complex.grew());
        assert_eq!(outcome.stats.added, 0);
        assert_eq!(outcome.stats.stoichiometry_skips, 1);
    }

    #[test]
    fn malformed_stoichiometry_fails_before_modeling() {
        let source = StoichiometrySource::Literal("A-1,B:2".into());
        let err = assemble(chain_of_three(), Some(&source), &config(10), &()).unwrap_err();

        assert!(matches!(err, Error::MalformedStoichiometry { .. }));
    }

    /// The three pairwise fragments cut from one A-B-C trimer.
    fn trimer() -> Vec<Fragment> {
        let a = || rod("A", StandardResidue::ALA, Vector3::zeros());
        let b = || rod("B", StandardResidue::GLY, Vector3::new(22.8, 3.0, 0.0));
        let c = || rod("C", StandardResidue::SER, Vector3::new(11.4, 1.5, 3.0));
        vec![
            fragment("ab", a(), b()),
            fragment("bc", b(), c()),
            fragment("ca", c(), a()),
        ]
    }

    #[test]
    fn closing_a_ring_rejects_the_overlapping_copy() {
        let run = assemble(trimer(), None, &config(10), &()).unwrap();
        let outcome = &run.models[0];

        assert_eq!(profile(&run), "A:1,B:1,C:1");
        assert_eq!(outcome.stats.added, 1);
        assert_eq!(outcome.stats.clash_rejections, 2);
        assert_eq!(outcome.termination, Termination::Saturated);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed| {
            let cfg = AssemblyConfig {
                max_chains: 20,
                models: 2,
                rng_seed: Some(seed),
            };
            assemble(filament_with_partner(), None, &cfg, &())
                .unwrap()
                .models
                .into_iter()
                .map(|m| {
                    m.complex
                        .subunits()
                        .iter()
                        .map(|s| {
                            let coords: Vec<_> = s.chain.iter_atoms().map(|a| a.pos).collect();
                            (s.identity, s.origin, coords)
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        };

        let first = run(42);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|placed| placed.len() > 2));
        assert_eq!(first, run(42));
    }

    #[test]
    fn observer_sees_every_addition() {
        struct Recorder(Mutex<Vec<usize>>);
        impl GrowthObserver for Recorder {
            fn chain_added(&self, _model: usize, complex: &Complex) -> std::io::Result<()> {
                self.0.lock().unwrap().push(complex.len());
                Err(std::io::Error::other("disk full"))
            }
        }
        let recorder = Recorder(Mutex::new(Vec::new()));

        let run = assemble(filament_with_partner(), None, &config(5), &recorder).unwrap();

        assert_eq!(run.models[0].complex.len(), 5);
        assert_eq!(*recorder.0.lock().unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn invalid_configuration_and_input_are_rejected() {
        assert!(matches!(
            assemble(Vec::new(), None, &config(10), &()),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            assemble(chain_of_three(), None, &config(1), &()),
            Err(Error::InvalidChainLimit(1))
        ));
        let zero_models = AssemblyConfig {
            models: 0,
            ..config(10)
        };
        assert!(matches!(
            assemble(chain_of_three(), None, &zero_models, &()),
            Err(Error::InvalidModelCount(0))
        ));
    }
}
