//! Least-squares rigid superposition of one chain onto another.

use crate::model::chain::Chain;
use crate::model::types::Point;
use nalgebra::{Matrix3, Rotation3, Vector3};
use thiserror::Error;

/// Reasons a superposition could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SuperpositionError {
    #[error("no atom pairs to superimpose")]
    NoPairs,
    #[error("singular value decomposition did not converge")]
    Degenerate,
}

/// Proper rotation followed by a translation: `x' = R x + t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl RigidTransform {
    pub fn apply(&self, point: &Point) -> Point {
        Point::from(self.rotation * point.coords + self.translation)
    }

    /// Returns a transformed copy of `chain`; the original is left untouched.
    pub fn apply_to_chain(&self, chain: &Chain) -> Chain {
        let mut moved = chain.clone();
        moved.transform(&self.rotation, &self.translation);
        moved
    }
}

/// Transform that best maps each `(target, mobile)` pair's mobile point onto its target.
///
/// One pair yields a pure translation and two pairs align the connecting vectors; three or
/// more go through the Kabsch SVD with a reflection correction.
pub fn fit_pairs(pairs: &[(Point, Point)]) -> Result<RigidTransform, SuperpositionError> {
    let n = pairs.len();
    if n == 0 {
        return Err(SuperpositionError::NoPairs);
    }

    let center_target = pairs.iter().map(|p| p.0.coords).sum::<Vector3<f64>>() / n as f64;
    let center_mobile = pairs.iter().map(|p| p.1.coords).sum::<Vector3<f64>>() / n as f64;

    if n == 1 {
        return Ok(RigidTransform {
            rotation: Matrix3::identity(),
            translation: center_target - center_mobile,
        });
    }

    if n == 2 {
        let v_target = pairs[1].0 - pairs[0].0;
        let v_mobile = pairs[1].1 - pairs[0].1;
        let rotation = Rotation3::rotation_between(&v_mobile, &v_target)
            .unwrap_or_else(Rotation3::identity)
            .into_inner();
        return Ok(RigidTransform {
            rotation,
            translation: center_target - rotation * center_mobile,
        });
    }

    let covariance = pairs
        .iter()
        .fold(Matrix3::zeros(), |acc, (target, mobile)| {
            acc + (target.coords - center_target) * (mobile.coords - center_mobile).transpose()
        });

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(SuperpositionError::Degenerate)?;
    let v_t = svd.v_t.ok_or(SuperpositionError::Degenerate)?;

    let mut rotation = u * v_t;
    if rotation.determinant() < 0.0 {
        let mut reflection = Matrix3::identity();
        reflection[(2, 2)] = -1.0;
        rotation = u * reflection * v_t;
    }

    Ok(RigidTransform {
        rotation,
        translation: center_target - rotation * center_mobile,
    })
}

/// Transform carrying `mobile` onto `target`.
///
/// Atoms are paired in canonical order (see [`Chain::canonical_atoms`]) and the longer
/// list is truncated, so homologous chains of different lengths still superimpose.
pub fn superpose(target: &Chain, mobile: &Chain) -> Result<RigidTransform, SuperpositionError> {
    let pairs: Vec<(Point, Point)> = target
        .canonical_atoms()
        .into_iter()
        .zip(mobile.canonical_atoms())
        .map(|(t, m)| (t.pos, m.pos))
        .collect();
    fit_pairs(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::types::{Element, StandardResidue};

    fn chain(points: &[[f64; 3]]) -> Chain {
        let mut chain = Chain::new("A");
        for (i, &[x, y, z]) in points.iter().enumerate() {
            let mut residue =
                Residue::new(i as i32 + 1, None, "ALA", Some(StandardResidue::ALA), false);
            residue.add_atom(Atom::new("CA", Element::C, Point::new(x, y, z)));
            chain.add_residue(residue);
        }
        chain
    }

    fn rotation_about_z(angle: f64) -> Matrix3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into_inner()
    }

    fn max_deviation(a: &Chain, b: &Chain) -> f64 {
        a.iter_atoms()
            .zip(b.iter_atoms())
            .map(|(x, y)| x.distance(y))
            .fold(0.0, f64::max)
    }

    const SHAPE: [[f64; 3]; 5] = [
        [0.0, 0.0, 0.0],
        [3.8, 0.0, 0.0],
        [5.0, 3.6, 0.0],
        [8.1, 4.0, 2.2],
        [9.0, 7.5, 3.1],
    ];

    #[test]
    fn superpose_recovers_known_motion() {
        let target = chain(&SHAPE);
        let motion = RigidTransform {
            rotation: rotation_about_z(1.1),
            translation: Vector3::new(4.0, -2.0, 7.5),
        };
        let mobile = motion.apply_to_chain(&target);

        let fit = superpose(&target, &mobile).unwrap();
        let restored = fit.apply_to_chain(&mobile);

        assert!(max_deviation(&restored, &target) < 1e-8);
        assert!((fit.rotation.determinant() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn superpose_truncates_to_shorter_chain() {
        let target = chain(&SHAPE[..4]);
        let mobile = RigidTransform {
            rotation: rotation_about_z(-0.4),
            translation: Vector3::new(1.0, 1.0, 1.0),
        }
        .apply_to_chain(&chain(&SHAPE));

        let restored = superpose(&target, &mobile).unwrap().apply_to_chain(&mobile);

        assert!(max_deviation(&restored, &target) < 1e-8);
    }

    #[test]
    fn single_pair_translates() {
        let fit = fit_pairs(&[(Point::new(1.0, 2.0, 3.0), Point::new(0.0, 0.0, 0.0))]).unwrap();

        assert_eq!(fit.rotation, Matrix3::identity());
        assert_eq!(fit.apply(&Point::origin()), Point::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn two_pairs_align_the_connecting_vector() {
        let pairs = [
            (Point::new(0.0, 0.0, 0.0), Point::new(0.0, 0.0, 0.0)),
            (Point::new(0.0, 2.0, 0.0), Point::new(2.0, 0.0, 0.0)),
        ];

        let fit = fit_pairs(&pairs).unwrap();

        for (target, mobile) in pairs {
            assert!(nalgebra::distance(&fit.apply(&mobile), &target) < 1e-10);
        }
    }

    #[test]
    fn empty_pairing_is_an_error() {
        assert_eq!(
            superpose(&Chain::new("A"), &chain(&SHAPE)).unwrap_err(),
            SuperpositionError::NoPairs
        );
    }

    #[test]
    fn apply_to_chain_leaves_source_untouched() {
        let source = chain(&SHAPE);
        let moved = RigidTransform {
            rotation: Matrix3::identity(),
            translation: Vector3::new(0.0, 0.0, 10.0),
        }
        .apply_to_chain(&source);

        assert_eq!(source.iter_atoms().next().unwrap().pos, Point::origin());
        assert_eq!(moved.iter_atoms().next().unwrap().pos, Point::new(0.0, 0.0, 10.0));
    }
}
