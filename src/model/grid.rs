//! Uniform cell list for fixed-radius proximity queries.
//!
//! Interface contacts and backbone clashes both ask the same question: which points of one
//! set lie within a short cutoff of a point from another set. The [`Grid`] answers it by
//! binning points into cubic cells no smaller than the cutoff, so a query only visits the
//! cells overlapping the query sphere.

use super::types::Point;
use nalgebra::Vector3;

/// Points and payloads binned into cubic cells.
///
/// Cells are stored in compressed form: `offsets[c]..offsets[c + 1]` is the range of
/// `entries` that fall in cell `c`.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    cell_size: f64,
    origin: Point,
    dims: Vector3<usize>,
    offsets: Vec<usize>,
    entries: Vec<(Point, T)>,
}

impl<T> Grid<T> {
    /// Bins `items` into cells of side `cell_size`.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is not strictly positive.
    pub fn new(items: impl IntoIterator<Item = (Point, T)>, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");

        let items: Vec<_> = items.into_iter().collect();
        if items.is_empty() {
            return Self {
                cell_size,
                origin: Point::origin(),
                dims: Vector3::zeros(),
                offsets: vec![0],
                entries: Vec::new(),
            };
        }

        let (min, max) = items.iter().fold(
            (
                Point::new(f64::MAX, f64::MAX, f64::MAX),
                Point::new(f64::MIN, f64::MIN, f64::MIN),
            ),
            |(lo, hi), (pos, _)| (lo.inf(pos), hi.sup(pos)),
        );
        let extent = max - min;
        let dims = extent.map(|e| (e / cell_size).floor() as usize + 1);
        let cell_count = dims.x * dims.y * dims.z;

        let cells: Vec<usize> = items
            .iter()
            .map(|(pos, _)| {
                let (x, y, z) = Self::coords_of(pos, &min, &dims, cell_size);
                Self::flat_index(&dims, x, y, z)
            })
            .collect();

        let mut offsets = vec![0usize; cell_count + 1];
        for &cell in &cells {
            offsets[cell + 1] += 1;
        }
        for i in 0..cell_count {
            offsets[i + 1] += offsets[i];
        }

        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by_key(|&i| cells[i]);
        let mut slots: Vec<Option<(Point, T)>> = items.into_iter().map(Some).collect();
        let entries = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        Self {
            cell_size,
            origin: min,
            dims,
            offsets,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cell coordinates of `pos`, clamped onto the grid.
    fn coords_of(
        pos: &Point,
        origin: &Point,
        dims: &Vector3<usize>,
        cell_size: f64,
    ) -> (usize, usize, usize) {
        let offset = pos - origin;
        let clamp = |v: f64, n: usize| ((v / cell_size).floor().max(0.0) as usize).min(n - 1);
        (
            clamp(offset.x, dims.x),
            clamp(offset.y, dims.y),
            clamp(offset.z, dims.z),
        )
    }

    fn flat_index(dims: &Vector3<usize>, x: usize, y: usize, z: usize) -> usize {
        x + dims.x * (y + dims.y * z)
    }

    /// Items whose stored point lies within `radius` of `center` (inclusive).
    pub fn within<'a>(
        &'a self,
        center: &Point,
        radius: f64,
    ) -> impl Iterator<Item = (&'a Point, &'a T)> + 'a {
        let center = *center;
        let radius_sq = radius * radius;

        let cells: Vec<usize> = if self.entries.is_empty() {
            Vec::new()
        } else {
            let reach = Vector3::new(radius, radius, radius);
            let lo = Self::coords_of(&(center - reach), &self.origin, &self.dims, self.cell_size);
            let hi = Self::coords_of(&(center + reach), &self.origin, &self.dims, self.cell_size);
            let mut cells = Vec::new();
            for z in lo.2..=hi.2 {
                for y in lo.1..=hi.1 {
                    for x in lo.0..=hi.0 {
                        cells.push(Self::flat_index(&self.dims, x, y, z));
                    }
                }
            }
            cells
        };

        cells
            .into_iter()
            .flat_map(move |c| self.entries[self.offsets[c]..self.offsets[c + 1]].iter())
            .filter(move |(pos, _)| nalgebra::distance_squared(pos, &center) <= radius_sq)
            .map(|(pos, item)| (pos, item))
    }

    /// Returns `true` as soon as one item within `radius` of `center` satisfies `predicate`.
    pub fn any_within<F>(&self, center: &Point, radius: f64, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.within(center, radius).any(|(_, item)| predicate(item))
    }
}
