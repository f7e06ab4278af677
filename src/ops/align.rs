//! Global pairwise sequence alignment used for homology detection.
//!
//! Scoring counts identical positions only: a match scores one, mismatches and gaps score
//! zero. The alignment therefore maximizes the number of identities, and the identity
//! fraction is taken over the full alignment length, gaps included.

/// Gap character used when rendering aligned sequences.
pub const GAP: char = '-';

/// One optimal global alignment of two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalAlignment {
    /// Aligned columns; `None` marks a gap on that side.
    columns: Vec<(Option<char>, Option<char>)>,
}

impl GlobalAlignment {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of columns where both sequences carry the same residue.
    pub fn identities(&self) -> usize {
        self.columns
            .iter()
            .filter(|(a, b)| a.is_some() && a == b)
            .count()
    }

    /// Identical columns over alignment length; `0.0` for an empty alignment.
    pub fn identity_fraction(&self) -> f64 {
        if self.columns.is_empty() {
            return 0.0;
        }
        self.identities() as f64 / self.columns.len() as f64
    }

    /// Both sequences padded with [`GAP`] to the alignment length.
    pub fn padded(&self) -> (String, String) {
        self.columns
            .iter()
            .map(|(a, b)| (a.unwrap_or(GAP), b.unwrap_or(GAP)))
            .unzip()
    }
}

/// Aligns `a` against `b` end to end.
///
/// Among equally scoring paths the traceback prefers aligning two residues over opening a
/// gap, which keeps alignments as short as the score allows.
pub fn align_global(a: &str, b: &str) -> GlobalAlignment {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    let width = m + 1;

    let mut score = vec![0u32; (n + 1) * width];
    for i in 1..=n {
        for j in 1..=m {
            let diagonal = score[(i - 1) * width + j - 1] + u32::from(a[i - 1] == b[j - 1]);
            let up = score[(i - 1) * width + j];
            let left = score[i * width + j - 1];
            score[i * width + j] = diagonal.max(up).max(left);
        }
    }

    let mut columns = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let here = score[i * width + j];
        if i > 0
            && j > 0
            && here == score[(i - 1) * width + j - 1] + u32::from(a[i - 1] == b[j - 1])
        {
            columns.push((Some(a[i - 1]), Some(b[j - 1])));
            i -= 1;
            j -= 1;
        } else if i > 0 && here == score[(i - 1) * width + j] {
            columns.push((Some(a[i - 1]), None));
            i -= 1;
        } else {
            columns.push((None, Some(b[j - 1])));
            j -= 1;
        }
    }
    columns.reverse();

    GlobalAlignment { columns }
}
