//! Dense matrices of rational functions.

use metrica_algebra::{RationalFunction, Simplify};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    entries: Vec<RationalFunction>,
}

impl Matrix {
    /// Builds a matrix from equal-length rows.
    pub fn from_rows(rows: Vec<Vec<RationalFunction>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "matrix rows must have equal length"
        );
        Self {
            rows: rows.len(),
            cols,
            entries: rows.into_iter().flatten().collect(),
        }
    }

    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut entry: impl FnMut(usize, usize) -> RationalFunction,
    ) -> Self {
        let mut entries = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                entries.push(entry(i, j));
            }
        }
        Self { rows, cols, entries }
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| {
            if i == j {
                RationalFunction::one()
            } else {
                RationalFunction::zero()
            }
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, i: usize, j: usize) -> &RationalFunction {
        &self.entries[i * self.cols + j]
    }

    pub fn row(&self, i: usize) -> &[RationalFunction] {
        &self.entries[i * self.cols..(i + 1) * self.cols]
    }

    pub fn map(&self, f: impl FnMut(&RationalFunction) -> RationalFunction) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            entries: self.entries.iter().map(f).collect(),
        }
    }

    pub fn transpose(&self) -> Self {
        Self::from_fn(self.cols, self.rows, |i, j| self.get(j, i).clone())
    }

    /// Entrywise exact equality of values.
    pub fn equivalent(&self, other: &Matrix) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.equivalent(b))
    }

    pub fn is_symmetric(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows).all(|i| (0..i).all(|j| self.get(i, j).equivalent(self.get(j, i))))
    }

    pub fn product<S: Simplify + ?Sized>(&self, other: &Matrix, simplifier: &S) -> Matrix {
        assert_eq!(self.cols, other.rows, "matrix product dimension mismatch");
        Self::from_fn(self.rows, other.cols, |i, j| {
            let sum = (0..self.cols).fold(RationalFunction::zero(), |acc, k| {
                &acc + &(self.get(i, k) * other.get(k, j))
            });
            simplifier.simplify(sum)
        })
    }

    /// Gauss–Jordan inversion with first-non-zero pivoting. `None` when
    /// some column has no non-zero pivot, i.e. the matrix is singular.
    pub fn inverse<S: Simplify + ?Sized>(&self, simplifier: &S) -> Option<Matrix> {
        assert_eq!(self.rows, self.cols, "only square matrices have inverses");
        let n = self.rows;
        let mut a: Vec<Vec<RationalFunction>> = (0..n).map(|i| self.row(i).to_vec()).collect();
        let identity = Matrix::identity(n);
        let mut inv: Vec<Vec<RationalFunction>> = (0..n).map(|i| identity.row(i).to_vec()).collect();

        for col in 0..n {
            let pivot = (col..n).find(|&r| !a[r][col].is_zero())?;
            a.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = a[col][col].recip().ok()?;
            for j in 0..n {
                a[col][j] = simplifier.simplify(&a[col][j] * &scale);
                inv[col][j] = simplifier.simplify(&inv[col][j] * &scale);
            }

            for r in 0..n {
                if r == col || a[r][col].is_zero() {
                    continue;
                }
                let factor = a[r][col].clone();
                for j in 0..n {
                    let updated = &a[r][j] - &(&factor * &a[col][j]);
                    a[r][j] = simplifier.simplify(updated);
                    let updated = &inv[r][j] - &(&factor * &inv[col][j]);
                    inv[r][j] = simplifier.simplify(updated);
                }
            }
        }
        Some(Matrix::from_rows(inv))
    }

    /// Determinant by Gaussian elimination. Zero for singular matrices.
    pub fn determinant<S: Simplify + ?Sized>(&self, simplifier: &S) -> RationalFunction {
        assert_eq!(self.rows, self.cols, "only square matrices have determinants");
        let n = self.rows;
        let mut a: Vec<Vec<RationalFunction>> = (0..n).map(|i| self.row(i).to_vec()).collect();
        let mut det = RationalFunction::one();
        for col in 0..n {
            let Some(pivot) = (col..n).find(|&r| !a[r][col].is_zero()) else {
                return RationalFunction::zero();
            };
            if pivot != col {
                a.swap(col, pivot);
                det = -det;
            }
            det = simplifier.simplify(&det * &a[col][col]);
            let Ok(scale) = a[col][col].recip() else {
                return RationalFunction::zero();
            };
            for r in col + 1..n {
                if a[r][col].is_zero() {
                    continue;
                }
                let factor = simplifier.simplify(&a[r][col] * &scale);
                for j in col..n {
                    let updated = &a[r][j] - &(&factor * &a[col][j]);
                    a[r][j] = simplifier.simplify(updated);
                }
            }
        }
        det
    }

    /// Entries rendered in trigonometric form, row by row.
    pub fn rendered(&self) -> Vec<Vec<String>> {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(ToString::to_string).collect())
            .collect()
    }
}
