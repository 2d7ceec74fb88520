//! Dense matrices over GF(2).
//!
//! This module implements dense binary matrices with the bits packed into
//! 32-bit words, stored by columns. Dense matrices are used for the generator
//! matrices of LDPC codes, which are dense even when the parity check matrix
//! is sparse, and for the Gaussian elimination needed to derive them.
//!
//! The operations are elementwise access ([`get`](DenseMatrix::get),
//! [`set`](DenseMatrix::set), [`flip`](DenseMatrix::flip)), arithmetic,
//! row and column selection, inversion in three variants, and serialization
//! in a binary format built from the same 32-bit integer encoding as the
//! [`sparse`](crate::sparse) matrix files.

use crate::intio;
use std::fmt;
use std::io::{self, Read, Write};
use thiserror::Error;

const WORD_BITS: usize = 32;

/// Errors produced when reading a serialized dense matrix.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader failed or the data ended prematurely.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// The data does not describe a valid matrix.
    #[error("invalid matrix data: {0}")]
    Invalid(&'static str),
}

/// Error returned when a matrix to be inverted is singular.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("matrix is singular")]
pub struct Singular;

/// Dense binary matrix.
///
/// Bits are packed column by column into `u32` words, so columns can be
/// added in bulk. Equality with `==` compares dimensions and matrix
/// contents; the unused padding bits of the last word of each column are
/// masked out of the comparison.
///
/// # Examples
///
/// ```
/// use ldpc_codes::dense::DenseMatrix;
///
/// let mut a = DenseMatrix::new(3, 3);
/// a.set(0, 2, 1);
/// assert_eq!(a.get(0, 2), 1);
/// assert_eq!(a.flip(0, 2), 0);
/// assert_eq!(a, DenseMatrix::new(3, 3));
/// ```
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    nrows: usize,
    ncols: usize,
    // Words per column; column j occupies bits[j * words..(j + 1) * words].
    words: usize,
    bits: Vec<u32>,
}

impl DenseMatrix {
    /// Creates an all-zero matrix with `nrows` rows and `ncols` columns.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(nrows: usize, ncols: usize) -> DenseMatrix {
        assert!(nrows > 0 && ncols > 0, "matrix dimensions must be positive");
        let words = (nrows + WORD_BITS - 1) / WORD_BITS;
        DenseMatrix {
            nrows,
            ncols,
            words,
            bits: vec![0; words * ncols],
        }
    }

    /// Creates an identity matrix of size `n`.
    pub fn identity(n: usize) -> DenseMatrix {
        let mut m = DenseMatrix::new(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Returns the number of rows of the matrix.
    pub fn num_rows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns of the matrix.
    pub fn num_cols(&self) -> usize {
        self.ncols
    }

    fn word(&self, row: usize, col: usize) -> usize {
        assert!(row < self.nrows, "row index out of bounds");
        assert!(col < self.ncols, "column index out of bounds");
        col * self.words + row / WORD_BITS
    }

    /// Returns the element at a given position, as 0 or 1.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        ((self.bits[self.word(row, col)] >> (row % WORD_BITS)) & 1) as u8
    }

    /// Sets the element at a given position. Any nonzero `value` counts as 1.
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        let w = self.word(row, col);
        let mask = 1 << (row % WORD_BITS);
        if value != 0 {
            self.bits[w] |= mask;
        } else {
            self.bits[w] &= !mask;
        }
    }

    /// Flips the element at a given position and returns its new value.
    pub fn flip(&mut self, row: usize, col: usize) -> u8 {
        let w = self.word(row, col);
        self.bits[w] ^= 1 << (row % WORD_BITS);
        ((self.bits[w] >> (row % WORD_BITS)) & 1) as u8
    }

    /// Sets all the elements of the matrix to zero.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    fn col_range(&self, col: usize) -> std::ops::Range<usize> {
        col * self.words..(col + 1) * self.words
    }

    // XORs column src into column dst, starting at word `from` of each.
    fn xor_cols(&mut self, dst: usize, src: usize, from: usize) {
        for k in from..self.words {
            let v = self.bits[src * self.words + k];
            self.bits[dst * self.words + k] ^= v;
        }
    }

    fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.words {
            self.bits.swap(a * self.words + k, b * self.words + k);
        }
    }

    /// Returns a matrix whose rows are the given rows of this matrix, in
    /// the given order.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty or contains an index out of range.
    pub fn copy_rows(&self, rows: &[usize]) -> DenseMatrix {
        let mut r = DenseMatrix::new(rows.len(), self.ncols);
        for (i, &row) in rows.iter().enumerate() {
            assert!(row < self.nrows, "row index out of range");
            for j in 0..self.ncols {
                r.set(i, j, self.get(row, j));
            }
        }
        r
    }

    /// Returns a matrix whose columns are the given columns of this matrix,
    /// in the given order.
    ///
    /// # Panics
    ///
    /// Panics if `cols` is empty or contains an index out of range.
    pub fn copy_cols(&self, cols: &[usize]) -> DenseMatrix {
        let mut r = DenseMatrix::new(self.nrows, cols.len());
        for (j, &col) in cols.iter().enumerate() {
            assert!(col < self.ncols, "column index out of range");
            let src = self.col_range(col);
            let dst = r.col_range(j);
            r.bits[dst].copy_from_slice(&self.bits[src]);
        }
        r
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> DenseMatrix {
        let mut t = DenseMatrix::new(self.ncols, self.nrows);
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                if self.get(i, j) != 0 {
                    t.set(j, i, 1);
                }
            }
        }
        t
    }

    /// Returns the sum of two matrices.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of the matrices differ.
    pub fn add(&self, other: &DenseMatrix) -> DenseMatrix {
        assert!(
            self.nrows == other.nrows && self.ncols == other.ncols,
            "matrix dimensions do not match"
        );
        let mut r = self.clone();
        for (w, &v) in r.bits.iter_mut().zip(other.bits.iter()) {
            *w ^= v;
        }
        r
    }

    /// Returns the product of two matrices.
    ///
    /// Works column by column over the right operand, adding up the columns
    /// of the left operand selected by the set bits, so it is fastest when
    /// the right operand is sparse.
    ///
    /// # Panics
    ///
    /// Panics if `self` does not have as many columns as `other` has rows.
    pub fn multiply(&self, other: &DenseMatrix) -> DenseMatrix {
        assert_eq!(
            self.ncols, other.nrows,
            "matrix dimensions are incompatible"
        );
        let mut r = DenseMatrix::new(self.nrows, other.ncols);
        for j in 0..other.ncols {
            for i in 0..other.nrows {
                if other.get(i, j) != 0 {
                    for k in 0..r.words {
                        r.bits[j * r.words + k] ^= self.bits[i * self.words + k];
                    }
                }
            }
        }
        r
    }

    /// Multiplies the matrix by a vector of bits.
    ///
    /// `u` must have one bit per column and `v` one bit per row. `v` is
    /// entirely overwritten with the product.
    pub fn mul_vec(&self, u: &[u8], v: &mut [u8]) {
        assert_eq!(u.len(), self.ncols, "input length does not match columns");
        assert_eq!(v.len(), self.nrows, "output length does not match rows");
        let mut acc = vec![0u32; self.words];
        for (j, &bit) in u.iter().enumerate() {
            if bit != 0 {
                for (k, w) in acc.iter_mut().enumerate() {
                    *w ^= self.bits[j * self.words + k];
                }
            }
        }
        for (i, out) in v.iter_mut().enumerate() {
            *out = ((acc[i / WORD_BITS] >> (i % WORD_BITS)) & 1) as u8;
        }
    }

    /// Computes the inverse of the matrix by Gauss-Jordan elimination.
    ///
    /// # Errors
    ///
    /// Returns [`Singular`] if the matrix has no inverse.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    pub fn inverse(&self) -> Result<DenseMatrix, Singular> {
        assert_eq!(self.nrows, self.ncols, "matrix to invert is not square");
        let n = self.nrows;
        let mut m = self.clone();
        let mut r = DenseMatrix::identity(n);
        for i in 0..n {
            let k0 = i / WORD_BITS;
            let b0 = i % WORD_BITS;
            let pivot = (i..n).find(|&j| (m.bits[j * m.words + k0] >> b0) & 1 != 0);
            let j = match pivot {
                Some(j) => j,
                None => return Err(Singular),
            };
            m.swap_cols(i, j);
            r.swap_cols(i, j);
            for j in 0..n {
                if j != i && (m.bits[j * m.words + k0] >> b0) & 1 != 0 {
                    m.xor_cols(j, i, k0);
                    r.xor_cols(j, i, 0);
                }
            }
        }
        Ok(r)
    }

    /// Inverts a submatrix made of whichever rows and columns admit pivots.
    ///
    /// This is used on parity check matrices, which have more columns than
    /// rows and may contain redundant rows: the elimination picks a set of
    /// linearly independent rows and, for each, a pivot column, and computes
    /// the inverse of the square submatrix they select, embedded in a matrix
    /// with the dimensions of the original at the selected positions. The
    /// pivot columns of a parity check matrix are the positions that can be
    /// solved for as check bits.
    ///
    /// Returns the inverse together with the row and column orderings: the
    /// first `num_rows() - deficiency` elements of each are the selected
    /// rows and columns in pivot order, and the remaining elements are the
    /// unused ones.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has fewer columns than rows.
    pub fn invert_selected(&self) -> SelectedInverse {
        assert!(
            self.ncols >= self.nrows,
            "matrix must have at least as many columns as rows"
        );
        let n = self.nrows;
        let n2 = self.ncols;
        let mut m = self.clone();
        let mut r = DenseMatrix::new(n, n2);
        let mut rows: Vec<usize> = (0..n).collect();
        let mut cols: Vec<usize> = (0..n2).collect();

        let mut retired = 0;
        let mut i = 0;
        loop {
            let mut pivot = None;
            while i < n - retired {
                let k0 = rows[i] / WORD_BITS;
                let b0 = rows[i] % WORD_BITS;
                pivot = (i..n2).find(|&j| (m.bits[cols[j] * m.words + k0] >> b0) & 1 != 0);
                if pivot.is_some() {
                    break;
                }
                // No pivot in this row; retire it to the end of the order.
                retired += 1;
                rows.swap(i, n - retired);
            }
            let j = match pivot {
                Some(j) => j,
                None => break,
            };
            let k0 = rows[i] / WORD_BITS;
            let b0 = rows[i] % WORD_BITS;
            let c = cols[j];
            cols.swap(i, j);
            r.set(rows[i], c, 1);
            for j2 in 0..n2 {
                if j2 != c && (m.bits[j2 * m.words + k0] >> b0) & 1 != 0 {
                    m.xor_cols(j2, c, 0);
                    r.xor_cols(j2, c, 0);
                }
            }
            i += 1;
        }

        // Inverse columns associated with the retired rows are not
        // meaningful and are left as zero.
        for &c in &cols[n - retired..n] {
            let range = r.col_range(c);
            r.bits[range].fill(0);
        }

        SelectedInverse {
            inverse: r,
            row_order: rows,
            col_order: cols,
            deficiency: retired,
        }
    }

    /// Inverts the matrix, changing elements as needed to make it
    /// nonsingular.
    ///
    /// Whenever the elimination finds no pivot, the diagonal element of the
    /// working matrix is forced to one and the elimination continues. The
    /// positions forced are reported along with the inverse; for a
    /// nonsingular matrix the list is empty and the result is the plain
    /// inverse.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    pub fn forcibly_invert(&self) -> ForcedInverse {
        assert_eq!(self.nrows, self.ncols, "matrix to invert is not square");
        let n = self.nrows;
        let mut m = self.clone();
        let mut r = DenseMatrix::identity(n);
        let mut a_row = vec![None; n];
        let mut a_col: Vec<usize> = (0..n).collect();
        for i in 0..n {
            let k0 = i / WORD_BITS;
            let b0 = i % WORD_BITS;
            let pivot = (i..n).find(|&j| (m.bits[j * m.words + k0] >> b0) & 1 != 0);
            let j = match pivot {
                Some(j) => j,
                None => {
                    m.set(i, i, 1);
                    a_row[i] = Some(i);
                    i
                }
            };
            m.swap_cols(i, j);
            r.swap_cols(i, j);
            a_col.swap(i, j);
            for j in 0..n {
                if j != i && (m.bits[j * m.words + k0] >> b0) & 1 != 0 {
                    m.xor_cols(j, i, k0);
                    r.xor_cols(j, i, 0);
                }
            }
        }
        let forced = a_row
            .into_iter()
            .zip(a_col)
            .filter_map(|(row, col)| row.map(|row| (row, col)))
            .collect();
        ForcedInverse { inverse: r, forced }
    }

    /// Writes the matrix in its binary serialized form.
    ///
    /// The format consists of 32-bit little-endian integers: the dimensions
    /// followed by the packed words of each column.
    ///
    /// # Errors
    ///
    /// Fails if the writer fails.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        intio::write_int(w, self.nrows as i32)?;
        intio::write_int(w, self.ncols as i32)?;
        for &word in &self.bits {
            intio::write_int(w, word as i32)?;
        }
        Ok(())
    }

    /// Reads a matrix written by [`write`](DenseMatrix::write).
    ///
    /// # Errors
    ///
    /// Fails if the reader fails, the data ends prematurely, or a dimension
    /// is out of range.
    pub fn read<R: Read>(r: &mut R) -> Result<DenseMatrix, ReadError> {
        let nrows = intio::read_int(r)?;
        if nrows <= 0 {
            return Err(ReadError::Invalid("number of rows is not positive"));
        }
        let ncols = intio::read_int(r)?;
        if ncols <= 0 {
            return Err(ReadError::Invalid("number of columns is not positive"));
        }
        let mut m = DenseMatrix::new(nrows as usize, ncols as usize);
        for k in 0..m.bits.len() {
            m.bits[k] = intio::read_int(r)? as u32;
        }
        Ok(m)
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &DenseMatrix) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return false;
        }
        // The bits of the last word of each column beyond the number of
        // rows are padding and must not influence the comparison.
        let tail = self.nrows % WORD_BITS;
        let mask = if tail == 0 { u32::MAX } else { (1 << tail) - 1 };
        for j in 0..self.ncols {
            for k in 0..self.words {
                let m = if k == self.words - 1 { mask } else { u32::MAX };
                if (self.bits[j * self.words + k] ^ other.bits[j * self.words + k]) & m != 0 {
                    return false;
                }
            }
        }
        true
    }
}

impl Eq for DenseMatrix {}

impl fmt::Display for DenseMatrix {
    /// Formats the matrix with one line per row and one digit per element.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                write!(f, " {}", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Result of [`DenseMatrix::invert_selected`].
#[derive(Debug, Clone)]
pub struct SelectedInverse {
    /// The embedded inverse of the selected submatrix.
    pub inverse: DenseMatrix,
    /// Permutation of the row indices; the rows selected come first, in
    /// pivot order, followed by the rows for which no pivot was found.
    pub row_order: Vec<usize>,
    /// Permutation of the column indices; the pivot columns come first, in
    /// pivot order.
    pub col_order: Vec<usize>,
    /// Number of rows for which no pivot was found.
    pub deficiency: usize,
}

/// Result of [`DenseMatrix::forcibly_invert`].
#[derive(Debug, Clone)]
pub struct ForcedInverse {
    /// The inverse of the matrix with the forced changes applied.
    pub inverse: DenseMatrix,
    /// Positions of the elements of the working matrix that were forced to
    /// one to keep the elimination going.
    pub forced: Vec<(usize, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // A deterministic pattern that crosses the 32-bit word boundary.
    fn pattern(nrows: usize, ncols: usize) -> DenseMatrix {
        let mut m = DenseMatrix::new(nrows, ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                if (3 * i + 7 * j) % 5 == 0 {
                    m.set(i, j, 1);
                }
            }
        }
        m
    }

    // Unit lower triangular, hence invertible.
    fn unit_lower(n: usize) -> DenseMatrix {
        let mut m = DenseMatrix::identity(n);
        for i in 0..n {
            for j in 0..i {
                if (i + 2 * j) % 3 == 0 {
                    m.set(i, j, 1);
                }
            }
        }
        m
    }

    #[test]
    fn get_set_flip() {
        let mut m = DenseMatrix::new(40, 3);
        for row in [0, 31, 32, 39] {
            assert_eq!(m.get(row, 1), 0);
            m.set(row, 1, 1);
            assert_eq!(m.get(row, 1), 1);
            assert_eq!(m.flip(row, 1), 0);
            assert_eq!(m.flip(row, 1), 1);
            m.set(row, 1, 0);
            assert_eq!(m.get(row, 1), 0);
        }
        // Neighbouring bits are untouched.
        m.set(31, 0, 1);
        m.set(32, 0, 1);
        assert_eq!(m.get(30, 0) + m.get(33, 0), 0);
    }

    #[test]
    fn identity_multiplication() {
        let a = pattern(40, 33);
        let id = DenseMatrix::identity(40);
        assert_eq!(id.multiply(&a), a);
        let id = DenseMatrix::identity(33);
        assert_eq!(a.multiply(&id), a);
    }

    #[test]
    fn add_is_elementwise_xor() {
        let a = pattern(35, 4);
        let b = pattern(35, 4);
        let zero = DenseMatrix::new(35, 4);
        assert_eq!(a.add(&b), zero);
        assert_eq!(a.add(&zero), a);
    }

    #[test]
    fn multiply_small() {
        // [1 1 0]   [1 0]   [1 1]
        // [0 1 1] x [0 1] = [1 1]
        //           [1 0]
        let mut a = DenseMatrix::new(2, 3);
        for &(i, j) in &[(0, 0), (0, 1), (1, 1), (1, 2)] {
            a.set(i, j, 1);
        }
        let mut b = DenseMatrix::new(3, 2);
        for &(i, j) in &[(0, 0), (1, 1), (2, 0)] {
            b.set(i, j, 1);
        }
        let r = a.multiply(&b);
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(r.get(i, j), 1);
            }
        }
    }

    #[test]
    fn mul_vec_matches_multiply() {
        let a = pattern(40, 9);
        let u: Vec<u8> = (0..9).map(|j| (j % 2) as u8).collect();
        let mut ucol = DenseMatrix::new(9, 1);
        for (j, &bit) in u.iter().enumerate() {
            ucol.set(j, 0, bit);
        }
        let prod = a.multiply(&ucol);
        let mut v = vec![0; 40];
        a.mul_vec(&u, &mut v);
        for i in 0..40 {
            assert_eq!(v[i], prod.get(i, 0));
        }
    }

    #[test]
    fn transpose_roundtrip() {
        let a = pattern(40, 33);
        let t = a.transpose();
        assert_eq!(t.num_rows(), 33);
        assert_eq!(t.num_cols(), 40);
        for i in 0..40 {
            for j in 0..33 {
                assert_eq!(a.get(i, j), t.get(j, i));
            }
        }
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn copy_rows_and_cols() {
        let a = pattern(7, 5);
        let rows = [6, 0, 3];
        let r = a.copy_rows(&rows);
        assert_eq!(r.num_rows(), 3);
        for (i, &row) in rows.iter().enumerate() {
            for j in 0..5 {
                assert_eq!(r.get(i, j), a.get(row, j));
            }
        }
        let cols = [4, 4, 1];
        let r = a.copy_cols(&cols);
        assert_eq!(r.num_cols(), 3);
        for i in 0..7 {
            for (j, &col) in cols.iter().enumerate() {
                assert_eq!(r.get(i, j), a.get(i, col));
            }
        }
    }

    #[test]
    fn equality_masks_padding_bits() {
        let a = pattern(33, 2);
        let mut b = a.clone();
        // Poke junk into the padding of the last word of a column.
        b.bits[1] |= 1 << 5;
        assert_eq!(a, b);
        b.set(32, 0, a.get(32, 0) ^ 1);
        assert_ne!(a, b);
    }

    #[test]
    fn inverse_roundtrip() {
        for a in [unit_lower(5), unit_lower(40), pattern(1, 1)] {
            let n = a.num_rows();
            let inv = a.inverse().unwrap();
            assert_eq!(a.multiply(&inv), DenseMatrix::identity(n));
            assert_eq!(inv.multiply(&a), DenseMatrix::identity(n));
        }
    }

    #[test]
    fn double_inverse_roundtrip() {
        use crate::rand::SeedableRng;
        use rand::Rng;

        let mut rng = crate::rand::Rng::seed_from_u64(17);
        for n in [2, 5, 17, 33, 64] {
            // A product of random unit triangular matrices is invertible.
            let mut l = DenseMatrix::identity(n);
            let mut u = DenseMatrix::identity(n);
            for i in 0..n {
                for j in 0..i {
                    if rng.gen_bool(0.5) {
                        l.set(i, j, 1);
                    }
                    if rng.gen_bool(0.5) {
                        u.set(j, i, 1);
                    }
                }
            }
            let a = l.multiply(&u);
            let inv = a.inverse().unwrap();
            assert_eq!(inv.inverse().unwrap(), a);
            assert_eq!(a.multiply(&inv), DenseMatrix::identity(n));
        }
    }

    #[test]
    fn inverse_of_singular_fails() {
        // A zero column makes the matrix singular.
        let mut a = unit_lower(6);
        for i in 0..6 {
            a.set(i, 3, 0);
        }
        assert_eq!(a.inverse(), Err(Singular));
    }

    #[test]
    fn invert_selected_square() {
        let a = unit_lower(40);
        let sel = a.invert_selected();
        assert_eq!(sel.deficiency, 0);
        assert_eq!(a.multiply(&sel.inverse), DenseMatrix::identity(40));
        let mut rows = sel.row_order.clone();
        rows.sort_unstable();
        assert_eq!(rows, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn invert_selected_reports_redundant_rows() {
        // Rows 0 and 2 are equal, so one of them finds no pivot.
        let mut a = DenseMatrix::new(3, 5);
        for &(i, j) in &[(0, 0), (0, 4), (1, 1), (2, 0), (2, 4)] {
            a.set(i, j, 1);
        }
        let sel = a.invert_selected();
        assert_eq!(sel.deficiency, 1);
        let unused = sel.row_order[2];
        assert!(unused == 0 || unused == 2);
    }

    #[test]
    fn forcibly_invert_matches_inverse_when_nonsingular() {
        let a = unit_lower(33);
        let forced = a.forcibly_invert();
        assert!(forced.forced.is_empty());
        assert_eq!(forced.inverse, a.inverse().unwrap());
    }

    #[test]
    fn forcibly_invert_patches_singular_matrix() {
        let a = DenseMatrix::new(2, 2);
        let forced = a.forcibly_invert();
        assert_eq!(forced.forced, vec![(0, 0), (1, 1)]);
        assert_eq!(forced.inverse, DenseMatrix::identity(2));
    }

    #[test]
    fn file_roundtrip() {
        let a = pattern(40, 33);
        let mut buf = Vec::new();
        a.write(&mut buf).unwrap();
        assert_eq!(buf.len(), 8 + 4 * 2 * 33);
        let back = DenseMatrix::read(&mut buf.as_slice()).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn read_rejects_bad_data() {
        let buf = [0u8; 8];
        assert!(matches!(
            DenseMatrix::read(&mut buf.as_slice()),
            Err(ReadError::Invalid(_))
        ));
        let a = pattern(5, 5);
        let mut buf = Vec::new();
        a.write(&mut buf).unwrap();
        buf.truncate(buf.len() - 2);
        assert!(matches!(
            DenseMatrix::read(&mut buf.as_slice()),
            Err(ReadError::Io(_))
        ));
    }
}
