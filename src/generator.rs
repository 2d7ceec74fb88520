//! Generator matrices and encoding.
//!
//! A generator matrix turns a message of `N - M` bits into a codeword of `N`
//! bits that satisfies the `M` checks of a parity check matrix. Rather than
//! storing a generator matrix in the usual systematic form, which tends to be
//! dense, a [`Generator`] keeps one of three representations derived from the
//! parity check matrix itself:
//!
//! * Sparse: an LU decomposition of an `M x M` submatrix of the parity check
//!   matrix, so that the check bits are found by forward and backward
//!   substitution. This is usually by far the cheapest representation for low
//!   density matrices.
//! * Dense: the product of the inverse of an `M x M` submatrix and the
//!   remaining columns, applied to the message by a dense matrix-vector
//!   multiply.
//! * Mixed: only the inverse of the `M x M` submatrix, with the multiplication
//!   by the remaining columns done using the sparse parity check matrix. This
//!   trades some of the dense representation's simplicity for speed when the
//!   parity check matrix is sparse.
//!
//! Every representation records a column ordering for the codeword: the
//! positions listed first hold the `M` check bits, the rest hold the message
//! bits in order. The ordering is chosen during the matrix factorization and
//! is stored in the generator matrix file, so encoders and decoders agree on
//! where the message lives inside a codeword.

use crate::convert::sparse_to_dense;
use crate::dense::{self, DenseMatrix};
use crate::intio;
use crate::sparse::{self, PivotStrategy, SparseMatrix};
use std::io::{self, Read, Write};
use thiserror::Error;

/// Leading bytes of a serialized generator matrix.
const GEN_MAGIC: i32 = ((b'G' as i32) << 8) + 0x80;

/// Errors produced when deriving a generator matrix from a parity check
/// matrix.
#[derive(Debug, Error)]
pub enum MakeError {
    /// The decomposition could not process all columns. Lowering the
    /// abandonment number, or not abandoning columns at all, may fix this;
    /// otherwise the parity check matrix does not have full row rank.
    #[error("{0} columns are dependent, possibly due to abandonment; try a lower abandonment number")]
    DependentColumns(usize),
    /// A given column ordering selected a singular submatrix.
    #[error("could not invert the submatrix selected by the given column order")]
    NotInvertible,
}

/// Errors produced when reading a serialized generator matrix.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader failed or the data ended prematurely.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// The file does not start with the generator matrix magic number.
    #[error("file does not contain a generator matrix")]
    NotGenerator,
    /// The dimensions in the file do not match the parity check matrix.
    #[error("generator matrix and parity check matrix are incompatible")]
    Incompatible,
    /// The representation type in the file is not sparse, dense or mixed.
    #[error("unknown type of generator matrix")]
    UnknownType,
    /// The file data is inconsistent with the dimensions it declares.
    #[error("garbled generator matrix")]
    Garbled,
    /// A sparse factor could not be read.
    #[error(transparent)]
    Sparse(#[from] sparse::ReadError),
    /// A dense matrix could not be read.
    #[error(transparent)]
    Dense(#[from] dense::ReadError),
}

/// Generator matrix for the code defined by a parity check matrix.
///
/// # Examples
///
/// ```
/// use ldpc_codes::generator::Generator;
/// use ldpc_codes::sparse::{PivotStrategy, SparseMatrix};
///
/// let mut h = SparseMatrix::new(2, 4);
/// h.insert(0, 0);
/// h.insert(0, 2);
/// h.insert(1, 1);
/// h.insert(1, 2);
/// h.insert(1, 3);
/// let gen = Generator::sparse(&h, PivotStrategy::MinProd, 0, 0)?;
/// let codeword = gen.encode(&h, &[1, 1]);
/// let mut parity = vec![0; 2];
/// h.mul_vec(&codeword, &mut parity);
/// assert_eq!(parity, vec![0, 0]);
/// # Ok::<(), ldpc_codes::generator::MakeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    repr: Repr,
    col_order: Vec<usize>,
}

#[derive(Debug, Clone)]
enum Repr {
    Sparse {
        l: SparseMatrix,
        u: SparseMatrix,
        row_order: Vec<usize>,
    },
    Dense {
        g: DenseMatrix,
    },
    Mixed {
        ainv: DenseMatrix,
    },
}

impl Generator {
    /// Derives a sparse generator matrix by LU decomposition of the parity
    /// check matrix.
    ///
    /// `strategy`, `abandon_number` and `abandon_when` are passed on to
    /// [`SparseMatrix::decomp`]. Statistics on the density of the factors are
    /// printed to standard error.
    ///
    /// # Errors
    ///
    /// Returns [`MakeError::DependentColumns`] if columns were abandoned and
    /// the decomposition came out deficient. Without abandonment a deficiency
    /// means the parity check matrix has redundant checks, which is only
    /// reported as a note on standard error.
    pub fn sparse(
        h: &SparseMatrix,
        strategy: PivotStrategy,
        abandon_number: usize,
        abandon_when: usize,
    ) -> Result<Generator, MakeError> {
        let m = h.num_rows();
        let lu = h.decomp(m, strategy, abandon_number, abandon_when);
        if lu.deficiency > 0 {
            if abandon_number > 0 {
                return Err(MakeError::DependentColumns(lu.deficiency));
            }
            eprintln!(
                "Note: Parity check matrix has {} redundant checks",
                lu.deficiency
            );
        }
        let cl = lu.l.num_entries();
        let cu = lu.u.num_entries();
        let cb: usize = lu.col_order[m..].iter().map(|&j| h.col_weight(j)).sum();
        eprintln!(
            "Number of 1s per check in L is {:.1}, U is {:.1}, B is {:.1}, total is {:.1}",
            cl as f64 / m as f64,
            cu as f64 / m as f64,
            cb as f64 / m as f64,
            (cl + cu + cb) as f64 / m as f64
        );
        Ok(Generator {
            repr: Repr::Sparse {
                l: lu.l,
                u: lu.u,
                row_order: lu.row_order,
            },
            col_order: lu.col_order,
        })
    }

    /// Derives a dense generator matrix, the product of the inverse of an
    /// `M x M` submatrix of the parity check matrix and its remaining
    /// columns.
    ///
    /// With `columns` the submatrix is taken from the first `M` columns of
    /// the given ordering, typically obtained from another generator matrix
    /// file with [`read_column_order`](Generator::read_column_order).
    /// Otherwise the elimination picks the columns itself, and redundant
    /// checks are reported as a note on standard error. The density of the
    /// result is printed to standard error.
    ///
    /// # Errors
    ///
    /// Returns [`MakeError::NotInvertible`] if a given column ordering
    /// selects a singular submatrix.
    ///
    /// # Panics
    ///
    /// Panics if a given `columns` does not have one element per column of
    /// `h` or contains an index out of range.
    pub fn dense(h: &SparseMatrix, columns: Option<&[usize]>) -> Result<Generator, MakeError> {
        let m = h.num_rows();
        let dh = sparse_to_dense(h);
        let (ainv, col_order) = Generator::invert_submatrix(&dh, columns)?;
        let b = dh.copy_cols(&col_order[m..]);
        let g = ainv.multiply(&b);
        eprintln!(
            "Number of 1s per check in Inv(A) X B is {:.1}",
            count_ones(&g) as f64 / m as f64
        );
        Ok(Generator {
            repr: Repr::Dense { g },
            col_order,
        })
    }

    /// Derives a mixed generator matrix, which keeps only the inverse of an
    /// `M x M` submatrix of the parity check matrix and multiplies by the
    /// remaining columns in sparse form when encoding.
    ///
    /// The `columns` argument, error conditions and notes on standard error
    /// are as for [`dense`](Generator::dense).
    pub fn mixed(h: &SparseMatrix, columns: Option<&[usize]>) -> Result<Generator, MakeError> {
        let m = h.num_rows();
        let dh = sparse_to_dense(h);
        let (ainv, col_order) = Generator::invert_submatrix(&dh, columns)?;
        let c = count_ones(&ainv);
        let c2: usize = col_order[m..].iter().map(|&j| h.col_weight(j)).sum();
        eprintln!(
            "Number of 1s per check in Inv(A) is {:.1}, in B is {:.1}, total is {:.1}",
            c as f64 / m as f64,
            c2 as f64 / m as f64,
            (c + c2) as f64 / m as f64
        );
        Ok(Generator {
            repr: Repr::Mixed { ainv },
            col_order,
        })
    }

    /// Inverts the `M x M` submatrix of `dh` made of the first `M` columns
    /// of the given ordering, or of columns of the elimination's own
    /// choosing, and returns the inverse with the full column ordering.
    fn invert_submatrix(
        dh: &DenseMatrix,
        columns: Option<&[usize]>,
    ) -> Result<(DenseMatrix, Vec<usize>), MakeError> {
        let m = dh.num_rows();
        match columns {
            Some(cols) => {
                assert_eq!(
                    cols.len(),
                    dh.num_cols(),
                    "column order length does not match the matrix"
                );
                let a = dh.copy_cols(&cols[..m]);
                let ainv = a.inverse().map_err(|_| MakeError::NotInvertible)?;
                Ok((ainv, cols.to_vec()))
            }
            None => {
                let sel = dh.invert_selected();
                if sel.deficiency > 0 {
                    eprintln!(
                        "Note: Parity check matrix has {} redundant checks",
                        sel.deficiency
                    );
                }
                // The selected inverse lives at the pivot rows and columns of
                // the original matrix. Gather it into an M x M matrix whose
                // row i is the equation for check bit col_order[i].
                let mut rows_inv = vec![0; m];
                for (i, &r) in sel.row_order.iter().enumerate() {
                    rows_inv[r] = i;
                }
                let ainv = sel
                    .inverse
                    .copy_rows(&sel.row_order)
                    .copy_cols(&sel.col_order[..m])
                    .copy_cols(&rows_inv);
                Ok((ainv, sel.col_order))
            }
        }
    }

    /// Number of checks of the code, the codeword bits filled in when
    /// encoding.
    pub fn num_checks(&self) -> usize {
        match &self.repr {
            Repr::Sparse { l, .. } => l.num_rows(),
            Repr::Dense { g } => g.num_rows(),
            Repr::Mixed { ainv } => ainv.num_rows(),
        }
    }

    /// Length of a codeword.
    pub fn block_length(&self) -> usize {
        self.col_order.len()
    }

    /// Number of message bits in a codeword.
    pub fn message_length(&self) -> usize {
        self.block_length() - self.num_checks()
    }

    /// Ordering of the codeword positions. The first
    /// [`num_checks`](Generator::num_checks) positions hold check bits, the
    /// rest hold the message bits in order.
    pub fn column_order(&self) -> &[usize] {
        &self.col_order
    }

    /// Encodes a message into a codeword of the parity check matrix the
    /// generator matrix was derived from.
    ///
    /// The message bits are placed at the positions
    /// `column_order()[num_checks()..]` of the codeword and the check bits
    /// are computed around them.
    ///
    /// # Panics
    ///
    /// Panics if the message length or the dimensions of `h` do not match
    /// the generator matrix, or if a sparse generator matrix turns out to be
    /// inconsistent with `h`, which happens when the two files were not made
    /// for each other.
    pub fn encode(&self, h: &SparseMatrix, message: &[u8]) -> Vec<u8> {
        let m = self.num_checks();
        let n = self.block_length();
        assert_eq!(h.num_rows(), m, "parity check matrix has the wrong number of rows");
        assert_eq!(h.num_cols(), n, "parity check matrix has the wrong number of columns");
        assert_eq!(message.len(), n - m, "message length does not match the code");

        let mut codeword = vec![0u8; n];
        for (j, &bit) in message.iter().enumerate() {
            codeword[self.col_order[m + j]] = bit;
        }

        match &self.repr {
            Repr::Sparse { l, u, row_order } => {
                // x = B s, the contribution of the message bits to each
                // check, then L y = x and U c = y give the check bits.
                let mut x = vec![0u8; m];
                for (j, &bit) in message.iter().enumerate() {
                    if bit != 0 {
                        for e in h.iter_col(self.col_order[m + j]) {
                            x[h.row(e)] ^= 1;
                        }
                    }
                }
                let mut y = vec![0u8; m];
                if l.forward_sub(row_order, &x, &mut y).is_err()
                    || u.backward_sub(&self.col_order, &y, &mut codeword).is_err()
                {
                    // Solvable for any generator matrix derived from h,
                    // redundant checks included.
                    panic!("generator matrix is inconsistent with the parity check matrix");
                }
            }
            Repr::Dense { g } => {
                let mut v = vec![0u8; m];
                g.mul_vec(message, &mut v);
                for (j, &bit) in v.iter().enumerate() {
                    codeword[self.col_order[j]] = bit;
                }
            }
            Repr::Mixed { ainv } => {
                let mut x = vec![0u8; m];
                for (j, &bit) in message.iter().enumerate() {
                    if bit != 0 {
                        for e in h.iter_col(self.col_order[m + j]) {
                            x[h.row(e)] ^= 1;
                        }
                    }
                }
                let mut v = vec![0u8; m];
                ainv.mul_vec(&x, &mut v);
                for (j, &bit) in v.iter().enumerate() {
                    codeword[self.col_order[j]] = bit;
                }
            }
        }
        codeword
    }

    /// Writes the generator matrix in the format read by
    /// [`read`](Generator::read).
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        intio::write_int(w, GEN_MAGIC)?;
        let type_byte = match &self.repr {
            Repr::Sparse { .. } => b's',
            Repr::Dense { .. } => b'd',
            Repr::Mixed { .. } => b'm',
        };
        w.write_all(&[type_byte])?;
        intio::write_int(w, self.num_checks() as i32)?;
        intio::write_int(w, self.block_length() as i32)?;
        for &c in &self.col_order {
            intio::write_int(w, c as i32)?;
        }
        match &self.repr {
            Repr::Sparse { l, u, row_order } => {
                for &r in row_order {
                    intio::write_int(w, r as i32)?;
                }
                l.write(w)?;
                u.write(w)?;
            }
            Repr::Dense { g } => g.write(w)?,
            Repr::Mixed { ainv } => ainv.write(w)?,
        }
        Ok(())
    }

    /// Reads a generator matrix written by [`write`](Generator::write).
    ///
    /// When the parity check matrix the code works with is given, the
    /// dimensions recorded in the file must match it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not hold a
    /// generator matrix, is incompatible with `h`, or declares dimensions
    /// its contents then contradict.
    pub fn read<R: Read>(r: &mut R, h: Option<&SparseMatrix>) -> Result<Generator, ReadError> {
        let (type_byte, m, n, col_order) = Generator::read_header(r, h)?;
        let repr = match type_byte {
            b's' => {
                let mut row_order = Vec::with_capacity(m);
                for _ in 0..m {
                    let v = intio::read_int(r)?;
                    if v < 0 || v as usize >= m {
                        return Err(ReadError::Garbled);
                    }
                    row_order.push(v as usize);
                }
                let l = SparseMatrix::read(r)?;
                let u = SparseMatrix::read(r)?;
                if l.num_rows() != m || l.num_cols() != m {
                    return Err(ReadError::Garbled);
                }
                if u.num_rows() != m || u.num_cols() != n {
                    return Err(ReadError::Garbled);
                }
                Repr::Sparse { l, u, row_order }
            }
            b'd' => {
                let g = DenseMatrix::read(r)?;
                if g.num_rows() != m || g.num_cols() != n - m {
                    return Err(ReadError::Garbled);
                }
                Repr::Dense { g }
            }
            b'm' => {
                let ainv = DenseMatrix::read(r)?;
                if ainv.num_rows() != m || ainv.num_cols() != m {
                    return Err(ReadError::Garbled);
                }
                Repr::Mixed { ainv }
            }
            _ => return Err(ReadError::UnknownType),
        };
        Ok(Generator { repr, col_order })
    }

    /// Reads only the dimensions and the column ordering of a generator
    /// matrix file, skipping the representation itself.
    ///
    /// Returns the number of checks, the block length and the column
    /// ordering. This is all a program needs to locate the message bits
    /// inside codewords.
    ///
    /// # Errors
    ///
    /// As for [`read`](Generator::read).
    pub fn read_column_order<R: Read>(
        r: &mut R,
        h: Option<&SparseMatrix>,
    ) -> Result<(usize, usize, Vec<usize>), ReadError> {
        let (_, m, n, col_order) = Generator::read_header(r, h)?;
        Ok((m, n, col_order))
    }

    fn read_header<R: Read>(
        r: &mut R,
        h: Option<&SparseMatrix>,
    ) -> Result<(u8, usize, usize, Vec<usize>), ReadError> {
        if intio::read_int(r)? != GEN_MAGIC {
            return Err(ReadError::NotGenerator);
        }
        let mut type_byte = [0u8; 1];
        r.read_exact(&mut type_byte)?;
        let m = intio::read_int(r)?;
        let n = intio::read_int(r)?;
        if let Some(h) = h {
            if m != h.num_rows() as i32 || n != h.num_cols() as i32 {
                return Err(ReadError::Incompatible);
            }
        }
        if m < 1 || n <= m {
            return Err(ReadError::Garbled);
        }
        let (m, n) = (m as usize, n as usize);
        let mut col_order = Vec::with_capacity(n);
        for _ in 0..n {
            let v = intio::read_int(r)?;
            if v < 0 || v as usize >= n {
                return Err(ReadError::Garbled);
            }
            col_order.push(v as usize);
        }
        Ok((type_byte[0], m, n, col_order))
    }
}

fn count_ones(m: &DenseMatrix) -> usize {
    let mut c = 0;
    for i in 0..m.num_rows() {
        for j in 0..m.num_cols() {
            c += m.get(i, j) as usize;
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The first four columns form an identity, so the matrix has full row
    /// rank and the natural column order is usable as is.
    fn h4x8() -> SparseMatrix {
        let mut h = SparseMatrix::new(4, 8);
        for &(r, c) in &[
            (0, 0),
            (0, 4),
            (0, 5),
            (1, 1),
            (1, 4),
            (1, 6),
            (2, 2),
            (2, 5),
            (2, 6),
            (2, 7),
            (3, 3),
            (3, 7),
        ] {
            h.insert(r, c);
        }
        h
    }

    /// As [`h4x8`] but with a copy of the first row appended, making one
    /// check redundant.
    fn h5x8() -> SparseMatrix {
        let mut h = SparseMatrix::new(5, 8);
        for &(r, c) in &[
            (0, 0),
            (0, 4),
            (0, 5),
            (1, 1),
            (1, 4),
            (1, 6),
            (2, 2),
            (2, 5),
            (2, 6),
            (2, 7),
            (3, 3),
            (3, 7),
            (4, 0),
            (4, 4),
            (4, 5),
        ] {
            h.insert(r, c);
        }
        h
    }

    fn assert_codeword(h: &SparseMatrix, codeword: &[u8]) {
        let mut parity = vec![0u8; h.num_rows()];
        h.mul_vec(codeword, &mut parity);
        assert_eq!(parity, vec![0; h.num_rows()], "word fails the parity checks");
    }

    fn message_from(d: u32, k: usize) -> Vec<u8> {
        (0..k).map(|i| ((d >> i) & 1) as u8).collect()
    }

    /// Encodes every message and checks that the result is a codeword with
    /// the message recoverable from the positions the column order names.
    fn exercise_all_messages(h: &SparseMatrix, gen: &Generator) {
        let m = gen.num_checks();
        let k = gen.message_length();
        for d in 0..1u32 << k {
            let message = message_from(d, k);
            let codeword = gen.encode(h, &message);
            assert_codeword(h, &codeword);
            for (j, &bit) in message.iter().enumerate() {
                assert_eq!(codeword[gen.column_order()[m + j]], bit);
            }
        }
    }

    #[test]
    fn sparse_generator_encodes_codewords() {
        let h = h4x8();
        for strategy in [
            PivotStrategy::First,
            PivotStrategy::MinCol,
            PivotStrategy::MinProd,
        ] {
            let gen = Generator::sparse(&h, strategy, 0, 0).unwrap();
            assert_eq!(gen.num_checks(), 4);
            assert_eq!(gen.block_length(), 8);
            assert_eq!(gen.message_length(), 4);
            exercise_all_messages(&h, &gen);
        }
    }

    #[test]
    fn dense_generator_encodes_codewords() {
        let h = h4x8();
        let gen = Generator::dense(&h, None).unwrap();
        exercise_all_messages(&h, &gen);
    }

    #[test]
    fn mixed_generator_encodes_codewords() {
        let h = h4x8();
        let gen = Generator::mixed(&h, None).unwrap();
        exercise_all_messages(&h, &gen);
    }

    #[test]
    fn dense_generator_with_a_given_column_order() {
        let h = h4x8();
        let natural: Vec<usize> = (0..8).collect();
        let gen = Generator::dense(&h, Some(&natural)).unwrap();
        assert_eq!(gen.column_order(), &natural[..]);
        // With the identity as the check submatrix, the check bits equal the
        // product of the message columns and the message.
        let codeword = gen.encode(&h, &[1, 0, 1, 1]);
        assert_eq!(codeword, vec![1, 0, 0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn dependent_column_order_is_rejected() {
        let h = h4x8();
        let columns = [0, 0, 1, 2, 3, 4, 5, 6];
        assert!(matches!(
            Generator::dense(&h, Some(&columns)),
            Err(MakeError::NotInvertible)
        ));
    }

    #[test]
    fn redundant_checks_still_encode() {
        let h = h5x8();
        let gen = Generator::sparse(&h, PivotStrategy::MinProd, 0, 0).unwrap();
        assert_eq!(gen.message_length(), 3);
        exercise_all_messages(&h, &gen);
        let gen = Generator::dense(&h, None).unwrap();
        exercise_all_messages(&h, &gen);
    }

    #[test]
    fn abandonment_reports_dependent_columns() {
        let h = h5x8();
        assert!(matches!(
            Generator::sparse(&h, PivotStrategy::MinProd, 1, 0),
            Err(MakeError::DependentColumns(_))
        ));
    }

    #[test]
    fn generator_files_roundtrip() {
        let h = h4x8();
        let generators = [
            Generator::sparse(&h, PivotStrategy::MinProd, 0, 0).unwrap(),
            Generator::dense(&h, None).unwrap(),
            Generator::mixed(&h, None).unwrap(),
        ];
        let message = [1, 1, 0, 1];
        for gen in &generators {
            let mut data = Vec::new();
            gen.write(&mut data).unwrap();
            let back = Generator::read(&mut io::Cursor::new(&data), Some(&h)).unwrap();
            let mut again = Vec::new();
            back.write(&mut again).unwrap();
            assert_eq!(data, again);
            assert_eq!(gen.encode(&h, &message), back.encode(&h, &message));
        }
    }

    #[test]
    fn column_order_can_be_read_alone() {
        let h = h4x8();
        let gen = Generator::mixed(&h, None).unwrap();
        let mut data = Vec::new();
        gen.write(&mut data).unwrap();
        let (m, n, cols) =
            Generator::read_column_order(&mut io::Cursor::new(&data), None).unwrap();
        assert_eq!(m, 4);
        assert_eq!(n, 8);
        assert_eq!(cols, gen.column_order());
    }

    #[test]
    fn read_checks_the_file() {
        let h = h4x8();
        let gen = Generator::dense(&h, None).unwrap();
        let mut data = Vec::new();
        gen.write(&mut data).unwrap();

        let mut wrong = data.clone();
        wrong[0] ^= 1;
        assert!(matches!(
            Generator::read(&mut io::Cursor::new(&wrong), Some(&h)),
            Err(ReadError::NotGenerator)
        ));

        let mut wrong = data.clone();
        wrong[4] = b'x';
        assert!(matches!(
            Generator::read(&mut io::Cursor::new(&wrong), Some(&h)),
            Err(ReadError::UnknownType)
        ));

        // A column index outside the matrix.
        let mut wrong = data.clone();
        wrong[13..17].copy_from_slice(&99i32.to_le_bytes());
        assert!(matches!(
            Generator::read(&mut io::Cursor::new(&wrong), Some(&h)),
            Err(ReadError::Garbled)
        ));

        assert!(matches!(
            Generator::read(&mut io::Cursor::new(&data[..10]), Some(&h)),
            Err(ReadError::Io(_))
        ));

        let other = SparseMatrix::new(3, 8);
        assert!(matches!(
            Generator::read(&mut io::Cursor::new(&data), Some(&other)),
            Err(ReadError::Incompatible)
        ));
    }
}
