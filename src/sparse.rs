//! Sparse matrices over GF(2).
//!
//! This module implements sparse binary matrices intended to be used as LDPC
//! parity check matrices. A matrix only stores its nonzero entries. Each entry
//! belongs to two circular doubly linked lists, one threading all the entries
//! in its row in order of increasing column, and one threading all the entries
//! in its column in order of increasing row, so rows and columns can be
//! scanned cheaply in either direction and entries can be inserted and deleted
//! in place. All the nodes live in a single arena owned by the matrix, and
//! entries are referred to through opaque [`EntryId`] handles.
//!
//! Besides elementwise access, the module provides matrix arithmetic
//! ([`add`](SparseMatrix::add), [`multiply`](SparseMatrix::multiply),
//! [`transpose`](SparseMatrix::transpose), [`mul_vec`](SparseMatrix::mul_vec),
//! row and column additions in place), an LU decomposition with a choice of
//! [pivoting strategies](PivotStrategy) used to derive encoders from a parity
//! check matrix, forward and backward substitution over the resulting
//! triangular factors, and serialization both in a compact binary format and
//! in the textual alist format.
//!
//! Every entry additionally carries two `f64` scratch values, its probability
//! ratio and its likelihood ratio. They are used by the message passing
//! decoder in [`decoder`](crate::decoder) to store the messages exchanged
//! between check nodes and bit nodes, and are ignored by all the matrix
//! operations in this module.

use crate::intio;
use std::fmt;
use std::io::{self, Read, Write};
use thiserror::Error;

/// Errors produced when reading a serialized sparse matrix.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader failed or the data ended prematurely.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// The data does not describe a valid matrix.
    #[error("invalid matrix data: {0}")]
    Invalid(&'static str),
}

/// Error returned when a triangular system of equations has no solution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("triangular system of equations is inconsistent")]
pub struct Inconsistent;

/// Handle to an entry of a [`SparseMatrix`].
///
/// A handle is only meaningful for the matrix that produced it (or a clone of
/// that matrix), and is invalidated when the entry is deleted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct EntryId(usize);

#[derive(Debug, Clone, Copy)]
struct Entry {
    row: usize,
    col: usize,
    left: usize,
    right: usize,
    up: usize,
    down: usize,
    pr: f64,
    lr: f64,
}

/// Sparse binary matrix.
///
/// See the [module documentation](crate::sparse) for an overview. Rows and
/// columns are indexed starting from zero. Equality with `==` compares
/// dimensions and entry positions; the probability and likelihood ratios and
/// the internal arena layout do not take part in the comparison.
///
/// # Examples
///
/// ```
/// use ldpc_codes::sparse::SparseMatrix;
///
/// let mut h = SparseMatrix::new(3, 7);
/// h.insert(0, 2);
/// h.insert(2, 5);
/// assert!(h.contains(0, 2));
/// assert!(!h.contains(1, 2));
/// assert_eq!(h.num_entries(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    // Indices 0..nrows are the row list headers, nrows..nrows+ncols the
    // column list headers, and everything above them is an entry.
    arena: Vec<Entry>,
    free: Vec<usize>,
}

impl SparseMatrix {
    /// Creates an all-zero matrix with `nrows` rows and `ncols` columns.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(nrows: usize, ncols: usize) -> SparseMatrix {
        assert!(nrows > 0 && ncols > 0, "matrix dimensions must be positive");
        let headers = nrows + ncols;
        let mut arena = Vec::with_capacity(headers);
        for idx in 0..headers {
            arena.push(Entry {
                row: usize::MAX,
                col: usize::MAX,
                left: idx,
                right: idx,
                up: idx,
                down: idx,
                pr: 0.0,
                lr: 0.0,
            });
        }
        SparseMatrix {
            nrows,
            ncols,
            arena,
            free: Vec::new(),
        }
    }

    /// Returns the number of rows of the matrix.
    pub fn num_rows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns of the matrix.
    pub fn num_cols(&self) -> usize {
        self.ncols
    }

    /// Returns the number of nonzero entries of the matrix.
    pub fn num_entries(&self) -> usize {
        self.arena.len() - self.num_headers() - self.free.len()
    }

    fn head_row(&self, row: usize) -> usize {
        assert!(row < self.nrows, "row index out of bounds");
        row
    }

    fn head_col(&self, col: usize) -> usize {
        assert!(col < self.ncols, "column index out of bounds");
        self.nrows + col
    }

    fn num_headers(&self) -> usize {
        self.nrows + self.ncols
    }

    fn is_header(&self, idx: usize) -> bool {
        idx < self.num_headers()
    }

    fn entry_id(&self, idx: usize) -> Option<EntryId> {
        if self.is_header(idx) {
            None
        } else {
            Some(EntryId(idx))
        }
    }

    /// Returns the first entry in a row, or `None` if the row is empty.
    pub fn first_in_row(&self, row: usize) -> Option<EntryId> {
        self.entry_id(self.arena[self.head_row(row)].right)
    }

    /// Returns the last entry in a row, or `None` if the row is empty.
    pub fn last_in_row(&self, row: usize) -> Option<EntryId> {
        self.entry_id(self.arena[self.head_row(row)].left)
    }

    /// Returns the first entry in a column, or `None` if the column is empty.
    pub fn first_in_col(&self, col: usize) -> Option<EntryId> {
        self.entry_id(self.arena[self.head_col(col)].down)
    }

    /// Returns the last entry in a column, or `None` if the column is empty.
    pub fn last_in_col(&self, col: usize) -> Option<EntryId> {
        self.entry_id(self.arena[self.head_col(col)].up)
    }

    /// Returns the entry following `e` in its row, or `None` at the end.
    pub fn next_in_row(&self, e: EntryId) -> Option<EntryId> {
        self.entry_id(self.arena[e.0].right)
    }

    /// Returns the entry preceding `e` in its row, or `None` at the start.
    pub fn prev_in_row(&self, e: EntryId) -> Option<EntryId> {
        self.entry_id(self.arena[e.0].left)
    }

    /// Returns the entry following `e` in its column, or `None` at the end.
    pub fn next_in_col(&self, e: EntryId) -> Option<EntryId> {
        self.entry_id(self.arena[e.0].down)
    }

    /// Returns the entry preceding `e` in its column, or `None` at the start.
    pub fn prev_in_col(&self, e: EntryId) -> Option<EntryId> {
        self.entry_id(self.arena[e.0].up)
    }

    /// Returns the row of an entry.
    pub fn row(&self, e: EntryId) -> usize {
        self.arena[e.0].row
    }

    /// Returns the column of an entry.
    pub fn col(&self, e: EntryId) -> usize {
        self.arena[e.0].col
    }

    /// Returns the probability ratio stored in an entry.
    pub fn probability_ratio(&self, e: EntryId) -> f64 {
        self.arena[e.0].pr
    }

    /// Stores a probability ratio in an entry.
    pub fn set_probability_ratio(&mut self, e: EntryId, value: f64) {
        self.arena[e.0].pr = value;
    }

    /// Returns the likelihood ratio stored in an entry.
    pub fn likelihood_ratio(&self, e: EntryId) -> f64 {
        self.arena[e.0].lr
    }

    /// Stores a likelihood ratio in an entry.
    pub fn set_likelihood_ratio(&mut self, e: EntryId, value: f64) {
        self.arena[e.0].lr = value;
    }

    /// Iterates over the entries of a row in order of increasing column.
    pub fn iter_row(&self, row: usize) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.first_in_row(row), move |&e| self.next_in_row(e))
    }

    /// Iterates over the entries of a column in order of increasing row.
    pub fn iter_col(&self, col: usize) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::successors(self.first_in_col(col), move |&e| self.next_in_col(e))
    }

    /// Returns the number of entries in a row.
    pub fn row_weight(&self, row: usize) -> usize {
        self.iter_row(row).count()
    }

    /// Returns the number of entries in a column.
    pub fn col_weight(&self, col: usize) -> usize {
        self.iter_col(col).count()
    }

    /// Looks up the entry at a given position.
    ///
    /// Searches the row and the column in parallel, after first checking
    /// whether the position lies beyond the end of either list, so the cost
    /// is proportional to the smaller of the two distances into the lists.
    pub fn find(&self, row: usize, col: usize) -> Option<EntryId> {
        let rlast = self.arena[self.head_row(row)].left;
        if self.is_header(rlast) || self.arena[rlast].col < col {
            return None;
        }
        if self.arena[rlast].col == col {
            return Some(EntryId(rlast));
        }
        let clast = self.arena[self.head_col(col)].up;
        if self.is_header(clast) || self.arena[clast].row < row {
            return None;
        }
        if self.arena[clast].row == row {
            return Some(EntryId(clast));
        }
        let mut re = self.arena[self.head_row(row)].right;
        let mut ce = self.arena[self.head_col(col)].down;
        loop {
            if self.is_header(re) || self.arena[re].col > col {
                return None;
            }
            if self.arena[re].col == col {
                return Some(EntryId(re));
            }
            if self.is_header(ce) || self.arena[ce].row > row {
                return None;
            }
            if self.arena[ce].row == row {
                return Some(EntryId(ce));
            }
            re = self.arena[re].right;
            ce = self.arena[ce].down;
        }
    }

    /// Returns `true` if the matrix has an entry at a given position.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.find(row, col).is_some()
    }

    fn alloc(&mut self, row: usize, col: usize) -> usize {
        match self.free.pop() {
            Some(idx) => {
                let e = &mut self.arena[idx];
                e.row = row;
                e.col = col;
                e.pr = 0.0;
                e.lr = 0.0;
                idx
            }
            None => {
                self.arena.push(Entry {
                    row,
                    col,
                    left: 0,
                    right: 0,
                    up: 0,
                    down: 0,
                    pr: 0.0,
                    lr: 0.0,
                });
                self.arena.len() - 1
            }
        }
    }

    /// Inserts an entry at a given position, keeping the row and column lists
    /// sorted.
    ///
    /// If the entry already exists, the existing entry is returned and the
    /// matrix is unchanged. The common case of inserting at the end of a row
    /// or column takes constant time.
    pub fn insert(&mut self, row: usize, col: usize) -> EntryId {
        let rhead = self.head_row(row);
        let chead = self.head_col(col);

        // Find the row list node before which the new entry goes.
        let rlast = self.arena[rhead].left;
        let row_succ = if self.is_header(rlast) || self.arena[rlast].col < col {
            rhead
        } else if self.arena[rlast].col == col {
            return EntryId(rlast);
        } else {
            let mut cur = self.arena[rhead].right;
            loop {
                if !self.is_header(cur) && self.arena[cur].col == col {
                    return EntryId(cur);
                }
                if self.is_header(cur) || self.arena[cur].col > col {
                    break cur;
                }
                cur = self.arena[cur].right;
            }
        };

        // Same in the column list. Finding the entry here after not finding
        // it in the row means the two lists disagree.
        let clast = self.arena[chead].up;
        let col_succ = if self.is_header(clast) || self.arena[clast].row < row {
            chead
        } else if self.arena[clast].row == row {
            panic!("row and column lists are inconsistent");
        } else {
            let mut cur = self.arena[chead].down;
            loop {
                if !self.is_header(cur) && self.arena[cur].row == row {
                    panic!("row and column lists are inconsistent");
                }
                if self.is_header(cur) || self.arena[cur].row > row {
                    break cur;
                }
                cur = self.arena[cur].down;
            }
        };

        let ne = self.alloc(row, col);
        let left = self.arena[row_succ].left;
        self.arena[ne].left = left;
        self.arena[ne].right = row_succ;
        self.arena[left].right = ne;
        self.arena[row_succ].left = ne;
        let up = self.arena[col_succ].up;
        self.arena[ne].up = up;
        self.arena[ne].down = col_succ;
        self.arena[up].down = ne;
        self.arena[col_succ].up = ne;
        EntryId(ne)
    }

    /// Deletes an entry, unlinking it from its row and column.
    ///
    /// The handle (and any copy of it) becomes invalid; using it afterwards
    /// may address a different entry inserted later.
    pub fn delete(&mut self, e: EntryId) {
        let Entry {
            left,
            right,
            up,
            down,
            ..
        } = self.arena[e.0];
        self.arena[left].right = right;
        self.arena[right].left = left;
        self.arena[up].down = down;
        self.arena[down].up = up;
        self.free.push(e.0);
    }

    /// Deletes all the entries of the matrix, keeping its dimensions.
    pub fn clear(&mut self) {
        self.arena.truncate(self.num_headers());
        self.free.clear();
        for idx in 0..self.num_headers() {
            let h = &mut self.arena[idx];
            h.left = idx;
            h.right = idx;
            h.up = idx;
            h.down = idx;
        }
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> SparseMatrix {
        let mut t = SparseMatrix::new(self.ncols, self.nrows);
        for row in 0..self.nrows {
            for e in self.iter_row(row) {
                t.insert(self.col(e), row);
            }
        }
        t
    }

    /// Returns the sum of two matrices.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of the matrices differ.
    pub fn add(&self, other: &SparseMatrix) -> SparseMatrix {
        assert!(
            self.nrows == other.nrows && self.ncols == other.ncols,
            "matrix dimensions do not match"
        );
        let mut r = SparseMatrix::new(self.nrows, self.ncols);
        for row in 0..self.nrows {
            let mut e1 = self.first_in_row(row);
            let mut e2 = other.first_in_row(row);
            while let (Some(f1), Some(f2)) = (e1, e2) {
                let c1 = self.col(f1);
                let c2 = other.col(f2);
                if c1 == c2 {
                    e1 = self.next_in_row(f1);
                    e2 = other.next_in_row(f2);
                } else if c1 < c2 {
                    r.insert(row, c1);
                    e1 = self.next_in_row(f1);
                } else {
                    r.insert(row, c2);
                    e2 = other.next_in_row(f2);
                }
            }
            while let Some(f1) = e1 {
                r.insert(row, self.col(f1));
                e1 = self.next_in_row(f1);
            }
            while let Some(f2) = e2 {
                r.insert(row, other.col(f2));
                e2 = other.next_in_row(f2);
            }
        }
        r
    }

    /// Returns the product of two matrices.
    ///
    /// # Panics
    ///
    /// Panics if `self` does not have as many columns as `other` has rows.
    pub fn multiply(&self, other: &SparseMatrix) -> SparseMatrix {
        assert_eq!(
            self.ncols, other.nrows,
            "matrix dimensions are incompatible"
        );
        let mut r = SparseMatrix::new(self.nrows, other.ncols);
        for row in 0..self.nrows {
            if self.first_in_row(row).is_none() {
                continue;
            }
            for col in 0..other.ncols {
                let mut b = false;
                let mut e1 = self.first_in_row(row);
                let mut e2 = other.first_in_col(col);
                while let (Some(f1), Some(f2)) = (e1, e2) {
                    let c1 = self.col(f1);
                    let r2 = other.row(f2);
                    if c1 == r2 {
                        b = !b;
                        e1 = self.next_in_row(f1);
                        e2 = other.next_in_col(f2);
                    } else if c1 < r2 {
                        e1 = self.next_in_row(f1);
                    } else {
                        e2 = other.next_in_col(f2);
                    }
                }
                if b {
                    r.insert(row, col);
                }
            }
        }
        r
    }

    /// Multiplies the matrix by a vector of bits.
    ///
    /// `u` must have one bit per column and `v` one bit per row. `v` is
    /// entirely overwritten with the product.
    ///
    /// # Examples
    ///
    /// ```
    /// use ldpc_codes::sparse::SparseMatrix;
    ///
    /// let mut h = SparseMatrix::new(2, 3);
    /// h.insert(0, 0);
    /// h.insert(0, 2);
    /// h.insert(1, 1);
    /// let mut v = [0; 2];
    /// h.mul_vec(&[1, 1, 1], &mut v);
    /// assert_eq!(v, [0, 1]);
    /// ```
    pub fn mul_vec(&self, u: &[u8], v: &mut [u8]) {
        assert_eq!(u.len(), self.ncols, "input length does not match columns");
        assert_eq!(v.len(), self.nrows, "output length does not match rows");
        v.fill(0);
        for (col, &bit) in u.iter().enumerate() {
            if bit != 0 {
                for e in self.iter_col(col) {
                    v[self.row(e)] ^= 1;
                }
            }
        }
    }

    /// Adds the row `src` into the row `dst`, modulo 2.
    ///
    /// # Panics
    ///
    /// Panics if `dst` and `src` are the same row.
    pub fn add_row(&mut self, dst: usize, src: usize) {
        assert!(
            dst < self.nrows && src < self.nrows,
            "row index out of bounds"
        );
        assert_ne!(dst, src, "source and destination rows must differ");
        let mut e1 = self.first_in_row(dst);
        let mut e2 = self.first_in_row(src);
        while let (Some(f1), Some(f2)) = (e1, e2) {
            let c1 = self.col(f1);
            let c2 = self.col(f2);
            if c1 > c2 {
                self.insert(dst, c2);
                e2 = self.next_in_row(f2);
            } else {
                // The next destination entry has to be read before f1 can be
                // deleted below.
                let next1 = self.next_in_row(f1);
                if c1 == c2 {
                    self.delete(f1);
                    e2 = self.next_in_row(f2);
                }
                e1 = next1;
            }
        }
        while let Some(f2) = e2 {
            let c2 = self.col(f2);
            self.insert(dst, c2);
            e2 = self.next_in_row(f2);
        }
    }

    /// Adds the column `src` into the column `dst`, modulo 2.
    ///
    /// # Panics
    ///
    /// Panics if `dst` and `src` are the same column.
    pub fn add_col(&mut self, dst: usize, src: usize) {
        assert!(
            dst < self.ncols && src < self.ncols,
            "column index out of bounds"
        );
        assert_ne!(dst, src, "source and destination columns must differ");
        let mut e1 = self.first_in_col(dst);
        let mut e2 = self.first_in_col(src);
        while let (Some(f1), Some(f2)) = (e1, e2) {
            let r1 = self.row(f1);
            let r2 = self.row(f2);
            if r1 > r2 {
                self.insert(r2, dst);
                e2 = self.next_in_col(f2);
            } else {
                let next1 = self.next_in_col(f1);
                if r1 == r2 {
                    self.delete(f1);
                    e2 = self.next_in_col(f2);
                }
                e1 = next1;
            }
        }
        while let Some(f2) = e2 {
            let r2 = self.row(f2);
            self.insert(r2, dst);
            e2 = self.next_in_col(f2);
        }
    }

    /// Writes the matrix in its binary serialized form.
    ///
    /// The format consists of 32-bit little-endian integers: the dimensions,
    /// then for each nonempty row a marker `-(row + 1)` followed by the
    /// one-based columns of its entries, and a final zero.
    ///
    /// # Errors
    ///
    /// Fails if the writer fails.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        intio::write_int(w, self.nrows as i32)?;
        intio::write_int(w, self.ncols as i32)?;
        for row in 0..self.nrows {
            if self.first_in_row(row).is_none() {
                continue;
            }
            intio::write_int(w, -(row as i32 + 1))?;
            for e in self.iter_row(row) {
                intio::write_int(w, self.col(e) as i32 + 1)?;
            }
        }
        intio::write_int(w, 0)
    }

    /// Reads a matrix written by [`write`](SparseMatrix::write).
    ///
    /// # Errors
    ///
    /// Fails if the reader fails, the data ends before the terminating zero,
    /// or a dimension or index is out of range.
    pub fn read<R: Read>(r: &mut R) -> Result<SparseMatrix, ReadError> {
        let nrows = intio::read_int(r)?;
        if nrows <= 0 {
            return Err(ReadError::Invalid("number of rows is not positive"));
        }
        let ncols = intio::read_int(r)?;
        if ncols <= 0 {
            return Err(ReadError::Invalid("number of columns is not positive"));
        }
        let mut m = SparseMatrix::new(nrows as usize, ncols as usize);
        let mut row = None;
        loop {
            let v = i64::from(intio::read_int(r)?);
            if v == 0 {
                return Ok(m);
            }
            if v < 0 {
                let rr = (-v - 1) as usize;
                if rr >= m.num_rows() {
                    return Err(ReadError::Invalid("row marker out of range"));
                }
                row = Some(rr);
            } else {
                let cc = (v - 1) as usize;
                if cc >= m.num_cols() {
                    return Err(ReadError::Invalid("column index out of range"));
                }
                match row {
                    Some(rr) => {
                        m.insert(rr, cc);
                    }
                    None => {
                        return Err(ReadError::Invalid(
                            "column index appears before any row marker",
                        ))
                    }
                }
            }
        }
    }

    /// Writes the matrix in alist format.
    ///
    /// The alist format is a text format for sparse binary matrices
    /// [introduced by
    /// MacKay](http://www.inference.org.uk/mackay/codes/alist.html).
    ///
    /// # Errors
    ///
    /// If a call to `write!()` returns an error, this function returns
    /// such an error.
    pub fn write_alist<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        let col_weights: Vec<usize> = (0..self.ncols).map(|c| self.col_weight(c)).collect();
        let row_weights: Vec<usize> = (0..self.nrows).map(|r| self.row_weight(r)).collect();
        writeln!(w, "{} {}", self.ncols, self.nrows)?;
        for weights in [&col_weights, &row_weights] {
            write!(w, "{} ", weights.iter().max().copied().unwrap_or(0))?;
        }
        writeln!(w)?;
        for weights in [&col_weights, &row_weights] {
            for weight in weights.iter() {
                write!(w, "{} ", weight)?;
            }
            writeln!(w)?;
        }
        for col in 0..self.ncols {
            for e in self.iter_col(col) {
                write!(w, "{} ", self.row(e) + 1)?;
            }
            writeln!(w)?;
        }
        for row in 0..self.nrows {
            for e in self.iter_row(row) {
                write!(w, "{} ", self.col(e) + 1)?;
            }
            writeln!(w)?;
        }
        Ok(())
    }

    /// Returns a [`String`] with the alist representation of the matrix.
    pub fn alist(&self) -> String {
        let mut s = String::new();
        self.write_alist(&mut s).unwrap();
        s
    }

    /// Constructs a matrix from its alist representation.
    ///
    /// The parser is somewhat lenient: zero indices used as padding in
    /// regular alist files are skipped, and the row lists, which duplicate
    /// the information in the column lists, are not checked.
    ///
    /// # Errors
    ///
    /// Fails if the header or the column lists are missing or malformed.
    pub fn from_alist(alist: &str) -> Result<SparseMatrix, ReadError> {
        let mut lines = alist.lines();
        let mut sizes = lines
            .next()
            .ok_or(ReadError::Invalid("alist data is empty"))?
            .split_whitespace();
        let ncols = sizes
            .next()
            .ok_or(ReadError::Invalid("missing number of columns"))?
            .parse::<usize>()
            .map_err(|_| ReadError::Invalid("number of columns is not a number"))?;
        let nrows = sizes
            .next()
            .ok_or(ReadError::Invalid("missing number of rows"))?
            .parse::<usize>()
            .map_err(|_| ReadError::Invalid("number of rows is not a number"))?;
        if nrows == 0 || ncols == 0 {
            return Err(ReadError::Invalid("matrix dimensions must be positive"));
        }
        // Skip the maximum and per-line weights; the column lists follow.
        for _ in 0..3 {
            lines
                .next()
                .ok_or(ReadError::Invalid("alist data ends before column lists"))?;
        }
        let mut m = SparseMatrix::new(nrows, ncols);
        for col in 0..ncols {
            let line = lines
                .next()
                .ok_or(ReadError::Invalid("alist data ends before column lists"))?;
            for value in line.split_whitespace() {
                let row = value
                    .parse::<usize>()
                    .map_err(|_| ReadError::Invalid("row index is not a number"))?;
                if row == 0 {
                    continue;
                }
                if row > nrows {
                    return Err(ReadError::Invalid("row index out of range"));
                }
                m.insert(row - 1, col);
            }
        }
        Ok(m)
    }

    /// Computes a sparse LU decomposition of a subset of the matrix.
    ///
    /// The decomposition finds `k` rows and `k` columns of the matrix such
    /// that the submatrix they select is nonsingular, together with lower and
    /// upper triangular factors of that submatrix. This is the basis for
    /// encoding with a sparse representation of the generator matrix: for a
    /// parity check matrix, the decomposition with `k = num_rows()`
    /// identifies the check bit positions, and the triangular factors let the
    /// check bits be computed by substitution.
    ///
    /// The rows and columns selected are the first `k` elements of
    /// [`row_order`](LuDecomposition::row_order) and
    /// [`col_order`](LuDecomposition::col_order) of the returned
    /// decomposition, in pivot order. If fewer than `k` pivots can be found
    /// because the matrix does not have rank `k`, the missing steps are
    /// counted in [`deficiency`](LuDecomposition::deficiency) and the factors
    /// solve correspondingly fewer equations.
    ///
    /// `strategy` selects how pivots are chosen, trading search time against
    /// the sparsity of the factors. If `abandon_number` is nonzero, that many
    /// columns are given up on after pivot step `abandon_when`, choosing the
    /// columns of the working matrix with the most entries. This can speed up
    /// the decomposition of large low density matrices considerably, at the
    /// price of a possible deficiency.
    ///
    /// # Panics
    ///
    /// Panics if `k` is zero or exceeds the number of columns, or if
    /// `abandon_number` exceeds `num_cols() - k`.
    pub fn decomp(
        &self,
        k: usize,
        strategy: PivotStrategy,
        abandon_number: usize,
        abandon_when: usize,
    ) -> LuDecomposition {
        assert!(k > 0, "number of pivot steps must be positive");
        assert!(k <= self.ncols, "cannot take more pivot steps than columns");
        assert!(
            abandon_number <= self.ncols - k,
            "cannot abandon so many columns that fewer than k remain"
        );
        let m = self.nrows;
        let n = self.ncols;
        let mut b = self.clone();
        let mut l = SparseMatrix::new(m, k);
        let mut u = SparseMatrix::new(k, n);

        let mut rows: Vec<usize> = (0..m).collect();
        let mut cols: Vec<usize> = (0..n).collect();
        // Inverse permutations, kept in sync with rows and cols. A row with
        // rinv[row] >= i has not been used as a pivot before step i.
        let mut rinv: Vec<usize> = (0..m).collect();
        let mut cinv: Vec<usize> = (0..n).collect();

        // Row weights of the working matrix, maintained for the Markowitz
        // criterion only.
        let mut rcnt: Vec<usize> = match strategy {
            PivotStrategy::MinProd => (0..m).map(|r| b.row_weight(r)).collect(),
            _ => Vec::new(),
        };

        let mut deficiency = 0;

        for i in 0..k {
            // Choose a pivot entry among the columns not yet processed,
            // considering only entries in rows that have not held a pivot.
            let pivot: Option<(EntryId, usize)> = match strategy {
                PivotStrategy::First => {
                    let mut found = None;
                    'scan: for j in i..n {
                        let mut e = b.first_in_col(cols[j]);
                        while let Some(f) = e {
                            if rinv[b.row(f)] >= i {
                                found = Some((f, j));
                                break 'scan;
                            }
                            e = b.next_in_col(f);
                        }
                    }
                    found
                }
                PivotStrategy::MinCol => {
                    let mut found = None;
                    let mut cc = 0;
                    for j in i..n {
                        let cc2 = b.col_weight(cols[j]);
                        if found.is_none() || cc2 < cc {
                            let mut e = b.first_in_col(cols[j]);
                            while let Some(f) = e {
                                if rinv[b.row(f)] >= i {
                                    found = Some((f, j));
                                    cc = cc2;
                                    break;
                                }
                                e = b.next_in_col(f);
                            }
                        }
                    }
                    found
                }
                PivotStrategy::MinProd => {
                    let mut found = None;
                    let mut pr = 0;
                    for j in i..n {
                        let cc2 = b.col_weight(cols[j]);
                        let mut e = b.first_in_col(cols[j]);
                        while let Some(f) = e {
                            if rinv[b.row(f)] >= i {
                                let cr2 = rcnt[b.row(f)];
                                if found.is_none() || cc2 == 1 || (cc2 - 1) * (cr2 - 1) < pr {
                                    found = Some((f, j));
                                    pr = if cc2 == 1 { 0 } else { (cc2 - 1) * (cr2 - 1) };
                                }
                            }
                            e = b.next_in_col(f);
                        }
                    }
                    found
                }
            };

            // Move the pivot's column and row to position i of the orderings.
            match pivot {
                Some((e, j)) => {
                    let pcol = b.col(e);
                    let prow = b.row(e);
                    assert_eq!(cinv[pcol], j, "column ordering is corrupted");
                    cols.swap(i, j);
                    cinv[cols[j]] = j;
                    cinv[cols[i]] = i;
                    let jr = rinv[prow];
                    assert!(jr >= i, "pivot row was already used");
                    rows.swap(i, jr);
                    rinv[rows[jr]] = jr;
                    rinv[rows[i]] = i;
                }
                None => deficiency += 1,
            }

            // Eliminate the column at position i: rows still to be reduced
            // get the pivot row added and a coefficient in L, rows already
            // reduced move their entry to U.
            let mut f = b.first_in_col(cols[i]);
            while let Some(fe) = f {
                // add_row below deletes fe, so its successor is read first.
                let fnext = b.next_in_col(fe);
                let frow = b.row(fe);
                if rinv[frow] > i {
                    b.add_row(frow, rows[i]);
                    if strategy == PivotStrategy::MinProd {
                        rcnt[frow] = b.row_weight(frow);
                    }
                    l.insert(frow, i);
                } else if rinv[frow] < i {
                    u.insert(rinv[frow], cols[i]);
                } else {
                    l.insert(frow, i);
                    u.insert(i, cols[i]);
                }
                f = fnext;
            }

            while let Some(fe) = b.first_in_col(cols[i]) {
                b.delete(fe);
            }

            if abandon_number > 0 && i == abandon_when {
                // Give up on the abandon_number fullest columns of the
                // working matrix.
                let mut acnt = vec![0usize; m + 1];
                for j in 0..n {
                    acnt[b.col_weight(j)] += 1;
                }
                let mut cc = abandon_number;
                let mut weight = m;
                while acnt[weight] < cc {
                    cc -= acnt[weight];
                    assert!(weight > 0, "fewer entries left than abandon_number");
                    weight -= 1;
                }
                let mut emptied = 0;
                for j in 0..n {
                    let w = b.col_weight(j);
                    if w > weight || (w == weight && cc > 0) {
                        if w == weight {
                            cc -= 1;
                        }
                        while let Some(fe) = b.first_in_col(j) {
                            b.delete(fe);
                        }
                        emptied += 1;
                    }
                }
                assert_eq!(emptied, abandon_number, "abandoned column count is off");
                if strategy == PivotStrategy::MinProd {
                    for (r, cnt) in rcnt.iter_mut().enumerate() {
                        *cnt = b.row_weight(r);
                    }
                }
            }
        }

        // Rows that never held a pivot play no part in the k equations.
        for pos in k..m {
            while let Some(fe) = l.first_in_row(rows[pos]) {
                l.delete(fe);
            }
        }

        LuDecomposition {
            l,
            u,
            row_order: rows,
            col_order: cols,
            deficiency,
        }
    }

    /// Solves `L y = x` by forward substitution, where `self` is the lower
    /// triangular factor of a decomposition and `row_order` its row ordering.
    ///
    /// `x` has one bit per row of the matrix and `y` one bit per column; `y`
    /// is entirely overwritten. Only the first `num_cols()` elements of
    /// `row_order` are used.
    ///
    /// # Errors
    ///
    /// Returns [`Inconsistent`] if a row with no diagonal entry yields an
    /// equation that the earlier solution bits do not satisfy, which happens
    /// when the decomposition was deficient and `x` is not in the span of
    /// the factors.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not lower triangular with respect to
    /// `row_order`.
    pub fn forward_sub(
        &self,
        row_order: &[usize],
        x: &[u8],
        y: &mut [u8],
    ) -> Result<(), Inconsistent> {
        let k = self.ncols;
        assert!(row_order.len() >= k, "row ordering is too short");
        assert_eq!(x.len(), self.nrows, "input length does not match rows");
        assert_eq!(y.len(), k, "output length does not match columns");
        for (i, &ii) in row_order.iter().enumerate().take(k) {
            if let Some(e) = self.last_in_row(ii) {
                assert!(
                    self.col(e) <= i,
                    "matrix is not lower triangular under the row ordering"
                );
            }
        }
        for (i, &ii) in row_order.iter().enumerate().take(k) {
            let mut diag = false;
            let mut b = 0;
            for e in self.iter_row(ii) {
                let j = self.col(e);
                if j == i {
                    diag = true;
                } else {
                    b ^= y[j];
                }
            }
            if !diag && b != x[ii] {
                return Err(Inconsistent);
            }
            y[i] = b ^ x[ii];
        }
        Ok(())
    }

    /// Solves `U z = y` by backward substitution, where `self` is the upper
    /// triangular factor of a decomposition and `col_order` its column
    /// ordering.
    ///
    /// `y` has one bit per row of the matrix and `z` one bit per column.
    /// Only the elements of `z` at positions `col_order[..num_rows()]` are
    /// written; the rest are left as they are. This is relied upon when
    /// encoding, where the message bits are placed in `z` beforehand and the
    /// substitution fills in the check bits around them. Only the first
    /// `num_rows()` elements of `col_order` are used.
    ///
    /// # Errors
    ///
    /// Returns [`Inconsistent`] if a row with no diagonal entry yields an
    /// equation that the later solution bits do not satisfy.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not upper triangular with respect to
    /// `col_order`.
    pub fn backward_sub(
        &self,
        col_order: &[usize],
        y: &[u8],
        z: &mut [u8],
    ) -> Result<(), Inconsistent> {
        let k = self.nrows;
        assert!(col_order.len() >= k, "column ordering is too short");
        assert_eq!(y.len(), k, "input length does not match rows");
        assert_eq!(z.len(), self.ncols, "output length does not match columns");
        for (i, &ii) in col_order.iter().enumerate().take(k) {
            if let Some(e) = self.last_in_col(ii) {
                assert!(
                    self.row(e) <= i,
                    "matrix is not upper triangular under the column ordering"
                );
            }
        }
        for i in (0..k).rev() {
            let ii = col_order[i];
            let mut diag = false;
            let mut b = 0;
            for e in self.iter_row(i) {
                let j = self.col(e);
                if j == ii {
                    diag = true;
                } else {
                    b ^= z[j];
                }
            }
            if !diag && b != y[i] {
                return Err(Inconsistent);
            }
            z[ii] = b ^ y[i];
        }
        Ok(())
    }
}

impl PartialEq for SparseMatrix {
    fn eq(&self, other: &SparseMatrix) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return false;
        }
        for row in 0..self.nrows {
            let mut e1 = self.first_in_row(row);
            let mut e2 = other.first_in_row(row);
            while let (Some(f1), Some(f2)) = (e1, e2) {
                if self.col(f1) != other.col(f2) {
                    return false;
                }
                e1 = self.next_in_row(f1);
                e2 = other.next_in_row(f2);
            }
            if e1.is_some() || e2.is_some() {
                return false;
            }
        }
        true
    }
}

impl Eq for SparseMatrix {}

impl fmt::Display for SparseMatrix {
    /// Formats the matrix with one line per row, listing the columns of the
    /// entries in the row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.nrows {
            write!(f, "{}:", row)?;
            for e in self.iter_row(row) {
                write!(f, " {}", self.col(e))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Pivoting strategy for [`SparseMatrix::decomp`].
///
/// The strategies trade the time spent searching for a pivot against the
/// sparsity of the triangular factors, which determines how much fill-in the
/// elimination produces and hence how fast encoding by substitution is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum PivotStrategy {
    /// Takes the first usable entry found. Fastest search, densest factors.
    First,
    /// Prefers entries in the column of lowest weight.
    MinCol,
    /// Minimizes the product of (row weight - 1) and (column weight - 1),
    /// the Markowitz criterion. Slowest search, sparsest factors.
    #[default]
    MinProd,
}

impl std::str::FromStr for PivotStrategy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "first" => PivotStrategy::First,
            "mincol" => PivotStrategy::MinCol,
            "minprod" => PivotStrategy::MinProd,
            _ => return Err("invalid pivoting strategy (first, mincol or minprod)"),
        })
    }
}

impl fmt::Display for PivotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PivotStrategy::First => "first",
            PivotStrategy::MinCol => "mincol",
            PivotStrategy::MinProd => "minprod",
        };
        write!(f, "{}", s)
    }
}

/// Sparse LU decomposition produced by [`SparseMatrix::decomp`].
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    /// Lower triangular factor, with the rows of the decomposed matrix and
    /// `k` columns. Row `row_order[i]` has entries only in columns up to
    /// `i`, and rows that held no pivot are empty.
    pub l: SparseMatrix,
    /// Upper triangular factor, with `k` rows and the columns of the
    /// decomposed matrix. Column `col_order[i]` has entries only in rows up
    /// to `i`.
    pub u: SparseMatrix,
    /// Permutation of the row indices; the first `k` are the pivot rows in
    /// pivot order.
    pub row_order: Vec<usize>,
    /// Permutation of the column indices; the first `k` are the pivot
    /// columns in pivot order.
    pub col_order: Vec<usize>,
    /// Number of pivot steps for which no usable entry was found.
    pub deficiency: usize,
}
