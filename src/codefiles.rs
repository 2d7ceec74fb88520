//! Parity check files.
//!
//! A parity check file holds a signature word followed by a
//! [`SparseMatrix`] in its binary serialized form. The signature guards
//! against passing some other binary file where a parity check matrix is
//! expected. Generator matrix files carry a signature of their own and are
//! handled in [`generator`](crate::generator).

use crate::intio;
use crate::sparse::{self, SparseMatrix};
use std::io::{self, Read, Write};
use thiserror::Error;

/// Signature word at the start of a parity check file.
const PCHK_MAGIC: i32 = ((b'P' as i32) << 8) + 0x80;

/// Errors produced when reading a parity check file.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader failed or the data ended prematurely.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// The file does not start with the parity check file signature.
    #[error("file does not contain a parity check matrix")]
    NotParityCheck,
    /// The matrix data after the signature is invalid.
    #[error(transparent)]
    Matrix(#[from] sparse::ReadError),
}

/// Writes a parity check matrix preceded by the file signature.
///
/// # Errors
///
/// Fails if the writer fails.
pub fn write_pchk<W: Write>(w: &mut W, h: &SparseMatrix) -> io::Result<()> {
    intio::write_int(w, PCHK_MAGIC)?;
    h.write(w)
}

/// Reads a parity check matrix written by [`write_pchk`].
pub fn read_pchk<R: Read>(r: &mut R) -> Result<SparseMatrix, ReadError> {
    if intio::read_int(r)? != PCHK_MAGIC {
        return Err(ReadError::NotParityCheck);
    }
    Ok(SparseMatrix::read(r)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut h = SparseMatrix::new(4, 9);
        for &(i, j) in &[(0, 0), (0, 4), (1, 2), (2, 7), (3, 3), (3, 8)] {
            h.insert(i, j);
        }
        let mut data = Vec::new();
        write_pchk(&mut data, &h).unwrap();
        let back = read_pchk(&mut &data[..]).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn rejects_other_files() {
        let mut data = Vec::new();
        intio::write_int(&mut data, 12345).unwrap();
        assert!(matches!(
            read_pchk(&mut &data[..]),
            Err(ReadError::NotParityCheck)
        ));
        assert!(matches!(
            read_pchk(&mut &b"xy"[..]),
            Err(ReadError::Io(_))
        ));
    }
}
