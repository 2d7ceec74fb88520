//! Reading and writing blocks of bits as text.
//!
//! Message and codeword files hold bits as the characters `0` and `1`,
//! optionally broken up by whitespace. Blocks follow one another with no
//! marker in between; the block length comes from the parity check matrix
//! in use.

use std::io::{self, Read, Write};
use thiserror::Error;

/// Errors produced when reading a block of bits.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The underlying reader failed.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),
    /// A character other than `0`, `1` or whitespace was found.
    #[error("bad character in binary file (not '0' or '1')")]
    BadCharacter,
}

/// Reads the next block of `length` bits.
///
/// Space, tab, carriage return and newline characters between bits are
/// skipped. Returns `None` at the end of the input; if the input ends in the
/// middle of a block, the partial block is dropped with a warning on
/// standard error.
pub fn read_block<R: Read>(f: &mut R, length: usize) -> Result<Option<Vec<u8>>, ReadError> {
    let mut block = Vec::with_capacity(length);
    let mut byte = [0u8; 1];
    while block.len() < length {
        if f.read(&mut byte)? == 0 {
            if !block.is_empty() {
                eprintln!(
                    "Warning: Short block ({} long) at end of file ignored",
                    block.len()
                );
            }
            return Ok(None);
        }
        match byte[0] {
            b' ' | b'\t' | b'\n' | b'\r' => (),
            b'0' => block.push(0),
            b'1' => block.push(1),
            _ => return Err(ReadError::BadCharacter),
        }
    }
    Ok(Some(block))
}

/// Writes a block of bits followed by a newline.
///
/// # Panics
///
/// Panics if the block contains a value other than zero or one.
pub fn write_block<W: Write>(f: &mut W, block: &[u8]) -> io::Result<()> {
    for &bit in block {
        assert!(bit <= 1, "block bits must be zero or one");
        f.write_all(&[b'0' + bit])?;
    }
    f.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_blocks_across_whitespace() {
        let mut f = Cursor::new(&b"101 0\r\n\t11"[..]);
        assert_eq!(read_block(&mut f, 3).unwrap(), Some(vec![1, 0, 1]));
        assert_eq!(read_block(&mut f, 3).unwrap(), Some(vec![0, 1, 1]));
        assert_eq!(read_block(&mut f, 3).unwrap(), None);
    }

    #[test]
    fn drops_a_short_final_block() {
        let mut f = Cursor::new(&b"10110"[..]);
        assert_eq!(read_block(&mut f, 3).unwrap(), Some(vec![1, 0, 1]));
        assert_eq!(read_block(&mut f, 3).unwrap(), None);
    }

    #[test]
    fn rejects_other_characters() {
        let mut f = Cursor::new(&b"10x"[..]);
        assert!(matches!(
            read_block(&mut f, 3),
            Err(ReadError::BadCharacter)
        ));
    }

    #[test]
    fn writes_one_line_per_block() {
        let mut out = Vec::new();
        write_block(&mut out, &[1, 0, 0, 1]).unwrap();
        write_block(&mut out, &[0, 1]).unwrap();
        assert_eq!(out, b"1001\n01\n");
    }

    #[test]
    fn roundtrip() {
        let mut out = Vec::new();
        write_block(&mut out, &[0, 1, 1, 0, 1]).unwrap();
        let mut f = Cursor::new(&out[..]);
        assert_eq!(read_block(&mut f, 5).unwrap(), Some(vec![0, 1, 1, 0, 1]));
        assert_eq!(read_block(&mut f, 5).unwrap(), None);
    }
}
