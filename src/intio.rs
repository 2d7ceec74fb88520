//! Reading and writing of 32-bit integers, low order byte first.
//!
//! All the binary file formats in this crate store their integers this way,
//! regardless of the machine they were written on.

use std::io::{self, Read, Write};

pub(crate) fn write_int<W: Write>(w: &mut W, v: i32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub(crate) fn read_int<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut buf = Vec::new();
        for v in [334, -40000, i32::MAX, i32::MIN, 0] {
            write_int(&mut buf, v).unwrap();
        }
        assert_eq!(buf.len(), 20);
        let mut r = buf.as_slice();
        for v in [334, -40000, i32::MAX, i32::MIN, 0] {
            assert_eq!(read_int(&mut r).unwrap(), v);
        }
        assert_eq!(
            read_int(&mut r).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }
}
