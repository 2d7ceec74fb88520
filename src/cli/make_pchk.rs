//! make-pchk CLI subcommand.
//!
//! This command creates a parity check matrix from an explicit list of the
//! positions of its ones and writes it to a parity check file. It is meant
//! for small experimental codes; matrices of useful sizes are better made
//! with [make-ldpc](super::make_ldpc).
//!
//! # Examples
//!
//! The parity check matrix of a [7, 4] Hamming code can be written to
//! `ham.pchk` with
//! ```shell
//! $ ldpc-codes make-pchk ham.pchk 3 7 \
//!       0:0 0:2 0:4 0:6 1:1 1:2 1:5 1:6 2:3 2:4 2:5 2:6
//! ```

use crate::cli::Run;
use crate::codefiles;
use crate::sparse::SparseMatrix;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// make-pchk CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Makes a parity check matrix from explicit bit positions")]
pub struct Args {
    /// Output parity check file
    pub pchk_file: PathBuf,
    /// Number of parity checks
    pub num_checks: usize,
    /// Number of code bits
    pub num_bits: usize,
    /// Positions of the ones, as row:col pairs
    #[arg(required = true)]
    pub bits: Vec<String>,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        if self.num_checks == 0 || self.num_bits == 0 {
            return Err("the numbers of checks and bits must be positive".into());
        }
        let mut h = SparseMatrix::new(self.num_checks, self.num_bits);
        for spec in &self.bits {
            let (row, col) = parse_position(spec)?;
            if row >= self.num_checks || col >= self.num_bits {
                return Err(format!("bit {}:{} is out of range", row, col).into());
            }
            h.insert(row, col);
        }
        let mut f = BufWriter::new(File::create(&self.pchk_file)?);
        codefiles::write_pchk(&mut f, &h)?;
        f.flush()?;
        Ok(())
    }
}

fn parse_position(s: &str) -> Result<(usize, usize), String> {
    let err = || format!("invalid bit position {:?} (expected row:col)", s);
    let (row, col) = s.split_once(':').ok_or_else(err)?;
    let row = row.parse().map_err(|_| err())?;
    let col = col.parse().map_err(|_| err())?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions() {
        assert_eq!(parse_position("3:15"), Ok((3, 15)));
        assert!(parse_position("3x15").is_err());
        assert!(parse_position("3:").is_err());
        assert!(parse_position("-1:2").is_err());
    }
}
