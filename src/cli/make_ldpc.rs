//! make-ldpc CLI subcommand.
//!
//! This command constructs a random LDPC parity check matrix and writes it
//! to a parity check file. The number of checks per column is given either
//! as a single weight or as a distribution specification such as
//! `0.3x2/0.7x3`; see [`distrib`](crate::distrib) for the format and
//! [`construction`](crate::construction) for the construction methods.
//!
//! # Examples
//!
//! A 500 x 1000 matrix with three checks per bit, rows balanced too, with
//! cycles of length four eliminated, is constructed with
//! ```shell
//! $ ldpc-codes make-ldpc code.pchk 500 1000 1 evenboth 3 --no4cycle
//! ```

use crate::cli::Run;
use crate::codefiles;
use crate::construction::{Method, make_ldpc};
use crate::distrib::Distribution;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// make-ldpc CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Makes a random LDPC parity check matrix")]
pub struct Args {
    /// Output parity check file
    pub pchk_file: PathBuf,
    /// Number of parity checks
    pub num_checks: usize,
    /// Number of code bits
    pub num_bits: usize,
    /// Random seed for the construction
    pub seed: u64,
    /// Construction method (evencol or evenboth)
    pub method: Method,
    /// Checks per column, or a distribution like "0.3x2/0.7x3"
    pub distribution: Distribution,
    /// Eliminate cycles of length four
    #[arg(long)]
    pub no4cycle: bool,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        if self.num_checks == 0 || self.num_bits == 0 {
            return Err("the numbers of checks and bits must be positive".into());
        }
        let h = make_ldpc(
            self.num_checks,
            self.num_bits,
            self.seed,
            self.method,
            &self.distribution,
            self.no4cycle,
        )?;
        let mut f = BufWriter::new(File::create(&self.pchk_file)?);
        codefiles::write_pchk(&mut f, &h)?;
        f.flush()?;
        Ok(())
    }
}
