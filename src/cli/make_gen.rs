//! make-gen CLI subcommand.
//!
//! This command derives a generator matrix from a parity check matrix and
//! writes it to a generator matrix file. The representation to derive is
//! given as a subcommand; see [`generator`](crate::generator) for what the
//! representations are and when each is preferable.
//!
//! # Examples
//!
//! A sparse generator matrix with the default minprod pivoting strategy is
//! made with
//! ```shell
//! $ ldpc-codes make-gen code.pchk code.gen sparse
//! ```
//! A dense generator matrix that reuses the column ordering of an existing
//! generator matrix file is made with
//! ```shell
//! $ ldpc-codes make-gen code.pchk code2.gen dense --other-gen code.gen
//! ```

use crate::cli::Run;
use crate::codefiles;
use crate::generator::Generator;
use crate::sparse::{PivotStrategy, SparseMatrix};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// make-gen CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Makes a generator matrix from a parity check matrix")]
pub struct Args {
    /// Input parity check file
    pub pchk_file: PathBuf,
    /// Output generator matrix file
    pub gen_file: PathBuf,
    /// Representation of the generator matrix
    #[command(subcommand)]
    pub method: MethodArgs,
}

/// Generator matrix representation CLI arguments.
#[derive(Debug, Subcommand)]
pub enum MethodArgs {
    /// Sparse representation by LU decomposition
    Sparse {
        /// Pivoting strategy (first, mincol or minprod)
        #[arg(default_value_t)]
        strategy: PivotStrategy,
        /// Number of low weight columns to abandon each time
        #[arg(long, requires = "abandon_when", default_value_t = 0)]
        abandon_number: usize,
        /// Number of columns processed between abandonments
        #[arg(long, requires = "abandon_number", default_value_t = 0)]
        abandon_when: usize,
    },
    /// Dense representation
    Dense {
        /// Generator matrix file to take the column ordering from
        #[arg(long)]
        other_gen: Option<PathBuf>,
    },
    /// Mixed dense and sparse representation
    Mixed {
        /// Generator matrix file to take the column ordering from
        #[arg(long)]
        other_gen: Option<PathBuf>,
    },
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let mut f = BufReader::new(File::open(&self.pchk_file)?);
        let h = codefiles::read_pchk(&mut f)?;
        if h.num_cols() <= h.num_rows() {
            return Err(format!(
                "can't encode if the number of bits ({}) is not greater than the number of checks ({})",
                h.num_cols(),
                h.num_rows()
            )
            .into());
        }
        let gen = match &self.method {
            MethodArgs::Sparse {
                strategy,
                abandon_number,
                abandon_when,
            } => Generator::sparse(&h, *strategy, *abandon_number, *abandon_when)?,
            MethodArgs::Dense { other_gen } => {
                let columns = read_column_order(other_gen.as_deref(), &h)?;
                Generator::dense(&h, columns.as_deref())?
            }
            MethodArgs::Mixed { other_gen } => {
                let columns = read_column_order(other_gen.as_deref(), &h)?;
                Generator::mixed(&h, columns.as_deref())?
            }
        };
        let mut f = BufWriter::new(File::create(&self.gen_file)?);
        gen.write(&mut f)?;
        f.flush()?;
        Ok(())
    }
}

/// Reads the column ordering of another generator matrix file, if one was
/// given.
fn read_column_order(
    other_gen: Option<&Path>,
    h: &SparseMatrix,
) -> Result<Option<Vec<usize>>, Box<dyn Error>> {
    match other_gen {
        Some(path) => {
            let mut f = BufReader::new(File::open(path)?);
            let (_, _, cols) = Generator::read_column_order(&mut f, Some(h))?;
            Ok(Some(cols))
        }
        None => Ok(None),
    }
}
