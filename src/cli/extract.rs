//! extract CLI subcommand.
//!
//! This command recovers message blocks from a file of codewords, typically
//! the output of decode. Encoding is systematic but may place the message
//! bits anywhere in the codeword, so the column ordering recorded in the
//! generator matrix file is needed to find them again.
//!
//! # Examples
//!
//! ```shell
//! $ ldpc-codes extract code.gen decoded.out messages.ext
//! ```

use crate::blockio;
use crate::cli::Run;
use crate::generator::Generator;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// extract CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Extracts message blocks from codewords")]
pub struct Args {
    /// Input generator matrix file
    pub gen_file: PathBuf,
    /// Input file of codewords
    pub coded_file: PathBuf,
    /// Output file of message blocks
    pub extracted_file: PathBuf,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let mut f = BufReader::new(File::open(&self.gen_file)?);
        let (m, n, cols) = Generator::read_column_order(&mut f, None)?;

        let mut codef = BufReader::new(File::open(&self.coded_file)?);
        let mut outf = BufWriter::new(File::create(&self.extracted_file)?);
        while let Some(cblk) = blockio::read_block(&mut codef, n)? {
            let sblk: Vec<u8> = (m..n).map(|i| cblk[cols[i]]).collect();
            blockio::write_block(&mut outf, &sblk)?;
        }
        outf.flush()?;
        Ok(())
    }
}
