//! encode CLI subcommand.
//!
//! This command encodes a file of message blocks into a file of codewords,
//! using a parity check file and a generator matrix file made with make-gen.
//! Each message block holds `N - M` bits and each codeword holds `N` bits,
//! where the parity check matrix is `M x N`. A count of the blocks encoded
//! is printed to stderr at the end.
//!
//! # Examples
//!
//! ```shell
//! $ ldpc-codes encode code.pchk code.gen messages.src codewords.enc
//! ```

use crate::blockio;
use crate::check;
use crate::cli::Run;
use crate::codefiles;
use crate::generator::Generator;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// encode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Encodes message blocks into codewords")]
pub struct Args {
    /// Input parity check file
    pub pchk_file: PathBuf,
    /// Input generator matrix file
    pub gen_file: PathBuf,
    /// Input file of message blocks
    pub source_file: PathBuf,
    /// Output file of codewords
    pub encoded_file: PathBuf,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let mut f = BufReader::new(File::open(&self.pchk_file)?);
        let h = codefiles::read_pchk(&mut f)?;
        let m = h.num_rows();
        let n = h.num_cols();
        if n <= m {
            return Err(format!(
                "can't encode if the number of bits ({}) is not greater than \
                 the number of checks ({})",
                n, m
            )
            .into());
        }
        let mut f = BufReader::new(File::open(&self.gen_file)?);
        let gen = Generator::read(&mut f, Some(&h))?;

        let mut srcf = BufReader::new(File::open(&self.source_file)?);
        let mut outf = BufWriter::new(File::create(&self.encoded_file)?);
        let mut parity = vec![0; m];
        let mut block_no = 0;
        while let Some(sblk) = blockio::read_block(&mut srcf, n - m)? {
            let cblk = gen.encode(&h, &sblk);
            check::check(&h, &cblk, &mut parity);
            if let Some(i) = parity.iter().position(|&p| p != 0) {
                return Err(format!(
                    "output block {} is not a codeword (fails check {})",
                    block_no, i
                )
                .into());
            }
            blockio::write_block(&mut outf, &cblk)?;
            block_no += 1;
        }
        outf.flush()?;

        eprintln!(
            "Encoded {} blocks, source block size {}, encoded block size {}",
            block_no,
            n - m,
            n
        );
        Ok(())
    }
}
