//! verify CLI subcommand.
//!
//! This command checks a file of blocks, typically encode or decode output,
//! against a parity check file. Every block is multiplied by the parity
//! check matrix to count the checks it fails. When a generator matrix file
//! is also given the message bits of each block are compared with a file of
//! source blocks, or with zeros if no source file is given, and a bit error
//! rate over the message bits is reported.
//!
//! # Examples
//!
//! ```shell
//! $ ldpc-codes verify code.pchk decoded.out
//! $ ldpc-codes verify -t code.pchk decoded.out code.gen messages.src
//! ```

use crate::blockio;
use crate::check;
use crate::cli::Run;
use crate::codefiles;
use crate::generator::Generator;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// verify CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Verifies that blocks are codewords")]
pub struct Args {
    /// Print a table with a line per verified block
    #[arg(short = 't', long)]
    pub table: bool,
    /// Input parity check file
    pub pchk_file: PathBuf,
    /// Input file of blocks to verify
    pub coded_file: PathBuf,
    /// Generator matrix file; enables checking the message bits
    pub gen_file: Option<PathBuf>,
    /// File of source blocks to compare the message bits with; without it
    /// the message bits are compared with zeros
    #[arg(requires = "gen_file")]
    pub source_file: Option<PathBuf>,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let mut f = BufReader::new(File::open(&self.pchk_file)?);
        let h = codefiles::read_pchk(&mut f)?;
        let m = h.num_rows();
        let n = h.num_cols();
        if n <= m {
            return Err(format!(
                "number of bits ({}) should be greater than number of checks ({})",
                n, m
            )
            .into());
        }
        let cols = match &self.gen_file {
            Some(path) => {
                let mut f = BufReader::new(File::open(path)?);
                let (_, _, cols) = Generator::read_column_order(&mut f, Some(&h))?;
                Some(cols)
            }
            None => None,
        };
        let mut codef = BufReader::new(File::open(&self.coded_file)?);
        let mut srcf = match &self.source_file {
            Some(path) => Some(BufReader::new(File::open(path)?)),
            None => None,
        };

        if self.table {
            match &cols {
                Some(_) => println!("  block chkerrs srcerrs"),
                None => println!("  block chkerrs"),
            }
        }

        let mut blocks = 0;
        let mut tot_chkerrs = 0;
        let mut tot_srcerrs = 0;
        let mut tot_botherrs = 0;
        let mut bit_errs = 0;
        let mut parity = vec![0; m];
        let mut seof = false;
        loop {
            let cblk = blockio::read_block(&mut codef, n)?;
            let mut sblk = None;
            if cblk.is_some() && !seof {
                if let Some(srcf) = srcf.as_mut() {
                    sblk = blockio::read_block(srcf, n - m)?;
                    if sblk.is_none() {
                        eprintln!("Warning: Not enough source blocks (only {})", blocks);
                        seof = true;
                    }
                }
            }
            let Some(cblk) = cblk else { break };

            let chkerr = check::check(&h, &cblk, &mut parity);
            let mut srcerr = 0;
            if let Some(cols) = &cols {
                if let Some(sblk) = &sblk {
                    srcerr = (m..n).filter(|&i| cblk[cols[i]] != sblk[i - m]).count();
                } else if srcf.is_none() {
                    srcerr = (m..n).filter(|&i| cblk[cols[i]] != 0).count();
                }
                bit_errs += srcerr;
            }

            if self.table {
                match &cols {
                    Some(_) => println!("{:6} {:7} {:7}", blocks, chkerr, srcerr),
                    None => println!("{:6} {:7}", blocks, chkerr),
                }
            }

            if chkerr > 0 {
                tot_chkerrs += 1;
            }
            if cols.is_some() && (srcf.is_none() || !seof) {
                if srcerr > 0 {
                    tot_srcerrs += 1;
                }
                if srcerr > 0 && chkerr > 0 {
                    tot_botherrs += 1;
                }
            }
            blocks += 1;
        }

        if cols.is_some() {
            eprintln!(
                "Block counts: tot {}, with chk errs {}, with src errs {}, both {}",
                blocks, tot_chkerrs, tot_srcerrs, tot_botherrs
            );
            eprintln!(
                "Bit error rate (on message bits only): {:.3e}",
                bit_errs as f64 / (blocks * (n - m)) as f64
            );
        } else {
            eprintln!("Block counts: tot {}, with chk errs {}", blocks, tot_chkerrs);
        }
        Ok(())
    }
}
