//! transmit CLI subcommand.
//!
//! This command simulates the transmission of bits through a noisy channel.
//! The bits come either from a file written by encode, or from a source
//! specification of the form `blocks`x`bits` (for example `100x73`), which
//! stands for that many blocks of zero bits and is useful for simulations
//! with a linear code, where the performance on the zero codeword is the
//! performance on any codeword. A bare integer `n` stands for `n` single-bit
//! blocks.
//!
//! The received file holds one hard bit per transmitted bit for the binary
//! symmetric channel, and one real value per transmitted bit for the noisy
//! channels. Block boundaries are kept as newlines.
//!
//! # Examples
//!
//! ```shell
//! $ ldpc-codes transmit codewords.enc received.dat 1 awgn 0.8
//! $ ldpc-codes transmit 1000x73 received.dat 1 bsc 0.05
//! ```

use crate::channel::{Channel, Sample};
use crate::cli::Run;
use crate::rand::transmission_rng;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// transmit CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Simulates transmission through a noisy channel")]
pub struct Args {
    /// File of bits to transmit, or a zero source such as 100x73
    pub source: String,
    /// Output file of received data
    pub received_file: PathBuf,
    /// Noise seed
    pub seed: u64,
    /// Channel type (bsc, awgn or awln)
    pub channel: String,
    /// Channel parameter
    #[arg(allow_hyphen_values = true)]
    pub parameter: f64,
}

/// Where the bits to transmit come from.
enum Source {
    /// All-zero blocks described on the command line.
    Zeros { block_size: usize, num_bits: usize },
    /// A file of `0` and `1` characters.
    File(PathBuf),
}

/// Interprets the source argument. Anything that does not look like a zero
/// source count is taken as a file name.
fn parse_source(s: &str) -> Source {
    if let Ok(n) = s.parse::<usize>() {
        if n > 0 {
            return Source::Zeros {
                block_size: 1,
                num_bits: n,
            };
        }
    }
    if let Some((blocks, size)) = s.split_once('x') {
        if let (Ok(blocks), Ok(size)) = (blocks.parse::<usize>(), size.parse::<usize>()) {
            if blocks > 0 && size > 0 {
                return Source::Zeros {
                    block_size: size,
                    num_bits: blocks * size,
                };
            }
        }
    }
    Source::File(PathBuf::from(s))
}

fn write_sample<W: Write>(f: &mut W, sample: Sample) -> io::Result<()> {
    match sample {
        Sample::Bit(b) => write!(f, "{}", b),
        Sample::Real(y) => write!(f, " {:+5.2}", y),
    }
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let channel = Channel::new(&self.channel, self.parameter)?;
        let mut rng = transmission_rng(self.seed);
        let mut outf = BufWriter::new(File::create(&self.received_file)?);
        let transmitted = match parse_source(&self.source) {
            Source::Zeros {
                block_size,
                num_bits,
            } => {
                for cnt in 0..=num_bits {
                    if cnt > 0 && cnt % block_size == 0 {
                        writeln!(outf)?;
                    }
                    if cnt == num_bits {
                        break;
                    }
                    write_sample(&mut outf, channel.transmit(0, &mut rng))?;
                }
                num_bits
            }
            Source::File(path) => {
                let data = std::fs::read(&path)?;
                let mut cnt = 0;
                for &c in &data {
                    match c {
                        b'0' | b'1' => {
                            write_sample(&mut outf, channel.transmit(c - b'0', &mut rng))?;
                            cnt += 1;
                        }
                        b' ' | b'\t' | b'\n' | b'\r' => outf.write_all(&[c])?,
                        _ => {
                            return Err(format!(
                                "bad character (code {}) in file being transmitted",
                                c
                            )
                            .into());
                        }
                    }
                }
                cnt
            }
        };
        outf.flush()?;

        eprintln!("Transmitted {} bits", transmitted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_specifications() {
        match parse_source("100x73") {
            Source::Zeros {
                block_size,
                num_bits,
            } => {
                assert_eq!(block_size, 73);
                assert_eq!(num_bits, 7300);
            }
            Source::File(_) => panic!("parsed as a file"),
        }
        match parse_source("5") {
            Source::Zeros {
                block_size,
                num_bits,
            } => {
                assert_eq!(block_size, 1);
                assert_eq!(num_bits, 5);
            }
            Source::File(_) => panic!("parsed as a file"),
        }
        for s in ["codewords.enc", "0", "0x7", "4x0", "x", "3x"] {
            assert!(matches!(parse_source(s), Source::File(_)), "{:?}", s);
        }
    }

    #[test]
    fn sample_formats() {
        let mut out = Vec::new();
        write_sample(&mut out, Sample::Bit(1)).unwrap();
        write_sample(&mut out, Sample::Real(-0.23)).unwrap();
        write_sample(&mut out, Sample::Real(1.5)).unwrap();
        assert_eq!(out, b"1 -0.23 +1.50");
    }
}
