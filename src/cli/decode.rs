//! decode CLI subcommand.
//!
//! This command decodes a file of received data into a file of codewords.
//! The channel the data came through is named on the command line so that
//! the received values can be turned into likelihood ratios, and the
//! decoding method is given as a subcommand: `prprp` for probability
//! propagation with an iteration budget, or `enum-block` and `enum-bit` for
//! optimal decoding of codes with short messages by exhaustive enumeration.
//!
//! With `--table` a line per block with the iterations done, whether the
//! result is a codeword and how many bits changed from the hard decisions
//! is printed to stdout, and with `--bp-file` the final bit probabilities
//! of every block are written to a file. A summary of the decoding is
//! printed to stderr at the end.
//!
//! # Examples
//!
//! ```shell
//! $ ldpc-codes decode code.pchk received.dat decoded.out awgn 0.8 prprp 250
//! $ ldpc-codes decode -t code.pchk received.dat decoded.out bsc 0.05 enum-block code.gen
//! ```

use crate::blockio;
use crate::channel::{Channel, Sample};
use crate::check;
use crate::cli::Run;
use crate::codefiles;
use crate::decoder::belief_prop::BeliefPropDecoder;
use crate::decoder::exhaustive::ExhaustiveDecoder;
use crate::decoder::DecoderOutput;
use crate::encoder::Encoder;
use crate::generator::Generator;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

/// decode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Decodes received data into codewords")]
pub struct Args {
    /// Print a table with a line per decoded block
    #[arg(short = 't', long)]
    pub table: bool,
    /// Output file for the bit probabilities of every block
    #[arg(long)]
    pub bp_file: Option<PathBuf>,
    /// Input parity check file
    pub pchk_file: PathBuf,
    /// Input file of received data
    pub received_file: PathBuf,
    /// Output file of decoded blocks
    pub decoded_file: PathBuf,
    /// Channel type (bsc, awgn or awln)
    pub channel: String,
    /// Channel parameter
    #[arg(allow_hyphen_values = true)]
    pub parameter: f64,
    /// Decoding method
    #[command(subcommand)]
    pub method: MethodArgs,
}

/// Decoding method CLI arguments.
#[derive(Debug, Subcommand)]
pub enum MethodArgs {
    /// Probability propagation decoding
    Prprp {
        /// Iteration limit; a negative limit runs exactly that many
        /// iterations rather than stopping at the first codeword
        #[arg(allow_hyphen_values = true)]
        max_iterations: isize,
    },
    /// Optimal decoding to the most probable codeword
    EnumBlock {
        /// Input generator matrix file
        gen_file: PathBuf,
    },
    /// Optimal decoding of each bit to its most probable value
    EnumBit {
        /// Input generator matrix file
        gen_file: PathBuf,
    },
}

/// Decoder selected on the command line, ready to run on blocks.
enum Decoder {
    BeliefProp(BeliefPropDecoder, isize),
    Exhaustive(ExhaustiveDecoder, bool),
}

impl Decoder {
    fn decode(&mut self, lratio: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        match self {
            Decoder::BeliefProp(decoder, max_iterations) => decoder.decode(lratio, *max_iterations),
            Decoder::Exhaustive(decoder, block) => {
                if *block {
                    decoder.decode_block(lratio)
                } else {
                    decoder.decode_bit(lratio)
                }
            }
        }
    }
}

/// Parses a whole file of received data into channel samples.
fn parse_received(channel: Channel, data: &str) -> Result<Vec<Sample>, &'static str> {
    match channel {
        Channel::Bsc { .. } => data
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '0' => Ok(Sample::Bit(0)),
                '1' => Ok(Sample::Bit(1)),
                _ => Err("file of received data is garbled"),
            })
            .collect(),
        Channel::Awgn { .. } | Channel::Awln { .. } => data
            .split_whitespace()
            .map(|w| {
                w.parse::<f64>()
                    .map(Sample::Real)
                    .map_err(|_| "file of received data is garbled")
            })
            .collect(),
    }
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
        let channel = Channel::new(&self.channel, self.parameter)?;
        let mut decoder = match &self.method {
            MethodArgs::Prprp { max_iterations } => {
                Decoder::BeliefProp(BeliefPropDecoder::new(h), *max_iterations)
            }
            MethodArgs::EnumBlock { gen_file } | MethodArgs::EnumBit { gen_file } => {
                if n - m > 31 {
                    return Err(format!(
                        "decoding messages of {} bits by exhaustive enumeration is absurd",
                        n - m
                    )
                    .into());
                }
                let mut f = BufReader::new(File::open(gen_file)?);
                let gen = Generator::read(&mut f, Some(&h))?;
                let block = matches!(self.method, MethodArgs::EnumBlock { .. });
                Decoder::Exhaustive(ExhaustiveDecoder::new(Encoder::new(h, gen)), block)
            }
        };

        let samples = parse_received(channel, &std::fs::read_to_string(&self.received_file)?)?;
        let mut outf = BufWriter::new(File::create(&self.decoded_file)?);
        let mut bpf = match &self.bp_file {
            Some(path) => Some(BufWriter::new(File::create(path)?)),
            None => None,
        };

        if self.table {
            println!("  block iterations valid  changed");
        }
        let mut blocks = 0;
        let mut tot_iterations = 0.0;
        let mut tot_valid = 0;
        let mut tot_changed = 0.0;
        for chunk in samples.chunks(n) {
            if chunk.len() < n {
                eprintln!(
                    "Warning: Short block ({} long) at end of received file ignored",
                    chunk.len()
                );
                break;
            }
            let lratio: Vec<f64> = chunk.iter().map(|&s| channel.likelihood_ratio(s)).collect();
            let result = decoder.decode(&lratio);
            let valid = result.is_ok();
            let output = result.unwrap_or_else(|output| output);
            let changed = check::changed(&lratio, &output.codeword);
            if self.table {
                println!(
                    "{:7} {:10.6}    {}  {:8.1}",
                    blocks,
                    output.iterations as f64,
                    u8::from(valid),
                    changed
                );
            }
            blockio::write_block(&mut outf, &output.codeword)?;
            if let Some(bpf) = bpf.as_mut() {
                for &p in &output.bit_probabilities {
                    write!(bpf, " {:.5}", p)?;
                }
                writeln!(bpf)?;
            }
            blocks += 1;
            tot_iterations += output.iterations as f64;
            tot_valid += usize::from(valid);
            tot_changed += changed;
        }
        outf.flush()?;
        if let Some(bpf) = bpf.as_mut() {
            bpf.flush()?;
        }

        eprintln!(
            "Decoded {} blocks, {} valid.  Average {:.1} iterations, {:.0}% bit changes",
            blocks,
            tot_valid,
            tot_iterations / blocks as f64,
            100.0 * tot_changed / (n * blocks) as f64
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn received_data() {
        let bsc = Channel::new("bsc", 0.1).unwrap();
        assert_eq!(
            parse_received(bsc, "01 1\n0").unwrap(),
            vec![Sample::Bit(0), Sample::Bit(1), Sample::Bit(1), Sample::Bit(0)]
        );
        assert!(parse_received(bsc, "012").is_err());

        let awgn = Channel::new("awgn", 0.8).unwrap();
        assert_eq!(
            parse_received(awgn, " -0.23 +1.50\n").unwrap(),
            vec![Sample::Real(-0.23), Sample::Real(1.5)]
        );
        assert!(parse_received(awgn, "1.0 x").is_err());
    }
}
