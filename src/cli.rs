//! `ldpc-codes` CLI application
//!
//! The CLI application is organized in several subcommands that form a
//! pipeline: a parity check matrix is constructed, a generator matrix is
//! derived from it, messages are encoded, transmitted over a simulated
//! channel, decoded, and the results are extracted and verified. The
//! supported subcommands can be seen by running `ldpc-codes`. See the
//! modules below for more information about how to use each subcommand.

use clap::Parser;
use std::error::Error;

pub mod decode;
pub mod encode;
pub mod extract;
pub mod make_gen;
pub mod make_ldpc;
pub mod make_pchk;
pub mod transmit;
pub mod verify;

/// Trait to run a CLI subcommand
pub trait Run {
    /// Run the CLI subcommand
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(author, version, name = "ldpc-codes", about = "LDPC codes")]
pub enum Args {
    /// make-pchk subcommand
    MakePchk(make_pchk::Args),
    /// make-ldpc subcommand
    MakeLdpc(make_ldpc::Args),
    /// make-gen subcommand
    MakeGen(make_gen::Args),
    /// encode subcommand
    Encode(encode::Args),
    /// transmit subcommand
    Transmit(transmit::Args),
    /// decode subcommand
    Decode(decode::Args),
    /// extract subcommand
    Extract(extract::Args),
    /// verify subcommand
    Verify(verify::Args),
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Args::MakePchk(x) => x.run(),
            Args::MakeLdpc(x) => x.run(),
            Args::MakeGen(x) => x.run(),
            Args::Encode(x) => x.run(),
            Args::Transmit(x) => x.run(),
            Args::Decode(x) => x.run(),
            Args::Extract(x) => x.run(),
            Args::Verify(x) => x.run(),
        }
    }
}
