//! # LDPC codes
//!
//! `ldpc_codes` is a collection of Rust utilities for low-density parity
//! check codes: random construction of sparse parity check matrices,
//! derivation of generator matrices, encoding, simulation of transmission
//! over noisy channels, and decoding by probability propagation or by
//! exhaustive enumeration.
//!
//! It can be used as a Rust library or as a CLI tool whose subcommands form
//! a pipeline of construction, encoding, transmission, decoding and
//! verification steps sharing simple file formats. See [`cli`] for
//! documentation about the usage of the CLI tool.

#![warn(missing_docs)]

pub mod blockio;
pub mod channel;
pub mod check;
pub mod cli;
pub mod codefiles;
pub mod construction;
pub mod convert;
pub mod decoder;
pub mod dense;
pub mod distrib;
pub mod encoder;
pub mod generator;
pub mod gf2;
pub mod rand;
pub mod sparse;

mod intio;
