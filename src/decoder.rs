//! LDPC decoders.
//!
//! This module provides two decoders. The [belief propagation
//! decoder](belief_prop::BeliefPropDecoder) passes probabilities along the
//! edges of the parity check matrix and scales to codes of any size. The
//! [exhaustive decoder](exhaustive::ExhaustiveDecoder) enumerates every
//! codeword to decode optimally, which is only feasible for codes with very
//! short messages.
//!
//! Both decoders work on the likelihood ratios of the received symbols, as
//! produced by [`Channel::likelihood_ratio`](crate::channel::Channel), and
//! return a [`DecoderOutput`]. Decoding returns `Ok` if the decoded word
//! satisfies all the parity checks and `Err` otherwise; both variants carry
//! the same output, so a caller that does not mind the occasional non
//! codeword can treat them alike.

pub mod belief_prop;
pub mod exhaustive;

/// LDPC decoder output.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderOutput {
    /// Decoded codeword.
    ///
    /// Contains the hard decision bits of the decoded codeword.
    pub codeword: Vec<u8>,
    /// Bit probabilities.
    ///
    /// Contains the probability that each codeword bit is a one, given the
    /// received data.
    pub bit_probabilities: Vec<f64>,
    /// Parity checks.
    ///
    /// Contains the product of the parity check matrix and the decoded
    /// codeword. All entries are zero exactly when decoding returned `Ok`.
    pub parity: Vec<u8>,
    /// Number of iterations.
    ///
    /// Number of iterations used in decoding. The exhaustive decoder counts
    /// the codewords it has examined instead.
    pub iterations: usize,
}
