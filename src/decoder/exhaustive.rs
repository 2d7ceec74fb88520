//! LDPC exhaustive decoder.
//!
//! This module implements optimal decoding by enumeration of the whole
//! codebook. Every possible message is encoded and the likelihood of the
//! resulting codeword given the received data is computed. The decoder
//! either picks the codeword of greatest likelihood, which minimizes the
//! probability of getting any bit of the block wrong, or thresholds the
//! marginal probability of each bit, which minimizes the expected number of
//! wrong bits but need not produce a codeword.
//!
//! Enumeration visits `2^(N-M)` codewords, so this decoder is only usable
//! for codes with very short messages. Its purpose is to provide a baseline
//! that iterative decoding can be compared against.

use super::DecoderOutput;
use crate::check;
use crate::encoder::Encoder;
use crate::gf2::GF2;
use ndarray::Array1;

/// Optimal decoder that enumerates every codeword.
#[derive(Debug, Clone)]
pub struct ExhaustiveDecoder {
    encoder: Encoder,
}

impl ExhaustiveDecoder {
    /// Creates a new exhaustive decoder.
    ///
    /// The given encoder supplies the parity check matrix and the mapping
    /// from messages to codewords.
    ///
    /// # Panics
    ///
    /// Panics if the message length of the code exceeds 31 bits, for which
    /// enumeration would be absurd.
    pub fn new(encoder: Encoder) -> ExhaustiveDecoder {
        let k = encoder.generator().message_length();
        assert!(
            k <= 31,
            "decoding messages of {} bits by exhaustive enumeration is absurd",
            k
        );
        ExhaustiveDecoder { encoder }
    }

    /// Encoder of the code.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Decodes to the codeword of greatest likelihood.
    ///
    /// Always returns `Ok`, since every candidate is a codeword; the
    /// `Result` only keeps the interface of the other decoders. The
    /// `iterations` of the output count the codewords examined, and the bit
    /// probabilities are the exact marginals over the whole codebook.
    pub fn decode_block(&self, lratio: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        self.decode(lratio, true)
    }

    /// Decodes each bit to its most probable value.
    ///
    /// The decoded word maximizes the expected number of correct bits, but
    /// when the received data is bad enough it is not necessarily a
    /// codeword, in which case an `Err` carries it. Ties decode to a one.
    pub fn decode_bit(&self, lratio: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        self.decode(lratio, false)
    }

    fn decode(&self, lratio: &[f64], block: bool) -> Result<DecoderOutput, DecoderOutput> {
        let h = self.encoder.parity_check();
        let n = h.num_cols();
        assert_eq!(
            lratio.len(),
            n,
            "likelihood ratios do not match the block length"
        );
        let k = self.encoder.generator().message_length();

        // Per bit likelihoods of the received data given a zero or a one.
        let lk0: Vec<f64> = lratio.iter().map(|&r| 1.0 / (1.0 + r)).collect();
        let lk1: Vec<f64> = lk0.iter().map(|&l| 1.0 - l).collect();

        let mut best = Vec::new();
        let mut best_likelihood = 0.0;
        let mut bit_probabilities = vec![0.0; n];
        let mut total = 0.0;
        for d in 0..(1u64 << k) {
            let message = Array1::from_shape_fn(k, |i| GF2::from((d >> i) & 1 != 0));
            let candidate: Vec<u8> = self
                .encoder
                .encode(&message)
                .iter()
                .map(|&b| u8::from(b))
                .collect();
            let mut likelihood = 1.0;
            for (j, &b) in candidate.iter().enumerate() {
                likelihood *= if b != 0 { lk1[j] } else { lk0[j] };
            }
            if d == 0 || likelihood > best_likelihood {
                best_likelihood = likelihood;
                best.clone_from(&candidate);
            }
            for (j, &b) in candidate.iter().enumerate() {
                if b != 0 {
                    bit_probabilities[j] += likelihood;
                }
            }
            total += likelihood;
        }
        for p in &mut bit_probabilities {
            *p /= total;
        }

        let codeword = if block {
            best
        } else {
            bit_probabilities.iter().map(|&p| u8::from(p >= 0.5)).collect()
        };
        let mut parity = vec![0; h.num_rows()];
        let valid = check::check(h, &codeword, &mut parity) == 0;
        let output = DecoderOutput {
            codeword,
            bit_probabilities,
            parity,
            iterations: 1 << k,
        };
        if valid {
            Ok(output)
        } else {
            Err(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::sparse::SparseMatrix;

    fn hamming() -> SparseMatrix {
        // Parity check matrix of the [7, 4] Hamming code; column j holds the
        // binary representation of j + 1.
        let mut h = SparseMatrix::new(3, 7);
        for j in 0..7 {
            for i in 0..3 {
                if (j + 1) & (1 << i) != 0 {
                    h.insert(i, j);
                }
            }
        }
        h
    }

    fn test_decoder() -> ExhaustiveDecoder {
        let h = hamming();
        let gen = Generator::dense(&h, None).unwrap();
        ExhaustiveDecoder::new(Encoder::new(h, gen))
    }

    fn to_lratios(bits: &[u8]) -> Vec<f64> {
        bits.iter().map(|&b| if b == 0 { 0.25 } else { 4.0 }).collect()
    }

    fn encode(decoder: &ExhaustiveDecoder, message: &[u8]) -> Vec<u8> {
        decoder
            .encoder()
            .generator()
            .encode(decoder.encoder().parity_check(), message)
    }

    #[test]
    fn block_decoding_corrects_any_single_error() {
        let decoder = test_decoder();
        let codeword = encode(&decoder, &[1, 0, 1, 1]);
        for j in 0..codeword.len() {
            let mut received = codeword.clone();
            received[j] ^= 1;
            let output = decoder.decode_block(&to_lratios(&received)).unwrap();
            assert_eq!(output.codeword, codeword);
            assert_eq!(output.iterations, 16);
            assert_eq!(output.parity, vec![0; 3]);
        }
    }

    #[test]
    fn block_decoding_always_yields_a_codeword() {
        let decoder = test_decoder();
        let lratio = [0.3, 2.0, 1.7, 0.2, 5.0, 0.9, 1.1];
        let output = decoder.decode_block(&lratio).unwrap();
        assert_eq!(output.parity, vec![0; 3]);
        for &p in &output.bit_probabilities {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn bit_decoding_with_strong_evidence() {
        let decoder = test_decoder();
        let codeword = encode(&decoder, &[0, 1, 1, 0]);
        let lratio: Vec<f64> = codeword
            .iter()
            .map(|&b| if b == 0 { 1e-3 } else { 1e3 })
            .collect();
        let output = decoder.decode_bit(&lratio).unwrap();
        assert_eq!(output.codeword, codeword);
        for (&p, &b) in output.bit_probabilities.iter().zip(&codeword) {
            if b != 0 {
                assert!(p > 0.9, "{}", p);
            } else {
                assert!(p < 0.1, "{}", p);
            }
        }
    }

    #[test]
    fn bit_decoding_ties_toward_one() {
        let decoder = test_decoder();
        // With no channel information every codeword is equally likely, and
        // each bit of the Hamming code is a one in half the codebook. The
        // all ones word that results is itself a codeword.
        let output = decoder.decode_bit(&[1.0; 7]).unwrap();
        assert_eq!(output.codeword, vec![1; 7]);
        assert_eq!(output.bit_probabilities, vec![0.5; 7]);
    }

    #[test]
    #[should_panic(expected = "absurd")]
    fn refuses_long_messages() {
        let mut h = SparseMatrix::new(1, 33);
        h.insert(0, 0);
        let gen = Generator::dense(&h, None).unwrap();
        ExhaustiveDecoder::new(Encoder::new(h, gen));
    }
}
