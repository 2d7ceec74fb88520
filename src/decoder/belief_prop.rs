//! LDPC belief propagation decoder.
//!
//! This module implements sum product decoding with a flooding schedule,
//! working directly on probability ratios. The messages live on the entries
//! of the parity check matrix: each entry carries the probability ratio its
//! bit last sent to its check and the likelihood ratio its check last sent
//! to its bit. An iteration sweeps every row and then every column, each
//! once forwards and once backwards, so that the message on an entry is
//! built from all the other entries of its row or column without ever
//! dividing out the entry's own contribution.

use super::DecoderOutput;
use crate::check;
use crate::sparse::SparseMatrix;

/// LDPC belief propagation decoder.
///
/// The decoder owns the parity check matrix, whose entries it uses as
/// scratch space for the messages.
#[derive(Debug, Clone)]
pub struct BeliefPropDecoder {
    h: SparseMatrix,
}

impl BeliefPropDecoder {
    /// Creates a new belief propagation decoder.
    ///
    /// The parameter `h` indicates the parity check matrix.
    pub fn new(h: SparseMatrix) -> BeliefPropDecoder {
        BeliefPropDecoder { h }
    }

    /// Parity check matrix of the code.
    pub fn parity_check(&self) -> &SparseMatrix {
        &self.h
    }

    /// Decodes from the likelihood ratios of the received data.
    ///
    /// `lratio` gives for each bit the probability of receiving what was
    /// received if the bit were a one, over the same probability if it were
    /// a zero. The tentative decoding is checked before the first iteration,
    /// so a received word whose hard decisions already satisfy all the
    /// checks decodes in zero iterations.
    ///
    /// A positive `max_iterations` bounds the number of iterations, stopping
    /// early as soon as the tentative decoding is a codeword. A negative
    /// value makes the decoder perform exactly that many iterations, whether
    /// or not a codeword appears along the way, which is useful when results
    /// at a fixed iteration count are wanted.
    ///
    /// If the final decoding satisfies all the parity checks, an `Ok` is
    /// returned. Otherwise an `Err` is returned with the same output, whose
    /// codeword still has some bit errors.
    ///
    /// # Panics
    ///
    /// Panics if the length of `lratio` does not match the number of columns
    /// of the parity check matrix.
    pub fn decode(
        &mut self,
        lratio: &[f64],
        max_iterations: isize,
    ) -> Result<DecoderOutput, DecoderOutput> {
        assert_eq!(
            lratio.len(),
            self.h.num_cols(),
            "likelihood ratios do not match the block length"
        );
        let limit = max_iterations.unsigned_abs();
        let mut codeword = vec![0; self.h.num_cols()];
        let mut bit_probabilities = vec![0.0; self.h.num_cols()];
        let mut parity = vec![0; self.h.num_rows()];

        self.initialize(lratio, &mut codeword, &mut bit_probabilities);
        let mut iterations = 0;
        let valid = loop {
            let valid = check::check(&self.h, &codeword, &mut parity) == 0;
            if iterations == limit || (valid && max_iterations > 0) {
                break valid;
            }
            self.update_checks();
            self.update_bits(lratio, &mut codeword, &mut bit_probabilities);
            iterations += 1;
        };
        let output = DecoderOutput {
            codeword,
            bit_probabilities,
            parity,
            iterations,
        };
        if valid {
            Ok(output)
        } else {
            Err(output)
        }
    }

    /// Stores the channel ratios on the entries and takes the hard decisions
    /// of the received data as the first tentative decoding.
    fn initialize(&mut self, lratio: &[f64], codeword: &mut [u8], bit_probabilities: &mut [f64]) {
        for j in 0..self.h.num_cols() {
            let mut e = self.h.first_in_col(j);
            while let Some(f) = e {
                self.h.set_probability_ratio(f, lratio[j]);
                self.h.set_likelihood_ratio(f, 1.0);
                e = self.h.next_in_col(f);
            }
            bit_probabilities[j] = 1.0 - 1.0 / (1.0 + lratio[j]);
            codeword[j] = u8::from(lratio[j] >= 1.0);
        }
    }

    /// Recomputes the likelihood ratio messages of every row.
    fn update_checks(&mut self) {
        for i in 0..self.h.num_rows() {
            // Forward pass: each entry receives the product of the
            // transformed ratios of the entries before it.
            let mut dl = 1.0;
            let mut e = self.h.first_in_row(i);
            while let Some(f) = e {
                self.h.set_likelihood_ratio(f, dl);
                dl *= 2.0 / (1.0 + self.h.probability_ratio(f)) - 1.0;
                e = self.h.next_in_row(f);
            }
            // Backward pass: multiply in the entries after it, and map the
            // result back from a difference of probabilities to a ratio.
            let mut dl = 1.0;
            let mut e = self.h.last_in_row(i);
            while let Some(f) = e {
                let t = self.h.likelihood_ratio(f) * dl;
                self.h.set_likelihood_ratio(f, (1.0 - t) / (1.0 + t));
                dl *= 2.0 / (1.0 + self.h.probability_ratio(f)) - 1.0;
                e = self.h.prev_in_row(f);
            }
        }
    }

    /// Recomputes the probability ratio messages of every column, along with
    /// the tentative decoding and the bit probabilities.
    fn update_bits(&mut self, lratio: &[f64], codeword: &mut [u8], bit_probabilities: &mut [f64]) {
        for j in 0..self.h.num_cols() {
            let mut pr = lratio[j];
            let mut e = self.h.first_in_col(j);
            while let Some(f) = e {
                self.h.set_probability_ratio(f, pr);
                pr *= self.h.likelihood_ratio(f);
                e = self.h.next_in_col(f);
            }
            // A zero times an infinite message gives NaN; such a bit is
            // treated as undecided.
            if pr.is_nan() {
                pr = 1.0;
            }
            bit_probabilities[j] = 1.0 - 1.0 / (1.0 + pr);
            codeword[j] = u8::from(pr >= 1.0);
            let mut pr = 1.0;
            let mut e = self.h.last_in_col(j);
            while let Some(f) = e {
                let p = self.h.probability_ratio(f) * pr;
                self.h.set_probability_ratio(f, if p.is_nan() { 1.0 } else { p });
                pr *= self.h.likelihood_ratio(f);
                e = self.h.prev_in_col(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_decoder() -> BeliefPropDecoder {
        // Example 2.5 in Sarah J. Johnson - Iterative Error Correction
        let mut h = SparseMatrix::new(4, 6);
        for &(i, j) in &[
            (0, 0),
            (0, 1),
            (0, 3),
            (1, 1),
            (1, 2),
            (1, 4),
            (2, 0),
            (2, 4),
            (2, 5),
            (3, 2),
            (3, 3),
            (3, 5),
        ] {
            h.insert(i, j);
        }
        BeliefPropDecoder::new(h)
    }

    // The error correction cases follow example 2.23 in the same book, with
    // the bits received through a binary symmetric channel of crossover
    // probability 0.2.

    fn to_lratios(bits: &[u8]) -> Vec<f64> {
        bits.iter().map(|&b| if b == 0 { 0.25 } else { 4.0 }).collect()
    }

    #[test]
    fn no_errors() {
        let mut decoder = test_decoder();
        let codeword = [0, 0, 1, 0, 1, 1];
        let output = decoder.decode(&to_lratios(&codeword), 100).unwrap();
        assert_eq!(&output.codeword, &codeword);
        assert_eq!(output.iterations, 0);
        assert_eq!(output.parity, vec![0; 4]);
    }

    #[test]
    fn single_error() {
        let mut decoder = test_decoder();
        let codeword_good = [0, 0, 1, 0, 1, 1];
        for j in 0..codeword_good.len() {
            let mut codeword_bad = codeword_good;
            codeword_bad[j] ^= 1;
            let output = decoder.decode(&to_lratios(&codeword_bad), 100).unwrap();
            assert_eq!(&output.codeword, &codeword_good);
            assert_eq!(output.iterations, 1);
        }
    }

    #[test]
    fn zero_budget_reports_the_hard_decisions() {
        let mut decoder = test_decoder();
        let codeword = [0, 0, 1, 0, 1, 1];
        let output = decoder.decode(&to_lratios(&codeword), 0).unwrap();
        assert_eq!(output.iterations, 0);

        let mut received = codeword;
        received[2] ^= 1;
        let output = decoder.decode(&to_lratios(&received), 0).unwrap_err();
        assert_eq!(&output.codeword, &received);
        assert_eq!(output.iterations, 0);
        assert_eq!(output.parity.iter().filter(|&&p| p != 0).count(), 2);
    }

    #[test]
    fn negative_budget_runs_exactly() {
        let mut decoder = test_decoder();
        let codeword = [0, 0, 1, 0, 1, 1];
        // Three iterations even though the word is a codeword from the start.
        let output = decoder.decode(&to_lratios(&codeword), -3).unwrap();
        assert_eq!(&output.codeword, &codeword);
        assert_eq!(output.iterations, 3);
    }

    #[test]
    fn undecidable_input_exhausts_the_budget() {
        let mut decoder = test_decoder();
        // Ratios of one carry no information at all, so the decoder never
        // moves off the all ones guess, which is not a codeword.
        let output = decoder.decode(&[1.0; 6], 4).unwrap_err();
        assert_eq!(output.iterations, 4);
        assert_eq!(&output.codeword, &[1; 6]);
        assert_eq!(&output.bit_probabilities, &[0.5; 6]);
    }

    #[test]
    fn extreme_ratios_keep_probabilities_in_range() {
        let mut decoder = test_decoder();
        let mut received = [0, 0, 1, 0, 1, 1];
        received[0] ^= 1;
        let lratio: Vec<f64> = received
            .iter()
            .map(|&b| if b == 0 { 1e-300 } else { 1e300 })
            .collect();
        let output = decoder.decode(&lratio, 20).unwrap_or_else(|e| e);
        assert!(output.iterations <= 20);
        for &p in &output.bit_probabilities {
            assert!((0.0..=1.0).contains(&p), "{} out of range", p);
        }
    }
}
