//! Statistics on decoded blocks.
//!
//! These functions judge the state of a tentative decoding: whether it is a
//! codeword, how far it strayed from the hard decisions implied by the
//! channel, and several soft figures of merit computed from the bit
//! probabilities that a message passing decoder tracks. The first two feed
//! the per block table of the `decode` command.

use crate::sparse::SparseMatrix;

/// Computes the syndrome of a tentative decoding and counts the parity
/// checks it violates.
///
/// `parity` receives the product of `h` with `codeword`; the return value is
/// the number of ones in it, so zero means `codeword` is a codeword.
///
/// # Panics
///
/// Panics if the slice lengths do not match the dimensions of `h`.
pub fn check(h: &SparseMatrix, codeword: &[u8], parity: &mut [u8]) -> usize {
    h.mul_vec(codeword, parity);
    parity.iter().filter(|&&p| p != 0).count()
}

/// Measures how many bits of a decoding differ from the hard decisions that
/// the likelihood ratios alone would give.
///
/// A bit whose likelihood ratio is exactly one has no preferred hard
/// decision and counts as half a change.
pub fn changed(lratio: &[f64], codeword: &[u8]) -> f64 {
    assert_eq!(lratio.len(), codeword.len());
    let mut cnt = 0.0;
    for (&r, &b) in lratio.iter().zip(codeword) {
        if r == 1.0 {
            cnt += 0.5;
        } else if (b != 0) != (r > 1.0) {
            cnt += 1.0;
        }
    }
    cnt
}

/// Computes the expected number of parity check errors with respect to
/// probabilities of the bits being one.
///
/// The bits are treated as independent; for each row the probability of an
/// odd number of ones is accumulated with the recurrence
/// `p <- p (1 - q) + (1 - p) q` over the bit probabilities `q` in the row.
pub fn expected_parity_errors(h: &SparseMatrix, bit_probs: &[f64]) -> f64 {
    assert_eq!(bit_probs.len(), h.num_cols());
    let mut ee = 0.0;
    for i in 0..h.num_rows() {
        let mut p = 0.0;
        for e in h.iter_row(i) {
            let q = bit_probs[h.col(e)];
            p = p * (1.0 - q) + (1.0 - p) * q;
        }
        ee += p;
    }
    ee
}

/// Computes the log likelihood of a decoding given the likelihood ratios of
/// the received data, up to a constant that does not depend on the decoding.
pub fn loglikelihood(lratio: &[f64], codeword: &[u8]) -> f64 {
    assert_eq!(lratio.len(), codeword.len());
    let mut ll = 0.0;
    for (&r, &b) in lratio.iter().zip(codeword) {
        ll -= if b != 0 {
            (1.0 + 1.0 / r).ln()
        } else {
            (1.0 + r).ln()
        };
    }
    ll
}

/// Computes the expected log likelihood over independent bits with the given
/// probabilities of being one, up to the same constant as [`loglikelihood`].
pub fn expected_loglikelihood(lratio: &[f64], bit_probs: &[f64]) -> f64 {
    assert_eq!(lratio.len(), bit_probs.len());
    let mut ll = 0.0;
    for (&r, &q) in lratio.iter().zip(bit_probs) {
        if q > 0.0 {
            ll -= q * (1.0 + 1.0 / r).ln();
        }
        if q < 1.0 {
            ll -= (1.0 - q) * (1.0 + r).ln();
        }
    }
    ll
}

/// Computes the total entropy in bits of independent bits with the given
/// probabilities of being one.
pub fn entropy(bit_probs: &[f64]) -> f64 {
    let mut e = 0.0;
    for &q in bit_probs {
        if q > 0.0 && q < 1.0 {
            e -= q * q.ln() + (1.0 - q) * (1.0 - q).ln();
        }
    }
    e / 2.0f64.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h3x6() -> SparseMatrix {
        // Rows 0 and 1 overlap in column 2, row 2 is disjoint from both.
        let mut h = SparseMatrix::new(3, 6);
        for &(i, j) in &[(0, 0), (0, 2), (1, 1), (1, 2), (2, 3), (2, 4)] {
            h.insert(i, j);
        }
        h
    }

    #[test]
    fn check_counts_unsatisfied_rows() {
        let h = h3x6();
        let mut parity = [0; 3];
        assert_eq!(check(&h, &[1, 1, 1, 0, 0, 0], &mut parity), 0);
        assert_eq!(parity, [0, 0, 0]);
        assert_eq!(check(&h, &[1, 1, 1, 1, 0, 1], &mut parity), 1);
        assert_eq!(parity, [0, 0, 1]);
        assert_eq!(check(&h, &[0, 0, 1, 1, 0, 0], &mut parity), 3);
    }

    #[test]
    fn changed_counts_flipped_hard_decisions() {
        // Hard decisions are 1, 0, ambiguous, 1.
        let lratio = [4.0, 0.25, 1.0, 8.0];
        assert_eq!(changed(&lratio, &[1, 0, 0, 1]), 0.5);
        assert_eq!(changed(&lratio, &[1, 0, 1, 1]), 0.5);
        assert_eq!(changed(&lratio, &[0, 1, 0, 0]), 3.5);
    }

    #[test]
    fn expected_parity_errors_of_certain_bits() {
        let h = h3x6();
        // With probabilities 0 or 1, the expectation is the exact count.
        let probs = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0];
        assert_eq!(expected_parity_errors(&h, &probs), 1.0);
    }

    #[test]
    fn expected_parity_errors_of_uncertain_bits() {
        let h = h3x6();
        // A row with an entirely undecided bit is violated half the time.
        let probs = [0.5, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert!((expected_parity_errors(&h, &probs) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn loglikelihood_prefers_the_likelier_word() {
        let lratio = [9.0, 9.0, 1.0 / 9.0];
        let good = loglikelihood(&lratio, &[1, 1, 0]);
        let bad = loglikelihood(&lratio, &[0, 0, 1]);
        assert!(good > bad);
        // Each bit contributes -ln(1 + 1/9) when it follows its ratio.
        assert!((good + 3.0 * (10.0f64 / 9.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn expected_loglikelihood_interpolates() {
        let lratio = [9.0, 1.0 / 9.0];
        // Certain probabilities reproduce the plain log likelihood.
        let exact = loglikelihood(&lratio, &[1, 0]);
        assert!((expected_loglikelihood(&lratio, &[1.0, 0.0]) - exact).abs() < 1e-12);
        // An undecided bit averages over both of its terms.
        let half = expected_loglikelihood(&[9.0], &[0.5]);
        let both = loglikelihood(&[9.0], &[1]) + loglikelihood(&[9.0], &[0]);
        assert!((half - both / 2.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_in_bits() {
        assert_eq!(entropy(&[0.0, 1.0, 0.0]), 0.0);
        assert!((entropy(&[0.5, 0.5]) - 2.0).abs() < 1e-12);
        let e = entropy(&[0.25]);
        assert!(e > 0.8 && e < 0.82);
    }
}
