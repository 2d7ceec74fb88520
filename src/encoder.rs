//! Systematic encoder with a typed array interface.
//!
//! [`Encoder`] pairs a parity check matrix with a [`Generator`] derived from
//! it and encodes messages given as [`ndarray`] vectors of [`GF2`] elements.
//! The bit-level work is done by [`Generator::encode`]; this type adds the
//! typed interface used by library callers and by the exhaustive decoder,
//! which encodes every candidate message.
//!
//! Encoding places the message bits at the codeword positions named by the
//! generator matrix's column order, not necessarily at the front of the
//! codeword. Use [`Generator::column_order`] to locate them.

use crate::generator::Generator;
use crate::gf2::GF2;
use crate::sparse::SparseMatrix;
use ndarray::{Array1, ArrayBase, Data, Ix1};

/// Systematic encoder for the code of a parity check matrix.
#[derive(Debug, Clone)]
pub struct Encoder {
    h: SparseMatrix,
    generator: Generator,
}

impl Encoder {
    /// Creates an encoder from a parity check matrix and a generator matrix
    /// derived from it.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of the two matrices do not match.
    pub fn new(h: SparseMatrix, generator: Generator) -> Encoder {
        assert_eq!(
            h.num_rows(),
            generator.num_checks(),
            "generator matrix does not match the number of checks"
        );
        assert_eq!(
            h.num_cols(),
            generator.block_length(),
            "generator matrix does not match the block length"
        );
        Encoder { h, generator }
    }

    /// Parity check matrix of the code.
    pub fn parity_check(&self) -> &SparseMatrix {
        &self.h
    }

    /// Generator matrix of the code.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Encodes a message into a codeword.
    pub fn encode<S>(&self, message: &ArrayBase<S, Ix1>) -> Array1<GF2>
    where
        S: Data<Elem = GF2>,
    {
        let bits: Vec<u8> = message.iter().map(|&b| u8::from(b)).collect();
        let codeword = self.generator.encode(&self.h, &bits);
        Array1::from_iter(codeword.into_iter().map(|b| GF2::from(b != 0)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_traits::{One, Zero};

    fn h4x8() -> SparseMatrix {
        let mut h = SparseMatrix::new(4, 8);
        for &(r, c) in &[
            (0, 0),
            (0, 4),
            (0, 5),
            (1, 1),
            (1, 4),
            (1, 6),
            (2, 2),
            (2, 5),
            (2, 6),
            (2, 7),
            (3, 3),
            (3, 7),
        ] {
            h.insert(r, c);
        }
        h
    }

    #[test]
    fn encode() {
        let h = h4x8();
        // The first four columns of h form an identity, so with the natural
        // column order the check bits are just the product of the message
        // columns and the message.
        let natural: Vec<usize> = (0..8).collect();
        let gen = Generator::dense(&h, Some(&natural)).unwrap();
        let encoder = Encoder::new(h, gen);
        let i = GF2::one();
        let o = GF2::zero();

        let codeword = encoder.encode(&ndarray::arr1(&[i, o, i, i]));
        let expected = [i, o, o, i, i, o, i, i];
        assert_eq!(&codeword.as_slice().unwrap(), &expected);

        let codeword = encoder.encode(&ndarray::arr1(&[o, i, o, o]));
        let expected = [i, o, i, o, o, i, o, o];
        assert_eq!(&codeword.as_slice().unwrap(), &expected);
    }

    #[test]
    fn encode_with_sparse_generator() {
        use crate::sparse::PivotStrategy;

        let h = h4x8();
        let gen = Generator::sparse(&h, PivotStrategy::MinProd, 0, 0).unwrap();
        let encoder = Encoder::new(h.clone(), gen);
        let message = [GF2::one(), GF2::one(), GF2::zero(), GF2::one()];
        let codeword = encoder.encode(&ndarray::arr1(&message));

        let bits: Vec<u8> = codeword.iter().map(|&b| u8::from(b)).collect();
        let mut parity = vec![0u8; 4];
        h.mul_vec(&bits, &mut parity);
        assert_eq!(parity, vec![0; 4]);

        let order = encoder.generator().column_order();
        for (j, &bit) in message.iter().enumerate() {
            assert_eq!(codeword[order[4 + j]], bit);
        }
    }
}
