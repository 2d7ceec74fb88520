//! Channel models.
//!
//! This module contains the channel models that relate transmitted bits to
//! received data: simulation of a transmission for the `transmit` command,
//! and the likelihood ratios that the decoders start from.
//!
//! Three memoryless channels are supported. The binary symmetric channel
//! carries hard bits and flips each one with a fixed probability. The
//! additive white Gaussian noise and additive white logistic noise channels
//! modulate a bit to a signal of -1 or +1 and add real noise to it.

use rand::Rng;
use rand_distr::{Open01, StandardNormal};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a channel specification cannot be parsed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ParseError {
    /// The channel name is not one of the supported channels.
    #[error("unknown channel type (bsc, awgn or awln)")]
    UnknownType,
    /// The channel parameter is missing, not a number, or out of range.
    #[error("invalid channel parameter")]
    InvalidParameter,
}

/// Value received from a channel for one transmitted bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Hard bit received from the binary symmetric channel.
    Bit(u8),
    /// Real value received from a channel with additive noise.
    Real(f64),
}

/// Memoryless channel model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel {
    /// Binary symmetric channel. Each bit is flipped with probability
    /// `error_probability`.
    Bsc {
        /// Probability that a bit is flipped, strictly between zero and one.
        error_probability: f64,
    },
    /// Additive white Gaussian noise channel. A bit `b` is received as
    /// `2b - 1` plus Gaussian noise.
    Awgn {
        /// Standard deviation of the noise.
        standard_deviation: f64,
    },
    /// Additive white logistic noise channel. A bit `b` is received as
    /// `2b - 1` plus logistic noise.
    Awln {
        /// Width parameter of the logistic noise density.
        width: f64,
    },
}

impl Channel {
    /// Creates a channel from its name and parameter.
    ///
    /// The name is matched case insensitively. The parameter is the error
    /// probability for `bsc`, the noise standard deviation for `awgn` and
    /// the noise width for `awln`.
    pub fn new(name: &str, parameter: f64) -> Result<Channel, ParseError> {
        if name.eq_ignore_ascii_case("bsc") {
            if !(parameter > 0.0 && parameter < 1.0) {
                return Err(ParseError::InvalidParameter);
            }
            Ok(Channel::Bsc {
                error_probability: parameter,
            })
        } else if name.eq_ignore_ascii_case("awgn") {
            if !(parameter > 0.0) {
                return Err(ParseError::InvalidParameter);
            }
            Ok(Channel::Awgn {
                standard_deviation: parameter,
            })
        } else if name.eq_ignore_ascii_case("awln") {
            if !(parameter > 0.0) {
                return Err(ParseError::InvalidParameter);
            }
            Ok(Channel::Awln { width: parameter })
        } else {
            Err(ParseError::UnknownType)
        }
    }

    /// Sends one bit through the channel.
    ///
    /// An [Rng] is used as source of randomness for the channel noise.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not zero or one.
    pub fn transmit<R: Rng>(&self, bit: u8, rng: &mut R) -> Sample {
        assert!(bit <= 1, "transmitted bit must be zero or one");
        let signal = if bit != 0 { 1.0 } else { -1.0 };
        match *self {
            Channel::Bsc { error_probability } => {
                let flip = rng.gen::<f64>() < error_probability;
                Sample::Bit(bit ^ u8::from(flip))
            }
            Channel::Awgn { standard_deviation } => {
                let noise: f64 = rng.sample(StandardNormal);
                Sample::Real(signal + standard_deviation * noise)
            }
            Channel::Awln { width } => {
                let u: f64 = rng.sample(Open01);
                Sample::Real(signal + width * (u / (1.0 - u)).ln())
            }
        }
    }

    /// Computes the likelihood ratio of a received value, the probability of
    /// receiving it if a one was sent over the probability of receiving it
    /// if a zero was sent.
    ///
    /// # Panics
    ///
    /// Panics if the sample kind does not belong to this channel.
    pub fn likelihood_ratio(&self, sample: Sample) -> f64 {
        match (*self, sample) {
            (Channel::Bsc { error_probability }, Sample::Bit(bit)) => {
                if bit != 0 {
                    (1.0 - error_probability) / error_probability
                } else {
                    error_probability / (1.0 - error_probability)
                }
            }
            (Channel::Awgn { standard_deviation }, Sample::Real(y)) => {
                (2.0 * y / (standard_deviation * standard_deviation)).exp()
            }
            (Channel::Awln { width }, Sample::Real(y)) => {
                let e1 = (-(y - 1.0) / width).exp();
                let d1 = 1.0 / ((1.0 + e1) * (1.0 + 1.0 / e1));
                let e0 = (-(y + 1.0) / width).exp();
                let d0 = 1.0 / ((1.0 + e0) * (1.0 + 1.0 / e0));
                d1 / d0
            }
            _ => panic!("sample does not match the channel type"),
        }
    }
}

impl FromStr for Channel {
    type Err = ParseError;

    /// Parses a channel specification of the form `bsc 0.05`, `awgn 0.8` or
    /// `awln 1.0`.
    fn from_str(s: &str) -> Result<Channel, ParseError> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ParseError::UnknownType)?;
        let parameter = words
            .next()
            .ok_or(ParseError::InvalidParameter)?
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidParameter)?;
        if words.next().is_some() {
            return Err(ParseError::InvalidParameter);
        }
        Channel::new(name, parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand::transmission_rng;

    #[test]
    fn parse() {
        assert_eq!(
            "bsc 0.05".parse::<Channel>(),
            Ok(Channel::Bsc {
                error_probability: 0.05
            })
        );
        assert_eq!(
            "AWGN 0.8".parse::<Channel>(),
            Ok(Channel::Awgn {
                standard_deviation: 0.8
            })
        );
        assert_eq!("AwLn 1.5".parse::<Channel>(), Ok(Channel::Awln { width: 1.5 }));
        assert_eq!("laplace 1".parse::<Channel>(), Err(ParseError::UnknownType));
        for s in ["bsc", "bsc zero", "bsc 0", "bsc 1", "awgn -0.5", "awln 0", "bsc 0.1 2"] {
            assert!(s.parse::<Channel>().is_err(), "{:?}", s);
        }
    }

    #[test]
    fn bsc_likelihood_ratios() {
        let channel = Channel::new("bsc", 0.2).unwrap();
        assert!((channel.likelihood_ratio(Sample::Bit(1)) - 4.0).abs() < 1e-12);
        assert!((channel.likelihood_ratio(Sample::Bit(0)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn awgn_likelihood_ratios() {
        let channel = Channel::new("awgn", 1.0).unwrap();
        assert_eq!(channel.likelihood_ratio(Sample::Real(0.0)), 1.0);
        let lr = channel.likelihood_ratio(Sample::Real(1.0));
        assert!((lr - (2.0f64).exp()).abs() < 1e-12);
        // Halving the noise deviation squares the evidence.
        let channel = Channel::new("awgn", 0.5).unwrap();
        assert!((channel.likelihood_ratio(Sample::Real(1.0)) - (8.0f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn awln_likelihood_ratios() {
        let channel = Channel::new("awln", 1.0).unwrap();
        assert!((channel.likelihood_ratio(Sample::Real(0.0)) - 1.0).abs() < 1e-12);
        let above = channel.likelihood_ratio(Sample::Real(0.7));
        let below = channel.likelihood_ratio(Sample::Real(-0.7));
        assert!(above > 1.0);
        assert!((above * below - 1.0).abs() < 1e-12);
    }

    #[test]
    fn transmit_is_reproducible() {
        let channel = Channel::new("awgn", 0.8).unwrap();
        let mut rng = transmission_rng(7);
        let a: Vec<Sample> = (0..16u8).map(|i| channel.transmit(i & 1, &mut rng)).collect();
        let mut rng = transmission_rng(7);
        let b: Vec<Sample> = (0..16u8).map(|i| channel.transmit(i & 1, &mut rng)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn low_noise_keeps_the_signal_sign() {
        let channel = Channel::new("awgn", 0.05).unwrap();
        let mut rng = transmission_rng(1);
        for bit in [0u8, 1, 1, 0, 1, 0, 0, 1] {
            match channel.transmit(bit, &mut rng) {
                Sample::Real(y) => assert_eq!(y > 0.0, bit != 0),
                Sample::Bit(_) => panic!("awgn returned a hard bit"),
            }
        }
    }

    #[test]
    fn bsc_flips_rarely_at_low_error_probability() {
        let channel = Channel::new("bsc", 0.01).unwrap();
        let mut rng = transmission_rng(3);
        let mut flips = 0;
        for _ in 0..1000 {
            match channel.transmit(0, &mut rng) {
                Sample::Bit(b) => flips += usize::from(b),
                Sample::Real(_) => panic!("bsc returned a real value"),
            }
        }
        assert!(flips < 50, "{} flips", flips);
    }

    #[test]
    #[should_panic]
    fn mismatched_sample_kind() {
        let channel = Channel::new("bsc", 0.1).unwrap();
        channel.likelihood_ratio(Sample::Real(0.3));
    }
}
