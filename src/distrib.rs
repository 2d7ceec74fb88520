//! Distributions of column and row weights.
//!
//! The constructions in [`construction`](crate::construction) can give
//! different columns of the parity check matrix different weights. The
//! desired mix is described by a [`Distribution`], a list of proportions
//! paired with weights, parsed from a specification string such as
//! `0.3x2/0.6x3/0.1x7`. A plain integer is shorthand for giving every
//! column that weight.

use std::str::FromStr;
use thiserror::Error;

/// Error returned when a distribution specification cannot be parsed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("invalid distribution specification")]
pub struct ParseError;

/// One component of a [`Distribution`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistribEntry {
    /// Fraction of the columns that get this weight. The fractions of a
    /// parsed distribution sum to one.
    pub proportion: f64,
    /// Number of checks per column.
    pub weight: usize,
}

/// Distribution of weights over the columns of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    list: Vec<DistribEntry>,
}

impl Distribution {
    /// Returns the entries of the distribution.
    pub fn entries(&self) -> &[DistribEntry] {
        &self.list
    }

    /// Returns the largest weight in the distribution.
    pub fn max_weight(&self) -> usize {
        self.list.iter().map(|e| e.weight).max().unwrap_or(0)
    }

    /// Splits `n` columns among the entries of the distribution, in
    /// proportion to their fractions.
    ///
    /// Each entry gets the whole part of its share first. Columns left over
    /// by the rounding go one at a time to the entry with the largest
    /// remaining fraction, earliest entry first on ties.
    pub fn column_partition(&self, n: usize) -> Vec<usize> {
        let mut part = Vec::with_capacity(self.list.len());
        let mut trunc = Vec::with_capacity(self.list.len());
        let mut used = 0;
        for e in &self.list {
            let share = e.proportion * n as f64;
            let cur = share.floor() as usize;
            part.push(cur);
            trunc.push(share - cur as f64);
            used += cur;
        }
        assert!(used <= n, "rounded shares exceed the number of columns");
        while used < n {
            let mut cur = 0;
            for j in 1..trunc.len() {
                if trunc[j] > trunc[cur] {
                    cur = j;
                }
            }
            part[cur] += 1;
            used += 1;
            trunc[cur] = -1.0;
        }
        part
    }
}

impl FromStr for Distribution {
    type Err = ParseError;

    /// Parses a distribution specification.
    ///
    /// The specification is either a single positive integer, giving one
    /// entry of that weight with proportion one, or a list of
    /// `PROPxWEIGHT` pairs separated by `/`. Proportions must be positive
    /// and are normalized to sum to one; weights must be positive.
    fn from_str(s: &str) -> Result<Distribution, ParseError> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let weight = s.parse::<usize>().map_err(|_| ParseError)?;
            if weight == 0 {
                return Err(ParseError);
            }
            return Ok(Distribution {
                list: vec![DistribEntry {
                    proportion: 1.0,
                    weight,
                }],
            });
        }
        let mut list = Vec::new();
        let mut total = 0.0;
        for pair in s.split('/') {
            let (prop, weight) = pair.split_once('x').ok_or(ParseError)?;
            let proportion = prop.parse::<f64>().map_err(|_| ParseError)?;
            let weight = weight.parse::<usize>().map_err(|_| ParseError)?;
            if proportion <= 0.0 || weight == 0 {
                return Err(ParseError);
            }
            total += proportion;
            list.push(DistribEntry { proportion, weight });
        }
        for e in &mut list {
            e.proportion /= total;
        }
        Ok(Distribution { list })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_number() {
        let d: Distribution = "3".parse().unwrap();
        assert_eq!(
            d.entries(),
            &[DistribEntry {
                proportion: 1.0,
                weight: 3
            }]
        );
        assert_eq!(d.max_weight(), 3);
    }

    #[test]
    fn list_of_pairs() {
        let d: Distribution = "0.5x2/0.3x7/0.2x11".parse().unwrap();
        let e = d.entries();
        assert_eq!(e.len(), 3);
        assert!((e[0].proportion - 0.5).abs() < 1e-12);
        assert!((e[1].proportion - 0.3).abs() < 1e-12);
        assert!((e[2].proportion - 0.2).abs() < 1e-12);
        assert_eq!(e[0].weight, 2);
        assert_eq!(e[1].weight, 7);
        assert_eq!(e[2].weight, 11);
        assert_eq!(d.max_weight(), 11);
    }

    #[test]
    fn proportions_are_normalized() {
        let d: Distribution = "2x3/2x4".parse().unwrap();
        assert!((d.entries()[0].proportion - 0.5).abs() < 1e-12);
        assert!((d.entries()[1].proportion - 0.5).abs() < 1e-12);
        let d: Distribution = "0.6x3".parse().unwrap();
        assert_eq!(d.entries()[0].proportion, 1.0);
    }

    #[test]
    fn bad_specifications() {
        for s in [
            "", "0", "-3", "x3", "3x", "0x3", "0.5x0", "abc", "0.3x2/", "2x3x4",
        ] {
            assert_eq!(s.parse::<Distribution>(), Err(ParseError), "{:?}", s);
        }
    }

    #[test]
    fn partition_with_exact_shares() {
        let d: Distribution = "0.5x2/0.5x4".parse().unwrap();
        assert_eq!(d.column_partition(10), vec![5, 5]);
        let d: Distribution = "3".parse().unwrap();
        assert_eq!(d.column_partition(7), vec![7]);
    }

    #[test]
    fn partition_breaks_ties_toward_the_first_entry() {
        // Shares are 1.5, 1.5 and 1.0, so one column is left over and the
        // two tied remainders are resolved in favor of the first entry.
        let d: Distribution = "0.375x2/0.375x3/0.25x4".parse().unwrap();
        assert_eq!(d.column_partition(4), vec![2, 1, 1]);
    }

    #[test]
    fn partition_hands_out_all_leftovers() {
        let d: Distribution = "1x2/1x3/1x4".parse().unwrap();
        let part = d.column_partition(10);
        assert_eq!(part.iter().sum::<usize>(), 10);
        assert_eq!(part, vec![4, 3, 3]);
    }
}
