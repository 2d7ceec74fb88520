//! Random construction of LDPC parity check matrices.
//!
//! A parity check matrix is built column by column, giving each column a
//! number of checks drawn from a [`Distribution`]. Two placement methods
//! are available. `evencol` places the checks of each column in rows chosen
//! uniformly at random. `evenboth` additionally balances the rows, drawing
//! the check positions from a pool in which every row appears the same
//! number of times, so row weights come out as even as the column weights
//! allow.
//!
//! After the initial placement, every row is patched up to hold at least
//! two checks, and a matrix whose column counts are all even gets a couple
//! of extra checks, since such matrices are sure to have redundant rows.
//! Optionally, cycles of length four in the bipartite graph of the matrix
//! are eliminated by moving one of the checks of each cycle to a different
//! row within its column.

use crate::distrib::Distribution;
use crate::rand::construction_rng;
use crate::sparse::{EntryId, SparseMatrix};
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of sweeps over the columns that four cycle elimination makes
/// before giving up.
const CYCLE_PASSES: usize = 10;

/// Errors produced when constructing a parity check matrix.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum Error {
    /// The distribution asks some column for more checks than there are
    /// rows.
    #[error("number of checks per bit is greater than the total number of checks")]
    TooManyChecksPerBit,
    /// Four cycle elimination was requested, but some columns will have a
    /// check in every row, so a four cycle through them cannot be broken.
    #[error("cannot eliminate cycles of length four when bits have checks in every row")]
    CyclesUnavoidable,
}

/// Method used to place the checks of each column.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Method {
    /// Rows chosen uniformly at random, independently for each column.
    Evencol,
    /// Rows chosen so that row weights are balanced too.
    Evenboth,
}

impl FromStr for Method {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "evencol" => Method::Evencol,
            "evenboth" => Method::Evenboth,
            _ => return Err("invalid construction method (evencol or evenboth)"),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Evencol => "evencol",
            Method::Evenboth => "evenboth",
        };
        write!(f, "{}", s)
    }
}

/// Constructs a random `m` by `n` LDPC parity check matrix.
///
/// The number of checks in each column follows `distribution`, and `method`
/// selects how the checks are placed within the columns. The construction
/// is deterministic given `seed`. With `no4cycle`, cycles of length four
/// are eliminated after the construction.
///
/// Messages about adjustments made to the matrix are printed to standard
/// error.
///
/// # Panics
///
/// Panics if `m` or `n` is zero.
pub fn make_ldpc(
    m: usize,
    n: usize,
    seed: u64,
    method: Method,
    distribution: &Distribution,
    no4cycle: bool,
) -> Result<SparseMatrix, Error> {
    if distribution.max_weight() > m {
        return Err(Error::TooManyChecksPerBit);
    }
    if distribution.max_weight() == m && n > 1 && no4cycle {
        return Err(Error::CyclesUnavoidable);
    }

    let mut rng = construction_rng(seed);
    let mut h = SparseMatrix::new(m, n);

    // Number of checks to put in each column.
    let part = distribution.column_partition(n);
    let mut weights = Vec::with_capacity(n);
    for (entry, &count) in distribution.entries().iter().zip(&part) {
        weights.extend(std::iter::repeat(entry.weight).take(count));
    }
    assert_eq!(weights.len(), n, "column partition does not cover the columns");

    match method {
        Method::Evencol => {
            for (j, &weight) in weights.iter().enumerate() {
                for _ in 0..weight {
                    let i = loop {
                        let i = rng.gen_range(0..m);
                        if !h.contains(i, j) {
                            break i;
                        }
                    };
                    h.insert(i, j);
                }
            }
        }
        Method::Evenboth => {
            // Pool of row indices with one slot per check to place, so no
            // row is drawn again before every row has been drawn. Positions
            // before t are spent.
            let total: usize = weights.iter().sum();
            let mut pool: Vec<usize> = (0..total).map(|k| k % m).collect();
            let mut t = 0;
            let mut uneven = 0;
            for (j, &weight) in weights.iter().enumerate() {
                for _ in 0..weight {
                    let usable = pool[t..].iter().any(|&i| !h.contains(i, j));
                    if usable {
                        let i = loop {
                            let i = t + rng.gen_range(0..total - t);
                            if !h.contains(pool[i], j) {
                                break i;
                            }
                        };
                        h.insert(pool[i], j);
                        pool[i] = pool[t];
                        t += 1;
                    } else {
                        uneven += 1;
                        let i = loop {
                            let i = rng.gen_range(0..m);
                            if !h.contains(i, j) {
                                break i;
                            }
                        };
                        h.insert(i, j);
                    }
                }
            }
            if uneven > 0 {
                eprintln!("Had to place {} checks in rows unevenly", uneven);
            }
        }
    }

    // Add extra checks to make all row counts at least two.
    let mut added = 0;
    for i in 0..m {
        let first = match h.first_in_row(i) {
            Some(e) => e,
            None => {
                added += 1;
                let j = rng.gen_range(0..n);
                h.insert(i, j)
            }
        };
        if h.next_in_row(first).is_none() && n > 1 {
            let j = loop {
                let j = rng.gen_range(0..n);
                if j != h.col(first) {
                    break j;
                }
            };
            h.insert(i, j);
            added += 1;
        }
    }
    if added > 0 {
        eprintln!(
            "Added {} extra bit-checks to make row counts at least two",
            added
        );
    }

    // A matrix whose column counts are all even has dependent rows, so in
    // that case a couple of checks are added in random places. The counts
    // are judged from the distribution, before any patching up.
    let mut n_full = 0;
    let mut all_even = true;
    for (entry, &count) in distribution.entries().iter().zip(&part) {
        if entry.weight == m {
            n_full += count;
        }
        if entry.weight % 2 == 1 {
            all_even = false;
        }
    }
    if all_even && n - n_full > 1 && added < 2 {
        let mut extra = 0;
        while added + extra < 2 {
            let (i, j) = loop {
                let i = rng.gen_range(0..m);
                let j = rng.gen_range(0..n);
                if !h.contains(i, j) {
                    break (i, j);
                }
            };
            h.insert(i, j);
            extra += 1;
        }
        eprintln!(
            "Added {} extra bit-checks to try to avoid problems from even column counts",
            extra
        );
    }

    if no4cycle {
        let mut eliminated = 0;
        let mut found = 0;
        for _ in 0..CYCLE_PASSES {
            found = 0;
            for j in 0..n {
                if let Some(e) = find_four_cycle(&h, j) {
                    found += 1;
                    eliminated += 1;
                    // The old row still holds its entry here, so the
                    // rejection below never picks it again.
                    let i = loop {
                        let i = rng.gen_range(0..m);
                        if !h.contains(i, j) {
                            break i;
                        }
                    };
                    h.delete(e);
                    h.insert(i, j);
                }
            }
            if found == 0 {
                break;
            }
        }
        if eliminated > 0 {
            eprintln!(
                "Eliminated {} cycles of length four by moving checks within column",
                eliminated
            );
        }
        if found > 0 {
            eprintln!(
                "Couldn't eliminate all cycles of length four in {} passes",
                CYCLE_PASSES
            );
        }
    }

    Ok(h)
}

/// Searches column `j` for an entry that takes part in a cycle of length
/// four, returning the first one found.
///
/// An entry `e` is part of such a cycle if moving from it along its row to
/// another entry `f`, then along the column of `f` to another entry `g`,
/// some entry of the row of `g` lands back in column `j`.
fn find_four_cycle(h: &SparseMatrix, j: usize) -> Option<EntryId> {
    let mut e = h.first_in_col(j);
    while let Some(ee) = e {
        let mut f = h.first_in_row(h.row(ee));
        while let Some(ff) = f {
            if ff != ee {
                let mut g = h.first_in_col(h.col(ff));
                while let Some(gg) = g {
                    if gg != ff {
                        let mut k = h.first_in_row(h.row(gg));
                        while let Some(kk) = k {
                            if h.col(kk) == j {
                                return Some(ee);
                            }
                            k = h.next_in_row(kk);
                        }
                    }
                    g = h.next_in_col(gg);
                }
            }
            f = h.next_in_row(ff);
        }
        e = h.next_in_col(ee);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_3() -> Distribution {
        "3".parse().unwrap()
    }

    #[test]
    fn dimensions_and_minimum_weights() {
        for method in [Method::Evencol, Method::Evenboth] {
            let h = make_ldpc(10, 20, 1, method, &weight_3(), false).unwrap();
            assert_eq!(h.num_rows(), 10);
            assert_eq!(h.num_cols(), 20);
            for j in 0..20 {
                assert!(h.col_weight(j) >= 3, "column {} too light", j);
            }
            for i in 0..10 {
                assert!(h.row_weight(i) >= 2, "row {} too light", i);
            }
        }
    }

    #[test]
    fn evenboth_balances_rows() {
        // 10 columns of weight 3 over 15 rows makes 30 checks drawn from a
        // pool holding each row twice, so a row gets at most two checks from
        // the pool plus the odd one placed unevenly, and patching only lifts
        // rows to two.
        let h = make_ldpc(15, 10, 7, Method::Evenboth, &weight_3(), false).unwrap();
        for i in 0..15 {
            let w = h.row_weight(i);
            assert!((2..=4).contains(&w), "row {} has weight {}", i, w);
        }
    }

    #[test]
    fn mixed_distribution() {
        let d: Distribution = "0.5x2/0.5x5".parse().unwrap();
        let h = make_ldpc(15, 10, 3, Method::Evencol, &d, false).unwrap();
        let mut weights: Vec<usize> = (0..10).map(|j| h.col_weight(j)).collect();
        weights.sort_unstable();
        // Five columns of each weight, short of any patching up.
        assert!(weights[0] >= 2);
        assert!(weights[9] >= 5);
        assert!(weights.iter().filter(|&&w| w >= 5).count() >= 5);
    }

    #[test]
    fn reproducible_for_a_seed() {
        let a = make_ldpc(8, 16, 5, Method::Evenboth, &weight_3(), false).unwrap();
        let b = make_ldpc(8, 16, 5, Method::Evenboth, &weight_3(), false).unwrap();
        let c = make_ldpc(8, 16, 6, Method::Evenboth, &weight_3(), false).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn four_cycle_elimination() {
        let h = make_ldpc(20, 30, 2, Method::Evenboth, &weight_3(), true).unwrap();
        // No two columns may share more than one row.
        for j1 in 0..30 {
            for j2 in (j1 + 1)..30 {
                let shared = (0..20)
                    .filter(|&i| h.contains(i, j1) && h.contains(i, j2))
                    .count();
                assert!(shared <= 1, "columns {} and {} share {} rows", j1, j2, shared);
            }
        }
    }

    #[test]
    fn rejects_impossible_requests() {
        let d: Distribution = "8".parse().unwrap();
        assert_eq!(
            make_ldpc(6, 12, 1, Method::Evencol, &d, false),
            Err(Error::TooManyChecksPerBit)
        );
        let d: Distribution = "6".parse().unwrap();
        assert_eq!(
            make_ldpc(6, 12, 1, Method::Evencol, &d, true),
            Err(Error::CyclesUnavoidable)
        );
    }

    #[test]
    fn finds_a_four_cycle() {
        let mut h = SparseMatrix::new(4, 4);
        h.insert(0, 0);
        h.insert(0, 2);
        h.insert(3, 0);
        h.insert(3, 2);
        h.insert(1, 1);
        assert!(find_four_cycle(&h, 0).is_some());
        assert!(find_four_cycle(&h, 1).is_none());
        h.delete(h.find(3, 2).unwrap());
        assert!(find_four_cycle(&h, 0).is_none());
    }
}
