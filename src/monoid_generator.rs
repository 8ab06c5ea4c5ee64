// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Enumeration of all monoids of a given order
//!
//! [MonoidGenerator] is an iterator that produces one monoid per class of
//! monoids of order n up to isomorphism and anti-isomorphism. The elements are
//! named `0, 1, ..., n-1` and `0` is the identity.
//!
//! The enumeration is a backtracking search over the cells (i, j) of the table,
//! with 1 <= i, j < n, in row-major order:
//! - a partial table is rejected as soon as it contains a triple (a, b, c)
//!   such that both (ab)c and a(bc) are defined and distinct
//! - a partial table is also rejected if it can't be the smallest table of its
//!   class. Each class is the orbit of a table under the permutations that fix 0,
//!   combined or not with transposition. Only the smallest table of each orbit,
//!   in row-major order, is produced.
//!
//! ```
//! use rlsm::monoid_generator::MonoidGenerator;
//!
//! let tables: Vec<String> = MonoidGenerator::new(2).map(|m| m.to_string()).collect();
//! assert_eq!(tables, vec!["01 10", "01 11"]);
//! ```
//!

use tracing::{debug, trace};

use crate::{combinatorics::permutations, monoid::Monoid};

// a permutation of the elements that fixes 0, and its inverse
#[derive(Debug)]
struct Relabeling {
    map: Vec<usize>,
    inverse: Vec<usize>,
}

///
/// Iterator over the monoids of a fixed order
///
/// All the search state is stored in the iterator so the enumeration
/// can be interrupted and resumed at any point.
///
#[derive(Debug)]
pub struct MonoidGenerator {
    order: usize,
    // partial table: None for cells not assigned yet
    table: Vec<Option<usize>>,
    // cells to fill, in row-major order
    cells: Vec<(usize, usize)>,
    // next value to try for each cell
    next_value: Vec<usize>,
    // index of the cell being filled
    current: usize,
    relabelings: Vec<Relabeling>,
    count: usize,
    done: bool,
}

impl MonoidGenerator {
    ///
    /// Create an iterator for the monoids of the given order
    ///
    pub fn new(order: usize) -> Self {
        let n = order;
        let mut table = vec![None; n * n];
        for i in 0..n {
            table[i] = Some(i);
            table[i * n] = Some(i);
        }
        let cells: Vec<(usize, usize)> = (1..n).flat_map(|i| (1..n).map(move |j| (i, j))).collect();
        let relabelings = permutations(1..n)
            .map(|p| {
                let mut map = Vec::with_capacity(n);
                map.push(0);
                map.extend(p);
                let mut inverse = vec![0; n];
                for (i, &x) in map.iter().enumerate() {
                    inverse[x] = i;
                }
                Relabeling { map, inverse }
            })
            .collect();
        MonoidGenerator {
            order,
            table,
            next_value: vec![0; cells.len()],
            cells,
            current: 0,
            relabelings,
            count: 0,
            done: order == 0,
        }
    }

    /// Order of the generated monoids
    pub fn order(&self) -> usize {
        self.order
    }

    fn get(&self, i: usize, j: usize) -> Option<usize> {
        self.table[i * self.order + j]
    }

    fn set(&mut self, k: usize, value: Option<usize>) {
        let (i, j) = self.cells[k];
        self.table[i * self.order + j] = value;
    }

    // check (ab)c = a(bc) for all triples where both sides are defined
    fn is_associative(&self) -> bool {
        let n = self.order;
        for a in 1..n {
            for b in 1..n {
                let ab = match self.get(a, b) {
                    Some(x) => x,
                    None => continue,
                };
                for c in 1..n {
                    if let Some(bc) = self.get(b, c) {
                        if let (Some(left), Some(right)) = (self.get(ab, c), self.get(a, bc)) {
                            if left != right {
                                return false;
                            }
                        }
                    }
                }
            }
        }
        true
    }

    //
    // Check whether the partial table may be the smallest of its class.
    // For each relabeling, the image is compared with the table cell by cell
    // until a cell is undefined in either of them.
    //
    fn is_canonical(&self) -> bool {
        for r in &self.relabelings {
            for transposed in [false, true] {
                for &(i, j) in &self.cells {
                    let x = match self.get(i, j) {
                        Some(x) => x,
                        None => break,
                    };
                    let (si, sj) = (r.inverse[i], r.inverse[j]);
                    let source = if transposed { self.get(sj, si) } else { self.get(si, sj) };
                    let y = match source {
                        Some(s) => r.map[s],
                        None => break,
                    };
                    if y < x {
                        return false;
                    }
                    if y > x {
                        break;
                    }
                }
            }
        }
        true
    }

    fn finish(&mut self) {
        self.done = true;
        debug!(order = self.order, count = self.count, "monoid enumeration done");
    }

    fn current_monoid(&self) -> Monoid {
        let elements = (0..self.order).map(|i| i.to_string()).collect();
        let table = self.table.iter().map(|x| x.unwrap_or(0)).collect();
        Monoid::from_raw(elements, table)
    }
}

impl Iterator for MonoidGenerator {
    type Item = Monoid;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.order;
        let m = self.cells.len();
        while !self.done {
            if self.current == m {
                let result = self.current_monoid();
                self.count += 1;
                trace!(order = n, count = self.count, table = %result, "found monoid");
                // resume the search from the last cell
                if m == 0 {
                    self.finish();
                } else {
                    self.current = m - 1;
                }
                return Some(result);
            }

            let k = self.current;
            let mut found = false;
            for v in self.next_value[k]..n {
                self.set(k, Some(v));
                if self.is_associative() && self.is_canonical() {
                    self.next_value[k] = v + 1;
                    found = true;
                    break;
                }
            }
            if found {
                self.current += 1;
                if self.current < m {
                    self.next_value[self.current] = 0;
                }
            } else {
                self.set(k, None);
                self.next_value[k] = 0;
                if k == 0 {
                    self.finish();
                } else {
                    self.current -= 1;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_small_orders() {
        assert_eq!(MonoidGenerator::new(0).count(), 0);

        let all: Vec<String> = MonoidGenerator::new(1).map(|m| m.to_string()).collect();
        assert_eq!(all, vec!["0"]);

        let all: Vec<String> = MonoidGenerator::new(2).map(|m| m.to_string()).collect();
        assert_eq!(all, vec!["01 10", "01 11"]);

        let all: Vec<String> = MonoidGenerator::new(3).map(|m| m.to_string()).collect();
        println!("order 3: {all:?}");
        assert_eq!(
            all,
            vec!["012 102 222", "012 111 211", "012 111 212", "012 111 222", "012 112 221", "012 120 201"]
        );
    }

    #[test]
    fn test_counts() {
        for (order, expected) in [(1, 1), (2, 2), (3, 6), (4, 27), (5, 156)] {
            let count = MonoidGenerator::new(order).count();
            println!("order {order}: {count} monoids");
            assert_eq!(count, expected);
        }
    }

    #[test]
    fn test_generated_monoids_are_valid() {
        for order in 1..5 {
            let all: Vec<Monoid> = MonoidGenerator::new(order).collect();
            for m in &all {
                // the text form goes through full validation
                let copy: Monoid = m.to_string().parse().unwrap();
                assert_eq!(&copy, m);
            }
            // pairwise non-isomorphic and non-anti-isomorphic
            for (i, a) in all.iter().enumerate() {
                for b in &all[i + 1..] {
                    assert!(!a.is_isomorphic_to(b));
                    assert!(!a.is_anti_isomorphic_to(b));
                }
            }
        }
    }

    #[test]
    fn test_resume() {
        let mut generator = MonoidGenerator::new(3);
        assert_eq!(generator.order(), 3);
        let first: Vec<Monoid> = generator.by_ref().take(2).collect();
        let rest: Vec<Monoid> = generator.collect();
        assert_eq!(first.len(), 2);
        assert_eq!(rest.len(), 4);
    }
}
