// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Minimization of deterministic finite-state automata
//!

use tracing::trace;

use crate::partitions::Partition;

//
// The automaton is defined by
// - a finite set of state S = [0 .. N-1]
// - an alphabet A = [0 .. M-1]
// - a total transition function delta: S x A -> S
// - a set of final states F
//
// Minimization (Moore)
// --------------------
// - maintain a partition of S into disjoint blocks
// - initially, there are two blocks: F and S-F
// - in each round, split every block D according to the signature of its
//   elements: sig(s) = [ block(delta(s, 0)), ..., block(delta(s, M-1)) ].
//   Two states of D stay together iff they have the same signature.
// - stop when a round doesn't split any block.
//
// The result is the coarsest partition compatible with F that is a
// congruence for delta. Two states are in the same block iff they
// accept the same language.
//

///
/// Minimizer
///
/// The transition function and the final-state predicate are
/// given as closures:
/// - delta(s, c) = successor of state s for the c-th symbol
/// - is_final(s) = true if s is a final state
///
pub struct Minimizer<D, F> {
    alphabet_size: u32,
    delta: D,
    is_final: F,
    partition: Partition,
}

impl<D, F> std::fmt::Debug for Minimizer<D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Minimizer")
            .field("alphabet_size", &self.alphabet_size)
            .field("partition", &self.partition)
            .finish()
    }
}

impl<D, F> Minimizer<D, F>
where
    D: Fn(u32, u32) -> u32,
    F: Fn(u32) -> bool,
{
    ///
    /// Create a minimizer for an automaton with num_states states
    /// and an alphabet of alphabet_size symbols.
    ///
    pub fn new(num_states: u32, alphabet_size: u32, delta: D, is_final: F) -> Self {
        Minimizer {
            alphabet_size,
            delta,
            is_final,
            partition: Partition::new(num_states),
        }
    }

    ///
    /// Compute the partition of equivalent states
    ///
    pub fn refine(&mut self) -> &Partition {
        if self.partition.size() == 0 {
            return &self.partition;
        }
        let is_final = &self.is_final;
        self.partition.refine_block(1, is_final);

        let delta = &self.delta;
        let m = self.alphabet_size;
        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = false;
            let n = self.partition.num_blocks();
            for b in 1..n {
                let created = self.partition.refine_block_by_key(b, |p, s| {
                    (0..m).map(|c| p.block_id(delta(s, c))).collect::<Vec<u32>>()
                });
                changed |= created > 0;
            }
            if !changed {
                break;
            }
        }
        trace!(rounds, classes = self.partition.index(), "partition refinement done");
        &self.partition
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // the language abc(a*), plus a sink
    // 0 -a-> 1 -b-> 2 -c-> 3 -a-> 4 -a-> 5 -a-> 3
    // states 3, 4, 5 are final and equivalent; everything else goes to 6
    fn delta(s: u32, c: u32) -> u32 {
        match (s, c) {
            (0, 0) => 1,
            (1, 1) => 2,
            (2, 2) => 3,
            (3, 0) => 4,
            (4, 0) => 5,
            (5, 0) => 3,
            _ => 6,
        }
    }

    #[test]
    fn test_minimizer() {
        let mut minimizer = Minimizer::new(7, 3, delta, |s| (3..6).contains(&s));
        let p = minimizer.refine();
        println!("Equivalence classes:\n{p}");
        assert_eq!(p.index(), 5);
        assert_eq!(p.block_id(3), p.block_id(4));
        assert_eq!(p.block_id(4), p.block_id(5));
        for s in 0..3 {
            assert_ne!(p.block_id(s), p.block_id(6));
        }
    }

    #[test]
    fn test_no_final_states() {
        let mut minimizer = Minimizer::new(4, 2, |s, _| (s + 1) % 4, |_| false);
        assert_eq!(minimizer.refine().index(), 1);
    }

    #[test]
    fn test_cycle() {
        // counter modulo 6 with final states at multiples of 3: two classes per residue mod 3
        let mut minimizer = Minimizer::new(6, 1, |s, _| (s + 1) % 6, |s| s % 3 == 0);
        let p = minimizer.refine();
        println!("Modulo 6:\n{p}");
        assert_eq!(p.index(), 3);
        assert_eq!(p.block_id(0), p.block_id(3));
        assert_eq!(p.block_id(1), p.block_id(4));
        assert_eq!(p.block_id(2), p.block_id(5));
    }
}
