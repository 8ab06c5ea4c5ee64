// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Conversion from automata to regular expressions
//!
//! Each state i of the automaton is associated with the language R_i of the words
//! accepted from state i. These languages satisfy a linear system:
//!
//! `R_i = a_1 R_j1 | ... | a_k R_jk | (& if i is final)`
//!
//! The system is solved by eliminating the states one by one, from the last to the
//! first, using Arden's rule: the solution of `X = A X | B` is `X = A* B`. After
//! all other states are eliminated, R_0 is the language of the automaton.
//!

use tracing::{debug, trace};

use crate::{automata::Dfa, regular_expressions::Regex};

//
// Linear system: rows[i] = coefficients of R_0, ..., R_n-1 plus a constant
//
#[derive(Debug)]
struct LinearSystem {
    coeffs: Vec<Vec<Regex>>,
    constants: Vec<Regex>,
}

impl LinearSystem {
    // build the system with the initial state as row 0
    fn new(dfa: &Dfa) -> Self {
        let n = dfa.num_states();
        let initial = dfa.initial_index();
        let mut order: Vec<usize> = vec![initial];
        order.extend((0..n).filter(|&i| i != initial));
        let mut row_of = vec![0; n];
        for (k, &i) in order.iter().enumerate() {
            row_of[i] = k;
        }

        let mut coeffs = vec![vec![Regex::empty_set(); n]; n];
        let mut constants = Vec::with_capacity(n);
        for (k, &i) in order.iter().enumerate() {
            let state = dfa.state(i);
            for (c, j) in state.transitions() {
                let cell = &mut coeffs[k][row_of[j]];
                *cell = cell.union(&Regex::prim(c));
            }
            constants.push(if state.is_final() {
                Regex::empty_word()
            } else {
                Regex::empty_set()
            });
        }
        LinearSystem { coeffs, constants }
    }

    // replace row k by its solution in terms of rows 0..k-1 then substitute it into these rows
    fn eliminate(&mut self, k: usize) {
        let self_loop = std::mem::replace(&mut self.coeffs[k][k], Regex::empty_set());
        if !self_loop.is_empty_set() {
            let prefix = self_loop.star();
            for j in 0..k {
                self.coeffs[k][j] = prefix.concat(&self.coeffs[k][j]);
            }
            self.constants[k] = prefix.concat(&self.constants[k]);
        }
        for i in 0..k {
            let a = std::mem::replace(&mut self.coeffs[i][k], Regex::empty_set());
            if a.is_empty_set() {
                continue;
            }
            for j in 0..k {
                let term = a.concat(&self.coeffs[k][j]);
                self.coeffs[i][j] = self.coeffs[i][j].union(&term);
            }
            let term = a.concat(&self.constants[k]);
            self.constants[i] = self.constants[i].union(&term);
        }
        trace!(row = k, solution = %self.constants[k], "eliminated state");
    }

    fn solve(mut self) -> Regex {
        for k in (1..self.constants.len()).rev() {
            self.eliminate(k);
        }
        self.coeffs[0][0].star().concat(&self.constants[0])
    }
}

impl Dfa {
    ///
    /// Regular expression for the language accepted by this automaton
    ///
    /// The expression is obtained by state elimination. It's built from the
    /// transition symbols as is, so its text can be parsed back only if no
    /// symbol is an operator of the regex syntax.
    ///
    /// # Example
    ///
    /// ```
    /// use rlsm::automata::Dfa;
    ///
    /// let dfa: Dfa = "}*s1-a->s1".parse().unwrap();
    /// assert_eq!(dfa.to_regex().to_string(), "a*");
    /// ```
    pub fn to_regex(&self) -> Regex {
        if self.num_final_states() == 0 {
            return Regex::empty_set();
        }
        let mut dfa = self.clone();
        dfa.remove_unreachable_states();
        dfa.remove_dead_states(false);
        let result = LinearSystem::new(&dfa).solve();
        debug!(states = dfa.num_states(), regex = %result, "regex from automaton");
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dfa(s: &str) -> Dfa {
        s.parse().unwrap()
    }

    fn regex(s: &str) -> Regex {
        s.parse().unwrap()
    }

    #[test]
    fn test_trivial_automata() {
        assert!(dfa("}s1").to_regex().is_empty_set());
        assert!(dfa("}s1-a->s2 s2-b->s1").to_regex().is_empty_set());
        assert_eq!(dfa("}*s1").to_regex().to_string(), "&");
        assert_eq!(dfa("}*s1-a->s1").to_regex().to_string(), "a*");
        assert_eq!(dfa("}s1-a->*s2").to_regex().to_string(), "a");
        assert_eq!(dfa("}s1-a,b->*s2").to_regex().to_string(), "a|b");
    }

    #[test]
    fn test_example() {
        let a = dfa("}s1-a->s2 s2-a->*s3 s3-b->s2");
        let r = a.to_regex();
        println!("{a} --> {r}");
        for w in ["aa", "aaba", "aababa", "a", "aab", "", "b", "aabb"] {
            assert_eq!(r.accepts(w), a.accepts(w), "word {w:?}");
        }
        assert!(r.to_dfa().is_equivalent_to(&a));
    }

    #[test]
    fn test_unreachable_and_dead_states() {
        let a = dfa("}p-a->*q q-b->r r-a->r u-a->*q");
        let r = a.to_regex();
        println!("{a} --> {r}");
        assert_eq!(r.to_string(), "a");
    }

    #[test]
    fn test_round_trip() {
        for s in [
            "a*",
            "(a|b)aa*(&|b)a*",
            "(ab|c)*d",
            "a(b|c)*|ba*",
            "((a|b)(a|b))*",
            "&|ab",
            "(aa)*|(aaa)*",
        ] {
            let r = regex(s);
            let back = r.to_dfa().to_regex();
            println!("{r} --> {back}");
            assert_eq!(back, r);
        }
    }
}
