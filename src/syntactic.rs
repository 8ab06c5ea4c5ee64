// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Syntactic monoids
//!
//! A subset D of a monoid M is disjunctive if any two distinct elements a and b
//! can be separated by a context: there are x and y in M such that exactly one of
//! x a y and x b y belongs to D. A monoid is syntactic if it has a disjunctive
//! subset. Then it's the syntactic monoid of the language recognized by the
//! automaton built by [Monoid::to_dfa] with D as final states.
//!

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::{
    automata::{unique_label, Dfa, State, TRAP},
    combinatorics::subsets,
    errors::MonoidError,
    monoid::Monoid,
};

// contexts[a] = [x a y for all x, y]
fn contexts(m: &Monoid) -> Vec<Vec<usize>> {
    let n = m.order();
    (0..n)
        .map(|a| {
            let mut v = Vec::with_capacity(n * n);
            for x in 0..n {
                let xa = m.mul(x, a);
                v.extend_from_slice(m.row(xa));
            }
            v
        })
        .collect()
}

// D is disjunctive iff the elements have pairwise distinct membership patterns
fn is_disjunctive(contexts: &[Vec<usize>], n: usize, set: &[usize]) -> bool {
    let mut member = vec![false; n];
    for &d in set {
        member[d] = true;
    }
    let mut seen = HashSet::with_capacity(n);
    contexts
        .iter()
        .all(|c| seen.insert(c.iter().map(|&x| member[x]).collect::<Vec<bool>>()))
}

// the name of g if it's a single character
fn single_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

// n distinct alphanumeric symbols: a, b, ..., z, then other letters
fn fallback_symbols(n: usize) -> Vec<char> {
    ('a'..=char::MAX).filter(|c| c.is_alphanumeric()).take(n).collect()
}

impl Monoid {
    ///
    /// Check whether a set of elements is disjunctive
    ///
    pub fn is_subset_disjunctive<S: AsRef<str>>(&self, set: &[S]) -> Result<bool, MonoidError> {
        let set = self.indices_of(set)?;
        Ok(is_disjunctive(&contexts(self), self.order(), &set))
    }

    fn disjunctive_subset_indices(&self) -> Option<Vec<usize>> {
        let n = self.order();
        let contexts = contexts(self);
        subsets(n).find(|s| is_disjunctive(&contexts, n, s))
    }

    ///
    /// First disjunctive subset by (size, lexicographic) order of element indices
    ///
    /// Return None if the monoid is not syntactic. For the trivial monoid, the
    /// empty set is disjunctive.
    ///
    pub fn disjunctive_subset(&self) -> Option<Vec<String>> {
        self.disjunctive_subset_indices().map(|s| self.names_of(&s))
    }

    ///
    /// All disjunctive subsets in (size, lexicographic) order
    ///
    pub fn all_disjunctive_subsets(&self) -> Vec<Vec<String>> {
        let n = self.order();
        let contexts = contexts(self);
        subsets(n)
            .filter(|s| is_disjunctive(&contexts, n, s))
            .map(|s| self.names_of(&s))
            .collect()
    }

    ///
    /// Check whether the monoid is syntactic
    ///
    pub fn is_syntactic(&self) -> bool {
        self.disjunctive_subset_indices().is_some()
    }

    ///
    /// Automaton built from the monoid
    ///
    /// The states are the elements, the initial state is the identity, and the
    /// alphabet is the generating subset: there's a transition from x to x g for every
    /// generator g. Generators with one-character names are used as symbols. If
    /// a generator has a longer name, the generators are given the symbols
    /// `a, b, c, ...` in order, continued with other alphanumeric characters after `z`.
    /// An element named [TRAP] gets a fresh label since this label is reserved.
    ///
    /// If the monoid is syntactic, the final states must form a disjunctive subset
    /// and they default to [disjunctive_subset](Self::disjunctive_subset) if `finals`
    /// is empty. The transition monoid of the result is then isomorphic to self.
    ///
    /// # Errors
    ///
    /// - [MonoidError::UnknownElement] if a final element doesn't exist
    /// - [MonoidError::InvalidFinals] if the monoid is syntactic and the finals are
    ///   not disjunctive
    ///
    pub fn to_dfa<S: AsRef<str>>(&self, finals: &[S]) -> Result<Dfa, MonoidError> {
        let mut finals = self.indices_of(finals)?;
        if self.is_syntactic() {
            if finals.is_empty() {
                finals = self.disjunctive_subset_indices().unwrap_or_default();
            } else if !is_disjunctive(&contexts(self), self.order(), &finals) {
                return Err(MonoidError::InvalidFinals);
            }
        }

        let generators = self.generating_subset_indices();
        let symbols: Vec<char> = match generators
            .iter()
            .map(|&g| single_char(self.element(g)))
            .collect::<Option<Vec<char>>>()
        {
            Some(chars) => chars,
            None => fallback_symbols(generators.len()),
        };

        let names: BTreeSet<String> = self.elements().iter().cloned().collect();
        let label = |x: usize| {
            let name = self.element(x);
            if name == TRAP {
                unique_label(name.to_string(), &names)
            } else {
                name.to_string()
            }
        };

        let states = (0..self.order())
            .map(|x| {
                let next: BTreeMap<char, usize> = generators
                    .iter()
                    .zip(&symbols)
                    .map(|(&g, &c)| (c, self.mul(x, g)))
                    .collect();
                State::new(label(x), finals.contains(&x), next)
            })
            .collect();
        let alphabet: BTreeSet<char> = symbols.into_iter().collect();
        debug!(order = self.order(), generators = generators.len(), "automaton from monoid");
        Ok(Dfa::from_parts(alphabet, states, 0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn monoid(s: &str) -> Monoid {
        s.parse().unwrap()
    }

    #[test]
    fn test_disjunctive_subsets() {
        let m = monoid("012 112 212");
        assert!(m.is_syntactic());
        let d = m.disjunctive_subset().unwrap();
        println!("disjunctive subset: {d:?}");
        assert_eq!(d, vec!["1"]);
        assert!(m.is_subset_disjunctive(&["1"]).unwrap());
        assert!(!m.is_subset_disjunctive(&["0"]).unwrap());
        assert!(!m.is_subset_disjunctive::<&str>(&[]).unwrap());
        assert!(m.is_subset_disjunctive(&["3"]).is_err());

        let all = m.all_disjunctive_subsets();
        println!("all disjunctive subsets: {all:?}");
        assert!(all.contains(&vec!["1".to_string()]));
        assert!(all.contains(&vec!["2".to_string()]));
        assert!(!all.contains(&vec!["0".to_string()]));
        assert_eq!(all[0], d);
    }

    #[test]
    fn test_not_syntactic() {
        let m = monoid("0123 1111 2111 3111");
        assert!(!m.is_syntactic());
        assert!(m.disjunctive_subset().is_none());
        assert!(m.all_disjunctive_subsets().is_empty());
    }

    #[test]
    fn test_trivial_and_groups() {
        let trivial = monoid("0");
        assert!(trivial.is_syntactic());
        assert_eq!(trivial.disjunctive_subset(), Some(vec![]));

        let z3 = monoid("012 120 201");
        assert!(z3.is_syntactic());
        assert_eq!(z3.disjunctive_subset(), Some(vec!["0".to_string()]));
    }

    #[test]
    fn test_to_dfa() {
        let z3 = monoid("012 120 201");
        let dfa = z3.to_dfa::<&str>(&[]).unwrap();
        println!("automaton for Z3: {dfa}");
        assert_eq!(dfa.alphabet(), &['1']);
        assert_eq!(dfa.state_labels(), vec!["0", "1", "2"]);
        assert_eq!(dfa.initial_state(), "0");
        assert_eq!(dfa.final_states(), vec!["0"]);
        assert!(dfa.accepts("111"));
        assert!(!dfa.accepts("11"));
        assert!(dfa.is_complete());

        assert_eq!(z3.to_dfa(&["1"]).unwrap().final_states(), vec!["1"]);
        assert_eq!(z3.to_dfa(&["0", "1", "2"]).unwrap_err(), MonoidError::InvalidFinals);
        assert!(z3.to_dfa(&["7"]).is_err());

        // not syntactic: any set of finals is accepted
        let m = monoid("0123 1111 2111 3111");
        let dfa = m.to_dfa(&["1", "2"]).unwrap();
        assert_eq!(dfa.alphabet(), &['2', '3']);
        assert_eq!(dfa.final_states(), vec!["1", "2"]);

        // trivial monoid: no generators
        let dfa = monoid("0").to_dfa::<&str>(&[]).unwrap();
        assert!(dfa.alphabet().is_empty());
        assert_eq!(dfa.num_states(), 1);
    }

    #[test]
    fn test_to_dfa_long_names() {
        let m = monoid("id,x1,x2: id,x1,x2 x1,x2,id x2,id,x1");
        let dfa = m.to_dfa::<&str>(&[]).unwrap();
        assert_eq!(dfa.alphabet(), &['a']);
        assert_eq!(dfa.process("a"), Some("x1"));
        assert_eq!(dfa.process("aa"), Some("x2"));
    }

    #[test]
    fn test_fallback_symbols() {
        let symbols = fallback_symbols(40);
        println!("{symbols:?}");
        assert_eq!(symbols.len(), 40);
        assert_eq!(&symbols[..3], &['a', 'b', 'c']);
        assert_eq!(symbols[25], 'z');
        let distinct: BTreeSet<char> = symbols.iter().copied().collect();
        assert_eq!(distinct.len(), 40);
        assert!(symbols.iter().all(|&c| crate::regex_parser::is_symbol(c)));
    }

    #[test]
    fn test_to_dfa_trap_element() {
        let m = monoid("1,trap: 1,trap trap,trap");
        let dfa = m.to_dfa::<&str>(&[]).unwrap();
        println!("{dfa}");
        assert_eq!(dfa.state_labels(), vec!["1", "trap'"]);
        assert_eq!(dfa.alphabet(), &['a']);
        let reparsed: Dfa = dfa.to_string().parse().unwrap();
        assert_eq!(reparsed, dfa);
        assert!(dfa.transition_monoid().is_isomorphic_to(&m));
    }
}
