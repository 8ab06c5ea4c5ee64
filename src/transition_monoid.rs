// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Transition monoids and syntactic monoids of automata
//!
//! Every word w induces a function f_w on the states of a complete automaton:
//! f_w(q) is the state reached from q by reading w. The transition monoid is
//! the set of these functions with composition `f_uv = f_v ∘ f_u`. Each element
//! is named by the shortest word that induces it (the first in alphabetical order
//! if there are several). The identity is induced by the empty word.
//!
//! The syntactic monoid of a language is the transition monoid of its minimal
//! automaton.
//!

use std::collections::HashSet;

use tracing::debug;

use crate::{automata::Dfa, bfs_queues::BfsQueue, monoid::Monoid};

// names tried for the identity
const IDENTITY_NAMES: [&str; 4] = ["1", "id", "e", "&"];

fn identity_name(words: &HashSet<&str>) -> String {
    let mut name = IDENTITY_NAMES
        .iter()
        .find(|n| !words.contains(*n))
        .map_or_else(|| IDENTITY_NAMES[0].to_string(), |n| n.to_string());
    while words.contains(name.as_str()) {
        name.push('\'');
    }
    name
}

impl Dfa {
    ///
    /// Transition monoid of the automaton
    ///
    /// The automaton is completed first if needed. The identity is named `1`
    /// unless `1` is also a word that names another element. In this case,
    /// the identity is named `id`, `e`, or `&`, whichever is free first.
    ///
    /// # Example
    ///
    /// ```
    /// use rlsm::automata::Dfa;
    ///
    /// let dfa: Dfa = "}*s1-a->s2 s2-a->s1".parse().unwrap();
    /// let m = dfa.transition_monoid();
    /// assert_eq!(m.elements(), &["1", "a"]);
    /// assert!(m.is_group());
    /// ```
    pub fn transition_monoid(&self) -> Monoid {
        let dfa = self.completed();
        let n = dfa.num_states();
        let alphabet = dfa.alphabet();

        // explore the functions in breadth-first order, symbols in alphabetical order
        let mut queue: BfsQueue<Vec<usize>> = BfsQueue::new();
        let mut words: Vec<String> = Vec::new();
        queue.push((0..n).collect());
        words.push(String::new());
        while let Some(i) = queue.pop() {
            for &c in alphabet {
                let g: Vec<usize> = queue
                    .get(i)
                    .iter()
                    .map(|&q| dfa.next(q, c).unwrap_or(q))
                    .collect();
                if queue.push(g).1 {
                    let word = format!("{}{}", words[i], c);
                    words.push(word);
                }
            }
        }

        let functions = queue.into_elements();
        let order = functions.len();
        let mut table = Vec::with_capacity(order * order);
        let mut index = std::collections::HashMap::with_capacity(order);
        for (i, f) in functions.iter().enumerate() {
            index.insert(f.as_slice(), i);
        }
        for f in &functions {
            for g in &functions {
                let h: Vec<usize> = f.iter().map(|&q| g[q]).collect();
                table.push(index.get(h.as_slice()).copied().unwrap_or(0));
            }
        }

        let identity = {
            let used: HashSet<&str> = words.iter().skip(1).map(|w| w.as_str()).collect();
            identity_name(&used)
        };
        words[0] = identity;
        debug!(states = n, order, "transition monoid");
        Monoid::from_raw(words, table)
    }

    ///
    /// Syntactic monoid of the language accepted by the automaton
    ///
    /// This is the transition monoid of the minimal automaton.
    ///
    pub fn syntactic_monoid(&self) -> Monoid {
        self.minimized().transition_monoid()
    }
}
