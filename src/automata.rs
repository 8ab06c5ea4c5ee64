// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Deterministic finite-state automata
//!
//! States are stored in an array and indexed by an integer from 0 to N-1 where
//! N is the number of states. Each state has a label, a final flag, and a partial
//! transition function from the alphabet to state indices: a state may have no
//! successor for some symbols. An automaton where every state has a successor
//! for every symbol is complete.
//!
//! The alphabet is a sorted list of characters. It may contain symbols that
//! don't label any transition.
//!
//! Automata are usually written in the notation of module [dfa_notation](crate::dfa_notation):
//! ```
//! use rlsm::automata::Dfa;
//!
//! let dfa: Dfa = "}s1-a->s2 s2-a->*s3 s3-b->s2".parse().unwrap();
//! assert!(dfa.accepts("aaba"));
//! assert!(!dfa.accepts("aab"));
//! ```
//!
//! The label [TRAP] is reserved for the sink state added by [Dfa::complete].
//!

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    convert::TryFrom,
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    bfs_queues::BfsQueue, combinatorics::permutations, dfa_notation, errors::DfaError,
    minimizer::Minimizer, partitions::Partition,
};

/// Label of the sink state added by completion
pub const TRAP: &str = "trap";

///
/// Deterministic finite state automaton
///
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dfa {
    // sorted, no duplicates
    alphabet: Vec<char>,
    // array of states
    states: Vec<State>,
    // index of the initial state
    initial: usize,
}

///
/// State of an automaton
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    label: String,
    is_final: bool,
    // successor index for every symbol that has a transition
    next: BTreeMap<char, usize>,
}

//
// Remap structure for removing or merging states
// - for every old state i: new_id[i] = new id for i or None if i is removed
// - for every new state j: old_id[j] = old state that's the representative of j
//
#[derive(Debug)]
struct StateMapping {
    new_id: Vec<Option<usize>>,
    old_id: Vec<usize>,
}

impl StateMapping {
    // Build a mapping from an array of states to keep
    // - states_to_keep must not contain duplicates
    // - the mapping assigns new id k to state j such that states_to_keep[k] = j.
    fn from_array(num_states: usize, states_to_keep: &[usize]) -> Self {
        let mut new_id = vec![None; num_states];
        for (i, &s) in states_to_keep.iter().enumerate() {
            new_id[s] = Some(i);
        }
        StateMapping {
            new_id,
            old_id: states_to_keep.to_vec(),
        }
    }

    //
    // Build a mapping from a state partition
    // - the blocks to keep are numbered in the order given
    // - the representative of a block is its smallest element
    // - states in other blocks are removed
    //
    fn from_partition(p: &Partition, blocks: &[u32]) -> Self {
        let mut new_id = vec![None; p.size() as usize];
        let mut old_id = Vec::with_capacity(blocks.len());
        for (k, &b) in blocks.iter().enumerate() {
            for s in p.block_elements(b) {
                new_id[s as usize] = Some(k);
            }
            old_id.push(p.min_element(b) as usize);
        }
        StateMapping { new_id, old_id }
    }

    // Number of new states
    fn num_new_states(&self) -> usize {
        self.old_id.len()
    }
}

// first label of the form base, base', base'', ... not in the set
pub(crate) fn unique_label(base: String, used: &BTreeSet<String>) -> String {
    let mut label = base;
    while used.contains(&label) {
        label.push('\'');
    }
    label
}

impl State {
    pub(crate) fn new(label: String, is_final: bool, next: BTreeMap<char, usize>) -> Self {
        State {
            label,
            is_final,
            next,
        }
    }

    /// Label of this state
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check whether a state is final
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Index of the successor for symbol c if any
    pub fn next(&self, c: char) -> Option<usize> {
        self.next.get(&c).copied()
    }

    /// Transitions from this state as pairs (symbol, successor index) sorted by symbol
    pub fn transitions(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.next.iter().map(|(&c, &s)| (c, s))
    }

    // Apply a remapping: transitions to removed states are dropped
    fn remap(&self, remap: &StateMapping) -> Self {
        let next = self
            .next
            .iter()
            .filter_map(|(&c, &s)| remap.new_id[s].map(|t| (c, t)))
            .collect();
        State {
            label: self.label.clone(),
            is_final: self.is_final,
            next,
        }
    }
}

impl Dfa {
    ///
    /// Build an automaton from its parts
    /// - the states must be deterministic and refer to valid indices
    ///
    pub(crate) fn from_parts(alphabet: BTreeSet<char>, states: Vec<State>, initial: usize) -> Self {
        debug_assert!(initial < states.len());
        Dfa {
            alphabet: alphabet.into_iter().collect(),
            states,
            initial,
        }
    }

    /// The alphabet, sorted
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Number of states
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Number of final states
    pub fn num_final_states(&self) -> usize {
        self.states.iter().filter(|s| s.is_final).count()
    }

    /// Index of the initial state
    pub fn initial_index(&self) -> usize {
        self.initial
    }

    /// Label of the initial state
    pub fn initial_state(&self) -> &str {
        &self.states[self.initial].label
    }

    /// Get a state from its index
    /// panics if the index is out of range
    pub fn state(&self, i: usize) -> &State {
        &self.states[i]
    }

    /// All states in index order
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Labels of all states in index order
    pub fn state_labels(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.label.as_str()).collect()
    }

    /// Labels of the final states in index order
    pub fn final_states(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|s| s.is_final)
            .map(|s| s.label.as_str())
            .collect()
    }

    ///
    /// All transitions as triples (source, target, symbol)
    ///
    /// Sorted by source index then by symbol.
    ///
    pub fn transitions(&self) -> Vec<(&str, &str, char)> {
        let mut result = Vec::new();
        for s in &self.states {
            for (c, t) in s.transitions() {
                result.push((s.label.as_str(), self.states[t].label.as_str(), c));
            }
        }
        result
    }

    ///
    /// Index of a state given its label
    ///
    pub fn state_index(&self, label: &str) -> Result<usize, DfaError> {
        self.states
            .iter()
            .position(|s| s.label == label)
            .ok_or_else(|| DfaError::UnknownState(label.to_string()))
    }

    /// Successor of state i via symbol c, if any
    pub fn next(&self, i: usize, c: char) -> Option<usize> {
        self.states[i].next(c)
    }

    // state reached from i by reading word
    pub(crate) fn run(&self, i: usize, word: &str) -> Option<usize> {
        word.chars().try_fold(i, |s, c| self.next(s, c))
    }

    ///
    /// State reached by reading a word from a given state
    /// - return None if a transition is missing
    ///
    pub fn process_from(&self, label: &str, word: &str) -> Result<Option<&str>, DfaError> {
        let i = self.state_index(label)?;
        Ok(self.run(i, word).map(|s| self.states[s].label.as_str()))
    }

    ///
    /// State reached by reading a word from the initial state
    ///
    pub fn process(&self, word: &str) -> Option<&str> {
        self.run(self.initial, word).map(|s| self.states[s].label.as_str())
    }

    /// Check whether a word is accepted
    pub fn accepts(&self, word: &str) -> bool {
        match self.run(self.initial, word) {
            Some(s) => self.states[s].is_final,
            None => false,
        }
    }

    ///
    /// Map induced by a word on the states
    /// - element i is the state reached from state i, if any
    ///
    pub fn transition_function(&self, word: &str) -> Vec<Option<&str>> {
        (0..self.num_states())
            .map(|i| self.run(i, word).map(|s| self.states[s].label.as_str()))
            .collect()
    }

    ///
    /// Check whether every state has a successor for every symbol
    ///
    pub fn is_complete(&self) -> bool {
        let n = self.alphabet.len();
        self.states.iter().all(|s| s.next.len() == n)
    }

    // reachable[i] is true if state i is reachable from the initial state
    fn reachable(&self) -> Vec<bool> {
        let mut result = vec![false; self.num_states()];
        let mut queue = BfsQueue::new();
        queue.push(self.initial);
        while let Some(k) = queue.pop() {
            let i = *queue.get(k);
            result[i] = true;
            for (_, t) in self.states[i].transitions() {
                queue.push(t);
            }
        }
        result
    }

    // productive[i] is true if a final state is reachable from state i
    fn productive(&self) -> Vec<bool> {
        let mut result: Vec<bool> = self.states.iter().map(|s| s.is_final).collect();
        let mut changed = true;
        while changed {
            changed = false;
            for (i, s) in self.states.iter().enumerate() {
                if !result[i] && s.next.values().any(|&t| result[t]) {
                    result[i] = true;
                    changed = true;
                }
            }
        }
        result
    }

    // dead[i] is true if state i is not initial and can't reach a final state
    fn dead(&self) -> Vec<bool> {
        let productive = self.productive();
        (0..self.num_states())
            .map(|i| i != self.initial && !productive[i])
            .collect()
    }

    ///
    /// Labels of the dead states
    ///
    /// A state is dead if no final state is reachable from it. The
    /// initial state is never considered dead.
    ///
    pub fn dead_states(&self) -> Vec<&str> {
        let dead = self.dead();
        self.states
            .iter()
            .enumerate()
            .filter(|(i, _)| dead[*i])
            .map(|(_, s)| s.label.as_str())
            .collect()
    }

    /// Check whether a state is dead
    pub fn is_dead(&self, label: &str) -> Result<bool, DfaError> {
        let i = self.state_index(label)?;
        Ok(self.dead()[i])
    }

    /// Labels of the states that are not reachable from the initial state
    pub fn unreachable_states(&self) -> Vec<&str> {
        let reachable = self.reachable();
        self.states
            .iter()
            .enumerate()
            .filter(|(i, _)| !reachable[*i])
            .map(|(_, s)| s.label.as_str())
            .collect()
    }

    /// Check whether a state is reachable from the initial state
    pub fn is_reachable(&self, label: &str) -> Result<bool, DfaError> {
        let i = self.state_index(label)?;
        Ok(self.reachable()[i])
    }

    /// Check whether all states are reachable
    pub fn is_connected(&self) -> bool {
        self.reachable().iter().all(|&b| b)
    }

    /// Apply a remapping
    fn remap_states(&mut self, remap: &StateMapping) {
        let mut new_states = Vec::with_capacity(remap.num_new_states());
        for &old_id in &remap.old_id {
            new_states.push(self.states[old_id].remap(remap));
        }
        // the initial state is never removed
        self.initial = remap.new_id[self.initial].unwrap_or(0);
        self.states = new_states;
    }

    // keep the states for which keep[i] is true, in the same order
    fn retain_states(&mut self, keep: &[bool]) {
        let to_keep: Vec<usize> = (0..self.num_states()).filter(|&i| keep[i]).collect();
        if to_keep.len() < self.num_states() {
            let remap = StateMapping::from_array(self.num_states(), &to_keep);
            self.remap_states(&remap);
        }
    }

    /// Remove unreachable states
    pub fn remove_unreachable_states(&mut self) {
        let reachable = self.reachable();
        self.retain_states(&reachable);
    }

    ///
    /// Remove dead states and the transitions that lead to them
    /// - if keep_trap is true, a state labeled [TRAP] is not removed
    ///
    pub fn remove_dead_states(&mut self, keep_trap: bool) {
        let dead = self.dead();
        let keep: Vec<bool> = self
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| !dead[i] || (keep_trap && s.label == TRAP))
            .collect();
        self.retain_states(&keep);
    }

    ///
    /// Make the automaton complete
    ///
    /// If a transition is missing, a non-final sink state labeled [TRAP] is added
    /// and all missing transitions go to that state. Nothing changes if the
    /// automaton is already complete.
    ///
    pub fn complete(&mut self) {
        if self.is_complete() {
            return;
        }
        let trap = self.num_states();
        let used: BTreeSet<String> = self.states.iter().map(|s| s.label.clone()).collect();
        let label = unique_label(TRAP.to_string(), &used);
        for s in self.states.iter_mut() {
            for &c in &self.alphabet {
                s.next.entry(c).or_insert(trap);
            }
        }
        let next = self.alphabet.iter().map(|&c| (c, trap)).collect();
        self.states.push(State::new(label, false, next));
    }

    /// Complete copy of this automaton
    pub fn completed(&self) -> Dfa {
        let mut result = self.clone();
        result.complete();
        result
    }

    // renumber the states in breadth-first order from the initial state
    fn sort_states_bfs(&mut self) {
        let mut queue = BfsQueue::new();
        queue.push(self.initial);
        while let Some(k) = queue.pop() {
            let i = *queue.get(k);
            for (_, t) in self.states[i].transitions() {
                queue.push(t);
            }
        }
        let mut order = queue.into_elements();
        for i in 0..self.num_states() {
            if !order.contains(&i) {
                order.push(i);
            }
        }
        let remap = StateMapping::from_array(self.num_states(), &order);
        self.remap_states(&remap);
    }

    ///
    /// Give the states new labels "0", "1", ... in index order
    ///
    pub fn rename_states(&mut self) {
        for (i, s) in self.states.iter_mut().enumerate() {
            s.label = i.to_string();
        }
    }

    //
    // Build the quotient automaton for a partition of [0 .. n] where n is a sink
    // state if sink is true. The block of the sink is dropped unless it contains
    // the initial state.
    //
    fn quotient(&self, p: &Partition, sink: bool) -> (Vec<State>, usize) {
        let n = self.num_states() as u32;
        let initial_block = p.block_id(self.initial as u32);
        let dropped = if sink { p.block_id(n) } else { 0 };

        if dropped == initial_block {
            // empty language
            let label = self.states[self.initial].label.clone();
            return (vec![State::new(label, false, BTreeMap::new())], 0);
        }

        let mut blocks: Vec<u32> = (1..p.num_blocks()).filter(|&b| b != dropped).collect();
        blocks.sort_by_key(|&b| p.min_element(b));
        let remap = StateMapping::from_partition(p, &blocks);

        let mut used = BTreeSet::new();
        let mut states = Vec::with_capacity(blocks.len());
        for (k, &b) in blocks.iter().enumerate() {
            let mut members: Vec<u32> = p.block_elements(b).filter(|&s| s < n).collect();
            members.sort_unstable();
            let label: String = members
                .iter()
                .map(|&s| self.states[s as usize].label.as_str())
                .collect();
            let label = unique_label(label, &used);
            used.insert(label.clone());
            let rep = &self.states[remap.old_id[k]];
            states.push(State::new(label, rep.is_final, rep.remap(&remap).next));
        }
        let initial = remap.new_id[self.initial].unwrap_or(0);
        (states, initial)
    }

    ///
    /// Minimize the automaton
    ///
    /// Unreachable states are removed and equivalent states are merged. A merged
    /// state is labeled by the concatenation of the labels of its members.
    /// If the automaton is complete, the result is complete. Otherwise, the dead
    /// states are removed. The states of the result are sorted in breadth-first
    /// order from the initial state.
    ///
    pub fn minimize(&mut self) {
        let before = self.num_states();
        self.remove_unreachable_states();
        let complete = self.is_complete();

        let (states, initial) = {
            let n = self.num_states() as u32;
            // state n is a virtual sink for the missing transitions
            let size = if complete { n } else { n + 1 };
            let alphabet = &self.alphabet;
            let states = &self.states;
            let delta = |s: u32, c: u32| -> u32 {
                if s == n {
                    return n;
                }
                match states[s as usize].next(alphabet[c as usize]) {
                    Some(t) => t as u32,
                    None => n,
                }
            };
            let is_final = |s: u32| s < n && states[s as usize].is_final;
            let mut minimizer = Minimizer::new(size, alphabet.len() as u32, delta, is_final);
            let p = minimizer.refine();
            self.quotient(p, !complete)
        };
        self.states = states;
        self.initial = initial;
        self.sort_states_bfs();
        debug!(before, after = self.num_states(), complete, "minimized automaton");
    }

    /// Minimal copy of this automaton
    pub fn minimized(&self) -> Dfa {
        let mut result = self.clone();
        result.minimize();
        result
    }

    ///
    /// Check whether the automaton is minimal
    ///
    pub fn is_minimal(&self) -> bool {
        self.minimized().num_states() == self.num_states()
    }

    // all states must be mapped
    fn is_isomorphism(&self, other: &Dfa, map: &[Option<usize>]) -> bool {
        if map[self.initial] != Some(other.initial) {
            return false;
        }
        self.states.iter().enumerate().all(|(i, s)| match map[i] {
            None => false,
            Some(j) => {
                let t = &other.states[j];
                s.is_final == t.is_final
                    && s.next.len() == t.next.len()
                    && s.transitions().all(|(c, x)| t.next(c).is_some() && t.next(c) == map[x])
            }
        })
    }

    // Extend a partial bijection from the pair (p, q): the successors of
    // mapped states are forced. Return false on a conflict.
    fn propagate(&self, other: &Dfa, p: usize, q: usize, map: &mut [Option<usize>], used: &mut [bool]) -> bool {
        let mut pending = vec![(p, q)];
        while let Some((p, q)) = pending.pop() {
            match map[p] {
                Some(j) if j == q => continue,
                Some(_) => return false,
                None => {
                    if used[q] || self.states[p].is_final != other.states[q].is_final {
                        return false;
                    }
                    map[p] = Some(q);
                    used[q] = true;
                }
            }
            for &c in &self.alphabet {
                match (self.next(p, c), other.next(q, c)) {
                    (None, None) => (),
                    (Some(x), Some(y)) => pending.push((x, y)),
                    _ => return false,
                }
            }
        }
        true
    }

    ///
    /// Check whether two automata are equal up to renaming of the states
    ///
    pub fn is_isomorphic_to(&self, other: &Dfa) -> bool {
        let n = self.num_states();
        if self.alphabet != other.alphabet
            || n != other.num_states()
            || self.num_final_states() != other.num_final_states()
        {
            return false;
        }
        let mut map = vec![None; n];
        let mut used = vec![false; n];
        if !self.propagate(other, self.initial, other.initial, &mut map, &mut used) {
            return false;
        }
        // states not reachable from the initial state: try all bijections
        let rest: Vec<usize> = (0..n).filter(|&i| map[i].is_none()).collect();
        let free: Vec<usize> = (0..n).filter(|&j| !used[j]).collect();
        permutations(free).any(|p| {
            let mut m = map.clone();
            for (&i, j) in rest.iter().zip(p) {
                m[i] = Some(j);
            }
            self.is_isomorphism(other, &m)
        })
    }

    ///
    /// Check whether two automata accept the same language
    ///
    pub fn is_equivalent_to(&self, other: &Dfa) -> bool {
        self.minimized().is_isomorphic_to(&other.minimized())
    }

    // copy with alphabet[i] replaced by symbols[i]
    fn rename_symbols(&self, symbols: &[char]) -> Dfa {
        let map: BTreeMap<char, char> = self.alphabet.iter().copied().zip(symbols.iter().copied()).collect();
        let states = self
            .states
            .iter()
            .map(|s| {
                let next = s.next.iter().map(|(c, &t)| (map[c], t)).collect();
                State::new(s.label.clone(), s.is_final, next)
            })
            .collect();
        Dfa::from_parts(symbols.iter().copied().collect(), states, self.initial)
    }

    ///
    /// Check whether two automata accept the same language up to a renaming of the symbols
    ///
    /// For example, the languages `{aab}` and `{bba}` are similar.
    ///
    pub fn is_similar_to(&self, other: &Dfa) -> bool {
        let a = self.minimized();
        let b = other.minimized();
        if a.alphabet.len() != b.alphabet.len()
            || a.num_states() != b.num_states()
            || a.num_final_states() != b.num_final_states()
        {
            return false;
        }
        let found = permutations(b.alphabet.iter().copied()).find(|p| a.rename_symbols(p).is_isomorphic_to(&b));
        if let Some(p) = &found {
            debug!(from = ?a.alphabet, to = ?p, "similar automata");
        }
        found.is_some()
    }
}

///
/// Structural equality: same alphabet, same labels, same initial and final states, and
/// same transitions. The order of the states doesn't matter.
///
impl PartialEq for Dfa {
    fn eq(&self, other: &Self) -> bool {
        fn transition_set(a: &Dfa) -> BTreeSet<(&str, &str, char)> {
            a.transitions().into_iter().collect()
        }
        fn final_set(a: &Dfa) -> BTreeSet<&str> {
            a.final_states().into_iter().collect()
        }
        fn label_set(a: &Dfa) -> BTreeSet<&str> {
            a.state_labels().into_iter().collect()
        }
        self.alphabet == other.alphabet
            && self.num_states() == other.num_states()
            && self.initial_state() == other.initial_state()
            && label_set(self) == label_set(other)
            && final_set(self) == final_set(other)
            && transition_set(self) == transition_set(other)
    }
}

impl Eq for Dfa {}

impl FromStr for Dfa {
    type Err = DfaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        dfa_notation::parse(s)
    }
}

impl TryFrom<String> for Dfa {
    type Error = DfaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        dfa_notation::parse(&s)
    }
}

impl From<Dfa> for String {
    fn from(a: Dfa) -> Self {
        a.to_string()
    }
}

///
/// The automaton in DFA notation: all states first, then the transitions
///
/// The alphabet is declared first, as in `{a,b}`, if some symbols label no transition.
///
impl Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used: BTreeSet<char> = self.states.iter().flat_map(|s| s.next.keys().copied()).collect();
        if used.len() < self.alphabet.len() {
            let symbols: Vec<String> = self.alphabet.iter().map(|c| c.to_string()).collect();
            write!(f, "{{{}}} ", symbols.join(","))?;
        }
        for (i, s) in self.states.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if i == self.initial {
                write!(f, "}}")?;
            }
            if s.is_final {
                write!(f, "*")?;
            }
            write!(f, "{}", s.label)?;
        }
        for s in &self.states {
            // group the symbols by target
            let mut by_target: BTreeMap<usize, Vec<char>> = BTreeMap::new();
            for (c, t) in s.transitions() {
                by_target.entry(t).or_default().push(c);
            }
            for (t, symbols) in by_target {
                let labels: Vec<String> = symbols.iter().map(|c| c.to_string()).collect();
                write!(f, " {}-{}->{}", s.label, labels.join(","), self.states[t].label)?;
            }
        }
        Ok(())
    }
}

//
// Builder
//

#[derive(Debug)]
struct StateInConstruction {
    label: String,
    is_final: bool,
    next: BTreeMap<char, usize>,
}

///
/// Automaton builder
///
/// States are created on first use. The state labels must be distinct from [TRAP].
///
#[derive(Debug, Default)]
pub struct DfaBuilder {
    id_map: HashMap<String, usize>,
    states: Vec<StateInConstruction>,
    alphabet: BTreeSet<char>,
    initial: Option<usize>,
}

impl DfaBuilder {
    ///
    /// Create a new builder
    ///
    pub fn new() -> Self {
        Self::default()
    }

    fn get_state_id(&mut self, label: &str) -> Result<usize, DfaError> {
        if let Some(&i) = self.id_map.get(label) {
            return Ok(i);
        }
        if label == TRAP {
            return Err(DfaError::ReservedTrapName(label.to_string()));
        }
        let i = self.states.len();
        self.states.push(StateInConstruction {
            label: label.to_string(),
            is_final: false,
            next: BTreeMap::new(),
        });
        self.id_map.insert(label.to_string(), i);
        Ok(i)
    }

    ///
    /// Add a state (no-op if the state exists)
    ///
    pub fn add_state(&mut self, label: &str) -> Result<&mut Self, DfaError> {
        self.get_state_id(label)?;
        Ok(self)
    }

    ///
    /// Mark the initial state
    ///
    /// Fails if another state is already marked initial.
    ///
    pub fn mark_initial(&mut self, label: &str) -> Result<&mut Self, DfaError> {
        let i = self.get_state_id(label)?;
        match self.initial {
            Some(j) if j != i => Err(DfaError::MultipleInitialStates(
                self.states[j].label.clone(),
                label.to_string(),
            )),
            _ => {
                self.initial = Some(i);
                Ok(self)
            }
        }
    }

    ///
    /// Mark a final state
    ///
    pub fn mark_final(&mut self, label: &str) -> Result<&mut Self, DfaError> {
        let i = self.get_state_id(label)?;
        self.states[i].is_final = true;
        Ok(self)
    }

    ///
    /// Add a symbol to the alphabet
    ///
    pub fn add_symbol(&mut self, c: char) -> &mut Self {
        self.alphabet.insert(c);
        self
    }

    ///
    /// Add a transition
    ///
    /// Adding the same transition twice is allowed. Fails if the source state already
    /// has a transition to a different state for the same symbol.
    ///
    pub fn add_transition(&mut self, source: &str, symbol: char, target: &str) -> Result<&mut Self, DfaError> {
        let i = self.get_state_id(source)?;
        let j = self.get_state_id(target)?;
        match self.states[i].next.get(&symbol) {
            Some(&k) if k != j => Err(DfaError::NonDeterministicTransition {
                state: source.to_string(),
                symbol,
                first: self.states[k].label.clone(),
                second: target.to_string(),
            }),
            _ => {
                self.states[i].next.insert(symbol, j);
                self.alphabet.insert(symbol);
                Ok(self)
            }
        }
    }

    ///
    /// Construct the automaton
    /// - fails if no initial state is marked
    ///
    pub fn build(&self) -> Result<Dfa, DfaError> {
        let initial = self.initial.ok_or(DfaError::NoInitialState)?;
        let states = self
            .states
            .iter()
            .map(|s| State::new(s.label.clone(), s.is_final, s.next.clone()))
            .collect();
        Ok(Dfa::from_parts(self.alphabet.clone(), states, initial))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dfa(s: &str) -> Dfa {
        s.parse().unwrap()
    }

    //
    // Test automaton:
    // 5 states, s0 is initial, s3 is the only final state
    // s4 is a sink
    //
    fn graph() -> Vec<(&'static str, char, &'static str)> {
        vec![
            ("s0", 'a', "s0"),
            ("s0", 'b', "s1"),
            ("s0", 'c', "s2"),
            ("s1", 'a', "s3"),
            ("s1", 'c', "s2"),
            ("s2", 'b', "s3"),
            ("s2", 'c', "s3"),
            ("s3", 'a', "s0"),
            ("s3", 'b', "s1"),
            ("s3", 'c', "s3"),
            ("s1", 'b', "s4"),
            ("s4", 'a', "s4"),
        ]
    }

    fn build_graph() -> Dfa {
        let mut builder = DfaBuilder::new();
        for (source, label, dest) in graph() {
            builder.add_transition(source, label, dest).unwrap();
        }
        builder.mark_initial("s0").unwrap().mark_final("s3").unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_builder() {
        let automaton = build_graph();
        println!("Result automaton: {automaton}");

        assert_eq!(automaton.num_states(), 5);
        assert_eq!(automaton.initial_state(), "s0");
        assert_eq!(automaton.final_states(), vec!["s3"]);
        assert_eq!(automaton.alphabet(), &['a', 'b', 'c']);
        assert_eq!(automaton.process("bc"), Some("s2"));
        assert_eq!(automaton.process("ca"), None);
        assert_eq!(automaton.process_from("s2", "ba").unwrap(), Some("s0"));
        assert!(automaton.process_from("s9", "a").is_err());
        assert!(automaton.accepts("ba"));
        assert!(automaton.accepts("cbcc"));
        assert!(!automaton.accepts("bb"));
        assert!(!automaton.is_complete());
        assert_eq!(automaton.dead_states(), vec!["s4"]);
        assert!(automaton.is_dead("s4").unwrap());
        assert!(!automaton.is_dead("s0").unwrap());
        assert!(automaton.is_connected());
    }

    #[test]
    fn test_builder_errors() {
        let mut builder = DfaBuilder::new();
        builder.add_transition("p", 'a', "q").unwrap();
        builder.add_transition("p", 'a', "q").unwrap();
        let err = builder.add_transition("p", 'a', "r").unwrap_err();
        println!("{err}");
        assert!(matches!(err, DfaError::NonDeterministicTransition { .. }));

        assert_eq!(builder.build().unwrap_err(), DfaError::NoInitialState);
        builder.mark_initial("p").unwrap();
        builder.mark_initial("p").unwrap();
        assert!(matches!(
            builder.mark_initial("q"),
            Err(DfaError::MultipleInitialStates(_, _))
        ));
        assert_eq!(
            builder.add_state(TRAP).unwrap_err(),
            DfaError::ReservedTrapName(TRAP.to_string())
        );
    }

    #[test]
    fn test_remove_unreachable() {
        let mut automaton = dfa("}s1-a->s2 s2-a->*s3 s4-a->s1 s5 s3-b->s2");
        assert_eq!(automaton.unreachable_states(), vec!["s4", "s5"]);
        assert!(!automaton.is_reachable("s4").unwrap());
        assert!(automaton.is_reachable("s3").unwrap());
        assert!(!automaton.is_connected());

        automaton.remove_unreachable_states();
        println!("After removing unreachable states: {automaton}");
        assert_eq!(automaton.state_labels(), vec!["s1", "s2", "s3"]);
        assert_eq!(automaton, dfa("}s1-a->s2 s2-a->*s3 s3-b->s2"));
    }

    #[test]
    fn test_complete() {
        let mut automaton = dfa("}s1-a->s2 s2-a->*s3 s3-b->s2");
        automaton.complete();
        println!("Complete automaton: {automaton}");
        assert!(automaton.is_complete());
        assert_eq!(automaton.num_states(), 4);
        assert_eq!(automaton.process("b"), Some(TRAP));
        assert_eq!(automaton.process("bab"), Some(TRAP));
        assert_eq!(automaton.dead_states(), vec![TRAP]);

        // completing twice changes nothing
        let copy = automaton.completed();
        assert_eq!(copy, automaton);

        let mut without_trap = automaton.clone();
        without_trap.remove_dead_states(false);
        assert_eq!(without_trap, dfa("}s1-a->s2 s2-a->*s3 s3-b->s2"));

        automaton.remove_dead_states(true);
        assert_eq!(automaton.num_states(), 4);
    }

    #[test]
    fn test_dead_states() {
        let mut automaton = dfa("}s1-a->s2 s1-b->s3 s3-a->s3 s2-a->*s4");
        assert_eq!(automaton.dead_states(), vec!["s3"]);
        automaton.remove_dead_states(false);
        assert_eq!(automaton.state_labels(), vec!["s1", "s2", "s4"]);
        assert_eq!(automaton.transitions(), vec![("s1", "s2", 'a'), ("s2", "s4", 'a')]);
        assert_eq!(automaton.alphabet(), &['a', 'b']);

        // the initial state is never dead
        let empty = dfa("}s1-a->s2");
        assert_eq!(empty.dead_states(), vec!["s2"]);
    }

    #[test]
    fn test_minimize() {
        let mut automaton = dfa("}i -a-> 1 i -b-> 2 1 -b-> 2 2-b->1 1-a->3 2-a->*3");
        assert!(!automaton.is_minimal());
        automaton.minimize();
        println!("Minimized: {automaton}");
        assert_eq!(automaton.num_states(), 3);
        assert!(automaton.is_minimal());
        assert!(automaton.is_isomorphic_to(&dfa("}i-a,b-> 1 1 -b-> 1 1-a->*3")));
        assert_eq!(automaton.state_labels(), vec!["i", "12", "3"]);

        // minimization is idempotent
        let again = automaton.minimized();
        assert_eq!(again, automaton);
    }

    #[test]
    fn test_minimize_complete() {
        // a* over {a, b}, complete with two equivalent sinks
        let mut automaton = dfa("}*p-a->p p-b->q q-a->r q-b->r r-a,b->q");
        assert!(automaton.is_complete());
        automaton.minimize();
        println!("Minimized: {automaton}");
        assert!(automaton.is_complete());
        assert_eq!(automaton.num_states(), 2);
        assert_eq!(automaton.state_labels(), vec!["p", "qr"]);

        // the incomplete version has no sink after minimization
        let mut partial = dfa("}*p-a->p p-b->q q-a->r q-b->r r-a,b->q");
        partial.remove_dead_states(false);
        partial.minimize();
        assert_eq!(partial.num_states(), 1);
        assert!(partial.accepts("aaa"));
        assert!(!partial.accepts("ab"));
    }

    #[test]
    fn test_minimize_empty_language() {
        let mut automaton = dfa("}s1-a->s2 s2-b->s1");
        automaton.minimize();
        assert_eq!(automaton.num_states(), 1);
        assert_eq!(automaton.num_final_states(), 0);
        assert_eq!(automaton.initial_state(), "s1");
        assert!(automaton.transitions().is_empty());
    }

    #[test]
    fn test_isomorphism() {
        let a = dfa("}s1-a->s2 s2-a->*s3 s3-b->s2");
        let b = dfa("}x-a->y y-a->*z z-b->y");
        assert!(a.is_isomorphic_to(&b));
        assert_ne!(a, b);

        let c = dfa("}x-a->y y-a->*z z-a->y");
        assert!(!a.is_isomorphic_to(&c));

        // unreachable parts must match too
        let d = dfa("}s1-a->s2 s2-a->*s3 s3-b->s2 u-a->v");
        let e = dfa("}x-a->y y-a->*z z-b->y w v-a->w");
        assert!(d.is_isomorphic_to(&e));
        let f = dfa("}x-a->y y-a->*z z-b->y w v-a->v");
        assert!(!d.is_isomorphic_to(&f));
    }

    #[test]
    fn test_equivalence() {
        let a = dfa("}s1-a->s2 s2-a->*s3 s3-b->s2");
        let b = dfa("}p-a->q q-a->*r r-b->t t-a->*r");
        assert!(a.is_equivalent_to(&b));
        assert!(!a.is_isomorphic_to(&b));
        assert!(!a.is_equivalent_to(&dfa("}s1-a->*s2 s2-b->s1")));
    }

    #[test]
    fn test_transition_function() {
        let a = dfa("}s1-a->s2 s2-a->*s3 s3-b->s2");
        assert_eq!(a.transition_function("a"), vec![Some("s2"), Some("s3"), None]);
        assert_eq!(a.transition_function(""), vec![Some("s1"), Some("s2"), Some("s3")]);
        assert_eq!(
            a.transitions(),
            vec![("s1", "s2", 'a'), ("s2", "s3", 'a'), ("s3", "s2", 'b')]
        );
    }

    #[test]
    fn test_display_and_serde() {
        let a = dfa("}s1 -a,b-> *s2 s2 -b-> s1");
        let text = a.to_string();
        println!("{text}");
        assert_eq!(text, "}s1 *s2 s1-a,b->s2 s2-b->s1");
        assert_eq!(dfa(&text), a);

        let json = serde_json::to_string(&a).unwrap();
        let back: Dfa = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
        assert!(serde_json::from_str::<Dfa>("\"s1 -a-> s2\"").is_err());

        // symbols without transitions survive a round trip
        let m = dfa("}*p-a->p p-b->q").minimized();
        let text = m.to_string();
        println!("minimized: {text}");
        assert_eq!(text, "{a,b} }*p p-a->p");
        let reparsed = dfa(&text);
        assert_eq!(reparsed.alphabet(), &['a', 'b']);
        assert_eq!(reparsed, m);
        assert!(reparsed.is_isomorphic_to(&m));
        assert_eq!(reparsed.syntactic_monoid().order(), m.syntactic_monoid().order());
        assert_eq!(m.syntactic_monoid().order(), 2);

        let json = serde_json::to_string(&m).unwrap();
        let back: Dfa = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_similarity() {
        let aab = dfa("}0-a->1 1-a->2 2-b->*3");
        let bba = dfa("}p-b->q q-b->r r-a->*s");
        assert!(aab.is_similar_to(&bba));
        assert!(bba.is_similar_to(&aab));
        assert!(!aab.is_equivalent_to(&bba));

        let abb = dfa("}0-a->1 1-b->2 2-b->*3");
        assert!(!aab.is_similar_to(&abb));

        // a*b and b*a, with a redundant state in the second one
        let a_star_b = dfa("}0-a->0 0-b->*1");
        let b_star_a = dfa("}x-b->y y-b->y x-a->*z y-a->*z");
        assert!(a_star_b.is_similar_to(&b_star_a));

        // different alphabet sizes
        assert!(!a_star_b.is_similar_to(&dfa("}0-a->0 0-c->*1 0-d->1")));
    }
}
