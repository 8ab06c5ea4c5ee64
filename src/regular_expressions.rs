// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Regular expressions
//!
//! This module defines the abstract syntax of regular expressions [RegexKind]
//! and the regular expression type [Regex]. Regular expressions are parsed from
//! a string with [Regex::new] or built with the constructors [Regex::union],
//! [Regex::concat], and [Regex::star].
//!
//! Syntax: symbols are any characters other than whitespace and `( ) | * & @`.
//! Both `&` and `@` denote the empty word, `|` is union, `*` is the Kleene star,
//! and juxtaposition is concatenation. The empty string (or `()`) denotes the
//! empty set. Whitespace is ignored.
//!
//! Construction normalizes the expression:
//! - `∅` is absorbing in concatenations and neutral in unions
//! - `&` is neutral in concatenations and `&* = ∅* = &`
//! - `X** = X*`, `(X|&)* = X*`, `(X X*)* = (X* X)* = X*`, and `X* X* = X*`
//! - union branches are deduplicated and sorted (`&` first, then by text). A
//!   branch `X` is removed if `X*` is also a branch, and `&` is removed if
//!   another branch contains the empty word.
//!
//! Two expressions with the same canonical text denote the same language but the
//! converse doesn't hold. Equality ([PartialEq]) is semantic: it compares
//! the minimal automata of the two expressions.
//!
//! Every occurrence of a symbol in an expression is a [Position]. Each expression
//! stores its *Glushkov attributes*, computed bottom-up when the expression is built:
//! - nullable: whether the empty word belongs to the language
//! - first: positions that can start a word of the language
//! - last: positions that can end a word of the language
//! - follow: pairs of positions (p, q) such that q can follow p in a word
//!
//! These are used to build an automaton without epsilon transitions, then
//! a deterministic automaton by subset construction.
//!

use std::{
    collections::{BTreeMap, BTreeSet},
    convert::TryFrom,
    fmt::Display,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    automata::{Dfa, State},
    bfs_queues::BfsQueue,
    errors::RegexError,
    monoid::Monoid,
    regex_parser,
};

///
/// Occurrence of a symbol in a regular expression
///
/// Positions are numbered from left to right in the canonical text, starting from 0.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// the symbol
    pub symbol: char,
    /// occurrence index
    pub index: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.symbol, self.index)
    }
}

///
/// Abstract syntax for regular expressions
///
#[derive(Debug, Clone)]
pub enum RegexKind {
    /// Empty language
    EmptySet,

    /// The language that contains only the empty word
    EmptyWord,

    /// A single symbol
    Prim(char),

    /// Kleene closure
    Star(Box<Regex>),

    /// Union of two or more languages
    Union(Vec<Regex>),

    /// Concatenation of two or more languages
    Concat(Vec<Regex>),
}

///
/// Regular expression
///
/// An expression is an abstract syntax tree plus its canonical text and
/// Glushkov attributes. Position indices in `first`, `last`, and `follow` refer
/// to the `symbols` array.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Regex {
    kind: RegexKind,
    text: String,
    nullable: bool,
    symbols: Vec<char>,
    first: BTreeSet<usize>,
    last: BTreeSet<usize>,
    follow: BTreeSet<(usize, usize)>,
}

fn shift(set: &BTreeSet<usize>, offset: usize) -> impl Iterator<Item = usize> + '_ {
    set.iter().map(move |&p| p + offset)
}

// canonical text of a node
fn text_of(kind: &RegexKind) -> String {
    match kind {
        RegexKind::EmptySet => String::new(),
        RegexKind::EmptyWord => "&".to_string(),
        RegexKind::Prim(c) => c.to_string(),
        RegexKind::Star(x) => {
            if x.text.chars().count() == 1 {
                format!("{}*", x.text)
            } else {
                format!("({})*", x.text)
            }
        }
        RegexKind::Union(v) => v.iter().map(|x| x.text.as_str()).collect::<Vec<_>>().join("|"),
        RegexKind::Concat(v) => v
            .iter()
            .map(|x| match x.kind {
                RegexKind::Union(_) => format!("({})", x.text),
                _ => x.text.clone(),
            })
            .collect(),
    }
}

impl Regex {
    //
    // Build a node and compute its attributes
    //
    fn make(kind: RegexKind) -> Self {
        let mut symbols = Vec::new();
        let mut first = BTreeSet::new();
        let mut last = BTreeSet::new();
        let mut follow = BTreeSet::new();
        let nullable = match &kind {
            RegexKind::EmptySet => false,
            RegexKind::EmptyWord => true,
            RegexKind::Prim(c) => {
                symbols.push(*c);
                first.insert(0);
                last.insert(0);
                false
            }
            RegexKind::Star(x) => {
                symbols.extend_from_slice(&x.symbols);
                first.clone_from(&x.first);
                last.clone_from(&x.last);
                follow.clone_from(&x.follow);
                for &l in &x.last {
                    for &f in &x.first {
                        follow.insert((l, f));
                    }
                }
                true
            }
            RegexKind::Union(v) => {
                for x in v {
                    let offset = symbols.len();
                    symbols.extend_from_slice(&x.symbols);
                    first.extend(shift(&x.first, offset));
                    last.extend(shift(&x.last, offset));
                    follow.extend(x.follow.iter().map(|&(p, q)| (p + offset, q + offset)));
                }
                v.iter().any(|x| x.nullable)
            }
            RegexKind::Concat(v) => {
                let mut offsets = Vec::with_capacity(v.len());
                for x in v {
                    let offset = symbols.len();
                    offsets.push(offset);
                    symbols.extend_from_slice(&x.symbols);
                    follow.extend(x.follow.iter().map(|&(p, q)| (p + offset, q + offset)));
                }
                for (x, &offset) in v.iter().zip(&offsets) {
                    first.extend(shift(&x.first, offset));
                    if !x.nullable {
                        break;
                    }
                }
                for (x, &offset) in v.iter().zip(&offsets).rev() {
                    last.extend(shift(&x.last, offset));
                    if !x.nullable {
                        break;
                    }
                }
                // last(v[i]) x first(v[j]) if all factors between i and j are nullable
                for i in 0..v.len() {
                    for j in i + 1..v.len() {
                        for l in shift(&v[i].last, offsets[i]) {
                            follow.extend(shift(&v[j].first, offsets[j]).map(|f| (l, f)));
                        }
                        if !v[j].nullable {
                            break;
                        }
                    }
                }
                v.iter().all(|x| x.nullable)
            }
        };
        let text = text_of(&kind);
        Regex {
            kind,
            text,
            nullable,
            symbols,
            first,
            last,
            follow,
        }
    }

    ///
    /// Parse a regular expression
    ///
    /// # Errors
    ///
    /// - [RegexError::UnbalancedParentheses] if the parentheses don't match
    /// - [RegexError::InvalidSequence] for a leading `*` or one of `()`, `(*`,
    ///   `|)` (except for the empty set idioms like `()`)
    /// - [RegexError::InvalidSymbol] if the input contains a control character
    ///
    /// # Example
    ///
    /// ```
    /// use rlsm::regular_expressions::Regex;
    ///
    /// let r = Regex::new("b|@|a*").unwrap();
    /// assert_eq!(r.to_string(), "a*|b");
    /// assert!(r.accepts("aaa"));
    /// assert!(r.accepts(""));
    /// assert!(!r.accepts("ab"));
    /// ```
    pub fn new(s: &str) -> Result<Self, RegexError> {
        regex_parser::parse(s)
    }

    /// The empty language
    pub fn empty_set() -> Self {
        Self::make(RegexKind::EmptySet)
    }

    /// The language that contains only the empty word
    pub fn empty_word() -> Self {
        Self::make(RegexKind::EmptyWord)
    }

    ///
    /// Expression for a single symbol
    ///
    /// # Errors
    ///
    /// [RegexError::InvalidSymbol] if c is whitespace, a control character, or an
    /// operator of the regex syntax.
    ///
    pub fn symbol(c: char) -> Result<Self, RegexError> {
        if regex_parser::is_symbol(c) {
            Ok(Self::prim(c))
        } else {
            Err(RegexError::InvalidSymbol(c))
        }
    }

    // no check on the symbol
    pub(crate) fn prim(c: char) -> Self {
        Self::make(RegexKind::Prim(c))
    }

    ///
    /// Kleene closure of this expression
    ///
    pub fn star(&self) -> Self {
        match &self.kind {
            RegexKind::EmptySet | RegexKind::EmptyWord => Self::empty_word(),
            RegexKind::Star(_) => self.clone(),
            RegexKind::Union(v) if v.iter().any(|x| x.is_empty_word()) => {
                let branches = v.iter().filter(|x| !x.is_empty_word()).cloned().collect();
                Self::union_of(branches).star()
            }
            RegexKind::Concat(v) => match absorbed_star(v) {
                Some(x) => x,
                None => Self::make(RegexKind::Star(Box::new(self.clone()))),
            },
            _ => Self::make(RegexKind::Star(Box::new(self.clone()))),
        }
    }

    ///
    /// Union of two expressions
    ///
    pub fn union(&self, other: &Regex) -> Self {
        Self::union_of(vec![self.clone(), other.clone()])
    }

    ///
    /// Concatenation of two expressions
    ///
    pub fn concat(&self, other: &Regex) -> Self {
        Self::concat_of(vec![self.clone(), other.clone()])
    }

    ///
    /// Normalized union of a list of expressions
    ///
    pub(crate) fn union_of(branches: Vec<Regex>) -> Self {
        let mut flat: Vec<Regex> = Vec::with_capacity(branches.len());
        for x in branches {
            if let RegexKind::Union(v) = &x.kind {
                flat.extend(v.iter().cloned());
            } else if !x.is_empty_set() {
                flat.push(x);
            }
        }
        let mut seen = BTreeSet::new();
        flat.retain(|x| seen.insert(x.text.clone()));

        // X is redundant if X* is present
        let starred: BTreeSet<String> = flat
            .iter()
            .filter_map(|x| match &x.kind {
                RegexKind::Star(y) => Some(y.text.clone()),
                _ => None,
            })
            .collect();
        flat.retain(|x| !starred.contains(&x.text));

        if flat.iter().any(|x| x.nullable && !x.is_empty_word()) {
            flat.retain(|x| !x.is_empty_word());
        }
        flat.sort_by(|a, b| {
            b.is_empty_word()
                .cmp(&a.is_empty_word())
                .then_with(|| a.text.cmp(&b.text))
        });
        if flat.len() <= 1 {
            return flat.pop().unwrap_or_else(Self::empty_set);
        }
        Self::make(RegexKind::Union(flat))
    }

    ///
    /// Normalized concatenation of a list of expressions
    ///
    pub(crate) fn concat_of(factors: Vec<Regex>) -> Self {
        let mut flat: Vec<Regex> = Vec::with_capacity(factors.len());
        for x in factors {
            if x.is_empty_set() {
                return Self::empty_set();
            }
            if let RegexKind::Concat(v) = &x.kind {
                flat.extend(v.iter().cloned());
            } else if !x.is_empty_word() {
                flat.push(x);
            }
        }
        // X* X* = X*
        flat.dedup_by(|b, a| matches!(a.kind, RegexKind::Star(_)) && a.text == b.text);
        if flat.len() <= 1 {
            return flat.pop().unwrap_or_else(Self::empty_word);
        }
        Self::make(RegexKind::Concat(flat))
    }

    /// Abstract syntax tree
    pub fn kind(&self) -> &RegexKind {
        &self.kind
    }

    /// Check whether this is the empty language
    pub fn is_empty_set(&self) -> bool {
        matches!(self.kind, RegexKind::EmptySet)
    }

    /// Check whether this is the language that contains only the empty word
    pub fn is_empty_word(&self) -> bool {
        matches!(self.kind, RegexKind::EmptyWord)
    }

    /// Check whether the empty word belongs to the language
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn position(&self, i: usize) -> Position {
        Position {
            symbol: self.symbols[i],
            index: i,
        }
    }

    /// All positions from left to right
    pub fn positions(&self) -> Vec<Position> {
        (0..self.symbols.len()).map(|i| self.position(i)).collect()
    }

    /// Positions that can start a word
    pub fn first(&self) -> Vec<Position> {
        self.first.iter().map(|&i| self.position(i)).collect()
    }

    /// Positions that can end a word
    pub fn last(&self) -> Vec<Position> {
        self.last.iter().map(|&i| self.position(i)).collect()
    }

    /// Pairs of positions that can be adjacent in a word
    pub fn follow(&self) -> Vec<(Position, Position)> {
        self.follow
            .iter()
            .map(|&(p, q)| (self.position(p), self.position(q)))
            .collect()
    }

    /// Symbols that can start a word
    pub fn first_symbols(&self) -> BTreeSet<char> {
        self.first.iter().map(|&i| self.symbols[i]).collect()
    }

    /// Symbols that can end a word
    pub fn last_symbols(&self) -> BTreeSet<char> {
        self.last.iter().map(|&i| self.symbols[i]).collect()
    }

    /// Symbols that occur in the expression, sorted
    pub fn alphabet(&self) -> Vec<char> {
        let set: BTreeSet<char> = self.symbols.iter().copied().collect();
        set.into_iter().collect()
    }

    ///
    /// Minimal automaton that accepts the language of this expression
    ///
    /// The alphabet of the automaton is the set of symbols that occur in the
    /// expression. The states are labeled `0, 1, ...` in breadth-first order
    /// and `0` is the initial state. The automaton is not complete in general.
    ///
    pub fn to_dfa(&self) -> Dfa {
        let mut successors = vec![BTreeSet::new(); self.symbols.len()];
        for &(p, q) in &self.follow {
            successors[p].insert(q);
        }

        // a state is a set of positions: the empty set is the initial state
        let mut queue: BfsQueue<BTreeSet<usize>> = BfsQueue::new();
        let mut transitions: Vec<BTreeMap<char, usize>> = Vec::new();
        queue.push(BTreeSet::new());
        while let Some(i) = queue.pop() {
            let current = queue.get(i);
            let reachable: BTreeSet<usize> = if current.is_empty() {
                self.first.clone()
            } else {
                current.iter().flat_map(|&p| successors[p].iter().copied()).collect()
            };
            let mut by_symbol: BTreeMap<char, BTreeSet<usize>> = BTreeMap::new();
            for q in reachable {
                by_symbol.entry(self.symbols[q]).or_default().insert(q);
            }
            let next = by_symbol
                .into_iter()
                .map(|(c, set)| (c, queue.push(set).0))
                .collect();
            transitions.push(next);
        }

        let states = queue
            .into_elements()
            .into_iter()
            .zip(transitions)
            .enumerate()
            .map(|(i, (set, next))| {
                let is_final = if set.is_empty() {
                    self.nullable
                } else {
                    !set.is_disjoint(&self.last)
                };
                State::new(i.to_string(), is_final, next)
            })
            .collect();
        let alphabet = self.symbols.iter().copied().collect();
        let mut dfa = Dfa::from_parts(alphabet, states, 0);
        let before = dfa.num_states();
        dfa.minimize();
        dfa.rename_states();
        debug!(regex = %self, before, after = dfa.num_states(), "automaton from regex");
        dfa
    }

    ///
    /// Syntactic monoid of the language
    ///
    pub fn to_monoid(&self) -> Monoid {
        self.to_dfa().syntactic_monoid()
    }

    /// Check whether a word belongs to the language
    pub fn accepts(&self, word: &str) -> bool {
        self.to_dfa().accepts(word)
    }
}

//
// (X X*)* = (X* X)* = X*
// - v is the list of factors of a concatenation
//
fn absorbed_star(v: &[Regex]) -> Option<Regex> {
    let n = v.len();
    if let RegexKind::Star(y) = &v[n - 1].kind {
        if Regex::concat_of(v[..n - 1].to_vec()).text == y.text {
            return Some(v[n - 1].clone());
        }
    }
    if let RegexKind::Star(y) = &v[0].kind {
        if Regex::concat_of(v[1..].to_vec()).text == y.text {
            return Some(v[0].clone());
        }
    }
    None
}

///
/// Semantic equality: two expressions are equal if they denote the same language
///
impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        if self.text == other.text {
            return true;
        }
        if self.nullable != other.nullable
            || self.first_symbols() != other.first_symbols()
            || self.last_symbols() != other.last_symbols()
        {
            return false;
        }
        self.to_dfa().is_isomorphic_to(&other.to_dfa())
    }
}

impl Eq for Regex {}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.text.fmt(f)
    }
}

impl FromStr for Regex {
    type Err = RegexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        regex_parser::parse(s)
    }
}

impl TryFrom<String> for Regex {
    type Error = RegexError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        regex_parser::parse(&s)
    }
}

impl From<Regex> for String {
    fn from(r: Regex) -> Self {
        r.text
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn regex(s: &str) -> Regex {
        s.parse().unwrap()
    }

    fn pos(symbol: char, index: usize) -> Position {
        Position { symbol, index }
    }

    #[test]
    fn test_attributes() {
        let r = regex("(a|b)*ab");
        println!("{r}: first = {:?}, last = {:?}", r.first(), r.last());
        assert!(!r.is_nullable());
        assert_eq!(
            r.positions(),
            vec![pos('a', 0), pos('b', 1), pos('a', 2), pos('b', 3)]
        );
        assert_eq!(r.first(), vec![pos('a', 0), pos('b', 1), pos('a', 2)]);
        assert_eq!(r.last(), vec![pos('b', 3)]);
        let follow = r.follow();
        assert!(follow.contains(&(pos('a', 0), pos('b', 1))));
        assert!(follow.contains(&(pos('b', 1), pos('a', 2))));
        assert!(follow.contains(&(pos('a', 2), pos('b', 3))));
        assert!(!follow.contains(&(pos('b', 3), pos('a', 0))));
        assert_eq!(follow.len(), 7);
        assert_eq!(r.alphabet(), vec!['a', 'b']);

        let r = regex("a*b*");
        assert!(r.is_nullable());
        assert_eq!(r.first_symbols(), BTreeSet::from(['a', 'b']));
        assert_eq!(r.last_symbols(), BTreeSet::from(['a', 'b']));

        let e = Regex::empty_set();
        assert!(e.is_empty_set() && !e.is_nullable());
        assert!(e.first().is_empty());
        let w = Regex::empty_word();
        assert!(w.is_empty_word() && w.is_nullable());
        assert_eq!(w.to_string(), "&");
        assert_eq!(e.to_string(), "");
    }

    #[test]
    fn test_constructors() {
        let a = Regex::symbol('a').unwrap();
        let b = Regex::symbol('b').unwrap();
        assert!(Regex::symbol('*').is_err());
        assert!(Regex::symbol(' ').is_err());

        assert_eq!(a.union(&b).to_string(), "a|b");
        assert_eq!(b.union(&a).to_string(), "a|b");
        assert_eq!(a.concat(&b).to_string(), "ab");
        assert_eq!(a.union(&b).concat(&a).to_string(), "(a|b)a");
        assert_eq!(a.concat(&b).star().to_string(), "(ab)*");
        assert_eq!(a.star().star().to_string(), "a*");
        assert_eq!(a.union(&Regex::empty_word()).star().to_string(), "a*");
        assert_eq!(a.concat(&Regex::empty_set()).to_string(), "");
        assert_eq!(a.union(&Regex::empty_set()).to_string(), "a");
        assert_eq!(a.concat(&Regex::empty_word()).to_string(), "a");
        assert_eq!(Regex::empty_set().star().to_string(), "&");
        assert_eq!(a.concat(&a.star()).star().to_string(), "a*");
        assert_eq!(a.star().concat(&a.star()).to_string(), "a*");
    }

    #[test]
    fn test_to_dfa_star() {
        let dfa = regex("a*").to_dfa();
        println!("a* --> {dfa}");
        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.initial_state(), "0");
        assert_eq!(dfa.final_states(), vec!["0"]);
        assert_eq!(dfa.transitions(), vec![("0", "0", 'a')]);
    }

    #[test]
    fn test_to_dfa() {
        let dfa = regex("(a|b)aa*(&|b)a*").to_dfa();
        println!("(a|b)aa*(&|b)a* --> {dfa}");
        assert_eq!(dfa.num_states(), 4);
        assert_eq!(dfa.num_final_states(), 2);
        assert_eq!(dfa.state_labels(), vec!["0", "1", "2", "3"]);
        assert!(dfa.accepts("aa"));
        assert!(dfa.accepts("baaba"));
        assert!(!dfa.accepts("abb"));
        assert!(!dfa.accepts("a"));

        let dfa = Regex::empty_set().to_dfa();
        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.num_final_states(), 0);

        let dfa = Regex::empty_word().to_dfa();
        assert_eq!(dfa.num_states(), 1);
        assert_eq!(dfa.num_final_states(), 1);
        assert!(dfa.alphabet().is_empty());
    }

    #[test]
    fn test_accepts() {
        let r = regex("(ab|c)*d");
        assert!(r.accepts("d"));
        assert!(r.accepts("abcabd"));
        assert!(!r.accepts("abc"));
        assert!(!r.accepts("ad"));
        assert!(!r.accepts("x"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(regex("(a|b)a"), regex("(b|a)a"));
        assert_eq!(regex("a||b"), regex("a|b"));
        assert_eq!(regex("a*a"), regex("aa*"));
        assert_eq!(regex("(a|b)*"), regex("(a*b*)*"));
        assert_ne!(regex("a*"), regex("a*b"));
        assert_ne!(regex("ab"), regex("ba"));
        assert_ne!(regex("a(a|b)"), regex("a(a|b)*"));
        assert_eq!(regex(""), regex("()"));
        assert_eq!(regex("&"), regex("@*"));
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(regex("@|b|a*").to_string(), "a*|b");
        assert_eq!(regex("aab|b|ac").to_string(), "aab|ac|b");
        assert_eq!(regex("a*|a(a|b)").to_string(), "a(a|b)|a*");
        // the canonical text parses back to the same expression
        for s in ["(a|b)aa*(&|b)a*", "&|ab*", "((a|b)*c)*", "a(b|&)"] {
            let r = regex(s);
            assert_eq!(regex(&r.to_string()).to_string(), r.to_string());
        }
    }

    #[test]
    fn test_to_monoid() {
        // a*: one state with a loop
        let m = regex("a*").to_monoid();
        println!("syntactic monoid of a*: {m}");
        assert_eq!(m.order(), 1);

        // (aa)*: Z2
        let m = regex("(aa)*").to_monoid();
        println!("syntactic monoid of (aa)*: {m}");
        assert_eq!(m.order(), 2);
        assert!(m.is_group());
    }

    #[test]
    fn test_serde() {
        let r = regex("(a|b)*c");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"(a|b)*c\"");
        let back: Regex = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), r.to_string());
        assert!(serde_json::from_str::<Regex>("\"(a\"").is_err());
    }
}
