// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Regular languages and syntactic monoids
//!
//! # Overview
//!
//! This crate provides three representations of regular languages and the
//! conversions between them:
//! - finite monoids given by their multiplication table: module [monoid](crate::monoid),
//!   with Green's relations in [green_relations](crate::green_relations), submonoids and
//!   isomorphisms in [submonoids](crate::submonoids), and disjunctive subsets in
//!   [syntactic](crate::syntactic)
//! - deterministic finite-state automata: module [automata](crate::automata), with the
//!   text notation in [dfa_notation](crate::dfa_notation)
//! - regular expressions: module [regular_expressions](crate::regular_expressions)
//!
//! The conversions are:
//! - [Monoid::to_dfa](crate::monoid::Monoid::to_dfa): automaton whose states are the
//!   elements of a monoid
//! - [Dfa::transition_monoid](crate::automata::Dfa::transition_monoid) and
//!   [Dfa::syntactic_monoid](crate::automata::Dfa::syntactic_monoid)
//! - [Dfa::to_regex](crate::automata::Dfa::to_regex): state elimination
//! - [Regex::to_dfa](crate::regular_expressions::Regex::to_dfa): Glushkov construction
//!   and subset construction, followed by minimization
//! - [Regex::to_monoid](crate::regular_expressions::Regex::to_monoid): syntactic monoid
//!
//! Module [monoid_generator](crate::monoid_generator) enumerates all monoids of a
//! given order up to isomorphism and anti-isomorphism.
//!
//! # Example
//!
//! ```
//! use rlsm::regular_expressions::Regex;
//!
//! let r = Regex::new("(a|b)aa*(&|b)a*").unwrap();
//! let dfa = r.to_dfa();
//! assert_eq!(dfa.num_states(), 4);
//!
//! let m = dfa.syntactic_monoid();
//! assert!(m.is_syntactic());
//! assert!(dfa.to_regex() == r);
//! ```
//!

#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod automata;
pub mod combinatorics;
pub mod dfa_notation;
pub mod errors;
pub mod green_relations;
pub mod monoid;
pub mod monoid_generator;
pub mod regular_expressions;
pub mod state_elimination;
pub mod submonoids;
pub mod syntactic;
pub mod transition_monoid;

mod bfs_queues;
mod minimizer;
mod partitions;
mod regex_parser;
