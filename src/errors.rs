// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Error codes
//!
//! Every value is validated when it's constructed. Each of the three
//! representations (monoids, automata, regular expressions) has its own
//! error type. Searches that may fail (e.g., looking for an isomorphism)
//! return `Option` or `bool`, not errors.
//!

use thiserror::Error;

///
/// Errors produced when constructing or querying a [Monoid](crate::monoid::Monoid)
///
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MonoidError {
    /// The description doesn't contain any table entry
    #[error("empty monoid description")]
    EmptyTable,

    /// A row of the table doesn't have as many entries as there are rows
    #[error("table is not quadratic: row {row} has {len} entries, expected {rows}")]
    NotQuadratic {
        /// number of rows
        rows: usize,
        /// index of the first bad row
        row: usize,
        /// number of entries in that row
        len: usize,
    },

    /// The number of element names doesn't match the order of the table
    #[error("expected {expected} element names, found {found}")]
    ElementCount {
        /// order of the table
        expected: usize,
        /// number of element names
        found: usize,
    },

    /// The same element name is used twice
    #[error("duplicate element name '{0}'")]
    DuplicateElement(String),

    /// Reference to an element that doesn't belong to the monoid
    #[error("unknown element '{0}'")]
    UnknownElement(String),

    /// A product needs at least two operands
    #[error("a product needs at least two operands, got {0}")]
    Arity(usize),

    /// The table has no two-sided identity
    #[error("no identity element")]
    NoIdentity,

    /// The table is not associative: `(a b) c != a (b c)`
    #[error("not associative: ({a}{b}){c} != {a}({b}{c})")]
    NotAssociative {
        /// first operand
        a: String,
        /// second operand
        b: String,
        /// third operand
        c: String,
    },

    /// The final states given for a syntactic monoid don't form a disjunctive subset
    #[error("the final elements must form a disjunctive subset")]
    InvalidFinals,
}

///
/// Errors produced when constructing or querying a [Dfa](crate::automata::Dfa)
///
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DfaError {
    /// Malformed automaton description
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// offset in the description where the error was detected
        offset: usize,
        /// what went wrong
        message: String,
    },

    /// No state is marked as initial
    #[error("no initial state")]
    NoInitialState,

    /// Two distinct states are marked as initial
    #[error("multiple initial states: '{0}' and '{1}'")]
    MultipleInitialStates(String, String),

    /// Reference to a state that doesn't exist
    #[error("unknown state '{0}'")]
    UnknownState(String),

    /// Two transitions with the same source and label lead to different states
    #[error("non-deterministic transition from '{state}' on '{symbol}': '{first}' and '{second}'")]
    NonDeterministicTransition {
        /// source state
        state: String,
        /// transition label
        symbol: char,
        /// target of the first transition
        first: String,
        /// target of the conflicting transition
        second: String,
    },

    /// A state uses the name reserved for the sink added by completion
    #[error("the state name '{0}' is reserved")]
    ReservedTrapName(String),
}

///
/// Errors produced when parsing a [Regex](crate::regular_expressions::Regex)
///
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RegexError {
    /// Parentheses don't match
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    /// Forbidden operator sequence such as `(*` or `|)`
    #[error("invalid sequence '{0}'")]
    InvalidSequence(String),

    /// Character that can't be used as a symbol
    #[error("invalid symbol {0:?}")]
    InvalidSymbol(char),
}
