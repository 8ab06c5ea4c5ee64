// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Finite monoids given by their multiplication table
//!
//! A monoid of order n is stored as a list of n element names and an
//! n×n table of element indices. The identity is always the element of index 0.
//!
//! # Notation
//!
//! A monoid is described by its table, row by row. Rows are separated by
//! whitespace. If any element name is longer than one character, the entries
//! of a row are separated by commas; otherwise, each character is an entry.
//! The element names can be given explicitly before a colon. If they're
//! omitted, they are taken from the first row, which is then expected to be
//! the row of the identity.
//!
//! ```
//! use rlsm::monoid::Monoid;
//!
//! let z3: Monoid = "012 120 201".parse().unwrap();
//! assert_eq!(z3.order(), 3);
//! assert_eq!(z3.multiply("1", "2").unwrap(), "0");
//!
//! let m: Monoid = "x,y,z: z,x,y x,y,z y,z,x".parse().unwrap();
//! assert_eq!(m.identity(), "y");
//! ```
//!
//! Construction validates the table: it must be quadratic, refer only to
//! declared elements, have a two-sided identity, and be associative.
//!

use std::{collections::HashMap, convert::TryFrom, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MonoidError;

///
/// Finite monoid
///
/// Two monoids are equal (`==`) if they have the same element names in the same
/// order and the same table. Use [is_isomorphic_to](Monoid::is_isomorphic_to) to
/// compare monoids up to renaming.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Monoid {
    // element names; elements[0] is the identity
    elements: Vec<String>,
    // table[i * n + j] = index of elements[i] * elements[j]
    table: Vec<usize>,
}

///
/// Relabeling applied after a monoid is constructed
///
/// The steps are applied in this order: normalize, rename, then set the element names.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonoidOptions {
    /// Reorder the elements: identity, then the generating subset, then the rest
    pub normalize: bool,
    /// Rename the elements to `1, a, b, c, ...`
    pub rename: bool,
    /// Explicit element names, in index order
    pub elements: Option<Vec<String>>,
}

//
// Parsing
//

// Remove whitespace next to a comma so that "0, 1, 2" and "0,1,2" are the same row
fn squeeze_commas(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            let prev = chars[..i].iter().rev().find(|c| !c.is_whitespace());
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if prev == Some(&',') || next == Some(&',') {
                continue;
            }
        }
        result.push(c);
    }
    result
}

fn split_row(row: &str) -> Vec<String> {
    if row.contains(',') {
        let row = row.strip_suffix(',').unwrap_or(row);
        row.split(',').map(String::from).collect()
    } else {
        row.chars().map(String::from).collect()
    }
}

fn split_element_list(list: &str) -> Vec<String> {
    let list = list.trim();
    if list.contains(',') {
        let list = list.strip_suffix(',').unwrap_or(list);
        list.split(',').map(|s| s.trim().to_string()).collect()
    } else if list.contains(char::is_whitespace) {
        list.split_whitespace().map(String::from).collect()
    } else {
        list.chars().map(String::from).collect()
    }
}

// (explicit element names if any, table rows)
fn parse_description(description: &str) -> (Option<Vec<String>>, Vec<Vec<String>>) {
    let (elements, table) = match description.split_once(':') {
        Some((e, t)) => (Some(split_element_list(e)), t),
        None => (None, description),
    };
    let rows = squeeze_commas(table).split_whitespace().map(split_row).collect();
    (elements, rows)
}

// element names in order of first appearance
fn names_from_first_row(rows: &[Vec<String>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    if let Some(first) = rows.first() {
        for x in first {
            if !names.contains(x) {
                names.push(x.clone());
            }
        }
    }
    names
}

///
/// Name of the k-th element when renaming: 1, a, b, ..., z, aa, ab, ...
///
pub(crate) fn standard_name(k: usize) -> String {
    if k == 0 {
        return "1".to_string();
    }
    // bijective base 26
    let mut k = k;
    let mut letters = Vec::new();
    while k > 0 {
        k -= 1;
        letters.push((b'a' + (k % 26) as u8) as char);
        k /= 26;
    }
    letters.iter().rev().collect()
}

impl Monoid {
    ///
    /// Build a monoid from a description in the table notation
    ///
    pub fn new(description: &str) -> Result<Self, MonoidError> {
        let (elements, rows) = parse_description(description);
        let elements = match elements {
            Some(e) => e,
            None => names_from_first_row(&rows),
        };
        Self::from_named_table(elements, &rows)
    }

    ///
    /// Build a monoid from a description and apply relabeling options
    ///
    pub fn with_options(description: &str, options: &MonoidOptions) -> Result<Self, MonoidError> {
        let mut m = Self::new(description)?;
        if options.normalize {
            m.normalize();
        }
        if options.rename {
            m.rename_elements();
        }
        if let Some(names) = &options.elements {
            m.set_elements(names.clone())?;
        }
        Ok(m)
    }

    ///
    /// Build a monoid from element names and a table of names
    ///
    pub fn from_named_table(elements: Vec<String>, rows: &[Vec<String>]) -> Result<Self, MonoidError> {
        check_shape(rows)?;
        let index = name_index(&elements, rows.len())?;
        let mut table = Vec::with_capacity(rows.len() * rows.len());
        for row in rows {
            for x in row {
                match index.get(x.as_str()) {
                    Some(&i) => table.push(i),
                    None => return Err(MonoidError::UnknownElement(x.clone())),
                }
            }
        }
        Self::validate(elements, table)
    }

    ///
    /// Build a monoid from element names and a table of element indices
    ///
    pub fn from_table(elements: Vec<String>, rows: &[Vec<usize>]) -> Result<Self, MonoidError> {
        check_shape(rows)?;
        let n = rows.len();
        name_index(&elements, n)?;
        let mut table = Vec::with_capacity(n * n);
        for row in rows {
            for &x in row {
                if x >= n {
                    return Err(MonoidError::UnknownElement(x.to_string()));
                }
                table.push(x);
            }
        }
        Self::validate(elements, table)
    }

    // checks 3 and 4: identity and associativity
    fn validate(elements: Vec<String>, table: Vec<usize>) -> Result<Self, MonoidError> {
        let n = elements.len();
        let mut m = Monoid { elements, table };
        let identity = (0..n)
            .find(|&e| (0..n).all(|x| m.mul(e, x) == x && m.mul(x, e) == x))
            .ok_or(MonoidError::NoIdentity)?;
        if identity != 0 {
            let mut order: Vec<usize> = (0..n).collect();
            order.swap(0, identity);
            m.permute(&order);
        }
        if let Some((a, b, c)) = m.first_non_associative_triple() {
            debug!(a, b, c, "table is not associative");
            return Err(MonoidError::NotAssociative {
                a: m.elements[a].clone(),
                b: m.elements[b].clone(),
                c: m.elements[c].clone(),
            });
        }
        Ok(m)
    }

    // products with the identity are trivially associative
    fn first_non_associative_triple(&self) -> Option<(usize, usize, usize)> {
        let n = self.order();
        for a in 1..n {
            for b in 1..n {
                let ab = self.mul(a, b);
                for c in 1..n {
                    if self.mul(ab, c) != self.mul(a, self.mul(b, c)) {
                        return Some((a, b, c));
                    }
                }
            }
        }
        None
    }

    ///
    /// Build a monoid from a table already known to be valid, with identity at index 0
    ///
    pub(crate) fn from_raw(elements: Vec<String>, table: Vec<usize>) -> Self {
        debug_assert_eq!(elements.len() * elements.len(), table.len());
        Monoid { elements, table }
    }

    ///
    /// Reorder the elements
    /// - order[k] is the old index of the element that gets index k
    ///
    pub(crate) fn permute(&mut self, order: &[usize]) {
        let n = self.order();
        let mut new_index = vec![0; n];
        for (k, &old) in order.iter().enumerate() {
            new_index[old] = k;
        }
        let mut table = vec![0; n * n];
        for (i, &a) in order.iter().enumerate() {
            for (j, &b) in order.iter().enumerate() {
                table[i * n + j] = new_index[self.mul(a, b)];
            }
        }
        self.elements = order.iter().map(|&i| self.elements[i].clone()).collect();
        self.table = table;
    }

    /// Number of elements
    pub fn order(&self) -> usize {
        self.elements.len()
    }

    /// Element names in index order
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Name of the identity
    pub fn identity(&self) -> &str {
        &self.elements[0]
    }

    /// Name of the element of index i
    pub fn element(&self, i: usize) -> &str {
        &self.elements[i]
    }

    ///
    /// Index of an element
    ///
    pub fn index_of(&self, name: &str) -> Result<usize, MonoidError> {
        self.elements
            .iter()
            .position(|x| x == name)
            .ok_or_else(|| MonoidError::UnknownElement(name.to_string()))
    }

    pub(crate) fn indices_of<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, MonoidError> {
        names.iter().map(|x| self.index_of(x.as_ref())).collect()
    }

    pub(crate) fn names_of(&self, indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| self.elements[i].clone()).collect()
    }

    ///
    /// Product of elements of index i and j
    ///
    pub fn mul(&self, i: usize, j: usize) -> usize {
        self.table[i * self.order() + j]
    }

    /// Row of element i in the table
    pub fn row(&self, i: usize) -> &[usize] {
        let n = self.order();
        &self.table[i * n..(i + 1) * n]
    }

    /// The table as a list of rows of element indices
    pub fn table(&self) -> Vec<Vec<usize>> {
        (0..self.order()).map(|i| self.row(i).to_vec()).collect()
    }

    ///
    /// Product of two elements
    ///
    pub fn multiply(&self, a: &str, b: &str) -> Result<&str, MonoidError> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Ok(self.element(self.mul(i, j)))
    }

    ///
    /// Product of two or more elements, left to right
    ///
    pub fn product<S: AsRef<str>>(&self, factors: &[S]) -> Result<&str, MonoidError> {
        if factors.len() < 2 {
            return Err(MonoidError::Arity(factors.len()));
        }
        let indices = self.indices_of(factors)?;
        let result = indices[1..].iter().fold(indices[0], |acc, &x| self.mul(acc, x));
        Ok(self.element(result))
    }

    //
    // Element properties
    //

    /// Check whether a b = b a for all a and b
    pub fn is_commutative(&self) -> bool {
        let n = self.order();
        (0..n).all(|a| (a + 1..n).all(|b| self.mul(a, b) == self.mul(b, a)))
    }

    /// Check whether element i is idempotent (i i = i)
    pub fn is_idempotent_index(&self, i: usize) -> bool {
        self.mul(i, i) == i
    }

    ///
    /// Check whether an element is idempotent
    ///
    pub fn is_idempotent_element(&self, a: &str) -> Result<bool, MonoidError> {
        Ok(self.is_idempotent_index(self.index_of(a)?))
    }

    /// Check whether all elements are idempotent
    pub fn is_idempotent(&self) -> bool {
        (0..self.order()).all(|i| self.is_idempotent_index(i))
    }

    /// List of idempotent elements
    pub fn idempotents(&self) -> Vec<String> {
        (0..self.order())
            .filter(|&i| self.is_idempotent_index(i))
            .map(|i| self.elements[i].clone())
            .collect()
    }

    ///
    /// Check whether the monoid is a group
    ///
    /// A finite monoid is a group iff the identity is its only idempotent.
    ///
    pub fn is_group(&self) -> bool {
        (1..self.order()).all(|i| !self.is_idempotent_index(i))
    }

    // z is a left zero if z x = z for all x
    fn is_left_zero_index(&self, z: usize) -> bool {
        self.order() > 1 && self.row(z).iter().all(|&y| y == z)
    }

    // z is a right zero if x z = z for all x
    fn is_right_zero_index(&self, z: usize) -> bool {
        self.order() > 1 && (0..self.order()).all(|x| self.mul(x, z) == z)
    }

    ///
    /// Check whether a is a left zero (a x = a for all x)
    ///
    /// The trivial monoid has no left zero.
    ///
    pub fn is_left_zero(&self, a: &str) -> Result<bool, MonoidError> {
        Ok(self.is_left_zero_index(self.index_of(a)?))
    }

    ///
    /// Check whether a is a right zero (x a = a for all x)
    ///
    /// The trivial monoid has no right zero.
    ///
    pub fn is_right_zero(&self, a: &str) -> Result<bool, MonoidError> {
        Ok(self.is_right_zero_index(self.index_of(a)?))
    }

    /// All left zeros
    pub fn left_zeros(&self) -> Vec<String> {
        (0..self.order())
            .filter(|&z| self.is_left_zero_index(z))
            .map(|z| self.elements[z].clone())
            .collect()
    }

    /// All right zeros
    pub fn right_zeros(&self) -> Vec<String> {
        (0..self.order())
            .filter(|&z| self.is_right_zero_index(z))
            .map(|z| self.elements[z].clone())
            .collect()
    }

    ///
    /// The zero element if there's one
    ///
    /// A zero is both a left and a right zero. It's unique if it exists.
    ///
    pub fn zero_element(&self) -> Option<&str> {
        (0..self.order())
            .find(|&z| self.is_left_zero_index(z) && self.is_right_zero_index(z))
            .map(|z| self.element(z))
    }

    /// Check whether the monoid has a zero element
    pub fn has_zero(&self) -> bool {
        self.zero_element().is_some()
    }

    //
    // Relabeling
    //

    ///
    /// Reorder the elements: identity first, then the generating subset,
    /// then the other elements in their current order
    ///
    pub fn normalize(&mut self) {
        let generators = self.generating_subset_indices();
        let mut order = vec![0];
        order.extend(generators.iter().copied().filter(|&g| g != 0));
        for i in 1..self.order() {
            if !order.contains(&i) {
                order.push(i);
            }
        }
        self.permute(&order);
    }

    ///
    /// Rename the elements to `1, a, b, c, ...` in index order
    ///
    pub fn rename_elements(&mut self) {
        self.elements = (0..self.order()).map(standard_name).collect();
    }

    ///
    /// Give new names to the elements, in index order
    ///
    /// Fails if the number of names is not the order of the monoid or if
    /// two names are equal.
    ///
    pub fn set_elements<S: Into<String>>(&mut self, names: Vec<S>) -> Result<(), MonoidError> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        name_index(&names, self.order())?;
        self.elements = names;
        Ok(())
    }

    // true if some element name has more than one character
    fn needs_separators(&self) -> bool {
        self.elements.iter().any(|x| x.chars().count() != 1)
    }
}

fn check_shape<T>(rows: &[Vec<T>]) -> Result<(), MonoidError> {
    let n = rows.len();
    if n == 0 {
        return Err(MonoidError::EmptyTable);
    }
    match rows.iter().position(|r| r.len() != n) {
        Some(row) => Err(MonoidError::NotQuadratic {
            rows: n,
            row,
            len: rows[row].len(),
        }),
        None => Ok(()),
    }
}

// map from name to index; checks the number of names and duplicates
fn name_index(elements: &[String], n: usize) -> Result<HashMap<&str, usize>, MonoidError> {
    let mut index = HashMap::with_capacity(elements.len());
    for (i, x) in elements.iter().enumerate() {
        if index.insert(x.as_str(), i).is_some() {
            return Err(MonoidError::DuplicateElement(x.clone()));
        }
    }
    if elements.len() != n {
        return Err(MonoidError::ElementCount {
            expected: n,
            found: elements.len(),
        });
    }
    Ok(index)
}

impl FromStr for Monoid {
    type Err = MonoidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Monoid::new(s)
    }
}

impl TryFrom<String> for Monoid {
    type Error = MonoidError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Monoid::new(&s)
    }
}

impl From<Monoid> for String {
    fn from(m: Monoid) -> Self {
        m.to_string()
    }
}

///
/// The table in monoid notation
///
/// The first row is the row of the identity so the element names can be
/// recovered from the output.
///
impl Display for Monoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let separators = self.needs_separators();
        for i in 0..self.order() {
            if i > 0 {
                write!(f, " ")?;
            }
            for (k, &x) in self.row(i).iter().enumerate() {
                if separators && k > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", self.elements[x])?;
            }
            if separators && self.order() == 1 {
                write!(f, ",")?;
            }
        }
        Ok(())
    }
}
