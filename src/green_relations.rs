// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Green's relations
//!
//! For a monoid M and elements a, b:
//! - a L b iff M a = M b (same left ideal)
//! - a R b iff a M = b M (same right ideal)
//! - a H b iff a L b and a R b
//! - a J b iff M a M = M b M (same two-sided ideal)
//! - D = L ∘ R. In a finite monoid, D and J coincide so we compute D from
//!   the two-sided ideals.
//!
//! A monoid is X-trivial if all X-classes are singletons. A finite monoid is
//! aperiodic iff it's H-trivial.
//!

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{errors::MonoidError, monoid::Monoid};

///
/// The five Green's relations
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GreenRelation {
    /// same left ideal
    L,
    /// same right ideal
    R,
    /// L and R
    H,
    /// L ∘ R
    D,
    /// same two-sided ideal
    J,
}

impl GreenRelation {
    /// All five relations
    pub const ALL: [GreenRelation; 5] = [
        GreenRelation::L,
        GreenRelation::R,
        GreenRelation::H,
        GreenRelation::D,
        GreenRelation::J,
    ];
}

impl Display for GreenRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GreenRelation::L => "L",
            GreenRelation::R => "R",
            GreenRelation::H => "H",
            GreenRelation::D => "D",
            GreenRelation::J => "J",
        };
        name.fmt(f)
    }
}

fn sorted(mut v: Vec<usize>) -> Vec<usize> {
    v.sort_unstable();
    v.dedup();
    v
}

impl Monoid {
    // M a
    fn left_ideal_of(&self, a: usize) -> Vec<usize> {
        sorted((0..self.order()).map(|x| self.mul(x, a)).collect())
    }

    // a M
    fn right_ideal_of(&self, a: usize) -> Vec<usize> {
        sorted(self.row(a).to_vec())
    }

    // M a M
    fn ideal_of(&self, a: usize) -> Vec<usize> {
        let n = self.order();
        let mut v = Vec::with_capacity(n * n);
        for x in 0..n {
            let xa = self.mul(x, a);
            v.extend(self.row(xa));
        }
        sorted(v)
    }

    // two elements are related iff they have the same key
    fn green_key(&self, relation: GreenRelation, a: usize) -> Vec<Vec<usize>> {
        match relation {
            GreenRelation::L => vec![self.left_ideal_of(a)],
            GreenRelation::R => vec![self.right_ideal_of(a)],
            GreenRelation::H => vec![self.left_ideal_of(a), self.right_ideal_of(a)],
            GreenRelation::D | GreenRelation::J => vec![self.ideal_of(a)],
        }
    }

    ///
    /// Left ideal generated by a: the set { x a | x in M }
    ///
    pub fn left_ideal(&self, a: &str) -> Result<Vec<String>, MonoidError> {
        let a = self.index_of(a)?;
        Ok(self.names_of(&self.left_ideal_of(a)))
    }

    ///
    /// Right ideal generated by a: the set { a x | x in M }
    ///
    pub fn right_ideal(&self, a: &str) -> Result<Vec<String>, MonoidError> {
        let a = self.index_of(a)?;
        Ok(self.names_of(&self.right_ideal_of(a)))
    }

    ///
    /// Two-sided ideal generated by a: the set { x a y | x, y in M }
    ///
    pub fn ideal(&self, a: &str) -> Result<Vec<String>, MonoidError> {
        let a = self.index_of(a)?;
        Ok(self.names_of(&self.ideal_of(a)))
    }

    ///
    /// Class of a for one of Green's relations
    ///
    /// The class is listed in index order.
    ///
    pub fn class_of(&self, relation: GreenRelation, a: &str) -> Result<Vec<String>, MonoidError> {
        let a = self.index_of(a)?;
        let key = self.green_key(relation, a);
        let class: Vec<usize> = (0..self.order())
            .filter(|&b| b == a || self.green_key(relation, b) == key)
            .collect();
        Ok(self.names_of(&class))
    }

    ///
    /// All classes of a relation
    ///
    /// Classes are sorted by their smallest element index.
    ///
    pub fn classes(&self, relation: GreenRelation) -> Vec<Vec<String>> {
        self.class_indices(relation)
            .iter()
            .map(|c| self.names_of(c))
            .collect()
    }

    fn class_indices(&self, relation: GreenRelation) -> Vec<Vec<usize>> {
        let keys: Vec<Vec<Vec<usize>>> = (0..self.order()).map(|a| self.green_key(relation, a)).collect();
        let mut result: Vec<Vec<usize>> = Vec::new();
        let mut class_keys: Vec<&Vec<Vec<usize>>> = Vec::new();
        for (a, key) in keys.iter().enumerate() {
            match class_keys.iter().position(|k| *k == key) {
                Some(c) => result[c].push(a),
                None => {
                    class_keys.push(key);
                    result.push(vec![a]);
                }
            }
        }
        result
    }

    ///
    /// Check whether all classes of a relation are singletons
    ///
    pub fn is_trivial(&self, relation: GreenRelation) -> bool {
        self.class_indices(relation).len() == self.order()
    }

    ///
    /// Check whether the monoid is aperiodic
    ///
    /// A finite monoid is aperiodic iff it's H-trivial, i.e., it
    /// contains no non-trivial group.
    ///
    pub fn is_aperiodic(&self) -> bool {
        self.is_trivial(GreenRelation::H)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn monoid(s: &str) -> Monoid {
        s.parse().unwrap()
    }

    #[test]
    fn test_group() {
        let z3 = monoid("012 120 201");
        for r in GreenRelation::ALL {
            let classes = z3.classes(r);
            println!("{r}-classes of Z3: {classes:?}");
            assert_eq!(classes, vec![vec!["0", "1", "2"]]);
            assert!(!z3.is_trivial(r));
        }
        assert!(!z3.is_aperiodic());
        assert_eq!(z3.left_ideal("1").unwrap(), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_right_zeros() {
        // 1 and 2 are right zeros
        let m = monoid("012 112 212");
        assert_eq!(m.left_ideal("1").unwrap(), vec!["1"]);
        assert_eq!(m.right_ideal("1").unwrap(), vec!["1", "2"]);
        assert_eq!(m.ideal("2").unwrap(), vec!["1", "2"]);

        assert!(m.is_trivial(GreenRelation::L));
        assert!(!m.is_trivial(GreenRelation::R));
        assert!(m.is_trivial(GreenRelation::H));
        assert!(m.is_aperiodic());
        assert_eq!(m.classes(GreenRelation::R), vec![vec!["0"], vec!["1", "2"]]);
        assert_eq!(m.classes(GreenRelation::D), m.classes(GreenRelation::J));
        assert_eq!(m.class_of(GreenRelation::R, "2").unwrap(), vec!["1", "2"]);
        assert_eq!(m.class_of(GreenRelation::L, "2").unwrap(), vec!["2"]);
        assert!(m.class_of(GreenRelation::L, "3").is_err());
    }

    #[test]
    fn test_trivial_monoid() {
        let m = monoid("0");
        for r in GreenRelation::ALL {
            assert!(m.is_trivial(r));
            assert_eq!(m.classes(r), vec![vec!["0"]]);
        }
    }

    #[test]
    fn test_group_with_zero() {
        // Z2 plus a zero: the group part is one H-class
        let m = monoid("e,a,z: e,a,z a,e,z z,z,z");
        let h = m.classes(GreenRelation::H);
        println!("H-classes: {h:?}");
        assert_eq!(h, vec![vec!["e", "a"], vec!["z"]]);
        assert!(!m.is_aperiodic());
        assert!(m.is_commutative());
    }
}
