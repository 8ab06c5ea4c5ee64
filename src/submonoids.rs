// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Generated sets, submonoids, and isomorphisms
//!

use std::collections::BTreeSet;

use tracing::trace;

use crate::{
    combinatorics::{permutations, subsets},
    errors::MonoidError,
    monoid::Monoid,
};

impl Monoid {
    ///
    /// Closure of a set of element indices under multiplication
    /// - the identity is always included
    /// - the result is sorted by index
    ///
    pub(crate) fn closure(&self, set: &[usize]) -> Vec<usize> {
        let mut member = vec![false; self.order()];
        let mut list = vec![0];
        member[0] = true;
        for &x in set {
            if !member[x] {
                member[x] = true;
                list.push(x);
            }
        }
        // every pair (x, y) of the list is multiplied once x is processed
        let mut k = 0;
        while k < list.len() {
            let x = list[k];
            let mut i = 0;
            while i < list.len() {
                let y = list[i];
                for p in [self.mul(x, y), self.mul(y, x)] {
                    if !member[p] {
                        member[p] = true;
                        list.push(p);
                    }
                }
                i += 1;
            }
            k += 1;
        }
        list.sort_unstable();
        list
    }

    ///
    /// Submonoid generated by a set of elements
    ///
    pub fn generated_set<S: AsRef<str>>(&self, set: &[S]) -> Result<Vec<String>, MonoidError> {
        let indices = self.indices_of(set)?;
        Ok(self.names_of(&self.closure(&indices)))
    }

    pub(crate) fn generating_subset_indices(&self) -> Vec<usize> {
        let n = self.order();
        subsets(n)
            .find(|s| self.closure(s).len() == n)
            .unwrap_or_else(|| (0..n).collect())
    }

    ///
    /// Smallest set of elements that generates the monoid
    ///
    /// Among generating sets of minimal size, this returns the first one in
    /// lexicographic order of element indices. The trivial monoid is generated
    /// by the empty set.
    ///
    pub fn generating_subset(&self) -> Vec<String> {
        self.names_of(&self.generating_subset_indices())
    }

    ///
    /// Order of an element: size of the submonoid it generates
    ///
    pub fn order_of(&self, a: &str) -> Result<usize, MonoidError> {
        let a = self.index_of(a)?;
        Ok(self.closure(&[a]).len())
    }

    /// Check whether the monoid is generated by a single element
    pub fn is_monogenic(&self) -> bool {
        self.generating_subset_indices().len() <= 1
    }

    // all distinct closures, sorted by (size, lex)
    fn submonoid_indices(&self) -> Vec<Vec<usize>> {
        let all: BTreeSet<Vec<usize>> = subsets(self.order()).map(|s| self.closure(&s)).collect();
        let mut result: Vec<Vec<usize>> = all.into_iter().collect();
        result.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        trace!(order = self.order(), count = result.len(), "submonoids");
        result
    }

    // induced table on a closed set of indices that contains 0
    fn induced(&self, set: &[usize]) -> Monoid {
        let mut position = vec![0; self.order()];
        for (k, &x) in set.iter().enumerate() {
            position[x] = k;
        }
        let mut table = Vec::with_capacity(set.len() * set.len());
        for &a in set {
            for &b in set {
                table.push(position[self.mul(a, b)]);
            }
        }
        Monoid::from_raw(self.names_of(set), table)
    }

    ///
    /// All submonoids, sorted by order then by element indices
    ///
    pub fn submonoids(&self) -> Vec<Monoid> {
        self.submonoid_indices()
            .iter()
            .map(|s| self.induced(s))
            .collect()
    }

    ///
    /// Submonoids other than the trivial monoid and the monoid itself
    ///
    pub fn proper_submonoids(&self) -> Vec<Monoid> {
        let n = self.order();
        self.submonoid_indices()
            .iter()
            .filter(|s| s.len() != 1 && s.len() != n)
            .map(|s| self.induced(s))
            .collect()
    }

    ///
    /// Submonoid generated by a set of elements
    ///
    pub fn get_submonoid<S: AsRef<str>>(&self, set: &[S]) -> Result<Monoid, MonoidError> {
        let indices = self.indices_of(set)?;
        Ok(self.induced(&self.closure(&indices)))
    }

    ///
    /// Check whether self is a submonoid of other
    ///
    /// This requires the same element names and the same products as in other.
    ///
    pub fn is_submonoid_of(&self, other: &Monoid) -> bool {
        match other.get_submonoid(self.elements()) {
            Ok(m) => m == *self,
            Err(_) => false,
        }
    }

    /// Check whether self is a submonoid of other, distinct from other
    pub fn is_proper_submonoid_of(&self, other: &Monoid) -> bool {
        self.order() < other.order() && self.is_submonoid_of(other)
    }

    //
    // Search for a bijection f from self to other that maps the identity to
    // the identity and such that f(a b) = f(a) f(b) (or f(b) f(a) if anti).
    //
    fn find_isomorphism(&self, other: &Monoid, anti: bool) -> Option<Vec<usize>> {
        let n = self.order();
        if n != other.order() {
            return None;
        }
        let preserves = |f: &[usize]| {
            (0..n).all(|a| {
                (0..n).all(|b| {
                    let expected = if anti {
                        other.mul(f[b], f[a])
                    } else {
                        other.mul(f[a], f[b])
                    };
                    f[self.mul(a, b)] == expected
                })
            })
        };
        permutations(1..n)
            .map(|p| {
                let mut f = Vec::with_capacity(n);
                f.push(0);
                f.extend(p);
                f
            })
            .find(|f| preserves(f.as_slice()))
    }

    ///
    /// Check whether two monoids are isomorphic
    ///
    pub fn is_isomorphic_to(&self, other: &Monoid) -> bool {
        self.find_isomorphism(other, false).is_some()
    }

    ///
    /// Check whether two monoids are anti-isomorphic: there's a bijection f
    /// such that f(a b) = f(b) f(a)
    ///
    pub fn is_anti_isomorphic_to(&self, other: &Monoid) -> bool {
        self.find_isomorphism(other, true).is_some()
    }
}
