// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Lazy enumeration of subsets and permutations
//!
//! The searches on monoids and automata (generating subsets, disjunctive
//! subsets, isomorphisms) go through subsets or permutations in a fixed
//! order and stop at the first match. The iterators defined here produce
//! one item at a time so that nothing is materialized ahead of the search.
//!

///
/// Iterator through all subsets of [0 .. n-1]
///
/// Subsets are produced by increasing size, and subsets of the same size are
/// produced in lexicographic order. Each subset is a sorted vector.
/// For n = 3, the order is
/// ```text
///  [], [0], [1], [2], [0, 1], [0, 2], [1, 2], [0, 1, 2]
/// ```
///
#[derive(Debug, Clone)]
pub struct Subsets {
    n: usize,
    next: Option<Vec<usize>>,
}

///
/// Iterator through all permutations of a list of elements
///
/// The permutations are produced in lexicographic order, starting
/// from the sorted list.
///
#[derive(Debug, Clone)]
pub struct Permutations<T> {
    next: Option<Vec<T>>,
}

///
/// All subsets of [0 .. n-1] by increasing size then lexicographic order
///
pub fn subsets(n: usize) -> Subsets {
    Subsets {
        n,
        next: Some(Vec::new()),
    }
}

///
/// All subsets of a slice, in the same order as [subsets]
///
pub fn power_set<T: Clone>(items: &[T]) -> impl Iterator<Item = Vec<T>> + '_ {
    subsets(items.len()).map(move |s| s.iter().map(|&i| items[i].clone()).collect())
}

///
/// All permutations of the given elements in lexicographic order
///
/// Duplicate elements produce each distinct arrangement only once.
///
pub fn permutations<T: Ord + Clone>(items: impl IntoIterator<Item = T>) -> Permutations<T> {
    let mut v: Vec<T> = items.into_iter().collect();
    v.sort();
    Permutations { next: Some(v) }
}

// successor of a combination of [0 .. n-1] in the (size, lex) order
fn next_subset(n: usize, current: &[usize]) -> Option<Vec<usize>> {
    let k = current.len();
    let mut c = current.to_vec();
    // rightmost position that can still be incremented
    let mut i = k;
    while i > 0 {
        i -= 1;
        if c[i] < n - k + i {
            c[i] += 1;
            for j in i + 1..k {
                c[j] = c[j - 1] + 1;
            }
            return Some(c);
        }
    }
    if k < n {
        Some((0..k + 1).collect())
    } else {
        None
    }
}

// standard next-permutation step; false if v is the last permutation
fn next_permutation<T: Ord>(v: &mut [T]) -> bool {
    let n = v.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = n - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

impl Iterator for Subsets {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = next_subset(self.n, &current);
        Some(current)
    }
}

impl<T: Ord + Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        if next_permutation(&mut successor) {
            self.next = Some(successor);
        }
        Some(current)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_subsets() {
        let all: Vec<Vec<usize>> = subsets(3).collect();
        println!("subsets of 3 elements: {all:?}");
        assert_eq!(
            all,
            vec![
                vec![],
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 1, 2],
            ]
        );

        assert_eq!(subsets(0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        for n in 0..8 {
            assert_eq!(subsets(n).count(), 1 << n);
        }
    }

    #[test]
    fn test_power_set() {
        let items = ["x", "y"];
        let all: Vec<Vec<&str>> = power_set(&items).collect();
        assert_eq!(all, vec![vec![], vec!["x"], vec!["y"], vec!["x", "y"]]);
    }

    #[test]
    fn test_permutations() {
        let all: Vec<Vec<u32>> = permutations(vec![3, 1, 2]).collect();
        println!("permutations: {all:?}");
        assert_eq!(
            all,
            vec![
                vec![1, 2, 3],
                vec![1, 3, 2],
                vec![2, 1, 3],
                vec![2, 3, 1],
                vec![3, 1, 2],
                vec![3, 2, 1],
            ]
        );

        assert_eq!(permutations(Vec::<u32>::new()).count(), 1);
        assert_eq!(permutations(0..5).count(), 120);
        // repeated elements
        assert_eq!(permutations(vec![1, 1, 2]).count(), 3);
    }

    #[test]
    fn test_laziness() {
        // stops early without enumerating 20! permutations
        let first = permutations(0..20).nth(3);
        assert!(first.is_some());
        let big = subsets(40).find(|s| s.len() == 2);
        assert_eq!(big, Some(vec![0, 1]));
    }
}
