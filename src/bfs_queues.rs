// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Queue + index for breadth-first exploration
//!
//! Used to explore reachable states, to build automata by subset construction,
//! and to enumerate the elements of transition monoids.
//!

use std::{
    collections::{HashMap, VecDeque},
    hash::Hash,
};

///
/// A BfsQueue is a queue that doesn't contain duplicate elements.
/// - every element pushed is given an index: 0 for the first distinct
///   element, 1 for the next one, and so forth.
/// - the push operation adds an element at the end of the queue
///   if this element hasn't been seen before. Otherwise, it's a no-op.
/// - the pop operation returns the index of the element at the front of the
///   queue if the queue is not empty.
///
/// All the elements seen so far are kept so they can be retrieved from their
/// index after exploration.
///
#[derive(Debug)]
pub struct BfsQueue<T> {
    queue: VecDeque<usize>,
    index: HashMap<T, usize>,
    elements: Vec<T>,
}

impl<T: Eq + Hash + Clone> BfsQueue<T> {
    ///
    /// Create a new empty queue
    ///
    pub fn new() -> Self {
        BfsQueue {
            queue: VecDeque::new(),
            index: HashMap::new(),
            elements: Vec::new(),
        }
    }

    ///
    /// Add an element at the end of the queue if it's not been seen before
    /// - return the element's index and true if this is a new element
    /// - return the index of the existing copy and false otherwise
    ///
    pub fn push(&mut self, element: T) -> (usize, bool) {
        match self.index.get(&element) {
            Some(&i) => (i, false),
            None => {
                let i = self.elements.len();
                self.index.insert(element.clone(), i);
                self.elements.push(element);
                self.queue.push_back(i);
                (i, true)
            }
        }
    }

    ///
    /// Index of the first element in the queue
    /// - return None if the queue is empty
    ///
    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    ///
    /// Element of index i
    ///
    pub fn get(&self, i: usize) -> &T {
        &self.elements[i]
    }

    ///
    /// Index of an element if it's been seen before
    ///
    pub fn index_of(&self, element: &T) -> Option<usize> {
        self.index.get(element).copied()
    }

    ///
    /// Number of distinct elements seen so far
    ///
    pub fn num_seen(&self) -> usize {
        self.elements.len()
    }

    ///
    /// All elements seen so far, in index order
    ///
    pub fn into_elements(self) -> Vec<T> {
        self.elements
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_queue() {
        let mut queue = BfsQueue::new();
        assert_eq!(queue.push("a"), (0, true));
        assert_eq!(queue.push("b"), (1, true));
        assert_eq!(queue.push("a"), (0, false));
        assert_eq!(queue.num_seen(), 2);

        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.push("c"), (2, true));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);

        assert_eq!(queue.get(1), &"b");
        assert_eq!(queue.index_of(&"c"), Some(2));
        assert_eq!(queue.index_of(&"d"), None);
        assert_eq!(queue.into_elements(), vec!["a", "b", "c"]);
    }
}
