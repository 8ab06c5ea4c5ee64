// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//!
//! Partitions of an integer set
//!
//! We consider a set of N integers [0 ... n-1].
//! A partition is a division of set into K blocks for some K>=1.
//!

use std::fmt::Display;

// Implementation:
// - each block is identified by an integer between 0 and K (the block id)
// - each block is also a slice in a segments array
// - segments[0 ... n-1]: is a permutation of the n integers
// - block[j] is a pair (start, end) such that 0 <= start < end <= n:
// This means that block[j] is the set of integers in segment[start .. end].
// - block_id[x] is the id of the block that contains x
//
// Block 0 is special: it is the empty block.
// All other blocks are non-empty.
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockHeader {
    start: usize,
    end: usize,
}

///
/// A partition divides a set of integers [0 ... N-1]
/// into disjoint, non-empty blocks. It also maintains a
/// mapping of element to block id: given an x, we can get
/// the block that contains x.
///
#[derive(Debug, Clone)]
pub struct Partition {
    // block descriptors
    block: Vec<BlockHeader>,
    // segment = concatenation of the blocks
    segment: Box<[u32]>,
    // mapping from element to block id
    block_id: Box<[u32]>,
}

impl Partition {
    ///
    /// Create a new partition for n elements
    /// - if n = 0, the partition has only the empty block
    /// - otherwise, the partition has two blocks with id 0 and 1
    ///   0 --> empty block, 1 --> [0 .. n-1]
    ///
    pub fn new(n: u32) -> Self {
        let size = n as usize;
        let segment: Box<[u32]> = (0..n).collect();
        let block = if n == 0 {
            vec![BlockHeader { start: 0, end: 0 }]
        } else {
            vec![
                BlockHeader { start: 0, end: 0 },
                BlockHeader {
                    start: 0,
                    end: size,
                },
            ]
        };
        Partition {
            block,
            segment,
            block_id: vec![1; size].into_boxed_slice(),
        }
    }

    ///
    /// Number of blocks, including the empty block
    ///
    pub fn num_blocks(&self) -> u32 {
        self.block.len() as u32
    }

    ///
    /// Index = number of equivalence classes = number of non-empty blocks
    ///
    pub fn index(&self) -> u32 {
        self.num_blocks() - 1
    }

    ///
    /// Size of the set
    ///
    pub fn size(&self) -> u32 {
        self.segment.len() as u32
    }

    ///
    /// Iterator to get all elements of block i
    ///
    pub fn block_elements(&self, i: u32) -> impl Iterator<Item = u32> + '_ {
        self.slice(i).iter().copied()
    }

    ///
    /// Smallest element of block i
    /// - block i must not be empty so i must not be 0
    ///
    pub fn min_element(&self, i: u32) -> u32 {
        debug_assert!(i > 0);
        self.block_elements(i).min().unwrap_or_default()
    }

    ///
    /// Block id for element x
    ///
    pub fn block_id(&self, x: u32) -> u32 {
        self.block_id[x as usize]
    }

    fn slice(&self, i: u32) -> &[u32] {
        let BlockHeader { start, end } = self.block[i as usize];
        &self.segment[start..end]
    }

    fn slice_mut(&mut self, i: u32) -> &mut [u32] {
        let BlockHeader { start, end } = self.block[i as usize];
        &mut self.segment[start..end]
    }

    //
    // Split block i at position n: block i is reduced to [start, start + n)
    // and a new block is created for [start + n, end). Return the new block id.
    //
    fn split_block(&mut self, i: u32, n: usize) -> u32 {
        let i = i as usize;
        let split_point = self.block[i].start + n;
        let end_point = self.block[i].end;
        debug_assert!(split_point < end_point);
        self.block[i].end = split_point;
        let id = self.num_blocks();
        self.block.push(BlockHeader {
            start: split_point,
            end: end_point,
        });
        for k in split_point..end_point {
            self.block_id[self.segment[k] as usize] = id;
        }
        id
    }

    ///
    /// Refine a block according to a predicate p
    /// - split block i into to sub-blocks B1 and B2
    ///   B1 = { x in block i | p(x) }
    ///   B2 = { x in block i | not p(x) }
    /// - if B1 or B2 is empty, block i is unchanged
    /// - otherwise, block i is shrunk to B1 and a new block is created for B2
    ///
    /// Return a pair of block ids (i1, i2) where
    /// i1 = id of B1 and i2 = id of B2 (0 if the sub-block is empty).
    ///
    pub fn refine_block<P>(&mut self, i: u32, p: P) -> (u32, u32)
    where
        P: Fn(u32) -> bool,
    {
        let s = self.slice_mut(i);
        let mut j = 0;
        for k in 0..s.len() {
            if p(s[k]) {
                s.swap(k, j);
                j += 1;
            }
        }
        let len = s.len();
        if j == 0 {
            (0, i)
        } else if j == len {
            (i, 0)
        } else {
            let k = self.split_block(i, j);
            (i, k)
        }
    }

    ///
    /// Refine a block according to a key function
    /// - the elements of block i are grouped by key: two elements stay
    ///   in the same block if and only if they have the same key
    /// - the group with the smallest key keeps id i; the other groups
    ///   get new block ids in increasing key order
    /// - the key function can read the partition as it was before the split
    ///
    /// Return the number of blocks created.
    ///
    pub fn refine_block_by_key<K, F>(&mut self, i: u32, key: F) -> u32
    where
        K: Ord,
        F: Fn(&Partition, u32) -> K,
    {
        let mut keyed: Vec<(K, u32)> = self.block_elements(i).map(|x| (key(self, x), x)).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        // run boundaries: positions where the key changes
        let cuts: Vec<usize> = (1..keyed.len()).filter(|&k| keyed[k - 1].0 != keyed[k].0).collect();

        let s = self.slice_mut(i);
        for (k, (_, x)) in keyed.iter().enumerate() {
            s[k] = *x;
        }

        // split from the last run backward so that positions stay relative to block i
        let mut new_blocks = Vec::with_capacity(cuts.len());
        for &cut in cuts.iter().rev() {
            new_blocks.push(self.split_block(i, cut));
        }
        // split_block assigned ids in reverse run order; restore increasing key order
        if new_blocks.len() > 1 {
            self.reorder_blocks(&mut new_blocks);
        }
        cuts.len() as u32
    }

    // new_blocks were created for runs listed last-to-first. Swap their headers so that
    // smaller ids correspond to earlier runs.
    fn reorder_blocks(&mut self, new_blocks: &mut [u32]) {
        let mut headers: Vec<BlockHeader> = new_blocks.iter().map(|&b| self.block[b as usize]).collect();
        headers.sort_by_key(|h| h.start);
        let mut ids: Vec<u32> = new_blocks.to_vec();
        ids.sort_unstable();
        for (id, header) in ids.iter().zip(headers) {
            self.block[*id as usize] = header;
            for k in header.start..header.end {
                self.block_id[self.segment[k] as usize] = *id;
            }
        }
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 1..self.num_blocks() {
            write!(f, "block[{i}]: ")?;
            for x in self.block_elements(i) {
                write!(f, " {x}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
