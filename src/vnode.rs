// This file is part of rwchring-rs.
//
// Copyright 2021 Christos Katsakioris
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher as StdHasher};
use std::sync::Arc;

use crate::types::{Hasher, Node, Vnid};

/// A single virtual node of some [`Node`] on the consistent hashing ring.
///
/// Each distinct [`Node`] in the [`HashRing<N, H>`] is represented by as many `VirtualNode`s as
/// the ring's replica count, each one placed at the position produced by hashing the node's
/// identifier followed by the decimal representation of its replica index.
///
/// Two `VirtualNode`s are considered equal (and are ordered) based on their position alone.
///
///
///  [`HashRing<N, H>`]: struct.HashRing.html
#[derive(Debug)]
pub struct VirtualNode<N>
where
    N: Node + ?Sized,
{
    pub(crate) position: u64,
    pub(crate) node: Arc<N>,
    vnid: Vnid,
}

/// Builds the bytes that are hashed to place replica `vnid` of the node identified by `node_id`.
///
/// The buffer is cleared first, so that callers may reuse it across replicas.
#[inline]
pub(crate) fn position_input(buf: &mut Vec<u8>, node_id: &[u8], vnid: Vnid) {
    use std::io::Write;

    buf.clear();
    buf.extend_from_slice(node_id);
    // Writing into a `Vec<u8>` cannot fail.
    let _ = write!(buf, "{}", vnid);
}

impl<N> VirtualNode<N>
where
    N: Node + ?Sized,
{
    pub(crate) fn new<H: Hasher>(hasher: &H, node: Arc<N>, vnid: Vnid) -> Self {
        let mut input = Vec::new();
        position_input(&mut input, &node.hashring_node_id(), vnid);
        VirtualNode {
            position: hasher.digest(&input),
            node,
            vnid,
        }
    }

    /// Returns the position of the `VirtualNode` on the `u64` ring.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns the distinct [`Node`] this `VirtualNode` belongs to.
    #[inline]
    pub fn node(&self) -> &Arc<N> {
        &self.node
    }

    /// Returns the replica index that produced this `VirtualNode`'s position.
    #[inline]
    pub fn vnid(&self) -> Vnid {
        self.vnid
    }

    #[inline]
    pub(crate) fn is_owned_by(&self, node_id: &[u8]) -> bool {
        *self.node.hashring_node_id() == *node_id
    }
}

impl<N> Clone for VirtualNode<N>
where
    N: Node + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            node: Arc::clone(&self.node),
            vnid: self.vnid,
        }
    }
}

// Required for `Eq`.
impl<N> PartialEq for VirtualNode<N>
where
    N: Node + ?Sized,
{
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

// Required for `Ord`.
impl<N> Eq for VirtualNode<N> where N: Node + ?Sized {}

// Required for `Ord`.
impl<N> PartialOrd for VirtualNode<N>
where
    N: Node + ?Sized,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Ordering `VirtualNode`s only depends on their position, therefore we implement it rather than
// derive it.
impl<N> Ord for VirtualNode<N>
where
    N: Node + ?Sized,
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.position.cmp(&other.position)
    }
}

// Must agree with `PartialEq`: if (x == y) then (hash(x) == hash(y)).
impl<N> Hash for VirtualNode<N>
where
    N: Node + ?Sized,
{
    fn hash<H: StdHasher>(&self, hasher: &mut H) {
        self.position.hash(hasher);
    }
}

impl<N> Display for VirtualNode<N>
where
    N: Node + ?Sized,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let node = self.node.hashring_node_id();
        write!(
            f,
            "{:016x} ({}-{})",
            self.position,
            String::from_utf8_lossy(&node),
            self.vnid
        )
    }
}
