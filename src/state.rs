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

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::trace;

use crate::{
    types::{HashRingError, Hasher, Node, Result, Vnid},
    vnode::{position_input, VirtualNode},
};

/// The index behind a [`HashRing<N, H>`]; it knows nothing about locking.
///
///
///  [`HashRing<N, H>`]: ../struct.HashRing.html
#[derive(Debug)]
pub(crate) struct HashRingState<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    hasher: H,
    vnodes_per_node: Vnid,
    // Membership, keyed by `Node::hashring_node_id()`.
    pub(crate) nodes: BTreeMap<Vec<u8>, Arc<N>>,
    // Sorted by position, at most one entry per position.
    pub(crate) vnodes: Vec<VirtualNode<N>>,
}

impl<N, H> Clone for HashRingState<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            vnodes_per_node: self.vnodes_per_node,
            nodes: self.nodes.clone(),
            vnodes: self.vnodes.clone(),
        }
    }
}

impl<N, H> HashRingState<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    #[inline]
    pub(crate) fn with_capacity(capacity: usize, hasher: H, vnodes_per_node: Vnid) -> Self {
        Self {
            hasher,
            vnodes_per_node,
            nodes: BTreeMap::new(),
            vnodes: Vec::with_capacity(capacity * vnodes_per_node as usize),
        }
    }

    /// Places all virtual nodes of `node` on the ring and records it as a member.
    ///
    /// A position that is already occupied is handed over to `node` (last write wins); for a node
    /// that is already a member this rewrites its own positions and changes nothing.
    pub(crate) fn insert(&mut self, node: Arc<N>) {
        let node_id = node.hashring_node_id().into_owned();
        for vnid in 0..self.vnodes_per_node {
            let vn = VirtualNode::new(&self.hasher, Arc::clone(&node), vnid);
            match self.vnodes.binary_search(&vn) {
                Ok(index) => {
                    if !self.vnodes[index].is_owned_by(&node_id) {
                        trace!("hash collision; vnode '{}' overwrites '{}'", vn, self.vnodes[index]);
                    }
                    self.vnodes[index] = vn;
                }
                Err(index) => self.vnodes.insert(index, vn),
            }
        }
        self.nodes.insert(node_id, node);
    }

    /// Takes all virtual nodes of `node` off the ring and drops it from the membership.
    ///
    /// Returns `false`, leaving the state untouched, if `node` is not a member.
    pub(crate) fn remove(&mut self, node: &N) -> bool {
        let node_id = node.hashring_node_id();
        if !self.nodes.contains_key(&*node_id) {
            return false;
        }

        let mut input = Vec::with_capacity(node_id.len() + 5);
        for vnid in 0..self.vnodes_per_node {
            position_input(&mut input, &node_id, vnid);
            let position = self.hasher.digest(&input);
            if let Ok(index) = self.vnodes.binary_search_by_key(&position, |vn| vn.position) {
                // A colliding node may have taken this position over since; it stays theirs.
                if self.vnodes[index].is_owned_by(&node_id) {
                    let vn = self.vnodes.remove(index);
                    trace!("vnode '{}' removed from index {}", vn, index);
                }
            }
        }
        self.nodes.remove(&*node_id);
        true
    }

    #[inline]
    pub(crate) fn vnodes_per_node(&self) -> Vnid {
        self.vnodes_per_node
    }

    #[inline]
    pub(crate) fn len_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn len_virtual_nodes(&self) -> usize {
        self.vnodes.len()
    }

    #[inline]
    pub(crate) fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(&*node.hashring_node_id())
    }

    pub(crate) fn nodes(&self) -> Vec<Arc<N>> {
        self.nodes.values().cloned().collect()
    }

    pub(crate) fn has_virtual_node(&self, position: u64) -> bool {
        self.vnodes
            .binary_search_by_key(&position, |vn| vn.position)
            .is_ok()
    }

    // returns a reference to the actual `VirtualNode` in `HashRingState.vnodes`
    pub(crate) fn virtual_node_for_key(&self, key: &[u8]) -> Result<&VirtualNode<N>> {
        // Return an error if the ring is empty...
        if self.vnodes.is_empty() {
            return Err(HashRingError::EmptyRing);
        }
        // ...otherwise find the first vnode at or after the key's position, wrapping around past
        // the last one.
        let position = self.hasher.digest(key);
        let index = self
            .vnodes
            .binary_search_by_key(&position, |vn| vn.position)
            .unwrap_or_else(|index| index)
            % self.vnodes.len();
        Ok(&self.vnodes[index])
    }
}

impl<N, H> Display for HashRingState<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "HashRingState ({} nodes X {} virtual) {{",
            self.len_nodes(),
            self.vnodes_per_node,
        )?;
        for (i, vn) in self.vnodes.iter().enumerate() {
            writeln!(f, "\t- ({:0>6})  {}", i, vn)?
        }
        writeln!(f, "}}")
    }
}
