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
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::RwLock;

use crate::{
    iter::Iter,
    state::HashRingState,
    types::{Hasher, Node, Result, Vnid, Xxh3Hasher},
    vnode::VirtualNode,
};

/// The consistent hashing ring data structure.
///
/// Users will probably interact with this crate mostly through this type, as it is central to its
/// API.
///
/// All of its state sits behind a single reader-writer lock: [`HashRing::add_node`] and
/// [`HashRing::remove_node`] hold it exclusively for their whole duration, while lookups share it.
/// A lookup thus observes each membership change either entirely or not at all.
///
/// In multi-threaded contexts, it needs to be wrapped in [`Arc`].
///
/// To find out more general information regarding its use, refer to the crate-level documentation.
#[derive(Debug)]
pub struct HashRing<N, H = Xxh3Hasher>
where
    N: Node + ?Sized,
    H: Hasher,
{
    inner: RwLock<HashRingState<N, H>>,
}

impl<N, H> Clone for HashRing<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    /// Returns an independent [`HashRing<N, H>`] that starts out with the same [`Node`]s.
    fn clone(&self) -> Self {
        Self {
            inner: RwLock::new(self.inner.read().clone()),
        }
    }
}

impl<N> HashRing<N, Xxh3Hasher>
where
    N: Node + ?Sized,
{
    /// Create a new [`HashRing<N, H>`] that places `vnodes_per_node` virtual nodes on the ring for
    /// each [`Node`], and initialize it with the provided `Node`s.
    ///
    /// The new [`HashRing<N, H>`] will employ the default [`Xxh3Hasher`].
    #[inline]
    pub fn with_nodes(vnodes_per_node: Vnid, nodes: &[Arc<N>]) -> Self {
        Self::with_hasher_and_nodes(Xxh3Hasher::default(), vnodes_per_node, nodes)
    }

    /// Create a new [`HashRing<N, H>`] that places `vnodes_per_node` virtual nodes on the ring for
    /// each [`Node`], which is initially empty of `Node`s.
    ///
    /// The new [`HashRing<N, H>`] will employ the default [`Xxh3Hasher`].
    ///
    /// A `vnodes_per_node` of `0` is accepted, but such a ring never holds any [`VirtualNode`]
    /// and thus never assigns a key to any [`Node`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rwchring::HashRing;
    ///
    /// let ring: HashRing<str> = HashRing::new(3);
    /// assert!(ring.get_node("my-key").is_none());
    /// ```
    #[inline]
    pub fn new(vnodes_per_node: Vnid) -> Self {
        Self::with_hasher_and_nodes(Xxh3Hasher::default(), vnodes_per_node, &[])
    }
}

impl<N, H> HashRing<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    /// Create a new [`HashRing<N, H>`] that places `vnodes_per_node` virtual nodes on the ring for
    /// each [`Node`], and initialize it with the provided `Node`s.
    ///
    /// The new [`HashRing<N, H>`] will employ the provided [`Hasher`] both for placing the
    /// [`VirtualNode`]s and for locating keys on the consistent hashing ring.
    pub fn with_hasher_and_nodes(hasher: H, vnodes_per_node: Vnid, nodes: &[Arc<N>]) -> Self {
        let mut inner = HashRingState::with_capacity(nodes.len(), hasher, vnodes_per_node);
        for node in nodes {
            inner.insert(Arc::clone(node));
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Create a new [`HashRing<N, H>`] that places `vnodes_per_node` virtual nodes on the ring for
    /// each [`Node`], which is initially empty of `Node`s.
    ///
    /// The new [`HashRing<N, H>`] will employ the provided [`Hasher`] both for placing the
    /// [`VirtualNode`]s and for locating keys on the consistent hashing ring.
    #[inline]
    pub fn with_hasher(hasher: H, vnodes_per_node: Vnid) -> Self {
        Self::with_hasher_and_nodes(hasher, vnodes_per_node, &[])
    }

    /// Returns the number of virtual nodes each [`Node`] is represented by on the ring.
    #[inline]
    pub fn replicas(&self) -> Vnid {
        self.inner.read().vnodes_per_node()
    }

    /// Returns the number of distinct ring nodes that currently populate the consistent hashing
    /// ring.
    pub fn len_nodes(&self) -> usize {
        self.inner.read().len_nodes()
    }

    /// Returns the number of *virtual nodes* that currently populate the consistent hashing ring.
    ///
    /// This is equal to the result of [`HashRing::len_nodes`] multiplied by
    /// [`HashRing::replicas`], unless some positions collided.
    pub fn len_virtual_nodes(&self) -> usize {
        self.inner.read().len_virtual_nodes()
    }

    /// Returns `true` if no key can currently be assigned to any [`Node`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len_virtual_nodes() == 0
    }

    /// Add the given [`Node`] to the consistent hashing ring, placing all of its virtual nodes.
    ///
    /// Adding a `Node` that is already in the ring changes nothing. If one of its positions is
    /// already occupied by another `Node`'s virtual node, the new `Node` takes it over.
    pub fn add_node<T>(&self, node: T)
    where
        T: Into<Arc<N>>,
    {
        let node = node.into();
        let mut inner = self.inner.write();
        inner.insert(Arc::clone(&node));
        debug!(
            "node '{}' added; ring now holds {} nodes, {} virtual",
            String::from_utf8_lossy(&node.hashring_node_id()),
            inner.len_nodes(),
            inner.len_virtual_nodes()
        );
    }

    /// Remove the given [`Node`] from the consistent hashing ring, along with all of its virtual
    /// nodes.
    ///
    /// Keys previously assigned to it move to the next virtual node clockwise. Removing a `Node`
    /// that is not in the ring is a no-op.
    pub fn remove_node(&self, node: &N) {
        let mut inner = self.inner.write();
        if inner.remove(node) {
            debug!(
                "node '{}' removed; ring now holds {} nodes, {} virtual",
                String::from_utf8_lossy(&node.hashring_node_id()),
                inner.len_nodes(),
                inner.len_virtual_nodes()
            );
        } else {
            trace!(
                "node '{}' is not in the ring; nothing to remove",
                String::from_utf8_lossy(&node.hashring_node_id())
            );
        }
    }

    /// Returns `true` if the given [`Node`] is currently in the ring.
    pub fn contains_node(&self, node: &N) -> bool {
        self.inner.read().contains(node)
    }

    /// Returns the [`Node`]s currently in the ring, ordered by their
    /// [`Node::hashring_node_id`].
    pub fn nodes(&self) -> Vec<Arc<N>> {
        self.inner.read().nodes()
    }

    /// Returns `true` if some [`VirtualNode`] currently occupies the given `position`.
    pub fn has_virtual_node(&self, position: u64) -> bool {
        self.inner.read().has_virtual_node(position)
    }

    /// Look up in the consistent hashing ring and return the [`Node`] that the given `key` is
    /// assigned to, i.e., the owner of the first virtual node at or after the key's position,
    /// wrapping around to the first virtual node past the end of the ring.
    ///
    /// Returns `None` if the ring currently holds no virtual nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rwchring::HashRing;
    ///
    /// let ring: HashRing<str> = HashRing::new(3);
    /// ring.add_node("NodeA");
    /// ring.add_node("NodeB");
    ///
    /// let owner = ring.get_node("my-key").unwrap();
    /// assert!(&*owner == "NodeA" || &*owner == "NodeB");
    /// ```
    pub fn get_node<K>(&self, key: &K) -> Option<Arc<N>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let inner = self.inner.read();
        inner
            .virtual_node_for_key(key.as_ref())
            .ok()
            .map(|vn| Arc::clone(&vn.node))
    }

    /// Look up in the consistent hashing ring and return a **clone** of the [`VirtualNode`] that
    /// the given `key` is assigned to.
    ///
    /// # Errors
    ///
    /// Returns [`HashRingError::EmptyRing`] if the consistent hashing ring is currently empty of
    /// [`VirtualNode`]s and therefore the given `key` cannot be assigned to any of them.
    ///
    ///
    ///  [`HashRingError::EmptyRing`]: enum.HashRingError.html#variant.EmptyRing
    pub fn virtual_node_for_key<K>(&self, key: &K) -> Result<VirtualNode<N>>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let inner = self.inner.read();
        let vn = inner.virtual_node_for_key(key.as_ref())?;
        trace!("key {:x?} is assigned to vnode {}", key.as_ref(), vn);
        Ok(vn.clone())
    }

    /// Returns an [`Iter`], i.e., an iterator to loop through all [`VirtualNode`]s that populate
    /// the consistent hashing ring, in ascending order of their positions.
    ///
    /// See the documentation of [`Iter`] for more information regarding its use.
    pub fn iter(&self) -> Iter<N> {
        Iter::new(self.inner.read().vnodes.clone())
    }
}

impl<N, H> Extend<Arc<N>> for HashRing<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    /// Extend the [`HashRing<N, H>`] by the [`Node`]s provided through the given [`IntoIterator`]
    /// over `Arc<N>`, all within a single exclusive section.
    ///
    /// Note that, due to the restriction of [`Extend::extend`]'s signature, a `&mut HashRing` is
    /// required to use this method; [`HashRing::add_node`] only needs a shared reference.
    fn extend<I: IntoIterator<Item = Arc<N>>>(&mut self, iter: I) {
        let inner = self.inner.get_mut();
        for node in iter {
            inner.insert(node);
        }
        debug!(
            "ring extended; now holds {} nodes, {} virtual",
            inner.len_nodes(),
            inner.len_virtual_nodes()
        );
    }
}

impl<N, H> Display for HashRing<N, H>
where
    N: Node + ?Sized,
    H: Hasher,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self.inner.read())
    }
}
