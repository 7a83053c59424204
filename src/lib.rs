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

//! A concurrent, in-memory consistent hashing ring data structure, supporting virtual nodes.
//!
//! A [`HashRing<N, H>`] assigns arbitrary keys to a dynamic set of distinct [`Node`]s so that:
//! - each key is assigned to exactly one `Node` at any point in time, deterministically;
//! - adding or removing a `Node` only moves the keys that are (or were) assigned to it, which is
//!   about `1/N` of them;
//! - keys are spread evenly among the `Node`s, because each one of them is represented by several
//!   [`VirtualNode`]s scattered around the ring.
//!
//! The ring only records membership decisions made by its user and answers "which `Node` owns
//! this key"; it neither moves data around nor talks to the network.
//!
//! # Positions & keys
//!
//! Every [`VirtualNode`] lies at a `u64` position, produced by hashing the `Node`'s identifier
//! (i.e., the output of [`Node::hashring_node_id`]) followed by the decimal representation of the
//! virtual node's replica index. For instance, with 3 virtual nodes per `Node`, `"NodeA"` lies at
//! the positions of `"NodeA0"`, `"NodeA1"` and `"NodeA2"`.
//!
//! A key is hashed by the same [`Hasher`] and is assigned to the first `VirtualNode` at or after
//! its position; keys past the last `VirtualNode` wrap around to the first one.
//!
//! In the rare case that two `VirtualNode`s of different `Node`s end up at the same position, the
//! one inserted last takes it; this is not treated as an error.
//!
//! # Hashers
//!
//! The default [`Hasher`] is [`Xxh3Hasher`]. [`Fnv1aHasher`] is always available too, and the
//! cryptographic [`Blake3Hasher`] and [`Blake2bHasher`] can be enabled through the `blake3-hash`
//! and `blake2b-hash` crate features respectively. Any type implementing [`Hasher`] may be used
//! via [`HashRing::with_hasher`].
//!
//! # Concurrency
//!
//! All state of a [`HashRing<N, H>`] is guarded by a single reader-writer lock. Adding or removing
//! a `Node` takes it exclusively, so that concurrent lookups (which share it) observe each change
//! either entirely or not at all.
//!
//! In multi-threaded contexts, [`HashRing<N, H>`] should be explicitly wrapped in [`Arc`]. This is
//! deliberate, to expose the hidden cost of atomic reference counting and also give a chance to
//! single-threaded contexts to opt out of it.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use rwchring::HashRing;
//!
//! let ring: Arc<HashRing<str>> = Arc::new(HashRing::new(64));
//! ring.add_node("NodeA");
//! ring.add_node("NodeB");
//!
//! let owner = ring.get_node("tottenham").unwrap();
//!
//! // Lookups are deterministic, from any thread.
//! let r = Arc::clone(&ring);
//! let same = thread::spawn(move || r.get_node("tottenham").unwrap()).join().unwrap();
//! assert_eq!(owner, same);
//!
//! // Removing the owner moves the key to the surviving node...
//! ring.remove_node(&owner);
//! assert_ne!(ring.get_node("tottenham").unwrap(), owner);
//!
//! // ...and restoring it restores the original assignment.
//! ring.add_node(Arc::clone(&owner));
//! assert_eq!(ring.get_node("tottenham").unwrap(), owner);
//! ```
//!
//!
//!  [`HashRing<N, H>`]: struct.HashRing.html
//!  [`Arc`]: https://doc.rust-lang.org/std/sync/struct.Arc.html

#![doc(html_root_url = "https://docs.rs/rwchring/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod iter;
mod ring;
mod state;
mod types;
mod vnode;

pub use crate::iter::Iter;
pub use crate::ring::HashRing;
pub use crate::types::{Fnv1aHasher, HashRingError, Hasher, Node, Result, Vnid, Xxh3Hasher};
pub use crate::vnode::VirtualNode;

#[cfg(any(feature = "blake2b-hash", doc))]
pub use crate::types::Blake2bHasher;
#[cfg(any(feature = "blake3-hash", doc))]
pub use crate::types::Blake3Hasher;
