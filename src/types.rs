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

use std::borrow::Cow;
use std::hash::Hasher as StdHasher;

use fnv::FnvHasher;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// A type for the replica index of each virtual node of every distinct consistent hashing ring
/// node.
///
/// This is merely a type alias for `u16` for now.
/// Therefore, each distinct [`Node`] in the [`HashRing<N, H>`] can be mapped at most
/// [`u16::MAX`] times on the consistent hashing ring.
///
///
///  [`HashRing<N, H>`]: ../struct.HashRing.html
pub type Vnid = u16;

/// A custom `Result` type for this crate, combining a return value with a [`HashRingError`].
pub type Result<T> = std::result::Result<T, HashRingError>;

/// A trait to be implemented by any type that needs to act as a distinct node in the consistent
/// hashing ring.
pub trait Node {
    /// Returns a byte slice that uniquely identifies the particular [`Node`] from the rest of its
    /// kind.
    fn hashring_node_id(&self) -> Cow<'_, [u8]>;
}

impl Node for String {
    #[inline]
    fn hashring_node_id(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Node for str {
    #[inline]
    fn hashring_node_id(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Node for Vec<u8> {
    #[inline]
    fn hashring_node_id(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Node for &[u8] {
    #[inline]
    fn hashring_node_id(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl Node for [u8] {
    #[inline]
    fn hashring_node_id(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

/// An error type returned by calls to the API exposed by this crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashRingError {
    /// The consistent hashing ring currently holds no virtual nodes, so no key can be assigned.
    #[error("HashRing is empty")]
    EmptyRing,
}

/// A trait to be implemented by any type that needs to act as a hash algorithm implementation.
///
/// The same `Hasher` places the virtual nodes on the ring and locates the keys on it, so the
/// output of [`Hasher::digest`] must be a pure function of its input.
///
/// For general information about how to use a custom [`Hasher`], please refer to the
/// documentation of the constructor methods of the [`HashRing<N, H>`].
///
///
///  [`HashRing<N, H>`]: ../struct.HashRing.html
// NOTE: The `Hasher` must also be `Clone`, so that a cloned ring keeps placing and locating
// everything exactly like the ring it was cloned from (e.g., with the same seed).
pub trait Hasher: Clone {
    /// Given a byte slice, returns its position on the `u64` ring.
    fn digest(&self, bytes: &[u8]) -> u64;
}

/// The default [`Hasher`], based on the 64-bit variant of the [XXH3][xxhash] non-cryptographic
/// hash function, as implemented in the [xxhash-rust][xxhash-rust] crate.
///
/// Its output does not depend on the platform or the Rust release, so rings built on different
/// machines place their virtual nodes identically.
///
///  [xxhash]: https://xxhash.com/
///  [xxhash-rust]: https://docs.rs/xxhash-rust/0.8/xxhash_rust/
#[derive(Debug, Default, Clone, Copy)]
pub struct Xxh3Hasher;

impl Hasher for Xxh3Hasher {
    #[inline]
    fn digest(&self, bytes: &[u8]) -> u64 {
        xxh3_64(bytes)
    }
}

/// A [`Hasher`] implementation for the 64-bit [FNV-1a][fnv] hash function, as implemented in the
/// [fnv][fnv-crate] crate.
///
/// FNV-1a is very cheap, but inputs that differ only in their trailing bytes (such as the
/// replica indices appended to a node's identifier) end up close to each other on the ring.
/// Prefer a higher replica count when using it.
///
/// # Examples
///
/// ```rust
/// use rwchring::{Fnv1aHasher, HashRing};
///
/// let ring: HashRing<str, Fnv1aHasher> = HashRing::with_hasher(Fnv1aHasher::default(), 64);
/// ring.add_node("NodeA");
/// assert_eq!(&*ring.get_node("my-key").unwrap(), "NodeA");
/// ```
///
///  [fnv]: http://www.isthe.com/chongo/tech/comp/fnv/
///  [fnv-crate]: https://docs.rs/fnv/1/fnv/
#[derive(Debug, Default, Clone, Copy)]
pub struct Fnv1aHasher;

impl Hasher for Fnv1aHasher {
    #[inline]
    fn digest(&self, bytes: &[u8]) -> u64 {
        let mut h = FnvHasher::default();
        h.write(bytes);
        h.finish()
    }
}

/// Interprets the first 8 bytes of a wider digest as a big-endian `u64`.
#[cfg(any(feature = "blake3-hash", feature = "blake2b-hash"))]
#[inline]
fn truncate_digest(digest: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(buf)
}

/// A [`Hasher`] implementation based on the [BLAKE3][BLAKE3.io] cryptographic hash function, as
/// implemented in the [blake3][blake3] crate.
///
/// The position on the ring is made of the first 8 bytes of the digest.
///
/// To use this `Hasher` implementation in `rwchring-rs`, the `blake3-hash` crate feature must be
/// enabled.
///
/// # Examples
///
/// Assuming the `blake3-hash` feature is enabled, a [`HashRing<N, H>`] that uses it can be
/// initialized as shown below:
///
/// ```rust
/// # #[cfg(feature = "blake3-hash")]
/// # fn main() {
/// use rwchring::{Blake3Hasher, HashRing, Vnid};
///
/// const VIRTUAL_NODES_PER_NODE: Vnid = 8;
///
/// let ring: HashRing<str, Blake3Hasher> =
///     HashRing::with_hasher(Blake3Hasher::default(), VIRTUAL_NODES_PER_NODE);
/// assert!(ring.is_empty());
/// # }
/// # #[cfg(not(feature = "blake3-hash"))]
/// # fn main() {}
/// ```
///
///  [BLAKE3.io]: https://blake3.io/
///  [blake3]: https://docs.rs/blake3/0.3/blake3/
///  [`HashRing<N, H>`]: struct.HashRing.html
#[cfg(any(feature = "blake3-hash", doc))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

#[cfg(feature = "blake3-hash")]
impl Hasher for Blake3Hasher {
    #[inline]
    fn digest(&self, bytes: &[u8]) -> u64 {
        truncate_digest(blake3::hash(bytes).as_bytes())
    }
}

/// A [`Hasher`] implementation based on the [BLAKE2b][BLAKE2b] cryptographic hash function, as
/// implemented in the [blake2b_simd][blake2b_simd] crate.
///
/// The position on the ring is made of the first 8 bytes of the digest.
///
/// To use this `Hasher` implementation in `rwchring-rs`, the `blake2b-hash` crate feature must be
/// enabled.
///
/// # Examples
///
/// Assuming the `blake2b-hash` feature is enabled, a [`HashRing<N, H>`] that uses it can be
/// initialized as shown below:
///
/// ```rust
/// # #[cfg(feature = "blake2b-hash")]
/// # fn main() {
/// use rwchring::{Blake2bHasher, HashRing, Vnid};
///
/// const VIRTUAL_NODES_PER_NODE: Vnid = 8;
///
/// let ring: HashRing<str, Blake2bHasher> =
///     HashRing::with_hasher(Blake2bHasher::default(), VIRTUAL_NODES_PER_NODE);
/// assert!(ring.is_empty());
/// # }
/// # #[cfg(not(feature = "blake2b-hash"))]
/// # fn main() {}
/// ```
///
///  [BLAKE2b]: https://www.blake2.net/
///  [blake2b_simd]: https://docs.rs/blake2b_simd/0.5/blake2b_simd/
///  [`HashRing<N, H>`]: struct.HashRing.html
#[cfg(any(feature = "blake2b-hash", doc))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake2bHasher;

#[cfg(feature = "blake2b-hash")]
impl Hasher for Blake2bHasher {
    #[inline]
    fn digest(&self, bytes: &[u8]) -> u64 {
        truncate_digest(blake2b_simd::blake2b(bytes).as_bytes())
    }
}
