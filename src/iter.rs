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

use std::iter::FusedIterator;
use std::vec;

use crate::{types::Node, vnode::VirtualNode};

/// An iterator over the [`VirtualNode`]s of a [`HashRing<N, H>`], in ascending order of their
/// positions on the ring.
///
/// It is created by [`HashRing::iter`], which copies the virtual nodes out of the ring while
/// holding its read lock. The iterator therefore works on a snapshot: [`Node`]s added to or
/// removed from the ring after its creation are not reflected, and holding it does not block
/// writers.
///
///
///  [`HashRing<N, H>`]: struct.HashRing.html
///  [`HashRing::iter`]: struct.HashRing.html#method.iter
#[derive(Debug)]
pub struct Iter<N>
where
    N: Node + ?Sized,
{
    vnodes: vec::IntoIter<VirtualNode<N>>,
}

impl<N> Iter<N>
where
    N: Node + ?Sized,
{
    #[inline]
    pub(crate) fn new(vnodes: Vec<VirtualNode<N>>) -> Self {
        Iter {
            vnodes: vnodes.into_iter(),
        }
    }
}

impl<N> Iterator for Iter<N>
where
    N: Node + ?Sized,
{
    type Item = VirtualNode<N>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.vnodes.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.vnodes.size_hint()
    }
}

impl<N> DoubleEndedIterator for Iter<N>
where
    N: Node + ?Sized,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.vnodes.next_back()
    }
}

impl<N> ExactSizeIterator for Iter<N>
where
    N: Node + ?Sized,
{
    #[inline]
    fn len(&self) -> usize {
        self.vnodes.len()
    }
}

impl<N: Node + ?Sized> FusedIterator for Iter<N> {}
