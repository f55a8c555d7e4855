//! Caller owned reply chains.
//!
//! A chain is a sequence of reply nodes handed to the caller in answer order.
//! Walking it goes through [`Link`], which mirrors the `next` pointer of the
//! legacy linked lists while the nodes stay in one contiguous allocation.

use rrwire::alloc::{try_reserve, try_vec, AllocGate};
use rrwire::error::Result;

use std::ops::Deref;

#[derive(Debug, PartialEq, Eq)]
pub struct ReplyChain<T> {
    nodes: Vec<T>,
}

impl<T> ReplyChain<T> {
    /// Empty chain with room for `capacity` nodes, asking `gate` first.
    pub(crate) fn with_capacity(gate: &dyn AllocGate, capacity: usize) -> Result<Self> {
        Ok(ReplyChain {
            nodes: try_vec(gate, capacity)?,
        })
    }

    pub(crate) fn push(&mut self, gate: &dyn AllocGate, node: T) -> Result<()> {
        try_reserve(gate, &mut self.nodes, 1)?;
        self.nodes.push(node);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Head of the chain
    pub fn first(&self) -> Option<Link<'_, T>> {
        Link::at(&self.nodes, 0)
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.nodes.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.nodes
    }

    pub fn into_vec(self) -> Vec<T> {
        self.nodes
    }
}

impl<'a, T> IntoIterator for &'a ReplyChain<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// A borrowed position in a chain.
#[derive(Debug)]
pub struct Link<'a, T> {
    nodes: &'a [T],
    idx: usize,
}

impl<'a, T> Clone for Link<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Link<'a, T> {}

impl<'a, T> Link<'a, T> {
    fn at(nodes: &'a [T], idx: usize) -> Option<Self> {
        if idx < nodes.len() {
            Some(Link { nodes, idx })
        } else {
            None
        }
    }

    /// Following node, `None` at the tail
    pub fn next(&self) -> Option<Link<'a, T>> {
        Link::at(self.nodes, self.idx + 1)
    }

    pub fn get(&self) -> &'a T {
        &self.nodes[self.idx]
    }

    /// Position of this node in its chain
    pub fn index(&self) -> usize {
        self.idx
    }
}

impl<'a, T> Deref for Link<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

/// Release a chain handed out by one of the reply parsers. `None` is a no-op.
pub fn free_data<T>(chain: Option<ReplyChain<T>>) {
    drop(chain);
}
