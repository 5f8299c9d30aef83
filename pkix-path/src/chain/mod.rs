// Copyright (c) 2026 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! Certificate chain types.
//!
//! [`NodeArena`] owns the nodes of one path search. Each node refers to the
//! node one step closer to the end-entity by [`NodeIndex`], so walking
//! "down" a branch never needs a pointer back into the arena. [`CertChain`]
//! is the search result, ordered from leaf (end-entity) to root (trust
//! anchor).

use alloc::vec::Vec;

use crate::certificate::BackCert;

/// Position of a node in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

// ============================================================================
// Node arena
// ============================================================================

/// Nodes of one `build_cert_chain` call.
///
/// Nodes are appended as the search climbs and truncated away when a branch
/// fails, so a node's child always has a smaller index than the node itself.
#[derive(Debug, Default)]
pub struct NodeArena<'a> {
    nodes: Vec<BackCert<'a>>,
}

impl<'a> NodeArena<'a> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, cert: BackCert<'a>) -> NodeIndex {
        self.nodes.push(cert);
        NodeIndex(self.nodes.len() - 1)
    }

    pub fn get(&self, index: NodeIndex) -> Option<&BackCert<'a>> {
        self.nodes.get(index.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node at or after `index`.
    pub fn truncate(&mut self, index: NodeIndex) {
        self.nodes.truncate(index.0);
    }

    /// `from` and each of its descendants, ending at the end-entity.
    pub fn walk_down(&self, from: NodeIndex) -> WalkDown<'_, 'a> {
        WalkDown {
            arena: self,
            next: Some(from),
        }
    }

    /// The branch ending at `top`, as a leaf-to-root chain.
    pub fn chain_to(&self, top: NodeIndex) -> CertChain<'a> {
        let mut certificates: Vec<BackCert<'a>> = self.walk_down(top).cloned().collect();
        certificates.reverse();
        CertChain::new(certificates)
    }
}

/// Iterator returned by [`NodeArena::walk_down`].
pub struct WalkDown<'r, 'a> {
    arena: &'r NodeArena<'a>,
    next: Option<NodeIndex>,
}

impl<'r, 'a> Iterator for WalkDown<'r, 'a> {
    type Item = &'r BackCert<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let cert = self.arena.get(self.next?)?;
        self.next = cert.child();
        Some(cert)
    }
}

// ============================================================================
// Certificate Chain
// ============================================================================

/// A certificate chain, ordered from leaf (end-entity) to root (trust anchor).
#[derive(Debug, Clone)]
pub struct CertChain<'a> {
    certificates: Vec<BackCert<'a>>,
}

impl<'a> CertChain<'a> {
    pub fn new(certificates: Vec<BackCert<'a>>) -> Self {
        Self { certificates }
    }

    /// Get the leaf (end-entity) certificate
    pub fn leaf(&self) -> Option<&BackCert<'a>> {
        self.certificates.first()
    }

    /// Get the root (trust anchor) certificate
    pub fn root(&self) -> Option<&BackCert<'a>> {
        self.certificates.last()
    }

    pub fn get(&self, index: usize) -> Option<&BackCert<'a>> {
        self.certificates.get(index)
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, BackCert<'a>> {
        self.certificates.iter()
    }

    /// DER of each certificate, leaf first.
    pub fn ders(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.certificates.iter().map(|cert| cert.der())
    }
}

impl<'c, 'a> IntoIterator for &'c CertChain<'a> {
    type Item = &'c BackCert<'a>;
    type IntoIter = core::slice::Iter<'c, BackCert<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
