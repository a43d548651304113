/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::PredecessorGraph;
use std::iter::Copied;
use std::slice::Iter;

/// The transpose of a directed graph in compressed sparse-row format, in
/// which each predecessor is stored together with its outdegree.
///
/// The degree-cumulative function `dcf` has `n + 1` entries: the
/// predecessors of node *v* are `preds[dcf[v]..dcf[v + 1]]`, in increasing
/// order. The separate `outdegrees` array is needed to locate dead ends, as
/// a node with no successors never appears as a predecessor.
///
/// Instances are built by
/// [`transpose_with_degree`](crate::transform::transpose_with_degree).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransposeWithDegree {
    dcf: Box<[usize]>,
    preds: Box<[(usize, usize)]>,
    outdegrees: Box<[usize]>,
}

impl TransposeWithDegree {
    /// Creates a new transpose from its parts.
    ///
    /// # Panics
    ///
    /// Panics if the parts are not coherent: the degree-cumulative function
    /// must have one more entry than `outdegrees`, start at zero, be
    /// monotone, and end at the number of predecessors.
    pub(crate) fn from_parts(
        dcf: Box<[usize]>,
        preds: Box<[(usize, usize)]>,
        outdegrees: Box<[usize]>,
    ) -> Self {
        assert_eq!(dcf.len(), outdegrees.len() + 1);
        assert_eq!(dcf[0], 0);
        assert_eq!(dcf[dcf.len() - 1], preds.len());
        debug_assert!(dcf.windows(2).all(|w| w[0] <= w[1]));
        Self {
            dcf,
            preds,
            outdegrees,
        }
    }

    /// Returns the indegree of a node, that is, the number of its
    /// predecessors.
    #[inline(always)]
    pub fn indegree(&self, node: usize) -> usize {
        self.dcf[node + 1] - self.dcf[node]
    }

    /// Returns the outdegrees of all nodes in the original graph.
    pub fn outdegrees(&self) -> &[usize] {
        &self.outdegrees
    }
}

impl PredecessorGraph for TransposeWithDegree {
    type Predecessors<'a> = Copied<Iter<'a, (usize, usize)>>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.outdegrees.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.preds.len() as u64
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.outdegrees[node]
    }

    #[inline(always)]
    fn predecessors(&self, node: usize) -> Self::Predecessors<'_> {
        self.preds[self.dcf[node]..self.dcf[node + 1]]
            .iter()
            .copied()
    }
}
