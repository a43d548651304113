/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph representations.

pub mod random;

pub mod transposed;
pub use transposed::TransposeWithDegree;

pub mod vec_graph;
pub use vec_graph::VecGraph;

pub mod prelude {
    pub use super::transposed::TransposeWithDegree;
    pub use super::vec_graph::VecGraph;
}
