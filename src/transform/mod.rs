/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Transformations preparing a graph for the solvers.

mod self_loops;
pub use self_loops::*;

mod transpose;
pub use transpose::*;
