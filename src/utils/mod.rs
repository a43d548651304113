/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Miscellaneous utilities.

pub mod mtx;

mod partition;
pub use partition::*;

mod relaxed_slice;
pub use relaxed_slice::*;

mod sleep;
pub use sleep::*;
