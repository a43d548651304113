/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use atomic_float::AtomicF64;
use std::sync::atomic::Ordering;

/// A boxed slice of `f64` that can be read and written concurrently with
/// relaxed consistency.
///
/// This is the shared rank vector of the
/// [barrier-free solver](crate::rank::BarrierFree). The contract is:
///
/// - _exclusive writer_: every slot is written by a single thread during the
///   whole computation (this is not checked, but it is what makes updates
///   never lost);
/// - _weak reads_: a read of a slot returns the initial value or some value
///   stored by its writer, but there is no guarantee about _which_ one; in
///   particular, a reader may see a value older than one that another
///   reader has already seen. Values are never torn.
///
/// Every access is a [relaxed](Ordering::Relaxed) atomic operation, so on
/// mainstream architectures it compiles to a plain load or store; the point
/// is that concurrent reads and writes are well defined, rather than being a
/// data race.
///
/// Visibility of all stores is guaranteed only after the writing threads
/// have been joined; [`into_boxed_slice`](Self::into_boxed_slice) consumes
/// the slice for this reason.
#[derive(Debug)]
pub struct RelaxedSlice(Box<[AtomicF64]>);

impl RelaxedSlice {
    /// Creates a new relaxed slice with the content of `values`.
    pub fn from_slice(values: &[f64]) -> Self {
        Self(values.iter().map(|&x| AtomicF64::new(x)).collect())
    }

    /// Returns the length of the slice.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the slice is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns some value stored at `index`, with weak-read semantics.
    ///
    /// # Panics
    ///
    /// Panics if the index is not within bounds.
    #[inline(always)]
    pub fn get(&self, index: usize) -> f64 {
        self.0[index].load(Ordering::Relaxed)
    }

    /// Stores a value at `index`.
    ///
    /// Only the designated writer of the slot should call this method.
    ///
    /// # Panics
    ///
    /// Panics if the index is not within bounds.
    #[inline(always)]
    pub fn set(&self, index: usize, value: f64) {
        self.0[index].store(value, Ordering::Relaxed)
    }

    /// Copies the current content into `dst`, with weak-read semantics for
    /// each element; the copy is not an atomic snapshot of the whole slice.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn copy_to(&self, dst: &mut [f64]) {
        assert_eq!(self.len(), dst.len());
        for (d, s) in dst.iter_mut().zip(self.0.iter()) {
            *d = s.load(Ordering::Relaxed);
        }
    }

    /// Consumes the slice, returning its final content.
    pub fn into_boxed_slice(self) -> Box<[f64]> {
        self.0
            .into_vec()
            .into_iter()
            .map(AtomicF64::into_inner)
            .collect()
    }
}
