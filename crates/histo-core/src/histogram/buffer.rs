//! Reference-counted copy-on-write storage for one histogram array.

use crate::domain::{HistoError, HistoResult};
use std::sync::Arc;

/// A shared, fixed-length sequence of `f64` values.
///
/// Cloning a buffer clones the reference, not the values. The first mutable
/// access through a shared handle detaches it onto a private copy, so a write
/// through one handle is never visible through another.
#[derive(Debug, Clone, Default)]
pub struct HistogramBuffer {
    values: Arc<Vec<f64>>,
}

impl HistogramBuffer {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }

    /// Builds a buffer from a sequence that may be missing altogether.
    pub fn try_from_optional(values: Option<&[f64]>) -> HistoResult<Self> {
        values.map(Self::from_slice).ok_or_else(|| {
            HistoError::invalid_argument(
                "BUFFER.NULL_SEQUENCE",
                "cannot construct a histogram buffer from a missing sequence",
            )
        })
    }

    pub fn get(&self) -> &[f64] {
        &self.values
    }

    /// Writable view of the values, detaching from other owners first.
    ///
    /// Any view previously taken through another handle keeps pointing at the
    /// old storage.
    pub fn get_mutable(&mut self) -> &mut [f64] {
        self.make_unique();
        Arc::make_mut(&mut self.values).as_mut_slice()
    }

    /// Ensures this handle is the sole owner of its storage.
    pub fn make_unique(&mut self) {
        if self.is_shared() {
            tracing::trace!(
                len = self.values.len(),
                owners = Arc::strong_count(&self.values),
                "detaching shared histogram buffer"
            );
            self.values = Arc::new(self.values.as_ref().clone());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.values) > 1
    }

    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.values)
    }

    /// True when both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.as_ref().clone()
    }
}

impl PartialEq for HistogramBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.values == other.values
    }
}

impl From<Vec<f64>> for HistogramBuffer {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for HistogramBuffer {
    fn from(values: &[f64]) -> Self {
        Self::from_slice(values)
    }
}

impl<const N: usize> From<[f64; N]> for HistogramBuffer {
    fn from(values: [f64; N]) -> Self {
        Self::new(values.to_vec())
    }
}

impl FromIterator<f64> for HistogramBuffer {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
