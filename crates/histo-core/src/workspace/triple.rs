use crate::histogram::Histogram;
use std::borrow::Cow;

/// The X, Y and E values of one bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triple {
    pub x: f64,
    pub y: f64,
    pub e: f64,
}

/// Iterator over the bins of a workspace's histogram.
#[derive(Debug)]
pub struct TripleIter<'a> {
    histogram: Cow<'a, Histogram>,
    index: usize,
}

impl<'a> TripleIter<'a> {
    pub(super) fn new(histogram: Cow<'a, Histogram>) -> Self {
        Self {
            histogram,
            index: 0,
        }
    }

    /// Bins present in all of X, Y and E.
    fn len_bins(&self) -> usize {
        let histogram = &self.histogram;
        histogram.x().len().min(histogram.y().len()).min(histogram.e().len())
    }
}

impl Iterator for TripleIter<'_> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        let index = self.index;
        let triple = Triple {
            x: *self.histogram.x().get(index)?,
            y: *self.histogram.y().get(index)?,
            e: *self.histogram.e().get(index)?,
        };
        self.index += 1;
        Some(triple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len_bins().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TripleIter<'_> {}
