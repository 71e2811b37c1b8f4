//! Longest-span-wins overlap resolution

use alloc::vec::Vec;
use core::ops::Range;

/// Anything occupying a half-open `[start, end)` interval
pub trait Span {
    /// Inclusive start
    fn start(&self) -> usize;

    /// Exclusive end
    fn end(&self) -> usize;

    /// Length of the interval
    fn span_len(&self) -> usize {
        self.end().saturating_sub(self.start())
    }
}

impl Span for Range<usize> {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

impl Span for (usize, usize) {
    fn start(&self) -> usize {
        self.0
    }

    fn end(&self) -> usize {
        self.1
    }
}

/// Reduce spans sorted ascending by start to a non-overlapping list
///
/// When a candidate overlaps the last accepted span, the longer of the two
/// is kept; on equal length the earlier-accepted span stays. Input that is
/// not sorted by start gives unspecified (but non-panicking) results.
pub fn resolve_overlaps<T, I>(spans: I) -> Vec<T>
where
    T: Span,
    I: IntoIterator<Item = T>,
{
    let mut accepted: Vec<T> = Vec::new();

    for candidate in spans {
        match accepted.last_mut() {
            Some(last) if candidate.start() < last.end() => {
                if candidate.span_len() > last.span_len() {
                    *last = candidate;
                }
            }
            _ => accepted.push(candidate),
        }
    }

    accepted
}
