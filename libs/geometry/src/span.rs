//! A one-dimensional span.
//!
//! A span represents the closed interval `[start, stop]`.
use serde::{Deserialize, Serialize};

/// A closed interval of coordinates in one dimension.
#[derive(
    Debug, Default, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, PartialEq, Eq,
)]
pub struct Span {
    start: i64,
    stop: i64,
}

impl Span {
    /// Creates a new [`Span`] between two integers, in either order.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Span::new(40, 10), Span::new(10, 40));
    /// ```
    pub fn new(start: i64, stop: i64) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(start, stop),
            stop: max(start, stop),
        }
    }

    /// Creates a span of zero length encompassing the given point.
    pub const fn from_point(x: i64) -> Self {
        Self { start: x, stop: x }
    }

    /// Creates a span of length `span` centered on `center`.
    ///
    /// Odd lengths put the extra unit above the center.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Span::from_center_span(0, 10), Span::new(-5, 5));
    /// assert_eq!(Span::from_center_span(0, 3), Span::new(-1, 2));
    /// ```
    pub fn from_center_span(center: i64, span: i64) -> Self {
        assert!(span >= 0, "span length must be non-negative");
        let lo = center - span / 2;
        Self::new(lo, lo + span)
    }

    /// The midpoint of the span, rounded down.
    pub const fn center(&self) -> i64 {
        (self.start + self.stop).div_euclid(2)
    }

    /// The length of the span.
    pub const fn length(&self) -> i64 {
        self.stop - self.start
    }

    /// The lower endpoint.
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// The upper endpoint.
    pub const fn stop(&self) -> i64 {
        self.stop
    }

    /// Grows both endpoints outward by `amount`.
    pub const fn expand_all(self, amount: i64) -> Self {
        Self {
            start: self.start - amount,
            stop: self.stop + amount,
        }
    }
}

impl From<(i64, i64)> for Span {
    fn from(value: (i64, i64)) -> Self {
        Self::new(value.0, value.1)
    }
}
