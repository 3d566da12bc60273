//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::bbox::Bbox;
use crate::dir::Dir;
use crate::point::Point;
use crate::side::Side;
use crate::span::Span;
use crate::transform::TranslateMut;

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
#[derive(
    Debug, Default, Copy, Clone, Hash, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from two opposite corners, in any order.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::new(Point::new(30, 40), Point::new(10, 0));
    /// assert_eq!(rect, Rect::from_sides(10, 0, 30, 40));
    /// ```
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            p0: Point::new(a.x.min(b.x), a.y.min(b.y)),
            p1: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// # Panics
    ///
    /// This method panics if `left > right` or if `bot > top`.
    #[inline]
    pub fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        assert!(
            left <= right,
            "Rect::from_sides requires that left ({}) <= right ({})",
            left,
            right
        );
        assert!(
            bot <= top,
            "Rect::from_sides requires that bot ({}) <= top ({})",
            bot,
            top
        );
        Self {
            p0: Point::new(left, bot),
            p1: Point::new(right, top),
        }
    }

    /// Creates a zero-area rectangle containing the given point.
    #[inline]
    pub const fn from_point(p: Point) -> Self {
        Self { p0: p, p1: p }
    }

    /// Creates a rectangle from a horizontal and a vertical span.
    pub const fn from_spans(h: Span, v: Span) -> Self {
        Self {
            p0: Point::new(h.start(), v.start()),
            p1: Point::new(h.stop(), v.stop()),
        }
    }

    /// Creates a rectangle whose span along `dir` is `parallel_span`
    /// and whose span along the other direction is `perp_span`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_dir_spans(Dir::Vert, Span::new(0, 100), Span::new(-5, 5));
    /// assert_eq!(rect, Rect::from_sides(-5, 0, 5, 100));
    /// ```
    pub fn from_dir_spans(dir: Dir, parallel_span: Span, perp_span: Span) -> Self {
        match dir {
            Dir::Horiz => Self::from_spans(parallel_span, perp_span),
            Dir::Vert => Self::from_spans(perp_span, parallel_span),
        }
    }

    /// The bottom y-coordinate.
    pub const fn bot(&self) -> i64 {
        self.p0.y
    }

    /// The top y-coordinate.
    pub const fn top(&self) -> i64 {
        self.p1.y
    }

    /// The left x-coordinate.
    pub const fn left(&self) -> i64 {
        self.p0.x
    }

    /// The right x-coordinate.
    pub const fn right(&self) -> i64 {
        self.p1.x
    }

    /// The width of the rectangle.
    pub const fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    /// The height of the rectangle.
    pub const fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// The length of the rectangle along `dir`.
    pub const fn length(&self, dir: Dir) -> i64 {
        match dir {
            Dir::Horiz => self.width(),
            Dir::Vert => self.height(),
        }
    }

    /// The center point of the rectangle, rounded down.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 55, 45);
    /// assert_eq!(rect.center(), Point::new(27, 22));
    /// ```
    pub const fn center(&self) -> Point {
        Point::new(
            (self.p0.x + self.p1.x).div_euclid(2),
            (self.p0.y + self.p1.y).div_euclid(2),
        )
    }

    /// The coordinate of the given side.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(10, 20, 30, 40);
    /// assert_eq!(rect.side(Side::Left), 10);
    /// assert_eq!(rect.side(Side::Top), 40);
    /// ```
    pub const fn side(&self, side: Side) -> i64 {
        match side {
            Side::Top => self.top(),
            Side::Bot => self.bot(),
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    /// The center point of the given side's edge.
    pub const fn side_center(&self, side: Side) -> Point {
        let c = self.center();
        Point::from_dir_coords(side.coord_dir(), self.side(side), c.coord(side.edge_dir()))
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self::new(
            Point::new(self.left().min(other.left()), self.bot().min(other.bot())),
            Point::new(self.right().max(other.right()), self.top().max(other.top())),
        )
    }
}

impl Bbox for Rect {
    fn bbox(&self) -> Option<Rect> {
        Some(*self)
    }
}

impl TranslateMut for Rect {
    fn translate_mut(&mut self, p: Point) {
        self.p0.translate_mut(p);
        self.p1.translate_mut(p);
    }
}
