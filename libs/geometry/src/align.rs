//! Traits for aligning geometric objects.

use serde::{Deserialize, Serialize};

use crate::{
    point::Point,
    rect::Rect,
    transform::{Translate, TranslateMut},
};

/// An enumeration of possible alignment modes between two rectangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignMode {
    /// Align the centers of the two shapes horizontally.
    CenterHorizontal,
    /// Align the centers of the two shapes vertically.
    CenterVertical,
    /// Align the left side of one shape to the right side of the other.
    ToTheRight,
    /// Align the right side of one shape to the left side of the other.
    ToTheLeft,
    /// Align the top side of one shape to the bottom side of the other.
    Beneath,
    /// Align the bottom side of one shape to the top side of the other.
    Above,
}

/// Horizontal placement of a shape relative to an anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HAlign {
    /// The shape sits to the left of the anchor; its right edge touches it.
    Left,
    /// The shape is centered on the anchor.
    #[default]
    Center,
    /// The shape sits to the right of the anchor; its left edge touches it.
    Right,
}

/// Vertical placement of a shape relative to an anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VAlign {
    /// The shape sits below the anchor.
    Bottom,
    /// The shape is centered on the anchor.
    #[default]
    Center,
    /// The shape sits above the anchor.
    Top,
}

impl From<HAlign> for AlignMode {
    fn from(value: HAlign) -> Self {
        match value {
            HAlign::Left => AlignMode::ToTheLeft,
            HAlign::Center => AlignMode::CenterHorizontal,
            HAlign::Right => AlignMode::ToTheRight,
        }
    }
}

impl From<VAlign> for AlignMode {
    fn from(value: VAlign) -> Self {
        match value {
            VAlign::Bottom => AlignMode::Beneath,
            VAlign::Center => AlignMode::CenterVertical,
            VAlign::Top => AlignMode::Above,
        }
    }
}

/// A geometric shape that can be aligned using the relationship between two [`Rect`]s.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let mut rect1 = Rect::from_sides(0, 0, 100, 200);
/// let rect2 = Rect::from_sides(500, 600, 700, 700);
/// rect1.align_mut(AlignMode::ToTheRight, rect1, rect2, 0);
/// assert_eq!(rect1, Rect::from_sides(700, 0, 800, 200));
/// ```
pub trait AlignRectMut: TranslateMut {
    /// Align `self` based on the relationship between `srect` and `orect`.
    ///
    /// `offset` is added along the alignment axis. Center alignments
    /// round the translation down.
    fn align_mut(&mut self, mode: AlignMode, srect: Rect, orect: Rect, offset: i64) {
        let delta = match mode {
            AlignMode::CenterHorizontal => Point::new(
                ((orect.left() + orect.right()) - (srect.left() + srect.right())).div_euclid(2)
                    + offset,
                0,
            ),
            AlignMode::CenterVertical => Point::new(
                0,
                ((orect.bot() + orect.top()) - (srect.bot() + srect.top())).div_euclid(2) + offset,
            ),
            AlignMode::ToTheRight => Point::new(orect.right() - srect.left() + offset, 0),
            AlignMode::ToTheLeft => Point::new(orect.left() - srect.right() + offset, 0),
            AlignMode::Beneath => Point::new(0, orect.bot() - srect.top() + offset),
            AlignMode::Above => Point::new(0, orect.top() - srect.bot() + offset),
        };
        self.translate_mut(delta);
    }

    /// Places `self`, whose extent is `srect`, relative to `anchor`.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// # use geometry::align::{HAlign, VAlign};
    /// let mut via = Rect::from_sides(-10, -10, 10, 10);
    /// via.align_to_point(via, Point::new(100, 50), HAlign::Right, VAlign::Center);
    /// assert_eq!(via, Rect::from_sides(100, 40, 120, 60));
    /// ```
    fn align_to_point(&mut self, srect: Rect, anchor: Point, h: HAlign, v: VAlign) {
        let target = Rect::from_point(anchor);
        self.align_mut(h.into(), srect, target, 0);
        let srect = srect.align(h.into(), srect, target, 0);
        self.align_mut(v.into(), srect, target, 0);
    }
}

impl<T: Translate> AlignRectMut for T {}

/// A geometric shape that can be aligned using the relationship between two [`Rect`]s.
///
/// Takes in an owned copy of the shape and returns the aligned version.
pub trait AlignRect: AlignRectMut + Sized {
    /// Creates a new shape at the aligned location of the original.
    fn align(mut self, mode: AlignMode, srect: Rect, orect: Rect, offset: i64) -> Self {
        self.align_mut(mode, srect, orect, offset);
        self
    }
}

impl<T: AlignRectMut + Sized> AlignRect for T {}
