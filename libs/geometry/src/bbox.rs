//! Axis-aligned rectangular bounding boxes.

use crate::{point::Point, rect::Rect};

/// A geometric shape that has a bounding box.
///
/// # Examples
///
/// ```
/// # use geometry::prelude::*;
/// let rects = vec![Rect::from_sides(0, 0, 10, 10), Rect::from_sides(20, -5, 30, 5)];
/// assert_eq!(rects.bbox(), Some(Rect::from_sides(0, -5, 30, 10)));
/// assert_eq!(Vec::<Rect>::new().bbox(), None);
/// ```
pub trait Bbox {
    /// Computes the axis-aligned rectangular bounding box.
    ///
    /// If empty, this method should return `None`.
    fn bbox(&self) -> Option<Rect>;
}

impl<T> Bbox for &T
where
    T: Bbox,
{
    fn bbox(&self) -> Option<Rect> {
        T::bbox(*self)
    }
}

impl<T: Bbox> Bbox for Vec<T> {
    fn bbox(&self) -> Option<Rect> {
        union_all(self.iter().map(Bbox::bbox))
    }
}

impl<T: Bbox> Bbox for Option<T> {
    fn bbox(&self) -> Option<Rect> {
        self.as_ref().and_then(Bbox::bbox)
    }
}

impl Bbox for Point {
    fn bbox(&self) -> Option<Rect> {
        Some(Rect::from_point(*self))
    }
}

/// The bounding union of a sequence of optional boxes, skipping empty ones.
pub fn union_all(boxes: impl IntoIterator<Item = Option<Rect>>) -> Option<Rect> {
    boxes
        .into_iter()
        .flatten()
        .reduce(|acc, rect| acc.union(rect))
}
