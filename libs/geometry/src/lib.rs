//! 2-D Manhattan geometry used when routing between layout ports.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect) and read back one of its sides:
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(10, 20, 30, 40);
//! assert_eq!(rect.side(Side::Right), 30);
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod align;
pub mod bbox;
pub mod dir;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod side;
pub mod span;
pub mod transform;

/// Wraps the given angle to the interval `[0, 360)` degrees.
///
/// # Examples
///
/// ```
/// use geometry::wrap_angle;
///
/// assert_eq!(wrap_angle(10.), 10.);
/// assert_eq!(wrap_angle(-10.), 350.);
/// assert_eq!(wrap_angle(-740.), 340.);
/// assert_eq!(wrap_angle(725.), 5.);
/// assert_eq!(wrap_angle(360.), 0.);
/// ```
pub fn wrap_angle(angle: f64) -> f64 {
    ((angle % 360.) + 360.) % 360.
}
