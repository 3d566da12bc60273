//! The four sides of an axis-aligned box, doubling as compass headings.
//!
//! A port facing west sits on the [`Side::Left`] of whatever it belongs to,
//! so the same enum names both.

use std::fmt::Display;

use approx::abs_diff_eq;
use serde::{Deserialize, Serialize};

use crate::dir::Dir;
use crate::wrap_angle;

/// Angles within this many degrees of a multiple of 90 are treated as Manhattan.
pub const ANGLE_TOLERANCE: f64 = 1e-6;

/// An enumeration of the sides of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Side {
    /// The top side (north).
    Top,
    /// The right side (east).
    Right,
    /// The bottom side (south).
    Bot,
    /// The left side (west).
    Left,
}

impl Side {
    /// All four sides, in compass order `N, E, S, W`.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bot, Side::Left];

    /// The direction in which this side's coordinate is measured.
    ///
    /// Left and right sides have an x coordinate, so this returns [`Dir::Horiz`].
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Side::Left.coord_dir(), Dir::Horiz);
    /// assert_eq!(Side::Top.coord_dir(), Dir::Vert);
    /// ```
    pub const fn coord_dir(&self) -> Dir {
        match self {
            Side::Left | Side::Right => Dir::Horiz,
            Side::Top | Side::Bot => Dir::Vert,
        }
    }

    /// The direction along which an edge on this side runs.
    pub const fn edge_dir(&self) -> Dir {
        self.coord_dir().other()
    }

    /// Returns the opposite side.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Side::Left.other(), Side::Right);
    /// assert_eq!(Side::Bot.other(), Side::Top);
    /// ```
    pub const fn other(&self) -> Self {
        match self {
            Side::Top => Side::Bot,
            Side::Right => Side::Left,
            Side::Bot => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// `1` if moving toward this side increases the coordinate, `-1` otherwise.
    pub const fn sign(&self) -> i64 {
        match self {
            Side::Top | Side::Right => 1,
            Side::Bot | Side::Left => -1,
        }
    }

    /// The heading of this side in degrees, counter-clockwise from east.
    pub const fn angle(&self) -> f64 {
        match self {
            Side::Right => 0.,
            Side::Top => 90.,
            Side::Left => 180.,
            Side::Bot => 270.,
        }
    }

    /// Converts a heading in degrees into a side.
    ///
    /// Returns `None` if the angle is not (within [`ANGLE_TOLERANCE`])
    /// a multiple of 90 degrees.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Side::from_angle(180.), Some(Side::Left));
    /// assert_eq!(Side::from_angle(-90.), Some(Side::Bot));
    /// assert_eq!(Side::from_angle(450.), Some(Side::Top));
    /// assert_eq!(Side::from_angle(45.), None);
    /// ```
    pub fn from_angle(angle: f64) -> Option<Self> {
        let angle = wrap_angle(angle);
        let quarter = (angle / 90.).round();
        if !abs_diff_eq!(angle, quarter * 90., epsilon = ANGLE_TOLERANCE) {
            return None;
        }
        match quarter as i64 % 4 {
            0 => Some(Side::Right),
            1 => Some(Side::Top),
            2 => Some(Side::Left),
            3 => Some(Side::Bot),
            _ => None,
        }
    }

    /// The compass letter for this side: `N`, `E`, `S`, or `W`.
    pub const fn compass(&self) -> char {
        match self {
            Side::Top => 'N',
            Side::Right => 'E',
            Side::Bot => 'S',
            Side::Left => 'W',
        }
    }

    /// Parses a compass letter.
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// assert_eq!(Side::from_compass('W'), Some(Side::Left));
    /// assert_eq!(Side::from_compass('x'), None);
    /// ```
    pub const fn from_compass(c: char) -> Option<Self> {
        match c {
            'N' => Some(Side::Top),
            'E' => Some(Side::Right),
            'S' => Some(Side::Bot),
            'W' => Some(Side::Left),
            _ => None,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.compass())
    }
}
