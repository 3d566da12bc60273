//! An import prelude that re-exports commonly used items.

pub use crate::align::{AlignMode, AlignRect, AlignRectMut};
pub use crate::bbox::Bbox;
pub use crate::dir::Dir;
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::side::Side;
pub use crate::span::Span;
pub use crate::transform::{Translate, TranslateMut};
