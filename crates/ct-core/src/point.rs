use core::fmt;

use crate::{format_g, CtError, CtResult, Real};

/// A sample in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", format_g(self.x), format_g(self.y))
    }
}

/// Lazy, finite, non-restartable stream of samples.
///
/// A producer reports a failure by yielding `Err`; a consumer stops the
/// producer by dropping the iterator.
pub type Points<'a> = Box<dyn Iterator<Item = CtResult<Point>> + Send + 'a>;

/// Turn an owned sample list into a [`Points`] stream.
pub fn points_from_vec(points: Vec<Point>) -> Points<'static> {
    Box::new(points.into_iter().map(Ok::<Point, CtError>))
}

/// Build a [`Points`] stream from a fallible generator of samples.
pub fn points_from_fn<'a, F>(f: F) -> Points<'a>
where
    F: FnMut() -> Option<CtResult<Point>> + Send + 'a,
{
    Box::new(std::iter::from_fn(f))
}
