// Copyright 2025 Cowboy AI, LLC.

//! Geometric value objects: pixel points, sky points and integer boxes

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a pixel frame (floating-point pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Point2D {
    /// Column coordinate
    pub x: f64,
    /// Row coordinate
    pub y: f64,
}

impl Point2D {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A position on the celestial sphere, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct SkyPoint {
    /// Right ascension (degrees)
    pub ra: f64,
    /// Declination (degrees)
    pub dec: f64,
}

impl SkyPoint {
    /// Create a new sky point
    pub const fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }
}

/// Integer pixel box with inclusive corners
///
/// An empty box is represented by `max < min` on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Box2I {
    /// Minimum column (inclusive)
    pub min_x: i32,
    /// Minimum row (inclusive)
    pub min_y: i32,
    /// Maximum column (inclusive)
    pub max_x: i32,
    /// Maximum row (inclusive)
    pub max_y: i32,
}

impl Box2I {
    /// Create a box from its inclusive corners
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a box from a minimum corner and a size
    ///
    /// Returns `None` when the far corner does not fit in `i32`.
    pub fn from_extent(min_x: i32, min_y: i32, width: i32, height: i32) -> Option<Self> {
        let far = |min: i32, size: i32| i32::try_from(i64::from(min) + i64::from(size) - 1).ok();
        Some(Self::new(min_x, min_y, far(min_x, width)?, far(min_y, height)?))
    }

    /// True when the box covers no pixels
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Number of columns (0 for an empty box)
    pub fn width(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.max_x) - i64::from(self.min_x) + 1
        }
    }

    /// Number of rows (0 for an empty box)
    pub fn height(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.max_y) - i64::from(self.min_y) + 1
        }
    }

    /// True when the point lies within the box, treating pixel centres as
    /// integer coordinates and extending half a pixel on every side.
    pub fn contains(&self, point: Point2D) -> bool {
        !self.is_empty()
            && point.x >= self.min_x as f64 - 0.5
            && point.x < self.max_x as f64 + 0.5
            && point.y >= self.min_y as f64 - 0.5
            && point.y < self.max_y as f64 + 0.5
    }
}

impl fmt::Display for Box2I {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}) - ({}, {})]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
