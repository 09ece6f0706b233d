//! Surface geometry: points, sizes, and rotation about a pivot. Angles are
//! in degrees, clockwise on screen.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point (or offset) in room-surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this point clockwise by `degrees` around `pivot`.
    ///
    /// Surface y grows downward, so a positive angle turns clockwise on screen.
    #[must_use]
    pub fn rotate_about(self, pivot: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self - pivot;
        Point {
            x: pivot.x + d.x * cos - d.y * sin,
            y: pivot.y + d.x * sin + d.y * cos,
        }
    }

    /// Angle of the vector `pivot -> self` in degrees, measured clockwise from +x.
    #[must_use]
    pub fn angle_from(self, pivot: Point) -> f64 {
        let d = self - pivot;
        d.y.atan2(d.x).to_degrees()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        let d = self - other;
        d.x.hypot(d.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in room-surface units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `pt` lies within `(0, 0)..(width, height)`.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= 0.0 && pt.y >= 0.0 && pt.x <= self.width && pt.y <= self.height
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
