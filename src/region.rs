// Copyright 2025 Cowboy AI, LLC.

//! Validity regions: where in its own pixel frame a contributor may be used

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::archive::{OutputArchive, Persistable};
use crate::errors::{FieldError, FieldResult};
use crate::geometry::{Box2I, Point2D};

/// Module identifier written alongside region records
pub const REGION_MODULE: &str = "coadd_field.region";

/// A region of a pixel frame (chip area minus gaps, unsaturated area, ...)
pub trait ValidRegion: Persistable + Any + Debug + Send + Sync {
    /// True when the point lies inside the region
    fn contains(&self, point: Point2D) -> bool;

    /// Get the region as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Structural equality; regions of different kinds are never equal
    fn equals(&self, other: &dyn ValidRegion) -> bool;
}

impl PartialEq for dyn ValidRegion {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// Compare two optional region handles by identity or value
pub fn same_region(a: Option<&Arc<dyn ValidRegion>>, b: Option<&Arc<dyn ValidRegion>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.equals(b.as_ref()),
        _ => false,
    }
}

/// Simple polygon given by its vertices, closed implicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonVertices", into = "PolygonVertices")]
pub struct Polygon {
    vertices: Vec<Point2D>,
}

/// Serialized form of a [`Polygon`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonVertices {
    /// Vertices in order
    pub vertices: Vec<Point2D>,
}

impl Polygon {
    /// Create a polygon; at least three finite vertices are required
    pub fn new(vertices: Vec<Point2D>) -> FieldResult<Self> {
        if vertices.len() < 3 {
            return Err(FieldError::invalid(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(FieldError::invalid("polygon vertices must be finite"));
        }
        Ok(Self { vertices })
    }

    /// Axis-aligned rectangle with the given corners
    pub fn rectangle(min: Point2D, max: Point2D) -> FieldResult<Self> {
        Self::new(vec![
            Point2D::new(min.x, min.y),
            Point2D::new(max.x, min.y),
            Point2D::new(max.x, max.y),
            Point2D::new(min.x, max.y),
        ])
    }

    /// Rectangle covering every pixel of an integer box, out to the pixel edges
    pub fn from_box(bbox: Box2I) -> FieldResult<Self> {
        if bbox.is_empty() {
            return Err(FieldError::invalid(format!("cannot build a polygon from empty box {bbox}")));
        }
        Self::rectangle(
            Point2D::new(bbox.min_x as f64 - 0.5, bbox.min_y as f64 - 0.5),
            Point2D::new(bbox.max_x as f64 + 0.5, bbox.max_y as f64 + 0.5),
        )
    }

    /// Vertices in order
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Signed area (positive for counter-clockwise vertices)
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }
}

impl TryFrom<PolygonVertices> for Polygon {
    type Error = FieldError;

    fn try_from(raw: PolygonVertices) -> Result<Self, Self::Error> {
        Self::new(raw.vertices)
    }
}

impl From<Polygon> for PolygonVertices {
    fn from(polygon: Polygon) -> Self {
        Self {
            vertices: polygon.vertices,
        }
    }
}

impl ValidRegion for Polygon {
    // Even-odd crossing test.
    fn contains(&self, point: Point2D) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if (a.y > point.y) != (b.y > point.y) {
                let crossing = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
                if point.x < crossing {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn ValidRegion) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

impl Persistable for Polygon {
    fn persistence_name(&self) -> &'static str {
        "Polygon"
    }

    fn module(&self) -> &'static str {
        REGION_MODULE
    }

    fn write(&self, _archive: &mut OutputArchive) -> FieldResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
