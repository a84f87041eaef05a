// Copyright 2025 Cowboy AI, LLC.

//! Scalar fields defined over a bounded pixel frame
//!
//! [`BoundedField`] is the capability interface every field kind implements.
//! Fields are held as `Arc<dyn BoundedField>` so a single field can be shared
//! by many owners; implementations must therefore be immutable and safe to
//! evaluate from several threads at once.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::archive::{OutputArchive, Persistable};
use crate::errors::{FieldError, FieldResult};
use crate::geometry::{Box2I, Point2D};

/// Module identifier written alongside field records
pub const FIELD_MODULE: &str = "coadd_field.field";

/// A scalar function over a bounded pixel frame
///
/// # Example
///
/// ```
/// use coadd_field::{BoundedField, Box2I, ConstantField, Point2D};
///
/// let field = ConstantField::new(Box2I::new(0, 0, 9, 9), 2.5);
/// assert_eq!(field.evaluate(Point2D::new(3.0, 4.0)).unwrap(), 2.5);
/// ```
pub trait BoundedField: Persistable + Any + Debug + Send + Sync {
    /// Pixel box over which the field is considered defined
    fn bbox(&self) -> Box2I;

    /// Value of the field at a point in its own pixel frame
    fn evaluate(&self, position: Point2D) -> FieldResult<f64>;

    /// Evaluate at several points, stopping at the first error
    fn evaluate_many(&self, positions: &[Point2D]) -> FieldResult<Vec<f64>> {
        positions.iter().map(|p| self.evaluate(*p)).collect()
    }

    /// New field whose values are this field's values times `scale`
    fn multiply_by(&self, scale: f64) -> FieldResult<Arc<dyn BoundedField>>;

    /// Get the field as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Name of this field kind
    fn type_name(&self) -> &'static str;

    /// Structural equality; fields of different kinds are never equal
    fn equals(&self, other: &dyn BoundedField) -> bool;
}

impl PartialEq for dyn BoundedField {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// True when both handles point at the same field or at equal fields
pub fn same_field(a: &Arc<dyn BoundedField>, b: &Arc<dyn BoundedField>) -> bool {
    Arc::ptr_eq(a, b) || a.equals(b.as_ref())
}

fn check_scale(scale: f64) -> FieldResult<()> {
    if scale.is_finite() {
        Ok(())
    } else {
        Err(FieldError::invalid(format!("scale factor must be finite, got {scale}")))
    }
}

/// A field with the same value everywhere
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantField {
    bbox: Box2I,
    value: f64,
}

impl ConstantField {
    /// Create a constant field
    pub fn new(bbox: Box2I, value: f64) -> Self {
        Self { bbox, value }
    }

    /// The constant value
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl BoundedField for ConstantField {
    fn bbox(&self) -> Box2I {
        self.bbox
    }

    fn evaluate(&self, _position: Point2D) -> FieldResult<f64> {
        Ok(self.value)
    }

    fn multiply_by(&self, scale: f64) -> FieldResult<Arc<dyn BoundedField>> {
        check_scale(scale)?;
        Ok(Arc::new(Self::new(self.bbox, self.value * scale)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "ConstantField"
    }

    fn equals(&self, other: &dyn BoundedField) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

impl Persistable for ConstantField {
    fn persistence_name(&self) -> &'static str {
        "ConstantField"
    }

    fn module(&self) -> &'static str {
        FIELD_MODULE
    }

    fn write(&self, _archive: &mut OutputArchive) -> FieldResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A first-order polynomial `c0 + cx * x + cy * y`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearField {
    bbox: Box2I,
    c0: f64,
    cx: f64,
    cy: f64,
}

impl LinearField {
    /// Create a linear field from its coefficients
    pub fn new(bbox: Box2I, c0: f64, cx: f64, cy: f64) -> Self {
        Self { bbox, c0, cx, cy }
    }

    /// Coefficients `(c0, cx, cy)`
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.c0, self.cx, self.cy)
    }
}

impl BoundedField for LinearField {
    fn bbox(&self) -> Box2I {
        self.bbox
    }

    fn evaluate(&self, position: Point2D) -> FieldResult<f64> {
        Ok(self.c0 + self.cx * position.x + self.cy * position.y)
    }

    fn multiply_by(&self, scale: f64) -> FieldResult<Arc<dyn BoundedField>> {
        check_scale(scale)?;
        Ok(Arc::new(Self::new(
            self.bbox,
            self.c0 * scale,
            self.cx * scale,
            self.cy * scale,
        )))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "LinearField"
    }

    fn equals(&self, other: &dyn BoundedField) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

impl Persistable for LinearField {
    fn persistence_name(&self) -> &'static str {
        "LinearField"
    }

    fn module(&self) -> &'static str {
        FIELD_MODULE
    }

    fn write(&self, _archive: &mut OutputArchive) -> FieldResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
