// Copyright 2025 Cowboy AI, LLC.

//! # Coadd Bounded Field
//!
//! A scalar field on a coadd's pixel grid, built as the weighted mean of
//! per-exposure fields that each live in their own pixel frame.
//!
//! ```text
//! coadd pixel ──coadd projection──▶ sky ──element projection⁻¹──▶ exposure pixel
//!                                                                   │
//!                                      valid region? ──no──▶ skip   │
//!                                                    ──yes─▶ weight · field(pixel)
//! ```
//!
//! When no element is valid at a point the [`MissingPolicy`] decides between
//! a substitute value and a [`FieldError::MissingContribution`] error.
//!
//! A composite is immutable once built and is safe to evaluate from many
//! threads at once, provided its fields, projections and regions are (the
//! collaborator traits require `Send + Sync` for that reason).

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::ops::Mul;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::builder::CoaddBoundedFieldBuilder;
use crate::errors::{FieldError, FieldResult};
use crate::field::{same_field, BoundedField};
use crate::geometry::{Box2I, Point2D};
use crate::projection::{same_projection, SkyProjection};
use crate::region::{same_region, ValidRegion};

/// One exposure's contribution to a [`CoaddBoundedField`]
#[derive(Debug, Clone)]
pub struct CoaddElement {
    /// Field evaluated in the exposure's pixel frame
    pub field: Arc<dyn BoundedField>,
    /// Projection of the exposure's pixel frame
    pub projection: Arc<dyn SkyProjection>,
    /// Region of the exposure's pixel frame where `field` may be used; `None` means everywhere
    pub valid_region: Option<Arc<dyn ValidRegion>>,
    /// Relative weight of this exposure
    pub weight: f64,
}

impl CoaddElement {
    /// Create an element with unit weight
    pub fn new(
        field: Arc<dyn BoundedField>,
        projection: Arc<dyn SkyProjection>,
        valid_region: Option<Arc<dyn ValidRegion>>,
    ) -> Self {
        Self {
            field,
            projection,
            valid_region,
            weight: 1.0,
        }
    }

    /// Replace the weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    fn validate(&self, index: usize) -> FieldResult<()> {
        if self.weight.is_finite() {
            Ok(())
        } else {
            Err(FieldError::invalid(format!(
                "element {index} has non-finite weight {}",
                self.weight
            )))
        }
    }
}

impl PartialEq for CoaddElement {
    fn eq(&self, other: &Self) -> bool {
        same_field(&self.field, &other.field)
            && same_projection(&self.projection, &other.projection)
            && same_region(self.valid_region.as_ref(), other.valid_region.as_ref())
            && self.weight == other.weight
    }
}

/// What to do at points where no element is valid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MissingPolicy {
    /// Return [`FieldError::MissingContribution`]
    Throw,
    /// Return this value
    Default(f64),
}

impl MissingPolicy {
    /// True for [`MissingPolicy::Throw`]
    pub fn throws_on_missing(&self) -> bool {
        matches!(self, MissingPolicy::Throw)
    }

    /// Substitute value, if any
    pub fn default_value(&self) -> Option<f64> {
        match self {
            MissingPolicy::Throw => None,
            MissingPolicy::Default(value) => Some(*value),
        }
    }

    fn scaled(self, scale: f64) -> Self {
        match self {
            MissingPolicy::Throw => MissingPolicy::Throw,
            MissingPolicy::Default(value) => MissingPolicy::Default(value * scale),
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Throw => write!(f, "throw on missing"),
            MissingPolicy::Default(value) => write!(f, "default {value}"),
        }
    }
}

/// Weighted mean of per-exposure fields, defined on the coadd pixel grid
#[derive(Debug, Clone)]
pub struct CoaddBoundedField {
    bbox: Box2I,
    coadd_projection: Arc<dyn SkyProjection>,
    elements: Vec<CoaddElement>,
    policy: MissingPolicy,
    scale: f64,
}

impl CoaddBoundedField {
    /// Build a composite from its parts
    ///
    /// `elements` may be empty. Weights and the default value must be finite.
    pub fn new(
        bbox: Box2I,
        coadd_projection: Arc<dyn SkyProjection>,
        elements: Vec<CoaddElement>,
        policy: MissingPolicy,
    ) -> FieldResult<Self> {
        Self::from_parts(bbox, coadd_projection, elements, policy, 1.0)
    }

    /// Composite that fails where no element is valid
    pub fn throwing(
        bbox: Box2I,
        coadd_projection: Arc<dyn SkyProjection>,
        elements: Vec<CoaddElement>,
    ) -> FieldResult<Self> {
        Self::new(bbox, coadd_projection, elements, MissingPolicy::Throw)
    }

    /// Composite that returns `default` where no element is valid
    pub fn with_default(
        bbox: Box2I,
        coadd_projection: Arc<dyn SkyProjection>,
        elements: Vec<CoaddElement>,
        default: f64,
    ) -> FieldResult<Self> {
        Self::new(
            bbox,
            coadd_projection,
            elements,
            MissingPolicy::Default(default),
        )
    }

    /// Start a builder
    pub fn builder() -> CoaddBoundedFieldBuilder {
        CoaddBoundedFieldBuilder::new()
    }

    pub(crate) fn from_parts(
        bbox: Box2I,
        coadd_projection: Arc<dyn SkyProjection>,
        elements: Vec<CoaddElement>,
        policy: MissingPolicy,
        scale: f64,
    ) -> FieldResult<Self> {
        for (index, element) in elements.iter().enumerate() {
            element.validate(index)?;
        }
        if let MissingPolicy::Default(value) = policy {
            if !value.is_finite() {
                return Err(FieldError::invalid(format!(
                    "default value must be finite, got {value}"
                )));
            }
        }
        if !scale.is_finite() {
            return Err(FieldError::invalid(format!(
                "scale factor must be finite, got {scale}"
            )));
        }

        debug!(
            elements = elements.len(),
            policy = %policy,
            scale,
            "Built coadd bounded field"
        );
        Ok(Self {
            bbox,
            coadd_projection,
            elements,
            policy,
            scale,
        })
    }

    /// Projection of the coadd pixel grid
    pub fn coadd_projection(&self) -> &Arc<dyn SkyProjection> {
        &self.coadd_projection
    }

    /// Contributing elements in accumulation order
    pub fn elements(&self) -> &[CoaddElement] {
        &self.elements
    }

    /// Number of contributing elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Policy applied where no element is valid
    pub fn policy(&self) -> MissingPolicy {
        self.policy
    }

    /// True when evaluation fails where no element is valid
    pub fn throws_on_missing(&self) -> bool {
        self.policy.throws_on_missing()
    }

    /// Substitute value used where no element is valid, if any
    pub fn default_value(&self) -> Option<f64> {
        self.policy.default_value()
    }

    /// Factor applied to the weighted mean
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Copy of this field with every value multiplied by `scale`
    ///
    /// Weights are left alone and the factor is applied after averaging, so
    /// `scaled(s)?.evaluate(p) == evaluate(p) * s` for every point, including
    /// points that fall back to the default value.
    pub fn scaled(&self, scale: f64) -> FieldResult<Self> {
        if !scale.is_finite() {
            return Err(FieldError::invalid(format!(
                "scale factor must be finite, got {scale}"
            )));
        }
        Self::from_parts(
            self.bbox,
            Arc::clone(&self.coadd_projection),
            self.elements.clone(),
            self.policy.scaled(scale),
            self.scale * scale,
        )
    }

    fn scaled_unchecked(&self, scale: f64) -> Self {
        Self {
            bbox: self.bbox,
            coadd_projection: Arc::clone(&self.coadd_projection),
            elements: self.elements.clone(),
            policy: self.policy.scaled(scale),
            scale: self.scale * scale,
        }
    }

    /// Evaluate, mapping a missing contribution to `fallback`
    ///
    /// Errors other than [`FieldError::MissingContribution`] are returned.
    pub fn evaluate_or(&self, position: Point2D, fallback: f64) -> FieldResult<f64> {
        match self.evaluate(position) {
            Err(FieldError::MissingContribution { .. }) => Ok(fallback),
            other => other,
        }
    }

    // Weighted mean over the valid elements, before the outer scale; `None` if none is valid.
    fn weighted_mean(&self, position: Point2D) -> FieldResult<Option<f64>> {
        let sky = self.coadd_projection.pixel_to_sky(position);
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for element in &self.elements {
            let local = element.projection.sky_to_pixel(sky);
            if let Some(region) = &element.valid_region {
                if !region.contains(local) {
                    continue;
                }
            }
            let value = element.field.evaluate(local)?;
            weighted_sum += element.weight * value;
            weight_total += element.weight;
        }

        if weight_total == 0.0 {
            Ok(None)
        } else {
            Ok(Some(weighted_sum / weight_total))
        }
    }
}

impl BoundedField for CoaddBoundedField {
    fn bbox(&self) -> Box2I {
        self.bbox
    }

    fn evaluate(&self, position: Point2D) -> FieldResult<f64> {
        match self.weighted_mean(position)? {
            Some(mean) => Ok(self.scale * mean),
            None => match self.policy {
                MissingPolicy::Throw => Err(FieldError::MissingContribution {
                    x: position.x,
                    y: position.y,
                }),
                MissingPolicy::Default(value) => {
                    trace!(x = position.x, y = position.y, value, "No element contributes, using default");
                    Ok(value)
                }
            },
        }
    }

    fn multiply_by(&self, scale: f64) -> FieldResult<Arc<dyn BoundedField>> {
        Ok(Arc::new(self.scaled(scale)?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "CoaddBoundedField"
    }

    fn equals(&self, other: &dyn BoundedField) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

impl PartialEq for CoaddBoundedField {
    fn eq(&self, other: &Self) -> bool {
        self.bbox == other.bbox
            && same_projection(&self.coadd_projection, &other.coadd_projection)
            && self.policy == other.policy
            && self.scale == other.scale
            && self.elements == other.elements
    }
}

/// Scale every value of the field
///
/// Unlike [`CoaddBoundedField::scaled`] this does not reject non-finite
/// factors; they propagate into every evaluated value.
impl Mul<f64> for &CoaddBoundedField {
    type Output = CoaddBoundedField;

    fn mul(self, scale: f64) -> CoaddBoundedField {
        self.scaled_unchecked(scale)
    }
}

impl Mul<f64> for CoaddBoundedField {
    type Output = CoaddBoundedField;

    fn mul(self, scale: f64) -> CoaddBoundedField {
        &self * scale
    }
}

impl fmt::Display for CoaddBoundedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CoaddBoundedField with {} elements, {}",
            self.elements.len(),
            self.policy
        )
    }
}
