// Copyright 2025 Cowboy AI, LLC.

//! Incremental construction of a [`CoaddBoundedField`]

use std::sync::Arc;

use crate::coadd::{CoaddBoundedField, CoaddElement, MissingPolicy};
use crate::errors::{FieldError, FieldResult};
use crate::field::BoundedField;
use crate::geometry::Box2I;
use crate::projection::SkyProjection;
use crate::region::ValidRegion;

/// Builder for CoaddBoundedField
#[derive(Debug)]
pub struct CoaddBoundedFieldBuilder {
    bbox: Option<Box2I>,
    coadd_projection: Option<Arc<dyn SkyProjection>>,
    elements: Vec<CoaddElement>,
    policy: MissingPolicy,
}

impl CoaddBoundedFieldBuilder {
    /// Create a new builder; the policy starts as [`MissingPolicy::Throw`]
    pub fn new() -> Self {
        Self {
            bbox: None,
            coadd_projection: None,
            elements: Vec::new(),
            policy: MissingPolicy::Throw,
        }
    }

    /// Set the coadd pixel box
    pub fn bbox(mut self, bbox: Box2I) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the coadd projection
    pub fn coadd_projection(mut self, projection: Arc<dyn SkyProjection>) -> Self {
        self.coadd_projection = Some(projection);
        self
    }

    /// Append an element with the given weight
    pub fn element(
        mut self,
        field: Arc<dyn BoundedField>,
        projection: Arc<dyn SkyProjection>,
        valid_region: Option<Arc<dyn ValidRegion>>,
        weight: f64,
    ) -> Self {
        self.elements
            .push(CoaddElement::new(field, projection, valid_region).with_weight(weight));
        self
    }

    /// Append prepared elements
    pub fn elements(mut self, elements: impl IntoIterator<Item = CoaddElement>) -> Self {
        self.elements.extend(elements);
        self
    }

    /// Return `value` where no element is valid
    pub fn default_value(mut self, value: f64) -> Self {
        self.policy = MissingPolicy::Default(value);
        self
    }

    /// Fail where no element is valid
    pub fn throw_on_missing(mut self) -> Self {
        self.policy = MissingPolicy::Throw;
        self
    }

    /// Build the composite
    pub fn build(self) -> FieldResult<CoaddBoundedField> {
        let bbox = self
            .bbox
            .ok_or_else(|| FieldError::invalid("coadd bounding box not provided"))?;
        let coadd_projection = self
            .coadd_projection
            .ok_or_else(|| FieldError::invalid("coadd projection not provided"))?;

        CoaddBoundedField::new(bbox, coadd_projection, self.elements, self.policy)
    }
}

impl Default for CoaddBoundedFieldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
