// Copyright 2025 Cowboy AI, LLC.

//! Sky projections relating pixel frames to celestial coordinates

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::archive::{OutputArchive, Persistable};
use crate::errors::{FieldError, FieldResult};
use crate::geometry::{Point2D, SkyPoint};

/// Module identifier written alongside projection records
pub const PROJECTION_MODULE: &str = "coadd_field.projection";

/// Invertible mapping between a pixel grid and the sky
///
/// Implementations must be immutable; a projection is shared by every
/// element and composite that refers to it and may be used from several
/// threads at once.
pub trait SkyProjection: Persistable + Any + Debug + Send + Sync {
    /// Map a pixel position to the sky
    fn pixel_to_sky(&self, pixel: Point2D) -> SkyPoint;

    /// Map a sky position to this projection's pixel frame
    fn sky_to_pixel(&self, sky: SkyPoint) -> Point2D;

    /// Get the projection as Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Structural equality; projections of different kinds are never equal
    fn equals(&self, other: &dyn SkyProjection) -> bool;
}

impl PartialEq for dyn SkyProjection {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

/// True when both handles point at the same projection or at equal ones
pub fn same_projection(a: &Arc<dyn SkyProjection>, b: &Arc<dyn SkyProjection>) -> bool {
    Arc::ptr_eq(a, b) || a.equals(b.as_ref())
}

/// Serialized parameters of an [`AffineProjection`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineParams {
    /// Reference pixel
    pub crpix: Point2D,
    /// Sky position of the reference pixel
    pub crval: SkyPoint,
    /// CD matrix, degrees per pixel
    pub cd: [[f64; 2]; 2],
}

/// Linear projection: `sky = crval + CD · (pixel - crpix)`
///
/// This is the small-field tangent-plane approximation; the identity
/// projection (pixel coordinates read as degrees) is a special case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AffineParams", into = "AffineParams")]
pub struct AffineProjection {
    crpix: Point2D,
    crval: SkyPoint,
    cd: [[f64; 2]; 2],
    inverse: [[f64; 2]; 2],
}

impl AffineProjection {
    /// Create a projection from its reference pixel, reference sky position
    /// and CD matrix (degrees per pixel)
    pub fn new(crpix: Point2D, crval: SkyPoint, cd: [[f64; 2]; 2]) -> FieldResult<Self> {
        let det = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
        if !det.is_finite() || det == 0.0 {
            return Err(FieldError::invalid(format!(
                "CD matrix must be invertible, determinant is {det}"
            )));
        }
        if !(crpix.x.is_finite() && crpix.y.is_finite() && crval.ra.is_finite() && crval.dec.is_finite()) {
            return Err(FieldError::invalid("reference point must be finite"));
        }
        let inverse = [
            [cd[1][1] / det, -cd[0][1] / det],
            [-cd[1][0] / det, cd[0][0] / det],
        ];
        Ok(Self {
            crpix,
            crval,
            cd,
            inverse,
        })
    }

    /// Pixel coordinates map to the same numbers in degrees
    pub fn identity() -> Self {
        Self {
            crpix: Point2D::new(0.0, 0.0),
            crval: SkyPoint::new(0.0, 0.0),
            cd: [[1.0, 0.0], [0.0, 1.0]],
            inverse: [[1.0, 0.0], [0.0, 1.0]],
        }
    }

    /// Unit-scale projection whose pixel origin sits at `(ra, dec)`
    pub fn translated(ra: f64, dec: f64) -> FieldResult<Self> {
        Self::new(
            Point2D::new(0.0, 0.0),
            SkyPoint::new(ra, dec),
            [[1.0, 0.0], [0.0, 1.0]],
        )
    }

    /// Reference pixel
    pub fn crpix(&self) -> Point2D {
        self.crpix
    }

    /// Sky position of the reference pixel
    pub fn crval(&self) -> SkyPoint {
        self.crval
    }

    /// CD matrix
    pub fn cd(&self) -> [[f64; 2]; 2] {
        self.cd
    }
}

impl TryFrom<AffineParams> for AffineProjection {
    type Error = FieldError;

    fn try_from(params: AffineParams) -> Result<Self, Self::Error> {
        Self::new(params.crpix, params.crval, params.cd)
    }
}

impl From<AffineProjection> for AffineParams {
    fn from(projection: AffineProjection) -> Self {
        Self {
            crpix: projection.crpix,
            crval: projection.crval,
            cd: projection.cd,
        }
    }
}

impl SkyProjection for AffineProjection {
    fn pixel_to_sky(&self, pixel: Point2D) -> SkyPoint {
        let dx = pixel.x - self.crpix.x;
        let dy = pixel.y - self.crpix.y;
        SkyPoint::new(
            self.crval.ra + self.cd[0][0] * dx + self.cd[0][1] * dy,
            self.crval.dec + self.cd[1][0] * dx + self.cd[1][1] * dy,
        )
    }

    fn sky_to_pixel(&self, sky: SkyPoint) -> Point2D {
        let dra = sky.ra - self.crval.ra;
        let ddec = sky.dec - self.crval.dec;
        Point2D::new(
            self.crpix.x + self.inverse[0][0] * dra + self.inverse[0][1] * ddec,
            self.crpix.y + self.inverse[1][0] * dra + self.inverse[1][1] * ddec,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn SkyProjection) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| self == other)
    }
}

impl Persistable for AffineProjection {
    fn persistence_name(&self) -> &'static str {
        "AffineProjection"
    }

    fn module(&self) -> &'static str {
        PROJECTION_MODULE
    }

    fn write(&self, _archive: &mut OutputArchive) -> FieldResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
