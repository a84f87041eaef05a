// Copyright 2025 Cowboy AI, LLC.

//! # Coadd Field
//!
//! Weighted multi-frame scalar-field compositing for coadded images.
//!
//! A coadd combines several exposures, each with its own pixel grid tied to
//! the sky by a projection. This crate provides the field-level counterpart:
//! [`CoaddBoundedField`] combines per-exposure scalar fields into one field on
//! the coadd's pixel grid.
//!
//! - **Fields**: [`BoundedField`] is the capability interface; [`ConstantField`]
//!   and [`LinearField`] are simple implementations
//! - **Projections**: [`SkyProjection`] maps pixels to the sky and back
//! - **Validity regions**: [`ValidRegion`] limits where an exposure may be used
//! - **Compositing**: [`CoaddBoundedField`] evaluates the weighted mean of the
//!   valid contributors, with a [`MissingPolicy`] for points none covers
//! - **Persistence**: [`OutputArchive`] and [`InputArchive`] store object
//!   graphs whose parts are shared, writing each shared part once
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use coadd_field::{
//!     AffineProjection, BoundedField, Box2I, CoaddBoundedField, ConstantField, Point2D,
//!     Polygon, SkyProjection, ValidRegion,
//! };
//!
//! let bbox = Box2I::new(0, 0, 100, 100);
//! let wcs: Arc<dyn SkyProjection> = Arc::new(AffineProjection::identity());
//! let right_half: Arc<dyn ValidRegion> = Arc::new(
//!     Polygon::rectangle(Point2D::new(50.0, 0.0), Point2D::new(100.0, 100.0)).unwrap(),
//! );
//!
//! let coadd = CoaddBoundedField::builder()
//!     .bbox(bbox)
//!     .coadd_projection(wcs.clone())
//!     .element(Arc::new(ConstantField::new(bbox, 10.0)), wcs.clone(), None, 1.0)
//!     .element(Arc::new(ConstantField::new(bbox, 20.0)), wcs, Some(right_half), 1.0)
//!     .default_value(-1.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(coadd.evaluate(Point2D::new(10.0, 10.0)).unwrap(), 10.0);
//! assert_eq!(coadd.evaluate(Point2D::new(75.0, 10.0)).unwrap(), 15.0);
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod builder;
pub mod coadd;
pub mod codec;
pub mod config;
pub mod errors;
pub mod field;
pub mod geometry;
pub mod projection;
pub mod region;

// Re-export core types
pub use archive::{
    ArchiveDocument, ArchiveId, ArchiveRecord, ArchiveRegistry, InputArchive, OutputArchive,
    Persistable, ARCHIVE_FORMAT_VERSION, NULL_ID,
};
pub use builder::CoaddBoundedFieldBuilder;
pub use coadd::{CoaddBoundedField, CoaddElement, MissingPolicy};
pub use codec::{CoaddBoundedFieldRecord, ElementRecord, COADD_MODULE, COADD_PERSISTENCE_NAME};
pub use config::ArchiveConfig;
pub use errors::{FieldError, FieldResult};
pub use field::{same_field, BoundedField, ConstantField, LinearField};
pub use geometry::{Box2I, Point2D, SkyPoint};
pub use projection::{same_projection, AffineProjection, SkyProjection};
pub use region::{same_region, Polygon, ValidRegion};
