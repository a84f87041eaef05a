// Copyright 2025 Cowboy AI, LLC.

//! Archive format of [`CoaddBoundedField`]
//!
//! A composite is stored as one [`CoaddBoundedFieldRecord`]. Its fields,
//! projections and regions are separate archive records referenced by id,
//! so contributors shared between elements or between composites are
//! written once and shared again after reading.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::archive::{
    ArchiveId, ArchiveRegistry, InputArchive, OutputArchive, Persistable, NULL_ID,
};
use crate::coadd::{CoaddBoundedField, CoaddElement, MissingPolicy};
use crate::config::ArchiveConfig;
use crate::errors::{FieldError, FieldResult};
use crate::field::{BoundedField, ConstantField, LinearField};
use crate::geometry::Box2I;
use crate::projection::AffineProjection;
use crate::region::Polygon;

/// Persistence name of [`CoaddBoundedField`]
pub const COADD_PERSISTENCE_NAME: &str = "CoaddBoundedField";

/// Module identifier written alongside composite records
pub const COADD_MODULE: &str = "coadd_field.coadd";

/// Stored form of one [`CoaddElement`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ElementRecord {
    /// Archive id of the field
    pub field: ArchiveId,
    /// Archive id of the element's projection
    pub wcs: ArchiveId,
    /// Archive id of the validity region; `None` when valid everywhere
    pub valid_polygon: Option<ArchiveId>,
    /// Element weight
    pub weight: f64,
}

/// Stored form of a [`CoaddBoundedField`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoaddBoundedFieldRecord {
    /// Coadd pixel box
    pub bbox: Box2I,
    /// Archive id of the coadd projection
    pub coadd_wcs: ArchiveId,
    /// Fail where no element is valid
    pub throw_on_missing: bool,
    /// Value used where no element is valid; ignored when `throw_on_missing`
    pub default: f64,
    /// Factor applied to the weighted mean
    #[serde(default = "unit_scale")]
    pub scale: f64,
    /// Elements in accumulation order
    pub elements: Vec<ElementRecord>,
}

fn unit_scale() -> f64 {
    1.0
}

impl CoaddBoundedFieldRecord {
    /// JSON Schema describing the record payload
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(CoaddBoundedFieldRecord)
    }
}

impl Persistable for CoaddBoundedField {
    fn persistence_name(&self) -> &'static str {
        COADD_PERSISTENCE_NAME
    }

    fn module(&self) -> &'static str {
        COADD_MODULE
    }

    fn write(&self, archive: &mut OutputArchive) -> FieldResult<serde_json::Value> {
        let coadd_wcs = archive.put(self.coadd_projection())?;
        let elements = self
            .elements()
            .iter()
            .map(|element| -> FieldResult<ElementRecord> {
                Ok(ElementRecord {
                    field: archive.put(&element.field)?,
                    wcs: archive.put(&element.projection)?,
                    valid_polygon: match &element.valid_region {
                        Some(region) => Some(archive.put(region)?),
                        None => None,
                    },
                    weight: element.weight,
                })
            })
            .collect::<FieldResult<Vec<_>>>()?;

        let record = CoaddBoundedFieldRecord {
            bbox: self.bbox(),
            coadd_wcs,
            throw_on_missing: self.throws_on_missing(),
            default: self.default_value().unwrap_or(0.0),
            scale: self.scale(),
            elements,
        };
        Ok(serde_json::to_value(record)?)
    }
}

/// Reconstruct a composite from its record payload
pub fn read_coadd_bounded_field(
    payload: &serde_json::Value,
    archive: &mut InputArchive,
) -> FieldResult<Arc<dyn BoundedField>> {
    let record: CoaddBoundedFieldRecord = serde_json::from_value(payload.clone()).map_err(|e| {
        FieldError::persistence(format!("malformed '{COADD_PERSISTENCE_NAME}' payload: {e}"))
    })?;

    let coadd_projection = archive.get_projection(record.coadd_wcs)?;
    let mut elements = Vec::with_capacity(record.elements.len());
    for element in &record.elements {
        let valid_region = archive.get_optional_region(element.valid_polygon.unwrap_or(NULL_ID))?;
        elements.push(CoaddElement {
            field: archive.get_field(element.field)?,
            projection: archive.get_projection(element.wcs)?,
            valid_region,
            weight: element.weight,
        });
    }

    let policy = if record.throw_on_missing {
        MissingPolicy::Throw
    } else {
        MissingPolicy::Default(record.default)
    };
    let field = CoaddBoundedField::from_parts(
        record.bbox,
        coadd_projection,
        elements,
        policy,
        record.scale,
    )
    .map_err(|e| FieldError::persistence(format!("invalid '{COADD_PERSISTENCE_NAME}' record: {e}")))?;
    Ok(Arc::new(field))
}

impl ArchiveRegistry {
    /// Registry with readers for every type defined in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register_field_type::<ConstantField>("ConstantField");
        registry.register_field_type::<LinearField>("LinearField");
        registry.register_field(COADD_PERSISTENCE_NAME, Arc::new(read_coadd_bounded_field));
        registry.register_projection_type::<AffineProjection>("AffineProjection");
        registry.register_region_type::<Polygon>("Polygon");
        registry
    }
}

impl Default for ArchiveRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl CoaddBoundedField {
    /// Write this field, and everything it references, into `archive`
    pub fn write_to(&self, archive: &mut OutputArchive) -> FieldResult<ArchiveId> {
        archive.put(&Arc::new(self.clone()))
    }

    /// Read the composite stored under `id`
    pub fn read_from(archive: &mut InputArchive, id: ArchiveId) -> FieldResult<Self> {
        let field = archive.get_field(id)?;
        field
            .as_any()
            .downcast_ref::<Self>()
            .cloned()
            .ok_or_else(|| {
                FieldError::persistence(format!(
                    "record {id} is a '{}', expected '{COADD_PERSISTENCE_NAME}'",
                    field.type_name()
                ))
            })
    }

    /// Serialize into a standalone archive document
    pub fn to_archive_json(&self, config: &ArchiveConfig) -> FieldResult<String> {
        let mut archive = OutputArchive::new();
        self.write_to(&mut archive)?;
        archive.into_document().to_json(config.pretty)
    }

    /// Read the first root of an archive document
    pub fn from_archive_json(json: &str, config: &ArchiveConfig) -> FieldResult<Self> {
        let mut archive = InputArchive::from_json(json, config)?;
        let root = archive
            .roots()
            .first()
            .copied()
            .ok_or_else(|| FieldError::persistence("archive has no root record"))?;
        Self::read_from(&mut archive, root)
    }
}
