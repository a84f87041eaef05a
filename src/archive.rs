// Copyright 2025 Cowboy AI, LLC.

//! # Object Archive
//!
//! Reference-counted persistence for object graphs whose nodes are shared.
//!
//! Every persistable object is written once into an [`OutputArchive`] and
//! referred to from other records by its integer [`ArchiveId`]. Writing the
//! same `Arc` twice returns the id assigned the first time, so objects that
//! are shared by several owners are stored once.
//!
//! Reading goes through an [`InputArchive`], which resolves ids lazily with a
//! per-kind cache: every reference to one id yields the same `Arc`, restoring
//! the sharing that existed before the graph was written.
//!
//! ```text
//! Arc identity ──put──▶ ArchiveId ──ArchiveDocument──▶ ArchiveId ──get──▶ Arc identity
//! ```
//!
//! Readers are looked up by persistence name in an [`ArchiveRegistry`], in the
//! same way component constructors are looked up by type name.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ArchiveConfig;
use crate::errors::{FieldError, FieldResult};
use crate::field::BoundedField;
use crate::projection::SkyProjection;
use crate::region::ValidRegion;

/// Identifier of a record inside an archive
pub type ArchiveId = u64;

/// Reserved id meaning "no object"
pub const NULL_ID: ArchiveId = 0;

/// Version of the [`ArchiveDocument`] layout written by this crate
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

/// Objects that can be written into an [`OutputArchive`]
///
/// Implementors must be safe to read concurrently (`Send + Sync`); the
/// archive keeps a handle to each written object for the lifetime of the
/// write so that identities cannot be reused.
pub trait Persistable {
    /// Stable format identifier used to find the reader for this record
    fn persistence_name(&self) -> &'static str;

    /// Identifier of the module (language binding) that owns the format
    fn module(&self) -> &'static str;

    /// Whether this object can be written at all
    fn is_persistable(&self) -> bool {
        true
    }

    /// Produce the record payload, writing any referenced objects first
    fn write(&self, archive: &mut OutputArchive) -> FieldResult<serde_json::Value>;
}

/// One persisted object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveRecord {
    /// Archive id of this record
    pub id: ArchiveId,
    /// Persistence name of the object's format
    pub persistence_name: String,
    /// Module that owns the format
    pub module: String,
    /// Format-specific payload
    pub payload: serde_json::Value,
}

/// Serialized form of a whole archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveDocument {
    /// Layout version, see [`ARCHIVE_FORMAT_VERSION`]
    pub format_version: u32,
    /// Ids put directly by the caller, in the order they were put
    pub roots: Vec<ArchiveId>,
    /// All records, ordered by id
    pub records: Vec<ArchiveRecord>,
}

impl ArchiveDocument {
    /// Render the document as JSON
    pub fn to_json(&self, pretty: bool) -> FieldResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse a document from JSON
    pub fn from_json(json: &str) -> FieldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSON Schema describing the document layout
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ArchiveDocument)
    }
}

/// Write side of the archive
pub struct OutputArchive {
    records: IndexMap<ArchiveId, ArchiveRecord>,
    identities: IndexMap<usize, ArchiveId>,
    // Holding the handles pins every written address until the archive is dropped.
    _retained: Vec<Box<dyn Any + Send + Sync>>,
    roots: Vec<ArchiveId>,
    next_id: ArchiveId,
    depth: usize,
}

impl OutputArchive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
            identities: IndexMap::new(),
            _retained: Vec::new(),
            roots: Vec::new(),
            next_id: NULL_ID + 1,
            depth: 0,
        }
    }

    /// Write an object and return its id
    ///
    /// Putting the same `Arc` (by pointer identity) again returns the id it
    /// was given the first time without writing anything.
    pub fn put<T>(&mut self, object: &Arc<T>) -> FieldResult<ArchiveId>
    where
        T: ?Sized + Persistable + Send + Sync + 'static,
    {
        let identity = Arc::as_ptr(object) as *const () as usize;
        if let Some(id) = self.identities.get(&identity) {
            if self.depth == 0 && !self.roots.contains(id) {
                self.roots.push(*id);
            }
            return Ok(*id);
        }
        if !object.is_persistable() {
            return Err(FieldError::persistence(format!(
                "object '{}' is not persistable",
                object.persistence_name()
            )));
        }

        let checkpoint = self.checkpoint();
        let id = self.next_id;
        self.next_id += 1;
        self.identities.insert(identity, id);
        self._retained.push(Box::new(Arc::clone(object)));

        self.depth += 1;
        let payload = object.write(self);
        self.depth -= 1;
        let payload = match payload {
            Ok(payload) => payload,
            Err(err) => {
                self.rollback(checkpoint);
                return Err(err);
            }
        };

        debug!(
            id,
            persistence_name = object.persistence_name(),
            "Wrote archive record"
        );
        self.records.insert(
            id,
            ArchiveRecord {
                id,
                persistence_name: object.persistence_name().to_string(),
                module: object.module().to_string(),
                payload,
            },
        );
        if self.depth == 0 {
            self.roots.push(id);
        }
        Ok(id)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            records: self.records.len(),
            identities: self.identities.len(),
            retained: self._retained.len(),
            next_id: self.next_id,
        }
    }

    // Forget everything written since the checkpoint, nested records included.
    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.records.truncate(checkpoint.records);
        self.identities.truncate(checkpoint.identities);
        self._retained.truncate(checkpoint.retained);
        self.next_id = checkpoint.next_id;
    }

    /// Write an optional object, returning [`NULL_ID`] for `None`
    pub fn put_optional<T>(&mut self, object: Option<&Arc<T>>) -> FieldResult<ArchiveId>
    where
        T: ?Sized + Persistable + Send + Sync + 'static,
    {
        match object {
            Some(object) => self.put(object),
            None => Ok(NULL_ID),
        }
    }

    /// Id already assigned to this object, if it has been written
    pub fn id_of<T: ?Sized>(&self, object: &Arc<T>) -> Option<ArchiveId> {
        let identity = Arc::as_ptr(object) as *const () as usize;
        self.identities.get(&identity).copied()
    }

    /// Number of records written
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been written
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish writing and produce the serializable document
    pub fn into_document(mut self) -> ArchiveDocument {
        self.records.sort_keys();
        ArchiveDocument {
            format_version: ARCHIVE_FORMAT_VERSION,
            roots: self.roots,
            records: self.records.into_values().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    records: usize,
    identities: usize,
    retained: usize,
    next_id: ArchiveId,
}

impl Default for OutputArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OutputArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputArchive")
            .field("records", &self.records.len())
            .field("roots", &self.roots)
            .finish()
    }
}

/// Reader reconstructing one kind of object from a record payload
pub type Reader<T> =
    Arc<dyn Fn(&serde_json::Value, &mut InputArchive) -> FieldResult<Arc<T>> + Send + Sync>;

/// Reader for scalar fields
pub type FieldReader = Reader<dyn BoundedField>;
/// Reader for sky projections
pub type ProjectionReader = Reader<dyn SkyProjection>;
/// Reader for validity regions
pub type RegionReader = Reader<dyn ValidRegion>;

/// Registry of readers, keyed by persistence name
#[derive(Clone)]
pub struct ArchiveRegistry {
    fields: HashMap<String, FieldReader>,
    projections: HashMap<String, ProjectionReader>,
    regions: HashMap<String, RegionReader>,
}

fn decode<T: DeserializeOwned>(name: &str, payload: &serde_json::Value) -> FieldResult<T> {
    serde_json::from_value(payload.clone())
        .map_err(|e| FieldError::persistence(format!("malformed '{name}' payload: {e}")))
}

impl ArchiveRegistry {
    /// Create a registry with no readers
    pub fn empty() -> Self {
        Self {
            fields: HashMap::new(),
            projections: HashMap::new(),
            regions: HashMap::new(),
        }
    }

    /// Register a field reader
    pub fn register_field(&mut self, name: &str, reader: FieldReader) {
        self.fields.insert(name.to_string(), reader);
    }

    /// Register a projection reader
    pub fn register_projection(&mut self, name: &str, reader: ProjectionReader) {
        self.projections.insert(name.to_string(), reader);
    }

    /// Register a region reader
    pub fn register_region(&mut self, name: &str, reader: RegionReader) {
        self.regions.insert(name.to_string(), reader);
    }

    /// Register a field whose payload is its own serde form
    pub fn register_field_type<T>(&mut self, name: &'static str)
    where
        T: BoundedField + DeserializeOwned + 'static,
    {
        self.register_field(
            name,
            Arc::new(move |payload: &serde_json::Value, _: &mut InputArchive| {
                Ok(Arc::new(decode::<T>(name, payload)?) as Arc<dyn BoundedField>)
            }),
        );
    }

    /// Register a projection whose payload is its own serde form
    pub fn register_projection_type<T>(&mut self, name: &'static str)
    where
        T: SkyProjection + DeserializeOwned + 'static,
    {
        self.register_projection(
            name,
            Arc::new(move |payload: &serde_json::Value, _: &mut InputArchive| {
                Ok(Arc::new(decode::<T>(name, payload)?) as Arc<dyn SkyProjection>)
            }),
        );
    }

    /// Register a region whose payload is its own serde form
    pub fn register_region_type<T>(&mut self, name: &'static str)
    where
        T: ValidRegion + DeserializeOwned + 'static,
    {
        self.register_region(
            name,
            Arc::new(move |payload: &serde_json::Value, _: &mut InputArchive| {
                Ok(Arc::new(decode::<T>(name, payload)?) as Arc<dyn ValidRegion>)
            }),
        );
    }

    /// Check if any reader is registered under this name
    pub fn is_registered(&self, name: &str) -> bool {
        self.kind_of(name).is_some()
    }

    fn kind_of(&self, name: &str) -> Option<&'static str> {
        if self.fields.contains_key(name) {
            Some("field")
        } else if self.projections.contains_key(name) {
            Some("projection")
        } else if self.regions.contains_key(name) {
            Some("region")
        } else {
            None
        }
    }

    fn field_reader(&self, name: &str) -> Option<FieldReader> {
        self.fields.get(name).cloned()
    }

    fn projection_reader(&self, name: &str) -> Option<ProjectionReader> {
        self.projections.get(name).cloned()
    }

    fn region_reader(&self, name: &str) -> Option<RegionReader> {
        self.regions.get(name).cloned()
    }
}

impl fmt::Debug for ArchiveRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&String> = self.fields.keys().collect();
        let mut projections: Vec<&String> = self.projections.keys().collect();
        let mut regions: Vec<&String> = self.regions.keys().collect();
        fields.sort();
        projections.sort();
        regions.sort();
        f.debug_struct("ArchiveRegistry")
            .field("fields", &fields)
            .field("projections", &projections)
            .field("regions", &regions)
            .finish()
    }
}

/// Read side of the archive
pub struct InputArchive {
    records: HashMap<ArchiveId, Arc<ArchiveRecord>>,
    roots: Vec<ArchiveId>,
    registry: Arc<ArchiveRegistry>,
    fields: HashMap<ArchiveId, Arc<dyn BoundedField>>,
    projections: HashMap<ArchiveId, Arc<dyn SkyProjection>>,
    regions: HashMap<ArchiveId, Arc<dyn ValidRegion>>,
    in_progress: HashSet<ArchiveId>,
}

impl InputArchive {
    /// Prepare a document for reading
    pub fn from_document(document: ArchiveDocument, config: &ArchiveConfig) -> FieldResult<Self> {
        if document.format_version != ARCHIVE_FORMAT_VERSION {
            if config.strict_version {
                return Err(FieldError::persistence(format!(
                    "unsupported archive format version {} (expected {})",
                    document.format_version, ARCHIVE_FORMAT_VERSION
                )));
            }
            warn!(
                found = document.format_version,
                expected = ARCHIVE_FORMAT_VERSION,
                "Reading archive with a different format version"
            );
        }

        let mut records = HashMap::with_capacity(document.records.len());
        for record in document.records {
            if record.id == NULL_ID {
                return Err(FieldError::persistence("record uses the reserved null id"));
            }
            let id = record.id;
            if records.insert(id, Arc::new(record)).is_some() {
                return Err(FieldError::persistence(format!("duplicate record id {id}")));
            }
        }

        Ok(Self {
            records,
            roots: document.roots,
            registry: Arc::clone(&config.registry),
            fields: HashMap::new(),
            projections: HashMap::new(),
            regions: HashMap::new(),
            in_progress: HashSet::new(),
        })
    }

    /// Parse JSON and prepare it for reading
    pub fn from_json(json: &str, config: &ArchiveConfig) -> FieldResult<Self> {
        Self::from_document(ArchiveDocument::from_json(json)?, config)
    }

    /// Ids the writer put directly, in order
    pub fn roots(&self) -> &[ArchiveId] {
        &self.roots
    }

    /// Number of records available
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the archive holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reconstruct (or fetch the already reconstructed) field with this id
    pub fn get_field(&mut self, id: ArchiveId) -> FieldResult<Arc<dyn BoundedField>> {
        self.load(id, "field", Self::field_cache, ArchiveRegistry::field_reader)
    }

    /// Reconstruct (or fetch the already reconstructed) projection with this id
    pub fn get_projection(&mut self, id: ArchiveId) -> FieldResult<Arc<dyn SkyProjection>> {
        self.load(
            id,
            "projection",
            Self::projection_cache,
            ArchiveRegistry::projection_reader,
        )
    }

    /// Reconstruct (or fetch the already reconstructed) region with this id
    pub fn get_region(&mut self, id: ArchiveId) -> FieldResult<Arc<dyn ValidRegion>> {
        self.load(id, "region", Self::region_cache, ArchiveRegistry::region_reader)
    }

    /// Like [`get_region`](Self::get_region), mapping [`NULL_ID`] to `None`
    pub fn get_optional_region(
        &mut self,
        id: ArchiveId,
    ) -> FieldResult<Option<Arc<dyn ValidRegion>>> {
        if id == NULL_ID {
            Ok(None)
        } else {
            self.get_region(id).map(Some)
        }
    }

    fn field_cache(&mut self) -> &mut HashMap<ArchiveId, Arc<dyn BoundedField>> {
        &mut self.fields
    }

    fn projection_cache(&mut self) -> &mut HashMap<ArchiveId, Arc<dyn SkyProjection>> {
        &mut self.projections
    }

    fn region_cache(&mut self) -> &mut HashMap<ArchiveId, Arc<dyn ValidRegion>> {
        &mut self.regions
    }

    fn load<T: ?Sized>(
        &mut self,
        id: ArchiveId,
        kind: &'static str,
        cache: fn(&mut Self) -> &mut HashMap<ArchiveId, Arc<T>>,
        lookup: fn(&ArchiveRegistry, &str) -> Option<Reader<T>>,
    ) -> FieldResult<Arc<T>> {
        if id == NULL_ID {
            return Err(FieldError::persistence(format!(
                "null id where a {kind} is required"
            )));
        }
        if let Some(object) = cache(self).get(&id) {
            return Ok(Arc::clone(object));
        }

        let record = self
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| FieldError::persistence(format!("archive id {id} not found")))?;
        let reader = lookup(self.registry.as_ref(), &record.persistence_name).ok_or_else(|| {
            match self.registry.kind_of(&record.persistence_name) {
                Some(actual) => FieldError::persistence(format!(
                    "record {id} is a {actual} ('{}'), expected a {kind}",
                    record.persistence_name
                )),
                None => FieldError::persistence(format!(
                    "no reader registered for '{}' (record {id})",
                    record.persistence_name
                )),
            }
        })?;

        if !self.in_progress.insert(id) {
            return Err(FieldError::persistence(format!(
                "record {id} references itself"
            )));
        }
        let object = reader(&record.payload, self);
        self.in_progress.remove(&id);
        let object = object?;

        debug!(
            id,
            persistence_name = record.persistence_name.as_str(),
            "Read archive record"
        );
        cache(self).insert(id, Arc::clone(&object));
        Ok(object)
    }
}

impl fmt::Debug for InputArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputArchive")
            .field("records", &self.records.len())
            .field("roots", &self.roots)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ConstantField;
    use crate::geometry::{Box2I, Point2D};
    use crate::projection::AffineProjection;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn constant(value: f64) -> Arc<dyn BoundedField> {
        Arc::new(ConstantField::new(Box2I::new(0, 0, 9, 9), value))
    }

    /// Writes its child, then fails while `fail` is set
    #[derive(Debug)]
    struct FlakyField {
        child: Arc<dyn BoundedField>,
        fail: AtomicBool,
    }

    impl Persistable for FlakyField {
        fn persistence_name(&self) -> &'static str {
            "FlakyField"
        }

        fn module(&self) -> &'static str {
            "tests"
        }

        fn write(&self, archive: &mut OutputArchive) -> FieldResult<serde_json::Value> {
            let child = archive.put(&self.child)?;
            if self.fail.swap(false, Ordering::SeqCst) {
                return Err(FieldError::persistence("storage rejected the record"));
            }
            Ok(serde_json::json!({ "child": child }))
        }
    }

    impl BoundedField for FlakyField {
        fn bbox(&self) -> Box2I {
            self.child.bbox()
        }

        fn evaluate(&self, position: Point2D) -> FieldResult<f64> {
            self.child.evaluate(position)
        }

        fn multiply_by(&self, scale: f64) -> FieldResult<Arc<dyn BoundedField>> {
            self.child.multiply_by(scale)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn type_name(&self) -> &'static str {
            "FlakyField"
        }

        fn equals(&self, other: &dyn BoundedField) -> bool {
            other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|other| std::ptr::eq(self, other))
        }
    }

    #[test]
    fn test_failed_write_leaves_no_trace() {
        let child = constant(2.0);
        let flaky: Arc<dyn BoundedField> = Arc::new(FlakyField {
            child: Arc::clone(&child),
            fail: AtomicBool::new(true),
        });
        let mut archive = OutputArchive::new();

        let err = archive.put(&flaky).unwrap_err();
        assert!(err.is_persistence_error());
        assert!(archive.is_empty());
        assert_eq!(archive.id_of(&flaky), None);
        assert_eq!(archive.id_of(&child), None);

        // The retry writes both records, reusing the ids the failed attempt took.
        let id = archive.put(&flaky).unwrap();
        assert_eq!(id, NULL_ID + 1);
        assert_eq!(archive.id_of(&child), Some(NULL_ID + 2));
        assert_eq!(archive.len(), 2);

        let document = archive.into_document();
        assert_eq!(document.roots, vec![id]);
        assert_eq!(document.records[0].payload, serde_json::json!({ "child": NULL_ID + 2 }));
    }

    #[test]
    fn test_put_deduplicates_by_identity() {
        let mut archive = OutputArchive::new();
        let shared = constant(3.0);
        let twin = constant(3.0);

        let first = archive.put(&shared).unwrap();
        let again = archive.put(&Arc::clone(&shared)).unwrap();
        let other = archive.put(&twin).unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.id_of(&shared), Some(first));
    }

    #[test]
    fn test_ids_start_after_null() {
        let mut archive = OutputArchive::new();
        let id = archive.put(&constant(1.0)).unwrap();
        assert_eq!(id, NULL_ID + 1);
        assert_eq!(archive.put_optional::<dyn BoundedField>(None).unwrap(), NULL_ID);
    }

    #[test]
    fn test_document_roundtrip_restores_sharing() {
        let mut output = OutputArchive::new();
        let shared = constant(7.0);
        let id = output.put(&shared).unwrap();
        let json = output.into_document().to_json(false).unwrap();

        let mut input = InputArchive::from_json(&json, &ArchiveConfig::default()).unwrap();
        assert_eq!(input.roots(), &[id]);
        let a = input.get_field(id).unwrap();
        let b = input.get_field(id).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.evaluate(Point2D::new(1.0, 1.0)).unwrap(), 7.0);
    }

    #[test]
    fn test_wrong_kind_is_a_format_error() {
        let mut output = OutputArchive::new();
        let projection: Arc<dyn SkyProjection> = Arc::new(AffineProjection::identity());
        let id = output.put(&projection).unwrap();

        let mut input =
            InputArchive::from_document(output.into_document(), &ArchiveConfig::default()).unwrap();
        let err = input.get_field(id).unwrap_err();

        assert!(err.is_persistence_error());
        assert!(err.to_string().contains("expected a field"));
    }

    #[test]
    fn test_missing_and_null_ids_are_format_errors() {
        let document = OutputArchive::new().into_document();
        let mut input = InputArchive::from_document(document, &ArchiveConfig::default()).unwrap();

        assert!(input.get_field(42).unwrap_err().is_persistence_error());
        assert!(input.get_projection(NULL_ID).unwrap_err().is_persistence_error());
        assert!(input.get_optional_region(NULL_ID).unwrap().is_none());
    }

    #[test]
    fn test_unknown_persistence_name() {
        let document = ArchiveDocument {
            format_version: ARCHIVE_FORMAT_VERSION,
            roots: vec![1],
            records: vec![ArchiveRecord {
                id: 1,
                persistence_name: "ChebyshevBoundedField".to_string(),
                module: "elsewhere".to_string(),
                payload: serde_json::json!({}),
            }],
        };
        let mut input = InputArchive::from_document(document, &ArchiveConfig::default()).unwrap();
        let err = input.get_field(1).unwrap_err();
        assert!(err.to_string().contains("no reader registered"));
    }

    #[test]
    fn test_version_checks() {
        let mut document = OutputArchive::new().into_document();
        document.format_version = ARCHIVE_FORMAT_VERSION + 1;

        let strict = ArchiveConfig::default();
        assert!(InputArchive::from_document(document.clone(), &strict).is_err());

        let lenient = ArchiveConfig {
            strict_version: false,
            ..ArchiveConfig::default()
        };
        assert!(InputArchive::from_document(document, &lenient).is_ok());
    }

    #[test]
    fn test_duplicate_record_ids_rejected() {
        let record = ArchiveRecord {
            id: 1,
            persistence_name: "ConstantField".to_string(),
            module: "coadd_field.field".to_string(),
            payload: serde_json::json!({}),
        };
        let document = ArchiveDocument {
            format_version: ARCHIVE_FORMAT_VERSION,
            roots: vec![],
            records: vec![record.clone(), record],
        };
        let err = InputArchive::from_document(document, &ArchiveConfig::default()).unwrap_err();
        assert!(err.to_string().contains("duplicate record id 1"));
    }

    #[test]
    fn test_schema_names_document_fields() {
        let schema = serde_json::to_value(ArchiveDocument::json_schema()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("format_version").is_some());
        assert!(properties.get("roots").is_some());
        assert!(properties.get("records").is_some());
    }
}
