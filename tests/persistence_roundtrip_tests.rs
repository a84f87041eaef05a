// Copyright 2025 Cowboy AI, LLC.

//! Writing coadd fields to archives and reading them back

use std::sync::Arc;

use coadd_field::{
    AffineProjection, ArchiveConfig, ArchiveDocument, ArchiveRecord, BoundedField, Box2I,
    CoaddBoundedField, CoaddElement, ConstantField, FieldError, InputArchive, LinearField,
    OutputArchive, Point2D, Polygon, SkyPoint, SkyProjection, ValidRegion, ARCHIVE_FORMAT_VERSION,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn coadd_box() -> Box2I {
    Box2I::new(0, 0, 100, 100)
}

fn identity() -> Arc<dyn SkyProjection> {
    Arc::new(AffineProjection::identity())
}

fn right_half() -> Arc<dyn ValidRegion> {
    Arc::new(Polygon::rectangle(Point2D::new(50.0, 0.0), Point2D::new(100.0, 100.0)).unwrap())
}

fn linear() -> Arc<dyn BoundedField> {
    Arc::new(LinearField::new(coadd_box(), 1.0, 0.5, -0.25))
}

fn roundtrip(field: &CoaddBoundedField) -> CoaddBoundedField {
    let config = ArchiveConfig::default();
    let json = field.to_archive_json(&config).unwrap();
    CoaddBoundedField::from_archive_json(&json, &config).unwrap()
}

#[test]
fn roundtrip_preserves_structure_and_values() -> anyhow::Result<()> {
    let field = CoaddBoundedField::builder()
        .bbox(coadd_box())
        .coadd_projection(identity())
        .element(linear(), identity(), None, 2.0)
        .element(
            Arc::new(ConstantField::new(coadd_box(), 20.0)),
            Arc::new(AffineProjection::translated(5.0, -5.0)?),
            Some(right_half()),
            0.5,
        )
        .default_value(-1.0)
        .build()?;

    let config = ArchiveConfig::default();
    let json = field.to_archive_json(&config)?;
    let restored = CoaddBoundedField::from_archive_json(&json, &config)?;
    assert_eq!(restored, field);
    for point in [Point2D::new(10.0, 10.0), Point2D::new(75.0, 30.0), Point2D::new(500.0, 500.0)] {
        assert_eq!(restored.evaluate(point)?, field.evaluate(point)?);
    }
    Ok(())
}

#[test]
fn shared_field_is_shared_after_reading() {
    let shared = linear();
    let elements = vec![
        CoaddElement::new(Arc::clone(&shared), identity(), None),
        CoaddElement::new(Arc::clone(&shared), identity(), Some(right_half())).with_weight(3.0),
    ];
    let field = CoaddBoundedField::throwing(coadd_box(), identity(), elements).unwrap();

    let restored = roundtrip(&field);
    assert_eq!(restored, field);
    assert!(Arc::ptr_eq(&restored.elements()[0].field, &restored.elements()[1].field));
    assert!(!Arc::ptr_eq(&restored.elements()[0].projection, &restored.elements()[1].projection));
}

#[test]
fn equal_but_distinct_fields_stay_distinct() {
    let elements = vec![
        CoaddElement::new(linear(), identity(), None),
        CoaddElement::new(linear(), identity(), None),
    ];
    let field = CoaddBoundedField::throwing(coadd_box(), identity(), elements).unwrap();

    let restored = roundtrip(&field);
    assert_eq!(restored, field);
    assert!(!Arc::ptr_eq(&restored.elements()[0].field, &restored.elements()[1].field));
}

#[test]
fn composites_in_one_archive_share_contributors() {
    let wcs = identity();
    let shared = linear();
    let region = right_half();
    let first = CoaddBoundedField::throwing(
        coadd_box(),
        Arc::clone(&wcs),
        vec![CoaddElement::new(Arc::clone(&shared), Arc::clone(&wcs), Some(Arc::clone(&region)))],
    )
    .unwrap();
    let second = CoaddBoundedField::with_default(
        coadd_box(),
        Arc::clone(&wcs),
        vec![
            CoaddElement::new(Arc::clone(&shared), Arc::clone(&wcs), Some(region)),
            CoaddElement::new(Arc::new(ConstantField::new(coadd_box(), 1.0)), wcs, None),
        ],
        0.0,
    )
    .unwrap();

    let mut output = OutputArchive::new();
    let first_id = first.write_to(&mut output).unwrap();
    let second_id = second.write_to(&mut output).unwrap();
    // wcs, shared field, region, constant field, two composites
    assert_eq!(output.len(), 6);
    let document = output.into_document();
    assert_eq!(document.roots, vec![first_id, second_id]);

    let mut input = InputArchive::from_document(document, &ArchiveConfig::default()).unwrap();
    let first_back = CoaddBoundedField::read_from(&mut input, first_id).unwrap();
    let second_back = CoaddBoundedField::read_from(&mut input, second_id).unwrap();

    assert_eq!(first_back, first);
    assert_eq!(second_back, second);
    assert!(Arc::ptr_eq(&first_back.elements()[0].field, &second_back.elements()[0].field));
    assert!(Arc::ptr_eq(
        first_back.elements()[0].valid_region.as_ref().unwrap(),
        second_back.elements()[0].valid_region.as_ref().unwrap()
    ));
    assert!(Arc::ptr_eq(first_back.coadd_projection(), second_back.coadd_projection()));
}

#[test]
fn nested_composites_roundtrip() {
    let inner: Arc<dyn BoundedField> = Arc::new(
        CoaddBoundedField::with_default(
            coadd_box(),
            identity(),
            vec![CoaddElement::new(linear(), identity(), Some(right_half()))],
            4.0,
        )
        .unwrap(),
    );
    let outer = CoaddBoundedField::throwing(
        coadd_box(),
        identity(),
        vec![CoaddElement::new(inner, identity(), None)],
    )
    .unwrap();

    let restored = roundtrip(&outer);
    assert_eq!(restored, outer);
    assert_eq!(restored.evaluate(Point2D::new(10.0, 10.0)).unwrap(), 4.0);
}

#[test]
fn scaled_field_roundtrip() {
    let field = CoaddBoundedField::with_default(
        coadd_box(),
        identity(),
        vec![CoaddElement::new(linear(), identity(), Some(right_half()))],
        2.0,
    )
    .unwrap();
    let scaled = field.scaled(3.0).unwrap();

    let restored = roundtrip(&scaled);
    assert_eq!(restored, scaled);
    assert_eq!(restored.scale(), 3.0);
    assert_eq!(restored.default_value(), Some(6.0));
}

proptest! {
    #[test]
    fn arbitrary_values_roundtrip_exactly(
        weights in proptest::collection::vec(proptest::num::f64::NORMAL, 1..6),
        default in -1.0e300f64..1.0e300,
        scale in -1.0e3f64..1.0e3,
        crpix in (-1.0e4f64..1.0e4, -1.0e4f64..1.0e4),
        crval in (0.0f64..360.0, -90.0f64..90.0),
        diagonal in (1.0e-6f64..1.0e-3, 1.0e-6f64..1.0e-3),
        skew in (-1.0e-7f64..1.0e-7, -1.0e-7f64..1.0e-7),
        corner in (-1.0e3f64..1.0e3, -1.0e3f64..1.0e3),
    ) {
        let wcs: Arc<dyn SkyProjection> = Arc::new(
            AffineProjection::new(
                Point2D::new(crpix.0, crpix.1),
                SkyPoint::new(crval.0, crval.1),
                [[diagonal.0, skew.0], [skew.1, diagonal.1]],
            )
            .unwrap(),
        );
        let region: Arc<dyn ValidRegion> = Arc::new(
            Polygon::rectangle(
                Point2D::new(corner.0, corner.1),
                Point2D::new(corner.0 + 100.0 / 3.0, corner.1 + 0.1),
            )
            .unwrap(),
        );
        let elements = weights
            .iter()
            .map(|weight| {
                let field: Arc<dyn BoundedField> =
                    Arc::new(LinearField::new(coadd_box(), *weight / 7.0, weight.abs().sqrt(), 0.1));
                CoaddElement::new(field, Arc::clone(&wcs), Some(Arc::clone(&region))).with_weight(*weight)
            })
            .collect();
        let field = CoaddBoundedField::with_default(coadd_box(), Arc::clone(&wcs), elements, default)
            .unwrap()
            .scaled(scale)
            .unwrap();

        let restored = roundtrip(&field);
        prop_assert_eq!(restored, field);
    }
}

fn document_with(records: Vec<ArchiveRecord>) -> String {
    ArchiveDocument {
        format_version: ARCHIVE_FORMAT_VERSION,
        roots: vec![1],
        records,
    }
    .to_json(false)
    .unwrap()
}

fn record(id: u64, name: &str, payload: serde_json::Value) -> ArchiveRecord {
    ArchiveRecord {
        id,
        persistence_name: name.to_string(),
        module: "coadd_field.coadd".to_string(),
        payload,
    }
}

fn coadd_payload(coadd_wcs: u64, field: u64) -> serde_json::Value {
    serde_json::json!({
        "bbox": { "min_x": 0, "min_y": 0, "max_x": 10, "max_y": 10 },
        "coadd_wcs": coadd_wcs,
        "throw_on_missing": true,
        "default": 0.0,
        "elements": [
            { "field": field, "wcs": coadd_wcs, "valid_polygon": null, "weight": 1.0 }
        ]
    })
}

#[test]
fn missing_reference_is_a_format_error() {
    let json = document_with(vec![
        record(1, "CoaddBoundedField", coadd_payload(2, 3)),
        record(2, "AffineProjection", serde_json::to_value(AffineProjection::identity()).unwrap()),
    ]);
    let err = CoaddBoundedField::from_archive_json(&json, &ArchiveConfig::default()).unwrap_err();
    assert_eq!(err, FieldError::PersistenceFormat("archive id 3 not found".to_string()));
}

#[test]
fn wrong_kind_reference_is_a_format_error() {
    // The field slot points at the projection record.
    let json = document_with(vec![
        record(1, "CoaddBoundedField", coadd_payload(2, 2)),
        record(2, "AffineProjection", serde_json::to_value(AffineProjection::identity()).unwrap()),
    ]);
    let err = CoaddBoundedField::from_archive_json(&json, &ArchiveConfig::default()).unwrap_err();
    assert!(err.is_persistence_error());
    assert!(err.to_string().contains("expected a field"));
}

#[test]
fn self_reference_is_a_format_error() {
    let json = document_with(vec![
        record(1, "CoaddBoundedField", coadd_payload(2, 1)),
        record(2, "AffineProjection", serde_json::to_value(AffineProjection::identity()).unwrap()),
    ]);
    let err = CoaddBoundedField::from_archive_json(&json, &ArchiveConfig::default()).unwrap_err();
    assert!(err.to_string().contains("references itself"));
}

#[test]
fn unsupported_version_is_rejected() {
    let json = serde_json::json!({
        "format_version": ARCHIVE_FORMAT_VERSION + 1,
        "roots": [],
        "records": []
    })
    .to_string();
    let err = CoaddBoundedField::from_archive_json(&json, &ArchiveConfig::default()).unwrap_err();
    assert!(err.to_string().contains("unsupported archive format version"));
}

#[test]
fn garbage_input_is_a_serialization_error() {
    let err = CoaddBoundedField::from_archive_json("{ not json", &ArchiveConfig::default()).unwrap_err();
    assert!(matches!(err, FieldError::Serialization(_)));
    assert!(err.is_persistence_error());
}
