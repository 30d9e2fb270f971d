use geostore::errors::ErrorKind;
use geostore::{fingerprint, fingerprint_of, RecordOptions};
use geostore_int_test::test_util::{
    attributes, brazil, cleanup, create_test_context, rectangle, run_test,
};
use geostore_spatial::{ring_orientation, Geometry, Orientation};
use serde_json::{json, Value};

#[test]
fn test_identical_input_gets_new_fid_and_same_hashes() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let props = attributes(json!({"iso": "BRA", "kind": "country"}));

            let a = store.create_record("countries", props.clone(), Some(brazil()), &RecordOptions::new())?;
            let b = store.create_record("countries", props, Some(brazil()), &RecordOptions::new())?;

            assert_ne!(a.fid(), b.fid());
            assert_eq!(a.prop_hash(), b.prop_hash());
            assert_eq!(a.geom_hash(), b.geom_hash());
            assert!(a.geom_hash().is_some());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_prop_hash_covers_caller_attributes_only() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let props = attributes(json!({"kind": "country", "iso": "BRA"}));
            let expected = fingerprint(&Value::Object(props.clone()))?;

            let with_geometry =
                store.create_record("countries", props.clone(), Some(brazil()), &RecordOptions::new())?;
            let without_geometry =
                store.create_record("countries", props, None, &RecordOptions::new())?;
            let reordered = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA", "kind": "country"})),
                Some(rectangle(0.0, 0.0, 1.0, 1.0)),
                &RecordOptions::new(),
            )?;

            assert_eq!(with_geometry.prop_hash(), Some(expected.as_str()));
            assert_eq!(without_geometry.prop_hash(), Some(expected.as_str()));
            assert_eq!(reordered.prop_hash(), Some(expected.as_str()));
            assert!(without_geometry.geom_hash().is_none());

            let other = store.create_record(
                "countries",
                attributes(json!({"iso": "ARG", "kind": "country"})),
                None,
                &RecordOptions::new(),
            )?;
            assert_ne!(other.prop_hash(), Some(expected.as_str()));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_stored_geometry_is_normalized() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let entry = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA"})),
                Some(brazil()),
                &RecordOptions::new(),
            )?;
            let fid = entry.fid().expect("fid missing");

            let geometry = store.read_geometry("countries", fid)?;
            match &geometry {
                Geometry::Polygon(rings) => {
                    assert_eq!(rings[0][0], vec![-73.987235, -33.768378]);
                    assert_eq!(ring_orientation(&rings[0]), Orientation::Clockwise);
                }
                other => panic!("expected a polygon, found {}", other.type_name()),
            }
            assert_eq!(Some(fingerprint_of(&geometry)?.as_str()), entry.geom_hash());

            let record = store.read_record("countries", fid, false)?;
            let bbox = record.bounding_box.expect("bbox missing").to_array();
            assert_eq!(bbox, [-73.987235, -33.768378, -34.729993, 5.244486]);
            assert!(record.geometry.is_none());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_normalization_is_idempotent() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let first = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA"})),
                Some(brazil()),
                &RecordOptions::new(),
            )?;
            let stored = store.read_geometry("countries", first.fid().expect("fid missing"))?;

            let second = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA"})),
                Some(stored.clone()),
                &RecordOptions::new(),
            )?;
            let restored = store.read_geometry("countries", second.fid().expect("fid missing"))?;

            assert_eq!(first.geom_hash(), second.geom_hash());
            assert_eq!(
                serde_json::to_vec(&stored).expect("encode"),
                serde_json::to_vec(&restored).expect("encode")
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_record_precision_override() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let entry = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA"})),
                Some(brazil()),
                &RecordOptions::new().coordinate_precision(2),
            )?;
            let record = store.read_record("countries", entry.fid().expect("fid missing"), true)?;
            match record.geometry {
                Some(Geometry::Polygon(rings)) => assert_eq!(rings[0][0], vec![-73.99, -33.77]),
                other => panic!("expected an attached polygon, found {:?}", other),
            }

            let err = store
                .create_record("countries", attributes(json!({})), Some(brazil()), &RecordOptions::new().coordinate_precision(16))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_record_without_geometry() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("notes", None, vec![])?;
            let entry = store.create_record(
                "notes",
                attributes(json!({"text": "hello", "geom_hash": "forged"})),
                None,
                &RecordOptions::new(),
            )?;
            let fid = entry.fid().expect("fid missing");

            let record = store.read_record("notes", fid, true)?;
            assert!(record.geometry.is_none());
            assert!(record.bounding_box.is_none());
            assert!(record.geom_hash().is_none());
            assert_eq!(record.attributes.get("text"), Some(&json!("hello")));

            let err = store.read_geometry("notes", fid).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[cfg(not(feature = "memory"))]
#[test]
fn test_record_files_on_disk() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let entry = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA"})),
                Some(brazil()),
                &RecordOptions::new(),
            )?;
            let fid = entry.fid().expect("fid missing");
            let collection_dir = std::path::Path::new(ctx.path()).join("countries");

            let record: Value = serde_json::from_slice(&std::fs::read(
                collection_dir.join("records").join(format!("{}.doc", fid)),
            )?)?;
            assert_eq!(record["type"], json!("Feature"));
            assert_eq!(record["id"], json!(fid));
            assert_eq!(record["geometry"], Value::Null);
            assert_eq!(record["properties"]["fid"], json!(fid));
            assert!(record["bbox"].is_array());

            let geometry: Value = serde_json::from_slice(&std::fs::read(
                collection_dir.join("geometries").join(format!("{}.doc", fid)),
            )?)?;
            assert_eq!(geometry["type"], json!("Polygon"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_record_in_unknown_collection() {
    run_test(
        || create_test_context(),
        |ctx| {
            let err = ctx
                .store()
                .create_record("nowhere", attributes(json!({"a": 1})), None, &RecordOptions::new())
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_read_unknown_record() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let err = store
                .read_record("countries", &uuid::Uuid::new_v4().to_string(), false)
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NotFound);

            let err = store.read_record("countries", "../escape", false).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_malformed_geometry_is_rejected() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let open_ring = Geometry::Polygon(vec![vec![
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
                vec![0.0, 1.0],
            ]]);
            for geometry in [Geometry::Point(vec![1.0]), open_ring] {
                let err = store
                    .create_record("countries", attributes(json!({"iso": "BRA"})), Some(geometry), &RecordOptions::new())
                    .unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError);
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_huge_ordinates_survive_storage() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let point = Geometry::Point(vec![1.0e308, -1.0e308]);
            let entry = store.create_record("countries", attributes(json!({})), Some(point.clone()), &RecordOptions::new())?;

            let record = store.read_record("countries", &entry.id, true)?;
            assert_eq!(record.geometry, Some(point));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
