use geostore::errors::ErrorKind;
use geostore::model::GeoDocument;
use geostore::query::match_spec;
use geostore_int_test::test_util::{cleanup, create_test_context, rectangle, run_test, three_cities};
use serde_json::json;

#[test]
fn test_feature_collection_appends_in_order() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("cities", None, vec![])?;
            let before = store.load_collection("cities")?.len();

            let document = GeoDocument::from_value(&three_cities())?;
            let fields = vec!["name".to_string()];
            let index = store.create_records_from_document("cities", &document, Some(&fields))?;

            let collection = index.collection("cities").expect("collection missing");
            assert_eq!(collection.len(), before + 3);
            let names: Vec<_> = collection
                .lookup_entries
                .iter()
                .map(|e| e.attributes.get("name").cloned())
                .collect();
            assert_eq!(
                names,
                vec![Some(json!("Lisbon")), Some(json!("Porto")), Some(json!("Madrid"))]
            );
            assert_eq!(ctx.reopen()?.load_collection("cities")?, *collection);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_second_import_appends_after_first() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("cities", None, vec![])?;
            let document = GeoDocument::from_value(&three_cities())?;
            let first = store.create_records_from_document("cities", &document, None)?;
            let second = store.create_records_from_document("cities", &document, None)?;

            let first = &first.collection("cities").expect("collection missing").lookup_entries;
            let second = &second.collection("cities").expect("collection missing").lookup_entries;
            assert_eq!(second.len(), 6);
            assert_eq!(&second[..3], &first[..]);
            for (old, new) in first.iter().zip(&second[3..]) {
                assert_ne!(old.fid(), new.fid());
                assert_eq!(old.prop_hash(), new.prop_hash());
                assert_eq!(old.geom_hash(), new.geom_hash());
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_import_single_feature_and_geometry() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("parcels", None, vec![])?;

            let feature = GeoDocument::from_value(&json!({
                "type": "Feature",
                "properties": {"parcel": "A-1"},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]}
            }))?;
            store.create_records_from_document("parcels", &feature, Some(&["parcel".to_string()]))?;

            let bare = GeoDocument::Geometry(rectangle(5.0, 5.0, 6.0, 6.0));
            let index = store.create_records_from_document("parcels", &bare, None)?;

            let entries = &index.collection("parcels").expect("collection missing").lookup_entries;
            assert_eq!(entries.len(), 2);
            assert!(entries.iter().all(|e| e.geom_hash().is_some()));

            let hits = store.query_lookup("parcels", &match_spec(json!({"parcel": "A-1"}))?)?;
            assert_eq!(hits.len(), 1);
            let record = store.read_record("parcels", hits[0].fid().expect("fid missing"), false)?;
            assert_eq!(
                record.bounding_box.map(|b| b.to_array()),
                Some([0.0, 0.0, 2.0, 2.0])
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_import_into_unknown_collection_writes_nothing() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            let document = GeoDocument::from_value(&three_cities())?;
            let err = store
                .create_records_from_document("cities", &document, None)
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            assert!(store.index()?.collections.is_empty());

            #[cfg(not(feature = "memory"))]
            assert!(!std::path::Path::new(ctx.path()).join("cities").exists());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_invalid_documents_are_rejected() {
    run_test(
        || create_test_context(),
        |_ctx| {
            let cases = vec![
                json!({"type": "Topology"}),
                json!({"features": []}),
                json!({"type": "FeatureCollection", "features": {}}),
                json!({"type": "FeatureCollection", "features": [], "extra": true}),
                json!({"type": "Feature", "properties": [], "geometry": null}),
                json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]]}),
            ];
            for case in cases {
                let err = GeoDocument::from_value(&case).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError, "case {}", case);
            }
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_concurrent_handles_lose_no_entries() {
    run_test(
        || create_test_context(),
        |ctx| {
            ctx.store().create_collection("cities", None, vec![])?;
            let document = GeoDocument::from_value(&three_cities())?;
            let writers = 4;
            let rounds = 3;

            std::thread::scope(|scope| {
                let handles: Vec<_> = (0..writers)
                    .map(|_| {
                        let document = &document;
                        let ctx = &ctx;
                        scope.spawn(move || -> geostore::errors::GeoStoreResult<()> {
                            let store = ctx.reopen()?;
                            for _ in 0..rounds {
                                store.create_records_from_document("cities", document, None)?;
                            }
                            Ok(())
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().expect("writer panicked")?;
                }
                Ok::<_, geostore::errors::GeoStoreError>(())
            })?;

            let collection = ctx.store().load_collection("cities")?;
            assert_eq!(collection.len(), writers * rounds * document.len());
            assert!(collection.validate().is_ok());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
