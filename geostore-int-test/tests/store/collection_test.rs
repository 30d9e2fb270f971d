use geostore::errors::ErrorKind;
use geostore::model::{AttributeDescriptor, CollectionMetadata};
use geostore_int_test::test_util::{cleanup, create_test_context, run_test};
use serde_json::json;

#[test]
fn test_create_collection_adds_mandatory_descriptors() {
    run_test(
        || create_test_context(),
        |ctx| {
            let extra = vec![AttributeDescriptor::new("iso", "string").long_name("ISO 3166 code")];
            let index = ctx.store().create_collection(
                "countries",
                Some(CollectionMetadata::new("World countries")),
                extra,
            )?;

            let collection = index.collection("countries").expect("collection missing");
            let names: Vec<&str> = collection
                .attribute_descriptors
                .iter()
                .map(|d| d.short_name.as_str())
                .collect();
            assert_eq!(names, vec!["fid", "prop_hash", "geom_hash", "iso"]);
            assert!(collection.is_empty());
            assert_eq!(
                collection.metadata.as_ref().map(|m| m.name.as_str()),
                Some("World countries")
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_existing_collection_is_noop() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            let first = store.create_collection(
                "countries",
                Some(CollectionMetadata::new("First")),
                vec![],
            )?;
            let second = store.create_collection(
                "countries",
                Some(CollectionMetadata::new("Second")),
                vec![AttributeDescriptor::new("iso", "string")],
            )?;

            assert_eq!(first, second);
            assert_eq!(store.index()?.collections.len(), 1);
            let collection = store.load_collection("countries")?;
            assert_eq!(collection.metadata.map(|m| m.name), Some("First".to_string()));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[cfg(not(feature = "memory"))]
#[test]
fn test_create_collection_creates_directories() {
    run_test(
        || create_test_context(),
        |ctx| {
            ctx.store().create_collection("rivers", None, vec![])?;
            let root = std::path::Path::new(ctx.path());
            assert!(root.join("rivers").join("records").is_dir());
            assert!(root.join("rivers").join("geometries").is_dir());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_create_collection_rejects_invalid_input() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            for id in ["", "..", ".hidden", "a/b"] {
                let err = store.create_collection(id, None, vec![]).unwrap_err();
                assert_eq!(err.kind(), &ErrorKind::ValidationError, "id {:?}", id);
            }

            let err = store
                .create_collection("x", Some(CollectionMetadata::new(" ")), vec![])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = store
                .create_collection("x", None, vec![AttributeDescriptor::new("fid", "string")])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = store
                .create_collection("x", None, vec![AttributeDescriptor::new("area", "decimal")])
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            assert!(store.index()?.collections.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_load_unknown_collection_fails() {
    run_test(
        || create_test_context(),
        |ctx| {
            let err = ctx.store().load_collection("nowhere").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            assert!(err.kind().is_not_found());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_collection_by_path() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection(
                "countries",
                Some(CollectionMetadata::new("World countries")),
                vec![AttributeDescriptor::new("iso", "string")],
            )?;

            store.update_collection("countries", "collection_metadata.version", json!("1.1.0"))?;
            store.update_collection("countries", "property_attributes.3.units", json!("1"))?;

            let collection = ctx.reopen()?.load_collection("countries")?;
            let metadata = collection.metadata.expect("metadata missing");
            assert_eq!(metadata.version.as_deref(), Some("1.1.0"));
            assert_eq!(collection.attribute_descriptors[3].units.as_deref(), Some("1"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_update_collection_rejects_invalid_result() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            let before = store.index()?;

            let err = store
                .update_collection("countries", "id", json!("renamed"))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = store
                .update_collection("countries", "collection_metadata.colour", json!("red"))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ValidationError);

            let err = store
                .update_collection("missing", "collection_metadata.name", json!("x"))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);

            assert_eq!(store.index()?, before);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
