use geostore::errors::ErrorKind;
use geostore::GeoStore;
use geostore_int_test::test_util::{cleanup, create_test_context, run_test};
use std::path::Path;

#[test]
fn test_open_creates_empty_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let index = ctx.store().index()?;
            assert!(index.collections.is_empty());
            assert_eq!(index.root_path(), ctx.path());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_open_twice_returns_same_state() {
    run_test(
        || create_test_context(),
        |ctx| {
            ctx.store().create_collection("countries", None, vec![])?;
            let first = ctx.store().index()?;

            let reopened = ctx.reopen()?;
            let second = reopened.index()?;
            assert_eq!(first, second);
            assert_eq!(second.collection_ids(), vec!["countries"]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[cfg(not(feature = "memory"))]
#[test]
fn test_open_twice_does_not_duplicate_root() {
    run_test(
        || create_test_context(),
        |ctx| {
            let _again = ctx.reopen()?;
            let entries: Vec<_> = std::fs::read_dir(ctx.path())?
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect();
            assert_eq!(entries, vec![".store_index".to_string()]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[cfg(not(feature = "memory"))]
#[test]
fn test_open_creates_missing_directories() {
    run_test(
        || create_test_context(),
        |ctx| {
            let nested = Path::new(ctx.path()).join("a").join("b");
            let store = GeoStore::open(&nested)?;
            assert!(nested.join(".store_index").is_file());
            assert!(store.index()?.collections.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[cfg(not(feature = "memory"))]
#[test]
fn test_open_rejects_corrupt_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let index_path = Path::new(ctx.path()).join(".store_index");
            std::fs::write(&index_path, b"{ not json")?;

            let err = match GeoStore::open(ctx.path()) {
                Ok(_) => panic!("corrupt index must not open"),
                Err(e) => e,
            };
            assert_eq!(err.kind(), &ErrorKind::EncodingError);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_persist_round_trips_index() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            let mut index = store.create_collection("rivers", None, vec![])?;
            index.store.root_path = "relocated".to_string();
            store.persist(&index)?;

            assert_eq!(store.index()?.root_path(), "relocated");
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_builder_settings_reach_store() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = GeoStore::builder()
                .coordinate_precision(3)
                .pretty_print(true)
                .document_io_handle(ctx.store().config().document_io())
                .open(ctx.path())?;
            assert_eq!(store.config().coordinate_precision(), 3);
            assert!(store.config().pretty_print());

            let err = match GeoStore::builder().coordinate_precision(16).open(ctx.path()) {
                Ok(_) => panic!("precision above 15 must be rejected"),
                Err(e) => e,
            };
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_summarise_counts_records() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;
            store.summarise()?;
            let summary = store.index()?.to_string();
            assert!(summary.contains("1 collections"));
            assert!(summary.contains("countries"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
