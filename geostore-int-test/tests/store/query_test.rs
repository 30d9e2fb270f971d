use geostore::errors::ErrorKind;
use geostore::model::GeoDocument;
use geostore::query::{match_spec, AllFilter, AndFilter, EqualsFilter, Filter};
use geostore::{QueryOptions, RecordOptions};
use geostore_int_test::test_util::{
    attributes, brazil, cleanup, create_test_context, run_test, three_cities,
};
use geostore_spatial::Geometry;
use serde_json::json;

#[test]
fn test_countries_end_to_end() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("countries", None, vec![])?;

            let options = RecordOptions::new().index_fields(&["iso", "kind"]);
            let entry = store.create_record(
                "countries",
                attributes(json!({"iso": "BRA", "kind": "country"})),
                Some(brazil()),
                &options,
            )?;
            let mut index = store.index()?;
            index
                .collection_mut("countries")
                .expect("collection missing")
                .lookup_entries
                .push(entry.clone());
            store.persist(&index)?;

            let hits = ctx
                .reopen()?
                .query_lookup("countries", &match_spec(json!({"iso": "BRA", "kind": "country"}))?)?;
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].fid(), entry.fid());
            assert_eq!(hits[0].prop_hash(), entry.prop_hash());
            assert_eq!(hits[0].geom_hash(), entry.geom_hash());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_query_without_match_is_empty() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("cities", None, vec![])?;
            let document = GeoDocument::from_value(&three_cities())?;
            let fields = vec!["name".to_string(), "country".to_string()];
            store.create_records_from_document("cities", &document, Some(&fields))?;

            let hits = store.query_lookup("cities", &match_spec(json!({"country": "FRA"}))?)?;
            assert!(hits.is_empty());

            let hits = store.query_lookup("cities", &match_spec(json!({"country": "PRT", "name": "Madrid"}))?)?;
            assert!(hits.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_query_is_typed_and_uses_indexed_fields_only() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("cities", None, vec![])?;
            let document = GeoDocument::from_value(&three_cities())?;
            let fields = vec!["country".to_string()];
            store.create_records_from_document("cities", &document, Some(&fields))?;

            let hits = store.query_lookup("cities", &match_spec(json!({"country": "PRT"}))?)?;
            assert_eq!(hits.len(), 2);

            // population was not copied into the lookup entries
            let hits = store.query_lookup("cities", &match_spec(json!({"population": 231800}))?)?;
            assert!(hits.is_empty());

            let hits = store.query_lookup("cities", &match_spec(json!({"country": 1}))?)?;
            assert!(hits.is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_query_records_reads_files() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("cities", None, vec![])?;
            let document = GeoDocument::from_value(&three_cities())?;
            let fields = vec!["country".to_string()];
            store.create_records_from_document("cities", &document, Some(&fields))?;
            let spec = match_spec(json!({"country": "PRT"}))?;

            let hits = store.query_records("cities", &spec, &QueryOptions::new())?;
            assert_eq!(hits.len(), 2);
            assert!(hits.iter().all(|h| h.record.is_none() && h.geometry.is_none()));

            let options = QueryOptions::new().include_record(true).include_geometry(true);
            let hits = store.query_records("cities", &spec, &options)?;
            let names: Vec<_> = hits
                .iter()
                .map(|h| {
                    h.record
                        .as_ref()
                        .and_then(|r| r.attributes.get("name").cloned())
                })
                .collect();
            assert_eq!(names, vec![Some(json!("Lisbon")), Some(json!("Porto"))]);
            assert_eq!(
                hits[0].geometry,
                Some(Geometry::Point(vec![-9.139337, 38.722252]))
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_query_errors() {
    run_test(
        || create_test_context(),
        |ctx| {
            let store = ctx.store();
            store.create_collection("cities", None, vec![])?;

            let err = store.query_lookup("cities", &match_spec(json!({}))?).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::FilterError);

            let err = match_spec(json!(["iso"])).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::FilterError);

            let err = store
                .query_lookup("nowhere", &match_spec(json!({"iso": "BRA"}))?)
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[test]
fn test_filters_built_by_hand() {
    run_test(
        || create_test_context(),
        |_ctx| {
            let doc = json!({"features": [
                {"iso": "BRA", "kind": "country"},
                {"iso": "ARG", "kind": "country"}
            ]});
            let filter = Filter::new(AndFilter::new(vec![
                Filter::new(EqualsFilter::new("iso".to_string(), json!("BRA"))),
                Filter::new(EqualsFilter::new("kind".to_string(), json!("country"))),
            ]));
            assert_eq!(filter.select(&doc)?, vec![&doc["features"][0]]);

            let everything = Filter::new(AllFilter).select(&doc)?;
            assert!(everything.contains(&&doc["features"][1]));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
