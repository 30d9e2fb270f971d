use geostore::errors::GeoStoreResult;
use geostore::model::{Feature, GeoDocument};
use geostore::query::match_spec;
use geostore::QueryOptions;
use geostore_int_test::test_util::{attributes, cleanup, create_test_context, rectangle};
use serde_json::json;

fn main() -> GeoStoreResult<()> {
    colog::init();
    println!("Starting ingest test...");
    let ctx = create_test_context()?;
    let store = ctx.store();
    store.create_collection("tiles", None, vec![])?;

    let count = 10000;
    let features: Vec<Feature> = (0..count)
        .map(|i| {
            let x = (i % 100) as f64;
            let y = (i / 100) as f64;
            Feature {
                properties: attributes(json!({
                    "tile": i,
                    "row": i / 100,
                    "label": uuid::Uuid::new_v4().to_string(),
                })),
                geometry: Some(rectangle(x, y, x + 1.0, y + 1.0)),
            }
        })
        .collect();
    let document = GeoDocument::FeatureCollection(features);
    let fields = vec!["tile".to_string(), "row".to_string()];

    let start = std::time::Instant::now();
    store.create_records_from_document("tiles", &document, Some(&fields))?;
    println!("Inserted {} records in {:?}", count, start.elapsed());

    let start = std::time::Instant::now();
    let hits = store.query_lookup("tiles", &match_spec(json!({"row": 42}))?)?;
    println!("Matched {} lookup entries in {:?}", hits.len(), start.elapsed());

    let start = std::time::Instant::now();
    let options = QueryOptions::new().include_record(true).include_geometry(true);
    let hits = store.query_records("tiles", &match_spec(json!({"row": 42}))?, &options)?;
    println!("Read {} records with geometries in {:?}", hits.len(), start.elapsed());

    store.summarise()?;
    cleanup(ctx)?;
    println!("Ingest test completed.");
    Ok(())
}
