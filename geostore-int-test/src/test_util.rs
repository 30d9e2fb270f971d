use geostore::errors::{ErrorKind, GeoStoreError, GeoStoreResult};
use geostore::model::Attributes;
use geostore::GeoStore;
use geostore_spatial::Geometry;
use serde_json::{json, Value};
use std::backtrace::Backtrace;
use std::path::Path;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test fails. A failing attempt is retried
/// a few times before the test panics with the last error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> GeoStoreResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> GeoStoreResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> GeoStoreResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx)
                        .map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();
        let (error, backtrace) = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => (e, bt),
            Err(panic_err) => {
                let msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                (format!("Panic: {}", msg), Backtrace::capture().to_string())
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", error);
            eprintln!("Retrying in {}ms...\n", 100 * attempt);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(error);
        last_backtrace = Some(backtrace);
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    store: GeoStore,
}

impl TestContext {
    pub fn new(path: String, store: GeoStore) -> Self {
        Self { path, store }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn store(&self) -> GeoStore {
        self.store.clone()
    }

    /// Opens a second handle on the same root, as another process would.
    pub fn reopen(&self) -> GeoStoreResult<GeoStore> {
        let config = self.store.config();
        GeoStore::builder()
            .coordinate_precision(config.coordinate_precision())
            .pretty_print(config.pretty_print())
            .sync_on_write(config.sync_on_write())
            .document_io_handle(config.document_io())
            .open(&self.path)
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    env::temp_dir()
        .join(format!("geostore-{}", id))
        .to_string_lossy()
        .to_string()
}

#[cfg(not(feature = "memory"))]
pub fn create_test_context() -> GeoStoreResult<TestContext> {
    let path = random_path();
    if Path::new(&path).exists() {
        let _ = fs::remove_dir_all(&path);
    }
    fs::create_dir_all(&path)?;

    let store = GeoStore::builder().progress_interval(1).open(&path)?;
    Ok(TestContext::new(path, store))
}

#[cfg(feature = "memory")]
pub fn create_test_context() -> GeoStoreResult<TestContext> {
    use geostore::io::InMemoryIo;

    let path = random_path();
    let store = GeoStore::builder()
        .progress_interval(1)
        .document_io(InMemoryIo::new())
        .open(&path)?;
    Ok(TestContext::new(path, store))
}

#[cfg(not(feature = "memory"))]
pub fn cleanup(ctx: TestContext) -> GeoStoreResult<()> {
    let path = ctx.path().to_string();
    drop(ctx);

    let max_retries = 5;
    for retry in 0..max_retries {
        if !Path::new(&path).exists() {
            return Ok(());
        }
        match fs::remove_dir_all(&path) {
            Ok(_) => return Ok(()),
            Err(e) if retry < max_retries - 1 => {
                eprintln!("Warning: Failed to remove {} ({}), retrying", path, e);
                thread::sleep(Duration::from_millis(50 * (retry + 1) as u64));
            }
            Err(e) => {
                return Err(GeoStoreError::new(
                    &format!("Failed to remove test store {}: {}", path, e),
                    ErrorKind::IOError,
                ))
            }
        }
    }
    Ok(())
}

#[cfg(feature = "memory")]
pub fn cleanup(_ctx: TestContext) -> GeoStoreResult<()> {
    Ok(())
}

/// Builds an attribute map from a JSON object literal.
pub fn attributes(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        _ => Attributes::new(),
    }
}

/// An axis-aligned rectangle, exterior ring counter-clockwise.
pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry {
    Geometry::Polygon(vec![vec![
        vec![min_x, min_y],
        vec![max_x, min_y],
        vec![max_x, max_y],
        vec![min_x, max_y],
        vec![min_x, min_y],
    ]])
}

/// A rough outline of Brazil.
pub fn brazil() -> Geometry {
    Geometry::Polygon(vec![vec![
        vec![-73.9872354804, -33.7683777809],
        vec![-34.7299934555, -33.7683777809],
        vec![-34.7299934555, 5.24448639569],
        vec![-73.9872354804, 5.24448639569],
        vec![-73.9872354804, -33.7683777809],
    ]])
}

/// A feature collection of three points, in a fixed order.
pub fn three_cities() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "Lisbon", "country": "PRT", "population": 545923},
                "geometry": {"type": "Point", "coordinates": [-9.1393366, 38.7222524]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Porto", "country": "PRT", "population": 231800},
                "geometry": {"type": "Point", "coordinates": [-8.6291053, 41.1579438]}
            },
            {
                "type": "Feature",
                "properties": {"name": "Madrid", "country": "ESP", "population": 3223334},
                "geometry": {"type": "Point", "coordinates": [-3.7037902, 40.4167754]}
            }
        ]
    })
}
