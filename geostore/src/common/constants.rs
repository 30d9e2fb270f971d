// layout constants
pub const STORE_INDEX_FILE: &str = ".store_index";
pub const RECORDS_DIR: &str = "records";
pub const GEOMETRIES_DIR: &str = "geometries";
pub const DOCUMENT_EXTENSION: &str = "doc";

// record attribute constants
pub const FID: &str = "fid";
pub const PROP_HASH: &str = "prop_hash";
pub const GEOM_HASH: &str = "geom_hash";
pub const MANDATORY_ATTRIBUTES: [&str; 3] = [FID, PROP_HASH, GEOM_HASH];

// document type constants
pub const FEATURE: &str = "Feature";
pub const FEATURE_COLLECTION: &str = "FeatureCollection";

// path constants
pub const FIELD_SEPARATOR: char = '.';

// config constants
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

// Compile-time assertion for mandatory attribute count
const _: () = {
    const MANDATORY_COUNT: usize = 3;
    const ACTUAL_COUNT: usize = MANDATORY_ATTRIBUTES.len();
    const _: [(); 1] = [(); (ACTUAL_COUNT == MANDATORY_COUNT) as usize];
};
