//! Shared harness of the GeoStore integration tests.

pub mod test_util;
