//! Store integration test module.
//!
//! These tests drive a store end to end through its public operations,
//! against a temporary directory unless the `memory` feature is enabled.

mod collection_test;
mod document_import_test;
mod query_test;
mod record_test;
mod store_test;
