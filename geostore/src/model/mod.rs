//! Typed documents of a store: the root index, collection entries,
//! attribute descriptors, records and import documents.
//!
//! Every type rejects unknown members when deserialized and exposes a
//! `validate()` for the rules serde cannot express.

mod collection;
mod descriptor;
mod document;
mod record;
mod store_index;

pub use collection::*;
pub use descriptor::*;
pub use document::*;
pub use record::*;
pub use store_index::*;
