//! Shared helpers: layout constants, fingerprints, identifiers, dotted
//! paths and per-root locks.

mod constants;
mod fingerprint;
mod id;
mod lock;
mod path;

pub use constants::*;
pub use fingerprint::*;
pub use id::*;
pub use lock::*;
pub use path::*;
