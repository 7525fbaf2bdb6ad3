//! This module is separated into its own crate so `cob-rs` can be linked against a single facade, and should not be used directly.

/// `use cob_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export cob_types for convenience
pub use cob_types;

// Re-export commonly used types at crate root
pub use cob_types::file::{CobBuilder, CobEntry, CobError, CobIndex, FntDecoded, FntEncoder, FntError, FntHeader};
