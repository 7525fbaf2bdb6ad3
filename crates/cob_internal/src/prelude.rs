//! Prelude module for `cob_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use cob_internal::prelude::*;
//!
//! let mut builder = CobBuilder::new();
//! builder.add("A.TXT", b"abc".to_vec());
//! let index = CobIndex::from_bytes(&builder.to_bytes().unwrap()).unwrap();
//! assert_eq!(index.len(), 1);
//! ```

// Re-export everything from cob_types::prelude
#[doc(inline)]
pub use cob_types::prelude::*;

// Re-export the entire cob_types module for advanced usage
#[doc(inline)]
pub use cob_types;
