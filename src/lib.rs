#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `cob-rs` reads and writes the resource containers of an old game engine:
//! `.COB` file archives and `.FNT` bitmap fonts.
//!
pub use cob_internal::*;
