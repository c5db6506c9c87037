#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `l5anim-rs` decodes and re-encodes Level-5 compressed animation containers.
//!
//! ```no_run
//! use l5anim_rs::prelude::*;
//!
//! # fn main() -> Result<(), L5FileError> {
//! let anim = AnimFile::open("walk.mtn2")?;
//! println!("{anim}");
//! # Ok(())
//! # }
//! ```
pub use l5anim_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use l5anim_dylib;
