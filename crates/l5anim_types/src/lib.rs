//! This crate provides core data types and file format support for the `l5anim-rs` project.
//!
//! # File Formats
//!
//! - **Animation containers** (`XMTN`, `XMTM`, ...): keyframed bone and texture
//!   tracks in a V1 (table-indexed) or V2 (hash-indexed) internal layout
//! - **Level-5 compressed blocks**: the LZ10, RLE and zlib wrappers used for the
//!   internal animation block
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use l5anim_types::prelude::*;
//!
//! # fn main() -> Result<(), L5FileError> {
//! let anim = AnimFile::open("walk.mtn2")?;
//! for track in anim.tracks() {
//!     println!("{track}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use l5anim_types::file::anim::{File, SaveConfig};
//!
//! # fn main() -> Result<(), l5anim_types::file::L5FileError> {
//! let anim = File::open("walk.mtn2")?;
//! anim.save_with_config("walk_raw.mtn2", &SaveConfig::uncompressed())?;
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use l5anim_types::prelude::*;` to import commonly used items.
pub mod prelude;
