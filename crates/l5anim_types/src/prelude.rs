//! Prelude module for `l5anim_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use l5anim_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut anim = AnimFile::new(LayoutVersion::V2);
//! anim.add_track(Track::new(TrackType::BoneRotation, 0)).unwrap();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Animation types
	AnimFile,
	AnimHeader,
	// Compression types
	CompressionMethod,
	Compressor,
	DataType,
	FileType,
	Frame,
	HeaderStyle,
	L5FileError,
	LayoutVersion,
	Level5Compressor,
	Node,
	SaveConfig,
	Track,
	TrackType,
	Value,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
