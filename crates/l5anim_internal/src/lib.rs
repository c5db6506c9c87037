//! This module is separated into its own crate to enable simple dynamic linking for `l5anim`, and should not be used directly.

/// `use l5anim::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export l5anim_types for convenience
pub use l5anim_types;

// Re-export commonly used types at crate root
pub use l5anim_types::file::{
	AnimFile, AnimHeader, CompressionMethod, L5FileError, LayoutVersion, SaveConfig, Track,
	TrackType, Value,
};
