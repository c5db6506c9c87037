//! File type support for `l5anim-rs` project.

mod error;

pub mod anim;
pub mod compression;
pub mod cursor;

// Re-export unified error type
pub use error::{FileType, L5FileError};

// Re-export main file types
pub use anim::{
	DataType, File as AnimFile, Frame, Header as AnimHeader, HeaderStyle, LayoutVersion, Node,
	SaveConfig, Track, TrackType, Value,
};
pub use compression::{Compressor, Level5Compressor, Method as CompressionMethod};
