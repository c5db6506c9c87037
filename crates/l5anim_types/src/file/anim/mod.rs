//! Level-5 compressed animation container support.
//!
//! Animation containers (`XMTN`, `XMTM`, ...) hold skeletal and texture
//! animation tracks. A container is a small uncompressed prefix followed by a
//! compressed internal block.
//!
//! # File Structure Overview
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ------------------------------------------------
//! 0x00    36    header (primary or legacy shape, see `header`)
//! 0x24    4     CRC-32 of the Shift-JIS animation name
//! 0x28    <=40  animation name, zero terminated when shorter than 40 bytes
//! 0x50    4     frame count (last frame index)
//! 0x54    ...   compressed internal block (see `compression`)
//! ```
//!
//! Offsets past the header are the ones this crate writes; readers follow
//! the name and data offsets stored in the header. One historical variant
//! stores its name at 0x28 and its data at 0x58, keeping a "max node before
//! track 4" hint at 0x24 that steers the V2 name-pool slicing.
//!
//! ## Internal block
//!
//! The decompressed block uses one of two layouts. A first word of `0x0C`
//! marks the hash-indexed V2 layout (see `v2`); anything else is the
//! table-indexed V1 layout (see `v1`).
//!
//! ## Tracks
//!
//! Up to four track slots exist. The header stores the node count of each
//! slot, and every node carries frames whose values all share the track's
//! [`TrackType`].
//!
//! # Examples
//!
//! ```
//! use l5anim_types::file::anim::{File, LayoutVersion, Node, Track, TrackType, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut anim = File::new(LayoutVersion::V1);
//! anim.name = "wave".to_string();
//! anim.frame_count = 4;
//!
//! let mut node = Node::new(0x0BAD_F00D, true);
//! node.add_frame(0, Value::BoneRotation { x: 0.0, y: 0.0, z: 0.0, w: 1.0 });
//! node.add_frame(4, Value::BoneRotation { x: 0.0, y: 0.7071, z: 0.0, w: 0.7071 });
//!
//! let mut track = Track::new(TrackType::BoneRotation, 0);
//! track.add_node(node)?;
//! anim.add_track(track)?;
//!
//! let decoded = File::from_bytes(&anim.to_bytes()?)?;
//! assert_eq!(decoded, anim);
//! # Ok(())
//! # }
//! ```

mod config;
mod file;
mod frame;
mod header;
mod node;
mod track;
mod track_type;
mod v1;
mod v2;
mod value;
mod version;

/// Constants of the container and internal layouts
pub mod constants;

pub use self::config::{HeaderStyle, SaveConfig};
pub use self::file::{File, name_hash};
pub use self::frame::Frame;
pub use self::header::{Header, HeaderShape, magic_from_format};
pub use self::node::Node;
pub use self::track::Track;
pub use self::track_type::{DataType, TrackInfo, TrackType};
pub use self::v2::{pack_frame_count, unpack_frame_count};
pub use self::value::{MAX_COMPONENTS, Value};
pub use self::version::LayoutVersion;

use crate::file::L5FileError;

/// Converts a block offset or length to its 32-bit on-disk form
fn checked_u32(field: &'static str, value: usize) -> Result<u32, L5FileError> {
	u32::try_from(value).map_err(|_| L5FileError::OutOfRange {
		field,
		value: value as u64,
		max: u64::from(u32::MAX),
	})
}

/// Converts a signed on-disk length to `usize`
fn checked_usize(field: &'static str, value: i32) -> Result<usize, L5FileError> {
	usize::try_from(value).map_err(|_| {
		L5FileError::malformed(crate::file::FileType::Animation, format!("negative {field}: {value}"))
	})
}
