//! Animation container constants.
//!
//! Offsets and sizes of the outer container and of the V1/V2 internal
//! layouts. All values are little-endian on disk.

/// Size of the magic field at offset 0
pub const MAGIC_SIZE: usize = 8;

/// Size of the primary header (magic + decompressed size + two offsets + four track counts)
pub const HEADER_SIZE: usize = 0x24;

/// Size of the legacy header (magic + 8 reserved bytes + size + two offsets + two track counts)
pub const LEGACY_HEADER_SIZE: usize = 0x24;

/// Number of track slots addressable by the primary header
pub const TRACK_SLOT_COUNT: usize = 4;

/// Number of track slots addressable by the legacy header
pub const LEGACY_TRACK_SLOT_COUNT: usize = 2;

/// Name table offset written by the encoder
pub const NAME_OFFSET: usize = 0x24;

/// Compressed data offset written by the encoder
pub const DATA_OFFSET: usize = 0x54;

/// Offset of the frame count written by the encoder (`DATA_OFFSET - 4`)
pub const FRAME_COUNT_OFFSET: usize = DATA_OFFSET - 4;

/// Name table offset of the variant carrying a node hint at 0x24
pub const HINTED_NAME_OFFSET: u32 = 0x28;

/// Compressed data offset of the variant carrying a node hint at 0x24
pub const HINTED_DATA_OFFSET: u32 = 0x58;

/// Offset of the "max node before track 4" hint
pub const HINT_OFFSET: usize = 0x24;

/// Longest animation name, in encoded bytes
pub const MAX_NAME_LENGTH: usize = 40;

/// Format tag that is written with the legacy header
pub const LEGACY_FORMAT: &str = "XMTM";

/// Format tag used when building a container from scratch
pub const DEFAULT_FORMAT: &str = "XMTN";

/// First word of a V2 internal block (offset of the name-hash pool)
pub const V2_HASH_OFFSET: u32 = 0x0C;

/// Size of the V2 data header (hash offset, track offset, table offset)
pub const V2_DATA_HEADER_SIZE: usize = 12;

/// Size of the V2 track area: four 2-byte descriptor pointers and four 8-byte descriptors
pub const V2_TRACK_AREA_SIZE: usize = 4 * 10;

/// Size of a V2 track descriptor
pub const V2_TRACK_DESCRIPTOR_SIZE: usize = 8;

/// Size of a V2 node table entry (flag, key-frame, key-data offsets and a zero word)
pub const V2_TABLE_ENTRY_SIZE: usize = 16;

/// Marker bit set in the high frame-count byte of main-track V2 nodes
pub const V2_MAIN_TRACK_MARKER: u8 = 0x20;

/// Frame counts at or above this value always use the split encoding
pub const V2_SPLIT_FRAME_COUNT: usize = 255;

/// Size of a V1 table header (four offsets and a zero word)
pub const V1_TABLE_HEADER_SIZE: usize = 20;

/// Size of a V1 node record
pub const V1_NODE_SIZE: usize = 48;

/// Normalisation divisor for 16-bit fixed point values
pub const NORMALIZED_SCALE: f32 = 32767.0;
