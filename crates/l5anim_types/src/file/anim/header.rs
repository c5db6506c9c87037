//! Container header resolution.
//!
//! Two header shapes share the first 36 bytes of a container:
//!
//! ```text
//! Primary                              Legacy
//! 0x00  8  magic                       0x00  8  magic
//! 0x08  4  decompressed size (x2)      0x08  8  reserved
//! 0x0C  4  name table offset           0x10  4  decompressed size (x2)
//! 0x10  4  compressed data offset      0x14  4  name table offset
//! 0x14 16  track counts 1..=4          0x18  4  compressed data offset
//!                                      0x1C  8  track counts 1..=2
//! ```
//!
//! The primary shape is tried first; a zero decompressed size means the
//! legacy shape is present. Counts of slots a shape cannot describe are
//! absent (`None`), which is distinct from a slot holding zero nodes.

use std::{fmt::Display, io::Read};

use super::constants::{
	HEADER_SIZE, HINT_OFFSET, HINTED_DATA_OFFSET, HINTED_NAME_OFFSET, LEGACY_TRACK_SLOT_COUNT,
	MAGIC_SIZE, TRACK_SLOT_COUNT,
};
use crate::file::{FileType, L5FileError, cursor::ByteReader};

/// Which of the two header shapes a container uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderShape {
	/// Four track counts, no reserved block
	Primary,
	/// Eight reserved bytes and two track counts
	Legacy,
}

/// Normalised container header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	magic: [u8; MAGIC_SIZE],
	shape: HeaderShape,
	decompressed_size: u32,
	name_offset: u32,
	data_offset: u32,
	track_counts: [Option<u32>; TRACK_SLOT_COUNT],
	max_node_hint: Option<u32>,
}

impl Header {
	/// Size of either header shape in bytes
	pub const SIZE: usize = HEADER_SIZE;

	pub(super) fn new(
		format: &str,
		shape: HeaderShape,
		decompressed_size: u32,
		name_offset: u32,
		data_offset: u32,
		track_counts: [Option<u32>; TRACK_SLOT_COUNT],
	) -> Self {
		Self {
			magic: magic_from_format(format),
			shape,
			decompressed_size,
			name_offset,
			data_offset,
			track_counts,
			max_node_hint: None,
		}
	}

	/// Raw magic field
	pub fn magic(&self) -> [u8; MAGIC_SIZE] {
		self.magic
	}

	/// Format tag: the magic with trailing zero bytes stripped
	pub fn format(&self) -> String {
		let end = self.magic.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
		String::from_utf8_lossy(&self.magic[..end]).into_owned()
	}

	/// Shape the header was read from or will be written as
	pub fn shape(&self) -> HeaderShape {
		self.shape
	}

	/// Stored decompressed size (twice the internal block length)
	pub fn decompressed_size(&self) -> u32 {
		self.decompressed_size
	}

	/// Offset of the name table (hash followed by the name)
	pub fn name_offset(&self) -> u32 {
		self.name_offset
	}

	/// Offset of the compressed internal block
	pub fn data_offset(&self) -> u32 {
		self.data_offset
	}

	/// Node count per track slot; `None` when the shape has no field for the slot
	pub fn track_counts(&self) -> [Option<u32>; TRACK_SLOT_COUNT] {
		self.track_counts
	}

	/// Node count of `slot`, absent slots counting as zero
	pub fn track_count(&self, slot: usize) -> usize {
		self.track_counts.get(slot).copied().flatten().map_or(0, |count| count as usize)
	}

	/// Number of slots the header describes
	pub fn present_slots(&self) -> usize {
		self.track_counts.iter().filter(|count| count.is_some()).count()
	}

	/// "Max node before track 4" hint of the 0x28/0x58 variant
	pub fn max_node_hint(&self) -> Option<u32> {
		self.max_node_hint
	}

	/// Resolves the header at the start of a container.
	///
	/// Only the header shape, and the hint word at 0x24 when the offsets
	/// select the hinted variant, are read.
	pub fn from_bytes(data: &[u8]) -> Result<Self, L5FileError> {
		let mut reader = ByteReader::new(data, FileType::Animation);
		let magic = reader.read_array::<MAGIC_SIZE>()?;
		let decompressed_size = reader.read_u32()?;
		let name_offset = reader.read_u32()?;
		let data_offset = reader.read_u32()?;

		let mut header = if decompressed_size != 0 {
			let mut track_counts = [None; TRACK_SLOT_COUNT];
			for count in &mut track_counts {
				*count = read_count(&mut reader)?;
			}

			Self {
				magic,
				shape: HeaderShape::Primary,
				decompressed_size,
				name_offset,
				data_offset,
				track_counts,
				max_node_hint: None,
			}
		} else {
			log::debug!("Decompressed size is zero, reading legacy header");
			reader.seek(MAGIC_SIZE + 8);
			let decompressed_size = reader.read_u32()?;
			let name_offset = reader.read_u32()?;
			let data_offset = reader.read_u32()?;

			let mut track_counts = [None; TRACK_SLOT_COUNT];
			for count in track_counts.iter_mut().take(LEGACY_TRACK_SLOT_COUNT) {
				*count = read_count(&mut reader)?;
			}

			Self {
				magic,
				shape: HeaderShape::Legacy,
				decompressed_size,
				name_offset,
				data_offset,
				track_counts,
				max_node_hint: None,
			}
		};

		if header.name_offset == HINTED_NAME_OFFSET && header.data_offset == HINTED_DATA_OFFSET {
			reader.seek(HINT_OFFSET);
			let hint = reader.read_i32()?;
			if hint > 0 {
				log::debug!("Container carries max-node-before-track-4 hint {hint}");
				header.max_node_hint = Some(hint as u32);
			}
		}

		Ok(header)
	}

	/// Reads the header bytes from any reader and resolves them.
	///
	/// The hint word of the 0x28/0x58 variant lies past the header, so it is
	/// read as well when present.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, L5FileError> {
		let mut buffer = [0u8; HEADER_SIZE + 4];
		let mut filled = 0;
		while filled < buffer.len() {
			let read = reader.read(&mut buffer[filled..])?;
			if read == 0 {
				break;
			}
			filled += read;
		}
		Self::from_bytes(&buffer[..filled])
	}

	/// Serializes the header in its shape. Absent counts are written as -1.
	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let mut bytes = [0u8; HEADER_SIZE];
		bytes[0..8].copy_from_slice(&self.magic);

		let (fields_start, slot_count) = match self.shape {
			HeaderShape::Primary => (0x08, TRACK_SLOT_COUNT),
			HeaderShape::Legacy => (0x10, LEGACY_TRACK_SLOT_COUNT),
		};

		let mut offset = fields_start;
		for word in [self.decompressed_size, self.name_offset, self.data_offset] {
			bytes[offset..offset + 4].copy_from_slice(&word.to_le_bytes());
			offset += 4;
		}

		for count in self.track_counts.iter().take(slot_count) {
			let raw = count.map_or(-1i32, |count| count as i32);
			bytes[offset..offset + 4].copy_from_slice(&raw.to_le_bytes());
			offset += 4;
		}

		bytes
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let counts: Vec<String> = self
			.track_counts
			.iter()
			.map(|count| count.map_or_else(|| "-".to_string(), |count| count.to_string()))
			.collect();

		write!(
			f,
			"Animation Header:\n\
			- Format: {}\n\
			- Shape: {:?}\n\
			- Decompressed Size: {} bytes\n\
			- Name Offset: 0x{:X}\n\
			- Data Offset: 0x{:X}\n\
			- Track Counts: [{}]",
			self.format(),
			self.shape,
			self.decompressed_size,
			self.name_offset,
			self.data_offset,
			counts.join(", "),
		)?;

		if let Some(hint) = self.max_node_hint {
			write!(f, "\n- Max Node Before Track 4: {hint}")?;
		}

		Ok(())
	}
}

/// Packs a format tag into the 8-byte magic field, zero padded
pub fn magic_from_format(format: &str) -> [u8; MAGIC_SIZE] {
	let mut magic = [0u8; MAGIC_SIZE];
	for (slot, byte) in magic.iter_mut().zip(format.bytes()) {
		*slot = byte;
	}
	magic
}

/// Reads a signed track count; negative values mark an absent slot
fn read_count(reader: &mut ByteReader<'_>) -> Result<Option<u32>, L5FileError> {
	let raw = reader.read_i32()?;
	Ok((raw >= 0).then_some(raw as u32))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn primary_bytes(counts: [i32; 4]) -> Vec<u8> {
		let mut data = b"XMTN\0\0\0\0".to_vec();
		for word in [0x200i32, 0x24, 0x54] {
			data.extend_from_slice(&word.to_le_bytes());
		}
		for count in counts {
			data.extend_from_slice(&count.to_le_bytes());
		}
		data
	}

	#[test]
	fn test_primary_header() {
		let header = Header::from_bytes(&primary_bytes([3, 0, 2, 1])).unwrap();
		assert_eq!(header.shape(), HeaderShape::Primary);
		assert_eq!(header.format(), "XMTN");
		assert_eq!(header.decompressed_size(), 0x200);
		assert_eq!(header.name_offset(), 0x24);
		assert_eq!(header.data_offset(), 0x54);
		assert_eq!(header.track_counts(), [Some(3), Some(0), Some(2), Some(1)]);
		assert_eq!(header.present_slots(), 4);
		assert_eq!(header.max_node_hint(), None);
	}

	#[test]
	fn test_legacy_fallback_marks_missing_slots_absent() {
		let mut data = b"XMTM\0\0\0\0".to_vec();
		data.extend_from_slice(&[0u8; 8]);
		for word in [0x180i32, 0x24, 0x54, 4, 0] {
			data.extend_from_slice(&word.to_le_bytes());
		}

		let header = Header::from_bytes(&data).unwrap();
		assert_eq!(header.shape(), HeaderShape::Legacy);
		assert_eq!(header.decompressed_size(), 0x180);
		assert_eq!(header.track_counts(), [Some(4), Some(0), None, None]);
		assert_eq!(header.present_slots(), 2);
		assert_eq!(header.track_count(3), 0);

		assert_eq!(header.to_bytes().as_slice(), data.as_slice());
	}

	#[test]
	fn test_hint_variant() {
		let mut data = b"XMTN\0\0\0\0".to_vec();
		for word in [0x200i32, 0x28, 0x58, 2, 0, 0, 1, 5] {
			data.extend_from_slice(&word.to_le_bytes());
		}

		let header = Header::from_bytes(&data).unwrap();
		assert_eq!(header.max_node_hint(), Some(5));

		// a zero hint is treated as absent
		data[0x24..0x28].copy_from_slice(&0i32.to_le_bytes());
		assert_eq!(Header::from_bytes(&data).unwrap().max_node_hint(), None);
	}

	#[test]
	fn test_to_bytes_round_trip() {
		let data = primary_bytes([1, 2, -1, -1]);
		let header = Header::from_bytes(&data).unwrap();
		assert_eq!(header.track_counts(), [Some(1), Some(2), None, None]);
		assert_eq!(header.to_bytes().as_slice(), data.as_slice());
	}

	#[test]
	fn test_from_reader() {
		let data = primary_bytes([1, 0, 0, 0]);
		let header = Header::from_reader(&mut std::io::Cursor::new(data)).unwrap();
		assert_eq!(header.track_count(0), 1);
	}

	#[test]
	fn test_truncated_header() {
		assert!(matches!(
			Header::from_bytes(&primary_bytes([1, 0, 0, 0])[..20]),
			Err(L5FileError::InsufficientData { .. })
		));
	}

	#[test]
	fn test_magic_padding() {
		assert_eq!(magic_from_format("XMTN"), *b"XMTN\0\0\0\0");
		assert_eq!(magic_from_format("TOOLONGFORMAT"), *b"TOOLONGF");
	}
}
