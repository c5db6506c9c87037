//! V1 internal layout: table-indexed nodes.
//!
//! The block starts with one 20-byte table header per node, in slot order.
//! Each table header points at a 48-byte node record followed by three
//! tables:
//!
//! ```text
//! Table header (20 bytes)
//! +0x00  4  node record offset
//! +0x04  4  key-frame index table offset   (FrameCount + 1 u16 row indices)
//! +0x08  4  distinct key-frame table offset (one u16 key per stored frame)
//! +0x0C  4  value data offset
//! +0x10  4  reserved (0)
//!
//! Node record (48 bytes)
//! +0x00  4  name hash
//! +0x04  1  node type (track type tag)
//! +0x05  1  data type tag
//! +0x06  1  main-track flag
//! +0x07  1  reserved
//! +0x08  4  frame start
//! +0x0C  4  frame end
//! +0x10  4  stored frame count
//! +0x14  4  FrameCount + 1
//! +0x18  4  component width in bytes
//! +0x1C  4  components per value
//! +0x20  4  bytes per value
//! +0x24  4  index table length in bytes
//! +0x28  4  key table length in bytes
//! +0x2C  4  value table length in bytes
//! ```

use std::collections::HashSet;

use super::{
	checked_u32, checked_usize,
	constants::{V1_NODE_SIZE, V1_TABLE_HEADER_SIZE},
	frame::Frame,
	header::Header,
	node::Node,
	track::Track,
	track_type::{DataType, TrackType},
	value::Value,
};
use crate::file::{
	FileType, L5FileError,
	cursor::{ByteReader, ByteWriter},
};

/// Offsets of one node's tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableHeader {
	node_offset: u32,
	key_frame_offset: u32,
	different_key_frame_offset: u32,
	data_offset: u32,
}

impl TableHeader {
	fn read(reader: &mut ByteReader<'_>) -> Result<Self, L5FileError> {
		let header = Self {
			node_offset: reader.read_u32()?,
			key_frame_offset: reader.read_u32()?,
			different_key_frame_offset: reader.read_u32()?,
			data_offset: reader.read_u32()?,
		};
		reader.read_u32()?;
		Ok(header)
	}

	fn write(&self, writer: &mut ByteWriter) {
		writer.write_u32(self.node_offset);
		writer.write_u32(self.key_frame_offset);
		writer.write_u32(self.different_key_frame_offset);
		writer.write_u32(self.data_offset);
		writer.write_u32(0);
	}
}

/// Fixed 48-byte node record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct NodeRecord {
	name_hash: u32,
	node_type: u8,
	data_type: u8,
	is_main_track: u8,
	reserved: u8,
	frame_start: i32,
	frame_end: i32,
	data_count: i32,
	different_frame_count: i32,
	data_byte_size: i32,
	data_vector_size: i32,
	data_vector_length: i32,
	different_frame_length: i32,
	frame_length: i32,
	data_length: i32,
}

impl NodeRecord {
	fn for_node(node: &Node, kind: TrackType, frame_count: u16) -> Result<Self, L5FileError> {
		let frames = i32::try_from(node.frames.len()).map_err(|_| L5FileError::OutOfRange {
			field: "node frame count",
			value: node.frames.len() as u64,
			max: i32::MAX as u64,
		})?;
		let frame_count = i32::from(frame_count);
		let width = kind.element_size() as i32;
		let components = kind.component_count() as i32;

		Ok(Self {
			name_hash: node.name_hash,
			node_type: kind.tag(),
			data_type: kind.data_type() as u8,
			is_main_track: u8::from(node.is_main_track),
			reserved: 0,
			frame_start: 0,
			frame_end: frame_count,
			data_count: frames,
			different_frame_count: frame_count + 1,
			data_byte_size: width,
			data_vector_size: components,
			data_vector_length: components * width,
			different_frame_length: (frame_count + 1) * 2,
			frame_length: frames * 2,
			data_length: frames * components * width,
		})
	}

	fn read(reader: &mut ByteReader<'_>) -> Result<Self, L5FileError> {
		Ok(Self {
			name_hash: reader.read_u32()?,
			node_type: reader.read_u8()?,
			data_type: reader.read_u8()?,
			is_main_track: reader.read_u8()?,
			reserved: reader.read_u8()?,
			frame_start: reader.read_i32()?,
			frame_end: reader.read_i32()?,
			data_count: reader.read_i32()?,
			different_frame_count: reader.read_i32()?,
			data_byte_size: reader.read_i32()?,
			data_vector_size: reader.read_i32()?,
			data_vector_length: reader.read_i32()?,
			different_frame_length: reader.read_i32()?,
			frame_length: reader.read_i32()?,
			data_length: reader.read_i32()?,
		})
	}

	fn write(&self, writer: &mut ByteWriter) {
		let start = writer.position();
		writer.write_u32(self.name_hash);
		writer.write_u8(self.node_type);
		writer.write_u8(self.data_type);
		writer.write_u8(self.is_main_track);
		writer.write_u8(self.reserved);
		for field in [
			self.frame_start,
			self.frame_end,
			self.data_count,
			self.different_frame_count,
			self.data_byte_size,
			self.data_vector_size,
			self.data_vector_length,
			self.different_frame_length,
			self.frame_length,
			self.data_length,
		] {
			writer.write_i32(field);
		}
		debug_assert_eq!(writer.position() - start, V1_NODE_SIZE);
	}
}

/// Decodes a V1 block into tracks, in slot order
pub(super) fn decode(block: &[u8], header: &Header) -> Result<Vec<Track>, L5FileError> {
	let mut reader = ByteReader::new(block, FileType::Animation);
	let mut tracks: Vec<Track> = Vec::new();
	let mut table_offset = 0usize;

	for slot in 0..header.track_counts().len() {
		let count = header.track_count(slot);
		for _ in 0..count {
			reader.seek(table_offset);
			let table = TableHeader::read(&mut reader)?;
			table_offset = reader.position();

			reader.seek(table.node_offset as usize);
			let record = NodeRecord::read(&mut reader)?;

			if record.node_type != 0 && !tracks.iter().any(|track| usize::from(track.index) == slot) {
				let kind = TrackType::try_from(record.node_type)?;
				log::debug!("Registering {kind} track in slot {slot}");
				tracks.push(Track::new(kind, slot as u8));
			}

			let Some(track) = tracks.iter_mut().find(|track| usize::from(track.index) == slot)
			else {
				return Err(L5FileError::malformed(
					FileType::Animation,
					format!("node {:08X} in slot {slot} has no track type", record.name_hash),
				));
			};

			let node = read_node(&mut reader, &table, &record, track.kind)?;
			log::trace!("V1 slot {slot}: {node}");
			track.nodes.push(node);
		}
	}

	Ok(tracks)
}

fn read_node(
	reader: &mut ByteReader<'_>,
	table: &TableHeader,
	record: &NodeRecord,
	track_kind: TrackType,
) -> Result<Node, L5FileError> {
	let kind = TrackType::from_tag(record.node_type)?.unwrap_or(track_kind);
	if kind != track_kind {
		return Err(L5FileError::ValueKindMismatch {
			expected: track_kind,
			actual: kind,
		});
	}
	let data_type = DataType::try_from(record.data_type)?;

	reader.seek(table.key_frame_offset as usize);
	let index_count = checked_usize("index table length", record.different_frame_length)? / 2;
	let mut seen = HashSet::new();
	let rows: Vec<u16> =
		reader.read_u16_vec(index_count)?.into_iter().filter(|row| seen.insert(*row)).collect();

	reader.seek(table.different_key_frame_offset as usize);
	let key_count = checked_usize("key table length", record.frame_length)? / 2;
	let keys = reader.read_u16_vec(key_count)?;

	if !keys.is_empty() && rows.len() != keys.len() {
		log::warn!(
			"Node {:08X}: index table references {} rows but {} keys are stored",
			record.name_hash,
			rows.len(),
			keys.len()
		);
	}

	let components = checked_usize("components per value", record.data_vector_size)?;
	let width = checked_usize("component width", record.data_byte_size)?;
	let stride = components * width;

	let mut frames = Vec::with_capacity(keys.len());
	for (row, &key) in keys.iter().enumerate() {
		reader.seek(table.data_offset as usize + row * stride);
		let value = Value::read(reader, kind, data_type, components)?;
		frames.push(Frame::new(key, value));
	}

	Ok(Node {
		name_hash: record.name_hash,
		is_main_track: record.is_main_track == 1,
		frames,
	})
}

/// Encodes prepared tracks (sorted by slot, frames validated and extended) into a V1 block
pub(super) fn encode(tracks: &[Track], frame_count: u16) -> Result<Vec<u8>, L5FileError> {
	let node_total: usize = tracks.iter().map(Track::len).sum();
	if node_total == 0 {
		return Err(L5FileError::malformed(
			FileType::Animation,
			"V1 layout needs at least one node",
		));
	}

	let mut writer = ByteWriter::new();
	let mut header_position = 0usize;
	let mut node_offset = node_total * V1_TABLE_HEADER_SIZE;

	for track in tracks {
		let kind = track.kind;
		let data_type = kind.data_type();

		for node in &track.nodes {
			writer.seek(node_offset);
			NodeRecord::for_node(node, kind, frame_count)?.write(&mut writer);

			let key_frame_offset = writer.position();
			let keys: Vec<u16> = node.frames.iter().map(|frame| frame.key).collect();
			for row in fill_index_table(&keys, usize::from(frame_count) + 1) {
				writer.write_u16(row);
			}
			writer.align(4);

			let different_key_frame_offset = writer.position();
			for key in &keys {
				writer.write_u16(*key);
			}
			writer.align(4);

			let data_offset = writer.position();
			for frame in &node.frames {
				frame.value.write(&mut writer, data_type);
			}
			if kind.element_size() != 4 {
				writer.align(4);
			}

			let table = TableHeader {
				node_offset: checked_u32("node record offset", node_offset)?,
				key_frame_offset: checked_u32("key frame offset", key_frame_offset)?,
				different_key_frame_offset: checked_u32(
					"distinct key frame offset",
					different_key_frame_offset,
				)?,
				data_offset: checked_u32("value data offset", data_offset)?,
			};
			node_offset = writer.position();

			writer.seek(header_position);
			table.write(&mut writer);
			header_position = writer.position();
		}
	}

	Ok(writer.into_inner())
}

/// Expands stored keys into one row index per output frame.
///
/// Frames from a key up to the next key map to that key's row; the last key
/// fills up to `size`. Frames before the first key map to row 0.
fn fill_index_table(keys: &[u16], size: usize) -> Vec<u16> {
	let mut rows = vec![0u16; size];

	for (row, &key) in keys.iter().enumerate() {
		let end = keys.get(row + 1).map_or(size, |&next| usize::from(next)).min(size);
		let start = usize::from(key).min(end);
		rows[start..end].fill(row as u16);
	}

	rows
}
