//! V2 internal layout: hash-indexed nodes with packed frame counts.
//!
//! ```text
//! 0x00        12        data header: hash pool offset (0x0C), track offset, table offset
//! 0x0C        D * 4     name-hash pool (distinct hashes in first-use order)
//! track       8         four u16 pointers to the track descriptors
//! track + 8   4 * 8     track descriptors
//! table       N * 16    node table entries
//! ...                   node data
//! ```
//!
//! Track descriptor (8 bytes): type tag, data type tag, reserved, components
//! per value, start frame (i16), end frame (i16). An all-zero descriptor
//! marks an unused slot.
//!
//! Node table entry (16 bytes): offset of the node data, offset of its key
//! table, offset of its values, reserved zero. Node data begins with the
//! u16 pool index of the node's name and a packed frame count:
//!
//! ```text
//! low byte   count & 0xFF
//! high byte  0 for plain nodes with fewer than 255 frames,
//!            0x20 + (count >> 8) otherwise (main-track marker in bit 5)
//! ```
//!
//! The u16 keys follow, padded to 4 bytes, then the values.

use std::borrow::Cow;

use super::{
	checked_u32,
	constants::{
		TRACK_SLOT_COUNT, V2_DATA_HEADER_SIZE, V2_HASH_OFFSET, V2_MAIN_TRACK_MARKER,
		V2_SPLIT_FRAME_COUNT, V2_TABLE_ENTRY_SIZE, V2_TRACK_AREA_SIZE, V2_TRACK_DESCRIPTOR_SIZE,
	},
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

/// Per-slot track descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TrackDescriptor {
	kind: u8,
	data_type: u8,
	reserved: u8,
	data_count: u8,
	start: i16,
	end: i16,
}

impl TrackDescriptor {
	fn for_track(track: &Track, frame_count: u16) -> Self {
		Self {
			kind: track.kind.tag(),
			data_type: track.kind.data_type() as u8,
			reserved: 0,
			data_count: track.kind.component_count() as u8,
			start: 0,
			end: frame_count as i16,
		}
	}

	fn read(reader: &mut ByteReader<'_>) -> Result<Self, L5FileError> {
		Ok(Self {
			kind: reader.read_u8()?,
			data_type: reader.read_u8()?,
			reserved: reader.read_u8()?,
			data_count: reader.read_u8()?,
			start: reader.read_i16()?,
			end: reader.read_i16()?,
		})
	}

	fn write(&self, writer: &mut ByteWriter) {
		writer.write_u8(self.kind);
		writer.write_u8(self.data_type);
		writer.write_u8(self.reserved);
		writer.write_u8(self.data_count);
		writer.write_i16(self.start);
		writer.write_i16(self.end);
	}
}

/// Packs a node's frame count into its low/high byte pair.
///
/// Counts of 255 and above always carry the main-track marker, so such
/// nodes read back as main-track nodes.
pub fn pack_frame_count(count: usize, is_main_track: bool) -> Result<(u8, u8), L5FileError> {
	if !is_main_track && count < V2_SPLIT_FRAME_COUNT {
		return Ok((count as u8, 0));
	}

	let max = ((0xFF - usize::from(V2_MAIN_TRACK_MARKER)) << 8) | 0xFF;
	if count > max {
		return Err(L5FileError::OutOfRange {
			field: "V2 node frame count",
			value: count as u64,
			max: max as u64,
		});
	}

	Ok(((count & 0xFF) as u8, V2_MAIN_TRACK_MARKER + (count >> 8) as u8))
}

/// Unpacks a low/high byte pair into (frame count, main-track flag)
pub fn unpack_frame_count(low: u8, high: u8) -> Result<(usize, bool), L5FileError> {
	if high == 0 {
		return Ok((usize::from(low), false));
	}

	let Some(high) = high.checked_sub(V2_MAIN_TRACK_MARKER) else {
		return Err(L5FileError::malformed(
			FileType::Animation,
			format!("frame count high byte 0x{high:02X} lacks the main-track marker"),
		));
	};
	Ok(((usize::from(high) << 8) | usize::from(low), true))
}

/// Where a slot's node names are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolView {
	/// The whole name-hash pool
	Shared,
	/// `len` hashes starting `start` entries into the pool
	Window {
		start: usize,
		len: usize,
	},
}

/// Derives the name lookup of every slot from the header counts, the kinds
/// of the described slots and the optional max-node hint.
///
/// These are empirical rules of the shared pool: a populated slot followed by
/// an empty slot (other than the transition into slot 3) pushes every later
/// slot onto a private window unless the hint is present; with the hint an
/// opaque slot gets a private window `hint` entries further on.
fn pool_views(
	track_counts: [Option<u32>; TRACK_SLOT_COUNT],
	kinds: &[Option<TrackType>],
	hint: Option<usize>,
) -> [PoolView; TRACK_SLOT_COUNT] {
	let count = |slot: usize| track_counts[slot].map_or(0, |count| count as usize);
	let present = kinds.len().min(TRACK_SLOT_COUNT);
	let mut views: [Option<PoolView>; TRACK_SLOT_COUNT] = [Some(PoolView::Shared); TRACK_SLOT_COUNT];
	let mut position = 0usize;

	for slot in 0..present {
		if let Some(kind) = kinds[slot] {
			if slot + 1 < TRACK_SLOT_COUNT - 1 && track_counts[slot + 1] == Some(0) {
				if hint.is_none() {
					position += count(slot);
					for view in views.iter_mut().take(present).skip(slot + 1) {
						*view = None;
					}
				}
			} else if kind == TrackType::Opaque
				&& let Some(hint) = hint
			{
				views[slot] = None;
				position += hint;
			}
		}

		if views[slot].is_none() {
			views[slot] = Some(PoolView::Window {
				start: position,
				len: count(slot),
			});
		}
	}

	views.map(|view| view.unwrap_or(PoolView::Shared))
}

/// Decodes a V2 block into tracks, in slot order
pub(super) fn decode(block: &[u8], header: &Header) -> Result<Vec<Track>, L5FileError> {
	let mut reader = ByteReader::new(block, FileType::Animation);
	let hash_offset = reader.read_u32()? as usize;
	let track_offset = reader.read_u32()? as usize;
	let data_offset = reader.read_u32()? as usize;

	let Some(pool_size) = track_offset.checked_sub(hash_offset) else {
		return Err(L5FileError::malformed(
			FileType::Animation,
			format!("track offset 0x{track_offset:X} precedes hash offset 0x{hash_offset:X}"),
		));
	};
	reader.seek(hash_offset);
	let pool = reader.read_u32_vec(pool_size / 4)?;

	let mut descriptors = Vec::with_capacity(header.present_slots());
	let mut kinds = Vec::with_capacity(header.present_slots());
	let mut tracks: Vec<Track> = Vec::new();

	for slot in 0..header.present_slots() {
		let pointer = reader.peek_u16_at(track_offset + 2 * slot)?;
		reader.seek(usize::from(pointer));
		let descriptor = TrackDescriptor::read(&mut reader)?;

		let kind = TrackType::from_tag(descriptor.kind)?;
		if let Some(kind) = kind {
			log::debug!("Registering {kind} track in slot {slot}");
			tracks.push(Track::new(kind, slot as u8));
		}
		kinds.push(kind);
		descriptors.push(descriptor);
	}

	let hint = header.max_node_hint().map(|hint| hint as usize);
	let views = pool_views(header.track_counts(), &kinds, hint);

	let mut entry_index = 0usize;
	for (slot, view) in views.iter().enumerate() {
		let count = header.track_count(slot);
		if count > 0 {
			let (Some(descriptor), Some(track)) = (
				descriptors.get(slot),
				tracks.iter_mut().find(|track| usize::from(track.index) == slot),
			) else {
				return Err(L5FileError::malformed(
					FileType::Animation,
					format!("slot {slot} holds {count} nodes but has no track descriptor"),
				));
			};

			let names: Cow<'_, [u32]> = match *view {
				PoolView::Shared => Cow::Borrowed(pool.as_slice()),
				PoolView::Window {
					start,
					len,
				} => {
					// windows may run past the pool into the bytes after it
					reader.seek(hash_offset + start * 4);
					Cow::Owned(reader.read_u32_vec(len)?)
				}
			};

			let data_type = DataType::try_from(descriptor.data_type)?;
			for entry in entry_index..entry_index + count {
				let node = read_node(
					&mut reader,
					data_offset + V2_TABLE_ENTRY_SIZE * entry,
					&names,
					track.kind,
					data_type,
					usize::from(descriptor.data_count),
				)?;
				log::trace!("V2 slot {slot}: {node}");
				track.nodes.push(node);
			}
		}
		entry_index += count;
	}

	Ok(tracks)
}

fn read_node(
	reader: &mut ByteReader<'_>,
	entry_offset: usize,
	names: &[u32],
	kind: TrackType,
	data_type: DataType,
	components: usize,
) -> Result<Node, L5FileError> {
	reader.seek(entry_offset);
	let flag_offset = reader.read_u32()? as usize;
	let key_frame_offset = reader.read_u32()? as usize;
	let key_data_offset = reader.read_u32()? as usize;

	reader.seek(flag_offset);
	let name_index = usize::from(reader.read_u16()?);
	let low = reader.read_u8()?;
	let high = reader.read_u8()?;

	let Some(&name_hash) = names.get(name_index) else {
		return Err(L5FileError::malformed(
			FileType::Animation,
			format!("name index {name_index} outside a pool of {}", names.len()),
		));
	};
	let (frame_count, is_main_track) = unpack_frame_count(low, high)?;

	reader.seek(key_data_offset);
	let mut frames = Vec::with_capacity(frame_count);
	for row in 0..frame_count {
		let key = reader.peek_u16_at(key_frame_offset + row * 2)?;
		let value = Value::read(reader, kind, data_type, components)?;
		frames.push(Frame::new(key, value));
	}

	Ok(Node {
		name_hash,
		is_main_track,
		frames,
	})
}

/// Distinct name hashes in first-use order across the prepared tracks
fn name_pool(tracks: &[Track]) -> Vec<u32> {
	let mut pool = Vec::new();
	for node in tracks.iter().flat_map(|track| &track.nodes) {
		if !pool.contains(&node.name_hash) {
			pool.push(node.name_hash);
		}
	}
	pool
}

/// Internal block produced by [`encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct EncodedBlock {
	/// Block bytes, before compression
	pub(super) data: Vec<u8>,
	/// Max-node hint the container prefix must carry for the block to decode
	pub(super) max_node_hint: Option<u32>,
}

/// Encodes prepared tracks (sorted by slot, frames validated and extended) into a V2 block.
///
/// `track_counts` are the counts the header will carry. Name indices are
/// written relative to the pool view the decoder derives for each slot. When
/// an opaque slot is only reachable through the max-node hint, the hint is
/// returned with the block.
pub(super) fn encode(
	tracks: &[Track],
	frame_count: u16,
	track_counts: [Option<u32>; TRACK_SLOT_COUNT],
) -> Result<EncodedBlock, L5FileError> {
	let pool = name_pool(tracks);
	let node_total: usize = tracks.iter().map(Track::len).sum();

	let present = track_counts.iter().filter(|count| count.is_some()).count();
	let kinds: Vec<Option<TrackType>> = (0..present)
		.map(|slot| {
			tracks
				.iter()
				.find(|track| usize::from(track.index) == slot && !track.is_empty())
				.map(|track| track.kind)
		})
		.collect();
	let (views, max_node_hint) = encoder_views(&pool, tracks, track_counts, &kinds)?;

	let track_area = V2_DATA_HEADER_SIZE + pool.len() * 4;
	let mut table_offset = track_area + V2_TRACK_AREA_SIZE;
	let mut data_offset = V2_DATA_HEADER_SIZE
		+ node_total * 4
		+ V2_TRACK_AREA_SIZE
		+ node_total * V2_TABLE_ENTRY_SIZE;
	let mut descriptor_offset = track_area + TRACK_SLOT_COUNT * 2;

	let mut writer = ByteWriter::new();
	writer.write_u32(V2_HASH_OFFSET);
	writer.write_u32(checked_u32("track offset", track_area)?);
	writer.write_u32(checked_u32("table offset", table_offset)?);
	for hash in &pool {
		writer.write_u32(*hash);
	}

	for slot in 0..TRACK_SLOT_COUNT {
		let pointer = u16::try_from(descriptor_offset).map_err(|_| L5FileError::OutOfRange {
			field: "track descriptor offset",
			value: descriptor_offset as u64,
			max: u64::from(u16::MAX),
		})?;
		writer.seek(track_area + slot * 2);
		writer.write_u16(pointer);

		let track = tracks
			.iter()
			.find(|track| usize::from(track.index) == slot)
			.filter(|track| !track.is_empty());
		let descriptor = track.map_or_else(TrackDescriptor::default, |track| {
			TrackDescriptor::for_track(track, frame_count)
		});

		if let Some(track) = track {
			let data_type = track.kind.data_type();

			for node in &track.nodes {
				writer.seek(table_offset);
				writer.write_u32(checked_u32("node data offset", data_offset)?);
				writer.write_u32(checked_u32("key frame offset", data_offset + 4)?);
				table_offset += 8;

				let name_index = name_index(&pool, views[slot], node, slot)?;
				let (low, high) = pack_frame_count(node.len(), node.is_main_track)?;
				writer.seek(data_offset);
				writer.write_u16(name_index);
				writer.write_u8(low);
				writer.write_u8(high);
				for frame in &node.frames {
					writer.write_u16(frame.key);
				}
				writer.align(4);

				let value_offset = writer.position();
				for frame in &node.frames {
					frame.value.write(&mut writer, data_type);
				}
				data_offset = writer.position();

				writer.seek(table_offset);
				writer.write_u32(checked_u32("value offset", value_offset)?);
				writer.write_u32(0);
				table_offset += 8;
			}
		}

		writer.seek(descriptor_offset);
		descriptor.write(&mut writer);
		descriptor_offset += V2_TRACK_DESCRIPTOR_SIZE;
	}

	Ok(EncodedBlock {
		data: writer.into_inner(),
		max_node_hint: max_node_hint.map(|hint| checked_u32("max node hint", hint)).transpose()?,
	})
}

/// Pool views the decoder will derive for the encoded block.
///
/// The hint-less views are preferred. When they cannot address every node,
/// the hint is set to the pool index of the first opaque node's name, which
/// gives the opaque slot a window starting there.
fn encoder_views(
	pool: &[u32],
	tracks: &[Track],
	track_counts: [Option<u32>; TRACK_SLOT_COUNT],
	kinds: &[Option<TrackType>],
) -> Result<([PoolView; TRACK_SLOT_COUNT], Option<usize>), L5FileError> {
	let views = pool_views(track_counts, kinds, None);
	let Err(error) = check_views(pool, tracks, &views) else {
		return Ok((views, None));
	};

	let hint = tracks
		.iter()
		.find(|track| track.kind == TrackType::Opaque && !track.is_empty())
		.and_then(|track| track.nodes.first())
		.and_then(|node| pool.iter().position(|hash| *hash == node.name_hash))
		.filter(|hint| *hint > 0);

	if let Some(hint) = hint {
		let hinted = pool_views(track_counts, kinds, Some(hint));
		if check_views(pool, tracks, &hinted).is_ok() {
			log::debug!("Opaque slot addressed through max-node hint {hint}");
			return Ok((hinted, Some(hint)));
		}
	}

	Err(error)
}

fn check_views(
	pool: &[u32],
	tracks: &[Track],
	views: &[PoolView; TRACK_SLOT_COUNT],
) -> Result<(), L5FileError> {
	for track in tracks {
		let slot = usize::from(track.index);
		for node in &track.nodes {
			name_index(pool, views[slot], node, slot)?;
		}
	}
	Ok(())
}

/// Index of a node's name within the pool view of its slot
fn name_index(pool: &[u32], view: PoolView, node: &Node, slot: usize) -> Result<u16, L5FileError> {
	let names = match view {
		PoolView::Shared => Some(pool),
		PoolView::Window {
			start,
			len,
		} => pool.get(start..start + len),
	};

	names
		.and_then(|names| names.iter().position(|hash| *hash == node.name_hash))
		.and_then(|index| u16::try_from(index).ok())
		.ok_or_else(|| {
			L5FileError::malformed(
				FileType::Animation,
				format!("node {} in slot {slot} is outside the name pool view {view:?}", node.name()),
			)
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_frame_count_packing() {
		assert_eq!(pack_frame_count(0, false).unwrap(), (0, 0));
		assert_eq!(pack_frame_count(254, false).unwrap(), (254, 0));
		assert_eq!(pack_frame_count(255, false).unwrap(), (0xFF, 0x20));
		assert_eq!(pack_frame_count(300, false).unwrap(), (0x2C, 0x21));
		assert_eq!(pack_frame_count(8191, false).unwrap(), (0xFF, 0x3F));
		assert_eq!(pack_frame_count(3, true).unwrap(), (3, 0x20));

		for count in [0usize, 1, 254, 255, 300, 8191] {
			let (low, high) = pack_frame_count(count, false).unwrap();
			assert_eq!(unpack_frame_count(low, high).unwrap().0, count);
		}
		assert_eq!(unpack_frame_count(5, 0x20).unwrap(), (5, true));
	}

	#[test]
	fn test_frame_count_limits() {
		assert!(pack_frame_count(0xDFFF, true).is_ok());
		assert!(matches!(pack_frame_count(0xE000, true), Err(L5FileError::OutOfRange { .. })));
		assert!(matches!(unpack_frame_count(0, 0x1F), Err(L5FileError::Malformed { .. })));
	}

	#[test]
	fn test_name_pool_keeps_first_use_order() {
		let mut first = Track::new(TrackType::BoneLocation, 0);
		first.nodes = vec![Node::new(3, false), Node::new(1, false)];
		let mut second = Track::new(TrackType::BoneRotation, 1);
		second.nodes = vec![Node::new(1, false), Node::new(2, false)];

		assert_eq!(name_pool(&[first, second]), vec![3, 1, 2]);
	}

	#[test]
	fn test_empty_block_layout() {
		let encoded = encode(&[], 10, [Some(0); TRACK_SLOT_COUNT]).unwrap();
		assert_eq!(encoded.max_node_hint, None);
		let block = encoded.data;
		assert_eq!(block.len(), V2_DATA_HEADER_SIZE + V2_TRACK_AREA_SIZE);

		let reader = ByteReader::new(&block, FileType::Animation);
		assert_eq!(reader.peek_u32_at(0).unwrap(), V2_HASH_OFFSET);
		assert_eq!(reader.peek_u32_at(4).unwrap(), 0x0C);
		assert_eq!(reader.peek_u32_at(8).unwrap(), 0x0C + 40);
		for slot in 0..4 {
			assert_eq!(reader.peek_u16_at(0x0C + slot * 2).unwrap() as usize, 0x0C + 8 + slot * 8);
		}
		assert!(block[0x14..].iter().all(|&b| b == 0));
	}
}
