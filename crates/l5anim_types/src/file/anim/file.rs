//! Animation container structure and I/O operations.
//!
//! This module defines the main `File` struct which represents a complete
//! animation container: format tag, layout version, name, frame count and up
//! to four tracks.

use std::{fmt::Display, io::Read};

use encoding_rs::SHIFT_JIS;
use serde::{Deserialize, Serialize};

use super::{
	config::{HeaderStyle, SaveConfig},
	constants::{
		DATA_OFFSET, DEFAULT_FORMAT, HINT_OFFSET, HINTED_DATA_OFFSET, HINTED_NAME_OFFSET,
		MAX_NAME_LENGTH, NAME_OFFSET, TRACK_SLOT_COUNT,
	},
	header::{Header, HeaderShape},
	track::Track,
	v1, v2,
	version::LayoutVersion,
};
use crate::file::{
	FileType, L5FileError,
	compression::{Compressor, Level5Compressor},
	cursor::{ByteReader, ByteWriter},
};

/// Animation container.
///
/// # Examples
///
/// ## Opening and reading a file
///
/// ```no_run
/// use l5anim_types::file::anim::File;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let anim = File::open("walk.mtn2")?;
///
/// println!("{} ({} frames)", anim.name, anim.frame_count);
/// for track in anim.tracks() {
///     println!("{track}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Building and saving
///
/// ```
/// use l5anim_types::file::anim::{File, LayoutVersion, Node, Track, TrackType, Value};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut anim = File::new(LayoutVersion::V2);
/// anim.name = "idle".to_string();
/// anim.frame_count = 30;
///
/// let mut node = Node::from_hex("1A2B3C4D", false)?;
/// node.add_frame(0, Value::BoneScale { x: 1.0, y: 1.0, z: 1.0 });
///
/// let mut track = Track::new(TrackType::BoneScale, 0);
/// track.add_node(node)?;
/// anim.add_track(track)?;
///
/// let bytes = anim.to_bytes()?;
/// let decoded = File::from_bytes(&bytes)?;
///
/// // the node gains a frame at the frame count
/// assert_eq!(decoded.tracks()[0].nodes[0].frames.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
	/// Format tag from the magic field (e.g. `XMTN`)
	pub format: String,
	/// Internal block layout
	pub version: LayoutVersion,
	/// Animation name
	pub name: String,
	/// Last frame index of the animation
	pub frame_count: u32,
	/// Tracks ordered by slot index
	tracks: Vec<Track>,
}

impl Default for File {
	fn default() -> Self {
		Self::new(LayoutVersion::default())
	}
}

impl File {
	/// Creates an empty container with the default format tag
	pub fn new(version: LayoutVersion) -> Self {
		Self {
			format: DEFAULT_FORMAT.to_string(),
			version,
			name: String::new(),
			frame_count: 0,
			tracks: Vec::new(),
		}
	}

	/// Opens an animation container from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or does not decode.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, L5FileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads an animation container from any reader
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, L5FileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Decodes a container using the built-in Level-5 decompressor
	pub fn from_bytes(data: &[u8]) -> Result<Self, L5FileError> {
		Self::from_bytes_with(data, &Level5Compressor::default())
	}

	/// Decodes a container, decompressing its internal block with `compressor`
	pub fn from_bytes_with(data: &[u8], compressor: &dyn Compressor) -> Result<Self, L5FileError> {
		let header = Header::from_bytes(data)?;
		let mut reader = ByteReader::new(data, FileType::Animation);

		let frame_count_offset = (header.data_offset() as usize).checked_sub(4).ok_or_else(|| {
			L5FileError::malformed(
				FileType::Animation,
				format!(
					"compressed data offset 0x{:X} leaves no room for the frame count",
					header.data_offset()
				),
			)
		})?;

		reader.seek(header.name_offset() as usize);
		let _name_hash = reader.read_u32()?;
		let name = decode_name(reader.read_cstr(frame_count_offset)?);

		reader.seek(frame_count_offset);
		let raw_frame_count = reader.read_i32()?;
		let frame_count = u32::try_from(raw_frame_count).map_err(|_| {
			L5FileError::malformed(
				FileType::Animation,
				format!("negative frame count {raw_frame_count}"),
			)
		})?;

		let block = compressor.decompress(reader.remaining())?;
		if block.len() * 2 != header.decompressed_size() as usize {
			log::warn!(
				"Header announces {} bytes (x2) but the internal block holds {}",
				header.decompressed_size(),
				block.len()
			);
		}

		let version = LayoutVersion::detect(&block)?;
		let tracks = match version {
			LayoutVersion::V1 => v1::decode(&block, &header)?,
			LayoutVersion::V2 => v2::decode(&block, &header)?,
		};

		Ok(Self {
			format: header.format(),
			version,
			name,
			frame_count,
			tracks,
		})
	}

	/// Encodes the container with LZ10 compression and the header chosen from the format tag
	pub fn to_bytes(&self) -> Result<Vec<u8>, L5FileError> {
		self.to_bytes_with_config(&SaveConfig::default())
	}

	/// Encodes the container according to `config`
	pub fn to_bytes_with_config(&self, config: &SaveConfig) -> Result<Vec<u8>, L5FileError> {
		self.to_bytes_with(config.header, &Level5Compressor::new(config.compression))
	}

	/// Encodes the container, compressing its internal block with `compressor`.
	///
	/// Nodes whose last key is earlier than the frame count gain a copy of
	/// their last value at the frame count; `self` is left unchanged.
	///
	/// V2 blocks whose opaque slot can only be reached through the max-node
	/// hint are written with the hinted prefix (hint at 0x24, name table at
	/// 0x28, data at 0x58).
	pub fn to_bytes_with(
		&self,
		header_style: HeaderStyle,
		compressor: &dyn Compressor,
	) -> Result<Vec<u8>, L5FileError> {
		let frame_count = u16::try_from(self.frame_count).map_err(|_| L5FileError::OutOfRange {
			field: "frame count",
			value: u64::from(self.frame_count),
			max: u64::from(u16::MAX),
		})?;
		let tracks = self.prepared_tracks(frame_count)?;

		let shape = header_style.resolve(&self.format);
		let mut track_counts = [Some(0u32); TRACK_SLOT_COUNT];
		for track in &tracks {
			track_counts[usize::from(track.index)] = Some(track.len() as u32);
		}
		if shape == HeaderShape::Legacy {
			if let Some(track) = tracks.iter().find(|track| track.index >= 2 && !track.is_empty()) {
				return Err(L5FileError::malformed(
					FileType::Animation,
					format!("legacy header cannot describe nodes in slot {}", track.index),
				));
			}
			track_counts[2] = None;
			track_counts[3] = None;
		}

		let (block, max_node_hint) = match self.version {
			LayoutVersion::V1 => (v1::encode(&tracks, frame_count)?, None),
			LayoutVersion::V2 => {
				let encoded = v2::encode(&tracks, frame_count, track_counts)?;
				(encoded.data, encoded.max_node_hint)
			}
		};
		let decompressed_size = u32::try_from(block.len() * 2)
			.ok()
			.filter(|size| *size <= i32::MAX as u32)
			.ok_or(L5FileError::OutOfRange {
				field: "decompressed size",
				value: (block.len() * 2) as u64,
				max: i32::MAX as u64,
			})?;
		let compressed = compressor.compress(&block)?;
		log::debug!(
			"Encoded {} block: {} bytes, {} compressed",
			self.version,
			block.len(),
			compressed.len()
		);

		// the hinted variant shifts the name table and data by the hint word
		let (name_offset, data_offset) = match max_node_hint {
			Some(_) => (HINTED_NAME_OFFSET, HINTED_DATA_OFFSET),
			None => (NAME_OFFSET as u32, DATA_OFFSET as u32),
		};
		let header = Header::new(
			&self.format,
			shape,
			decompressed_size,
			name_offset,
			data_offset,
			track_counts,
		);
		let name = encode_name(&self.name);

		let mut writer = ByteWriter::new();
		writer.write_bytes(&header.to_bytes());
		if let Some(hint) = max_node_hint {
			writer.seek(HINT_OFFSET);
			writer.write_u32(hint);
		}
		writer.seek(name_offset as usize);
		writer.write_u32(crc32fast::hash(&name));
		writer.write_bytes(&name);
		writer.seek(data_offset as usize - 4);
		writer.write_u32(u32::from(frame_count));
		writer.write_bytes(&compressed);

		Ok(writer.into_inner())
	}

	/// Saves the container to the specified path with the default configuration
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), L5FileError> {
		self.save_with_config(path, &SaveConfig::default())
	}

	/// Saves the container to the specified path
	pub fn save_with_config(
		&self,
		path: impl AsRef<std::path::Path>,
		config: &SaveConfig,
	) -> Result<(), L5FileError> {
		let data = self.to_bytes_with_config(config)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	/// Tracks ordered by slot index
	pub fn tracks(&self) -> &[Track] {
		&self.tracks
	}

	/// Track stored in `slot`
	pub fn track(&self, slot: u8) -> Option<&Track> {
		self.tracks.iter().find(|track| track.index == slot)
	}

	/// Mutable track stored in `slot`
	pub fn track_mut(&mut self, slot: u8) -> Option<&mut Track> {
		self.tracks.iter_mut().find(|track| track.index == slot)
	}

	/// Adds a track in its slot.
	///
	/// # Errors
	///
	/// Fails if the slot index is above 3 or already taken.
	pub fn add_track(&mut self, track: Track) -> Result<(), L5FileError> {
		if usize::from(track.index) >= TRACK_SLOT_COUNT {
			return Err(L5FileError::InvalidTrackIndex(track.index));
		}
		if self.track(track.index).is_some() {
			return Err(L5FileError::DuplicateTrackIndex(track.index));
		}

		let position = self.tracks.partition_point(|existing| existing.index < track.index);
		self.tracks.insert(position, track);
		Ok(())
	}

	/// Removes and returns the track stored in `slot`
	pub fn remove_track(&mut self, slot: u8) -> Option<Track> {
		let position = self.tracks.iter().position(|track| track.index == slot)?;
		Some(self.tracks.remove(position))
	}

	/// Total number of nodes across all tracks
	pub fn node_count(&self) -> usize {
		self.tracks.iter().map(Track::len).sum()
	}

	/// Validates and copies the tracks for encoding, extending nodes to `frame_count`
	fn prepared_tracks(&self, frame_count: u16) -> Result<Vec<Track>, L5FileError> {
		let mut tracks = self.tracks.clone();
		tracks.sort_by_key(|track| track.index);

		for (position, track) in tracks.iter().enumerate() {
			if usize::from(track.index) >= TRACK_SLOT_COUNT {
				return Err(L5FileError::InvalidTrackIndex(track.index));
			}
			if position > 0 && tracks[position - 1].index == track.index {
				return Err(L5FileError::DuplicateTrackIndex(track.index));
			}
		}

		for track in &mut tracks {
			for node in &mut track.nodes {
				node.validate(track.kind, frame_count)?;
				if node.extend_to(frame_count) {
					log::trace!("Extended node {} to frame {frame_count}", node.name());
				}
			}
		}

		Ok(tracks)
	}
}

impl Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} {} \"{}\": {} frames, {} tracks, {} nodes",
			self.format,
			self.version,
			self.name,
			self.frame_count,
			self.tracks.len(),
			self.node_count()
		)?;

		for track in &self.tracks {
			write!(f, "\n  {track}")?;
		}

		Ok(())
	}
}

/// CRC-32 of a name's Shift-JIS encoding, as stored before animation names
pub fn name_hash(name: &str) -> u32 {
	let (bytes, _, _) = SHIFT_JIS.encode(name);
	crc32fast::hash(&bytes)
}

/// Encodes a name as Shift-JIS, truncated to whole characters within the name field
fn encode_name(name: &str) -> Vec<u8> {
	let mut encoded = Vec::with_capacity(MAX_NAME_LENGTH);
	let mut buffer = [0u8; 4];

	for character in name.chars() {
		let (bytes, _, _) = SHIFT_JIS.encode(character.encode_utf8(&mut buffer));
		if encoded.len() + bytes.len() > MAX_NAME_LENGTH {
			log::debug!("Animation name {name:?} truncated to {} bytes", encoded.len());
			break;
		}
		encoded.extend_from_slice(&bytes);
	}

	encoded
}

fn decode_name(bytes: &[u8]) -> String {
	let (name, _, had_errors) = SHIFT_JIS.decode(bytes);
	if had_errors {
		log::warn!("Animation name contains invalid Shift-JIS bytes");
	}
	name.into_owned()
}
