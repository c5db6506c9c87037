//! Animated element (bone or texture slot) and its keyframes.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{frame::Frame, track_type::TrackType, value::Value};
use crate::file::L5FileError;

/// One animated element inside a track.
///
/// Nodes are identified by a 32-bit name hash, shown as 8 upper-case hex
/// digits. Frames are kept ordered by key.
///
/// # Examples
///
/// ```
/// use l5anim_types::file::anim::{Node, Value};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut node = Node::from_hex("00c0ffee", false)?;
/// node.add_frame(0, Value::UvRotation { angle: 0.0 });
/// node.add_frame(10, Value::UvRotation { angle: 1.5 });
///
/// assert_eq!(node.name(), "00C0FFEE");
/// assert!(node.extend_to(20));
/// assert_eq!(node.frames.last().map(|f| f.key), Some(20));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Hashed element name
	pub name_hash: u32,
	/// Whether the node belongs to the main track (selects the V2 frame-count encoding)
	pub is_main_track: bool,
	/// Keyframes ordered by key
	pub frames: Vec<Frame>,
}

impl Node {
	/// Creates a node without frames
	pub fn new(name_hash: u32, is_main_track: bool) -> Self {
		Self {
			name_hash,
			is_main_track,
			frames: Vec::new(),
		}
	}

	/// Creates a node from an 8-digit hexadecimal name
	pub fn from_hex(name: &str, is_main_track: bool) -> Result<Self, L5FileError> {
		Ok(Self::new(parse_name(name)?, is_main_track))
	}

	/// Name hash as 8 upper-case hex digits
	pub fn name(&self) -> String {
		format!("{:08X}", self.name_hash)
	}

	/// Number of keyframes
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` if the node has no keyframes
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Inserts a keyframe, replacing any frame already at `key`
	pub fn add_frame(&mut self, key: u16, value: Value) {
		match self.frames.binary_search_by_key(&key, |frame| frame.key) {
			Ok(index) => self.frames[index].value = value,
			Err(index) => self.frames.insert(index, Frame::new(key, value)),
		}
	}

	/// Keyframe stored at exactly `key`
	pub fn frame(&self, key: u16) -> Option<&Frame> {
		self.frames.iter().find(|frame| frame.key == key)
	}

	/// Appends a copy of the last value at `frame_count` when the last key is earlier.
	///
	/// Returns `true` if a frame was added. Nodes without frames are left empty.
	pub fn extend_to(&mut self, frame_count: u16) -> bool {
		match self.frames.last() {
			Some(last) if last.key < frame_count => {
				let value = last.value;
				self.frames.push(Frame::new(frame_count, value));
				true
			}
			_ => false,
		}
	}

	/// Checks that every value is of `kind` and keys are strictly increasing up to `frame_count`
	pub fn validate(&self, kind: TrackType, frame_count: u16) -> Result<(), L5FileError> {
		let mut previous: Option<u16> = None;

		for frame in &self.frames {
			if frame.kind() != kind {
				return Err(L5FileError::ValueKindMismatch {
					expected: kind,
					actual: frame.kind(),
				});
			}

			if let Some(previous) = previous
				&& frame.key <= previous
			{
				return Err(L5FileError::InvalidFrameOrder {
					node: self.name(),
					previous: u32::from(previous),
					key: u32::from(frame.key),
				});
			}

			if frame.key > frame_count {
				return Err(L5FileError::InvalidFrameOrder {
					node: self.name(),
					previous: u32::from(frame_count),
					key: u32::from(frame.key),
				});
			}

			previous = Some(frame.key);
		}

		Ok(())
	}
}

impl Display for Node {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}{} ({} frames)",
			self.name(),
			if self.is_main_track { " [main]" } else { "" },
			self.frames.len()
		)
	}
}

/// Parses an 8-digit hexadecimal node name
pub fn parse_name(name: &str) -> Result<u32, L5FileError> {
	if name.len() != 8 || !name.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(L5FileError::InvalidNodeName(name.to_string()));
	}

	u32::from_str_radix(name, 16).map_err(|_| L5FileError::InvalidNodeName(name.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn brightness(value: f32) -> Value {
		Value::TextureBrightness {
			value,
		}
	}

	#[test]
	fn test_name_round_trip() {
		let node = Node::from_hex("0a1B2c3D", true).unwrap();
		assert_eq!(node.name_hash, 0x0A1B_2C3D);
		assert_eq!(node.name(), "0A1B2C3D");
		assert!(node.is_main_track);
	}

	#[test]
	fn test_invalid_names() {
		for name in ["", "1234567", "123456789", "GGGGGGGG", "+1234567"] {
			assert!(
				matches!(Node::from_hex(name, false), Err(L5FileError::InvalidNodeName(_))),
				"{name:?}"
			);
		}
	}

	#[test]
	fn test_add_frame_keeps_order_and_replaces() {
		let mut node = Node::new(1, false);
		node.add_frame(10, brightness(1.0));
		node.add_frame(0, brightness(0.0));
		node.add_frame(5, brightness(0.5));
		node.add_frame(10, brightness(2.0));

		let keys: Vec<u16> = node.frames.iter().map(|f| f.key).collect();
		assert_eq!(keys, vec![0, 5, 10]);
		assert_eq!(node.frame(10).map(|f| f.value), Some(brightness(2.0)));
	}

	#[test]
	fn test_extend_to() {
		let mut node = Node::new(1, false);
		assert!(!node.extend_to(10));
		assert!(node.is_empty());

		node.add_frame(3, brightness(0.25));
		assert!(node.extend_to(10));
		assert_eq!(node.frames[1], Frame::new(10, brightness(0.25)));
		assert!(!node.extend_to(10));
		assert_eq!(node.len(), 2);
	}

	#[test]
	fn test_validate() {
		let mut node = Node::new(0xAB, false);
		node.frames = vec![Frame::new(2, brightness(0.0)), Frame::new(2, brightness(1.0))];
		assert!(matches!(
			node.validate(TrackType::TextureBrightness, 10),
			Err(L5FileError::InvalidFrameOrder {
				previous: 2,
				key: 2,
				..
			})
		));

		node.frames = vec![Frame::new(12, brightness(0.0))];
		assert!(matches!(
			node.validate(TrackType::TextureBrightness, 10),
			Err(L5FileError::InvalidFrameOrder {
				previous: 10,
				key: 12,
				..
			})
		));

		node.frames = vec![Frame::new(0, brightness(0.0))];
		assert!(matches!(
			node.validate(TrackType::UvRotation, 10),
			Err(L5FileError::ValueKindMismatch {
				expected: TrackType::UvRotation,
				actual: TrackType::TextureBrightness,
			})
		));
		assert!(node.validate(TrackType::TextureBrightness, 10).is_ok());
	}
}
