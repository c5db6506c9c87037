//! Keyframe type.

use serde::{Deserialize, Serialize};

use super::{track_type::TrackType, value::Value};

/// One keyframe: a frame index paired with a typed value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
	/// Frame index
	pub key: u16,
	/// Value at this frame
	pub value: Value,
}

impl Frame {
	/// Creates a keyframe
	pub fn new(key: u16, value: Value) -> Self {
		Self {
			key,
			value,
		}
	}

	/// Kind of the value held by this frame
	pub fn kind(&self) -> TrackType {
		self.value.kind()
	}
}
