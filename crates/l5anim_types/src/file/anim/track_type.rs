//! Track type registry.
//!
//! Every track carries a type tag (1..=9) that fixes the value kind of its
//! frames, how many components each value has, the data-type tag used to
//! store each component and the component width in bytes.
//!
//! | Tag | Kind                 | Components | Data type | Width |
//! |-----|----------------------|------------|-----------|-------|
//! | 1   | `BoneLocation`       | 3          | 2 (f32)   | 4     |
//! | 2   | `BoneRotation`       | 4          | 2 (f32)   | 4     |
//! | 3   | `BoneScale`          | 3          | 2 (f32)   | 4     |
//! | 4   | `UvMove`             | 2          | 2 (f32)   | 4     |
//! | 5   | `UvScale`            | 2          | 2 (f32)   | 4     |
//! | 6   | `UvRotation`         | 1          | 3 (f32)   | 4     |
//! | 7   | `TextureBrightness`  | 1          | 2 (f32)   | 4     |
//! | 8   | `TextureAttribute`   | 3          | 2 (f32)   | 4     |
//! | 9   | `Opaque`             | 1          | 4 (u8)    | 1     |

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::file::L5FileError;

/// Storage of a single value component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
	/// Signed 16-bit fixed point, divided by 32767 to land in [-1, 1]
	Normalized16 = 1,
	/// 32-bit float
	Float = 2,
	/// 32-bit float, tag used by UV rotation tracks
	FloatAlt = 3,
	/// Unsigned byte
	Byte = 4,
}

impl DataType {
	/// Width of one component in bytes
	pub const fn size(self) -> usize {
		match self {
			DataType::Normalized16 => 2,
			DataType::Float | DataType::FloatAlt => 4,
			DataType::Byte => 1,
		}
	}
}

impl TryFrom<u8> for DataType {
	type Error = L5FileError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(DataType::Normalized16),
			2 => Ok(DataType::Float),
			3 => Ok(DataType::FloatAlt),
			4 => Ok(DataType::Byte),
			other => Err(L5FileError::UnsupportedDataType(other)),
		}
	}
}

/// Static metadata attached to a track type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackInfo {
	/// Value kind name
	pub name: &'static str,
	/// Components per value
	pub component_count: usize,
	/// Storage of each component
	pub data_type: DataType,
	/// Width of a component in bytes as recorded in V1 node records
	pub element_size: usize,
}

/// Track type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TrackType {
	/// Bone translation (x, y, z)
	BoneLocation = 1,
	/// Bone rotation quaternion (x, y, z, w)
	BoneRotation = 2,
	/// Bone scale (x, y, z)
	BoneScale = 3,
	/// Texture coordinate translation (u, v)
	UvMove = 4,
	/// Texture coordinate scale (u, v)
	UvScale = 5,
	/// Texture coordinate rotation angle
	UvRotation = 6,
	/// Texture brightness scalar
	TextureBrightness = 7,
	/// Texture attribute triple (hue, saturation, value)
	TextureAttribute = 8,
	/// Opaque single-byte value
	Opaque = 9,
}

impl TrackType {
	/// All track types in tag order
	pub const ALL: [TrackType; 9] = [
		TrackType::BoneLocation,
		TrackType::BoneRotation,
		TrackType::BoneScale,
		TrackType::UvMove,
		TrackType::UvScale,
		TrackType::UvRotation,
		TrackType::TextureBrightness,
		TrackType::TextureAttribute,
		TrackType::Opaque,
	];

	/// Metadata for this track type
	pub const fn info(self) -> TrackInfo {
		let (name, component_count, data_type, element_size) = match self {
			TrackType::BoneLocation => ("BoneLocation", 3, DataType::Float, 4),
			TrackType::BoneRotation => ("BoneRotation", 4, DataType::Float, 4),
			TrackType::BoneScale => ("BoneScale", 3, DataType::Float, 4),
			TrackType::UvMove => ("UVMove", 2, DataType::Float, 4),
			TrackType::UvScale => ("UVScale", 2, DataType::Float, 4),
			TrackType::UvRotation => ("UVRotation", 1, DataType::FloatAlt, 4),
			TrackType::TextureBrightness => ("TextureBrightness", 1, DataType::Float, 4),
			TrackType::TextureAttribute => ("TextureAttribute", 3, DataType::Float, 4),
			TrackType::Opaque => ("Opaque", 1, DataType::Byte, 1),
		};

		TrackInfo {
			name,
			component_count,
			data_type,
			element_size,
		}
	}

	/// Type tag as stored on disk
	pub const fn tag(self) -> u8 {
		self as u8
	}

	/// Components per value
	pub const fn component_count(self) -> usize {
		self.info().component_count
	}

	/// Storage of each component
	pub const fn data_type(self) -> DataType {
		self.info().data_type
	}

	/// Width of a component in bytes
	pub const fn element_size(self) -> usize {
		self.info().element_size
	}

	/// Bytes taken by one encoded value
	pub const fn value_size(self) -> usize {
		self.component_count() * self.element_size()
	}

	/// Resolves an on-disk tag where 0 means "no track"
	pub fn from_tag(tag: u8) -> Result<Option<Self>, L5FileError> {
		if tag == 0 {
			return Ok(None);
		}
		Self::try_from(tag).map(Some)
	}
}

impl TryFrom<u8> for TrackType {
	type Error = L5FileError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Self::ALL
			.iter()
			.copied()
			.find(|kind| kind.tag() == value)
			.ok_or(L5FileError::UnknownTrackType(value))
	}
}

impl Display for TrackType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.info().name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_registry_table() {
		let counts: Vec<usize> = TrackType::ALL.iter().map(|t| t.component_count()).collect();
		assert_eq!(counts, vec![3, 4, 3, 2, 2, 1, 1, 3, 1]);

		let data_types: Vec<u8> = TrackType::ALL.iter().map(|t| t.data_type() as u8).collect();
		assert_eq!(data_types, vec![2, 2, 2, 2, 2, 3, 2, 2, 4]);

		for kind in TrackType::ALL {
			let expected = if kind == TrackType::Opaque { 1 } else { 4 };
			assert_eq!(kind.element_size(), expected, "{kind}");
		}
	}

	#[test]
	fn test_tags_round_trip() {
		for (i, kind) in TrackType::ALL.iter().enumerate() {
			assert_eq!(kind.tag() as usize, i + 1);
			assert_eq!(TrackType::try_from(kind.tag()).unwrap(), *kind);
		}
	}

	#[test]
	fn test_zero_tag_is_absent() {
		assert_eq!(TrackType::from_tag(0).unwrap(), None);
		assert_eq!(TrackType::from_tag(2).unwrap(), Some(TrackType::BoneRotation));
		assert!(matches!(TrackType::from_tag(10), Err(L5FileError::UnknownTrackType(10))));
	}

	#[test]
	fn test_data_type_tags() {
		assert_eq!(DataType::try_from(1).unwrap(), DataType::Normalized16);
		assert_eq!(DataType::try_from(3).unwrap().size(), 4);
		assert!(matches!(DataType::try_from(5), Err(L5FileError::UnsupportedDataType(5))));
		assert!(matches!(DataType::try_from(0), Err(L5FileError::UnsupportedDataType(0))));
	}
}
