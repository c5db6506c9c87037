//! Internal block layout detection.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::constants::V2_HASH_OFFSET;
use crate::file::{FileType, L5FileError, cursor::ByteReader};

/// Layout of the decompressed internal block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutVersion {
	/// Table-indexed layout: 20-byte table headers and 48-byte node records
	V1,
	/// Hash-indexed layout: data header, shared name-hash pool, packed frame counts
	#[default]
	V2,
}

impl LayoutVersion {
	/// Sniffs the layout from the first word of a decompressed block.
	///
	/// A first word of exactly `0x0C` (the V2 hash-pool offset) selects V2,
	/// anything else V1.
	pub fn detect(block: &[u8]) -> Result<Self, L5FileError> {
		let reader = ByteReader::new(block, FileType::Animation);
		let hash_offset = reader.peek_u32_at(0)?;

		let version = if hash_offset == V2_HASH_OFFSET {
			LayoutVersion::V2
		} else {
			LayoutVersion::V1
		};
		log::debug!("Detected {version} layout (first word 0x{hash_offset:X})");
		Ok(version)
	}

	/// Version tag as used by tools ("V1" / "V2")
	pub fn as_str(&self) -> &'static str {
		match self {
			LayoutVersion::V1 => "V1",
			LayoutVersion::V2 => "V2",
		}
	}
}

impl Display for LayoutVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_detect() {
		let v2 = [0x0Cu8, 0, 0, 0, 0x20, 0, 0, 0];
		assert_eq!(LayoutVersion::detect(&v2).unwrap(), LayoutVersion::V2);

		let v1 = [0x14u8, 0, 0, 0, 0x40, 0, 0, 0];
		assert_eq!(LayoutVersion::detect(&v1).unwrap(), LayoutVersion::V1);
	}

	#[test]
	fn test_detect_short_block() {
		assert!(matches!(
			LayoutVersion::detect(&[0x0C, 0]),
			Err(L5FileError::InsufficientData { .. })
		));
	}
}
