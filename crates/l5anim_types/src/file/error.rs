//! Error types for file format parsing and manipulation.

use std::fmt::Display;

use thiserror::Error;

use super::anim::TrackType;

/// Kind of data an error was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Animation container (header, name table, V1/V2 internal block)
	Animation,
	/// Level-5 compressed block
	Compression,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FileType::Animation => write!(f, "animation"),
			FileType::Compression => write!(f, "compression"),
		}
	}
}

/// Errors that can occur when decoding or encoding animation containers
#[derive(Debug, Error)]
pub enum L5FileError {
	/// A read ran past the end of the buffer
	#[error(
		"Insufficient {file_type} data at offset 0x{offset:X}: expected {expected} bytes, got {actual} bytes"
	)]
	InsufficientData {
		/// Kind of data being read
		file_type: FileType,
		/// Absolute offset of the read
		offset: usize,
		/// Number of bytes requested
		expected: usize,
		/// Number of bytes available from the offset
		actual: usize,
	},

	/// Value data-type tag outside of the known set
	#[error("Unsupported data type {0}")]
	UnsupportedDataType(u8),

	/// Track type tag outside of the registry
	#[error("Unknown track type {0}")]
	UnknownTrackType(u8),

	/// Compression method without a codec
	#[error("Unsupported compression method {0}")]
	UnsupportedCompression(u8),

	/// Frame keys are not strictly increasing or run past the frame count
	#[error("Invalid frame order in node {node}: key {key} follows {previous}")]
	InvalidFrameOrder {
		/// Node name (8 hex digits)
		node: String,
		/// Previous key, or the frame count when the key exceeds it
		previous: u32,
		/// Offending key
		key: u32,
	},

	/// A frame value does not match the kind of the track holding it
	#[error("Value kind mismatch: track holds {expected}, frame holds {actual}")]
	ValueKindMismatch {
		/// Kind of the owning track
		expected: TrackType,
		/// Kind of the frame value
		actual: TrackType,
	},

	/// Track slot index outside 0..=3
	#[error("Invalid track index {0} (max 3)")]
	InvalidTrackIndex(u8),

	/// Two tracks share one slot
	#[error("Duplicate track index {0}")]
	DuplicateTrackIndex(u8),

	/// Value does not fit its on-disk field
	#[error("{field} value {value} out of range (max {max})")]
	OutOfRange {
		/// Field being written
		field: &'static str,
		/// Offending value
		value: u64,
		/// Largest representable value
		max: u64,
	},

	/// Node name is not an 8-digit hexadecimal hash
	#[error("Invalid node name: {0:?}")]
	InvalidNodeName(String),

	/// Structural inconsistency in the data
	#[error("Malformed {file_type} data: {message}")]
	Malformed {
		/// Kind of data being processed
		file_type: FileType,
		/// Description of the problem
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl L5FileError {
	/// Creates an `InsufficientData` error
	pub fn insufficient_data(
		file_type: FileType,
		offset: usize,
		expected: usize,
		actual: usize,
	) -> Self {
		Self::InsufficientData {
			file_type,
			offset,
			expected,
			actual,
		}
	}

	/// Creates a `Malformed` error
	pub fn malformed(file_type: FileType, message: impl Into<String>) -> Self {
		Self::Malformed {
			file_type,
			message: message.into(),
		}
	}
}
