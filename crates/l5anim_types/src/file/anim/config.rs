//! Save configuration for animation containers.
//!
//! Controls the compression method of the internal block and which header
//! shape is written.

use super::{constants::LEGACY_FORMAT, header::HeaderShape};
use crate::file::compression::Method;

/// Header shape selection on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderStyle {
	/// Legacy header for the `XMTM` format tag, primary header otherwise
	#[default]
	Auto,
	/// Always write the primary header (four track counts)
	Primary,
	/// Always write the legacy header (two track counts)
	Legacy,
}

impl HeaderStyle {
	/// Header shape used for a container with this format tag
	pub fn resolve(self, format: &str) -> HeaderShape {
		match self {
			HeaderStyle::Auto if format == LEGACY_FORMAT => HeaderShape::Legacy,
			HeaderStyle::Auto | HeaderStyle::Primary => HeaderShape::Primary,
			HeaderStyle::Legacy => HeaderShape::Legacy,
		}
	}
}

/// Configuration for writing animation containers.
///
/// # Presets
///
/// - `default()`: LZ10 compression, header chosen from the format tag
/// - `uncompressed()`: stored block (method 0), header chosen from the format tag
/// - `legacy()`: LZ10 compression, legacy header regardless of the format tag
///
/// # Examples
///
/// ```
/// use l5anim_types::file::{anim::{HeaderStyle, SaveConfig}, compression::Method};
///
/// let config = SaveConfig::default();
/// assert_eq!(config.compression, Method::Lz10);
///
/// let config = SaveConfig::new(Method::Zlib, HeaderStyle::Primary);
/// assert_eq!(config.header, HeaderStyle::Primary);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveConfig {
	/// Compression applied to the internal block
	pub compression: Method,
	/// Header shape selection
	pub header: HeaderStyle,
}

impl SaveConfig {
	/// Create a save configuration.
	///
	/// # Arguments
	/// * `compression` - Compression method for the internal block
	/// * `header` - Header shape selection
	pub fn new(compression: Method, header: HeaderStyle) -> Self {
		Self {
			compression,
			header,
		}
	}

	/// Store the internal block without compression.
	pub fn uncompressed() -> Self {
		Self {
			compression: Method::None,
			header: HeaderStyle::Auto,
		}
	}

	/// Force the legacy two-track header.
	pub fn legacy() -> Self {
		Self {
			compression: Method::Lz10,
			header: HeaderStyle::Legacy,
		}
	}
}
