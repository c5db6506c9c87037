//! Typed keyframe values.
//!
//! A value is stored as a fixed number of components whose encoding is given
//! by a [`DataType`] tag. Decoding reads the components into a fixed-size
//! array, then builds the variant selected by the owning track's
//! [`TrackType`].

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{
	constants::NORMALIZED_SCALE,
	track_type::{DataType, TrackType},
};
use crate::file::{
	FileType, L5FileError,
	cursor::{ByteReader, ByteWriter},
};

/// Most components any value kind has
pub const MAX_COMPONENTS: usize = 4;

/// Keyframe value, one variant per track type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Bone translation
	BoneLocation {
		/// X
		x: f32,
		/// Y
		y: f32,
		/// Z
		z: f32,
	},
	/// Bone rotation quaternion
	BoneRotation {
		/// X
		x: f32,
		/// Y
		y: f32,
		/// Z
		z: f32,
		/// W
		w: f32,
	},
	/// Bone scale
	BoneScale {
		/// X
		x: f32,
		/// Y
		y: f32,
		/// Z
		z: f32,
	},
	/// Texture coordinate translation
	UvMove {
		/// U
		u: f32,
		/// V
		v: f32,
	},
	/// Texture coordinate scale
	UvScale {
		/// U
		u: f32,
		/// V
		v: f32,
	},
	/// Texture coordinate rotation
	UvRotation {
		/// Angle
		angle: f32,
	},
	/// Texture brightness
	TextureBrightness {
		/// Brightness scalar
		value: f32,
	},
	/// Texture attribute triple
	TextureAttribute {
		/// Hue
		hue: f32,
		/// Saturation
		saturation: f32,
		/// Value
		value: f32,
	},
	/// Opaque single-byte value
	Opaque {
		/// Raw byte
		value: u8,
	},
}

impl Value {
	/// Track type this value belongs to
	pub fn kind(&self) -> TrackType {
		match self {
			Value::BoneLocation { .. } => TrackType::BoneLocation,
			Value::BoneRotation { .. } => TrackType::BoneRotation,
			Value::BoneScale { .. } => TrackType::BoneScale,
			Value::UvMove { .. } => TrackType::UvMove,
			Value::UvScale { .. } => TrackType::UvScale,
			Value::UvRotation { .. } => TrackType::UvRotation,
			Value::TextureBrightness { .. } => TrackType::TextureBrightness,
			Value::TextureAttribute { .. } => TrackType::TextureAttribute,
			Value::Opaque { .. } => TrackType::Opaque,
		}
	}

	/// Components in storage order; slots past `kind().component_count()` are zero
	pub fn components(&self) -> [f32; MAX_COMPONENTS] {
		match *self {
			Value::BoneLocation {
				x,
				y,
				z,
			}
			| Value::BoneScale {
				x,
				y,
				z,
			} => [x, y, z, 0.0],
			Value::BoneRotation {
				x,
				y,
				z,
				w,
			} => [x, y, z, w],
			Value::UvMove {
				u,
				v,
			}
			| Value::UvScale {
				u,
				v,
			} => [u, v, 0.0, 0.0],
			Value::UvRotation {
				angle: value,
			}
			| Value::TextureBrightness {
				value,
			} => [value, 0.0, 0.0, 0.0],
			Value::TextureAttribute {
				hue,
				saturation,
				value,
			} => [hue, saturation, value, 0.0],
			Value::Opaque {
				value,
			} => [f32::from(value), 0.0, 0.0, 0.0],
		}
	}

	/// Builds a value of `kind` from decoded components
	pub fn from_components(kind: TrackType, components: &[f32]) -> Result<Self, L5FileError> {
		if components.len() < kind.component_count() {
			return Err(L5FileError::malformed(
				FileType::Animation,
				format!(
					"{kind} needs {} components, got {}",
					kind.component_count(),
					components.len()
				),
			));
		}

		let c = components;
		Ok(match kind {
			TrackType::BoneLocation => Value::BoneLocation {
				x: c[0],
				y: c[1],
				z: c[2],
			},
			TrackType::BoneRotation => Value::BoneRotation {
				x: c[0],
				y: c[1],
				z: c[2],
				w: c[3],
			},
			TrackType::BoneScale => Value::BoneScale {
				x: c[0],
				y: c[1],
				z: c[2],
			},
			TrackType::UvMove => Value::UvMove {
				u: c[0],
				v: c[1],
			},
			TrackType::UvScale => Value::UvScale {
				u: c[0],
				v: c[1],
			},
			TrackType::UvRotation => Value::UvRotation {
				angle: c[0],
			},
			TrackType::TextureBrightness => Value::TextureBrightness {
				value: c[0],
			},
			TrackType::TextureAttribute => Value::TextureAttribute {
				hue: c[0],
				saturation: c[1],
				value: c[2],
			},
			TrackType::Opaque => Value::Opaque {
				value: c[0] as u8,
			},
		})
	}

	/// Reads `count` components stored as `data_type` and builds a value of `kind`.
	///
	/// Nothing is built when any component fails to decode.
	pub fn read(
		reader: &mut ByteReader<'_>,
		kind: TrackType,
		data_type: DataType,
		count: usize,
	) -> Result<Self, L5FileError> {
		let mut components = [0f32; MAX_COMPONENTS];
		for index in 0..count {
			let component = read_component(reader, data_type)?;
			// stored vectors wider than the kind are consumed but ignored
			if let Some(slot) = components.get_mut(index) {
				*slot = component;
			}
		}

		Self::from_components(kind, &components[..count.min(MAX_COMPONENTS)])
	}

	/// Writes the components of this value stored as `data_type`
	pub fn write(&self, writer: &mut ByteWriter, data_type: DataType) {
		let components = self.components();
		for &component in &components[..self.kind().component_count()] {
			write_component(writer, data_type, component);
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if let Value::Opaque {
			value,
		} = self
		{
			return write!(f, "{}({value})", self.kind());
		}

		let components = self.components();
		let shown = &components[..self.kind().component_count()];
		write!(f, "{}(", self.kind())?;
		for (i, component) in shown.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{component}")?;
		}
		write!(f, ")")
	}
}

/// Reads one component
pub fn read_component(
	reader: &mut ByteReader<'_>,
	data_type: DataType,
) -> Result<f32, L5FileError> {
	Ok(match data_type {
		DataType::Normalized16 => f32::from(reader.read_i16()?) / NORMALIZED_SCALE,
		DataType::Float | DataType::FloatAlt => reader.read_f32()?,
		DataType::Byte => f32::from(reader.read_u8()?),
	})
}

/// Writes one component
pub fn write_component(writer: &mut ByteWriter, data_type: DataType, component: f32) {
	match data_type {
		DataType::Normalized16 => {
			let scaled = (component * NORMALIZED_SCALE).round().clamp(-32768.0, 32767.0);
			writer.write_i16(scaled as i16);
		}
		DataType::Float | DataType::FloatAlt => writer.write_f32(component),
		DataType::Byte => writer.write_u8(component.round().clamp(0.0, 255.0) as u8),
	}
}
