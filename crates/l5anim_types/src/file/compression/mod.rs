//! Level-5 block compression.
//!
//! Every compressed block starts with a 4-byte little-endian word packing the
//! decompressed size and the method tag:
//!
//! ```text
//! bits 0..3   method (0 = none, 1 = LZ10, 2/3 = Huffman, 4 = RLE, 5 = zlib)
//! bits 3..32  decompressed size in bytes
//! ```
//!
//! The payload follows immediately. Huffman blocks are decoded but never
//! written.
//!
//! # Examples
//!
//! ```
//! use l5anim_types::file::compression::{self, Method};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = b"ABABABABABABAB".to_vec();
//! let packed = compression::compress(&data, Method::Lz10)?;
//! assert_eq!(compression::decompress(&packed)?, data);
//! # Ok(())
//! # }
//! ```

mod huffman;
mod lz10;
mod rle;

use std::{
	fmt::Display,
	io::{Read, Write},
};

use flate2::{Compression as ZlibLevel, read::ZlibDecoder, write::ZlibEncoder};
use serde::{Deserialize, Serialize};

use crate::file::{FileType, L5FileError};

/// Size of the block header in bytes
pub const BLOCK_HEADER_SIZE: usize = 4;

/// Largest size representable in the 29-bit size field
pub const MAX_BLOCK_SIZE: usize = (u32::MAX >> 3) as usize;

/// Compression method stored in the low 3 bits of the block header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Method {
	/// Stored without compression
	None = 0,
	/// LZ10 dictionary compression
	#[default]
	Lz10 = 1,
	/// Huffman with 4-bit symbols
	Huffman4 = 2,
	/// Huffman with 8-bit symbols
	Huffman8 = 3,
	/// Run-length encoding
	Rle = 4,
	/// zlib stream
	Zlib = 5,
}

impl TryFrom<u8> for Method {
	type Error = L5FileError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Method::None),
			1 => Ok(Method::Lz10),
			2 => Ok(Method::Huffman4),
			3 => Ok(Method::Huffman8),
			4 => Ok(Method::Rle),
			5 => Ok(Method::Zlib),
			other => Err(L5FileError::UnsupportedCompression(other)),
		}
	}
}

impl Display for Method {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Method::None => write!(f, "None"),
			Method::Lz10 => write!(f, "LZ10"),
			Method::Huffman4 => write!(f, "Huffman4"),
			Method::Huffman8 => write!(f, "Huffman8"),
			Method::Rle => write!(f, "RLE"),
			Method::Zlib => write!(f, "zlib"),
		}
	}
}

/// Block header: decompressed size and method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHeader {
	/// Method used for the payload
	pub method: Method,
	/// Size of the data once decompressed
	pub size: usize,
}

impl BlockHeader {
	/// Parses the header at the start of a compressed block
	pub fn from_bytes(data: &[u8]) -> Result<Self, L5FileError> {
		let Some(bytes) = data.get(..BLOCK_HEADER_SIZE) else {
			return Err(L5FileError::insufficient_data(
				FileType::Compression,
				0,
				BLOCK_HEADER_SIZE,
				data.len(),
			));
		};

		let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
		Ok(Self {
			method: Method::try_from((word & 0x7) as u8)?,
			size: (word >> 3) as usize,
		})
	}

	/// Serializes the header
	pub fn to_bytes(self) -> Result<[u8; BLOCK_HEADER_SIZE], L5FileError> {
		if self.size > MAX_BLOCK_SIZE {
			return Err(L5FileError::OutOfRange {
				field: "compressed block size",
				value: self.size as u64,
				max: MAX_BLOCK_SIZE as u64,
			});
		}

		let word = ((self.size as u32) << 3) | self.method as u32;
		Ok(word.to_le_bytes())
	}
}

/// Byte-buffer transform applied to the internal animation block
///
/// `decompress(compress(x)) == x` must hold for every block the animation
/// encoders produce.
pub trait Compressor {
	/// Compresses a full internal block, header included
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, L5FileError>;

	/// Decompresses the tail of a container
	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, L5FileError>;
}

/// Default [`Compressor`]: writes with a fixed method, reads any supported method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Level5Compressor {
	method: Method,
}

impl Level5Compressor {
	/// Creates a compressor writing with `method`
	pub fn new(method: Method) -> Self {
		Self {
			method,
		}
	}

	/// Method used when compressing
	pub fn method(&self) -> Method {
		self.method
	}
}

impl Compressor for Level5Compressor {
	fn compress(&self, data: &[u8]) -> Result<Vec<u8>, L5FileError> {
		compress(data, self.method)
	}

	fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, L5FileError> {
		decompress(data)
	}
}

/// Decompresses a Level-5 block, dispatching on the method in its header
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, L5FileError> {
	let header = BlockHeader::from_bytes(data)?;
	let payload = &data[BLOCK_HEADER_SIZE..];
	log::debug!("Decompressing {} block: {} -> {} bytes", header.method, payload.len(), header.size);

	let output = match header.method {
		Method::None => {
			let Some(stored) = payload.get(..header.size) else {
				return Err(L5FileError::insufficient_data(
					FileType::Compression,
					BLOCK_HEADER_SIZE,
					header.size,
					payload.len(),
				));
			};
			stored.to_vec()
		}
		Method::Lz10 => lz10::decompress(payload, header.size)?,
		Method::Rle => rle::decompress(payload, header.size)?,
		Method::Zlib => {
			let mut output = Vec::with_capacity(header.size.min(payload.len().saturating_mul(4)));
			ZlibDecoder::new(payload).take(header.size as u64).read_to_end(&mut output)?;
			output
		}
		Method::Huffman4 => huffman::decompress(payload, header.size, huffman::BitDepth::Four)?,
		Method::Huffman8 => huffman::decompress(payload, header.size, huffman::BitDepth::Eight)?,
	};

	if output.len() != header.size {
		log::warn!(
			"{} block announced {} bytes but produced {}",
			header.method,
			header.size,
			output.len()
		);
	}

	Ok(output)
}

/// Compresses `data` with `method`, prefixing the block header
pub fn compress(data: &[u8], method: Method) -> Result<Vec<u8>, L5FileError> {
	let header = BlockHeader {
		method,
		size: data.len(),
	}
	.to_bytes()?;

	let payload = match method {
		Method::None => data.to_vec(),
		Method::Lz10 => lz10::compress(data),
		Method::Rle => rle::compress(data),
		Method::Zlib => {
			let mut encoder = ZlibEncoder::new(Vec::new(), ZlibLevel::default());
			encoder.write_all(data)?;
			encoder.finish()?
		}
		Method::Huffman4 | Method::Huffman8 => {
			return Err(L5FileError::UnsupportedCompression(method as u8));
		}
	};

	let mut output = Vec::with_capacity(BLOCK_HEADER_SIZE + payload.len());
	output.extend_from_slice(&header);
	output.extend_from_slice(&payload);
	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_block() -> Vec<u8> {
		let mut data = Vec::new();
		for i in 0..512u32 {
			data.extend_from_slice(&(i % 7).to_le_bytes());
		}
		data.extend_from_slice(b"tail bytes that do not repeat: 0123456789");
		data
	}

	#[test]
	fn test_header_packs_size_and_method() {
		let header = BlockHeader {
			method: Method::Lz10,
			size: 0x1234,
		};
		let bytes = header.to_bytes().unwrap();
		assert_eq!(u32::from_le_bytes(bytes), (0x1234 << 3) | 1);
		assert_eq!(BlockHeader::from_bytes(&bytes).unwrap(), header);
	}

	#[test]
	fn test_every_writable_method_restores_input() {
		let data = sample_block();
		for method in [Method::None, Method::Lz10, Method::Rle, Method::Zlib] {
			let packed = compress(&data, method).unwrap();
			assert_eq!(packed[0] & 0x7, method as u8);
			assert_eq!(decompress(&packed).unwrap(), data, "method {method}");
		}
	}

	#[test]
	fn test_lz10_shrinks_repetitive_data() {
		let data = sample_block();
		let packed = compress(&data, Method::Lz10).unwrap();
		assert!(packed.len() < data.len() / 2);
	}

	#[test]
	fn test_huffman_blocks_decode() {
		// root with leaves 'A' (bit 0) and 'B' (bit 1), bits 0110
		let block = [0x23, 0, 0, 0, 0x01, 0xC0, b'A', b'B', 0x00, 0x00, 0x00, 0x60];
		assert_eq!(decompress(&block).unwrap(), b"ABBA");

		// nibbles 1 then 2, low nibble first
		let block = [0x0A, 0, 0, 0, 0x01, 0xC0, 0x01, 0x02, 0x00, 0x00, 0x00, 0x40];
		assert_eq!(decompress(&block).unwrap(), [0x21]);
	}

	#[test]
	fn test_huffman_is_not_written() {
		for method in [Method::Huffman4, Method::Huffman8] {
			assert!(matches!(
				compress(b"data", method),
				Err(L5FileError::UnsupportedCompression(tag)) if tag == method as u8
			));
		}
	}

	#[test]
	fn test_oversized_header_fails_without_allocating() {
		// 5-byte blocks announcing the largest size the header can carry
		for method in [Method::Lz10, Method::Rle, Method::Huffman8] {
			let header = BlockHeader {
				method,
				size: MAX_BLOCK_SIZE,
			}
			.to_bytes()
			.unwrap();
			let block = [header.as_slice(), &[0xFF]].concat();
			assert!(decompress(&block).is_err(), "method {method}");
		}
	}

	#[test]
	fn test_zlib_output_stops_at_announced_size() {
		let data = vec![7u8; 4096];
		let mut packed = compress(&data, Method::Zlib).unwrap();
		let short = BlockHeader {
			method: Method::Zlib,
			size: 100,
		}
		.to_bytes()
		.unwrap();
		packed[..BLOCK_HEADER_SIZE].copy_from_slice(&short);

		assert_eq!(decompress(&packed).unwrap(), vec![7u8; 100]);
	}

	#[test]
	fn test_unknown_method_is_rejected() {
		let block = (7u32).to_le_bytes();
		assert!(matches!(decompress(&block), Err(L5FileError::UnsupportedCompression(7))));
	}

	#[test]
	fn test_truncated_header() {
		assert!(matches!(decompress(&[1, 2]), Err(L5FileError::InsufficientData { .. })));
	}

	#[test]
	fn test_trait_object_dispatch() {
		let compressor: &dyn Compressor = &Level5Compressor::new(Method::Rle);
		let data = vec![9u8; 100];
		let packed = compressor.compress(&data).unwrap();
		assert_eq!(compressor.decompress(&packed).unwrap(), data);
	}
}
