//! Little-endian byte cursors used by the container codecs.
//!
//! [`ByteReader`] walks a borrowed slice with absolute seeks; every read is
//! bounds-checked and reports [`L5FileError::InsufficientData`] instead of
//! panicking. [`ByteWriter`] builds a buffer with absolute seeks, zero-filling
//! any gap left by a seek past the current end.

use super::{FileType, L5FileError};

/// Bounds-checked reader over a byte slice
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
	data: &'a [u8],
	position: usize,
	file_type: FileType,
}

impl<'a> ByteReader<'a> {
	/// Creates a reader positioned at offset 0
	pub fn new(data: &'a [u8], file_type: FileType) -> Self {
		Self {
			data,
			position: 0,
			file_type,
		}
	}

	/// Current absolute position
	pub fn position(&self) -> usize {
		self.position
	}

	/// Total length of the underlying buffer
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the underlying buffer is empty
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Moves to an absolute offset. Seeking past the end is allowed; the next read fails.
	pub fn seek(&mut self, position: usize) {
		self.position = position;
	}

	/// Bytes from the current position to the end
	pub fn remaining(&self) -> &'a [u8] {
		self.data.get(self.position..).unwrap_or(&[])
	}

	/// Reads `count` bytes and advances
	pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], L5FileError> {
		let bytes = self.bytes_at(self.position, count)?;
		self.position += count;
		Ok(bytes)
	}

	/// Reads a fixed-size array and advances
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], L5FileError> {
		let mut array = [0u8; N];
		array.copy_from_slice(self.read_bytes(N)?);
		Ok(array)
	}

	/// Reads an unsigned byte
	pub fn read_u8(&mut self) -> Result<u8, L5FileError> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads a little-endian `u16`
	pub fn read_u16(&mut self) -> Result<u16, L5FileError> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i16`
	pub fn read_i16(&mut self) -> Result<i16, L5FileError> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `u32`
	pub fn read_u32(&mut self) -> Result<u32, L5FileError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i32`
	pub fn read_i32(&mut self) -> Result<i32, L5FileError> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `f32`
	pub fn read_f32(&mut self) -> Result<f32, L5FileError> {
		Ok(f32::from_le_bytes(self.read_array()?))
	}

	/// Reads `count` consecutive `u32` values
	pub fn read_u32_vec(&mut self, count: usize) -> Result<Vec<u32>, L5FileError> {
		// validate the whole span first so a huge count fails before allocating
		let bytes = self.read_bytes(count.saturating_mul(4))?;
		Ok(bytes
			.chunks_exact(4)
			.map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
			.collect())
	}

	/// Reads `count` consecutive `u16` values
	pub fn read_u16_vec(&mut self, count: usize) -> Result<Vec<u16>, L5FileError> {
		let bytes = self.read_bytes(count.saturating_mul(2))?;
		Ok(bytes.chunks_exact(2).map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]])).collect())
	}

	/// Reads a little-endian `u32` at `offset` without moving the cursor
	pub fn peek_u32_at(&self, offset: usize) -> Result<u32, L5FileError> {
		let bytes = self.bytes_at(offset, 4)?;
		Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
	}

	/// Reads a little-endian `u16` at `offset` without moving the cursor
	pub fn peek_u16_at(&self, offset: usize) -> Result<u16, L5FileError> {
		let bytes = self.bytes_at(offset, 2)?;
		Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
	}

	/// Reads a zero-terminated byte string that may not extend past `limit`.
	///
	/// The terminator is consumed when present. Reaching `limit` (clamped to the
	/// buffer length) ends the string without error.
	pub fn read_cstr(&mut self, limit: usize) -> Result<&'a [u8], L5FileError> {
		let end = limit.min(self.data.len());
		if self.position > end {
			return Err(L5FileError::insufficient_data(
				self.file_type,
				self.position,
				1,
				0,
			));
		}

		let window = &self.data[self.position..end];
		match window.iter().position(|&b| b == 0) {
			Some(length) => {
				self.position += length + 1;
				Ok(&window[..length])
			}
			None => {
				self.position = end;
				Ok(window)
			}
		}
	}

	fn bytes_at(&self, offset: usize, count: usize) -> Result<&'a [u8], L5FileError> {
		offset
			.checked_add(count)
			.and_then(|end| self.data.get(offset..end))
			.ok_or_else(|| {
				L5FileError::insufficient_data(
					self.file_type,
					offset,
					count,
					self.data.len().saturating_sub(offset),
				)
			})
	}
}

/// Growable writer with absolute positioning
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
	data: Vec<u8>,
	position: usize,
}

impl ByteWriter {
	/// Creates an empty writer
	pub fn new() -> Self {
		Self::default()
	}

	/// Current absolute position
	pub fn position(&self) -> usize {
		self.position
	}

	/// Length of the written buffer
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if nothing has been written
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Moves to an absolute offset
	pub fn seek(&mut self, position: usize) {
		self.position = position;
	}

	/// Writes raw bytes at the current position, overwriting or extending the buffer
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		let end = self.position + bytes.len();
		if self.data.len() < end {
			self.data.resize(end, 0);
		}
		self.data[self.position..end].copy_from_slice(bytes);
		self.position = end;
	}

	/// Writes an unsigned byte
	pub fn write_u8(&mut self, value: u8) {
		self.write_bytes(&[value]);
	}

	/// Writes a little-endian `u16`
	pub fn write_u16(&mut self, value: u16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Writes a little-endian `i16`
	pub fn write_i16(&mut self, value: i16) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Writes a little-endian `u32`
	pub fn write_u32(&mut self, value: u32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Writes a little-endian `i32`
	pub fn write_i32(&mut self, value: i32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Writes a little-endian `f32`
	pub fn write_f32(&mut self, value: f32) {
		self.write_bytes(&value.to_le_bytes());
	}

	/// Pads with zero bytes until the position is a multiple of `alignment`
	pub fn align(&mut self, alignment: usize) {
		let remainder = self.position % alignment;
		if remainder != 0 {
			let padding = alignment - remainder;
			self.write_bytes(&vec![0u8; padding]);
		}
	}

	/// Consumes the writer and returns the buffer
	pub fn into_inner(self) -> Vec<u8> {
		self.data
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_past_end_reports_offset() {
		let data = [1u8, 2, 3];
		let mut reader = ByteReader::new(&data, FileType::Animation);
		reader.seek(2);

		match reader.read_u16() {
			Err(L5FileError::InsufficientData {
				offset,
				expected,
				actual,
				..
			}) => {
				assert_eq!(offset, 2);
				assert_eq!(expected, 2);
				assert_eq!(actual, 1);
			}
			other => panic!("Expected InsufficientData, got {other:?}"),
		}
	}

	#[test]
	fn test_peek_does_not_move_cursor() {
		let data = 0x0Cu32.to_le_bytes();
		let reader = ByteReader::new(&data, FileType::Animation);
		assert_eq!(reader.peek_u32_at(0).unwrap(), 0x0C);
		assert_eq!(reader.position(), 0);
	}

	#[test]
	fn test_cstr_bounded_by_limit() {
		let data = b"ABCDEFGH\0";
		let mut reader = ByteReader::new(data, FileType::Animation);
		assert_eq!(reader.read_cstr(4).unwrap(), b"ABCD");
		assert_eq!(reader.position(), 4);

		let mut reader = ByteReader::new(data, FileType::Animation);
		assert_eq!(reader.read_cstr(64).unwrap(), b"ABCDEFGH");
		assert_eq!(reader.position(), 9);
	}

	#[test]
	fn test_writer_zero_fills_gaps() {
		let mut writer = ByteWriter::new();
		writer.seek(4);
		writer.write_u16(0xBEEF);
		writer.seek(0);
		writer.write_u8(0x11);

		assert_eq!(writer.into_inner(), vec![0x11, 0, 0, 0, 0xEF, 0xBE]);
	}

	#[test]
	fn test_align() {
		let mut writer = ByteWriter::new();
		writer.write_u16(1);
		writer.align(4);
		assert_eq!(writer.position(), 4);
		writer.align(4);
		assert_eq!(writer.position(), 4);
	}
}
