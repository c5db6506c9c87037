//! LZ10 dictionary compression.
//!
//! The payload is a sequence of groups: one flag byte followed by eight
//! tokens, most significant flag bit first. A clear bit is a literal byte; a
//! set bit is a two-byte back reference:
//!
//! ```text
//! byte 0: LLLL DDDD   length - 3 (high nibble), displacement - 1 bits 8..12
//! byte 1: DDDD DDDD   displacement - 1 bits 0..8
//! ```

use crate::file::{FileType, L5FileError};

const WINDOW_SIZE: usize = 0x1000;
const MIN_MATCH: usize = 3;
const MAX_MATCH: usize = 18;
/// A flag byte and eight references (17 bytes) expand to at most 144 bytes
const MAX_EXPANSION: usize = 9;

pub(super) fn decompress(payload: &[u8], size: usize) -> Result<Vec<u8>, L5FileError> {
	let mut output = Vec::with_capacity(size.min(payload.len().saturating_mul(MAX_EXPANSION)));
	let mut read = 0usize;

	while output.len() < size {
		let flags = *payload.get(read).ok_or_else(|| truncated(read, payload.len()))?;
		read += 1;

		for bit in (0..8).rev() {
			if output.len() >= size {
				break;
			}

			if flags & (1 << bit) == 0 {
				let byte = *payload.get(read).ok_or_else(|| truncated(read, payload.len()))?;
				output.push(byte);
				read += 1;
				continue;
			}

			let (Some(&high), Some(&low)) = (payload.get(read), payload.get(read + 1)) else {
				return Err(truncated(read, payload.len()));
			};
			read += 2;

			let length = usize::from(high >> 4) + MIN_MATCH;
			let displacement = ((usize::from(high & 0x0F) << 8) | usize::from(low)) + 1;
			if displacement > output.len() {
				return Err(L5FileError::malformed(
					FileType::Compression,
					format!(
						"LZ10 reference {displacement} bytes back at output offset {}",
						output.len()
					),
				));
			}

			let start = output.len() - displacement;
			for i in 0..length {
				if output.len() >= size {
					break;
				}
				// overlapping copies repeat the bytes just written
				output.push(output[start + i]);
			}
		}
	}

	Ok(output)
}

pub(super) fn compress(data: &[u8]) -> Vec<u8> {
	let mut output = Vec::with_capacity(data.len() + data.len() / 8 + 1);
	let mut current = 0usize;

	while current < data.len() {
		let flag_offset = output.len();
		output.push(0u8);
		let mut flags = 0u8;

		for bit in (0..8).rev() {
			if current >= data.len() {
				break;
			}

			let (position, length) = longest_match(data, current);
			if length >= MIN_MATCH {
				let displacement = current - position - 1;
				flags |= 1 << bit;
				output.push((((length - MIN_MATCH) as u8) << 4) | ((displacement >> 8) as u8 & 0x0F));
				output.push((displacement & 0xFF) as u8);
				current += length;
			} else {
				output.push(data[current]);
				current += 1;
			}
		}

		output[flag_offset] = flags;
	}

	output
}

/// Finds the longest earlier occurrence of the bytes at `current` within the window
fn longest_match(data: &[u8], current: usize) -> (usize, usize) {
	let window_start = current.saturating_sub(WINDOW_SIZE);
	let max_length = MAX_MATCH.min(data.len() - current);
	let mut best = (0usize, 0usize);

	if max_length < MIN_MATCH {
		return best;
	}

	for candidate in window_start..current {
		let mut length = 0;
		// matches may run into the bytes being encoded
		while length < max_length && data[candidate + length] == data[current + length] {
			length += 1;
		}

		if length > best.1 {
			best = (candidate, length);
			if length == max_length {
				break;
			}
		}
	}

	best
}

fn truncated(offset: usize, available: usize) -> L5FileError {
	L5FileError::insufficient_data(
		FileType::Compression,
		offset,
		1,
		available.saturating_sub(offset),
	)
}
