//! Run-length encoding.
//!
//! Each token starts with a flag byte. With bit 7 set the next byte is
//! repeated `(flag & 0x7F) + 3` times; otherwise `(flag & 0x7F) + 1` literal
//! bytes follow.

use crate::file::{FileType, L5FileError};

const MIN_RUN: usize = 3;
const MAX_RUN: usize = 0x7F + MIN_RUN;
const MAX_LITERALS: usize = 0x7F + 1;
/// A two-byte run token expands to at most `MAX_RUN` bytes
const MAX_EXPANSION: usize = MAX_RUN.div_ceil(2);

pub(super) fn decompress(payload: &[u8], size: usize) -> Result<Vec<u8>, L5FileError> {
	let mut output = Vec::with_capacity(size.min(payload.len().saturating_mul(MAX_EXPANSION)));
	let mut read = 0usize;

	while output.len() < size {
		let Some(&flag) = payload.get(read) else {
			return Err(L5FileError::insufficient_data(FileType::Compression, read, 1, 0));
		};
		read += 1;

		let count = usize::from(flag & 0x7F);
		if flag & 0x80 != 0 {
			let Some(&value) = payload.get(read) else {
				return Err(L5FileError::insufficient_data(FileType::Compression, read, 1, 0));
			};
			read += 1;
			output.extend(std::iter::repeat_n(value, count + MIN_RUN));
		} else {
			let length = count + 1;
			let Some(literals) = payload.get(read..read + length) else {
				return Err(L5FileError::insufficient_data(
					FileType::Compression,
					read,
					length,
					payload.len().saturating_sub(read),
				));
			};
			output.extend_from_slice(literals);
			read += length;
		}
	}

	output.truncate(size);
	Ok(output)
}

pub(super) fn compress(data: &[u8]) -> Vec<u8> {
	let mut output = Vec::with_capacity(data.len() + data.len() / MAX_LITERALS + 1);
	let mut literals_start = 0usize;
	let mut current = 0usize;

	while current < data.len() {
		let run = data[current..].iter().take(MAX_RUN).take_while(|&&b| b == data[current]).count();

		if run >= MIN_RUN {
			flush_literals(&mut output, &data[literals_start..current]);
			output.push(0x80 | (run - MIN_RUN) as u8);
			output.push(data[current]);
			current += run;
			literals_start = current;
		} else {
			current += 1;
		}
	}

	flush_literals(&mut output, &data[literals_start..]);
	output
}

fn flush_literals(output: &mut Vec<u8>, literals: &[u8]) {
	for chunk in literals.chunks(MAX_LITERALS) {
		output.push((chunk.len() - 1) as u8);
		output.extend_from_slice(chunk);
	}
}
