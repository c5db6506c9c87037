//! Huffman decoding.
//!
//! ```text
//! byte 0          tree size N
//! byte 1          root node
//! bytes 2..2+2N   node table
//! then            u32 little-endian code words, most significant bit first
//! ```
//!
//! A node byte keeps the offset to its child pair in bits 0..6. Bit 7 marks the
//! child taken on a 0 as a leaf, bit 6 the child taken on a 1. Leaves hold the
//! symbol itself. 4-bit symbols pair into bytes low nibble first.

use crate::file::{FileType, L5FileError};

const TREE_OFFSET: usize = 2;

/// Width of the decoded symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BitDepth {
	Four,
	Eight,
}

impl BitDepth {
	fn symbols(self, size: usize) -> usize {
		match self {
			BitDepth::Four => size.saturating_mul(2),
			BitDepth::Eight => size,
		}
	}
}

pub(super) fn decompress(payload: &[u8], size: usize, depth: BitDepth) -> Result<Vec<u8>, L5FileError> {
	let (Some(&tree_size), Some(&root)) = (payload.first(), payload.get(1)) else {
		return Err(L5FileError::insufficient_data(FileType::Compression, 0, TREE_OFFSET, payload.len()));
	};
	let tree_len = usize::from(tree_size) * 2;
	let Some(tree) = payload.get(TREE_OFFSET..TREE_OFFSET + tree_len) else {
		return Err(L5FileError::insufficient_data(
			FileType::Compression,
			TREE_OFFSET,
			tree_len,
			payload.len().saturating_sub(TREE_OFFSET),
		));
	};

	let symbols = depth.symbols(size);
	let mut read = TREE_OFFSET + tree_len;
	// every symbol consumes at least one bit
	let mut decoded = Vec::with_capacity(symbols.min(payload.len().saturating_mul(8)));
	let mut code = 0u32;
	let mut bit = 0usize;
	let mut node = root;
	let mut next = 0usize;

	while decoded.len() < symbols {
		if bit % 32 == 0 {
			let Some(word) = payload.get(read..read + 4) else {
				return Err(L5FileError::insufficient_data(
					FileType::Compression,
					read,
					4,
					payload.len().saturating_sub(read),
				));
			};
			code = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
			read += 4;
		}

		// 2 selects the 0-child, 1 the 1-child
		let direction = if (code >> (31 - bit % 32)) & 1 == 0 { 2 } else { 1 };
		next += (usize::from(node & 0x3F) << 1) + 2;
		let leaf = (node >> (5 + direction)) & 1 != 0;

		node = *tree.get(next - direction).ok_or_else(|| {
			L5FileError::malformed(
				FileType::Compression,
				format!("Huffman node {} outside a {tree_len}-byte tree", next - direction),
			)
		})?;

		if leaf {
			decoded.push(node);
			node = root;
			next = 0;
		}
		bit += 1;
	}

	Ok(match depth {
		BitDepth::Eight => decoded,
		BitDepth::Four => decoded.chunks_exact(2).map(|pair| (pair[0] & 0x0F) | (pair[1] << 4)).collect(),
	})
}
