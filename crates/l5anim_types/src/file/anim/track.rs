//! Tracks: channels of nodes sharing one value kind.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{
	node::{Node, parse_name},
	track_type::TrackType,
};
use crate::file::L5FileError;

/// Channel of animated values sharing one kind, stored in one of four slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
	/// Value kind of every frame in the track
	pub kind: TrackType,
	/// Slot index (0..=3) deciding where the track is laid out on save
	pub index: u8,
	/// Nodes in storage order
	pub nodes: Vec<Node>,
}

impl Track {
	/// Creates an empty track
	pub fn new(kind: TrackType, index: u8) -> Self {
		Self {
			kind,
			index,
			nodes: Vec::new(),
		}
	}

	/// Number of nodes
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns `true` if the track has no nodes
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Finds a node by its 8-digit hex name (case-insensitive)
	pub fn node_by_name(&self, name: &str) -> Option<&Node> {
		let hash = parse_name(name).ok()?;
		self.node_by_hash(hash)
	}

	/// Mutable variant of [`Track::node_by_name`]
	pub fn node_by_name_mut(&mut self, name: &str) -> Option<&mut Node> {
		let hash = parse_name(name).ok()?;
		self.nodes.iter_mut().find(|node| node.name_hash == hash)
	}

	/// Finds a node by name hash
	pub fn node_by_hash(&self, hash: u32) -> Option<&Node> {
		self.nodes.iter().find(|node| node.name_hash == hash)
	}

	/// Returns `true` if a node with this hex name exists
	pub fn node_exists(&self, name: &str) -> bool {
		self.node_by_name(name).is_some()
	}

	/// Appends a node after checking that its values match the track kind
	pub fn add_node(&mut self, node: Node) -> Result<(), L5FileError> {
		if let Some(frame) = node.frames.iter().find(|frame| frame.kind() != self.kind) {
			return Err(L5FileError::ValueKindMismatch {
				expected: self.kind,
				actual: frame.kind(),
			});
		}

		self.nodes.push(node);
		Ok(())
	}
}

impl Display for Track {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Track {}: {} ({} nodes)", self.index, self.kind, self.nodes.len())
	}
}
