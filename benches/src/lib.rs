//! Benchmark helper utilities for l5anim-rs
//!
//! This module provides generators for synthetic animation containers. The
//! shapes mimic a character clip: a bone rig with location, rotation and
//! scale tracks keyed every few frames.

use l5anim_types::file::{
	AnimFile, L5FileError, LayoutVersion, Node, SaveConfig, Track, TrackType, Value,
};

/// Shape of a generated animation
#[derive(Debug, Clone, Copy)]
pub struct RigShape {
	/// Bones per track
	pub bones: usize,
	/// Last frame index
	pub frame_count: u16,
	/// Distance between keyed frames
	pub key_step: u16,
}

impl RigShape {
	/// Small clip: 16 bones, 30 frames
	pub const SMALL: Self = Self {
		bones: 16,
		frame_count: 30,
		key_step: 3,
	};

	/// Large clip: 64 bones, 240 frames
	pub const LARGE: Self = Self {
		bones: 64,
		frame_count: 240,
		key_step: 4,
	};

	/// Total number of nodes across the generated tracks
	pub fn node_count(&self) -> usize {
		self.bones * 3
	}
}

/// Generates an animation with bone location, rotation and scale tracks
pub fn generate_rig(shape: RigShape, version: LayoutVersion) -> AnimFile {
	let mut anim = AnimFile::new(version);
	anim.name = format!("bench_{}x{}", shape.bones, shape.frame_count);
	anim.frame_count = u32::from(shape.frame_count);

	let kinds = [TrackType::BoneLocation, TrackType::BoneRotation, TrackType::BoneScale];
	for (slot, kind) in kinds.into_iter().enumerate() {
		let mut track = Track::new(kind, slot as u8);
		for bone in 0..shape.bones {
			let mut node = Node::new(0x4000_0000 | bone as u32, bone == 0);
			for key in (0..=shape.frame_count).step_by(usize::from(shape.key_step.max(1))) {
				node.add_frame(key, sample_value(kind, bone, key));
			}
			// rig construction only produces matching kinds
			let _ = track.add_node(node);
		}
		let _ = anim.add_track(track);
	}

	anim
}

/// Encodes a generated rig to container bytes
pub fn generate_container(
	shape: RigShape,
	version: LayoutVersion,
	config: &SaveConfig,
) -> Result<Vec<u8>, L5FileError> {
	generate_rig(shape, version).to_bytes_with_config(config)
}

fn sample_value(kind: TrackType, bone: usize, key: u16) -> Value {
	let t = f32::from(key) / 30.0 + bone as f32 * 0.1;
	match kind {
		TrackType::BoneRotation => {
			let half = t * 0.5;
			Value::BoneRotation {
				x: 0.0,
				y: half.sin(),
				z: 0.0,
				w: half.cos(),
			}
		}
		TrackType::BoneScale => Value::BoneScale {
			x: 1.0,
			y: 1.0 + t.sin() * 0.1,
			z: 1.0,
		},
		_ => Value::BoneLocation {
			x: t.cos(),
			y: bone as f32,
			z: t.sin(),
		},
	}
}
