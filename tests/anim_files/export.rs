//! JSON export of decoded containers

use l5anim_rs::prelude::*;

fn idle() -> AnimFile {
	let mut anim = AnimFile::new(LayoutVersion::V1);
	anim.name = "idle".to_string();
	anim.frame_count = 30;

	let mut rotation = Track::new(TrackType::BoneRotation, 1);
	let mut node = Node::from_hex("0A0B0C0D", true).unwrap();
	node.add_frame(
		0,
		Value::BoneRotation {
			x: 0.0,
			y: 0.0,
			z: 0.0,
			w: 1.0,
		},
	);
	node.add_frame(
		30,
		Value::BoneRotation {
			x: 0.1,
			y: 0.2,
			z: 0.3,
			w: 0.927,
		},
	);
	rotation.add_node(node).unwrap();
	anim.add_track(rotation).unwrap();

	let mut brightness = Track::new(TrackType::TextureBrightness, 3);
	let mut node = Node::new(0xCAFE_BABE, false);
	node.add_frame(
		15,
		Value::TextureBrightness {
			value: 0.5,
		},
	);
	brightness.add_node(node).unwrap();
	anim.add_track(brightness).unwrap();

	anim
}

#[test]
fn json_round_trip() {
	super::init_logger();

	let anim = idle();
	let json = serde_json::to_string_pretty(&anim).unwrap();
	log::debug!("{json}");

	let restored: AnimFile = serde_json::from_str(&json).unwrap();
	assert_eq!(restored, anim);
}

#[test]
fn json_edit_then_encode() {
	super::init_logger();

	let mut json = serde_json::to_value(idle()).unwrap();
	json["name"] = serde_json::Value::from("idle_edit");
	json["version"] = serde_json::Value::from("V2");

	let edited: AnimFile = serde_json::from_value(json).unwrap();
	let decoded = AnimFile::from_bytes(&edited.to_bytes().unwrap()).unwrap();

	assert_eq!(decoded.name, "idle_edit");
	assert_eq!(decoded.version, LayoutVersion::V2);
	// the brightness node gains a frame at the frame count on save
	let brightness = decoded.track(3).unwrap().node_by_hash(0xCAFE_BABE).unwrap();
	assert_eq!(brightness.frames.len(), 2);
	assert_eq!(brightness.frames[1].key, 30);
}
