//! hand-assembled container fixtures

use l5anim_rs::prelude::*;

/// V2 container named "a": one BoneLocation node 11223344 with a single frame,
/// stored without compression
const SINGLE_NODE_V2: &str = concat!(
	// header: magic, decompressed size (0x5C * 2), name offset, data offset, track counts
	"584d544e00000000",
	"b8000000",
	"24000000",
	"54000000",
	"01000000000000000000000000000000",
	// name hash, name, zero padding up to the frame count
	"43beb7e8",
	"61000000000000000000000000000000",
	"000000000000000000000000000000000000000000000000",
	// frame count
	"00000000",
	// block header: 0x5C bytes, method 0
	"e0020000",
	// data header: hash pool, track area, node table
	"0c000000",
	"10000000",
	"38000000",
	// name-hash pool
	"44332211",
	// descriptor pointers
	"1800200028003000",
	// descriptors: BoneLocation / float / 3 components, then three unused slots
	"0102000300000000",
	"0000000000000000",
	"0000000000000000",
	"0000000000000000",
	// node table entry: node data, keys, values, reserved
	"48000000",
	"4c000000",
	"50000000",
	"00000000",
	// node data: name index 0, one frame, key 0 padded to 4 bytes
	"00000100",
	"00000000",
	// value (1.0, 2.0, 3.0)
	"0000803f0000004000004040",
);

fn single_node_anim() -> AnimFile {
	let mut node = Node::new(0x1122_3344, false);
	node.add_frame(
		0,
		Value::BoneLocation {
			x: 1.0,
			y: 2.0,
			z: 3.0,
		},
	);

	let mut track = Track::new(TrackType::BoneLocation, 0);
	track.add_node(node).unwrap();

	let mut anim = AnimFile::new(LayoutVersion::V2);
	anim.name = "a".to_string();
	anim.frame_count = 0;
	anim.add_track(track).unwrap();
	anim
}

#[test]
fn decodes_hand_assembled_v2_container() {
	super::init_logger();

	let bytes = hex::decode(SINGLE_NODE_V2).unwrap();
	let anim = AnimFile::from_bytes(&bytes).unwrap();
	log::info!("{anim}");

	assert_eq!(anim.format, "XMTN");
	assert_eq!(anim.version, LayoutVersion::V2);
	assert_eq!(anim.name, "a");
	assert_eq!(anim, single_node_anim());

	let node = anim.track(0).unwrap().node_by_name("11223344").unwrap();
	assert_eq!(node.frames.len(), 1);
	assert!(!node.is_main_track);
}

#[test]
fn encodes_hand_assembled_v2_container() {
	super::init_logger();

	let bytes = single_node_anim().to_bytes_with_config(&SaveConfig::uncompressed()).unwrap();
	assert_eq!(hex::encode(bytes), SINGLE_NODE_V2);
}

#[test]
fn header_describes_fixture() {
	super::init_logger();

	let bytes = hex::decode(SINGLE_NODE_V2).unwrap();
	let header = AnimHeader::from_bytes(&bytes).unwrap();

	assert_eq!(header.format(), "XMTN");
	assert_eq!(header.decompressed_size(), 0xB8);
	assert_eq!(header.track_counts(), [Some(1), Some(0), Some(0), Some(0)]);
	assert_eq!(header.max_node_hint(), None);
}

#[test]
fn recompressed_fixture_decodes_identically() {
	super::init_logger();

	let anim = AnimFile::from_bytes(&hex::decode(SINGLE_NODE_V2).unwrap()).unwrap();
	for method in [CompressionMethod::Lz10, CompressionMethod::Rle, CompressionMethod::Zlib] {
		let bytes = anim.to_bytes_with_config(&SaveConfig::new(method, HeaderStyle::Auto)).unwrap();
		assert_eq!(AnimFile::from_bytes(&bytes).unwrap(), anim, "{method}");
	}
}

#[test]
fn converts_between_layouts() {
	super::init_logger();

	let mut anim = AnimFile::from_bytes(&hex::decode(SINGLE_NODE_V2).unwrap()).unwrap();
	anim.version = LayoutVersion::V1;

	let v1 = AnimFile::from_bytes(&anim.to_bytes().unwrap()).unwrap();
	assert_eq!(v1.version, LayoutVersion::V1);
	assert_eq!(v1.tracks(), anim.tracks());
}

#[test]
fn rejects_truncated_fixture() {
	super::init_logger();

	let bytes = hex::decode(SINGLE_NODE_V2).unwrap();
	let result = AnimFile::from_bytes(&bytes[..bytes.len() - 12]);
	assert!(matches!(result, Err(L5FileError::InsufficientData { .. })));
}
