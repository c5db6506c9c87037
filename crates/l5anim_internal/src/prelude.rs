//! Prelude module for `l5anim_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use l5anim_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut node = Node::new(0x1234_5678, false);
//! node.add_frame(0, Value::UvMove { u: 0.0, v: 0.5 });
//!
//! let mut track = Track::new(TrackType::UvMove, 1);
//! track.add_node(node).unwrap();
//! ```

// Re-export everything from l5anim_types::prelude
#[doc(inline)]
pub use l5anim_types::prelude::*;

// Re-export the entire l5anim_types module for advanced usage
#[doc(inline)]
pub use l5anim_types;
