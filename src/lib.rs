//! Sectioned - identity-indexed snapshots of grouped lists.
//!
//! A [`Snapshot`] is an ordered list of sections, each holding an ordered
//! list of items. Every section and item carries a caller-supplied identity,
//! unique across the whole snapshot. Snapshots describe the target state of a
//! grouped list; a differencing engine compares two of them through the
//! [`Differentiable`] traits to produce an edit script.
//!
//! # Quick Start
//!
//! ```
//! use sectioned::Snapshot;
//!
//! let mut snapshot: Snapshot<&str, u32> = Snapshot::new();
//! snapshot.append_sections(["A", "B"]).unwrap();
//! snapshot.append_items_into([1, 2], &"A").unwrap();
//! snapshot.append_items_into([3], &"B").unwrap();
//!
//! snapshot.move_item_before(&3, &1).unwrap();
//! assert_eq!(snapshot.item_ids_in_section(&"A").unwrap(), vec![3, 1, 2]);
//! assert_eq!(snapshot.section_containing(&3), Some(&"A"));
//! ```

pub mod element;
pub mod error;
pub mod index;
pub mod snapshot;

pub use element::{Differentiable, DifferentiableSection, Identity, Item, Section};
pub use error::{ElementKind, Error, Result};
pub use index::{ItemLocation, ItemPosition, PositionIndex};
pub use snapshot::Snapshot;
