//! The snapshot: an ordered list of sections, each an ordered list of items.
//!
//! A [`Snapshot`] describes the target state of a grouped list before it is
//! compared against a previous state. It is a plain value: cloning it deep
//! copies every section and item, so two snapshots never observe each other's
//! mutations.
//!
//! Invariants, upheld by every public operation:
//!
//! - an item id appears at most once in the whole snapshot, not just within
//!   its section
//! - a section id appears at most once
//! - order is insertion order unless changed by a move
//! - the reloaded flag is only set by a reload and only cleared by removing
//!   and re-adding the element
//!
//! Mutations live in [`items`] and [`sections`]; this module holds
//! construction, queries and the shared precondition checks.

use std::panic::Location;

use rustc_hash::FxHashSet;

use crate::element::{Identity, Item, Section};
use crate::error::{ElementKind, Error, Result};
use crate::index::{PositionIndex, section_index};

pub mod items;
pub mod sections;

/// Two-level ordered collection of identified sections and items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<S, I> {
    sections: Vec<Section<S, I>>,
}

impl<S, I> Default for Snapshot<S, I> {
    fn default() -> Self {
        return Snapshot { sections: Vec::new() };
    }
}

impl<S: Identity, I: Identity> Snapshot<S, I> {
    /// Create an empty snapshot.
    pub fn new() -> Snapshot<S, I> {
        return Snapshot::default();
    }

    /// Create a snapshot holding empty sections with the given ids, in order.
    #[track_caller]
    pub fn with_sections(ids: impl IntoIterator<Item = S>) -> Result<Snapshot<S, I>> {
        let mut snapshot = Snapshot::new();
        snapshot.append_sections(ids)?;
        return Ok(snapshot);
    }

    /// All sections, in order. This is what a differencing engine consumes.
    pub fn sections(&self) -> &[Section<S, I>] {
        return &self.sections;
    }

    /// Build a position index over the current state.
    ///
    /// The index borrows the snapshot, so it cannot be held across a mutation.
    pub fn position_index(&self) -> PositionIndex<'_, S, I> {
        return PositionIndex::build(&self.sections);
    }

    pub fn section_ids(&self) -> Vec<S> {
        return self.sections.iter().map(|s| s.id().clone()).collect();
    }

    /// Every item id, section by section, in order.
    pub fn item_ids(&self) -> Vec<I> {
        return self
            .sections
            .iter()
            .flat_map(|s| s.items())
            .map(|item| item.id().clone())
            .collect();
    }

    /// Item ids of one section, in order.
    ///
    /// # Errors
    /// * `NotFound` - If no section has this id
    #[track_caller]
    pub fn item_ids_in_section(&self, id: &S) -> Result<Vec<I>> {
        let section = self.require_section(id, Location::caller())?;
        return Ok(section.items().iter().map(|item| item.id().clone()).collect());
    }

    /// The id of the section holding `id`, or `None` if no section does.
    pub fn section_containing(&self, id: &I) -> Option<&S> {
        return self.position_index().item(id).map(|location| location.section.id());
    }

    pub fn number_of_sections(&self) -> usize {
        return self.sections.len();
    }

    pub fn number_of_items(&self) -> usize {
        return self.sections.iter().map(|s| s.items().len()).sum();
    }

    /// # Errors
    /// * `NotFound` - If no section has this id
    #[track_caller]
    pub fn number_of_items_in_section(&self, id: &S) -> Result<usize> {
        let section = self.require_section(id, Location::caller())?;
        return Ok(section.items().len());
    }

    /// True if the snapshot has no sections.
    pub fn is_empty(&self) -> bool {
        return self.sections.is_empty();
    }

    pub fn index_of_section(&self, id: &S) -> Option<usize> {
        return section_index(&self.sections, id);
    }

    /// Position of an item in the flattened, section-major item order.
    pub fn index_of_item(&self, id: &I) -> Option<usize> {
        let position = self.position_index().item_position(id)?;
        let before: usize = self.sections[..position.section_index]
            .iter()
            .map(|s| s.items().len())
            .sum();
        return Some(before + position.item_index);
    }

    pub fn section(&self, id: &S) -> Option<&Section<S, I>> {
        return self.sections.iter().find(|s| s.id() == id);
    }

    pub fn item(&self, id: &I) -> Option<&Item<I>> {
        return self.sections.iter().flat_map(|s| s.items()).find(|item| item.id() == id);
    }

    pub fn contains_section(&self, id: &S) -> bool {
        return self.index_of_section(id).is_some();
    }

    pub fn contains_item(&self, id: &I) -> bool {
        return self.item(id).is_some();
    }

    fn require_section(
        &self,
        id: &S,
        location: &'static Location<'static>,
    ) -> Result<&Section<S, I>> {
        return self.section(id).ok_or_else(|| Error::not_found(ElementKind::Section, id, location));
    }

    fn require_section_index(&self, id: &S, location: &'static Location<'static>) -> Result<usize> {
        return self
            .index_of_section(id)
            .ok_or_else(|| Error::not_found(ElementKind::Section, id, location));
    }

    /// Fail if any of `ids` is already a section, or repeats within `ids`.
    fn check_new_sections(&self, ids: &[S], location: &'static Location<'static>) -> Result<()> {
        let mut seen = FxHashSet::default();
        for id in ids {
            if !seen.insert(id) || self.contains_section(id) {
                return Err(Error::duplicate(ElementKind::Section, id, location));
            }
        }
        return Ok(());
    }
}

/// Fail if any of `ids` is already indexed, or repeats within `ids`.
fn check_new_items<S: Identity, I: Identity>(
    index: &PositionIndex<'_, S, I>,
    ids: &[I],
    location: &'static Location<'static>,
) -> Result<()> {
    let mut seen = FxHashSet::default();
    for id in ids {
        if !seen.insert(id) || index.contains_item(id) {
            return Err(Error::duplicate(ElementKind::Item, id, location));
        }
    }
    return Ok(());
}
