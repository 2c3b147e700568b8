//! Section-level mutations, mirroring the item-level ones one level up.
//!
//! Two differ in failure handling from their item counterparts: removal is
//! a sequence of independent single removals, and reload skips unknown ids
//! instead of failing.

use std::panic::Location;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::Snapshot;
use crate::element::{Identity, Section};
use crate::error::{ElementKind, Error, Result};

impl<S: Identity, I: Identity> Snapshot<S, I> {
    /// Append empty sections after all existing ones.
    ///
    /// # Errors
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn append_sections(&mut self, ids: impl IntoIterator<Item = S>) -> Result<()> {
        let ids: Vec<S> = ids.into_iter().collect();
        self.check_new_sections(&ids, Location::caller())?;

        let count = ids.len();
        self.sections.extend(ids.into_iter().map(Section::new));

        debug!(op = "append_sections", count);
        return Ok(());
    }

    /// Insert empty sections as one run immediately before `anchor`.
    ///
    /// # Errors
    /// * `NotFound` - If `anchor` does not exist
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn insert_sections_before(&mut self, ids: impl IntoIterator<Item = S>, anchor: &S) -> Result<()> {
        return self.insert_sections_adjacent(ids.into_iter().collect(), anchor, 0, Location::caller());
    }

    /// Insert empty sections as one run immediately after `anchor`.
    ///
    /// # Errors
    /// * `NotFound` - If `anchor` does not exist
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn insert_sections_after(&mut self, ids: impl IntoIterator<Item = S>, anchor: &S) -> Result<()> {
        return self.insert_sections_adjacent(ids.into_iter().collect(), anchor, 1, Location::caller());
    }

    /// Remove sections one id at a time, together with their items.
    /// Unknown ids are skipped.
    pub fn remove_sections(&mut self, ids: impl IntoIterator<Item = S>) {
        let mut removed = 0usize;
        for id in ids {
            match self.index_of_section(&id) {
                Some(index) => {
                    self.sections.remove(index);
                    removed += 1;
                }
                None => trace!(op = "remove_sections", ?id, "skipping unknown section"),
            }
        }
        debug!(op = "remove_sections", removed);
    }

    /// Move section `id`, with its items, to sit immediately before `anchor`.
    ///
    /// # Errors
    /// * `NotFound` - If `id` or `anchor` does not exist, or they are the same section
    #[track_caller]
    pub fn move_section_before(&mut self, id: &S, anchor: &S) -> Result<()> {
        return self.move_section(id, anchor, 0, Location::caller());
    }

    /// Move section `id`, with its items, to sit immediately after `anchor`.
    ///
    /// # Errors
    /// * `NotFound` - If `id` or `anchor` does not exist, or they are the same section
    #[track_caller]
    pub fn move_section_after(&mut self, id: &S, anchor: &S) -> Result<()> {
        return self.move_section(id, anchor, 1, Location::caller());
    }

    /// Mark sections reloaded. Unknown ids are skipped.
    pub fn reload_sections(&mut self, ids: impl IntoIterator<Item = S>) {
        let mut reloaded = 0usize;
        for id in ids {
            match self.index_of_section(&id) {
                Some(index) => {
                    self.sections[index].mark_reloaded();
                    reloaded += 1;
                }
                None => trace!(op = "reload_sections", ?id, "skipping unknown section"),
            }
        }
        debug!(op = "reload_sections", reloaded);
    }

    fn insert_sections_adjacent(
        &mut self,
        ids: Vec<S>,
        anchor: &S,
        offset: usize,
        location: &'static Location<'static>,
    ) -> Result<()> {
        let anchor_index = self.require_section_index(anchor, location)?;
        self.check_new_sections(&ids, location)?;

        let count = ids.len();
        let at = anchor_index + offset;
        self.sections.splice(at..at, ids.into_iter().map(Section::new));

        debug!(op = "insert_sections", ?anchor, offset, count);
        return Ok(());
    }

    fn move_section(
        &mut self,
        id: &S,
        anchor: &S,
        offset: usize,
        location: &'static Location<'static>,
    ) -> Result<()> {
        let from = self.require_section_index(id, location)?;
        let anchor_before = self.require_section_index(anchor, location)?;

        // Same rule as for items: the anchor is resolved with `id` detached.
        if id == anchor {
            return Err(Error::not_found(ElementKind::Section, anchor, location));
        }

        let section = self.sections.remove(from);
        let to = if anchor_before > from { anchor_before - 1 } else { anchor_before };
        self.sections.insert(to + offset, section);

        debug!(op = "move_section", ?id, ?anchor, offset);
        return Ok(());
    }

    /// Ids of every section currently marked reloaded.
    pub fn reloaded_section_ids(&self) -> SmallVec<[S; 4]> {
        return self
            .sections
            .iter()
            .filter(|s| s.is_reloaded())
            .map(|s| s.id().clone())
            .collect();
    }
}
