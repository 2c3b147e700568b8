//! Item-level mutations.
//!
//! Point mutations (append, insert, move, reload) are fail-fast: every id
//! they reference must resolve, and every id they add must be new. They check
//! all of that before touching the snapshot. Bulk removal is best-effort and
//! skips ids that do not resolve.

use std::ops::Range;
use std::panic::Location;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::{Snapshot, check_new_items};
use crate::element::{Identity, Item};
use crate::error::{ElementKind, Error, Result};
use crate::index::ItemPosition;

impl<S: Identity, I: Identity> Snapshot<S, I> {
    /// Append items to the end of the last section.
    ///
    /// # Errors
    /// * `NoSections` - If the snapshot has no sections
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn append_items(&mut self, ids: impl IntoIterator<Item = I>) -> Result<()> {
        let location = Location::caller();
        let Some(section_index) = self.sections.len().checked_sub(1) else {
            return Err(Error::NoSections { location });
        };
        return self.append_items_at(section_index, ids.into_iter().collect(), location);
    }

    /// Append items to the end of the section `section`.
    ///
    /// # Errors
    /// * `NotFound` - If `section` does not exist
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn append_items_into(&mut self, ids: impl IntoIterator<Item = I>, section: &S) -> Result<()> {
        let location = Location::caller();
        let section_index = self.require_section_index(section, location)?;
        return self.append_items_at(section_index, ids.into_iter().collect(), location);
    }

    /// Insert items as one run immediately before `anchor`.
    ///
    /// # Errors
    /// * `NotFound` - If `anchor` does not exist
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn insert_items_before(&mut self, ids: impl IntoIterator<Item = I>, anchor: &I) -> Result<()> {
        return self.insert_items_adjacent(ids.into_iter().collect(), anchor, 0, Location::caller());
    }

    /// Insert items as one run immediately after `anchor`.
    ///
    /// # Errors
    /// * `NotFound` - If `anchor` does not exist
    /// * `Duplicate` - If an id is already present or repeats in `ids`
    #[track_caller]
    pub fn insert_items_after(&mut self, ids: impl IntoIterator<Item = I>, anchor: &I) -> Result<()> {
        return self.insert_items_adjacent(ids.into_iter().collect(), anchor, 1, Location::caller());
    }

    /// Remove every item whose id is in `ids`. Unknown ids are skipped.
    ///
    /// Removals are grouped per section and applied as contiguous index
    /// ranges from the back, so no removal shifts a range still pending.
    pub fn remove_items(&mut self, ids: impl IntoIterator<Item = I>) {
        let ids: FxHashSet<I> = ids.into_iter().collect();
        let mut groups: FxHashMap<usize, SmallVec<[usize; 8]>> = FxHashMap::default();

        let index = self.position_index();
        for id in &ids {
            match index.item_position(id) {
                Some(position) => groups.entry(position.section_index).or_default().push(position.item_index),
                None => trace!(op = "remove_items", ?id, "skipping unknown item"),
            }
        }
        drop(index);

        let mut removed = 0;
        for (section_index, mut indices) in groups {
            indices.sort_unstable();
            let items = self.sections[section_index].items_mut();
            for range in contiguous_ranges(&indices).into_iter().rev() {
                removed += range.len();
                items.drain(range);
            }
        }

        debug!(op = "remove_items", requested = ids.len(), removed);
    }

    /// Remove every item from every section. Sections are kept.
    pub fn remove_all_items(&mut self) {
        for section in &mut self.sections {
            section.items_mut().clear();
        }
        debug!(op = "remove_all_items", sections = self.sections.len());
    }

    /// Move `id` to sit immediately before `anchor`, possibly into another section.
    ///
    /// # Errors
    /// * `NotFound` - If `id` or `anchor` does not exist, or they are the same item
    #[track_caller]
    pub fn move_item_before(&mut self, id: &I, anchor: &I) -> Result<()> {
        return self.move_item(id, anchor, 0, Location::caller());
    }

    /// Move `id` to sit immediately after `anchor`, possibly into another section.
    ///
    /// # Errors
    /// * `NotFound` - If `id` or `anchor` does not exist, or they are the same item
    #[track_caller]
    pub fn move_item_after(&mut self, id: &I, anchor: &I) -> Result<()> {
        return self.move_item(id, anchor, 1, Location::caller());
    }

    /// Mark items reloaded, so they compare unequal on the next diff.
    ///
    /// # Errors
    /// * `NotFound` - If any id does not exist; no item is marked in that case
    #[track_caller]
    pub fn reload_items(&mut self, ids: impl IntoIterator<Item = I>) -> Result<()> {
        let location = Location::caller();

        let index = self.position_index();
        let positions = ids
            .into_iter()
            .map(|id| index.item_position(&id).ok_or_else(|| Error::not_found(ElementKind::Item, &id, location)))
            .collect::<Result<SmallVec<[ItemPosition; 8]>>>()?;
        drop(index);

        for position in &positions {
            self.sections[position.section_index].items_mut()[position.item_index].mark_reloaded();
        }

        debug!(op = "reload_items", count = positions.len());
        return Ok(());
    }

    /// Ids of every item currently marked reloaded, in order.
    pub fn reloaded_item_ids(&self) -> Vec<I> {
        return self
            .sections
            .iter()
            .flat_map(|s| s.items())
            .filter(|item| item.is_reloaded())
            .map(|item| item.id().clone())
            .collect();
    }

    fn append_items_at(
        &mut self,
        section_index: usize,
        ids: Vec<I>,
        location: &'static Location<'static>,
    ) -> Result<()> {
        check_new_items(&self.position_index(), &ids, location)?;

        let count = ids.len();
        let section = &mut self.sections[section_index];
        section.items_mut().extend(ids.into_iter().map(Item::new));

        debug!(op = "append_items", section = ?section.id(), count);
        return Ok(());
    }

    /// Insert `ids` at the anchor's position plus `offset` (0 before, 1 after).
    fn insert_items_adjacent(
        &mut self,
        ids: Vec<I>,
        anchor: &I,
        offset: usize,
        location: &'static Location<'static>,
    ) -> Result<()> {
        let index = self.position_index();
        let position = index
            .item_position(anchor)
            .ok_or_else(|| Error::not_found(ElementKind::Item, anchor, location))?;
        check_new_items(&index, &ids, location)?;
        drop(index);

        let count = ids.len();
        let at = position.item_index + offset;
        self.sections[position.section_index]
            .items_mut()
            .splice(at..at, ids.into_iter().map(Item::new));

        debug!(op = "insert_items", ?anchor, offset, count);
        return Ok(());
    }

    /// Detach `id`, then reinsert it at the anchor's post-removal position plus `offset`.
    fn move_item(
        &mut self,
        id: &I,
        anchor: &I,
        offset: usize,
        location: &'static Location<'static>,
    ) -> Result<()> {
        let index = self.position_index();
        let from = index
            .item_position(id)
            .ok_or_else(|| Error::not_found(ElementKind::Item, id, location))?;
        let anchor_before = index
            .item_position(anchor)
            .ok_or_else(|| Error::not_found(ElementKind::Item, anchor, location))?;
        drop(index);

        // The anchor is resolved against the structure with `id` already
        // detached, where an item can never be its own anchor.
        if id == anchor {
            return Err(Error::not_found(ElementKind::Item, anchor, location));
        }

        let item = self.sections[from.section_index].items_mut().remove(from.item_index);
        let to = position_after_removal(anchor_before, from);
        self.sections[to.section_index]
            .items_mut()
            .insert(to.item_index + offset, item);

        debug!(op = "move_item", ?id, ?anchor, offset);
        return Ok(());
    }
}

/// Where `position` ends up once the item at `removed` has been taken out.
fn position_after_removal(position: ItemPosition, removed: ItemPosition) -> ItemPosition {
    if position.section_index == removed.section_index && position.item_index > removed.item_index {
        return ItemPosition { item_index: position.item_index - 1, ..position };
    }
    return position;
}

/// Split sorted, distinct indices into maximal runs of consecutive values.
fn contiguous_ranges(sorted: &[usize]) -> SmallVec<[Range<usize>; 4]> {
    let mut ranges: SmallVec<[Range<usize>; 4]> = SmallVec::new();
    for &index in sorted {
        match ranges.last_mut() {
            Some(range) if range.end == index => range.end += 1,
            _ => ranges.push(index..index + 1),
        }
    }
    return ranges;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Differentiable;

    type Snap = Snapshot<&'static str, u32>;

    fn layout(snapshot: &Snap) -> Vec<(&'static str, Vec<u32>)> {
        return snapshot
            .sections()
            .iter()
            .map(|s| (*s.id(), s.items().iter().map(|i| *i.id()).collect()))
            .collect();
    }

    fn two_sections() -> Snap {
        let mut snapshot = Snap::with_sections(["A", "B"]).unwrap();
        snapshot.append_items_into([1, 2], &"A").unwrap();
        snapshot.append_items_into([3, 4], &"B").unwrap();
        return snapshot;
    }

    #[test]
    fn contiguous_ranges_coalesces_runs() {
        let ranges = contiguous_ranges(&[0, 1, 2, 5, 7, 8]);
        assert_eq!(ranges.as_slice(), &[0..3, 5..6, 7..9]);
        assert!(contiguous_ranges(&[]).is_empty());
    }

    #[test]
    fn position_after_removal_only_shifts_later_items_of_same_section() {
        let removed = ItemPosition { section_index: 0, item_index: 1 };
        let later = ItemPosition { section_index: 0, item_index: 3 };
        let earlier = ItemPosition { section_index: 0, item_index: 0 };
        let other = ItemPosition { section_index: 1, item_index: 3 };
        assert_eq!(position_after_removal(later, removed).item_index, 2);
        assert_eq!(position_after_removal(earlier, removed), earlier);
        assert_eq!(position_after_removal(other, removed), other);
    }

    #[test]
    fn append_without_target_uses_last_section() {
        let mut snapshot = two_sections();
        snapshot.append_items([5, 6]).unwrap();
        assert_eq!(layout(&snapshot), vec![("A", vec![1, 2]), ("B", vec![3, 4, 5, 6])]);
    }

    #[test]
    fn append_without_sections_fails() {
        let mut snapshot = Snap::new();
        let err = snapshot.append_items([1]).unwrap_err();
        assert!(matches!(err, Error::NoSections { .. }));
    }

    #[test]
    fn append_into_missing_section_fails_without_mutation() {
        let mut snapshot = two_sections();
        let err = snapshot.append_items_into([9], &"Z").unwrap_err();
        assert_eq!(err.kind(), Some(ElementKind::Section));
        assert_eq!(snapshot, two_sections());
    }

    #[test]
    fn append_existing_item_fails() {
        let mut snapshot = two_sections();
        let err = snapshot.append_items_into([5, 3], &"A").unwrap_err();
        assert!(matches!(err, Error::Duplicate { kind: ElementKind::Item, .. }));
        assert_eq!(err.id(), Some("3"));
        assert_eq!(snapshot, two_sections());
    }

    #[test]
    fn append_repeated_ids_fails() {
        let mut snapshot = two_sections();
        assert!(snapshot.append_items([7, 7]).is_err());
        assert_eq!(snapshot, two_sections());
    }

    #[test]
    fn insert_before_and_after() {
        let mut snapshot = two_sections();
        snapshot.insert_items_before([10, 11], &2).unwrap();
        snapshot.insert_items_after([12], &4).unwrap();
        assert_eq!(layout(&snapshot), vec![("A", vec![1, 10, 11, 2]), ("B", vec![3, 4, 12])]);
    }

    #[test]
    fn insert_at_missing_anchor_fails() {
        let mut snapshot = two_sections();
        let err = snapshot.insert_items_after([10], &99).unwrap_err();
        assert_eq!(err.kind(), Some(ElementKind::Item));
        assert_eq!(err.id(), Some("99"));
    }

    #[test]
    fn insert_anchor_itself_is_duplicate() {
        let mut snapshot = two_sections();
        let err = snapshot.insert_items_before([2], &2).unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));
    }

    #[test]
    fn remove_groups_per_section() {
        let mut snapshot = two_sections();
        snapshot.append_items_into([5, 6, 7], &"A").unwrap();
        snapshot.remove_items([1, 2, 6, 4, 99]);
        assert_eq!(layout(&snapshot), vec![("A", vec![5, 7]), ("B", vec![3])]);
    }

    #[test]
    fn remove_all_keeps_sections() {
        let mut snapshot = two_sections();
        snapshot.remove_all_items();
        assert_eq!(layout(&snapshot), vec![("A", vec![]), ("B", vec![])]);
    }

    #[test]
    fn move_within_section() {
        let mut snapshot = two_sections();
        snapshot.append_items_into([5], &"A").unwrap();
        snapshot.move_item_after(&1, &5).unwrap();
        assert_eq!(layout(&snapshot)[0], ("A", vec![2, 5, 1]));
        snapshot.move_item_before(&1, &2).unwrap();
        assert_eq!(layout(&snapshot)[0], ("A", vec![1, 2, 5]));
    }

    #[test]
    fn move_across_sections() {
        let mut snapshot = two_sections();
        snapshot.move_item_after(&1, &4).unwrap();
        assert_eq!(layout(&snapshot), vec![("A", vec![2]), ("B", vec![3, 4, 1])]);
        assert_eq!(snapshot.section_containing(&1), Some(&"B"));
    }

    #[test]
    fn move_keeps_reloaded_flag() {
        let mut snapshot = two_sections();
        snapshot.reload_items([1]).unwrap();
        snapshot.move_item_before(&1, &3).unwrap();
        assert!(snapshot.item(&1).unwrap().is_reloaded());
    }

    #[test]
    fn move_onto_itself_fails_without_mutation() {
        let mut snapshot = two_sections();
        let err = snapshot.move_item_before(&1, &1).unwrap_err();
        assert_eq!(err.kind(), Some(ElementKind::Item));
        assert_eq!(snapshot, two_sections());
    }

    #[test]
    fn move_missing_item_or_anchor_fails() {
        let mut snapshot = two_sections();
        assert_eq!(snapshot.move_item_before(&9, &1).unwrap_err().id(), Some("9"));
        assert_eq!(snapshot.move_item_after(&1, &9).unwrap_err().id(), Some("9"));
        assert_eq!(snapshot, two_sections());
    }

    #[test]
    fn reload_marks_items() {
        let mut snapshot = two_sections();
        let before = snapshot.clone();
        snapshot.reload_items([2]).unwrap();

        let reloaded = snapshot.item(&2).unwrap();
        let untouched = snapshot.item(&1).unwrap();
        assert!(!reloaded.is_content_equal(before.item(&2).unwrap()));
        assert!(untouched.is_content_equal(before.item(&1).unwrap()));
        assert_eq!(snapshot.item_ids(), before.item_ids());
        assert_eq!(snapshot.reloaded_item_ids(), vec![2]);
    }

    #[test]
    fn reload_missing_item_marks_nothing() {
        let mut snapshot = two_sections();
        assert!(snapshot.reload_items([1, 99]).is_err());
        assert!(!snapshot.item(&1).unwrap().is_reloaded());
        assert!(snapshot.reloaded_item_ids().is_empty());
    }
}
