//! Position index: identity to structural location.
//!
//! The index is derived from the live sections by a full pass over every
//! item, O(total items) in time and space. It borrows the sections it was
//! built from, so it can never outlive a mutation of them: a stale index is a
//! compile error rather than a silent wrong answer.
//!
//! Section lookup does not need the full pass. Sections are few, and
//! [`section_index`] scans them directly.

use rustc_hash::FxHashMap;

use crate::element::{Identity, Item, Section};

/// Where an item sits: index of its section, and index within that section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemPosition {
    pub section_index: usize,
    pub item_index: usize,
}

/// A resolved item together with the records it was resolved to.
#[derive(Debug)]
pub struct ItemLocation<'a, S, I> {
    pub position: ItemPosition,
    pub section: &'a Section<S, I>,
    pub item: &'a Item<I>,
}

// Manual impls: deriving would demand `S: Copy, I: Copy`.
impl<S, I> Clone for ItemLocation<'_, S, I> {
    fn clone(&self) -> Self {
        return *self;
    }
}

impl<S, I> Copy for ItemLocation<'_, S, I> {}

/// Map from item identity to its position in a borrowed list of sections.
#[derive(Debug)]
pub struct PositionIndex<'a, S, I> {
    sections: &'a [Section<S, I>],
    items: FxHashMap<&'a I, ItemPosition>,
}

impl<'a, S: Identity, I: Identity> PositionIndex<'a, S, I> {
    /// Index every item of `sections`.
    pub fn build(sections: &'a [Section<S, I>]) -> PositionIndex<'a, S, I> {
        let total: usize = sections.iter().map(|s| s.items().len()).sum();
        let mut items = FxHashMap::with_capacity_and_hasher(total, Default::default());

        for (section_index, section) in sections.iter().enumerate() {
            for (item_index, item) in section.items().iter().enumerate() {
                let previous = items.insert(item.id(), ItemPosition { section_index, item_index });
                debug_assert!(previous.is_none(), "duplicate item id {:?}", item.id());
            }
        }

        return PositionIndex { sections, items };
    }

    #[inline]
    pub fn item_position(&self, id: &I) -> Option<ItemPosition> {
        return self.items.get(id).copied();
    }

    /// Resolve an item id to its position and records.
    pub fn item(&self, id: &I) -> Option<ItemLocation<'a, S, I>> {
        let position = self.item_position(id)?;
        let section = &self.sections[position.section_index];
        let item = &section.items()[position.item_index];
        return Some(ItemLocation { position, section, item });
    }

    #[inline]
    pub fn contains_item(&self, id: &I) -> bool {
        return self.items.contains_key(id);
    }

    #[inline]
    pub fn section_index(&self, id: &S) -> Option<usize> {
        return section_index(self.sections, id);
    }

    /// Number of indexed items.
    #[inline]
    pub fn len(&self) -> usize {
        return self.items.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }
}

/// Top-level index of the section with identity `id`.
pub fn section_index<S: Identity, I>(sections: &[Section<S, I>], id: &S) -> Option<usize> {
    return sections.iter().position(|section| section.id() == id);
}
