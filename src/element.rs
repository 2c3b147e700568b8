//! Element records stored in a snapshot.
//!
//! An [`Item`] is one row, a [`Section`] is one group of rows. Both carry a
//! caller-supplied identity and a reloaded flag. Records are only created by
//! the snapshot's append and insert operations and only destroyed by its
//! remove operations.
//!
//! # Content equality
//!
//! A differencing engine compares two snapshots element by element. Elements
//! with the same identity are paired up, then [`Differentiable::is_content_equal`]
//! decides whether the pair is unchanged or must be reloaded. Marking an
//! element reloaded forces that predicate to fail even though the identity
//! still matches.

use std::fmt::Debug;
use std::hash::Hash;

/// Bound for caller-supplied section and item identities.
///
/// Equality and hashing come from the identity type itself, so custom `Eq`
/// and `Hash` implementations are honored. `Debug` is only used to name the
/// identity in error messages.
pub trait Identity: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Identity for T {}

/// An element a differencing engine can pair up and compare.
pub trait Differentiable {
    type Id: Identity;

    /// The stable identity used to pair elements across snapshots.
    fn differentiable_id(&self) -> &Self::Id;

    /// True if `self` and `other` can be treated as unchanged.
    fn is_content_equal(&self, other: &Self) -> bool;
}

/// A differentiable element that owns an ordered run of child elements.
pub trait DifferentiableSection: Differentiable {
    type Element: Differentiable;

    fn elements(&self) -> &[Self::Element];
}

/// One row of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item<I> {
    id: I,
    is_reloaded: bool,
}

impl<I> Item<I> {
    pub(crate) fn new(id: I) -> Item<I> {
        return Item { id, is_reloaded: false };
    }

    pub fn id(&self) -> &I {
        return &self.id;
    }

    pub fn is_reloaded(&self) -> bool {
        return self.is_reloaded;
    }

    pub(crate) fn mark_reloaded(&mut self) {
        self.is_reloaded = true;
    }
}

impl<I: Identity> Differentiable for Item<I> {
    type Id = I;

    fn differentiable_id(&self) -> &I {
        return &self.id;
    }

    fn is_content_equal(&self, other: &Self) -> bool {
        return !self.is_reloaded && !other.is_reloaded && self.id == other.id;
    }
}

/// One group of rows of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section<S, I> {
    id: S,
    items: Vec<Item<I>>,
    is_reloaded: bool,
}

impl<S, I> Section<S, I> {
    pub(crate) fn new(id: S) -> Section<S, I> {
        return Section { id, items: Vec::new(), is_reloaded: false };
    }

    pub fn id(&self) -> &S {
        return &self.id;
    }

    /// Items of this section, in display order.
    pub fn items(&self) -> &[Item<I>] {
        return &self.items;
    }

    pub fn is_reloaded(&self) -> bool {
        return self.is_reloaded;
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item<I>> {
        return &mut self.items;
    }

    pub(crate) fn mark_reloaded(&mut self) {
        self.is_reloaded = true;
    }
}

impl<S: Identity, I: Identity> Differentiable for Section<S, I> {
    type Id = S;

    fn differentiable_id(&self) -> &S {
        return &self.id;
    }

    /// Only the section record itself is compared; item changes are reported
    /// by diffing the elements.
    fn is_content_equal(&self, other: &Self) -> bool {
        return !self.is_reloaded && !other.is_reloaded && self.id == other.id;
    }
}

impl<S: Identity, I: Identity> DifferentiableSection for Section<S, I> {
    type Element = Item<I>;

    fn elements(&self) -> &[Item<I>] {
        return &self.items;
    }
}
