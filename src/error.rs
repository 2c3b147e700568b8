//! Errors raised by snapshot mutations and queries.
//!
//! Every error here is a precondition violation: the caller referenced an
//! identity that is not in the snapshot, or tried to introduce one that
//! already is. None of them are retriable. Operations that fail leave the
//! snapshot exactly as it was.

use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Result type alias using the snapshot [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which level of the snapshot an identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Item,
    Section,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Item => write!(f, "item"),
            ElementKind::Section => write!(f, "section"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{kind} not found: {id} (called at {location})")]
    NotFound {
        kind: ElementKind,
        id: String,
        location: &'static Location<'static>,
    },

    #[error("no sections to append items into (called at {location})")]
    NoSections {
        location: &'static Location<'static>,
    },

    #[error("{kind} already exists: {id} (called at {location})")]
    Duplicate {
        kind: ElementKind,
        id: String,
        location: &'static Location<'static>,
    },
}

impl Error {
    pub(crate) fn not_found(
        kind: ElementKind,
        id: &impl fmt::Debug,
        location: &'static Location<'static>,
    ) -> Error {
        return Error::NotFound { kind, id: format!("{:?}", id), location };
    }

    pub(crate) fn duplicate(
        kind: ElementKind,
        id: &impl fmt::Debug,
        location: &'static Location<'static>,
    ) -> Error {
        return Error::Duplicate { kind, id: format!("{:?}", id), location };
    }

    /// The kind of element the error refers to, if any.
    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            Error::NotFound { kind, .. } | Error::Duplicate { kind, .. } => Some(*kind),
            Error::NoSections { .. } => None,
        }
    }

    /// The offending identity, rendered with its `Debug` implementation.
    pub fn id(&self) -> Option<&str> {
        match self {
            Error::NotFound { id, .. } | Error::Duplicate { id, .. } => Some(id),
            Error::NoSections { .. } => None,
        }
    }

    /// Source location of the call that failed.
    pub fn location(&self) -> &'static Location<'static> {
        match self {
            Error::NotFound { location, .. }
            | Error::NoSections { location }
            | Error::Duplicate { location, .. } => location,
        }
    }
}
