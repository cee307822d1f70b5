//! Revision arithmetic shared by every versioned record kind
//!
//! The store owns persistence and locking; this module owns the pure part of
//! "apply change and snapshot" and "rollback to revision N": which fields a
//! patch touches, how the version advances, and which fields a rollback
//! restores.

use crate::model::EntityKind;

/// A record with a live row, an integer version starting at 1, and a
/// history of superseded revisions.
pub trait Versioned: Clone {
    /// Sparse partial update: only supplied fields change
    type Patch;

    const KIND: EntityKind;

    fn id(&self) -> &str;

    fn version(&self) -> u32;

    fn set_version(&mut self, version: u32);

    /// Apply the supplied fields of `patch`. Must not touch id, version or creation time.
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// Overwrite every mutable field with the snapshot's values.
    /// Must not touch id, version or creation time.
    fn restore_fields(&mut self, snapshot: &Self);
}

/// The revision that replaces `current` once `patch` is applied.
pub fn next_revision<T: Versioned>(current: &T, patch: &T::Patch) -> T {
    let mut next = current.clone();
    next.apply_patch(patch);
    next.set_version(current.version() + 1);
    next
}

/// The live row after rolling `current` back to `snapshot`.
pub fn restored_revision<T: Versioned>(current: &T, snapshot: &T) -> T {
    let mut restored = current.clone();
    restored.restore_fields(snapshot);
    restored.set_version(snapshot.version());
    restored
}
