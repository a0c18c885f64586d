//! Invariants checked before a link row is written.
//!
//! The store enforces the same rules where it can (composite foreign keys,
//! `CHECK` constraints); these checks turn violations into readable 400s
//! instead of opaque constraint errors.

use crate::error::CoreError;
use crate::types::DbId;

/// Both endpoints of a work-scoped link must belong to the same work.
pub fn ensure_same_work(
    what: &'static str,
    expected_work: DbId,
    actual_work: DbId,
) -> Result<(), CoreError> {
    if expected_work == actual_work {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{what} belongs to a different work"
        )))
    }
}

/// A reflexive link (relationship, parent location) may not point at itself.
pub fn ensure_distinct(what: &'static str, a: DbId, b: DbId) -> Result<(), CoreError> {
    if a == b {
        Err(CoreError::Validation(format!("{what} cannot link to itself")))
    } else {
        Ok(())
    }
}

/// Attaching `child` under a parent whose ancestor chain (parent first,
/// root last) is `ancestors` must not close a loop.
pub fn ensure_acyclic(child: DbId, ancestors: &[DbId]) -> Result<(), CoreError> {
    if ancestors.contains(&child) {
        Err(CoreError::Validation(
            "Location cannot be placed inside its own descendant".into(),
        ))
    } else {
        Ok(())
    }
}
