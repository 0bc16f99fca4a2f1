//! Engine-level error type.
//!
//! Unsupported access shapes are never errors anywhere in this crate: they
//! are skipped silently and the affected nodes keep their original names.
//! The only failure channel is a precondition violation in pass wiring,
//! which surfaces as [`RenameError`].

use thiserror::Error;

use crate::scramble::tracker::RenameError;

#[derive(Debug, Error)]
pub enum ObfuscateError {
    #[error(transparent)]
    Rename(#[from] RenameError),
}
