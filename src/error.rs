//! Bootstrap errors.

use thiserror::Error;

use crate::context::BoxError;

/// Reasons a server could not be assembled.
///
/// Any of these aborts bootstrap; no partial router is produced.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("bootstrap: {0}")]
    Provider(#[source] BoxError),

    #[error("bootstrap: nil context")]
    NilContext,

    #[error("bootstrap: expected a context with distinctly named members, got {shape}: {reason}")]
    InvalidShape { shape: &'static str, reason: String },

    /// Two patterns cannot share one matchit tree.
    ///
    /// matchit allows a single dynamic child per segment, so `/{id}` beside
    /// `/{name}` is rejected, and so is a mount beside any route under its
    /// prefix (`MountWeb` with `GetWebByID`): the mount claims
    /// `/web/{*rest}`, which collides with `/web/{id}`.
    #[error("bootstrap: `{member}` cannot be registered at `{pattern}`: {reason}")]
    Conflict {
        member: String,
        pattern: String,
        reason: String,
    },
}
