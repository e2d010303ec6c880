//! Errors raised while building a router.

use thiserror::Error;

/// A route table that cannot be compiled.
///
/// There is no safe partial table, so any of these aborts construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A splat (`*`) fragment that is not the last fragment of its path.
    #[error(
        "route splat (*) can only be at the end of a path, found in `{path}`; maybe you wanted a wildcard (:name) instead?"
    )]
    SplatNotLast {
        /// The offending path, as declared.
        path: String,
    },

    /// A route without a path and without children.
    #[error("empty path without children is not allowed; use a splat (*) for a catch-all")]
    EmptyRoute,
}

/// Errors returned when constructing a [`Router`](crate::prelude::Router).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// The route declarations could not be compiled.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Rendering non-interactively without knowing which path to render.
    #[error("a starting path must be provided when rendering non-interactively")]
    MissingStartingPath,
}
