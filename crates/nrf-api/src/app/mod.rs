//! Shared application state handed to every HTTP handler.

/// The `axum` router's shared state.
pub(crate) mod state;
