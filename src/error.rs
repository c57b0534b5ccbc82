//! Error types for debouncer operations.

use thiserror::Error;

/// Errors surfaced synchronously by [`Debouncer`](crate::Debouncer) operations.
///
/// The only failure mode is a signature that cannot be canonicalized, e.g. a
/// map with non-string keys. Errors raised by the caller-supplied function
/// itself propagate inside the timer task, never through this type.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The signature could not be serialized into its canonical form.
    #[error("signature cannot be canonicalized: {0}")]
    Encode(#[from] serde_json::Error),
}
