//! Signature-keyed debouncing for Tokio.
//!
//! A [`Debouncer`] defers function invocations tagged with an arbitrary
//! serializable "signature". Only the last invocation sharing an equivalent
//! signature within its delay window actually runs; repeated calls for the
//! same signature reset the window, and pending invocations can be cancelled
//! explicitly. Invocations with distinct signatures are fully independent.
//!
//! # Example
//!
//! ```
//! use signature_debouncer::Debouncer;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), signature_debouncer::SignatureError> {
//!     let debouncer = Debouncer::new();
//!
//!     // Only the second call runs; the first is reset before it fires.
//!     debouncer.run(|| println!("saved draft 1"), &("draft", 42), Some(Duration::from_millis(50)))?;
//!     debouncer.run(|| println!("saved draft 2"), &("draft", 42), Some(Duration::from_millis(50)))?;
//!
//!     tokio::time::sleep(Duration::from_millis(80)).await;
//!     Ok(())
//! }
//! ```

pub mod debouncer;
pub mod error;
mod signature;

pub use debouncer::{Debouncer, RunOptions, DEFAULT_DEBOUNCE_MS};
pub use error::SignatureError;
