//! Canonical signature encoding.
//!
//! Signature equality is defined entirely by this encoding: two signatures
//! are equivalent iff their canonical strings are byte-identical. No deep
//! structural comparison happens anywhere else.

use serde::Serialize;

use crate::error::SignatureError;

/// Encode a signature into its canonical string form.
///
/// The signature is first converted to a `serde_json::Value`, whose object
/// maps keep keys in sorted order, then serialized. Structurally-equal
/// signatures therefore produce identical keys regardless of field
/// declaration or insertion order.
pub(crate) fn canonical_key<S>(signature: &S) -> Result<String, SignatureError>
where
    S: Serialize + ?Sized,
{
    let value = serde_json::to_value(signature)?;
    Ok(serde_json::to_string(&value)?)
}
