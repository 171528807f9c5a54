use serde::de::DeserializeOwned;

use crate::error::{GerritLabelError, Result};

/// Magic prefix Gerrit puts in front of every JSON response to defeat XSSI.
pub const XSSI_PREFIX: &[u8] = b")]}'\n";

/// Strips the anti-XSSI prefix and parses the remainder as JSON.
///
/// `url` is only used to describe the failure when the prefix is missing.
pub fn decode_body<T>(url: &str, body: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let payload = body
        .strip_prefix(XSSI_PREFIX)
        .ok_or_else(|| GerritLabelError::MissingXssiPrefix {
            url: url.to_string(),
        })?;

    Ok(serde_json::from_slice(payload)?)
}
