//! Percent-encoding of locators embedded in the viewer address.

use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("percent-decoded bytes are not UTF-8: {0}")]
pub struct DecodeError(#[from] FromUtf8Error);

/// Encodes every byte outside `A-Z a-z 0-9 - _ . ~`.
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Decodes `%XX` escapes. Malformed escapes are kept literally; invalid UTF-8 is an error.
pub fn decode_component(s: &str) -> Result<String, DecodeError> {
    Ok(urlencoding::decode(s)?.into_owned())
}
