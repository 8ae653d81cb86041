use base64::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("error parsing base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("error indenting json: {0}")]
    Indent(#[source] serde_json::Error),
}

/// One dot-delimited piece of a compact token.
pub struct Segment<'a> {
    pub index: usize,
    pub encoded: &'a str,
    pub decoded: Result<Vec<u8>, base64::DecodeError>,
}

impl Segment<'_> {
    /// Re-indents the decoded bytes as two-space JSON.
    pub fn indented(&self) -> Result<String, SegmentError> {
        let raw = self.decoded.as_ref().map_err(|e| SegmentError::Decode(e.clone()))?;
        let value: serde_json::Value = serde_json::from_slice(raw).map_err(SegmentError::Indent)?;
        serde_json::to_string_pretty(&value).map_err(SegmentError::Indent)
    }
}

/// Decodes a base64url string, tolerating trailing `=` padding.
pub fn decode_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64_URL_SAFE_NO_PAD.decode(s.trim_end_matches('=').as_bytes())
}

/// Splits `token` on `.` and decodes every piece independently.
///
/// Empty pieces are kept, so `a..b` yields three segments, the middle one
/// decoding to no bytes.
pub fn split_and_decode(token: &str) -> Vec<Segment<'_>> {
    token
        .split('.')
        .enumerate()
        .map(|(index, encoded)| Segment {
            index,
            encoded,
            decoded: decode_base64url(encoded),
        })
        .collect()
}
