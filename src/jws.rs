use serde::Deserialize;
use thiserror::Error;

use crate::header::Header;
use crate::segments::decode_base64url;

#[derive(Debug, Error)]
pub enum Error {
    #[error("compact JWS must have three parts, found {0}")]
    PartCount(usize),
    #[error("invalid JSON serialization: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("JSON serialization has no payload")]
    MissingPayload,
    #[error("JSON serialization has no signature")]
    MissingSignature,
    #[error("invalid base64 in {part}: {source}")]
    InvalidBase64 {
        part: &'static str,
        source: base64::DecodeError,
    },
    #[error("protected header is not a JSON object: {0}")]
    InvalidProtectedHeader(#[source] serde_json::Error),
}

/// Content that no signature check backs. The accessors are named so that
/// every call site says so.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unverified<T>(T);

impl<T> Unverified<T> {
    pub fn as_unverified(&self) -> &T {
        &self.0
    }

    pub fn into_unverified(self) -> T {
        self.0
    }
}

/// One signature over the payload.
#[derive(Debug)]
pub struct Signature {
    protected: Option<Header>,
    header: Option<Header>,
    signature: Vec<u8>,
}

impl Signature {
    /// The integrity-protected header, as sent. Not checked against the
    /// signature.
    pub fn unverified_protected(&self) -> Option<Unverified<&Header>> {
        self.protected.as_ref().map(Unverified)
    }

    /// The unprotected header. Never covered by the signature.
    pub fn unverified_header(&self) -> Option<Unverified<&Header>> {
        self.header.as_ref().map(Unverified)
    }

    pub fn signature_bytes(&self) -> &[u8] {
        &self.signature
    }
}

#[derive(Debug)]
pub struct ParsedJws {
    encoded_payload: String,
    payload: Vec<u8>,
    signatures: Vec<Signature>,
}

impl ParsedJws {
    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    /// The decoded payload. No signature has been checked.
    pub fn payload_without_verification(&self) -> Unverified<&[u8]> {
        Unverified(&self.payload)
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }
}

#[derive(Deserialize)]
struct RawSignature {
    protected: Option<String>,
    header: Option<Header>,
    signature: Option<String>,
}

#[derive(Deserialize)]
struct RawJws {
    payload: Option<String>,
    #[serde(default)]
    signatures: Vec<RawSignature>,
    #[serde(flatten)]
    flattened: RawSignature,
}

fn decode(part: &'static str, encoded: &str) -> Result<Vec<u8>, Error> {
    decode_base64url(encoded).map_err(|source| Error::InvalidBase64 { part, source })
}

fn decode_protected(encoded: &str) -> Result<Option<Header>, Error> {
    if encoded.is_empty() {
        return Ok(None);
    }
    let raw = decode("protected header", encoded)?;
    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(Error::InvalidProtectedHeader)
}

fn parse_compact(token: &str) -> Result<ParsedJws, Error> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(Error::PartCount(parts.len()));
    }

    let (protected, payload, signature) = (parts[0], parts[1], parts[2]);

    Ok(ParsedJws {
        encoded_payload: payload.to_string(),
        payload: decode("payload", payload)?,
        signatures: vec![Signature {
            protected: decode_protected(protected)?,
            header: None,
            signature: decode("signature", signature)?,
        }],
    })
}

fn parse_signature(raw: RawSignature) -> Result<Signature, Error> {
    let protected = match raw.protected.as_deref() {
        Some(encoded) => decode_protected(encoded)?,
        None => None,
    };
    let signature = match raw.signature.as_deref() {
        Some(encoded) => decode("signature", encoded)?,
        None => return Err(Error::MissingSignature),
    };

    Ok(Signature {
        protected,
        header: raw.header,
        signature,
    })
}

fn parse_json(token: &str) -> Result<ParsedJws, Error> {
    let raw: RawJws = serde_json::from_str(token).map_err(Error::InvalidJson)?;

    let encoded_payload = raw.payload.ok_or(Error::MissingPayload)?;
    let payload = decode("payload", &encoded_payload)?;

    let signatures = if raw.signatures.is_empty() {
        log::debug!("flattened JSON serialization");
        vec![parse_signature(raw.flattened)?]
    } else {
        log::debug!("general JSON serialization");
        raw.signatures
            .into_iter()
            .map(parse_signature)
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(ParsedJws {
        encoded_payload,
        payload,
        signatures,
    })
}

/// Parses a JWS in compact, general JSON, or flattened JSON serialization.
/// Headers are passed through as-is; nothing is verified.
pub fn parse(token: &str) -> Result<ParsedJws, Error> {
    let parsed = if token.starts_with('{') {
        parse_json(token)?
    } else {
        log::debug!("compact serialization");
        parse_compact(token)?
    };

    log::debug!("parsed {} signature(s)", parsed.signatures.len());
    Ok(parsed)
}
