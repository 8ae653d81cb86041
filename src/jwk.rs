use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The key type enum holds type-specific key parameters.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kty")]
pub enum KeyParameters {
    /// RSA keys (e.g., for RS256)
    #[serde(rename = "RSA")]
    Rsa {
        n: String, // Base64URL modulus
        e: String, // Base64URL exponent
        #[serde(skip_serializing_if = "Option::is_none")]
        d: Option<String>, // Base64URL private exponent
    },
    /// EC keys (e.g., for ES256)
    #[serde(rename = "EC")]
    Ec {
        crv: String,
        x: String,
        y: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        d: Option<String>,
    },
    /// Octet key pairs (e.g., Ed25519 for EdDSA)
    #[serde(rename = "OKP")]
    Okp {
        crv: String,
        x: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        d: Option<String>,
    },
    /// Symmetric keys. Always secret material.
    #[serde(rename = "oct")]
    Oct { k: String },
}

impl KeyParameters {
    /// Members consumed by this key type, `kty` included.
    fn members(&self) -> &'static [&'static str] {
        match self {
            KeyParameters::Rsa { .. } => &["kty", "n", "e", "d"],
            KeyParameters::Ec { .. } => &["kty", "crv", "x", "y", "d"],
            KeyParameters::Okp { .. } => &["kty", "crv", "x", "d"],
            KeyParameters::Oct { .. } => &["kty", "k"],
        }
    }
}

/// A JSON Web Key as it appears in the `jwk` header parameter.
#[derive(Debug, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(flatten)]
    pub params: KeyParameters,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "x5u", skip_serializing_if = "Option::is_none")]
    pub x509_url: Option<String>,
    #[serde(rename = "x5c", skip_serializing_if = "Option::is_none")]
    pub x509_certificate_chain: Option<Vec<String>>,
    #[serde(rename = "x5t", skip_serializing_if = "Option::is_none")]
    pub x509_thumbprint_sha1: Option<String>,
    #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
    pub x509_thumbprint_sha256: Option<String>,

    /// Everything else (`ext`, private-use members), kept for display.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub additional: Map<String, Value>,
}

impl Jwk {
    /// Reads a key from its JSON form.
    ///
    /// The catch-all map also sees the members taken by the flattened key
    /// parameters, so those are pruned from it here.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut jwk: Jwk = serde_json::from_value(value)?;
        let members = jwk.params.members();
        jwk.additional.retain(|name, _| !members.contains(&name.as_str()));
        Ok(jwk)
    }

    /// Whether the key carries private or symmetric material, which never
    /// belongs in a header.
    pub fn is_private(&self) -> bool {
        match &self.params {
            KeyParameters::Rsa { d, .. }
            | KeyParameters::Ec { d, .. }
            | KeyParameters::Okp { d, .. } => d.is_some(),
            KeyParameters::Oct { .. } => true,
        }
    }
}
