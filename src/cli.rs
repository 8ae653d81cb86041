use clap::Parser;
/// An unverified JWS inspector
/// Dumps the segments, per-signature headers, and payload of a JSON Web Signature.
/// Nothing printed is checked against a key.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct JwsoxArgs {
    /// The JWS to inspect, in compact or JSON serialization.
    /// If not provided (or "-"), it will be read from stdin.
    #[clap(name = "JWS")]
    pub jws_string: Option<String>,

    /// No color output
    #[clap(long = "no-color", short = 'n')]
    pub no_color: bool,

    /// Only print the protected and unprotected headers of each signature
    #[clap(long = "headers-only", short = 'H', conflicts_with = "payload_only")]
    pub headers_only: bool,

    /// Only print the unverified payload
    #[clap(long = "payload-only", short = 'p', conflicts_with = "headers_only")]
    pub payload_only: bool,
}
