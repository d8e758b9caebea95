//! Constants that distinguish one HMAC-SHA256 signing family from another.

/// The fixed strings of a canonical-request signing family.
///
/// The key-derivation chain, canonical request layout, and string-to-sign are
/// shared; only these constants differ between the remote endpoint's scheme
/// and the SigV4 scheme it descends from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningScheme {
    /// Algorithm id that opens the string to sign and the `Authorization` value.
    pub algorithm: &'static str,
    /// Marker prepended to the secret key before the first HMAC step.
    pub key_marker: &'static str,
    /// Last component of the credential scope and last HMAC input of the chain.
    pub scope_terminator: &'static str,
    /// Name of the header carrying the request timestamp. Matched case-insensitively.
    pub date_header: &'static str,
    /// Name of the header carrying the hex body hash. Matched case-insensitively.
    pub content_hash_header: &'static str,
}

impl SigningScheme {
    /// Scheme accepted by the voice-agent control plane.
    pub const VOLCENGINE: Self = Self {
        algorithm: "HMAC-SHA256",
        key_marker: "",
        scope_terminator: "request",
        date_header: "x-date",
        content_hash_header: "x-content-sha256",
    };

    /// AWS Signature Version 4.
    pub const AWS4: Self = Self {
        algorithm: "AWS4-HMAC-SHA256",
        key_marker: "AWS4",
        scope_terminator: "aws4_request",
        date_header: "x-amz-date",
        content_hash_header: "x-amz-content-sha256",
    };

    /// Build the credential scope `date/region/service/terminator`.
    #[must_use]
    pub fn credential_scope(&self, date: &str, region: &str, service: &str) -> String {
        format!("{date}/{region}/{service}/{}", self.scope_terminator)
    }
}

impl Default for SigningScheme {
    fn default() -> Self {
        Self::VOLCENGINE
    }
}
