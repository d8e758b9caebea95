//! Canonical request construction.
//!
//! The canonical request is the deterministic text both sides hash before
//! signing:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! Every function here is pure; a [`CanonicalRequest`] can be built from any
//! thread without coordination.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use sha2::{Digest, Sha256};

use crate::error::AuthError;

/// Everything except the RFC 3986 unreserved characters
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`) is percent-encoded.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A normalized request, ready to be hashed and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri_path: String,
    canonical_query_string: String,
    signed_headers: BTreeMap<String, String>,
    payload_hash: String,
}

impl CanonicalRequest {
    /// Canonicalize a request from its raw body.
    ///
    /// `headers` is exactly the subset of headers to sign. A `None` body is
    /// hashed as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedRequest`] if `method` is empty or `path`
    /// does not start with `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aigc_relay_auth::canonical::CanonicalRequest;
    ///
    /// let request = CanonicalRequest::new(
    ///     "POST",
    ///     "/",
    ///     &[("Version", "2024-12-01"), ("Action", "StartVoiceChat")],
    ///     &[("Host", "rtc.volcengineapi.com")],
    ///     None,
    /// )
    /// .unwrap();
    /// assert_eq!(request.canonical_query_string(), "Action=StartVoiceChat&Version=2024-12-01");
    /// ```
    pub fn new(
        method: &str,
        path: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
        body: Option<&[u8]>,
    ) -> Result<Self, AuthError> {
        Self::with_payload_hash(
            method,
            path,
            query,
            headers,
            hash_payload(body.unwrap_or_default()),
        )
    }

    /// Canonicalize a request whose body hash is already known.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedRequest`] if `method` is empty or `path`
    /// does not start with `/`.
    pub fn with_payload_hash(
        method: &str,
        path: &str,
        query: &[(&str, &str)],
        headers: &[(&str, &str)],
        payload_hash: String,
    ) -> Result<Self, AuthError> {
        if method.trim().is_empty() {
            return Err(AuthError::MalformedRequest("method is empty".to_owned()));
        }
        if !path.starts_with('/') {
            return Err(AuthError::MalformedRequest(format!(
                "path is not absolute: {path:?}"
            )));
        }

        Ok(Self {
            method: method.trim().to_ascii_uppercase(),
            uri_path: build_canonical_uri(path),
            canonical_query_string: build_canonical_query_string(query),
            signed_headers: collect_canonical_headers(headers),
            payload_hash,
        })
    }

    /// The upper-cased HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The percent-encoded URI path.
    #[must_use]
    pub fn uri_path(&self) -> &str {
        &self.uri_path
    }

    /// The sorted, percent-encoded query string.
    #[must_use]
    pub fn canonical_query_string(&self) -> &str {
        &self.canonical_query_string
    }

    /// Signed headers, keyed by lowercase name in sorted order.
    #[must_use]
    pub fn signed_headers(&self) -> &BTreeMap<String, String> {
        &self.signed_headers
    }

    /// Lowercase hex SHA-256 of the body.
    #[must_use]
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// The `;`-separated list of signed header names.
    #[must_use]
    pub fn signed_header_names(&self) -> String {
        self.signed_headers
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Render the canonical request text.
    #[must_use]
    pub fn to_canonical_string(&self) -> String {
        let canonical_headers: String = self
            .signed_headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();

        format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method,
            self.uri_path,
            self.canonical_query_string,
            canonical_headers,
            self.signed_header_names(),
            self.payload_hash
        )
    }

    /// Lowercase hex SHA-256 of the canonical request text.
    #[must_use]
    pub fn hash(&self) -> String {
        hex::encode(Sha256::digest(self.to_canonical_string().as_bytes()))
    }
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes are preserved. Segments are decoded first so that an
/// already-encoded path is not encoded twice.
///
/// # Examples
///
/// ```
/// use aigc_relay_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/"), "/");
/// assert_eq!(build_canonical_uri("/a b"), "/a%20b");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| uri_encode(&percent_decode_str(segment).decode_utf8_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string.
///
/// Parameters are sorted byte-wise by key, then by value for repeated keys.
/// Keys and values are percent-encoded with the unreserved set; an empty value
/// keeps its trailing `=`.
///
/// # Examples
///
/// ```
/// use aigc_relay_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(&[("b", "2"), ("a", "1")]), "a=1&b=2");
/// assert_eq!(build_canonical_query_string(&[("flag", "")]), "flag=");
/// ```
#[must_use]
pub fn build_canonical_query_string(params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_by(|a, b| {
        a.0.as_bytes()
            .cmp(b.0.as_bytes())
            .then_with(|| a.1.as_bytes().cmp(b.1.as_bytes()))
    });

    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Split a raw query string into percent-decoded key/value pairs.
///
/// A parameter without `=` yields an empty value. `+` is taken literally.
#[must_use]
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| {
            let (k, v) = param.split_once('=').unwrap_or((param, ""));
            (
                percent_decode_str(k).decode_utf8_lossy().into_owned(),
                percent_decode_str(v).decode_utf8_lossy().into_owned(),
            )
        })
        .collect()
}

/// Build the signed headers string as a sorted, `;`-separated list of
/// lowercase header names.
///
/// # Examples
///
/// ```
/// use aigc_relay_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(build_signed_headers_string(&["X-Date", "host"]), "host;x-date");
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    let mut sorted: Vec<String> = signed_headers.iter().map(|h| h.to_lowercase()).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(";")
}

/// Compute the SHA-256 hash of a payload as lowercase hex.
///
/// # Examples
///
/// ```
/// use aigc_relay_auth::canonical::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Lowercase names, trim values, collapse inner whitespace, and join repeated
/// headers with commas.
fn collect_canonical_headers(headers: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let lower_name = name.trim().to_lowercase();
        if lower_name.is_empty() {
            continue;
        }
        let trimmed_value = collapse_whitespace(value.trim());
        header_map
            .entry(lower_name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed_value);
            })
            .or_insert(trimmed_value);
    }
    header_map
}

fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Collapse consecutive whitespace characters in a string to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
