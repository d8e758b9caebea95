//! Signature verification.
//!
//! The mirror image of [`RequestSigner`](crate::signer::RequestSigner): given a
//! signed request and a credential store, rebuild the canonical request and
//! check the provided signature.
//!
//! 1. Parse the `Authorization` header to extract the algorithm, credential scope,
//!    signed headers, and provided signature.
//! 2. Reconstruct the canonical request from the HTTP request parts.
//! 3. Build the string to sign from the timestamp, credential scope, and canonical request hash.
//! 4. Derive the signing key from the secret key and credential scope components.
//! 5. Compare the expected and provided signatures in constant time.

use chrono::NaiveDate;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{CanonicalRequest, parse_query_string};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::scheme::SigningScheme;
use crate::signer::{build_string_to_sign, compute_signature};
use crate::signing_key::derive_signing_key;

/// The result of a successful verification.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// The access key id that signed the request.
    pub access_key_id: String,
    /// The region from the credential scope.
    pub region: String,
    /// The service from the credential scope.
    pub service: String,
    /// The headers that were included in the signature.
    pub signed_headers: Vec<String>,
}

/// Parsed components of an `Authorization` header.
///
/// Format:
/// ```text
/// HMAC-SHA256 Credential=AKID/20250101/cn-north-1/rtc/request,
///   SignedHeaders=host;x-content-sha256;x-date,
///   Signature=<hex-signature>
/// ```
#[derive(Debug, Clone)]
pub struct ParsedAuth {
    /// The signing algorithm.
    pub algorithm: String,
    /// The access key id.
    pub access_key_id: String,
    /// The date component of the credential scope (yyyymmdd).
    pub date: String,
    /// The region from the credential scope.
    pub region: String,
    /// The service from the credential scope.
    pub service: String,
    /// The signed header names (lowercase).
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

/// Parse an `Authorization` header value into its components.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the header format is invalid,
/// [`AuthError::UnsupportedAlgorithm`] if the algorithm is not the scheme's, or
/// [`AuthError::InvalidCredentialScope`] if the credential has the wrong shape.
pub fn parse_authorization_header(
    header: &str,
    scheme: &SigningScheme,
) -> Result<ParsedAuth, AuthError> {
    let (algorithm, rest) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;

    if algorithm != scheme.algorithm {
        return Err(AuthError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(AuthError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(AuthError::InvalidAuthHeader)?;
    let signature = signature.ok_or(AuthError::InvalidAuthHeader)?;

    let cred_parts: Vec<&str> = credential.splitn(5, '/').collect();
    if cred_parts.len() != 5 || cred_parts[4] != scheme.scope_terminator {
        return Err(AuthError::InvalidCredentialScope);
    }

    Ok(ParsedAuth {
        algorithm: algorithm.to_owned(),
        access_key_id: cred_parts[0].to_owned(),
        date: cred_parts[1].to_owned(),
        region: cred_parts[2].to_owned(),
        service: cred_parts[3].to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}

/// Verify a signed HTTP request.
///
/// # Errors
///
/// Returns an [`AuthError`] if the `Authorization` header is missing or
/// malformed, the access key is unknown, a signed header is missing, or the
/// signature does not match.
pub fn verify_signed_request(
    parts: &http::request::Parts,
    body_hash: &str,
    credential_provider: &dyn CredentialProvider,
    scheme: &SigningScheme,
) -> Result<AuthResult, AuthError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let parsed = parse_authorization_header(auth_header, scheme)?;
    let secret_key = credential_provider.get_secret_key(&parsed.access_key_id)?;
    let timestamp = extract_header_value(parts, scheme.date_header)?;

    debug!(
        access_key_id = %parsed.access_key_id,
        date = %parsed.date,
        region = %parsed.region,
        service = %parsed.service,
        "Verifying request signature"
    );

    let date = NaiveDate::parse_from_str(&parsed.date, "%Y%m%d")
        .map_err(|_| AuthError::InvalidCredentialScope)?;

    let signed_header_refs: Vec<&str> = parsed.signed_headers.iter().map(String::as_str).collect();
    let header_pairs = collect_signed_headers(parts, &signed_header_refs)?;

    let query = parse_query_string(parts.uri.query().unwrap_or(""));
    let query_refs: Vec<(&str, &str)> = query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let canonical = CanonicalRequest::with_payload_hash(
        parts.method.as_str(),
        parts.uri.path(),
        &query_refs,
        &header_pairs,
        body_hash.to_owned(),
    )?;

    let credential_scope = scheme.credential_scope(&parsed.date, &parsed.region, &parsed.service);
    let string_to_sign =
        build_string_to_sign(scheme.algorithm, &timestamp, &credential_scope, &canonical.hash());

    let signing_key =
        derive_signing_key(scheme, &secret_key, date, &parsed.region, &parsed.service)?;
    let expected_signature = compute_signature(signing_key.as_bytes(), &string_to_sign);

    if parsed
        .signature
        .as_bytes()
        .ct_eq(expected_signature.as_bytes())
        .into()
    {
        debug!(access_key_id = %parsed.access_key_id, "Signature verification succeeded");
        Ok(AuthResult {
            access_key_id: parsed.access_key_id,
            region: parsed.region,
            service: parsed.service,
            signed_headers: parsed.signed_headers,
        })
    } else {
        debug!(
            access_key_id = %parsed.access_key_id,
            provided = %parsed.signature,
            "Signature mismatch"
        );
        Err(AuthError::SignatureDoesNotMatch)
    }
}

fn extract_header_value(parts: &http::request::Parts, name: &str) -> Result<String, AuthError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AuthError::MissingHeader(name.to_owned()))?
        .to_str()
        .map(ToOwned::to_owned)
        .map_err(|_| AuthError::MissingHeader(name.to_owned()))
}

fn collect_signed_headers<'a>(
    parts: &'a http::request::Parts,
    signed_headers: &[&'a str],
) -> Result<Vec<(&'a str, &'a str)>, AuthError> {
    let mut result = Vec::with_capacity(signed_headers.len());

    for &name in signed_headers {
        let value = parts
            .headers
            .get(name)
            .ok_or_else(|| AuthError::MissingHeader(name.to_owned()))?
            .to_str()
            .map_err(|_| AuthError::MissingHeader(name.to_owned()))?;
        result.push((name, value));
    }

    Ok(result)
}
