use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Prefix GitHub puts in front of the hex digest in `X-Hub-Signature-256`.
const SIGNATURE_PREFIX: &str = "sha256=";

/// Verifies a webhook signature against the raw request body.
///
/// Returns false for an empty body, secret, or signature, for a missing
/// `sha256=` prefix, and for any digest mismatch; it never panics. The hex
/// digests are compared in constant time; only the length check
/// short-circuits, and length is not secret.
pub fn verify_signature(body: &[u8], secret: &str, received: &str) -> bool {
    if body.is_empty() || secret.is_empty() || received.is_empty() {
        return false;
    }
    let Some(received_hex) = received.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    expected.as_bytes().ct_eq(received_hex.as_bytes()).into()
}

/// Computes the full `sha256=<hex>` signature value for a body.
///
/// Counterpart of [`verify_signature`]; used by the test suite and handy
/// for hand-delivering payloads with curl.
pub fn sign(body: &[u8], secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("this should never fail");
    mac.update(body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}
