//! Payment callback authenticity.
//!
//! Razorpay signs checkout completions with HMAC-SHA256 over
//! `"{order_id}|{payment_id}"` keyed by the account secret, hex-encoded.
//! A `status=captured` from a redirect or webhook must not be trusted until
//! this check passes.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase-hex HMAC-SHA256 of `"{order_id}|{payment_id}"`.
pub fn expected_signature(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a vendor-supplied signature against the computed one.
///
/// Any mismatch, including a length mismatch, is `false`; never fails for
/// well-formed string inputs.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> bool {
    let expected = expected_signature(order_id, payment_id, secret);
    constant_time_compare(&expected, signature)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
