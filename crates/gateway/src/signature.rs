//! Payment callback signature verification.
//!
//! The gateway signs the completion callback with
//! `HMAC_SHA256(secret, "<gateway_order_id>|<gateway_payment_id>")`,
//! hex-encoded. Verification recomputes the digest and compares in
//! constant time; a mismatch is a normal outcome (tampering or forgery),
//! not an error.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

fn digest(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(gateway_payment_id.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Computes the hex-encoded callback signature for the given pair.
pub fn sign(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
    hex::encode(digest(secret, gateway_order_id, gateway_payment_id))
}

/// Verifies a callback signature.
///
/// Returns true only when `signature` is the hex encoding of the expected
/// HMAC. The comparison runs in constant time over the decoded bytes;
/// malformed hex verifies as false.
pub fn verify(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature: &str,
) -> bool {
    let expected = digest(secret, gateway_order_id, gateway_payment_id);
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    expected.ct_eq(&provided).into()
}
