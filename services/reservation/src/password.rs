//! Password hashing for the credential store
//!
//! Passwords are hashed with PBKDF2-HMAC-SHA256 over a fresh random 16-byte
//! salt and stored as `hex(salt)$hex(hash)`. Verification recomputes the
//! derivation with the stored salt and compares in constant time; malformed
//! stored values verify as false rather than erroring.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const OUTPUT_LEN: usize = 32;

/// Derive a salted hash for a password, encoded as `hex(salt)$hex(hash)`.
pub fn hash(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut out = [0u8; OUTPUT_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, ITERATIONS, &mut out);

    format!("{}${}", hex::encode(salt), hex::encode(out))
}

/// Verify a candidate password against a stored `hex(salt)$hex(hash)` value.
///
/// Returns false on any malformed stored value.
pub fn verify(stored: &str, candidate: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(hash_hex) else {
        return false;
    };
    if expected.len() != OUTPUT_LEN {
        return false;
    }

    // Derive and constant-time compare.
    let mut out = [0u8; OUTPUT_LEN];
    pbkdf2_hmac::<Sha256>(candidate.as_bytes(), &salt, ITERATIONS, &mut out);
    subtle::ConstantTimeEq::ct_eq(out.as_slice(), expected.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let stored = hash("correct horse battery staple");
        assert!(verify(&stored, "correct horse battery staple"));
        assert!(!verify(&stored, "correct horse battery stapler"));
    }

    #[test]
    fn test_hash_format_and_fresh_salt() {
        let a = hash("pw123");
        let b = hash("pw123");
        // Fresh salt per call: same password, different encodings
        assert_ne!(a, b);

        let (salt_hex, hash_hex) = a.split_once('$').expect("missing delimiter");
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert_eq!(hash_hex.len(), OUTPUT_LEN * 2);
    }

    #[test]
    fn test_malformed_stored_values_verify_false() {
        assert!(!verify("", "pw"));
        assert!(!verify("no-delimiter", "pw"));
        assert!(!verify("zz$zz", "pw"));
        assert!(!verify("abcd$1234", "pw"));
    }
}
