//! HMAC, built from nothing but a [`HashProvider`] — no assumption that
//! the caller's hash implementation exposes (or even has) a keyed-hash
//! primitive of its own.
//!
//! The engine keeps a single working key buffer of size `B` (the hash's
//! block length) and walks through four phases: accumulate key material,
//! hash it down if it overflows `B`, pad and XOR it into the inner/outer
//! pads, and drive the hash twice (RFC 2104). Every call this crate
//! makes to [`hmac`] already has the full key and message in hand, so
//! [`hmac`] below drives the phases in one shot rather than exposing
//! them as a multi-call streaming API.

use crate::config::MAX_BLOCK_LEN;
use crate::error::{Result, SigV4Error};
use crate::hash::HashProvider;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Computes `HMAC(key, message)` using `hash` as the only cryptographic
/// primitive, writing `hash.digest_len()` bytes to `out`.
///
/// Asserts `digest_len <= block_len` once — this crate never constructs
/// a [`HashProvider`] where that does not hold, so this is a diagnostic
/// failure path, not load-bearing validation of caller input.
pub fn hmac(hash: &mut dyn HashProvider, key: &[u8], message: &[u8], out: &mut [u8]) -> Result<()> {
    let block_len = hash.block_len();
    let digest_len = hash.digest_len();

    if block_len > MAX_BLOCK_LEN || digest_len > block_len {
        tracing::debug!(block_len, digest_len, "hash provider block/digest length out of bounds");
        return Err(SigV4Error::Hash);
    }
    if out.len() < digest_len {
        tracing::debug!(digest_len, capacity = out.len(), "hmac output buffer too small");
        return Err(SigV4Error::InsufficientMemory);
    }

    let mut working_key = [0u8; MAX_BLOCK_LEN];

    // Append key material. A key longer than the block length is hashed
    // down to a digest-sized key first (RFC 2104 §2); the remainder of
    // `working_key` past `digest_len` stays zero, which is exactly the
    // zero-padding the "begin data" phase below needs.
    let key_len = if key.len() > block_len {
        hash.init()?;
        hash.update(key)?;
        hash.finalize(&mut working_key[..digest_len])?;
        digest_len
    } else {
        working_key[..key.len()].copy_from_slice(key);
        key.len()
    };
    // Any bytes beyond `key_len` (up to `block_len`) are the implicit
    // zero-pad RFC 2104 requires; `working_key` started zeroed and
    // nothing above wrote past `key_len`.
    let _ = key_len;

    // Begin data: ipad the working key, hash it, then the message.
    let mut inner = [0u8; MAX_BLOCK_LEN];
    for i in 0..block_len {
        inner[i] = working_key[i] ^ IPAD;
    }
    hash.init()?;
    hash.update(&inner[..block_len])?;
    hash.update(message)?;
    let mut inner_digest = [0u8; crate::config::MAX_DIGEST_LEN];
    hash.finalize(&mut inner_digest[..digest_len])?;

    // Finalize: opad the same working key, hash it, then the inner digest.
    let mut outer = [0u8; MAX_BLOCK_LEN];
    for i in 0..block_len {
        outer[i] = working_key[i] ^ OPAD;
    }
    hash.init()?;
    hash.update(&outer[..block_len])?;
    hash.update(&inner_digest[..digest_len])?;
    hash.finalize(&mut out[..digest_len])?;

    Ok(())
}

#[cfg(all(test, feature = "sha2"))]
mod tests {
    use super::*;
    use crate::hash::Sha256Provider;

    fn run(key: &[u8], message: &[u8]) -> String {
        let mut hash = Sha256Provider::new();
        let mut out = [0u8; 32];
        hmac(&mut hash, key, message, &mut out).unwrap();
        hex::encode(out)
    }

    #[test]
    fn matches_rfc4231_case_1() {
        // RFC 4231 test case 1: HMAC-SHA-256, 20-byte key.
        let key = [0x0bu8; 20];
        assert_eq!(
            run(&key, b"Hi There"),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn key_exactly_block_len_does_not_hash_down() {
        // A 64-byte key (exactly SHA-256's block length) must be used
        // as-is, zero-padded, not routed through the hash-down path.
        let key = [0x0bu8; 64];
        assert_eq!(
            run(&key, b"Hi There"),
            "21cd586aeca0579d99a1c938127c92525a371f807bc5ba6eb78bc825bd4f2be3"
        );
    }

    #[test]
    fn matches_rfc4231_case_oversized_key() {
        // RFC 4231 test case 6: key longer than the block size (131 bytes),
        // exercising the hash-down path.
        let key = [0xaau8; 131];
        let message = b"Test Using Larger Than Block-Size Key - Hash Key First";
        assert_eq!(
            run(&key, message),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn sigv4_signing_key_derivation_matches_aws_example() {
        // AWS SigV4 test suite derived signing key for 2015-08-30 /
        // us-east-1 / iam / aws4_request with the published example
        // secret key.
        let secret = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";
        let k_secret = format!("AWS4{secret}");

        let mut hash = Sha256Provider::new();
        let mut k_date = [0u8; 32];
        hmac(&mut hash, k_secret.as_bytes(), b"20150830", &mut k_date).unwrap();

        let mut k_region = [0u8; 32];
        hmac(&mut hash, &k_date, b"us-east-1", &mut k_region).unwrap();

        let mut k_service = [0u8; 32];
        hmac(&mut hash, &k_region, b"iam", &mut k_service).unwrap();

        let mut k_signing = [0u8; 32];
        hmac(&mut hash, &k_service, b"aws4_request", &mut k_signing).unwrap();

        assert_eq!(
            hex::encode(k_signing),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }
}
