//! The caller-supplied hash capability set.
//!
//! The core never hard-wires a concrete hash algorithm — see
//! [`Sha256Provider`] below for the one concrete implementation this
//! crate ships, behind the `sha2` feature, for callers (and this
//! crate's own tests) that just want SHA-256.

use crate::error::{Result, SigV4Error};

/// An incremental hash context the signing core can drive.
///
/// `B` and `D`, the hash's block and digest length in bytes, are
/// reported by [`HashProvider::block_len`] and [`HashProvider::digest_len`]
/// rather than fixed as associated constants, since some hash families
/// (truncated variants, keyed variants) report sizes only the concrete
/// instance knows. The engine in [`crate::hmac`] asserts `D <= B` once,
/// at the start of a signing call.
pub trait HashProvider {
    /// Resets the context to begin a new hash computation. Must be safe
    /// to call repeatedly on the same context.
    fn init(&mut self) -> Result<()>;

    /// Feeds `data` into the in-progress hash.
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Finalizes the hash, writing exactly [`HashProvider::digest_len`]
    /// bytes to `out[..digest_len]`.
    ///
    /// `out` is guaranteed by the caller (this crate) to be at least
    /// `digest_len` bytes; implementations need not re-check this, but
    /// must return [`SigV4Error::InsufficientMemory`] if for some reason
    /// they cannot honor it.
    fn finalize(&mut self, out: &mut [u8]) -> Result<()>;

    /// The hash's block length, `B`, in bytes. Must not exceed
    /// [`crate::config::MAX_BLOCK_LEN`].
    fn block_len(&self) -> usize;

    /// The hash's digest length, `D`, in bytes. Must not exceed
    /// [`crate::config::MAX_DIGEST_LEN`], and must be `<= block_len()`.
    fn digest_len(&self) -> usize;
}

/// SHA-256 implementation of [`HashProvider`], backed by RustCrypto's
/// `sha2` crate. Block length 64, digest length 32.
#[cfg(feature = "sha2")]
#[derive(Debug, Default)]
pub struct Sha256Provider {
    inner: sha2::Sha256,
}

#[cfg(feature = "sha2")]
impl Sha256Provider {
    /// Creates a fresh, uninitialized SHA-256 context.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "sha2")]
impl HashProvider for Sha256Provider {
    fn init(&mut self) -> Result<()> {
        use sha2::Digest;
        self.inner = sha2::Sha256::new();
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        use sha2::Digest;
        self.inner.update(data);
        Ok(())
    }

    fn finalize(&mut self, out: &mut [u8]) -> Result<()> {
        use sha2::Digest;
        if out.len() < 32 {
            tracing::debug!(capacity = out.len(), "sha256 finalize: output buffer too small");
            return Err(SigV4Error::InsufficientMemory);
        }
        let digest = core::mem::take(&mut self.inner).finalize();
        out[..32].copy_from_slice(&digest);
        Ok(())
    }

    fn block_len(&self) -> usize {
        64
    }

    fn digest_len(&self) -> usize {
        32
    }
}

#[cfg(all(test, feature = "sha2"))]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_digest() {
        let mut h = Sha256Provider::new();
        h.init().unwrap();
        h.update(b"hello").unwrap();
        let mut out = [0u8; 32];
        h.finalize(&mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
