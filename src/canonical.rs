//! Assembles the five-section canonical request into the processing
//! buffer: method, canonical URI, canonical query, canonical headers,
//! signed headers, and the hex-lowercase hash of the payload.

use crate::buffer::Cursor;
use crate::config::Limits;
use crate::error::{Result, SigV4Error};
use crate::hash::HashProvider;
use crate::headers;
use crate::hex;
use crate::query;
use crate::uri;

/// Which sections of the request are already in canonical form and
/// should be copied verbatim rather than re-encoded/re-sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub path_is_canonical: bool,
    pub query_is_canonical: bool,
    pub headers_are_canonical: bool,
}

impl Flags {
    /// All three sections already canonical.
    pub fn all_canonical() -> Self {
        Self {
            path_is_canonical: true,
            query_is_canonical: true,
            headers_are_canonical: true,
        }
    }
}

/// Positions recorded while building the canonical request, needed by
/// the orchestrator to later locate the signed-headers list.
pub struct CanonicalRequest {
    /// Total bytes written for the canonical request (the cursor
    /// position right after the payload hash).
    pub len: usize,
    pub signed_headers_start: usize,
    pub signed_headers_len: usize,
}

/// Writes the canonical request into `cursor`, starting at its current
/// position (expected to be 0).
#[allow(clippy::too_many_arguments)]
pub fn build(
    cursor: &mut Cursor<'_>,
    hash: &mut dyn HashProvider,
    method: &[u8],
    path: &[u8],
    query_str: &[u8],
    headers_block: &[u8],
    payload: &[u8],
    service: &[u8],
    flags: Flags,
    limits: Limits,
) -> Result<CanonicalRequest> {
    if method.is_empty() {
        tracing::debug!("canonical request: method is empty");
        return Err(SigV4Error::InvalidParameter);
    }

    // 1. Method.
    cursor.write(method)?;
    cursor.write_u8(b'\n')?;

    // 2. Canonical URI.
    let effective_path: &[u8] = if path.is_empty() { b"/" } else { path };
    if flags.path_is_canonical {
        cursor.write(effective_path)?;
    } else if service == b"s3" {
        // S3 requires exactly one round of percent-encoding.
        let start = cursor.pos();
        let remaining = cursor.remaining();
        let dest = cursor.slice_mut(start, remaining)?;
        let written = uri::encode(effective_path, dest, false, false)?;
        cursor.seek(start + written)?;
    } else {
        // Every other service double-encodes: the builder encodes once,
        // re-encodes that result, and relocates the doubled output back
        // over the first — all within the processing buffer.
        let start = cursor.pos();
        let written = uri::double_encode_in_place(cursor, start, effective_path)?;
        cursor.seek(start + written)?;
    }
    cursor.write_u8(b'\n')?;

    // 3. Canonical query. A pre-canonical `query_str` carries no trailing
    // `\n` of its own — this always appends the single terminating
    // newline, matching `query::canonicalize`'s own output shape.
    if flags.query_is_canonical {
        if query_str.is_empty() {
            cursor.write_u8(b'\n')?;
        } else {
            cursor.write(query_str)?;
            cursor.write_u8(b'\n')?;
        }
    } else {
        query::canonicalize(cursor, query_str, limits.max_query_count)?;
    }

    // 4 & 5. Canonical headers + signed headers.
    if headers_block.is_empty() {
        tracing::debug!("canonical request: headers block is empty");
        return Err(SigV4Error::InvalidParameter);
    }
    let header_result = headers::canonicalize(
        cursor,
        headers_block,
        flags.headers_are_canonical,
        limits.max_header_count,
    )?;

    // 6. Hex lowercase hash of the payload.
    hash.init()?;
    hash.update(payload)?;
    let digest_len = hash.digest_len();
    let mut digest = [0u8; crate::config::MAX_DIGEST_LEN];
    hash.finalize(&mut digest[..digest_len])?;

    let hex_start = cursor.pos();
    let hex_len = digest_len * 2;
    {
        let dest = cursor.slice_mut(hex_start, hex_len)?;
        hex::encode(&digest[..digest_len], dest)?;
    }
    cursor.seek(hex_start + hex_len)?;

    Ok(CanonicalRequest {
        len: cursor.pos(),
        signed_headers_start: header_result.signed_headers_start,
        signed_headers_len: header_result.signed_headers_len,
    })
}
