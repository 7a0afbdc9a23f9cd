//! RFC 3986 percent-encoding for SigV4 canonical requests.

use crate::error::{Result, SigV4Error};

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}

/// Percent-encodes `input` into `out`, returning the number of bytes
/// written.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) are copied verbatim.
/// `/` is copied verbatim when `encode_slash` is false; otherwise it
/// becomes `%2F`. Every other byte becomes `%XX` with uppercase hex.
/// When `double_encode_equals` is set, `=` is written as the
/// already-percent-encoded `%3D` re-encoded, i.e. `%253D`.
///
/// Fails with [`SigV4Error::InsufficientMemory`] as soon as the next
/// encoded character would not fit.
pub fn encode(input: &[u8], out: &mut [u8], encode_slash: bool, double_encode_equals: bool) -> Result<usize> {
    let mut written = 0usize;
    for &byte in input {
        if byte == b'=' && double_encode_equals {
            let encoded = b"%253D";
            if out.len() - written < encoded.len() {
                tracing::debug!(written, capacity = out.len(), "uri encode: insufficient room for double-encoded '='");
                return Err(SigV4Error::InsufficientMemory);
            }
            out[written..written + encoded.len()].copy_from_slice(encoded);
            written += encoded.len();
        } else if byte == b'/' && !encode_slash {
            if out.len() - written < 1 {
                tracing::debug!(written, capacity = out.len(), "uri encode: insufficient room for literal '/'");
                return Err(SigV4Error::InsufficientMemory);
            }
            out[written] = byte;
            written += 1;
        } else if is_unreserved(byte) {
            if out.len() - written < 1 {
                tracing::debug!(written, capacity = out.len(), "uri encode: insufficient room for unreserved byte");
                return Err(SigV4Error::InsufficientMemory);
            }
            out[written] = byte;
            written += 1;
        } else {
            if out.len() - written < 3 {
                tracing::debug!(written, capacity = out.len(), "uri encode: insufficient room for %XX escape");
                return Err(SigV4Error::InsufficientMemory);
            }
            out[written] = b'%';
            out[written + 1] = UPPER_HEX[(byte >> 4) as usize];
            out[written + 2] = UPPER_HEX[(byte & 0x0F) as usize];
            written += 3;
        }
    }
    Ok(written)
}

/// Encodes `input` twice in place within `buf`, starting at `start`.
///
/// First encodes into `buf[start..]`, then re-encodes that result into
/// the tail of the remaining buffer, then relocates the doubled output
/// back to `start`. Returns the total length of the doubly-encoded
/// result. Used by [`crate::canonical`] for non-S3 canonical URIs.
pub fn double_encode_in_place(
    buf: &mut crate::buffer::Cursor<'_>,
    start: usize,
    input: &[u8],
) -> Result<usize> {
    let cap = buf.capacity();
    if start > cap {
        tracing::debug!(start, capacity = cap, "double-encode start past buffer capacity");
        return Err(SigV4Error::InsufficientMemory);
    }

    let first_len = {
        let dest = buf.slice_mut(start, cap - start)?;
        encode(input, dest, false, false)?
    };

    let second_start = start + first_len;
    if second_start > cap {
        tracing::debug!(second_start, capacity = cap, "double-encode second pass start past buffer capacity");
        return Err(SigV4Error::InsufficientMemory);
    }
    let second_len = {
        // `first_encoded` borrows `buf[start..start+first_len]` and
        // `dest` borrows `buf[second_start..]`; disjoint because
        // `second_start >= start + first_len`, so both can be live at
        // once and `encode` can read one while writing the other.
        let (first_encoded, dest) = buf.split_read_write(start, first_len, second_start)?;
        encode(first_encoded, dest, false, false)?
    };

    buf.relocate(second_start, start, second_len)?;
    Ok(second_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_str(s: &str, encode_slash: bool, double_encode_equals: bool) -> String {
        let mut out = vec![0u8; s.len() * 6 + 8];
        let n = encode(s.as_bytes(), &mut out, encode_slash, double_encode_equals).unwrap();
        String::from_utf8(out[..n].to_vec()).unwrap()
    }

    #[test]
    fn unreserved_passes_through() {
        assert_eq!(encode_str("abcXYZ019-_.~", true, false), "abcXYZ019-_.~");
    }

    #[test]
    fn slash_encoded_when_requested() {
        assert_eq!(encode_str("/a/b", true, false), "%2Fa%2Fb");
        assert_eq!(encode_str("/a/b", false, false), "/a/b");
    }

    #[test]
    fn space_becomes_percent_20() {
        assert_eq!(encode_str("hi world", false, false), "hi%20world");
    }

    #[test]
    fn equals_double_encoded_when_requested() {
        assert_eq!(encode_str("a=b", false, true), "a%253Db");
        assert_eq!(encode_str("a=b", false, false), "a%3Db");
    }

    #[test]
    fn insufficient_memory_reported() {
        let mut out = [0u8; 2];
        assert_eq!(
            encode(b"/", &mut out, true, false),
            Err(SigV4Error::InsufficientMemory)
        );
    }
}
