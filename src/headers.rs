//! HTTP header parsing, canonicalization, and emission.

use std::cmp::Ordering;

use crate::config::MAX_HEADER_PAIRS_CAP;
use crate::error::{Result, SigV4Error};
use crate::sort::quicksort;

/// A parsed `(key, value)` header pair, as byte spans borrowed from the
/// caller's original header block (read-only: never mutated in place).
#[derive(Clone, Copy)]
struct HeaderPair<'a> {
    key: &'a [u8],
    value: &'a [u8],
}

fn is_trimmable_space(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Parses a raw, CRLF-terminated header block (`Key: Value\r\n...\r\n`,
/// ending with an empty line) or, when `canonical` is set, an
/// already-canonical block (`key:value\n...`, LF-terminated, no
/// trimming needed) into up to `max_pairs` header pairs.
fn parse<'a>(
    input: &'a [u8],
    canonical: bool,
    max_pairs: usize,
    out: &mut [(&'a [u8], &'a [u8]); MAX_HEADER_PAIRS_CAP],
) -> Result<usize> {
    let max_pairs = max_pairs.min(MAX_HEADER_PAIRS_CAP);
    let mut pos = 0usize;
    let mut count = 0usize;

    while pos < input.len() {
        // End of block: a line consisting only of the terminator — CRLF
        // for a raw block, a bare LF for an already-canonical one (the
        // single additional `\n` this module appends after the last pair
        // on emission).
        if !canonical && input[pos..].starts_with(b"\r\n") {
            break;
        }
        if canonical && input[pos..].starts_with(b"\n") {
            break;
        }

        let colon = input[pos..].iter().position(|&b| b == b':').ok_or_else(|| {
            tracing::debug!(pos, "header block missing ':' key/value separator");
            SigV4Error::InvalidParameter
        })?;
        let key = trim_outer(&input[pos..pos + colon]);
        pos += colon + 1;

        let terminator: &[u8] = if canonical { b"\n" } else { b"\r\n" };
        let value_end = find_subslice(&input[pos..], terminator).ok_or_else(|| {
            tracing::debug!(pos, canonical, "header value terminator not found");
            SigV4Error::InvalidParameter
        })?;
        let raw_value = &input[pos..pos + value_end];
        pos += value_end + terminator.len();

        if count >= max_pairs {
            tracing::debug!(max_pairs, "header pair count exceeds configured maximum");
            return Err(SigV4Error::MaxHeaderPairCountExceeded);
        }
        out[count] = (key, raw_value);
        count += 1;
    }

    Ok(count)
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Strips leading/trailing ASCII space and tab from a header key. The
/// key is terminated by the first `:`, not a whitespace-aware scanner,
/// so a key like `"  Header-1 "` needs its surrounding space dropped
/// before lowercasing and comparison.
fn trim_outer(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|&b| !is_trimmable_space(b)).unwrap_or(value.len());
    let end = value.iter().rposition(|&b| !is_trimmable_space(b)).map_or(start, |i| i + 1);
    &value[start..end]
}

/// Trims leading/trailing ASCII space and tab, and collapses interior
/// runs of space/tab to a single space, writing the result to `out`.
/// Returns the number of bytes written.
fn trim_and_collapse(value: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut written = 0usize;
    let mut pending_space = false;
    let mut started = false;

    for &b in value {
        if is_trimmable_space(b) {
            if started {
                pending_space = true;
            }
            continue;
        }
        if pending_space {
            if written >= out.len() {
                tracing::debug!(capacity = out.len(), "header value trim scratch exhausted");
                return Err(SigV4Error::InsufficientMemory);
            }
            out[written] = b' ';
            written += 1;
            pending_space = false;
        }
        if written >= out.len() {
            tracing::debug!(capacity = out.len(), "header value trim scratch exhausted");
            return Err(SigV4Error::InsufficientMemory);
        }
        out[written] = b;
        written += 1;
        started = true;
    }

    Ok(written)
}

fn to_lower(b: u8) -> u8 {
    b.to_ascii_lowercase()
}

/// Three-stage tiebreak shared with [`crate::query`]: key-prefix (case
/// insensitive), then key-length, then value-prefix/length. Never
/// returns `Equal` for two genuinely distinct pairs, unlike a naive
/// prefix comparison that would treat one key as a prefix of another.
fn compare_pairs(a: &HeaderPair<'_>, b: &HeaderPair<'_>) -> Ordering {
    let common = a.key.len().min(b.key.len());
    let key_cmp = a.key[..common]
        .iter()
        .map(|c| to_lower(*c))
        .cmp(b.key[..common].iter().map(|c| to_lower(*c)));
    if key_cmp != Ordering::Equal {
        return key_cmp;
    }
    if a.key.len() != b.key.len() {
        return a.key.len().cmp(&b.key.len());
    }

    let common_v = a.value.len().min(b.value.len());
    let value_cmp = a.value[..common_v].cmp(&b.value[..common_v]);
    if value_cmp != Ordering::Equal {
        return value_cmp;
    }
    a.value.len().cmp(&b.value.len())
}

/// Result of canonicalizing a header block: the written canonical
/// headers section (each `lowercase(key):trimmed(value)\n`, terminated
/// with a blank line), plus the position and length of the
/// semicolon-joined signed-headers list within the processing buffer.
pub struct CanonicalHeaders {
    /// Byte offset of the signed-headers substring within the buffer
    /// passed to [`canonicalize`].
    pub signed_headers_start: usize,
    /// Length of the signed-headers substring.
    pub signed_headers_len: usize,
}

/// Parses, sorts, and emits a header block into `cursor`.
///
/// When `canonical` is true, parsing still happens (to recover the
/// signed-headers list and its sorted order) but no trimming or
/// re-sorting changes the bytes written for header values — the input
/// is expected to already be in canonical order and form.
pub fn canonicalize(
    cursor: &mut crate::buffer::Cursor<'_>,
    input: &[u8],
    canonical: bool,
    max_pairs: usize,
) -> Result<CanonicalHeaders> {
    let empty_pair: (&[u8], &[u8]) = (&[][..], &[][..]);
    let mut raw = [empty_pair; MAX_HEADER_PAIRS_CAP];
    let count = parse(input, canonical, max_pairs, &mut raw)?;

    let mut pairs: Vec<HeaderPair<'_>> = raw[..count]
        .iter()
        .map(|&(key, value)| HeaderPair { key, value })
        .collect();

    quicksort(&mut pairs, compare_pairs)?;

    // Canonical headers section.
    for pair in &pairs {
        for &b in pair.key {
            cursor.write_u8(to_lower(b))?;
        }
        cursor.write_u8(b':')?;

        if canonical {
            cursor.write(pair.value)?;
        } else {
            // Trimming only ever shrinks the value, so it can be written
            // directly into the cursor's own forward region and the
            // cursor advanced by the actual bytes produced — no separate
            // scratch allocation needed.
            let start = cursor.pos();
            let remaining = cursor.remaining();
            let dest = cursor.slice_mut(start, remaining)?;
            let n = trim_and_collapse(pair.value, dest)?;
            cursor.seek(start + n)?;
        }
        cursor.write_u8(b'\n')?;
    }
    cursor.write_u8(b'\n')?;

    // Signed headers section.
    let signed_headers_start = cursor.pos();
    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            cursor.write_u8(b';')?;
        }
        for &b in pair.key {
            cursor.write_u8(to_lower(b))?;
        }
    }
    let signed_headers_len = cursor.pos() - signed_headers_start;
    cursor.write_u8(b'\n')?;

    Ok(CanonicalHeaders {
        signed_headers_start,
        signed_headers_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Cursor;

    fn run(input: &[u8], canonical: bool) -> (String, String) {
        let mut buf = [0u8; 512];
        let mut cursor = Cursor::new(&mut buf);
        let result = canonicalize(&mut cursor, input, canonical, 5).unwrap();
        let signed = cursor
            .slice(result.signed_headers_start, result.signed_headers_len)
            .unwrap();
        let signed = String::from_utf8(signed.to_vec()).unwrap();
        let all = String::from_utf8(cursor.written().to_vec()).unwrap();
        (all, signed)
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        let (all, _) = run(b"  Header-1 :  Value  -  1  \r\n\r\n", false);
        assert_eq!(all, "header-1:Value - 1\n\nheader-1\n");
    }

    #[test]
    fn sorts_by_lowercased_key() {
        let (all, signed) = run(b"X-Amz-Date:20150830T123600Z\r\nHost:example.amazonaws.com\r\n\r\n", false);
        assert_eq!(
            all,
            "host:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\n"
        );
        assert_eq!(signed, "host;x-amz-date");
    }

    #[test]
    fn parses_already_canonical_block_with_trailing_blank_line() {
        let (all, signed) = run(b"host:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\n", true);
        assert_eq!(
            all,
            "host:example.amazonaws.com\nx-amz-date:20150830T123600Z\n\nhost;x-amz-date\n"
        );
        assert_eq!(signed, "host;x-amz-date");
    }

    #[test]
    fn accepts_exactly_max_headers() {
        let input = b"a:1\r\nb:1\r\nc:1\r\nd:1\r\ne:1\r\n\r\n";
        let mut buf = [0u8; 512];
        let mut cursor = Cursor::new(&mut buf);
        let result = canonicalize(&mut cursor, input, false, 5).unwrap();
        assert_eq!(result.signed_headers_len, "a;b;c;d;e".len());
    }

    #[test]
    fn rejects_too_many_headers() {
        let input = b"a:1\r\nb:1\r\nc:1\r\nd:1\r\ne:1\r\nf:1\r\n\r\n";
        let mut buf = [0u8; 512];
        let mut cursor = Cursor::new(&mut buf);
        let err = canonicalize(&mut cursor, input, false, 5).unwrap_err();
        assert_eq!(err, SigV4Error::MaxHeaderPairCountExceeded);
    }
}
