//! Query string parsing, canonicalization, and emission.

use std::cmp::Ordering;

use crate::buffer::Cursor;
use crate::config::MAX_QUERY_PAIRS_CAP;
use crate::error::{Result, SigV4Error};
use crate::sort::quicksort;
use crate::uri;

/// A parsed `(field, value)` query pair, as byte spans borrowed from the
/// caller's original query string.
#[derive(Clone, Copy)]
struct QueryPair<'a> {
    field: &'a [u8],
    value: &'a [u8],
}

/// Splits `input` on `&` into up to `max_pairs` `(field, value)` pairs,
/// splitting each on the first `=` — further `=` bytes belong to the
/// value. Empty values are permitted; an empty field is rejected.
fn parse<'a>(
    input: &'a [u8],
    max_pairs: usize,
    out: &mut [(&'a [u8], &'a [u8]); MAX_QUERY_PAIRS_CAP],
) -> Result<usize> {
    if input.is_empty() {
        return Ok(0);
    }
    let max_pairs = max_pairs.min(MAX_QUERY_PAIRS_CAP);
    let mut count = 0usize;

    for part in input.split(|&b| b == b'&') {
        if part.is_empty() {
            continue;
        }
        let (field, value) = match part.iter().position(|&b| b == b'=') {
            Some(pos) => (&part[..pos], &part[pos + 1..]),
            None => (part, &part[part.len()..]),
        };
        if field.is_empty() {
            tracing::debug!("query pair has empty field");
            return Err(SigV4Error::InvalidParameter);
        }
        if count >= max_pairs {
            tracing::debug!(max_pairs, "query pair count exceeds configured maximum");
            return Err(SigV4Error::MaxQueryPairCountExceeded);
        }
        out[count] = (field, value);
        count += 1;
    }

    Ok(count)
}

/// Three-stage tiebreak: field-prefix, then field-length, then
/// value-prefix/length — never returns `Equal` for distinct pairs.
fn compare_pairs(a: &QueryPair<'_>, b: &QueryPair<'_>) -> Ordering {
    let common = a.field.len().min(b.field.len());
    let field_cmp = a.field[..common].cmp(&b.field[..common]);
    if field_cmp != Ordering::Equal {
        return field_cmp;
    }
    if a.field.len() != b.field.len() {
        return a.field.len().cmp(&b.field.len());
    }

    let common_v = a.value.len().min(b.value.len());
    let value_cmp = a.value[..common_v].cmp(&b.value[..common_v]);
    if value_cmp != Ordering::Equal {
        return value_cmp;
    }
    a.value.len().cmp(&b.value.len())
}

/// Parses, sorts, and emits a query string into `cursor`, followed by a
/// single `\n`. An empty `input` writes only the `\n`.
///
/// Fields are URI-encoded with `encode_slash=true,
/// double_encode_equals=false`; values with `encode_slash=true,
/// double_encode_equals=true` (so a literal `=` inside a value survives
/// the round trip through the query-string join).
pub fn canonicalize(cursor: &mut Cursor<'_>, input: &[u8], max_pairs: usize) -> Result<()> {
    let empty_pair: (&[u8], &[u8]) = (&[][..], &[][..]);
    let mut raw = [empty_pair; MAX_QUERY_PAIRS_CAP];
    let count = parse(input, max_pairs, &mut raw)?;

    let mut pairs: Vec<QueryPair<'_>> = raw[..count]
        .iter()
        .map(|&(field, value)| QueryPair { field, value })
        .collect();

    quicksort(&mut pairs, compare_pairs)?;

    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            cursor.write_u8(b'&')?;
        }
        encode_into(cursor, pair.field, false)?;
        cursor.write_u8(b'=')?;
        encode_into(cursor, pair.value, true)?;
    }
    cursor.write_u8(b'\n')?;
    Ok(())
}

/// Encodes `input` directly into the cursor's own forward region: the
/// encoded length is never known up front, so rather than sizing a
/// scratch `Vec` for the worst case, this hands `uri::encode` the rest
/// of the buffer to write into and advances the cursor by the number of
/// bytes it actually consumed.
fn encode_into(cursor: &mut Cursor<'_>, input: &[u8], double_encode_equals: bool) -> Result<()> {
    let start = cursor.pos();
    let remaining = cursor.remaining();
    let dest = cursor.slice_mut(start, remaining)?;
    let n = uri::encode(input, dest, true, double_encode_equals)?;
    cursor.seek(start + n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &[u8]) -> String {
        let mut buf = [0u8; 512];
        let mut cursor = Cursor::new(&mut buf);
        canonicalize(&mut cursor, input, 5).unwrap();
        String::from_utf8(cursor.written().to_vec()).unwrap()
    }

    #[test]
    fn empty_query_yields_bare_newline() {
        assert_eq!(run(b""), "\n");
    }

    #[test]
    fn single_param() {
        assert_eq!(run(b"foo=bar"), "foo=bar\n");
    }

    #[test]
    fn sorts_by_field_then_value() {
        assert_eq!(run(b"z=3&a=1&m=2"), "a=1&m=2&z=3\n");
    }

    #[test]
    fn tie_break_places_shorter_value_first() {
        assert_eq!(
            run(b"param=value2&param=value1&param1=test"),
            "param=value1&param=value2&param1=test\n"
        );
    }

    #[test]
    fn key_without_value_yields_empty_value() {
        assert_eq!(run(b"uploads"), "uploads=\n");
    }

    #[test]
    fn value_containing_equals_is_double_encoded() {
        assert_eq!(run(b"key=a=b"), "key=a%253Db\n");
    }

    #[test]
    fn rejects_empty_field() {
        let mut buf = [0u8; 64];
        let mut cursor = Cursor::new(&mut buf);
        assert_eq!(
            canonicalize(&mut cursor, b"=value", 5),
            Err(SigV4Error::InvalidParameter)
        );
    }

    #[test]
    fn accepts_exactly_max_pairs() {
        assert_eq!(run(b"a=1&b=2&c=3&d=4&e=5"), "a=1&b=2&c=3&d=4&e=5\n");
    }

    #[test]
    fn rejects_too_many_pairs() {
        let mut buf = [0u8; 64];
        let mut cursor = Cursor::new(&mut buf);
        assert_eq!(
            canonicalize(&mut cursor, b"a=1&b=2&c=3&d=4&e=5&f=6", 5),
            Err(SigV4Error::MaxQueryPairCountExceeded)
        );
    }
}
