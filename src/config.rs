//! Configurable limits for the signing core, expressed as a runtime
//! struct passed alongside [`crate::SigningParams`] rather than
//! compile-time constants, so a single build can serve callers with
//! different header/query pair caps.

/// Default cap on the number of header pairs the header canonicalizer
/// will track. One above this count fails with
/// [`crate::SigV4Error::MaxHeaderPairCountExceeded`].
pub const DEFAULT_MAX_HTTP_HEADER_COUNT: usize = 5;

/// Default cap on the number of query pairs the query canonicalizer will
/// track.
pub const DEFAULT_MAX_QUERY_PAIR_COUNT: usize = 5;

/// Largest block length any [`crate::HashProvider`] may report.
pub const MAX_BLOCK_LEN: usize = 128;

/// Largest digest length any [`crate::HashProvider`] may report.
pub const MAX_DIGEST_LEN: usize = 64;

/// Default size, in bytes, of the processing buffer used to build the
/// canonical request / string-to-sign / signing key chain.
pub const DEFAULT_PROCESSING_BUFFER_LEN: usize = 2048;

/// `2 * log2(N_max) + 2`, sized generously for `N_max` in the low
/// thousands; bounds the explicit stack used by the iterative quicksort
/// in [`crate::sort::quicksort`].
pub const WORST_CASE_SORT_STACK: usize = 64;

/// Hard, compile-time capacity of the fixed header-pair array the
/// header canonicalizer parses into. [`Limits::max_header_count`] tunes
/// the *enforced* limit at or below this array size; it can never
/// exceed it, since Rust arrays are fixed-size.
pub const MAX_HEADER_PAIRS_CAP: usize = 32;

/// Hard, compile-time capacity of the fixed query-pair array the query
/// canonicalizer parses into. See [`MAX_HEADER_PAIRS_CAP`].
pub const MAX_QUERY_PAIRS_CAP: usize = 32;

/// Limits an individual [`crate::generate_authorization`] call is bound by.
///
/// Defaults match the header/query pair caps most SigV4 implementations
/// settle on in practice — generous enough for any real request, small
/// enough to keep the fixed-size arrays this crate sorts into cheap.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Cap on header pairs; see [`DEFAULT_MAX_HTTP_HEADER_COUNT`].
    pub max_header_count: usize,
    /// Cap on query pairs; see [`DEFAULT_MAX_QUERY_PAIR_COUNT`].
    pub max_query_count: usize,
    /// Size of the scratch processing buffer `generate_authorization`
    /// allocates per call. `None` uses [`DEFAULT_PROCESSING_BUFFER_LEN`].
    pub processing_buffer_len: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_header_count: DEFAULT_MAX_HTTP_HEADER_COUNT,
            max_query_count: DEFAULT_MAX_QUERY_PAIR_COUNT,
            processing_buffer_len: None,
        }
    }
}
