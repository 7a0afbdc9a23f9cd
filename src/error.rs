use thiserror::Error;

/// Errors produced by the signing core.
///
/// Every variant is tag-only: no AWS request content is ever embedded in
/// an error, since these values may end up in application logs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SigV4Error {
    /// A required input was missing, empty, or exceeded a stated maximum
    /// (includes a date input of the wrong length).
    #[error("invalid parameter")]
    InvalidParameter,

    /// Date content parsed structurally but was out of range, or a
    /// literal format character failed to match the input.
    #[error("date failed ISO 8601 formatting")]
    IsoFormatting,

    /// The processing buffer or the caller's authorization buffer ran
    /// out of room for the next write.
    #[error("insufficient memory in destination buffer")]
    InsufficientMemory,

    /// The caller-supplied [`crate::HashProvider`] returned an error from
    /// `init`, `update`, or `finalize`.
    #[error("hash provider returned an error")]
    Hash,

    /// More header pairs were present than [`crate::Limits::max_header_count`]
    /// allows.
    #[error("header pair count exceeds configured maximum")]
    MaxHeaderPairCountExceeded,

    /// More query pairs were present than [`crate::Limits::max_query_count`]
    /// allows.
    #[error("query pair count exceeds configured maximum")]
    MaxQueryPairCountExceeded,
}

pub type Result<T> = core::result::Result<T, SigV4Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_stable_nonempty_display_text() {
        let variants = [
            SigV4Error::InvalidParameter,
            SigV4Error::IsoFormatting,
            SigV4Error::InsufficientMemory,
            SigV4Error::Hash,
            SigV4Error::MaxHeaderPairCountExceeded,
            SigV4Error::MaxQueryPairCountExceeded,
        ];
        for variant in variants {
            let text = variant.to_string();
            assert!(!text.is_empty());
            assert_eq!(variant.to_string(), text, "Display text must be stable across calls");
        }
    }
}
