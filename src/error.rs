use thiserror::Error;

/// Error parsing or converting an external representation of a [`Bid`].
///
/// [`Bid`]: crate::Bid
#[derive(Clone, PartialEq, Debug, Error)]
pub enum Error {
    /// The input matched none of the recognized identifier shapes.
    #[error("invalid bid: {0:?}")]
    UnknownFormat(String),

    /// A base64 payload did not decode.
    #[error("invalid bid {input:?} in base64: {source}")]
    Base64 {
        input: String,
        source: base64::DecodeError,
    },

    /// A base64 payload decoded to something other than 12 bytes.
    #[error("bid {0:?} in base64 is not 12 bytes")]
    Base64Length(String),

    /// A hex payload did not decode to 12 bytes.
    #[error("invalid bid {input:?} in hex: {source}")]
    Hex {
        input: String,
        source: hex::FromHexError,
    },

    /// The driver boundary handed over a value kind the codec does not
    /// recognize.
    #[error("bad source type {0:?}")]
    SourceType(&'static str),
}
