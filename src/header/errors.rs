use thiserror::Error;

/// Header decoding errors.
#[derive(Error, Debug)]
pub enum HeaderDecodeError {
    /// Failed to read field value.
    #[error("Failed to read field value.")]
    ReadFailure(#[from] std::io::Error),
    /// Fewer than the 20 header bytes were provided.
    #[error("Not enough data for a STUN header: {0} bytes.")]
    NotEnoughData(usize),
    /// The two most significant bits of the message are not zeroes.
    /// The received byte sequence is likely not a STUN message.
    #[error("Most significant header bits are not zero: {0:#06x}.")]
    NonZeroMarkerBits(u16),
    /// The magic cookie field received in STUN header doesn't match with 0x2112a442.
    /// It's possible that the received byte sequence is not a STUN message.
    #[error("Magic cookie mismatch.")]
    MagicCookieMismatch(),
}

/// Header encoding errors.
#[derive(Error, Debug)]
pub enum HeaderEncodeError {
    /// Failed to write field value.
    #[error("Failed to write field value.")]
    WriteFailure(#[from] std::io::Error),
}
