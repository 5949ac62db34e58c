use crate::{AttributeDecodeError, AttributeEncodeError, HeaderDecodeError, HeaderEncodeError};
use thiserror::Error;

/// Integrity key derivation errors.
#[derive(Error, Debug)]
pub enum IntegrityKeyError {
    /// SASLprep failure during key generation
    #[error("Failed to process the password via SASLprep.")]
    SaslPrepFailure(#[from] stringprep::Error),
}

/// Message decoding errors.
///
/// Verification failures of the MESSAGE-INTEGRITY and FINGERPRINT trailers
/// are deliberately absent: they surface as cleared `integrity`/`fingerprint`
/// flags on the decoded message, and the caller decides whether to act on an
/// unauthenticated message.
#[derive(Error, Debug)]
pub enum MessageDecodeError {
    /// The 20-byte header is missing, carries non-zero marker bits, or its
    /// magic cookie is not 0x2112a442.
    #[error("Malformed STUN header.")]
    MalformedHeader(#[from] HeaderDecodeError),
    /// An attribute TLV claims more bytes than the message holds.
    #[error("Truncated STUN attribute.")]
    TruncatedAttribute(#[from] AttributeDecodeError),
}

/// Message encoding errors.
#[derive(Error, Debug)]
pub enum MessageEncodeError {
    /// IO error when writing a field value
    #[error("Error writing field value.")]
    WriteFailure(#[from] std::io::Error),
    /// Failure to encode the STUN header section.
    #[error("Error encoding STUN header.")]
    HeaderEncodeFailure(#[from] HeaderEncodeError),
    /// Failure to encode a STUN attribute
    #[error("Error encoding STUN attribute.")]
    AttributeEncodeFailure(#[from] AttributeEncodeError),
}
