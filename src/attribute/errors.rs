use thiserror::Error;

/// Attribute decoding errors.
///
/// Only [`AttributeDecodeError::ReadFailure`] and
/// [`AttributeDecodeError::Truncated`] abort a message decode; payload-shape
/// failures are downgraded to raw attributes by the stream decoder.
#[derive(Error, Debug)]
pub enum AttributeDecodeError {
    /// Error reading field value.
    #[error("Error reading field value.")]
    ReadFailure(#[from] std::io::Error),
    /// A TLV header claims more payload bytes than remain in the buffer.
    #[error("Attribute claims {claimed} bytes but only {available} remain.")]
    Truncated {
        /// Payload length declared by the TLV header
        claimed: usize,
        /// Bytes actually remaining in the buffer
        available: usize,
    },
    /// Not enough data was provided to decode the value.
    #[error("Not enough data.")]
    InsufficientData(),
    /// Unrecognized field value was provided.
    #[error("Invalid field value: {0}.")]
    InvalidValue(u128),
    /// Failed to convert byte sequence into a UTF-8 string.
    #[error("Failed to convert byte sequence into a UTF-8 string.")]
    InvalidString(#[from] std::string::FromUtf8Error),
}

/// Attribute encoding errors.
#[derive(Error, Debug)]
pub enum AttributeEncodeError {
    /// Error writing field value.
    #[error("Error writing field value.")]
    WriteFailure(#[from] std::io::Error),
    /// The value variant doesn't match the shape the registry declares for
    /// the attribute's type code.
    #[error("Attribute {code:#06x} value doesn't match its registered shape.")]
    ShapeMismatch {
        /// Type code of the offending attribute
        code: u16,
    },
    /// ERROR-CODE values are confined to the range 300-699.
    #[error("Error code out of range: {0}.")]
    ErrorCodeOutOfRange(u16),
    /// The encoded payload crosses the 65535-byte limit of the TLV length field.
    #[error("Attribute payload too big: {0} bytes.")]
    PayloadTooBig(usize),
}
