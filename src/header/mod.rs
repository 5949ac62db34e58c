use byteorder::{NetworkEndian, ReadBytesExt, WriteBytesExt};
use num_traits::FromPrimitive;
use std::io::{Cursor, Read, Write};

mod errors;
mod message_class;
mod message_method;

use crate::definitions::{StunTransactionId, STUN_HEADER_SIZE, STUN_MAGIC_COOKIE_U32};
use crate::utils::generate_transaction_id;
pub use errors::{HeaderDecodeError, HeaderEncodeError};
pub use message_class::StunMessageClass;
pub use message_method::StunMessageMethod;

#[derive(Debug, Copy, Clone)]
/// [STUN message header](https://tools.ietf.org/html/rfc5389#section-6)
///
/// All STUN messages MUST start with a 20-byte header followed by zero
/// or more Attributes. The STUN header contains a STUN message type,
/// magic cookie, transaction ID, and message length.
///
/// The most significant 2 bits of every STUN message MUST be zeroes.
/// This can be used to differentiate STUN packets from other protocols
/// when STUN is multiplexed with other protocols on the same port.
///
/// The message type field packs the 12-bit method id `M` and the 2-bit
/// class id `C` in an interleaved layout inherited from RFC3489:
///```text
///                        0                 1
///                        2  3  4 5 6 7 8 9 0 1 2 3 4 5
///
///                       +--+--+-+-+-+-+-+-+-+-+-+-+-+-+
///                       |M |M |M|M|M|C|M|M|M|C|M|M|M|M|
///                       |11|10|9|8|7|1|6|5|4|0|3|2|1|0|
///                       +--+--+-+-+-+-+-+-+-+-+-+-+-+-+
///```
/// A Binding request (class 0b00, method 0x001) therefore encodes as
/// 0x0001 and a Binding success response (class 0b10) as 0x0101.
pub struct StunHeader {
    /// Which of the four classes the message belongs to, recovered from the
    /// interleaved type field
    pub message_class: StunMessageClass,
    /// The operation the message performs (Binding, the TURN relay methods,
    /// or a passthrough id)
    pub message_method: StunMessageMethod,
    /// Random 96-bit id pairing a request with its response; echoed
    /// untouched by the codec
    pub transaction_id: StunTransactionId,
    /// Size of the attribute section in bytes, trailers included. Filled
    /// from the wire when decoding; the message encoder computes its own
    /// value and overwrites whatever is here
    pub message_len: u16,
}

// Weaves the 12-bit method id and 2-bit class id into the 16-bit message
// type field and back. M11-M7, M6-M4 and M3-M0 sit on either side of the
// C1 and C0 bits.
fn encode_message_type(class: StunMessageClass, method: StunMessageMethod) -> u16 {
    let m = method.id();
    let c = class.id();

    ((m & 0x0f80) << 2) | ((m & 0x0070) << 1) | (m & 0x000f) | ((c & 0x2) << 7) | ((c & 0x1) << 4)
}

fn decode_message_type(type_field: u16) -> (StunMessageClass, StunMessageMethod) {
    let method_id = ((type_field >> 2) & 0x0f80) | ((type_field >> 1) & 0x0070) | (type_field & 0x000f);
    let class_id = ((type_field >> 7) & 0x2) | ((type_field >> 4) & 0x1);

    // The class id is masked to 2 bits, so every value maps to a variant
    let message_class = FromPrimitive::from_u16(class_id).unwrap_or(StunMessageClass::Request);
    let message_method = StunMessageMethod::from_id(method_id);

    (message_class, message_method)
}

impl StunHeader {
    /// Builds a header for a fresh message.
    ///
    /// A random transaction id is generated when the caller doesn't supply
    /// one. The length field starts at zero; whoever serializes the message
    /// is responsible for filling it in.
    pub(crate) fn new(
        message_method: StunMessageMethod,
        message_class: StunMessageClass,
        transaction_id: Option<StunTransactionId>,
    ) -> Self {
        // Pick a transaction_id
        let transaction_id = match transaction_id {
            Some(id) => id,
            None => generate_transaction_id(),
        };

        Self {
            message_method,
            message_class,
            transaction_id,
            message_len: 0, // Placeholder for the encoder to later fill in
        }
    }

    /// Reads a header off the cursor, validating the marker bits and the
    /// magic cookie before unweaving the type field
    pub(crate) fn decode(cursor: &mut Cursor<&[u8]>) -> Result<Self, HeaderDecodeError> {
        let available = cursor.get_ref().len().saturating_sub(cursor.position() as usize);
        if available < STUN_HEADER_SIZE {
            return Err(HeaderDecodeError::NotEnoughData(available));
        }

        let stun_type_field = cursor.read_u16::<NetworkEndian>()?;
        let msg_len = cursor.read_u16::<NetworkEndian>()?;
        let magic_cookie = cursor.read_u32::<NetworkEndian>()?;

        if stun_type_field & 0b1100_0000_0000_0000 != 0 {
            return Err(HeaderDecodeError::NonZeroMarkerBits(stun_type_field));
        }

        if magic_cookie != STUN_MAGIC_COOKIE_U32 {
            return Err(HeaderDecodeError::MagicCookieMismatch());
        }

        let mut transaction_id = [0; 12];
        cursor.read_exact(&mut transaction_id)?;

        let (message_class, message_method) = decode_message_type(stun_type_field);

        Ok(Self {
            message_method,
            message_class,
            message_len: msg_len,
            transaction_id,
        })
    }

    /// Serializes the header into its 20-byte wire form
    pub(crate) fn encode(&self) -> Result<Vec<u8>, HeaderEncodeError> {
        let bytes = Vec::new();
        let mut cursor = Cursor::new(bytes);

        let stun_type_field = encode_message_type(self.message_class, self.message_method);

        cursor.write_u16::<NetworkEndian>(stun_type_field)?;
        cursor.write_u16::<NetworkEndian>(self.message_len)?;
        cursor.write_u32::<NetworkEndian>(STUN_MAGIC_COOKIE_U32)?;
        cursor.write_all(&self.transaction_id)?;

        Ok(cursor.get_ref().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_type_weaving() {
        // Binding request and success response, the RFC5389 worked examples
        assert_eq!(
            encode_message_type(StunMessageClass::Request, StunMessageMethod::Binding),
            0x0001
        );
        assert_eq!(
            encode_message_type(StunMessageClass::SuccessResponse, StunMessageMethod::Binding),
            0x0101
        );
        assert_eq!(
            encode_message_type(StunMessageClass::ErrorResponse, StunMessageMethod::Allocate),
            0x0113
        );
        assert_eq!(
            encode_message_type(StunMessageClass::Indication, StunMessageMethod::Send),
            0x0016
        );
    }

    #[test]
    fn message_type_weaving_round_trips() {
        let methods = [
            StunMessageMethod::Binding,
            StunMessageMethod::Allocate,
            StunMessageMethod::Refresh,
            StunMessageMethod::Send,
            StunMessageMethod::Data,
            StunMessageMethod::CreatePermission,
            StunMessageMethod::ChannelBind,
            StunMessageMethod::Other(0xabc),
        ];
        let classes = [
            StunMessageClass::Request,
            StunMessageClass::Indication,
            StunMessageClass::SuccessResponse,
            StunMessageClass::ErrorResponse,
        ];

        for &method in &methods {
            for &class in &classes {
                let type_field = encode_message_type(class, method);
                assert_eq!(type_field & 0xc000, 0);

                let (decoded_class, decoded_method) = decode_message_type(type_field);
                assert_eq!(decoded_class, class);
                assert_eq!(decoded_method, method);
            }
        }
    }

    #[test]
    fn rejects_short_input() {
        let bytes = [0u8; 12];
        let err = StunHeader::decode(&mut Cursor::new(&bytes[..])).unwrap_err();
        match err {
            HeaderDecodeError::NotEnoughData(12) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_non_zero_marker_bits() {
        let mut bytes = vec![0x41, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42];
        bytes.extend_from_slice(&[0u8; 12]);

        let err = StunHeader::decode(&mut Cursor::new(bytes.as_slice())).unwrap_err();
        match err {
            HeaderDecodeError::NonZeroMarkerBits(_) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_magic_cookie() {
        let mut bytes = vec![0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x43];
        bytes.extend_from_slice(&[0u8; 12]);

        let err = StunHeader::decode(&mut Cursor::new(bytes.as_slice())).unwrap_err();
        match err {
            HeaderDecodeError::MagicCookieMismatch() => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
