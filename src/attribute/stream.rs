use byteorder::{NetworkEndian, ReadBytesExt};
use std::io::{Cursor, Seek, SeekFrom};

use super::errors::{AttributeDecodeError, AttributeEncodeError};
use super::StunAttribute;

use crate::definitions::StunTransactionId;

/// Walks a TLV attribute section and decodes each attribute in wire order.
///
/// `declared_len` is the value of the header length field. The walk itself is
/// driven by the buffer: a mismatch between the two is reported as a
/// diagnostic, not an error, and whatever was decoded is returned.
///
/// Two tolerances are applied for interop with real-world peers:
/// the final attribute may omit its trailing padding, and a payload that
/// fails its shape decode is kept as a raw attribute instead of failing the
/// message. Only a TLV claiming more bytes than remain is fatal.
pub(crate) fn decode_attribute_stream(
    bytes: &[u8],
    declared_len: u16,
    transaction_id: StunTransactionId,
) -> Result<Vec<StunAttribute>, AttributeDecodeError> {
    let mut attributes = Vec::new();
    let mut unaccounted = declared_len as i64;

    let mut cursor = Cursor::new(bytes);

    while (cursor.position() as usize) < bytes.len() {
        let code = cursor.read_u16::<NetworkEndian>()?;
        let item_len = cursor.read_u16::<NetworkEndian>()? as usize;

        let payload_start = cursor.position() as usize;
        let available = bytes.len() - payload_start;

        if item_len > available {
            return Err(AttributeDecodeError::Truncated {
                claimed: item_len,
                available,
            });
        }

        // The final attribute is allowed to fill the buffer exactly,
        // whatever its alignment
        let padding = if item_len == available {
            0
        } else {
            (4 - item_len % 4) % 4
        };

        let payload = &bytes[payload_start..payload_start + item_len];
        cursor.seek(SeekFrom::Current((item_len + padding) as i64))?;

        match StunAttribute::decode(code, payload, transaction_id) {
            Ok(attr) => attributes.push(attr),
            Err(err @ AttributeDecodeError::InsufficientData())
            | Err(err @ AttributeDecodeError::InvalidValue(_))
            | Err(err @ AttributeDecodeError::InvalidString(_)) => {
                log::warn!(
                    "attribute {:#06x} payload failed to decode ({}), keeping raw payload",
                    code,
                    err
                );
                attributes.push(StunAttribute::raw(code, payload.to_vec()));
            }
            Err(err) => return Err(err),
        }

        unaccounted -= (4 + item_len + padding) as i64;
    }

    if unaccounted != 0 {
        log::warn!(
            "attribute section length mismatch: header declared {} bytes, {} unaccounted",
            declared_len,
            unaccounted
        );
    }

    Ok(attributes)
}

/// Encodes attributes into a TLV section, in the order provided.
///
/// The returned length is the value to place in the header length field.
pub(crate) fn encode_attribute_stream(
    attributes: &[StunAttribute],
    transaction_id: StunTransactionId,
) -> Result<Vec<u8>, AttributeEncodeError> {
    let mut bytes = Vec::new();

    for attr in attributes {
        bytes.extend_from_slice(&attr.encode(transaction_id)?);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;

    const TEST_TRANSACTION_ID: StunTransactionId = [0xab; 12];

    #[test]
    fn decodes_attributes_in_wire_order() {
        // software "ab" (padded), then priority
        let bytes = [
            0x80, 0x22, 0x00, 0x02, b'a', b'b', 0x00, 0x00, //
            0x00, 0x24, 0x00, 0x04, 0x6e, 0x00, 0x01, 0xff,
        ];

        let attrs = decode_attribute_stream(&bytes, 16, TEST_TRANSACTION_ID).unwrap();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name(), Some("software"));
        assert_eq!(attrs[0].value, AttributeValue::Raw(b"ab".to_vec()));
        assert_eq!(attrs[1].name(), Some("priority"));
        assert_eq!(attrs[1].value, AttributeValue::Raw(vec![0x6e, 0x00, 0x01, 0xff]));
    }

    #[test]
    fn final_attribute_may_omit_padding() {
        // 6-byte username with no trailing padding
        let bytes = [0x00, 0x06, 0x00, 0x06, b'a', b'b', b'c', b'd', b'e', b'f'];

        let attrs = decode_attribute_stream(&bytes, 10, TEST_TRANSACTION_ID).unwrap();

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value, AttributeValue::Raw(b"abcdef".to_vec()));
    }

    #[test]
    fn truncated_attribute_is_fatal() {
        let bytes = [0x00, 0x06, 0x00, 0x10, b'a', b'b'];

        match decode_attribute_stream(&bytes, 6, TEST_TRANSACTION_ID).unwrap_err() {
            AttributeDecodeError::Truncated { claimed: 16, available: 2 } => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn malformed_payload_degrades_to_raw() {
        // mapped_address with a bogus address family of 0x07
        let bytes = [
            0x00, 0x01, 0x00, 0x08, 0x00, 0x07, 0x80, 0x55, 0xc0, 0x00, 0x02, 0x01,
        ];

        let attrs = decode_attribute_stream(&bytes, 12, TEST_TRANSACTION_ID).unwrap();

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].code, 0x0001);
        assert_eq!(
            attrs[0].value,
            AttributeValue::Raw(vec![0x00, 0x07, 0x80, 0x55, 0xc0, 0x00, 0x02, 0x01])
        );
    }

    #[test]
    fn stream_round_trip_preserves_order() {
        let attrs = vec![
            StunAttribute::new("username", AttributeValue::Raw(b"evtj:h6vY".to_vec())).unwrap(),
            StunAttribute::new(
                "xor_mapped_address",
                AttributeValue::Address("192.0.2.1:32853".parse().unwrap()),
            )
            .unwrap(),
            StunAttribute::raw(0xbeef, vec![1, 2, 3, 4]),
        ];

        let bytes = encode_attribute_stream(&attrs, TEST_TRANSACTION_ID).unwrap();
        assert_eq!(bytes.len() % 4, 0);

        let decoded =
            decode_attribute_stream(&bytes, bytes.len() as u16, TEST_TRANSACTION_ID).unwrap();
        assert_eq!(decoded, attrs);
    }
}
