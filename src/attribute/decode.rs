use byteorder::{ByteOrder, NetworkEndian, ReadBytesExt};
use std::io::Cursor;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use super::errors::AttributeDecodeError;
use super::utils::xor_byte_range;
use super::{AttributeValue, StunAttribute};

use crate::definitions::{StunTransactionId, STUN_MAGIC_COOKIE};
use crate::registry::{self, AttributeShape};

impl StunAttribute {
    // Decodes address shaped payloads (MAPPED-ADDRESS and friends).
    fn decode_address(
        bytes: &[u8],
        is_xored: bool,
        transaction_id: StunTransactionId,
    ) -> Result<SocketAddr, AttributeDecodeError> {
        if bytes.len() < 8 {
            return Err(AttributeDecodeError::InsufficientData());
        }

        // First byte is reserved, second carries the IP address family
        let ip_family = bytes[1];

        let mut port_bytes = bytes[2..4].to_vec();
        let mut addr_bytes = bytes[4..].to_vec();

        // The port is XORed with the most significant 16 bits of the magic cookie
        if is_xored {
            xor_byte_range(&mut port_bytes, &STUN_MAGIC_COOKIE);
        }

        let port = NetworkEndian::read_u16(&port_bytes);

        let address = match ip_family {
            0x01 => {
                if addr_bytes.len() < 4 {
                    return Err(AttributeDecodeError::InsufficientData());
                }

                if is_xored {
                    xor_byte_range(&mut addr_bytes, &STUN_MAGIC_COOKIE);
                }

                let mut cursor = Cursor::new(addr_bytes);

                let a = cursor.read_u8()?;
                let b = cursor.read_u8()?;
                let c = cursor.read_u8()?;
                let d = cursor.read_u8()?;

                IpAddr::V4(Ipv4Addr::new(a, b, c, d))
            }
            0x02 => {
                if addr_bytes.len() < 16 {
                    return Err(AttributeDecodeError::InsufficientData());
                }

                // An IPv6 address is XORed with the 128-bit concatenation of
                // the magic cookie and the transaction id
                if is_xored {
                    xor_byte_range(&mut addr_bytes[0..4], &STUN_MAGIC_COOKIE);
                    xor_byte_range(&mut addr_bytes[4..16], &transaction_id);
                }

                let mut cursor = Cursor::new(addr_bytes);

                let a = cursor.read_u16::<NetworkEndian>()?;
                let b = cursor.read_u16::<NetworkEndian>()?;
                let c = cursor.read_u16::<NetworkEndian>()?;
                let d = cursor.read_u16::<NetworkEndian>()?;
                let e = cursor.read_u16::<NetworkEndian>()?;
                let f = cursor.read_u16::<NetworkEndian>()?;
                let g = cursor.read_u16::<NetworkEndian>()?;
                let h = cursor.read_u16::<NetworkEndian>()?;

                IpAddr::V6(Ipv6Addr::new(a, b, c, d, e, f, g, h))
            }
            family => return Err(AttributeDecodeError::InvalidValue(family as u128)),
        };

        Ok(SocketAddr::new(address, port))
    }

    // Decodes the ERROR-CODE payload: 20 reserved bits, a 4-bit hundreds
    // class, an 8-bit number, then the UTF-8 reason phrase.
    fn decode_error_code(bytes: &[u8]) -> Result<AttributeValue, AttributeDecodeError> {
        if bytes.len() < 4 {
            return Err(AttributeDecodeError::InsufficientData());
        }

        let class = (bytes[2] & 0x0f) as u16;
        let number = bytes[3] as u16;
        let reason = String::from_utf8(bytes[4..].to_vec())?;

        Ok(AttributeValue::ErrorCode {
            code: class * 100 + number,
            reason,
        })
    }

    // Decodes the CHANGE-REQUEST flag word.
    fn decode_change_request(bytes: &[u8]) -> Result<AttributeValue, AttributeDecodeError> {
        if bytes.len() < 4 {
            return Err(AttributeDecodeError::InsufficientData());
        }

        let flags = NetworkEndian::read_u32(bytes);

        Ok(AttributeValue::ChangeRequest {
            ip: flags & 0x4 != 0,
            port: flags & 0x2 != 0,
        })
    }

    /// Decodes one attribute's payload bytes into a [`StunAttribute`],
    /// dispatching on the shape the registry declares for `code`.
    ///
    /// A code absent from the registry decodes as a raw value and is
    /// reported through the `log` facade rather than failing the message.
    pub(crate) fn decode(
        code: u16,
        payload: &[u8],
        transaction_id: StunTransactionId,
    ) -> Result<Self, AttributeDecodeError> {
        let spec = match registry::attribute_by_code(code) {
            Some(spec) => spec,
            None => {
                log::warn!(
                    "unrecognized attribute type {:#06x} ({} bytes), keeping raw payload",
                    code,
                    payload.len()
                );
                return Ok(Self::raw(code, payload.to_vec()));
            }
        };

        let value = match spec.shape {
            AttributeShape::Value => AttributeValue::Raw(payload.to_vec()),
            AttributeShape::Address => {
                AttributeValue::Address(Self::decode_address(payload, false, transaction_id)?)
            }
            AttributeShape::XorAddress => {
                AttributeValue::Address(Self::decode_address(payload, true, transaction_id)?)
            }
            AttributeShape::ErrorCode => Self::decode_error_code(payload)?,
            AttributeShape::ChangeRequest => Self::decode_change_request(payload)?,
        };

        Ok(Self { code, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TRANSACTION_ID: StunTransactionId = [
        0xb7, 0xe7, 0xa7, 0x01, 0xbc, 0x34, 0xd6, 0x86, 0xfa, 0x87, 0xdf, 0xae,
    ];

    #[test]
    fn decodes_plain_ipv4_address() {
        // 192.0.2.1:32853
        let payload = [0x00, 0x01, 0x80, 0x55, 0xc0, 0x00, 0x02, 0x01];
        let attr = StunAttribute::decode(0x0001, &payload, TEST_TRANSACTION_ID).unwrap();

        assert_eq!(attr.name(), Some("mapped_address"));
        assert_eq!(
            attr.value,
            AttributeValue::Address("192.0.2.1:32853".parse().unwrap())
        );
    }

    #[test]
    fn decodes_xored_ipv4_address() {
        // RFC5769 2.2: 192.0.2.1:32853 behind the magic cookie mask
        let payload = [0x00, 0x01, 0xa1, 0x47, 0xe1, 0x12, 0xa6, 0x43];
        let attr = StunAttribute::decode(0x0020, &payload, TEST_TRANSACTION_ID).unwrap();

        assert_eq!(
            attr.value,
            AttributeValue::Address("192.0.2.1:32853".parse().unwrap())
        );
    }

    #[test]
    fn decodes_xored_ipv6_address() {
        // RFC5769 2.3: [2001:db8:1234:5678:11:2233:4455:6677]:32853
        let payload = [
            0x00, 0x02, 0xa1, 0x47, 0x01, 0x13, 0xa9, 0xfa, 0xa5, 0xd3, 0xf1, 0x79, 0xbc, 0x25,
            0xf4, 0xb5, 0xbe, 0xd2, 0xb9, 0xd9,
        ];
        let attr = StunAttribute::decode(0x0020, &payload, TEST_TRANSACTION_ID).unwrap();

        assert_eq!(
            attr.value,
            AttributeValue::Address("[2001:db8:1234:5678:11:2233:4455:6677]:32853".parse().unwrap())
        );
    }

    #[test]
    fn rejects_unknown_address_family() {
        let payload = [0x00, 0x03, 0x80, 0x55, 0xc0, 0x00, 0x02, 0x01];
        let err = StunAttribute::decode(0x0001, &payload, TEST_TRANSACTION_ID).unwrap_err();
        match err {
            AttributeDecodeError::InvalidValue(0x03) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn decodes_error_code() {
        let mut payload = vec![0x00, 0x00, 0x04, 0x14];
        payload.extend_from_slice(b"Unknown Attribute");

        let attr = StunAttribute::decode(0x0009, &payload, TEST_TRANSACTION_ID).unwrap();
        assert_eq!(
            attr.value,
            AttributeValue::ErrorCode {
                code: 420,
                reason: "Unknown Attribute".to_string(),
            }
        );
    }

    #[test]
    fn decodes_change_request_flags() {
        let attr =
            StunAttribute::decode(0x0003, &[0, 0, 0, 0x6], TEST_TRANSACTION_ID).unwrap();
        assert_eq!(attr.value, AttributeValue::ChangeRequest { ip: true, port: true });

        let attr =
            StunAttribute::decode(0x0003, &[0, 0, 0, 0x2], TEST_TRANSACTION_ID).unwrap();
        assert_eq!(attr.value, AttributeValue::ChangeRequest { ip: false, port: true });
    }

    #[test]
    fn unknown_code_keeps_raw_payload() {
        let attr = StunAttribute::decode(0xbeef, &[1, 2, 3], TEST_TRANSACTION_ID).unwrap();
        assert_eq!(attr.code, 0xbeef);
        assert_eq!(attr.name(), None);
        assert_eq!(attr.value, AttributeValue::Raw(vec![1, 2, 3]));
    }
}
