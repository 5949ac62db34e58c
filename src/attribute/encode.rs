use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use std::io::{Cursor, Write};
use std::net::SocketAddr;

use super::errors::AttributeEncodeError;
use super::utils::xor_byte_range;
use super::{AttributeValue, StunAttribute};

use crate::definitions::{StunTransactionId, STUN_MAGIC_COOKIE};
use crate::registry::{self, AttributeShape};

impl StunAttribute {
    // Wraps the encoded attribute data into TLV
    fn wrap_in_tlv(code: u16, attr_bytes: &[u8]) -> Result<Vec<u8>, AttributeEncodeError> {
        let data_len = attr_bytes.len();
        if data_len > u16::max_value() as usize {
            return Err(AttributeEncodeError::PayloadTooBig(data_len));
        }

        let mut cursor = Cursor::new(Vec::new());

        // Write the attribute type
        cursor.write_u16::<NetworkEndian>(code)?;
        // Write the attribute data length
        cursor.write_u16::<NetworkEndian>(data_len as u16)?;
        // Write attribute data
        cursor.write_all(attr_bytes)?;

        // Calculate and add attribute padding
        // NOTE: As per [RFC5389 Section 15](https://tools.ietf.org/html/rfc5389#section-15) padding bytes may take any value.
        // In this implementation NULL bytes are used
        let padding = 4 - data_len % 4;
        if padding != 4 {
            cursor.write_all(&vec![0u8; padding])?;
        }

        Ok(cursor.get_ref().to_vec())
    }

    // Encodes address shaped payloads (MAPPED-ADDRESS and friends).
    fn encode_address(
        addr: &SocketAddr,
        is_xored: bool,
        transaction_id: StunTransactionId,
    ) -> Result<Vec<u8>, AttributeEncodeError> {
        let family = match addr {
            SocketAddr::V4(_) => 0x01,
            SocketAddr::V6(_) => 0x02,
        };

        // Process the port number
        let port = addr.port();
        let mut port_bytes = [0u8; 2];
        NetworkEndian::write_u16(&mut port_bytes, port);
        // The port is XORed with the most significant 16 bits of the magic cookie
        if is_xored {
            xor_byte_range(&mut port_bytes, &STUN_MAGIC_COOKIE);
        }

        let ip_addr_bytes = match addr {
            SocketAddr::V4(addr_v4) => {
                let mut ip_data = addr_v4.ip().octets();

                if is_xored {
                    xor_byte_range(&mut ip_data, &STUN_MAGIC_COOKIE)
                }

                ip_data.to_vec()
            }
            SocketAddr::V6(addr_v6) => {
                let segments = addr_v6.ip().segments();

                let mut ip_cursor = Cursor::new(Vec::new());
                for segment in segments.iter() {
                    ip_cursor.write_u16::<NetworkEndian>(*segment)?;
                }

                let ip_addr_bytes = ip_cursor.get_mut();

                // An IPv6 address is XORed with the 128-bit concatenation of
                // the magic cookie and the transaction id
                if is_xored {
                    xor_byte_range(&mut ip_addr_bytes[0..4], &STUN_MAGIC_COOKIE);
                    xor_byte_range(&mut ip_addr_bytes[4..16], &transaction_id);
                }

                ip_addr_bytes.to_vec()
            }
        };

        let mut cursor = Cursor::new(Vec::new());

        // Write leading zeroes
        cursor.write_u8(0)?;
        // Write ip address family
        cursor.write_u8(family)?;
        // Write socket port number
        cursor.write_all(&port_bytes)?;
        // Write (XORed) ip address bytes
        cursor.write_all(&ip_addr_bytes)?;

        Ok(cursor.get_ref().to_vec())
    }

    // Encodes the ERROR-CODE payload.
    fn encode_error_code(code: u16, reason: &str) -> Result<Vec<u8>, AttributeEncodeError> {
        if !(300..=699).contains(&code) {
            return Err(AttributeEncodeError::ErrorCodeOutOfRange(code));
        }

        let mut cursor = Cursor::new(Vec::new());
        // Write leading zeroes
        cursor.write_u16::<NetworkEndian>(0)?;
        // Write error class
        cursor.write_u8((code / 100) as u8)?;
        // Write error number
        cursor.write_u8((code % 100) as u8)?;
        // Write readable error reason
        cursor.write_all(reason.as_bytes())?;

        Ok(cursor.get_ref().to_vec())
    }

    // Encodes the CHANGE-REQUEST flag word.
    fn encode_change_request(ip: bool, port: bool) -> Result<Vec<u8>, AttributeEncodeError> {
        let mut flags = 0u32;
        if ip {
            flags |= 0x4;
        }
        if port {
            flags |= 0x2;
        }

        let mut buf = vec![0u8; 4];
        NetworkEndian::write_u32(&mut buf, flags);

        Ok(buf)
    }

    /// Encodes the attribute into its padded TLV representation.
    ///
    /// The registry shape of the type code selects the payload encoding; a
    /// value variant that contradicts the registered shape is a programmer
    /// error and yields [`AttributeEncodeError::ShapeMismatch`].
    pub(crate) fn encode(
        &self,
        transaction_id: StunTransactionId,
    ) -> Result<Vec<u8>, AttributeEncodeError> {
        let shape = registry::attribute_by_code(self.code).map(|spec| spec.shape);

        let payload = match (shape, &self.value) {
            // Type codes outside the registry carry raw bytes only
            (None, AttributeValue::Raw(bytes)) => bytes.clone(),
            (Some(AttributeShape::Value), AttributeValue::Raw(bytes)) => bytes.clone(),
            (Some(AttributeShape::Address), AttributeValue::Address(addr)) => {
                Self::encode_address(addr, false, transaction_id)?
            }
            (Some(AttributeShape::XorAddress), AttributeValue::Address(addr)) => {
                Self::encode_address(addr, true, transaction_id)?
            }
            (Some(AttributeShape::ErrorCode), AttributeValue::ErrorCode { code, reason }) => {
                Self::encode_error_code(*code, reason)?
            }
            (Some(AttributeShape::ChangeRequest), AttributeValue::ChangeRequest { ip, port }) => {
                Self::encode_change_request(*ip, *port)?
            }
            _ => return Err(AttributeEncodeError::ShapeMismatch { code: self.code }),
        };

        Self::wrap_in_tlv(self.code, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeValue;

    const TEST_TRANSACTION_ID: StunTransactionId = [
        0xb7, 0xe7, 0xa7, 0x01, 0xbc, 0x34, 0xd6, 0x86, 0xfa, 0x87, 0xdf, 0xae,
    ];

    #[test]
    fn xor_address_involution() {
        let addrs = [
            "192.0.2.1:32853",
            "10.1.2.3:1",
            "[2001:db8:1234:5678:11:2233:4455:6677]:32853",
            "[::1]:65535",
        ];

        for addr in &addrs {
            let addr: SocketAddr = addr.parse().unwrap();
            let attr = StunAttribute::new("xor_mapped_address", AttributeValue::Address(addr)).unwrap();

            let tlv = attr.encode(TEST_TRANSACTION_ID).unwrap();
            let decoded =
                StunAttribute::decode(attr.code, &tlv[4..], TEST_TRANSACTION_ID).unwrap();

            assert_eq!(decoded.value, AttributeValue::Address(addr));
        }
    }

    #[test]
    fn tlv_is_padded_to_four_bytes() {
        let attr = StunAttribute::new("software", AttributeValue::Raw(b"abcde".to_vec())).unwrap();
        let tlv = attr.encode(TEST_TRANSACTION_ID).unwrap();

        // 4-byte TLV header + 5 payload bytes + 3 padding bytes
        assert_eq!(tlv.len(), 12);
        assert_eq!(tlv.len() % 4, 0);
        // The length field holds the unpadded payload length
        assert_eq!(NetworkEndian::read_u16(&tlv[2..4]), 5);
        assert_eq!(&tlv[9..], &[0, 0, 0]);
    }

    #[test]
    fn error_code_range_is_enforced() {
        let attr = StunAttribute::new(
            "error_code",
            AttributeValue::ErrorCode { code: 700, reason: String::new() },
        )
        .unwrap();

        match attr.encode(TEST_TRANSACTION_ID).unwrap_err() {
            AttributeEncodeError::ErrorCodeOutOfRange(700) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        // mapped_address carrying raw bytes contradicts its registered shape
        let attr = StunAttribute {
            code: 0x0001,
            value: AttributeValue::Raw(vec![0u8; 8]),
        };

        match attr.encode(TEST_TRANSACTION_ID).unwrap_err() {
            AttributeEncodeError::ShapeMismatch { code: 0x0001 } => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn change_request_round_trip() {
        for &(ip, port) in &[(false, false), (true, false), (false, true), (true, true)] {
            let attr =
                StunAttribute::new("change_request", AttributeValue::ChangeRequest { ip, port })
                    .unwrap();
            let tlv = attr.encode(TEST_TRANSACTION_ID).unwrap();
            let decoded =
                StunAttribute::decode(attr.code, &tlv[4..], TEST_TRANSACTION_ID).unwrap();

            assert_eq!(decoded.value, AttributeValue::ChangeRequest { ip, port });
        }
    }
}
